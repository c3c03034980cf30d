// Plain whitespace separated text, chumsky keeps the error reporting consistent
// with the spans of the offending tokens.

use chumsky::{prelude::*, Parser};
use structs::{CycleCoverInstance, InstanceEdge};
use thiserror::Error;

pub mod structs;

#[derive(Debug, Error)]
pub enum InstanceParseError {
    #[error("ParseError occurred: {}", join_errors(.0))]
    ParseError(Vec<Simple<char>>),
    #[error("header declares {declared} edges but {found} were listed")]
    EdgeCountMismatch { declared: usize, found: usize },
}

fn join_errors(errors: &[Simple<char>]) -> String {
    errors
        .iter()
        .map(|err| format!("{err} at {:?}", err.span()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses `n m L` followed by `m` lines of `source target weight`.
///
/// Node indices are not range checked here, that is left to whoever builds a graph
/// from the instance.
pub fn parse_instance(content: &str) -> Result<CycleCoverInstance, InstanceParseError> {
    let parser = header_parser()
        .then(edge_parser().repeated())
        .then_ignore(end());

    let (((node_count, declared), max_cycle_length), edges) = parser
        .parse(content)
        .map_err(InstanceParseError::ParseError)?;

    if edges.len() != declared {
        return Err(InstanceParseError::EdgeCountMismatch {
            declared,
            found: edges.len(),
        });
    }

    Ok(CycleCoverInstance {
        node_count,
        max_cycle_length,
        edges,
    })
}

pub(crate) fn token() -> impl Parser<char, String, Error = Simple<char>> + Clone {
    filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .padded()
}

pub(crate) fn unsigned(
    label: &'static str,
) -> impl Parser<char, usize, Error = Simple<char>> + Clone {
    token()
        .try_map(move |tok, span| {
            tok.parse::<usize>()
                .map_err(|err| Simple::custom(span, format!("invalid {label} '{tok}': {err}")))
        })
        .labelled(label)
}

pub(crate) fn weight() -> impl Parser<char, f64, Error = Simple<char>> + Clone {
    token()
        .try_map(|tok, span| match tok.parse::<f64>() {
            Ok(weight) if weight.is_finite() => Ok(weight),
            Ok(_) => Err(Simple::custom(span, format!("weight '{tok}' is not finite"))),
            Err(err) => Err(Simple::custom(span, format!("invalid weight '{tok}': {err}"))),
        })
        .labelled("weight")
}

pub(crate) fn header_parser(
) -> impl Parser<char, ((usize, usize), usize), Error = Simple<char>> + Clone {
    unsigned("node count")
        .then(unsigned("edge count"))
        .then(unsigned("max cycle length"))
        .labelled("header")
}

pub(crate) fn edge_parser() -> impl Parser<char, InstanceEdge, Error = Simple<char>> + Clone {
    unsigned("source")
        .then(unsigned("target"))
        .then(weight())
        .map(|((source, target), weight)| InstanceEdge {
            source,
            target,
            weight,
        })
        .labelled("edge")
}

#[cfg(test)]
mod tests {
    use chumsky::Parser;

    use crate::{parse_instance, structs::InstanceEdge, InstanceParseError};

    static TEST_FILE: &str = include_str!("../../instances/square.txt");
    static SMALL_FILE: &str = include_str!("../../instances/small_12.txt");

    #[test]
    fn header_parsing() {
        let header = crate::header_parser().parse("4 4 4\n");
        assert!(header.is_ok());
        assert_eq!(header.unwrap(), ((4, 4), 4));
    }

    #[test]
    fn edge_parsing() {
        let edge = crate::edge_parser().parse("  3 0 -1.25 ");
        assert_eq!(
            edge.unwrap(),
            InstanceEdge {
                source: 3,
                target: 0,
                weight: -1.25
            }
        );
    }

    #[test]
    fn parse_square() {
        let instance = parse_instance(TEST_FILE).unwrap();

        assert_eq!(instance.node_count, 4);
        assert_eq!(instance.max_cycle_length, 4);
        assert_eq!(instance.edge_count(), 4);
        assert_eq!(
            instance.edges[3],
            InstanceEdge {
                source: 3,
                target: 0,
                weight: 1.0
            }
        );
    }

    #[test]
    fn parse_small_instance() {
        let output = parse_instance(SMALL_FILE);

        dbg!(&output);
        assert!(output.is_ok());
        assert_eq!(output.unwrap().node_count, 12);
    }

    #[test]
    fn accepts_exponent_weights_and_loose_whitespace() {
        let instance = parse_instance("2 2 2\n\n0 1 1e1\t1 0   2.5\n\n").unwrap();

        assert_eq!(instance.edges[0].weight, 10.0);
        assert_eq!(instance.edges[1].weight, 2.5);
    }

    #[test]
    fn edge_count_mismatch() {
        let output = parse_instance("3 2 3\n0 1 1.0\n");

        assert!(matches!(
            output,
            Err(InstanceParseError::EdgeCountMismatch {
                declared: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn truncated_edge_fails() {
        let output = parse_instance("3 2 3\n0 1 1.0\n1 2\n");

        assert!(matches!(output, Err(InstanceParseError::ParseError(_))));
    }

    #[test]
    fn non_finite_weight_fails() {
        let output = parse_instance("2 1 2\n0 1 inf\n");

        assert!(output.is_err());
    }

    #[test]
    fn negative_node_index_fails() {
        let output = parse_instance("2 1 2\n-1 1 3.0\n");

        assert!(matches!(output, Err(InstanceParseError::ParseError(_))));
    }

    #[test]
    fn separator_parsing_fail() {
        let content = "asd";

        let output = parse_instance(content);

        assert!(output.is_err());
        assert!(output.unwrap_err().to_string().starts_with("ParseError"));
    }

    #[test]
    fn display_writes_the_parsed_format() {
        let instance = parse_instance(TEST_FILE).unwrap();

        let reparsed = parse_instance(&instance.to_string()).unwrap();

        assert_eq!(reparsed, instance);
    }
}
