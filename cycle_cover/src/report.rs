use std::io::{self, Write};

use crate::search::OptimizedCover;

/// Write `cover` in the output format: the cost on the first line, then one `u v` line per
/// edge of every cycle no longer than `L`.
pub fn write_solution<W: Write>(writer: &mut W, cover: &OptimizedCover) -> io::Result<()> {
    writeln!(writer, "{}", cover.cost)?;
    for (from, to) in cover.edges() {
        writeln!(writer, "{from} {to}")?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::write_solution;
    use crate::{graph::Graph, search::solve, SearchOptions};

    #[test]
    fn writes_cost_then_edges() {
        let graph = Graph::new(
            5,
            2,
            [
                (0, 1, 1.5),
                (1, 0, 2.0),
                (2, 3, 1.0),
                (3, 4, 1.0),
                (4, 2, 1.0),
            ],
        )
        .unwrap();
        let cover = solve(
            &graph,
            &SearchOptions::default().with_seed(1),
            Duration::ZERO,
        );

        let mut output = Vec::new();
        write_solution(&mut output, &cover).unwrap();

        // the triangle is too long for L = 2
        assert_eq!(String::from_utf8(output).unwrap(), "3.5\n0 1\n1 0\n");
    }

    #[test]
    fn empty_cover_is_just_the_cost() {
        let graph = Graph::new(2, 2, [(0, 1, 1.0)]).unwrap();
        let cover = solve(&graph, &SearchOptions::default(), Duration::ZERO);

        let mut output = Vec::new();
        write_solution(&mut output, &cover).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "0\n");
    }
}
