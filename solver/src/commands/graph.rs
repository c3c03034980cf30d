use std::{borrow::Cow, path::PathBuf};

use anyhow::{Context, Result};
use cycle_cover::{Graph, NodeId, Weight};
use log::{debug, info};

use super::read_instance;

pub fn graph(input_path: PathBuf, output_path: PathBuf) -> Result<()> {
    let instance = read_instance(&input_path)?;
    let graph = Graph::from_instance(&instance)?;

    debug!(
        "Creating graph for {} nodes and {} edges, {} of the nodes lie on some cycle",
        graph.node_count(),
        graph.edge_count(),
        graph.cyclic_node_count()
    );

    let name = input_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace(|c: char| !c.is_ascii_alphanumeric(), "_"))
        .unwrap_or_else(|| "instance".to_owned());
    let edges = Edges {
        name: format!("G_{name}"),
        edges: (0..graph.node_count())
            .flat_map(|from| {
                graph
                    .neighbors(from)
                    .iter()
                    .map(move |neighbor| (from, neighbor.target, neighbor.weight))
            })
            .collect(),
        graph,
    };

    let mut output_file = std::fs::File::create(&output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    dot::render(&edges, &mut output_file)?;

    info!("Wrote graphviz dot file to: {:?}", output_path);

    Ok(())
}

type Nd = NodeId;
type Ed = (NodeId, NodeId, Weight);

struct Edges {
    name: String,
    graph: Graph,
    edges: Vec<Ed>,
}

impl<'a> dot::Labeller<'a, Nd, Ed> for Edges {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new(self.name.clone()).expect("Failed to get graph id")
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        dot::Id::new(format!("N{n}")).expect("Failed to label graph node")
    }

    fn node_label(&'a self, n: &Nd) -> dot::LabelText<'a> {
        dot::LabelText::label(n.to_string())
    }

    /// Nodes that cannot lie on any cycle are dashed.
    fn node_style(&'a self, n: &Nd) -> dot::Style {
        if self.graph.is_cyclic(*n) {
            dot::Style::None
        } else {
            dot::Style::Dashed
        }
    }

    fn edge_label(&'a self, e: &Ed) -> dot::LabelText<'a> {
        dot::LabelText::label(e.2.to_string())
    }
}

impl<'a> dot::GraphWalk<'a, Nd, Ed> for Edges {
    fn nodes(&self) -> dot::Nodes<'a, Nd> {
        Cow::Owned((0..self.graph.node_count()).collect())
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        Cow::Borrowed(&self.edges[..])
    }

    fn source(&self, e: &Ed) -> Nd {
        e.0
    }

    fn target(&self, e: &Ed) -> Nd {
        e.1
    }
}
