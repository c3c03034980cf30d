use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleCoverInstance {
    // header
    pub node_count: usize,
    pub max_cycle_length: usize,
    // edge list, in file order
    pub edges: Vec<InstanceEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl CycleCoverInstance {
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Renders the instance in the same whitespace separated format `parse_instance` reads.
impl fmt::Display for CycleCoverInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} {}",
            self.node_count,
            self.edge_count(),
            self.max_cycle_length
        )?;
        for edge in &self.edges {
            writeln!(f, "{} {} {}", edge.source, edge.target, edge.weight)?;
        }
        Ok(())
    }
}
