use instance_parser::structs::{CycleCoverInstance, InstanceEdge};
use rand::{rngs::StdRng, seq::index::sample, Rng};

/// Random instance where every node gets `out_degree` distinct successors other than
/// itself, each edge weighted uniformly in `[1, max_weight]`.
pub(crate) fn generate_instance(
    rng: &mut StdRng,
    node_count: usize,
    out_degree: usize,
    max_cycle_length: usize,
    max_weight: f64,
) -> CycleCoverInstance {
    let out_degree = out_degree.min(node_count.saturating_sub(1));
    let mut edges = Vec::with_capacity(node_count * out_degree);

    for source in 0..node_count {
        // draw from n - 1 slots and skip over the source itself
        let targets = sample(rng, node_count - 1, out_degree).into_vec();
        for slot in targets {
            let target = if slot >= source { slot + 1 } else { slot };
            edges.push(InstanceEdge {
                source,
                target,
                weight: rng.gen_range(1.0..=max_weight),
            });
        }
    }

    CycleCoverInstance {
        node_count,
        max_cycle_length,
        edges,
    }
}
