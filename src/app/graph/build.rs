use std::collections::HashMap;

use tracing::debug;

use crate::network::NetworkGraph;
use crate::query::{Subgraph, SubgraphStatus};

use super::super::{RenderEdge, RenderGraph, ViewModel, ViewScratch};

impl RenderGraph {
    /// Local draw lists for a mountable subgraph.
    pub(in crate::app) fn build(graph: &NetworkGraph, subgraph: &Subgraph) -> Self {
        let nodes = subgraph.nodes().to_vec();
        let local_by_node = nodes
            .iter()
            .enumerate()
            .map(|(local, &node)| (node, local))
            .collect::<HashMap<_, _>>();

        let mut edges = Vec::with_capacity(subgraph.edge_count());
        let mut links = Vec::with_capacity(subgraph.edge_count());
        for &edge_index in subgraph.edges() {
            let edge = &graph.edges()[edge_index];
            let (Some(&from), Some(&to)) = (
                local_by_node.get(&edge.source),
                local_by_node.get(&edge.target),
            ) else {
                continue;
            };
            if from == to {
                continue;
            }
            edges.push(RenderEdge {
                from,
                to,
                edge_index,
            });
            links.push((edge.source, edge.target));
        }

        Self {
            nodes,
            edges,
            links,
            view_scratch: ViewScratch::default(),
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        if self.subgraph.status() != SubgraphStatus::Normal {
            self.graph_cache = None;
            return;
        }

        let cache = RenderGraph::build(&self.graph, &self.subgraph);
        debug!(
            nodes = cache.nodes.len(),
            edges = cache.edges.len(),
            "render graph rebuilt"
        );
        self.graph_cache = Some(cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fixtures::sample;
    use crate::query::{PredicateKind, PredicateSet, resolve_subgraph};

    #[test]
    fn render_graph_mirrors_subgraph() {
        let graph = sample();
        let mut predicates = PredicateSet::default();
        predicates.add(PredicateKind::Instrument, "violin");
        let subgraph = resolve_subgraph(&graph, &predicates);

        let cache = RenderGraph::build(&graph, &subgraph);

        assert_eq!(cache.nodes.len(), 3);
        assert_eq!(cache.edges.len(), 2);
        assert_eq!(cache.links.len(), 2);
        assert!(!cache.nodes.contains(&graph.index_of("n").unwrap()));
        for edge in &cache.edges {
            let record = &graph.edges()[edge.edge_index];
            assert_eq!(cache.nodes[edge.from], record.source);
            assert_eq!(cache.nodes[edge.to], record.target);
        }
    }
}
