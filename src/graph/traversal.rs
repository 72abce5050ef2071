// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains methods that help with graph traversal.

use petgraph::graph::EdgeReference;
use petgraph::visit::{DfsPostOrder, EdgeFiltered, VisitMap};

use crate::{edge_type::EdgeTypePredicates, EnergyGraph, Side};

use super::{Edge, Element, NodeId};

/// Traversal methods.
impl EnergyGraph {
    /// Returns the nodes ordered from the deepest descendants to the
    /// ancestors.
    ///
    /// Overflow edges point against the nominal direction of the graph and
    /// are not followed.  Back-edges of any remaining cycles are ignored.
    pub(crate) fn nodes_deepest_first(&self) -> Vec<NodeId> {
        let filtered =
            EdgeFiltered::from_fn(&self.graph, |edge: EdgeReference<'_, Edge>| {
                !edge.weight().is_overflow()
            });

        let roots = self.graph.node_indices().filter(|idx| {
            self.edges_on(*idx, Side::In, None)
                .iter()
                .all(|edge| self.graph[*edge].is_overflow())
        });

        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut dfs = DfsPostOrder::empty(&filtered);
        for start in roots.chain(self.graph.node_indices()) {
            if dfs.discovered.is_visited(&start) {
                continue;
            }
            dfs.move_to(start);
            while let Some(idx) = dfs.next(&filtered) {
                order.push(idx);
            }
        }

        order
    }

    /// Returns the nodes and edges in the order in which they are handed to
    /// the solver: every node is followed by its incoming edges.
    pub(crate) fn elements_deepest_first(&self) -> Vec<Element> {
        self.nodes_deepest_first()
            .into_iter()
            .flat_map(|node| {
                std::iter::once(Element::Node(node)).chain(
                    self.edges_on(node, Side::In, None)
                        .into_iter()
                        .map(Element::Edge),
                )
            })
            .collect()
    }
}
