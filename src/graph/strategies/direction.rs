// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The direction in which a strategy looks at an edge.

use std::fmt::Display;

use crate::{rational::Rational, Carrier, EnergyGraph, Side};

use super::super::{Edge, EdgeId, NodeId};

/// The direction in which a strategy propagates values along an edge.
///
/// Strategies are written in terms of the edge's `from` and `to` nodes.  In
/// the [`Forward`][Direction::Forward] direction, `from` is the parent and
/// `to` is the child, and in the [`Reversed`][Direction::Reversed] direction
/// they are swapped, along with all the accessors that depend on them.
///
/// | accessor       | forward                 | reversed                |
/// |----------------|-------------------------|-------------------------|
/// | `from`         | source                  | target                  |
/// | `out_edges`    | outgoing edges          | incoming edges          |
/// | `parent_share` | parent share            | child share             |
/// | `output_of`    | output of the node      | demand of the node      |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the parent towards the child.
    Forward,
    /// From the child towards the parent.
    Reversed,
}

impl Direction {
    /// The side of the `from` node that the edge is attached to.
    pub(crate) fn out_side(self) -> Side {
        match self {
            Direction::Forward => Side::Out,
            Direction::Reversed => Side::In,
        }
    }

    /// The side of the `to` node that the edge is attached to.
    pub(crate) fn in_side(self) -> Side {
        self.out_side().opposite()
    }

    pub(crate) fn from(self, edge: &Edge) -> NodeId {
        edge.node_at(self.out_side())
    }

    pub(crate) fn to(self, edge: &Edge) -> NodeId {
        edge.node_at(self.in_side())
    }

    pub(crate) fn out_edges(
        self,
        graph: &EnergyGraph,
        node: NodeId,
        carrier: Option<&Carrier>,
    ) -> Vec<EdgeId> {
        graph.edges_on(node, self.out_side(), carrier)
    }

    pub(crate) fn in_edges(
        self,
        graph: &EnergyGraph,
        node: NodeId,
        carrier: Option<&Carrier>,
    ) -> Vec<EdgeId> {
        graph.edges_on(node, self.in_side(), carrier)
    }

    pub(crate) fn parent_share(self, graph: &EnergyGraph, edge: EdgeId) -> Option<Rational> {
        graph.edge_share(edge, self.out_side())
    }

    pub(crate) fn output_of(
        self,
        graph: &EnergyGraph,
        node: NodeId,
        carrier: &Carrier,
    ) -> Option<Rational> {
        graph.carrier_demand(node, self.out_side(), carrier)
    }

    pub(crate) fn demand_for(
        self,
        graph: &EnergyGraph,
        node: NodeId,
        carrier: &Carrier,
    ) -> Option<Rational> {
        graph.carrier_demand(node, self.in_side(), carrier)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reversed => write!(f, "reversed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::GraphBuilder;
    use crate::rational::from_integer;
    use crate::Error;

    #[test]
    fn test_directions_are_mirrored() -> Result<(), Error> {
        let graph = GraphBuilder::new()
            .node_with_demand("parent", 30.0)
            .node_with_demand("child", 20.0)
            .node("other")
            .edge("parent", "child", "gas")
            .edge("parent", "other", "gas")
            .build()?;
        let gas = Carrier::from("gas");
        let edge_id = graph.edge_id("parent", "child", &gas)?;
        let edge = &graph.graph[edge_id];
        let (parent, child) = (graph.node_id("parent")?, graph.node_id("child")?);

        assert_eq!(Direction::Forward.from(edge), parent);
        assert_eq!(Direction::Forward.to(edge), child);
        assert_eq!(Direction::Reversed.from(edge), child);
        assert_eq!(Direction::Reversed.to(edge), parent);

        assert_eq!(Direction::Forward.out_edges(&graph, parent, Some(&gas)).len(), 2);
        assert_eq!(Direction::Reversed.out_edges(&graph, child, Some(&gas)), [edge_id]);
        assert_eq!(Direction::Reversed.in_edges(&graph, parent, None).len(), 2);

        assert_eq!(
            Direction::Forward.output_of(&graph, parent, &gas),
            Some(from_integer(30))
        );
        assert_eq!(
            Direction::Reversed.output_of(&graph, child, &gas),
            Some(from_integer(20))
        );
        assert_eq!(
            Direction::Forward.demand_for(&graph, child, &gas),
            Some(from_integer(20))
        );
        assert_eq!(Direction::Forward.parent_share(&graph, edge_id), None);

        Ok(())
    }
}
