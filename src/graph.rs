// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! A graph representation of an energy network, with nodes that convert or
//! consume energy and edges that carry a single energy carrier between them.

mod creation;
mod edge;
mod node;
mod retrieval;
mod slot;
mod traversal;
mod validation;

mod calculator;
pub mod iterators;
mod solver;
mod strategies;

#[cfg(test)]
mod test_utils;

use crate::EnergyGraphConfig;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::HashMap;

pub use calculator::Calculation;
pub use edge::Edge;
pub use node::Node;
pub use slot::{Slot, Slots};
pub use strategies::{Direction, EdgeDemand, EdgeShare, NodeDemand};
pub use validation::Violation;

/// Identifies a node in an [`EnergyGraph`].
pub type NodeId = NodeIndex;

/// Identifies an edge in an [`EnergyGraph`].
pub type EdgeId = EdgeIndex;

/// `Node`s stored in a `DiGraph` instance can be addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any node key, so
/// that nodes in the `DiGraph` can be retrieved from their keys.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// A graph representation of an energy network, holding the known and the
/// calculated demands and shares of its nodes and edges.
#[derive(Clone, Debug)]
pub struct EnergyGraph {
    graph: DiGraph<Node, Edge>,
    node_indices: NodeIndexMap,
    config: EnergyGraphConfig,
}

/// A node or an edge of an [`EnergyGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    /// A node, identified by its id.
    Node(NodeId),
    /// An edge, identified by its id.
    Edge(EdgeId),
}
