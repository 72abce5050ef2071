// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over nodes and edges in an `EnergyGraph`.

use petgraph::graph::DiGraph;

use super::{Edge, Node};

/// An iterator over the nodes in an `EnergyGraph`.
pub struct Nodes<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Node<Node>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the edges in an `EnergyGraph`.
pub struct Edges<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Edge<Edge>>,
}

impl<'a> Iterator for Edges<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| &e.weight)
    }
}

/// An iterator over the parents or the children of a node in an
/// `EnergyGraph`.
///
/// Nodes connected by multiple edges of different carriers are returned once
/// per edge.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a DiGraph<Node, Edge>,
    pub(crate) iter: petgraph::graph::Neighbors<'a, Edge>,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}
