// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the `graph` module:
//!
//! - the `GraphBuilder`, which can declaratively build energy graphs for use
//!   in tests, with demands and shares given as floats.
//! - a few ready-made graphs for the solver scenarios.

use crate::{
    rational::from_f64, EdgeDef, EdgeType, EnergyGraph, EnergyGraphConfig, Error, NodeDef, Side,
};

/// A builder for creating energy graph configurations easily, for use in
/// tests.
pub(super) struct GraphBuilder {
    nodes: Vec<NodeDef>,
    edges: Vec<EdgeDef>,
    config: EnergyGraphConfig,
}

impl GraphBuilder {
    /// Creates a new `GraphBuilder`.
    pub(super) fn new() -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            edges: Vec::new(),
            config: EnergyGraphConfig::default(),
        }
    }

    fn node_def(&mut self, key: &str) -> &mut NodeDef {
        self.nodes
            .iter_mut()
            .find(|node| node.key == key)
            .unwrap_or_else(|| panic!("Node {key} must be added before it is configured."))
    }

    fn edge_def(mut self, def: EdgeDef) -> Self {
        self.edges.push(def);
        self
    }

    /// Adds a node without a known demand.
    pub(super) fn node(mut self, key: &str) -> Self {
        self.nodes.push(NodeDef::new(key));
        self
    }

    /// Adds a node with a known demand.
    pub(super) fn node_with_demand(mut self, key: &str, demand: f64) -> Self {
        self.nodes
            .push(NodeDef::new(key).with_demand(from_f64(demand).unwrap()));
        self
    }

    /// Sets the max demand of an already added node.
    pub(super) fn max_demand(mut self, key: &str, max_demand: f64) -> Self {
        let def = self.node_def(key);
        *def = def.clone().with_max_demand(from_f64(max_demand).unwrap());
        self
    }

    /// Sets an explicit slot share on an already added node.
    pub(super) fn slot_share(mut self, key: &str, side: Side, carrier: &str, share: f64) -> Self {
        let def = self.node_def(key);
        *def = def
            .clone()
            .with_slot_share(side, carrier, from_f64(share).unwrap());
        self
    }

    /// Adds an ordinary edge.
    pub(super) fn edge(self, from: &str, to: &str, carrier: &str) -> Self {
        self.edge_def(EdgeDef::new(from, to, carrier))
    }

    /// Adds an ordinary edge with a known demand.
    pub(super) fn edge_with_demand(self, from: &str, to: &str, carrier: &str, demand: f64) -> Self {
        self.edge_def(EdgeDef::new(from, to, carrier).with_demand(from_f64(demand).unwrap()))
    }

    /// Adds an ordinary edge with a known child share.
    pub(super) fn edge_share(self, from: &str, to: &str, carrier: &str, share: f64) -> Self {
        self.edge_def(EdgeDef::new(from, to, carrier).with_share(from_f64(share).unwrap()))
    }

    /// Adds an ordinary edge with a known parent share.
    pub(super) fn edge_parent_share(
        self,
        from: &str,
        to: &str,
        carrier: &str,
        share: f64,
    ) -> Self {
        self.edge_def(EdgeDef::new(from, to, carrier).with_parent_share(from_f64(share).unwrap()))
    }

    /// Adds a flexible edge, with an optional priority.
    pub(super) fn flexible_edge(
        self,
        from: &str,
        to: &str,
        carrier: &str,
        priority: Option<i64>,
    ) -> Self {
        let def = EdgeDef::new(from, to, carrier).with_type(EdgeType::Flexible);
        self.edge_def(match priority {
            Some(priority) => def.with_priority(priority),
            None => def,
        })
    }

    /// Adds an overflow edge.
    pub(super) fn overflow_edge(self, from: &str, to: &str, carrier: &str) -> Self {
        self.edge_def(EdgeDef::new(from, to, carrier).with_type(EdgeType::Overflow))
    }

    /// Allows multiple slots without an explicit share on one side of a node.
    pub(super) fn allow_implicit_slot_shares(mut self) -> Self {
        self.config.allow_implicit_slot_shares = true;
        self
    }

    /// Replaces the config of the graph.
    pub(super) fn config(mut self, config: EnergyGraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds and returns the energy graph from the nodes and edges added to
    /// the builder.
    pub(super) fn build(self) -> Result<EnergyGraph, Error> {
        EnergyGraph::try_new(self.nodes, self.edges, self.config)
    }
}

/// A chain of three nodes, where the middle one passes on 60% of its demand.
pub(super) fn chain() -> GraphBuilder {
    GraphBuilder::new()
        .node_with_demand("t", 50.0)
        .node("m")
        .node("b")
        .slot_share("m", Side::Out, "gas", 0.6)
        .edge("t", "m", "gas")
        .edge("m", "b", "gas")
}

/// A node that splits its output evenly between two consumers and a loss.
pub(super) fn fan_out() -> GraphBuilder {
    GraphBuilder::new()
        .node("a")
        .node_with_demand("x", 10.0)
        .node_with_demand("y", 20.0)
        .node("loss")
        .slot_share("a", Side::Out, "electricity", 0.5)
        .slot_share("a", Side::Out, "loss", 0.5)
        .edge("a", "x", "electricity")
        .edge("a", "y", "electricity")
        .edge("a", "loss", "loss")
}

/// A grid where solar production that the consumer can't use flows back
/// through an overflow edge.
pub(super) fn overflow() -> GraphBuilder {
    GraphBuilder::new()
        .node_with_demand("source", 120.0)
        .node("hvn")
        .node("mvn")
        .node("lvn")
        .node_with_demand("consumer", 100.0)
        .node("export")
        .node_with_demand("solar", 80.0)
        .edge("source", "hvn", "electricity")
        .edge("hvn", "mvn", "electricity")
        .edge("hvn", "export", "electricity")
        .edge("mvn", "lvn", "electricity")
        .edge("lvn", "consumer", "electricity")
        .edge("solar", "consumer", "electricity")
        .overflow_edge("mvn", "hvn", "electricity")
}

/// A consumer supplied by a capped flexible edge, an uncapped flexible edge
/// and an ordinary edge.
pub(super) fn flex() -> GraphBuilder {
    GraphBuilder::new()
        .node("b")
        .max_demand("b", 10.0)
        .node("x")
        .node("y")
        .node_with_demand("d", 100.0)
        .flexible_edge("b", "d", "heat", Some(1))
        .flexible_edge("x", "d", "heat", None)
        .edge_with_demand("y", "d", "heat", 50.0)
}
