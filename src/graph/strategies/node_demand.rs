// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Strategies for calculating the demand of a node.

use std::fmt::Display;

use num_traits::{One, Signed, Zero};

use crate::{
    graph::{
        calculator::{Calculation, Strategy, Target},
        Element, NodeId,
    },
    rational::{self, Rational},
    EnergyGraph, Error, Side,
};

/// A strategy for calculating the demand of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeDemand {
    /// The sum of the demands of all edges on one side of the node.
    ///
    /// Only applicable when the slot shares on that side add up to one.
    FromEdges(Side),
    /// A slot on the given side whose edges are all known, divided by the
    /// share of the slot.
    FromCompleteSlot(Side),
    /// A slot on the given side where some edges are known and the remaining
    /// ones have known shares.
    FromPartialSlot(Side),
    /// Zero, when every edge on one side of the node is known to be zero.
    ///
    /// Only reached when the slot shares on that side can't be used to scale
    /// the edges up to the node's demand, like slots with a zero share.
    FromZeroSlot,
}

/// The order in which node demand strategies are tried.
pub(crate) const NODE_DEMAND_STRATEGIES: &[NodeDemand] = &[
    NodeDemand::FromEdges(Side::Out),
    NodeDemand::FromCompleteSlot(Side::Out),
    NodeDemand::FromCompleteSlot(Side::In),
    NodeDemand::FromPartialSlot(Side::Out),
    NodeDemand::FromPartialSlot(Side::In),
    NodeDemand::FromEdges(Side::In),
    NodeDemand::FromZeroSlot,
];

impl NodeDemand {
    fn resolve(self, graph: &EnergyGraph, node: NodeId) -> Option<Rational> {
        match self {
            NodeDemand::FromEdges(side) => from_edges(graph, node, side),
            NodeDemand::FromCompleteSlot(side) => from_complete_slot(graph, node, side),
            NodeDemand::FromPartialSlot(side) => from_partial_slot(graph, node, side),
            NodeDemand::FromZeroSlot => from_zero_slot(graph, node),
        }
    }
}

fn from_edges(graph: &EnergyGraph, node: NodeId, side: Side) -> Option<Rational> {
    let slots = graph.graph[node].slots(side);
    if slots.is_empty() || !slots.conserves_energy() {
        return None;
    }
    graph.sum_of_edges(&graph.edges_on(node, side, None))
}

fn from_complete_slot(graph: &EnergyGraph, node: NodeId, side: Side) -> Option<Rational> {
    graph.graph[node].slots(side).iter().find_map(|slot| {
        let slot_demand = graph.sum_of_edges(slot.edges())?;
        let share = graph
            .slot_share(node, side, slot.carrier())
            .filter(|share| !share.is_zero())?;
        Some(slot_demand / share)
    })
}

fn from_partial_slot(graph: &EnergyGraph, node: NodeId, side: Side) -> Option<Rational> {
    graph.graph[node].slots(side).iter().find_map(|slot| {
        let share = graph
            .slot_share(node, side, slot.carrier())
            .filter(|share| !share.is_zero())?;

        let mut known = vec![];
        let mut unknown_shares = vec![];
        for edge in slot.edges() {
            match &graph.graph[*edge].demand {
                Some(demand) => known.push(demand),
                None => unknown_shares.push(graph.edge_share(*edge, side)?),
            }
        }
        if known.is_empty() || unknown_shares.is_empty() {
            return None;
        }

        let remainder = Rational::one() - rational::sum(&unknown_shares);
        if !remainder.is_positive() {
            return None;
        }
        Some(rational::sum(known) / remainder / share)
    })
}

fn from_zero_slot(graph: &EnergyGraph, node: NodeId) -> Option<Rational> {
    let zero_side = [Side::Out, Side::In].into_iter().any(|side| {
        let edges = graph.edges_on(node, side, None);
        !edges.is_empty()
            && graph
                .sum_of_edges(&edges)
                .is_some_and(|demand| demand.is_zero())
    });
    zero_side.then(Rational::zero)
}

impl Strategy for NodeDemand {
    type Target = NodeId;

    fn calculable(&self, graph: &EnergyGraph, target: NodeId) -> bool {
        self.resolve(graph, target).is_some()
    }

    fn calculate(&self, graph: &EnergyGraph, target: NodeId) -> Result<Rational, Error> {
        self.resolve(graph, target).ok_or_else(|| {
            Error::internal(format!(
                "{self} is not applicable to {}.",
                graph.describe(Element::Node(target))
            ))
        })
    }
}

impl Target for NodeId {
    type Strategy = NodeDemand;

    fn is_calculated(self, graph: &EnergyGraph) -> bool {
        graph.graph[self].demand.is_some()
    }

    fn store(self, graph: &mut EnergyGraph, value: Rational, calculation: Calculation<NodeDemand>) {
        let node = &mut graph.graph[self];
        node.demand = Some(value);
        node.calculation = Some(calculation);
    }

    fn describe(self, graph: &EnergyGraph) -> String {
        graph.describe(Element::Node(self))
    }
}

impl Display for NodeDemand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeDemand::FromEdges(side) => write!(f, "FromEdges({side})"),
            NodeDemand::FromCompleteSlot(side) => write!(f, "FromCompleteSlot({side})"),
            NodeDemand::FromPartialSlot(side) => write!(f, "FromPartialSlot({side})"),
            NodeDemand::FromZeroSlot => write!(f, "FromZeroSlot"),
        }
    }
}
