// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Strategies for calculating the demand of an edge.

use std::fmt::Display;

use num_traits::Zero;

use crate::{
    edge_type::EdgeTypePredicates,
    graph::{
        calculator::{Calculation, Strategy, Target},
        Edge, EdgeId, Element,
    },
    rational::{self, Rational},
    EdgeType, EnergyGraph, Error, Side,
};

use super::Direction;

/// A strategy for calculating the demand of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeDemand {
    /// The surplus of the source node that its paired edge can't take.
    Overflow,
    /// Whatever is left over after the accounted siblings of a flexible
    /// edge, capped by its max demand when it has a priority.
    Flexible(Direction),
    /// The edge is the only one of its carrier on the `from` node.
    Solo(Direction),
    /// A known share of the output of the `from` node.
    ByShare(Direction),
    /// The output of the `from` node that its sibling edges of the same
    /// carrier don't take.
    FillRemaining(Direction),
    /// The demand of the `from` node that its other edges on the same side,
    /// of any carrier, don't take.
    FillRemainingAcrossSlots(Direction),
    /// The smaller of what the source can still supply and what the target
    /// still needs.
    FromDemand,
}

const OVERFLOW_STRATEGIES: &[EdgeDemand] = &[EdgeDemand::Overflow];

const FLEXIBLE_STRATEGIES: &[EdgeDemand] = &[
    EdgeDemand::Flexible(Direction::Reversed),
    EdgeDemand::Flexible(Direction::Forward),
    EdgeDemand::Solo(Direction::Forward),
    EdgeDemand::Solo(Direction::Reversed),
    EdgeDemand::ByShare(Direction::Forward),
    EdgeDemand::ByShare(Direction::Reversed),
    EdgeDemand::FillRemaining(Direction::Forward),
    EdgeDemand::FillRemaining(Direction::Reversed),
    EdgeDemand::FillRemainingAcrossSlots(Direction::Forward),
    EdgeDemand::FillRemainingAcrossSlots(Direction::Reversed),
    EdgeDemand::FromDemand,
];

const ORDINARY_STRATEGIES: &[EdgeDemand] = &[
    EdgeDemand::Solo(Direction::Forward),
    EdgeDemand::Solo(Direction::Reversed),
    EdgeDemand::ByShare(Direction::Forward),
    EdgeDemand::ByShare(Direction::Reversed),
    EdgeDemand::FillRemaining(Direction::Forward),
    EdgeDemand::FillRemaining(Direction::Reversed),
    EdgeDemand::FillRemainingAcrossSlots(Direction::Forward),
    EdgeDemand::FillRemainingAcrossSlots(Direction::Reversed),
    EdgeDemand::FromDemand,
];

/// Returns the strategies for the given edge, in the order in which they are
/// tried.
pub(crate) fn edge_demand_strategies(edge: &Edge) -> &'static [EdgeDemand] {
    match edge.edge_type() {
        EdgeType::Ordinary => ORDINARY_STRATEGIES,
        EdgeType::Flexible => FLEXIBLE_STRATEGIES,
        EdgeType::Overflow => OVERFLOW_STRATEGIES,
    }
}

impl EdgeDemand {
    fn resolve(self, graph: &EnergyGraph, edge: EdgeId) -> Option<Rational> {
        match self {
            EdgeDemand::Overflow => overflow(graph, edge),
            EdgeDemand::Flexible(d) => flexible(graph, edge, d),
            EdgeDemand::Solo(d) => solo(graph, edge, d),
            EdgeDemand::ByShare(d) => by_share(graph, edge, d),
            EdgeDemand::FillRemaining(d) => fill_remaining(graph, edge, d),
            EdgeDemand::FillRemainingAcrossSlots(d) => fill_remaining_across_slots(graph, edge, d),
            EdgeDemand::FromDemand => from_demand(graph, edge),
        }
    }
}

/// Returns the other edges of the same carrier on the `from` node.
fn siblings(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Vec<EdgeId> {
    let edge_ref = &graph.graph[edge];
    d.out_edges(graph, d.from(edge_ref), Some(&edge_ref.carrier))
        .into_iter()
        .filter(|sibling| *sibling != edge)
        .collect()
}

/// Sums the demands of the given edges that are already known.
fn sum_of_known(graph: &EnergyGraph, edges: &[EdgeId]) -> Rational {
    rational::sum(edges.iter().filter_map(|edge| graph.graph[*edge].demand.as_ref()))
}

fn overflow(graph: &EnergyGraph, edge: EdgeId) -> Option<Rational> {
    let edge_ref = &graph.graph[edge];
    let (source, carrier) = (edge_ref.source, &edge_ref.carrier);

    let paired = graph
        .edges_on(edge_ref.target, Side::Out, Some(carrier))
        .into_iter()
        .find(|other| {
            let other = &graph.graph[*other];
            other.target == source && !other.is_overflow()
        });
    if let Some(paired) = paired {
        if graph.graph[paired]
            .demand
            .as_ref()
            .is_some_and(|demand| !demand.is_zero())
        {
            return Some(Rational::zero());
        }
    }

    let inbound = graph
        .edges_on(source, Side::In, Some(carrier))
        .into_iter()
        .filter(|other| Some(*other) != paired)
        .collect::<Vec<_>>();
    let outbound = graph
        .edges_on(source, Side::Out, Some(carrier))
        .into_iter()
        .filter(|other| *other != edge)
        .collect::<Vec<_>>();

    Some(graph.sum_of_edges(&inbound)? - graph.sum_of_edges(&outbound)?)
}

fn flexible(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Option<Rational> {
    let edge_ref = &graph.graph[edge];
    let from = d.from(edge_ref);

    let mut accounted = vec![];
    for sibling in siblings(graph, edge, d) {
        let sibling_ref = &graph.graph[sibling];
        match &sibling_ref.demand {
            Some(demand) => accounted.push(demand.clone()),
            None if sibling_ref.is_flexible() && sibling_ref.priority < edge_ref.priority => {}
            None => return None,
        }
    }

    let available = match d.output_of(graph, from, &edge_ref.carrier) {
        Some(output) => output,
        None => synthesized_output(graph, edge, d)?,
    };
    let value = available - rational::sum(&accounted);

    if edge_ref.priority.is_some() {
        if let Some(max_demand) = graph.edge_max_demand(edge) {
            return Some(value.min(max_demand));
        }
    }
    Some(value)
}

/// The output of the `from` node, derived from the edges on its other side,
/// when this edge is the only one leaving it.
fn synthesized_output(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Option<Rational> {
    let edge_ref = &graph.graph[edge];
    let from = d.from(edge_ref);
    if d.out_edges(graph, from, None) != [edge] {
        return None;
    }

    let other_side = d.in_side();
    let slots = graph.graph[from].slots(other_side);
    if slots.is_empty() || !slots.conserves_energy() {
        return None;
    }
    let demand = graph.sum_of_edges(&d.in_edges(graph, from, None))?;
    let share = graph.slot_share(from, d.out_side(), &edge_ref.carrier)?;
    Some(demand * share)
}

fn solo(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Option<Rational> {
    if !siblings(graph, edge, d).is_empty() {
        return None;
    }
    let edge_ref = &graph.graph[edge];
    d.output_of(graph, d.from(edge_ref), &edge_ref.carrier)
}

fn by_share(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Option<Rational> {
    let edge_ref = &graph.graph[edge];
    let share = edge_ref.stored_share(d.out_side())?;
    let output = d.output_of(graph, d.from(edge_ref), &edge_ref.carrier)?;
    Some(output * share)
}

fn fill_remaining(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Option<Rational> {
    let edge_ref = &graph.graph[edge];
    let taken = graph.sum_of_edges(&siblings(graph, edge, d))?;
    let output = d.output_of(graph, d.from(edge_ref), &edge_ref.carrier)?;
    Some(output - taken)
}

fn fill_remaining_across_slots(graph: &EnergyGraph, edge: EdgeId, d: Direction) -> Option<Rational> {
    let from = d.from(&graph.graph[edge]);
    let node = &graph.graph[from];
    if !node.slots(d.out_side()).conserves_energy() {
        return None;
    }
    let others = d
        .out_edges(graph, from, None)
        .into_iter()
        .filter(|other| *other != edge)
        .collect::<Vec<_>>();
    let others = graph.sum_of_edges(&others)?;
    Some(node.demand.as_ref()? - others)
}

fn from_demand(graph: &EnergyGraph, edge: EdgeId) -> Option<Rational> {
    let edge_ref = &graph.graph[edge];
    let d = Direction::Forward;
    let supply = d.output_of(graph, edge_ref.source, &edge_ref.carrier)?;
    let need = d.demand_for(graph, edge_ref.target, &edge_ref.carrier)?;

    let supplied_elsewhere = sum_of_known(graph, &siblings(graph, edge, d));
    let needed_elsewhere = sum_of_known(graph, &siblings(graph, edge, Direction::Reversed));

    Some((supply - supplied_elsewhere).min(need - needed_elsewhere))
}

impl Strategy for EdgeDemand {
    type Target = EdgeId;

    fn calculable(&self, graph: &EnergyGraph, target: EdgeId) -> bool {
        self.resolve(graph, target).is_some()
    }

    fn calculate(&self, graph: &EnergyGraph, target: EdgeId) -> Result<Rational, Error> {
        self.resolve(graph, target).ok_or_else(|| {
            Error::internal(format!(
                "{self} is not applicable to {}.",
                graph.describe(Element::Edge(target))
            ))
        })
    }
}

impl Target for EdgeId {
    type Strategy = EdgeDemand;

    fn is_calculated(self, graph: &EnergyGraph) -> bool {
        graph.graph[self].demand.is_some()
    }

    fn store(self, graph: &mut EnergyGraph, value: Rational, calculation: Calculation<EdgeDemand>) {
        let edge = &mut graph.graph[self];
        edge.demand = Some(value);
        edge.calculation = Some(calculation);
    }

    fn describe(self, graph: &EnergyGraph) -> String {
        graph.describe(Element::Edge(self))
    }
}

impl Display for EdgeDemand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeDemand::Overflow => write!(f, "Overflow"),
            EdgeDemand::Flexible(d) => write!(f, "Flexible({d})"),
            EdgeDemand::Solo(d) => write!(f, "Solo({d})"),
            EdgeDemand::ByShare(d) => write!(f, "ByShare({d})"),
            EdgeDemand::FillRemaining(d) => write!(f, "FillRemaining({d})"),
            EdgeDemand::FillRemainingAcrossSlots(d) => write!(f, "FillRemainingAcrossSlots({d})"),
            EdgeDemand::FromDemand => write!(f, "FromDemand"),
        }
    }
}
