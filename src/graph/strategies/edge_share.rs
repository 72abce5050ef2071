// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Strategies for calculating the share of an edge.
//!
//! The share of an edge at its `from` node is the fraction of that node's
//! demand for the edge's carrier that flows through the edge.  In the forward
//! direction, that is the parent share, and in the reversed direction, the
//! child share.

use std::fmt::Display;

use num_traits::{One, Zero};

use crate::{
    graph::{
        calculator::{Calculation, Strategy, Target},
        EdgeId, Element,
    },
    rational::{self, Rational},
    EnergyGraph, Error,
};

use super::Direction;

/// A strategy for calculating the share of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeShare {
    /// The edge is the only one of its carrier on the `from` node.
    Solo(Direction),
    /// One minus the shares of the sibling edges.
    FillRemaining(Direction),
    /// The edge is the only one of its carrier on the `to` node, so it
    /// carries all of that node's demand.
    InferFromChild(Direction),
    /// The known demand of the edge, divided by the output of the `from`
    /// node.
    FromDemand(Direction),
}

const FORWARD_STRATEGIES: &[EdgeShare] = &[
    EdgeShare::Solo(Direction::Forward),
    EdgeShare::FillRemaining(Direction::Forward),
    EdgeShare::InferFromChild(Direction::Forward),
    EdgeShare::FromDemand(Direction::Forward),
];

const REVERSED_STRATEGIES: &[EdgeShare] = &[
    EdgeShare::Solo(Direction::Reversed),
    EdgeShare::FillRemaining(Direction::Reversed),
    EdgeShare::InferFromChild(Direction::Reversed),
    EdgeShare::FromDemand(Direction::Reversed),
];

/// Returns the share strategies for the given direction, in the order in
/// which they are tried.
pub(crate) fn edge_share_strategies(direction: Direction) -> &'static [EdgeShare] {
    match direction {
        Direction::Forward => FORWARD_STRATEGIES,
        Direction::Reversed => REVERSED_STRATEGIES,
    }
}

/// The share of an edge at the `from` node of the given direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ShareTarget {
    pub(crate) edge: EdgeId,
    pub(crate) direction: Direction,
}

impl EdgeShare {
    fn direction(self) -> Direction {
        match self {
            EdgeShare::Solo(d)
            | EdgeShare::FillRemaining(d)
            | EdgeShare::InferFromChild(d)
            | EdgeShare::FromDemand(d) => d,
        }
    }

    fn resolve(self, graph: &EnergyGraph, edge: EdgeId) -> Option<Rational> {
        let d = self.direction();
        let edge_ref = &graph.graph[edge];
        let (from, to, carrier) = (d.from(edge_ref), d.to(edge_ref), &edge_ref.carrier);

        match self {
            EdgeShare::Solo(_) => {
                (d.out_edges(graph, from, Some(carrier)) == [edge]).then(Rational::one)
            }
            EdgeShare::FillRemaining(_) => {
                let shares = d
                    .out_edges(graph, from, Some(carrier))
                    .into_iter()
                    .filter(|sibling| *sibling != edge)
                    .map(|sibling| d.parent_share(graph, sibling))
                    .collect::<Option<Vec<_>>>()?;
                Some(Rational::one() - rational::sum(&shares))
            }
            EdgeShare::InferFromChild(_) => {
                if d.in_edges(graph, to, Some(carrier)) != [edge] {
                    return None;
                }
                let demand = d.demand_for(graph, to, carrier)?;
                let output = d.output_of(graph, from, carrier).filter(|o| !o.is_zero())?;
                Some(demand / output)
            }
            EdgeShare::FromDemand(_) => {
                let demand = edge_ref.demand.as_ref()?;
                let output = d.output_of(graph, from, carrier).filter(|o| !o.is_zero())?;
                Some(demand / output)
            }
        }
    }
}

impl Strategy for EdgeShare {
    type Target = ShareTarget;

    fn calculable(&self, graph: &EnergyGraph, target: ShareTarget) -> bool {
        self.resolve(graph, target.edge).is_some()
    }

    fn calculate(&self, graph: &EnergyGraph, target: ShareTarget) -> Result<Rational, Error> {
        self.resolve(graph, target.edge).ok_or_else(|| {
            Error::internal(format!(
                "{self} is not applicable to the {}.",
                target.describe(graph)
            ))
        })
    }
}

impl Target for ShareTarget {
    type Strategy = EdgeShare;

    fn is_calculated(self, graph: &EnergyGraph) -> bool {
        graph.graph[self.edge]
            .stored_share(self.direction.out_side())
            .is_some()
    }

    fn store(self, graph: &mut EnergyGraph, value: Rational, calculation: Calculation<EdgeShare>) {
        graph.graph[self.edge].set_share(self.direction.out_side(), value, calculation);
    }

    fn describe(self, graph: &EnergyGraph) -> String {
        let share = match self.direction {
            Direction::Forward => "parent share",
            Direction::Reversed => "child share",
        };
        format!("{share} of {}", graph.describe(Element::Edge(self.edge)))
    }
}

impl Display for EdgeShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeShare::Solo(d) => write!(f, "Solo({d})"),
            EdgeShare::FillRemaining(d) => write!(f, "FillRemaining({d})"),
            EdgeShare::InferFromChild(d) => write!(f, "InferFromChild({d})"),
            EdgeShare::FromDemand(d) => write!(f, "FromDemand({d})"),
        }
    }
}
