// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The solver, which drives all calculators of a graph to a fixed point.
//!
//! Solving happens in two relaxation phases.  The first one propagates edge
//! shares as far as possible, and is allowed to stall.  The second one
//! calculates the demands of all nodes and edges, and fails if it stalls
//! before everything is known.
//!
//! In both phases, every remaining calculator is tried once per pass, and
//! values calculated earlier in a pass are visible to later calculators in
//! the same pass.

use crate::{edge_type::EdgeTypePredicates, Element, EnergyGraph, Error};

use super::{
    calculator::{Calculate, Calculation, Calculator},
    strategies::{
        edge_demand_strategies, edge_share_strategies, ShareTarget, NODE_DEMAND_STRATEGIES,
    },
    Direction,
};

type Calculators = Vec<Box<dyn Calculate>>;

/// Keeps the global calculation order across both phases.
struct Solver {
    order: usize,
}

impl Solver {
    /// Runs passes over the calculators until a pass makes no progress, and
    /// returns the calculators that are left.
    fn relax(
        &mut self,
        graph: &mut EnergyGraph,
        phase: &str,
        mut remaining: Calculators,
    ) -> Result<Calculators, Error> {
        let mut pass = 0;
        while !remaining.is_empty() {
            pass += 1;
            let before = remaining.len();

            let mut pending = Vec::with_capacity(before);
            for calculator in remaining {
                if !calculator.calculate(graph, &mut self.order)? {
                    pending.push(calculator);
                }
            }
            remaining = pending;

            tracing::debug!(
                "{phase} pass {pass}: calculated {}, {} remaining.",
                before - remaining.len(),
                remaining.len()
            );
            if remaining.len() == before {
                break;
            }
        }

        Ok(remaining)
    }
}

/// Solving.
impl EnergyGraph {
    /// Calculates the demand of every node and edge that is not known yet.
    ///
    /// Unless disabled through
    /// [`skip_share_propagation`][crate::EnergyGraphConfig::skip_share_propagation],
    /// the shares of the edges are propagated first.  Values that are already
    /// known are never changed, so solving an already solved graph is a
    /// no-op.
    ///
    /// Returns an [`IncalculableGraph`][crate::ErrorKind::IncalculableGraph]
    /// error naming every element whose demand couldn't be calculated, and
    /// passes on the errors of failing strategies, annotated with the element
    /// and the strategy.
    pub fn solve(&mut self) -> Result<(), Error> {
        let demands = self.demand_calculators();
        if demands.is_empty() {
            tracing::debug!("All demands are known, nothing to solve.");
            return Ok(());
        }

        let mut solver = Solver {
            order: self.next_order(),
        };

        if self.config.skip_share_propagation {
            tracing::debug!("Skipping share propagation.");
        } else {
            let shares = self.share_calculators();
            let shares = solver.relax(self, "Share", shares)?;
            if !shares.is_empty() {
                tracing::debug!("{} edge shares remain unknown.", shares.len());
            }
        }

        let remaining = solver.relax(self, "Demand", demands)?;
        if remaining.is_empty() {
            tracing::debug!("Solved energy graph in {} steps.", solver.order);
            return Ok(());
        }

        let elements = remaining
            .iter()
            .map(|calculator| calculator.describe(self))
            .collect::<Vec<_>>();
        tracing::warn!("Solver stalled with {} elements left.", elements.len());

        Err(Error::incalculable_graph(format!(
            "Can't calculate the demand of: {}.",
            elements.join(", ")
        )))
    }

    /// Returns calculators for the unknown demands, deepest elements first.
    fn demand_calculators(&self) -> Calculators {
        self.elements_deepest_first()
            .into_iter()
            .map(|element| -> Box<dyn Calculate> {
                match element {
                    Element::Node(node) => Box::new(Calculator::new(node, NODE_DEMAND_STRATEGIES)),
                    Element::Edge(edge) => Box::new(Calculator::new(
                        edge,
                        edge_demand_strategies(&self.graph[edge]),
                    )),
                }
            })
            .filter(|calculator| !calculator.is_calculated(self))
            .collect()
    }

    /// Returns calculators for the unknown shares of all edges, except for
    /// the overflow edges.
    fn share_calculators(&self) -> Calculators {
        self.graph
            .edge_indices()
            .filter(|edge| !self.graph[*edge].is_overflow())
            .flat_map(|edge| {
                [Direction::Forward, Direction::Reversed].map(|direction| -> Box<dyn Calculate> {
                    Box::new(Calculator::new(
                        ShareTarget { edge, direction },
                        edge_share_strategies(direction),
                    ))
                })
            })
            .filter(|calculator| !calculator.is_calculated(self))
            .collect()
    }

    /// Returns the step after the last one recorded in the graph.
    fn next_order(&self) -> usize {
        let nodes = self
            .graph
            .node_weights()
            .filter_map(|node| node.calculation.as_ref().map(Calculation::order));
        let edges = self.graph.edge_weights().flat_map(|edge| {
            [
                edge.calculation.as_ref().map(Calculation::order),
                edge.child_share_calculation.as_ref().map(Calculation::order),
                edge.parent_share_calculation.as_ref().map(Calculation::order),
            ]
            .into_iter()
            .flatten()
        });
        nodes.chain(edges).max().map_or(0, |order| order + 1)
    }
}
