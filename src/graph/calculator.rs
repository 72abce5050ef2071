// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Calculators pick the first applicable strategy for a single value in the
//! graph and write the result back.
//!
//! A value moves from uncalculated to calculated exactly once.  Checking
//! whether a strategy is applicable has no side effects, so it can be repeated
//! on every pass of the solver.

use std::fmt::Display;

use num_traits::Signed;

use crate::{rational, rational::Rational, EnergyGraph, Error};

/// A rule that can calculate a single value of a target in the graph, once
/// enough of the neighboring values are known.
pub(crate) trait Strategy: Copy + Display + 'static {
    type Target: Copy;

    /// Returns true if the value can be calculated with the values that are
    /// currently known.
    fn calculable(&self, graph: &EnergyGraph, target: Self::Target) -> bool;

    /// Calculates the value.
    fn calculate(&self, graph: &EnergyGraph, target: Self::Target) -> Result<Rational, Error>;
}

/// A value in the graph that can be calculated by strategies.
pub(crate) trait Target: Copy + 'static {
    type Strategy: Strategy<Target = Self>;

    /// Returns true if the value is already known.
    fn is_calculated(self, graph: &EnergyGraph) -> bool;

    /// Writes the calculated value to the graph.
    fn store(self, graph: &mut EnergyGraph, value: Rational, calculation: Calculation<Self::Strategy>);

    /// Returns a human readable name for the value.
    fn describe(self, graph: &EnergyGraph) -> String;
}

/// Records how a value was calculated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calculation<S> {
    strategy: S,
    order: usize,
}

impl<S: Copy> Calculation<S> {
    /// Returns the strategy that calculated the value.
    pub fn strategy(&self) -> S {
        self.strategy
    }

    /// Returns the global step at which the value was calculated.
    pub fn order(&self) -> usize {
        self.order
    }
}

/// A type-erased calculator, as used by the solver.
pub(crate) trait Calculate {
    /// Calculates the value with the first applicable strategy.
    ///
    /// Returns `Ok(false)` if no strategy is applicable yet, and `Ok(true)`
    /// once the value is known.
    fn calculate(&self, graph: &mut EnergyGraph, order: &mut usize) -> Result<bool, Error>;

    /// Returns a human readable name for the value being calculated.
    fn describe(&self, graph: &EnergyGraph) -> String;

    /// Returns true if the value is already known.
    fn is_calculated(&self, graph: &EnergyGraph) -> bool;
}

/// Calculates a single target with an ordered list of strategies.
pub(crate) struct Calculator<T: Target> {
    target: T,
    strategies: &'static [T::Strategy],
}

impl<T: Target> Calculator<T> {
    pub(crate) fn new(target: T, strategies: &'static [T::Strategy]) -> Self {
        Self { target, strategies }
    }

    /// Returns the first strategy that can calculate the target.
    pub(crate) fn strategy(&self, graph: &EnergyGraph) -> Option<T::Strategy> {
        self.strategies
            .iter()
            .copied()
            .find(|strategy| strategy.calculable(graph, self.target))
    }
}

impl<T: Target> Calculate for Calculator<T> {
    fn calculate(&self, graph: &mut EnergyGraph, order: &mut usize) -> Result<bool, Error> {
        if self.target.is_calculated(graph) {
            return Ok(true);
        }
        let Some(strategy) = self.strategy(graph) else {
            return Ok(false);
        };

        let value = strategy
            .calculate(graph, self.target)
            .map_err(|err| err.annotate(format!("{} ({strategy})", self.describe(graph))))?;
        if value.is_negative() {
            tracing::warn!(
                "{} ({strategy}) came out negative ({}), flooring it to zero.",
                self.describe(graph),
                rational::display(&value)
            );
        }
        let value = rational::clamp(value);

        tracing::debug!(
            "Calculated {} = {} with {} at step {}.",
            self.describe(graph),
            rational::display(&value),
            strategy,
            order
        );

        self.target.store(
            graph,
            value,
            Calculation {
                strategy,
                order: *order,
            },
        );
        *order += 1;

        Ok(true)
    }

    fn describe(&self, graph: &EnergyGraph) -> String {
        self.target.describe(graph)
    }

    fn is_calculated(&self, graph: &EnergyGraph) -> bool {
        self.target.is_calculated(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::GraphBuilder;
    use crate::graph::NodeDemand;
    use crate::rational::from_integer;
    use crate::Side;

    #[test]
    fn test_calculator_is_idempotent() -> Result<(), Error> {
        let mut graph = GraphBuilder::new()
            .node("a")
            .node("b")
            .edge_with_demand("a", "b", "gas", 10.0)
            .build()?;
        let a = graph.node_id("a")?;
        let calculator = Calculator::new(a, crate::graph::strategies::NODE_DEMAND_STRATEGIES);

        assert_eq!(
            calculator.strategy(&graph),
            Some(NodeDemand::FromEdges(Side::Out))
        );

        let mut order = 7;
        assert!(calculator.calculate(&mut graph, &mut order)?);
        assert_eq!(order, 8);
        assert_eq!(graph.node("a")?.demand(), Some(&from_integer(10)));
        assert_eq!(
            graph.node("a")?.calculation().map(|c| (c.strategy(), c.order())),
            Some((NodeDemand::FromEdges(Side::Out), 7))
        );

        // Calculating again doesn't change anything.
        assert!(calculator.calculate(&mut graph, &mut order)?);
        assert_eq!(order, 8);
        assert_eq!(
            graph.node("a")?.calculation().map(|c| c.order()),
            Some(7)
        );

        Ok(())
    }

    #[test]
    fn test_calculator_waits_for_neighbors() -> Result<(), Error> {
        let mut graph = GraphBuilder::new()
            .node("a")
            .node("b")
            .edge("a", "b", "gas")
            .build()?;
        let a = graph.node_id("a")?;
        let calculator = Calculator::new(a, crate::graph::strategies::NODE_DEMAND_STRATEGIES);

        let mut order = 0;
        assert!(!calculator.calculate(&mut graph, &mut order)?);
        assert!(!calculator.is_calculated(&graph));
        assert_eq!(order, 0);
        assert_eq!(calculator.describe(&graph), "node a");

        Ok(())
    }
}
