// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for validating a solved [`EnergyGraph`].
//!
//! Validation is independent of the solver: it only looks at the demands and
//! shares stored in the graph, and collects every violation it finds instead
//! of stopping at the first one.

mod validate_nodes;
mod validate_slots;

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::{rational, rational::Rational, Carrier, Element, EnergyGraph, Error, Side};

/// A problem found while validating an [`EnergyGraph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The demand of a node is unknown.
    MissingDemand,
    /// The demand of a node is larger than its max demand.
    ExceedsMaxDemand {
        /// The demand of the node.
        demand: Rational,
        /// The max demand of the node.
        max_demand: Rational,
    },
    /// The demand of an edge is unknown.
    MissingEdgeDemand,
    /// The share of a slot can't be determined.
    ///
    /// Slots are only compared once the demands of the node and of all the
    /// slot's edges are known, and a share can always be derived from those.
    /// So this is not reported for graphs created through
    /// [`EnergyGraph::try_new`][crate::EnergyGraph::try_new].
    UndeterminedSlotShare {
        /// The side of the node the slot is on.
        side: Side,
        /// The carrier of the slot.
        carrier: Carrier,
    },
    /// The demands of the edges in a slot don't add up to the share of the
    /// node's demand that the slot should carry.
    Unbalanced {
        /// The side of the node the slot is on.
        side: Side,
        /// The carrier of the slot.
        carrier: Carrier,
        /// The demand of the node, multiplied by the share of the slot.
        expected: Rational,
        /// The sum of the demands of the edges in the slot.
        actual: Rational,
    },
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::MissingDemand => write!(f, "demand is unknown"),
            Violation::ExceedsMaxDemand { demand, max_demand } => write!(
                f,
                "demand {} exceeds max demand {}",
                rational::display(demand),
                rational::display(max_demand)
            ),
            Violation::MissingEdgeDemand => write!(f, "edge demand is unknown"),
            Violation::UndeterminedSlotShare { side, carrier } => {
                write!(f, "share of {side}-slot {carrier} is unknown")
            }
            Violation::Unbalanced {
                side,
                carrier,
                expected,
                actual,
            } => write!(
                f,
                "{side}-slot {carrier} carries {}, expected {}",
                rational::display(actual),
                rational::display(expected)
            ),
        }
    }
}

pub(crate) struct EnergyGraphValidator<'a> {
    graph: &'a EnergyGraph,
    violations: BTreeMap<Element, Vec<Violation>>,
}

impl EnergyGraphValidator<'_> {
    fn report(&mut self, element: Element, violation: Violation) {
        tracing::debug!("{}: {}", self.graph.describe(element), violation);
        self.violations.entry(element).or_default().push(violation);
    }
}

/// Validation.
impl EnergyGraph {
    /// Returns all violations found in the graph, grouped by the node or edge
    /// they were found on.
    ///
    /// The demands of the edges in every slot are compared against the
    /// node's demand multiplied by the share of the slot, with a relative
    /// tolerance of `1e-14`.
    pub fn violations(&self) -> BTreeMap<Element, Vec<Violation>> {
        let mut validator = EnergyGraphValidator {
            graph: self,
            violations: BTreeMap::new(),
        };
        validator.validate_nodes();
        validator.validate_edges();
        validator.validate_slots();
        validator.violations
    }

    /// Returns a [`ValidationFailed`][crate::ErrorKind::ValidationFailed]
    /// error listing all violations, if there are any.
    pub fn validate(&self) -> Result<(), Error> {
        let violations = self.violations();
        if violations.is_empty() {
            return Ok(());
        }

        let count = violations.values().map(Vec::len).sum::<usize>();
        let listed = violations
            .iter()
            .flat_map(|(element, violations)| {
                violations
                    .iter()
                    .map(move |violation| format!("{}: {violation}", self.describe(*element)))
            })
            .collect::<Vec<_>>();
        tracing::warn!("Energy graph has {count} violations.");

        Err(Error::validation_failed(format!(
            "Found {count} violations: {}.",
            listed.join("; ")
        )))
    }
}
