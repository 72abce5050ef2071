// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Checks that the demands of the edges in each slot match the node's demand.

use num_traits::{Signed, Zero};

use crate::{rational::Rational, Element, Side};

use super::{EnergyGraphValidator, Violation};

impl EnergyGraphValidator<'_> {
    /// Compares the demand of every complete slot against the demand of its
    /// node multiplied by the share of the slot.
    ///
    /// Slots with unknown edge demands, and slots of nodes with an unknown
    /// demand, are skipped, because those are already reported.
    pub(super) fn validate_slots(&mut self) {
        let tolerance = Rational::new(1.into(), num_traits::pow(10.into(), 14));

        let graph = self.graph;
        for node in graph.nodes() {
            let Some(demand) = node.demand() else {
                continue;
            };
            let element = Element::Node(node.id());

            for side in [Side::In, Side::Out] {
                for slot in node.slots(side).iter() {
                    let Some(actual) = graph.sum_of_edges(slot.edges()) else {
                        continue;
                    };
                    let carrier = slot.carrier().clone();
                    let Some(share) = graph.slot_share(node.id(), side, &carrier) else {
                        self.report(element, Violation::UndeterminedSlotShare { side, carrier });
                        continue;
                    };

                    let expected = demand * share;
                    let deviation = (&actual - &expected).abs();
                    let allowed = if expected.is_zero() {
                        tolerance.clone()
                    } else {
                        expected.abs() * &tolerance
                    };
                    if deviation > allowed {
                        self.report(
                            element,
                            Violation::Unbalanced {
                                side,
                                carrier,
                                expected,
                                actual,
                            },
                        );
                    }
                }
            }
        }
    }
}
