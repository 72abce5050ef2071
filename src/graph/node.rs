// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The nodes of an [`EnergyGraph`], and the demand accessors derived from
//! their slots.

use crate::{rational::Rational, Carrier, EnergyGraph, Side};

use super::{slot::Slots, Calculation, NodeDemand, NodeId};

/// A point in the energy network that converts or consumes energy.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) key: String,
    pub(crate) demand: Option<Rational>,
    pub(crate) max_demand: Option<Rational>,
    pub(crate) slots_in: Slots,
    pub(crate) slots_out: Slots,
    pub(crate) calculation: Option<Calculation<NodeDemand>>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        key: String,
        demand: Option<Rational>,
        max_demand: Option<Rational>,
    ) -> Self {
        Self {
            id,
            key,
            demand,
            max_demand,
            slots_in: Slots::new(Side::In),
            slots_out: Slots::new(Side::Out),
            calculation: None,
        }
    }

    /// Returns the id of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the key of the node.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the demand of the node, if it is known.
    pub fn demand(&self) -> Option<&Rational> {
        self.demand.as_ref()
    }

    /// Returns the upper bound on the demand of the node, if there is one.
    pub fn max_demand(&self) -> Option<&Rational> {
        self.max_demand.as_ref()
    }

    /// Returns the slots on the given side of the node.
    pub fn slots(&self, side: Side) -> &Slots {
        match side {
            Side::In => &self.slots_in,
            Side::Out => &self.slots_out,
        }
    }

    pub(crate) fn slots_mut(&mut self, side: Side) -> &mut Slots {
        match side {
            Side::In => &mut self.slots_in,
            Side::Out => &mut self.slots_out,
        }
    }

    /// Returns how the demand of the node was calculated, if it was calculated
    /// by the solver.
    pub fn calculation(&self) -> Option<&Calculation<NodeDemand>> {
        self.calculation.as_ref()
    }
}

/// Demand accessors for nodes.
impl EnergyGraph {
    /// Returns the demand of the given node for the given carrier, which is
    /// the node demand multiplied with the share of the carrier's in-slot.
    pub fn demand_for(&self, node: NodeId, carrier: &Carrier) -> Option<Rational> {
        self.carrier_demand(node, Side::In, carrier)
    }

    /// Returns the output of the given node in the given carrier, which is the
    /// node demand multiplied with the share of the carrier's out-slot.
    pub fn output_of(&self, node: NodeId, carrier: &Carrier) -> Option<Rational> {
        self.carrier_demand(node, Side::Out, carrier)
    }

    pub(crate) fn carrier_demand(
        &self,
        node: NodeId,
        side: Side,
        carrier: &Carrier,
    ) -> Option<Rational> {
        let demand = self.graph[node].demand.as_ref()?;
        let share = self.slot_share(node, side, carrier)?;
        Some(demand * share)
    }
}
