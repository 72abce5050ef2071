// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Slots aggregate all the edges of a single carrier on one side of a node.
//!
//! The share of a slot is the fraction of the node's demand that flows through
//! the slot.  It is either set explicitly when the graph is created, or derived
//! on first use:
//!
//!  - a slot that is the only one on its side has a share of one,
//!  - a slot whose siblings all have known shares gets the remainder,
//!  - otherwise the share is the slot demand divided by the node demand.
//!
//! Derived shares are cached once they are known.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use num_traits::{One, Zero};

use crate::{
    rational::{self, Rational},
    Carrier, EnergyGraph, Error, Side,
};

use super::{EdgeId, NodeId};

/// All edges of one carrier on one side of a node.
#[derive(Clone, Debug)]
pub struct Slot {
    carrier: Carrier,
    edges: Vec<EdgeId>,
    share: Option<Rational>,
    derived_share: OnceCell<Rational>,
}

impl Slot {
    fn new(carrier: Carrier) -> Self {
        Self {
            carrier,
            edges: vec![],
            share: None,
            derived_share: OnceCell::new(),
        }
    }

    /// Returns the carrier of the slot.
    pub fn carrier(&self) -> &Carrier {
        &self.carrier
    }

    /// Returns the edges that are members of the slot.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Returns the share of the slot, if it was set explicitly.
    pub fn explicit_share(&self) -> Option<&Rational> {
        self.share.as_ref()
    }

    /// Returns the explicit share, or the derived share if it was already
    /// calculated.
    pub(crate) fn known_share(&self) -> Option<&Rational> {
        self.share.as_ref().or_else(|| self.derived_share.get())
    }
}

/// The slots on one side of a node, keyed by carrier.
#[derive(Clone, Debug)]
pub struct Slots {
    side: Side,
    slots: BTreeMap<Carrier, Slot>,
}

impl Slots {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            slots: BTreeMap::new(),
        }
    }

    /// Returns the side of the node these slots are on.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns the slot for the given carrier, if there is one.
    pub fn get(&self, carrier: &Carrier) -> Option<&Slot> {
        self.slots.get(carrier)
    }

    /// Returns an iterator over the slots, ordered by carrier.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds an edge to the slot of the given carrier, creating the slot if
    /// necessary.
    pub(crate) fn add_edge(&mut self, carrier: &Carrier, edge: EdgeId) {
        self.slots
            .entry(carrier.clone())
            .or_insert_with(|| Slot::new(carrier.clone()))
            .edges
            .push(edge);
    }

    /// Sets the explicit share of the slot of the given carrier.
    pub(crate) fn set_share(
        &mut self,
        node_key: &str,
        carrier: &Carrier,
        share: Rational,
    ) -> Result<(), Error> {
        let side = self.side;
        let Some(slot) = self.slots.get_mut(carrier) else {
            return Err(Error::invalid_slot(format!(
                "Node {node_key} has a share for its {side}-slot {carrier}, but no {carrier} edges on that side."
            )));
        };
        if slot.share.is_some() {
            return Err(Error::invalid_slot(format!(
                "Duplicate {side}-slot share for carrier {carrier} on node {node_key}."
            )));
        }
        slot.share = Some(rational::clamp(share));
        Ok(())
    }

    /// Checks that at most one slot lacks an explicit share, when there are
    /// multiple slots.
    pub(crate) fn ensure_unambiguous(&self, node_key: &str) -> Result<(), Error> {
        if self.slots.len() < 2 {
            return Ok(());
        }
        let implicit = self
            .slots
            .values()
            .filter(|slot| slot.share.is_none())
            .map(|slot| slot.carrier.to_string())
            .collect::<Vec<_>>();
        if implicit.len() > 1 {
            return Err(Error::invalid_slot(format!(
                "Node {node_key} has multiple {}-slots without an explicit share: {}.",
                self.side,
                implicit.join(", ")
            )));
        }
        Ok(())
    }

    /// Checks that the explicit shares of the slots don't add up to more than
    /// one.
    pub(crate) fn ensure_shares_fit(&self, node_key: &str) -> Result<(), Error> {
        let total = rational::sum(self.slots.values().filter_map(|slot| slot.share.as_ref()));
        if total > Rational::one() {
            return Err(Error::invalid_slot(format!(
                "Node {node_key} has {}-slot shares adding up to {}, which is more than one.",
                self.side,
                rational::display(&total)
            )));
        }
        Ok(())
    }

    /// Returns true if the shares of the slots add up to one, so that the sum
    /// of all edge demands on this side is equal to the node demand.
    ///
    /// Implicit shares always fill up to one.
    pub(crate) fn conserves_energy(&self) -> bool {
        let mut explicit = vec![];
        for slot in self.slots.values() {
            match &slot.share {
                Some(share) => explicit.push(share),
                None => return true,
            }
        }
        rational::sum(explicit).is_one()
    }
}

/// Slot accessors.
impl EnergyGraph {
    /// Returns the share of the given node's slot, if it is known or can be
    /// derived.
    pub fn slot_share(&self, node: NodeId, side: Side, carrier: &Carrier) -> Option<Rational> {
        let slots = self.graph[node].slots(side);
        let slot = slots.get(carrier)?;
        if let Some(share) = slot.known_share() {
            return Some(share.clone());
        }

        let share = self.derive_slot_share(node, slots, slot)?;
        let _ = slot.derived_share.set(share.clone());
        Some(share)
    }

    /// Returns the sum of the demands of the edges in the given node's slot,
    /// once all of them are known.
    pub fn slot_demand(&self, node: NodeId, side: Side, carrier: &Carrier) -> Option<Rational> {
        let slot = self.graph[node].slots(side).get(carrier)?;
        self.sum_of_edges(slot.edges())
    }

    /// Returns the sum of the demands of the given edges, if all of them are
    /// known.
    pub(crate) fn sum_of_edges(&self, edges: &[EdgeId]) -> Option<Rational> {
        edges
            .iter()
            .map(|edge| self.graph[*edge].demand.as_ref())
            .collect::<Option<Vec<_>>>()
            .map(rational::sum)
    }

    fn derive_slot_share(&self, node: NodeId, slots: &Slots, slot: &Slot) -> Option<Rational> {
        if slots.len() == 1 {
            return Some(Rational::one());
        }

        let sibling_shares = slots
            .iter()
            .filter(|sibling| sibling.carrier != slot.carrier)
            .map(|sibling| sibling.known_share())
            .collect::<Option<Vec<_>>>();
        if let Some(sibling_shares) = sibling_shares {
            return Some(rational::clamp(Rational::one() - rational::sum(sibling_shares)));
        }

        let demand = self.graph[node].demand.as_ref()?;
        let slot_demand = self.sum_of_edges(slot.edges())?;
        if demand.is_zero() {
            return Some(Rational::zero());
        }
        Some(slot_demand / demand)
    }
}
