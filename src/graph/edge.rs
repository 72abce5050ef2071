// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The edges of an [`EnergyGraph`], and the share accessors derived from
//! their demands.

use num_traits::Zero;

use crate::{
    edge_type::EdgeTypePredicates, rational::Rational, Carrier, EdgeType, EnergyGraph, Side,
};

use super::{Calculation, EdgeDemand, EdgeId, EdgeShare, NodeId};

/// A connection that carries a single energy carrier from one node to another.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) carrier: Carrier,
    pub(crate) edge_type: EdgeType,
    pub(crate) priority: Option<i64>,
    pub(crate) demand: Option<Rational>,
    pub(crate) child_share: Option<Rational>,
    pub(crate) parent_share: Option<Rational>,
    pub(crate) calculation: Option<Calculation<EdgeDemand>>,
    pub(crate) child_share_calculation: Option<Calculation<EdgeShare>>,
    pub(crate) parent_share_calculation: Option<Calculation<EdgeShare>>,
}

impl Edge {
    /// Returns the id of the edge.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Returns the id of the node the edge starts from.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the id of the node the edge points to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the carrier of the edge.
    pub fn carrier(&self) -> &Carrier {
        &self.carrier
    }

    /// Returns the type of the edge.
    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    /// Returns the priority of a flexible edge, if it has one.
    pub fn priority(&self) -> Option<i64> {
        self.priority
    }

    /// Returns the demand of the edge, if it is known.
    pub fn demand(&self) -> Option<&Rational> {
        self.demand.as_ref()
    }

    /// Returns how the demand of the edge was calculated, if it was calculated
    /// by the solver.
    pub fn calculation(&self) -> Option<&Calculation<EdgeDemand>> {
        self.calculation.as_ref()
    }

    /// Returns how the child share of the edge was propagated, if it was
    /// propagated by the solver.
    pub fn child_share_calculation(&self) -> Option<&Calculation<EdgeShare>> {
        self.child_share_calculation.as_ref()
    }

    /// Returns how the parent share of the edge was propagated, if it was
    /// propagated by the solver.
    pub fn parent_share_calculation(&self) -> Option<&Calculation<EdgeShare>> {
        self.parent_share_calculation.as_ref()
    }

    /// Returns the node the edge is attached to on the given side.
    ///
    /// The edge is attached to the out-side of its source, and to the in-side
    /// of its target.
    pub(crate) fn node_at(&self, side: Side) -> NodeId {
        match side {
            Side::Out => self.source,
            Side::In => self.target,
        }
    }

    /// Returns the share that was set or propagated for the given side.
    pub(crate) fn stored_share(&self, side: Side) -> Option<&Rational> {
        match side {
            Side::Out => self.parent_share.as_ref(),
            Side::In => self.child_share.as_ref(),
        }
    }

    /// Stores a propagated share for the given side, along with how it was
    /// calculated.
    pub(crate) fn set_share(
        &mut self,
        side: Side,
        share: Rational,
        calculation: Calculation<EdgeShare>,
    ) {
        match side {
            Side::Out => {
                self.parent_share = Some(share);
                self.parent_share_calculation = Some(calculation);
            }
            Side::In => {
                self.child_share = Some(share);
                self.child_share_calculation = Some(calculation);
            }
        }
    }
}

impl EdgeTypePredicates for Edge {
    fn edge_type(&self) -> EdgeType {
        self.edge_type
    }
}

/// Share accessors for edges.
impl EnergyGraph {
    /// Returns the fraction of the target's demand for the edge's carrier that
    /// is supplied by the given edge.
    pub fn child_share(&self, edge: EdgeId) -> Option<Rational> {
        self.edge_share(edge, Side::In)
    }

    /// Returns the fraction of the source's output in the edge's carrier that
    /// flows through the given edge.
    pub fn parent_share(&self, edge: EdgeId) -> Option<Rational> {
        self.edge_share(edge, Side::Out)
    }

    /// Returns the upper bound on the demand of the given edge, derived from
    /// the max demand of its source and the share of the source's out-slot.
    pub fn edge_max_demand(&self, edge: EdgeId) -> Option<Rational> {
        let edge = &self.graph[edge];
        let max_demand = self.graph[edge.source].max_demand.as_ref()?;
        let share = self.slot_share(edge.source, Side::Out, &edge.carrier)?;
        Some(max_demand * share)
    }

    /// Returns the share of the edge, relative to the slot it is a member of
    /// on the given side.
    ///
    /// A stored share takes precedence, otherwise the share is derived from
    /// the demand of the edge and the demand of the slot's node.
    pub(crate) fn edge_share(&self, edge: EdgeId, side: Side) -> Option<Rational> {
        let edge = &self.graph[edge];
        if let Some(share) = edge.stored_share(side) {
            return Some(share.clone());
        }
        let demand = edge.demand.as_ref()?;
        let total = self.carrier_demand(edge.node_at(side), side, &edge.carrier)?;
        if total.is_zero() {
            return None;
        }
        Some(demand / total)
    }
}
