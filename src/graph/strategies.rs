// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The strategies that infer unknown demands and shares from the values that
//! are already known.
//!
//! Most edge strategies are written once, for values propagating from a parent
//! to its child, and are parametrized by a [`Direction`].  Registering them
//! with both directions lets the solver resolve an edge from either of its
//! ends.

mod direction;
mod edge_demand;
mod edge_share;
mod node_demand;

pub use direction::Direction;
pub use edge_demand::EdgeDemand;
pub use edge_share::EdgeShare;
pub use node_demand::NodeDemand;

pub(crate) use edge_demand::edge_demand_strategies;
pub(crate) use edge_share::{edge_share_strategies, ShareTarget};
pub(crate) use node_demand::NODE_DEMAND_STRATEGIES;
