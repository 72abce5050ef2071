// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the value types that describe how energy moves through
//! an `EnergyGraph`: the `Carrier` of an edge, the `EdgeType`, and the `Side`
//! of a node an edge is attached to.

use std::fmt::Display;

/// The energy type carried by an edge, like `electricity` or `gas`.
///
/// Parallel edges between the same two nodes are distinguished by their
/// carrier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Carrier(String);

impl Carrier {
    /// Creates a new carrier with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Carrier(name.into())
    }

    /// Returns the name of the carrier.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Carrier {
    fn from(name: &str) -> Self {
        Carrier::new(name)
    }
}

impl From<String> for Carrier {
    fn from(name: String) -> Self {
        Carrier(name)
    }
}

impl Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the type of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeType {
    /// A regular edge.
    #[default]
    Ordinary,
    /// An edge that absorbs whatever demand remains unaccounted for by its
    /// siblings, optionally rationed by priority and a max demand.
    Flexible,
    /// An edge that points against the nominal direction of the graph, and
    /// drains a node's surplus supply once its primary path is saturated.
    Overflow,
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeType::Ordinary => write!(f, "Ordinary"),
            EdgeType::Flexible => write!(f, "Flexible"),
            EdgeType::Overflow => write!(f, "Overflow"),
        }
    }
}

/// Represents the side of a node that an edge is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    /// The incoming side, with edges coming from parents.
    In,
    /// The outgoing side, with edges going to children.
    Out,
}

impl Side {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            Side::In => Side::Out,
            Side::Out => Side::In,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::In => write!(f, "in"),
            Side::Out => write!(f, "out"),
        }
    }
}

/// Predicates for checking the type of an edge.
pub(crate) trait EdgeTypePredicates {
    fn edge_type(&self) -> EdgeType;

    fn is_flexible(&self) -> bool {
        self.edge_type() == EdgeType::Flexible
    }

    fn is_overflow(&self) -> bool {
        self.edge_type() == EdgeType::Overflow
    }
}

impl EdgeTypePredicates for EdgeType {
    fn edge_type(&self) -> EdgeType {
        *self
    }
}
