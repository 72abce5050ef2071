// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the definitions of nodes and edges that an
//! [`EnergyGraph`][crate::EnergyGraph] is created from.
//!
//! They carry everything that is known about the network before solving:
//! explicit demands, shares, max demands, priorities and edge types.

use crate::{rational::Rational, Carrier, EdgeType, Side};

/**
The definition of a node.

Read more about how the graph is created [here][crate#creating-a-graph].

<details>
<summary>Example definition of a power plant with a fixed efficiency:</summary>

```
use frequenz_energy_flow_graph::{rational, NodeDef, Side};

# fn main() -> Result<(), frequenz_energy_flow_graph::Error> {
let plant = NodeDef::new("gas_power_plant")
    .with_max_demand(rational::from_f64(1000.0)?)
    .with_slot_share(Side::Out, "electricity", rational::from_f64(0.45)?)
    .with_slot_share(Side::Out, "loss", rational::from_f64(0.55)?);
# Ok(())
# }
```

</details>
*/
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDef {
    /// The unique key of the node.
    pub key: String,
    /// The demand of the node, if it is known up front.
    pub demand: Option<Rational>,
    /// An upper bound on the demand of the node.
    pub max_demand: Option<Rational>,
    /// Explicit shares of the node's slots.
    pub slot_shares: Vec<(Side, Carrier, Rational)>,
}

impl NodeDef {
    /// Creates a new node definition with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            demand: None,
            max_demand: None,
            slot_shares: vec![],
        }
    }

    /// Sets the known demand of the node.
    pub fn with_demand(mut self, demand: Rational) -> Self {
        self.demand = Some(demand);
        self
    }

    /// Sets the max demand of the node.
    pub fn with_max_demand(mut self, max_demand: Rational) -> Self {
        self.max_demand = Some(max_demand);
        self
    }

    /// Sets the share of the slot for the given carrier on the given side.
    pub fn with_slot_share(
        mut self,
        side: Side,
        carrier: impl Into<Carrier>,
        share: Rational,
    ) -> Self {
        self.slot_shares.push((side, carrier.into(), share));
        self
    }
}

/**
The definition of an edge.

<details>
<summary>Example definition of a flexible edge with a priority:</summary>

```
use frequenz_energy_flow_graph::{EdgeDef, EdgeType};

let edge = EdgeDef::new("solar_panels", "households", "electricity")
    .with_type(EdgeType::Flexible)
    .with_priority(1);
```

</details>
*/
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDef {
    /// The key of the node the edge starts from.
    pub from: String,
    /// The key of the node the edge points to.
    pub to: String,
    /// The carrier of the edge.
    pub carrier: Carrier,
    /// The type of the edge.
    pub edge_type: EdgeType,
    /// The priority of a flexible edge.  Flexible edges with a higher priority
    /// are filled first.
    pub priority: Option<i64>,
    /// The demand of the edge, if it is known up front.
    pub demand: Option<Rational>,
    /// The fraction of the target's demand for the carrier that this edge
    /// supplies.
    pub share: Option<Rational>,
    /// The fraction of the source's output in the carrier that this edge
    /// drains, independent of the target's demand.  Also known as the output
    /// share.
    pub parent_share: Option<Rational>,
}

impl EdgeDef {
    /// Creates a new ordinary edge definition.
    pub fn new(from: impl Into<String>, to: impl Into<String>, carrier: impl Into<Carrier>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            carrier: carrier.into(),
            edge_type: EdgeType::Ordinary,
            priority: None,
            demand: None,
            share: None,
            parent_share: None,
        }
    }

    /// Sets the type of the edge.
    pub fn with_type(mut self, edge_type: EdgeType) -> Self {
        self.edge_type = edge_type;
        self
    }

    /// Sets the priority of a flexible edge.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the known demand of the edge.
    pub fn with_demand(mut self, demand: Rational) -> Self {
        self.demand = Some(demand);
        self
    }

    /// Sets the share of the target's demand that the edge supplies.
    pub fn with_share(mut self, share: Rational) -> Self {
        self.share = Some(share);
        self
    }

    /// Sets the share of the source's output that the edge drains.
    pub fn with_parent_share(mut self, parent_share: Rational) -> Self {
        self.parent_share = Some(parent_share);
        self
    }
}
