// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Frequenz Energy Flow Graph

This is a library for inferring the energy flows in an energy network, which is
represented as a directed graph of nodes that convert or consume energy, and
edges that carry a single energy carrier, like `gas` or `electricity`, between
them.

Usually only a few of the flows in such a network are known, like the final
demand of some consumers, or the efficiency of a power plant.  The
[`solve`][EnergyGraph::solve] method derives every other flow that follows from
them.

## Creating a graph

An [`EnergyGraph`] is created by passing the [`NodeDef`]s and [`EdgeDef`]s of
the network to the [`try_new`][EnergyGraph::try_new] method, along with an
[`EnergyGraphConfig`].

Edges of the same carrier on the same side of a node form a [`Slot`].  The
share of a slot is the fraction of the node's demand that flows through it,
and can be set explicitly through [`NodeDef::with_slot_share`].  When a node
has a single slot on a side, its share defaults to one, and when only one of
the slots on a side has no explicit share, that slot gets the rest.

```
use frequenz_energy_flow_graph::{
    rational, EdgeDef, EnergyGraph, EnergyGraphConfig, NodeDef, Side,
};

# fn main() -> Result<(), frequenz_energy_flow_graph::Error> {
let mut graph = EnergyGraph::try_new(
    [
        NodeDef::new("gas_grid").with_demand(rational::from_f64(50.0)?),
        NodeDef::new("power_plant")
            .with_slot_share(Side::Out, "electricity", rational::from_f64(0.6)?),
        NodeDef::new("households"),
    ],
    [
        EdgeDef::new("gas_grid", "power_plant", "gas"),
        EdgeDef::new("power_plant", "households", "electricity"),
    ],
    EnergyGraphConfig::default(),
)?;

graph.solve()?;
graph.validate()?;

assert_eq!(
    graph.node("households")?.demand(),
    Some(&rational::from_integer(30))
);
# Ok(())
# }
```

The method checks that:

- Node keys are unique.
- All edges point to existing nodes, and no node is connected to itself.
- There is at most one edge per carrier between two nodes.
- Only flexible edges have a priority.
- Slot shares refer to existing slots, and are set only once.
- The explicit shares of the slots on a side of a node, and the explicit
  shares of the edges in a slot, don't add up to more than one.
- Unless [`allow_implicit_slot_shares`][EnergyGraphConfig::allow_implicit_slot_shares]
  is set, at most one slot per side of a node has no explicit share.

## Solving

Demands and shares are exact [rational numbers][rational::Rational], and
every value that is written to the graph is floored at zero.

The solver repeatedly applies the first applicable strategy to every unknown
value, until all values are known, or until a full pass over the remaining
values makes no progress, in which case an
[`IncalculableGraph`][ErrorKind::IncalculableGraph] error names the values
that couldn't be calculated.  The strategy that calculated a value, and the
step at which it happened, are available through
[`Node::calculation`] and [`Edge::calculation`].

## Validation

The [`validate`][EnergyGraph::validate] method checks that every node and edge
has a demand, that no node exceeds its max demand, and that the demands of the
edges in every slot add up to the node's demand multiplied by the share of the
slot.  All [`Violation`]s can be inspected individually through
[`violations`][EnergyGraph::violations].
*/

mod config;
pub use config::EnergyGraphConfig;

mod definitions;
pub use definitions::{EdgeDef, NodeDef};

mod edge_type;
pub use edge_type::{Carrier, EdgeType, Side};

pub mod rational;

mod graph;
pub use graph::{
    iterators, Calculation, Direction, Edge, EdgeDemand, EdgeId, EdgeShare, Element,
    EnergyGraph, Node, NodeDemand, NodeId, Slot, Slots, Violation,
};

mod error;
pub use error::{Error, ErrorKind};
