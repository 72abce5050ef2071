// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for creating [`EnergyGraph`] instances from given node and edge
//! definitions.

use std::collections::HashSet;

use num_traits::One;
use petgraph::graph::DiGraph;

use crate::{
    edge_type::EdgeTypePredicates,
    rational::{self, Rational},
    EdgeDef, EnergyGraph, EnergyGraphConfig, Error, NodeDef, Side,
};

use super::{Edge, Node, NodeIndexMap};

/// `EnergyGraph` instantiation.
impl EnergyGraph {
    /// Creates a new [`EnergyGraph`] from the given node and edge definitions.
    ///
    /// Slots are created for every carrier on every side of a node that has
    /// edges, and the explicit slot shares from the node definitions are
    /// applied to them.
    ///
    /// Returns an error if the definitions don't describe a valid graph.
    pub fn try_new<NodeIterator, EdgeIterator>(
        nodes: NodeIterator,
        edges: EdgeIterator,
        config: EnergyGraphConfig,
    ) -> Result<Self, Error>
    where
        NodeIterator: IntoIterator<Item = NodeDef>,
        EdgeIterator: IntoIterator<Item = EdgeDef>,
    {
        let nodes = nodes.into_iter().collect::<Vec<_>>();
        let (graph, indices) = Self::create_graph(&nodes)?;

        let mut eg = Self {
            graph,
            node_indices: indices,
            config,
        };
        eg.add_edges(edges)?;
        eg.apply_slot_shares(&nodes)?;
        eg.check_edge_shares()?;

        tracing::debug!(
            "Created energy graph with {} nodes and {} edges.",
            eg.graph.node_count(),
            eg.graph.edge_count()
        );

        Ok(eg)
    }

    fn create_graph(nodes: &[NodeDef]) -> Result<(DiGraph<Node, Edge>, NodeIndexMap), Error> {
        let mut graph = DiGraph::new();
        let mut indices = NodeIndexMap::new();

        for def in nodes {
            if indices.contains_key(&def.key) {
                return Err(Error::invalid_graph(format!(
                    "Duplicate node key found: {}",
                    def.key
                )));
            }

            let idx = graph.add_node(Node::new(
                Default::default(),
                def.key.clone(),
                def.demand.clone().map(rational::clamp),
                def.max_demand.clone().map(rational::clamp),
            ));
            graph[idx].id = idx;
            indices.insert(def.key.clone(), idx);
        }

        Ok((graph, indices))
    }

    fn add_edges(&mut self, edges: impl IntoIterator<Item = EdgeDef>) -> Result<(), Error> {
        let mut seen = HashSet::new();

        for def in edges {
            let (from, to, carrier) = (&def.from, &def.to, &def.carrier);

            if from == to {
                return Err(Error::invalid_edge(format!(
                    "Edge:({from}, {to}, {carrier}) Can't connect a node to itself."
                )));
            }
            for key in [from, to] {
                if !self.node_indices.contains_key(key) {
                    return Err(Error::invalid_edge(format!(
                        "Edge:({from}, {to}, {carrier}) Can't find a node with key {key}"
                    )));
                }
            }
            if !seen.insert((from.clone(), to.clone(), carrier.clone())) {
                return Err(Error::invalid_edge(format!(
                    "Edge:({from}, {to}, {carrier}) Duplicate edge found."
                )));
            }
            if def.priority.is_some() && !def.edge_type.is_flexible() {
                return Err(Error::invalid_edge(format!(
                    "Edge:({from}, {to}, {carrier}) Only flexible edges can have a priority, found {} edge.",
                    def.edge_type
                )));
            }

            let source = self.node_indices[from];
            let target = self.node_indices[to];
            let idx = self.graph.add_edge(
                source,
                target,
                Edge {
                    id: Default::default(),
                    source,
                    target,
                    carrier: def.carrier.clone(),
                    edge_type: def.edge_type,
                    priority: def.priority,
                    demand: def.demand.map(rational::clamp),
                    child_share: def.share.map(rational::clamp),
                    parent_share: def.parent_share.map(rational::clamp),
                    calculation: None,
                    child_share_calculation: None,
                    parent_share_calculation: None,
                },
            );
            self.graph[idx].id = idx;
            self.graph[source]
                .slots_mut(Side::Out)
                .add_edge(&def.carrier, idx);
            self.graph[target]
                .slots_mut(Side::In)
                .add_edge(&def.carrier, idx);
        }

        Ok(())
    }

    fn apply_slot_shares(&mut self, nodes: &[NodeDef]) -> Result<(), Error> {
        for def in nodes {
            let idx = self.node_indices[&def.key];
            let node = &mut self.graph[idx];
            for (side, carrier, share) in &def.slot_shares {
                node.slots_mut(*side)
                    .set_share(&def.key, carrier, share.clone())?;
            }
            for side in [Side::In, Side::Out] {
                node.slots(side).ensure_shares_fit(&def.key)?;
            }

            if !self.config.allow_implicit_slot_shares {
                for side in [Side::In, Side::Out] {
                    node.slots(side).ensure_unambiguous(&def.key)?;
                }
            }
        }

        Ok(())
    }

    /// Checks that the explicit shares of the edges in each slot don't add up
    /// to more than one.  Parent shares are checked on out-slots, and child
    /// shares on in-slots.
    fn check_edge_shares(&self) -> Result<(), Error> {
        for node in self.graph.node_weights() {
            for side in [Side::In, Side::Out] {
                for slot in node.slots(side).iter() {
                    let total = rational::sum(
                        slot.edges()
                            .iter()
                            .filter_map(|edge| self.graph[*edge].stored_share(side)),
                    );
                    if total > Rational::one() {
                        return Err(Error::invalid_edge(format!(
                            "Edges of the {side}-slot {} of node {} have shares adding up to {}, which is more than one.",
                            slot.carrier(),
                            node.key(),
                            rational::display(&total)
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::{from_integer, ratio};
    use crate::EdgeType;

    fn nodes_and_edges() -> (Vec<NodeDef>, Vec<EdgeDef>) {
        let nodes = vec![
            NodeDef::new("power_plant").with_demand(from_integer(100)),
            NodeDef::new("hv_network"),
            NodeDef::new("households"),
            NodeDef::new("industry"),
        ];
        let edges = vec![
            EdgeDef::new("power_plant", "hv_network", "electricity"),
            EdgeDef::new("hv_network", "households", "electricity"),
            EdgeDef::new("hv_network", "industry", "electricity"),
        ];

        (nodes, edges)
    }

    #[test]
    fn test_node_validation() {
        let config = EnergyGraphConfig::default();
        let (mut nodes, edges) = nodes_and_edges();

        assert!(EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_ok());

        nodes.push(NodeDef::new("industry"));
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone())
                .is_err_and(|e| e == Error::invalid_graph("Duplicate node key found: industry"))
        );
    }

    #[test]
    fn test_edge_validation() {
        let config = EnergyGraphConfig::default();
        let (nodes, mut edges) = nodes_and_edges();

        edges.push(EdgeDef::new("industry", "industry", "gas"));
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_edge(
                    "Edge:(industry, industry, gas) Can't connect a node to itself."
                ))
        );

        edges.pop();
        edges.push(EdgeDef::new("industry", "export", "gas"));
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_edge(
                    "Edge:(industry, export, gas) Can't find a node with key export"
                ))
        );

        edges.pop();
        edges.push(EdgeDef::new("hv_network", "industry", "electricity"));
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_edge(
                    "Edge:(hv_network, industry, electricity) Duplicate edge found."
                ))
        );

        // A parallel edge with a different carrier is fine.
        edges.pop();
        edges.push(EdgeDef::new("hv_network", "industry", "heat"));
        assert!(EnergyGraph::try_new(
            nodes.clone(),
            edges.clone(),
            EnergyGraphConfig {
                allow_implicit_slot_shares: true,
                ..Default::default()
            }
        )
        .is_ok());

        edges.pop();
        edges.push(EdgeDef::new("households", "industry", "heat").with_priority(2));
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_edge(concat!(
                    "Edge:(households, industry, heat) Only flexible edges can have a ",
                    "priority, found Ordinary edge."
                )))
        );

        edges.pop();
        edges.push(
            EdgeDef::new("households", "industry", "heat")
                .with_type(EdgeType::Flexible)
                .with_priority(2),
        );
        assert!(EnergyGraph::try_new(
            nodes.clone(),
            edges.clone(),
            EnergyGraphConfig {
                allow_implicit_slot_shares: true,
                ..Default::default()
            }
        )
        .is_ok());
    }

    #[test]
    fn test_slot_validation() -> Result<(), Error> {
        let config = EnergyGraphConfig::default();
        let (mut nodes, mut edges) = nodes_and_edges();
        nodes.push(NodeDef::new("district_heating"));
        edges.push(EdgeDef::new("power_plant", "district_heating", "heat"));

        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_slot(concat!(
                    "Node power_plant has multiple out-slots without an explicit share: ",
                    "electricity, heat."
                )))
        );

        nodes[0] = nodes[0]
            .clone()
            .with_slot_share(Side::Out, "electricity", ratio(2, 5)?);
        let graph = EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone())?;
        let plant = graph.node("power_plant")?;
        assert_eq!(
            plant
                .slots(Side::Out)
                .get(&"electricity".into())
                .and_then(|slot| slot.explicit_share()),
            Some(&ratio(2, 5)?)
        );
        assert_eq!(plant.slots(Side::Out).len(), 2);
        assert!(plant.slots(Side::In).is_empty());

        nodes[0] = nodes[0]
            .clone()
            .with_slot_share(Side::Out, "electricity", ratio(1, 2)?);
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_slot(
                    "Duplicate out-slot share for carrier electricity on node power_plant."
                ))
        );

        nodes[0] = NodeDef::new("power_plant").with_slot_share(Side::In, "gas", ratio(1, 2)?);
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_slot(
                    "Node power_plant has a share for its in-slot gas, but no gas edges on that side."
                ))
        );

        Ok(())
    }

    #[test]
    fn test_share_sums() -> Result<(), Error> {
        let config = EnergyGraphConfig::default();
        let (mut nodes, mut edges) = nodes_and_edges();
        nodes.push(NodeDef::new("district_heating"));
        edges.push(EdgeDef::new("power_plant", "district_heating", "heat"));

        nodes[0] = nodes[0]
            .clone()
            .with_slot_share(Side::Out, "electricity", ratio(3, 5)?)
            .with_slot_share(Side::Out, "heat", ratio(1, 2)?);
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_slot(
                    "Node power_plant has out-slot shares adding up to 1.1, which is more than one."
                ))
        );

        // Shares adding up to exactly one are fine.
        nodes[0] = NodeDef::new("power_plant")
            .with_demand(from_integer(100))
            .with_slot_share(Side::Out, "electricity", ratio(1, 2)?)
            .with_slot_share(Side::Out, "heat", ratio(1, 2)?);
        assert!(EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_ok());

        let (nodes, mut edges) = nodes_and_edges();
        edges[1] = edges[1].clone().with_parent_share(ratio(3, 4)?);
        edges[2] = edges[2].clone().with_parent_share(ratio(1, 2)?);
        assert!(
            EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_err_and(|e| e
                == Error::invalid_edge(concat!(
                    "Edges of the out-slot electricity of node hv_network have shares ",
                    "adding up to 1.25, which is more than one."
                )))
        );

        // Child shares are relative to different in-slots, so they don't add up.
        let (nodes, mut edges) = nodes_and_edges();
        edges[1] = edges[1].clone().with_share(ratio(3, 4)?);
        edges[2] = edges[2].clone().with_share(ratio(3, 4)?);
        assert!(EnergyGraph::try_new(nodes.clone(), edges.clone(), config.clone()).is_ok());

        let nodes = vec![NodeDef::new("a"), NodeDef::new("b"), NodeDef::new("c")];
        let edges = vec![
            EdgeDef::new("a", "c", "gas").with_share(ratio(2, 3)?),
            EdgeDef::new("b", "c", "gas").with_share(ratio(2, 3)?),
        ];
        assert!(
            EnergyGraph::try_new(nodes, edges, config).is_err_and(|e| e
                == Error::invalid_edge(concat!(
                    "Edges of the in-slot gas of node c have shares ",
                    "adding up to 1.3333333333333333, which is more than one."
                )))
        );

        Ok(())
    }

    #[test]
    fn test_negative_values_are_clamped() -> Result<(), Error> {
        let graph = EnergyGraph::try_new(
            [
                NodeDef::new("a").with_demand(from_integer(-5)),
                NodeDef::new("b"),
            ],
            [EdgeDef::new("a", "b", "gas").with_share(ratio(-1, 2)?)],
            EnergyGraphConfig::default(),
        )?;

        assert_eq!(graph.node("a")?.demand(), Some(&from_integer(0)));
        let edge = graph.edge_id("a", "b", &"gas".into())?;
        assert_eq!(graph.child_share(edge), Some(from_integer(0)));

        Ok(())
    }
}
