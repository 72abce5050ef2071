// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes and edges from an [`EnergyGraph`].

use crate::iterators::{Edges, Neighbors, Nodes};
use crate::{Carrier, EnergyGraph, Error, Side};

use super::{Edge, EdgeId, Element, Node, NodeId};

/// `Node` and `Edge` retrieval.
impl EnergyGraph {
    /// Returns the id of the node with the given `key`, if it exists.
    pub fn node_id(&self, key: &str) -> Result<NodeId, Error> {
        self.node_indices
            .get(key)
            .copied()
            .ok_or_else(|| Error::node_not_found(format!("Node with key {key} not found.")))
    }

    /// Returns the node with the given `key`, if it exists.
    pub fn node(&self, key: &str) -> Result<&Node, Error> {
        self.node_id(key).map(|idx| &self.graph[idx])
    }

    /// Returns the id of the edge of the given carrier between the given
    /// nodes, if it exists.
    pub fn edge_id(&self, from: &str, to: &str, carrier: &Carrier) -> Result<EdgeId, Error> {
        let source = self.node_id(from)?;
        let target = self.node_id(to)?;
        self.edges_on(source, Side::Out, Some(carrier))
            .into_iter()
            .find(|edge| self.graph[*edge].target == target)
            .ok_or_else(|| {
                Error::edge_not_found(format!("Edge {from} -> {to} @ {carrier} not found."))
            })
    }

    /// Returns the edge of the given carrier between the given nodes, if it
    /// exists.
    pub fn edge(&self, from: &str, to: &str, carrier: &Carrier) -> Result<&Edge, Error> {
        self.edge_id(from, to, carrier).map(|idx| &self.graph[idx])
    }

    /// Returns an iterator over the nodes in the graph.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns an iterator over the edges in the graph.
    pub fn edges(&self) -> Edges<'_> {
        Edges {
            iter: self.graph.raw_edges().iter(),
        }
    }

    /// Returns an iterator over the *parents* of the node with the given
    /// `key`.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn parents(&self, key: &str) -> Result<Neighbors<'_>, Error> {
        self.node_id(key).map(|index| Neighbors {
            graph: &self.graph,
            iter: self
                .graph
                .neighbors_directed(index, petgraph::Direction::Incoming),
        })
    }

    /// Returns an iterator over the *children* of the node with the given
    /// `key`.
    ///
    /// Returns an error if the given `key` does not exist.
    pub fn children(&self, key: &str) -> Result<Neighbors<'_>, Error> {
        self.node_id(key).map(|index| Neighbors {
            graph: &self.graph,
            iter: self
                .graph
                .neighbors_directed(index, petgraph::Direction::Outgoing),
        })
    }

    /// Returns the incoming edges of the node with the given `key`, optionally
    /// only those of the given carrier.
    pub fn in_edges(&self, key: &str, carrier: Option<&Carrier>) -> Result<Vec<&Edge>, Error> {
        let node = self.node_id(key)?;
        Ok(self
            .edges_on(node, Side::In, carrier)
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect())
    }

    /// Returns the outgoing edges of the node with the given `key`, optionally
    /// only those of the given carrier.
    pub fn out_edges(&self, key: &str, carrier: Option<&Carrier>) -> Result<Vec<&Edge>, Error> {
        let node = self.node_id(key)?;
        Ok(self
            .edges_on(node, Side::Out, carrier)
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect())
    }

    /// Returns the edges on the given side of a node, in the order in which
    /// they were added to the graph.
    pub(crate) fn edges_on(
        &self,
        node: NodeId,
        side: Side,
        carrier: Option<&Carrier>,
    ) -> Vec<EdgeId> {
        let slots = self.graph[node].slots(side);
        let mut edges = match carrier {
            Some(carrier) => slots
                .get(carrier)
                .map(|slot| slot.edges().to_vec())
                .unwrap_or_default(),
            None => slots
                .iter()
                .flat_map(|slot| slot.edges().iter().copied())
                .collect(),
        };
        edges.sort();
        edges
    }

    /// Returns a human readable name for the given element.
    pub fn describe(&self, element: Element) -> String {
        match element {
            Element::Node(idx) => format!("node {}", self.graph[idx].key),
            Element::Edge(idx) => {
                let edge = &self.graph[idx];
                format!(
                    "edge {} -> {} @ {}",
                    self.graph[edge.source].key, self.graph[edge.target].key, edge.carrier
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::test_utils::GraphBuilder;
    use crate::{Carrier, Element, Error};

    fn graph() -> Result<crate::EnergyGraph, Error> {
        GraphBuilder::new()
            .node("plant")
            .node("network")
            .node("homes")
            .node("boilers")
            .edge("plant", "network", "electricity")
            .edge("network", "homes", "electricity")
            .edge("boilers", "homes", "heat")
            .allow_implicit_slot_shares()
            .build()
    }

    #[test]
    fn test_node() -> Result<(), Error> {
        let graph = graph()?;

        assert_eq!(graph.node("plant")?.key(), "plant");
        assert_eq!(graph.node_id("homes")?, graph.node("homes")?.id());
        assert_eq!(
            graph.node("factory").map(|n| n.key().to_string()),
            Err(Error::node_not_found("Node with key factory not found."))
        );
        assert!(graph
            .nodes()
            .map(|n| n.key())
            .eq(["plant", "network", "homes", "boilers"]));

        Ok(())
    }

    #[test]
    fn test_edge() -> Result<(), Error> {
        let graph = graph()?;
        let electricity = Carrier::from("electricity");

        let edge = graph.edge("network", "homes", &electricity)?;
        assert_eq!(edge.source(), graph.node_id("network")?);
        assert_eq!(edge.target(), graph.node_id("homes")?);
        assert_eq!(
            graph.describe(Element::Edge(edge.id())),
            "edge network -> homes @ electricity"
        );
        assert_eq!(
            graph.describe(Element::Node(edge.source())),
            "node network"
        );

        assert_eq!(
            graph.edge_id("network", "homes", &"heat".into()),
            Err(Error::edge_not_found(
                "Edge network -> homes @ heat not found."
            ))
        );
        assert_eq!(graph.edges().count(), 3);

        Ok(())
    }

    #[test]
    fn test_neighbors() -> Result<(), Error> {
        let graph = graph()?;

        assert!(graph.parents("plant").is_ok_and(|mut x| x.next().is_none()));
        assert!(graph
            .children("plant")
            .is_ok_and(|x| x.map(|n| n.key()).eq(["network"])));

        let mut parents = graph.parents("homes")?.map(|n| n.key()).collect::<Vec<_>>();
        parents.sort();
        assert_eq!(parents, ["boilers", "network"]);

        assert_eq!(graph.in_edges("homes", None)?.len(), 2);
        assert_eq!(
            graph.in_edges("homes", Some(&"heat".into()))?[0].source(),
            graph.node_id("boilers")?
        );
        assert!(graph.out_edges("homes", None)?.is_empty());
        assert!(graph
            .children("factory")
            .is_err_and(|e| e == Error::node_not_found("Node with key factory not found.")));

        Ok(())
    }
}
