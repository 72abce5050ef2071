// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Checks on the demands of individual nodes and edges.

use crate::Element;

use super::{EnergyGraphValidator, Violation};

impl EnergyGraphValidator<'_> {
    /// Checks that every node has a demand, within its max demand.
    pub(super) fn validate_nodes(&mut self) {
        let graph = self.graph;
        for node in graph.nodes() {
            let element = Element::Node(node.id());
            match (node.demand(), node.max_demand()) {
                (None, _) => self.report(element, Violation::MissingDemand),
                (Some(demand), Some(max_demand)) if demand > max_demand => self.report(
                    element,
                    Violation::ExceedsMaxDemand {
                        demand: demand.clone(),
                        max_demand: max_demand.clone(),
                    },
                ),
                _ => {}
            }
        }
    }

    /// Checks that every edge has a demand.
    pub(super) fn validate_edges(&mut self) {
        let graph = self.graph;
        for edge in graph.edges() {
            if edge.demand().is_none() {
                self.report(Element::Edge(edge.id()), Violation::MissingEdgeDemand);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::test_utils::GraphBuilder;
    use crate::rational::from_integer;
    use crate::{Element, Error, ErrorKind, Violation};

    #[test]
    fn test_unsolved_graph() -> Result<(), Error> {
        let graph = GraphBuilder::new()
            .node("a")
            .node("b")
            .edge("a", "b", "gas")
            .build()?;

        let violations = graph.violations();
        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations.get(&Element::Node(graph.node_id("a")?)),
            Some(&vec![Violation::MissingDemand])
        );
        let edge = graph.edge_id("a", "b", &"gas".into())?;
        assert_eq!(
            violations.get(&Element::Edge(edge)),
            Some(&vec![Violation::MissingEdgeDemand])
        );

        let err = graph.validate().err();
        assert_eq!(err.as_ref().map(Error::kind), Some(ErrorKind::ValidationFailed));
        assert_eq!(
            err.as_ref().map(Error::description),
            Some(concat!(
                "Found 3 violations: node a: demand is unknown; node b: demand is unknown; ",
                "edge a -> b @ gas: edge demand is unknown."
            ))
        );

        Ok(())
    }

    #[test]
    fn test_max_demand_exceeded() -> Result<(), Error> {
        let mut graph = GraphBuilder::new()
            .node_with_demand("a", 20.0)
            .max_demand("a", 10.0)
            .node("b")
            .edge("a", "b", "gas")
            .build()?;
        graph.solve()?;

        let violations = graph.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations.get(&Element::Node(graph.node_id("a")?)),
            Some(&vec![Violation::ExceedsMaxDemand {
                demand: from_integer(20),
                max_demand: from_integer(10),
            }])
        );

        Ok(())
    }
}
