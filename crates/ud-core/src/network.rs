//! The fixed umbrella decision network as data.
//!
//! Weather influences the utility and, when consulted, the forecast. The
//! decision also feeds the utility. Rendered as Graphviz DOT or JSON.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Role of a node in an influence diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Chance,
    Decision,
    Utility,
}

impl NodeKind {
    /// Conventional Graphviz shape for the kind.
    pub fn shape(&self) -> NodeShape {
        match self {
            NodeKind::Chance => NodeShape::Ellipse,
            NodeKind::Decision => NodeShape::Box,
            NodeKind::Utility => NodeShape::Diamond,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Ellipse,
    Box,
    Diamond,
}

impl NodeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Ellipse => "ellipse",
            NodeShape::Box => "box",
            NodeShape::Diamond => "diamond",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NetworkNode {
    /// Short identifier used by edges.
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub shape: NodeShape,
}

impl NetworkNode {
    fn new(id: &str, label: &str, kind: NodeKind) -> Self {
        NetworkNode {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            shape: kind.shape(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NetworkEdge {
    pub from: String,
    pub to: String,
}

/// Nodes and directed edges of the decision network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecisionNetwork {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl DecisionNetwork {
    /// Build the network. The Forecast node and its Weather edge exist only
    /// when a forecast is consulted.
    pub fn new(with_forecast: bool) -> Self {
        let mut nodes = vec![NetworkNode::new("W", "Weather", NodeKind::Chance)];
        if with_forecast {
            nodes.push(NetworkNode::new("F", "Forecast", NodeKind::Chance));
        }
        nodes.push(NetworkNode::new("D", "Decision", NodeKind::Decision));
        nodes.push(NetworkNode::new("U", "Utility", NodeKind::Utility));

        let mut edges = vec![edge("W", "U"), edge("D", "U")];
        if with_forecast {
            edges.push(edge("W", "F"));
        }

        DecisionNetwork { nodes, edges }
    }

    pub fn has_forecast(&self) -> bool {
        self.node("F").is_some()
    }

    pub fn node(&self, id: &str) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Graphviz DOT text.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph {\n");
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "\t{} [label={} shape={}]",
                node.id,
                node.label,
                node.shape.as_str()
            );
        }
        for edge in &self.edges {
            let _ = writeln!(out, "\t{} -> {}", edge.from, edge.to);
        }
        out.push_str("}\n");
        out
    }
}

fn edge(from: &str, to: &str) -> NetworkEdge {
    NetworkEdge {
        from: from.to_string(),
        to: to.to_string(),
    }
}
