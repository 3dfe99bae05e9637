//! Structs and functions concerned with generating graphs with Graphviz and DOT language.

use std::fmt::{self, Display};

/// A labeled graph that can be serialized to the DOT language. Nodes and
/// edges are kept as tables indexed by the caller's identifiers.
#[derive(Debug)]
pub struct Graph {
    name: String,
    pub is_directed: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(name: &str, is_directed: bool) -> Self {
        Graph {
            name: name.to_string(),
            is_directed,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Copy every node and edge of `other` into this graph, keeping the
    /// original identifiers and attributes.
    pub fn merge(&mut self, other: Graph) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }

    /// True if a node with the given identifier is part of the graph.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn as_dot<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "{}", self)
    }
}

impl Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph_type = if self.is_directed {
            "digraph"
        } else {
            "graph"
        };
        writeln!(f, "{} {} {{", graph_type, &self.name)?;
        for node in self.nodes.iter() {
            writeln!(f, "\t{}", node)?;
        }
        for edge in self.edges.iter() {
            writeln!(f, "\t{}", edge)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug)]
pub struct Node {
    id: String,
    label: Option<String>,
    shape: Option<String>,
}

impl Node {
    pub fn new(id: &str, label: Option<&str>, shape: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.map(|x| x.to_string()),
            shape: shape.map(|x| x.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.shape) {
            (Some(l), Some(s)) => write!(
                f,
                "{} [ label=\"{}\", shape=\"{}\" ];",
                self.id,
                escape_label(l),
                s
            ),
            (Some(l), None) => write!(f, "{} [ label=\"{}\" ];", self.id, escape_label(l)),
            (None, Some(s)) => write!(f, "{} [ shape=\"{}\" ];", self.id, s),
            (None, None) => write!(f, "{};", self.id),
        }
    }
}

#[derive(Debug)]
pub struct Edge {
    from: String,
    to: String,
    label: Option<String>,
    is_directed: bool,
}

impl Edge {
    pub fn new(from: &str, to: &str, is_directed: bool, label: Option<&str>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            label: label.map(|x| x.to_string()),
            is_directed,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connector = if self.is_directed { "->" } else { "--" };
        match self.label {
            Some(ref l) => write!(
                f,
                "{} {} {} [ label=\"{}\" ];",
                self.from,
                connector,
                self.to,
                escape_label(l)
            ),
            None => write!(f, "{} {} {};", self.from, connector, self.to),
        }
    }
}

/// Escape embedded quotes so a label cannot break out of the DOT attribute
/// it is printed into. Backslashes pass through untouched since DOT gives
/// them meaning inside record labels.
fn escape_label(label: &str) -> String {
    label.replace('\"', "\\\"")
}
