//! Functionality concerned with visualizing an AST with the help of Graphviz and the DOT DSL.
//!
//! The conversion happens in two steps. First the [`TreeBuilder`] recursively
//! rebuilds the heterogeneous AST as a uniform [`Tree`]: every AST node becomes
//! one labeled graph node, every child field one labeled edge, and ordered
//! sequences get a synthetic `:` collection node in between. The finished tree
//! then serializes itself to DOT via the generic [`graph`] module.
//!
//! Each builder call generates fresh node identifiers, so structurally equal
//! subtrees never share graph nodes and every conversion yields one self
//! contained graph value.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use self::graph::{Edge, Graph, Node};
use super::ast::{Binding, Exp, Prim, SValue, VarDecl};
use super::lexer::Lexer;
use super::parser::Parser;
use crate::error::SdotError::{self, GraphError};

pub mod graph;

/// A self contained labeled graph together with its distinguished root node.
#[derive(Debug)]
pub struct Tree {
    pub root_id: String,
    pub graph: Graph,
}

impl Tree {
    /// Serialize the tree's graph to the DOT language.
    pub fn to_dot(&self) -> String {
        self.graph.to_string()
    }

    /// Write the DOT representation to a file.
    pub fn write_to_dot(&self, outfile: &str) -> std::io::Result<()> {
        fs::write(outfile, self.to_dot())
    }

    /// Render the tree as a PDF by piping the DOT representation through the
    /// Graphviz dot command.
    pub fn write_to_pdf(&self, outfile: &str) {
        let mut dot = Command::new("dot")
            .stdin(Stdio::piped())
            .arg("-Tpdf")
            .arg("-o")
            .arg(outfile)
            .spawn()
            .expect("Unable to render the diagram. Graphviz is probably not installed");

        {
            let mut stdin = dot.stdin.take().expect("Failed to open dot's stdin");
            stdin.write_all(self.to_dot().as_bytes()).unwrap();
        }
        dot.wait().unwrap();
    }
}

/// Builds `Tree` values out of AST nodes.
///
/// The builder owns the identifier counter, so every node created during one
/// conversion gets a fresh name even when two subtrees are structurally equal.
pub struct TreeBuilder {
    /// Counter used for giving each node a unique name.
    node_counter: u32,
}

type TreeResult = Result<Tree, SdotError>;

impl TreeBuilder {
    const NODE_NAME_PREFIX: &'static str = "node";
    const GRAPH_NAME: &'static str = "ast";
    /// Label of the synthetic collection node wrapping ordered sequences.
    const LIST_LABEL: &'static str = ":";

    pub fn new() -> Self {
        Self { node_counter: 1 }
    }

    fn fresh_id(&mut self) -> String {
        let id = format!("{}{}", TreeBuilder::NODE_NAME_PREFIX, self.node_counter);
        self.node_counter += 1;
        id
    }

    /// A tree holding a single labeled node and no edges.
    fn leaf(&mut self, label: &str) -> Tree {
        let mut graph = Graph::new(TreeBuilder::GRAPH_NAME, true);
        let root_id = self.fresh_id();
        graph.add_node(Node::new(&root_id, Some(label), Some("record")));
        Tree { root_id, graph }
    }

    /// A tree with a fresh labeled root adopting every child tree as a whole
    /// subgraph, plus one labeled edge from the root to each child's root.
    /// The children and edge labels must pair up exactly.
    fn tree(&mut self, label: &str, children: Vec<Tree>, edge_labels: &[&str]) -> TreeResult {
        if children.len() != edge_labels.len() {
            return Err(GraphError {
                msg: format!(
                    "cannot pair {} children with {} edge labels under '{}'",
                    children.len(),
                    edge_labels.len(),
                    label
                ),
            });
        }
        let mut root = self.leaf(label);
        for (child, &edge_label) in children.into_iter().zip(edge_labels) {
            root.graph.merge(child.graph);
            root.graph.add_edge(Edge::new(
                &root.root_id,
                &child.root_id,
                true,
                Some(edge_label),
            ));
        }
        Ok(root)
    }

    /// Convert one AST node into its labeled tree. Every child field becomes
    /// an edge labeled with the field's name; sequence valued fields are
    /// wrapped in a collection node first.
    pub fn build(&mut self, exp: &Exp) -> TreeResult {
        match exp {
            Exp::Program { exps } => {
                let exps = self.exp_seq(exps)?;
                self.tree("program", vec![exps], &["exps"])
            }
            Exp::Define { var, val } => {
                let children = vec![self.var_decl(var)?, self.build(val)?];
                self.tree("define-exp", children, &["var", "val"])
            }
            Exp::If { test, then, alt } => {
                let children = vec![self.build(test)?, self.build(then)?, self.build(alt)?];
                self.tree("if-exp", children, &["test", "then", "alt"])
            }
            Exp::Proc { params, body } => {
                let children = vec![self.var_decl_seq(params)?, self.exp_seq(body)?];
                self.tree("proc-exp", children, &["params", "body"])
            }
            Exp::Let { bindings, body } => {
                let children = vec![self.binding_seq(bindings)?, self.exp_seq(body)?];
                self.tree("let-exp", children, &["bindings", "body"])
            }
            Exp::Lit { val } => {
                let children = vec![self.svalue(val)?];
                self.tree("lit-exp", children, &["val"])
            }
            Exp::App { rator, rands } => {
                let children = vec![self.build(rator)?, self.exp_seq(rands)?];
                self.tree("app-exp", children, &["rator", "rands"])
            }
            Exp::Num(_) => self.atomic("num-exp", "val", exp),
            Exp::Bool(_) => self.atomic("bool-exp", "val", exp),
            Exp::Str(_) => self.atomic("str-exp", "val", exp),
            Exp::PrimOp(_) => self.atomic("prim-op", "op", exp),
            Exp::VarRef(_) => self.atomic("var-ref", "var", exp),
        }
    }

    /// An atomic expression becomes a single child composite wrapping the
    /// expression's unparsed text. The comparison operators get a leading
    /// backslash because `<` and `>` delimit ports in DOT record labels.
    fn atomic(&mut self, tag: &str, field: &str, exp: &Exp) -> TreeResult {
        let text = match exp {
            Exp::PrimOp(op) if matches!(op, Prim::Lt | Prim::Gt) => format!("\\{}", op),
            _ => exp.to_string(),
        };
        let child = self.leaf(&text);
        self.tree(tag, vec![child], &[field])
    }

    fn var_decl(&mut self, decl: &VarDecl) -> TreeResult {
        let name = self.leaf(&decl.var);
        self.tree("var-decl", vec![name], &["var"])
    }

    fn binding(&mut self, binding: &Binding) -> TreeResult {
        let children = vec![self.var_decl(&binding.var)?, self.build(&binding.val)?];
        self.tree("binding", children, &["var", "val"])
    }

    /// Literal values are dispatched over their own union.
    fn svalue(&mut self, val: &SValue) -> TreeResult {
        match val {
            SValue::Empty => Ok(self.leaf("empty-sexp")),
            SValue::Compound { first, rest } => {
                let children = vec![self.svalue(first)?, self.svalue(rest)?];
                self.tree("compound-sexp", children, &["first", "rest"])
            }
            SValue::Symbol(name) => {
                let inner = self.leaf(name);
                self.tree("symbol-sexp", vec![inner], &["val"])
            }
            SValue::Num(_) | SValue::Bool(_) | SValue::Str(_) => Ok(self.leaf(&val.to_string())),
        }
    }

    /// An ordered sequence becomes one collection node whose edges carry the
    /// element positions.
    fn seq(&mut self, items: Vec<Tree>) -> TreeResult {
        let labels: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        self.tree(TreeBuilder::LIST_LABEL, items, &label_refs)
    }

    fn exp_seq(&mut self, exps: &[Exp]) -> TreeResult {
        let items = exps
            .iter()
            .map(|exp| self.build(exp))
            .collect::<Result<Vec<_>, _>>()?;
        self.seq(items)
    }

    fn var_decl_seq(&mut self, decls: &[VarDecl]) -> TreeResult {
        let items = decls
            .iter()
            .map(|decl| self.var_decl(decl))
            .collect::<Result<Vec<_>, _>>()?;
        self.seq(items)
    }

    fn binding_seq(&mut self, bindings: &[Binding]) -> TreeResult {
        let items = bindings
            .iter()
            .map(|binding| self.binding(binding))
            .collect::<Result<Vec<_>, _>>()?;
        self.seq(items)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert one AST value into its DOT representation.
pub fn ast_to_dot(exp: &Exp) -> Result<String, SdotError> {
    let tree = TreeBuilder::new().build(exp)?;
    Ok(tree.to_dot())
}

/// The whole pipeline: tokenize and parse the source, then render its AST.
/// A lex or parse failure short circuits before any tree is built.
pub fn source_to_dot(src: &str) -> Result<String, SdotError> {
    let tokens = Lexer::new(src).tokenize()?;
    let ast = Parser::new(tokens).parse()?;
    ast_to_dot(&ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;

    fn parse(input: &str) -> Exp {
        let mut lx = Lexer::new(input);
        let tokens = lx.tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        parser.parse().unwrap()
    }

    fn build(input: &str) -> Tree {
        TreeBuilder::new().build(&parse(input)).unwrap()
    }

    /// Sorted multiset of all node labels in the tree.
    fn node_labels(tree: &Tree) -> Vec<&str> {
        let mut labels: Vec<&str> = tree
            .graph
            .nodes()
            .iter()
            .map(|node| node.label().unwrap())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Sorted multiset of all edge labels in the tree.
    fn edge_labels(tree: &Tree) -> Vec<&str> {
        let mut labels: Vec<&str> = tree
            .graph
            .edges()
            .iter()
            .map(|edge| edge.label().unwrap())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// The `(edge label, child id)` pairs leaving a node, in insertion order.
    fn out_edges<'a>(tree: &'a Tree, id: &str) -> Vec<(&'a str, &'a str)> {
        tree.graph
            .edges()
            .iter()
            .filter(|edge| edge.from() == id)
            .map(|edge| (edge.label().unwrap(), edge.to()))
            .collect()
    }

    fn node_label<'a>(tree: &'a Tree, id: &str) -> &'a str {
        tree.graph
            .nodes()
            .iter()
            .find(|node| node.id() == id)
            .and_then(|node| node.label())
            .unwrap()
    }

    /// Longest root-to-leaf path length counted in nodes.
    fn depth(tree: &Tree, id: &str) -> usize {
        1 + out_edges(tree, id)
            .iter()
            .map(|(_, child)| depth(tree, child))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_leaf() {
        let mut builder = TreeBuilder::new();
        let leaf = builder.leaf("x");
        assert!(leaf.graph.contains_node(&leaf.root_id));
        assert_eq!(leaf.graph.nodes().len(), 1);
        assert_eq!(leaf.graph.edges().len(), 0);
        assert_eq!(node_label(&leaf, &leaf.root_id), "x");
    }

    #[test]
    fn test_tree_merges_children() {
        let mut builder = TreeBuilder::new();
        let a = builder.leaf("a");
        let a_id = a.root_id.clone();
        let b = builder.leaf("b");
        let b_id = b.root_id.clone();
        let tree = builder.tree("t", vec![a, b], &["x", "y"]).unwrap();

        assert_eq!(tree.graph.nodes().len(), 3);
        assert!(tree.graph.contains_node(&a_id));
        assert!(tree.graph.contains_node(&b_id));
        assert_eq!(
            out_edges(&tree, &tree.root_id),
            vec![("x", a_id.as_str()), ("y", b_id.as_str())]
        );
    }

    #[test]
    fn test_tree_rejects_unequal_pairing() {
        let mut builder = TreeBuilder::new();
        let child = builder.leaf("a");
        let err = builder.tree("t", vec![child], &[]).unwrap_err();
        assert!(matches!(err, GraphError { .. }));
    }

    #[test]
    fn test_empty_children_tree_is_a_leaf() {
        let mut builder = TreeBuilder::new();
        let tree = builder.tree("t", vec![], &[]).unwrap();
        assert_eq!(tree.graph.nodes().len(), 1);
        assert_eq!(tree.graph.edges().len(), 0);
    }

    #[test]
    fn test_define_expression() {
        let tree = build("(define x 4)");
        assert_eq!(node_label(&tree, &tree.root_id), "define-exp");
        // define-exp, var-decl + leaf, num-exp + leaf
        assert_eq!(tree.graph.nodes().len(), 5);

        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0, "var");
        assert_eq!(children[1].0, "val");
        assert_eq!(node_label(&tree, children[0].1), "var-decl");
        assert_eq!(node_label(&tree, children[1].1), "num-exp");

        let decl_children = out_edges(&tree, children[0].1);
        assert_eq!(decl_children.len(), 1);
        assert_eq!(decl_children[0].0, "var");
        assert_eq!(node_label(&tree, decl_children[0].1), "x");
        let val_children = out_edges(&tree, children[1].1);
        assert_eq!(node_label(&tree, val_children[0].1), "4");
    }

    #[test]
    fn test_if_expression() {
        let tree = build("(if #t (+ x 4) 6)");
        assert_eq!(node_label(&tree, &tree.root_id), "if-exp");

        let children = out_edges(&tree, &tree.root_id);
        let labels: Vec<&str> = children.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["test", "then", "alt"]);
        assert_eq!(node_label(&tree, children[0].1), "bool-exp");
        assert_eq!(node_label(&tree, children[1].1), "app-exp");
        assert_eq!(node_label(&tree, children[2].1), "num-exp");

        // The application dispatches its operator directly and wraps the
        // operands in a collection node.
        let app_children = out_edges(&tree, children[1].1);
        let labels: Vec<&str> = app_children.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["rator", "rands"]);
        assert_eq!(node_label(&tree, app_children[0].1), "prim-op");
        assert_eq!(node_label(&tree, app_children[1].1), ":");
        assert_eq!(out_edges(&tree, app_children[1].1).len(), 2);
    }

    #[test]
    fn test_proc_expression() {
        let tree = build("(lambda (x y) x)");
        assert_eq!(node_label(&tree, &tree.root_id), "proc-exp");

        let children = out_edges(&tree, &tree.root_id);
        let labels: Vec<&str> = children.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["params", "body"]);

        let params = out_edges(&tree, children[0].1);
        assert_eq!(node_label(&tree, children[0].1), ":");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].0, "0");
        assert_eq!(params[1].0, "1");
        assert_eq!(node_label(&tree, params[0].1), "var-decl");
        assert_eq!(node_label(&tree, params[1].1), "var-decl");

        let body = out_edges(&tree, children[1].1);
        assert_eq!(body.len(), 1);
        assert_eq!(node_label(&tree, body[0].1), "var-ref");
    }

    #[test]
    fn test_let_expression() {
        let tree = build("(let ((a 1)) a)");
        assert_eq!(node_label(&tree, &tree.root_id), "let-exp");
        let children = out_edges(&tree, &tree.root_id);
        let labels: Vec<&str> = children.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["bindings", "body"]);

        let bindings = out_edges(&tree, children[0].1);
        assert_eq!(bindings.len(), 1);
        assert_eq!(node_label(&tree, bindings[0].1), "binding");
        let binding_children = out_edges(&tree, bindings[0].1);
        let labels: Vec<&str> = binding_children.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["var", "val"]);
    }

    #[test]
    fn test_program_node() {
        let tree = build("(define x 4) x");
        assert_eq!(node_label(&tree, &tree.root_id), "program");
        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0, "exps");
        assert_eq!(node_label(&tree, children[0].1), ":");
        assert_eq!(out_edges(&tree, children[0].1).len(), 2);
    }

    #[test]
    fn test_comparison_operators_are_escaped() {
        let tree = build("(< x 1)");
        assert!(node_labels(&tree).contains(&"\\<"));

        let tree = build(">");
        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(node_label(&tree, &tree.root_id), "prim-op");
        assert_eq!(node_label(&tree, children[0].1), "\\>");

        // Every other atomic keeps its plain unparsed text.
        let tree = build("=");
        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(node_label(&tree, children[0].1), "=");
        let tree = build("\"a b\"");
        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(node_label(&tree, children[0].1), "\"a b\"");
    }

    #[test]
    fn test_literal_values() {
        // '(1 2) is one pair level deeper than '(1).
        let tree = build("'(1 2)");
        assert_eq!(node_label(&tree, &tree.root_id), "lit-exp");
        assert_eq!(depth(&tree, &tree.root_id), 4);
        assert_eq!(
            node_labels(&tree),
            vec!["1", "2", "compound-sexp", "compound-sexp", "empty-sexp", "lit-exp"]
        );

        let tree = build("'(1)");
        assert_eq!(depth(&tree, &tree.root_id), 3);

        let tree = build("'a");
        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(node_label(&tree, children[0].1), "symbol-sexp");
        let inner = out_edges(&tree, children[0].1);
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].0, "val");
        assert_eq!(node_label(&tree, inner[0].1), "a");

        let tree = build("'()");
        let children = out_edges(&tree, &tree.root_id);
        assert_eq!(node_label(&tree, children[0].1), "empty-sexp");
    }

    #[test]
    fn test_no_subtree_sharing() {
        // Both 1 literals get their own num-exp and leaf nodes.
        let tree = build("(+ 1 1)");
        assert_eq!(tree.graph.nodes().len(), 8);
        let num_exps = node_labels(&tree)
            .iter()
            .filter(|label| **label == "num-exp")
            .count();
        assert_eq!(num_exps, 2);

        let mut ids: Vec<&str> = tree.graph.nodes().iter().map(|node| node.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_determinism_modulo_identifiers() {
        let input = "(let ((a 1)) (if (< a 2) 'b \"c\"))";
        let first = build(input);
        let second = build(input);

        assert_eq!(first.graph.nodes().len(), second.graph.nodes().len());
        assert_eq!(first.graph.edges().len(), second.graph.edges().len());
        assert_eq!(node_labels(&first), node_labels(&second));
        assert_eq!(edge_labels(&first), edge_labels(&second));
        assert!(first
            .graph
            .nodes()
            .iter()
            .all(|node| node.shape() == Some("record")));
    }

    #[test]
    fn test_root_is_always_present() {
        for input in &["4", "x", "'()", "(define x 4)", "(lambda () 1)"] {
            let tree = build(input);
            assert!(tree.graph.contains_node(&tree.root_id));
        }
    }

    #[test]
    fn test_ast_to_dot_output() {
        let dot = ast_to_dot(&parse("4")).unwrap();
        assert_eq!(
            dot,
            "digraph ast {\
            \n\tnode2 [ label=\"num-exp\", shape=\"record\" ];\
            \n\tnode1 [ label=\"4\", shape=\"record\" ];\
            \n\tnode2 -> node1 [ label=\"val\" ];\n}"
        );
    }

    #[test]
    fn test_source_to_dot_pipeline() {
        let dot = source_to_dot("(define x 4)").unwrap();
        assert!(dot.starts_with("digraph ast {"));
        assert!(dot.contains("label=\"define-exp\""));
        assert!(dot.contains("shape=\"record\""));
    }

    #[test]
    fn test_failures_short_circuit() {
        assert!(matches!(
            source_to_dot("(define x"),
            Err(SdotError::ParseError { .. })
        ));
        assert!(matches!(
            source_to_dot("\"unterminated"),
            Err(SdotError::SyntaxError { .. })
        ));
        assert!(matches!(
            source_to_dot("1."),
            Err(SdotError::SyntaxError { .. })
        ));
    }
}
