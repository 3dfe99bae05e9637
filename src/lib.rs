//! sdot parses a small Scheme dialect and renders the abstract syntax tree
//! of the parsed source as a Graphviz/DOT diagram.

pub mod error;
pub mod frontend;

pub use frontend::visualize::{ast_to_dot, source_to_dot};
