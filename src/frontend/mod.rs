//! The frontend module contains everything that is concerned with tokenizing and parsing the input string.
//!
//! # Lexer
//! Firstly the lexer is responsible for converting the input string into a vector of tokens which
//! are defined in the token module.
//! ### Example
//! ```rust
//! use sdot::frontend::lexer::Lexer;
//! let tokens_or_err = Lexer::new("(+ 1 2)").tokenize();
//! ```
//! `tokenize` either returns an error or a vector containing all tokens.
//!
//! # Parser
//! The parser module is responsible for consuming the token stream and turning it into the AST
//! (abstract syntax tree).
//! ### Example
//! ```rust
//! use sdot::frontend::{lexer::Lexer, parser::Parser};
//! let tokens = Lexer::new("(+ 1 2)").tokenize().unwrap();
//! let ast_or_err = Parser::new(tokens).parse();
//! ```
//! Again, the parser returns either an error informing the user of a parse error or the parse
//! result which is an instance of `frontend::ast::Exp`.
//!
//! # Visualization
//! The visualize module rebuilds a parsed AST as a uniform labeled tree and serializes it in the
//! Graphviz DOT language, so the structure of an expression can be rendered as a diagram.
//! ### Example
//! ```rust
//! use sdot::frontend::visualize::source_to_dot;
//! let dot = source_to_dot("(define x 4)").unwrap();
//! assert!(dot.starts_with("digraph"));
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod utils;
pub mod visualize;
