use std::{error::Error, fmt, fmt::Display};

use crate::frontend::utils::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum SdotError {
    SyntaxError { pos: Position, msg: String },
    ParseError { pos: Position, msg: String },
    GraphError { msg: String },
}

impl Display for SdotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdotError::SyntaxError { pos, msg } => write!(f, "Syntax error at {}: {}", pos, msg),
            SdotError::ParseError { pos, msg } => write!(f, "Parse error at {}: {}", pos, msg),
            SdotError::GraphError { msg } => write!(f, "Graph construction error: {}", msg),
        }
    }
}

impl Error for SdotError {}
