//! Abstract syntax tree datastructures.
//! In here are all datastructures needed for creating the AST in the parser.
//!
//! The `Display` impls double as the unparser: formatting any expression yields
//! its surface syntax again, which is also what the diagram leaves are labeled with.

use phf::phf_map;
use std::fmt;

/// A variable declaration site, i.e. a procedure parameter, a `define`
/// target or the left hand side of a `let` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub var: String,
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.var)
    }
}

/// A single `let` binding pairing a declared variable with its value expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub var: VarDecl,
    pub val: Box<Exp>,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.var, self.val)
    }
}

/// All node variants of the AST. The parser enforces the context rules:
/// `Program` only ever appears as the root and `Define` only at the top
/// level. Multi-field variants carry named fields on purpose since the
/// field names reappear as the edge labels of the rendered diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    Program {
        exps: Vec<Exp>,
    },
    Define {
        var: VarDecl,
        val: Box<Exp>,
    },
    If {
        test: Box<Exp>,
        then: Box<Exp>,
        alt: Box<Exp>,
    },
    Proc {
        params: Vec<VarDecl>,
        body: Vec<Exp>,
    },
    Let {
        bindings: Vec<Binding>,
        body: Vec<Exp>,
    },
    Lit {
        val: SValue,
    },
    App {
        rator: Box<Exp>,
        rands: Vec<Exp>,
    },
    // Atomics
    Num(f64),
    Bool(bool),
    Str(String),
    PrimOp(Prim),
    VarRef(String),
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Program { exps } => write_joined(f, exps, "\n"),
            Exp::Define { var, val } => write!(f, "(define {} {})", var, val),
            Exp::If { test, then, alt } => write!(f, "(if {} {} {})", test, then, alt),
            Exp::Proc { params, body } => {
                write!(f, "(lambda (")?;
                write_joined(f, params, " ")?;
                write!(f, ") ")?;
                write_joined(f, body, " ")?;
                write!(f, ")")
            }
            Exp::Let { bindings, body } => {
                write!(f, "(let (")?;
                write_joined(f, bindings, " ")?;
                write!(f, ") ")?;
                write_joined(f, body, " ")?;
                write!(f, ")")
            }
            Exp::Lit { val } => write!(f, "'{}", val),
            Exp::App { rator, rands } => {
                write!(f, "({}", rator)?;
                for rand in rands.iter() {
                    write!(f, " {}", rand)?;
                }
                write!(f, ")")
            }
            Exp::Num(n) => write!(f, "{}", n),
            Exp::Bool(true) => write!(f, "#t"),
            Exp::Bool(false) => write!(f, "#f"),
            Exp::Str(s) => write!(f, "\"{}\"", s),
            Exp::PrimOp(op) => write!(f, "{}", op),
            Exp::VarRef(var) => write!(f, "{}", var),
        }
    }
}

/// Values living inside a quotation. Proper and dotted lists are read into
/// nested pairs terminated by `Empty` or the dotted tail.
#[derive(Debug, Clone, PartialEq)]
pub enum SValue {
    Empty,
    Compound {
        first: Box<SValue>,
        rest: Box<SValue>,
    },
    Symbol(String),
    Num(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for SValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SValue::Empty => write!(f, "()"),
            SValue::Compound { first, rest } => {
                write!(f, "({}", first)?;
                let mut tail: &SValue = rest;
                loop {
                    match tail {
                        SValue::Compound { first, rest } => {
                            write!(f, " {}", first)?;
                            tail = rest;
                        }
                        SValue::Empty => break,
                        other => {
                            write!(f, " . {}", other)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            SValue::Symbol(s) => write!(f, "{}", s),
            SValue::Num(n) => write!(f, "{}", n),
            SValue::Bool(true) => write!(f, "#t"),
            SValue::Bool(false) => write!(f, "#f"),
            SValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// The primitive operators of the language. The set is closed, everything
/// else parses as a variable reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prim {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    NumEq,
    Not,
    And,
    Or,
    Eq,
    StrEq,
    Cons,
    Car,
    Cdr,
    List,
    IsPair,
    IsNumber,
    IsBoolean,
    IsSymbol,
    IsString,
}

static PRIMITIVES: phf::Map<&'static str, Prim> = phf_map! {
    "+" => Prim::Add,
    "-" => Prim::Sub,
    "*" => Prim::Mul,
    "/" => Prim::Div,
    "<" => Prim::Lt,
    ">" => Prim::Gt,
    "=" => Prim::NumEq,
    "not" => Prim::Not,
    "and" => Prim::And,
    "or" => Prim::Or,
    "eq?" => Prim::Eq,
    "string=?" => Prim::StrEq,
    "cons" => Prim::Cons,
    "car" => Prim::Car,
    "cdr" => Prim::Cdr,
    "list" => Prim::List,
    "pair?" => Prim::IsPair,
    "number?" => Prim::IsNumber,
    "boolean?" => Prim::IsBoolean,
    "symbol?" => Prim::IsSymbol,
    "string?" => Prim::IsString,
};

impl Prim {
    /// Look up the primitive operator named by an identifier.
    pub fn lookup(name: &str) -> Option<Prim> {
        PRIMITIVES.get(name).copied()
    }

    /// The operator's surface syntax.
    pub fn name(self) -> &'static str {
        match self {
            Prim::Add => "+",
            Prim::Sub => "-",
            Prim::Mul => "*",
            Prim::Div => "/",
            Prim::Lt => "<",
            Prim::Gt => ">",
            Prim::NumEq => "=",
            Prim::Not => "not",
            Prim::And => "and",
            Prim::Or => "or",
            Prim::Eq => "eq?",
            Prim::StrEq => "string=?",
            Prim::Cons => "cons",
            Prim::Car => "car",
            Prim::Cdr => "cdr",
            Prim::List => "list",
            Prim::IsPair => "pair?",
            Prim::IsNumber => "number?",
            Prim::IsBoolean => "boolean?",
            Prim::IsSymbol => "symbol?",
            Prim::IsString => "string?",
        }
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
