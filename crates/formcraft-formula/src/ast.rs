//! The formula abstract syntax tree.

use crate::error::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    Boolean(bool),
    /// A `{{field_id}}` placeholder or a bare identifier resolved against
    /// the schema -- the parser does not distinguish them structurally.
    FieldRef { name: String, span: Span },
    Not(Box<Expr>),
    Negate(Box<Expr>),
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
    Call { name: String, args: Vec<Expr>, span: Span },
}

impl Expr {
    /// The span of the outermost token that produced this node, used for
    /// error reporting when analysis fails on a sub-expression.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::FieldRef { span, .. } | Self::Binary { span, .. } | Self::Call { span, .. } => {
                Some(*span)
            }
            _ => None,
        }
    }
}
