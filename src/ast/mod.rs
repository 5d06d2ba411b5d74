//! The syntax tree produced by parsing a selector
use self::segment::PropertyChain;

pub mod filter;
pub mod segment;
pub mod slice;

/// A node of the syntax tree
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    /// `left & right` or `left | right`
    Logical {
        operator: LogicalOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `!expr`
    Not(Box<Expr>),
    Chain(PropertyChain),
}

impl Expr {
    pub fn as_chain(&self) -> Option<&PropertyChain> {
        match self {
            Expr::Chain(chain) => Some(chain),
            _ => None,
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Logical {
                operator,
                left,
                right,
            } => write!(f, "({left}{operator}{right})"),
            Expr::Not(expr) => write!(f, "!{expr}"),
            Expr::Chain(chain) => write!(f, "{chain}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LogicalOperator {
    And,
    Or,
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "&"),
            LogicalOperator::Or => write!(f, "|"),
        }
    }
}
