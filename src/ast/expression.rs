use compact_str::CompactString;

use super::{BinaryOperator, LogicalOperator, UnaryOperator};

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Nil,
    String(CompactString),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(CompactString),
    This,
    Unary {
        operator: UnaryOperator,
        rhs: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Logical {
        operator: LogicalOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Assign {
        name: CompactString,
        value: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Get {
        object: Box<Expression>,
        name: CompactString,
    },
    Set {
        object: Box<Expression>,
        name: CompactString,
        value: Box<Expression>,
    },
}

// Constructors
impl Expression {
    pub fn number(value: f64) -> Self {
        Self::Literal(Literal::Number(value))
    }

    pub fn string(value: &str) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    pub fn nil() -> Self {
        Self::Literal(Literal::Nil)
    }

    pub fn variable(name: &str) -> Self {
        Self::Variable(name.into())
    }

    pub fn unary(operator: UnaryOperator, rhs: Expression) -> Self {
        Self::Unary {
            operator,
            rhs: Box::new(rhs),
        }
    }

    pub fn binary(operator: BinaryOperator, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn and(lhs: Expression, rhs: Expression) -> Self {
        Self::Logical {
            operator: LogicalOperator::And,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Expression, rhs: Expression) -> Self {
        Self::Logical {
            operator: LogicalOperator::Or,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn assign(name: &str, value: Expression) -> Self {
        Self::Assign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn get(object: Expression, name: &str) -> Self {
        Self::Get {
            object: Box::new(object),
            name: name.into(),
        }
    }

    pub fn set(object: Expression, name: &str, value: Expression) -> Self {
        Self::Set {
            object: Box::new(object),
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Turns `a` into `a = value` and `a.b` into `a.b = value`.
    ///
    /// Returns `None` for anything that can't be assigned to.
    pub fn into_assignment(self, value: Expression) -> Option<Self> {
        match self {
            Self::Variable(name) => Some(Self::Assign {
                name,
                value: Box::new(value),
            }),
            Self::Get { object, name } => Some(Self::Set {
                object,
                name,
                value: Box::new(value),
            }),
            _ => None,
        }
    }
}
