//! The abstract syntax tree consumed by the interpreter.
//!
//! Nodes are built once and never mutated during evaluation. Function
//! declarations are reference counted so that every closure created from the
//! same declaration shares its body.

mod expression;
mod operator;
mod statement;

pub use expression::{Expression, Literal};
pub use operator::{BinaryOperator, LogicalOperator, UnaryOperator};
pub use statement::{ClassDecl, FunctionDecl, Statement};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }
}

impl FromIterator<Statement> for Program {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
