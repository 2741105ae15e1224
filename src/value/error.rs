use super::LoxValue;
use crate::ast::{BinaryOperator, UnaryOperator};
use compact_str::CompactString;
use std::fmt::Display;
use thiserror::Error;

/// The broad kind of a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Reading or assigning a name that no scope defines, including `this`
    /// outside a method.
    Name,
    /// Reading a missing field or method, or touching properties of a non-instance.
    Attribute,
    /// Calling something that can't be called, or calling it the wrong way.
    Type,
    /// Operator and object model failures specific to the language.
    Lox,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "NameError"),
            Self::Attribute => write!(f, "AttributeError"),
            Self::Type => write!(f, "TypeError"),
            Self::Lox => write!(f, "LoxError"),
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum RuntimeError {
    #[error("Operand of '{operator}' must be a number.")]
    NonNumeric {
        operator: UnaryOperator,
        operand: LoxValue,
    },
    #[error("Operands of '{operator}' must be numbers.")]
    NonNumerics {
        operator: BinaryOperator,
        lhs: LoxValue,
        rhs: LoxValue,
    },
    #[error("Operands of '+' must be two numbers or two strings.")]
    NonAddable { lhs: LoxValue, rhs: LoxValue },
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(CompactString),
    #[error("Can't access `this` outside of a class.")]
    InvalidThis,
    #[error("Undefined property '{name}' on {object}.")]
    UndefinedProperty {
        object: LoxValue,
        name: CompactString,
    },
    #[error("Undefined method '{name}' in class {class}.")]
    UndefinedMethod {
        class: CompactString,
        name: CompactString,
    },
    #[error("Only instances have properties, can't access '{name}' on {object}.")]
    InvalidInstance {
        object: LoxValue,
        name: CompactString,
    },
    #[error("Can only call functions and classes, got {0}.")]
    InvalidCallee(LoxValue),
    #[error("Superclass '{0}' must be a class.")]
    InvalidSuperClass(CompactString),
    #[error("Expected {expected} arguments but got {actual}.")]
    InvalidArgumentCount { actual: usize, expected: usize },
    #[error("Stack overflow after {depth} nested calls.")]
    StackOverflow { depth: usize },
}

impl RuntimeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuntimeError::UndefinedVariable(_) | RuntimeError::InvalidThis => ErrorCategory::Name,
            RuntimeError::UndefinedProperty { .. } | RuntimeError::InvalidInstance { .. } => {
                ErrorCategory::Attribute
            }
            RuntimeError::InvalidCallee(_)
            | RuntimeError::InvalidSuperClass(_)
            | RuntimeError::InvalidArgumentCount { .. } => ErrorCategory::Type,
            RuntimeError::NonNumeric { .. }
            | RuntimeError::NonNumerics { .. }
            | RuntimeError::NonAddable { .. }
            | RuntimeError::UndefinedMethod { .. }
            | RuntimeError::StackOverflow { .. } => ErrorCategory::Lox,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::NonNumeric { .. } => "RT001",
            RuntimeError::NonNumerics { .. } => "RT002",
            RuntimeError::NonAddable { .. } => "RT003",
            RuntimeError::UndefinedVariable(_) => "RT004",
            RuntimeError::InvalidCallee(_) => "RT005",
            RuntimeError::InvalidArgumentCount { .. } => "RT006",
            RuntimeError::InvalidInstance { .. } => "RT007",
            RuntimeError::UndefinedProperty { .. } => "RT008",
            RuntimeError::InvalidSuperClass(_) => "RT009",
            RuntimeError::UndefinedMethod { .. } => "RT010",
            RuntimeError::StackOverflow { .. } => "RT011",
            RuntimeError::InvalidThis => "RT012",
        }
    }
}
