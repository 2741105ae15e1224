pub mod context;
mod stack;
mod tree;

use crate::value::LoxValue;
pub use tree::{TreeWalkInterpreter, TreeWalkStatementInterpreter};

/// How control leaves a statement.
///
/// `Return` unwinds enclosing blocks and loops until the function call that
/// owns them turns it back into a value.
#[derive(Debug)]
pub enum ProgramState {
    Run,
    Return(LoxValue),
}

pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Reject calls whose argument count differs from the parameter count.
    /// When off, extra arguments are dropped and missing parameters stay unbound.
    pub check_arity: bool,
    /// Deepest chain of nested user function calls before a stack overflow error.
    pub max_call_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_arity: false,
            max_call_depth: 128,
        }
    }
}

impl Settings {
    pub fn check_arity(mut self, enabled: bool) -> Self {
        self.check_arity = enabled;
        self
    }

    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}
