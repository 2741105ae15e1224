//! Static checks over a finished [`Program`].
//!
//! The interpreter never runs these itself. Callers that want programs
//! rejected before any statement executes run the [`Validator`] first.

mod error;

use crate::ast::{ClassDecl, Expression, FunctionDecl, Program, Statement};
use compact_str::CompactString;
pub use error::ValidationError;
use std::collections::HashSet;

pub const RESERVED_WORDS: [&str; 16] = [
    "and", "class", "else", "false", "for", "fun", "if", "nil", "or", "print", "return", "super",
    "this", "true", "var", "while",
];

#[derive(Clone, Copy)]
enum FunctionEnvironment {
    None,
    Function,
}

#[derive(Clone, Copy)]
enum ClassEnvironment {
    None,
    Class,
}

pub struct Validator {
    function: FunctionEnvironment,
    class: ClassEnvironment,
    // Global declarations may be repeated, so only local scopes are tracked.
    scopes: Vec<HashSet<CompactString>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            function: FunctionEnvironment::None,
            class: ClassEnvironment::None,
            scopes: Vec::new(),
        }
    }

    pub fn validate_program(mut self, program: &Program) -> Result<(), ValidationError> {
        for statement in program.iter() {
            self.validate_statement(statement)?;
        }
        Ok(())
    }
}

// Base
impl Validator {
    fn enter_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    fn check_name(name: &CompactString) -> Result<(), ValidationError> {
        if RESERVED_WORDS.contains(&name.as_str()) {
            Err(ValidationError::ReservedName(name.clone()))
        } else {
            Ok(())
        }
    }

    fn declare(&mut self, name: &CompactString) -> Result<(), ValidationError> {
        Self::check_name(name)?;
        if let Some(inner_scope) = self.scopes.last_mut() {
            if !inner_scope.insert(name.clone()) {
                return Err(ValidationError::ShadowLocal(name.clone()));
            }
        }
        Ok(())
    }
}

// Statements
impl Validator {
    fn validate_statement(&mut self, statement: &Statement) -> Result<(), ValidationError> {
        match statement {
            Statement::Expression(expr) | Statement::Print(expr) => {
                self.validate_expression(expr)?;
            }
            Statement::Return(expr) => {
                if matches!(self.function, FunctionEnvironment::None) {
                    return Err(ValidationError::NonFunctionReturn);
                }
                self.validate_expression(expr)?;
            }
            Statement::VarDef { name, initial } => {
                self.validate_expression(initial)?;
                self.declare(name)?;
            }
            Statement::If {
                condition,
                success,
                failure,
            } => {
                self.validate_expression(condition)?;
                self.validate_statement(success)?;
                self.validate_statement(failure)?;
            }
            Statement::While { condition, body } => {
                self.validate_expression(condition)?;
                self.validate_statement(body)?;
            }
            Statement::Block(statements) => {
                self.enter_scope();
                let result = statements
                    .iter()
                    .try_for_each(|statement| self.validate_statement(statement));
                self.exit_scope();
                result?;
            }
            Statement::Function(decl) => {
                Self::check_name(&decl.name)?;
                self.validate_function(decl)?;
            }
            Statement::Class(decl) => {
                self.validate_class(decl)?;
            }
        }
        Ok(())
    }

    fn validate_function(&mut self, decl: &FunctionDecl) -> Result<(), ValidationError> {
        let enclosing = self.function;
        self.function = FunctionEnvironment::Function;
        // Parameters and body locals share the call scope.
        self.enter_scope();
        let result = decl
            .parameters
            .iter()
            .try_for_each(|param| self.declare(param))
            .and_then(|_| {
                decl.body
                    .iter()
                    .try_for_each(|statement| self.validate_statement(statement))
            });
        self.exit_scope();
        self.function = enclosing;
        result
    }

    fn validate_class(&mut self, decl: &ClassDecl) -> Result<(), ValidationError> {
        Self::check_name(&decl.name)?;
        if let Some(ref super_class) = decl.super_class {
            Self::check_name(super_class)?;
        }

        let enclosing = self.class;
        self.class = ClassEnvironment::Class;
        let result = decl
            .methods
            .iter()
            .try_for_each(|method| self.validate_function(method));
        self.class = enclosing;
        result
    }
}

// Expressions
impl Validator {
    fn validate_expression(&mut self, expr: &Expression) -> Result<(), ValidationError> {
        match expr {
            Expression::Literal(_) => {}
            Expression::Variable(name) => Self::check_name(name)?,
            Expression::This => {
                if matches!(self.class, ClassEnvironment::None) {
                    return Err(ValidationError::NonClassThis);
                }
            }
            Expression::Unary { rhs, .. } => self.validate_expression(rhs)?,
            Expression::Binary { lhs, rhs, .. } | Expression::Logical { lhs, rhs, .. } => {
                self.validate_expression(lhs)?;
                self.validate_expression(rhs)?;
            }
            Expression::Assign { name, value } => {
                self.validate_expression(value)?;
                Self::check_name(name)?;
            }
            Expression::Call { callee, arguments } => {
                self.validate_expression(callee)?;
                for argument in arguments {
                    self.validate_expression(argument)?;
                }
            }
            Expression::Get { object, .. } => self.validate_expression(object)?,
            Expression::Set { object, value, .. } => {
                self.validate_expression(object)?;
                self.validate_expression(value)?;
            }
        }
        Ok(())
    }
}
