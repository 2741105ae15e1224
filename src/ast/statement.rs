use std::rc::Rc;

use compact_str::CompactString;

use super::Expression;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: CompactString,
    pub parameters: Vec<CompactString>,
    pub body: Vec<Statement>,
}

impl FunctionDecl {
    pub fn new(name: &str, parameters: &[&str], body: Vec<Statement>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.iter().map(|&p| p.into()).collect(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: CompactString,
    pub super_class: Option<CompactString>,
    pub methods: Vec<Rc<FunctionDecl>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Print(Expression),
    Return(Expression),
    VarDef {
        name: CompactString,
        initial: Expression,
    },
    If {
        condition: Expression,
        success: Box<Statement>,
        failure: Box<Statement>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    Block(Vec<Statement>),
    Function(Rc<FunctionDecl>),
    Class(ClassDecl),
}

// Constructors
impl Statement {
    pub fn expression(expr: Expression) -> Self {
        Self::Expression(expr)
    }

    pub fn print(expr: Expression) -> Self {
        Self::Print(expr)
    }

    pub fn return_value(expr: Expression) -> Self {
        Self::Return(expr)
    }

    /// A bare `return;` hands back `nil`.
    pub fn return_nil() -> Self {
        Self::Return(Expression::nil())
    }

    /// `var name;` without an initializer binds `nil`.
    pub fn var_decl(name: &str, initial: Option<Expression>) -> Self {
        Self::VarDef {
            name: name.into(),
            initial: initial.unwrap_or_else(Expression::nil),
        }
    }

    /// A missing else branch is an empty block.
    pub fn if_else(condition: Expression, success: Statement, failure: Option<Statement>) -> Self {
        Self::If {
            condition,
            success: Box::new(success),
            failure: Box::new(failure.unwrap_or(Statement::Block(Vec::new()))),
        }
    }

    pub fn while_loop(condition: Expression, body: Statement) -> Self {
        Self::While {
            condition,
            body: Box::new(body),
        }
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Self::Block(statements)
    }

    /// Desugars `for (init; condition; increment) body` into
    /// `{ init; while (condition) { body; increment; } }`.
    pub fn for_loop(
        initializer: Option<Statement>,
        condition: Option<Expression>,
        increment: Option<Expression>,
        body: Statement,
    ) -> Self {
        let condition = condition.unwrap_or_else(|| Expression::bool(true));
        let mut loop_body = vec![body];
        if let Some(increment) = increment {
            loop_body.push(Statement::Expression(increment));
        }
        let mut outer = Vec::new();
        if let Some(initializer) = initializer {
            outer.push(initializer);
        }
        outer.push(Statement::while_loop(condition, Statement::Block(loop_body)));
        Statement::Block(outer)
    }

    pub fn function(name: &str, parameters: &[&str], body: Vec<Statement>) -> Self {
        Self::Function(Rc::new(FunctionDecl::new(name, parameters, body)))
    }

    pub fn class(name: &str, super_class: Option<&str>, methods: Vec<FunctionDecl>) -> Self {
        Self::Class(ClassDecl {
            name: name.into(),
            super_class: super_class.map(Into::into),
            methods: methods.into_iter().map(Rc::new).collect(),
        })
    }
}
