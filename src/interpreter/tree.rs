use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::stack::ensure_sufficient_stack;
use super::{ProgramState, Settings, SystemContext};
use crate::ast::{
    BinaryOperator, ClassDecl, Expression, Literal, LogicalOperator, Program, Statement,
    UnaryOperator,
};
use crate::environment::SharedEnvironment;
use crate::value::error::RuntimeError;
use crate::value::{Class, Function, Instance, LoxValue};

pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: SharedEnvironment,
    context: C,
    interpreter: TreeWalkStatementInterpreter,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self::with_settings(context, Settings::default())
    }

    pub fn with_settings(context: C, settings: Settings) -> Self {
        Self {
            environment: SharedEnvironment::globals(),
            context,
            interpreter: TreeWalkStatementInterpreter::create(settings),
        }
    }

    /// Runs every top level statement in the global scope.
    ///
    /// Globals persist between runs. A `return` outside any function stops the
    /// remaining top level statements.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for stmt in program.iter() {
            let state = self
                .interpreter
                .interpret_statement(&self.environment, &mut self.context, stmt)
                .inspect_err(|error| {
                    debug!(code = error.code(), category = %error.category(), "{error}");
                })?;
            if let ProgramState::Return(value) = state {
                debug!(%value, "top level return");
                break;
            }
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expression) -> Result<LoxValue, RuntimeError> {
        self.interpreter
            .evaluate(&self.environment, &mut self.context, expr)
    }

    pub fn environment(&self) -> &SharedEnvironment {
        &self.environment
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

pub struct TreeWalkStatementInterpreter {
    settings: Settings,
    call_depth: usize,
}

impl TreeWalkStatementInterpreter {
    fn create(settings: Settings) -> Self {
        Self {
            settings,
            call_depth: 0,
        }
    }

    pub fn interpret_statement<C: SystemContext>(
        &mut self,
        environment: &SharedEnvironment,
        context: &mut C,
        statement: &Statement,
    ) -> Result<ProgramState, RuntimeError> {
        ensure_sufficient_stack(|| self.interpret_statement_node(environment, context, statement))
    }

    pub fn evaluate<C: SystemContext>(
        &mut self,
        environment: &SharedEnvironment,
        context: &mut C,
        expr: &Expression,
    ) -> Result<LoxValue, RuntimeError> {
        ensure_sufficient_stack(|| self.evaluate_node(environment, context, expr))
    }
}

// Dispatch
impl TreeWalkStatementInterpreter {
    fn interpret_statement_node<C: SystemContext>(
        &mut self,
        environment: &SharedEnvironment,
        context: &mut C,
        statement: &Statement,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Statement::Expression(expr) => {
                self.evaluate(environment, context, expr)?;
                Ok(ProgramState::Run)
            }
            Statement::Print(expr) => {
                let result = self.evaluate(environment, context, expr)?;
                context.writeln(&format!("{result}"));
                Ok(ProgramState::Run)
            }
            Statement::Return(expr) => {
                let value = self.evaluate(environment, context, expr)?;
                Ok(ProgramState::Return(value))
            }
            Statement::VarDef { name, initial } => {
                let initial = self.evaluate(environment, context, initial)?;
                environment.define(name, initial);
                Ok(ProgramState::Run)
            }
            Statement::If {
                condition,
                success,
                failure,
            } => {
                if self.evaluate(environment, context, condition)?.is_truthy() {
                    self.interpret_statement(environment, context, success)
                } else {
                    self.interpret_statement(environment, context, failure)
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(environment, context, condition)?.is_truthy() {
                    match self.interpret_statement(environment, context, body)? {
                        ProgramState::Run => {}
                        s => {
                            return Ok(s);
                        }
                    }
                }
                Ok(ProgramState::Run)
            }
            Statement::Block(statements) => {
                self.interpret_block(&environment.new_scope(), context, statements)
            }
            Statement::Function(decl) => {
                // The closure is the declaring scope itself, so the name bound
                // below is visible to the body when it runs.
                let function = Function::new(decl.clone(), environment.clone());
                environment.define(&decl.name, LoxValue::Function(Rc::new(function)));
                Ok(ProgramState::Run)
            }
            Statement::Class(decl) => {
                self.interpret_class_declaration(environment, decl)?;
                Ok(ProgramState::Run)
            }
        }
    }

    fn evaluate_node<C: SystemContext>(
        &mut self,
        environment: &SharedEnvironment,
        context: &mut C,
        expr: &Expression,
    ) -> Result<LoxValue, RuntimeError> {
        let result = match expr {
            Expression::Literal(literal) => Self::evaluate_literal(literal),
            Expression::Variable(name) => environment.get(name)?,
            Expression::This => environment
                .get("this")
                .map_err(|_| RuntimeError::InvalidThis)?,
            Expression::Unary { operator, rhs } => {
                let rhs = self.evaluate(environment, context, rhs)?;
                Self::evaluate_unary(*operator, &rhs)?
            }
            Expression::Binary { operator, lhs, rhs } => {
                let lhs = self.evaluate(environment, context, lhs)?;
                let rhs = self.evaluate(environment, context, rhs)?;
                Self::evaluate_binary(*operator, &lhs, &rhs)?
            }
            Expression::Logical { operator, lhs, rhs } => {
                self.evaluate_logical(environment, context, *operator, lhs, rhs)?
            }
            Expression::Assign { name, value } => {
                let value = self.evaluate(environment, context, value)?;
                environment.assign(name, value.clone())?;
                value
            }
            Expression::Call { callee, arguments } => {
                let callee = self.evaluate(environment, context, callee)?;
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments.iter() {
                    values.push(self.evaluate(environment, context, argument)?);
                }
                self.call(context, callee, values)?
            }
            Expression::Get { object, name } => {
                match self.evaluate(environment, context, object)? {
                    LoxValue::Instance(instance) => instance.get(name)?,
                    object => {
                        return Err(RuntimeError::InvalidInstance {
                            object,
                            name: name.clone(),
                        });
                    }
                }
            }
            Expression::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(environment, context, object)?;
                let value = self.evaluate(environment, context, value)?;
                let LoxValue::Instance(instance) = object else {
                    return Err(RuntimeError::InvalidInstance {
                        object,
                        name: name.clone(),
                    });
                };
                instance.set(name, value.clone());
                value
            }
        };
        Ok(result)
    }
}

// Statement helpers
impl TreeWalkStatementInterpreter {
    fn interpret_block<C: SystemContext>(
        &mut self,
        environment: &SharedEnvironment,
        context: &mut C,
        statements: &[Statement],
    ) -> Result<ProgramState, RuntimeError> {
        for stmt in statements.iter() {
            match self.interpret_statement(environment, context, stmt)? {
                ProgramState::Run => {}
                s => {
                    return Ok(s);
                }
            }
        }
        Ok(ProgramState::Run)
    }

    fn interpret_class_declaration(
        &mut self,
        environment: &SharedEnvironment,
        decl: &ClassDecl,
    ) -> Result<(), RuntimeError> {
        // Handle subclassing
        let super_class = match &decl.super_class {
            Some(name) => match environment.get(name)? {
                LoxValue::Class(super_class) => Some(super_class),
                _ => return Err(RuntimeError::InvalidSuperClass(name.clone())),
            },
            None => None,
        };

        // `this` is only injected once a method is read off an instance.
        let methods: HashMap<_, _> = decl
            .methods
            .iter()
            .map(|method| {
                let function = Function::new(method.clone(), environment.clone());
                (method.name.clone(), Rc::new(function))
            })
            .collect();

        debug!(
            class = %decl.name,
            super_class = ?decl.super_class,
            methods = methods.len(),
            "declared class"
        );
        let class = Class {
            name: decl.name.clone(),
            methods,
            super_class,
        };
        environment.define(&decl.name, LoxValue::Class(Rc::new(class)));
        Ok(())
    }
}

// Expression evaluator
impl TreeWalkStatementInterpreter {
    fn evaluate_literal(literal: &Literal) -> LoxValue {
        match literal {
            Literal::Number(v) => LoxValue::Number(*v),
            Literal::Bool(v) => LoxValue::Bool(*v),
            Literal::Nil => LoxValue::Nil,
            Literal::String(v) => LoxValue::String(v.clone()),
        }
    }

    fn evaluate_unary(operator: UnaryOperator, rhs: &LoxValue) -> Result<LoxValue, RuntimeError> {
        type Operator = UnaryOperator;
        match operator {
            Operator::Bang => Ok(LoxValue::Bool(rhs.logical_not())),
            Operator::Minus => rhs.numeric_negate(),
        }
    }

    fn evaluate_binary(
        operator: BinaryOperator,
        lhs: &LoxValue,
        rhs: &LoxValue,
    ) -> Result<LoxValue, RuntimeError> {
        type Operator = BinaryOperator;
        match operator {
            Operator::Add => lhs.add(rhs),
            Operator::Subtract => lhs.subtract(rhs),
            Operator::Multiply => lhs.multiply(rhs),
            Operator::Divide => lhs.divide(rhs),
            Operator::LessThan => lhs.less_than(rhs),
            Operator::LessThanEqual => lhs.less_than_or_equal(rhs),
            Operator::GreaterThan => lhs.greater_than(rhs),
            Operator::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            Operator::EqualEqual => Ok(LoxValue::Bool(lhs.is_equal(rhs))),
            Operator::BangEqual => Ok(LoxValue::Bool(lhs.is_not_equal(rhs))),
        }
    }

    fn evaluate_logical<C: SystemContext>(
        &mut self,
        environment: &SharedEnvironment,
        context: &mut C,
        operator: LogicalOperator,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<LoxValue, RuntimeError> {
        type Operator = LogicalOperator;
        let lhs = self.evaluate(environment, context, lhs)?;

        match operator {
            Operator::And => {
                if !lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    self.evaluate(environment, context, rhs)
                }
            }
            Operator::Or => {
                if lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    self.evaluate(environment, context, rhs)
                }
            }
        }
    }

    fn call<C: SystemContext>(
        &mut self,
        context: &mut C,
        callee: LoxValue,
        arguments: Vec<LoxValue>,
    ) -> Result<LoxValue, RuntimeError> {
        match callee {
            LoxValue::NativeFunction(fun) => {
                // Check that the argument list is the same length as the parameter list.
                if arguments.len() != fun.get_arity() {
                    return Err(RuntimeError::InvalidArgumentCount {
                        actual: arguments.len(),
                        expected: fun.get_arity(),
                    });
                }
                fun.call(&arguments)
            }
            LoxValue::Function(function) => self.evaluate_function(context, &function, arguments),
            // No initializer runs; the arguments were evaluated for their effects only.
            LoxValue::Class(class) => Ok(LoxValue::Instance(Rc::new(Instance::new(class)))),
            v => Err(RuntimeError::InvalidCallee(v)),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name()))]
    fn evaluate_function<C: SystemContext>(
        &mut self,
        context: &mut C,
        function: &Function,
        arguments: Vec<LoxValue>,
    ) -> Result<LoxValue, RuntimeError> {
        let parameters = function.parameters();
        if self.settings.check_arity && arguments.len() != parameters.len() {
            return Err(RuntimeError::InvalidArgumentCount {
                actual: arguments.len(),
                expected: parameters.len(),
            });
        }
        if self.call_depth >= self.settings.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                depth: self.call_depth,
            });
        }

        // Set up scope
        let inner_scope = function
            .closure
            .push(parameters.iter().cloned().zip(arguments));

        self.call_depth += 1;
        let state = self.interpret_block(&inner_scope, context, &function.declaration.body);
        self.call_depth -= 1;

        match state? {
            ProgramState::Run => Ok(LoxValue::Nil),
            ProgramState::Return(value) => Ok(value),
        }
    }
}
