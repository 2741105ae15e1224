pub mod error;
pub mod formatter;

use crate::ast::{BinaryOperator, FunctionDecl, UnaryOperator};
use crate::environment::SharedEnvironment;
use compact_str::{CompactString, CompactStringExt, ToCompactString};
use error::RuntimeError;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

pub trait NativeFunction: std::fmt::Debug {
    fn get_name(&self) -> &'static str;
    fn get_arity(&self) -> usize;
    fn call(&self, arguments: &[LoxValue]) -> Result<LoxValue, RuntimeError>;
}

/// A user defined function paired with the environment it was declared in.
#[derive(Clone)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: SharedEnvironment,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: SharedEnvironment) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn parameters(&self) -> &[CompactString] {
        &self.declaration.parameters
    }

    /// Returns a copy whose closure is extended by a scope holding only `this`.
    ///
    /// `self` is left untouched.
    pub fn bind(&self, instance: Rc<Instance>) -> Function {
        let closure = self.closure.push([(
            CompactString::from("this"),
            LoxValue::Instance(instance),
        )]);
        Function {
            declaration: self.declaration.clone(),
            closure,
        }
    }
}

// The closure can reach this function again, so it is left out.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.declaration.name)
            .field("parameters", &self.declaration.parameters)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Class {
    pub name: CompactString,
    pub methods: HashMap<CompactString, Rc<Function>>,
    pub super_class: Option<Rc<Class>>,
}

impl Class {
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }

        if let Some(ref super_class) = self.super_class {
            super_class.find_method(name)
        } else {
            None
        }
    }

    pub fn get_method(&self, name: &str) -> Result<Rc<Function>, RuntimeError> {
        self.find_method(name)
            .ok_or_else(|| RuntimeError::UndefinedMethod {
                class: self.name.clone(),
                name: name.to_compact_string(),
            })
    }
}

pub struct Instance {
    pub class: Rc<Class>,
    fields: RefCell<HashMap<CompactString, LoxValue>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Fields shadow methods. Methods come back bound to this instance.
    pub fn get(self: &Rc<Self>, name: &str) -> Result<LoxValue, RuntimeError> {
        if let Some(value) = self.fields.borrow().get(name) {
            return Ok(value.clone());
        }

        match self.class.get_method(name) {
            Ok(method) => Ok(LoxValue::Function(Rc::new(method.bind(self.clone())))),
            Err(_) => Err(RuntimeError::UndefinedProperty {
                object: LoxValue::Instance(self.clone()),
                name: name.to_compact_string(),
            }),
        }
    }

    pub fn set(&self, name: &str, value: LoxValue) {
        self.fields
            .borrow_mut()
            .insert(name.to_compact_string(), value);
    }
}

// Long chains of instances linked through fields would otherwise be freed
// recursively, one stack frame per link.
impl Drop for Instance {
    fn drop(&mut self) {
        let mut pending: Vec<LoxValue> = self.fields.get_mut().drain().map(|(_, v)| v).collect();
        while let Some(value) = pending.pop() {
            if let LoxValue::Instance(instance) = value {
                if let Ok(mut instance) = Rc::try_unwrap(instance) {
                    pending.extend(instance.fields.get_mut().drain().map(|(_, v)| v));
                }
            }
        }
    }
}

// Fields may point back at the instance itself.
impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields.borrow();
        let mut names: Vec<&CompactString> = fields.keys().collect();
        names.sort();
        f.debug_struct("Instance")
            .field("class", &self.class.name)
            .field("fields", &names)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum LoxValue {
    Number(f64),
    String(CompactString),
    Nil,
    Bool(bool),
    NativeFunction(Rc<dyn NativeFunction>),
    Function(Rc<Function>),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
}

impl std::fmt::Display for LoxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", formatter::format_number(*v)),
            Self::String(v) => write!(f, "{v}"),
            Self::Nil => write!(f, "nil"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::NativeFunction(_) => write!(f, "<native fn>"),
            Self::Function(func) => {
                let name = func.name();
                write!(f, "<fn {name}>")
            }
            Self::Class(class) => {
                let name = &class.name;
                write!(f, "{name}")
            }
            Self::Instance(instance) => {
                let class = &instance.class.name;
                write!(f, "{class} instance")
            }
        }
    }
}

impl From<f64> for LoxValue {
    fn from(value: f64) -> Self {
        LoxValue::Number(value)
    }
}

impl From<bool> for LoxValue {
    fn from(value: bool) -> Self {
        LoxValue::Bool(value)
    }
}

impl From<&str> for LoxValue {
    fn from(value: &str) -> Self {
        LoxValue::String(value.to_compact_string())
    }
}

// Unary operators
impl LoxValue {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LoxValue::Bool(false) | LoxValue::Nil)
    }

    pub fn logical_not(&self) -> bool {
        !self.is_truthy()
    }

    pub fn numeric_negate(&self) -> Result<LoxValue, RuntimeError> {
        match self {
            LoxValue::Number(v) => Ok(LoxValue::Number(-v)),
            v => Err(RuntimeError::NonNumeric {
                operator: UnaryOperator::Minus,
                operand: v.clone(),
            }),
        }
    }
}

impl LoxValue {
    fn numeric_operands(
        &self,
        other: &LoxValue,
        operator: BinaryOperator,
    ) -> Result<(f64, f64), RuntimeError> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok((*lhs, *rhs)),
            (lhs, rhs) => Err(RuntimeError::NonNumerics {
                operator,
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            }),
        }
    }

    // Arithmetic + string concatenation
    pub fn add(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => Ok(LoxValue::Number(lhs + rhs)),
            (LoxValue::String(lhs), LoxValue::String(rhs)) => {
                Ok(LoxValue::String([lhs, rhs].concat_compact()))
            }
            (lhs, rhs) => Err(RuntimeError::NonAddable {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            }),
        }
    }

    pub fn subtract(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::Subtract)?;
        Ok(LoxValue::Number(lhs - rhs))
    }

    pub fn multiply(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::Multiply)?;
        Ok(LoxValue::Number(lhs * rhs))
    }

    pub fn divide(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::Divide)?;
        Ok(LoxValue::Number(lhs / rhs))
    }

    // Comparison
    pub fn less_than(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::LessThan)?;
        Ok(LoxValue::Bool(lhs < rhs))
    }

    pub fn less_than_or_equal(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::LessThanEqual)?;
        Ok(LoxValue::Bool(lhs <= rhs))
    }

    pub fn greater_than(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::GreaterThan)?;
        Ok(LoxValue::Bool(lhs > rhs))
    }

    pub fn greater_than_or_equal(&self, other: &LoxValue) -> Result<LoxValue, RuntimeError> {
        let (lhs, rhs) = self.numeric_operands(other, BinaryOperator::GreaterThanEqual)?;
        Ok(LoxValue::Bool(lhs >= rhs))
    }

    // Equality
    pub fn is_equal(&self, other: &LoxValue) -> bool {
        match (self, other) {
            (LoxValue::Number(lhs), LoxValue::Number(rhs)) => lhs == rhs,
            (LoxValue::String(lhs), LoxValue::String(rhs)) => lhs == rhs,
            (LoxValue::Nil, LoxValue::Nil) => true,
            (LoxValue::Bool(lhs), LoxValue::Bool(rhs)) => lhs == rhs,
            (LoxValue::NativeFunction(lhs), LoxValue::NativeFunction(rhs)) => {
                std::ptr::addr_eq(Rc::as_ptr(lhs), Rc::as_ptr(rhs))
            }
            (LoxValue::Function(lhs), LoxValue::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            (LoxValue::Class(lhs), LoxValue::Class(rhs)) => Rc::ptr_eq(lhs, rhs),
            (LoxValue::Instance(lhs), LoxValue::Instance(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }

    pub fn is_not_equal(&self, other: &LoxValue) -> bool {
        !self.is_equal(other)
    }
}
