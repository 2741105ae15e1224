//! Lexical scope chains.
//!
//! A [`SharedEnvironment`] is a handle to one scope. Cloning the handle shares
//! the scope, which is how closures and bound methods keep a live view of the
//! variables around their declaration.

mod native;

use crate::value::{error::RuntimeError, LoxValue, NativeFunction};
use compact_str::{CompactString, ToCompactString};
use native::NativeClock;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[derive(Clone)]
pub struct SharedEnvironment {
    inner: Rc<RefCell<Environment>>,
}

struct Environment {
    values: HashMap<CompactString, LoxValue>,
    parent: Option<SharedEnvironment>,
}

impl SharedEnvironment {
    /// An empty outermost scope.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Environment {
                values: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// An outermost scope seeded with the native functions.
    pub fn globals() -> Self {
        let globals = Self::new();

        // Inject native functions here
        {
            let clock = NativeClock;
            globals.define(clock.get_name(), LoxValue::NativeFunction(Rc::new(clock)));
        }

        globals
    }

    /// Creates a child scope of this one, seeded with `bindings`.
    pub fn push<I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (CompactString, LoxValue)>,
    {
        Self {
            inner: Rc::new(RefCell::new(Environment {
                values: bindings.into_iter().collect(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn new_scope(&self) -> Self {
        self.push(std::iter::empty())
    }

    pub fn get(&self, name: &str) -> Result<LoxValue, RuntimeError> {
        self.inner
            .borrow()
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_compact_string()))
    }

    /// Binds `name` in this scope only, replacing any binding already here.
    pub fn define(&self, name: &str, value: LoxValue) {
        self.inner.borrow_mut().define(name, value)
    }

    /// Rebinds `name` in the nearest scope that already defines it.
    pub fn assign(&self, name: &str, value: LoxValue) -> Result<(), RuntimeError> {
        if self.inner.borrow_mut().assign(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::UndefinedVariable(name.to_compact_string()))
        }
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.inner.borrow().values.contains_key(name)
    }

    pub fn parent(&self) -> Option<SharedEnvironment> {
        self.inner.borrow().parent.clone()
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent();
        }
        depth
    }

    pub fn ptr_eq(&self, other: &SharedEnvironment) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for SharedEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    fn get(&self, name: &str) -> Option<LoxValue> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(ref parent) = self.parent {
            parent.inner.borrow().get(name)
        } else {
            None
        }
    }

    fn assign(&mut self, name: &str, value: LoxValue) -> bool {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            true
        } else if let Some(ref parent) = self.parent {
            parent.inner.borrow_mut().assign(name, value)
        } else {
            false
        }
    }

    fn define(&mut self, name: &str, value: LoxValue) {
        self.values.insert(name.to_compact_string(), value);
    }
}

// Values can hold this scope again through closures, so only names are shown.
impl std::fmt::Debug for SharedEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut names: Vec<&CompactString> = inner.values.keys().collect();
        names.sort();
        f.debug_struct("SharedEnvironment")
            .field("names", &names)
            .field("depth", &self.depth())
            .finish()
    }
}
