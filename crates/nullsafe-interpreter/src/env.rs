//! Lexical environments.

use crate::value::Value;
use fxhash::FxHashMap;
use nullsafe_syntax::Symbol;

/// Nested scopes of one function activation, innermost last.
#[derive(Debug)]
pub struct Env {
    scopes: Vec<FxHashMap<Symbol, Value>>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    /// An environment with one empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Opens a nested scope.
    pub fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Closes the innermost scope. The outermost scope is never removed.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds `name` in the innermost scope, shadowing outer bindings.
    pub fn define(&mut self, name: Symbol, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }

    /// Looks `name` up, innermost scope first.
    #[must_use]
    pub fn get(&self, name: Symbol) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }

    /// Overwrites the nearest binding of `name`. Returns `false` if there is
    /// none.
    pub fn assign(&mut self, name: Symbol, value: Value) -> bool {
        match self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(&name)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing() {
        let x = Symbol::new(0);
        let mut env = Env::new();
        env.define(x, Value::Int(1));
        env.push();
        env.define(x, Value::Int(2));
        assert_eq!(env.get(x), Some(&Value::Int(2)));
        env.pop();
        assert_eq!(env.get(x), Some(&Value::Int(1)));
    }

    #[test]
    fn test_assign_updates_nearest() {
        let x = Symbol::new(0);
        let y = Symbol::new(1);
        let mut env = Env::new();
        env.define(x, Value::Int(1));
        env.push();
        assert!(env.assign(x, Value::Int(5)));
        assert!(!env.assign(y, Value::Int(5)));
        env.pop();
        env.pop();
        assert_eq!(env.get(x), Some(&Value::Int(5)));
    }
}
