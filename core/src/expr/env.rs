use super::value::Number;
use std::collections::HashMap;

/// Variable bindings, chained to an optional parent scope.
#[derive(Debug, Default)]
pub struct Environment<'p> {
    bindings: HashMap<String, Number>,
    parent: Option<&'p Environment<'p>>,
}

impl<'p> Environment<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: &'p Environment<'p>) -> Self {
        Self {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Look up a variable, walking up the parent chain.
    pub fn get(&self, name: &str) -> Option<Number> {
        match self.bindings.get(name) {
            Some(value) => Some(*value),
            None => self.parent.and_then(|parent| parent.get(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bind a variable in this scope.
    /// Parent scopes are never written to.
    pub fn set(&mut self, name: impl Into<String>, value: Number) {
        self.bindings.insert(name.into(), value);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn environment_get_set() {
        let mut env = Environment::new();
        assert!(env.get("a").is_none());

        env.set("a", Number::Int(0));
        assert_eq!(env.get("a"), Some(Number::Int(0)));

        env.set("a", Number::Float(1.5));
        assert_eq!(env.get("a"), Some(Number::Float(1.5)));
    }

    #[test]
    fn environment_parent_chain() {
        let mut global = Environment::new();
        global.set("a", Number::Int(1));
        global.set("b", Number::Int(2));

        let mut local = Environment::with_parent(&global);
        local.set("b", Number::Int(20));
        local.set("c", Number::Int(30));

        assert_eq!(local.get("a"), Some(Number::Int(1)));
        assert_eq!(local.get("b"), Some(Number::Int(20)));
        assert!(local.contains("c"));
        assert!(!local.contains("d"));

        assert_eq!(global.get("b"), Some(Number::Int(2)));
        assert!(!global.contains("c"));
    }
}
