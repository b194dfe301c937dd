use std::collections::HashMap;

use crate::{Function, Ident, Primitive, SymbolTable, Value};

/// Definitions written in Joe itself, evaluated when an interpreter starts
pub const PRELUDE: &str = "\
Oe:O$ME
Mean:{/+%N)
";

/// The binding environment
///
/// A name is bound to either a function or a value, never both. Binding a
/// name replaces whatever it was bound to before.
#[derive(Debug, Clone)]
pub struct Env {
    functions: HashMap<Ident, Function>,
    variables: HashMap<Ident, Value>,
}

impl Default for Env {
    fn default() -> Self {
        let functions = Primitive::all()
            .filter(Primitive::is_word)
            .map(|prim| (Ident::from(prim.name()), Function::Primitive(prim)))
            .collect();
        let variables = [(Ident::from("Z"), Value::empty())].into();
        Env {
            functions,
            variables,
        }
    }
}

impl Env {
    /// An environment with no bindings at all
    pub fn empty() -> Self {
        Env {
            functions: HashMap::new(),
            variables: HashMap::new(),
        }
    }
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
    pub fn bind_function(&mut self, name: Ident, f: Function) {
        self.variables.remove(&name);
        self.functions.insert(name, f);
    }
    /// Bind a name to a value, returning whether it was a function's name
    pub fn bind_variable(&mut self, name: Ident, value: Value) -> bool {
        let was_function = self.functions.remove(&name).is_some();
        self.variables.insert(name, value);
        was_function
    }
    /// Whether a name is bound to a function other than a primitive
    pub fn is_user_function(&self, name: &str) -> bool {
        self.functions
            .get(name)
            .is_some_and(|f| f.as_primitive().is_none())
    }
    /// Iterate over the function bindings in name order
    pub fn functions(&self) -> impl Iterator<Item = (&Ident, &Function)> {
        let mut functions: Vec<_> = self.functions.iter().collect();
        functions.sort_by(|a, b| a.0.cmp(b.0));
        functions.into_iter()
    }
    /// Iterate over the value bindings in name order
    pub fn variables(&self) -> impl Iterator<Item = (&Ident, &Value)> {
        let mut variables: Vec<_> = self.variables.iter().collect();
        variables.sort_by(|a, b| a.0.cmp(b.0));
        variables.into_iter()
    }
}

impl SymbolTable for Env {
    fn is_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
    fn is_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }
}
