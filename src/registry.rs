//! The immutable command-name → builtin table.

use crate::builtin::{Builtin, Cd, DirChanger, Echo, Exit, ProcessControl, Pwd, Type};
use crate::external::PathResolver;
use std::collections::HashMap;
use std::rc::Rc;

/// Mapping from command name to builtin implementation.
///
/// Populated once at startup and never mutated afterwards; lookups are pure
/// reads. The `type` builtin answers "is this a builtin?" against this live
/// table, so registering or removing a builtin automatically updates its
/// reporting.
pub struct Registry {
    table: HashMap<&'static str, Box<dyn Builtin>>,
}

impl Registry {
    /// Build a registry from an explicit list of builtins, keyed by their
    /// canonical names.
    pub fn new(builtins: Vec<Box<dyn Builtin>>) -> Self {
        let mut table = HashMap::new();
        for builtin in builtins {
            table.insert(builtin.name(), builtin);
        }
        Self { table }
    }

    /// The standard set: `exit`, `echo`, `type`, `pwd`, `cd`, wired to the
    /// provided capabilities.
    pub fn standard(
        control: Rc<dyn ProcessControl>,
        resolver: Rc<dyn PathResolver>,
        changer: Rc<dyn DirChanger>,
    ) -> Self {
        Self::new(vec![
            Box::new(Exit::new(control)),
            Box::new(Echo),
            Box::new(Type::new(resolver)),
            Box::new(Pwd),
            Box::new(Cd::new(changer)),
        ])
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Builtin> {
        self.table.get(name).map(|builtin| builtin.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{DeferredExit, ProcessDirChanger};
    use crate::external::PathSearch;

    fn standard_registry() -> Registry {
        Registry::standard(
            Rc::new(DeferredExit::default()),
            Rc::new(PathSearch),
            Rc::new(ProcessDirChanger),
        )
    }

    #[test]
    fn test_standard_registry_has_exactly_the_five_builtins() {
        let registry = standard_registry();
        for name in ["exit", "echo", "type", "pwd", "cd"] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
        assert_eq!(registry.table.len(), 5);
    }

    #[test]
    fn test_lookup_returns_builtin_with_matching_name() {
        let registry = standard_registry();
        assert_eq!(registry.lookup("cd").unwrap().name(), "cd");
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_exact() {
        let registry = standard_registry();
        assert!(registry.lookup("CD").is_none());
        assert!(registry.lookup("cdd").is_none());
        assert!(registry.lookup("").is_none());
    }
}
