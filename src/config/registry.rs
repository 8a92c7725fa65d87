use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::RegistryError;
use crate::traits::OperatorFactory;

/// Catalogue of operator factories, keyed by operator type name.
///
/// The registry is append-only: factories are registered during start-up,
/// then the registry is frozen into an `Arc` and handed to one or more
/// engines. A frozen registry offers no mutation, so graphs built from it
/// always see the same set of operators.
///
/// # Examples
/// ```
/// use the_dagstream::config::OperatorRegistry;
/// use the_dagstream::errors::RegistryError;
///
/// let mut registry = OperatorRegistry::with_builtin_operators();
/// assert!(registry.contains("sink/printer"));
///
/// let err = the_dagstream::backends::local::register_builtin_operators(&mut registry).unwrap_err();
/// assert!(matches!(err, RegistryError::DuplicateOperator { .. }));
///
/// let registry = registry.freeze();
/// assert!(registry.lookup("source/sequence").is_ok());
/// ```
#[derive(Default)]
pub struct OperatorRegistry {
    factories: HashMap<String, Arc<dyn OperatorFactory>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry pre-populated with the operators shipped in `backends::local`.
    pub fn with_builtin_operators() -> Self {
        let mut registry = Self::new();
        // An empty registry cannot hold a duplicate.
        let _ = crate::backends::local::register_builtin_operators(&mut registry);
        registry
    }

    /// Register a factory under its own name.
    pub fn register<F>(&mut self, factory: F) -> Result<(), RegistryError>
    where
        F: OperatorFactory + 'static,
    {
        self.register_shared(Arc::new(factory))
    }

    /// Register an already shared factory.
    pub fn register_shared(
        &mut self,
        factory: Arc<dyn OperatorFactory>,
    ) -> Result<(), RegistryError> {
        let name = factory.name().to_string();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::DuplicateOperator { name });
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Resolve the factory for an operator type name.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn OperatorFactory>, RegistryError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownOperator {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered operator type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// End the registration phase.
    pub fn freeze(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operator_count", &self.factories.len())
            .field("operators", &self.names())
            .finish()
    }
}
