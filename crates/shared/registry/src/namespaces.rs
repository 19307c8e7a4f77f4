//! The namespace table: one untyped, non-overwriting root registry whose values are
//! the named registries modules, middleware and directives are looked up from.

use crate::error::RegistryError;
use crate::options::Options;
use crate::registry::{Entries, ExpectedType, Registry, Value};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of [`Importer::import`], shaped by how many names were asked for.
#[derive(Debug, Clone)]
pub enum Import {
    /// No names: the whole namespace.
    All(Entries),
    One(Value),
    /// Two or more names, keyed by name in request order.
    Many(IndexMap<String, Value>),
}

impl Import {
    /// The single value of an [`Import::One`].
    #[must_use]
    pub fn into_one(self) -> Option<Value> {
        match self {
            Self::One(value) => Some(value),
            _ => None,
        }
    }

    /// Flattens any shape into a name-keyed map. `One` has no name and yields an empty map.
    #[must_use]
    pub fn into_map(self) -> IndexMap<String, Value> {
        match self {
            Self::All(map) | Self::Many(map) => map,
            Self::One(_) => IndexMap::new(),
        }
    }
}

/// Import handle bound to one namespace, returned by [`Namespaces::from`].
#[derive(Debug, Clone)]
pub struct Importer {
    name: String,
    registry: Arc<Registry>,
}

impl Importer {
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.name
    }

    /// # Errors
    /// [`RegistryError::NotFound`] for the first name that does not exist.
    pub fn import(&self, names: &[&str]) -> Result<Import, RegistryError> {
        match names {
            [] => Ok(Import::All(self.registry.entries())),
            [one] => self.find(one).map(Import::One),
            many => many
                .iter()
                .map(|name| Ok(((*name).to_owned(), self.find(name)?)))
                .collect::<Result<IndexMap<_, _>, RegistryError>>()
                .map(Import::Many),
        }
    }

    /// Imports one name and downcasts it.
    ///
    /// # Errors
    /// As [`Registry::find_as`].
    pub fn import_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        self.registry.find_as::<T>(name).map_err(|err| self.annotate(err))
    }

    fn find(&self, name: &str) -> Result<Value, RegistryError> {
        self.registry.find(name).map_err(|err| self.annotate(err))
    }

    fn annotate(&self, err: RegistryError) -> RegistryError {
        let context = Some(self.name.clone().into());
        match err {
            RegistryError::NotFound { message, .. } => RegistryError::NotFound { message, context },
            RegistryError::TypeMismatch { message, .. } => {
                RegistryError::TypeMismatch { message, context }
            },
            other => other,
        }
    }
}

/// The namespace table plus global [`Options`].
///
/// Cloning is cheap; clones share the same table.
///
/// ```rust
/// use wirekit_registry::{Import, Namespaces};
///
/// let ns = Namespaces::new();
/// ns.create_namespace_of::<String>("Greeting", None).unwrap();
/// ns.namespace("Greeting").unwrap().create("hello", String::from("world")).unwrap();
///
/// let Import::One(value) = ns.from("Greeting").unwrap().import(&["hello"]).unwrap() else {
///     unreachable!()
/// };
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("world"));
/// ```
#[derive(Clone, Default)]
pub struct Namespaces {
    inner: Arc<NamespacesInner>,
}

#[derive(Default)]
struct NamespacesInner {
    root: Registry,
    options: RwLock<Options>,
}

impl Namespaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: Options) -> Self {
        let namespaces = Self::default();
        namespaces.set_options(options);
        namespaces
    }

    /// Creates and registers a namespace.
    ///
    /// `modify` defaults to `true`; an explicit `false` yields a write-once namespace.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateKey`] when `name` is already a namespace.
    pub fn create_namespace(
        &self,
        name: &str,
        expected: Option<ExpectedType>,
        modify: Option<bool>,
    ) -> Result<Arc<Registry>, RegistryError> {
        let registry = Arc::new(Registry::new(expected, modify.unwrap_or(true)));
        self.inner
            .root
            .create_value(name, Arc::clone(&registry) as Value)
            .map_err(|err| match err {
                RegistryError::DuplicateKey { .. } => {
                    RegistryError::duplicate_key(format!("namespace '{name}' already exists"))
                },
                other => other,
            })?;

        debug!(
            namespace = name,
            expected = expected.map(|e| e.name()),
            modify = registry.allows_overwrite(),
            "Created namespace"
        );
        Ok(registry)
    }

    /// [`Namespaces::create_namespace`] typed for `T`.
    ///
    /// # Errors
    /// As [`Namespaces::create_namespace`].
    pub fn create_namespace_of<T: Any>(
        &self,
        name: &str,
        modify: Option<bool>,
    ) -> Result<Arc<Registry>, RegistryError> {
        self.create_namespace(name, Some(ExpectedType::of::<T>()), modify)
    }

    /// [`Namespaces::create_namespace`] accepting any value type.
    ///
    /// # Errors
    /// As [`Namespaces::create_namespace`].
    pub fn create_untyped_namespace(
        &self,
        name: &str,
        modify: Option<bool>,
    ) -> Result<Arc<Registry>, RegistryError> {
        self.create_namespace(name, None, modify)
    }

    /// # Errors
    /// [`RegistryError::UnknownNamespace`] when no namespace is called `name`.
    pub fn namespace(&self, name: &str) -> Result<Arc<Registry>, RegistryError> {
        self.inner.root.find_as::<Registry>(name).map_err(|_| {
            RegistryError::unknown_namespace(format!("'{name}' is not an existing namespace"))
        })
    }

    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        self.inner.root.contains(name)
    }

    /// Namespace names in creation order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner.root.keys()
    }

    /// # Errors
    /// [`RegistryError::UnknownNamespace`] when no namespace is called `name`.
    pub fn from(&self, name: &str) -> Result<Importer, RegistryError> {
        Ok(Importer { name: name.to_owned(), registry: self.namespace(name)? })
    }

    #[must_use]
    pub fn options(&self) -> Options {
        *self.inner.options.read()
    }

    pub fn set_options(&self, options: Options) {
        *self.inner.options.write() = options;
    }

    /// Emits `message` at `info` level on the `wirekit` target, only while
    /// [`Options::log_enabled`] is set. Returns whether anything was emitted.
    pub fn log(&self, message: impl fmt::Display) -> bool {
        if !self.options().log_enabled {
            return false;
        }
        info!(target: "wirekit", "{message}");
        true
    }
}

impl fmt::Debug for Namespaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespaces")
            .field("names", &self.names())
            .field("options", &self.options())
            .finish()
    }
}
