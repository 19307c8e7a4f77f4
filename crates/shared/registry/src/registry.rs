//! The typed key/value store every namespace is made of.

use crate::error::RegistryError;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Shared, type-erased registry value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Snapshot of a registry's contents, in insertion order.
pub type Entries = IndexMap<String, Value>;

/// The single value type a registry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedType {
    id: TypeId,
    name: &'static str,
}

impl ExpectedType {
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self { id: TypeId::of::<T>(), name: type_name::<T>() }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    fn admits(&self, value: &Value) -> bool {
        Any::type_id(&**value) == self.id
    }
}

/// Ordered key/value store with an optional value type and optional overwrite permission.
///
/// Keys are never removed. Without overwrite permission a key, once created, keeps its
/// value for the lifetime of the registry.
///
/// ```rust
/// use wirekit_registry::{ExpectedType, Registry};
///
/// let colors = Registry::new(Some(ExpectedType::of::<String>()), false);
/// colors.create("primary", String::from("#0af")).unwrap();
///
/// assert_eq!(*colors.find_as::<String>("primary").unwrap(), "#0af");
/// assert!(colors.create("primary", String::from("#fa0")).is_err());
/// assert!(colors.create("size", 12_u32).is_err());
/// ```
pub struct Registry {
    entries: RwLock<Entries>,
    expected: Option<ExpectedType>,
    allow_overwrite: bool,
}

impl Registry {
    #[must_use]
    pub fn new(expected: Option<ExpectedType>, allow_overwrite: bool) -> Self {
        Self { entries: RwLock::new(IndexMap::new()), expected, allow_overwrite }
    }

    /// Registry accepting any value type, without overwrite permission.
    #[must_use]
    pub fn untyped() -> Self {
        Self::new(None, false)
    }

    /// Registry accepting only `T`.
    #[must_use]
    pub fn typed<T: Any>(allow_overwrite: bool) -> Self {
        Self::new(Some(ExpectedType::of::<T>()), allow_overwrite)
    }

    /// Stores `value` under a new key.
    ///
    /// # Errors
    /// [`RegistryError::TypeMismatch`] when the registry is typed for something else,
    /// [`RegistryError::DuplicateKey`] when the key is taken.
    pub fn create<T: Any + Send + Sync>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<&Self, RegistryError> {
        self.create_value(key, Arc::new(value))
    }

    /// Type-erased form of [`Registry::create`].
    ///
    /// # Errors
    /// See [`Registry::create`].
    pub fn create_value(&self, key: impl Into<String>, value: Value) -> Result<&Self, RegistryError> {
        self.set(key.into(), value, false)?;
        Ok(self)
    }

    /// Applies every pair in order; stops at the first failure, keeping what was stored.
    ///
    /// # Errors
    /// The first error [`Registry::create_value`] reports.
    pub fn create_all<K, I>(&self, pairs: I) -> Result<&Self, RegistryError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        for (key, value) in pairs {
            self.set(key.into(), value, false)?;
        }
        Ok(self)
    }

    /// Replaces (or creates) `key`.
    ///
    /// # Errors
    /// [`RegistryError::ModifyDenied`] when the registry was built without overwrite
    /// permission, [`RegistryError::TypeMismatch`] as for [`Registry::create`].
    pub fn modify<T: Any + Send + Sync>(
        &self,
        key: impl Into<String>,
        value: T,
    ) -> Result<&Self, RegistryError> {
        self.modify_value(key, Arc::new(value))
    }

    /// Type-erased form of [`Registry::modify`].
    ///
    /// # Errors
    /// See [`Registry::modify`].
    pub fn modify_value(&self, key: impl Into<String>, value: Value) -> Result<&Self, RegistryError> {
        let key = key.into();
        if !self.allow_overwrite {
            return Err(RegistryError::modify_denied(format!(
                "'{key}' cannot be redefined, the registry is read-only once written"
            )));
        }
        self.set(key, value, true)?;
        Ok(self)
    }

    fn set(&self, key: String, value: Value, overwrite: bool) -> Result<(), RegistryError> {
        if let Some(expected) = &self.expected
            && !expected.admits(&value)
        {
            return Err(RegistryError::type_mismatch(format!(
                "cannot store '{key}', it is not a `{}`",
                expected.name
            )));
        }

        let mut entries = self.entries.write();
        if !overwrite && entries.contains_key(&key) {
            return Err(RegistryError::duplicate_key(format!(
                "'{key}' already exists and cannot be redefined"
            )));
        }
        trace!(key = %key, overwrite, "Storing registry entry");
        entries.insert(key, value);
        Ok(())
    }

    /// # Errors
    /// [`RegistryError::NotFound`] when the key was never created.
    pub fn find(&self, key: &str) -> Result<Value, RegistryError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(format!("'{key}' does not exist")))
    }

    /// Looks up `key` and downcasts it.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] for missing keys, [`RegistryError::TypeMismatch`] when
    /// the stored value is not a `T`.
    pub fn find_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        self.find(key)?.downcast::<T>().map_err(|_| {
            RegistryError::type_mismatch(format!("'{key}' is not a `{}`", type_name::<T>()))
        })
    }

    /// Snapshot of every entry. Later writes do not show up in the returned map.
    #[must_use]
    pub fn entries(&self) -> Entries {
        self.entries.read().clone()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[must_use]
    pub const fn expected_type(&self) -> Option<ExpectedType> {
        self.expected
    }

    #[must_use]
    pub const fn allows_overwrite(&self) -> bool {
        self.allow_overwrite
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::untyped()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.keys())
            .field("expected", &self.expected.map(|e| e.name))
            .field("allow_overwrite", &self.allow_overwrite)
            .finish()
    }
}
