use crate::config::KernelConfig;
use crate::directive::bind_directives;
use crate::error::{KernelError, KernelErrorExt};
use crate::mapper::{map_modules_to_elements, select_module_elements};
use crate::module::{DIRECTIVE, Directive, MIDDLEWARE, MODULE, Middleware, ModuleFactory};
use crate::scope::ModuleScope;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};
use wirekit_dom::{Document, NodeId};
use wirekit_registry::{ExpectedType, Importer, Namespaces, Options, Registry, RegistryError};

#[derive(Debug)]
struct KernelInner {
    config: KernelConfig,
    document: Document,
    namespaces: Namespaces,
    next_id: AtomicU64,
    instances: RwLock<Vec<ModuleScope>>,
}

/// The framework instance: a document, its namespaces and the scopes bootstrapped on it.
///
/// ```rust
/// use wirekit_dom::Markup;
/// use wirekit_kernel::Kernel;
///
/// let kernel = Kernel::builder().build().unwrap();
/// let doc = kernel.document();
/// doc.mount(doc.root(), Markup::element("section").attr("module", "hello")).unwrap();
///
/// kernel
///     .register_module("hello", |scope| {
///         scope.set_data("greeting", serde_json::json!("hi"));
///         Ok(scope)
///     })
///     .unwrap();
///
/// let scopes = kernel.init().unwrap();
/// assert_eq!(scopes.len(), 1);
/// assert_eq!(scopes[0].id(), "module-1");
/// ```
#[derive(Debug, Clone)]
pub struct Kernel {
    inner: Arc<KernelInner>,
}

impl Kernel {
    #[must_use]
    pub fn builder() -> KernelBuilder {
        KernelBuilder::default()
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    #[must_use]
    pub fn namespaces(&self) -> &Namespaces {
        &self.inner.namespaces
    }

    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn options(&self) -> Options {
        self.inner.namespaces.options()
    }

    pub fn set_options(&self, options: Options) {
        self.inner.namespaces.set_options(options);
    }

    /// See [`Namespaces::log`].
    pub fn log(&self, message: impl fmt::Display) -> bool {
        self.inner.namespaces.log(message)
    }

    // --- Namespaces ---

    /// See [`Namespaces::create_namespace`].
    ///
    /// # Errors
    /// [`KernelError::Registry`] wrapping a duplicate name.
    pub fn create_namespace(
        &self,
        name: &str,
        expected: Option<ExpectedType>,
        modify: Option<bool>,
    ) -> Result<Arc<Registry>, KernelError> {
        Ok(self.inner.namespaces.create_namespace(name, expected, modify)?)
    }

    /// # Errors
    /// [`KernelError::Registry`] wrapping [`RegistryError::UnknownNamespace`].
    pub fn namespace(&self, name: &str) -> Result<Arc<Registry>, KernelError> {
        Ok(self.inner.namespaces.namespace(name)?)
    }

    /// # Errors
    /// [`KernelError::Registry`] wrapping [`RegistryError::UnknownNamespace`].
    pub fn from(&self, name: &str) -> Result<Importer, KernelError> {
        Ok(self.inner.namespaces.from(name)?)
    }

    /// # Errors
    /// [`KernelError::Registry`] when the name is taken.
    pub fn register_module<F>(&self, name: &str, factory: F) -> Result<&Self, KernelError>
    where
        F: Fn(ModuleScope) -> Result<ModuleScope, KernelError> + Send + Sync + 'static,
    {
        self.namespace(MODULE)?.create(name, ModuleFactory::new(factory))?;
        Ok(self)
    }

    /// # Errors
    /// [`KernelError::Registry`] when the name is taken.
    pub fn register_middleware(&self, name: &str, middleware: Middleware) -> Result<&Self, KernelError> {
        self.namespace(MIDDLEWARE)?.create(name, middleware)?;
        Ok(self)
    }

    /// # Errors
    /// [`KernelError::Registry`] when the name is taken.
    pub fn register_directive(&self, name: &str, directive: Directive) -> Result<&Self, KernelError> {
        self.namespace(DIRECTIVE)?.create(name, directive)?;
        Ok(self)
    }

    /// # Errors
    /// [`KernelError::Registry`] when no middleware is called `name`.
    pub fn middleware(&self, name: &str) -> Result<Arc<Middleware>, KernelError> {
        self.from(MIDDLEWARE)?.import_as::<Middleware>(name).context("looking up middleware")
    }

    // --- Lifecycle ---

    /// Builds a fresh scope for `name` rooted at `element`, with the next id.
    #[must_use]
    pub fn create_scope(&self, name: &str, element: NodeId) -> ModuleScope {
        let n = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        ModuleScope::new(
            format!("{}{n}", self.inner.config.id_prefix),
            name.to_owned(),
            element,
            self.inner.document.clone(),
            self.inner.namespaces.clone(),
        )
    }

    /// Every scope bootstrapped by this kernel so far, in initialization order.
    #[must_use]
    pub fn instances(&self) -> Vec<ModuleScope> {
        self.inner.instances.read().clone()
    }

    /// Discovers module elements and initializes one scope per module name.
    ///
    /// Per module: create the scope, run the factory, check the contract, run `init`,
    /// `listen`, bind directives. The first failure stops bootstrap; scopes initialized
    /// before it stay registered and bound. Returns the scopes initialized by this call.
    ///
    /// # Errors
    /// [`KernelError::MissingModuleAttribute`], [`KernelError::Registry`] for unknown
    /// modules, [`KernelError::ContractViolation`], or whatever a factory, hook or
    /// directive reports.
    pub fn init(&self) -> Result<Vec<ModuleScope>, KernelError> {
        let attributes = &self.inner.config.attributes;
        let elements = select_module_elements(&self.inner.document, attributes);
        if elements.is_empty() {
            debug!("No module elements found");
            return Ok(Vec::new());
        }

        let descriptors = map_modules_to_elements(&self.inner.document, &elements, attributes)?;
        let modules = self.namespace(MODULE)?;
        let directives = self.namespace(DIRECTIVE)?;

        let mut initialized = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let scope = self.create_scope(&descriptor.name, descriptor.element);
            let factory = modules
                .find_as::<ModuleFactory>(&descriptor.name)
                .map_err(|err| match err {
                    RegistryError::NotFound { .. } => RegistryError::not_found(format!(
                        "module '{}' is not registered",
                        descriptor.name
                    )),
                    other => other,
                })
                .context("bootstrapping modules")?;

            let module = factory.call(scope)?;
            if module.is_destroyed() {
                return Err(KernelError::contract_violation(format!(
                    "module {} returned a destroyed scope, a live scope was expected",
                    descriptor.name
                )));
            }

            module.init()?;
            self.log(format_args!("Initialized module: {}", descriptor.name));
            info!(module = %descriptor.name, scope = %module.id(), "Initialized module");

            module.listen()?;
            bind_directives(&module, &directives, attributes)?;

            self.inner.instances.write().push(module.clone());
            initialized.push(module);
        }

        Ok(initialized)
    }
}

#[derive(Debug, Default)]
pub struct KernelBuilder {
    config: Option<KernelConfig>,
    document: Option<Document>,
    namespaces: Option<Namespaces>,
}

impl KernelBuilder {
    #[must_use]
    pub fn config(mut self, config: KernelConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    /// Shares an existing namespace table. The built-in namespaces are added when missing.
    #[must_use]
    pub fn namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = Some(namespaces);
        self
    }

    /// # Errors
    /// [`KernelError::InvalidArguments`] for an empty id prefix or empty attribute names.
    pub fn build(self) -> Result<Kernel, KernelError> {
        let config = self.config.unwrap_or_default();
        let attributes = &config.attributes;
        if config.id_prefix.trim().is_empty() {
            return Err(KernelError::invalid_arguments("id_prefix must not be empty"));
        }
        if [&attributes.module, &attributes.data_module, &attributes.module_id]
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(KernelError::invalid_arguments("attribute names must not be empty"));
        }

        let namespaces = self.namespaces.unwrap_or_default();
        namespaces.set_options(config.options);
        ensure_namespace::<ModuleFactory>(&namespaces, MODULE)?;
        ensure_namespace::<Middleware>(&namespaces, MIDDLEWARE)?;
        ensure_namespace::<Directive>(&namespaces, DIRECTIVE)?;

        debug!(id_prefix = %config.id_prefix, namespaces = ?namespaces.names(), "Kernel built");

        Ok(Kernel {
            inner: Arc::new(KernelInner {
                config,
                document: self.document.unwrap_or_default(),
                namespaces,
                next_id: AtomicU64::new(0),
                instances: RwLock::new(Vec::new()),
            }),
        })
    }
}

fn ensure_namespace<T: 'static>(namespaces: &Namespaces, name: &str) -> Result<(), KernelError> {
    if !namespaces.has_namespace(name) {
        namespaces.create_namespace_of::<T>(name, Some(true))?;
    }
    Ok(())
}
