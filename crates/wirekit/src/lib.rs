//! Facade crate for the `WireKit` module framework.
//! Re-exports the document, registry and kernel crates and aggregates feature registration.
//! Keep this crate thin: it should compose other crates, not implement behaviour.
//!
//! ## Usage
//! - Add `wirekit` with the desired feature flags (`templating` is on by default).
//! - Build a [`Kernel`], call [`wirekit::init`](init) to register the enabled features,
//!   register modules, then bootstrap with [`Kernel::init`].

pub use wirekit_dom as dom;
pub use wirekit_kernel as kernel;
pub use wirekit_kernel::{Kernel, KernelError, ModuleScope};
pub use wirekit_registry as registry;

/// Feature registry for runtime introspection.
pub mod features {
    #[cfg(feature = "templating")]
    pub use wirekit_templating as templating;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "templating")]
        "templating",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Registers every enabled feature on `kernel`. Returns the names of the registered
/// features.
///
/// # Errors
/// Returns the first feature registration error, e.g. a middleware or directive name
/// already taken on this kernel.
pub fn init(kernel: &Kernel) -> Result<Vec<&'static str>, KernelError> {
    let mut initialized = Vec::with_capacity(features::ENABLED.len());

    // Templating
    #[cfg(feature = "templating")]
    {
        features::templating::init(kernel)?;
        initialized.push("templating");
    }

    tracing::debug!(features = ?initialized, "Features initialized");
    Ok(initialized)
}
