//! Runtime hooks a concrete specification may carry
//!
//! These are opaque to the specification layer. They are stored, compared by
//! identity, and handed to the loading subsystem unchanged.

use std::fmt;

/// Consulted when neither a dependency nor a local resource satisfies a lookup
pub trait LocalLoader: fmt::Debug + Send + Sync {
    /// Load class bytes by binary name
    fn load_class(&self, name: &str) -> Option<Vec<u8>>;

    /// Load a resource by `/`-separated path
    fn load_resource(&self, path: &str) -> Option<Vec<u8>>;
}

/// Strategy for constructing a module's runtime loader
pub trait ModuleLoaderFactory: fmt::Debug + Send + Sync {
    /// Build the runtime loader for the named module
    fn create(&self, module_name: &str) -> Box<dyn LocalLoader>;
}

/// Rewrites class bytes as they are loaded
pub trait ClassTransformer: fmt::Debug + Send + Sync {
    /// Return replacement bytes, or `None` to keep the original
    fn transform(&self, class_name: &str, bytes: &[u8]) -> Option<Vec<u8>>;
}
