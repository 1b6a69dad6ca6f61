//! Process-wide registry
//!
//! The free functions at the crate root all read one shared [`Registry`].
//! It is parsed from the embedded snapshot the first time any of them runs,
//! unless [`install`] put another registry in place before that.

use std::sync::OnceLock;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The shared registry, parsing the embedded snapshot on first use
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        log::debug!("Parsing embedded USB ID registry");
        Registry::embedded()
    })
}

/// Use `registry` as the shared registry instead of the embedded snapshot
///
/// Must run before anything reads the shared registry. Fails with
/// [`RegistryError::AlreadyInitialized`] once it has been built or installed.
pub fn install(registry: Registry) -> Result<&'static Registry> {
    let mut candidate = Some(registry);
    let installed = REGISTRY.get_or_init(|| {
        // Only taken when this call wins initialization
        candidate.take().unwrap_or_else(Registry::embedded)
    });

    match candidate {
        None => Ok(installed),
        Some(_) => Err(RegistryError::AlreadyInitialized),
    }
}

/// Whether the shared registry has been built or installed yet
pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}
