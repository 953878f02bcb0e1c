// Bundler capability - the delegated external bundler behind a trait

pub mod esbuild;

pub use esbuild::EsbuildBundler;

use crate::config::BundlerConfig;
use crate::error::BundlerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A produced bundle: the combined output artifact plus the set of source
/// modules that ended up in it.
///
/// `Clone` so the watch-mode cache slot can hand the previous bundle back out
/// as an incremental hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    /// Generated bundle code
    pub code: String,

    /// Source module paths included in the bundle
    pub modules: Vec<PathBuf>,

    /// Source map, present when the config asked for one
    pub source_map: Option<String>,
}

/// The external bundler, modeled as a capability so tests can substitute a
/// scripted fake for the real esbuild invocation.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Bundle the config's entry point and return the in-memory result.
    ///
    /// Implementations may consult `config.cache` as an incremental hint and
    /// should report diagnostics through `config.onwarn` when present.
    async fn bundle(&self, config: &BundlerConfig) -> Result<Bundle, BundlerError>;
}
