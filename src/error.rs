// Error types for the bundler task adapter

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the bundle task
///
/// This is the primary error type returned by the task's entry points.
/// Individual error types are exposed through `From` conversions so the
/// pipeline's top-level failure handler can treat any task failure uniformly.
#[derive(Debug, Error)]
pub enum BuildTaskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Deprecated usage: {0}")]
    Deprecated(#[from] DeprecatedUsageError),

    #[error("Bundling failed: {0}")]
    Bundler(#[from] BundlerError),

    #[error("Bundle write failed: {0}")]
    Write(#[from] WriteError),
}

/// Errors while locating, loading, or merging the bundler config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("config file {path} is missing required field `{field}`")]
    MissingField {
        path: PathBuf,
        field: &'static str,
    },
}

/// Legacy configurations rejected before the bundler is invoked
///
/// These fail fast with actionable guidance rather than silently producing
/// wrong output.
#[derive(Debug, Error)]
pub enum DeprecatedUsageError {
    #[error(
        "entry `{0}` points into the legacy .tmp staging directory.\n\
         Point `entry` at the original source file instead (e.g. src/app/main.dev.ts);\n\
         the bundler now reads sources directly and the staging step has been removed."
    )]
    LegacyTmpEntry(PathBuf),

    #[error(
        "entry `{0}` is a plain JavaScript file, which development builds no longer accept.\n\
         Point `entry` at the TypeScript source (e.g. src/app/main.dev.ts); transpilation\n\
         is applied during bundling."
    )]
    PlainJsEntry(PathBuf),
}

/// Errors from the external bundler invocation
#[derive(Debug, Error)]
pub enum BundlerError {
    #[error(
        "esbuild not found. Install it with: npm install -g esbuild\n\
         esbuild is required to bundle the application sources."
    )]
    EsbuildNotFound,

    #[error("Bundle failed: {0}")]
    BundleFailed(String),

    #[error("Invalid metafile produced by bundler: {0}")]
    InvalidMetafile(String),
}

/// Errors while persisting the bundle to disk
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write bundle to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
