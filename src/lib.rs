// bundle-task - build-pipeline task adapter around an external JS bundler
//
// The surrounding pipeline owns task sequencing, file watching, and config
// discovery; this crate owns one task: merge the user's bundler config with
// defaults, invoke the bundler, persist the bundle, and propagate the set of
// live source modules to sibling tasks.

pub mod bundler;
pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod paths;
pub mod task;
pub mod warnings;

pub use bundler::{Bundle, Bundler, EsbuildBundler};
pub use cache::{BundleCache, ModulePathCache};
pub use config::{BundlerConfig, TaskMeta, BUNDLE_TASK};
pub use context::BuildContext;
pub use error::{BuildTaskError, BundlerError, ConfigError, DeprecatedUsageError, WriteError};
pub use events::{Event, EventBus};
pub use task::BundleTask;
pub use warnings::WarningFilter;
