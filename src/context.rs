// Build context shared across pipeline tasks

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Process-wide build state, owned by the pipeline and shared with each task.
///
/// The bundle task reads the directories and mode flags and mutates the
/// module-file list as a side effect of bundling; downstream tasks (e.g. a
/// stylesheet task that needs to know which source files are live) read it
/// back.
#[derive(Debug)]
pub struct BuildContext {
    /// Directory that finished build artifacts are written under
    pub build_dir: PathBuf,

    /// Temp directory substituted for the `{tmp}` placeholder token
    pub tmp_dir: PathBuf,

    /// Production build (source transform assumed to have happened upstream)
    pub production: bool,

    /// Watch mode (incremental rebuilds on file change)
    pub watch: bool,

    /// Whether the cached bundle may be attached as a bundling hint
    pub use_bundle_cache: bool,

    /// CLI options forwarded by the pipeline, keyed by flag name
    cli_options: HashMap<String, String>,

    /// Source modules included in the last bundle, populated by the task
    module_files: Mutex<Vec<PathBuf>>,
}

impl BuildContext {
    pub fn new(build_dir: impl Into<PathBuf>, tmp_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            tmp_dir: tmp_dir.into(),
            production: false,
            watch: false,
            use_bundle_cache: false,
            cli_options: HashMap::new(),
            module_files: Mutex::new(Vec::new()),
        }
    }

    /// Record a CLI option so config resolution can consult it
    pub fn set_cli_option(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.cli_options.insert(flag.into(), value.into());
    }

    /// Look up a CLI option by flag name
    pub fn cli_option(&self, flag: &str) -> Option<&str> {
        self.cli_options.get(flag).map(String::as_str)
    }

    /// Replace the module-file list with the bundler-reported set
    pub fn set_module_files(&self, files: Vec<PathBuf>) {
        *self.module_files.lock() = files;
    }

    /// Snapshot of the module-file list from the last successful bundle
    pub fn module_files(&self) -> Vec<PathBuf> {
        self.module_files.lock().clone()
    }

    /// Whether `path` is inside the build output directory
    pub fn in_build_dir(&self, path: &Path) -> bool {
        path.starts_with(&self.build_dir)
    }
}
