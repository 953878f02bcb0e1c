// Bundler configuration - file resolution, loading, and merging over defaults

use crate::bundler::Bundle;
use crate::context::BuildContext;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Warning-hook callback attached to a bundler invocation
pub type WarnHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Task descriptor naming the knobs that can override the config file
#[derive(Debug, Clone, Copy)]
pub struct TaskMeta {
    /// Default config filename, resolved in the project root
    pub config_file: &'static str,

    /// CLI flag carrying an alternative config path
    pub cli_flag: &'static str,

    /// Environment variable carrying an alternative config path
    pub env_var: &'static str,
}

/// Descriptor for the bundle task itself
pub const BUNDLE_TASK: TaskMeta = TaskMeta {
    config_file: "bundle.toml",
    cli_flag: "bundle-config",
    env_var: "BUNDLE_CONFIG",
};

/// User-facing config file shape; every field optional so absent fields fall
/// back to the defaults during merging
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBundlerConfig {
    entry: Option<PathBuf>,
    dest: Option<PathBuf>,
    format: Option<String>,
    source_map: Option<bool>,
    plugins: Option<Vec<String>>,
}

/// Fully merged configuration for one bundler invocation
///
/// Created fresh per invocation; the cache hint and warning hook are attached
/// by the task, never read from the config file. The whole value is dropped
/// at the end of the invocation scope.
#[derive(Clone)]
pub struct BundlerConfig {
    /// Root source file the bundler starts dependency resolution from
    pub entry: PathBuf,

    /// Destination path; `None` falls back to the default bundle name under
    /// the build directory
    pub dest: Option<PathBuf>,

    /// Output format (iife, cjs, esm)
    pub format: String,

    /// Whether to emit a source map
    pub source_map: bool,

    /// Ordered plugin list, applied front to back
    pub plugins: Vec<String>,

    /// Prior bundling state supplied to accelerate incremental rebuilds
    pub cache: Option<Bundle>,

    /// Warning hook; when absent the task attaches the deduplicating filter
    pub onwarn: Option<WarnHook>,
}

impl std::fmt::Debug for BundlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundlerConfig")
            .field("entry", &self.entry)
            .field("dest", &self.dest)
            .field("format", &self.format)
            .field("source_map", &self.source_map)
            .field("plugins", &self.plugins)
            .field("cache", &self.cache.as_ref().map(|_| "<bundle>"))
            .field("onwarn", &self.onwarn.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

/// Built-in defaults that absent user fields fall back to
const DEFAULT_FORMAT: &str = "iife";

/// Resolve the single config file to use.
///
/// Precedence: explicit path > CLI flag > environment variable > task default
/// filename in the project root.
pub fn resolve_config_path(
    ctx: &BuildContext,
    meta: &TaskMeta,
    explicit: Option<&Path>,
) -> PathBuf {
    resolve_with_env(ctx, meta, explicit, std::env::var(meta.env_var).ok())
}

fn resolve_with_env(
    ctx: &BuildContext,
    meta: &TaskMeta,
    explicit: Option<&Path>,
    env_value: Option<String>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(flag) = ctx.cli_option(meta.cli_flag) {
        return PathBuf::from(flag);
    }
    if let Some(env) = env_value {
        return PathBuf::from(env);
    }
    PathBuf::from(meta.config_file)
}

/// Load the resolved config file and merge it over the built-in defaults
pub fn load_config(path: &Path) -> Result<BundlerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: RawBundlerConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    merge_defaults(raw, path)
}

fn merge_defaults(raw: RawBundlerConfig, path: &Path) -> Result<BundlerConfig, ConfigError> {
    let entry = raw.entry.ok_or(ConfigError::MissingField {
        path: path.to_path_buf(),
        field: "entry",
    })?;

    Ok(BundlerConfig {
        entry,
        dest: raw.dest,
        format: raw.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        source_map: raw.source_map.unwrap_or(false),
        plugins: raw.plugins.unwrap_or_default(),
        cache: None,
        onwarn: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn explicit_path_wins_over_everything() {
        let mut ctx = BuildContext::new("dist", ".tmp");
        ctx.set_cli_option("bundle-config", "from-cli.toml");

        let resolved = resolve_with_env(
            &ctx,
            &BUNDLE_TASK,
            Some(Path::new("explicit.toml")),
            Some("from-env.toml".to_string()),
        );
        assert_eq!(resolved, PathBuf::from("explicit.toml"));
    }

    #[test]
    fn cli_flag_wins_over_env() {
        let mut ctx = BuildContext::new("dist", ".tmp");
        ctx.set_cli_option("bundle-config", "from-cli.toml");

        let resolved = resolve_with_env(
            &ctx,
            &BUNDLE_TASK,
            None,
            Some("from-env.toml".to_string()),
        );
        assert_eq!(resolved, PathBuf::from("from-cli.toml"));
    }

    #[test]
    fn env_wins_over_default() {
        let ctx = BuildContext::new("dist", ".tmp");
        let resolved =
            resolve_with_env(&ctx, &BUNDLE_TASK, None, Some("from-env.toml".to_string()));
        assert_eq!(resolved, PathBuf::from("from-env.toml"));
    }

    #[test]
    fn falls_back_to_task_default() {
        let ctx = BuildContext::new("dist", ".tmp");
        let resolved = resolve_with_env(&ctx, &BUNDLE_TASK, None, None);
        assert_eq!(resolved, PathBuf::from("bundle.toml"));
    }

    #[test]
    fn load_merges_absent_fields_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "bundle.toml", "entry = \"src/app/main.dev.ts\"\n");

        let config = load_config(&path).unwrap();
        assert_eq!(config.entry, PathBuf::from("src/app/main.dev.ts"));
        assert_eq!(config.dest, None);
        assert_eq!(config.format, "iife");
        assert!(!config.source_map);
        assert!(config.plugins.is_empty());
        assert!(config.cache.is_none());
        assert!(config.onwarn.is_none());
    }

    #[test]
    fn load_keeps_user_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "bundle.toml",
            "entry = \"src/app/main.dev.ts\"\n\
             dest = \"bundles/app.js\"\n\
             format = \"esm\"\n\
             source_map = true\n\
             plugins = [\"minify\"]\n",
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.dest, Some(PathBuf::from("bundles/app.js")));
        assert_eq!(config.format, "esm");
        assert!(config.source_map);
        assert_eq!(config.plugins, vec!["minify".to_string()]);
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = load_config(Path::new("/nonexistent/bundle.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn unparseable_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "bundle.toml", "entry = [broken\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_entry_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "bundle.toml", "format = \"esm\"\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::MissingField { field: "entry", .. })
        ));
    }
}
