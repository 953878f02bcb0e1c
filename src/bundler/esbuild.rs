// esbuild integration - shells out to the esbuild CLI

use crate::bundler::{Bundle, Bundler};
use crate::config::BundlerConfig;
use crate::error::BundlerError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use which::which;

/// Plugin name injected for non-production builds; inlines component
/// templates and stylesheets as text so they ship inside the bundle.
pub const SOURCE_TRANSFORM_PLUGIN: &str = "source-transform";

/// esbuild-backed bundler
///
/// Bundles the entry point to stdout and recovers the module list from an
/// esbuild metafile written into a scratch directory.
pub struct EsbuildBundler {
    /// Path to the esbuild executable
    esbuild_path: PathBuf,
}

impl EsbuildBundler {
    /// Create a new bundler by detecting esbuild
    ///
    /// # Errors
    ///
    /// Returns `BundlerError::EsbuildNotFound` if esbuild is not installed
    /// or not in PATH.
    pub fn new() -> Result<Self, BundlerError> {
        let esbuild_path = which("esbuild").map_err(|_| BundlerError::EsbuildNotFound)?;
        Ok(Self { esbuild_path })
    }

    /// Create a bundler with a specific esbuild path
    ///
    /// This is useful for testing or when esbuild is not in PATH.
    pub fn with_esbuild_path(esbuild_path: PathBuf) -> Self {
        Self { esbuild_path }
    }

    /// Translate a config plugin name into esbuild CLI arguments.
    ///
    /// Raw `--` flags pass through verbatim so configs can reach esbuild
    /// options this adapter has no name for.
    fn plugin_args(name: &str) -> Result<Vec<String>, BundlerError> {
        match name {
            SOURCE_TRANSFORM_PLUGIN => Ok(vec![
                "--loader:.html=text".to_string(),
                "--loader:.css=text".to_string(),
            ]),
            "minify" => Ok(vec!["--minify".to_string()]),
            raw if raw.starts_with("--") => Ok(vec![raw.to_string()]),
            other => Err(BundlerError::BundleFailed(format!(
                "unknown plugin `{other}` in bundler config"
            ))),
        }
    }

    fn parse_metafile(text: &str) -> Result<Vec<PathBuf>, BundlerError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| BundlerError::InvalidMetafile(e.to_string()))?;

        let inputs = value
            .get("inputs")
            .and_then(|v| v.as_object())
            .ok_or_else(|| BundlerError::InvalidMetafile("missing `inputs` map".to_string()))?;

        Ok(inputs.keys().map(PathBuf::from).collect())
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, config: &BundlerConfig) -> Result<Bundle, BundlerError> {
        // esbuild's CLI has no incremental mode; the cache hint only helps
        // in-process bundler implementations.
        if config.cache.is_some() {
            tracing::debug!("ignoring bundle cache hint: esbuild CLI rebuilds from scratch");
        }

        let scratch = tempfile::tempdir()
            .map_err(|e| BundlerError::BundleFailed(format!("failed to create scratch dir: {e}")))?;
        let metafile = scratch.path().join("meta.json");

        let mut cmd = Command::new(&self.esbuild_path);
        cmd.arg(&config.entry);
        cmd.arg("--bundle");
        cmd.arg(format!("--format={}", config.format));
        cmd.arg(format!("--metafile={}", metafile.display()));

        // Bundle goes to stdout, so an external map file is not an option.
        if config.source_map {
            cmd.arg("--sourcemap=inline");
        }

        for plugin in &config.plugins {
            for arg in Self::plugin_args(plugin)? {
                cmd.arg(arg);
            }
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| BundlerError::BundleFailed(format!("failed to execute esbuild: {e}")))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(BundlerError::BundleFailed(format!(
                "esbuild failed: {}",
                stderr.trim()
            )));
        }

        // esbuild reports warnings on stderr even on success
        if let Some(onwarn) = &config.onwarn {
            for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                onwarn(line);
            }
        }

        let code = String::from_utf8_lossy(&output.stdout).into_owned();

        let meta_text = std::fs::read_to_string(&metafile)
            .map_err(|e| BundlerError::InvalidMetafile(format!("metafile unreadable: {e}")))?;
        let modules = Self::parse_metafile(&meta_text)?;

        Ok(Bundle {
            code,
            modules,
            source_map: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_transform_plugin_maps_to_text_loaders() {
        let args = EsbuildBundler::plugin_args(SOURCE_TRANSFORM_PLUGIN).unwrap();
        assert!(args.contains(&"--loader:.html=text".to_string()));
        assert!(args.contains(&"--loader:.css=text".to_string()));
    }

    #[test]
    fn raw_flags_pass_through() {
        let args = EsbuildBundler::plugin_args("--target=es2020").unwrap();
        assert_eq!(args, vec!["--target=es2020".to_string()]);
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        let result = EsbuildBundler::plugin_args("rollup-plugin-node-resolve");
        assert!(matches!(result, Err(BundlerError::BundleFailed(_))));
    }

    #[test]
    fn metafile_inputs_become_module_paths() {
        let meta = r#"{
            "inputs": {
                "src/app/main.dev.ts": {"bytes": 120},
                "src/app/util.ts": {"bytes": 48}
            },
            "outputs": {}
        }"#;

        let modules = EsbuildBundler::parse_metafile(meta).unwrap();
        assert!(modules.contains(&PathBuf::from("src/app/main.dev.ts")));
        assert!(modules.contains(&PathBuf::from("src/app/util.ts")));
        assert_eq!(modules.len(), 2);
    }

    #[test]
    fn metafile_without_inputs_is_invalid() {
        let result = EsbuildBundler::parse_metafile(r#"{"outputs": {}}"#);
        assert!(matches!(result, Err(BundlerError::InvalidMetafile(_))));
    }

    #[tokio::test]
    async fn missing_esbuild_binary_fails_bundle() {
        let bundler = EsbuildBundler::with_esbuild_path(PathBuf::from("/nonexistent/esbuild"));
        let config = BundlerConfig {
            entry: PathBuf::from("src/app/main.dev.ts"),
            dest: None,
            format: "iife".to_string(),
            source_map: false,
            plugins: vec![],
            cache: None,
            onwarn: None,
        };

        let result = bundler.bundle(&config).await;
        assert!(matches!(result, Err(BundlerError::BundleFailed(_))));
    }
}
