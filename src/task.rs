// Bundle task orchestration - config, normalization, invocation, persistence

use crate::bundler::esbuild::SOURCE_TRANSFORM_PLUGIN;
use crate::bundler::Bundler;
use crate::cache::{BundleCache, ModulePathCache};
use crate::config::{self, TaskMeta, WarnHook, BUNDLE_TASK};
use crate::context::BuildContext;
use crate::error::{BuildTaskError, DeprecatedUsageError, WriteError};
use crate::events::{Event, EventBus};
use crate::paths;
use crate::warnings::WarningFilter;
use std::path::Path;
use std::sync::Arc;

/// The bundler task adapter.
///
/// Wires config resolution, path normalization, the warning filter, and the
/// bundle cache around one call into the injected bundler, then persists the
/// result and propagates the module list to the rest of the build.
///
/// Invocations are logically sequential; callers serialize rebuild triggers
/// rather than running this concurrently against the same cache slot.
pub struct BundleTask {
    bundler: Arc<dyn Bundler>,
    cache: Arc<BundleCache>,
    module_paths: Arc<ModulePathCache>,
    events: Arc<EventBus>,
    meta: TaskMeta,
    onwarn: Option<WarnHook>,
}

impl BundleTask {
    pub fn new(
        bundler: Arc<dyn Bundler>,
        cache: Arc<BundleCache>,
        module_paths: Arc<ModulePathCache>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            bundler,
            cache,
            module_paths,
            events,
            meta: BUNDLE_TASK,
            onwarn: None,
        }
    }

    /// Override the task descriptor (config filename, CLI flag, env var)
    pub fn with_meta(mut self, meta: TaskMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Supply a custom warning hook instead of the deduplicating filter
    pub fn with_onwarn(mut self, onwarn: WarnHook) -> Self {
        self.onwarn = Some(onwarn);
        self
    }

    /// Run the bundling operation once.
    ///
    /// `explicit_config` overrides every other config-file source; see
    /// [`config::resolve_config_path`] for the full precedence chain.
    pub async fn run(
        &self,
        ctx: &BuildContext,
        explicit_config: Option<&Path>,
    ) -> Result<(), BuildTaskError> {
        let result = self.bundle_once(ctx, explicit_config).await;
        if let Err(err) = &result {
            // Stale incremental state must not leak into the next invocation.
            self.cache.clear();
            tracing::debug!(error = %err, "bundle task failed; cache slot cleared");
        }
        result
    }

    /// Run the bundling operation in response to a file-change event.
    ///
    /// Changes under the build output directory are our own writes and do
    /// not trigger a rebuild.
    pub async fn on_change(
        &self,
        ctx: &BuildContext,
        changed: &Path,
    ) -> Result<(), BuildTaskError> {
        if ctx.in_build_dir(changed) {
            tracing::debug!(path = %changed.display(), "ignoring change to build output");
            return Ok(());
        }

        tracing::debug!(path = %changed.display(), "rebuilding after file change");
        self.run(ctx, None).await
    }

    async fn bundle_once(
        &self,
        ctx: &BuildContext,
        explicit_config: Option<&Path>,
    ) -> Result<(), BuildTaskError> {
        let config_path = config::resolve_config_path(ctx, &self.meta, explicit_config);
        let mut config = config::load_config(&config_path)?;

        let dest = paths::resolve_dest(config.dest.as_deref(), &ctx.build_dir);
        let dest = paths::expand_placeholders(&dest, ctx);
        config.entry = paths::expand_placeholders(&config.entry, ctx);

        // Production builds receive already-transformed sources from an
        // upstream task; development builds transform during bundling.
        if !ctx.production {
            config
                .plugins
                .insert(0, SOURCE_TRANSFORM_PLUGIN.to_string());
        }

        if ctx.use_bundle_cache {
            config.cache = self.cache.hint();
        }

        // A custom hook supplied by the caller wins; otherwise attach the
        // deduplicating filter, recreated per invocation.
        config.onwarn = match &self.onwarn {
            Some(custom) => Some(custom.clone()),
            None => Some(WarningFilter::new().into_hook()),
        };

        if !ctx.production {
            check_deprecated_entry(&config.entry)?;
        }

        tracing::debug!(
            entry = %config.entry.display(),
            dest = %dest.display(),
            format = %config.format,
            "invoking bundler"
        );
        self.events.emit(Event::BundleStart {
            entry: config.entry.clone(),
        });

        let bundle = self.bundler.bundle(&config).await?;

        ctx.set_module_files(bundle.modules.clone());
        self.module_paths.publish(bundle.modules.clone());

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WriteError::Io {
                    path: dest.clone(),
                    source,
                })?;
        }
        tokio::fs::write(&dest, &bundle.code)
            .await
            .map_err(|source| WriteError::Io {
                path: dest.clone(),
                source,
            })?;

        // The cache slot update is atomic with successful completion: a
        // failure mid-write leaves the slot cleared, never half-updated.
        if ctx.watch {
            self.cache.store(bundle.clone());
        }

        self.events.emit(Event::FileChange { path: dest.clone() });
        self.events.emit(Event::BundleComplete {
            dest: dest.clone(),
            modules: bundle.modules.len(),
        });

        tracing::debug!(
            dest = %dest.display(),
            modules = bundle.modules.len(),
            "bundle written"
        );
        Ok(())
    }
}

/// Reject legacy entry configurations before the bundler runs.
///
/// Entries under the old `.tmp` staging directory, or plain `.js` entries,
/// predate in-bundle transformation and would silently produce wrong output.
fn check_deprecated_entry(entry: &Path) -> Result<(), DeprecatedUsageError> {
    if entry.components().any(|c| c.as_os_str() == ".tmp") {
        return Err(DeprecatedUsageError::LegacyTmpEntry(entry.to_path_buf()));
    }
    if entry.extension().is_some_and(|ext| ext == "js") {
        return Err(DeprecatedUsageError::PlainJsEntry(entry.to_path_buf()));
    }
    Ok(())
}
