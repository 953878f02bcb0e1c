// Path normalization - placeholder substitution and destination resolution
//
// Runs before the bundler is invoked; the bundler requires resolved
// filesystem paths with no placeholder tokens left in them.

use crate::context::BuildContext;
use std::path::{Path, PathBuf};

/// Bundle filename used when the config supplies no destination
pub const DEFAULT_BUNDLE_NAME: &str = "main.js";

/// Placeholder token substituted with the context's temp directory
pub const TMP_TOKEN: &str = "{tmp}";

/// Placeholder token substituted with the context's build directory
pub const BUILD_TOKEN: &str = "{build}";

/// Compute the destination path for the bundle.
///
/// An absolute user path is used verbatim; a relative one is resolved under
/// the build output directory, as is the default bundle name when the user
/// supplied no destination at all.
pub fn resolve_dest(dest: Option<&Path>, build_dir: &Path) -> PathBuf {
    match dest {
        Some(d) if d.is_absolute() => d.to_path_buf(),
        Some(d) => build_dir.join(d),
        None => build_dir.join(DEFAULT_BUNDLE_NAME),
    }
}

/// Substitute recognized placeholder tokens with their concrete runtime
/// values from the build context.
pub fn expand_placeholders(path: &Path, ctx: &BuildContext) -> PathBuf {
    let text = path.to_string_lossy();
    if !text.contains(TMP_TOKEN) && !text.contains(BUILD_TOKEN) {
        return path.to_path_buf();
    }

    let expanded = text
        .replace(TMP_TOKEN, &ctx.tmp_dir.to_string_lossy())
        .replace(BUILD_TOKEN, &ctx.build_dir.to_string_lossy());
    PathBuf::from(expanded)
}

/// Whether a path still carries an unsubstituted placeholder token
pub fn has_placeholder(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.contains(TMP_TOKEN) || text.contains(BUILD_TOKEN)
}
