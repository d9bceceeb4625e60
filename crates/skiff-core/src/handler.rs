//! Handler manifest discovery.
//!
//! A deployable handler is declared in a `handlers.toml` manifest living in
//! a `handlers/` directory somewhere under the source tree:
//!
//! ```toml
//! [v1_ping]
//! source = "ping.js"
//! description = "v1 ping test"
//! role = "arn:aws:iam::000000000000:role/lambda_basic_execution"
//! ```
//!
//! Every field is required; an entry missing `source`, `description`, or
//! `role` fails manifest parsing instead of producing a partial descriptor.
//! Discovery is a fresh read-only scan on every call — there is no cache,
//! so the descriptor set always reflects the tree as it is now.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory name that marks its contents as function entry points.
const HANDLERS_DIR: &str = "handlers";

/// Manifest file consulted inside each handlers directory.
const MANIFEST_FILE: &str = "handlers.toml";

/// One deployable function, as declared in its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    /// Path of the handler's source file
    pub source_path: PathBuf,
    /// Logical handler name (manifest table key)
    pub name: String,
    /// Remote registry identifier; equals `name`
    pub function_name: String,
    /// Human-readable text used in function and alias metadata
    pub description: String,
    /// Execution-role resource the platform runs the function as
    pub role: String,
}

impl HandlerDescriptor {
    /// Entry point the platform invokes: `{name}.handler`.
    pub fn entry_point(&self) -> String {
        format!("{}.handler", self.name)
    }
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    source: String,
    description: String,
    role: String,
}

/// Discover handler descriptors under `source_root`.
///
/// Walks the tree for `handlers/` directories carrying a `handlers.toml`
/// manifest and builds one descriptor per entry. When `selector` is given,
/// the result is filtered to at most one descriptor with that name; no
/// match yields an empty vec, not an error.
///
/// # Errors
///
/// - [`Error::Scan`](crate::Error::Scan) on any filesystem failure
/// - [`Error::ManifestParse`](crate::Error::ManifestParse) when a manifest
///   is not valid TOML or an entry is missing a required field
/// - [`Error::MissingSource`](crate::Error::MissingSource) when an entry's
///   `source` file does not exist
/// - [`Error::DuplicateHandler`](crate::Error::DuplicateHandler) when two
///   manifests declare the same handler name
pub fn discover(
    source_root: &Path,
    selector: Option<&str>,
) -> crate::Result<Vec<HandlerDescriptor>> {
    let mut manifests = Vec::new();
    collect_manifests(source_root, &mut manifests)?;
    // Deterministic descriptor order regardless of readdir order
    manifests.sort();

    let mut seen = HashSet::new();
    let mut handlers = Vec::new();

    for manifest_path in &manifests {
        let content =
            std::fs::read_to_string(manifest_path).map_err(|e| crate::Error::Scan {
                path: manifest_path.clone(),
                source: e,
            })?;

        let entries: BTreeMap<String, ManifestEntry> =
            toml::from_str(&content).map_err(|e| crate::Error::ManifestParse {
                path: manifest_path.clone(),
                source: e,
            })?;

        let manifest_dir = manifest_path
            .parent()
            .unwrap_or(source_root)
            .to_path_buf();

        for (name, entry) in entries {
            if !seen.insert(name.clone()) {
                return Err(crate::Error::DuplicateHandler { name });
            }

            let source_path = manifest_dir.join(&entry.source);
            if !source_path.is_file() {
                return Err(crate::Error::MissingSource {
                    handler: name,
                    path: source_path,
                });
            }

            handlers.push(HandlerDescriptor {
                source_path,
                function_name: name.clone(),
                name,
                description: entry.description,
                role: entry.role,
            });
        }
    }

    if let Some(wanted) = selector {
        handlers.retain(|h| h.name == wanted);
    }

    tracing::debug!(count = handlers.len(), "discovered handlers");
    Ok(handlers)
}

/// Recursively collect paths of handler manifests under `dir`.
fn collect_manifests(dir: &Path, out: &mut Vec<PathBuf>) -> crate::Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| crate::Error::Scan {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| crate::Error::Scan {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == HANDLERS_DIR) {
                let manifest = path.join(MANIFEST_FILE);
                if manifest.is_file() {
                    out.push(manifest);
                }
            }
            collect_manifests(&path, out)?;
        }
    }

    Ok(())
}
