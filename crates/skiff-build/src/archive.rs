use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package every file under `dist_dir` into a Deflated zip at
/// `archive_path`, preserving paths relative to `dist_dir`.
///
/// The dist directory is filled by the external build step; a missing or
/// empty dist tree means nothing deployable exists and is an error.
pub fn create_archive(dist_dir: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    if !dist_dir.is_dir() {
        return Err(ArchiveError::MissingDist(dist_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_files(dist_dir, &mut files)?;
    if files.is_empty() {
        return Err(ArchiveError::EmptyDist(dist_dir.to_path_buf()));
    }
    files.sort();

    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ArchiveError::Create {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let file = std::fs::File::create(archive_path).map_err(|e| ArchiveError::Create {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let relative = path
            .strip_prefix(dist_dir)
            .expect("collected file lives under dist_dir");
        // Zip entry names use forward slashes on every platform
        let entry_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let content = std::fs::read(path).map_err(|e| ArchiveError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        zip.start_file(entry_name, options)
            .map_err(|e| ArchiveError::Zip {
                path: archive_path.to_path_buf(),
                source: e,
            })?;
        zip.write_all(&content).map_err(|e| ArchiveError::Create {
            path: archive_path.to_path_buf(),
            source: e,
        })?;
    }

    zip.finish().map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(files = files.len(), path = %archive_path.display(), "archive written");
    Ok(())
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ArchiveError::Scan {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ArchiveError::Scan {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("dist directory {0} does not exist — run your build first")]
    MissingDist(PathBuf),

    #[error("dist directory {0} is empty — nothing to package")]
    EmptyDist(PathBuf),

    #[error("failed to scan {path}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write archive at {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("zip error while writing {path}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}
