//! Revision lookup and zip artifact packaging for skiff.
//!
//! # Packaging pipeline
//!
//! ```text
//! skiff deploy
//!   1. Dirty check ── git status --porcelain (skip with --allow-dirty)
//!   2. Revision    ── git rev-parse --short HEAD
//!   3. Archive     ── .dist/** → .archive/{revision}-{stage}.zip
//!   4. Upload      ── s3 put-object (skiff-cloud)
//!   5. Reconcile   ── create/update functions + aliases (skiff-cloud)
//! ```
//!
//! The transpile step that fills the dist directory is external; packaging
//! refuses to run against a missing or empty dist tree.

pub mod archive;
pub mod revision;

pub use archive::{ArchiveError, create_archive};
pub use revision::{RevisionError, is_dirty, short_revision};
