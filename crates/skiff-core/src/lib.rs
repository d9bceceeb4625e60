//! Core types and configuration for skiff.
//!
//! This crate defines the `skiff.toml` schema ([`SkiffConfig`]), handler
//! manifest discovery ([`HandlerDescriptor`]), the artifact naming
//! convention ([`artifact_key`]), and shared error types.

pub mod artifact;
pub mod config;
pub mod error;
pub mod handler;

pub use artifact::artifact_key;
pub use config::{BuildPaths, LambdaConfig, ProjectConfig, SkiffConfig, resolve_stage};
pub use error::{Error, Result};
pub use handler::{HandlerDescriptor, discover};
