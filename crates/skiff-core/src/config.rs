use serde::{Deserialize, Serialize};

/// skiff.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkiffConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildPaths,
    #[serde(default)]
    pub lambda: LambdaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Object-storage bucket that receives deploy artifacts.
    /// Required for any command that touches the remote registry.
    pub bucket: Option<String>,
    /// Target platform region (defaults to us-east-1)
    #[serde(default = "default_region")]
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPaths {
    /// Source tree scanned for handler manifests
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    /// Directory holding the prebuilt entry files to package
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
    /// Directory the zip artifact is written to
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaConfig {
    /// Runtime identifier passed on function creation
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Per-function memory cap in MB
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u32,
    /// Per-function execution timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: default_region(),
        }
    }
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            dist_dir: default_dist_dir(),
            archive_dir: default_archive_dir(),
        }
    }
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            memory_mb: default_memory_mb(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl SkiffConfig {
    /// Load from skiff.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("skiff.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

/// Resolve the active deploy stage: CLI argument, then `SKIFF_STAGE`,
/// then `staging`.
pub fn resolve_stage(cli_stage: Option<String>) -> String {
    cli_stage
        .or_else(|| std::env::var("SKIFF_STAGE").ok())
        .unwrap_or_else(|| "staging".to_owned())
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_source_dir() -> String {
    "lib".to_owned()
}

fn default_dist_dir() -> String {
    ".dist".to_owned()
}

fn default_archive_dir() -> String {
    ".archive".to_owned()
}

fn default_runtime() -> String {
    "nodejs".to_owned()
}

fn default_memory_mb() -> u32 {
    1536
}

fn default_timeout_seconds() -> u32 {
    30
}
