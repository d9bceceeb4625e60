mod deploy;
mod handlers;
mod plan;

use skiff_core::SkiffConfig;

pub use deploy::deploy;
pub use handlers::handlers;
pub use plan::plan;

pub(crate) fn require_bucket(config: &SkiffConfig) -> anyhow::Result<&str> {
    config
        .project
        .bucket
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("bucket not set in skiff.toml — set [project].bucket"))
}
