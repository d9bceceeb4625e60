use std::path::{Path, PathBuf};

use skiff_cloud::{DeployPlan, FunctionRegistry, LambdaClient};
use skiff_core::SkiffConfig;

/// Reconcile discovered handlers against the remote inventory and print
/// the resulting partition. No remote write is issued.
pub async fn plan(function: Option<String>) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = SkiffConfig::load(&project_dir)?;
    super::require_bucket(&config)?;

    let registry = LambdaClient::new(config.project.region.clone());
    let inventory = registry.list_functions().await?;

    let handlers =
        skiff_core::discover(Path::new(&config.build.source_dir), function.as_deref())?;
    let plan = DeployPlan::partition(handlers, &inventory);

    if plan.is_empty() {
        println!("No handlers found under {}", config.build.source_dir);
        return Ok(());
    }

    for handler in &plan.added {
        println!("  create {}", handler.function_name);
    }
    for handler in &plan.updated {
        println!("  update {}", handler.function_name);
    }
    println!(
        "{} to create, {} to update",
        plan.added.len(),
        plan.updated.len()
    );

    Ok(())
}
