use std::path::{Path, PathBuf};

use skiff_build::{create_archive, is_dirty, short_revision};
use skiff_cloud::{DeployOptions, DeployPipeline, LambdaClient, S3ArtifactStore};
use skiff_core::{SkiffConfig, artifact_key, resolve_stage};

/// Execute the full deploy pipeline:
/// dirty check → package → upload → reconcile → apply → alias.
pub async fn deploy(
    stage: Option<String>,
    function: Option<String>,
    allow_dirty: bool,
) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");

    // Dirty check: refuse to deploy uncommitted changes unless --allow-dirty
    if !allow_dirty && is_dirty(&project_dir)? {
        anyhow::bail!(
            "uncommitted changes detected.\n\
             Commit your changes, or use `skiff deploy --allow-dirty` to deploy anyway."
        );
    }

    let config = SkiffConfig::load(&project_dir)?;
    let bucket = super::require_bucket(&config)?.to_owned();
    let stage = resolve_stage(stage);

    let revision = short_revision(&project_dir)?;
    tracing::info!(revision = %revision, stage = %stage, "starting deploy");

    let archive_path =
        Path::new(&config.build.archive_dir).join(artifact_key(&revision, &stage));

    println!("Packaging {} ...", archive_path.display());
    create_archive(Path::new(&config.build.dist_dir), &archive_path)?;

    let options = DeployOptions {
        bucket,
        region: config.project.region.clone(),
        memory_mb: config.lambda.memory_mb,
        timeout_seconds: config.lambda.timeout_seconds,
        runtime: config.lambda.runtime.clone(),
        alias_stages: DeployOptions::default_alias_stages(),
    };

    let registry = LambdaClient::new(options.region.clone());
    let store = S3ArtifactStore::new(options.bucket.clone(), options.region.clone());
    let pipeline = DeployPipeline::new(registry, store, options);

    println!("Deploying revision {revision} to stage '{stage}'...");
    let report = pipeline
        .run(
            &archive_path,
            &revision,
            &stage,
            Path::new(&config.build.source_dir),
            function.as_deref(),
        )
        .await?;

    for name in &report.created {
        println!("  created {name}");
    }
    for updated in &report.updated {
        println!(
            "  updated {} -> version {} (alias: {stage})",
            updated.name, updated.version
        );
    }
    println!(
        "Done: {} created, {} updated, {} alias(es) written",
        report.created.len(),
        report.updated.len(),
        report.aliases_created + report.aliases_updated,
    );

    Ok(())
}