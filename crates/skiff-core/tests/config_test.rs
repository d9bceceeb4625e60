use skiff_core::SkiffConfig;
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = SkiffConfig::load(tmp.path()).unwrap();

    assert!(config.project.bucket.is_none());
    assert_eq!(config.project.region, "us-east-1");
    assert_eq!(config.build.source_dir, "lib");
    assert_eq!(config.build.dist_dir, ".dist");
    assert_eq!(config.build.archive_dir, ".archive");
    assert_eq!(config.lambda.runtime, "nodejs");
    assert_eq!(config.lambda.memory_mb, 1536);
    assert_eq!(config.lambda.timeout_seconds, 30);
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[project]
bucket = "acme-builds"
region = "eu-west-1"

[build]
source_dir = "src/functions"
dist_dir = "out"
archive_dir = "out/archive"

[lambda]
runtime = "nodejs22.x"
memory_mb = 512
timeout_seconds = 15
"#;
    std::fs::write(tmp.path().join("skiff.toml"), toml).unwrap();

    let config = SkiffConfig::load(tmp.path()).unwrap();

    assert_eq!(config.project.bucket.as_deref(), Some("acme-builds"));
    assert_eq!(config.project.region, "eu-west-1");
    assert_eq!(config.build.source_dir, "src/functions");
    assert_eq!(config.build.dist_dir, "out");
    assert_eq!(config.build.archive_dir, "out/archive");
    assert_eq!(config.lambda.runtime, "nodejs22.x");
    assert_eq!(config.lambda.memory_mb, 512);
    assert_eq!(config.lambda.timeout_seconds, 15);
}

#[test]
fn load_applies_defaults_for_partial_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("skiff.toml"),
        "[project]\nbucket = \"acme-builds\"\n",
    )
    .unwrap();

    let config = SkiffConfig::load(tmp.path()).unwrap();

    assert_eq!(config.project.bucket.as_deref(), Some("acme-builds"));
    assert_eq!(config.project.region, "us-east-1");
    assert_eq!(config.lambda.memory_mb, 1536);
}

#[test]
fn load_rejects_invalid_toml_with_path() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("skiff.toml"), "[project\nbucket = ").unwrap();

    let err = SkiffConfig::load(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("skiff.toml"));
}
