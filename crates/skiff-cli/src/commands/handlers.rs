use std::path::Path;

use skiff_core::SkiffConfig;

/// List handlers discovered in the configured source tree.
pub fn handlers() -> anyhow::Result<()> {
    let config = SkiffConfig::load(Path::new("."))?;
    let handlers = skiff_core::discover(Path::new(&config.build.source_dir), None)?;

    if handlers.is_empty() {
        println!("No handlers found under {}", config.build.source_dir);
        return Ok(());
    }

    for handler in &handlers {
        println!(
            "{}  {}  ({})",
            handler.name,
            handler.description,
            handler.source_path.display()
        );
    }

    Ok(())
}
