use anyhow::Result;

use revealkit_core::AppConfig;

pub fn run(force: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("Use --force to overwrite it with the defaults.");
        return Ok(());
    }

    let path = AppConfig::default().save()?;
    println!("Wrote default config to {}", path.display());

    Ok(())
}
