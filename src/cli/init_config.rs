use super::config::LeakcheckConfig;
use std::path::Path;

/// Write the commented default config, refusing to clobber an existing file
pub fn execute(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "Config file '{}' already exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }

    LeakcheckConfig::create_default(output)?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}
