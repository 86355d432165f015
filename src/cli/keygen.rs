use super::config::LeakcheckConfig;
use leakcheck::paillier::KeyPair;
use rand::rngs::OsRng;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Generate a Paillier key pair and write it as CBOR
pub fn execute(
    config: &LeakcheckConfig,
    output: &Path,
    bits: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bits = bits.unwrap_or(config.protocol.key_bits);
    info!(bits, "generating Paillier key pair");

    let keypair = KeyPair::generate(bits, &mut OsRng)?;
    save_keypair(&keypair, output)?;

    println!(
        "Wrote {}-bit key pair to {}",
        keypair.public_key().bits(),
        output.display()
    );
    Ok(())
}

/// Write the key pair, owner-readable only on unix
pub fn save_keypair(keypair: &KeyPair, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = keypair.to_cbor()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .map_err(|e| format!("Failed to write key pair '{}': {}", path.display(), e))?;

    // mode() only applies on creation; tighten an existing file too
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(&bytes)?;
    Ok(())
}

pub fn load_keypair(path: &Path) -> Result<KeyPair, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)
        .map_err(|e| format!("Failed to read key pair '{}': {}", path.display(), e))?;
    let keypair = KeyPair::from_cbor(&bytes)
        .map_err(|e| format!("Invalid key pair '{}': {}", path.display(), e))?;
    Ok(keypair)
}
