use super::config::LeakcheckConfig;
use super::keygen;
use leakcheck::credential::{parse_breach_database, parse_credentials};
use leakcheck::paillier::KeyPair;
use leakcheck::{run_session, Client, Server};
use rand::rngs::OsRng;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Run one lookup session locally and print the aggregate count
pub fn execute(
    config: &LeakcheckConfig,
    credentials_path: &Path,
    breach_db_path: &Path,
    keypair_path: Option<&Path>,
) -> Result<u128, Box<dyn std::error::Error>> {
    let protocol = config.protocol.to_protocol_config()?;

    let credentials = parse_credentials(&read_input(credentials_path)?)
        .map_err(|e| format!("{}: {}", credentials_path.display(), e))?;
    let records = parse_breach_database(&read_input(breach_db_path)?)
        .map_err(|e| format!("{}: {}", breach_db_path.display(), e))?;
    info!(
        credentials = credentials.len(),
        records = records.len(),
        curve = %protocol.curve,
        "inputs loaded"
    );

    let keypair = match keypair_path {
        Some(path) => keygen::load_keypair(path)?,
        None => {
            warn!(
                bits = protocol.key_bits,
                "no --keypair given, generating an ephemeral key pair"
            );
            KeyPair::generate(protocol.key_bits, &mut OsRng)?
        }
    };

    let group = Arc::new(protocol.curve_group()?);
    let server = Server::new(Arc::clone(&group), Arc::new(keypair), records)
        .with_round_timeout(protocol.round_timeout);
    let client = Client::new(group, server.public_key().clone(), credentials)
        .with_round_timeout(protocol.round_timeout);

    let outcome = run_session(&client, &server, &mut OsRng)?;

    println!("Leaked credential occurrences: {}", outcome.leaked_occurrences);
    Ok(outcome.leaked_occurrences)
}

fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    Ok(contents)
}
