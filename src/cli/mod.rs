use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod check;
pub mod config;
pub mod init_config;
pub mod keygen;
pub mod logging;
pub mod version;

use config::LeakcheckConfig;

#[derive(Parser)]
#[command(name = "leakcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Private breach lookup: count leaked credentials without revealing them", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.config/leakcheck/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented default configuration file
    InitConfig {
        /// Output path (default: ~/.config/leakcheck/config.toml)
        #[arg(long)]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate a Paillier key pair for a breach server
    Keygen {
        /// Where to write the key pair (CBOR, contains the private key)
        #[arg(long)]
        output: String,

        /// Modulus size in bits (default: protocol.key_bits from config)
        #[arg(long)]
        bits: Option<usize>,
    },

    /// Run a local lookup session: credentials against a breach database
    Check {
        /// Credential list, one identifier:secret per line
        #[arg(long)]
        credentials: String,

        /// Breach database, one sha256-hex,count per line
        #[arg(long)]
        breach_db: String,

        /// Server key pair from `keygen` (default: ephemeral key pair)
        #[arg(long)]
        keypair: Option<String>,
    },

    /// Display version information
    Version,
}

pub fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.as_deref().map(Path::new);

    match cli.command {
        Commands::InitConfig { output, force } => {
            let output = output
                .map(PathBuf::from)
                .unwrap_or_else(config::default_config_path);
            init_config::execute(&output, force)
        }
        Commands::Keygen { output, bits } => {
            let config = LeakcheckConfig::resolve(config_path)?;
            logging::init(&config.logging)?;
            keygen::execute(&config, Path::new(&output), bits)
        }
        Commands::Check {
            credentials,
            breach_db,
            keypair,
        } => {
            let config = LeakcheckConfig::resolve(config_path)?;
            logging::init(&config.logging)?;
            check::execute(
                &config,
                Path::new(&credentials),
                Path::new(&breach_db),
                keypair.as_deref().map(Path::new),
            )
            .map(|_| ())
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from([
            "leakcheck",
            "check",
            "--credentials",
            "creds.txt",
            "--breach-db",
            "breaches.csv",
        ]);

        assert!(cli.config.is_none());
        match cli.command {
            Commands::Check {
                credentials,
                breach_db,
                keypair,
            } => {
                assert_eq!(credentials, "creds.txt");
                assert_eq!(breach_db, "breaches.csv");
                assert!(keypair.is_none());
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_check_with_all_options() {
        let cli = Cli::parse_from([
            "leakcheck",
            "check",
            "--credentials",
            "/tmp/creds.txt",
            "--breach-db",
            "/tmp/db.csv",
            "--keypair",
            "/tmp/server.key",
            "--config",
            "/tmp/config.toml",
        ]);

        assert_eq!(cli.config, Some("/tmp/config.toml".to_string()));
        match cli.command {
            Commands::Check { keypair, .. } => {
                assert_eq!(keypair, Some("/tmp/server.key".to_string()));
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_keygen() {
        let cli = Cli::parse_from(["leakcheck", "keygen", "--output", "server.key", "--bits", "1024"]);

        match cli.command {
            Commands::Keygen { output, bits } => {
                assert_eq!(output, "server.key");
                assert_eq!(bits, Some(1024));
            }
            _ => panic!("Expected Keygen command"),
        }
    }

    #[test]
    fn test_cli_parse_init_config() {
        let cli = Cli::parse_from(["leakcheck", "init-config", "--force"]);

        match cli.command {
            Commands::InitConfig { output, force } => {
                assert!(output.is_none());
                assert!(force);
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_cli_check_requires_breach_db() {
        let result = Cli::try_parse_from(["leakcheck", "check", "--credentials", "creds.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::parse_from(["leakcheck", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }
}
