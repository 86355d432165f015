//! Protocol inputs: client credentials and server leak records
//!
//! A credential is digested once as `SHA-256(identifier ":" secret)`; the
//! breach database stores the same digest next to an occurrence count. The
//! protocol only ever sees digests, mapped onto the curve.
//!
//! # Text formats
//!
//! ```text
//! # credentials: identifier:secret (split at the first ':')
//! alice:password123
//!
//! # breach database: sha256-hex,count
//! 0f1e...9a,5
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Input parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Line {line}: expected 'identifier:secret'")]
    MissingSeparator { line: usize },

    #[error("Line {line}: identifier is empty")]
    EmptyIdentifier { line: usize },

    #[error("Line {line}: expected 'hash,count'")]
    MalformedRecord { line: usize },

    #[error("Line {line}: invalid credential hash: {reason}")]
    InvalidHash { line: usize, reason: String },

    #[error("Line {line}: invalid occurrence count: {reason}")]
    InvalidCount { line: usize, reason: String },
}

/// SHA-256 digest of a credential
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialHash([u8; 32]);

impl CredentialHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Digest of `identifier:secret`
    pub fn of(identifier: &str, secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(identifier.as_bytes());
        hasher.update(b":");
        hasher.update(secret.as_bytes());
        Self(hasher.finalize().into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(digits: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialHash({})", self.to_hex())
    }
}

impl fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A client credential. Cleared from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn digest(&self) -> CredentialHash {
        CredentialHash::of(&self.identifier, &self.secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// One breach database entry, owned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakRecord {
    pub hash: CredentialHash,
    pub occurrences: u64,
}

impl LeakRecord {
    pub fn new(hash: CredentialHash, occurrences: u64) -> Self {
        Self { hash, occurrences }
    }
}

/// Yields (1-based line number, trimmed content) for non-blank, non-comment lines
fn content_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse a credential list, one `identifier:secret` per line.
pub fn parse_credentials(input: &str) -> Result<Vec<Credential>, CredentialError> {
    content_lines(input)
        .map(|(line, content)| {
            let (identifier, secret) = content
                .split_once(':')
                .ok_or(CredentialError::MissingSeparator { line })?;
            if identifier.is_empty() {
                return Err(CredentialError::EmptyIdentifier { line });
            }
            Ok(Credential::new(identifier, secret))
        })
        .collect()
}

/// Parse a breach database, one `sha256-hex,count` per line.
pub fn parse_breach_database(input: &str) -> Result<Vec<LeakRecord>, CredentialError> {
    content_lines(input)
        .map(|(line, content)| {
            let (hash, count) = content
                .split_once(',')
                .ok_or(CredentialError::MalformedRecord { line })?;

            let hash = CredentialHash::from_hex(hash.trim()).map_err(|e| {
                CredentialError::InvalidHash {
                    line,
                    reason: e.to_string(),
                }
            })?;
            let occurrences = count
                .trim()
                .parse::<u64>()
                .map_err(|e| CredentialError::InvalidCount {
                    line,
                    reason: e.to_string(),
                })?;

            Ok(LeakRecord::new(hash, occurrences))
        })
        .collect()
}
