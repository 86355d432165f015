//! Domain parameters for short Weierstrass curves y² = x³ + ax + b over GF(p).
//!
//! Parameters are plain values; binding them into a [`super::CurveGroup`]
//! validates them once. Both parties must agree on the curve out-of-band.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named curves shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CurveName {
    /// SM2 recommended curve (GB/T 32918.5)
    #[default]
    Sm2p256v1,
    /// SEC 2 Koblitz curve
    Secp256k1,
}

impl CurveName {
    /// Parameters for this named curve
    pub fn parameters(self) -> CurveParameters {
        match self {
            CurveName::Sm2p256v1 => CurveParameters::sm2p256v1(),
            CurveName::Secp256k1 => CurveParameters::secp256k1(),
        }
    }
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveName::Sm2p256v1 => write!(f, "sm2p256v1"),
            CurveName::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// Immutable curve constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParameters {
    pub name: String,
    /// Field prime
    pub p: BigUint,
    pub a: BigUint,
    pub b: BigUint,
    /// Prime group order
    pub n: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
}

impl CurveParameters {
    /// SM2 256-bit curve, the default for breach lookups.
    pub fn sm2p256v1() -> Self {
        Self {
            name: CurveName::Sm2p256v1.to_string(),
            p: hex_constant("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFF"),
            a: hex_constant("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF00000000FFFFFFFFFFFFFFFC"),
            b: hex_constant("28E9FA9E9D9F5E344D5A9E4BCF6509A7F39789F515AB8F92DDBCBD414D940E93"),
            n: hex_constant("FFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFF7203DF6B21C6052B53BBF40939D54123"),
            gx: hex_constant("32C4AE2C1F1981195F9904466A39C9948FE30BBFF2660BE1715A4589334C74C7"),
            gy: hex_constant("BC3736A2F4F6779C59BDCEE36B692153D0A9877CC62A474002DF32E52139F0A0"),
        }
    }

    /// secp256k1 (a = 0, b = 7)
    pub fn secp256k1() -> Self {
        Self {
            name: CurveName::Secp256k1.to_string(),
            p: hex_constant("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"),
            a: BigUint::from(0u32),
            b: BigUint::from(7u32),
            n: hex_constant("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"),
            gx: hex_constant("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"),
            gy: hex_constant("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"),
        }
    }
}

// Constants above are fixed literals; a parse failure is a typo caught by tests.
fn hex_constant(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_curves_are_256_bit() {
        for name in [CurveName::Sm2p256v1, CurveName::Secp256k1] {
            let params = name.parameters();
            assert_eq!(params.p.bits(), 256, "{name}");
            assert_eq!(params.n.bits(), 256, "{name}");
        }
    }

    #[test]
    fn test_curve_name_serde() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            curve: CurveName,
        }

        let parsed: Wrapper = toml::from_str(r#"curve = "secp256k1""#).unwrap();
        assert_eq!(parsed.curve, CurveName::Secp256k1);

        let parsed: Wrapper = toml::from_str(r#"curve = "sm2p256v1""#).unwrap();
        assert_eq!(parsed.curve, CurveName::Sm2p256v1);
    }
}
