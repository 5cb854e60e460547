//! Deployment configuration.
//!
//! Two groups of settings:
//!
//! - [`ChainConfig`]: the DID method name, the chain id used in
//!   network-scoped DIDs, and the CAIP-10 namespace used in
//!   `BlockchainAccountID` verification material.
//! - [`AnonCredConfig`]: the pairing-friendly curve and generator domain used
//!   by the anonymous credential protocol. It is passed explicitly into every
//!   protocol call and recorded in published parameters.
//!
//! Defaults suit tests. Override via environment variables or YAML.

use serde::{Deserialize, Serialize};

/// Pairing-friendly curves supported by the anonymous credential protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveId {
    /// BLS12-381.
    #[default]
    #[serde(rename = "bls12-381")]
    Bls12_381,
    /// BN254 (alt_bn128).
    #[serde(rename = "bn254")]
    Bn254,
}

impl CurveId {
    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bls12_381 => "bls12-381",
            Self::Bn254 => "bn254",
        }
    }
}

impl std::fmt::Display for CurveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurveId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bls12-381" | "bls12_381" | "bls12381" => Ok(Self::Bls12_381),
            "bn254" | "bn-254" | "alt_bn128" => Ok(Self::Bn254),
            _ => Err(ConfigError::UnknownCurve(s.to_string())),
        }
    }
}

/// Ledger identity settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain id, embedded in network-scoped DIDs and CAIP-10 account ids.
    pub chain_id: String,
    /// DID method name, e.g. `cosmos` for `did:cosmos:...`.
    pub did_method: String,
    /// CAIP-10 namespace for `BlockchainAccountID` material.
    pub caip_namespace: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: "cosmoshub".to_string(),
            did_method: "cosmos".to_string(),
            caip_namespace: "cosmos".to_string(),
        }
    }
}

/// Anonymous credential protocol settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonCredConfig {
    /// Curve used by both the signature scheme and the accumulator.
    pub curve: CurveId,
    /// Domain separation tag for hash-to-curve generator derivation.
    pub generator_domain: String,
}

impl Default for AnonCredConfig {
    fn default() -> Self {
        Self {
            curve: CurveId::default(),
            generator_domain: "SSI-ANONCRED-GENERATORS-V1".to_string(),
        }
    }
}

impl AnonCredConfig {
    /// Config for `curve` with the default generator domain.
    pub fn for_curve(curve: CurveId) -> Self {
        Self {
            curve,
            ..Self::default()
        }
    }
}

/// Full deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsiConfig {
    /// Ledger identity settings.
    pub chain: ChainConfig,
    /// Anonymous credential protocol settings.
    pub anoncred: AnonCredConfig,
}

impl SsiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables (all optional, defaults from [`SsiConfig::default()`]):
    /// - `SSI_CHAIN_ID`
    /// - `SSI_DID_METHOD`
    /// - `SSI_CAIP_NAMESPACE`
    /// - `SSI_ANONCRED_CURVE` (`bls12-381` or `bn254`)
    /// - `SSI_ANONCRED_DOMAIN`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = lookup("SSI_CHAIN_ID") {
            config.chain.chain_id = v;
        }
        if let Some(v) = lookup("SSI_DID_METHOD") {
            config.chain.did_method = v;
        }
        if let Some(v) = lookup("SSI_CAIP_NAMESPACE") {
            config.chain.caip_namespace = v;
        }
        if let Some(v) = lookup("SSI_ANONCRED_CURVE") {
            config.anoncred.curve = v.parse()?;
        }
        if let Some(v) = lookup("SSI_ANONCRED_DOMAIN") {
            config.anoncred.generator_domain = v;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML. Missing keys take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let method = &self.chain.did_method;
        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidValue(
                "did_method".to_string(),
                method.clone(),
            ));
        }
        if self.chain.chain_id.is_empty() || self.chain.chain_id.contains(':') {
            return Err(ConfigError::InvalidValue(
                "chain_id".to_string(),
                self.chain.chain_id.clone(),
            ));
        }
        if self.anoncred.generator_domain.is_empty() {
            return Err(ConfigError::InvalidValue(
                "generator_domain".to_string(),
                String::new(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown curve: {0:?}")]
    UnknownCurve(String),
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
    #[error("invalid YAML configuration: {0}")]
    Yaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let cfg = SsiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, SsiConfig::default());
        assert_eq!(cfg.anoncred.curve, CurveId::Bls12_381);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("SSI_CHAIN_ID", "testnet-1"),
            ("SSI_DID_METHOD", "ledger"),
            ("SSI_ANONCRED_CURVE", "bn254"),
        ]
        .into_iter()
        .collect();
        let cfg = SsiConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.chain.chain_id, "testnet-1");
        assert_eq!(cfg.chain.did_method, "ledger");
        assert_eq!(cfg.chain.caip_namespace, "cosmos");
        assert_eq!(cfg.anoncred.curve, CurveId::Bn254);
    }

    #[test]
    fn rejects_unknown_curve() {
        let result = SsiConfig::from_lookup(|k| (k == "SSI_ANONCRED_CURVE").then(|| "p256".into()));
        assert!(matches!(result, Err(ConfigError::UnknownCurve(_))));
    }

    #[test]
    fn rejects_bad_method() {
        let result = SsiConfig::from_lookup(|k| (k == "SSI_DID_METHOD").then(|| "Bad:Method".into()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(..))));
    }

    #[test]
    fn yaml_partial_document() {
        let cfg = SsiConfig::from_yaml_str("chain:\n  chain_id: devnet\nanoncred:\n  curve: bn254\n")
            .unwrap();
        assert_eq!(cfg.chain.chain_id, "devnet");
        assert_eq!(cfg.chain.did_method, "cosmos");
        assert_eq!(cfg.anoncred.curve, CurveId::Bn254);
        assert!(SsiConfig::from_yaml_str("chain: [").is_err());
    }

    #[test]
    fn curve_names_roundtrip() {
        for curve in [CurveId::Bls12_381, CurveId::Bn254] {
            assert_eq!(curve.as_str().parse::<CurveId>().unwrap(), curve);
        }
    }
}
