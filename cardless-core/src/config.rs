//! Store configuration and service-name layout.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default service prefix for every secure storage entry.
pub const DEFAULT_SERVICE_PREFIX: &str = "cardlessid";

/// Algorand network the wallet operates on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    uniffi::Enum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlgorandNetwork {
    /// Algorand `TestNet`.
    #[default]
    Testnet,
    /// Algorand `MainNet`.
    Mainnet,
}

impl AlgorandNetwork {
    /// Base URL of the public algod node for this network.
    #[must_use]
    pub const fn algod_url(self) -> &'static str {
        match self {
            Self::Testnet => "https://testnet-api.algonode.cloud",
            Self::Mainnet => "https://mainnet-api.algonode.cloud",
        }
    }

    /// Base URL of the public indexer for this network.
    #[must_use]
    pub const fn indexer_url(self) -> &'static str {
        match self {
            Self::Testnet => "https://testnet-idx.algonode.cloud",
            Self::Mainnet => "https://mainnet-idx.algonode.cloud",
        }
    }
}

/// Configuration shared by all secure stores.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct StoreConfig {
    /// Prefix for every service name written to the platform store.
    pub service_prefix: String,
    /// Network the wallet's account lives on.
    pub network: AlgorandNetwork,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            service_prefix: DEFAULT_SERVICE_PREFIX.to_string(),
            network: AlgorandNetwork::default(),
        }
    }
}

impl StoreConfig {
    pub(crate) fn namespace(&self, family: &'static str) -> Namespace {
        Namespace {
            prefix: self.service_prefix.clone(),
            family,
        }
    }
}

/// Service names owned by one store family, e.g. `cardlessid.credentials.*`.
#[derive(Debug, Clone)]
pub(crate) struct Namespace {
    prefix: String,
    family: &'static str,
}

impl Namespace {
    /// Service name of a slot in this family.
    pub(crate) fn slot(&self, name: &str) -> String {
        format!("{}.{}.{name}", self.prefix, self.family)
    }

    /// Service name of this family's device signing key.
    pub(crate) fn signing_key(&self) -> String {
        format!("{}.{}_signing_key", self.prefix, self.family)
    }
}
