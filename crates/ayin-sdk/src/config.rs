//! SDK configuration
//!
//! Endpoints, deployed contract addresses and the code-hash table. The
//! mainnet preset mirrors the live Ayin deployment; a TOML file can override
//! any of it.

use crate::error::{SdkError, SdkResult};
use crate::provider::ContractKind;
use ayin_core::codec::{Address, ContractId};
use ayin_core::constants::{STAKING_V2_HASH, STAKING_V4_ALIAS_A, STAKING_V4_ALIAS_B};
use ayin_core::{FieldPosition, Protocol, Registry, U256, DEFAULT_SANITY_BOUND, DEFAULT_SLIPPAGE_BPS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Environment variable overriding the node URL
pub const NODE_URL_ENV: &str = "AYIN_NODE_URL";

/// Environment variable overriding the explorer backend URL
pub const BACKEND_URL_ENV: &str = "AYIN_BACKEND_URL";

/// SDK configuration for connecting to Ayin on Alephium
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Full node REST endpoint
    pub node_url: String,

    /// Explorer backend endpoint used for key and transaction lookups
    pub backend_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Default slippage tolerance for swaps, in basis points
    #[serde(default = "default_slippage")]
    pub slippage_bps: u32,

    /// Largest staked amount the decoder accepts, as a decimal string
    #[serde(default = "default_sanity_bound")]
    pub sanity_bound: String,

    /// Well-known token ids and contracts
    pub contracts: ContractAddresses,

    /// Staking deployments keyed by pair name
    #[serde(default)]
    pub staking: Vec<StakingDeployment>,

    /// Code hashes and the protocol each implements
    #[serde(default)]
    pub code_hashes: Vec<CodeHashEntry>,

    /// Method indices for node view calls, per contract kind
    #[serde(default)]
    pub methods: HashMap<String, BTreeMap<String, u32>>,
}

/// Addresses of the singleton contracts and token ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub router: String,
    pub ayin_token_id: String,
    pub xayin_liquid_staking: String,
    pub pounder_vault: String,
    pub alphayin_token_id: String,
    pub single_alphayin_stake: String,
    pub donation: String,
}

/// One staking contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingDeployment {
    /// Pair key such as `usdc_alph`
    pub key: String,
    /// Human label for CLI output
    pub label: String,
    /// Staking contract address
    pub address: String,
    /// Protocol the contract implements
    pub protocol: Protocol,
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeHashEntry {
    pub hash: String,
    pub protocol: Protocol,
    #[serde(default)]
    pub alias: bool,
    /// Where contracts with this hash store their owner address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_field: Option<FieldPosition>,
}

impl CodeHashEntry {
    pub fn new(hash: impl Into<String>, protocol: Protocol) -> Self {
        Self { hash: hash.into(), protocol, alias: false, owner_field: None }
    }

    pub fn as_alias(mut self) -> Self {
        self.alias = true;
        self
    }

    pub fn with_owner_field(mut self, position: FieldPosition) -> Self {
        self.owner_field = Some(position);
        self
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_slippage() -> u32 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_sanity_bound() -> String {
    DEFAULT_SANITY_BOUND.to_string()
}

/// (key, label, address, protocol) of the mainnet LP farms
const MAINNET_STAKING: [(&str, &str, &str, Protocol); 11] = [
    ("alf_alph", "ALF/ALPH", "w7oLoY2txEBb5nzubQqrcdYaiM8NcCL9kMYXY67YfnUo", Protocol::StakingV2),
    ("usdt_alph", "USDT/ALPH", "xoCP1VYdJXoAr6hbmm7dkJAr8e377KXXb8cZ7CZDau5Z", Protocol::StakingV2),
    ("ngu_alph", "NGU/ALPH", "ygGeQi98xPZLaE1nqLMJzT2nKtrsaPB4bsoycFjA7RNX", Protocol::StakingV2),
    ("usdc_alph", "USDC/ALPH", "242tGBfUiKUfVQQE9NL7afobFzfFRaLXSYkoQv84a5Ph9", Protocol::StakingV4),
    ("weth_alph", "WETH/ALPH", "25QLgDpT7q359tmdxTNhe5FGoxycdLbtKCfvS5ru5XMoM", Protocol::StakingV4),
    ("wbtc_alph", "WBTC/ALPH", "xo97eZdV6DXuPvx31J8u8KsmwHxmt2eg3KF2nrFGj43Z", Protocol::StakingV4),
    ("apad_alph", "APAD/ALPH", "yZYGnp1ZyamEeFKapcjX2WJujMN53bDjP5UtpDVE7M2w", Protocol::StakingV4),
    ("cheng_alph", "CHENG/ALPH", "2AA7Qv5tonApXanqRqVa8wQCzJnyri2Fh3NgBVf7Ji1Ku", Protocol::StakingV4),
    ("apad_ayin", "APAD/AYIN", "24LktpGb3E6cYDGrN2GshoAAAdByjMM8t5gFX439fcRWw", Protocol::StakingV4),
    ("usdc_ayin", "USDC/AYIN", "2A7Nky7hk1Q9C66mN6aLLgfyXZWyZXmRfkNYuSMprmXm1", Protocol::StakingV4),
    ("usdt_ayin", "USDT/AYIN", "26xEgX7N63GCDTZejFhSTsNuUTetbaGtV1mxsyLNBHmyZ", Protocol::StakingV4),
];

impl SdkConfig {
    pub fn mainnet() -> Self {
        let mut staking: Vec<StakingDeployment> = MAINNET_STAKING
            .iter()
            .map(|(key, label, address, protocol)| StakingDeployment {
                key: key.to_string(),
                label: label.to_string(),
                address: address.to_string(),
                protocol: *protocol,
            })
            .collect();
        staking.push(StakingDeployment {
            key: "alph_ayin_single".to_string(),
            label: "ALPH/AYIN single stake".to_string(),
            address: "tuuAwnJNwxew6chSHV74CW9Er18EE925Ss2fQMmZbWtF".to_string(),
            protocol: Protocol::StakingV4,
        });

        Self {
            node_url: "https://node.mainnet.alephium.org".to_string(),
            backend_url: "https://backend.mainnet.alephium.org".to_string(),
            timeout_secs: default_timeout(),
            slippage_bps: default_slippage(),
            sanity_bound: default_sanity_bound(),
            contracts: ContractAddresses {
                router: "vj1SmG6q4gMTA5dRB9TB4pJfyBXdTSNRFbJu2CC38Jw9".to_string(),
                ayin_token_id: "1a281053ba8601a658368594da034c2e99a0fb951b86498d05e76aedfe666800".to_string(),
                xayin_liquid_staking: "zst5zMzizEeFYFis6DNSknY5GCYTpM85D3yXeRLe2ug3".to_string(),
                pounder_vault: "26gS9VNF7HJmHrV5SCppHGmsyCZKY65uAf3WdN3a6KuDy".to_string(),
                alphayin_token_id: "a7ca90b2af892713ed95f23b37a6db00c0650c16bad1ccc601443e9020f89f00".to_string(),
                single_alphayin_stake: "tuuAwnJNwxew6chSHV74CW9Er18EE925Ss2fQMmZbWtF".to_string(),
                donation: "1DHQcZ2GXvZxETD32CjLEuzirreGiY2XAGX4BH86SasT".to_string(),
            },
            staking,
            code_hashes: vec![
                CodeHashEntry::new(STAKING_V2_HASH, Protocol::StakingV2),
                CodeHashEntry::new(STAKING_V4_ALIAS_A, Protocol::StakingV4).as_alias(),
                CodeHashEntry::new(STAKING_V4_ALIAS_B, Protocol::StakingV4).as_alias(),
            ],
            methods: HashMap::new(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        let config: SdkConfig = toml::from_str(&content)
            .map_err(|e| SdkError::Config(format!("Failed to parse config file {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SdkResult<()> {
        for (name, url) in [("node_url", &self.node_url), ("backend_url", &self.backend_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SdkError::Config(format!("{} must be an http(s) URL, got {:?}", name, url)));
            }
        }
        if self.timeout_secs == 0 {
            return Err(SdkError::Config("timeout_secs must be greater than 0".into()));
        }
        if self.slippage_bps > ayin_core::BPS_DENOMINATOR {
            return Err(SdkError::Config(format!("slippage_bps {} exceeds 100%", self.slippage_bps)));
        }
        self.sanity_bound_value()?;

        let c = &self.contracts;
        for address in [&c.router, &c.xayin_liquid_staking, &c.pounder_vault, &c.single_alphayin_stake, &c.donation] {
            Address::parse(address)?;
        }
        for token in [&c.ayin_token_id, &c.alphayin_token_id] {
            ContractId::from_hex(token)?;
        }
        for deployment in &self.staking {
            Address::parse(&deployment.address)?;
            if !deployment.protocol.is_staking() {
                return Err(SdkError::Config(format!(
                    "staking deployment {} has non-staking protocol {}",
                    deployment.key, deployment.protocol
                )));
            }
        }
        for kind in self.methods.keys() {
            if ContractKind::parse(kind).is_none() {
                return Err(SdkError::Config(format!("unknown contract kind in methods table: {}", kind)));
            }
        }
        self.build_registry()?;
        Ok(())
    }

    /// Apply `AYIN_NODE_URL` / `AYIN_BACKEND_URL` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(NODE_URL_ENV) {
            self.node_url = url;
        }
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            self.backend_url = url;
        }
        self
    }

    pub fn with_node_url(mut self, url: impl Into<String>) -> Self {
        self.node_url = url.into();
        self
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_slippage_bps(mut self, bps: u32) -> Self {
        self.slippage_bps = bps;
        self
    }

    pub fn with_method(mut self, kind: ContractKind, method: &str, index: u32) -> Self {
        self.methods
            .entry(kind.as_str().to_string())
            .or_default()
            .insert(method.to_string(), index);
        self
    }

    pub fn sanity_bound_value(&self) -> SdkResult<U256> {
        Ok(ayin_core::codec::parse_u256(&self.sanity_bound)?)
    }

    /// Method index for a view call, if configured
    pub fn method_index(&self, kind: ContractKind, method: &str) -> Option<u32> {
        self.methods.get(kind.as_str())?.get(method).copied()
    }

    /// `kind.method` names the SDK calls that have no configured index
    pub fn missing_view_methods(&self) -> Vec<String> {
        ContractKind::ALL
            .iter()
            .flat_map(|kind| kind.view_methods().iter().map(move |method| (*kind, *method)))
            .filter(|(kind, method)| self.method_index(*kind, method).is_none())
            .map(|(kind, method)| format!("{}.{}", kind.as_str(), method))
            .collect()
    }

    /// Fail unless every view method the SDK calls has an index
    pub fn require_view_methods(&self) -> SdkResult<()> {
        let missing = self.missing_view_methods();
        if missing.is_empty() {
            return Ok(());
        }
        Err(SdkError::Config(format!(
            "no method index configured for {}; add them under [methods.<kind>]",
            missing.join(", ")
        )))
    }

    /// Build the code-hash registry from the configured table
    pub fn build_registry(&self) -> SdkResult<Registry> {
        let mut registry = Registry::new();
        for entry in &self.code_hashes {
            if entry.alias {
                registry.register_alias(&entry.hash, entry.protocol)?;
            } else {
                registry.register(&entry.hash, entry.protocol)?;
            }
            if let Some(position) = entry.owner_field {
                registry.set_owner_field(&entry.hash, position)?;
            }
        }
        Ok(registry)
    }

    pub fn staking_by_key(&self, key: &str) -> Option<&StakingDeployment> {
        self.staking.iter().find(|s| s.key == key)
    }

    pub fn staking_by_address(&self, address: &str) -> Option<&StakingDeployment> {
        self.staking.iter().find(|s| s.address == address)
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}
