//! HTTP node provider
//!
//! Talks to an Alephium full node for contract state, balances and view
//! calls, and to the explorer backend for public keys and transaction
//! history. View methods are addressed by index; indices come from the
//! `methods` table of the configuration and must cover every view method
//! the SDK calls.

use super::{AddressBalance, ContractState, NodeProvider, TokenBalance, TransactionInfo, TransactionInput, ViewCall};
use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use async_trait::async_trait;
use ayin_core::codec::{parse_u256, Address, ContractId, RawValue, Val};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Body of `POST /contracts/call-contract`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CallContractRequest<'a> {
    group: u8,
    address: &'a str,
    method_index: u32,
    args: &'a [Val],
}

#[derive(Debug, Deserialize)]
struct CallContractResponse {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    returns: Vec<Val>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    balance: String,
    #[serde(default)]
    token_balances: Vec<TokenBalanceResponse>,
}

#[derive(Debug, Deserialize)]
struct TokenBalanceResponse {
    id: String,
    amount: String,
}

pub struct HttpNodeProvider {
    client: Client,
    config: Arc<SdkConfig>,
}

impl HttpNodeProvider {
    /// Fails when the configuration lacks an index for any view method the
    /// SDK calls
    pub fn new(config: Arc<SdkConfig>) -> SdkResult<Self> {
        config.require_view_methods()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn node_url(&self, path: &str) -> String {
        format!("{}{}", self.config.node_url.trim_end_matches('/'), path)
    }

    fn backend_url(&self, path: &str) -> String {
        format!("{}{}", self.config.backend_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SdkResult<T> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::Rpc(format!("{} returned {}: {}", url, status, body)));
        }
        Ok(response.json().await?)
    }
}

/// Parse a node amount string, reporting the field on failure
fn amount(field: &str, text: &str) -> SdkResult<ayin_core::U256> {
    parse_u256(text).map_err(|_| SdkError::NodeResponse(format!("{} is not an amount: {}", field, text)))
}

/// Transaction hashes from an explorer listing, bare or wrapped in `data`
fn transaction_hashes(listing: &Value) -> Vec<String> {
    let items = match listing {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    items
        .iter()
        .filter_map(|item| item.get("hash").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Inputs of an explorer transaction, top level or under `unsigned`
fn transaction_inputs(tx: &Value) -> SdkResult<Vec<TransactionInput>> {
    let inputs = tx
        .get("inputs")
        .or_else(|| tx.get("unsigned").and_then(|u| u.get("inputs")))
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));
    Ok(serde_json::from_value(inputs)?)
}

#[async_trait]
impl NodeProvider for HttpNodeProvider {
    async fn contract_state(&self, address: &Address) -> SdkResult<ContractState> {
        self.get_json(&self.node_url(&format!("/contracts/{}/state", address)))
            .await
    }

    async fn address_balance(&self, address: &Address) -> SdkResult<AddressBalance> {
        let response: BalanceResponse = self
            .get_json(&self.node_url(&format!("/addresses/{}/balance", address)))
            .await?;
        let tokens = response
            .token_balances
            .iter()
            .map(|t| {
                Ok(TokenBalance {
                    id: t.id.to_lowercase(),
                    amount: amount("tokenBalances.amount", &t.amount)?,
                })
            })
            .collect::<SdkResult<Vec<_>>>()?;
        Ok(AddressBalance { balance: amount("balance", &response.balance)?, tokens })
    }

    async fn call_view(&self, call: ViewCall) -> SdkResult<RawValue> {
        let method_index = self
            .config
            .method_index(call.contract, call.method)
            .ok_or_else(|| SdkError::UnsupportedMethod {
                contract: call.contract.as_str().to_string(),
                method: call.method.to_string(),
            })?;
        let group = ContractId::from_address(&call.address)?.group();
        let request = CallContractRequest {
            group,
            address: call.address.as_str(),
            method_index,
            args: &call.args,
        };

        debug!(address = %call.address, method = call.method, method_index, "call-contract");
        let response = self
            .client
            .post(self.node_url("/contracts/call-contract"))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::Rpc(format!("{}.{} returned {}: {}", call.address, call.method, status, body)));
        }

        let result: CallContractResponse = response.json().await?;
        if let Some(error) = result.error {
            return Err(SdkError::NodeResponse(format!("{}.{} failed: {}", call.address, call.method, error)));
        }
        if result.kind.as_deref().is_some_and(|k| k != "CallContractSucceeded") {
            return Err(SdkError::NodeResponse(format!(
                "{}.{} returned {:?}",
                call.address, call.method, result.kind
            )));
        }
        Ok(RawValue::from_returns(result.returns))
    }

    async fn public_key(&self, address: &Address) -> SdkResult<Option<String>> {
        let url = self.backend_url(&format!("/addresses/{}/public-key", address));
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(SdkError::Rpc(format!("{} returned {}", url, status)));
            }
            _ => {}
        }

        let body = response.text().await?;
        // Either a JSON string or the bare hex
        let key = serde_json::from_str::<String>(&body).unwrap_or_else(|_| body.trim().to_string());
        Ok(if key.is_empty() { None } else { Some(key) })
    }

    async fn recent_transactions(&self, address: &Address, limit: usize) -> SdkResult<Vec<String>> {
        let listing: Value = self
            .get_json(&self.backend_url(&format!("/addresses/{}/transactions?limit={}", address, limit)))
            .await?;
        Ok(transaction_hashes(&listing))
    }

    async fn transaction(&self, hash: &str) -> SdkResult<TransactionInfo> {
        let tx: Value = self
            .get_json(&self.backend_url(&format!("/transactions/{}", hash)))
            .await?;
        Ok(TransactionInfo { hash: hash.to_string(), inputs: transaction_inputs(&tx)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_contract_request_shape() {
        let args = vec![Val::address("1DHQcZ2GXvZxETD32CjLEuzirreGiY2XAGX4BH86SasT")];
        let request = CallContractRequest {
            group: 0,
            address: "tuuAwnJNwxew6chSHV74CW9Er18EE925Ss2fQMmZbWtF",
            method_index: 7,
            args: &args,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "group": 0,
                "address": "tuuAwnJNwxew6chSHV74CW9Er18EE925Ss2fQMmZbWtF",
                "methodIndex": 7,
                "args": [{"type": "Address", "value": "1DHQcZ2GXvZxETD32CjLEuzirreGiY2XAGX4BH86SasT"}]
            })
        );
    }

    #[test]
    fn test_call_contract_response_returns() {
        let response: CallContractResponse = serde_json::from_value(json!({
            "type": "CallContractSucceeded",
            "returns": [{"type": "U256", "value": "42"}],
            "gasUsed": 20000
        }))
        .unwrap();
        assert_eq!(RawValue::from_returns(response.returns).as_u256(), Some(ayin_core::U256::new(42)));
    }

    #[test]
    fn test_provider_requires_view_method_indices() {
        let preset = Arc::new(SdkConfig::mainnet());
        assert!(matches!(HttpNodeProvider::new(preset), Err(SdkError::Config(_))));

        let mut config = SdkConfig::mainnet();
        for kind in super::super::ContractKind::ALL {
            for (index, method) in kind.view_methods().iter().enumerate() {
                config = config.with_method(kind, method, index as u32);
            }
        }
        assert!(HttpNodeProvider::new(Arc::new(config)).is_ok());
    }

    #[test]
    fn test_transaction_listing_shapes() {
        let bare = json!([{"hash": "aa"}, {"hash": "bb"}]);
        let wrapped = json!({"data": [{"hash": "cc"}]});
        assert_eq!(transaction_hashes(&bare), vec!["aa", "bb"]);
        assert_eq!(transaction_hashes(&wrapped), vec!["cc"]);
        assert!(transaction_hashes(&json!({"total": 0})).is_empty());
    }

    #[test]
    fn test_transaction_inputs_locations() {
        let top = json!({"inputs": [{"address": "a", "unlockScript": "00ff"}]});
        let nested = json!({"unsigned": {"inputs": [{"address": "b"}]}});
        let top_inputs = transaction_inputs(&top).unwrap();
        assert_eq!(top_inputs[0].unlock_script.as_deref(), Some("00ff"));
        let nested_inputs = transaction_inputs(&nested).unwrap();
        assert_eq!(nested_inputs[0].address.as_deref(), Some("b"));
        assert_eq!(nested_inputs[0].unlock_script, None);
        assert!(transaction_inputs(&json!({})).unwrap().is_empty());
    }
}
