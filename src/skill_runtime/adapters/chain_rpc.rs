//! JSON-RPC adapter for Solana and EVM nodes.

use crate::skill_runtime::{
    domain::{AccountAccess, Chain, EvmReceipt, EvmTransaction, SolanaTransaction},
    ports::{ChainRpc, OutboundError, OutboundResult},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

/// Node endpoints per chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEndpoints {
    /// Solana RPC.
    pub solana: Url,
    /// Ethereum RPC.
    pub ethereum: Url,
    /// Base RPC.
    pub base: Url,
}

/// JSON-RPC client for the configured nodes.
#[derive(Debug, Clone)]
pub struct JsonRpcChainClient {
    client: reqwest::Client,
    endpoints: ChainEndpoints,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl JsonRpcChainClient {
    /// Creates a client.
    #[must_use]
    pub const fn new(client: reqwest::Client, endpoints: ChainEndpoints) -> Self {
        Self { client, endpoints }
    }

    const fn endpoint(&self, chain: Chain) -> &Url {
        match chain {
            Chain::Solana => &self.endpoints.solana,
            Chain::Ethereum => &self.endpoints.ethereum,
            Chain::Base => &self.endpoints.base,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        chain: Chain,
        method: &str,
        params: Value,
    ) -> OutboundResult<T> {
        let request = json!({"jsonrpc": "2.0", "id": 1, "method": method, "params": params});
        let envelope: RpcEnvelope = self
            .client
            .post(self.endpoint(chain).clone())
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(OutboundError::transport)?
            .json()
            .await
            .map_err(OutboundError::transport)?;
        if let Some(err) = envelope.error {
            return Err(OutboundError::invalid_response(format!(
                "{method} failed ({}): {}",
                err.code, err.message
            )));
        }
        serde_json::from_value(envelope.result).map_err(OutboundError::invalid_response)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolanaTxResponse {
    slot: u64,
    #[serde(default)]
    block_time: Option<i64>,
    #[serde(default)]
    meta: Option<SolanaMeta>,
    transaction: SolanaTxBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SolanaMeta {
    fee: u64,
    err: Option<Value>,
    pre_balances: Vec<u64>,
    post_balances: Vec<u64>,
    pre_token_balances: Vec<Value>,
    post_token_balances: Vec<Value>,
    compute_units_consumed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SolanaTxBody {
    message: SolanaMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SolanaMessage {
    instructions: Vec<SolanaInstruction>,
    account_keys: Vec<SolanaAccountKey>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolanaInstruction {
    #[serde(default)]
    program_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SolanaAccountKey {
    signer: bool,
    writable: bool,
}

impl From<SolanaTxResponse> for SolanaTransaction {
    fn from(response: SolanaTxResponse) -> Self {
        let meta = response.meta.unwrap_or_default();
        let message = response.transaction.message;
        Self {
            slot: response.slot,
            block_time: response.block_time,
            fee_lamports: meta.fee,
            failed: meta.err.is_some(),
            program_ids: message
                .instructions
                .into_iter()
                .filter_map(|instruction| instruction.program_id)
                .collect(),
            accounts: message
                .account_keys
                .into_iter()
                .map(|key| AccountAccess {
                    signer: key.signer,
                    writable: key.writable,
                })
                .collect(),
            pre_balances: meta.pre_balances,
            post_balances: meta.post_balances,
            token_balance_entries: meta
                .pre_token_balances
                .len()
                .saturating_add(meta.post_token_balances.len()),
            compute_units: meta.compute_units_consumed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvmTxResponse {
    from: String,
    #[serde(default)]
    to: Option<String>,
    value: String,
    #[serde(default)]
    gas: Option<String>,
    #[serde(default)]
    gas_price: Option<String>,
    #[serde(default)]
    max_fee_per_gas: Option<String>,
    nonce: String,
    #[serde(default)]
    chain_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvmReceiptResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
    #[serde(default)]
    effective_gas_price: Option<String>,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    logs: Vec<EvmLog>,
}

#[derive(Debug, Deserialize)]
struct EvmLog {
    #[serde(default)]
    topics: Vec<String>,
}

/// `balanceOf(address)` selector.
const BALANCE_OF: &str = "0x70a08231";

/// ABI-encodes a `balanceOf` call for `holder`.
fn balance_of_call(holder: &str) -> String {
    let address = holder.strip_prefix("0x").unwrap_or(holder).to_ascii_lowercase();
    format!("{BALANCE_OF}{address:0>64}")
}

/// Parses a `0x`-prefixed hex quantity.
fn quantity(text: &str) -> OutboundResult<u128> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(OutboundError::invalid_response)
}

fn optional_quantity(text: Option<&str>) -> OutboundResult<Option<u128>> {
    text.map(quantity).transpose()
}

fn narrow(value: u128) -> OutboundResult<u64> {
    u64::try_from(value).map_err(OutboundError::invalid_response)
}

impl EvmReceiptResponse {
    fn decode(self) -> OutboundResult<EvmReceipt> {
        Ok(EvmReceipt {
            success: optional_quantity(self.status.as_deref())?.is_none_or(|status| status == 1),
            gas_used: optional_quantity(self.gas_used.as_deref())?,
            effective_gas_price: optional_quantity(self.effective_gas_price.as_deref())?,
            block_number: optional_quantity(self.block_number.as_deref())?
                .map(narrow)
                .transpose()?,
            contract_address: self.contract_address,
            log_topics: self
                .logs
                .into_iter()
                .map(|log| log.topics.into_iter().next())
                .collect(),
        })
    }
}

#[async_trait]
impl ChainRpc for JsonRpcChainClient {
    async fn solana_transaction(
        &self,
        signature: &str,
    ) -> OutboundResult<Option<SolanaTransaction>> {
        let params = json!([
            signature,
            {"encoding": "jsonParsed", "commitment": "confirmed", "maxSupportedTransactionVersion": 0}
        ]);
        let response: Option<SolanaTxResponse> =
            self.call(Chain::Solana, "getTransaction", params).await?;
        Ok(response.map(SolanaTransaction::from))
    }

    async fn evm_transaction(
        &self,
        chain: Chain,
        hash: &str,
    ) -> OutboundResult<Option<EvmTransaction>> {
        let found: Option<EvmTxResponse> = self
            .call(chain, "eth_getTransactionByHash", json!([hash]))
            .await?;
        let Some(tx) = found else {
            return Ok(None);
        };
        let receipt: Option<EvmReceiptResponse> = self
            .call(chain, "eth_getTransactionReceipt", json!([hash]))
            .await?;

        let recipient_is_contract = match &tx.to {
            Some(address) => {
                let code: String = self
                    .call(chain, "eth_getCode", json!([address, "latest"]))
                    .await?;
                code != "0x"
            }
            None => false,
        };

        Ok(Some(EvmTransaction {
            value_wei: quantity(&tx.value)?,
            gas_limit: optional_quantity(tx.gas.as_deref())?,
            gas_price_wei: optional_quantity(tx.gas_price.as_deref())?,
            max_fee_per_gas_wei: optional_quantity(tx.max_fee_per_gas.as_deref())?,
            nonce: narrow(quantity(&tx.nonce)?)?,
            chain_id: optional_quantity(tx.chain_id.as_deref())?
                .map(narrow)
                .transpose()?,
            receipt: receipt.map(EvmReceiptResponse::decode).transpose()?,
            recipient_is_contract,
            from: tx.from,
            to: tx.to,
        }))
    }

    async fn erc20_balance(
        &self,
        chain: Chain,
        token: &str,
        holder: &str,
    ) -> OutboundResult<u128> {
        let call = json!({ "to": token, "data": balance_of_call(holder) });
        let word: String = self.call(chain, "eth_call", json!([call, "latest"])).await?;
        quantity(&word)
    }
}

#[cfg(test)]
mod tests {
    use super::{balance_of_call, quantity};
    use rstest::rstest;

    #[rstest]
    fn balance_calls_pad_the_holder_to_one_word() {
        let data = balance_of_call("0xAbCdEf0123456789aBcDeF0123456789ABCDEF01");

        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x70a08231000000000000000000000000"));
        assert!(data.ends_with("abcdef0123456789abcdef0123456789abcdef01"));
    }

    #[rstest]
    fn a_zero_padded_word_decodes() {
        let word = format!("0x{:0>64}", "16e360");
        assert_eq!(quantity(&word).expect("valid quantity"), 1_500_000);
    }
}
