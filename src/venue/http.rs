//! GalaSwap REST client
//!
//! Plain request/response calls with no retry: a failed call surfaces as
//! `RemoteUnavailable` and the engine skips that pair for the cycle.
//! Non-JSON bodies are kept as `{"_raw": text}` for error messages.

use super::{FeeQuote, PublicKeyResponse, SubmitReceipt, SwapVenue, TokenCatalog};
use crate::authorization::{FeeProbe, SignedAuthorization};
use crate::error::{EngineError, EngineResult};
use crate::quote::{self, RawTokenSwap};
use crate::types::{PriceBook, SwapQuote, TokenClass};
use async_trait::async_trait;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://api-galaswap.gala.com";

const TOKENS_PATH: &str = "/v1/tokens";
const FETCH_SWAPS_PATH: &str = "/v1/FetchAvailableTokenSwaps";
const FILL_FEE_PATH: &str = "/v1/BatchFillTokenSwap/fee";
const FILL_PATH: &str = "/v1/BatchFillTokenSwap";
const PUBLIC_KEY_PATH: &str = "/galachain/api/asset/public-key-contract/GetPublicKey";

const WALLET_HEADER: &str = "X-Wallet-Address";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapSearch<'a> {
    offered_token_class: &'a TokenClass,
    wanted_token_class: &'a TokenClass,
}

#[derive(Debug, Deserialize)]
struct SwapSearchResults {
    #[serde(default)]
    results: Vec<Value>,
}

impl SwapSearchResults {
    /// Results come best-first; only the head is decoded, the rest are ignored
    fn best_offer(self) -> EngineResult<Option<SwapQuote>> {
        let first = match self.results.into_iter().next() {
            Some(first) => first,
            None => return Ok(None),
        };
        let raw: RawTokenSwap = serde_json::from_value(first)
            .map_err(|e| EngineError::MalformedOffer(format!("best swap result: {}", e)))?;
        quote::normalize(&raw).map(Some)
    }
}

pub struct GalaSwapClient {
    base_url: String,
    wallet_address: String,
    client: reqwest::Client,
}

impl GalaSwapClient {
    pub fn new(base_url: &str, wallet_address: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            wallet_address: wallet_address.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> EngineResult<Value> {
        let url = self.url(path);
        let res = self.client.get(&url).send().await?;
        Self::read_json("GET", &url, res).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        with_wallet: bool,
    ) -> EngineResult<Value> {
        let url = self.url(path);
        let mut req = self.client.post(&url).json(body);
        if with_wallet {
            req = req.header(WALLET_HEADER, &self.wallet_address);
        }
        let res = req.send().await?;
        Self::read_json("POST", &url, res).await
    }

    async fn read_json(method: &str, url: &str, res: reqwest::Response) -> EngineResult<Value> {
        let status = res.status();
        let text = res.text().await?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "_raw": text }));

        if !status.is_success() {
            return Err(EngineError::RemoteUnavailable(format!(
                "{} {} => {}: {}",
                method, url, status.as_u16(), body
            )));
        }
        debug!("{} {} => {}", method, url, status.as_u16());
        Ok(body)
    }

    fn decode<T: for<'de> Deserialize<'de>>(what: &str, body: Value) -> EngineResult<T> {
        serde_json::from_value(body)
            .map_err(|e| EngineError::RemoteUnavailable(format!("unexpected {} response: {}", what, e)))
    }
}

#[async_trait]
impl SwapVenue for GalaSwapClient {
    async fn fetch_prices(&self) -> EngineResult<PriceBook> {
        let body = self.get(TOKENS_PATH).await?;
        let catalog: TokenCatalog = Self::decode("token catalog", body)?;
        Ok(catalog.into_price_book())
    }

    async fn fetch_offer(
        &self,
        offered: &TokenClass,
        wanted: &TokenClass,
    ) -> EngineResult<Option<SwapQuote>> {
        let search = SwapSearch {
            offered_token_class: offered,
            wanted_token_class: wanted,
        };
        let body = self.post(FETCH_SWAPS_PATH, &search, false).await?;
        let found: SwapSearchResults = Self::decode("swap search", body)?;
        found.best_offer()
    }

    async fn estimate_fee(&self, quote: &SwapQuote, uses: &BigUint) -> EngineResult<f64> {
        let probe = FeeProbe::new(quote, uses);
        let body = self.post(FILL_FEE_PATH, &probe, true).await?;
        let fees: FeeQuote = Self::decode("fee", body)?;
        Ok(fees.total())
    }

    async fn fetch_signer_public_key(&self, wallet_address: &str) -> EngineResult<String> {
        let body = self
            .post(PUBLIC_KEY_PATH, &json!({ "user": wallet_address }), false)
            .await?;
        PublicKeyResponse::parse(body)
    }

    async fn submit(&self, authorization: &SignedAuthorization) -> EngineResult<SubmitReceipt> {
        let body = self.post(FILL_PATH, authorization, true).await?;
        Ok(SubmitReceipt::from_response(body))
    }
}
