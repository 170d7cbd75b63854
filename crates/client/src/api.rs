//! Async backend API: the trait and its HTTP implementation.

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::dto::{
    AdjustStockRequest, AggregatedProducts, InboundStockRequest, LocationInventory,
    MutationResponse, OutboundStockRequest, ProductQuery, TransferStockRequest,
};
use crate::error::{ClientError, ClientResult};

/// The fixed backend contract the engine consumes.
///
/// Every mutation returns post-operation absolute quantities; the client
/// never infers them from the request payload.
#[allow(async_fn_in_trait)]
pub trait InventoryApi {
    async fn get_location_inventory(&self) -> ClientResult<Vec<LocationInventory>>;

    async fn get_aggregated_products(&self, query: &ProductQuery)
    -> ClientResult<AggregatedProducts>;

    async fn adjust_stock(&self, request: &AdjustStockRequest) -> ClientResult<MutationResponse>;

    async fn transfer_stock(&self, request: &TransferStockRequest)
    -> ClientResult<MutationResponse>;

    async fn inbound_stock(&self, request: &InboundStockRequest) -> ClientResult<MutationResponse>;

    async fn outbound_stock(&self, request: &OutboundStockRequest)
    -> ClientResult<MutationResponse>;
}

/// `reqwest`-backed implementation of [`InventoryApi`].
///
/// Timeouts and retries are delegated to the transport layer; this type
/// only maps transport, status and decode failures onto [`ClientError`].
#[derive(Debug, Clone)]
pub struct HttpInventoryApi {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpInventoryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn dispatch<T>(&self, path: &str, request: reqwest::RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let request_id = Uuid::now_v7();
        tracing::debug!(%request_id, path, "dispatching inventory API request");

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%request_id, status = status.as_u16(), "inventory API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn get_json<T>(&self, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        self.dispatch(path, self.http.get(&url)).await
    }

    async fn post_json<T>(&self, path: &str, body: &impl Serialize) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        self.dispatch(path, self.http.post(&url).json(body)).await
    }
}

impl InventoryApi for HttpInventoryApi {
    async fn get_location_inventory(&self) -> ClientResult<Vec<LocationInventory>> {
        self.get_json("/inventory/locations").await
    }

    async fn get_aggregated_products(
        &self,
        query: &ProductQuery,
    ) -> ClientResult<AggregatedProducts> {
        let url = format!("{}/inventory/products", self.base_url);
        self.dispatch("/inventory/products", self.http.get(&url).query(query))
            .await
    }

    async fn adjust_stock(&self, request: &AdjustStockRequest) -> ClientResult<MutationResponse> {
        self.post_json("/inventory/adjust", request).await
    }

    async fn transfer_stock(
        &self,
        request: &TransferStockRequest,
    ) -> ClientResult<MutationResponse> {
        self.post_json("/inventory/transfer", request).await
    }

    async fn inbound_stock(&self, request: &InboundStockRequest) -> ClientResult<MutationResponse> {
        self.post_json("/inventory/inbound", request).await
    }

    async fn outbound_stock(
        &self,
        request: &OutboundStockRequest,
    ) -> ClientResult<MutationResponse> {
        self.post_json("/inventory/outbound", request).await
    }
}
