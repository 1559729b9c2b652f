use super::GlooHttpClient;
use crate::domain::drawing::{DrawingId, DrawingRepository, DrawingScope, NewDrawing, PersistedDrawing};
use crate::domain::errors::NetworkResult;
use crate::domain::logging::LogComponent;
use crate::log_info;

/// REST client for the `/drawings` collection.
#[derive(Debug, Clone)]
pub struct DrawingApiClient {
    http: GlooHttpClient,
}

impl DrawingApiClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self { http: GlooHttpClient::new(api_base_url) }
    }

    pub fn list_url(&self, scope: &DrawingScope) -> String {
        super::HttpUtils::build_url_with_params(&self.http.url("drawings"), &scope_query(scope))
    }

    pub fn item_url(&self, id: &DrawingId) -> String {
        self.http.url(&item_endpoint(id))
    }
}

fn scope_query(scope: &DrawingScope) -> [(&str, &str); 3] {
    [
        ("userId", scope.user_id.as_str()),
        ("symbolId", scope.symbol_id.as_str()),
        ("timeframe", scope.timeframe.as_str()),
    ]
}

fn item_endpoint(id: &DrawingId) -> String {
    format!("drawings/{}", super::HttpUtils::url_encode(id.as_str()))
}

impl DrawingRepository for DrawingApiClient {
    async fn list(&self, scope: &DrawingScope) -> NetworkResult<Vec<PersistedDrawing>> {
        let records: Vec<PersistedDrawing> = self.http.get_json("drawings", &scope_query(scope)).await?;
        log_info!(
            LogComponent::Infrastructure("DrawingApi"),
            "fetched {} drawings for {}/{}",
            records.len(),
            scope.symbol_id,
            scope.timeframe
        );
        Ok(records)
    }

    async fn create(&self, drawing: &NewDrawing) -> NetworkResult<PersistedDrawing> {
        self.http.post_json("drawings", drawing).await
    }

    async fn delete(&self, id: &DrawingId) -> NetworkResult<()> {
        self.http.delete(&item_endpoint(id)).await
    }
}
