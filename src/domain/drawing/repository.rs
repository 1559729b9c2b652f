use super::entities::DrawingId;
use super::persisted::{DrawingScope, NewDrawing, PersistedDrawing};
use crate::domain::errors::NetworkResult;

/// Backend drawing collection.
///
/// Futures are not `Send`; implementations run on the browser event loop.
#[allow(async_fn_in_trait)]
pub trait DrawingRepository {
    async fn list(&self, scope: &DrawingScope) -> NetworkResult<Vec<PersistedDrawing>>;

    async fn create(&self, drawing: &NewDrawing) -> NetworkResult<PersistedDrawing>;

    async fn delete(&self, id: &DrawingId) -> NetworkResult<()>;
}
