//! Keeps the drawing store and the backend drawing collection in step.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use futures::future::join_all;

use crate::application::stores::DrawingStore;
use crate::domain::drawing::{
    Drawing, DrawingId, DrawingRepository, DrawingScope, FibonacciRetracement, HorizontalLine,
    NewDrawing, PersistedDrawing, TrendLine,
};
use crate::domain::errors::NetworkResult;
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_error, log_info, log_warn};

const COMPONENT: LogComponent = LogComponent::Application("DrawingSync");

/// Persistence service bound to one drawing store.
///
/// Lists are cached per scope; any create or delete drops the cached list for
/// its scope so the next load goes back to the backend. Calls may overlap and
/// no borrow is held across an `.await`; only the most recent `load` may
/// write the store, and saves finishing after a scope change leave the
/// current scope's records alone.
pub struct DrawingSync<R: DrawingRepository> {
    repository: R,
    store: DrawingStore,
    scope: RefCell<DrawingScope>,
    cache: RefCell<HashMap<DrawingScope, Vec<PersistedDrawing>>>,
    records: RefCell<Vec<PersistedDrawing>>,
    load_generation: Cell<u64>,
}

impl<R: DrawingRepository> DrawingSync<R> {
    pub fn new(repository: R, store: DrawingStore, scope: DrawingScope) -> Self {
        Self {
            repository,
            store,
            scope: RefCell::new(scope),
            cache: RefCell::new(HashMap::new()),
            records: RefCell::new(Vec::new()),
            load_generation: Cell::new(0),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn scope(&self) -> DrawingScope {
        self.scope.borrow().clone()
    }

    /// Backend records behind the drawings currently in the store.
    pub fn records(&self) -> Vec<PersistedDrawing> {
        self.records.borrow().clone()
    }

    /// Replace the store contents with the drawings saved for `scope`.
    /// Returns how many drawings were loaded; a response overtaken by a later
    /// `load` is discarded and counts as 0.
    pub async fn load(&self, scope: DrawingScope) -> NetworkResult<usize> {
        let generation = self.load_generation.get() + 1;
        self.load_generation.set(generation);
        *self.scope.borrow_mut() = scope.clone();
        if !scope.is_complete() {
            log_warn!(COMPONENT, "skipping drawing load: no user or symbol selected");
            self.records.borrow_mut().clear();
            self.store.clear_all();
            return Ok(0);
        }

        let records = self.list_cached(&scope).await?;
        if self.load_generation.get() != generation {
            log_debug!(COMPONENT, "discarding stale drawing list for {} {}", scope.symbol_id, scope.timeframe);
            return Ok(0);
        }
        let drawings: Vec<Drawing> = records
            .iter()
            .filter_map(|record| {
                let drawing = record.to_drawing();
                if drawing.is_none() {
                    log_debug!(
                        COMPONENT,
                        "dropping drawing {} of type '{}' with {} points",
                        record.id,
                        record.kind.as_str(),
                        record.points.len()
                    );
                }
                drawing
            })
            .collect();

        // The backend is authoritative: a reload discards local state.
        self.store.clear_all();
        let count = drawings.len();
        for drawing in drawings {
            self.store.add(drawing);
        }
        *self.records.borrow_mut() = records;

        log_info!(
            COMPONENT,
            "loaded {} drawings for {} {}",
            count,
            scope.symbol_id,
            scope.timeframe
        );
        Ok(count)
    }

    pub async fn save_horizontal_line(&self, line: &HorizontalLine) -> NetworkResult<Option<PersistedDrawing>> {
        self.save(Drawing::Horizontal(line.clone())).await
    }

    pub async fn save_trend_line(&self, line: &TrendLine) -> NetworkResult<Option<PersistedDrawing>> {
        self.save(Drawing::Trend(line.clone())).await
    }

    pub async fn save_fibonacci_retracement(
        &self,
        fib: &FibonacciRetracement,
    ) -> NetworkResult<Option<PersistedDrawing>> {
        self.save(Drawing::Fibonacci(fib.clone())).await
    }

    /// Create the backend record for a drawing already in the store and re-key
    /// the store entry to the backend id. Without a complete scope nothing is
    /// sent and `Ok(None)` is returned.
    pub async fn save(&self, drawing: Drawing) -> NetworkResult<Option<PersistedDrawing>> {
        let scope = self.scope();
        if !scope.is_complete() {
            log_warn!(
                COMPONENT,
                "not saving drawing {}: user or symbol missing (user='{}', symbol='{}')",
                drawing.id(),
                scope.user_id,
                scope.symbol_id
            );
            return Ok(None);
        }

        let body = NewDrawing::from_drawing(&scope, &drawing)?;
        let record = self.repository.create(&body).await.inspect_err(|err| {
            log_error!(COMPONENT, "failed to save drawing {}: {}", drawing.id(), err);
        })?;

        self.invalidate(&scope);
        if self.scope() != scope {
            log_debug!(COMPONENT, "drawing {} saved after its chart was left", drawing.id());
            return Ok(Some(record));
        }
        if &record.id != drawing.id() && !self.store.replace_id(drawing.id(), &record.id) {
            log_debug!(COMPONENT, "drawing {} was removed before its save completed", drawing.id());
        }
        self.records.borrow_mut().push(record.clone());
        Ok(Some(record))
    }

    pub async fn delete_drawing(&self, id: &DrawingId) -> NetworkResult<()> {
        self.repository.delete(id).await.inspect_err(|err| {
            log_error!(COMPONENT, "failed to delete drawing {}: {}", id, err);
        })?;

        self.invalidate(&self.scope());
        self.records.borrow_mut().retain(|record| &record.id != id);
        self.store.remove(id);
        Ok(())
    }

    /// Delete every loaded record concurrently, then clear the store. The
    /// store is cleared even when some deletes fail; the first failure is
    /// returned.
    pub async fn clear_all_persistent(&self) -> NetworkResult<()> {
        let ids: Vec<DrawingId> = self.records.borrow().iter().map(|r| r.id.clone()).collect();
        let results = join_all(ids.iter().map(|id| self.repository.delete(id))).await;

        let mut first_error = None;
        for (id, result) in ids.iter().zip(results) {
            if let Err(err) = result {
                log_error!(COMPONENT, "failed to delete drawing {}: {}", id, err);
                first_error.get_or_insert(err);
            }
        }

        self.invalidate(&self.scope());
        self.records.borrow_mut().clear();
        self.store.clear_all();

        match first_error {
            Some(err) => Err(err),
            None => {
                log_info!(COMPONENT, "cleared {} persisted drawings", ids.len());
                Ok(())
            }
        }
    }

    async fn list_cached(&self, scope: &DrawingScope) -> NetworkResult<Vec<PersistedDrawing>> {
        if let Some(hit) = self.cache.borrow().get(scope) {
            return Ok(hit.clone());
        }
        let records = self.repository.list(scope).await.inspect_err(|err| {
            log_error!(COMPONENT, "failed to load drawings for {}: {}", scope.symbol_id, err);
        })?;
        self.cache.borrow_mut().insert(scope.clone(), records.clone());
        Ok(records)
    }

    fn invalidate(&self, scope: &DrawingScope) {
        self.cache.borrow_mut().remove(scope);
    }
}
