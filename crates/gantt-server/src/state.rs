use crate::error::AppError;
use gantt_core::config::{DashboardOptions, StoreSettings};
use gantt_core::store::AirtableStore;
use gantt_core::{Dashboard, ResolvedFields};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on one aggregation, including every page of every table.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AirtableStore>,
    pub options: Arc<DashboardOptions>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Fails when the store settings are unusable, so a misconfigured server
    /// never starts listening.
    pub fn new(settings: StoreSettings, options: DashboardOptions) -> gantt_core::Result<Self> {
        Ok(Self {
            store: Arc::new(AirtableStore::new(settings)?),
            options: Arc::new(options),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Run one aggregation under `request_timeout`. On timeout every
    /// in-flight table fetch is dropped.
    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let work = gantt_core::aggregate(self.store.as_ref(), &self.options);
        match tokio::time::timeout(self.request_timeout, work).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AppError::timeout(self.request_timeout)),
        }
    }

    pub async fn fields(&self) -> Result<ResolvedFields, AppError> {
        let work = gantt_core::resolve_fields(self.store.as_ref(), &self.options);
        tokio::time::timeout(self.request_timeout, work)
            .await
            .map_err(|_| AppError::timeout(self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantt_core::GanttError;

    #[test]
    fn new_state_rejects_missing_credentials() {
        let err = AppState::new(StoreSettings::new("", ""), DashboardOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, GanttError::MissingCredentials(_)));
    }

    #[test]
    fn new_state_keeps_options() {
        let mut options = DashboardOptions::default();
        options.tables.milestones = "Roadmap".to_string();
        let state = AppState::new(StoreSettings::new("appTest", "pat"), options)
            .unwrap()
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(state.options.tables.milestones, "Roadmap");
        assert_eq!(state.request_timeout, Duration::from_secs(5));
        assert_eq!(state.store.settings().base_id, "appTest");
    }
}
