//! Application state shared by all handlers

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use transquest_core::{LanguageDirection, QualityReport, QualityService};

use crate::error::ApiError;

/// Shared application state: loaded models plus inference admission control
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QualityService>,
    /// Serializes blocking inference calls
    pub request_semaphore: Arc<Semaphore>,
    pub request_timeout_secs: u64,
}

impl AppState {
    pub fn new(service: QualityService) -> Self {
        let config = service.manager().config();
        let max_concurrent = config.max_concurrent_requests.max(1);
        let timeout = config.request_timeout_secs;

        Self {
            service: Arc::new(service),
            request_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            request_timeout_secs: timeout,
        }
    }

    /// Run the three models for one pair off the async runtime
    pub async fn estimate(
        &self,
        direction: LanguageDirection,
        source: String,
        target: String,
    ) -> Result<QualityReport, ApiError> {
        // Released when inference finishes, not when the request times out
        let permit = self
            .request_semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ApiError::internal("Server is shutting down"))?;

        let service = self.service.clone();
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            service.estimate(direction, &source, &target)
        });

        let joined = tokio::time::timeout(Duration::from_secs(self.request_timeout_secs), task)
            .await
            .map_err(|_| {
                ApiError::timeout(format!(
                    "Quality estimation exceeded {}s",
                    self.request_timeout_secs
                ))
            })?;

        let report = joined.map_err(|e| ApiError::internal(format!("Inference task failed: {}", e)))??;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use transquest_core::EngineConfig;

    use crate::testing::test_state;

    #[tokio::test(flavor = "multi_thread")]
    async fn timed_out_request_holds_permit_until_inference_ends() {
        let config = EngineConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        // Three model calls at 1.5s each outlive the 1s timeout
        let state = test_state(config, Duration::from_millis(1500));

        let err = state
            .estimate(
                LanguageDirection::EnDe,
                "Welcome".to_string(),
                "Herzlich willkommen".to_string(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(state.request_semaphore.available_permits(), 0);

        let permit = tokio::time::timeout(
            Duration::from_secs(10),
            state.request_semaphore.acquire(),
        )
        .await;
        assert!(permit.is_ok());
    }

    #[tokio::test]
    async fn completed_request_returns_its_permit() {
        let state = test_state(EngineConfig::default(), Duration::ZERO);
        let report = state
            .estimate(
                LanguageDirection::EnDe,
                "Welcome".to_string(),
                "Herzlich willkommen".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(report.hter_display(), "0.33");
        assert_eq!(state.request_semaphore.available_permits(), 1);
    }
}
