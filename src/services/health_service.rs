use crate::config::HealthConfig;
use crate::domain::repository::ChatRepository;
use opentelemetry::{KeyValue, global, metrics::Histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) check_duration_seconds: Histogram<f64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dm-server");
        Self {
            check_duration_seconds: meter
                .f64_histogram("dm_health_check_duration_seconds")
                .with_description("Duration of readiness checks")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    repo: Arc<dyn ChatRepository>,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(repo: Arc<dyn ChatRepository>, config: HealthConfig) -> Self {
        Self { repo, config, metrics: Metrics::new() }
    }

    /// Checks database connectivity.
    ///
    /// # Errors
    /// Returns a string describing the failure if the database is unreachable or slow.
    pub async fn check_db(&self) -> Result<(), String> {
        let db_timeout = Duration::from_millis(self.config.db_timeout_ms);
        let start = Instant::now();

        let res = match timeout(db_timeout, self.repo.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("Database connection failed: {e}")),
            Err(_) => Err("Database connection timed out".to_string()),
        };

        self.metrics
            .check_duration_seconds
            .record(start.elapsed().as_secs_f64(), &[KeyValue::new("component", "database")]);
        res
    }
}
