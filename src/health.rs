//! Component health registry backing the `/health` endpoint

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl HealthCheckResult {
    fn new(status: HealthStatus, message: Option<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            status,
            message,
            details,
            duration_ms: None,
        }
    }

    pub fn healthy() -> Self {
        Self::new(HealthStatus::Healthy, None, None)
    }

    pub fn healthy_with_details(details: serde_json::Value) -> Self {
        Self::new(HealthStatus::Healthy, None, Some(details))
    }

    pub fn degraded(message: String) -> Self {
        Self::new(HealthStatus::Degraded, Some(message), None)
    }

    pub fn unhealthy(message: String) -> Self {
        Self::new(HealthStatus::Unhealthy, Some(message), None)
    }

    pub fn unhealthy_with_details(message: String, details: serde_json::Value) -> Self {
        Self::new(HealthStatus::Unhealthy, Some(message), Some(details))
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// A component that can report its own health
#[async_trait]
pub trait HealthChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> HealthCheckResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub checks: BTreeMap<String, HealthCheckResult>,
    pub summary: HealthSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct HealthSummary {
    pub total_checks: usize,
    pub healthy_count: usize,
    pub degraded_count: usize,
    pub unhealthy_count: usize,
    pub total_duration_ms: u64,
}

#[derive(Default)]
pub struct HealthService {
    checkers: RwLock<BTreeMap<String, Arc<dyn HealthChecker>>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().to_string();
        tracing::debug!(checker = %name, "Registered health checker");
        self.checkers.write().await.insert(name, checker);
    }

    pub async fn registered_checkers(&self) -> Vec<String> {
        self.checkers.read().await.keys().cloned().collect()
    }

    /// Run checks selected by `filter`: `"all"`, a single checker name, or
    /// nothing for a liveness-only response.
    pub async fn check_health(&self, filter: Option<&str>) -> HealthResponse {
        let checkers = self.checkers.read().await;
        let selected: Vec<_> = match filter {
            None => Vec::new(),
            Some("all") => checkers.iter().collect(),
            Some(name) => checkers.iter().filter(|(n, _)| n.as_str() == name).collect(),
        };

        let mut checks = BTreeMap::new();
        let mut summary = HealthSummary::default();
        for (name, checker) in selected {
            let started = Instant::now();
            let result = checker.check().await;
            let duration_ms = started.elapsed().as_millis() as u64;

            summary.total_duration_ms += duration_ms;
            match result.status {
                HealthStatus::Healthy => summary.healthy_count += 1,
                HealthStatus::Degraded => summary.degraded_count += 1,
                HealthStatus::Unhealthy => summary.unhealthy_count += 1,
            }
            checks.insert(name.clone(), result.with_duration(duration_ms));
        }
        summary.total_checks = checks.len();

        // Worst component status wins
        let status = checks
            .values()
            .map(|r| r.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);

        HealthResponse {
            status,
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks,
            summary,
        }
    }
}
