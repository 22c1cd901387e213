//! Health check service.
//!
//! Reports whether the database answers and its schema is current, for
//! monitoring and load balancers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use bazaar_db::{migrations, Database};

/// Serving status of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingStatus {
    Serving,
    NotServing,
}

/// Embedded migrations recorded as applied, out of those compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationState {
    pub applied: usize,
    pub total: usize,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: ServingStatus,
    pub message: String,
    /// Absent when the database is down.
    pub migrations: Option<MigrationState>,
    pub server_time: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_serving(&self) -> bool {
        self.status == ServingStatus::Serving
    }
}

#[derive(Debug, Clone)]
pub struct HealthService {
    db: Database,
}

impl HealthService {
    pub fn new(db: Database) -> Self {
        HealthService { db }
    }

    /// Check database connectivity and migration state.
    pub async fn check(&self) -> HealthReport {
        let mut report = HealthReport {
            status: ServingStatus::NotServing,
            message: "Database unreachable".to_string(),
            migrations: None,
            server_time: Utc::now(),
        };

        if !self.db.health_check().await {
            warn!("Health check failed: database unreachable");
            return report;
        }

        match migrations::migration_status(self.db.pool()).await {
            Ok((total, applied)) => {
                report.migrations = Some(MigrationState { applied, total });
                if applied < total {
                    warn!(applied, total, "Health check failed: pending migrations");
                    report.message = "Pending migrations".to_string();
                } else {
                    report.status = ServingStatus::Serving;
                    report.message = "OK".to_string();
                }
            }
            Err(e) => {
                warn!(error = %e, "Health check failed: migration status unavailable");
                report.message = "Migration status unavailable".to_string();
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    #[tokio::test]
    async fn test_serving_while_database_is_open() {
        let db = testing::db().await;
        let report = HealthService::new(db.clone()).check().await;
        assert!(report.is_serving());
        let migrations = report.migrations.unwrap();
        assert!(migrations.total > 0);
        assert_eq!(migrations.applied, migrations.total);

        db.close().await;
        let report = HealthService::new(db).check().await;
        assert_eq!(report.status, ServingStatus::NotServing);
        assert!(report.migrations.is_none());
    }
}
