use std::collections::HashMap;
use std::time::Instant;

use actix_web::{web, HttpResponse};
use chrono::Utc;

use passcode_shared::types::ServiceHealth;
use passcode_shared::{HealthResponse, HealthStatus};

use crate::app::AppState;

/// Health check endpoint handler
///
/// 200 while the store answers, 503 otherwise.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let started = Instant::now();
    let store = match state.passcode_service.health_check().await {
        Ok(true) => ServiceHealth {
            status: HealthStatus::Healthy,
            message: None,
            response_time_ms: Some(started.elapsed().as_millis() as u64),
        },
        Ok(false) => ServiceHealth {
            status: HealthStatus::Unhealthy,
            message: Some("store did not answer ping".to_string()),
            response_time_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, event = "health_check_failed", "Store health check failed");
            ServiceHealth {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                response_time_ms: None,
            }
        }
    };

    let status = store.status;
    let mut services = HashMap::new();
    services.insert("store".to_string(), store);

    let body = HealthResponse {
        status,
        services,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if status == HealthStatus::Healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
