use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/v1/healthcheck",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Healthcheck"
)]
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body.status, "ok");
    }
}
