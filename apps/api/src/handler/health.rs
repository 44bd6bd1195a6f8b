//! # ヘルスチェックハンドラ
//!
//! API サーバーの稼働状態を確認するためのエンドポイント。
//!
//! - `GET /health` - liveness（プロセスが応答するか）
//! - `GET /health/ready` - readiness（依存サービスに接続できるか）

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use saezuri_shared::{
    HealthResponse,
    health::{CheckStatus, ReadinessResponse, ReadinessStatus},
};
use sqlx::PgPool;

/// Readiness Check 用の共有状態
pub struct ReadinessState {
    pub pool: PgPool,
}

/// GET /health
///
/// liveness エンドポイント。プロセスが応答する限り 200 を返す。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health/ready
///
/// readiness エンドポイント。データベースへの疎通を確認し、
/// 失敗時は 503 を返す。
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mut checks = HashMap::new();

    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => CheckStatus::Ok,
        Err(e) => {
            tracing::warn!("データベース疎通確認に失敗: {}", e);
            CheckStatus::Error
        }
    };
    checks.insert("database".to_string(), database);

    let response = ReadinessResponse::from_checks(checks);
    let status = match response.status {
        ReadinessStatus::Ready => StatusCode::OK,
        ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response))
}
