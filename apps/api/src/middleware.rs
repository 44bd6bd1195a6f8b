//! # Bearer トークン認証ミドルウェア
//!
//! `/tweets` 系ルートを保護する axum ミドルウェア。
//!
//! ## 動作
//!
//! 1. `Authorization: Bearer <token>` ヘッダーからトークンを抽出
//! 2. 署名と有効期限を検証
//! 3. 成功時は subject を [`CurrentUser`] として request extension に格納
//!
//! ヘッダーなし・スキーム不正・署名不正・期限切れはすべて 401 を返す。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use saezuri_domain::user::UserId;
use saezuri_infra::TokenVerifier;

use crate::error::ApiError;

/// ミドルウェアの共有状態
#[derive(Clone)]
pub struct AuthLayerState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// 認証済みユーザー（トークンの subject）
///
/// ミドルウェアが request extension に格納し、ハンドラが取り出す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

/// Bearer トークンを検証するミドルウェア
pub async fn require_bearer(
    State(state): State<AuthLayerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.verifier.verify(token).map_err(|e| {
        tracing::debug!("トークン検証失敗: {}", e);
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(CurrentUser(claims.user_id()));

    Ok(next.run(req).await)
}

/// Authorization ヘッダーから Bearer トークンを抽出する
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?
        .trim();

    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    Ok(token)
}
