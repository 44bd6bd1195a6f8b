//! # API エラー定義
//!
//! API で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## ステータスコード方針
//!
//! 旧実装はエンドポイントごとに 401 / 404 / 500 が混在していたが、
//! 本実装では一貫したポリシーに統一する:
//!
//! | エラー | HTTP ステータス |
//! |--------|----------------|
//! | バリデーション失敗 | 400 |
//! | 認証失敗（資格情報なし / 不正 / 期限切れ、ログイン失敗を含む） | 401 |
//! | 一意制約違反（メールアドレス / ユーザー名の重複） | 422 |
//! | その他 | 500 |
//!
//! ログイン失敗で「メール不存在」と「パスワード不一致」を区別しないのは、
//! アカウントの存在確認攻撃を防ぐため。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use saezuri_domain::DomainError;
use saezuri_shared::ErrorResponse;
use thiserror::Error;

use crate::usecase::{AuthUseCaseError, TweetUseCaseError};

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力値の検証失敗
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 認証失敗
    ///
    /// 詳細な理由（資格情報なし / 署名不正 / 期限切れ / パスワード不一致）は
    /// 外部に公開しない。
    #[error("認証に失敗しました")]
    Unauthorized,

    /// 一意制約違反（メールアドレス / ユーザー名の重複）
    #[error("メールアドレスまたはユーザー名は既に使用されています")]
    Conflict,

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(source: DomainError) -> Self {
        match source {
            DomainError::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl From<AuthUseCaseError> for ApiError {
    fn from(source: AuthUseCaseError) -> Self {
        match source {
            AuthUseCaseError::AuthenticationFailed => Self::Unauthorized,
            AuthUseCaseError::DuplicateIdentity => Self::Conflict,
            AuthUseCaseError::Internal(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<TweetUseCaseError> for ApiError {
    fn from(source: TweetUseCaseError) -> Self {
        match source {
            // トークンの subject が有効なユーザーを指していない
            TweetUseCaseError::UnknownAuthor => Self::Unauthorized,
            TweetUseCaseError::Internal(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request(msg.as_str()),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::unauthorized("認証に失敗しました"),
            ),
            ApiError::Conflict => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::unprocessable_entity(
                    "メールアドレスまたはユーザー名は既に使用されています",
                ),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
