//! # ツイートハンドラ
//!
//! ツイートの一覧取得と投稿のエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `GET /tweets` - 全ツイートを作成者付きで取得
//! - `POST /tweets` - ツイートを投稿
//!
//! どちらも Bearer トークン必須。検証は
//! [`require_bearer`](crate::middleware::require_bearer) ミドルウェアが行い、
//! ハンドラは request extension の [`CurrentUser`] を受け取る。

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use saezuri_domain::{
    tweet::{Tweet, TweetText},
    user::User,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, middleware::CurrentUser, usecase::TweetUseCase};

/// ツイートハンドラの共有状態
pub struct TweetState {
    pub usecase: Arc<dyn TweetUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// ツイート投稿リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub text: String,
}

/// ツイートに埋め込む作成者情報
///
/// パスワードハッシュは含めない。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetUserResponse {
    pub id:       Uuid,
    pub name:     String,
    pub username: String,
    pub email:    String,
}

impl From<User> for TweetUserResponse {
    fn from(user: User) -> Self {
        Self {
            id:       *user.id().as_uuid(),
            name:     user.name().as_str().to_string(),
            username: user.username().as_str().to_string(),
            email:    user.email().as_str().to_string(),
        }
    }
}

/// ツイートレスポンス
///
/// 一覧では作成者を埋め込み、投稿直後のレスポンスでは省略する。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub id:         Uuid,
    pub text:       String,
    pub user_id:    Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user:       Option<TweetUserResponse>,
}

impl TweetResponse {
    fn from_tweet(tweet: Tweet) -> Self {
        Self {
            id:         *tweet.id().as_uuid(),
            text:       tweet.text().as_str().to_string(),
            user_id:    *tweet.user_id().as_uuid(),
            created_at: tweet.created_at(),
            user:       None,
        }
    }

    fn from_tweet_with_user(tweet: Tweet, user: User) -> Self {
        Self {
            user: Some(TweetUserResponse::from(user)),
            ..Self::from_tweet(tweet)
        }
    }
}

// --- ハンドラ ---

/// GET /tweets
///
/// 全ツイートを作成者付きで取得する。
///
/// ## レスポンス
///
/// - 200: ツイートの配列（挿入順）
/// - 401: トークンなし / 不正 / 期限切れ（ミドルウェアが返す）
/// - 500: データベースエラー
pub async fn list_tweets(
    State(state): State<Arc<TweetState>>,
) -> Result<impl IntoResponse, ApiError> {
    let tweets = state.usecase.list().await?;

    let response: Vec<TweetResponse> = tweets
        .into_iter()
        .map(|(tweet, user)| TweetResponse::from_tweet_with_user(tweet, user))
        .collect();

    Ok(Json(response))
}

/// POST /tweets
///
/// トークンの subject を作成者としてツイートを投稿する。
///
/// ## レスポンス
///
/// - 201: 作成されたツイート
/// - 400: 本文の検証失敗
/// - 401: トークンなし / 不正 / 期限切れ / 作成者不明
/// - 500: データベースエラー
pub async fn create_tweet(
    State(state): State<Arc<TweetState>>,
    Extension(CurrentUser(author_id)): Extension<CurrentUser>,
    Json(req): Json<CreateTweetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = TweetText::new(req.text)?;

    let tweet = state.usecase.post(author_id, text).await?;

    Ok((StatusCode::CREATED, Json(TweetResponse::from_tweet(tweet))))
}
