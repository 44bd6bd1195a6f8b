//! # ツイートユースケース
//!
//! ツイートの一覧取得と投稿のビジネスロジックを実装する。

use std::sync::Arc;

use chrono::Utc;
use saezuri_domain::{
    tweet::{Tweet, TweetId, TweetText},
    user::{User, UserId},
};
use saezuri_infra::{InfraError, repository::TweetRepository};
use thiserror::Error;

/// ツイートユースケースで発生するエラー
#[derive(Debug, Error)]
pub enum TweetUseCaseError {
    /// 作成者が存在しない（外部キー制約違反）
    ///
    /// トークンの subject が有効なユーザーを指していない場合に発生する。
    #[error("作成者が存在しません")]
    UnknownAuthor,

    /// インフラ層エラー（DB 接続エラーなど）
    #[error("内部エラー: {0}")]
    Internal(#[from] InfraError),
}

/// ツイートユースケースの実装
pub struct TweetUseCaseImpl {
    tweet_repository: Arc<dyn TweetRepository>,
}

impl TweetUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(tweet_repository: Arc<dyn TweetRepository>) -> Self {
        Self { tweet_repository }
    }

    /// 全ツイートを作成者付きで取得する
    ///
    /// 挿入順（`created_at, id` 昇順）で返す。
    pub async fn list(&self) -> Result<Vec<(Tweet, User)>, TweetUseCaseError> {
        Ok(self.tweet_repository.find_all_with_user().await?)
    }

    /// ツイートを投稿する
    ///
    /// 作成者の存在確認は DB の外部キー制約に委ね、違反は
    /// [`TweetUseCaseError::UnknownAuthor`] に変換する。
    pub async fn post(
        &self,
        author_id: UserId,
        text: TweetText,
    ) -> Result<Tweet, TweetUseCaseError> {
        let tweet = Tweet::new(TweetId::new(), text, author_id, Utc::now());

        self.tweet_repository
            .create(&tweet)
            .await
            .map_err(|e| match e {
                InfraError::ForeignKeyViolation { .. } => TweetUseCaseError::UnknownAuthor,
                other => TweetUseCaseError::Internal(other),
            })?;

        tracing::info!(tweet_id = %tweet.id(), user_id = %tweet.user_id(), "ツイートを投稿しました");

        Ok(tweet)
    }
}
