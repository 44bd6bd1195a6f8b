//! # TweetRepository
//!
//! ツイートの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **外部キーの委譲**: 作成者の存在確認は DB の外部キー制約に委ね、
//!   違反は [`InfraError::ForeignKeyViolation`] として呼び出し元へ返す
//! - **N+1 回避**: 一覧取得は作成者を JOIN で一括取得する

use async_trait::async_trait;
use saezuri_domain::{
    password::PasswordHash,
    tweet::{Tweet, TweetId, TweetText},
    user::{Email, User, UserId},
    value_objects::{DisplayName, UserName},
};
use sqlx::{PgPool, Row as _};

use crate::error::InfraError;

/// ツイートリポジトリトレイト
#[async_trait]
pub trait TweetRepository: Send + Sync {
    /// ツイートを作成する
    ///
    /// # 戻り値
    ///
    /// - `Ok(())`: 作成成功
    /// - `Err(InfraError::ForeignKeyViolation)`: 作成者が存在しない
    /// - `Err(_)`: その他のデータベースエラー
    async fn create(&self, tweet: &Tweet) -> Result<(), InfraError>;

    /// 全ツイートを作成者付きで取得する
    ///
    /// 挿入順（`created_at, id` 昇順）で返す。
    async fn find_all_with_user(&self) -> Result<Vec<(Tweet, User)>, InfraError>;
}

/// PostgreSQL 実装の TweetRepository
#[derive(Debug, Clone)]
pub struct PostgresTweetRepository {
    pool: PgPool,
}

impl PostgresTweetRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TweetRepository for PostgresTweetRepository {
    async fn create(&self, tweet: &Tweet) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO tweets (id, text, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(tweet.id().as_uuid())
        .bind(tweet.text().as_str())
        .bind(tweet.user_id().as_uuid())
        .bind(tweet.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all_with_user(&self) -> Result<Vec<(Tweet, User)>, InfraError> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.id            AS tweet_id,
                t.text          AS tweet_text,
                t.user_id       AS tweet_user_id,
                t.created_at    AS tweet_created_at,
                u.id            AS user_id,
                u.name          AS user_name,
                u.username      AS user_username,
                u.email         AS user_email,
                u.password_hash AS user_password_hash,
                u.created_at    AS user_created_at
            FROM tweets t
            INNER JOIN users u ON u.id = t.user_id
            ORDER BY t.created_at, t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let tweet_id: uuid::Uuid = row.try_get("tweet_id")?;
                let tweet_text: String = row.try_get("tweet_text")?;
                let tweet_user_id: uuid::Uuid = row.try_get("tweet_user_id")?;
                let tweet_created_at = row.try_get("tweet_created_at")?;

                let user_id: uuid::Uuid = row.try_get("user_id")?;
                let user_name: String = row.try_get("user_name")?;
                let user_username: String = row.try_get("user_username")?;
                let user_email: String = row.try_get("user_email")?;
                let user_password_hash: String = row.try_get("user_password_hash")?;
                let user_created_at = row.try_get("user_created_at")?;

                let tweet = Tweet::from_db(
                    TweetId::from_uuid(tweet_id),
                    TweetText::new(tweet_text)
                        .map_err(|e| InfraError::Unexpected(e.to_string()))?,
                    UserId::from_uuid(tweet_user_id),
                    tweet_created_at,
                );

                let user = User::from_db(
                    UserId::from_uuid(user_id),
                    DisplayName::new(user_name)
                        .map_err(|e| InfraError::Unexpected(e.to_string()))?,
                    UserName::new(user_username)
                        .map_err(|e| InfraError::Unexpected(e.to_string()))?,
                    Email::new(user_email).map_err(|e| InfraError::Unexpected(e.to_string()))?,
                    PasswordHash::new(user_password_hash),
                    user_created_at,
                );

                Ok((tweet, user))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresTweetRepository>();
    }
}
