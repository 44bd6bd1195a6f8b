//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **一意制約の委譲**: username / email の一意性は DB 制約で強制し、
//!   違反は [`InfraError::UniqueViolation`] として呼び出し元へ返す
//! - **実行時バインド**: クエリは `sqlx::query` + `bind` で組み立てる

use async_trait::async_trait;
use saezuri_domain::{
    password::PasswordHash,
    user::{Email, User, UserId},
    value_objects::{DisplayName, UserName},
};
use sqlx::{PgPool, Row as _, postgres::PgRow};

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
///
/// ユーザー情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成する
    ///
    /// # 戻り値
    ///
    /// - `Ok(())`: 作成成功
    /// - `Err(InfraError::UniqueViolation)`: username / email が重複
    /// - `Err(_)`: その他のデータベースエラー
    async fn create(&self, user: &User) -> Result<(), InfraError>;

    /// メールアドレスでユーザーを検索する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: ユーザーが見つかった場合
    /// - `Ok(None)`: ユーザーが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 行をドメインエンティティに復元する
///
/// DB の値が値オブジェクトの制約を満たさない場合は
/// [`InfraError::Unexpected`]（データ破損扱い）。
fn row_to_user(row: &PgRow) -> Result<User, InfraError> {
    let id: uuid::Uuid = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let username: String = row.try_get("username")?;
    let email: String = row.try_get("email")?;
    let password_hash: String = row.try_get("password_hash")?;
    let created_at = row.try_get("created_at")?;

    Ok(User::from_db(
        UserId::from_uuid(id),
        DisplayName::new(name).map_err(|e| InfraError::Unexpected(e.to_string()))?,
        UserName::new(username).map_err(|e| InfraError::Unexpected(e.to_string()))?,
        Email::new(email).map_err(|e| InfraError::Unexpected(e.to_string()))?,
        PasswordHash::new(password_hash),
        created_at,
    ))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name().as_str())
        .bind(user.username().as_str())
        .bind(user.email().as_str())
        .bind(user.password_hash().as_str())
        .bind(user.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, InfraError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(row_to_user(&row)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresUserRepository>();
    }
}
