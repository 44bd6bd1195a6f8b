//! # インフラ層エラー定義
//!
//! データベースや暗号ライブラリとの連携で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **構造化された分類**: 一意制約違反・外部キー違反は `From<sqlx::Error>`
//!   の変換時に専用バリアントへ分類する。エラー型名の文字列比較による
//!   判別は行わない
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **ログ可能性**: Debug によりログ出力時に詳細情報を表示

use thiserror::Error;

/// インフラ層で発生するエラー
///
/// API 層でこのエラー種別に応じて適切な HTTP レスポンスに変換する:
/// 一意制約違反は 422、外部キー違反は認証エラー扱い、その他は 500。
#[derive(Debug, Error)]
pub enum InfraError {
    /// データベースエラー
    ///
    /// SQL クエリの実行失敗、接続エラーなど（制約違反を除く）。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 一意制約違反
    ///
    /// username / email の重複挿入で発生する。
    /// `constraint` には違反した制約名（例: `users_email_key`）が入る。
    #[error("一意制約に違反しました")]
    UniqueViolation {
        /// 違反した制約名（データベースが報告した場合のみ）
        constraint: Option<String>,
    },

    /// 外部キー制約違反
    ///
    /// 存在しないユーザーを作成者とするツイートの挿入で発生する。
    #[error("外部キー制約に違反しました")]
    ForeignKeyViolation {
        /// 違反した制約名（データベースが報告した場合のみ）
        constraint: Option<String>,
    },

    /// 予期しないエラー
    ///
    /// 上記に分類できない予期しないエラー。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl From<sqlx::Error> for InfraError {
    /// sqlx のエラーを分類する
    ///
    /// 制約違反はデータベースドライバが報告する種別で判定する。
    fn from(source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::UniqueViolation {
                constraint: db.constraint().map(ToOwned::to_owned),
            },
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::ForeignKeyViolation {
                    constraint: db.constraint().map(ToOwned::to_owned),
                }
            }
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_制約違反以外のsqlxエラーはdatabaseに分類される() {
        let err: InfraError = sqlx::Error::RowNotFound.into();

        assert!(matches!(err, InfraError::Database(_)));
    }

    #[test]
    fn test_displayが日本語メッセージを出力する() {
        let err = InfraError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
        };

        assert_eq!(format!("{err}"), "一意制約に違反しました");
    }

    #[test]
    fn test_sourceがsqlxエラーに委譲する() {
        use std::error::Error as _;

        let err: InfraError = sqlx::Error::RowNotFound.into();

        assert!(err.source().is_some());
    }
}
