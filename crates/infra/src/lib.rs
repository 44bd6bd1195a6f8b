//! # Saezuri インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **リポジトリ実装**: ドメインエンティティの永続化
//! - **パスワードハッシュ**: Argon2id によるハッシュ化と検証
//! - **アクセストークン**: HS256 JWT の発行と検証
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! インフラ層は `domain` に依存する。
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。

pub mod db;
pub mod error;
pub mod password;
pub mod repository;
pub mod token;

pub use error::InfraError;
pub use password::{Argon2PasswordHasher, PasswordChecker, PasswordHasher};
pub use token::{AccessToken, Hs256TokenService, TokenClaims, TokenError, TokenIssuer, TokenVerifier};
