//! # アクセストークン
//!
//! HS256 署名付き JWT の発行と検証を提供する。
//!
//! ## トークン構造
//!
//! ペイロードは `{ sub: <ユーザー ID>, iat, exp }`。
//! 共有シークレットは環境変数から注入され、ハードコードしない。
//!
//! ## エラー分類
//!
//! 検証失敗は [`TokenError`] の構造化バリアント（期限切れ / 不正）で返す。
//! エラー型名の文字列比較による判別は行わない。

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use saezuri_domain::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InfraError;

/// 署名済みアクセストークン
///
/// `Authorization: Bearer <token>` ヘッダーでクライアントから送られる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// 署名済み文字列からインスタンスを作成する
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

/// トークンのペイロード（クレーム）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// subject: 認証されたユーザーの ID
    pub sub: Uuid,
    /// 発行日時（Unix 秒）
    pub iat: i64,
    /// 有効期限（Unix 秒）
    pub exp: i64,
}

impl TokenClaims {
    /// subject をユーザー ID として取得する
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }
}

/// トークン検証エラー
///
/// どちらのバリアントも API 層では 401 に変換される。
/// 分類はログとテストのために保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// 有効期限切れ
    #[error("トークンの有効期限が切れています")]
    Expired,
    /// 署名不一致・形式不正など
    #[error("トークンが不正です")]
    Invalid,
}

/// トークン発行を担当するトレイト
pub trait TokenIssuer: Send + Sync {
    /// ユーザー ID を subject とするトークンを発行する
    ///
    /// # 引数
    ///
    /// - `user_id`: 認証されたユーザーの ID
    /// - `now`: 発行日時（呼び出し元から注入）
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<AccessToken, InfraError>;
}

/// トークン検証を担当するトレイト
pub trait TokenVerifier: Send + Sync {
    /// トークンの署名と有効期限を検証し、クレームを返す
    ///
    /// # Errors
    ///
    /// - [`TokenError::Expired`]: 有効期限切れ
    /// - [`TokenError::Invalid`]: 署名不一致・形式不正
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// HS256（共有シークレット）によるトークン発行・検証の実装
pub struct Hs256TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl:          Duration,
}

impl Hs256TokenService {
    /// 新しいサービスインスタンスを作成する
    ///
    /// # 引数
    ///
    /// - `secret`: 共有シークレット（プロセス設定から注入）
    /// - `ttl`: トークンの有効期間
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenIssuer for Hs256TokenService {
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<AccessToken, InfraError> {
        let claims = TokenClaims {
            sub: *user_id.as_uuid(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| InfraError::Unexpected(format!("トークンの発行に失敗: {e}")))?;

        Ok(AccessToken::new(token))
    }
}

impl TokenVerifier for Hs256TokenService {
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
