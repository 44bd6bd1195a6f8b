//! # ユースケース層
//!
//! API のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: テスト可能性のためトレイトを定義
//! - **依存性注入**: リポジトリ・ハッシュ・トークンサービスを外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod auth;
pub mod tweet;

use async_trait::async_trait;
pub use auth::{AuthUseCaseError, AuthUseCaseImpl, AuthenticatedUser};
use saezuri_domain::{
    password::PlainPassword,
    tweet::{Tweet, TweetText},
    user::{Email, User, UserId},
    value_objects::{DisplayName, UserName},
};
pub use tweet::{TweetUseCaseError, TweetUseCaseImpl};

/// 認証ユースケーストレイト
///
/// サインアップとログインのビジネスロジックを定義する。
/// 具体的な実装は [`AuthUseCaseImpl`] で提供される。
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// 新規ユーザーを登録し、アクセストークンを発行する
    ///
    /// # 戻り値
    ///
    /// - `Ok(AuthenticatedUser)`: 作成されたユーザーとトークン
    /// - `Err(AuthUseCaseError::DuplicateIdentity)`: username / email が重複
    async fn signup(
        &self,
        name: DisplayName,
        username: UserName,
        email: Email,
        password: PlainPassword,
    ) -> Result<AuthenticatedUser, AuthUseCaseError>;

    /// メール/パスワードで認証し、アクセストークンを発行する
    ///
    /// # 戻り値
    ///
    /// - `Ok(AuthenticatedUser)`: 認証されたユーザーとトークン
    /// - `Err(AuthUseCaseError::AuthenticationFailed)`: メール不存在または
    ///   パスワード不一致（理由は区別しない）
    async fn login(
        &self,
        email: Email,
        password: PlainPassword,
    ) -> Result<AuthenticatedUser, AuthUseCaseError>;
}

/// AuthUseCaseImpl に AuthUseCase トレイトを実装
#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn signup(
        &self,
        name: DisplayName,
        username: UserName,
        email: Email,
        password: PlainPassword,
    ) -> Result<AuthenticatedUser, AuthUseCaseError> {
        self.signup(name, username, email, password).await
    }

    async fn login(
        &self,
        email: Email,
        password: PlainPassword,
    ) -> Result<AuthenticatedUser, AuthUseCaseError> {
        self.login(email, password).await
    }
}

/// ツイートユースケーストレイト
///
/// ツイートの一覧取得と投稿を定義する。
/// 具体的な実装は [`TweetUseCaseImpl`] で提供される。
#[async_trait]
pub trait TweetUseCase: Send + Sync {
    /// 全ツイートを作成者付きで取得する
    async fn list(&self) -> Result<Vec<(Tweet, User)>, TweetUseCaseError>;

    /// ツイートを投稿する
    ///
    /// # 引数
    ///
    /// - `author_id`: 作成者のユーザー ID（アクセストークンの subject）
    /// - `text`: 本文
    async fn post(&self, author_id: UserId, text: TweetText)
    -> Result<Tweet, TweetUseCaseError>;
}

/// TweetUseCaseImpl に TweetUseCase トレイトを実装
#[async_trait]
impl TweetUseCase for TweetUseCaseImpl {
    async fn list(&self) -> Result<Vec<(Tweet, User)>, TweetUseCaseError> {
        self.list().await
    }

    async fn post(
        &self,
        author_id: UserId,
        text: TweetText,
    ) -> Result<Tweet, TweetUseCaseError> {
        self.post(author_id, text).await
    }
}
