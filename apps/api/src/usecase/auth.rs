//! # 認証ユースケース
//!
//! サインアップとログインのビジネスロジックを実装する。
//!
//! ## タイミング攻撃対策
//!
//! ログインでは、ユーザーが存在しない場合もダミーハッシュで検証を実行し、
//! 処理時間を均一化する。これによりアカウント存在確認攻撃を防ぐ。

use std::sync::Arc;

use chrono::Utc;
use saezuri_domain::{
    password::{PasswordHash, PlainPassword},
    user::{Email, User, UserId},
    value_objects::{DisplayName, UserName},
};
use saezuri_infra::{
    AccessToken,
    InfraError,
    PasswordChecker,
    PasswordHasher,
    TokenIssuer,
    repository::UserRepository,
};
use thiserror::Error;

/// 認証ユースケースで発生するエラー
#[derive(Debug, Error)]
pub enum AuthUseCaseError {
    /// 認証失敗（メール不存在、パスワード不一致）
    ///
    /// セキュリティ上、詳細な理由は外部に公開しない。
    #[error("認証に失敗しました")]
    AuthenticationFailed,

    /// username / email の重複
    #[error("メールアドレスまたはユーザー名は既に使用されています")]
    DuplicateIdentity,

    /// インフラ層エラー（DB 接続エラーなど）
    #[error("内部エラー: {0}")]
    Internal(#[from] InfraError),
}

/// 認証されたユーザーと発行済みトークンの組
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user:         User,
    pub access_token: AccessToken,
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    password_hasher:  Arc<dyn PasswordHasher>,
    password_checker: Arc<dyn PasswordChecker>,
    token_issuer:     Arc<dyn TokenIssuer>,
}

impl AuthUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        password_checker: Arc<dyn PasswordChecker>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            password_checker,
            token_issuer,
        }
    }

    /// 新規ユーザーを登録し、アクセストークンを発行する
    ///
    /// パスワードはハッシュ化してから永続化する。平文は保存しない。
    /// 一意制約違反はインフラ層の分類済みエラーから
    /// [`AuthUseCaseError::DuplicateIdentity`] に変換する。
    pub async fn signup(
        &self,
        name: DisplayName,
        username: UserName,
        email: Email,
        password: PlainPassword,
    ) -> Result<AuthenticatedUser, AuthUseCaseError> {
        let password_hash = self.password_hasher.hash(&password)?;

        let now = Utc::now();
        let user = User::new(UserId::new(), name, username, email, password_hash, now);

        self.user_repository.create(&user).await.map_err(|e| match e {
            InfraError::UniqueViolation { .. } => AuthUseCaseError::DuplicateIdentity,
            other => AuthUseCaseError::Internal(other),
        })?;

        let access_token = self.token_issuer.issue(user.id(), now)?;

        tracing::info!(user_id = %user.id(), "ユーザーを登録しました");

        Ok(AuthenticatedUser { user, access_token })
    }

    /// メール/パスワードで認証し、アクセストークンを発行する
    ///
    /// # セキュリティ
    ///
    /// - ユーザーが存在しない場合もダミーのパスワード検証を行い、
    ///   タイミング攻撃を防ぐ
    /// - 認証失敗時は詳細な理由を返さない
    pub async fn login(
        &self,
        email: Email,
        password: PlainPassword,
    ) -> Result<AuthenticatedUser, AuthUseCaseError> {
        let user = self.user_repository.find_by_email(&email).await?;

        // ユーザーが存在しない場合、タイミング攻撃対策としてダミー検証を実行
        let Some(user) = user else {
            self.dummy_verification(&password);
            return Err(AuthUseCaseError::AuthenticationFailed);
        };

        let verify_result = self.password_checker.verify(&password, user.password_hash())?;

        if verify_result.is_mismatch() {
            return Err(AuthUseCaseError::AuthenticationFailed);
        }

        let access_token = self.token_issuer.issue(user.id(), Utc::now())?;

        tracing::info!(user_id = %user.id(), "ログインしました");

        Ok(AuthenticatedUser { user, access_token })
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    ///
    /// 固定 sleep ではなく実際に Argon2id 検証を実行することで、
    /// CPU/メモリ状況による自然な変動も含めて同じ時間特性になる。
    fn dummy_verification(&self, password: &PlainPassword) {
        // ダミーハッシュ（有効な Argon2id 形式）
        let dummy_hash = PasswordHash::new(
            "$argon2id$v=19$m=65536,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        );
        // 結果は無視（エラーでも問題ない）
        let _ = self.password_checker.verify(password, &dummy_hash);
    }
}
