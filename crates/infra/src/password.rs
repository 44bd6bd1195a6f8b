//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//!
//! ハッシュ化にはハッシュごとにランダムなソルトを生成し、
//! 検証はライブラリの定数時間比較に委譲する。

use argon2::{
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    password_hash::{PasswordHash as PhcPasswordHash, SaltString, rand_core::OsRng},
};
use saezuri_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// パスワードのハッシュ化を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// 平文パスワードをハッシュ化する
    ///
    /// 呼び出しごとに新しいランダムソルトを生成するため、
    /// 同じパスワードでも毎回異なるハッシュ値になる。
    ///
    /// # Errors
    ///
    /// ハッシュ計算に失敗した場合
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;
}

/// パスワード検証を担当するトレイト
pub trait PasswordChecker: Send + Sync {
    /// パスワードを検証する
    ///
    /// # Errors
    ///
    /// - 不正なハッシュ形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id によるハッシュ化・検証の実装
///
/// OWASP 推奨パラメータ（RFC 9106）を使用:
/// - Memory: 64 MB
/// - Iterations: 1
/// - Parallelism: 1
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        let params = Params::new(
            65536, // memory (KB) = 64 MB
            1,     // iterations
            1,     // parallelism
            None,  // output length (default: 32)
        )
        .expect("Argon2 パラメータが不正です");

        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::Unexpected(format!("パスワードのハッシュ化に失敗: {e}")))?;

        Ok(PasswordHash::new(hash.to_string()))
    }
}

impl PasswordChecker for Argon2PasswordHasher {
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = PhcPasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::Unexpected(format!("不正なハッシュ形式: {e}")))?;

        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_ハッシュ化したパスワードは検証で一致する() {
        let sut = Argon2PasswordHasher::new();
        let password = PlainPassword::new("password123");

        let hash = sut.hash(&password).unwrap();
        let result = sut.verify(&password, &hash).unwrap();

        assert!(result.is_match());
    }

    #[rstest]
    fn test_異なるパスワードは検証で一致しない() {
        let sut = Argon2PasswordHasher::new();
        let hash = sut.hash(&PlainPassword::new("password123")).unwrap();

        let result = sut.verify(&PlainPassword::new("wrongpassword"), &hash).unwrap();

        assert!(result.is_mismatch());
    }

    #[rstest]
    fn test_同じパスワードでもソルトにより異なるハッシュになる() {
        let sut = Argon2PasswordHasher::new();
        let password = PlainPassword::new("password123");

        let first = sut.hash(&password).unwrap();
        let second = sut.hash(&password).unwrap();

        assert_ne!(first, second);
    }

    #[rstest]
    fn test_ハッシュはargon2idのphc形式() {
        let sut = Argon2PasswordHasher::new();

        let hash = sut.hash(&PlainPassword::new("password123")).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
    }

    #[rstest]
    fn test_不正なハッシュ形式はエラー() {
        let sut = Argon2PasswordHasher::new();
        let invalid_hash = PasswordHash::new("not-a-valid-hash");

        let result = sut.verify(&PlainPassword::new("password123"), &invalid_hash);

        assert!(result.is_err());
    }
}
