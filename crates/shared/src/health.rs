//! # ヘルスチェック共通型
//!
//! liveness / readiness エンドポイントのレスポンス型を提供する。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// `status` はサービスの稼働状態、`version` は Cargo.toml のバージョンを示す。
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` または `"unhealthy"`）
    pub status:  String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
}

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// チェック成功
    Ok,
    /// チェック失敗
    Error,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// 全依存サービスが利用可能
    Ready,
    /// 一部の依存サービスが利用不可
    NotReady,
}

/// Readiness Check レスポンス
///
/// 依存サービス（現状はデータベースのみ）への接続状態を含む。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// 全体のステータス
    pub status: ReadinessStatus,
    /// 個別チェック結果（チェック名 → ステータス）
    pub checks: HashMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 個別チェック結果から全体ステータスを導出して作成する
    ///
    /// ひとつでも [`CheckStatus::Error`] があれば全体は
    /// [`ReadinessStatus::NotReady`] になる。
    pub fn from_checks(checks: HashMap<String, CheckStatus>) -> Self {
        let status = if checks.values().any(|c| *c == CheckStatus::Error) {
            ReadinessStatus::NotReady
        } else {
            ReadinessStatus::Ready
        };
        Self { status, checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_全チェック成功でreadyになる() {
        let mut checks = HashMap::new();
        checks.insert("database".to_string(), CheckStatus::Ok);

        let response = ReadinessResponse::from_checks(checks);

        assert_eq!(response.status, ReadinessStatus::Ready);
    }

    #[test]
    fn test_チェック失敗があればnot_readyになる() {
        let mut checks = HashMap::new();
        checks.insert("database".to_string(), CheckStatus::Error);

        let response = ReadinessResponse::from_checks(checks);

        assert_eq!(response.status, ReadinessStatus::NotReady);
    }

    #[test]
    fn test_readiness_statusのシリアライズはsnake_case() {
        let json = serde_json::to_value(ReadinessStatus::NotReady).unwrap();
        assert_eq!(json, "not_ready");
    }

    #[test]
    fn test_check_statusのシリアライズはlowercase() {
        let json = serde_json::to_value(CheckStatus::Ok).unwrap();
        assert_eq!(json, "ok");
    }
}
