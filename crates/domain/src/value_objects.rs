//! # 共通値オブジェクト
//!
//! 複数のエンティティから参照される値オブジェクトを定義する。
//!
//! | 型 | ドメイン用語 | 制約 |
//! |---|------------|------|
//! | [`UserName`] | ユーザー名（@ハンドル） | 一意（DB 制約）、50 文字以内 |
//! | [`DisplayName`] | 表示名（本名） | 100 文字以内、PII 保護 |

define_validated_string! {
    /// ユーザー名（@ハンドル）
    ///
    /// ログイン ID ではなくプロフィール上の識別子。
    /// 一意性は DB の一意制約で強制される。
    pub struct UserName {
        label: "ユーザー名",
        max_length: 50,
    }
}

define_validated_string! {
    /// 表示名（本名）
    ///
    /// # セキュリティ
    ///
    /// PII のため Debug 出力ではマスクされる。
    pub struct DisplayName {
        label: "表示名",
        max_length: 100,
        pii: true,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    // ===== UserName のテスト =====

    #[test]
    fn test_ユーザー名を作成できる() {
        let name = UserName::new("suzume").unwrap();
        assert_eq!(name.as_str(), "suzume");
    }

    #[test]
    fn test_ユーザー名は前後の空白がtrimされる() {
        let name = UserName::new("  suzume  ").unwrap();
        assert_eq!(name.as_str(), "suzume");
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("   ", "空白のみ")]
    #[case(&"a".repeat(51), "50文字超過")]
    fn test_不正なユーザー名を拒否する(#[case] input: &str, #[case] _reason: &str) {
        assert!(UserName::new(input).is_err());
    }

    #[test]
    fn test_ユーザー名のdisplay出力は平文() {
        let name = UserName::new("suzume").unwrap();
        assert_eq!(format!("{}", name), "suzume");
    }

    // ===== DisplayName のテスト =====

    #[test]
    fn test_表示名を作成できる() {
        let name = DisplayName::new("山田太郎").unwrap();
        assert_eq!(name.as_str(), "山田太郎");
    }

    #[test]
    fn test_表示名のdebug出力はマスクされる() {
        let name = DisplayName::new("山田太郎").unwrap();
        let debug = format!("{:?}", name);

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("山田太郎"));
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case(&"あ".repeat(101), "100文字超過")]
    fn test_不正な表示名を拒否する(#[case] input: &str, #[case] _reason: &str) {
        assert!(DisplayName::new(input).is_err());
    }

    #[test]
    fn test_最大文字数はバイト数でなく文字数でカウントする() {
        // 「あ」は UTF-8 で 3 バイト。100 文字ちょうどは受け入れる
        assert!(DisplayName::new("あ".repeat(100)).is_ok());
    }
}
