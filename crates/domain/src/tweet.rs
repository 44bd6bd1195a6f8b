//! # ツイート
//!
//! ツイートエンティティとその値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 不変条件 |
//! |---|------------|---------|
//! | [`Tweet`] | ツイート（投稿） | 作成者は必ず存在するユーザー（DB の外部キーで強制） |
//! | [`TweetText`] | 本文 | 空でなく 500 文字以内 |

use chrono::{DateTime, Utc};

use crate::user::UserId;

define_uuid_id! {
    /// ツイート ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub struct TweetId;
}

define_validated_string! {
    /// ツイート本文
    pub struct TweetText {
        label: "本文",
        max_length: 500,
    }
}

/// ツイートエンティティ
///
/// 認証済みユーザーが投稿する。作成後に更新・削除されることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    id: TweetId,
    text: TweetText,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

impl Tweet {
    /// 新しいツイートを作成する
    ///
    /// # 引数
    ///
    /// - `id`: ツイート ID（採番済み）
    /// - `text`: 本文
    /// - `user_id`: 作成者のユーザー ID（アクセストークンの subject）
    /// - `now`: 現在日時（呼び出し元から注入）
    pub fn new(id: TweetId, text: TweetText, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            user_id,
            created_at: now,
        }
    }

    /// 既存のデータからツイートを復元する（データベースから取得時）
    pub fn from_db(
        id: TweetId,
        text: TweetText,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            user_id,
            created_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &TweetId {
        &self.id
    }

    pub fn text(&self) -> &TweetText {
        &self.text
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
