//! # Saezuri API サーバー
//!
//! ミニマルなマイクロブログの REST API サーバー。
//!
//! ## 役割
//!
//! - **サインアップ / ログイン**: Argon2id によるパスワード認証と
//!   HS256 アクセストークンの発行
//! - **ツイート**: Bearer トークンで保護された一覧取得と投稿
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 認証 |
//! |---------|------|------|
//! | POST | `/signup` | なし |
//! | GET | `/login` | Basic 形式の `email:password` |
//! | GET | `/tweets` | Bearer トークン |
//! | POST | `/tweets` | Bearer トークン |
//! | GET | `/health` | なし |
//! | GET | `/health/ready` | なし |
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `JWT_SECRET` | **Yes** | トークン署名用の共有シークレット |
//!
//! ## 起動方法
//!
//! ```bash
//! API_PORT=13000 DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p saezuri-api
//! ```

mod config;
mod error;
mod handler;
mod middleware;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use chrono::Duration;
use config::ApiConfig;
use handler::{
    AuthState,
    ReadinessState,
    TweetState,
    create_tweet,
    health_check,
    list_tweets,
    login,
    readiness_check,
    signup,
};
use middleware::{AuthLayerState, require_bearer};
use saezuri_infra::{
    Argon2PasswordHasher,
    Hs256TokenService,
    PasswordChecker,
    PasswordHasher,
    TokenIssuer,
    TokenVerifier,
    db,
    repository::{
        PostgresTweetRepository,
        PostgresUserRepository,
        TweetRepository,
        UserRepository,
    },
};
use saezuri_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{TracingConfig, make_request_span},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use usecase::{AuthUseCaseImpl, TweetUseCaseImpl};

/// アクセストークンの有効期間（時間）
const TOKEN_TTL_HOURS: i64 = 24;

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("api");
    saezuri_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "api").entered();

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    // マイグレーション実行
    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの実行に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

    // 依存コンポーネントを初期化
    let user_repo: Arc<dyn UserRepository> =
        Arc::new(PostgresUserRepository::new(pool.clone()));
    let tweet_repo: Arc<dyn TweetRepository> = Arc::new(PostgresTweetRepository::new(pool));

    let password_suite = Arc::new(Argon2PasswordHasher::new());
    let token_service = Arc::new(Hs256TokenService::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(TOKEN_TTL_HOURS),
    ));

    let auth_usecase = AuthUseCaseImpl::new(
        user_repo,
        password_suite.clone() as Arc<dyn PasswordHasher>,
        password_suite as Arc<dyn PasswordChecker>,
        token_service.clone() as Arc<dyn TokenIssuer>,
    );
    let auth_state = Arc::new(AuthState {
        usecase: Arc::new(auth_usecase),
    });

    let tweet_usecase = TweetUseCaseImpl::new(tweet_repo);
    let tweet_state = Arc::new(TweetState {
        usecase: Arc::new(tweet_usecase),
    });

    let auth_layer_state = AuthLayerState {
        verifier: token_service as Arc<dyn TokenVerifier>,
    };

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/signup", post(signup))
                .route("/login", get(login))
                .with_state(auth_state),
        )
        .merge(
            Router::new()
                .route("/tweets", get(list_tweets).post(create_tweet))
                .with_state(tweet_state)
                .layer(axum::middleware::from_fn_with_state(
                    auth_layer_state,
                    require_bearer,
                )),
        )
        .layer(CorsLayer::permissive())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
