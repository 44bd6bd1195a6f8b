//! # 認証ハンドラ
//!
//! サインアップとログインのエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /signup` - 新規ユーザー登録 + トークン発行
//! - `GET /login` - Basic 形式の資格情報によるログイン + トークン発行
//!
//! ## ログインの資格情報
//!
//! `Authorization` ヘッダーの値は base64 エンコードされた
//! `email:password`。`Basic <base64>` 形式とスキームなしの素の base64 の
//! 両方を受け付ける。ヘッダーなし・デコード不能はすべて 401。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use saezuri_domain::{
    password::PlainPassword,
    user::Email,
    value_objects::{DisplayName, UserName},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    usecase::{AuthUseCase, AuthenticatedUser},
};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// サインアップリクエスト
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name:     String,
    pub username: String,
    pub email:    String,
    pub password: String,
}

/// サインアップ / ログイン共通レスポンス
///
/// パスワード（ハッシュ含む）は決して返さない。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id:           Uuid,
    pub name:         String,
    pub username:     String,
    pub email:        String,
    pub access_token: String,
}

impl From<AuthenticatedUser> for AuthResponse {
    fn from(authenticated: AuthenticatedUser) -> Self {
        let AuthenticatedUser { user, access_token } = authenticated;
        Self {
            id:           *user.id().as_uuid(),
            name:         user.name().as_str().to_string(),
            username:     user.username().as_str().to_string(),
            email:        user.email().as_str().to_string(),
            access_token: access_token.into_string(),
        }
    }
}

// --- ハンドラ ---

/// POST /signup
///
/// 新規ユーザーを登録し、アクセストークンを発行する。
///
/// ## レスポンス
///
/// - 200: ユーザー情報 + accessToken
/// - 400: 入力値の検証失敗
/// - 422: username / email の重複
pub async fn signup(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = DisplayName::new(req.name)?;
    let username = UserName::new(req.username)?;
    let email = Email::new(req.email)?;
    let password = PlainPassword::new(req.password);

    let authenticated = state.usecase.signup(name, username, email, password).await?;

    Ok(Json(AuthResponse::from(authenticated)))
}

/// GET /login
///
/// Basic 形式の資格情報で認証し、アクセストークンを発行する。
///
/// ## レスポンス
///
/// - 200: ユーザー情報 + accessToken
/// - 401: 資格情報なし / デコード不能 / メール不存在 / パスワード不一致
///   （理由は区別しない）
pub async fn login(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = decode_basic_credentials(&headers)?;

    let authenticated = state.usecase.login(email, password).await?;

    Ok(Json(AuthResponse::from(authenticated)))
}

/// Authorization ヘッダーから base64 エンコードされた `email:password` を
/// 取り出す
///
/// 失敗理由は区別せずすべて 401 にする（存在確認攻撃の手がかりを
/// 与えないため）。
fn decode_basic_credentials(headers: &HeaderMap) -> Result<(Email, PlainPassword), ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?
        .to_str()
        .map_err(|_| ApiError::Unauthorized)?;

    // "Basic <base64>" 形式ならスキームを取り除き、素の base64 はそのまま
    let encoded = header
        .split_whitespace()
        .next_back()
        .ok_or(ApiError::Unauthorized)?;

    let decoded = BASE64_STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;

    let (email, password) = decoded.split_once(':').ok_or(ApiError::Unauthorized)?;

    let email = Email::new(email).map_err(|_| ApiError::Unauthorized)?;

    Ok((email, PlainPassword::new(password)))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        routing::{get, post},
    };
    use chrono::Utc;
    use saezuri_domain::{password::PasswordHash, user::{User, UserId}};
    use saezuri_infra::AccessToken;
    use tower::ServiceExt as _;

    use super::*;
    use crate::usecase::AuthUseCaseError;

    // テスト用スタブ

    enum StubBehavior {
        Success,
        Duplicate,
        AuthFailed,
    }

    struct StubAuthUseCase {
        behavior: StubBehavior,
    }

    fn stub_authenticated() -> AuthenticatedUser {
        let user = User::new(
            UserId::new(),
            DisplayName::new("山田太郎").unwrap(),
            UserName::new("taro").unwrap(),
            Email::new("taro@example.com").unwrap(),
            PasswordHash::new("$argon2id$v=19$dummy"),
            Utc::now(),
        );
        AuthenticatedUser {
            user,
            access_token: AccessToken::new("stub.jwt.token"),
        }
    }

    #[async_trait]
    impl AuthUseCase for StubAuthUseCase {
        async fn signup(
            &self,
            _name: DisplayName,
            _username: UserName,
            _email: Email,
            _password: PlainPassword,
        ) -> Result<AuthenticatedUser, AuthUseCaseError> {
            match self.behavior {
                StubBehavior::Success => Ok(stub_authenticated()),
                StubBehavior::Duplicate => Err(AuthUseCaseError::DuplicateIdentity),
                StubBehavior::AuthFailed => Err(AuthUseCaseError::AuthenticationFailed),
            }
        }

        async fn login(
            &self,
            _email: Email,
            _password: PlainPassword,
        ) -> Result<AuthenticatedUser, AuthUseCaseError> {
            match self.behavior {
                StubBehavior::Success => Ok(stub_authenticated()),
                StubBehavior::Duplicate => Err(AuthUseCaseError::DuplicateIdentity),
                StubBehavior::AuthFailed => Err(AuthUseCaseError::AuthenticationFailed),
            }
        }
    }

    fn create_test_app(behavior: StubBehavior) -> Router {
        let state = Arc::new(AuthState {
            usecase: Arc::new(StubAuthUseCase { behavior }),
        });

        Router::new()
            .route("/signup", post(signup))
            .route("/login", get(login))
            .with_state(state)
    }

    fn signup_request() -> Request<Body> {
        let body = serde_json::json!({
            "name": "山田太郎",
            "username": "taro",
            "email": "taro@example.com",
            "password": "password123"
        });

        Request::builder()
            .method(Method::POST)
            .uri("/signup")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    // ===== signup のテスト =====

    #[tokio::test]
    async fn test_signup_成功時はユーザー情報とトークンを返す() {
        // Given
        let sut = create_test_app(StubBehavior::Success);

        // When
        let response = sut.oneshot(signup_request()).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert!(json["id"].is_string());
        assert_eq!(json["name"], "山田太郎");
        assert_eq!(json["username"], "taro");
        assert_eq!(json["email"], "taro@example.com");
        assert_eq!(json["accessToken"], "stub.jwt.token");
        // パスワードは決して返さない
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_signup_重複は422() {
        // Given
        let sut = create_test_app(StubBehavior::Duplicate);

        // When
        let response = sut.oneshot(signup_request()).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_signup_不正なメールアドレスは400() {
        // Given
        let sut = create_test_app(StubBehavior::Success);
        let body = serde_json::json!({
            "name": "山田太郎",
            "username": "taro",
            "email": "not-an-email",
            "password": "password123"
        });

        // When
        let request = Request::builder()
            .method(Method::POST)
            .uri("/signup")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ===== login のテスト =====

    fn login_request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri("/login");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn basic_credential(email: &str, password: &str) -> String {
        format!(
            "Basic {}",
            BASE64_STANDARD.encode(format!("{email}:{password}"))
        )
    }

    #[tokio::test]
    async fn test_login_成功時はユーザー情報とトークンを返す() {
        // Given
        let sut = create_test_app(StubBehavior::Success);

        // When
        let request = login_request(Some(&basic_credential("taro@example.com", "password123")));
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["accessToken"], "stub.jwt.token");
    }

    #[tokio::test]
    async fn test_login_スキームなしのbase64も受け付ける() {
        // Given
        let sut = create_test_app(StubBehavior::Success);
        let encoded = BASE64_STANDARD.encode("taro@example.com:password123");

        // When
        let response = sut.oneshot(login_request(Some(&encoded))).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_ヘッダーなしは401() {
        // Given
        let sut = create_test_app(StubBehavior::Success);

        // When
        let response = sut.oneshot(login_request(None)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_base64でない資格情報は401() {
        // Given
        let sut = create_test_app(StubBehavior::Success);

        // When
        let response = sut
            .oneshot(login_request(Some("Basic !!not-base64!!")))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_コロン区切りでない資格情報は401() {
        // Given
        let sut = create_test_app(StubBehavior::Success);
        let encoded = BASE64_STANDARD.encode("no-colon-here");

        // When
        let response = sut
            .oneshot(login_request(Some(&format!("Basic {encoded}"))))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_認証失敗は401() {
        // Given
        let sut = create_test_app(StubBehavior::AuthFailed);

        // When
        let request = login_request(Some(&basic_credential("taro@example.com", "wrong")));
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
