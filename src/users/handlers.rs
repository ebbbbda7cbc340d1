use axum::{
    extract::State,
    routing::{delete, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::{internal, ApiError},
    state::AppState,
};

use super::dto::{DeleteAccountRequest, LoginRequest, LoginResponse, MessageResponse, SignupRequest};
use super::repo::NewUser;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/delete-account", delete(delete_account))
}

/// Absence is not an error here: an unknown email just reports unregistered.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(internal("Failed to process login"))?;
    Ok(Json(LoginResponse {
        is_registered: user.is_some(),
    }))
}

#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = state
        .users
        .insert(NewUser {
            nickname: body.nickname,
            email: body.email,
            profile_image: body.profile_image,
        })
        .await
        .map_err(internal("Failed to sign up"))?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(Json(MessageResponse::new("Signed up successfully")))
}

#[instrument(skip(state, body))]
pub async fn delete_account(
    State(state): State<AppState>,
    Json(body): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = state
        .users
        .delete_by_email(&body.email)
        .await
        .map_err(internal("Failed to delete the account"))?;
    if !deleted {
        return Err(ApiError::not_found("No account found for that email"));
    }

    info!(email = %body.email, "account deleted");
    Ok(Json(MessageResponse::new("Account deleted")))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::state::AppState;

    fn test_app() -> Router {
        build_app(AppState::fake())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn signup_body(email: &str) -> Value {
        json!({ "nickname": "tester", "email": email, "profile_image": "img.png" })
    }

    #[tokio::test]
    async fn login_reports_unknown_email_without_error() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/login",
            json!({ "email": "nobody@example.com" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isRegistered"], json!(false));
    }

    #[tokio::test]
    async fn signup_then_login_is_registered() {
        let app = test_app();
        let (status, _) = send(&app, Method::POST, "/api/signup", signup_body("a@b.c")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, "/api/login", json!({ "email": "a@b.c" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isRegistered"], json!(true));
    }

    #[tokio::test]
    async fn delete_account_removes_the_user() {
        let app = test_app();
        send(&app, Method::POST, "/api/signup", signup_body("a@b.c")).await;

        let (status, body) = send(
            &app,
            Method::DELETE,
            "/api/delete-account",
            json!({ "email": "a@b.c" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, Method::POST, "/api/login", json!({ "email": "a@b.c" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isRegistered"], json!(false));
    }

    #[tokio::test]
    async fn delete_unknown_account_is_not_found() {
        let app = test_app();
        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/delete-account",
            json!({ "email": "nobody@example.com" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
