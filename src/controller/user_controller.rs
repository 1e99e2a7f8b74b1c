use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use crate::controller::AppState;
use crate::helpers::api_error::ApiError;
use crate::services::user_authentication::{AuthenticationError, UserAuthenticationService};
use crate::services::user_registration::{RegistrationError, UserRegistrationService};

pub fn router(app_state: AppState) -> Router {
    let registration_service = Arc::new(UserRegistrationService::new(
        app_state.user_repo.clone()
    ));
    let authentication_service = Arc::new(UserAuthenticationService::new(
        app_state.user_repo
    ));

    Router::new()
        .route("/api/register", post(register_user))
        .route("/api/login", post(login_user))
        .route_layer(Extension(registration_service))
        .route_layer(Extension(authentication_service))
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct RegisterUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register_user(
    Extension(registration_service): Extension<Arc<UserRegistrationService>>,
    body: Result<Json<RegisterUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let register_res = registration_service
        .register(
            &body.name,
            &body.email,
            &body.password,
        ).await;

    return match register_res {
        Ok(user) => {
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "User created successfully", "user": user })),
            ))
        }
        Err(RegistrationError::Upstream(e)) => {
            warn!("Something went wrong registering user due to: {:#}", e);
            Err(ApiError::internal("Failed to register user", e))
        }
        Err(e) => Err(ApiError::BadRequest(e.to_string())),
    };
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct LoginUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_user(
    Extension(authentication_service): Extension<Arc<UserAuthenticationService>>,
    body: Result<Json<LoginUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;

    return match authentication_service.authenticate(&body.email, &body.password).await {
        Ok(user) => Ok(Json(json!({ "message": "Login successful", "user": user }))),
        Err(AuthenticationError::MissingCredentials) => {
            Err(ApiError::BadRequest(AuthenticationError::MissingCredentials.to_string()))
        }
        Err(AuthenticationError::Upstream(e)) => {
            warn!("Something went wrong logging in user due to: {:#}", e);
            Err(ApiError::internal("Failed to log in", e))
        }
        Err(e) => Err(ApiError::Unauthorized(e.to_string())),
    };
}
