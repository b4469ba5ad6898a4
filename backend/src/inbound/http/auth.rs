//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/register {"name":"Taro","phone":"03-1234-5678","email":"taro@example.com",...}
//! POST /api/v1/login {"email":"taro@example.com","password":"secret"}
//! POST /api/v1/logout
//! POST /api/v1/password-reset {"email":"taro@example.com"}
//! GET /api/v1/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::{
    Error, IdentityValidationError, LoginCredentials, LoginValidationError, RegistrationInput,
    SessionView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SessionViewSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

/// Registration form for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub product_type: String,
    pub message: String,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(value: RegisterRequest) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            email: value.email,
            password: Zeroizing::new(value.password),
            product_type: value.product_type,
            message: value.message,
        }
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Password reset body for `POST /api/v1/password-reset`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct PasswordResetRequest {
    pub email: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let code = match &err {
        LoginValidationError::Email(IdentityValidationError::EmptyEmail)
        | LoginValidationError::EmptyPassword => "required",
        LoginValidationError::Email(_) => "invalid_email",
    };
    let field = match err {
        LoginValidationError::Email(_) => "email",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create a guest account and its Ticket Record, then sign in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered and signed in", body = SessionViewSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid form", body = ErrorSchema),
        (status = 409, description = "Email already in use", body = ErrorSchema),
        (status = 503, description = "Identity provider or store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<SessionView>> {
    let view = state
        .registration
        .register(payload.into_inner().into())
        .await?;
    session.persist_identity(&view.identity)?;
    Ok(web::Json(view))
}

/// Authenticate with email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionViewSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionView>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let view = state.login.login(&credentials).await?;
    session.persist_identity(&view.identity)?;
    Ok(web::Json(view))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Ask the identity provider to email a password reset link.
#[utoipa::path(
    post,
    path = "/api/v1/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Reset email sent"),
        (status = 400, description = "Malformed email", body = ErrorSchema),
        (status = 404, description = "Email not registered", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "requestPasswordReset",
    security([])
)]
#[post("/password-reset")]
pub async fn request_password_reset(
    state: web::Data<HttpState>,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email, FieldName::new("email"))?;
    state.password_reset.request_reset(&email).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Current session with its derived role and landing path.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Signed in", body = SessionViewSchema),
        (status = 401, description = "No session", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionView>> {
    let viewer = session.require_viewer(&state.staff)?;
    Ok(web::Json(SessionView::new(viewer.identity, viewer.role)))
}
