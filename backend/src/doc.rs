//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, navigation,
//!   tickets, chat, health)
//! - **Schemas**: wrappers from [`crate::inbound::http::schemas`] that describe
//!   domain payloads without coupling domain types to utoipa, plus the
//!   request bodies
//! - **Security**: Session cookie authentication scheme
//!
//! The chat socket at `/ws/chat/{userId}` is not an HTTP operation and is not
//! listed. The document is served by Swagger UI in debug builds and exported
//! via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::{LoginRequest, PasswordResetRequest, RegisterRequest};
use crate::inbound::http::chat::SendMessageBody;
use crate::inbound::http::schemas::{
    AccessDecisionSchema, CommentSchema, ErrorCodeSchema, ErrorSchema, IdentitySchema,
    QueuePageSchema, QueueRowSchema, RenderedMessageSchema, RenderedThreadSchema,
    SendOutcomeSchema, SessionViewSchema, TicketDetailSchema, TicketSchema, ViewSchema,
};
use crate::inbound::http::tickets::{CommentBody, StatusBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Helpdesk backend API",
        description = "Guest registration, staff triage queue and guest chat threads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::request_password_reset,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::navigation::navigate,
        crate::inbound::http::tickets::list_queue,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::set_status,
        crate::inbound::http::tickets::add_comment,
        crate::inbound::http::chat::get_thread,
        crate::inbound::http::chat::send_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        IdentitySchema,
        SessionViewSchema,
        ViewSchema,
        AccessDecisionSchema,
        QueueRowSchema,
        QueuePageSchema,
        CommentSchema,
        TicketSchema,
        TicketDetailSchema,
        RenderedMessageSchema,
        RenderedThreadSchema,
        SendOutcomeSchema,
        RegisterRequest,
        LoginRequest,
        PasswordResetRequest,
        StatusBody,
        CommentBody,
        SendMessageBody,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and password reset"),
        (name = "navigation", description = "Route guard decisions"),
        (name = "tickets", description = "Staff triage queue and ticket detail"),
        (name = "chat", description = "Guest chat threads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
