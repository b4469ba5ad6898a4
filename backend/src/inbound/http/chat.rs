//! Chat thread API handlers.
//!
//! ```text
//! GET /api/v1/chat/{userId}
//! POST /api/v1/chat/{userId}/messages {"text":"hello"}
//! ```
//!
//! Both endpoints apply the same access rule as the router guard: guests may
//! only open their own thread, staff may open any.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{SendMessageRequest, SendOutcome};
use crate::domain::RenderedThread;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RenderedThreadSchema, SendOutcomeSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id};

const USER_ID_FIELD: FieldName = FieldName::new("userId");

/// Body for `POST /api/v1/chat/{userId}/messages`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SendMessageBody {
    pub text: String,
}

/// Current thread rendered for the signed-in viewer.
#[utoipa::path(
    get,
    path = "/api/v1/chat/{userId}",
    params(("userId" = String, Path, description = "Guest who owns the thread")),
    responses(
        (status = 200, description = "Rendered thread", body = RenderedThreadSchema),
        (status = 400, description = "Malformed user id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Thread belongs to another guest", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["chat"],
    operation_id = "getChatThread"
)]
#[get("/chat/{user_id}")]
pub async fn get_thread(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RenderedThread>> {
    let viewer = session.require_viewer(&state.staff)?;
    let guest_id = parse_user_id(&path, USER_ID_FIELD)?;
    let thread = state.chat_query.view(&viewer, &guest_id).await?;
    Ok(web::Json(thread))
}

/// Append a message; whitespace-only text is not sent.
#[utoipa::path(
    post,
    path = "/api/v1/chat/{userId}/messages",
    params(("userId" = String, Path, description = "Guest who owns the thread")),
    request_body = SendMessageBody,
    responses(
        (status = 200, description = "Send outcome", body = SendOutcomeSchema),
        (status = 400, description = "Malformed user id or oversize text", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Thread belongs to another guest", body = ErrorSchema)
    ),
    tags = ["chat"],
    operation_id = "sendChatMessage"
)]
#[post("/chat/{user_id}/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SendMessageBody>,
) -> ApiResult<web::Json<SendOutcome>> {
    let viewer = session.require_viewer(&state.staff)?;
    let guest_id = parse_user_id(&path, USER_ID_FIELD)?;
    let outcome = state
        .chat_command
        .send(SendMessageRequest {
            viewer,
            guest_id,
            text: payload.into_inner().text,
        })
        .await?;
    Ok(web::Json(outcome))
}
