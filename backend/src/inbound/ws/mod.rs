//! WebSocket inbound adapter for live chat threads.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, session, thread access)
//! - subscribe to the thread before upgrading so refusals stay plain HTTP
//! - hand the connection to the per-socket loop in [`session`]

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::{FieldName, parse_user_id};

mod session;

pub mod messages;
pub mod state;

use state::{AllowedOrigins, WsState};

/// Upgrade to a live view of one chat thread.
///
/// Answers `403` for a disallowed origin or a thread the viewer may not open,
/// `401` without a session and `400` for a malformed origin or user id.
#[get("/ws/chat/{user_id}")]
pub async fn chat_socket(
    state: web::Data<WsState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.origins, origin_header)?;

    let viewer = session.require_viewer(&state.staff)?;
    let guest_id = parse_user_id(&path, FieldName::new("userId"))?;
    let snapshots = state.chat_query.watch(&viewer, &guest_id).await?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;
    actix_web::rt::spawn(session::handle_chat_session(
        state.chat_command.clone(),
        viewer,
        guest_id,
        snapshots,
        ws_session,
        messages,
    ));
    Ok(response)
}

fn validate_origin(origins: &AllowedOrigins, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if origins.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
