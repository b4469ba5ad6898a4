//! Staff ticket API handlers.
//!
//! ```text
//! GET /api/v1/admin/tickets?status=unhandled&product=all&page=1
//! GET /api/v1/tickets/{id}
//! PUT /api/v1/tickets/{id}/status {"status":"in_progress"}
//! POST /api/v1/tickets/{id}/comments {"text":"Called the guest back"}
//! ```
//!
//! Every endpoint is staff only: `401` without a session, `403` for guests.
//! Mutations answer with the local copy and its sync state; a failed store
//! write surfaces as `syncState: "stale"`, not as an error status.

use actix_web::{get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AddCommentRequest, SetStatusRequest, TicketQueueRequest};
use crate::domain::{QueueFilter, QueueRow, Ticket, TicketDetail};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, QueuePageSchema, TicketDetailSchema, TicketSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_page, parse_product_filter, parse_status, parse_status_filter, parse_user_id,
};

const ID_FIELD: FieldName = FieldName::new("id");

/// Query string for the Admin Queue.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct QueueQuery {
    /// `all` or a ticket status; defaults to `unhandled`.
    pub status: Option<String>,
    /// `all` or a catalogue product code; defaults to `all`.
    pub product: Option<String>,
    /// 1-based page index; defaults to 1.
    pub page: Option<usize>,
}

/// Body for `PUT /api/v1/tickets/{id}/status`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusBody {
    /// `unhandled`, `in_progress` or `resolved`.
    pub status: String,
}

/// Body for `POST /api/v1/tickets/{id}/comments`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CommentBody {
    pub text: String,
}

/// One page of the Admin Queue.
#[utoipa::path(
    get,
    path = "/api/v1/admin/tickets",
    params(QueueQuery),
    responses(
        (status = 200, description = "Queue page", body = QueuePageSchema),
        (status = 400, description = "Invalid filter or page", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listQueue"
)]
#[get("/admin/tickets")]
pub async fn list_queue(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<QueueQuery>,
) -> ApiResult<web::Json<Page<QueueRow>>> {
    session.require_staff(&state.staff)?;
    let QueueQuery {
        status,
        product,
        page,
    } = query.into_inner();
    let request = TicketQueueRequest {
        filter: QueueFilter {
            status: parse_status_filter(status.as_deref(), FieldName::new("status"))?,
            product: parse_product_filter(product.as_deref(), FieldName::new("product"))?,
        },
        page: parse_page(page, FieldName::new("page"))?,
    };
    let page = state.tickets_query.queue(request).await?;
    Ok(web::Json(page))
}

/// One Ticket Record with its comments.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Guest id keying the ticket")),
    responses(
        (status = 200, description = "Ticket", body = TicketSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "No ticket for this guest", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/tickets/{id}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Ticket>> {
    session.require_staff(&state.staff)?;
    let guest_id = parse_user_id(&path, ID_FIELD)?;
    let ticket = state.tickets_query.ticket(&guest_id).await?;
    Ok(web::Json(ticket))
}

/// Relabel a ticket; `in_progress` assigns the acting staff member.
#[utoipa::path(
    put,
    path = "/api/v1/tickets/{id}/status",
    params(("id" = String, Path, description = "Guest id keying the ticket")),
    request_body = StatusBody,
    responses(
        (status = 200, description = "Updated copy and sync state", body = TicketDetailSchema),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "No ticket for this guest", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "setTicketStatus"
)]
#[put("/tickets/{id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusBody>,
) -> ApiResult<web::Json<TicketDetail>> {
    let viewer = session.require_staff(&state.staff)?;
    let guest_id = parse_user_id(&path, ID_FIELD)?;
    let status = parse_status(&payload.status, FieldName::new("status"))?;
    let detail = state
        .tickets_command
        .set_status(SetStatusRequest {
            guest_id,
            status,
            acting_email: viewer.identity.email().clone(),
        })
        .await?;
    Ok(web::Json(detail))
}

/// Append a staff comment; whitespace-only text leaves the ticket unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{id}/comments",
    params(("id" = String, Path, description = "Guest id keying the ticket")),
    request_body = CommentBody,
    responses(
        (status = 200, description = "Updated copy and sync state", body = TicketDetailSchema),
        (status = 400, description = "Comment too long", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Staff only", body = ErrorSchema),
        (status = 404, description = "No ticket for this guest", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "addTicketComment"
)]
#[post("/tickets/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentBody>,
) -> ApiResult<web::Json<TicketDetail>> {
    let viewer = session.require_staff(&state.staff)?;
    let guest_id = parse_user_id(&path, ID_FIELD)?;
    let detail = state
        .tickets_command
        .add_comment(AddCommentRequest {
            guest_id,
            author_email: viewer.identity.email().clone(),
            text: payload.into_inner().text,
        })
        .await?;
    Ok(web::Json(detail))
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
