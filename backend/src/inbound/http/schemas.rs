//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their JSON shape and live in the inbound adapter,
//! registered under the domain type's name via `#[schema(as = ...)]`.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa's derive output"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing collaborator could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "The email address is malformed.")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level details such as `{ "field": "email", "code": "invalid_email" }`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Identity`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Identity)]
pub struct IdentitySchema {
    #[schema(example = "9QmXc2bUuWf1")]
    id: String,
    #[schema(example = "taro@example.com")]
    email: String,
}

/// OpenAPI schema for [`crate::domain::SessionView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::SessionView)]
#[schema(rename_all = "camelCase")]
pub struct SessionViewSchema {
    identity: IdentitySchema,
    /// `guest` or `staff`, derived from the staff allow-list.
    #[schema(example = "guest")]
    role: String,
    /// `/admin` for staff, `/chat/<id>` for guests.
    #[schema(example = "/chat/9QmXc2bUuWf1")]
    landing_path: String,
}

/// OpenAPI schema for [`crate::domain::View`].
#[derive(ToSchema)]
#[schema(as = crate::domain::View)]
#[schema(rename_all = "camelCase")]
pub struct ViewSchema {
    /// `login`, `reset_password`, `admin_queue`, `ticket_detail` or `chat`.
    #[schema(example = "chat")]
    name: String,
    /// Present for `ticket_detail` and `chat`.
    guest_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::AccessDecision`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AccessDecision)]
pub struct AccessDecisionSchema {
    /// `render` or `redirect`.
    #[schema(example = "redirect")]
    decision: String,
    /// Present when `decision` is `render`.
    view: Option<ViewSchema>,
    /// Present when `decision` is `redirect`.
    #[schema(example = "/admin")]
    location: Option<String>,
}

/// OpenAPI schema for [`crate::domain::QueueRow`].
#[derive(ToSchema)]
#[schema(as = crate::domain::QueueRow)]
#[schema(rename_all = "camelCase")]
pub struct QueueRowSchema {
    id: String,
    name: String,
    email: String,
    phone: String,
    #[schema(example = "KM-001")]
    product_type: String,
    /// First 100 characters of the inquiry, with `...` when truncated.
    preview: String,
    #[schema(example = "unhandled")]
    status: String,
    /// Staff name, or `unassigned`.
    #[schema(example = "unassigned")]
    assignee: String,
    created_at: String,
    /// Creation time on the viewer clock.
    #[schema(example = "2024/05/01 18:00")]
    display_time: String,
}

/// OpenAPI schema for a page of [`crate::domain::QueueRow`].
#[derive(ToSchema)]
#[schema(as = crate::domain::QueuePage)]
#[schema(rename_all = "camelCase")]
pub struct QueuePageSchema {
    items: Vec<QueueRowSchema>,
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
}

/// OpenAPI schema for [`crate::domain::Comment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Comment)]
#[schema(rename_all = "camelCase")]
pub struct CommentSchema {
    author_name: String,
    text: String,
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Ticket`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Ticket)]
#[schema(rename_all = "camelCase")]
pub struct TicketSchema {
    id: String,
    name: String,
    email: String,
    /// Digits only.
    #[schema(example = "0312345678")]
    phone: String,
    product_type: String,
    message: String,
    status: String,
    assignee: String,
    created_at: String,
    comments: Vec<CommentSchema>,
}

/// OpenAPI schema for [`crate::domain::TicketDetail`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TicketDetail)]
#[schema(rename_all = "camelCase")]
pub struct TicketDetailSchema {
    ticket: TicketSchema,
    /// `confirmed` after an acknowledged write, `stale` after a failed one.
    #[schema(example = "confirmed")]
    sync_state: String,
}

/// OpenAPI schema for [`crate::domain::RenderedMessage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RenderedMessage)]
#[schema(rename_all = "camelCase")]
pub struct RenderedMessageSchema {
    #[schema(example = "Sato (support)")]
    sender_label: String,
    /// `own` or `other`, relative to the viewer's role.
    #[schema(example = "own")]
    side: String,
    text: String,
    created_at: String,
    /// `Today H:MM AM` for today, `M/D H:MM PM` otherwise.
    #[schema(example = "Today 9:00 AM")]
    display_time: String,
}

/// OpenAPI schema for [`crate::domain::RenderedThread`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RenderedThread)]
#[schema(rename_all = "camelCase")]
pub struct RenderedThreadSchema {
    guest_id: String,
    #[schema(example = "Customer support")]
    title: String,
    #[schema(example = "Taro")]
    guest_name: String,
    messages: Vec<RenderedMessageSchema>,
}

/// OpenAPI schema for [`crate::domain::ports::SendOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::SendOutcome)]
pub struct SendOutcomeSchema {
    /// `false` for blank input or a failed write.
    sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_code_schema_lists_every_domain_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    #[case(schema_to_json::<ErrorSchema>(), "traceId")]
    #[case(schema_to_json::<SessionViewSchema>(), "landingPath")]
    #[case(schema_to_json::<QueuePageSchema>(), "totalPages")]
    #[case(schema_to_json::<TicketDetailSchema>(), "syncState")]
    #[case(schema_to_json::<RenderedThreadSchema>(), "guestName")]
    #[case(schema_to_json::<RenderedMessageSchema>(), "displayTime")]
    fn schemas_use_camel_case_wire_names(#[case] schema_json: String, #[case] field: &str) {
        assert!(schema_json.contains(field), "missing {field}");
    }
}
