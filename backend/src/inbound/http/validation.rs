//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is `400 invalid_request` with `details` naming the field
//! and a stable code, so clients can highlight the offending input.

use pagination::PageRequest;
use serde_json::json;

use crate::domain::{EmailAddress, Error, ProductFilter, StatusFilter, TicketStatus, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUserId,
    InvalidEmail,
    InvalidStatus,
    InvalidProduct,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUserId => "invalid_user_id",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidProduct => "invalid_product",
            ErrorCode::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|err| {
        invalid(field, ErrorCode::InvalidUserId, format!("{}: {err}", field.as_str()), value)
    })
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(value).map_err(|err| {
        let message = format!("{}: {err}", field.as_str());
        Error::invalid_request(message).with_details(json!({
            "field": field.as_str(),
            "code": ErrorCode::InvalidEmail.as_str(),
        }))
    })
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<TicketStatus, Error> {
    value.parse().map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be unhandled, in_progress or resolved", field.as_str()),
            value,
        )
    })
}

/// Absent means the default `unhandled` filter.
pub(crate) fn parse_status_filter(
    value: Option<&str>,
    field: FieldName,
) -> Result<StatusFilter, Error> {
    let Some(raw) = value else {
        return Ok(StatusFilter::default());
    };
    raw.parse().map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be all or a ticket status", field.as_str()),
            raw,
        )
    })
}

pub(crate) fn parse_product_filter(
    value: Option<&str>,
    field: FieldName,
) -> Result<ProductFilter, Error> {
    let Some(raw) = value else {
        return Ok(ProductFilter::All);
    };
    raw.parse().map_err(|_| {
        invalid(
            field,
            ErrorCode::InvalidProduct,
            format!("{} must be all or a catalogue product code", field.as_str()),
            raw,
        )
    })
}

pub(crate) fn parse_page(value: Option<usize>, field: FieldName) -> Result<PageRequest, Error> {
    let page = value.unwrap_or(1);
    PageRequest::with_default_size(page).map_err(|err| {
        invalid(
            field,
            ErrorCode::InvalidPage,
            format!("{}: {err}", field.as_str()),
            &page.to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductCode;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("status");

    fn detail_code(error: &Error) -> Option<&str> {
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    #[case(None, StatusFilter::Only(TicketStatus::Unhandled))]
    #[case(Some("all"), StatusFilter::All)]
    #[case(Some("resolved"), StatusFilter::Only(TicketStatus::Resolved))]
    fn status_filter_defaults_to_unhandled(
        #[case] raw: Option<&str>,
        #[case] expected: StatusFilter,
    ) {
        assert_eq!(parse_status_filter(raw, FIELD).expect("valid"), expected);
    }

    #[rstest]
    #[case("closed")]
    #[case("Unhandled")]
    fn unknown_status_is_rejected(#[case] raw: &str) {
        let err = parse_status(raw, FIELD).expect_err("invalid");
        assert_eq!(detail_code(&err), Some("invalid_status"));
    }

    #[rstest]
    fn product_filter_accepts_catalogue_codes() {
        let field = FieldName::new("product");
        assert_eq!(
            parse_product_filter(Some("KM-001"), field).expect("valid"),
            ProductFilter::Only(ProductCode::new("KM-001").expect("code"))
        );
        assert_eq!(
            parse_product_filter(None, field).expect("valid"),
            ProductFilter::All
        );
        let err = parse_product_filter(Some("XX-999"), field).expect_err("invalid");
        assert_eq!(detail_code(&err), Some("invalid_product"));
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(3), 3)]
    fn page_defaults_to_first(#[case] raw: Option<usize>, #[case] expected: usize) {
        let page = parse_page(raw, FieldName::new("page")).expect("valid");
        assert_eq!(page.page(), expected);
    }

    #[rstest]
    fn page_zero_is_rejected() {
        let err = parse_page(Some(0), FieldName::new("page")).expect_err("invalid");
        assert_eq!(detail_code(&err), Some("invalid_page"));
    }

    #[rstest]
    #[case("taro/../x")]
    #[case("")]
    fn malformed_user_ids_are_rejected(#[case] raw: &str) {
        let err = parse_user_id(raw, FieldName::new("userId")).expect_err("invalid");
        assert_eq!(detail_code(&err), Some("invalid_user_id"));
    }
}
