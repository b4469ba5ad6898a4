//! Tests for staff ticket handlers.

use super::*;
use crate::domain::ports::{MockTicketCommand, MockTicketQueueQuery};
use crate::domain::test_fixtures::sample_ticket;
use crate::domain::{
    DisplayClock, EmailAddress, Error, Identity, ProductFilter, StaffName, StatusFilter,
    TicketStatus, UserId,
};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{fixture_ports, session_cookie, test_session_middleware};
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_app(
    ports: HttpStatePorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(ports)))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(list_queue)
                .service(get_ticket)
                .service(set_status)
                .service(add_comment),
        )
        .route(
            "/sign-in/{id}",
            web::get().to(|session: SessionContext, path: web::Path<String>| async move {
                let id = path.into_inner();
                session.persist_identity(&Identity::new(
                    UserId::new(id.as_str()).expect("id"),
                    EmailAddress::new(format!("{id}@example.com")).expect("email"),
                ))?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
}

async fn sign_in<S>(app: &S, id: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::get()
            .uri(&format!("/sign-in/{id}"))
            .to_request(),
    )
    .await;
    session_cookie(&res)
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some("taro"), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn queue_is_staff_only(#[case] viewer: Option<&str>, #[case] expected: StatusCode) {
    let mut query = MockTicketQueueQuery::new();
    query.expect_queue().times(0);
    let ports = HttpStatePorts {
        tickets_query: Arc::new(query),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let mut request = actix_test::TestRequest::get().uri("/api/v1/admin/tickets");
    if let Some(id) = viewer {
        request = request.cookie(sign_in(&app, id).await);
    }
    let res = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn queue_defaults_to_unhandled_first_page() {
    let mut query = MockTicketQueueQuery::new();
    query
        .expect_queue()
        .withf(|request| {
            request.filter.status == StatusFilter::Only(TicketStatus::Unhandled)
                && request.filter.product == ProductFilter::All
                && request.page.page() == 1
        })
        .times(1)
        .return_once(|request| {
            let rows = vec![QueueRow::new(&sample_ticket("taro", "Taro", 0), DisplayClock::utc())];
            Ok(Page::slice(rows, request.page))
        });
    let ports = HttpStatePorts {
        tickets_query: Arc::new(query),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app, "sato").await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/tickets")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(body.get("totalItems"), Some(&json!(1)));
    let first = body
        .get("items")
        .and_then(|items| items.get(0))
        .expect("one row");
    assert_eq!(first.get("id"), Some(&json!("taro")));
    assert_eq!(first.get("productType"), Some(&json!("KM-001")));
    assert_eq!(first.get("assignee"), Some(&json!("unassigned")));
    assert_eq!(first.get("displayTime"), Some(&json!("2024/05/01 09:00")));
}

#[rstest]
#[case("/api/v1/admin/tickets?status=closed", "status", "invalid_status")]
#[case("/api/v1/admin/tickets?product=XX-1", "product", "invalid_product")]
#[case("/api/v1/admin/tickets?page=0", "page", "invalid_page")]
#[actix_web::test]
async fn queue_rejects_bad_filters(#[case] uri: &str, #[case] field: &str, #[case] code: &str) {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = sign_in(&app, "sato").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    let details = body.get("details").expect("details");
    assert_eq!(details.get("field"), Some(&json!(field)));
    assert_eq!(details.get("code"), Some(&json!(code)));
}

#[rstest]
#[actix_web::test]
async fn missing_ticket_is_not_found() {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = sign_in(&app, "sato").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/tickets/hanako")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn set_status_acts_as_the_signed_in_staff_member() {
    let mut command = MockTicketCommand::new();
    command
        .expect_set_status()
        .withf(|request| {
            request.guest_id.as_str() == "taro"
                && request.status == TicketStatus::InProgress
                && request.acting_email.as_str() == "sato@example.com"
        })
        .times(1)
        .return_once(|_| {
            let mut detail = TicketDetail::loaded(sample_ticket("taro", "Taro", 0));
            detail.apply(|ticket| {
                ticket.set_status(
                    TicketStatus::InProgress,
                    &StaffName::new("Sato").expect("name"),
                );
            });
            detail.confirm();
            Ok(detail)
        });
    let ports = HttpStatePorts {
        tickets_command: Arc::new(command),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app, "sato").await;

    let body: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/tickets/taro/status")
            .cookie(cookie)
            .set_json(StatusBody {
                status: "in_progress".into(),
            })
            .to_request(),
    )
    .await;

    assert_eq!(body.get("syncState"), Some(&json!("confirmed")));
    let ticket = body.get("ticket").expect("ticket");
    assert_eq!(ticket.get("status"), Some(&json!("in_progress")));
    assert_eq!(ticket.get("assignee"), Some(&json!("Sato")));
}

#[rstest]
#[actix_web::test]
async fn unknown_status_never_reaches_the_command() {
    let mut command = MockTicketCommand::new();
    command.expect_set_status().times(0);
    let ports = HttpStatePorts {
        tickets_command: Arc::new(command),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app, "sato").await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/tickets/taro/status")
            .cookie(cookie)
            .set_json(StatusBody {
                status: "closed".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn failed_comment_write_comes_back_stale() {
    let mut command = MockTicketCommand::new();
    command
        .expect_add_comment()
        .withf(|request| {
            request.author_email.as_str() == "sato@example.com" && request.text == "Called back"
        })
        .times(1)
        .return_once(|_| {
            let mut detail = TicketDetail::loaded(sample_ticket("taro", "Taro", 0));
            detail.mark_stale();
            Ok(detail)
        });
    let ports = HttpStatePorts {
        tickets_command: Arc::new(command),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app, "sato").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/tickets/taro/comments")
            .cookie(cookie)
            .set_json(CommentBody {
                text: "Called back".into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body.get("syncState"), Some(&json!("stale")));
}
