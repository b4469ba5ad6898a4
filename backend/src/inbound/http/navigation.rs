//! Router guard endpoint.
//!
//! ```text
//! GET /api/v1/navigation?path=/chat/abc
//! ```
//!
//! Lets the client ask which view a path resolves to for the current session,
//! so the server and client agree on the guard's answer.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{AccessDecision, Route, Viewer, decide};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AccessDecisionSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/v1/navigation`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NavigationQuery {
    /// Client path to evaluate; defaults to `/`.
    pub path: Option<String>,
}

/// Evaluate the guard for `path` and the current session.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Render or redirect decision", body = AccessDecisionSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["navigation"],
    operation_id = "navigate",
    security([])
)]
#[get("/navigation")]
pub async fn navigate(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NavigationQuery>,
) -> ApiResult<web::Json<AccessDecision>> {
    let route = Route::parse(query.path.as_deref().unwrap_or("/"));
    let viewer = session.viewer(&state.staff)?;
    Ok(web::Json(decide(viewer.as_ref().map(Viewer::as_pair), &route)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, Identity, UserId};
    use crate::inbound::http::test_utils::{
        fixture_ports, session_cookie, test_session_middleware,
    };
    use actix_web::cookie::Cookie;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn decision(path: &str, signed_in_as: Option<(&str, &str)>) -> Value {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(fixture_ports())))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(navigate))
                .route(
                    "/sign-in/{id}/{email}",
                    web::get().to(
                        |session: SessionContext, path: web::Path<(String, String)>| async move {
                            let (id, email) = path.into_inner();
                            session.persist_identity(&Identity::new(
                                UserId::new(id).expect("id"),
                                EmailAddress::new(email).expect("email"),
                            ))?;
                            Ok::<_, crate::domain::Error>(HttpResponse::Ok())
                        },
                    ),
                ),
        )
        .await;

        let cookie: Option<Cookie<'static>> = match signed_in_as {
            Some((id, email)) => {
                let res = actix_test::call_service(
                    &app,
                    actix_test::TestRequest::get()
                        .uri(&format!("/sign-in/{id}/{email}"))
                        .to_request(),
                )
                .await;
                Some(session_cookie(&res))
            }
            None => None,
        };

        let mut request = actix_test::TestRequest::get().uri(&format!(
            "/api/v1/navigation?path={}",
            path.replace('/', "%2F")
        ));
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        actix_test::call_and_read_body_json(&app, request.to_request()).await
    }

    const GUEST: Option<(&str, &str)> = Some(("taro", "taro@example.com"));
    const STAFF: Option<(&str, &str)> = Some(("sato", "sato@example.com"));

    #[rstest]
    #[case("/admin", None, json!({"decision": "render", "view": {"name": "login"}}))]
    #[case("/reset-password", None, json!({"decision": "render", "view": {"name": "reset_password"}}))]
    #[case("/", GUEST, json!({"decision": "redirect", "location": "/chat/taro"}))]
    #[case("/", STAFF, json!({"decision": "redirect", "location": "/admin"}))]
    #[case("/chat/hanako", GUEST, json!({"decision": "redirect", "location": "/"}))]
    #[case("/chat/hanako", STAFF, json!({"decision": "render", "view": {"name": "chat", "guestId": "hanako"}}))]
    #[case("/admin", GUEST, json!({"decision": "redirect", "location": "/chat/taro"}))]
    #[case("/guest/taro", STAFF, json!({"decision": "render", "view": {"name": "ticket_detail", "guestId": "taro"}}))]
    #[case("/nowhere", STAFF, json!({"decision": "redirect", "location": "/"}))]
    #[actix_web::test]
    async fn guard_decisions_follow_the_session(
        #[case] path: &str,
        #[case] signed_in_as: Option<(&str, &str)>,
        #[case] expected: Value,
    ) {
        assert_eq!(decision(path, signed_in_as).await, expected);
    }
}
