//! Server harness and shared world for the helpdesk behaviour suites.
//!
//! The harness wires the real domain services over the in-process adapters
//! (memory stores, in-memory identity provider, broadcast feed) and serves
//! them from an Actix server on an ephemeral port. It owns a single-threaded
//! Tokio runtime plus a `LocalSet` because Actix uses `spawn_local`
//! internally. `WorldFixture` stops the server even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use helpdesk::Trace;
use helpdesk::domain::ports::{ChatThreadFeed, ChatThreadRepository, IdentityProvider, TicketRepository};
use helpdesk::domain::{
    AuthService, ChatService, DisplayClock, RegistrationService, StaffDirectory, TicketService,
};
use helpdesk::inbound::http::auth::{
    current_session, login, logout, register, request_password_reset,
};
use helpdesk::inbound::http::chat::{get_thread, send_message};
use helpdesk::inbound::http::navigation::navigate;
use helpdesk::inbound::http::state::{HttpState, HttpStatePorts};
use helpdesk::inbound::http::tickets::{add_comment, get_ticket, list_queue, set_status};
use helpdesk::inbound::ws;
use helpdesk::inbound::ws::state::{AllowedOrigins, WsState};
use helpdesk::outbound::identity::InMemoryIdentityProvider;
use helpdesk::outbound::memory::{MemoryChatThreadRepository, MemoryTicketRepository};
use helpdesk::outbound::realtime::BroadcastChatFeed;

/// Staff allow-list used by every scenario.
pub(crate) const STAFF_EMAILS: &str = "staff1@example.com,staff2@example.com";
/// Origin presented by socket clients; plain localhost is always accepted.
pub(crate) const CLIENT_ORIGIN: &str = "http://localhost:3000";
/// Password shared by every account the scenarios create.
pub(crate) const PASSWORD: &str = "secret-pass";

/// Response captured by the last HTTP step.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub(crate) status: u16,
    pub(crate) body: Value,
}

pub(crate) struct HelpdeskWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    /// `name=value` session cookie pairs keyed by the actor's email.
    pub(crate) cookies: HashMap<String, String>,
    /// User ids issued at registration, keyed by email.
    pub(crate) user_ids: HashMap<String, String>,
    pub(crate) last: Option<Captured>,
    /// Final snapshot frame each socket observed, keyed by email.
    pub(crate) watched: HashMap<String, Value>,
}

pub(crate) type SharedWorld = Rc<RefCell<HelpdeskWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// Run `operation` on the world's runtime with the server base URL.
///
/// The world stays borrowed while the future runs, so the future must not
/// touch the world itself.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

fn in_process_state() -> (HttpState, WsState) {
    let staff = Arc::new(StaffDirectory::from_list(STAFF_EMAILS));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tickets: Arc<dyn TicketRepository> = Arc::new(MemoryTicketRepository::new());
    let threads: Arc<dyn ChatThreadRepository> = Arc::new(MemoryChatThreadRepository::new());
    let identity: Arc<dyn IdentityProvider> = Arc::new(InMemoryIdentityProvider::new());
    let feed: Arc<dyn ChatThreadFeed> = Arc::new(BroadcastChatFeed::new());

    let auth = Arc::new(AuthService::new(Arc::clone(&identity), Arc::clone(&staff)));
    let registration = Arc::new(RegistrationService::new(
        identity,
        Arc::clone(&tickets),
        Arc::clone(&staff),
        Arc::clone(&clock),
    ));
    let ticket_service = Arc::new(TicketService::new(
        Arc::clone(&tickets),
        Arc::clone(&staff),
        Arc::clone(&clock),
    ));
    let chat = Arc::new(ChatService::new(
        threads,
        tickets,
        feed,
        Arc::clone(&staff),
        clock,
        DisplayClock::utc(),
    ));

    let http = HttpState::new(HttpStatePorts {
        registration,
        login: auth.clone(),
        password_reset: auth,
        tickets_query: ticket_service.clone(),
        tickets_command: ticket_service,
        chat_command: chat.clone(),
        chat_query: chat.clone(),
        staff: Arc::clone(&staff),
    });
    let ws = WsState::new(chat.clone(), chat, staff, AllowedOrigins::default());
    (http, ws)
}

async fn spawn_server() -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let (http, ws_state) = in_process_state();
    let http_data = web::Data::new(http);
    let ws_data = web::Data::new(ws_state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(register)
            .service(login)
            .service(logout)
            .service(request_password_reset)
            .service(current_session)
            .service(navigate)
            .service(list_queue)
            .service(get_ticket)
            .service(set_status)
            .service(add_comment)
            .service(get_thread)
            .service(send_message);

        App::new()
            .app_data(http_data.clone())
            .app_data(ws_data.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(Trace)
            .service(api)
            .service(ws::chat_socket)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

/// Start a fresh server with empty stores.
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let (base_url, server) = local
        .block_on(&runtime, spawn_server())
        .expect("helpdesk server should start");

    WorldFixture {
        world: Rc::new(RefCell::new(HelpdeskWorld {
            runtime,
            local,
            base_url,
            server,
            cookies: HashMap::new(),
            user_ids: HashMap::new(),
            last: None,
            watched: HashMap::new(),
        })),
    }
}

/// Registration body for `email` with otherwise fixed form values.
pub(crate) fn registration_body(name: &str, email: &str, product: &str) -> Value {
    serde_json::json!({
        "name": name,
        "phone": "03-1234-5678",
        "email": email,
        "password": PASSWORD,
        "productType": product,
        "message": format!("{name} needs help with {product}")
    })
}

fn cookie_pair(set_cookie: Option<&str>) -> Option<String> {
    set_cookie
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
}

/// Send one JSON request, optionally as `actor`, and record the response.
pub(crate) fn request(
    world: &SharedWorld,
    actor: Option<&str>,
    method: Method,
    path: &str,
    payload: Option<Value>,
) -> Captured {
    let cookie = actor.and_then(|email| world.borrow().cookies.get(email).cloned());
    let path = path.to_owned();
    let (captured, set_cookie) = with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(cookie) = cookie {
            request = request.insert_header((header::COOKIE, cookie));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("json request"),
            None => request.send().await.expect("request"),
        };
        let status = response.status().as_u16();
        let set_cookie = cookie_pair(
            response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|value| value.to_str().ok()),
        );
        let bytes = response.body().await.expect("response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (Captured { status, body }, set_cookie)
    });

    let mut ctx = world.borrow_mut();
    if let (Some(email), Some(cookie)) = (actor, set_cookie) {
        ctx.cookies.insert(email.to_owned(), cookie);
    }
    ctx.last = Some(captured.clone());
    captured
}

/// Register `email` through the public form and keep its session cookie.
pub(crate) fn register_account(world: &SharedWorld, name: &str, email: &str, product: &str) {
    let captured = request(
        world,
        Some(email),
        Method::POST,
        "/api/v1/register",
        Some(registration_body(name, email, product)),
    );
    assert_eq!(captured.status, 200, "registration failed: {:?}", captured.body);
    let id = captured.body["identity"]["id"]
        .as_str()
        .expect("identity id")
        .to_owned();
    world.borrow_mut().user_ids.insert(email.to_owned(), id);
}

/// Issued user id for `email`.
pub(crate) fn user_id(world: &SharedWorld, email: &str) -> String {
    world
        .borrow()
        .user_ids
        .get(email)
        .cloned()
        .unwrap_or_else(|| panic!("{email} has not registered"))
}

/// Last captured response.
pub(crate) fn last(world: &SharedWorld) -> Captured {
    world.borrow().last.clone().expect("a request was sent")
}
