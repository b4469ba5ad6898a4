//! Chat socket tests against a live server.

use super::*;
use crate::domain::ports::{ChatCommand, FixtureChatCommand, FixtureChatQuery, MockChatCommand};
use crate::domain::{EmailAddress, Error, Identity, StaffDirectory};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::test_utils::TEST_STAFF_EMAIL;
use crate::inbound::ws;
use crate::inbound::ws::state::{AllowedOrigins, WsState};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, dev::ServerHandle, http::header, web};
use awc::error::WsClientError;
use awc::{BoxedSocket, ws::Codec, ws::Frame};
use futures_util::{SinkExt, StreamExt};
use rstest::rstest;
use serde_json::{Value, json};

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

struct TestServer {
    url: String,
    handle: ServerHandle,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        drop(self.handle.stop(false));
    }
}

fn start_server(chat_command: Arc<dyn ChatCommand>) -> TestServer {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let ws_state = WsState::new(
        Arc::new(FixtureChatQuery),
        chat_command,
        Arc::new(StaffDirectory::from_list(TEST_STAFF_EMAIL)),
        AllowedOrigins::default(),
    );
    let key = Key::generate();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(ws_state.clone()))
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_name("session".to_owned())
                    .cookie_secure(false)
                    .build(),
            )
            .service(ws::chat_socket)
            .route(
                "/sign-in/{id}",
                web::get().to(|session: SessionContext, path: web::Path<String>| async move {
                    let id = path.into_inner();
                    let email = if id == "sato" {
                        TEST_STAFF_EMAIL.to_owned()
                    } else {
                        format!("{id}@example.com")
                    };
                    session.persist_identity(&Identity::new(
                        UserId::new(id.as_str()).expect("id"),
                        EmailAddress::new(email).expect("email"),
                    ))?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    TestServer {
        url: format!("http://{addr}"),
        handle,
    }
}

async fn sign_in(server: &TestServer, id: &str) -> Cookie<'static> {
    let response = awc::Client::default()
        .get(format!("{}/sign-in/{id}", server.url))
        .send()
        .await
        .expect("sign in");
    let cookies = response.cookies().expect("cookies");
    cookies
        .iter()
        .find(|cookie| cookie.name() == "session")
        .cloned()
        .expect("session cookie")
}

async fn connect(
    server: &TestServer,
    cookie: Option<Cookie<'static>>,
    thread: &str,
) -> Result<Socket, WsClientError> {
    let mut request = awc::Client::default()
        .ws(format!("{}/ws/chat/{thread}", server.url))
        .set_header(header::ORIGIN, "http://localhost:3000");
    if let Some(cookie) = cookie {
        request = request.cookie(cookie);
    }
    request.connect().await.map(|(_resp, socket)| socket)
}

async fn open_own_thread(server: &TestServer) -> Socket {
    let cookie = sign_in(server, "taro").await;
    connect(server, Some(cookie), "taro")
        .await
        .expect("websocket connect")
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

fn send_frame(text: &str) -> awc::ws::Message {
    awc::ws::Message::Text(json!({ "type": "send", "text": text }).to_string().into())
}

#[rstest]
#[actix_rt::test]
async fn pushes_initial_snapshot_on_connect() {
    let server = start_server(Arc::new(FixtureChatCommand));
    let mut socket = open_own_thread(&server).await;

    let frame = next_json(&mut socket).await;
    assert_eq!(frame.get("type"), Some(&json!("snapshot")));
    assert_eq!(frame.get("guestId"), Some(&json!("taro")));
    assert_eq!(frame.get("title"), Some(&json!("Customer support")));
    assert_eq!(frame.get("messages"), Some(&json!([])));
}

#[rstest]
#[case("hello", true)]
#[case("   ", false)]
#[actix_rt::test]
async fn acknowledges_send_frames(#[case] text: &str, #[case] expected: bool) {
    let server = start_server(Arc::new(FixtureChatCommand));
    let mut socket = open_own_thread(&server).await;
    let _snapshot = next_json(&mut socket).await;

    socket.send(send_frame(text)).await.expect("send text");

    let frame = next_json(&mut socket).await;
    assert_eq!(frame, json!({ "type": "sent", "sent": expected }));
}

#[rstest]
#[actix_rt::test]
async fn send_forwards_viewer_and_thread() {
    let mut command = MockChatCommand::new();
    command
        .expect_send()
        .withf(|request| {
            request.guest_id.as_str() == "taro"
                && request.viewer.identity.id().as_str() == "sato"
                && request.text == "We are on it"
        })
        .times(1)
        .return_once(|_| Ok(crate::domain::ports::SendOutcome { sent: true }));
    let server = start_server(Arc::new(command));
    let cookie = sign_in(&server, "sato").await;
    let mut socket = connect(&server, Some(cookie), "taro")
        .await
        .expect("staff may open any thread");
    let snapshot = next_json(&mut socket).await;
    assert_eq!(snapshot.get("title"), Some(&json!("Staff chat")));

    socket.send(send_frame("We are on it")).await.expect("send text");

    let frame = next_json(&mut socket).await;
    assert_eq!(frame.get("sent"), Some(&json!(true)));
}

#[rstest]
#[actix_rt::test]
async fn internal_send_failures_are_redacted() {
    let mut command = MockChatCommand::new();
    command
        .expect_send()
        .return_once(|_| Err(Error::internal("connection pool exhausted")));
    let server = start_server(Arc::new(command));
    let mut socket = open_own_thread(&server).await;
    let _snapshot = next_json(&mut socket).await;

    socket.send(send_frame("hello")).await.expect("send text");

    let frame = next_json(&mut socket).await;
    assert_eq!(frame.get("type"), Some(&json!("error")));
    assert_eq!(frame.get("code"), Some(&json!("internal_error")));
    assert_eq!(frame.get("message"), Some(&json!("Internal server error")));
}

#[rstest]
#[case(false, "taro", StatusCode::UNAUTHORIZED)]
#[case(true, "hanako", StatusCode::FORBIDDEN)]
#[case(true, "bad id!", StatusCode::BAD_REQUEST)]
#[actix_rt::test]
async fn refuses_upgrade_before_handshake(
    #[case] signed_in: bool,
    #[case] thread: &str,
    #[case] expected: StatusCode,
) {
    let server = start_server(Arc::new(FixtureChatCommand));
    let cookie = if signed_in {
        Some(sign_in(&server, "taro").await)
    } else {
        None
    };
    let thread = thread.replace(' ', "%20");
    match connect(&server, cookie, &thread).await {
        Err(WsClientError::InvalidResponseStatus(status)) => assert_eq!(status, expected),
        Err(other) => panic!("unexpected client error: {other}"),
        Ok(_) => panic!("upgrade should be refused"),
    }
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json() {
    let server = start_server(Arc::new(FixtureChatCommand));
    let mut socket = open_own_thread(&server).await;
    let _snapshot = next_json(&mut socket).await;

    socket
        .send(awc::ws::Message::Text("not-json".into()))
        .await
        .expect("send text");

    loop {
        match socket.next().await.expect("response frame").expect("frame") {
            Frame::Ping(_) | Frame::Pong(_) => continue,
            Frame::Close(reason) => {
                assert_eq!(reason.expect("reason").code, CloseCode::Policy);
                break;
            }
            other => panic!("expected close frame, got {other:?}"),
        }
    }
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages() {
    let server = start_server(Arc::new(FixtureChatCommand));
    let mut socket = open_own_thread(&server).await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let observed_close = tokio::time::timeout(Duration::from_secs(2), async {
        let mut observed = None;
        while let Some(frame) = socket.next().await {
            match frame.expect("frame") {
                Frame::Ping(_) | Frame::Pong(_) | Frame::Text(_) => continue,
                Frame::Close(reason) => {
                    observed = reason;
                    break;
                }
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        observed
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame missing after timeout");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
