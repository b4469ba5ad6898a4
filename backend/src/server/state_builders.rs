//! Builders wiring adapters into the services behind HTTP and WebSocket state.
//!
//! Every driven port has a database- or network-backed adapter and an
//! in-process one; the configuration decides which is used.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::info;

use helpdesk::domain::ports::{
    ChatThreadFeed, ChatThreadRepository, IdentityProvider, TicketRepository,
};
use helpdesk::domain::{
    AuthService, ChatService, RegistrationService, StaffDirectory, TicketService,
};
use helpdesk::inbound::http::state::{HttpState, HttpStatePorts};
use helpdesk::inbound::ws::state::WsState;
use helpdesk::outbound::identity::{IdentityToolkitProvider, InMemoryIdentityProvider};
use helpdesk::outbound::memory::{MemoryChatThreadRepository, MemoryTicketRepository};
use helpdesk::outbound::persistence::{DbPool, DieselChatThreadRepository, DieselTicketRepository};
use helpdesk::outbound::realtime::BroadcastChatFeed;

use super::ServerConfig;
use super::settings::IdentityBackend;

const IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Ticket and chat stores.
struct Stores {
    tickets: Arc<dyn TicketRepository>,
    threads: Arc<dyn ChatThreadRepository>,
}

fn build_stores(pool: Option<&DbPool>) -> Stores {
    match pool {
        Some(pool) => Stores {
            tickets: Arc::new(DieselTicketRepository::new(pool.clone())),
            threads: Arc::new(DieselChatThreadRepository::new(pool.clone())),
        },
        None => {
            info!("no database configured; records are kept in memory");
            Stores {
                tickets: Arc::new(MemoryTicketRepository::new()),
                threads: Arc::new(MemoryChatThreadRepository::new()),
            }
        }
    }
}

fn build_identity(backend: &IdentityBackend) -> std::io::Result<Arc<dyn IdentityProvider>> {
    match backend {
        IdentityBackend::InMemory => {
            info!("no identity provider configured; accounts are kept in memory");
            Ok(Arc::new(InMemoryIdentityProvider::new()))
        }
        IdentityBackend::Toolkit { endpoint, api_key } => {
            let provider =
                IdentityToolkitProvider::new(endpoint.clone(), api_key.clone(), IDENTITY_TIMEOUT)
                    .map_err(|err| {
                        std::io::Error::other(format!("identity client build failed: {err}"))
                    })?;
            Ok(Arc::new(provider))
        }
    }
}

#[cfg(feature = "metrics")]
fn build_feed(config: &ServerConfig) -> std::io::Result<Arc<dyn ChatThreadFeed>> {
    use helpdesk::outbound::metrics::PrometheusChatFeed;

    let feed: Arc<dyn ChatThreadFeed> = Arc::new(BroadcastChatFeed::new());
    match &config.prometheus {
        Some(prometheus) => {
            let instrumented = PrometheusChatFeed::new(feed, &prometheus.registry).map_err(
                |err| std::io::Error::other(format!("chat feed metrics registration failed: {err}")),
            )?;
            Ok(Arc::new(instrumented))
        }
        None => Ok(feed),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_feed(_config: &ServerConfig) -> std::io::Result<Arc<dyn ChatThreadFeed>> {
    Ok(Arc::new(BroadcastChatFeed::new()))
}

/// State shared by every worker.
pub(super) struct AppState {
    pub(super) http: HttpState,
    pub(super) ws: WsState,
}

/// Wire adapters and services for `config`.
///
/// # Errors
/// Returns [`std::io::Error`] when the identity client cannot be built or
/// metric registration fails.
pub(super) fn build_app_state(config: &ServerConfig) -> std::io::Result<AppState> {
    let Stores { tickets, threads } = build_stores(config.db_pool.as_ref());
    let identity = build_identity(&config.identity)?;
    let feed = build_feed(config)?;
    let staff = Arc::new(config.staff.clone());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    Ok(assemble(
        Ports {
            tickets,
            threads,
            identity,
            feed,
        },
        staff,
        clock,
        config,
    ))
}

struct Ports {
    tickets: Arc<dyn TicketRepository>,
    threads: Arc<dyn ChatThreadRepository>,
    identity: Arc<dyn IdentityProvider>,
    feed: Arc<dyn ChatThreadFeed>,
}

fn assemble(
    ports: Ports,
    staff: Arc<StaffDirectory>,
    clock: Arc<dyn Clock>,
    config: &ServerConfig,
) -> AppState {
    let Ports {
        tickets,
        threads,
        identity,
        feed,
    } = ports;

    let auth = Arc::new(AuthService::new(Arc::clone(&identity), Arc::clone(&staff)));
    let registration = Arc::new(RegistrationService::new(
        identity,
        Arc::clone(&tickets),
        Arc::clone(&staff),
        Arc::clone(&clock),
    ));
    let ticket_service = Arc::new(
        TicketService::new(Arc::clone(&tickets), Arc::clone(&staff), Arc::clone(&clock))
            .with_display_clock(config.display),
    );
    let chat = Arc::new(ChatService::new(
        threads,
        tickets,
        feed,
        Arc::clone(&staff),
        clock,
        config.display,
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
    let ws = WsState::new(chat.clone(), chat, staff, config.origins.clone());
    AppState { http, ws }
}

#[cfg(test)]
mod tests {
    //! Wiring checks for the in-process fallbacks.

    use super::*;
    use actix_web::cookie::Key;
    use futures_util::StreamExt;
    use helpdesk::domain::ports::{
        ChatCommand, ChatQuery, GuestRegistration, LoginService, SendMessageRequest,
    };
    use helpdesk::domain::{LoginCredentials, RegistrationInput, Role, UserId, Viewer};
    use helpdesk::inbound::http::session_config::SessionSettings;
    use rstest::rstest;
    use zeroize::Zeroizing;

    fn config() -> ServerConfig {
        ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: actix_web::cookie::SameSite::Lax,
                ttl_hours: 2,
            },
            "127.0.0.1:0".parse().expect("addr"),
            StaffDirectory::from_list("sato@example.com"),
        )
    }

    fn registration() -> RegistrationInput {
        RegistrationInput {
            name: "Taro".to_owned(),
            phone: "03-1234-5678".to_owned(),
            email: "taro@example.com".to_owned(),
            password: Zeroizing::new("secret1".to_owned()),
            product_type: "KM-001".to_owned(),
            message: "Keys stick".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn in_memory_state_registers_and_signs_in_guests() {
        let state = build_app_state(&config()).expect("state");

        let registered = state
            .http
            .registration
            .register(registration())
            .await
            .expect("registered");
        assert_eq!(registered.role, Role::Guest);

        let credentials =
            LoginCredentials::try_from_parts("taro@example.com", "secret1").expect("creds");
        let signed_in = state.http.login.login(&credentials).await.expect("signed in");
        assert_eq!(signed_in.identity, registered.identity);
    }

    #[rstest]
    #[tokio::test]
    async fn http_and_socket_share_one_chat_service() {
        let state = build_app_state(&config()).expect("state");
        let registered = state
            .http
            .registration
            .register(registration())
            .await
            .expect("registered");
        let guest_id = UserId::new(registered.identity.id().as_str()).expect("id");
        let viewer = Viewer::new(registered.identity.clone(), Role::Guest);

        let mut snapshots = state.ws.chat_query.watch(&viewer, &guest_id).await.expect("watch");
        let first = snapshots.next().await.expect("initial snapshot");
        assert!(first.messages.is_empty());

        let sent = state
            .http
            .chat_command
            .send(SendMessageRequest {
                viewer: viewer.clone(),
                guest_id: guest_id.clone(),
                text: "hello".to_owned(),
            })
            .await
            .expect("send");
        assert!(sent.sent);

        let second = snapshots.next().await.expect("pushed snapshot");
        assert_eq!(second.messages.len(), 1);
    }
}
