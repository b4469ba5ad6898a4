//! Router guard: decides which view an identity may see for a path.
//!
//! The decision is synchronous and re-evaluated on every navigation. It is
//! expressed purely in terms of the viewer's identity and [`Role`], so the
//! HTTP adapter can enforce exactly what the client-side guard shows.

use serde::Serialize;

use super::{Identity, Role, UserId};

/// Path of the staff triage queue.
pub const ADMIN_PATH: &str = "/admin";
/// Path of the always-reachable password reset view.
pub const RESET_PASSWORD_PATH: &str = "/reset-password";
/// Application root.
pub const ROOT_PATH: &str = "/";

/// Parsed application route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Root,
    /// `/chat/:userId`
    Chat(String),
    /// `/admin`
    Admin,
    /// `/guest/:id`
    GuestDetail(String),
    /// `/reset-password`
    ResetPassword,
    /// Anything else.
    Other,
}

impl Route {
    /// Parse a client path. Query strings and a trailing slash are ignored.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::Route;
    ///
    /// assert_eq!(Route::parse("/chat/abc"), Route::Chat("abc".into()));
    /// assert_eq!(Route::parse("/admin/"), Route::Admin);
    /// assert_eq!(Route::parse("/chat/"), Route::Other);
    /// ```
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Self::Root,
            ["admin"] => Self::Admin,
            ["reset-password"] => Self::ResetPassword,
            ["chat", id] => Self::Chat((*id).to_owned()),
            ["guest", id] => Self::GuestDetail((*id).to_owned()),
            _ => Self::Other,
        }
    }
}

/// View the client should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum View {
    /// Login / registration form.
    Login,
    /// Password reset form.
    ResetPassword,
    /// Staff triage queue.
    AdminQueue,
    /// One guest's ticket detail.
    TicketDetail {
        /// Guest whose ticket is shown.
        #[serde(rename = "guestId")]
        guest_id: String,
    },
    /// One guest's chat thread.
    Chat {
        /// Guest who owns the thread.
        #[serde(rename = "guestId")]
        guest_id: String,
    },
}

/// Outcome of the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Render the view in place.
    Render {
        /// View to render.
        view: View,
    },
    /// Navigate elsewhere.
    Redirect {
        /// Target path.
        location: String,
    },
}

impl AccessDecision {
    fn render(view: View) -> Self {
        Self::Render { view }
    }

    fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }

    /// Whether the decision renders a view.
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

/// Signed-in identity together with its derived role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Authenticated account.
    pub identity: Identity,
    /// Role derived from the staff allow-list.
    pub role: Role,
}

impl Viewer {
    /// Pair an identity with its role.
    pub fn new(identity: Identity, role: Role) -> Self {
        Self { identity, role }
    }

    /// Whether this viewer may open the thread owned by `guest_id`.
    pub fn may_access_chat(&self, guest_id: &str) -> bool {
        may_access_chat(&self.identity, self.role, guest_id)
    }

    /// Borrowed form accepted by [`decide`].
    pub fn as_pair(&self) -> (&Identity, Role) {
        (&self.identity, self.role)
    }
}

/// Where an identity lands after signing in or visiting `/`.
pub fn landing_path(identity: &Identity, role: Role) -> String {
    match role {
        Role::Staff => ADMIN_PATH.to_owned(),
        Role::Guest => own_chat_path(identity.id()),
    }
}

fn own_chat_path(id: &UserId) -> String {
    format!("/chat/{id}")
}

/// Whether `viewer` may read or write the chat thread owned by `guest_id`.
pub fn may_access_chat(viewer: &Identity, role: Role, guest_id: &str) -> bool {
    role.is_staff() || viewer.id().as_str() == guest_id
}

/// Evaluate the guard for `route`.
///
/// Paths outside the known route table redirect to `/` so the root rule
/// picks the landing view.
///
/// # Examples
/// ```
/// use helpdesk::domain::{decide, AccessDecision, Route, View};
///
/// let decision = decide(None, &Route::parse("/admin"));
/// assert_eq!(decision, AccessDecision::Render { view: View::Login });
/// ```
pub fn decide(viewer: Option<(&Identity, Role)>, route: &Route) -> AccessDecision {
    let Some((identity, role)) = viewer else {
        return match route {
            Route::ResetPassword => AccessDecision::render(View::ResetPassword),
            _ => AccessDecision::render(View::Login),
        };
    };

    match (route, role) {
        (Route::ResetPassword, _) => AccessDecision::render(View::ResetPassword),
        (Route::Root, _) => AccessDecision::redirect(landing_path(identity, role)),
        (Route::Chat(guest_id), _) if may_access_chat(identity, role, guest_id) => {
            AccessDecision::render(View::Chat {
                guest_id: guest_id.clone(),
            })
        }
        (Route::Chat(_), Role::Guest) => AccessDecision::redirect(ROOT_PATH),
        (Route::Admin, Role::Staff) => AccessDecision::render(View::AdminQueue),
        (Route::GuestDetail(guest_id), Role::Staff) => AccessDecision::render(View::TicketDetail {
            guest_id: guest_id.clone(),
        }),
        (Route::Admin | Route::GuestDetail(_), Role::Guest) => {
            AccessDecision::redirect(own_chat_path(identity.id()))
        }
        (Route::Chat(_) | Route::Other, _) => AccessDecision::redirect(ROOT_PATH),
    }
}

#[cfg(test)]
mod tests {
    //! Guard state machine coverage.
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::{fixture, rstest};

    fn identity(id: &str, email: &str) -> Identity {
        Identity::new(
            UserId::new(id).expect("valid id"),
            EmailAddress::new(email).expect("valid email"),
        )
    }

    #[fixture]
    fn guest() -> Identity {
        identity("taro", "taro@example.com")
    }

    #[fixture]
    fn staff() -> Identity {
        identity("staff1", "staff1@example.com")
    }

    fn render(view: View) -> AccessDecision {
        AccessDecision::Render { view }
    }

    fn redirect(location: &str) -> AccessDecision {
        AccessDecision::Redirect {
            location: location.to_owned(),
        }
    }

    #[rstest]
    #[case("/", Route::Root)]
    #[case("", Route::Root)]
    #[case("/admin", Route::Admin)]
    #[case("/admin/", Route::Admin)]
    #[case("/reset-password?oobCode=x", Route::ResetPassword)]
    #[case("/chat/taro", Route::Chat("taro".into()))]
    #[case("/guest/taro#top", Route::GuestDetail("taro".into()))]
    #[case("/chat", Route::Other)]
    #[case("/chat/a/b", Route::Other)]
    #[case("/settings", Route::Other)]
    fn parses_routes(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[rstest]
    #[case("/reset-password", render(View::ResetPassword))]
    #[case("/", render(View::Login))]
    #[case("/admin", render(View::Login))]
    #[case("/chat/taro", render(View::Login))]
    #[case("/guest/taro", render(View::Login))]
    #[case("/elsewhere", render(View::Login))]
    fn anonymous_viewers_see_login_except_reset(
        #[case] path: &str,
        #[case] expected: AccessDecision,
    ) {
        assert_eq!(decide(None, &Route::parse(path)), expected);
    }

    #[rstest]
    #[case("/", redirect("/chat/taro"))]
    #[case("/chat/taro", render(View::Chat { guest_id: "taro".into() }))]
    #[case("/chat/hanako", redirect("/"))]
    #[case("/admin", redirect("/chat/taro"))]
    #[case("/guest/taro", redirect("/chat/taro"))]
    #[case("/reset-password", render(View::ResetPassword))]
    #[case("/unknown", redirect("/"))]
    fn guests_are_confined_to_their_own_thread(
        guest: Identity,
        #[case] path: &str,
        #[case] expected: AccessDecision,
    ) {
        assert_eq!(decide(Some((&guest, Role::Guest)), &Route::parse(path)), expected);
    }

    #[rstest]
    #[case("/", redirect("/admin"))]
    #[case("/chat/taro", render(View::Chat { guest_id: "taro".into() }))]
    #[case("/chat/anyone", render(View::Chat { guest_id: "anyone".into() }))]
    #[case("/admin", render(View::AdminQueue))]
    #[case("/guest/taro", render(View::TicketDetail { guest_id: "taro".into() }))]
    #[case("/reset-password", render(View::ResetPassword))]
    #[case("/unknown", redirect("/"))]
    fn staff_may_open_any_view(
        staff: Identity,
        #[case] path: &str,
        #[case] expected: AccessDecision,
    ) {
        assert_eq!(decide(Some((&staff, Role::Staff)), &Route::parse(path)), expected);
    }

    #[rstest]
    fn landing_paths_follow_role(guest: Identity, staff: Identity) {
        assert_eq!(landing_path(&guest, Role::Guest), "/chat/taro");
        assert_eq!(landing_path(&staff, Role::Staff), "/admin");
    }

    #[rstest]
    fn decisions_serialise_with_tags() {
        let value = serde_json::to_value(render(View::Chat {
            guest_id: "taro".into(),
        }))
        .expect("serialise decision");
        assert_eq!(
            value,
            serde_json::json!({
                "decision": "render",
                "view": { "name": "chat", "guestId": "taro" }
            })
        );
        let value = serde_json::to_value(redirect("/")).expect("serialise decision");
        assert_eq!(
            value,
            serde_json::json!({ "decision": "redirect", "location": "/" })
        );
    }
}
