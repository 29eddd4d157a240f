//! Session and notice cookies, flash redirects, and the guard extractors.

use super::error::WebError;
use super::notice::Notice;
use super::types::SharedState;
use crate::auth::{self, Access, Denial, Guard};
use crate::models::User;
use crate::store::sessions;
use axum::extract::{FromRef, FromRequestParts, Request};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::marker::PhantomData;

pub const SESSION_COOKIE: &str = "stemfolio_session";
pub const FLASH_COOKIE: &str = "stemfolio_flash";

fn site_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn session_cookie(token: &str) -> Cookie<'static> {
    site_cookie(SESSION_COOKIE, token.to_string())
}

pub fn flash_cookie(notice: Notice) -> Cookie<'static> {
    site_cookie(FLASH_COOKIE, notice.code().to_string())
}

/// Removal counterpart for a cookie named `name`; only takes effect on a jar
/// that was read from the request.
pub fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// `/login?next=<target>` with the target percent-encoded.
pub fn login_url(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("/login?{query}"),
        Err(_) => "/login".to_string(),
    }
}

/// Redirect applying `jar`'s cookie changes plus an optional one-shot notice.
pub fn redirect_with(to: &str, notice: Option<Notice>, jar: CookieJar) -> Response {
    let jar = match notice {
        Some(n) => jar.add(flash_cookie(n)),
        None => jar,
    };
    (jar, Redirect::to(to)).into_response()
}

pub fn flash_redirect(to: &str, notice: Notice) -> Response {
    redirect_with(to, Some(notice), CookieJar::new())
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| Cookie::parse(v).ok())
        .any(|c| c.name() == name)
}

/// Clears a pending notice once a response goes out that does not queue a
/// new one, so each notice is shown at most once.
pub async fn expire_shown_notice(jar: CookieJar, request: Request, next: Next) -> Response {
    let pending = cookie_value(&jar, FLASH_COOKIE).is_some();
    let response = next.run(request).await;
    if !pending || sets_cookie(&response, FLASH_COOKIE) {
        return response;
    }
    (jar.remove(removal(FLASH_COOKIE)), response).into_response()
}

/// Whoever is looking at the page, plus the pending notice if one was queued.
pub struct Viewer {
    pub user: Option<User>,
    pub flash: Option<Notice>,
    pub session_token: Option<String>,
}

impl<S> FromRequestParts<S> for Viewer
where
    SharedState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = SharedState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookie_value(&jar, SESSION_COOKIE);
        let flash = cookie_value(&jar, FLASH_COOKIE).and_then(|code| Notice::from_code(&code));
        let user = match &token {
            Some(t) => app.with_db(|conn| sessions::session_user(conn, t))?,
            None => None,
        };
        Ok(Viewer {
            user,
            flash,
            session_token: token,
        })
    }
}

pub trait GuardKind: Send + Sync + 'static {
    const GUARD: Guard;
}

pub struct LoginGuard;
pub struct TeacherGuard;
pub struct AdminGuard;

impl GuardKind for LoginGuard {
    const GUARD: Guard = Guard::Login;
}
impl GuardKind for TeacherGuard {
    const GUARD: Guard = Guard::Teacher;
}
impl GuardKind for AdminGuard {
    const GUARD: Guard = Guard::Admin;
}

/// Extracts an authenticated user who passes guard `G`, or rejects with a redirect.
pub struct Require<G> {
    pub user: User,
    pub flash: Option<Notice>,
    pub session_token: Option<String>,
    _guard: PhantomData<G>,
}

pub type LoginRequired = Require<LoginGuard>;
pub type TeacherRequired = Require<TeacherGuard>;
pub type AdminRequired = Require<AdminGuard>;

impl<S, G> FromRequestParts<S> for Require<G>
where
    SharedState: FromRef<S>,
    S: Send + Sync,
    G: GuardKind,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let viewer = Viewer::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match auth::check(viewer.user.as_ref(), G::GUARD) {
            Access::Allow => match viewer.user {
                Some(user) => Ok(Require {
                    user,
                    flash: viewer.flash,
                    session_token: viewer.session_token,
                    _guard: PhantomData,
                }),
                None => Err(WebError::from(anyhow::anyhow!("guard allowed anonymous viewer"))
                    .into_response()),
            },
            Access::Deny(denial) => {
                tracing::warn!(path = parts.uri.path(), ?denial, "access denied");
                let target = match denial {
                    Denial::NotAuthenticated => {
                        let wanted = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
                        login_url(wanted)
                    }
                    Denial::TeacherRequired | Denial::AdminRequired => "/".to_string(),
                };
                Err(flash_redirect(&target, Notice::from(denial)))
            }
        }
    }
}
