use crate::auth;
use crate::store::sessions;
use crate::store::users;
use crate::web::error::WebError;
use crate::web::form::FormFields;
use crate::web::notice::Notice;
use crate::web::render::{self, escape};
use crate::web::session::{self, LoginRequired, Viewer, SESSION_COOKIE};
use crate::web::types::SharedState;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

fn login_form(viewer: &Viewer, next: Option<&str>, flash: Option<&Notice>) -> Html<String> {
    let action = match next {
        Some(n) => escape(&session::login_url(n)),
        None => "/login".to_string(),
    };
    let body = format!(
        r#"<form method="post" action="{action}">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>"#
    );
    render::page("Log in", viewer.user.as_ref(), flash, &body)
}

pub async fn login_page(viewer: Viewer, Query(q): Query<NextQuery>) -> Html<String> {
    login_form(&viewer, q.next.as_deref(), viewer.flash.as_ref())
}

pub async fn login_submit(
    State(app): State<SharedState>,
    viewer: Viewer,
    Query(q): Query<NextQuery>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let username = fields.required("username")?;
    let password = fields.required("password")?;

    let found = app.with_db(|conn| users::authenticate(conn, &username, &password))?;
    let Some(user) = found else {
        tracing::warn!(%username, "failed login");
        let notice = Notice::InvalidCredentials;
        return Ok(login_form(&viewer, q.next.as_deref(), Some(&notice)).into_response());
    };

    let token = app.with_db(|conn| sessions::create_session(conn, user.id))?;
    tracing::info!(user_id = user.id, role = %user.role, "logged in");

    let target = auth::safe_next(q.next.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| auth::dashboard_for(user.role).to_string());
    let jar = CookieJar::new().add(session::session_cookie(&token));
    Ok(session::redirect_with(&target, None, jar))
}

pub async fn logout(
    State(app): State<SharedState>,
    current: LoginRequired,
    jar: CookieJar,
) -> Result<Response, WebError> {
    if let Some(token) = &current.session_token {
        app.with_db(|conn| sessions::delete_session(conn, token))?;
    }
    tracing::info!(user_id = current.user.id, "logged out");
    let jar = jar.remove(session::removal(SESSION_COOKIE));
    Ok(session::redirect_with("/", Some(Notice::LoggedOut), jar))
}
