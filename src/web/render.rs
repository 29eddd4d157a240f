//! Minimal server-side HTML. Every interpolated value goes through [`escape`].

use crate::models::User;
use super::notice::Notice;
use axum::response::Html;
use std::fmt::Write;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn opt(s: &Option<String>) -> String {
    escape(s.as_deref().unwrap_or(""))
}

pub fn page(title: &str, user: Option<&User>, flash: Option<&Notice>, body: &str) -> Html<String> {
    let mut nav = String::from(
        r#"<a href="/">Home</a> <a href="/showcase">Showcase</a> <a href="/portfolio">Portfolio</a> <a href="/curriculum">Curriculum</a> <a href="/about">About</a>"#,
    );
    match user {
        Some(u) => {
            let dash = crate::auth::dashboard_for(u.role);
            let _ = write!(
                nav,
                r#" <a href="{dash}">Dashboard</a> <span class="who">{}</span> <a href="/logout">Log out</a>"#,
                escape(&u.first_name)
            );
        }
        None => nav.push_str(r#" <a href="/login">Log in</a>"#),
    }

    let notice = flash
        .map(|n| {
            format!(
                r#"<div class="flash flash-{}">{}</div>"#,
                n.level().as_str(),
                escape(n.message())
            )
        })
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title} | STEM Portfolio</title></head>\n<body><nav>{nav}</nav>\n{notice}\n<main><h1>{title}</h1>\n{body}\n</main></body></html>\n",
        title = escape(title),
    ))
}

/// Only absolute http(s) URLs may become links.
pub fn is_web_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

/// `<ul>` of already-rendered `<li>` bodies, or a placeholder when empty.
pub fn list(items: impl IntoIterator<Item = String>, empty: &str) -> String {
    let items: Vec<String> = items.into_iter().collect();
    if items.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, escape(empty));
    }
    let mut out = String::from("<ul>");
    for item in items {
        let _ = write!(out, "<li>{item}</li>");
    }
    out.push_str("</ul>");
    out
}
