//! Public room / codename / item browsing, the like counter, and the admin
//! forms that populate them.

use crate::models::{NewExpo, NewPortfolioItem, PortfolioItem, Quarter};
use crate::store::{expos, portfolio};
use crate::web::error::WebError;
use crate::web::form::FormFields;
use crate::web::handlers::progress::parse_date;
use crate::web::notice::Notice;
use crate::web::render::{self, escape, opt};
use crate::web::session::{self, AdminRequired, TeacherRequired, Viewer};
use crate::web::types::SharedState;
use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::{Form, Json};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct LikeRecorded {
    pub success: bool,
    pub likes_count: i64,
    pub message: &'static str,
}

fn item_card(item: &PortfolioItem) -> String {
    format!(
        r#"<a href="/portfolio/item/{id}" class="item">{}</a> <em>{}</em> {} <span class="likes">{} likes</span>"#,
        escape(&item.title),
        escape(&item.content_type),
        opt(&item.quarter),
        item.likes_count,
        id = item.id,
    )
}

pub async fn portfolio_index(
    State(app): State<SharedState>,
    viewer: Viewer,
) -> Result<Html<String>, WebError> {
    let rooms = app.with_db(portfolio::active_rooms)?;
    let body = render::list(
        rooms.iter().map(|(room, students)| {
            format!(
                r#"<a href="/portfolio/room/{num}">Room {num}: {}</a> <span class="count">{students} students</span>"#,
                escape(&room.room_name),
                num = escape(&room.room_number),
            )
        }),
        "No rooms are showcasing work yet.",
    );
    Ok(render::page(
        "Student Portfolios",
        viewer.user.as_ref(),
        viewer.flash.as_ref(),
        &body,
    ))
}

pub async fn room_page(
    State(app): State<SharedState>,
    viewer: Viewer,
    Path(room_number): Path<String>,
) -> Result<Html<String>, WebError> {
    let (room, codenames) = app
        .with_db(|conn| {
            let Some(room) = portfolio::active_room_by_number(conn, &room_number)? else {
                return Ok(None);
            };
            let codenames = portfolio::codenames_in_room(conn, room.id, true)?;
            Ok(Some((room, codenames)))
        })?
        .ok_or(WebError::NotFound)?;

    let body = render::list(
        codenames.iter().map(|c| {
            format!(
                r#"<a href="/portfolio/student/{}">{}</a> <span class="code">{}</span>"#,
                c.id,
                escape(&c.display_name),
                escape(&c.greek_code)
            )
        }),
        "No public portfolios in this room yet.",
    );
    Ok(render::page(
        &format!("Room {}: {}", room.room_number, room.room_name),
        viewer.user.as_ref(),
        viewer.flash.as_ref(),
        &body,
    ))
}

pub async fn student_page(
    State(app): State<SharedState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> Result<Html<String>, WebError> {
    let (codename, items) = app
        .with_db(|conn| {
            let Some(codename) = portfolio::public_codename(conn, id)? else {
                return Ok(None);
            };
            let items = portfolio::public_items_for(conn, codename.id)?;
            Ok(Some((codename, items)))
        })?
        .ok_or(WebError::NotFound)?;

    let body = render::list(items.iter().map(item_card), "No shared work yet.");
    Ok(render::page(
        &format!("{} ({})", codename.display_name, codename.greek_code),
        viewer.user.as_ref(),
        viewer.flash.as_ref(),
        &body,
    ))
}

pub async fn item_page(
    State(app): State<SharedState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> Result<Html<String>, WebError> {
    let item = app
        .with_db(|conn| {
            if portfolio::record_view(conn, id)?.is_none() {
                return Ok(None);
            }
            portfolio::visible_item(conn, id)
        })?
        .ok_or(WebError::NotFound)?;

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<p class="description">{}</p><p><span class="type">{}</span> {}</p>"#,
        opt(&item.description),
        escape(&item.content_type),
        opt(&item.quarter)
    );
    if let Some(url) = item.content_url.as_deref().filter(|u| !u.is_empty()) {
        if render::is_web_url(url) {
            let _ = write!(body, r#"<p><a href="{0}">{0}</a></p>"#, escape(url.trim()));
        } else {
            let _ = write!(body, r#"<p class="content-url">{}</p>"#, escape(url));
        }
    }
    let _ = write!(
        body,
        r#"<p><span class="views">{} views</span> <span class="likes">{} likes</span></p>
<p><a href="/portfolio/student/{}">Back to portfolio</a></p>"#,
        item.views_count, item.likes_count, item.student_id
    );
    Ok(render::page(
        &item.title,
        viewer.user.as_ref(),
        viewer.flash.as_ref(),
        &body,
    ))
}

pub async fn like_item(
    State(app): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<LikeRecorded>, WebError> {
    let likes_count = app
        .with_db(|conn| portfolio::record_like(conn, id))?
        .ok_or(WebError::NotFound)?;
    tracing::debug!(item_id = id, likes_count, "portfolio item liked");
    Ok(Json(LikeRecorded {
        success: true,
        likes_count,
        message: "Thanks for the like!",
    }))
}

pub async fn manage_rooms(
    State(app): State<SharedState>,
    current: AdminRequired,
) -> Result<Html<String>, WebError> {
    let (rooms, all_expos) = app.with_db(|conn| {
        let mut rooms = Vec::new();
        for room in portfolio::list_rooms(conn)? {
            let codenames = portfolio::codenames_in_room(conn, room.id, false)?;
            rooms.push((room, codenames));
        }
        Ok((rooms, expos::list_expos(conn)?))
    })?;

    let mut body = String::from(r#"<section id="rooms"><h2>Rooms</h2>"#);
    body.push_str(&render::list(
        rooms.iter().map(|(room, codenames)| {
            let names = codenames
                .iter()
                .map(|c| {
                    let hidden = if c.is_public { "" } else { " (hidden)" };
                    format!(
                        "{} [{}, id {}]{hidden}",
                        escape(&c.display_name),
                        escape(&c.greek_code),
                        c.id
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                r#"<span class="room" data-id="{}">Room {}: {}</span>{} {}"#,
                room.id,
                escape(&room.room_number),
                escape(&room.room_name),
                if room.is_active { "" } else { " (inactive)" },
                names
            )
        }),
        "No rooms yet.",
    ));
    body.push_str("</section>");

    let _ = write!(
        body,
        r#"<section id="expos"><h2>Expos</h2>{}</section>"#,
        render::list(
            all_expos.iter().map(|e| format!(
                "{} ({}) on {}",
                escape(&e.title),
                escape(&e.quarter),
                escape(&e.date)
            )),
            "No expos scheduled."
        )
    );

    body.push_str(
        r#"<form method="post" action="/create-room">
<label>Room number <input name="room_number" required></label>
<label>Room name <input name="room_name" required></label>
<label>Capacity <input name="capacity" type="number"></label>
<label><input type="checkbox" name="is_active" value="on" checked> Active</label>
<button type="submit">Add room</button>
</form>
<form method="post" action="/create-codename">
<label>Room id <input name="room_id" type="number" required></label>
<label>Greek code <input name="greek_code" required></label>
<label>Display name <input name="display_name" required></label>
<label><input type="checkbox" name="is_public" value="on" checked> Public</label>
<button type="submit">Add codename</button>
</form>
<form method="post" action="/create-expo">
<label>Title <input name="title" required></label>
<label>Quarter <input name="quarter" value="Q1"></label>
<label>Date <input name="date" type="date" required></label>
<label>Focus area <input name="focus_area"></label>
<label>Location <input name="location"></label>
<label>Expected attendees <input name="attendee_count" type="number"></label>
<label>Description <textarea name="description"></textarea></label>
<button type="submit">Schedule expo</button>
</form>"#,
    );

    Ok(render::page(
        "Manage Rooms",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    ))
}

pub async fn create_room(
    State(app): State<SharedState>,
    current: AdminRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let room_number = fields.required("room_number")?;
    let room_name = fields.required("room_name")?;
    let capacity = fields.optional_i64("capacity")?;
    let is_active = fields.flag("is_active");

    let id = app.with_db(|conn| {
        let taken = portfolio::list_rooms(conn)?
            .iter()
            .any(|r| r.room_number == room_number);
        if taken {
            return Ok(None);
        }
        portfolio::create_room(conn, &room_number, &room_name, capacity, is_active).map(Some)
    })?;
    let Some(id) = id else {
        return Ok(session::flash_redirect("/manage-rooms", Notice::RoomNumberTaken));
    };
    tracing::info!(room_id = id, %room_number, user_id = current.user.id, "room created");
    Ok(session::flash_redirect("/manage-rooms", Notice::RoomCreated))
}

pub async fn create_codename(
    State(app): State<SharedState>,
    current: AdminRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let room_id = fields.required_i64("room_id")?;
    let greek_code = fields.required("greek_code")?;
    let display_name = fields.required("display_name")?;
    let is_public = fields.flag("is_public");

    let id = app.with_db(|conn| {
        if portfolio::get_room(conn, room_id)?.is_none() {
            return Ok(None);
        }
        portfolio::create_codename(conn, room_id, &greek_code, &display_name, is_public).map(Some)
    })?;
    let id = id.ok_or_else(|| WebError::bad_request(format!("room {room_id} does not exist")))?;
    tracing::info!(codename_id = id, room_id, user_id = current.user.id, "codename created");
    Ok(session::flash_redirect("/manage-rooms", Notice::CodenameCreated))
}

pub async fn create_expo(
    State(app): State<SharedState>,
    current: AdminRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let new = NewExpo {
        title: fields.required("title")?,
        quarter: fields.optional_or("quarter", Quarter::Q1.as_str()),
        date: parse_date(&fields, "date")?,
        description: fields.optional("description"),
        focus_area: fields.optional("focus_area"),
        location: fields.optional("location"),
        attendee_count: fields.optional_i64("attendee_count")?,
    };
    let id = app.with_db(|conn| expos::create_expo(conn, &new))?;
    tracing::info!(expo_id = id, date = %new.date, user_id = current.user.id, "expo scheduled");
    Ok(session::flash_redirect("/manage-rooms", Notice::ExpoCreated))
}

pub async fn create_portfolio_item(
    State(app): State<SharedState>,
    current: TeacherRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let new = NewPortfolioItem {
        student_id: fields.required_i64("student_id")?,
        title: fields.required("title")?,
        description: fields.optional("description"),
        content_type: fields.required("content_type")?,
        content_url: fields.optional("content_url"),
        quarter: fields.optional_or("quarter", Quarter::Q1.as_str()),
        is_public: fields.flag("is_public"),
        is_featured: fields.flag("is_featured"),
    };
    let id = app.with_db(|conn| {
        if portfolio::get_codename(conn, new.student_id)?.is_none() {
            return Ok(None);
        }
        portfolio::create_item(conn, &new).map(Some)
    })?;
    let id = id.ok_or_else(|| {
        WebError::bad_request(format!("codename {} does not exist", new.student_id))
    })?;
    tracing::info!(item_id = id, codename_id = new.student_id, user_id = current.user.id, "portfolio item created");
    Ok(session::flash_redirect(
        &format!("/portfolio/student/{}", new.student_id),
        Notice::PortfolioItemAdded,
    ))
}
