//! Rooms, student codenames and their portfolio items.
//!
//! Public pages only ever see active rooms, public codenames, and public items
//! whose codename is public too.

use crate::db::now_rfc3339;
use crate::models::{NewPortfolioItem, PortfolioItem, Room, StudentCodename};
use rusqlite::{Connection, OptionalExtension, Row};

const ROOM_COLUMNS: &str = "id, room_number, room_name, capacity, is_active";
const CODENAME_COLUMNS: &str = "id, room_id, greek_code, display_name, is_public";
const ITEM_COLUMNS: &str = "i.id, i.student_id, i.title, i.description, i.content_type,
     i.content_url, i.quarter, i.is_public, i.is_featured, i.likes_count, i.views_count,
     i.created_at";

// Visible item: item public and owning codename public.
const VISIBLE_ITEM: &str = "i.is_public = 1
     AND EXISTS (SELECT 1 FROM student_codenames s WHERE s.id = i.student_id AND s.is_public = 1)";

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        room_number: row.get(1)?,
        room_name: row.get(2)?,
        capacity: row.get(3)?,
        is_active: row.get(4)?,
    })
}

fn codename_from_row(row: &Row<'_>) -> rusqlite::Result<StudentCodename> {
    Ok(StudentCodename {
        id: row.get(0)?,
        room_id: row.get(1)?,
        greek_code: row.get(2)?,
        display_name: row.get(3)?,
        is_public: row.get(4)?,
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<PortfolioItem> {
    Ok(PortfolioItem {
        id: row.get(0)?,
        student_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        content_type: row.get(4)?,
        content_url: row.get(5)?,
        quarter: row.get(6)?,
        is_public: row.get(7)?,
        is_featured: row.get(8)?,
        likes_count: row.get(9)?,
        views_count: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Fails when `room_number` is already taken.
pub fn create_room(
    conn: &Connection,
    room_number: &str,
    room_name: &str,
    capacity: Option<i64>,
    is_active: bool,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO rooms(room_number, room_name, capacity, is_active) VALUES(?, ?, ?, ?)",
        (room_number, room_name, capacity, is_active),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_rooms(conn: &Connection) -> anyhow::Result<Vec<Room>> {
    let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY room_number");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], room_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Active rooms with their public codename counts.
pub fn active_rooms(conn: &Connection) -> anyhow::Result<Vec<(Room, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.room_number, r.room_name, r.capacity, r.is_active,
           (SELECT COUNT(*) FROM student_codenames s
             WHERE s.room_id = r.id AND s.is_public = 1) AS public_students
         FROM rooms r
         WHERE r.is_active = 1
         ORDER BY r.room_number",
    )?;
    let rows = stmt
        .query_map([], |row| Ok((room_from_row(row)?, row.get::<_, i64>(5)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn active_room_by_number(conn: &Connection, room_number: &str) -> anyhow::Result<Option<Room>> {
    let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE room_number = ? AND is_active = 1");
    Ok(conn
        .query_row(&sql, [room_number], room_from_row)
        .optional()?)
}

pub fn get_room(conn: &Connection, id: i64) -> anyhow::Result<Option<Room>> {
    let sql = format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?");
    Ok(conn.query_row(&sql, [id], room_from_row).optional()?)
}

/// Codenames and their items cascade.
pub fn delete_room(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let n = conn.execute("DELETE FROM rooms WHERE id = ?", [id])?;
    Ok(n > 0)
}

pub fn create_codename(
    conn: &Connection,
    room_id: i64,
    greek_code: &str,
    display_name: &str,
    is_public: bool,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO student_codenames(room_id, greek_code, display_name, is_public)
         VALUES(?, ?, ?, ?)",
        (room_id, greek_code, display_name, is_public),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn codenames_in_room(
    conn: &Connection,
    room_id: i64,
    public_only: bool,
) -> anyhow::Result<Vec<StudentCodename>> {
    let filter = if public_only { "AND is_public = 1" } else { "" };
    let sql = format!(
        "SELECT {CODENAME_COLUMNS} FROM student_codenames
         WHERE room_id = ? {filter} ORDER BY greek_code, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([room_id], codename_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_codename(conn: &Connection, id: i64) -> anyhow::Result<Option<StudentCodename>> {
    let sql = format!("SELECT {CODENAME_COLUMNS} FROM student_codenames WHERE id = ?");
    Ok(conn.query_row(&sql, [id], codename_from_row).optional()?)
}

pub fn public_codename(conn: &Connection, id: i64) -> anyhow::Result<Option<StudentCodename>> {
    Ok(get_codename(conn, id)?.filter(|c| c.is_public))
}

pub fn create_item(conn: &Connection, new: &NewPortfolioItem) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO portfolio_items(
            student_id, title, description, content_type, content_url, quarter,
            is_public, is_featured, created_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            new.student_id,
            &new.title,
            &new.description,
            &new.content_type,
            &new.content_url,
            &new.quarter,
            new.is_public,
            new.is_featured,
            now_rfc3339(),
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn public_items_for(conn: &Connection, student_id: i64) -> anyhow::Result<Vec<PortfolioItem>> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM portfolio_items i
         WHERE i.student_id = ? AND i.is_public = 1
         ORDER BY i.is_featured DESC, i.created_at DESC, i.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([student_id], item_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn visible_item(conn: &Connection, id: i64) -> anyhow::Result<Option<PortfolioItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM portfolio_items i WHERE i.id = ? AND {VISIBLE_ITEM}");
    Ok(conn.query_row(&sql, [id], item_from_row).optional()?)
}

/// Atomic `+1`; every call counts. `None` when the item is missing or hidden.
pub fn record_like(conn: &Connection, id: i64) -> anyhow::Result<Option<i64>> {
    let sql = format!(
        "UPDATE portfolio_items AS i SET likes_count = likes_count + 1
         WHERE i.id = ? AND {VISIBLE_ITEM}
         RETURNING likes_count"
    );
    Ok(conn.query_row(&sql, [id], |r| r.get(0)).optional()?)
}

/// Atomic `+1` on every detail view. `None` when the item is missing or hidden.
pub fn record_view(conn: &Connection, id: i64) -> anyhow::Result<Option<i64>> {
    let sql = format!(
        "UPDATE portfolio_items AS i SET views_count = views_count + 1
         WHERE i.id = ? AND {VISIBLE_ITEM}
         RETURNING views_count"
    );
    Ok(conn.query_row(&sql, [id], |r| r.get(0)).optional()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn item(student_id: i64, public: bool) -> NewPortfolioItem {
        NewPortfolioItem {
            student_id,
            title: "Treehouse".into(),
            content_type: "tinkercad".into(),
            is_public: public,
            ..Default::default()
        }
    }

    #[test]
    fn inactive_rooms_are_hidden_from_public_listing() {
        let conn = db::open_in_memory().unwrap();
        let open = create_room(&conn, "101", "Design Lab", Some(24), true).unwrap();
        create_room(&conn, "102", "Storage", None, false).unwrap();
        create_codename(&conn, open, "Alpha-1", "Alpha One", true).unwrap();
        create_codename(&conn, open, "Beta-2", "Beta Two", false).unwrap();

        let rooms = active_rooms(&conn).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].0.room_number, "101");
        assert_eq!(rooms[0].1, 1);
        assert!(active_room_by_number(&conn, "102").unwrap().is_none());
        assert_eq!(list_rooms(&conn).unwrap().len(), 2);
    }

    #[test]
    fn room_numbers_are_unique_but_greek_codes_are_not() {
        let conn = db::open_in_memory().unwrap();
        let room = create_room(&conn, "101", "Design Lab", None, true).unwrap();
        assert!(create_room(&conn, "101", "Again", None, true).is_err());
        create_codename(&conn, room, "Alpha-1", "First", true).unwrap();
        create_codename(&conn, room, "Alpha-1", "Second", true).unwrap();
        assert_eq!(codenames_in_room(&conn, room, true).unwrap().len(), 2);
    }

    #[test]
    fn likes_count_every_call() {
        let conn = db::open_in_memory().unwrap();
        let room = create_room(&conn, "101", "Design Lab", None, true).unwrap();
        let sid = create_codename(&conn, room, "Alpha-1", "Alpha One", true).unwrap();
        let iid = create_item(&conn, &item(sid, true)).unwrap();

        for n in 1..=5 {
            assert_eq!(record_like(&conn, iid).unwrap(), Some(n));
        }
        assert_eq!(visible_item(&conn, iid).unwrap().unwrap().likes_count, 5);
        assert_eq!(record_view(&conn, iid).unwrap(), Some(1));
        assert_eq!(record_like(&conn, iid + 100).unwrap(), None);
    }

    #[test]
    fn hidden_items_cannot_be_liked_or_viewed() {
        let conn = db::open_in_memory().unwrap();
        let room = create_room(&conn, "101", "Design Lab", None, true).unwrap();
        let shy = create_codename(&conn, room, "Gamma-3", "Gamma", false).unwrap();
        let open = create_codename(&conn, room, "Delta-4", "Delta", true).unwrap();
        let under_private_codename = create_item(&conn, &item(shy, true)).unwrap();
        let private_item = create_item(&conn, &item(open, false)).unwrap();

        for id in [under_private_codename, private_item] {
            assert!(visible_item(&conn, id).unwrap().is_none());
            assert_eq!(record_like(&conn, id).unwrap(), None);
            assert_eq!(record_view(&conn, id).unwrap(), None);
        }
        assert!(public_items_for(&conn, open).unwrap().is_empty());
        assert!(public_codename(&conn, shy).unwrap().is_none());
    }

    #[test]
    fn deleting_room_cascades_codenames_and_items() {
        let conn = db::open_in_memory().unwrap();
        let room = create_room(&conn, "101", "Design Lab", None, true).unwrap();
        let sid = create_codename(&conn, room, "Alpha-1", "Alpha One", true).unwrap();
        let iid = create_item(&conn, &item(sid, true)).unwrap();

        assert!(delete_room(&conn, room).unwrap());
        assert!(get_room(&conn, room).unwrap().is_none());
        assert!(get_codename(&conn, sid).unwrap().is_none());
        let left: i64 = conn
            .query_row("SELECT COUNT(*) FROM portfolio_items WHERE id = ?", [iid], |r| r.get(0))
            .unwrap();
        assert_eq!(left, 0);
    }
}
