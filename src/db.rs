use rusqlite::Connection;
use std::path::Path;

pub fn open_db(db_path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'student',
            first_name TEXT NOT NULL,
            last_name TEXT,
            grade_level TEXT,
            parent_email TEXT,
            tinkercad_username TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sessions(
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sessions_created ON sessions(created_at)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS stem_classes(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_name TEXT NOT NULL,
            teacher_first_name TEXT NOT NULL,
            grade_level TEXT NOT NULL,
            tinkercad_class_link TEXT,
            description TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS lesson_plans(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            class_id INTEGER NOT NULL,
            subject_area TEXT,
            quarter TEXT,
            duration_minutes INTEGER,
            learning_objectives TEXT,
            materials_needed TEXT,
            lesson_content TEXT,
            assessment_method TEXT,
            standards_alignment TEXT,
            difficulty_level TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(class_id) REFERENCES stem_classes(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_lesson_plans_class ON lesson_plans(class_id)",
        [],
    )?;

    // (student_id, lesson_id) is not UNIQUE; the upsert picks the lowest id.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS student_progress(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL,
            lesson_id INTEGER NOT NULL,
            class_id INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'not_started',
            completion_percentage INTEGER NOT NULL DEFAULT 0,
            time_spent_minutes INTEGER NOT NULL DEFAULT 0,
            skill_demonstration TEXT,
            notes TEXT,
            teacher_feedback TEXT,
            shared_publicly INTEGER NOT NULL DEFAULT 0,
            showcase_ready INTEGER NOT NULL DEFAULT 0,
            started_at TEXT,
            completed_at TEXT,
            last_updated TEXT NOT NULL,
            FOREIGN KEY(student_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(lesson_id) REFERENCES lesson_plans(id),
            FOREIGN KEY(class_id) REFERENCES stem_classes(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_student_progress_student_lesson
         ON student_progress(student_id, lesson_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_student_progress_class ON student_progress(class_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS projects(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            creator_id INTEGER NOT NULL,
            project_type TEXT,
            quarter TEXT,
            tinkercad_link TEXT,
            scratch_link TEXT,
            project_url TEXT,
            grade_level TEXT,
            subject_areas TEXT,
            skills_used TEXT,
            learning_goals_met TEXT,
            is_public INTEGER NOT NULL DEFAULT 0,
            is_featured INTEGER NOT NULL DEFAULT 0,
            expo_ready INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(creator_id) REFERENCES users(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_projects_creator ON projects(creator_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_projects_quarter ON projects(quarter)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS expos(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            quarter TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT,
            focus_area TEXT,
            location TEXT,
            attendee_count INTEGER,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS teacher_reflections(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            lesson_id INTEGER,
            class_id INTEGER,
            reflection_content TEXT NOT NULL,
            what_worked_well TEXT,
            challenges_faced TEXT,
            modifications_needed TEXT,
            student_engagement_level INTEGER,
            created_at TEXT NOT NULL,
            FOREIGN KEY(lesson_id) REFERENCES lesson_plans(id),
            FOREIGN KEY(class_id) REFERENCES stem_classes(id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS rooms(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            room_number TEXT NOT NULL UNIQUE,
            room_name TEXT NOT NULL,
            capacity INTEGER,
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS student_codenames(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            room_id INTEGER NOT NULL,
            greek_code TEXT NOT NULL,
            display_name TEXT NOT NULL,
            is_public INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY(room_id) REFERENCES rooms(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_student_codenames_room ON student_codenames(room_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS portfolio_items(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            content_type TEXT NOT NULL,
            content_url TEXT,
            quarter TEXT,
            is_public INTEGER NOT NULL DEFAULT 1,
            is_featured INTEGER NOT NULL DEFAULT 0,
            likes_count INTEGER NOT NULL DEFAULT 0,
            views_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY(student_id) REFERENCES student_codenames(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_portfolio_items_student ON portfolio_items(student_id)",
        [],
    )?;

    Ok(())
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
