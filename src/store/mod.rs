pub mod classes;
pub mod dashboard;
pub mod expos;
pub mod portfolio;
pub mod progress;
pub mod projects;
pub mod sessions;
pub mod users;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{NewClass, NewLesson, NewProject, NewUser, Role};
    use crate::store::{classes, users};
    use rusqlite::Connection;

    pub fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@barnum.edu"),
            password: "password123".to_string(),
            role,
            first_name: username.to_string(),
            last_name: None,
            grade_level: Some("3rd Grade".to_string()),
            parent_email: None,
            tinkercad_username: None,
        }
    }

    pub fn sample_class() -> NewClass {
        NewClass {
            class_name: "3rd Grade Digital Designers".into(),
            teacher_first_name: "Ms. Johnson".into(),
            grade_level: "3rd Grade".into(),
            ..Default::default()
        }
    }

    pub fn sample_lesson(class_id: i64) -> NewLesson {
        NewLesson {
            title: "Treehouse Foundations".into(),
            class_id,
            subject_area: "Engineering".into(),
            quarter: "Q1".into(),
            duration_minutes: 45,
            difficulty_level: "Beginner".into(),
            ..Default::default()
        }
    }

    pub fn sample_project(creator_id: i64, is_public: bool, is_featured: bool) -> NewProject {
        NewProject {
            title: "Dream Treehouse Design".into(),
            creator_id,
            project_type: "Tinkercad".into(),
            quarter: "Q1".into(),
            is_public,
            is_featured,
            ..Default::default()
        }
    }

    /// (student_id, lesson_id, class_id)
    pub fn seed_student_lesson(conn: &Connection) -> (i64, i64, i64) {
        let student = users::create_user(conn, &new_user("emma_k", Role::Student)).unwrap();
        let class = classes::create_class(conn, &sample_class()).unwrap();
        let lesson = classes::create_lesson(conn, &sample_lesson(class)).unwrap();
        (student, lesson, class)
    }
}
