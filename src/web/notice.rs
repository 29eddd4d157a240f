//! One-shot notices shown on the next rendered page.
//!
//! The flash cookie carries only a notice code, so nothing is stored server
//! side and a tampered cookie can at most select another fixed message.

use crate::auth::Denial;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
            NoticeLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoginRequired,
    TeacherRequired,
    AdminRequired,
    InvalidCredentials,
    LoggedOut,
    ClassCreated,
    LessonCreated,
    ProjectCreated,
    ReflectionSaved,
    RoomCreated,
    RoomNumberTaken,
    CodenameCreated,
    ExpoCreated,
    PortfolioItemAdded,
}

impl Notice {
    pub const ALL: [Notice; 14] = [
        Notice::LoginRequired,
        Notice::TeacherRequired,
        Notice::AdminRequired,
        Notice::InvalidCredentials,
        Notice::LoggedOut,
        Notice::ClassCreated,
        Notice::LessonCreated,
        Notice::ProjectCreated,
        Notice::ReflectionSaved,
        Notice::RoomCreated,
        Notice::RoomNumberTaken,
        Notice::CodenameCreated,
        Notice::ExpoCreated,
        Notice::PortfolioItemAdded,
    ];

    /// Cookie value.
    pub fn code(self) -> &'static str {
        match self {
            Notice::LoginRequired => "login-required",
            Notice::TeacherRequired => "teacher-required",
            Notice::AdminRequired => "admin-required",
            Notice::InvalidCredentials => "invalid-credentials",
            Notice::LoggedOut => "logged-out",
            Notice::ClassCreated => "class-created",
            Notice::LessonCreated => "lesson-created",
            Notice::ProjectCreated => "project-created",
            Notice::ReflectionSaved => "reflection-saved",
            Notice::RoomCreated => "room-created",
            Notice::RoomNumberTaken => "room-number-taken",
            Notice::CodenameCreated => "codename-created",
            Notice::ExpoCreated => "expo-created",
            Notice::PortfolioItemAdded => "portfolio-item-added",
        }
    }

    pub fn from_code(code: &str) -> Option<Notice> {
        Notice::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn level(self) -> NoticeLevel {
        match self {
            Notice::LoginRequired => NoticeLevel::Info,
            Notice::TeacherRequired
            | Notice::AdminRequired
            | Notice::InvalidCredentials
            | Notice::RoomNumberTaken => NoticeLevel::Error,
            _ => NoticeLevel::Success,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::LoginRequired => Denial::NotAuthenticated.notice(),
            Notice::TeacherRequired => Denial::TeacherRequired.notice(),
            Notice::AdminRequired => Denial::AdminRequired.notice(),
            Notice::InvalidCredentials => "Invalid credentials",
            Notice::LoggedOut => "Logged out successfully",
            Notice::ClassCreated => "Class created successfully!",
            Notice::LessonCreated => "Lesson plan created successfully!",
            Notice::ProjectCreated => "Project created successfully!",
            Notice::ReflectionSaved => "Reflection saved successfully!",
            Notice::RoomCreated => "Room created successfully!",
            Notice::RoomNumberTaken => "Room number already exists",
            Notice::CodenameCreated => "Student codename created successfully!",
            Notice::ExpoCreated => "Expo created successfully!",
            Notice::PortfolioItemAdded => "Portfolio item added successfully!",
        }
    }
}

impl From<Denial> for Notice {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::NotAuthenticated => Notice::LoginRequired,
            Denial::TeacherRequired => Notice::TeacherRequired,
            Denial::AdminRequired => Notice::AdminRequired,
        }
    }
}
