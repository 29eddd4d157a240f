//! Role checks and password hashing.

use crate::models::{Role, User};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

const HASH_SCHEME: &str = "sha256";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any authenticated user.
    Login,
    /// Teacher or admin.
    Teacher,
    /// Admin only.
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(Denial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAuthenticated,
    TeacherRequired,
    AdminRequired,
}

impl Denial {
    pub fn notice(self) -> &'static str {
        match self {
            Denial::NotAuthenticated => "Please log in to access this page.",
            Denial::TeacherRequired => "Teacher access required.",
            Denial::AdminRequired => "Admin access required.",
        }
    }
}

pub fn check(user: Option<&User>, guard: Guard) -> Access {
    let Some(user) = user else {
        return Access::Deny(match guard {
            Guard::Login => Denial::NotAuthenticated,
            Guard::Teacher => Denial::TeacherRequired,
            Guard::Admin => Denial::AdminRequired,
        });
    };
    match guard {
        Guard::Login => Access::Allow,
        Guard::Teacher if is_staff(user.role) => Access::Allow,
        Guard::Teacher => Access::Deny(Denial::TeacherRequired),
        Guard::Admin if user.role == Role::Admin => Access::Allow,
        Guard::Admin => Access::Deny(Denial::AdminRequired),
    }
}

pub fn is_staff(role: Role) -> bool {
    matches!(role, Role::Teacher | Role::Admin)
}

/// Where a freshly logged-in user lands when no `next` target was given.
pub fn dashboard_for(role: Role) -> &'static str {
    if is_staff(role) {
        "/teacher-dashboard"
    } else {
        "/student-dashboard"
    }
}

/// Only same-site absolute paths are honoured as post-login targets.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        Some(next)
    } else {
        None
    }
}

pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{HASH_SCHEME}${salt}${}", digest(&salt, password))
}

pub fn verify_password(stored: &str, password: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(scheme), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let actual = digest(salt, password);
    actual.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".into(),
            email: "u@example.com".into(),
            password_hash: String::new(),
            role,
            first_name: "U".into(),
            last_name: None,
            grade_level: None,
            parent_email: None,
            tinkercad_username: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn teacher_guard_admits_teachers_and_admins_only() {
        assert_eq!(check(Some(&user(Role::Teacher)), Guard::Teacher), Access::Allow);
        assert_eq!(check(Some(&user(Role::Admin)), Guard::Teacher), Access::Allow);
        assert_eq!(
            check(Some(&user(Role::Student)), Guard::Teacher),
            Access::Deny(Denial::TeacherRequired)
        );
        assert_eq!(
            check(Some(&user(Role::Parent)), Guard::Teacher),
            Access::Deny(Denial::TeacherRequired)
        );
        assert_eq!(check(None, Guard::Teacher), Access::Deny(Denial::TeacherRequired));
    }

    #[test]
    fn admin_guard_rejects_teachers() {
        assert_eq!(check(Some(&user(Role::Admin)), Guard::Admin), Access::Allow);
        assert_eq!(
            check(Some(&user(Role::Teacher)), Guard::Admin),
            Access::Deny(Denial::AdminRequired)
        );
        assert_eq!(check(None, Guard::Admin), Access::Deny(Denial::AdminRequired));
    }

    #[test]
    fn login_guard_only_needs_a_user() {
        assert_eq!(check(Some(&user(Role::Parent)), Guard::Login), Access::Allow);
        assert_eq!(check(None, Guard::Login), Access::Deny(Denial::NotAuthenticated));
    }

    #[test]
    fn password_hash_roundtrip_and_salting() {
        let a = hash_password("password123");
        let b = hash_password("password123");
        assert_ne!(a, b);
        assert!(verify_password(&a, "password123"));
        assert!(!verify_password(&a, "password124"));
        assert!(!verify_password("plaintext", "plaintext"));
        assert!(!verify_password("md5$salt$abc", "abc"));
    }

    #[test]
    fn next_targets_must_stay_on_site() {
        assert_eq!(safe_next(Some("/manage-classes")), Some("/manage-classes"));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(None), None);
        assert_eq!(dashboard_for(Role::Admin), "/teacher-dashboard");
        assert_eq!(dashboard_for(Role::Parent), "/student-dashboard");
    }
}
