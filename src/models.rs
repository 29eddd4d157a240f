use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Student,
    Parent,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four academic periods lessons, projects and expos are bucketed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn as_str(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    /// Showcase theme for the quarter.
    pub fn theme(self) -> &'static str {
        match self {
            Quarter::Q1 => "3D Design & Treehouses",
            Quarter::Q2 => "Game Development",
            Quarter::Q3 => "Unreal Engine",
            Quarter::Q4 => "Robotics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
    NeedsHelp,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "not_started",
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
            ProgressStatus::NeedsHelp => "needs_help",
        }
    }
}

impl FromStr for ProgressStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(ProgressStatus::NotStarted),
            "in_progress" => Ok(ProgressStatus::InProgress),
            "completed" => Ok(ProgressStatus::Completed),
            "needs_help" => Ok(ProgressStatus::NeedsHelp),
            other => Err(anyhow::anyhow!("unknown progress status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: Option<String>,
    pub grade_level: Option<String>,
    pub parent_email: Option<String>,
    pub tinkercad_username: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: Option<String>,
    pub grade_level: Option<String>,
    pub parent_email: Option<String>,
    pub tinkercad_username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StemClass {
    pub id: i64,
    pub class_name: String,
    pub teacher_first_name: String,
    pub grade_level: String,
    pub tinkercad_class_link: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewClass {
    pub class_name: String,
    pub teacher_first_name: String,
    pub grade_level: String,
    pub tinkercad_class_link: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonPlan {
    pub id: i64,
    pub title: String,
    pub class_id: i64,
    pub subject_area: Option<String>,
    pub quarter: Option<String>,
    pub duration_minutes: Option<i64>,
    pub learning_objectives: Option<String>,
    pub materials_needed: Option<String>,
    pub lesson_content: Option<String>,
    pub assessment_method: Option<String>,
    pub standards_alignment: Option<String>,
    pub difficulty_level: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewLesson {
    pub title: String,
    pub class_id: i64,
    pub subject_area: String,
    pub quarter: String,
    pub duration_minutes: i64,
    pub learning_objectives: String,
    pub materials_needed: String,
    pub lesson_content: String,
    pub assessment_method: String,
    pub standards_alignment: String,
    pub difficulty_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProgress {
    pub id: i64,
    pub student_id: i64,
    pub lesson_id: i64,
    pub class_id: i64,
    pub status: String,
    pub completion_percentage: i64,
    pub time_spent_minutes: i64,
    pub skill_demonstration: Option<String>,
    pub notes: Option<String>,
    pub teacher_feedback: Option<String>,
    pub shared_publicly: bool,
    pub showcase_ready: bool,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub last_updated: String,
}

/// Partial update for a progress row. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressPatch {
    pub status: Option<String>,
    pub completion_percentage: Option<i64>,
    pub skill_demonstration: Option<String>,
    pub notes: Option<String>,
    pub teacher_feedback: Option<String>,
    pub shared_publicly: Option<bool>,
    pub showcase_ready: Option<bool>,
}

impl ProgressPatch {
    /// Merge present fields into `row`. Stamps `started_at` / `completed_at`
    /// the first time the requested status reaches them; never overwrites a stamp.
    pub fn apply(&self, row: &mut StudentProgress, now: &str) {
        if let Some(v) = &self.status {
            row.status = v.clone();
        }
        if let Some(v) = self.completion_percentage {
            row.completion_percentage = v;
        }
        if let Some(v) = &self.skill_demonstration {
            row.skill_demonstration = Some(v.clone());
        }
        if let Some(v) = &self.notes {
            row.notes = Some(v.clone());
        }
        if let Some(v) = &self.teacher_feedback {
            row.teacher_feedback = Some(v.clone());
        }
        if let Some(v) = self.shared_publicly {
            row.shared_publicly = v;
        }
        if let Some(v) = self.showcase_ready {
            row.showcase_ready = v;
        }

        match self.status.as_deref() {
            Some("completed") if row.completed_at.is_none() => {
                row.completed_at = Some(now.to_string());
            }
            Some("in_progress") if row.started_at.is_none() => {
                row.started_at = Some(now.to_string());
            }
            _ => {}
        }
        row.last_updated = now.to_string();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub project_type: Option<String>,
    pub quarter: Option<String>,
    pub tinkercad_link: Option<String>,
    pub scratch_link: Option<String>,
    pub project_url: Option<String>,
    pub grade_level: Option<String>,
    pub subject_areas: Option<String>,
    pub skills_used: Option<String>,
    pub learning_goals_met: Option<String>,
    pub is_public: bool,
    pub is_featured: bool,
    pub expo_ready: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub creator_id: i64,
    pub project_type: String,
    pub quarter: String,
    pub tinkercad_link: String,
    pub scratch_link: String,
    pub project_url: String,
    pub grade_level: String,
    pub subject_areas: String,
    pub skills_used: String,
    pub learning_goals_met: String,
    pub is_public: bool,
    pub is_featured: bool,
    pub expo_ready: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Expo {
    pub id: i64,
    pub title: String,
    pub quarter: String,
    pub date: String,
    pub description: Option<String>,
    pub focus_area: Option<String>,
    pub location: Option<String>,
    pub attendee_count: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewExpo {
    pub title: String,
    pub quarter: String,
    pub date: String,
    pub description: String,
    pub focus_area: String,
    pub location: String,
    pub attendee_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherReflection {
    pub id: i64,
    pub date: String,
    pub lesson_id: Option<i64>,
    pub class_id: Option<i64>,
    pub reflection_content: String,
    pub what_worked_well: Option<String>,
    pub challenges_faced: Option<String>,
    pub modifications_needed: Option<String>,
    pub student_engagement_level: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewReflection {
    pub date: String,
    pub lesson_id: Option<i64>,
    pub class_id: Option<i64>,
    pub reflection_content: String,
    pub what_worked_well: String,
    pub challenges_faced: String,
    pub modifications_needed: String,
    pub student_engagement_level: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub room_name: String,
    pub capacity: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentCodename {
    pub id: i64,
    pub room_id: i64,
    pub greek_code: String,
    pub display_name: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioItem {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub content_url: Option<String>,
    pub quarter: Option<String>,
    pub is_public: bool,
    pub is_featured: bool,
    pub likes_count: i64,
    pub views_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewPortfolioItem {
    pub student_id: i64,
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub content_url: String,
    pub quarter: String,
    pub is_public: bool,
    pub is_featured: bool,
}
