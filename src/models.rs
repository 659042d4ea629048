use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recurrence class of a goal. Closed set: the period resolver matches
/// exhaustively, so an unknown frequency is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl Frequency {
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Custom,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Outward-facing user record. The credential hash never leaves the store
/// type, so responses cannot leak it.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: u64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub category_id: u64,
    pub frequency: Frequency,
    pub target_value: u64,
    pub is_active: bool,
}

/// A single logged event. Append-only: several check-ins per goal per day
/// stay separate rows, ordered within a day by `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: u64,
    pub user_id: u64,
    pub goal_id: u64,
    pub date: NaiveDate,
    pub value: u64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything the server persists, one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub goals: Vec<Goal>,
    pub checkins: Vec<CheckIn>,
    pub next_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    pub category_id: u64,
    pub frequency: Frequency,
    #[serde(default = "default_target_value")]
    pub target_value: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub category_id: Option<u64>,
    pub frequency: Option<Frequency>,
    pub target_value: Option<u64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCheckInRequest {
    pub goal_id: u64,
    pub date: NaiveDate,
    #[serde(default = "default_checkin_value")]
    pub value: u64,
    pub note: Option<String>,
}

fn default_target_value() -> u64 {
    1
}

fn default_checkin_value() -> u64 {
    1
}

/// Progress of one goal inside its current period window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: u64,
    pub title: String,
    pub category_id: u64,
    pub frequency: Frequency,
    pub current_value: u64,
    pub target_value: u64,
    pub percentage: f64,
    pub period_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCalendar {
    pub year: i32,
    pub calendar: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInDetail {
    pub id: u64,
    pub goal_id: u64,
    pub date: NaiveDate,
    pub value: u64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub goal_title: String,
    pub goal_frequency: Option<Frequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayDetails {
    pub date: NaiveDate,
    pub total_checkins: usize,
    pub checkins: Vec<CheckInDetail>,
}
