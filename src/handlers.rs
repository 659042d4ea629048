use crate::auth::{self, AuthUser};
use crate::errors::AppError;
use crate::models::{
    AuthResponse, Category, CategoryRequest, CheckIn, CreateCheckInRequest, CreateGoalRequest,
    DayDetails, Frequency, Goal, GoalProgress, LoginRequest, SignupRequest, UpdateGoalRequest,
    UserView, YearCalendar,
};
use crate::progress;
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::info;

/// Every fresh account starts with the same category set.
const DEFAULT_CATEGORIES: [&str; 6] = [
    "Fitness",
    "Personal Growth",
    "Financial",
    "Relationships",
    "Community",
    "Self-Care",
];

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = payload.username.trim();
    if username.len() < 3 {
        return Err(AppError::bad_request(
            "username must be at least 3 characters",
        ));
    }
    if payload.password.len() < 6 {
        return Err(AppError::bad_request(
            "password must be at least 6 characters",
        ));
    }

    let mut data = state.data.lock().await;
    if data.user_by_username(username).is_some() {
        return Err(AppError::bad_request("username already taken"));
    }

    let user = data.insert_user(username.to_string(), auth::hash_password(&payload.password));
    for title in DEFAULT_CATEGORIES {
        data.insert_category(user.id, title.to_string());
    }
    persist_data(&state.data_path, &data).await?;
    drop(data);

    let token = auth::issue_token();
    state.sessions.lock().await.insert(token.clone(), user.id);
    info!("registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserView::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let data = state.data.lock().await;
    let user = data
        .user_by_username(payload.username.trim())
        .filter(|user| auth::verify_password(&payload.password, &user.password_hash))
        .ok_or_else(|| AppError::unauthorized("invalid username or password"))?
        .clone();
    drop(data);

    let token = auth::issue_token();
    state.sessions.lock().await.insert(token.clone(), user.id);

    Ok(Json(AuthResponse {
        user: UserView::from(&user),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserView>, AppError> {
    let data = state.data.lock().await;
    let user = data
        .user_by_id(user.user_id)
        .ok_or_else(|| AppError::not_found("user not found"))?;
    Ok(Json(UserView::from(user)))
}

pub async fn logout(State(state): State<AppState>, user: AuthUser) -> Json<serde_json::Value> {
    state.sessions.lock().await.remove(&user.token);
    Json(serde_json::json!({ "message": "logged out" }))
}

pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Vec<Category>> {
    let data = state.data.lock().await;
    Json(data.categories_for(user.user_id))
}

pub async fn get_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<u64>,
) -> Result<Json<Category>, AppError> {
    let data = state.data.lock().await;
    let category = data
        .category(user.user_id, category_id)
        .ok_or_else(|| AppError::not_found("category not found"))?;
    Ok(Json(category.clone()))
}

pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let title = non_empty_title(&payload.title)?;
    let mut data = state.data.lock().await;
    let category = data.insert_category(user.user_id, title);
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<u64>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let title = non_empty_title(&payload.title)?;
    let mut data = state.data.lock().await;
    let category = data
        .update_category(user.user_id, category_id, title)
        .ok_or_else(|| AppError::not_found("category not found"))?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if !data.remove_category(user.user_id, category_id) {
        return Err(AppError::not_found("category not found"));
    }
    persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ListGoalsQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_goals(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListGoalsQuery>,
) -> Json<Vec<Goal>> {
    let data = state.data.lock().await;
    Json(data.goals_for(user.user_id, query.include_inactive))
}

pub async fn goals_by_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<u64>,
) -> Json<Vec<Goal>> {
    let data = state.data.lock().await;
    Json(data.goals_by_category(user.user_id, category_id))
}

pub async fn get_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<u64>,
) -> Result<Json<Goal>, AppError> {
    let data = state.data.lock().await;
    let goal = data
        .goal(user.user_id, goal_id)
        .ok_or_else(|| AppError::not_found("goal not found"))?;
    Ok(Json(goal.clone()))
}

pub async fn create_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let title = non_empty_title(&payload.title)?;
    if payload.target_value == 0 {
        return Err(AppError::bad_request("target_value must be at least 1"));
    }

    let mut data = state.data.lock().await;
    if data.category(user.user_id, payload.category_id).is_none() {
        return Err(AppError::bad_request("category does not exist"));
    }

    let goal = data.insert_goal(
        user.user_id,
        title,
        payload.category_id,
        payload.frequency,
        payload.target_value,
    );
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<u64>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    if let Some(title) = &payload.title {
        non_empty_title(title)?;
    }
    if payload.target_value == Some(0) {
        return Err(AppError::bad_request("target_value must be at least 1"));
    }

    let mut data = state.data.lock().await;
    if let Some(category_id) = payload.category_id {
        if data.category(user.user_id, category_id).is_none() {
            return Err(AppError::bad_request("category does not exist"));
        }
    }

    let goal = data
        .update_goal(user.user_id, goal_id, &payload)
        .ok_or_else(|| AppError::not_found("goal not found"))?;
    persist_data(&state.data_path, &data).await?;
    Ok(Json(goal))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if !data.deactivate_goal(user.user_id, goal_id) {
        return Err(AppError::not_found("goal not found"));
    }
    persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn today_checkins(State(state): State<AppState>, user: AuthUser) -> Json<Vec<CheckIn>> {
    let data = state.data.lock().await;
    Json(data.checkins_on(user.user_id, today()))
}

pub async fn checkins_by_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path(date): Path<NaiveDate>,
) -> Json<Vec<CheckIn>> {
    let data = state.data.lock().await;
    Json(data.checkins_on(user.user_id, date))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn checkins_by_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<u64>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<CheckIn>>, AppError> {
    let data = state.data.lock().await;
    if data.goal(user.user_id, goal_id).is_none() {
        return Err(AppError::not_found("goal not found"));
    }
    Ok(Json(data.checkins_for_goal(
        user.user_id,
        goal_id,
        range.start_date,
        range.end_date,
    )))
}

/// Always inserts a new row; logging twice on the same day for the same
/// goal yields two events.
pub async fn create_checkin(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCheckInRequest>,
) -> Result<(StatusCode, Json<CheckIn>), AppError> {
    let mut data = state.data.lock().await;
    if data.goal(user.user_id, payload.goal_id).is_none() {
        return Err(AppError::bad_request("goal does not exist"));
    }

    let checkin = data.insert_checkin(
        user.user_id,
        payload.goal_id,
        payload.date,
        payload.value,
        payload.note,
    );
    persist_data(&state.data_path, &data).await?;
    Ok((StatusCode::CREATED, Json(checkin)))
}

pub async fn delete_checkin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(checkin_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if !data.remove_checkin(user.user_id, checkin_id) {
        return Err(AppError::not_found("check-in not found"));
    }
    persist_data(&state.data_path, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub frequency: Option<Frequency>,
}

pub async fn progress_by_frequency(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProgressQuery>,
) -> Json<BTreeMap<Frequency, Vec<GoalProgress>>> {
    let data = state.data.lock().await;
    Json(progress::progress_by_frequency(
        &data,
        user.user_id,
        query.frequency,
        today(),
    ))
}

pub async fn goal_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(goal_id): Path<u64>,
) -> Result<Json<GoalProgress>, AppError> {
    let data = state.data.lock().await;
    let progress = progress::goal_progress(&data, user.user_id, goal_id, today())
        .ok_or_else(|| AppError::not_found("goal not found"))?;
    Ok(Json(progress))
}

pub async fn current_year_calendar(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<YearCalendar> {
    let data = state.data.lock().await;
    Json(progress::year_calendar(&data, user.user_id, None, today()))
}

pub async fn year_calendar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(year): Path<i32>,
) -> Json<YearCalendar> {
    let data = state.data.lock().await;
    Json(progress::year_calendar(
        &data,
        user.user_id,
        Some(year),
        today(),
    ))
}

pub async fn day_details(
    State(state): State<AppState>,
    user: AuthUser,
    Path(date): Path<NaiveDate>,
) -> Json<DayDetails> {
    let data = state.data.lock().await;
    Json(progress::day_details(&data, user.user_id, date))
}

fn non_empty_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    Ok(title.to_string())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
