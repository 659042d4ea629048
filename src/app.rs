use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        .route("/auth/logout", post(handlers::logout))
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route("/goals/category/:category_id", get(handlers::goals_by_category))
        .route(
            "/goals/:goal_id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/checkins", post(handlers::create_checkin))
        .route("/checkins/today", get(handlers::today_checkins))
        .route("/checkins/date/:date", get(handlers::checkins_by_date))
        .route("/checkins/goal/:goal_id", get(handlers::checkins_by_goal))
        .route("/checkins/:checkin_id", delete(handlers::delete_checkin))
        .route(
            "/progress/by-frequency",
            get(handlers::progress_by_frequency),
        )
        .route("/progress/goal/:goal_id", get(handlers::goal_progress))
        .route("/progress/calendar", get(handlers::current_year_calendar))
        .route("/progress/calendar/:year", get(handlers::year_calendar))
        .route("/progress/day/:date", get(handlers::day_details))
        .with_state(state)
}
