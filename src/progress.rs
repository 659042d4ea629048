//! Read-only progress projections. Every function is pure given the store
//! contents and a reference date, so handlers pass in "today" and tests pin
//! it to fixed dates.

use crate::models::{
    AppData, CheckInDetail, DayDetails, Frequency, Goal, GoalProgress, YearCalendar,
};
use crate::period::{self, PeriodWindow};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Progress for the user's active goals, grouped by frequency. The window
/// is resolved once per frequency; every goal of that frequency is summed
/// against the same span. Frequencies without active goals are absent.
pub fn progress_by_frequency(
    data: &AppData,
    user_id: u64,
    frequency: Option<Frequency>,
    today: NaiveDate,
) -> BTreeMap<Frequency, Vec<GoalProgress>> {
    let frequencies: Vec<Frequency> = match frequency {
        Some(requested) => vec![requested],
        None => Frequency::ALL.to_vec(),
    };

    let mut result = BTreeMap::new();
    for frequency in frequencies {
        let goals = data.goals_by_frequency(user_id, frequency);
        if goals.is_empty() {
            continue;
        }

        let window = period::resolve(frequency, today);
        let progress = goals
            .iter()
            .map(|goal| progress_in_window(data, goal, window))
            .collect();
        result.insert(frequency, progress);
    }
    result
}

/// Progress for one goal, resolved through its own frequency. `None` when
/// the goal does not exist under this user or was soft-deleted; the caller
/// turns that into a not-found response. Distinct from a goal that exists
/// with zero progress.
pub fn goal_progress(
    data: &AppData,
    user_id: u64,
    goal_id: u64,
    today: NaiveDate,
) -> Option<GoalProgress> {
    let goal = data.active_goal(user_id, goal_id)?;
    let window = period::resolve(goal.frequency, today);
    Some(progress_in_window(data, goal, window))
}

/// Check-in row counts per date for one year. Sparse: only dates with at
/// least one check-in appear.
pub fn year_calendar(
    data: &AppData,
    user_id: u64,
    year: Option<i32>,
    today: NaiveDate,
) -> YearCalendar {
    let year = year.unwrap_or_else(|| today.year());
    YearCalendar {
        year,
        calendar: data.count_by_date_for_year(user_id, year),
    }
}

/// Everything the user logged on one date, enriched with goal titles for
/// display. A check-in whose goal no longer resolves (soft-deleted or
/// dangling) renders with placeholder values instead of failing the view.
pub fn day_details(data: &AppData, user_id: u64, date: NaiveDate) -> DayDetails {
    let checkins: Vec<CheckInDetail> = data
        .checkins_on(user_id, date)
        .into_iter()
        .map(|checkin| {
            let goal = data.active_goal(user_id, checkin.goal_id);
            CheckInDetail {
                id: checkin.id,
                goal_id: checkin.goal_id,
                date: checkin.date,
                value: checkin.value,
                note: checkin.note,
                created_at: checkin.created_at,
                goal_title: goal
                    .map(|goal| goal.title.clone())
                    .unwrap_or_else(|| "Unknown Goal".to_string()),
                goal_frequency: goal.map(|goal| goal.frequency),
            }
        })
        .collect();

    DayDetails {
        date,
        total_checkins: checkins.len(),
        checkins,
    }
}

fn progress_in_window(data: &AppData, goal: &Goal, window: PeriodWindow) -> GoalProgress {
    let current = data.sum_value_in_window(goal.user_id, goal.id, window.start, window.end);
    GoalProgress {
        goal_id: goal.id,
        title: goal.title.clone(),
        category_id: goal.category_id,
        frequency: goal.frequency,
        current_value: current,
        target_value: goal.target_value,
        percentage: percentage(current, goal.target_value),
        period_label: window.label,
    }
}

/// Reported percentage is clamped to 100; the raw current value is not.
/// A degenerate target reads as 0% rather than dividing by zero.
fn percentage(current: u64, target: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (current as f64 / target as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn seed_user(data: &mut AppData, username: &str) -> (u64, Category) {
        let user = data.insert_user(username.to_string(), "hash".to_string());
        let category = data.insert_category(user.id, "Fitness".to_string());
        (user.id, category)
    }

    #[test]
    fn daily_goal_overachievement_clamps_percentage_not_current_value() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Pushups".into(), category.id, Frequency::Daily, 3);
        let today = date(2025, 6, 11);
        for _ in 0..4 {
            data.insert_checkin(user_id, goal.id, today, 1, None);
        }

        let progress = goal_progress(&data, user_id, goal.id, today).unwrap();
        assert_eq!(progress.current_value, 4);
        assert_eq!(progress.percentage, 100.0);
        assert_eq!(progress.period_label, "today");
    }

    #[test]
    fn weekly_goal_only_counts_checkins_inside_the_current_week() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Gym".into(), category.id, Frequency::Weekly, 3);
        // Today is Wednesday 2025-06-11; the window is 06-09..06-15.
        let today = date(2025, 6, 11);
        data.insert_checkin(user_id, goal.id, date(2025, 6, 2), 5, None);
        data.insert_checkin(user_id, goal.id, today, 1, None);

        let progress = goal_progress(&data, user_id, goal.id, today).unwrap();
        assert_eq!(progress.current_value, 1);
        assert_eq!(progress.period_label, "this week");
    }

    #[test]
    fn goal_with_no_checkins_reports_zero_not_absent() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Read".into(), category.id, Frequency::Monthly, 10);

        let progress = goal_progress(&data, user_id, goal.id, date(2025, 6, 11)).unwrap();
        assert_eq!(progress.current_value, 0);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn degenerate_target_yields_zero_percentage() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        // Validation upstream rejects target 0; the engine still must not
        // divide by it.
        let goal = data.insert_goal(user_id, "Odd".into(), category.id, Frequency::Daily, 0);
        let today = date(2025, 6, 11);
        data.insert_checkin(user_id, goal.id, today, 5, None);

        let progress = goal_progress(&data, user_id, goal.id, today).unwrap();
        assert_eq!(progress.current_value, 5);
        assert_eq!(progress.percentage, 0.0);
    }

    #[test]
    fn inactive_and_foreign_goals_read_as_not_found() {
        let mut data = AppData::default();
        let (ann, category) = seed_user(&mut data, "ann");
        let (bob, _) = seed_user(&mut data, "bob");
        let goal = data.insert_goal(ann, "Run".into(), category.id, Frequency::Daily, 1);
        let today = date(2025, 6, 11);

        assert!(goal_progress(&data, bob, goal.id, today).is_none());
        assert!(goal_progress(&data, ann, 9999, today).is_none());

        data.deactivate_goal(ann, goal.id);
        assert!(goal_progress(&data, ann, goal.id, today).is_none());
    }

    #[test]
    fn grouping_skips_frequencies_without_active_goals() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        data.insert_goal(user_id, "Run".into(), category.id, Frequency::Daily, 1);
        let retired = data.insert_goal(user_id, "Swim".into(), category.id, Frequency::Weekly, 2);
        data.deactivate_goal(user_id, retired.id);

        let grouped = progress_by_frequency(&data, user_id, None, date(2025, 6, 11));
        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key(&Frequency::Daily));
        assert!(!grouped.contains_key(&Frequency::Weekly));
    }

    #[test]
    fn grouping_resolves_one_window_per_frequency() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let first = data.insert_goal(user_id, "Run".into(), category.id, Frequency::Weekly, 3);
        let second = data.insert_goal(user_id, "Row".into(), category.id, Frequency::Weekly, 2);
        let today = date(2025, 6, 11);
        data.insert_checkin(user_id, first.id, date(2025, 6, 9), 1, None);
        data.insert_checkin(user_id, second.id, date(2025, 6, 15), 2, None);

        let grouped = progress_by_frequency(&data, user_id, Some(Frequency::Weekly), today);
        let weekly = &grouped[&Frequency::Weekly];
        assert_eq!(weekly.len(), 2);
        for progress in weekly {
            assert_eq!(progress.period_label, "this week");
        }
        let row = weekly.iter().find(|p| p.goal_id == second.id).unwrap();
        assert_eq!(row.current_value, 2);
        assert_eq!(row.percentage, 100.0);
    }

    #[test]
    fn repeated_reads_return_identical_results() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Run".into(), category.id, Frequency::Daily, 2);
        let today = date(2025, 6, 11);
        data.insert_checkin(user_id, goal.id, today, 1, None);

        let first = progress_by_frequency(&data, user_id, None, today);
        let second = progress_by_frequency(&data, user_id, None, today);
        assert_eq!(first, second);
        assert_eq!(
            goal_progress(&data, user_id, goal.id, today),
            goal_progress(&data, user_id, goal.id, today)
        );
    }

    #[test]
    fn year_calendar_counts_rows_sparsely() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Run".into(), category.id, Frequency::Daily, 1);
        // Three rows on one date with differing values: the calendar counts
        // rows, it does not sum values.
        data.insert_checkin(user_id, goal.id, date(2025, 1, 15), 1, None);
        data.insert_checkin(user_id, goal.id, date(2025, 1, 15), 4, None);
        data.insert_checkin(user_id, goal.id, date(2025, 1, 15), 2, None);
        data.insert_checkin(user_id, goal.id, date(2025, 3, 1), 1, None);
        data.insert_checkin(user_id, goal.id, date(2024, 12, 31), 1, None);

        let view = year_calendar(&data, user_id, Some(2025), date(2026, 8, 7));
        assert_eq!(view.year, 2025);
        assert_eq!(view.calendar.len(), 2);
        assert_eq!(view.calendar["2025-01-15"], 3);
        assert_eq!(view.calendar["2025-03-01"], 1);
    }

    #[test]
    fn year_calendar_defaults_to_the_current_year() {
        let mut data = AppData::default();
        let (user_id, _) = seed_user(&mut data, "ann");
        let view = year_calendar(&data, user_id, None, date(2026, 8, 7));
        assert_eq!(view.year, 2026);
        assert!(view.calendar.is_empty());
    }

    #[test]
    fn day_details_enriches_checkins_with_goal_info() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Run".into(), category.id, Frequency::Weekly, 3);
        let day = date(2025, 6, 11);
        data.insert_checkin(user_id, goal.id, day, 1, Some("morning".into()));

        let details = day_details(&data, user_id, day);
        assert_eq!(details.date, day);
        assert_eq!(details.total_checkins, 1);
        assert_eq!(details.checkins[0].goal_title, "Run");
        assert_eq!(details.checkins[0].goal_frequency, Some(Frequency::Weekly));
        assert_eq!(details.checkins[0].note.as_deref(), Some("morning"));
    }

    #[test]
    fn day_details_substitutes_placeholder_for_soft_deleted_goal() {
        let mut data = AppData::default();
        let (user_id, category) = seed_user(&mut data, "ann");
        let goal = data.insert_goal(user_id, "Run".into(), category.id, Frequency::Daily, 1);
        let day = date(2025, 6, 11);
        data.insert_checkin(user_id, goal.id, day, 1, None);
        data.deactivate_goal(user_id, goal.id);

        let details = day_details(&data, user_id, day);
        assert_eq!(details.total_checkins, 1);
        assert_eq!(details.checkins[0].goal_title, "Unknown Goal");
        assert_eq!(details.checkins[0].goal_frequency, None);
    }

    #[test]
    fn views_are_isolated_per_user() {
        let mut data = AppData::default();
        let (ann, category) = seed_user(&mut data, "ann");
        let (bob, _) = seed_user(&mut data, "bob");
        let goal = data.insert_goal(ann, "Run".into(), category.id, Frequency::Daily, 1);
        let today = date(2025, 6, 11);
        data.insert_checkin(ann, goal.id, today, 1, None);

        assert!(progress_by_frequency(&data, bob, None, today).is_empty());
        assert!(year_calendar(&data, bob, Some(2025), today).calendar.is_empty());
        assert_eq!(day_details(&data, bob, today).total_checkins, 0);
    }
}
