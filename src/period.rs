use crate::models::Frequency;
use chrono::{Datelike, Duration, NaiveDate};

/// Concrete date range a goal's check-ins are summed over for the current
/// cycle. Derived on every query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: &'static str,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Maps a frequency to the period window containing `today`.
///
/// Weeks are Monday-aligned inclusive 7-day spans. Months end on
/// next-month-minus-one-day so 28/29/30/31-day lengths fall out of the
/// calendar itself. `Custom` goals are never period-bounded and get the
/// full representable date range.
pub fn resolve(frequency: Frequency, today: NaiveDate) -> PeriodWindow {
    match frequency {
        Frequency::Daily => PeriodWindow {
            start: today,
            end: today,
            label: "today",
        },
        Frequency::Weekly => {
            let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            PeriodWindow {
                start,
                end: start + Duration::days(6),
                label: "this week",
            }
        }
        Frequency::Monthly => {
            let start = today.with_day(1).expect("day 1 exists in every month");
            let end = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year(), 12, 31)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
                    .map(|next| next - Duration::days(1))
            }
            .expect("month end exists in every month");
            PeriodWindow {
                start,
                end,
                label: "this month",
            }
        }
        Frequency::Yearly => PeriodWindow {
            start: NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("jan 1 exists in every year"),
            end: NaiveDate::from_ymd_opt(today.year(), 12, 31).expect("dec 31 exists in every year"),
            label: "this year",
        },
        Frequency::Custom => PeriodWindow {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
            label: "all time",
        },
    }
}
