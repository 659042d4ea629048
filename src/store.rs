//! Query and mutation surface over the in-memory collection. Every accessor
//! takes the owning user's id; rows belonging to other users are invisible
//! to it.

use crate::models::{AppData, Category, CheckIn, Frequency, Goal, UpdateGoalRequest, User};
use chrono::{Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;

impl AppData {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn user_by_id(&self, user_id: u64) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn insert_user(&mut self, username: String, password_hash: String) -> User {
        let user = User {
            id: self.alloc_id(),
            username,
            password_hash,
            created_at: Utc::now(),
        };
        self.users.push(user.clone());
        user
    }

    pub fn categories_for(&self, user_id: u64) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        categories
    }

    pub fn category(&self, user_id: u64, category_id: u64) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.id == category_id && category.user_id == user_id)
    }

    pub fn insert_category(&mut self, user_id: u64, title: String) -> Category {
        let category = Category {
            id: self.alloc_id(),
            user_id,
            title,
        };
        self.categories.push(category.clone());
        category
    }

    pub fn update_category(
        &mut self,
        user_id: u64,
        category_id: u64,
        title: String,
    ) -> Option<Category> {
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == category_id && category.user_id == user_id)?;
        category.title = title;
        Some(category.clone())
    }

    /// Hard delete. Goals keep their category_id; a dangling category
    /// reference is tolerated by every view.
    pub fn remove_category(&mut self, user_id: u64, category_id: u64) -> bool {
        let before = self.categories.len();
        self.categories
            .retain(|category| !(category.id == category_id && category.user_id == user_id));
        self.categories.len() < before
    }

    pub fn goals_for(&self, user_id: u64, include_inactive: bool) -> Vec<Goal> {
        let mut goals: Vec<Goal> = self
            .goals
            .iter()
            .filter(|goal| goal.user_id == user_id && (include_inactive || goal.is_active))
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.id.cmp(&a.id));
        goals
    }

    pub fn goals_by_category(&self, user_id: u64, category_id: u64) -> Vec<Goal> {
        let mut goals: Vec<Goal> = self
            .goals
            .iter()
            .filter(|goal| {
                goal.user_id == user_id && goal.category_id == category_id && goal.is_active
            })
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.id.cmp(&a.id));
        goals
    }

    /// Active goals of one frequency. All goals returned here share a single
    /// period window at evaluation time.
    pub fn goals_by_frequency(&self, user_id: u64, frequency: Frequency) -> Vec<Goal> {
        let mut goals: Vec<Goal> = self
            .goals
            .iter()
            .filter(|goal| {
                goal.user_id == user_id && goal.frequency == frequency && goal.is_active
            })
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.id.cmp(&a.id));
        goals
    }

    pub fn goal(&self, user_id: u64, goal_id: u64) -> Option<&Goal> {
        self.goals
            .iter()
            .find(|goal| goal.id == goal_id && goal.user_id == user_id)
    }

    /// Scoped lookup that treats soft-deleted goals as absent. Progress and
    /// day views resolve goals through this, so an inactive goal reads the
    /// same as a missing one.
    pub fn active_goal(&self, user_id: u64, goal_id: u64) -> Option<&Goal> {
        self.goal(user_id, goal_id).filter(|goal| goal.is_active)
    }

    pub fn insert_goal(
        &mut self,
        user_id: u64,
        title: String,
        category_id: u64,
        frequency: Frequency,
        target_value: u64,
    ) -> Goal {
        let goal = Goal {
            id: self.alloc_id(),
            user_id,
            title,
            category_id,
            frequency,
            target_value,
            is_active: true,
        };
        self.goals.push(goal.clone());
        goal
    }

    pub fn update_goal(
        &mut self,
        user_id: u64,
        goal_id: u64,
        update: &UpdateGoalRequest,
    ) -> Option<Goal> {
        let goal = self
            .goals
            .iter_mut()
            .find(|goal| goal.id == goal_id && goal.user_id == user_id)?;
        if let Some(title) = &update.title {
            goal.title = title.clone();
        }
        if let Some(category_id) = update.category_id {
            goal.category_id = category_id;
        }
        if let Some(frequency) = update.frequency {
            goal.frequency = frequency;
        }
        if let Some(target_value) = update.target_value {
            goal.target_value = target_value;
        }
        if let Some(is_active) = update.is_active {
            goal.is_active = is_active;
        }
        Some(goal.clone())
    }

    /// Soft delete: the row stays so historical check-ins remain valid.
    pub fn deactivate_goal(&mut self, user_id: u64, goal_id: u64) -> bool {
        match self
            .goals
            .iter_mut()
            .find(|goal| goal.id == goal_id && goal.user_id == user_id)
        {
            Some(goal) => {
                goal.is_active = false;
                true
            }
            None => false,
        }
    }

    pub fn insert_checkin(
        &mut self,
        user_id: u64,
        goal_id: u64,
        date: NaiveDate,
        value: u64,
        note: Option<String>,
    ) -> CheckIn {
        let checkin = CheckIn {
            id: self.alloc_id(),
            user_id,
            goal_id,
            date,
            value,
            note,
            created_at: Utc::now(),
        };
        self.checkins.push(checkin.clone());
        checkin
    }

    pub fn remove_checkin(&mut self, user_id: u64, checkin_id: u64) -> bool {
        let before = self.checkins.len();
        self.checkins
            .retain(|checkin| !(checkin.id == checkin_id && checkin.user_id == user_id));
        self.checkins.len() < before
    }

    /// Check-ins on one date, newest first.
    pub fn checkins_on(&self, user_id: u64, date: NaiveDate) -> Vec<CheckIn> {
        let mut checkins: Vec<CheckIn> = self
            .checkins
            .iter()
            .filter(|checkin| checkin.user_id == user_id && checkin.date == date)
            .cloned()
            .collect();
        checkins.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        checkins
    }

    pub fn checkins_for_goal(
        &self,
        user_id: u64,
        goal_id: u64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<CheckIn> {
        let mut checkins: Vec<CheckIn> = self
            .checkins
            .iter()
            .filter(|checkin| {
                checkin.user_id == user_id
                    && checkin.goal_id == goal_id
                    && start.is_none_or(|start| checkin.date >= start)
                    && end.is_none_or(|end| checkin.date <= end)
            })
            .cloned()
            .collect();
        checkins.sort_by(|a, b| (b.date, b.created_at, b.id).cmp(&(a.date, a.created_at, a.id)));
        checkins
    }

    /// Sum of check-in values for a goal inside `[start, end]` inclusive.
    /// An empty window sums to 0, never to an absent value.
    pub fn sum_value_in_window(
        &self,
        user_id: u64,
        goal_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> u64 {
        self.checkins
            .iter()
            .filter(|checkin| {
                checkin.user_id == user_id
                    && checkin.goal_id == goal_id
                    && checkin.date >= start
                    && checkin.date <= end
            })
            .fold(0, |total, checkin| total.saturating_add(checkin.value))
    }

    /// Row count per date for one calendar year. Sparse: dates without
    /// check-ins never appear.
    pub fn count_by_date_for_year(&self, user_id: u64, year: i32) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for checkin in &self.checkins {
            if checkin.user_id == user_id && checkin.date.year() == year {
                *counts.entry(checkin.date.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}
