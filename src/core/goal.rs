use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::LocalStore;

pub const GOALS_KEY: &str = "goals";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// A long-term objective. Goals are write-once: they can be added and
/// deleted, never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    /// Duration estimate in years, at least 1.
    pub years: u32,
    pub priority: GoalPriority,
    pub created_at: NaiveDateTime,
}

impl Goal {
    pub fn new(title: impl Into<String>, years: u32, priority: GoalPriority) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            years,
            priority,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalList {
    goals: Vec<Goal>,
}

impl GoalList {
    pub fn from_goals(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Prepend a new goal. Blank titles and zero-year durations are
    /// rejected as a no-op.
    pub fn add(&mut self, title: &str, years: u32, priority: GoalPriority) -> bool {
        let title = title.trim();
        if title.is_empty() || years == 0 {
            return false;
        }
        self.goals.insert(0, Goal::new(title, years, priority));
        true
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        match self.goals.iter().position(|g| g.id == id) {
            Some(pos) => {
                self.goals.remove(pos);
                true
            }
            None => false,
        }
    }
}

pub fn load_goals(store: &dyn LocalStore) -> GoalList {
    match store.get(GOALS_KEY) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
        None => GoalList::default(),
    }
}

pub fn save_goals(store: &dyn LocalStore, goals: &GoalList) {
    match serde_json::to_string(goals) {
        Ok(json) => {
            if let Err(e) = store.set(GOALS_KEY, &json) {
                log::error!("Failed to save goals: {}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize goals: {}", e),
    }
}
