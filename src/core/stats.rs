use crate::core::task::{Task, TASKS_KEY};
use crate::store::LocalStore;

pub const PERFECT_RUNS_KEY: &str = "perfect_completions";

/// Perfect runs needed to advance one mastery level.
pub const RUNS_PER_LEVEL: u32 = 5;

/// Derived profile statistics. Only the perfect-run counter is persisted;
/// everything else is recomputed from the stored task list on each read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub perfect_runs: u32,
    /// Completed share of the current list, rounded to whole percent.
    pub completion_rate: u8,
    pub mastery_level: u32,
    /// Perfect runs accumulated toward the next level, out of
    /// [`RUNS_PER_LEVEL`].
    pub level_progress: u32,
}

impl Stats {
    /// Read-only derivation from the persisted task list and counter. Never
    /// writes, and never seeds: an absent or corrupt task list counts as
    /// empty here.
    pub fn read(store: &dyn LocalStore) -> Self {
        let tasks: Vec<Task> = store
            .get(TASKS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let perfect_runs = load_perfect_runs(store);

        Self {
            total_tasks: total,
            completed_tasks: completed,
            perfect_runs,
            completion_rate: completion_rate(completed, total),
            mastery_level: perfect_runs / RUNS_PER_LEVEL + 1,
            level_progress: perfect_runs % RUNS_PER_LEVEL,
        }
    }
}

/// Whole-percent completion rate; 0 for an empty list.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    }
}

pub fn load_perfect_runs(store: &dyn LocalStore) -> u32 {
    store
        .get(PERFECT_RUNS_KEY)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}

pub fn save_perfect_runs(store: &dyn LocalStore, count: u32) {
    if let Err(e) = store.set(PERFECT_RUNS_KEY, &count.to_string()) {
        log::error!("Failed to save perfect-run counter: {}", e);
    }
}

/// Increment the persisted counter and return the new value.
pub fn record_perfect_run(store: &dyn LocalStore) -> u32 {
    let count = load_perfect_runs(store) + 1;
    save_perfect_runs(store, count);
    count
}
