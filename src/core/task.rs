use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::LocalStore;

pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
        }
    }
}

/// Ordered task list, newest first. Position in the list is the display
/// order; ids stay unique across every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Prepend a new open task. Blank titles are rejected as a no-op.
    pub fn add(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.tasks.insert(0, Task::new(title));
        true
    }

    pub fn toggle(&mut self, id: Uuid) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Replace a task's title, keeping id and completion. Blank titles and
    /// unknown ids are no-ops.
    pub fn rename(&mut self, id: Uuid, new_title: &str) -> bool {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.title = new_title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        match self.position(id) {
            Some(pos) => {
                self.tasks.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Move the source task to the target task's position, shifting the
    /// tasks in between by one. The relative order of all other tasks is
    /// preserved.
    pub fn reorder(&mut self, source: Uuid, target: Uuid) -> bool {
        if source == target {
            return false;
        }
        let Some(from) = self.position(source) else {
            return false;
        };
        let Some(to) = self.position(target) else {
            return false;
        };
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        true
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// True only when the list is non-empty and every task is done.
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }
}

/// Starter tasks shown before any saved data exists.
pub fn default_tasks() -> Vec<Task> {
    let mut roadmap = Task::new("Review Product Roadmap");
    roadmap.completed = true;
    vec![
        Task::new("Complete Frontend UI"),
        roadmap,
        Task::new("Client Meeting Preparation"),
        Task::new("Fix Navigation Bug"),
        Task::new("Update documentation"),
    ]
}

pub fn load_tasks(store: &dyn LocalStore) -> TaskList {
    match store.get(TASKS_KEY) {
        Some(raw) => serde_json::from_str(&raw)
            .unwrap_or_else(|_| TaskList::from_tasks(default_tasks())),
        None => TaskList::from_tasks(default_tasks()),
    }
}

pub fn save_tasks(store: &dyn LocalStore, tasks: &TaskList) {
    match serde_json::to_string(tasks) {
        Ok(json) => {
            if let Err(e) = store.set(TASKS_KEY, &json) {
                log::error!("Failed to save tasks: {}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize tasks: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn titles(list: &TaskList) -> Vec<&str> {
        list.tasks().iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn add_prepends_newest_first() {
        let mut list = TaskList::default();
        assert!(list.add("A"));
        assert!(list.add("B"));
        assert!(list.add("C"));
        assert_eq!(titles(&list), vec!["C", "B", "A"]);
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut list = TaskList::default();
        assert!(!list.add(""));
        assert!(!list.add("   "));
        assert!(list.is_empty());
    }

    #[test]
    fn add_stores_trimmed_title() {
        let mut list = TaskList::default();
        assert!(list.add("  Water plants  "));
        assert_eq!(list.tasks()[0].title, "Water plants");
    }

    #[test]
    fn toggle_flips_completion() {
        let mut list = TaskList::default();
        list.add("A");
        let id = list.tasks()[0].id;
        assert!(list.toggle(id));
        assert!(list.tasks()[0].completed);
        assert!(list.toggle(id));
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let mut list = TaskList::default();
        list.add("A");
        assert!(!list.toggle(Uuid::new_v4()));
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn rename_keeps_id_and_completion() {
        let mut list = TaskList::default();
        list.add("Old");
        let id = list.tasks()[0].id;
        list.toggle(id);
        assert!(list.rename(id, "  New  "));
        let task = &list.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.title, "New");
        assert!(task.completed);
    }

    #[test]
    fn rename_rejects_blank_and_unknown() {
        let mut list = TaskList::default();
        list.add("Keep me");
        let id = list.tasks()[0].id;
        assert!(!list.rename(id, "   "));
        assert!(!list.rename(Uuid::new_v4(), "Other"));
        assert_eq!(list.tasks()[0].title, "Keep me");
    }

    #[test]
    fn remove_deletes_only_the_matching_task() {
        let mut list = TaskList::default();
        list.add("A");
        list.add("B");
        let id = list.tasks()[1].id; // "A"
        assert!(list.remove(id));
        assert_eq!(titles(&list), vec!["B"]);
        assert!(!list.remove(id));
    }

    #[test]
    fn reorder_moves_source_to_target_position() {
        let mut list = TaskList::default();
        list.add("A");
        list.add("B");
        list.add("C"); // [C, B, A]
        let c = list.tasks()[0].id;
        let a = list.tasks()[2].id;
        assert!(list.reorder(c, a));
        assert_eq!(titles(&list), vec!["B", "A", "C"]);
        // And back up the list
        assert!(list.reorder(c, a));
        assert_eq!(titles(&list), vec!["B", "C", "A"]);
    }

    #[test]
    fn reorder_preserves_ids_and_other_order() {
        let mut list = TaskList::default();
        for t in ["A", "B", "C", "D", "E"] {
            list.add(t);
        }
        let before: HashSet<Uuid> = list.tasks().iter().map(|t| t.id).collect();
        let source = list.tasks()[3].id;
        let target = list.tasks()[1].id;
        assert!(list.reorder(source, target));

        let after: HashSet<Uuid> = list.tasks().iter().map(|t| t.id).collect();
        assert_eq!(before, after);
        let rest: Vec<&str> = titles(&list)
            .into_iter()
            .filter(|t| *t != "B")
            .collect();
        assert_eq!(rest, vec!["E", "D", "C", "A"]);
    }

    #[test]
    fn reorder_noop_cases() {
        let mut list = TaskList::default();
        list.add("A");
        list.add("B");
        let a = list.tasks()[1].id;
        assert!(!list.reorder(a, a));
        assert!(!list.reorder(a, Uuid::new_v4()));
        assert!(!list.reorder(Uuid::new_v4(), a));
        assert_eq!(titles(&list), vec!["B", "A"]);
    }

    #[test]
    fn all_completed_requires_nonempty_all_done() {
        let mut list = TaskList::default();
        assert!(!list.all_completed());
        list.add("A");
        list.add("B");
        assert!(!list.all_completed());
        let ids: Vec<Uuid> = list.tasks().iter().map(|t| t.id).collect();
        for id in &ids {
            list.toggle(*id);
        }
        assert!(list.all_completed());
        list.toggle(ids[0]);
        assert!(!list.all_completed());
    }

    #[test]
    fn ids_stay_unique_and_titles_nonempty() {
        let mut list = TaskList::default();
        for t in ["A", "B", "C", "D"] {
            list.add(t);
        }
        let b = list.tasks()[2].id;
        list.remove(b);
        list.add("E");
        let e = list.tasks()[0].id;
        list.rename(e, "E2");

        let ids: HashSet<Uuid> = list.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), list.len());
        assert!(list.tasks().iter().all(|t| !t.title.trim().is_empty()));
    }

    #[test]
    fn load_seeds_defaults_when_absent() {
        let store = MemoryStore::new();
        let list = load_tasks(&store);
        assert_eq!(list.len(), 5);
        assert_eq!(list.tasks()[0].title, "Complete Frontend UI");
        assert!(list.tasks()[1].completed);
        assert_eq!(list.completed_count(), 1);
    }

    #[test]
    fn load_seeds_defaults_on_corrupt_value() {
        let store = MemoryStore::new();
        store.set(TASKS_KEY, "{not json").unwrap();
        let list = load_tasks(&store);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let mut list = TaskList::default();
        list.add("Ship it");
        let id = list.tasks()[0].id;
        list.toggle(id);
        save_tasks(&store, &list);

        let loaded = load_tasks(&store);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.tasks()[0].id, id);
        assert!(loaded.tasks()[0].completed);
    }

    #[test]
    fn persisted_form_is_a_plain_array() {
        let store = MemoryStore::new();
        let mut list = TaskList::default();
        list.add("A");
        save_tasks(&store, &list);

        let raw = store.get(TASKS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "A");
        assert_eq!(records[0]["completed"], false);
        assert!(records[0]["id"].is_string());
    }
}
