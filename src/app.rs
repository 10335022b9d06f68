use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::event::{self, CalendarEvent, DropTarget, EventCalendar, EventKind};
use crate::core::goal::{self, Goal, GoalList, GoalPriority};
use crate::core::identity::{self, Identity};
use crate::core::stats::{self, Stats};
use crate::core::task::{self, Task, TaskList};
use crate::store::LocalStore;

/// Delay between the all-complete transition and the automatic board clear.
pub const CLEAR_DELAY: Duration = Duration::from_secs(3);

/// The signed-in user's working set, loaded from the store when the gate
/// opens. The task list is shared with the deferred-clear timer.
struct Workspace {
    tasks: Arc<Mutex<TaskList>>,
    events: EventCalendar,
    goals: GoalList,
}

impl Workspace {
    fn load(store: &dyn LocalStore) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(task::load_tasks(store))),
            events: event::load_events(store),
            goals: goal::load_goals(store),
        }
    }
}

fn lock(tasks: &Mutex<TaskList>) -> MutexGuard<'_, TaskList> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Application-state container composing every model behind the identity
/// gate. Each mutation updates in-memory state, then persists the whole
/// owning collection under its fixed key.
///
/// Completing the last open task arms a timer that clears the board after
/// [`CLEAR_DELAY`]; arming requires an ambient tokio runtime. The timer is
/// cancelled on re-arm, logout, and drop. It is not cancelled when the list
/// becomes incomplete again, so a task added inside the window is cleared
/// with the rest.
pub struct App {
    store: Arc<dyn LocalStore>,
    identity: Option<Identity>,
    workspace: Option<Workspace>,
    pending_clear: Option<JoinHandle<()>>,
}

impl App {
    /// Restore state from the store: when an identity is present the
    /// workspace loads immediately, otherwise the gate stays closed until
    /// [`App::onboard`].
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let identity = identity::load_identity(store.as_ref());
        let workspace = identity
            .is_some()
            .then(|| Workspace::load(store.as_ref()));
        Self {
            store,
            identity,
            workspace,
            pending_clear: None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_unlocked(&self) -> bool {
        self.workspace.is_some()
    }

    /// Set the active user and open the workspace. No-op when the username
    /// is blank or a user is already signed in.
    pub fn onboard(&mut self, username: &str, avatar: Option<String>) -> bool {
        if self.identity.is_some() {
            return false;
        }
        let username = username.trim();
        if username.is_empty() {
            return false;
        }
        let identity = Identity::new(username, avatar);
        identity::save_identity(self.store.as_ref(), &identity);
        self.identity = Some(identity);
        self.workspace = Some(Workspace::load(self.store.as_ref()));
        true
    }

    /// Close the session: cancel any pending clear, forget the identity in
    /// memory and in storage. Collection keys are left intact for the next
    /// sign-in.
    pub fn logout(&mut self) {
        self.cancel_pending_clear();
        identity::clear_identity(self.store.as_ref());
        self.identity = None;
        self.workspace = None;
    }

    // --- tasks ---

    pub fn add_task(&mut self, title: &str) -> bool {
        self.mutate_tasks(|tasks| tasks.add(title))
    }

    pub fn toggle_task(&mut self, id: Uuid) -> bool {
        self.mutate_tasks(|tasks| tasks.toggle(id))
    }

    pub fn rename_task(&mut self, id: Uuid, new_title: &str) -> bool {
        self.mutate_tasks(|tasks| tasks.rename(id, new_title))
    }

    pub fn delete_task(&mut self, id: Uuid) -> bool {
        self.mutate_tasks(|tasks| tasks.remove(id))
    }

    pub fn reorder_task(&mut self, source: Uuid, target: Uuid) -> bool {
        self.mutate_tasks(|tasks| tasks.reorder(source, target))
    }

    pub fn tasks(&self) -> Option<Vec<Task>> {
        let ws = self.workspace.as_ref()?;
        Some(lock(&ws.tasks).tasks().to_vec())
    }

    pub fn all_tasks_completed(&self) -> bool {
        self.workspace
            .as_ref()
            .is_some_and(|ws| lock(&ws.tasks).all_completed())
    }

    /// Run one task mutation: persist on change, then fire the perfect-run
    /// effects if the mutation flipped `all_completed` from false to true.
    fn mutate_tasks(&mut self, mutation: impl FnOnce(&mut TaskList) -> bool) -> bool {
        let Some(ws) = self.workspace.as_ref() else {
            return false;
        };
        let (changed, was_complete, now_complete) = {
            let mut tasks = lock(&ws.tasks);
            let was_complete = tasks.all_completed();
            let changed = mutation(&mut tasks);
            if changed {
                task::save_tasks(self.store.as_ref(), &tasks);
            }
            (changed, was_complete, tasks.all_completed())
        };
        if changed && !was_complete && now_complete {
            self.on_perfect_run();
        }
        changed
    }

    fn on_perfect_run(&mut self) {
        let count = stats::record_perfect_run(self.store.as_ref());
        log::info!("perfect run #{count}, board clears in {}s", CLEAR_DELAY.as_secs());
        self.arm_clear_timer();
    }

    fn arm_clear_timer(&mut self) {
        self.cancel_pending_clear();
        let Some(ws) = self.workspace.as_ref() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let tasks = Arc::clone(&ws.tasks);
        self.pending_clear = Some(tokio::spawn(async move {
            tokio::time::sleep(CLEAR_DELAY).await;
            let mut tasks = lock(&tasks);
            tasks.clear();
            task::save_tasks(store.as_ref(), &tasks);
        }));
    }

    fn cancel_pending_clear(&mut self) {
        if let Some(handle) = self.pending_clear.take() {
            handle.abort();
        }
    }

    // --- calendar events ---

    pub fn add_event(&mut self, date: NaiveDateTime, title: &str, kind: EventKind) -> bool {
        self.mutate_events(|events| events.add(date, title, kind))
    }

    pub fn delete_event(&mut self, id: Uuid) -> bool {
        self.mutate_events(|events| events.remove(id))
    }

    pub fn reschedule_event(&mut self, id: Uuid, new_date: NaiveDateTime) -> bool {
        self.mutate_events(|events| events.reschedule(id, new_date))
    }

    pub fn drop_event(&mut self, id: Uuid, target: DropTarget) -> bool {
        self.mutate_events(|events| events.handle_drop(id, target))
    }

    pub fn events_on_day(&self, day: NaiveDate) -> Option<Vec<CalendarEvent>> {
        let ws = self.workspace.as_ref()?;
        Some(ws.events.events_on_day(day).into_iter().cloned().collect())
    }

    pub fn upcoming_events(&self, from_day: NaiveDate) -> Option<Vec<CalendarEvent>> {
        let ws = self.workspace.as_ref()?;
        Some(ws.events.upcoming(from_day).into_iter().cloned().collect())
    }

    fn mutate_events(&mut self, mutation: impl FnOnce(&mut EventCalendar) -> bool) -> bool {
        let Some(ws) = self.workspace.as_mut() else {
            return false;
        };
        let changed = mutation(&mut ws.events);
        if changed {
            event::save_events(self.store.as_ref(), &ws.events);
        }
        changed
    }

    // --- goals ---

    pub fn add_goal(&mut self, title: &str, years: u32, priority: GoalPriority) -> bool {
        self.mutate_goals(|goals| goals.add(title, years, priority))
    }

    pub fn delete_goal(&mut self, id: Uuid) -> bool {
        self.mutate_goals(|goals| goals.remove(id))
    }

    pub fn goals(&self) -> Option<Vec<Goal>> {
        let ws = self.workspace.as_ref()?;
        Some(ws.goals.goals().to_vec())
    }

    fn mutate_goals(&mut self, mutation: impl FnOnce(&mut GoalList) -> bool) -> bool {
        let Some(ws) = self.workspace.as_mut() else {
            return false;
        };
        let changed = mutation(&mut ws.goals);
        if changed {
            goal::save_goals(self.store.as_ref(), &ws.goals);
        }
        changed
    }

    // --- profile ---

    pub fn stats(&self) -> Option<Stats> {
        self.workspace.as_ref()?;
        Some(Stats::read(self.store.as_ref()))
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel_pending_clear();
    }
}
