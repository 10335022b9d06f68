use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::LocalStore;

pub const EVENTS_KEY: &str = "events";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Default category for quick-added events.
    #[default]
    Work,
    Meeting,
    Urgent,
    Social,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, date: NaiveDateTime, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            title: title.into(),
            kind,
        }
    }
}

/// Where a dragged event was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Day(NaiveDate),
    Trash,
}

/// The full set of calendar events. Events are bucketed for display by
/// calendar day; the stored timestamp may carry any time-of-day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCalendar {
    events: Vec<CalendarEvent>,
}

impl EventCalendar {
    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Add an event on the given date. Blank titles are rejected as a no-op.
    pub fn add(&mut self, date: NaiveDateTime, title: &str, kind: EventKind) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.events.push(CalendarEvent::new(title, date, kind));
        true
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        match self.events.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.events.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Move an event to a new date; title, kind and id are untouched.
    pub fn reschedule(&mut self, id: Uuid, new_date: NaiveDateTime) -> bool {
        match self.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                event.date = new_date;
                true
            }
            None => false,
        }
    }

    /// Apply a drag-and-drop outcome: dropping on a day cell reschedules to
    /// that day, dropping on the trash deletes.
    pub fn handle_drop(&mut self, id: Uuid, target: DropTarget) -> bool {
        match target {
            DropTarget::Day(day) => self.reschedule(id, day.and_time(NaiveTime::MIN)),
            DropTarget::Trash => self.remove(id),
        }
    }

    /// Events whose stored date falls on the given calendar day, regardless
    /// of time-of-day.
    pub fn events_on_day(&self, day: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.date.date() == day).collect()
    }

    /// Events from the start of `from_day` onward, soonest first. Callers
    /// cap the result length for display.
    pub fn upcoming(&self, from_day: NaiveDate) -> Vec<&CalendarEvent> {
        let mut upcoming: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|e| e.date.date() >= from_day)
            .collect();
        upcoming.sort_by_key(|e| e.date);
        upcoming
    }
}

/// Starter events shown before any saved data exists, placed relative to
/// the given moment.
pub fn default_events(now: NaiveDateTime) -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::new("Team Sync", now, EventKind::Meeting),
        CalendarEvent::new("Lunch with Client", now, EventKind::Social),
        CalendarEvent::new("Project Review", now + Duration::days(2), EventKind::Work),
        CalendarEvent::new("Project Deadline", now + Duration::days(5), EventKind::Urgent),
        CalendarEvent::new("Design Sprint", now + Duration::days(10), EventKind::Work),
        CalendarEvent::new("Retrospective", now - Duration::days(2), EventKind::Meeting),
    ]
}

pub fn load_events(store: &dyn LocalStore) -> EventCalendar {
    let seed = || EventCalendar::from_events(default_events(chrono::Local::now().naive_local()));
    match store.get(EVENTS_KEY) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|_| seed()),
        None => seed(),
    }
}

pub fn save_events(store: &dyn LocalStore, events: &EventCalendar) {
    match serde_json::to_string(events) {
        Ok(json) => {
            if let Err(e) = store.set(EVENTS_KEY, &json) {
                log::error!("Failed to save events: {}", e);
            }
        }
        Err(e) => log::error!("Failed to serialize events: {}", e),
    }
}
