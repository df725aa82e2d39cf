//! Request-path construction.
//!
//! The API routes everything through path segments rather than a query
//! string: `/{item_type}/format/json/api_token/{token}/from/{date}/to/{date}`
//! followed by optional ID-list, subtask, task-id and date segments, in that
//! order.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TimecampError;
use crate::utils::date::{self, DateArg};

/// The fixed set of resource kinds the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Users,
    Tasks,
    Entries,
    TimerRunning,
    EntriesChanges,
    Activity,
    Application,
    WindowTitle,
    Client,
    Invoice,
    Attendance,
    AwayTime,
}

impl ItemType {
    pub const ALL: [ItemType; 12] = [
        ItemType::Users,
        ItemType::Tasks,
        ItemType::Entries,
        ItemType::TimerRunning,
        ItemType::EntriesChanges,
        ItemType::Activity,
        ItemType::Application,
        ItemType::WindowTitle,
        ItemType::Client,
        ItemType::Invoice,
        ItemType::Attendance,
        ItemType::AwayTime,
    ];

    /// Wire name used as the leading path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Users => "users",
            ItemType::Tasks => "tasks",
            ItemType::Entries => "entries",
            ItemType::TimerRunning => "timer_running",
            ItemType::EntriesChanges => "entries_changes",
            ItemType::Activity => "activity",
            ItemType::Application => "application",
            ItemType::WindowTitle => "window_title",
            ItemType::Client => "client",
            ItemType::Invoice => "invoice",
            ItemType::Attendance => "attendance",
            ItemType::AwayTime => "away_time",
        }
    }

    /// Human-readable prefix for record labels.
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Users => "User",
            ItemType::Tasks => "Task",
            ItemType::Entries => "Entry",
            ItemType::TimerRunning => "Timer",
            ItemType::EntriesChanges => "Entry change",
            ItemType::Activity => "Activity",
            ItemType::Application => "Application",
            ItemType::WindowTitle => "Window",
            ItemType::Client => "Client",
            ItemType::Invoice => "Invoice",
            ItemType::Attendance => "Attendance",
            ItemType::AwayTime => "Away time",
        }
    }

    /// Response field carrying the item identifier, for kinds whose list
    /// responses are arrays of objects rather than maps keyed by id.
    pub fn id_field(&self) -> Option<&'static str> {
        match self {
            ItemType::Users => Some("user_id"),
            ItemType::Entries | ItemType::EntriesChanges => Some("id"),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = TimecampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TimecampError::InvalidItemType(s.to_string()))
    }
}

/// Optional filters appended to a request path.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub from_date: Option<DateArg>,
    pub to_date: Option<DateArg>,
    /// Ordered ID-list filters, each rendered as `/{field}/{csv}`.
    pub id_filters: Vec<(&'static str, Vec<u64>)>,
    pub with_subtasks: bool,
    pub task_id: Option<u64>,
    pub date: Option<DateArg>,
}

impl Query {
    /// Appends an ID-list filter; absent and empty lists are skipped.
    pub fn id_filter(mut self, field: &'static str, ids: Option<&[u64]>) -> Self {
        if let Some(ids) = ids {
            if !ids.is_empty() {
                self.id_filters.push((field, ids.to_vec()));
            }
        }
        self
    }

    /// Renders the path below the API root in the fixed segment order.
    ///
    /// A missing `from` bound defaults to 2000-01-01, a missing `to` bound
    /// to `today`.
    pub fn to_path(
        &self,
        kind: ItemType,
        token: &str,
        format: &str,
        today: NaiveDate,
    ) -> Result<String, TimecampError> {
        let from = match &self.from_date {
            Some(arg) => arg.resolve(today)?,
            None => date::epoch_start(),
        };
        let to = match &self.to_date {
            Some(arg) => arg.resolve(today)?,
            None => today,
        };
        let mut path = format!(
            "/{}/format/{}/api_token/{}/from/{}/to/{}",
            kind.as_str(),
            format,
            token,
            date::format_date(from),
            date::format_date(to),
        );
        for (field, ids) in &self.id_filters {
            let csv = ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            path.push_str(&format!("/{}/{}", field, csv));
        }
        if self.with_subtasks {
            path.push_str("/with_subtasks/1");
        }
        if let Some(task_id) = self.task_id {
            path.push_str(&format!("/task_id/{}", task_id));
        }
        if let Some(arg) = &self.date {
            path.push_str(&format!("/date/{}", arg.to_wire(today)?));
        }
        Ok(path)
    }
}
