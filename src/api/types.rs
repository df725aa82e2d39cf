use crate::utils::date::DateArg;

/// Filters for the time-entries listing.
///
/// An unset date range falls back to the default query window
/// (2000-01-01 through today).
#[derive(Debug, Clone, Default)]
pub struct EntriesParams {
    pub from: Option<DateArg>,
    pub to: Option<DateArg>,
    pub task_ids: Option<Vec<u64>>,
    pub user_ids: Option<Vec<u64>>,
    pub with_subtasks: bool,
    /// Replace each entry's `user_id` with the full user record's fields.
    pub embed_users: bool,
}

/// Options for task listings and lookups.
#[derive(Debug, Clone, Default)]
pub struct TasksParams {
    /// Replace each task's `users` map with the full user records' fields.
    pub embed_users: bool,
}
