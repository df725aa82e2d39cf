use std::time::Duration;

use chrono::{Local, NaiveDate, Weekday};
use log::debug;
use reqwest::Method;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde_json::Value;

use crate::api::query::{ItemType, Query};
use crate::api::record::{self, Record};
use crate::api::types::{EntriesParams, TasksParams};
use crate::error::TimecampError;
use crate::utils::date::DateArg;
use crate::utils::{date, validation};

const DEFAULT_BASE_URL: &str = "https://www.timecamp.com/third_party/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("timecamp/", env!("CARGO_PKG_VERSION"));
const RESPONSE_FORMAT: &str = "json";

/// Blocking TimeCamp API client. Immutable once built.
#[derive(Debug, Clone)]
pub struct Timecamp {
    http: Client,
    base_url: String,
    api_token: String,
    week_start: Weekday,
}

/// Configuration for [`Timecamp`]; obtained via [`Timecamp::builder`].
#[derive(Debug, Clone)]
pub struct TimecampBuilder {
    api_token: String,
    base_url: String,
    week_starts: String,
    verify_tls: bool,
}

impl TimecampBuilder {
    fn new(api_token: impl Into<String>) -> Self {
        TimecampBuilder {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            week_starts: "monday".to_string(),
            verify_tls: true,
        }
    }

    /// Day the configured week starts on; accepts singular or pluralized
    /// day names case-insensitively ("monday", "Sundays").
    pub fn week_starts(mut self, day: impl Into<String>) -> Self {
        self.week_starts = day.into();
        self
    }

    /// Disable to accept invalid TLS certificates.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Overrides the API root, e.g. to point at a local test server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn build(self) -> crate::Result<Timecamp> {
        validation::validate_api_token(&self.api_token)?;
        validation::validate_base_url(&self.base_url)?;
        let week_start = date::parse_week_day(&self.week_starts)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()?;
        Ok(Timecamp {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_token: self.api_token,
            week_start,
        })
    }
}

impl Timecamp {
    pub fn builder(api_token: impl Into<String>) -> TimecampBuilder {
        TimecampBuilder::new(api_token)
    }

    /// Client with default settings: production endpoint, weeks starting
    /// on Monday, TLS verification on.
    pub fn new(api_token: impl Into<String>) -> crate::Result<Self> {
        TimecampBuilder::new(api_token).build()
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn fetch(&self, kind: ItemType, query: &Query) -> crate::Result<Value> {
        let url = format!(
            "{}{}",
            self.base_url,
            query.to_path(kind, &self.api_token, RESPONSE_FORMAT, self.today())?
        );
        debug!("GET {}", url);
        let response = self.http.get(url).send()?;
        Self::handle_response(response)
    }

    fn send_form<T: Serialize + ?Sized>(
        &self,
        kind: ItemType,
        method: Method,
        form: &T,
    ) -> crate::Result<Value> {
        let url = format!(
            "{}{}",
            self.base_url,
            Query::default().to_path(kind, &self.api_token, RESPONSE_FORMAT, self.today())?
        );
        debug!("{} {}", method, url);
        let response = self.http.request(method, url).form(form).send()?;
        Self::handle_response(response)
    }

    fn handle_response(response: Response) -> crate::Result<Value> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<Value>()?)
        } else {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(TimecampError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// POST/PUT endpoints answer with a single-item map; unwrap it.
    fn one_item<T: Serialize + ?Sized>(
        &self,
        kind: ItemType,
        method: Method,
        form: &T,
    ) -> crate::Result<Record> {
        let body = self.send_form(kind, method, form)?;
        record::normalize(kind, body)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                TimecampError::UnexpectedResponse(format!("empty {} response", kind.as_str()))
            })
    }

    /// Tasks embed a `users` map keyed by user id; entries a single
    /// `user_id`. Either is replaced with the full user record's fields.
    fn embed_user_fields(&self, record: &mut Record) -> crate::Result<()> {
        let user_ids: Option<Vec<String>> = match record.get("users") {
            Some(Value::Object(users)) if !users.is_empty() => {
                Some(users.keys().cloned().collect())
            }
            _ => None,
        };
        if let Some(ids) = user_ids {
            let mut embedded = Vec::with_capacity(ids.len());
            for id in &ids {
                embedded.push(Value::Object(self.user_by_id(id)?.into_fields()));
            }
            record
                .fields_mut()
                .insert("users".to_string(), Value::Array(embedded));
        } else if let Some(id) = record.get_id("user_id") {
            let user = self.user_by_id(&id)?;
            record
                .fields_mut()
                .insert("user_id".to_string(), Value::Object(user.into_fields()));
        }
        Ok(())
    }

    /// All users visible to the token.
    pub fn users(&self) -> Records<'_> {
        Records::new(self, ItemType::Users, Query::default())
    }

    /// Linear scan over all users; `NotFound` when no id matches.
    pub fn user_by_id(&self, user_id: &str) -> crate::Result<Record> {
        for user in self.users() {
            let user = user?;
            if user.get_id("user_id").as_deref() == Some(user_id) {
                return Ok(user);
            }
        }
        Err(TimecampError::NotFound(format!(
            "No user found with id {}.",
            user_id
        )))
    }

    /// Linear scan over all users; `NotFound` when no display name matches.
    pub fn user_by_name(&self, name: &str) -> crate::Result<Record> {
        for user in self.users() {
            let user = user?;
            if user.get_str("display_name") == Some(name) {
                return Ok(user);
            }
        }
        Err(TimecampError::NotFound(format!(
            "No user named {} found.",
            name
        )))
    }

    /// The account's task tree, one record per task.
    pub fn tasks(&self, params: &TasksParams) -> Records<'_> {
        Records::new(self, ItemType::Tasks, Query::default()).embed_users(params.embed_users)
    }

    /// Single task lookup via the `/task_id/` segment.
    pub fn task_by_id(&self, task_id: u64, params: &TasksParams) -> crate::Result<Record> {
        let query = Query {
            task_id: Some(task_id),
            ..Query::default()
        };
        let body = self.fetch(ItemType::Tasks, &query)?;
        let mut task = record::normalize(ItemType::Tasks, body)?
            .into_iter()
            .next()
            .ok_or_else(|| TimecampError::NotFound(format!("No task with id {}", task_id)))?;
        if params.embed_users {
            self.embed_user_fields(&mut task)?;
        }
        Ok(task)
    }

    /// Creates a task from form fields, returning the created record.
    pub fn add_task<T: Serialize + ?Sized>(&self, task: &T) -> crate::Result<Record> {
        self.one_item(ItemType::Tasks, Method::POST, task)
    }

    pub fn update_task<T: Serialize + ?Sized>(&self, task: &T) -> crate::Result<Record> {
        self.one_item(ItemType::Tasks, Method::PUT, task)
    }

    /// Time entries within the date range, optionally filtered by task and
    /// user IDs.
    pub fn entries(&self, params: &EntriesParams) -> Records<'_> {
        let query = Query {
            from_date: params.from.clone(),
            to_date: params.to.clone(),
            with_subtasks: params.with_subtasks,
            ..Query::default()
        }
        .id_filter("task_ids", params.task_ids.as_deref())
        .id_filter("user_ids", params.user_ids.as_deref());
        Records::new(self, ItemType::Entries, query).embed_users(params.embed_users)
    }

    pub fn add_entry<T: Serialize + ?Sized>(&self, entry: &T) -> crate::Result<Record> {
        self.one_item(ItemType::Entries, Method::POST, entry)
    }

    pub fn update_entry<T: Serialize + ?Sized>(&self, entry: &T) -> crate::Result<Record> {
        self.one_item(ItemType::Entries, Method::PUT, entry)
    }

    /// Currently running timers.
    pub fn timer_running(&self) -> Records<'_> {
        Records::new(self, ItemType::TimerRunning, Query::default())
    }

    /// Computer activities for one day (today when `day` is `None`).
    pub fn activities_by_day(
        &self,
        day: Option<DateArg>,
        user_ids: Option<&[u64]>,
    ) -> Records<'_> {
        let query = Query {
            date: Some(day.unwrap_or_else(|| DateArg::Date(self.today()))),
            ..Query::default()
        }
        .id_filter("user_ids", user_ids);
        Records::new(self, ItemType::Activity, query)
    }

    /// One lazy per-day activity sequence for each of the `days` days
    /// preceding today, oldest first.
    pub fn past_days_activity(&self, days: u32, user_ids: Option<&[u64]>) -> Vec<Records<'_>> {
        let today = self.today();
        (1..=i64::from(days))
            .rev()
            .map(|back| {
                let day = today - chrono::Duration::days(back);
                self.activities_by_day(Some(DateArg::Date(day)), user_ids)
            })
            .collect()
    }

    /// Tracked applications, optionally limited to the given IDs.
    pub fn applications(&self, application_ids: Option<&[u64]>) -> Records<'_> {
        let query = Query::default().id_filter("application_ids", application_ids);
        Records::new(self, ItemType::Application, query)
    }

    /// Tracked window titles, optionally limited to the given IDs.
    pub fn window_titles(&self, window_title_ids: Option<&[u64]>) -> Records<'_> {
        let query = Query::default().id_filter("window_title_ids", window_title_ids);
        Records::new(self, ItemType::WindowTitle, query)
    }

    /// Listing for any valid resource kind by its wire name. Unknown kinds
    /// are rejected before any request is made.
    pub fn items(&self, kind: &str) -> crate::Result<Records<'_>> {
        let kind = kind.parse::<ItemType>()?;
        Ok(Records::new(self, kind, Query::default()))
    }
}

/// Lazy sequence over one listing endpoint.
///
/// No request is issued until the first item is polled, and every endpoint
/// call produces a fresh sequence that queries the network again when
/// consumed; results are never cached across calls. A failed fetch yields
/// its error once, then the sequence ends.
pub struct Records<'a> {
    client: &'a Timecamp,
    kind: ItemType,
    query: Query,
    embed_users: bool,
    items: Option<std::vec::IntoIter<Record>>,
    done: bool,
}

impl<'a> Records<'a> {
    fn new(client: &'a Timecamp, kind: ItemType, query: Query) -> Self {
        Records {
            client,
            kind,
            query,
            embed_users: false,
            items: None,
            done: false,
        }
    }

    fn embed_users(mut self, embed: bool) -> Self {
        self.embed_users = embed;
        self
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    fn fetch(&self) -> crate::Result<Vec<Record>> {
        let body = self.client.fetch(self.kind, &self.query)?;
        let mut records = record::normalize(self.kind, body)?;
        if self.embed_users {
            for record in &mut records {
                self.client.embed_user_fields(record)?;
            }
        }
        Ok(records)
    }

    /// Eagerly drains the sequence, stopping at the first failure.
    pub fn collect_all(self) -> crate::Result<Vec<Record>> {
        self.collect()
    }
}

impl Iterator for Records<'_> {
    type Item = crate::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.items.is_none() {
            match self.fetch() {
                Ok(records) => self.items = Some(records.into_iter()),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        let next = self.items.as_mut().and_then(Iterator::next);
        if next.is_none() {
            self.done = true;
        }
        next.map(Ok)
    }
}
