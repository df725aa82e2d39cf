//! End-to-end tests for the client against a local mock HTTP server.

use mockito::{Matcher, ServerGuard};
use serde_json::json;
use timecamp::{EntriesParams, TasksParams, Timecamp, TimecampError};

fn client(server: &ServerGuard) -> Timecamp {
    Timecamp::builder("tok")
        .base_url(server.url())
        .build()
        .expect("client creation failed")
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[test]
fn test_users_listing_labels_records() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            format!("/users/format/json/api_token/tok/from/2000-01-01/to/{}", today()).as_str(),
        )
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"user_id": "7", "display_name": "Ada", "email": "ada@example.test"},
                {"user_id": "8", "display_name": "Grace", "email": "grace@example.test"}
            ])
            .to_string(),
        )
        .create();

    let users: Vec<_> = tc.users().collect::<Result<_, _>>().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].label(), "User 7");
    assert_eq!(users[1].get_str("display_name"), Some("Grace"));
    mock.assert();
}

#[test]
fn test_sequence_issues_no_request_until_consumed() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .with_body("[]")
        .create();

    let records = tc.users();
    drop(records);
    mock.assert();
}

#[test]
fn test_each_call_requeries_the_network() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            format!("/users/format/json/api_token/tok/from/2000-01-01/to/{}", today()).as_str(),
        )
        .expect(2)
        .with_body(json!([{"user_id": "7", "display_name": "Ada"}]).to_string())
        .create();

    assert_eq!(tc.users().count(), 1);
    assert_eq!(tc.users().count(), 1);
    mock.assert();
}

#[test]
fn test_http_error_carries_status_and_body() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    server
        .mock("GET", Matcher::Any)
        .with_status(404)
        .with_body("Page not found")
        .create();

    let err = tc.users().next().unwrap().unwrap_err();
    assert!(matches!(err, TimecampError::Http { status: 404, .. }));
    assert_eq!(format!("{}", err), "[404] Page not found");
}

#[test]
fn test_server_error_carries_status_and_body() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create();

    let err = tc.users().next().unwrap().unwrap_err();
    assert!(matches!(err, TimecampError::Http { status: 500, .. }));
    assert_eq!(format!("{}", err), "[500] boom");
}

#[test]
fn test_failed_sequence_ends_after_the_error() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create();

    let mut records = tc.users();
    assert!(records.next().unwrap().is_err());
    assert!(records.next().is_none());
}

#[test]
fn test_user_lookups() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    server
        .mock("GET", Matcher::Any)
        .with_body(
            json!([
                {"user_id": "7", "display_name": "Ada"},
                {"user_id": "8", "display_name": "Grace"}
            ])
            .to_string(),
        )
        .create();

    let user = tc.user_by_id("8").unwrap();
    assert_eq!(user.label(), "User 8");

    let user = tc.user_by_name("Ada").unwrap();
    assert_eq!(user.get_id("user_id").as_deref(), Some("7"));

    let err = tc.user_by_id("99").unwrap_err();
    assert!(matches!(err, TimecampError::NotFound(_)));
    assert_eq!(format!("{}", err), "No user found with id 99.");

    let err = tc.user_by_name("Nobody").unwrap_err();
    assert_eq!(format!("{}", err), "No user named Nobody found.");
}

#[test]
fn test_entries_path_carries_filters_in_order() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            "/entries/format/json/api_token/tok/from/2026-01-01/to/2026-01-31\
             /task_ids/1,2/user_ids/7/with_subtasks/1",
        )
        .with_body(json!([{"id": 501, "duration": "3600", "user_id": "7"}]).to_string())
        .create();

    let params = EntriesParams {
        from: Some("2026-01-01".into()),
        to: Some("2026-01-31".into()),
        task_ids: Some(vec![1, 2]),
        user_ids: Some(vec![7]),
        with_subtasks: true,
        ..EntriesParams::default()
    };
    let entries: Vec<_> = tc.entries(&params).collect::<Result<_, _>>().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].label(), "Entry 501");
    assert_eq!(entries[0].get_u64("duration"), Some(3600));
    mock.assert();
}

#[test]
fn test_entries_embed_users_inlines_user_fields() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    server
        .mock(
            "GET",
            format!("/entries/format/json/api_token/tok/from/2000-01-01/to/{}", today()).as_str(),
        )
        .with_body(json!([{"id": 501, "user_id": "7"}]).to_string())
        .create();
    let users_mock = server
        .mock(
            "GET",
            format!("/users/format/json/api_token/tok/from/2000-01-01/to/{}", today()).as_str(),
        )
        .with_body(json!([{"user_id": "7", "display_name": "Ada"}]).to_string())
        .create();

    let params = EntriesParams {
        embed_users: true,
        ..EntriesParams::default()
    };
    let entries: Vec<_> = tc.entries(&params).collect::<Result<_, _>>().unwrap();
    let embedded = entries[0].get("user_id").unwrap();
    assert_eq!(embedded["display_name"], json!("Ada"));
    users_mock.assert();
}

#[test]
fn test_task_lookup_by_id() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            format!(
                "/tasks/format/json/api_token/tok/from/2000-01-01/to/{}/task_id/42",
                today()
            )
            .as_str(),
        )
        .with_body(json!({"42": {"name": "Research", "users": {}}}).to_string())
        .create();

    let task = tc.task_by_id(42, &TasksParams::default()).unwrap();
    assert_eq!(task.label(), "Task 42");
    assert_eq!(task.get_str("name"), Some("Research"));
    mock.assert();
}

#[test]
fn test_task_lookup_reports_missing_task() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    server.mock("GET", Matcher::Any).with_body("{}").create();

    let err = tc.task_by_id(99, &TasksParams::default()).unwrap_err();
    assert!(matches!(err, TimecampError::NotFound(_)));
    assert_eq!(format!("{}", err), "No task with id 99");
}

#[test]
fn test_add_task_posts_form_encoded_fields() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "POST",
            format!("/tasks/format/json/api_token/tok/from/2000-01-01/to/{}", today()).as_str(),
        )
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::UrlEncoded("name".into(), "Research".into()))
        .with_body(json!({"10": {"name": "Research"}}).to_string())
        .create();

    let task = tc.add_task(&[("name", "Research")]).unwrap();
    assert_eq!(task.label(), "Task 10");
    mock.assert();
}

#[test]
fn test_update_entry_puts_to_the_entries_endpoint() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "PUT",
            format!("/entries/format/json/api_token/tok/from/2000-01-01/to/{}", today())
                .as_str(),
        )
        .match_body(Matcher::UrlEncoded("id".into(), "501".into()))
        .with_body(json!({"501": {"duration": "1800"}}).to_string())
        .create();

    let entry = tc.update_entry(&[("id", "501"), ("duration", "1800")]).unwrap();
    assert_eq!(entry.label(), "Entry 501");
    mock.assert();
}

#[test]
fn test_activities_by_day_uses_date_segment() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            format!(
                "/activity/format/json/api_token/tok/from/2000-01-01/to/{}/user_ids/3/date/2026-01-15",
                today()
            )
            .as_str(),
        )
        .with_body(json!([{"application_id": 1, "time_span": 60}]).to_string())
        .create();

    let activities: Vec<_> = tc
        .activities_by_day(Some("2026-01-15".into()), Some(&[3][..]))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(activities[0].label(), "Activity");
    mock.assert();
}

#[test]
fn test_applications_keyed_response() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            format!(
                "/application/format/json/api_token/tok/from/2000-01-01/to/{}/application_ids/5,6",
                today()
            )
            .as_str(),
        )
        .with_body(json!({"5": {"name": "editor"}, "6": {"name": "browser"}}).to_string())
        .create();

    let apps: Vec<_> = tc
        .applications(Some(&[5, 6][..]))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(apps.len(), 2);
    assert!(apps.iter().any(|app| app.label() == "Application 5"));
    mock.assert();
}

#[test]
fn test_items_escape_hatch_covers_remaining_kinds() {
    let mut server = mockito::Server::new();
    let tc = client(&server);
    let mock = server
        .mock(
            "GET",
            format!("/away_time/format/json/api_token/tok/from/2000-01-01/to/{}", today())
                .as_str(),
        )
        .with_body("[]")
        .create();

    let records: Vec<_> = tc.items("away_time").unwrap().collect::<Result<_, _>>().unwrap();
    assert!(records.is_empty());
    mock.assert();

    // rejected before any request
    assert!(matches!(
        tc.items("projects"),
        Err(TimecampError::InvalidItemType(_))
    ));
}
