/// CLI integration tests for cadence
///
/// These tests exercise the CLI commands as a black box against a
/// temporary database.
use chrono::{DateTime, Utc};
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness};

fn instant(value: &serde_json::Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp string")
        .parse()
        .expect("RFC 3339 timestamp")
}

/// Test basic CLI help and version commands
#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("Timezone-aware"))
        .stdout(predicate::str::contains("tick"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("cadence"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_add_command() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add"])
        .stdout(assertions::recurrence_created_successfully())
        .stdout(predicate::str::contains("every day at 0:00:00 (UTC)"));

    harness
        .run_success(&[
            "add", "--interval", "month", "--offset", "14 days, 9:30:00", "--timezone", "America/New_York",
        ])
        .stdout(assertions::recurrence_created_successfully())
        .stdout(predicate::str::contains("every month at 14 days, 9:30:00 (America/New_York)"));

    harness
        .run_failure(&["add", "--interval", "fortnight"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["add", "--offset", "9:75:00"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["add", "--timezone", "Mars/Olympus_Mons"])
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_list_command() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("No recurrences found"));

    harness.add_recurrence(&["--interval", "day"]);
    harness.add_recurrence(&["--interval", "week", "--timezone", "Europe/Berlin"]);

    harness
        .run_success(&["list"])
        .stdout(assertions::has_recurrence_table_headers())
        .stdout(predicate::str::contains("Europe/Berlin"));

    let all = harness.run_json(&["list", "--json"]);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let weekly = harness.run_json(&["list", "--interval", "week", "--json"]);
    assert_eq!(weekly.as_array().unwrap().len(), 1);
    assert_eq!(weekly[0]["interval"], "WEEK");
    assert_eq!(weekly[0]["timezone"], "Europe/Berlin");

    let berlin = harness.run_json(&["list", "--timezone", "Europe/Berlin", "--json"]);
    assert_eq!(berlin.as_array().unwrap().len(), 1);

    // New recurrences are due until their first tick
    let due = harness.run_json(&["list", "--due", "--json"]);
    assert_eq!(due.as_array().unwrap().len(), 2);

    let limited = harness.run_json(&["list", "--limit", "1", "--json"]);
    assert_eq!(limited.as_array().unwrap().len(), 1);
}

#[test]
fn test_show_command() {
    let harness = CliTestHarness::new();
    let id = harness.add_recurrence(&["--interval", "quarter", "--offset", "1 day, 1:01:01"]);

    let shown = harness.run_json(&["show", &id, "--json"]);
    assert_eq!(shown["id"], id.as_str());
    assert_eq!(shown["interval"], "QUARTER");
    assert_eq!(shown["offset"], "1 day, 1:01:01");
    assert_eq!(shown["timezone"], "UTC");

    harness
        .run_success(&["show", &id])
        .stdout(predicate::str::contains("QUARTER"))
        .stdout(predicate::str::contains("not scheduled"));
}

#[test]
fn test_next_previews_without_saving() {
    let harness = CliTestHarness::new();
    let id = harness.add_recurrence(&[
        "--interval", "month", "--offset", "30 days, 23:03:03", "--timezone", "US/Central",
    ]);

    let schedules = harness.run_json(&[
        "next", &id, "--at", "2013-02-20T23:45:48Z", "--count", "3", "--json",
    ]);
    let schedules: Vec<DateTime<Utc>> = schedules.as_array().unwrap().iter().map(instant).collect();
    let expected: Vec<DateTime<Utc>> = ["2013-03-01T05:03:03Z", "2013-04-01T04:03:03Z", "2013-05-01T04:03:03Z"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(schedules, expected);

    harness
        .run_success(&["next", &id, "--at", "2013-02-20T23:45:48Z"])
        .stdout(predicate::str::contains("2013-02-28 23:03:03 CST"));

    // Nothing was persisted
    let shown = harness.run_json(&["show", &id, "--json"]);
    assert_eq!(instant(&shown["next_scheduled"]), DateTime::<Utc>::UNIX_EPOCH);
}

#[test]
fn test_tick_advances_due_recurrences() {
    let harness = CliTestHarness::new();
    let id = harness.add_recurrence(&["--interval", "day", "--offset", "12:00:00"]);

    harness
        .run_success(&["tick", "--at", "2024-01-01T13:00:00Z"])
        .stdout(predicate::str::contains("Advanced 1 recurrence"));

    let shown = harness.run_json(&["show", &id, "--json"]);
    assert_eq!(instant(&shown["previous_scheduled"]), "2024-01-01T13:00:00Z".parse::<DateTime<Utc>>().unwrap());
    assert_eq!(instant(&shown["next_scheduled"]), "2024-01-02T12:00:00Z".parse::<DateTime<Utc>>().unwrap());

    harness
        .run_success(&["tick", "--at", "2024-01-01T13:00:00Z"])
        .stdout(predicate::str::contains("Nothing is due"));

    harness
        .run_success(&["tick", "--at", "2024-01-02T12:00:01Z"])
        .stdout(predicate::str::contains("Advanced 1 recurrence"));
}

#[test]
fn test_edit_command() {
    let harness = CliTestHarness::new();
    let id = harness.add_recurrence(&["--interval", "day"]);

    harness
        .run_success(&["edit", &id, "--interval", "year", "--timezone", "Asia/Hong_Kong"])
        .stdout(predicate::str::contains("Updated recurrence"));

    let shown = harness.run_json(&["show", &id, "--json"]);
    assert_eq!(shown["interval"], "YEAR");
    assert_eq!(shown["timezone"], "Asia/Hong_Kong");

    harness
        .run_failure(&["edit", &id])
        .stderr(predicate::str::contains("Nothing to change"));

    harness
        .run_failure(&["edit", &id, "--timezone", "Nowhere/Special"])
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_delete_command() {
    let harness = CliTestHarness::new();
    let id = harness.add_recurrence(&[]);

    harness
        .run_success(&["delete", &id, "--force"])
        .stdout(predicate::str::contains("Deleted recurrence"));

    harness
        .run_failure(&["show", &id])
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_short_id_resolution() {
    let harness = CliTestHarness::new();
    let first = harness.add_recurrence(&["--interval", "day"]);
    let second = harness.add_recurrence(&["--interval", "week"]);

    let first_hex = first.replace('-', "");
    let second_hex = second.replace('-', "");
    let shared = first_hex
        .chars()
        .zip(second_hex.chars())
        .take_while(|(a, b)| a == b)
        .count();

    // One digit past the shared prefix is unique
    let unique = &first_hex[..(shared + 1).max(2)];
    let shown = harness.run_json(&["show", unique, "--json"]);
    assert_eq!(shown["id"], first.as_str());

    if shared >= 2 {
        harness
            .run_failure(&["show", &first_hex[..shared]])
            .stderr(predicate::str::contains("Ambiguous ID"));
    }

    harness
        .run_failure(&["show", "f"])
        .stderr(predicate::str::contains("at least 2 characters"));

    harness
        .run_failure(&["show", "zzzz"])
        .stderr(predicate::str::contains("hexadecimal"));

    harness
        .run_failure(&["delete", "__", "--force"])
        .stderr(predicate::str::contains("hexadecimal"));
    let remaining = harness.run_json(&["list", "--json"]);
    assert_eq!(remaining.as_array().unwrap().len(), 2);

    harness
        .run_failure(&["show", "ffffffff"])
        .stderr(predicate::str::contains("No recurrence found"));
}

#[test]
fn test_object_tracking() {
    let harness = CliTestHarness::new();
    let id = harness.add_recurrence(&["--interval", "day", "--offset", "12:00:00"]);

    harness
        .run_success(&["track", &id, "user", "alice"])
        .stdout(predicate::str::contains("Tracking user:alice"));
    harness.run_success(&["track", &id, "user", "bob"]);

    let due = harness.run_json(&["due", &id, "--at", "2024-01-01T13:00:00Z", "--json"]);
    assert_eq!(due.as_array().unwrap().len(), 2);

    harness
        .run_success(&["due", &id, "--at", "2024-01-01T13:00:00Z", "--advance"])
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("Advanced 2 objects"));

    let due = harness.run_json(&["due", &id, "--at", "2024-01-01T13:00:00Z", "--json"]);
    assert!(due.as_array().unwrap().is_empty());

    // Untracked objects passed explicitly are always due
    let due = harness.run_json(&["due", &id, "user:alice", "team:red", "--at", "2024-01-01T13:00:00Z", "--json"]);
    assert_eq!(due.as_array().unwrap().len(), 1);
    assert_eq!(due[0]["object_type"], "team");
    assert_eq!(due[0]["object_id"], "red");

    let due = harness.run_json(&["due", &id, "--at", "2024-01-02T12:00:01Z", "--json"]);
    assert_eq!(due.as_array().unwrap().len(), 2);

    harness
        .run_success(&["untrack", &id, "user", "bob"])
        .stdout(predicate::str::contains("Stopped tracking user:bob"));
    harness
        .run_failure(&["untrack", &id, "user", "bob"])
        .stderr(predicate::str::contains("not tracked"));
}

#[test]
fn test_commands_on_missing_recurrence() {
    let harness = CliTestHarness::new();
    let missing = "01900000-0000-7000-8000-000000000000";

    harness.run_failure(&["show", missing]).stderr(assertions::has_error());
    harness.run_failure(&["next", missing]).stderr(assertions::has_error());
    harness
        .run_failure(&["track", missing, "user", "alice"])
        .stderr(predicate::str::contains("not found"));
}
