use cadence_core::models::{unscheduled, LocalizedRecurrence, ObjectRef, TrackedObjectSchedule};
use cadence_core::timezone::{format_with_timezone, get_timezone_abbreviation, get_timezone_offset};
use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

use crate::util::short_ids;

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// A schedule in the recurrence's own zone, or "-" before the first update.
fn local_cell(at: DateTime<Utc>, timezone: &str) -> Cell {
    if at == unscheduled() {
        return Cell::new("-").fg(Color::DarkGrey);
    }
    let text = format_with_timezone(at, timezone, LOCAL_FORMAT).unwrap_or_else(|_| at.to_rfc3339());
    Cell::new(text)
}

fn relative_cell(at: DateTime<Utc>, now: DateTime<Utc>) -> Cell {
    if at == unscheduled() {
        return Cell::new("not scheduled").fg(Color::Yellow);
    }
    let cell = Cell::new(at.humanize());
    if at < now {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

pub fn display_recurrences(recurrences: &[LocalizedRecurrence], now: DateTime<Utc>) {
    if recurrences.is_empty() {
        println!("No recurrences found.");
        return;
    }

    let ids: Vec<_> = recurrences.iter().map(|r| r.id).collect();
    let short = short_ids(&ids);

    let mut table = Table::new();
    table.set_header(vec!["ID", "Interval", "Offset", "Timezone", "Next (local)", "Due"]);

    for (recurrence, id) in recurrences.iter().zip(short) {
        let mut row = Row::new();
        row.add_cell(Cell::new(id));
        row.add_cell(Cell::new(recurrence.interval));
        row.add_cell(Cell::new(recurrence.offset));
        row.add_cell(Cell::new(&recurrence.timezone));
        row.add_cell(local_cell(recurrence.next_scheduled, &recurrence.timezone));
        row.add_cell(relative_cell(recurrence.next_scheduled, now));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_recurrence_detail(recurrence: &LocalizedRecurrence, tracked: &[TrackedObjectSchedule], now: DateTime<Utc>) {
    let zone_now = match (
        get_timezone_abbreviation(&recurrence.timezone, now),
        get_timezone_offset(&recurrence.timezone, now),
    ) {
        (Ok(abbreviation), Ok(offset)) => format!("{} ({}, UTC{})", recurrence.timezone, abbreviation, offset),
        _ => recurrence.timezone.clone(),
    };

    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID").add_attribute(Attribute::Bold), Cell::new(recurrence.id)]);
    table.add_row(vec![Cell::new("Interval").add_attribute(Attribute::Bold), Cell::new(recurrence.interval)]);
    table.add_row(vec![Cell::new("Offset").add_attribute(Attribute::Bold), Cell::new(recurrence.offset)]);
    table.add_row(vec![Cell::new("Timezone").add_attribute(Attribute::Bold), Cell::new(zone_now)]);
    table.add_row(vec![
        Cell::new("Previous").add_attribute(Attribute::Bold),
        local_cell(recurrence.previous_scheduled, &recurrence.timezone),
    ]);
    table.add_row(vec![
        Cell::new("Next").add_attribute(Attribute::Bold),
        local_cell(recurrence.next_scheduled, &recurrence.timezone),
    ]);
    table.add_row(vec![
        Cell::new("Due").add_attribute(Attribute::Bold),
        relative_cell(recurrence.next_scheduled, now),
    ]);
    table.add_row(vec![
        Cell::new("Tracked objects").add_attribute(Attribute::Bold),
        Cell::new(tracked.len()),
    ]);
    table.add_row(vec![
        Cell::new("Created").add_attribute(Attribute::Bold),
        Cell::new(recurrence.created_at.humanize()),
    ]);
    println!("{table}");
}

/// Upcoming schedules in both the recurrence's zone and UTC
pub fn display_schedules(schedules: &[DateTime<Utc>], timezone: &str) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Local", "UTC"]);
    for (i, at) in schedules.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            local_cell(*at, timezone),
            Cell::new(at.to_rfc3339()),
        ]);
    }
    println!("{table}");
}

pub fn display_due_objects(due: &[ObjectRef], tracked: &[TrackedObjectSchedule], timezone: &str) {
    if due.is_empty() {
        println!("No objects are due.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Type", "Object", "Last scheduled"]);
    for object in due {
        let previous = tracked
            .iter()
            .find(|s| s.object_type == object.object_type && s.object_id == object.object_id)
            .map_or_else(
                || Cell::new("untracked").fg(Color::Yellow),
                |s| local_cell(s.previous_scheduled, timezone),
            );
        table.add_row(vec![Cell::new(&object.object_type), Cell::new(&object.object_id), previous]);
    }
    println!("{table}");
}
