use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::models::{LocalizedRecurrence, ObjectRef};
use cadence_core::repository::RecurrenceRepository;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub async fn resolve_recurrence_id(repo: &impl RecurrenceRepository, short_id: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(short_id) {
        return Ok(id);
    }
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    if !short_id.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "'{}' is not an ID: only hexadecimal digits and dashes are allowed.",
            short_id
        ))));
    }
    let recurrences = repo.find_recurrences_by_short_id_prefix(short_id).await?;
    if recurrences.len() == 1 {
        Ok(recurrences[0].id)
    } else if recurrences.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No recurrence found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let candidates: Vec<(String, String)> = recurrences
            .into_iter()
            .map(|r| (r.id.to_string(), format!("{} at {} ({})", r.interval, r.offset, r.timezone)))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(candidates)))
    }
}

/// Resolves a full or short ID and loads the recurrence it names.
pub async fn load_recurrence(repo: &impl RecurrenceRepository, short_id: &str) -> Result<LocalizedRecurrence> {
    let id = resolve_recurrence_id(repo, short_id).await?;
    repo.find_recurrence_by_id(id)
        .await?
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("Recurrence with id {} not found", id))))
}

/// Parses an RFC 3339 timestamp for `--at` arguments.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("'{}' is not an RFC 3339 time: {}", s, e))
}

/// Parses "type:id"; the id may itself contain colons.
pub fn parse_object_ref(s: &str) -> Result<ObjectRef, String> {
    match s.split_once(':') {
        Some((object_type, object_id)) if !object_type.is_empty() && !object_id.is_empty() => {
            Ok(ObjectRef::new(object_type, object_id))
        }
        _ => Err(format!("'{}' is not of the form type:id", s)),
    }
}

/// Shortest prefixes (at least eight hex digits) telling the given ids apart.
///
/// Time-ordered ids created close together share long prefixes, so a fixed
/// width is not enough.
pub fn short_ids(ids: &[Uuid]) -> Vec<String> {
    const MIN_LEN: usize = 8;

    let hex: Vec<String> = ids.iter().map(|id| id.simple().to_string()).collect();
    let mut order: Vec<usize> = (0..hex.len()).collect();
    order.sort_by(|a, b| hex[*a].cmp(&hex[*b]));

    let common = |a: &str, b: &str| a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count();

    let mut lengths = vec![MIN_LEN; hex.len()];
    for pair in order.windows(2) {
        let shared = common(&hex[pair[0]], &hex[pair[1]]);
        for &i in pair {
            lengths[i] = lengths[i].max(shared + 1);
        }
    }

    hex.iter()
        .zip(lengths)
        .map(|(h, len)| h[..len.min(h.len())].to_string())
        .collect()
}
