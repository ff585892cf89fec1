//! Result normalizer — the trust boundary between model output and the response.
//!
//! Each raw entry is validated into `EntryVerdict::Valid` or `EntryVerdict::Rejected`.
//! References are resolved against the batch; ids echoed by the model are only
//! used to look a posting up, never copied into the output.

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::recommendation::prompts::SlimPosting;
use crate::recommendation::{
    finalize, Recommendation, MAX_MISSING_SKILLS, MAX_REASONS, MAX_SKILL_MATCHES,
};

const INDEX_KEYS: &[&str] = &["index"];
const ID_KEYS: &[&str] = &["internshipId", "internship_id", "id"];
const SCORE_KEYS: &[&str] = &["matchPercentage", "match_percentage"];

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    NotAnObject,
    MissingReference,
    IndexOutOfRange(String),
    UnknownId(String),
    NonNumericScore,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryVerdict {
    Valid(Recommendation),
    Rejected(RejectReason),
}

/// Validates every entry, drops the rejects, then dedups, sorts, and caps.
pub fn normalize(entries: &[Value], batch: &[SlimPosting]) -> Vec<Recommendation> {
    let valid = entries
        .iter()
        .filter_map(|entry| match validate_entry(entry, batch) {
            EntryVerdict::Valid(rec) => Some(rec),
            EntryVerdict::Rejected(reason) => {
                debug!("Dropping model entry: {reason:?}");
                None
            }
        })
        .collect();

    finalize(valid)
}

pub fn validate_entry(entry: &Value, batch: &[SlimPosting]) -> EntryVerdict {
    let Some(obj) = entry.as_object() else {
        return EntryVerdict::Rejected(RejectReason::NotAnObject);
    };

    let posting = match resolve_reference(obj, batch) {
        Ok(posting) => posting,
        Err(reason) => return EntryVerdict::Rejected(reason),
    };

    let Some(score) = first_field(obj, SCORE_KEYS).and_then(Value::as_f64) else {
        return EntryVerdict::Rejected(RejectReason::NonNumericScore);
    };

    EntryVerdict::Valid(Recommendation {
        internship_id: posting.posting_id,
        match_percentage: clamp_percentage(score),
        reasons: string_list(obj.get("reasons"), MAX_REASONS),
        skill_matches: string_list(
            first_field(obj, &["skillMatches", "skill_matches"]),
            MAX_SKILL_MATCHES,
        ),
        missing_skills: string_list(
            first_field(obj, &["missingSkills", "missing_skills"]),
            MAX_MISSING_SKILLS,
        ),
    })
}

/// Prefers the positional index; falls back to an echoed id only when no index was given.
fn resolve_reference<'a>(
    obj: &Map<String, Value>,
    batch: &'a [SlimPosting],
) -> Result<&'a SlimPosting, RejectReason> {
    if let Some(raw) = first_field(obj, INDEX_KEYS) {
        return as_index(raw)
            .and_then(|i| batch.get(i))
            .ok_or_else(|| RejectReason::IndexOutOfRange(raw.to_string()));
    }

    if let Some(raw) = first_field(obj, ID_KEYS) {
        let id = raw.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok());
        return id
            .and_then(|id| batch.iter().find(|p| p.posting_id == id))
            .ok_or_else(|| RejectReason::UnknownId(raw.to_string()));
    }

    Err(RejectReason::MissingReference)
}

fn first_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

/// Accepts non-negative integers, including integral floats like `2.0`.
fn as_index(value: &Value) -> Option<usize> {
    if let Some(i) = value.as_u64() {
        return usize::try_from(i).ok();
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= usize::MAX as f64)
        .map(|f| f as usize)
}

pub fn clamp_percentage(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

/// Keeps non-blank strings only, trimmed, up to `cap` entries.
fn string_list(value: Option<&Value>, cap: usize) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(cap)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
