// Pick-document adapter: turns loosely-typed JSON pick documents into the
// typed records the scoring engines consume. Unusable entries are dropped
// with a flag; everything salvageable flows through.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::flags::Flag;
use super::teams::normalize;

/// One validated confidence pick, ready for scoring. `team` is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidencePick {
    pub user_id: String,
    pub week: u32,
    pub game_id: String,
    pub team: String,
    pub confidence: u32,
}

/// One validated survivor pick. `team` is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurvivorPick {
    pub user_id: String,
    pub week: u32,
    pub team: String,
}

// ---------------------------------------------------------------------------
// Raw document shapes
// ---------------------------------------------------------------------------

/// Confidence values arrive as numbers in well-formed documents and as
/// strings in older ones. Both are accepted; anything else is malformed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Num(u32),
    Text(String),
}

impl LooseNumber {
    fn as_u32(&self) -> Option<u32> {
        match self {
            LooseNumber::Num(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Raw per-game entry inside a confidence pick document.
#[derive(Debug, Clone, Deserialize)]
struct RawPickEntry {
    #[serde(default, alias = "winner")]
    team: Option<String>,
    #[serde(default)]
    confidence: Option<LooseNumber>,
}

/// Raw confidence pick document: one user, one week, a map of game id to
/// pick entry. `BTreeMap` keeps per-document iteration order stable.
#[derive(Debug, Clone, Deserialize)]
struct RawConfidenceDoc {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    week: u32,
    #[serde(default)]
    picks: BTreeMap<String, RawPickEntry>,
}

/// Raw survivor pick document.
#[derive(Debug, Clone, Deserialize)]
struct RawSurvivorDoc {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    week: u32,
    #[serde(default, alias = "pick")]
    team: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Parse raw confidence documents into typed picks.
///
/// Documents that fail to deserialize, carry no user id, or carry no week
/// are dropped with a [`Flag::MalformedPick`]. Entries missing a team or a
/// usable confidence value are dropped the same way. Duplicate game entries across documents
/// are kept here; [`super::confidence::score_week`] resolves them.
pub fn normalize_confidence_docs(docs: &[Value]) -> (Vec<ConfidencePick>, Vec<Flag>) {
    let mut picks = Vec::new();
    let mut flags = Vec::new();

    for doc in docs {
        let raw: RawConfidenceDoc = match serde_json::from_value(doc.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "unreadable confidence pick document");
                flags.push(Flag::MalformedPick {
                    user_id: doc_user_id(doc),
                    week: doc_week(doc),
                    detail: format!("unreadable document: {e}"),
                });
                continue;
            }
        };
        if raw.user_id.is_empty() {
            flags.push(Flag::MalformedPick {
                user_id: String::new(),
                week: raw.week,
                detail: "document missing user_id".to_string(),
            });
            continue;
        }
        if raw.week == 0 {
            flags.push(Flag::MalformedPick {
                user_id: raw.user_id.clone(),
                week: 0,
                detail: "document missing week".to_string(),
            });
            continue;
        }

        for (game_id, entry) in &raw.picks {
            let team = match entry.team.as_deref().map(str::trim) {
                Some(t) if !t.is_empty() => normalize(t),
                _ => {
                    flags.push(Flag::MalformedPick {
                        user_id: raw.user_id.clone(),
                        week: raw.week,
                        detail: format!("game {game_id}: missing team"),
                    });
                    continue;
                }
            };
            let confidence = match entry.confidence.as_ref().and_then(LooseNumber::as_u32) {
                Some(c) => c,
                None => {
                    flags.push(Flag::MalformedPick {
                        user_id: raw.user_id.clone(),
                        week: raw.week,
                        detail: format!("game {game_id}: missing or non-numeric confidence"),
                    });
                    continue;
                }
            };
            picks.push(ConfidencePick {
                user_id: raw.user_id.clone(),
                week: raw.week,
                game_id: game_id.clone(),
                team,
                confidence,
            });
        }
    }

    (picks, flags)
}

/// Parse raw survivor documents into typed picks.
///
/// Keeps the first document per user-week; later duplicates are dropped
/// with a [`Flag::DuplicateSurvivorPick`]. Documents without a team are
/// dropped as malformed, which downstream treats as no pick for the week.
pub fn normalize_survivor_docs(docs: &[Value]) -> (Vec<SurvivorPick>, Vec<Flag>) {
    let mut picks: Vec<SurvivorPick> = Vec::new();
    let mut flags = Vec::new();

    for doc in docs {
        let raw: RawSurvivorDoc = match serde_json::from_value(doc.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "unreadable survivor pick document");
                flags.push(Flag::MalformedPick {
                    user_id: doc_user_id(doc),
                    week: doc_week(doc),
                    detail: format!("unreadable document: {e}"),
                });
                continue;
            }
        };
        if raw.user_id.is_empty() {
            flags.push(Flag::MalformedPick {
                user_id: String::new(),
                week: raw.week,
                detail: "document missing user_id".to_string(),
            });
            continue;
        }
        if raw.week == 0 {
            flags.push(Flag::MalformedPick {
                user_id: raw.user_id.clone(),
                week: 0,
                detail: "document missing week".to_string(),
            });
            continue;
        }
        if picks
            .iter()
            .any(|p| p.user_id == raw.user_id && p.week == raw.week)
        {
            flags.push(Flag::DuplicateSurvivorPick {
                user_id: raw.user_id.clone(),
                week: raw.week,
            });
            continue;
        }
        let team = match raw.team.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => normalize(t),
            _ => {
                flags.push(Flag::MalformedPick {
                    user_id: raw.user_id.clone(),
                    week: raw.week,
                    detail: "survivor document missing team".to_string(),
                });
                continue;
            }
        };
        picks.push(SurvivorPick {
            user_id: raw.user_id,
            week: raw.week,
            team,
        });
    }

    (picks, flags)
}

fn doc_user_id(doc: &Value) -> String {
    doc.get("user_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn doc_week(doc: &Value) -> u32 {
    doc.get("week").and_then(Value::as_u64).unwrap_or(0) as u32
}
