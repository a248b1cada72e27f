// src/records.rs

use crate::error::{Result, ScrapeError};
use crate::table::{Table, Value};
use serde::Serialize;
use tracing::debug;

/// Column holding the player's full name in every fbref player table.
pub const PLAYER_COLUMN: &str = "player";

/// Column counting matches played in `stats_standard`.
pub const GAMES_COLUMN: &str = "games";

/// Last whitespace-separated token of a name. Single-token names come back
/// unchanged.
pub fn surname(full_name: &str) -> &str {
    full_name.split_whitespace().last().unwrap_or(full_name)
}

/// The record value and everyone holding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResult {
    pub value: Value,
    pub players: Vec<String>,
}

/// "Rows where `predicate_column == predicate_value`, highest `rank_column`".
#[derive(Debug, Clone, Copy)]
pub struct RecordQuery {
    pub label: &'static str,
    pub table_id: &'static str,
    pub predicate_column: &'static str,
    pub predicate_value: i64,
    pub rank_column: &'static str,
}

/// The weekly unwanted records, in report order.
pub const UNWANTED_RECORDS: [RecordQuery; 5] = [
    RecordQuery {
        label: "⚽️Shots without a goal",
        table_id: "stats_shooting",
        predicate_column: "goals",
        predicate_value: 0,
        rank_column: "shots",
    },
    RecordQuery {
        label: "⚽️xG without a goal",
        table_id: "stats_standard",
        predicate_column: "goals",
        predicate_value: 0,
        rank_column: "xg",
    },
    RecordQuery {
        label: "🗝️KPs without an assist",
        table_id: "stats_passing",
        predicate_column: "assists",
        predicate_value: 0,
        rank_column: "assisted_shots",
    },
    RecordQuery {
        label: "🗝️xAG without an assist",
        table_id: "stats_standard",
        predicate_column: "assists",
        predicate_value: 0,
        rank_column: "xg_assist",
    },
    RecordQuery {
        label: "🗝️Accurate passes into the penalty area w/o an assist",
        table_id: "stats_passing",
        predicate_column: "assists",
        predicate_value: 0,
        rank_column: "passes_into_penalty_area",
    },
];

impl RecordQuery {
    pub fn evaluate(&self, table: &Table) -> Result<RecordResult> {
        find_top(
            table,
            self.predicate_column,
            &Value::Int(self.predicate_value),
            self.rank_column,
        )
    }
}

/// Tie-inclusive top-1: the highest `rank_column` among rows whose
/// `predicate_column` equals `predicate_value`, plus the surnames of every
/// such row reaching it (deduplicated, first-seen order).
pub fn find_top(
    table: &Table,
    predicate_column: &str,
    predicate_value: &Value,
    rank_column: &str,
) -> Result<RecordResult> {
    table.require_column(predicate_column)?;
    table.require_column(rank_column)?;
    table.require_column(PLAYER_COLUMN)?;

    let qualifying: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.get(predicate_column) == Some(predicate_value))
        .collect();

    let mut best: Option<&Value> = None;
    for row in &qualifying {
        let Some(v) = row.get(rank_column) else {
            continue;
        };
        let x = v.as_f64().ok_or_else(|| ScrapeError::NonNumericColumn {
            table_id: table.id().to_string(),
            column: rank_column.to_string(),
        })?;
        if x.is_nan() {
            continue;
        }
        if best.and_then(Value::as_f64).map_or(true, |b| x > b) {
            best = Some(v);
        }
    }

    let Some(best) = best else {
        return Err(ScrapeError::EmptyResult {
            table_id: table.id().to_string(),
            what: format!("max {rank_column} where {predicate_column} == {predicate_value}"),
        });
    };

    let mut players: Vec<String> = Vec::new();
    for row in qualifying.iter().filter(|r| r.get(rank_column) == Some(best)) {
        let name = row
            .get(PLAYER_COLUMN)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let name = surname(&name).to_string();
        if !players.contains(&name) {
            players.push(name);
        }
    }

    debug!(
        table_id = table.id(),
        rank_column,
        value = %best,
        holders = players.len(),
        "record found"
    );
    Ok(RecordResult {
        value: best.clone(),
        players,
    })
}

/// Current matchweek: the most games anyone in `stats_standard` has played.
pub fn matchweek(standard: &Table) -> Result<Value> {
    match standard.max_of(GAMES_COLUMN)? {
        Some(max) => Ok(standard
            .column(GAMES_COLUMN)?
            .find(|v| v.as_f64() == Some(max))
            .cloned()
            .unwrap_or(Value::Float(max))),
        None => Err(ScrapeError::EmptyResult {
            table_id: standard.id().to_string(),
            what: format!("max {GAMES_COLUMN}"),
        }),
    }
}
