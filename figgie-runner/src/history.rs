//! Match history: JSONL append-only persistence.
//!
//! One JSON object per finished match. The file survives partial writes:
//! a torn last line is skipped on read.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use figgie_core::domain::Money;
use serde::{Deserialize, Serialize};

use crate::bots::PolicyKind;
use crate::config::{MatchConfig, MatchId};
use crate::runner::MatchSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub match_id: MatchId,
    pub started_at: DateTime<Utc>,
    pub seed: u64,
    pub rounds: u32,
    pub players: Vec<String>,
    pub policies: Vec<PolicyKind>,
    pub total_scores: Vec<Money>,
    pub round_wins: Vec<u32>,
    pub draws: u32,
}

impl HistoryEntry {
    pub fn new(config: &MatchConfig, summary: &MatchSummary) -> Self {
        Self {
            match_id: summary.match_id.clone(),
            started_at: summary.started_at,
            seed: summary.seed,
            rounds: summary.rounds.len() as u32,
            players: summary.players.clone(),
            policies: config.players.iter().map(|p| p.policy).collect(),
            total_scores: summary.total_scores.clone(),
            round_wins: summary.round_wins.clone(),
            draws: summary.draws,
        }
    }
}

/// JSONL history file manager.
pub struct MatchHistory {
    path: PathBuf,
}

impl MatchHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(&self, entry: &HistoryEntry) -> io::Result<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()
    }

    /// Read every entry; malformed lines are skipped.
    pub fn read_all(&self) -> io::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = io::BufReader::new(fs::File::open(&self.path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(entry) = serde_json::from_str::<HistoryEntry>(&line) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Per-policy aggregate over many matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySummary {
    /// Seats played, counting a policy once per seat per match.
    pub seats: usize,
    pub rounds_played: u32,
    pub rounds_won: u32,
    pub total_score: Money,
    pub mean_score_per_round: f64,
}

/// Group history entries by policy.
pub fn summary_by_policy(entries: &[HistoryEntry]) -> BTreeMap<String, PolicySummary> {
    let mut out: BTreeMap<String, PolicySummary> = BTreeMap::new();
    for entry in entries {
        for (seat, policy) in entry.policies.iter().enumerate() {
            let summary = out.entry(policy.to_string()).or_default();
            summary.seats += 1;
            summary.rounds_played += entry.rounds;
            summary.rounds_won += entry.round_wins.get(seat).copied().unwrap_or(0);
            summary.total_score += entry.total_scores.get(seat).copied().unwrap_or(0);
        }
    }
    for summary in out.values_mut() {
        if summary.rounds_played > 0 {
            summary.mean_score_per_round = summary.total_score as f64 / f64::from(summary.rounds_played);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, policies: Vec<PolicyKind>, totals: Vec<Money>, wins: Vec<u32>) -> HistoryEntry {
        HistoryEntry {
            match_id: id.to_string(),
            started_at: Utc::now(),
            seed: 1,
            rounds: 10,
            players: (1..=policies.len()).map(|i| format!("Bot_{i}")).collect(),
            policies,
            total_scores: totals,
            round_wins: wins,
            draws: 0,
        }
    }

    #[test]
    fn append_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let history = MatchHistory::new(dir.path().join("nested").join("history.jsonl"));
        assert!(history.read_all().unwrap().is_empty());

        let first = entry("a", vec![PolicyKind::Starter; 4], vec![30, -10, -10, -10], vec![7, 1, 1, 1]);
        let second = entry("b", vec![PolicyKind::Passive; 4], vec![0; 4], vec![0; 4]);
        history.append(&first).unwrap();
        history.append(&second).unwrap();

        let entries = history.read_all().unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let history = MatchHistory::new(path.clone());
        history
            .append(&entry("a", vec![PolicyKind::Random; 5], vec![0; 5], vec![2; 5]))
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"match_id\": \"torn").unwrap();

        assert_eq!(history.read_all().unwrap().len(), 1);
    }

    #[test]
    fn policies_are_aggregated_across_seats() {
        let entries = vec![entry(
            "a",
            vec![PolicyKind::Starter, PolicyKind::Passive, PolicyKind::Starter, PolicyKind::Random],
            vec![40, -60, 30, -10],
            vec![5, 0, 4, 1],
        )];
        let summary = summary_by_policy(&entries);
        let starter = &summary["starter"];
        assert_eq!(starter.seats, 2);
        assert_eq!(starter.rounds_played, 20);
        assert_eq!(starter.rounds_won, 9);
        assert_eq!(starter.total_score, 70);
        assert!((starter.mean_score_per_round - 3.5).abs() < 1e-9);
        assert_eq!(summary["passive"].total_score, -60);
    }
}
