//! Round artifacts: JSON game logs and CSV trade tapes.
//!
//! For round `n` of a match, [`save_round`] writes into the output
//! directory:
//! - `round_{n}.json`: the full [`GameLog`]
//! - `round_{n}_trades.csv`: one row per trade

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figgie_core::domain::Trade;
use figgie_core::engine::GameLog;

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_round_json(log: &GameLog) -> Result<String> {
    serde_json::to_string_pretty(log).context("failed to serialize GameLog to JSON")
}

/// Parse a round log, rejecting logs that never finished.
pub fn import_round_json(json: &str) -> Result<GameLog> {
    let log: GameLog = serde_json::from_str(json).context("failed to deserialize GameLog from JSON")?;
    if !log.is_complete() {
        bail!("round log has no setup or outcome section");
    }
    Ok(log)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: tick, suit, price, buyer, seller
pub fn export_trades_csv<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["tick", "suit", "price", "buyer", "seller"])?;
    for t in trades {
        wtr.write_record([
            t.tick.to_string().as_str(),
            t.suit.as_str(),
            t.price.to_string().as_str(),
            t.buyer.index().to_string().as_str(),
            t.seller.index().to_string().as_str(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Files ──────────────────────────────────────────────────────────

pub fn round_log_path(output_dir: &Path, round: u32) -> PathBuf {
    output_dir.join(format!("round_{round}.json"))
}

pub fn round_trades_path(output_dir: &Path, round: u32) -> PathBuf {
    output_dir.join(format!("round_{round}_trades.csv"))
}

/// Write both artifacts for one round. Returns the JSON log path.
pub fn save_round(output_dir: &Path, round: u32, log: &GameLog) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let log_path = round_log_path(output_dir, round);
    std::fs::write(&log_path, export_round_json(log)?)
        .with_context(|| format!("failed to write {}", log_path.display()))?;

    let trades_path = round_trades_path(output_dir, round);
    std::fs::write(&trades_path, export_trades_csv(log.trades())?)
        .with_context(|| format!("failed to write {}", trades_path.display()))?;

    Ok(log_path)
}

pub fn load_round(output_dir: &Path, round: u32) -> Result<GameLog> {
    let path = round_log_path(output_dir, round);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_round_json(&json)
}
