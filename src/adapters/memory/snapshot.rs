//! Revenue snapshot loaded from a directory of JSON exports.
//!
//! Expects `accounts.json`, `reps.json`, `deals.json`, `activities.json` and
//! `targets.json`, each a JSON array. Dates may be plain `YYYY-MM-DD` or a
//! full timestamp, which is truncated to its calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::domain::foundation::{AccountId, ActivityId, DealId, RepId, YearMonth};
use crate::domain::revenue::{Account, Activity, Deal, DealStage, MonthlyTarget, Rep};

/// Errors raised while loading a snapshot directory.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Malformed {file}: {reason}")]
    Malformed { file: &'static str, reason: String },
}

/// The immutable data set every view reads from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueSnapshot {
    pub accounts: Vec<Account>,
    pub reps: Vec<Rep>,
    pub deals: Vec<Deal>,
    pub activities: Vec<Activity>,
    pub targets: Vec<MonthlyTarget>,
}

impl RevenueSnapshot {
    /// Loads every export file from `dir`.
    pub async fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SnapshotError> {
        let dir = dir.as_ref();

        let accounts: Vec<Account> = read_array(dir, "accounts.json").await?;
        let reps: Vec<Rep> = read_array(dir, "reps.json").await?;
        let deals = read_array::<DealRow>(dir, "deals.json")
            .await?
            .into_iter()
            .map(Deal::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| SnapshotError::Malformed {
                file: "deals.json",
                reason,
            })?;
        let activities = read_array::<ActivityRow>(dir, "activities.json")
            .await?
            .into_iter()
            .map(Activity::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| SnapshotError::Malformed {
                file: "activities.json",
                reason,
            })?;
        let targets: Vec<MonthlyTarget> = read_array(dir, "targets.json").await?;

        tracing::info!(
            dir = %dir.display(),
            accounts = accounts.len(),
            reps = reps.len(),
            deals = deals.len(),
            activities = activities.len(),
            targets = targets.len(),
            "Loaded revenue snapshot"
        );

        Ok(Self {
            accounts,
            reps,
            deals,
            activities,
            targets,
        })
    }

    /// Target for `month`, 0 when none is recorded.
    pub fn target_for(&self, month: YearMonth) -> f64 {
        self.targets
            .iter()
            .find(|t| t.month == month)
            .map_or(0.0, |t| t.target)
    }
}

async fn read_array<T: DeserializeOwned>(
    dir: &Path,
    file: &'static str,
) -> Result<Vec<T>, SnapshotError> {
    let path = dir.join(file);
    let raw = fs::read_to_string(&path)
        .await
        .map_err(|e| SnapshotError::Io {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    serde_json::from_str(&raw).map_err(|e| SnapshotError::Malformed {
        file,
        reason: e.to_string(),
    })
}

/// Parses `YYYY-MM-DD`, RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS`.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
        .ok_or_else(|| format!("'{}' is not a date", raw))
}

#[derive(Debug, Deserialize)]
struct DealRow {
    deal_id: String,
    account_id: String,
    rep_id: String,
    stage: String,
    amount: Option<f64>,
    created_at: String,
    closed_at: Option<String>,
}

impl TryFrom<DealRow> for Deal {
    type Error = String;

    fn try_from(row: DealRow) -> Result<Self, Self::Error> {
        let context = |e: String| format!("deal {}: {}", row.deal_id, e);
        Ok(Deal {
            stage: row
                .stage
                .parse::<DealStage>()
                .map_err(|e| context(e.to_string()))?,
            created_at: parse_date(&row.created_at).map_err(context)?,
            closed_at: row
                .closed_at
                .as_deref()
                .map(parse_date)
                .transpose()
                .map_err(context)?,
            account_id: AccountId::new(&row.account_id).map_err(|e| context(e.to_string()))?,
            rep_id: RepId::new(&row.rep_id).map_err(|e| context(e.to_string()))?,
            amount: row.amount,
            deal_id: DealId::new(&row.deal_id).map_err(|e| context(e.to_string()))?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ActivityRow {
    activity_id: String,
    deal_id: String,
    #[serde(rename = "type")]
    kind: String,
    timestamp: String,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = String;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let context = |e: String| format!("activity {}: {}", row.activity_id, e);
        Ok(Activity {
            occurred_on: parse_date(&row.timestamp).map_err(context)?,
            deal_id: DealId::new(&row.deal_id).map_err(|e| context(e.to_string()))?,
            activity_id: ActivityId::new(&row.activity_id).map_err(|e| context(e.to_string()))?,
            kind: row.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write(dir: &TempDir, file: &str, body: &str) {
        fs::write(dir.path().join(file), body).await.unwrap();
    }

    async fn write_minimal(dir: &TempDir) {
        write(
            dir,
            "accounts.json",
            r#"[{"account_id":"A1","name":"Acme","industry":"Retail","segment":"Enterprise"}]"#,
        )
        .await;
        write(dir, "reps.json", r#"[{"rep_id":"R1","name":"Dana"}]"#).await;
        write(
            dir,
            "deals.json",
            r#"[
                {"deal_id":"D1","account_id":"A1","rep_id":"R1","stage":"Closed Won",
                 "amount":10000,"created_at":"2025-01-05","closed_at":"2025-02-10T15:30:00Z"},
                {"deal_id":"D2","account_id":"A1","rep_id":"R1","stage":"Prospecting",
                 "amount":null,"created_at":"2025-03-01","closed_at":null}
            ]"#,
        )
        .await;
        write(
            dir,
            "activities.json",
            r#"[{"activity_id":"X1","deal_id":"D2","type":"call","timestamp":"2025-03-02 09:00:00"}]"#,
        )
        .await;
        write(dir, "targets.json", r#"[{"month":"2025-01","target":5000}]"#).await;
    }

    #[tokio::test]
    async fn loads_all_export_files() {
        let dir = TempDir::new().unwrap();
        write_minimal(&dir).await;

        let snapshot = RevenueSnapshot::load_dir(dir.path()).await.unwrap();
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.deals.len(), 2);
        assert_eq!(snapshot.deals[0].stage, DealStage::ClosedWon);
        assert_eq!(
            snapshot.deals[0].closed_at,
            NaiveDate::from_ymd_opt(2025, 2, 10)
        );
        assert_eq!(snapshot.deals[1].amount, None);
        assert_eq!(
            snapshot.activities[0].occurred_on,
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
        assert_eq!(snapshot.target_for("2025-01".parse().unwrap()), 5000.0);
        assert_eq!(snapshot.target_for("2025-02".parse().unwrap()), 0.0);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = RevenueSnapshot::load_dir(dir.path()).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }

    #[tokio::test]
    async fn unknown_stage_is_malformed() {
        let dir = TempDir::new().unwrap();
        write_minimal(&dir).await;
        write(
            &dir,
            "deals.json",
            r#"[{"deal_id":"D9","account_id":"A1","rep_id":"R1","stage":"Won?",
                 "amount":1,"created_at":"2025-01-05","closed_at":null}]"#,
        )
        .await;

        let err = RevenueSnapshot::load_dir(dir.path()).await.unwrap_err();
        match err {
            SnapshotError::Malformed { file, reason } => {
                assert_eq!(file, "deals.json");
                assert!(reason.contains("D9"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_supported_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(parse_date("2025-03-02"), Ok(expected));
        assert_eq!(parse_date("2025-03-02T23:10:00+00:00"), Ok(expected));
        assert_eq!(parse_date("2025-03-02T10:00:00.123"), Ok(expected));
        assert!(parse_date("03/02/2025").is_err());
    }
}
