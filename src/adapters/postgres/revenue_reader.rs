//! PostgreSQL implementation of RevenueReader.
//!
//! `DealFilter` clauses become `WHERE` fragments built with
//! `sqlx::QueryBuilder`, so every value is bound rather than interpolated.
//! Deals are aliased `d` and their (optional) account `a`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashMap;

use crate::domain::foundation::{AccountId, DealId, RepId, YearMonth};
use crate::domain::revenue::{
    AccountActivity, ClosingRule, DateRange, Deal, DealFilter, DealListing, DealOrder,
    DealStage, RepWinLoss, SegmentPerformance, StageAggregate,
};
use crate::ports::{RevenueReadError, RevenueReader};

const DEALS_WITH_ACCOUNT: &str =
    " FROM deals d LEFT JOIN accounts a ON a.account_id = d.account_id";

/// PostgreSQL implementation of RevenueReader.
#[derive(Clone)]
pub struct PostgresRevenueReader {
    pool: PgPool,
}

impl PostgresRevenueReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// `SELECT <select> FROM deals ... WHERE <filter>`.
    fn filtered<'a>(select: &str, filter: &'a DealFilter) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(select).push(DEALS_WITH_ACCOUNT);
        push_filter(&mut qb, filter);
        qb
    }
}

/// Appends `WHERE TRUE AND ...` for each clause of `filter`.
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a DealFilter) {
    qb.push(" WHERE TRUE");

    if let Some(stages) = &filter.stages {
        let labels: Vec<String> = stages.iter().map(|s| s.as_str().to_string()).collect();
        qb.push(" AND d.stage = ANY(").push_bind(labels).push(")");
    }
    if filter.require_amount {
        qb.push(" AND d.amount IS NOT NULL");
    }
    if let Some(date) = filter.open_as_of {
        qb.push(" AND d.created_at <= ")
            .push_bind(date)
            .push(" AND (d.closed_at IS NULL OR d.closed_at > ")
            .push_bind(date)
            .push(")");
    }
    if let Some(closed) = filter.closed_within {
        let DateRange { start, end } = closed.range;
        match closed.rule {
            ClosingRule::RecordedDateOnly => {
                qb.push(" AND d.closed_at BETWEEN ")
                    .push_bind(start)
                    .push(" AND ")
                    .push_bind(end);
            }
            ClosingRule::AllowCreationFallback => {
                qb.push(" AND (d.closed_at BETWEEN ")
                    .push_bind(start)
                    .push(" AND ")
                    .push_bind(end)
                    .push(" OR (d.closed_at IS NULL AND d.stage IN ('Closed Won', 'Closed Lost') AND d.created_at BETWEEN ")
                    .push_bind(start)
                    .push(" AND ")
                    .push_bind(end)
                    .push("))");
            }
        }
    }
    if let Some(age) = filter.older_than {
        qb.push(" AND (")
            .push_bind(age.reference)
            .push("::date - d.created_at) > ")
            .push_bind(age.days);
    }
    if let Some(segment) = &filter.segment {
        qb.push(" AND a.segment = ").push_bind(segment.as_str());
    }
}

fn malformed(e: impl std::fmt::Display) -> RevenueReadError {
    RevenueReadError::MalformedRow(e.to_string())
}

fn stage_of(row: &PgRow) -> Result<DealStage, RevenueReadError> {
    let raw: String = row.try_get("stage")?;
    raw.parse().map_err(malformed)
}

fn count_of(row: &PgRow, column: &str) -> Result<u64, RevenueReadError> {
    let n: i64 = row.try_get(column)?;
    u64::try_from(n).map_err(malformed)
}

fn deal_from_row(row: &PgRow) -> Result<Deal, RevenueReadError> {
    Ok(Deal {
        deal_id: DealId::new(row.try_get::<String, _>("deal_id")?).map_err(malformed)?,
        account_id: AccountId::new(row.try_get::<String, _>("account_id")?).map_err(malformed)?,
        rep_id: RepId::new(row.try_get::<String, _>("rep_id")?).map_err(malformed)?,
        stage: stage_of(row)?,
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
        closed_at: row.try_get("closed_at")?,
    })
}

fn stage_aggregate_from_row(row: &PgRow) -> Result<StageAggregate, RevenueReadError> {
    Ok(StageAggregate {
        stage: stage_of(row)?,
        value: row.try_get("value")?,
        count: count_of(row, "count")?,
    })
}

fn listing_from_row(row: &PgRow) -> Result<DealListing, RevenueReadError> {
    Ok(DealListing {
        deal: deal_from_row(row)?,
        account_name: row.try_get("account_name")?,
    })
}

fn rep_from_row(row: &PgRow) -> Result<RepWinLoss, RevenueReadError> {
    Ok(RepWinLoss {
        rep_id: RepId::new(row.try_get::<String, _>("rep_id")?).map_err(malformed)?,
        rep_name: row.try_get("rep_name")?,
        won: count_of(row, "won")?,
        lost: count_of(row, "lost")?,
    })
}

fn segment_from_row(row: &PgRow) -> Result<SegmentPerformance, RevenueReadError> {
    Ok(SegmentPerformance {
        segment: row.try_get("segment")?,
        open_count: count_of(row, "open_count")?,
        open_value: row.try_get("open_value")?,
        won: count_of(row, "won")?,
        decided: count_of(row, "decided")?,
    })
}

fn account_activity_from_row(row: &PgRow) -> Result<AccountActivity, RevenueReadError> {
    Ok(AccountActivity {
        account_id: AccountId::new(row.try_get::<String, _>("account_id")?).map_err(malformed)?,
        account_name: row.try_get("account_name")?,
        segment: row.try_get("segment")?,
        open_count: count_of(row, "open_count")?,
        open_value: row.try_get("open_value")?,
        last_activity: row.try_get("last_activity")?,
    })
}

#[async_trait]
impl RevenueReader for PostgresRevenueReader {
    async fn sum_deal_amount(&self, filter: &DealFilter) -> Result<f64, RevenueReadError> {
        let mut qb = Self::filtered("COALESCE(SUM(d.amount), 0)::float8", filter);
        let sum: f64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(sum)
    }

    async fn count_deals(&self, filter: &DealFilter) -> Result<u64, RevenueReadError> {
        let mut qb = Self::filtered("COUNT(*)", filter);
        let n: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        u64::try_from(n).map_err(malformed)
    }

    async fn avg_deal_amount(&self, filter: &DealFilter) -> Result<Option<f64>, RevenueReadError> {
        let mut qb = Self::filtered("AVG(d.amount)::float8", filter);
        let avg: Option<f64> = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(avg)
    }

    async fn avg_deal_cycle_days(
        &self,
        filter: &DealFilter,
    ) -> Result<Option<f64>, RevenueReadError> {
        let mut qb = Self::filtered("AVG((d.closed_at - d.created_at)::float8)", filter);
        let avg: Option<f64> = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(avg)
    }

    async fn group_deals_by_stage(
        &self,
        filter: &DealFilter,
    ) -> Result<Vec<StageAggregate>, RevenueReadError> {
        let mut qb = Self::filtered(
            "d.stage, COALESCE(SUM(d.amount), 0)::float8 AS value, COUNT(*) AS count",
            filter,
        );
        qb.push(" GROUP BY d.stage");
        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut groups = rows
            .iter()
            .map(stage_aggregate_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        groups.sort_by_key(|g| g.stage);
        Ok(groups)
    }

    async fn list_deals(
        &self,
        filter: &DealFilter,
        order: DealOrder,
        limit: usize,
    ) -> Result<Vec<DealListing>, RevenueReadError> {
        let mut qb = Self::filtered(
            "d.deal_id, d.account_id, d.rep_id, d.stage, d.amount, d.created_at, d.closed_at, \
             a.name AS account_name",
            filter,
        );
        qb.push(" AND a.account_id IS NOT NULL");
        qb.push(match order {
            DealOrder::AmountDesc => " ORDER BY d.amount DESC NULLS LAST, d.deal_id",
            DealOrder::CreatedAsc => " ORDER BY d.created_at, d.deal_id",
        });
        qb.push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(listing_from_row).collect()
    }

    async fn rep_win_loss_counts(
        &self,
        range: &DateRange,
    ) -> Result<Vec<RepWinLoss>, RevenueReadError> {
        let rows = sqlx::query(
            r#"
            SELECT r.rep_id, r.name AS rep_name,
                   COUNT(*) FILTER (WHERE d.stage = 'Closed Won') AS won,
                   COUNT(*) FILTER (WHERE d.stage = 'Closed Lost') AS lost
            FROM reps r
            JOIN deals d ON d.rep_id = r.rep_id
            WHERE d.stage IN ('Closed Won', 'Closed Lost')
              AND d.closed_at BETWEEN $1 AND $2
            GROUP BY r.rep_id, r.name
            ORDER BY r.rep_id
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(rep_from_row).collect()
    }

    async fn segment_pipeline_and_win_rate(
        &self,
        range: &DateRange,
    ) -> Result<Vec<SegmentPerformance>, RevenueReadError> {
        let rows = sqlx::query(
            r#"
            SELECT a.segment,
                   COUNT(*) FILTER (WHERE d.stage IN ('Prospecting', 'Negotiation')
                       AND d.created_at <= $2
                       AND (d.closed_at IS NULL OR d.closed_at > $2)) AS open_count,
                   COALESCE(SUM(d.amount) FILTER (WHERE d.stage IN ('Prospecting', 'Negotiation')
                       AND d.created_at <= $2
                       AND (d.closed_at IS NULL OR d.closed_at > $2)), 0)::float8 AS open_value,
                   COUNT(*) FILTER (WHERE d.stage = 'Closed Won'
                       AND d.closed_at BETWEEN $1 AND $2) AS won,
                   COUNT(*) FILTER (WHERE d.stage IN ('Closed Won', 'Closed Lost')
                       AND d.closed_at BETWEEN $1 AND $2) AS decided
            FROM accounts a
            JOIN deals d ON d.account_id = a.account_id
            GROUP BY a.segment
            ORDER BY a.segment
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(segment_from_row).collect()
    }

    async fn accounts_with_stale_activity(
        &self,
        open_as_of: NaiveDate,
        activity_window_days: i64,
    ) -> Result<Vec<AccountActivity>, RevenueReadError> {
        let rows = sqlx::query(
            r#"
            WITH open_accounts AS (
                SELECT a.account_id, a.name, a.segment,
                       COUNT(*) AS open_count,
                       COALESCE(SUM(d.amount), 0)::float8 AS open_value
                FROM accounts a
                JOIN deals d ON d.account_id = a.account_id
                WHERE d.stage IN ('Prospecting', 'Negotiation')
                  AND d.created_at <= $1
                  AND (d.closed_at IS NULL OR d.closed_at > $1)
                GROUP BY a.account_id, a.name, a.segment
            ),
            last_touch AS (
                SELECT d.account_id, MAX(act.occurred_at::date) AS last_activity
                FROM activities act
                JOIN deals d ON d.deal_id = act.deal_id
                WHERE act.occurred_at::date <= $1
                GROUP BY d.account_id
            )
            SELECT o.account_id, o.name AS account_name, o.segment,
                   o.open_count, o.open_value, l.last_activity
            FROM open_accounts o
            LEFT JOIN last_touch l ON l.account_id = o.account_id
            WHERE l.last_activity IS NULL
               OR ($1::date - l.last_activity) > $2
            ORDER BY o.open_value DESC, o.account_id
            "#,
        )
        .bind(open_as_of)
        .bind(activity_window_days)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(account_activity_from_row).collect()
    }

    async fn targets_for_months(
        &self,
        months: &[YearMonth],
    ) -> Result<HashMap<YearMonth, f64>, RevenueReadError> {
        let keys: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        let rows = sqlx::query("SELECT month, target FROM targets WHERE month = ANY($1)")
            .bind(keys)
            .fetch_all(&self.pool)
            .await?;

        let mut targets: HashMap<YearMonth, f64> = months.iter().map(|m| (*m, 0.0)).collect();
        for row in &rows {
            let month: YearMonth = row
                .try_get::<String, _>("month")?
                .parse()
                .map_err(malformed)?;
            targets.insert(month, row.try_get("target")?);
        }
        Ok(targets)
    }
}
