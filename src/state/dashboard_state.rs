//! Dashboard data: statistics, phase progress, and wager history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::BackendApi;
use crate::error::{Error, Result};

/// Placeholder rendered for absent odds/stake values.
pub const MISSING_FIELD: &str = "—";

/// Outcome of a settled or open wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerStatus {
    Won,
    Lost,
    #[default]
    Pending,
    Void,
}

impl WagerStatus {
    /// Parse a raw status code.
    ///
    /// Unrecognized codes fall back to `Pending` rather than erroring, so a
    /// stray code from the backend can never break rendering.
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "won" => Self::Won,
            "lost" => Self::Lost,
            "void" => Self::Void,
            _ => Self::Pending,
        }
    }

    /// Fixed display mapping for this status.
    pub fn badge(&self) -> StatusBadge {
        match self {
            Self::Won => StatusBadge {
                label: "Vitória",
                severity: Severity::Success,
                glyph: "✅",
            },
            Self::Lost => StatusBadge {
                label: "Derrota",
                severity: Severity::Error,
                glyph: "❌",
            },
            Self::Pending => StatusBadge {
                label: "Pendente",
                severity: Severity::Warning,
                glyph: "⏳",
            },
            Self::Void => StatusBadge {
                label: "Anulada",
                severity: Severity::Neutral,
                glyph: "⚪",
            },
        }
    }
}

impl std::fmt::Display for WagerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
            Self::Pending => write!(f, "pending"),
            Self::Void => write!(f, "void"),
        }
    }
}

/// Display severity of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Neutral,
}

/// Display category for a wager status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    /// User-facing label.
    pub label: &'static str,
    /// Severity for styling.
    pub severity: Severity,
    /// Glyph prefix.
    pub glyph: &'static str,
}

/// Aggregate betting statistics.
///
/// The backend spells `profit` as `total_profit` and `wins` as `won` in some
/// responses; both spellings are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Net profit (signed).
    #[serde(alias = "total_profit")]
    pub profit: Decimal,
    /// Return on investment as a signed percentage.
    pub roi: Decimal,
    /// Win rate in [0, 100].
    pub win_rate: Decimal,
    /// Number of winning bets.
    #[serde(alias = "won")]
    pub wins: u32,
    /// Number of settled bets.
    pub total_bets: u32,
    /// Total amount staked.
    pub total_staked: Decimal,
    /// Average odds across settled bets.
    pub avg_odds: Decimal,
    /// Average stake across settled bets.
    pub avg_stake: Decimal,
}

/// Current phase of the bankroll progression plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseStatus {
    /// Current bankroll.
    pub bankroll: Decimal,
    /// Phase number, starting at 1.
    pub phase: u32,
    /// Bankroll target for this phase.
    pub target: Decimal,
    /// Percent completion toward the target, in [0, 100].
    pub progress: Decimal,
}

impl Default for PhaseStatus {
    fn default() -> Self {
        Self {
            bankroll: Decimal::ZERO,
            phase: 1,
            target: Decimal::ZERO,
            progress: Decimal::ZERO,
        }
    }
}

/// A historical wager as sourced from the backend. Read-only; the client
/// never mutates records.
#[derive(Debug, Clone)]
pub struct WagerRecord {
    /// When the wager was placed.
    pub timestamp: DateTime<Utc>,
    /// Fixture name.
    pub matchup: String,
    /// Market description.
    pub market: String,
    /// Decimal odds, when known.
    pub odds: Option<Decimal>,
    /// Stake, when known.
    pub stake: Option<Decimal>,
    /// Outcome status.
    pub status: WagerStatus,
    /// Settled result (signed), null while pending.
    pub result: Option<Decimal>,
}

/// Sign of the profit figure. Zero counts as positive; callers that render
/// the sign must replicate this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitSign {
    Positive,
    Negative,
}

/// A display-ready history row derived from a [`WagerRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerRow {
    /// Day/month date label.
    pub date: String,
    /// Fixture name.
    pub matchup: String,
    /// Market description.
    pub market: String,
    /// Formatted odds, or a placeholder when absent.
    pub odds: String,
    /// Formatted stake, or a placeholder when absent.
    pub stake: String,
    /// Status badge.
    pub badge: StatusBadge,
    /// Settled result. `None` means "not yet settled" and renders as a
    /// placeholder; `Some(0)` is a real settled-at-zero outcome.
    pub result: Option<Decimal>,
}

impl WagerRow {
    /// Derive display fields without mutating the source record.
    pub fn from_record(record: &WagerRecord) -> Self {
        // A pending wager has no result by definition; suppress any stray
        // value the raw source carries.
        let result = match record.status {
            WagerStatus::Pending => None,
            _ => record.result,
        };

        Self {
            date: record.timestamp.format("%d/%m").to_string(),
            matchup: record.matchup.clone(),
            market: record.market.clone(),
            odds: record
                .odds
                .map(|o| format!("{o:.2}"))
                .unwrap_or_else(|| MISSING_FIELD.to_string()),
            stake: record
                .stake
                .map(|s| format!("R$ {s:.2}"))
                .unwrap_or_else(|| MISSING_FIELD.to_string()),
            badge: record.status.badge(),
            result,
        }
    }
}

/// Display-ready dashboard aggregates.
#[derive(Debug, Clone, Default)]
pub struct DashboardModel {
    /// Aggregate statistics.
    pub stats: Statistics,
    /// Recent wagers, most recent first, as retrieved.
    pub records: Vec<WagerRecord>,
    /// Current phase status.
    pub phase: PhaseStatus,
}

impl DashboardModel {
    /// Sign of the profit figure; zero is positive.
    pub fn profit_sign(&self) -> ProfitSign {
        if self.stats.profit >= Decimal::ZERO {
            ProfitSign::Positive
        } else {
            ProfitSign::Negative
        }
    }

    /// All history rows, in retrieval order.
    pub fn rows(&self) -> Vec<WagerRow> {
        self.records.iter().map(WagerRow::from_record).collect()
    }

    /// History rows truncated to a display count.
    ///
    /// This knob is independent of the retrieval limit: the same underlying
    /// sequence backs a 5-row compact table and a 10-row full one.
    pub fn visible_rows(&self, count: usize) -> Vec<WagerRow> {
        self.records
            .iter()
            .take(count)
            .map(WagerRow::from_record)
            .collect()
    }
}

/// Loads the dashboard model from the three backend reads.
#[derive(Debug, Clone)]
pub struct DashboardViewModel {
    history_limit: usize,
}

impl DashboardViewModel {
    /// Create a loader that retrieves up to `history_limit` recent wagers.
    pub fn new(history_limit: usize) -> Self {
        Self { history_limit }
    }

    /// Fetch statistics, history, and phase concurrently.
    ///
    /// Joined atomically: any single failure becomes
    /// [`Error::DashboardUnavailable`] and no partial model is produced.
    pub async fn load(&self, api: &dyn BackendApi) -> Result<DashboardModel> {
        let (stats, records, phase) = tokio::try_join!(
            api.get_statistics(),
            api.get_history(self.history_limit),
            api.get_current_phase(),
        )
        .map_err(|e| Error::dashboard_unavailable(e.to_string()))?;

        Ok(DashboardModel {
            stats,
            records,
            phase,
        })
    }
}

/// State for the dashboard view.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// The loaded model, absent until the first successful load.
    pub model: Option<DashboardModel>,
    /// Whether the dashboard is currently loading.
    pub loading: bool,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackendApi;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn record(status: WagerStatus, result: Option<Decimal>) -> WagerRecord {
        WagerRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 6, 14, 16, 0, 0).unwrap(),
            matchup: "Flamengo x Palmeiras".to_string(),
            market: "Over 2.5".to_string(),
            odds: Some(dec!(1.85)),
            stake: Some(dec!(25.00)),
            status,
            result,
        }
    }

    #[test]
    fn test_classify_known_codes() {
        assert_eq!(WagerStatus::from_code("won"), WagerStatus::Won);
        assert_eq!(WagerStatus::from_code("lost"), WagerStatus::Lost);
        assert_eq!(WagerStatus::from_code("pending"), WagerStatus::Pending);
        assert_eq!(WagerStatus::from_code("void"), WagerStatus::Void);
        assert_eq!(WagerStatus::from_code("WON"), WagerStatus::Won);
    }

    #[test]
    fn test_classify_unknown_falls_back_to_pending() {
        assert_eq!(
            WagerStatus::from_code("refunded"),
            WagerStatus::from_code("pending")
        );
        assert_eq!(WagerStatus::from_code(""), WagerStatus::Pending);
        assert_eq!(WagerStatus::from_code("cashout"), WagerStatus::Pending);
    }

    #[test]
    fn test_badge_mapping() {
        let badge = WagerStatus::Won.badge();
        assert_eq!(badge.label, "Vitória");
        assert_eq!(badge.severity, Severity::Success);
        assert_eq!(badge.glyph, "✅");

        assert_eq!(WagerStatus::Lost.badge().severity, Severity::Error);
        assert_eq!(WagerStatus::Pending.badge().severity, Severity::Warning);
        assert_eq!(WagerStatus::Void.badge().severity, Severity::Neutral);
    }

    #[test]
    fn test_profit_sign_boundary() {
        let mut model = DashboardModel::default();
        model.stats.profit = dec!(-10.5);
        assert_eq!(model.profit_sign(), ProfitSign::Negative);

        model.stats.profit = Decimal::ZERO;
        assert_eq!(model.profit_sign(), ProfitSign::Positive);

        model.stats.profit = dec!(0.01);
        assert_eq!(model.profit_sign(), ProfitSign::Positive);
    }

    #[test]
    fn test_row_suppresses_result_for_pending() {
        // A stray result on a pending record never leaks into the row.
        let row = WagerRow::from_record(&record(WagerStatus::Pending, Some(dec!(12.00))));
        assert_eq!(row.result, None);
    }

    #[test]
    fn test_row_keeps_settled_zero_result() {
        let row = WagerRow::from_record(&record(WagerStatus::Void, Some(Decimal::ZERO)));
        assert_eq!(row.result, Some(Decimal::ZERO));
    }

    #[test]
    fn test_row_placeholders_for_missing_fields() {
        let mut source = record(WagerStatus::Won, Some(dec!(21.25)));
        source.odds = None;
        source.stake = None;

        let row = WagerRow::from_record(&source);
        assert_eq!(row.odds, MISSING_FIELD);
        assert_eq!(row.stake, MISSING_FIELD);
        assert_eq!(row.result, Some(dec!(21.25)));
        assert_eq!(row.date, "14/06");
    }

    #[test]
    fn test_visible_rows_is_independent_truncation() {
        let model = DashboardModel {
            records: (0..10)
                .map(|_| record(WagerStatus::Won, Some(dec!(5.00))))
                .collect(),
            ..Default::default()
        };
        assert_eq!(model.rows().len(), 10);
        assert_eq!(model.visible_rows(5).len(), 5);
        assert_eq!(model.visible_rows(25).len(), 10);
    }

    #[tokio::test]
    async fn test_load_joins_three_sources() {
        let mut api = MockBackendApi::new();
        api.expect_get_statistics().returning(|| {
            Ok(Statistics {
                profit: dec!(-10.5),
                roi: dec!(-4.2),
                win_rate: dec!(48.0),
                ..Default::default()
            })
        });
        api.expect_get_history()
            .withf(|limit| *limit == 10)
            .returning(|_| Ok(vec![record(WagerStatus::Lost, Some(dec!(-25.00)))]));
        api.expect_get_current_phase()
            .returning(|| Ok(PhaseStatus::default()));

        let model = DashboardViewModel::new(10).load(&api).await.unwrap();
        assert_eq!(model.profit_sign(), ProfitSign::Negative);
        // Source sign/scale pass through unclamped.
        assert_eq!(model.stats.roi, dec!(-4.2));
        assert_eq!(model.stats.win_rate, dec!(48.0));
        assert_eq!(model.records.len(), 1);
    }

    #[tokio::test]
    async fn test_load_fails_atomically() {
        let mut api = MockBackendApi::new();
        api.expect_get_statistics()
            .returning(|| Ok(Statistics::default()));
        api.expect_get_history()
            .returning(|_| Err(crate::Error::backend("history read failed")));
        api.expect_get_current_phase()
            .returning(|| Ok(PhaseStatus::default()));

        let err = DashboardViewModel::new(10).load(&api).await.unwrap_err();
        assert!(matches!(err, crate::Error::DashboardUnavailable(_)));
    }
}
