//! Opportunity data and the assistant context snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::BackendApi;
use crate::error::{Error, Result};

/// How many raw opportunity records to request when building context.
pub const RAW_OPPORTUNITY_LIMIT: usize = 100;

/// Maximum opportunities carried in a context snapshot.
///
/// Bounds the payload attached to outbound chat requests.
pub const MAX_CONTEXT_OPPORTUNITIES: usize = 5;

/// Maximum multiples carried in a context snapshot.
pub const MAX_CONTEXT_MULTIPLES: usize = 2;

/// A single candidate wager with positive expected value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    /// Fixture name (e.g., "Flamengo x Palmeiras").
    #[serde(rename = "match")]
    pub matchup: String,
    /// Competition name.
    pub competition: String,
    /// Market description (e.g., "Over 2.5").
    pub market: String,
    /// Decimal odds, >= 1.
    pub odds: Decimal,
    /// Expected value as a percentage edge over fair odds.
    pub ev: Decimal,
    /// Estimated probability in [0, 1].
    pub probability: Decimal,
    /// Suggested stake.
    pub stake: Decimal,
    /// Stake times odds.
    pub potential_return: Decimal,
}

/// A combination of opportunity legs into one combined-odds wager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Multiple {
    /// Product of the leg odds.
    pub combined_odds: Decimal,
    /// Optional human-readable summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Leg references, in combination order.
    #[serde(default)]
    pub legs: Vec<String>,
}

/// The opportunity listing as returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityBoard {
    /// Single-bet opportunities, in the backend's order.
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    /// Suggested multiples, in the backend's order.
    #[serde(default)]
    pub multiples: Vec<Multiple>,
}

/// Statistics summary, shared between the context snapshot and the dashboard.
pub use super::dashboard_state::Statistics;

/// The bundle of recent data attached to a chat request when relevant.
///
/// Built once per session load and refreshable on demand; the chat session
/// only ever reads it.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantContext {
    /// Current bankroll.
    pub bankroll: Decimal,
    /// Current phase number.
    pub phase: u32,
    /// Top opportunities, capped at [`MAX_CONTEXT_OPPORTUNITIES`].
    pub opportunities: Vec<Opportunity>,
    /// Top multiples, capped at [`MAX_CONTEXT_MULTIPLES`].
    pub multiples: Vec<Multiple>,
    /// Aggregate statistics.
    pub stats: Statistics,
}

/// Builds the assistant context from the three backend reads.
#[derive(Debug, Clone)]
pub struct ContextAggregator {
    raw_limit: usize,
}

impl Default for ContextAggregator {
    fn default() -> Self {
        Self {
            raw_limit: RAW_OPPORTUNITY_LIMIT,
        }
    }
}

impl ContextAggregator {
    /// Create an aggregator with a custom raw fetch limit.
    pub fn new(raw_limit: usize) -> Self {
        Self { raw_limit }
    }

    /// Fetch opportunities, statistics, and phase concurrently and merge
    /// them into one snapshot.
    ///
    /// The three reads are joined atomically: if any one fails the whole
    /// build fails with [`Error::ContextUnavailable`]. A snapshot with a
    /// missing piece (say, no statistics) would misinform the assistant.
    pub async fn build(&self, api: &dyn BackendApi) -> Result<AssistantContext> {
        let (board, stats, phase) = tokio::try_join!(
            api.get_opportunities(self.raw_limit),
            api.get_statistics(),
            api.get_current_phase(),
        )
        .map_err(|e| Error::context_unavailable(e.to_string()))?;

        // Truncate in source order; ordering policy belongs to the backend.
        let mut opportunities = board.opportunities;
        opportunities.truncate(MAX_CONTEXT_OPPORTUNITIES);
        let mut multiples = board.multiples;
        multiples.truncate(MAX_CONTEXT_MULTIPLES);

        Ok(AssistantContext {
            bankroll: phase.bankroll,
            phase: phase.phase,
            opportunities,
            multiples,
            stats,
        })
    }
}

/// State for the opportunities view.
#[derive(Debug, Default)]
pub struct OpportunityState {
    /// The loaded board.
    pub board: OpportunityBoard,
    /// Currently selected opportunity index.
    pub selected_index: Option<usize>,
    /// Whether the board is currently loading.
    pub loading: bool,
    /// Last update timestamp.
    pub last_updated: Option<DateTime<Utc>>,
}

impl OpportunityState {
    /// Get the currently selected opportunity.
    pub fn selected_opportunity(&self) -> Option<&Opportunity> {
        self.selected_index
            .and_then(|i| self.board.opportunities.get(i))
    }

    /// Number of single opportunities on the board.
    pub fn count(&self) -> usize {
        self.board.opportunities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackendApi;
    use crate::state::dashboard_state::PhaseStatus;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_opportunity(n: usize) -> Opportunity {
        Opportunity {
            matchup: format!("Home {n} x Away {n}"),
            competition: "Serie A".to_string(),
            market: "Over 2.5".to_string(),
            odds: dec!(1.85),
            ev: dec!(6.2),
            probability: dec!(0.58),
            stake: dec!(25.00),
            potential_return: dec!(46.25),
        }
    }

    fn sample_multiple(n: usize) -> Multiple {
        Multiple {
            combined_odds: dec!(3.40),
            description: Some(format!("Dupla {n}")),
            legs: vec![format!("leg-{n}-a"), format!("leg-{n}-b")],
        }
    }

    fn board(opportunities: usize, multiples: usize) -> OpportunityBoard {
        OpportunityBoard {
            opportunities: (0..opportunities).map(sample_opportunity).collect(),
            multiples: (0..multiples).map(sample_multiple).collect(),
        }
    }

    fn phase() -> PhaseStatus {
        PhaseStatus {
            bankroll: dec!(150.00),
            phase: 2,
            target: dec!(300.00),
            progress: dec!(50.0),
        }
    }

    #[tokio::test]
    async fn test_build_truncates_to_caps() {
        let mut api = MockBackendApi::new();
        api.expect_get_opportunities()
            .returning(|_| Ok(board(40, 6)));
        api.expect_get_statistics()
            .returning(|| Ok(Statistics::default()));
        api.expect_get_current_phase().returning(|| Ok(phase()));

        let context = ContextAggregator::default().build(&api).await.unwrap();
        assert_eq!(context.opportunities.len(), MAX_CONTEXT_OPPORTUNITIES);
        assert_eq!(context.multiples.len(), MAX_CONTEXT_MULTIPLES);
        // Source order preserved: the first five survive.
        assert_eq!(context.opportunities[0].matchup, "Home 0 x Away 0");
        assert_eq!(context.opportunities[4].matchup, "Home 4 x Away 4");
        assert_eq!(context.bankroll, dec!(150.00));
        assert_eq!(context.phase, 2);
    }

    #[tokio::test]
    async fn test_build_keeps_short_lists() {
        let mut api = MockBackendApi::new();
        api.expect_get_opportunities().returning(|_| Ok(board(2, 0)));
        api.expect_get_statistics()
            .returning(|| Ok(Statistics::default()));
        api.expect_get_current_phase().returning(|| Ok(phase()));

        let context = ContextAggregator::default().build(&api).await.unwrap();
        assert_eq!(context.opportunities.len(), 2);
        assert!(context.multiples.is_empty());
    }

    #[tokio::test]
    async fn test_build_fails_atomically() {
        let mut api = MockBackendApi::new();
        api.expect_get_opportunities().returning(|_| Ok(board(3, 1)));
        api.expect_get_statistics()
            .returning(|| Err(crate::Error::backend("statistics read failed")));
        api.expect_get_current_phase().returning(|| Ok(phase()));

        let err = ContextAggregator::default().build(&api).await.unwrap_err();
        assert!(matches!(err, crate::Error::ContextUnavailable(_)));
    }

    #[tokio::test]
    async fn test_build_requests_raw_limit() {
        let mut api = MockBackendApi::new();
        api.expect_get_opportunities()
            .withf(|limit| *limit == RAW_OPPORTUNITY_LIMIT)
            .returning(|_| Ok(board(0, 0)));
        api.expect_get_statistics()
            .returning(|| Ok(Statistics::default()));
        api.expect_get_current_phase().returning(|| Ok(phase()));

        ContextAggregator::default().build(&api).await.unwrap();
    }
}
