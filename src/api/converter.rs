//! Data conversion utilities for backend responses.

use crate::state::{WagerRecord, WagerStatus};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// A wager history record as it appears on the wire.
///
/// Status arrives as free text and odds/stake/result may be absent; the
/// converter is the single place those raw shapes are normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWagerRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "match")]
    pub matchup: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub odds: Option<Decimal>,
    #[serde(default)]
    pub stake: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<Decimal>,
}

/// Converts backend responses to internal state types.
pub struct DataConverter;

impl DataConverter {
    /// Convert a raw history record to our internal WagerRecord type.
    pub fn convert_wager(raw: RawWagerRecord) -> WagerRecord {
        WagerRecord {
            timestamp: Self::parse_timestamp(&raw.timestamp),
            matchup: raw.matchup,
            market: raw.market,
            odds: raw.odds,
            stake: raw.stake,
            status: raw
                .status
                .as_deref()
                .map(WagerStatus::from_code)
                .unwrap_or_default(),
            result: raw.result,
        }
    }

    /// Backend timestamps are ISO 8601, with or without a UTC offset.
    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|naive| naive.and_utc())
            })
            .unwrap_or_else(|_| Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn raw(status: &str) -> RawWagerRecord {
        RawWagerRecord {
            timestamp: "2025-06-14T16:00:00".to_string(),
            matchup: "Flamengo x Palmeiras".to_string(),
            market: "Over 2.5".to_string(),
            odds: Some(dec!(1.85)),
            stake: Some(dec!(25.00)),
            status: Some(status.to_string()),
            result: None,
        }
    }

    #[test]
    fn test_convert_known_status() {
        let record = DataConverter::convert_wager(raw("won"));
        assert_eq!(record.status, WagerStatus::Won);
        assert_eq!(record.odds, Some(dec!(1.85)));
    }

    #[test]
    fn test_convert_unknown_status_is_pending() {
        let record = DataConverter::convert_wager(raw("refunded"));
        assert_eq!(record.status, WagerStatus::Pending);
    }

    #[test]
    fn test_convert_missing_status_is_pending() {
        let mut source = raw("won");
        source.status = None;
        let record = DataConverter::convert_wager(source);
        assert_eq!(record.status, WagerStatus::Pending);
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let record = DataConverter::convert_wager(raw("won"));
        assert_eq!(record.timestamp.format("%Y-%m-%d %H:%M").to_string(), "2025-06-14 16:00");
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let mut source = raw("lost");
        source.timestamp = "2025-06-14T16:00:00-03:00".to_string();
        let record = DataConverter::convert_wager(source);
        assert_eq!(record.timestamp.format("%H:%M").to_string(), "19:00");
    }

    #[test]
    fn test_deserialize_wire_record() {
        let json = r#"{
            "timestamp": "2025-06-14T16:00:00",
            "match": "Santos x Grêmio",
            "market": "BTTS (Ambas Marcam)",
            "odds": 1.95,
            "stake": 20.0,
            "phase": 1,
            "status": "pending",
            "result": null
        }"#;
        let raw: RawWagerRecord = serde_json::from_str(json).unwrap();
        let record = DataConverter::convert_wager(raw);
        assert_eq!(record.matchup, "Santos x Grêmio");
        assert_eq!(record.status, WagerStatus::Pending);
        assert_eq!(record.result, None);
    }
}
