//! Journal pipeline integration: samples -> features -> summary -> ranking.

use chrono::{NaiveDate, NaiveTime};
use killzone_core::domain::{Direction, LevelKind, TradeSample};
use killzone_core::journal::{extract_features, nearest_neighbors, summarize};

fn sample(
    id: &str,
    hour: u32,
    direction: Direction,
    entry: f64,
    sl: f64,
    tp: f64,
    atr: Option<f64>,
    result_r: Option<f64>,
) -> TradeSample {
    TradeSample {
        trade_id: id.into(),
        symbol: "XAUUSD".into(),
        timeframe_min: 5,
        executed_at_local: NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, 30, 0).unwrap()),
        direction,
        psych_step: Some(10.0),
        psych_level: Some(2040.0),
        level_kind: Some(LevelKind::Support),
        touched_level: Some(true),
        rejection: Some(true),
        confirmation: Some(false),
        entry,
        sl,
        tp,
        atr14: atr,
        result_r,
        notes: None,
    }
}

#[test]
fn full_pipeline_ranks_similar_session_trades_first() {
    let trades = vec![
        sample("target", 23, Direction::Buy, 2042.0, 2030.0, 2066.0, Some(16.0), None),
        // Same session hour and geometry: the obvious nearest neighbor.
        sample("twin", 23, Direction::Buy, 2042.0, 2030.0, 2066.0, Some(16.0), Some(2.0)),
        // Same geometry, opposite direction.
        sample("flipped", 23, Direction::Sell, 2042.0, 2054.0, 2018.0, Some(16.0), Some(-1.0)),
        // Afternoon trade, wide stop.
        sample("afternoon", 15, Direction::Buy, 2042.0, 2010.0, 2106.0, Some(16.0), Some(1.0)),
        // Broken row: must be skipped, not ranked.
        sample("broken", 23, Direction::Buy, 2042.0, 0.0, 2066.0, None, None),
    ];

    let extraction = extract_features(&trades, 10.0);
    assert_eq!(extraction.skipped, 1);
    assert_eq!(extraction.features.len(), 4);

    let neighbors = nearest_neighbors(&extraction.features, "target", 3, None);
    assert_eq!(neighbors.len(), 3);
    assert_eq!(neighbors[0].trade_id, "twin");
    assert_eq!(neighbors[0].distance, 0.0);
    // Direction flip costs less than an hour shift plus resized bracket.
    assert_eq!(neighbors[1].trade_id, "flipped");
    assert!(neighbors[1].distance < neighbors[2].distance);
}

#[test]
fn summary_counts_match_journal() {
    let trades = vec![
        sample("a", 23, Direction::Buy, 2042.0, 2030.0, 2066.0, Some(16.0), Some(2.0)),
        sample("b", 0, Direction::Sell, 2042.0, 2054.0, 2018.0, Some(16.0), Some(-1.0)),
        sample("c", 3, Direction::Buy, 2042.0, 2030.0, 2054.0, None, None),
    ];
    let extraction = extract_features(&trades, 10.0);
    let summary = summarize(&extraction.features);

    assert_eq!(summary.n, 3);
    assert_eq!(summary.wins, 1);
    assert_eq!(summary.losses, 1);
    assert_eq!(summary.winrate, Some(0.5));
    assert_eq!(summary.result_r_mean, Some(0.5));
    // rr: a = 2, b = 2, c = 1 -> median 2.
    assert_eq!(summary.rr_median, Some(2.0));
}

#[test]
fn ranking_serializes_to_plain_pairs() {
    let trades = vec![
        sample("a", 23, Direction::Buy, 2042.0, 2030.0, 2066.0, None, None),
        sample("b", 23, Direction::Buy, 2042.0, 2031.0, 2066.0, None, None),
    ];
    let extraction = extract_features(&trades, 10.0);
    let neighbors = nearest_neighbors(&extraction.features, "a", 8, None);
    let json = serde_json::to_value(&neighbors).unwrap();
    assert_eq!(json[0]["trade_id"], "b");
    assert!(json[0]["distance"].is_number());
}
