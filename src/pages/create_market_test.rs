use super::*;

#[test]
fn parse_odds_reads_decimals_and_zeroes_garbage() {
    assert!((parse_odds(" 1.5 ") - 1.5).abs() < f64::EPSILON);
    assert!((parse_odds("abc") - 0.0).abs() < f64::EPSILON);
    assert!((parse_odds("") - 0.0).abs() < f64::EPSILON);
}

#[test]
fn garbage_odds_fail_market_validation() {
    let draft = MarketDraft {
        title: "Rain?".to_owned(),
        expiry_date: "2026-12-31T00:00".to_owned(),
        yes_odds: parse_odds("x"),
        no_odds: parse_odds("2"),
        ..MarketDraft::new()
    };
    assert_eq!(draft.into_request(1).unwrap_err().to_string(), "Odds must be at least 1.1");
}
