//! Display formatting for amounts, odds and addresses.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// `12.5` -> `"12.50 LLL"`.
pub fn lll(amount: f64) -> String {
    format!("{amount:.2} LLL")
}

/// `2.0` -> `"2.00x"`.
pub fn odds(value: f64) -> String {
    format!("{value:.2}x")
}

/// APY as returned by the staking endpoint (`10.0`) or as a fraction (`0.1`).
pub fn percent(value: f64) -> String {
    let pct = if value <= 1.0 { value * 100.0 } else { value };
    format!("{pct:.0}%")
}

/// Shorten long wallet addresses to `head...tail`.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_owned();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Date part of an ISO-8601 timestamp; anything else is returned as is.
pub fn date(timestamp: &str) -> &str {
    timestamp.split_once('T').map_or(timestamp, |(day, _)| day)
}

/// Share of the pool staked on YES, in percent. `None` for an empty pool.
pub fn yes_share(total_yes: f64, total_no: f64) -> Option<f64> {
    let total = total_yes + total_no;
    (total > 0.0).then(|| total_yes / total * 100.0)
}
