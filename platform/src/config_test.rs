use super::*;

#[test]
fn default_points_at_local_backend() {
    let config = ApiConfig::default();
    assert_eq!(config.base_url(), "http://localhost:8080/api");
    assert_eq!(config.timeout(), Duration::from_secs(30));
}

#[test]
fn new_strips_trailing_slashes() {
    let config = ApiConfig::new("https://api.example.com/api//");
    assert_eq!(config.base_url(), "https://api.example.com/api");
}

#[test]
fn blank_base_url_falls_back_to_default() {
    assert_eq!(ApiConfig::new("   ").base_url(), DEFAULT_BASE_URL);
}

#[test]
fn url_joins_with_single_slash() {
    let config = ApiConfig::new("http://host/api/");
    assert_eq!(config.url("/markets/active"), "http://host/api/markets/active");
    assert_eq!(config.url("health"), "http://host/api/health");
}

#[test]
fn url_passes_absolute_urls_through() {
    let config = ApiConfig::default();
    assert_eq!(config.url("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
}

#[test]
fn with_timeout_overrides_default() {
    let config = ApiConfig::default().with_timeout(Duration::from_secs(5));
    assert_eq!(config.timeout(), Duration::from_secs(5));
}
