use super::*;

#[test]
fn methods_map_one_to_one() {
    assert_eq!(method(Method::Get), reqwest::Method::GET);
    assert_eq!(method(Method::Post), reqwest::Method::POST);
    assert_eq!(method(Method::Put), reqwest::Method::PUT);
    assert_eq!(method(Method::Delete), reqwest::Method::DELETE);
}

#[test]
fn multipart_rejects_bad_content_type() {
    let parts = vec![FormPart::File {
        name: "file".to_owned(),
        file_name: "a.png".to_owned(),
        content_type: "not a mime".to_owned(),
        bytes: vec![1, 2, 3],
    }];
    assert!(matches!(form(parts), Err(ApiError::Network(_))));
}

#[test]
fn navigator_reports_fixed_path_and_never_moves() {
    let nav = TerminalNavigator::at("/signin");
    nav.redirect("/signin");
    assert_eq!(nav.current_path(), "/signin");
}

#[tokio::test(start_paused = true)]
async fn timer_advances_with_sleep() {
    let timer = TokioTimer::default();
    timer.sleep(Duration::from_secs(3)).await;
    assert!(timer.now() >= Duration::from_secs(3));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
    let request = HttpRequest::new(Method::Get, "http://127.0.0.1:9/api/health");
    assert!(matches!(transport.send(request).await, Err(ApiError::Network(_) | ApiError::Timeout)));
}
