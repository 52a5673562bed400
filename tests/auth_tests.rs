//! Authentication gate and log viewer, end to end.

use std::time::Duration;

mod common;

const FORM: &str = "application/x-www-form-urlencoded";

#[tokio::test]
async fn auth_form_is_served() {
    let (_root, log_dir) = common::temp_log_dir();
    let server = common::start_server(common::config_for(&log_dir)).await;

    let res = common::client().get(server.url("/auth")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains(r#"action="/authenticate""#));
    assert!(body.contains(r#"name="auth""#));

    server.stop().await;
}

#[tokio::test]
async fn correct_secret_sets_cookie_and_unlocks_logs() {
    let (_root, log_dir) = common::temp_log_dir();
    let server = common::start_server(common::config_for(&log_dir)).await;
    let client = common::client();

    client.get(server.url("/")).header("x-marker", "visible").send().await.unwrap();

    let res = client
        .post(server.url("/authenticate"))
        .form(&[("auth", common::SECRET)])
        .send()
        .await
        .unwrap();
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/logs");

    let cookie = common::auth_cookie(&res).expect("no AUTH cookie set");
    let set_cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=86400"));

    let logs = client
        .get(server.url("/logs"))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(logs.status(), 200);
    let page = logs.text().await.unwrap();
    assert!(page.contains("<h1>Request #1</h1>"));
    assert!(page.contains("visible"));

    server.stop().await;
}

#[tokio::test]
async fn wrong_secret_is_forbidden() {
    let (_root, log_dir) = common::temp_log_dir();
    let server = common::start_server(common::config_for(&log_dir)).await;

    let res = common::client()
        .post(server.url("/authenticate"))
        .form(&[("auth", "guess")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);
    assert!(common::auth_cookie(&res).is_none());
    let body = res.text().await.unwrap();
    assert!(body.contains("Incorrect authentication!"));
    assert!(body.contains(r#"href="/auth""#));

    server.stop().await;
}

#[tokio::test]
async fn logs_without_valid_cookie_redirect_to_form() {
    let (_root, log_dir) = common::temp_log_dir();
    let server = common::start_server(common::config_for(&log_dir)).await;
    let client = common::client();

    client.get(server.url("/")).header("x-marker", "hidden-value").send().await.unwrap();

    for cookie in [None, Some("AUTH=wrong"), Some("OTHER=correct-horse")] {
        let mut req = client.get(server.url("/logs"));
        if let Some(cookie) = cookie {
            req = req.header("cookie", cookie);
        }
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), 302);
        assert_eq!(res.headers()["location"], "/auth");
        assert!(!res.text().await.unwrap().contains("hidden-value"));
    }

    server.stop().await;
}

#[tokio::test]
async fn unset_secret_never_authenticates() {
    let (_root, log_dir) = common::temp_log_dir();
    let mut config = common::config_for(&log_dir);
    config.auth = None;
    let server = common::start_server(config).await;
    let client = common::client();

    for attempt in ["", "correct-horse", "undefined"] {
        let res = client
            .post(server.url("/authenticate"))
            .form(&[("auth", attempt)])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 403);
    }

    let res = client
        .post(server.url("/authenticate"))
        .header("content-type", FORM)
        .body("")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    let res = client
        .get(server.url("/logs"))
        .header("cookie", "AUTH=")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);

    server.stop().await;
}

#[tokio::test]
async fn second_attempt_inside_interval_is_rate_limited() {
    let (_root, log_dir) = common::temp_log_dir();
    let mut config = common::config_for(&log_dir);
    config.authenticate_ratelimit_ms = 5000;
    let server = common::start_server(config).await;
    let client = common::client();

    let first = client
        .post(server.url("/authenticate"))
        .form(&[("auth", "guess")])
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 403);

    // even the right secret is refused while throttled
    let second = client
        .post(server.url("/authenticate"))
        .form(&[("auth", common::SECRET)])
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 429);
    assert!(common::auth_cookie(&second).is_none());
    assert!(second
        .text()
        .await
        .unwrap()
        .contains("Please wait before trying again!"));

    server.stop().await;
}

#[tokio::test]
async fn attempts_after_interval_are_evaluated_independently() {
    let (_root, log_dir) = common::temp_log_dir();
    let mut config = common::config_for(&log_dir);
    config.authenticate_ratelimit_ms = 200;
    let server = common::start_server(config).await;
    let client = common::client();

    let first = client
        .post(server.url("/authenticate"))
        .form(&[("auth", "guess")])
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 403);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let second = client
        .post(server.url("/authenticate"))
        .form(&[("auth", common::SECRET)])
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 302);

    server.stop().await;
}

#[tokio::test]
async fn logged_markup_is_escaped_in_listing() {
    let (_root, log_dir) = common::temp_log_dir();
    let server = common::start_server(common::config_for(&log_dir)).await;
    let client = common::client();

    client
        .post(server.url("/"))
        .form(&[("note", "<script>alert('pwned')</script>")])
        .send()
        .await
        .unwrap();

    let page = client
        .get(server.url("/logs"))
        .header("cookie", format!("AUTH={}", common::SECRET))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(!page.contains("<script>"));
    assert!(page.contains("&lt;script&gt;alert(&#39;pwned&#39;)&lt;/script&gt;"));

    server.stop().await;
}
