//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! crawl-and-check sessions end-to-end.

use linkwatch::config::{Config, ScopeMatch};
use linkwatch::crawler::{handle_start_check, CheckRequest, Coordinator};
use linkwatch::output::{AuditLog, BadLink, ChannelSink, CrawlEvent, ReportedStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_expecting(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(hits)
        .mount(server)
        .await;
}

fn test_coordinator(config: Config) -> (Coordinator, UnboundedReceiver<CrawlEvent>) {
    let (sink, rx) = ChannelSink::new();
    let coordinator = Coordinator::new(
        config,
        Arc::new(sink),
        AuditLog::from_writer(std::io::sink()),
    )
    .expect("Failed to create coordinator");
    (coordinator, rx)
}

fn drain(rx: &mut UnboundedReceiver<CrawlEvent>) -> Vec<CrawlEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn bad_links(events: &[CrawlEvent]) -> Vec<&BadLink> {
    events
        .iter()
        .filter_map(|e| match e {
            CrawlEvent::Non200Link(bad) => Some(bad),
            _ => None,
        })
        .collect()
}

fn assert_single_completion_last(events: &[CrawlEvent]) {
    let completions = events
        .iter()
        .filter(|e| matches!(e, CrawlEvent::CheckComplete { .. }))
        .count();
    assert_eq!(completions, 1, "expected exactly one completion: {:?}", events);
    assert!(matches!(events.last(), Some(CrawlEvent::CheckComplete { .. })));
}

#[tokio::test]
async fn test_broken_same_site_link_reported() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/", html(r#"<html><body><a href="/p2">Page 2</a></body></html>"#)).await;
    // Checked once as a link, then fetched once as a page
    mount_expecting(&server, "/p2", ResponseTemplate::new(404), 2).await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    let report = coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    assert_eq!(events.len(), 2, "unexpected events: {:?}", events);
    assert_eq!(
        events[0],
        CrawlEvent::Non200Link(BadLink {
            page_url: format!("{}/", base),
            link: format!("{}/p2", base),
            status_code: ReportedStatus::Code(404),
        })
    );
    assert_single_completion_last(&events);

    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.pages_discarded, 1);
    assert_eq!(report.links_checked, 1);
    assert_eq!(report.bad_links, 1);
}

#[tokio::test]
async fn test_onclick_navigation_treated_as_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html(r#"<html><body><div onclick="window.location.href='/go'">Go</div></body></html>"#),
    )
    .await;
    mount(&server, "/go", ResponseTemplate::new(500)).await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    let bad = bad_links(&events);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].link, format!("{}/go", base));
    assert_eq!(bad[0].page_url, format!("{}/", base));
    assert_eq!(bad[0].status_code, ReportedStatus::Code(500));
    assert_single_completion_last(&events);
}

#[tokio::test]
async fn test_page_fetch_timeout_discarded_without_event() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html(r#"<a href="/slow">Slow</a><a href="/next">Next</a>"#),
    )
    .await;
    // Answers within the link timeout but not within the page timeout
    mount(
        &server,
        "/slow",
        html("<p>slow</p>").set_delay(Duration::from_secs(2)),
    )
    .await;
    mount(&server, "/next", html("<p>next</p>")).await;

    let mut config = Config::default();
    config.crawler.page_timeout_secs = 1;
    config.crawler.link_timeout_secs = 5;

    let (coordinator, mut rx) = test_coordinator(config);
    let report = coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    assert!(bad_links(&events).is_empty(), "unexpected events: {:?}", events);
    assert_single_completion_last(&events);
    assert_eq!(report.pages_discarded, 1);
    // The crawl carried on past the discarded page
    assert_eq!(report.pages_crawled, 2);
}

#[tokio::test]
async fn test_start_page_timeout_still_completes() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html("<a href=\"/x\">x</a>").set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut config = Config::default();
    config.crawler.page_timeout_secs = 1;

    let (coordinator, mut rx) = test_coordinator(config);
    let report = coordinator
        .run(&format!("{}/", server.uri()))
        .await
        .expect("Crawl failed");
    let events = drain(&mut rx);

    assert_eq!(events.len(), 1);
    assert_single_completion_last(&events);
    assert_eq!(report.pages_crawled, 0);
    assert_eq!(report.links_checked, 0);
}

#[tokio::test]
async fn test_link_timeout_reported_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/", html(r#"<a href="/hang">Hang</a>"#)).await;
    mount(
        &server,
        "/hang",
        html("<p>eventually</p>").set_delay(Duration::from_secs(3)),
    )
    .await;

    let mut config = Config::default();
    config.crawler.link_timeout_secs = 1;

    let (coordinator, mut rx) = test_coordinator(config);
    coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    let bad = bad_links(&events);
    assert_eq!(bad.len(), 1, "unexpected events: {:?}", events);
    assert_eq!(bad[0].link, format!("{}/hang", base));
    assert_eq!(
        bad[0].status_code,
        ReportedStatus::Text("Timeout".to_string())
    );
    assert_single_completion_last(&events);
}

#[tokio::test]
async fn test_connection_failure_reported_as_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let dead_link = format!("http://127.0.0.1:{}/gone", port);

    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html(&format!(r#"<a href="{}">Dead</a>"#, dead_link)),
    )
    .await;

    let mut config = Config::default();
    config.crawler.scope_match = ScopeMatch::Host;

    let (coordinator, mut rx) = test_coordinator(config);
    coordinator
        .run(&format!("{}/", server.uri()))
        .await
        .expect("Crawl failed");
    let events = drain(&mut rx);

    let bad = bad_links(&events);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].link, dead_link);
    match &bad[0].status_code {
        ReportedStatus::Text(text) => assert!(text.starts_with("Error: "), "got {}", text),
        other => panic!("unexpected status: {:?}", other),
    }
}

#[tokio::test]
async fn test_healthy_links_produce_no_events() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/", html(r#"<a href="/a">A</a><a href="/b">B</a>"#)).await;
    mount(&server, "/a", html("<p>a</p>")).await;
    mount(&server, "/b", html("<p>b</p>")).await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    let report = coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    assert_eq!(events.len(), 1);
    match &events[0] {
        CrawlEvent::CheckComplete { message } => {
            assert!(message.starts_with("Check complete, elapsed: "));
            assert!(message.ends_with(" seconds"));
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(report.bad_links, 0);
    assert_eq!(report.links_checked, 2);
    assert_eq!(report.pages_crawled, 3);
}

#[tokio::test]
async fn test_each_page_fetched_once_in_cyclic_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Hits = one page fetch + one check per page linking to it
    mount_expecting(&server, "/", html(r#"<a href="/a">A</a><a href="/b">B</a>"#), 2).await;
    mount_expecting(&server, "/a", html(r#"<a href="/b">B</a><a href="/">Home</a>"#), 3).await;
    mount_expecting(&server, "/b", html(r#"<a href="/a">A</a><a href="/b">Self</a>"#), 4).await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    let report = coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    assert_eq!(report.pages_crawled, 3);
    assert_eq!(report.links_checked, 6);
    assert_single_completion_last(&events);
}

#[tokio::test]
async fn test_out_of_scope_link_checked_but_not_crawled() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;

    mount(
        &site,
        "/",
        html(&format!(
            r#"<a href="{}/page">External</a><a href="{}/missing">Broken external</a>"#,
            external.uri(),
            external.uri()
        )),
    )
    .await;
    mount_expecting(&external, "/page", html(r#"<a href="/deeper">Deeper</a>"#), 1).await;
    mount_expecting(&external, "/missing", ResponseTemplate::new(404), 1).await;
    mount_expecting(&external, "/deeper", html("<p>deeper</p>"), 0).await;

    let mut config = Config::default();
    config.crawler.scope_match = ScopeMatch::Host;

    let (coordinator, mut rx) = test_coordinator(config);
    let report = coordinator
        .run(&format!("{}/", site.uri()))
        .await
        .expect("Crawl failed");
    let events = drain(&mut rx);

    let bad = bad_links(&events);
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].link, format!("{}/missing", external.uri()));
    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.links_checked, 2);
}

#[tokio::test]
async fn test_events_for_a_page_precede_the_next_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/",
        html(r#"<a href="/p1">P1</a><a href="/broken-home">Broken</a>"#),
    )
    .await;
    mount(&server, "/p1", html(r#"<a href="/broken-p1">Broken</a>"#)).await;
    mount(&server, "/broken-home", ResponseTemplate::new(410)).await;
    mount(&server, "/broken-p1", ResponseTemplate::new(503)).await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    let bad = bad_links(&events);
    assert_eq!(bad.len(), 2, "unexpected events: {:?}", events);
    assert_eq!(bad[0].page_url, format!("{}/", base));
    assert_eq!(bad[0].status_code, ReportedStatus::Code(410));
    assert_eq!(bad[1].page_url, format!("{}/p1", base));
    assert_eq!(bad[1].status_code, ReportedStatus::Code(503));
    assert_single_completion_last(&events);
}

#[tokio::test]
async fn test_audit_log_records_every_check() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/", html(r#"<a href="/ok">OK</a><a href="/nope">Nope</a>"#)).await;
    mount(&server, "/ok", html("<p>ok</p>")).await;
    mount(&server, "/nope", ResponseTemplate::new(404)).await;

    let dir = tempfile::tempdir().unwrap();
    let audit_path = dir.path().join("audit.log");

    let mut config = Config::default();
    config.output.audit_log_path = audit_path.to_string_lossy().into_owned();

    let (sink, mut rx) = ChannelSink::new();
    let report = handle_start_check(
        CheckRequest {
            start_url: format!("{}/", base),
        },
        config,
        Arc::new(sink),
    )
    .await
    .expect("Crawl failed");

    let content = std::fs::read_to_string(&audit_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len() as u64, report.links_checked);
    assert!(lines.iter().any(|l| l.ends_with(&format!(
        "URL: {}/ok, Status: 200, Referer: {}/",
        base, base
    ))));
    assert!(lines.iter().any(|l| l.ends_with(&format!(
        "URL: {}/nope, Status: 404, Referer: {}/",
        base, base
    ))));

    let events = drain(&mut rx);
    assert_eq!(bad_links(&events).len(), 1);
    assert_single_completion_last(&events);
}

#[tokio::test]
async fn test_non_http_link_with_host_is_verified() {
    let server = MockServer::start().await;
    let archive = "ftp://files.invalid/archive.zip";

    mount(
        &server,
        "/",
        html(&format!(
            r#"<a href="{}">Archive</a><a href="mailto:team@files.invalid">Mail</a>"#,
            archive
        )),
    )
    .await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    let report = coordinator
        .run(&format!("{}/", server.uri()))
        .await
        .expect("Crawl failed");
    let events = drain(&mut rx);

    // The mailto target has no host and is never checked
    assert_eq!(report.links_checked, 1);
    let bad = bad_links(&events);
    assert_eq!(bad.len(), 1, "unexpected events: {:?}", events);
    assert_eq!(bad[0].link, archive);
    match &bad[0].status_code {
        ReportedStatus::Text(text) => assert!(text.contains("Error: "), "got {}", text),
        other => panic!("unexpected status: {:?}", other),
    }
    assert_single_completion_last(&events);
}

#[tokio::test]
async fn test_failed_page_is_not_queued_again() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/", html(r#"<a href="/a">A</a><a href="/broken">Broken</a>"#)).await;
    mount(&server, "/a", html(r#"<a href="/broken">Broken again</a>"#)).await;
    // Two link checks plus a single page fetch, even though /a links to it
    // after its fetch already failed
    mount_expecting(&server, "/broken", ResponseTemplate::new(500), 3).await;

    let (coordinator, mut rx) = test_coordinator(Config::default());
    let report = coordinator.run(&format!("{}/", base)).await.expect("Crawl failed");
    let events = drain(&mut rx);

    assert_eq!(report.pages_crawled, 2);
    assert_eq!(report.pages_discarded, 1);
    assert_eq!(bad_links(&events).len(), 2);
    assert_single_completion_last(&events);
}
