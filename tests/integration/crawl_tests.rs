//! Integration tests for the crawl pool
//!
//! These tests use wiremock to create mock HTTP servers. Targets are mapped
//! onto the mock server through a path-style URL template, so each hostname
//! gets its own route.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use subdomain_census::config::{CrawlerConfig, UserAgentConfig};
use subdomain_census::crawler::{build_http_client, CrawlPool, SiteSummary, Target};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestCensus".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    }
}

/// Creates a pool whose requests go to `base_url/<host>`
fn create_pool(base_url: &str, concurrency: usize, timeout_ms: u64, body_limit: usize) -> CrawlPool {
    let config = CrawlerConfig {
        concurrency,
        request_timeout_ms: timeout_ms,
        body_limit_bytes: body_limit,
        url_template: format!("{}/{{host}}", base_url),
    };
    CrawlPool::new(build_http_client(&user_agent()).unwrap(), config)
}

fn html(title: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body></body></html>",
            title
        ))
        .insert_header("content-type", "text/html")
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

/// Serves every connection a 200 header plus `prefix`, then never finishes
/// the body
async fn stalling_server(prefix: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 100000\r\n\r\n{}",
                    prefix
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_secs(10)).await;
            });
        }
    });
    format!("http://{}", addr)
}

/// Fails the first request (by stalling past the timeout), then answers
struct FailOnce {
    calls: AtomicUsize,
}

impl Respond for FailOnce {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            html("Too Late").set_delay(Duration::from_secs(5))
        } else {
            html("Second Try")
        }
    }
}

#[tokio::test]
async fn test_timeout_then_success_scenario() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a.example"))
        .respond_with(html("Never").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.example"))
        .respond_with(html("Hi"))
        .mount(&mock_server)
        .await;

    let pool = create_pool(&mock_server.uri(), 10, 300, 10_000);
    let summaries = pool
        .run(vec![Target::new("a.example"), Target::new("b.example")])
        .await;

    assert_eq!(summaries.len(), 2);
    assert_eq!(
        summaries["a.example"],
        SiteSummary {
            title: "timeout".to_string(),
            status: 0
        }
    );
    assert_eq!(
        summaries["b.example"],
        SiteSummary {
            title: "Hi".to_string(),
            status: 200
        }
    );

    assert_eq!(requests_to(&mock_server, "/a.example").await, 2);
    assert_eq!(requests_to(&mock_server, "/b.example").await, 1);
}

#[tokio::test]
async fn test_stalled_body_keeps_status_and_prefix() {
    let titled = stalling_server("<html><head><title>Partial</title>").await;
    let untitled = stalling_server("<html><head>").await;

    let started = std::time::Instant::now();
    let with_title = create_pool(&titled, 1, 300, 10_000)
        .run(vec![Target::new("stall.example")])
        .await;
    let without_title = create_pool(&untitled, 1, 300, 10_000)
        .run(vec![Target::new("stall.example")])
        .await;
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(
        with_title["stall.example"],
        SiteSummary {
            title: "Partial".to_string(),
            status: 200
        }
    );
    assert_eq!(
        without_title["stall.example"],
        SiteSummary {
            title: "no title".to_string(),
            status: 200
        }
    );
}

#[tokio::test]
async fn test_title_follows_last_failure_timeout_then_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    // Hold the first connection open without answering, and stop listening
    // so the retry is refused.
    tokio::spawn(async move {
        if let Ok((socket, _)) = listener.accept().await {
            drop(listener);
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        }
    });

    let summaries = create_pool(&base, 1, 300, 10_000)
        .run(vec![Target::new("x.example")])
        .await;

    assert_eq!(
        summaries["x.example"],
        SiteSummary {
            title: "unreachable".to_string(),
            status: 0
        }
    );
}

#[tokio::test]
async fn test_title_follows_last_failure_closed_then_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let connections = Arc::new(AtomicUsize::new(0));

    // Close the first connection at once, hold every later one silently.
    let counter = Arc::clone(&connections);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                drop(socket);
            } else {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    drop(socket);
                });
            }
        }
    });

    let summaries = create_pool(&base, 1, 300, 10_000)
        .run(vec![Target::new("x.example")])
        .await;

    assert_eq!(
        summaries["x.example"],
        SiteSummary {
            title: "timeout".to_string(),
            status: 0
        }
    );
    assert_eq!(connections.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_after_two_network_errors() {
    // Nothing listens on port 1, so every connection is refused.
    let pool = create_pool("http://127.0.0.1:1", 2, 2_000, 10_000);
    let summaries = pool.run(vec![Target::new("down.example")]).await;

    assert_eq!(
        summaries["down.example"],
        SiteSummary {
            title: "unreachable".to_string(),
            status: 0
        }
    );
}

#[tokio::test]
async fn test_failure_then_success_records_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky.example"))
        .respond_with(FailOnce {
            calls: AtomicUsize::new(0),
        })
        .mount(&mock_server)
        .await;

    let pool = create_pool(&mock_server.uri(), 3, 300, 10_000);
    let summaries = pool.run(vec![Target::new("flaky.example")]).await;

    assert_eq!(
        summaries["flaky.example"],
        SiteSummary {
            title: "Second Try".to_string(),
            status: 200
        }
    );
    assert_eq!(requests_to(&mock_server, "/flaky.example").await, 2);
}

#[tokio::test]
async fn test_http_errors_are_observations_not_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.example"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<title>Not Found</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.example"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pool = create_pool(&mock_server.uri(), 2, 2_000, 10_000);
    let summaries = pool
        .run(vec![
            Target::new("missing.example"),
            Target::new("broken.example"),
        ])
        .await;

    assert_eq!(summaries["missing.example"].status, 404);
    assert_eq!(summaries["missing.example"].title, "Not Found");
    assert_eq!(summaries["broken.example"].status, 503);
    assert_eq!(summaries["broken.example"].title, "no title");
}

#[tokio::test]
async fn test_many_targets_few_workers_terminates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("Instant"))
        .mount(&mock_server)
        .await;

    let hosts: Vec<String> = (0..10).map(|i| format!("site{}.example", i)).collect();
    let pool = create_pool(&mock_server.uri(), 3, 2_000, 10_000);

    let summaries = tokio::time::timeout(
        Duration::from_secs(20),
        pool.run(hosts.iter().map(|h| Target::new(h.as_str())).collect()),
    )
    .await
    .expect("pool did not terminate");

    assert_eq!(summaries.len(), 10);
    for host in &hosts {
        assert_eq!(summaries[host].status, 200);
        assert_eq!(requests_to(&mock_server, &format!("/{}", host)).await, 1);
    }
}

#[tokio::test]
async fn test_more_workers_than_targets() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("Only"))
        .mount(&mock_server)
        .await;

    let pool = create_pool(&mock_server.uri(), 16, 2_000, 10_000);
    let summaries = pool.run(vec![Target::new("one.example")]).await;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries["one.example"].title, "Only");
}

#[tokio::test]
async fn test_empty_target_list() {
    let pool = create_pool("http://127.0.0.1:1", 4, 2_000, 10_000);
    let summaries = pool.run(Vec::new()).await;
    assert!(summaries.is_empty());
}

#[tokio::test]
async fn test_title_beyond_body_limit_is_not_seen() {
    let mock_server = MockServer::start().await;

    let padding = "x".repeat(5_000);
    Mock::given(method("GET"))
        .and(path("/long.example"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><head><!-- {} --><title>Hidden</title></head></html>",
            padding
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/short.example"))
        .respond_with(html("Visible"))
        .mount(&mock_server)
        .await;

    let pool = create_pool(&mock_server.uri(), 2, 2_000, 1_000);
    let summaries = pool
        .run(vec![Target::new("long.example"), Target::new("short.example")])
        .await;

    assert_eq!(summaries["long.example"].status, 200);
    assert_eq!(summaries["long.example"].title, "no title");
    assert_eq!(summaries["short.example"].title, "Visible");
}

#[tokio::test]
async fn test_mixed_outcomes_one_summary_each() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow.example"))
        .respond_with(html("Slow").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html("Fast"))
        .mount(&mock_server)
        .await;

    let mut targets: Vec<Target> = (0..20)
        .map(|i| Target::new(format!("fast{}.example", i)))
        .collect();
    targets.push(Target::new("slow.example"));

    let pool = create_pool(&mock_server.uri(), 4, 300, 10_000);
    let summaries = pool.run(targets).await;

    assert_eq!(summaries.len(), 21);
    assert_eq!(summaries["slow.example"].title, "timeout");
    assert_eq!(
        summaries.values().filter(|s| s.title == "Fast").count(),
        20
    );
    for i in 0..20 {
        let route = format!("/fast{}.example", i);
        assert_eq!(requests_to(&mock_server, &route).await, 1);
    }
    assert_eq!(requests_to(&mock_server, "/slow.example").await, 2);
}

#[tokio::test]
async fn test_records_to_report() {
    use subdomain_census::config::{Config, InputConfig, OutputConfig};
    use subdomain_census::output::{write_report, CensusReport};
    use subdomain_census::records::{crawl_targets, load_domains};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alice.is-a.dev"))
        .respond_with(html("Alice"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let domains_dir = dir.path().join("domains");
    std::fs::create_dir(&domains_dir).unwrap();
    std::fs::write(
        domains_dir.join("alice.json"),
        r#"{"owner": {"username": "alice"}, "records": {"CNAME": "alice.github.io"}}"#,
    )
    .unwrap();
    std::fs::write(
        domains_dir.join("_dmarc.alice.json"),
        r#"{"owner": {"username": "alice"}, "records": {"TXT": "v=DMARC1; p=none"}}"#,
    )
    .unwrap();

    let config = Config {
        crawler: CrawlerConfig {
            concurrency: 2,
            request_timeout_ms: 2_000,
            body_limit_bytes: 10_000,
            url_template: format!("{}/{{host}}", mock_server.uri()),
        },
        user_agent: user_agent(),
        input: InputConfig {
            domains_dir: domains_dir.clone(),
            domain_suffix: "is-a.dev".to_string(),
        },
        output: OutputConfig {
            data_path: dir.path().join("out").join("data.json"),
        },
    };

    let domains = load_domains(&config.input.domains_dir, &config.input.domain_suffix).unwrap();
    let targets = crawl_targets(&domains);
    assert_eq!(targets.len(), 1);

    let summaries = subdomain_census::crawler::crawl(&config, targets).await.unwrap();
    let report = CensusReport::from_domains(&domains).with_site_summaries(summaries);
    write_report(&report, &config.output.data_path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.output.data_path).unwrap()).unwrap();

    assert_eq!(written["usernamesRanked"][0]["username"], "alice");
    assert_eq!(written["usernamesRanked"][0]["count"], 2);
    assert_eq!(written["servicesRanked"].as_array().unwrap().len(), 1);
    assert_eq!(written["servicesRanked"][0]["name"], "github");
    assert_eq!(written["siteSummaries"]["alice.is-a.dev"]["status"], 200);
    assert_eq!(written["siteSummaries"]["alice.is-a.dev"]["title"], "Alice");
}
