//! Source fetching and numeric commands against a local HTTP stub
//! Run with: cargo test --test fetch_test

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Once};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use xsg_bot::application::messaging::{MessageDispatcher, MessageParser};
use xsg_bot::application::services::{CommandService, MetricsService};
use xsg_bot::domain::entities::FetchResult;
use xsg_bot::domain::traits::SourceFetcher;
use xsg_bot::infrastructure::config::{Config, HttpConfig};
use xsg_bot::infrastructure::http::HttpFetcher;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Canned response for one path
#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

impl Route {
    fn json(body: serde_json::Value) -> Self {
        Self { status: 200, body: body.to_string(), delay: Duration::ZERO }
    }

    fn raw(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), delay: Duration::ZERO }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Minimal HTTP/1.1 server answering each connection once
async fn serve(routes: HashMap<&'static str, Route>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let route = routes
                    .get(path.as_str())
                    .cloned()
                    .unwrap_or_else(|| Route::raw(404, "{\"error\":\"not found\"}"));

                tokio::time::sleep(route.delay).await;
                let response = format!(
                    "HTTP/1.1 {} STUB\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    route.status,
                    route.body.len(),
                    route.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&HttpConfig { timeout_secs: 1, accept_invalid_certs: false }).unwrap()
}

fn feed_routes() -> HashMap<&'static str, Route> {
    let nodes: Vec<serde_json::Value> = (0..37)
        .map(|i| serde_json::json!({"txhash": format!("{:064}", i), "status": "ENABLED"}))
        .collect();

    HashMap::from([
        ("/blocks", Route::json(serde_json::json!({"blocks": [
            {"time": 1000, "height": 2_000_000},
            {"time": 940, "height": 1_999_999},
            {"time": 880, "height": 1_999_998}
        ]}))),
        ("/rates", Route::json(serde_json::json!([
            {"code": "USD", "price": "1"},
            {"code": "XSG", "price": "0.2"}
        ]))),
        ("/network", Route::json(serde_json::json!({"info": {"networksolps": 250000.7, "difficulty": 1500.25}}))),
        ("/masternodes", Route::json(serde_json::json!(nodes))),
    ])
}

fn dispatcher(addr: SocketAddr) -> MessageDispatcher {
    let mut config = Config::default();
    config.endpoints.blocks = url(addr, "/blocks");
    config.endpoints.rates = url(addr, "/rates");
    config.endpoints.network = url(addr, "/network");
    config.endpoints.masternodes = url(addr, "/masternodes");
    config.params.mining_reward = 10.0;
    config.params.masternode_reward = 5.0;
    let config = Arc::new(config);

    let metrics = Arc::new(MetricsService::new(Arc::new(fetcher()), config.clone()));
    let mut commands = CommandService::new("/");
    commands.register_defaults(&config);
    commands.register_metrics(metrics);
    MessageDispatcher::new(MessageParser::new("/"), commands)
}

async fn reply(dispatcher: &MessageDispatcher, text: &str) -> String {
    dispatcher
        .process_text("1", text, None)
        .await
        .expect("dispatch failed")
        .expect("no reply")
        .text
}

#[tokio::test]
async fn test_fetch_all_empty() {
    ensure_init();
    assert!(fetcher().fetch_all(&[]).await.is_empty());
}

#[tokio::test]
async fn test_fetch_all_isolates_failures() {
    ensure_init();
    let mut routes = feed_routes();
    routes.insert("/broken", Route::raw(200, "<html>not json</html>"));
    routes.insert("/error", Route::raw(502, "{\"ok\":false}"));
    routes.insert("/slow", Route::json(serde_json::json!({"late": true})).slow(Duration::from_secs(3)));
    let addr = serve(routes).await;

    let urls = vec![
        url(addr, "/blocks"),
        url(addr, "/broken"),
        url(addr, "/rates"),
        url(addr, "/error"),
        url(addr, "/slow"),
        url(addr, "/missing"),
        url(addr, "/network"),
    ];
    let results = fetcher().fetch_all(&urls).await;

    assert_eq!(results.len(), urls.len());
    let failed: Vec<bool> = results.iter().map(FetchResult::is_failure).collect();
    assert_eq!(failed, vec![false, true, false, true, true, true, false]);

    // JSON served as text/html still parses
    let blocks = results[0].value().unwrap();
    assert_eq!(blocks["blocks"][0]["height"], 2_000_000);
    assert_eq!(results[2].value().unwrap()[1]["code"], "XSG");
}

#[tokio::test]
async fn test_fetches_run_concurrently() {
    ensure_init();
    let delay = Duration::from_millis(400);
    let routes = HashMap::from([
        ("/a", Route::json(serde_json::json!(1)).slow(delay)),
        ("/b", Route::json(serde_json::json!(2)).slow(delay)),
        ("/c", Route::json(serde_json::json!(3)).slow(delay)),
    ]);
    let addr = serve(routes).await;

    let urls = vec![url(addr, "/a"), url(addr, "/b"), url(addr, "/c")];
    let started = std::time::Instant::now();
    let results = fetcher().fetch_all(&urls).await;

    assert_eq!(
        results,
        vec![
            FetchResult::Success(serde_json::json!(1)),
            FetchResult::Success(serde_json::json!(2)),
            FetchResult::Success(serde_json::json!(3)),
        ]
    );
    assert!(started.elapsed() < delay * 3, "fetches ran sequentially: {:?}", started.elapsed());
}

#[tokio::test]
async fn test_calc_end_to_end() {
    ensure_init();
    let addr = serve(feed_routes()).await;
    let dispatcher = dispatcher(addr);

    let text = reply(&dispatcher, "/calc 2500").await;
    // 1% of the network at 60s blocks and 10 XSG per block
    assert!(text.starts_with("Current network hashrate is *250.00 KSols/s*."), "{}", text);
    assert!(text.contains("*6.00 XSG* _(1.20$)_ per *hour*"), "{}", text);
    assert!(text.contains("*144.00 XSG* _(28.80$)_ per *day*"), "{}", text);
}

#[tokio::test]
async fn test_masternode_commands_end_to_end() {
    ensure_init();
    let addr = serve(feed_routes()).await;
    let dispatcher = dispatcher(addr);

    let info = reply(&dispatcher, "/mninfo").await;
    assert!(info.contains("Active masternodes: *37*"), "{}", info);
    assert!(info.contains("Coins locked: *370,000 XSG*"), "{}", info);

    let rewards = reply(&dispatcher, "/mnrew 2").await;
    assert!(rewards.starts_with("With *2* masternode(s)"), "{}", rewards);
    assert!(rewards.contains("per *year*"));
}

#[tokio::test]
async fn test_halving_end_to_end() {
    ensure_init();
    let addr = serve(feed_routes()).await;
    let text = reply(&dispatcher(addr), "/halving").await;
    // (2102400 - 2000000) * 60 / 86400
    assert!(text.contains("*71.11 days*"), "{}", text);
}

#[tokio::test]
async fn test_all_sources_down_names_first_url() {
    ensure_init();
    let addr = serve(HashMap::new()).await;
    let text = reply(&dispatcher(addr), "/calc 100").await;

    assert_eq!(text, format!("There was an error with {} api.", url(addr, "/blocks")));
    assert!(!text.contains("/rates"));
    assert!(!text.contains("KSols"));
}
