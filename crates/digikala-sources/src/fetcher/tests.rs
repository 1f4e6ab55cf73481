use super::*;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

enum Scripted {
    Page(Value),
    RateLimited(Option<Duration>),
    ServerError,
}

/// In-memory stand-in for the comments endpoint; each page answers from a queue
#[derive(Default)]
struct ScriptedApi {
    pages: Mutex<HashMap<u32, VecDeque<Scripted>>>,
    calls: Mutex<Vec<u32>>,
}

impl ScriptedApi {
    fn respond(self, page: u32, response: Scripted) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(page)
            .or_default()
            .push_back(response);
        self
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentPageSource for ScriptedApi {
    fn source_name(&self) -> &str {
        "scripted"
    }

    async fn fetch_page(&self, _product: ProductId, page: u32) -> Result<Value, SourceError> {
        self.calls.lock().unwrap().push(page);
        let next = self
            .pages
            .lock()
            .unwrap()
            .get_mut(&page)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Page(body)) => Ok(body),
            Some(Scripted::RateLimited(retry_after)) => {
                Err(SourceError::RateLimited { page, retry_after })
            }
            Some(Scripted::ServerError) => {
                Err(SourceError::api(page, "HTTP 500 Internal Server Error - "))
            }
            None => panic!("unexpected request for page {page}"),
        }
    }
}

fn comment(id: u64) -> Value {
    json!({"id": id, "title": format!("title {id}"), "body": format!("body {id}"), "rate": 4})
}

fn page_of(items: Vec<Value>) -> Scripted {
    Scripted::Page(json!({"status": 200, "data": {"comments": {"items": items}}}))
}

fn product() -> ProductId {
    ProductId::new(7068663).unwrap()
}

fn ids(comments: &[CommentRecord]) -> Vec<u64> {
    comments.iter().filter_map(|c| c.id).collect()
}

#[tokio::test(start_paused = true)]
async fn test_fetch_all_follows_pages_until_empty() {
    let api = ScriptedApi::default()
        .respond(1, page_of(vec![comment(1), comment(2)]))
        .respond(2, page_of(vec![comment(3)]))
        .respond(3, page_of(vec![]));
    let delay = Duration::from_millis(500);
    let fetcher = CommentFetcher::new(api, delay);

    let start = Instant::now();
    let comments = fetcher.fetch_all(product()).await.unwrap();

    assert_eq!(ids(&comments), vec![1, 2, 3]);
    assert_eq!(comments[0].body, "body 1");
    assert_eq!(fetcher.source().calls(), vec![1, 2, 3]);
    // One pause between each pair of pages, none after the empty page
    assert_eq!(start.elapsed(), delay * 2);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_page_is_retried_once() {
    let api = ScriptedApi::default()
        .respond(1, page_of(vec![comment(1)]))
        .respond(2, Scripted::RateLimited(None))
        .respond(2, page_of(vec![comment(2)]))
        .respond(3, page_of(vec![]));
    let delay = Duration::from_secs(2);
    let fetcher = CommentFetcher::new(api, delay);

    let start = Instant::now();
    let report = fetcher.fetch_report(product()).await.unwrap();

    assert_eq!(ids(&report.comments), vec![1, 2]);
    assert_eq!(report.rate_limit_retries, 1);
    assert_eq!(fetcher.source().calls(), vec![1, 2, 2, 3]);
    // Two page transitions plus one backoff of the same length
    assert_eq!(start.elapsed(), delay * 3);
}

#[tokio::test(start_paused = true)]
async fn test_second_rate_limit_is_api_error() {
    let api = ScriptedApi::default()
        .respond(1, page_of(vec![comment(1)]))
        .respond(2, Scripted::RateLimited(None))
        .respond(2, Scripted::RateLimited(None));
    let fetcher = CommentFetcher::new(api, Duration::from_millis(500));

    let result = fetcher.fetch_all(product()).await;

    assert!(matches!(result, Err(SourceError::Api { page: 2, .. })));
    assert_eq!(fetcher.source().calls(), vec![1, 2, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_header_extends_backoff() {
    let api = ScriptedApi::default()
        .respond(1, Scripted::RateLimited(Some(Duration::from_secs(5))))
        .respond(1, page_of(vec![]));
    let fetcher = CommentFetcher::new(api, Duration::from_millis(500));

    let start = Instant::now();
    let comments = fetcher.fetch_all(product()).await.unwrap();

    assert!(comments.is_empty());
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_backoff_has_floor_without_delay() {
    let api = ScriptedApi::default()
        .respond(1, Scripted::RateLimited(Some(Duration::from_secs(600))))
        .respond(1, page_of(vec![]));
    let fetcher = CommentFetcher::new(api, Duration::ZERO);

    assert_eq!(fetcher.rate_limit_backoff(None), MIN_RATE_LIMIT_BACKOFF);

    let start = Instant::now();
    fetcher.fetch_all(product()).await.unwrap();
    // Retry-After is capped
    assert_eq!(start.elapsed(), MAX_RETRY_AFTER);
}

#[tokio::test(start_paused = true)]
async fn test_last_page_metadata_stops_without_extra_request() {
    let api = ScriptedApi::default().respond(
        1,
        Scripted::Page(json!({
            "data": {"comments": {"items": [comment(1)], "pager": {"current_page": 1, "total_pages": 1}}}
        })),
    );
    let fetcher = CommentFetcher::new(api, Duration::from_secs(1));

    let start = Instant::now();
    let comments = fetcher.fetch_all(product()).await.unwrap();

    assert_eq!(ids(&comments), vec![1]);
    assert_eq!(fetcher.source().calls(), vec![1]);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_comments_are_skipped() {
    let api = ScriptedApi::default()
        .respond(
            1,
            page_of(vec![
                comment(1),
                json!("not an object"),
                json!({"id": 2, "likes": "lots"}),
                comment(3),
            ]),
        )
        .respond(2, page_of(vec![]));
    let fetcher = CommentFetcher::new(api, Duration::ZERO);

    let report = fetcher.fetch_report(product()).await.unwrap();

    assert_eq!(ids(&report.comments), vec![1, 3]);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.pages, 1);
}

#[tokio::test(start_paused = true)]
async fn test_server_error_aborts_run() {
    let api = ScriptedApi::default()
        .respond(1, page_of(vec![comment(1)]))
        .respond(2, Scripted::ServerError);
    let fetcher = CommentFetcher::new(api, Duration::ZERO);

    let result = fetcher.fetch_all(product()).await;

    assert!(matches!(result, Err(SourceError::Api { page: 2, .. })));
    assert_eq!(fetcher.source().calls(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_max_pages_caps_pagination() {
    let api = ScriptedApi::default()
        .respond(1, page_of(vec![comment(1)]))
        .respond(2, page_of(vec![comment(2)]))
        .respond(3, page_of(vec![comment(3)]));
    let fetcher = CommentFetcher::new(api, Duration::ZERO).with_max_pages(2);

    let comments = fetcher.fetch_all(product()).await.unwrap();

    assert_eq!(ids(&comments), vec![1, 2]);
    assert_eq!(fetcher.source().calls(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_progress_reported_per_page() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let api = ScriptedApi::default()
        .respond(1, page_of(vec![comment(1), comment(2)]))
        .respond(2, page_of(vec![comment(3), json!(42)]))
        .respond(3, page_of(vec![]));
    let fetcher = CommentFetcher::new(api, Duration::ZERO)
        .with_progress(move |progress| sink.lock().unwrap().push(progress));

    fetcher.fetch_all(product()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            FetchProgress {
                page: 1,
                page_comments: 2,
                total_comments: 2,
                skipped: 0,
            },
            FetchProgress {
                page: 2,
                page_comments: 1,
                total_comments: 3,
                skipped: 1,
            },
        ]
    );
}
