// Orchestrator and fetcher behavior against scripted search clients:
// retry budgets, deterministic ordering, entity independence.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use subpulse_common::{Granularity, RecordKind, SearchFilters, SubpulseError, TimeWindow};
use subpulse_engine::testing::{
    record_at, EmptySearchClient, FailingSearchClient, StaticSearchClient,
};
use subpulse_engine::{Collector, WindowFetcher};

/// 2021-03-01 00:00:00 UTC.
const BASE: i64 = 1_614_556_800;
const HOUR: i64 = 3600;

fn utc(epoch: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch, 0).unwrap()
}

fn hourly_window(index: i64) -> TimeWindow {
    TimeWindow {
        start: utc(BASE + index * HOUR),
        end: utc(BASE + (index + 1) * HOUR),
    }
}

#[tokio::test]
async fn window_retry_stops_after_three_attempts() {
    let fetcher = WindowFetcher::new(EmptySearchClient::new());
    let rows = fetcher
        .fetch(
            RecordKind::Submission,
            "test",
            hourly_window(0),
            &SearchFilters::new(),
        )
        .await;

    assert!(rows.is_empty());
    // One page query per attempt: the first page was already empty.
    assert_eq!(fetcher.client().call_count(), 3);
}

#[tokio::test]
async fn custom_attempt_budget_is_honored() {
    let fetcher = WindowFetcher::new(EmptySearchClient::new()).with_max_attempts(5);
    let rows = fetcher
        .fetch(
            RecordKind::Comment,
            "test",
            hourly_window(0),
            &SearchFilters::new(),
        )
        .await;

    assert!(rows.is_empty());
    assert_eq!(fetcher.client().call_count(), 5);
}

#[tokio::test]
async fn fetcher_collects_every_page_of_a_window() {
    let first_page = vec![
        record_at("p1", BASE + 10, "one"),
        record_at("p2", BASE + 20, "two"),
    ];
    let second_page = vec![record_at("p3", BASE + 30, "three")];
    let client = StaticSearchClient::new()
        .on_window("test", BASE, first_page)
        .on_window("test", BASE + 20, second_page);

    let fetcher = WindowFetcher::new(client);
    let rows = fetcher
        .fetch(
            RecordKind::Submission,
            "test",
            hourly_window(0),
            &SearchFilters::new(),
        )
        .await;

    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
    // Two scripted pages plus the empty page that ends pagination.
    assert_eq!(fetcher.client().call_count(), 3);
}

#[tokio::test]
async fn pagination_stops_when_cursor_cannot_advance() {
    // The page's last timestamp equals the cursor; a second query would
    // repeat it forever.
    let client =
        StaticSearchClient::new().on_window("test", BASE, vec![record_at("p1", BASE, "stuck")]);

    let fetcher = WindowFetcher::new(client);
    let rows = fetcher
        .fetch(
            RecordKind::Submission,
            "test",
            hourly_window(0),
            &SearchFilters::new(),
        )
        .await;

    assert_eq!(rows.len(), 1);
    assert_eq!(fetcher.client().call_count(), 1);
}

#[tokio::test]
async fn empty_collaborator_yields_empty_table_without_error() {
    // 2021-03-01 to 2021-03-02 hourly: 24 windows, all empty after retries.
    let fetcher = WindowFetcher::new(EmptySearchClient::new());
    let collector = Collector::new(fetcher).with_concurrency(4);

    let result = collector
        .collect(
            RecordKind::Submission,
            &["test".to_string()],
            Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 2, 0, 0, 0).unwrap(),
            Some(Granularity::Hourly),
            &SearchFilters::new(),
        )
        .await
        .expect("empty windows are not a collection failure");

    assert_eq!(result.len(), 1);
    assert!(result["test"].is_empty());
    // 24 windows, 3 attempts each.
    assert_eq!(collector.client().call_count(), 72);
}

#[tokio::test]
async fn output_order_is_chronological_despite_completion_order() {
    // Later windows respond faster, so tasks complete in reverse.
    let client = StaticSearchClient::new()
        .on_window("test", BASE, vec![record_at("w0", BASE + 10, "first")])
        .with_delay("test", BASE, Duration::from_millis(30))
        .on_window(
            "test",
            BASE + HOUR,
            vec![record_at("w1", BASE + HOUR + 10, "second")],
        )
        .with_delay("test", BASE + HOUR, Duration::from_millis(20))
        .on_window(
            "test",
            BASE + 2 * HOUR,
            vec![record_at("w2", BASE + 2 * HOUR + 10, "third")],
        )
        .with_delay("test", BASE + 2 * HOUR, Duration::from_millis(10));

    let collector = Collector::new(WindowFetcher::new(client)).with_concurrency(3);
    let result = collector
        .collect(
            RecordKind::Submission,
            &["test".to_string()],
            utc(BASE),
            utc(BASE + 3 * HOUR),
            Some(Granularity::Hourly),
            &SearchFilters::new(),
        )
        .await
        .unwrap();

    let ids: Vec<&str> = result["test"].iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["w0", "w1", "w2"]);
}

#[tokio::test]
async fn entities_are_independent() {
    // "quiet" never returns anything; "busy" must be unaffected.
    let client = StaticSearchClient::new().on_window(
        "busy",
        BASE,
        vec![record_at("b0", BASE + 5, "only data")],
    );

    let collector = Collector::new(WindowFetcher::new(client)).with_concurrency(2);
    let result = collector
        .collect(
            RecordKind::Submission,
            &["busy".to_string(), "quiet".to_string()],
            utc(BASE),
            utc(BASE + HOUR),
            Some(Granularity::Hourly),
            &SearchFilters::new(),
        )
        .await
        .unwrap();

    assert_eq!(result["busy"].len(), 1);
    assert!(result["quiet"].is_empty());
}

#[tokio::test]
async fn failing_collaborator_yields_empty_result_not_error() {
    let collector =
        Collector::new(WindowFetcher::new(FailingSearchClient::new())).with_concurrency(2);
    let result = collector
        .collect(
            RecordKind::Submission,
            &["test".to_string()],
            utc(BASE),
            utc(BASE + 2 * HOUR),
            Some(Granularity::Hourly),
            &SearchFilters::new(),
        )
        .await
        .expect("transport failures are absorbed per window");

    assert!(result["test"].is_empty());
    // 2 windows, 3 attempts each, one failed page query per attempt.
    assert_eq!(collector.client().call_count(), 6);
}

#[tokio::test]
async fn inverted_range_is_a_query_construction_error() {
    let collector = Collector::new(WindowFetcher::new(EmptySearchClient::new()));
    let err = collector
        .collect(
            RecordKind::Submission,
            &["test".to_string()],
            utc(BASE + HOUR),
            utc(BASE),
            None,
            &SearchFilters::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, SubpulseError::QueryConstruction(_)));
}
