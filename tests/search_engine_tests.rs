//! Integration tests for global search: thresholds, caps, ordering, and
//! selection.

mod fixtures;

use std::time::{Duration, Instant};

use crmdash::models::{Lead, Record, RecordKind};
use crmdash::services::{
    HistoryRouter, LookupWorker, RecordLookup, RecordSet, SearchEngine, SearchKey, SearchOutcome,
    SearchSettings,
};
use fixtures::*;

fn acme_only() -> RecordSet {
    RecordSet {
        leads: vec![Lead {
            id: "l1".to_string(),
            lead_name: "Acme Corp".to_string(),
            company_name: None,
            email: None,
            lead_status: None,
        }],
        ..RecordSet::default()
    }
}

fn searched(records: &RecordSet, query: &str) -> SearchEngine {
    let mut engine = SearchEngine::default();
    engine.set_query(query, Instant::now());
    engine.search_now(records);
    engine
}

#[test]
fn test_single_lead_match() {
    let engine = searched(&acme_only(), "acme");
    let results = engine.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, RecordKind::Lead);
    assert_eq!(results[0].title, "Acme Corp");
    assert_eq!(results[0].target, "/leads?highlight=l1");
}

#[test]
fn test_no_match_is_empty_but_open() {
    let engine = searched(&acme_only(), "xyz");
    assert!(engine.results().is_empty());
    assert!(engine.is_open());
    assert!(!engine.is_loading());
}

#[test]
fn test_short_query_issues_nothing() {
    let mut engine = SearchEngine::default();
    let now = Instant::now();
    engine.set_query("a", now);

    assert!(!engine.is_pending());
    assert!(!engine.is_loading());
    assert!(engine.results().is_empty());
    assert_eq!(engine.take_due_request(now + Duration::from_secs(5)), None);
}

#[test]
fn test_shortening_below_threshold_clears_results() {
    let records = sample_records();
    let mut engine = searched(&records, "acme");
    assert!(!engine.results().is_empty());

    engine.set_query("a", Instant::now());
    assert!(engine.results().is_empty());
    assert!(!engine.is_loading());
}

#[test]
fn test_results_are_grouped_by_collection_order() {
    let engine = searched(&sample_records(), "acme");
    let kinds: Vec<RecordKind> = engine.results().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RecordKind::Lead,
            RecordKind::Lead,
            RecordKind::Contact,
            RecordKind::Deal,
            RecordKind::Task,
        ]
    );

    let headers: Vec<String> = engine.grouped().into_iter().map(|g| g.header).collect();
    assert_eq!(headers.len(), 4);
}

#[test]
fn test_per_kind_cap() {
    let engine = searched(&many_acme_leads(8), "acme");
    assert_eq!(engine.results().len(), 5);
    assert!(engine.results().iter().all(|r| r.kind == RecordKind::Lead));

    let settings = SearchSettings {
        per_kind_limit: 3,
        ..SearchSettings::default()
    };
    let mut engine = SearchEngine::new(settings);
    engine.set_query("acme", Instant::now());
    engine.search_now(&many_acme_leads(8));
    assert_eq!(engine.results().len(), 3);
}

#[test]
fn test_settings_pages_are_matched_last() {
    let engine = searched(&sample_records(), "settings");
    assert!(!engine.results().is_empty());
    assert!(engine
        .results()
        .iter()
        .all(|r| r.kind == RecordKind::Setting));

    let engine = searched(&RecordSet::default(), "security");
    assert_eq!(engine.results().len(), 1);
    assert_eq!(engine.results()[0].target, "/settings?tab=security");
}

#[test]
fn test_failing_collection_is_skipped() {
    struct NoDeals(RecordSet);
    impl RecordLookup for NoDeals {
        fn find(&self, kind: RecordKind, needle: &str, limit: usize) -> anyhow::Result<Vec<Record>> {
            if kind == RecordKind::Deal {
                anyhow::bail!("deals service unavailable");
            }
            self.0.find(kind, needle, limit)
        }
    }

    let mut engine = SearchEngine::default();
    engine.set_query("acme", Instant::now());
    engine.search_now(&NoDeals(sample_records()));

    assert_eq!(engine.results().len(), 4);
    assert!(engine.results().iter().all(|r| r.kind != RecordKind::Deal));
}

#[test]
fn test_out_of_order_responses_keep_latest_query() {
    let records = sample_records();
    let settings = SearchSettings::default();
    let mut engine = SearchEngine::new(settings.clone());
    let start = Instant::now();

    engine.set_query("ac", start);
    let first = engine.flush().expect("request for 'ac'");
    engine.set_query("acm", start);
    let second = engine.flush().expect("request for 'acm'");

    let second_response = SearchEngine::execute_lookup(&records, &second, &settings);
    let first_response = SearchEngine::execute_lookup(&records, &first, &settings);

    assert!(engine.accept(second_response.clone()));
    assert!(!engine.accept(first_response));
    assert_eq!(engine.results(), second_response.results.as_slice());
    assert_eq!(engine.query(), "acm");
    assert!(!engine.is_loading());
}

#[test]
fn test_stale_response_arriving_first_is_dropped() {
    let records = sample_records();
    let settings = SearchSettings::default();
    let mut engine = SearchEngine::new(settings.clone());
    let start = Instant::now();

    engine.set_query("ac", start);
    let first = engine.flush().expect("request for 'ac'");
    engine.set_query("acm", start);
    let second = engine.flush().expect("request for 'acm'");

    assert!(!engine.accept(SearchEngine::execute_lookup(&records, &first, &settings)));
    assert!(engine.is_loading());
    assert!(engine.accept(SearchEngine::execute_lookup(&records, &second, &settings)));
    assert_eq!(engine.results().len(), 5);
}

#[test]
fn test_debounce_collapses_rapid_typing() {
    let mut engine = SearchEngine::default();
    let start = Instant::now();
    let debounce = engine.settings().debounce;

    engine.set_query("ac", start);
    engine.set_query("acm", start + debounce / 2);
    assert_eq!(engine.take_due_request(start + debounce), None);

    let request = engine
        .take_due_request(start + debounce / 2 + debounce)
        .expect("due after the quiet period");
    assert_eq!(request.query, "acm");
    assert_eq!(engine.take_due_request(start + debounce * 10), None);
}

#[test]
fn test_arrow_navigation_wraps_both_ways() {
    let records = RecordSet {
        leads: many_acme_leads(3).leads,
        ..RecordSet::default()
    };
    let mut engine = searched(&records, "acme");
    assert_eq!(engine.results().len(), 3);

    assert_eq!(engine.handle_key(SearchKey::Down), SearchOutcome::Moved(1));
    assert_eq!(engine.handle_key(SearchKey::Down), SearchOutcome::Moved(2));
    assert_eq!(engine.handle_key(SearchKey::Down), SearchOutcome::Moved(0));
    assert_eq!(engine.handle_key(SearchKey::Up), SearchOutcome::Moved(2));
}

#[test]
fn test_selection_navigates_and_clears() {
    let mut engine = searched(&sample_records(), "acme");
    let mut router = HistoryRouter::new();

    assert!(engine.activate(1, &mut router));
    assert_eq!(router.current(), Some("/leads?highlight=l2"));
    assert_eq!(engine.query(), "");
    assert!(!engine.is_open());
    assert!(engine.results().is_empty());

    assert!(!engine.activate(0, &mut router));
    assert_eq!(router.history().len(), 1);
}

#[test]
fn test_escape_then_pointer_outside() {
    let mut engine = searched(&sample_records(), "acme");
    assert_eq!(engine.handle_key(SearchKey::Escape), SearchOutcome::Closed);
    assert_eq!(engine.handle_key(SearchKey::Escape), SearchOutcome::Ignored);

    engine.focus();
    assert!(engine.is_open());
    engine.pointer_down(true);
    assert!(engine.is_open());
    engine.pointer_down(false);
    assert!(!engine.is_open());
}

#[test]
fn test_worker_round_trip() {
    let worker = LookupWorker::spawn(
        std::sync::Arc::new(sample_records()),
        SearchSettings::default(),
    );
    let mut engine = SearchEngine::default();
    engine.set_query("rocket", Instant::now());
    worker
        .submit(engine.flush().expect("request"))
        .expect("worker running");

    let deadline = Instant::now() + Duration::from_secs(5);
    let response = loop {
        if let Some(response) = worker.poll() {
            break response;
        }
        assert!(Instant::now() < deadline, "worker did not answer");
        std::thread::sleep(Duration::from_millis(5));
    };

    assert!(engine.accept(response));
    assert_eq!(engine.results().len(), 1);
    assert_eq!(engine.results()[0].title, "Rocket Skates");
}
