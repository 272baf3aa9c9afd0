use std::iter::FusedIterator;

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, rngs::ThreadRng};
use uuid::{Builder, Uuid};

use crate::types::{EventType, PageEvent};

/// Events are spread over this trailing window, ending at generation time
pub const TIMESTAMP_WINDOW_DAYS: i64 = 7;

/// Exclusive upper bound for the numbers placed in `meta`
pub const MAX_META_VALUE: u32 = 1_000_000_000;

const DOMAIN_WORDS: &[&str] = &[
    "anderson", "brown", "davis", "garcia", "harris", "jackson", "johnson", "martin", "miller",
    "moore", "smith", "taylor", "thomas", "white", "wilson",
];

const TLDS: &[&str] = &["com", "net", "org", "info", "biz", "io"];

const PATH_WORDS: &[&str] = &[
    "app", "blog", "categories", "category", "explore", "list", "main", "posts", "search", "tag",
    "tags", "wp-content", "home", "about", "index", "privacy", "terms", "homepage",
];

const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "php", "jsp", "asp"];

/// Lazy, finite stream of synthetic page events.
///
/// Yields exactly `count` records. Each timestamp falls in the 7 days ending
/// when that record is generated, unless a fixed anchor is supplied.
pub struct EventGenerator<R> {
    remaining: u64,
    anchor: Option<DateTime<Utc>>,
    rng: R,
}

impl<R: Rng> EventGenerator<R> {
    pub fn new(count: u64, rng: R) -> Self {
        Self {
            remaining: count,
            anchor: None,
            rng,
        }
    }

    /// Use `anchor` as "now" for every record
    pub fn with_anchor(count: u64, rng: R, anchor: DateTime<Utc>) -> Self {
        Self {
            remaining: count,
            anchor: Some(anchor),
            rng,
        }
    }

    fn next_event(&mut self) -> PageEvent {
        let now = self.anchor.unwrap_or_else(Utc::now);
        let rng = &mut self.rng;
        PageEvent {
            id: random_uuid(rng),
            user_id: random_uuid(rng),
            event_type: EventType::ALL[rng.random_range(0..EventType::ALL.len())],
            url: fake_uri(rng),
            referrer: fake_uri(rng),
            timestamp: random_timestamp(rng, now),
            metadata: serde_json::json!({
                "x": rng.random_range(0..MAX_META_VALUE),
                "y": rng.random_range(0..MAX_META_VALUE),
            })
            .to_string(),
        }
    }
}

impl<R: Rng> Iterator for EventGenerator<R> {
    type Item = PageEvent;

    fn next(&mut self) -> Option<PageEvent> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.next_event())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<R: Rng> FusedIterator for EventGenerator<R> {}

/// Generate `count` events from the thread-local RNG
pub fn generate_events(count: u64) -> EventGenerator<ThreadRng> {
    EventGenerator::new(count, rand::rng())
}

/// Random (version 4) UUID drawn from the supplied RNG
fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

fn random_timestamp<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
    let window_ms = TimeDelta::days(TIMESTAMP_WINDOW_DAYS).num_milliseconds();
    now - TimeDelta::milliseconds(rng.random_range(0..=window_ms))
}

fn pick<R: Rng>(rng: &mut R, words: &[&'static str]) -> &'static str {
    words[rng.random_range(0..words.len())]
}

/// Absolute URI such as `https://www.smith.com/blog/tags/index.html`
fn fake_uri<R: Rng>(rng: &mut R) -> String {
    let scheme = if rng.random_bool(0.5) { "https" } else { "http" };
    let www = if rng.random_bool(0.5) { "www." } else { "" };
    let mut uri = format!(
        "{scheme}://{www}{}.{}/",
        pick(rng, DOMAIN_WORDS),
        pick(rng, TLDS)
    );

    for _ in 0..rng.random_range(1..=3) {
        uri.push_str(pick(rng, PATH_WORDS));
        uri.push('/');
    }

    if rng.random_bool(0.5) {
        uri.push_str(pick(rng, PATH_WORDS));
        uri.push('.');
        uri.push_str(pick(rng, PAGE_EXTENSIONS));
    }

    uri
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn seeded(count: u64) -> EventGenerator<StdRng> {
        EventGenerator::new(count, StdRng::seed_from_u64(42))
    }

    fn assert_uri(uri: &str) {
        let rest = uri
            .strip_prefix("https://")
            .or_else(|| uri.strip_prefix("http://"))
            .unwrap_or_else(|| panic!("missing scheme: {uri}"));
        let (host, path) = rest.split_once('/').expect("missing path");
        assert!(host.contains('.'), "host without tld: {uri}");
        assert!(!path.contains("//"), "empty path segment: {uri}");
        assert!(!uri.contains(char::is_whitespace));
    }

    #[test]
    fn yields_exactly_count() {
        for count in [0, 1, 7, 1000] {
            let generator = seeded(count);
            assert_eq!(generator.size_hint(), (count as usize, Some(count as usize)));
            assert_eq!(generator.count() as u64, count);
        }
    }

    #[test]
    fn zero_yields_nothing() {
        let mut generator = seeded(0);
        assert!(generator.next().is_none());
        assert!(generator.next().is_none());
    }

    #[test]
    fn records_satisfy_schema() {
        let started = Utc::now();
        let events: Vec<PageEvent> = seeded(2000).collect();
        let finished = Utc::now();
        let window_start = started - TimeDelta::days(TIMESTAMP_WINDOW_DAYS);

        for event in events {
            assert!(event.timestamp >= window_start && event.timestamp <= finished);
            assert_eq!(event.id.get_version_num(), 4);
            assert_eq!(event.user_id.get_version_num(), 4);
            assert_ne!(event.id, event.user_id);
            assert!(EventType::ALL.contains(&event.event_type));
            assert_uri(&event.url);
            assert_uri(&event.referrer);

            let meta = event.parse_metadata().expect("meta must be valid JSON");
            assert!(meta.x < MAX_META_VALUE && meta.y < MAX_META_VALUE);
        }
    }

    #[test]
    fn ids_are_unique_across_records() {
        let mut ids = std::collections::HashSet::new();
        for event in seeded(5000) {
            assert!(ids.insert(event.id));
            assert!(ids.insert(event.user_id));
        }
    }

    #[test]
    fn every_event_type_appears() {
        let seen: std::collections::HashSet<EventType> =
            seeded(300).map(|e| e.event_type).collect();
        assert_eq!(seen.len(), EventType::ALL.len());
    }

    #[test]
    fn same_seed_same_stream() {
        let anchor = Utc::now();
        let a: Vec<PageEvent> =
            EventGenerator::with_anchor(50, StdRng::seed_from_u64(7), anchor).collect();
        let b: Vec<PageEvent> =
            EventGenerator::with_anchor(50, StdRng::seed_from_u64(7), anchor).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_anchor_bounds_timestamps() {
        let anchor = Utc::now() - TimeDelta::days(30);
        let window_start = anchor - TimeDelta::days(TIMESTAMP_WINDOW_DAYS);
        for event in EventGenerator::with_anchor(500, StdRng::seed_from_u64(1), anchor) {
            assert!(event.timestamp >= window_start && event.timestamp <= anchor);
        }
    }

    #[test]
    fn thread_rng_generator() {
        let events: Vec<PageEvent> = generate_events(10).collect();
        assert_eq!(events.len(), 10);
    }
}
