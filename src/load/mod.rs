// src/load/mod.rs

pub mod cache;

use crate::error::PipelineError;
use crate::sources::SourceRegistry;
use crate::table::Table;
use cache::{Clock, SystemClock, TtlCache};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

/// Headers that spreadsheet exports generate for columns with no real name,
/// e.g. "Unnamed: 7". Dropped at load time, never at export time.
static ARTIFACT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Unnamed").expect("artifact header pattern should be valid"));

/// Retrieval of a URL body as text. Abstracted so tests can count fetches
/// and feed canned CSV without a network.
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String, PipelineError>;
}

/// Blocking HTTP fetcher. One fetch per call, no retry; a transport failure
/// surfaces immediately to the caller.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_error(url: &str, source: reqwest::Error) -> PipelineError {
    PipelineError::Fetch {
        url: url.to_string(),
        source: Box::new(source),
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, PipelineError> {
        debug!(url, "GET");
        self.client
            .get(url)
            .send()
            .map_err(|e| fetch_error(url, e))?
            .error_for_status()
            .map_err(|e| fetch_error(url, e))?
            .text()
            .map_err(|e| fetch_error(url, e))
    }
}

/// A parsed table plus the source caption shown to the user.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Table,
    pub source: String,
}

/// Resolves tab names, fetches and parses their CSV, and caches the result
/// for a bounded window (default one hour).
pub struct Loader<F = HttpFetcher> {
    registry: SourceRegistry,
    fetcher: F,
    cache: TtlCache,
}

/// Default lifetime of a cached table.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

impl Loader<HttpFetcher> {
    pub fn new(registry: SourceRegistry, ttl: Duration) -> Self {
        Self::with_fetcher(registry, HttpFetcher::new(), ttl, Box::new(SystemClock))
    }
}

impl<F: Fetch> Loader<F> {
    pub fn with_fetcher(
        registry: SourceRegistry,
        fetcher: F,
        ttl: Duration,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            cache: TtlCache::new(ttl, clock),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Load one tab: registry lookup, cached or fresh fetch, CSV parse,
    /// artifact-column strip.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn load(&mut self, tab: &str) -> Result<Loaded, PipelineError> {
        let descriptor = self
            .registry
            .get(tab)
            .ok_or_else(|| PipelineError::UnknownTab(tab.to_string()))?;
        let url = descriptor.source.url();
        let source = descriptor.source.description().to_string();

        if let Some(hit) = self.cache.get(tab) {
            return Ok(hit);
        }

        let body = self.fetcher.fetch_text(&url)?;
        let table = parse_csv(&url, &body)?;
        info!(tab, rows = table.len(), columns = table.headers.len(), "loaded");

        let loaded = Loaded { table, source };
        self.cache.put(tab, loaded.clone());
        Ok(loaded)
    }
}

/// Parse a CSV body: first record is the header, every cell raw text so
/// leading-zero identifiers survive. Rows are padded or truncated to the
/// header width.
pub(crate) fn parse_csv(url: &str, body: &str) -> Result<Table, PipelineError> {
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| PipelineError::Parse {
            url: url.to_string(),
            source: e,
        })?;
        if idx == 0 {
            headers = record.iter().map(str::to_string).collect();
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(strip_artifact_columns(Table::new(headers, rows)))
}

/// Drop every column whose header is blank or matches the artifact pattern,
/// preserving the order of the survivors.
fn strip_artifact_columns(table: Table) -> Table {
    let keep: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.trim().is_empty() && !ARTIFACT_HEADER.is_match(h))
        .map(|(i, _)| i)
        .collect();
    if keep.len() == table.headers.len() {
        return table;
    }

    let headers = keep.iter().map(|&i| table.headers[i].clone()).collect();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            keep.iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Table::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::cache::testing::ManualClock;
    use super::*;
    use crate::sources::{TabDescriptor, TabSource};
    use chrono::Utc;
    use std::cell::Cell;
    use std::rc::Rc;

    const SAMPLE_CSV: &str = "\
MUNICÍPIO,Código,Unnamed: 2,Ano
Caxias,012,x,2025
Bacabal,340,y,2024
";

    /// Serves one canned body and counts how often it was asked.
    struct CountingFetcher {
        body: &'static str,
        calls: Rc<Cell<usize>>,
    }

    impl Fetch for CountingFetcher {
        fn fetch_text(&self, _url: &str) -> Result<String, PipelineError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.body.to_string())
        }
    }

    fn test_loader(
        body: &'static str,
        ttl: Duration,
        clock: ManualClock,
    ) -> (Loader<CountingFetcher>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let registry = SourceRegistry::new(vec![TabDescriptor {
            name: "CAIXA DE ENTRADA".into(),
            source: TabSource::Published {
                url: "https://example.com/pub?output=csv".into(),
            },
            filterable: true,
        }]);
        let fetcher = CountingFetcher {
            body,
            calls: Rc::clone(&calls),
        };
        (
            Loader::with_fetcher(registry, fetcher, ttl, Box::new(clock)),
            calls,
        )
    }

    #[test]
    fn artifact_columns_are_dropped_and_text_preserved() {
        let clock = ManualClock::new(Utc::now());
        let (mut loader, _) = test_loader(SAMPLE_CSV, DEFAULT_TTL, clock);
        let loaded = loader.load("CAIXA DE ENTRADA").unwrap();

        assert_eq!(loaded.table.headers, vec!["MUNICÍPIO", "Código", "Ano"]);
        // leading zero survives: no numeric inference on load
        assert_eq!(loaded.table.cell(0, 1), "012");
        assert_eq!(loaded.table.cell(1, 2), "2024");
    }

    #[test]
    fn second_load_within_ttl_does_not_fetch() {
        let clock = ManualClock::new(Utc::now());
        let (mut loader, calls) = test_loader(SAMPLE_CSV, DEFAULT_TTL, clock.clone());

        let first = loader.load("CAIXA DE ENTRADA").unwrap();
        clock.advance(Duration::from_secs(1800));
        let second = loader.load("CAIXA DE ENTRADA").unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(first.table, second.table);
    }

    #[test]
    fn load_after_expiry_fetches_exactly_once_more() {
        let clock = ManualClock::new(Utc::now());
        let ttl = Duration::from_secs(3600);
        let (mut loader, calls) = test_loader(SAMPLE_CSV, ttl, clock.clone());

        loader.load("CAIXA DE ENTRADA").unwrap();
        clock.advance(Duration::from_secs(3601));
        loader.load("CAIXA DE ENTRADA").unwrap();
        loader.load("CAIXA DE ENTRADA").unwrap();

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn unknown_tab_fails_without_fetching() {
        let clock = ManualClock::new(Utc::now());
        let (mut loader, calls) = test_loader(SAMPLE_CSV, DEFAULT_TTL, clock);

        match loader.load("MISSING") {
            Err(PipelineError::UnknownTab(name)) => assert_eq!(name, "MISSING"),
            other => panic!("expected UnknownTab, got {other:?}"),
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let clock = ManualClock::new(Utc::now());
        let (mut loader, _) = test_loader("a,b,c\n1\n", DEFAULT_TTL, clock);
        let loaded = loader.load("CAIXA DE ENTRADA").unwrap();
        assert_eq!(loaded.table.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn bom_in_the_body_is_stripped() {
        let table = parse_csv("test://", "\u{feff}a,b\n1,2\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
    }
}
