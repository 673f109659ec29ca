use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use pricecat_catalog::{load_snapshot, write_snapshot};
use pricecat_core::{CandidateId, ImageOrigin, ImageTask, ValidationOutcome};
use pricecat_scraper::{
    EnrichEvent, EnrichOptions, ImageDownloader, ImageFetcher, ImageResolver, ImageSearch,
    PricingService, RecordValidator, ScrapeError, SearchBreadth, ValidationEvent,
    ValidationOptions, run_enrichment, run_validation,
};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

// -- Fakes --------------------------------------------------------------------

/// Pricing service that knows a fixed set of products and records every call.
#[derive(Default)]
struct FakePricing {
    products: HashMap<CandidateId, (String, u64)>,
    calls: Mutex<Vec<CandidateId>>,
}

impl FakePricing {
    fn with_product(mut self, id: CandidateId, name: &str, price: u64) -> Self {
        self.products.insert(id, (name.to_string(), price));
        self
    }
}

impl PricingService for FakePricing {
    async fn product_info(&self, id: CandidateId) -> Result<String, ScrapeError> {
        self.calls.lock().unwrap().push(id);
        Ok(match self.products.get(&id) {
            Some((name, _)) => format!(
                "<response><result><item><goodId>{}</goodId><goodName>{}</goodName></item></result></response>",
                id, name
            ),
            None => "<response><result></result></response>".to_string(),
        })
    }

    async fn product_price(&self, id: CandidateId) -> Result<String, ScrapeError> {
        Ok(match self.products.get(&id) {
            Some((_, price)) => format!(
                "<response><result><iros.openapi.service.vo.goodPriceVO><goodPrice>{}</goodPrice></iros.openapi.service.vo.goodPriceVO></result></response>",
                price
            ),
            None => "<response><result></result></response>".to_string(),
        })
    }
}

/// Image search that returns the same links for every query.
#[derive(Default)]
struct FakeSearch {
    links: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl ImageSearch for FakeSearch {
    async fn search(
        &self,
        query: &str,
        _breadth: &SearchBreadth,
    ) -> Result<Vec<String>, ScrapeError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.links.clone())
    }
}

/// Fetcher that echoes the URL back as the body.
#[derive(Default)]
struct EchoFetcher {
    calls: AtomicUsize,
}

impl ImageFetcher for EchoFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(url.as_bytes().to_vec())
    }
}

fn no_delay_options(start: u32, end: u32, batch_size: u32) -> ValidationOptions {
    ValidationOptions::new(start, end, batch_size, Duration::ZERO, Duration::ZERO).unwrap()
}

fn enrich_options(dir: &TempDir) -> EnrichOptions {
    EnrichOptions {
        image_dir: dir.path().to_path_buf(),
        item_delay: Duration::ZERO,
        force_redownload: false,
    }
}

// -- Validation ---------------------------------------------------------------

#[tokio::test]
async fn validation_builds_catalog_and_snapshot() {
    let service = FakePricing::default()
        .with_product(1, "Apple", 1000)
        .with_product(3, "Milk", 2500);
    let validator = RecordValidator::new(service);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let report = run_validation(&validator, &no_delay_options(1, 3, 10), tx).await;

    assert_eq!(report.summary.valid_count, 2);
    assert_eq!(report.summary.invalid_count, 1);
    assert_eq!(report.summary.error_count, 0);
    assert_eq!(report.summary.total_processed, 3);
    let ids: Vec<_> = report.catalog.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(report.catalog.get(1).unwrap().name, "Apple");
    assert_eq!(report.catalog.get(3).unwrap().price, 2500);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("valid_product_ids.json");
    write_snapshot(&path, &report.snapshot()).unwrap();
    let loaded = load_snapshot(&path).unwrap();
    assert_eq!(loaded.catalog(), report.catalog);
    assert_eq!(loaded.total_invalid, 1);

    let mut checked = 0;
    while let Ok(event) = rx.try_recv() {
        if let ValidationEvent::Checked { outcome } = event {
            if outcome.id() == 2 {
                assert_eq!(outcome, ValidationOutcome::Invalid { id: 2 });
            }
            checked += 1;
        }
    }
    assert_eq!(checked, 3);
}

#[tokio::test]
async fn valid_invalid_and_errored_in_one_run() {
    struct TimeoutOnPrice(FakePricing);

    impl PricingService for TimeoutOnPrice {
        async fn product_info(&self, id: CandidateId) -> Result<String, ScrapeError> {
            self.0.product_info(id).await
        }

        async fn product_price(&self, id: CandidateId) -> Result<String, ScrapeError> {
            if id == 102 {
                return Err(ScrapeError::config("operation timed out"));
            }
            self.0.product_price(id).await
        }
    }

    let service = FakePricing::default()
        .with_product(100, "Apple", 1000)
        .with_product(102, "Pear", 800);
    let validator = RecordValidator::new(TimeoutOnPrice(service));
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_validation(&validator, &no_delay_options(100, 102, 10), tx).await;

    assert_eq!(report.summary.valid_count, 1);
    assert_eq!(report.summary.invalid_count, 1);
    assert_eq!(report.summary.error_count, 1);
    assert_eq!(report.summary.total_processed, 3);
    assert_eq!(report.catalog.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].id, 102);
}

#[tokio::test]
async fn batches_cover_range_in_order() {
    let validator = RecordValidator::new(FakePricing::default());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let report = run_validation(&validator, &no_delay_options(1, 25, 10), tx).await;
    assert_eq!(report.summary.total_processed, 25);

    let calls = validator.service().calls.lock().unwrap().clone();
    assert_eq!(calls, (1..=25).collect::<Vec<_>>());

    let mut windows = Vec::new();
    let mut progress = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            ValidationEvent::Started { total, batches, .. } => {
                assert_eq!(total, 25);
                assert_eq!(batches, 3);
            }
            ValidationEvent::BatchFinished {
                window, processed, ..
            } => {
                windows.push((window.start, window.end));
                progress.push(processed);
            }
            _ => {}
        }
    }
    assert_eq!(windows, vec![(1, 10), (11, 20), (21, 25)]);
    assert_eq!(progress, vec![10, 20, 25]);
}

#[tokio::test(start_paused = true)]
async fn delays_fall_between_ids_and_between_batches() {
    struct Timed {
        started: Instant,
        calls: Mutex<Vec<(CandidateId, u128)>>,
    }

    impl PricingService for Timed {
        async fn product_info(&self, id: CandidateId) -> Result<String, ScrapeError> {
            let at = self.started.elapsed().as_millis();
            self.calls.lock().unwrap().push((id, at));
            Ok("<response><result></result></response>".to_string())
        }

        async fn product_price(&self, _id: CandidateId) -> Result<String, ScrapeError> {
            Ok("<response><result></result></response>".to_string())
        }
    }

    let validator = RecordValidator::new(Timed {
        started: Instant::now(),
        calls: Mutex::new(Vec::new()),
    });
    let options = ValidationOptions::new(
        1,
        5,
        2,
        Duration::from_millis(100),
        Duration::from_millis(1000),
    )
    .unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_validation(&validator, &options, tx).await;
    assert_eq!(report.summary.total_processed, 5);

    let calls = validator.service().calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![(1, 0), (2, 100), (3, 1100), (4, 1200), (5, 2200)]
    );
    // Nothing trails the last id.
    assert_eq!(validator.service().started.elapsed().as_millis(), 2200);
}

// -- Enrichment ---------------------------------------------------------------

#[tokio::test]
async fn primary_hit_is_downloaded() {
    let dir = TempDir::new().unwrap();
    let resolver = ImageResolver::new(
        FakeSearch {
            links: vec!["https://img.example/apple.jpg".to_string()],
            ..Default::default()
        },
        SearchBreadth::standard(),
    );
    let downloader = ImageDownloader::new(EchoFetcher::default());
    let tasks = vec![ImageTask::new(1, "Apple", dir.path())];
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_enrichment(&tasks, &resolver, &downloader, &enrich_options(&dir), tx)
        .await
        .unwrap();

    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 0);
    assert_eq!(report.log.summary().from_search, 1);
    assert_eq!(
        std::fs::read(dir.path().join("1.jpg")).unwrap(),
        b"https://img.example/apple.jpg"
    );
}

#[tokio::test]
async fn fallback_then_resume_without_network() {
    let dir = TempDir::new().unwrap();
    let resolver = ImageResolver::new(FakeSearch::default(), SearchBreadth::standard());
    let downloader = ImageDownloader::new(EchoFetcher::default());
    let tasks = vec![ImageTask::new(7, "Widget(500g)", dir.path())];

    // Search has nothing, so the placeholder carrying "Widget" is stored.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let first = run_enrichment(&tasks, &resolver, &downloader, &enrich_options(&dir), tx)
        .await
        .unwrap();
    assert_eq!(first.success_count, 1);
    assert_eq!(
        *resolver.search().queries.lock().unwrap(),
        vec!["Widget".to_string()]
    );

    let stored = std::fs::read_to_string(dir.path().join("7.jpg")).unwrap();
    assert!(stored.starts_with("https://via.placeholder.com/500x500.jpg?text="));
    assert!(stored.ends_with("text=Widget"));

    let mut origins = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let EnrichEvent::ItemResolved { origin, .. } = event {
            origins.push(origin);
        }
    }
    assert_eq!(origins, vec![ImageOrigin::Fallback]);

    // Second pass: the file exists, so neither search nor fetch is touched.
    let (tx, _rx) = mpsc::unbounded_channel();
    let second = run_enrichment(&tasks, &resolver, &downloader, &enrich_options(&dir), tx)
        .await
        .unwrap();
    assert_eq!(second.success_count, 1);
    assert_eq!(second.failure_count, 0);
    assert_eq!(second.log.summary().skipped, 1);
    assert_eq!(resolver.search().queries.lock().unwrap().len(), 1);
    assert_eq!(downloader.fetcher().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn forced_retry_refetches_existing_image() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("7.jpg"), b"placeholder").unwrap();
    let resolver = ImageResolver::new(
        FakeSearch {
            links: vec!["https://img.example/widget-large.jpg".to_string()],
            ..Default::default()
        },
        SearchBreadth::thorough(),
    );
    let downloader = ImageDownloader::new(EchoFetcher::default());
    let tasks = vec![ImageTask::new(7, "Widget", dir.path())];
    let mut options = EnrichOptions::new(dir.path(), resolver.breadth());
    options.item_delay = Duration::ZERO;
    options.force_redownload = true;
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_enrichment(&tasks, &resolver, &downloader, &options, tx)
        .await
        .unwrap();
    assert_eq!(report.success_count, 1);
    assert_eq!(
        std::fs::read(dir.path().join("7.jpg")).unwrap(),
        b"https://img.example/widget-large.jpg"
    );
}

#[tokio::test]
async fn failed_fetch_is_counted_and_run_continues() {
    struct FlakyFetcher;

    impl ImageFetcher for FlakyFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
            if url.contains("Broken") {
                Err(ScrapeError::config("host unreachable"))
            } else {
                Ok(b"ok".to_vec())
            }
        }
    }

    let dir = TempDir::new().unwrap();
    let resolver = ImageResolver::new(FakeSearch::default(), SearchBreadth::standard());
    let downloader = ImageDownloader::new(FlakyFetcher);
    let tasks = vec![
        ImageTask::new(1, "Broken thing", dir.path()),
        ImageTask::new(2, "Fine thing", dir.path()),
    ];
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_enrichment(&tasks, &resolver, &downloader, &enrich_options(&dir), tx)
        .await
        .unwrap();
    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 1);
    assert!(!dir.path().join("1.jpg").exists());
    assert!(dir.path().join("2.jpg").exists());
}

#[tokio::test(start_paused = true)]
async fn skipped_and_last_items_do_not_pause() {
    struct TimedFetcher {
        started: Instant,
        calls: Mutex<Vec<u128>>,
    }

    impl ImageFetcher for TimedFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, ScrapeError> {
            let at = self.started.elapsed().as_millis();
            self.calls.lock().unwrap().push(at);
            Ok(b"jpeg".to_vec())
        }
    }

    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("1.jpg"), b"stored").unwrap();
    let resolver = ImageResolver::new(FakeSearch::default(), SearchBreadth::standard());
    let started = Instant::now();
    let downloader = ImageDownloader::new(TimedFetcher {
        started,
        calls: Mutex::new(Vec::new()),
    });
    let tasks = vec![
        ImageTask::new(1, "Stored", dir.path()),
        ImageTask::new(2, "Apple", dir.path()),
        ImageTask::new(3, "Pear", dir.path()),
    ];
    let mut options = enrich_options(&dir);
    options.item_delay = Duration::from_millis(200);
    let (tx, _rx) = mpsc::unbounded_channel();

    let report = run_enrichment(&tasks, &resolver, &downloader, &options, tx)
        .await
        .unwrap();
    assert_eq!(report.success_count, 3);
    assert_eq!(report.log.summary().skipped, 1);

    assert_eq!(*downloader.fetcher().calls.lock().unwrap(), vec![0, 200]);
    assert_eq!(started.elapsed().as_millis(), 200);
}
