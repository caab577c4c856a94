// src/services/extractor.rs

//! Concurrent h1/h2/h3/p/a extraction.
//!
//! One call parses the page once on the blocking pool, then fans out exactly
//! five blocking tasks (one per category) over the same `Arc<Document>` and
//! joins them. Every task writes only its own output slot, so no locking is
//! involved. The call either returns all five sequences or an error; it never
//! returns a partial result.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{ExtractError, ParseError};
use crate::models::{
    Category, CategorySlots, Document, ExtractionResult, ExtractorConfig, PageMetadata, RawDocument,
};
use crate::services::collector::{CategoryCollector, CollectError, TagCollector};

type TaskOutput = (Category, std::thread::Result<Result<Vec<String>, CollectError>>);

/// Runs the five per-category collections in parallel.
pub struct Extractor<C = TagCollector> {
    collector: Arc<C>,
}

impl Extractor<TagCollector> {
    /// Create an extractor with the tag-name collector.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self::with_collector(TagCollector::new(config))
    }
}

impl Default for Extractor<TagCollector> {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl<C> Clone for Extractor<C> {
    fn clone(&self) -> Self {
        Self {
            collector: Arc::clone(&self.collector),
        }
    }
}

impl<C: CategoryCollector> Extractor<C> {
    /// Create an extractor around a custom collector.
    pub fn with_collector(collector: C) -> Self {
        Self {
            collector: Arc::new(collector),
        }
    }

    /// Parse a fetched page and extract all five categories.
    pub async fn extract(
        &self,
        raw: RawDocument,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, ExtractError> {
        let (document, _) = parse(raw, cancel).await?;
        self.extract_document(document, cancel).await
    }

    /// Parse a fetched page, read its metadata and extract all five categories.
    pub async fn extract_page(
        &self,
        raw: RawDocument,
        cancel: &CancellationToken,
    ) -> Result<(PageMetadata, ExtractionResult), ExtractError> {
        let (document, metadata) = parse(raw, cancel).await?;
        let data = self.extract_document(document, cancel).await?;
        Ok((metadata, data))
    }

    /// Extract all five categories from an already-parsed document.
    pub async fn extract_document(
        &self,
        document: Arc<Document>,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, ExtractError> {
        if cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }

        // Fires on every early return, and when this future is dropped.
        let tasks_token = cancel.child_token();
        let _stop_tasks = tasks_token.clone().drop_guard();

        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
        for category in Category::ALL {
            let document = Arc::clone(&document);
            let collector = Arc::clone(&self.collector);
            let token = tasks_token.clone();
            tasks.spawn_blocking(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    collector.collect(&document, category, &token)
                }));
                (category, outcome)
            });
        }

        let mut slots = CategorySlots::default();
        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("Extraction cancelled by caller");
                    return Err(ExtractError::Cancelled);
                }
                joined = tasks.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((category, Ok(Ok(texts)))) => {
                    log::trace!("<{}> collected {} entries", category, texts.len());
                    slots.fill(category, texts);
                }
                Ok((category, Ok(Err(CollectError::Cancelled)))) => {
                    if cancel.is_cancelled() {
                        return Err(ExtractError::Cancelled);
                    }
                    return Err(ExtractError::task(category, CollectError::Cancelled));
                }
                Ok((category, Ok(Err(CollectError::Failed(message))))) => {
                    log::warn!("Collecting <{}> failed: {}", category, message);
                    return Err(ExtractError::task(category, message));
                }
                Ok((category, Err(payload))) => {
                    let message = panic_message(payload.as_ref());
                    log::warn!("Collecting <{}> panicked: {}", category, message);
                    return Err(ExtractError::task(category, format!("panicked: {message}")));
                }
                Err(error) => return Err(ExtractError::Join(error.to_string())),
            }
        }

        slots
            .into_result()
            .map_err(|category| ExtractError::task(category, "task produced no output"))
    }
}

/// Decode and parse `raw` on the blocking pool.
async fn parse(
    raw: RawDocument,
    cancel: &CancellationToken,
) -> Result<(Arc<Document>, PageMetadata), ExtractError> {
    if cancel.is_cancelled() {
        return Err(ExtractError::Cancelled);
    }

    let parsing = tokio::task::spawn_blocking(move || {
        let document = Document::from_raw(&raw)?;
        log::debug!(
            "Parsed {} ({} bytes, {} nodes)",
            raw.source,
            raw.body.len(),
            document.nodes().len()
        );
        let metadata = PageMetadata::from_document(&document);
        Ok::<_, ParseError>((Arc::new(document), metadata))
    });

    let parsed = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ExtractError::Cancelled),
        parsed = parsing => parsed,
    };
    match parsed {
        Ok(parsed) => Ok(parsed?),
        Err(error) => Err(ExtractError::Join(error.to_string())),
    }
}

/// Extract a fetched page with default settings and no external cancellation.
pub async fn extract(raw: RawDocument) -> Result<ExtractionResult, ExtractError> {
    Extractor::default()
        .extract(raw, &CancellationToken::new())
        .await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use tokio::time::timeout;

    use super::*;

    const LIMIT: Duration = Duration::from_secs(5);

    fn raw(html: &str) -> RawDocument {
        RawDocument::from_bytes("test.html", html)
    }

    /// Blocks until its token is cancelled, remembering every token it was given.
    #[derive(Default)]
    struct StallingCollector {
        seen: Arc<Mutex<Vec<CancellationToken>>>,
        fail: Option<Category>,
    }

    impl StallingCollector {
        fn failing(category: Category) -> Self {
            Self {
                fail: Some(category),
                ..Self::default()
            }
        }
    }

    impl CategoryCollector for StallingCollector {
        fn collect(
            &self,
            _document: &Document,
            category: Category,
            cancel: &CancellationToken,
        ) -> Result<Vec<String>, CollectError> {
            self.seen.lock().unwrap().push(cancel.clone());
            if self.fail == Some(category) {
                return Err(CollectError::Failed("walk broke".to_string()));
            }
            while !cancel.is_cancelled() {
                std::thread::sleep(Duration::from_millis(2));
            }
            Err(CollectError::Cancelled)
        }
    }

    struct PanickingCollector(Category);

    impl CategoryCollector for PanickingCollector {
        fn collect(
            &self,
            document: &Document,
            category: Category,
            cancel: &CancellationToken,
        ) -> Result<Vec<String>, CollectError> {
            if category == self.0 {
                panic!("corrupt node");
            }
            TagCollector::default().collect(document, category, cancel)
        }
    }

    /// Holds every call until all five have started, then collects normally.
    #[derive(Default)]
    struct RendezvousCollector {
        started: AtomicUsize,
    }

    impl CategoryCollector for RendezvousCollector {
        fn collect(
            &self,
            document: &Document,
            category: Category,
            cancel: &CancellationToken,
        ) -> Result<Vec<String>, CollectError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let deadline = Instant::now() + LIMIT;
            loop {
                let started = self.started.load(Ordering::SeqCst);
                if started == Category::ALL.len() {
                    break;
                }
                if Instant::now() > deadline {
                    return Err(CollectError::Failed(format!("only {started} tasks in flight")));
                }
                std::thread::sleep(Duration::from_millis(1));
            }
            TagCollector::default().collect(document, category, cancel)
        }
    }

    /// Records when the first collection began.
    #[derive(Default)]
    struct TimedCollector {
        first_call: Mutex<Option<Instant>>,
    }

    impl CategoryCollector for TimedCollector {
        fn collect(
            &self,
            document: &Document,
            category: Category,
            cancel: &CancellationToken,
        ) -> Result<Vec<String>, CollectError> {
            let mut first_call = self.first_call.lock().unwrap();
            if first_call.is_none() {
                *first_call = Some(Instant::now());
            }
            drop(first_call);
            TagCollector::default().collect(document, category, cancel)
        }
    }

    fn all_signalled(seen: &Mutex<Vec<CancellationToken>>) -> bool {
        let seen = seen.lock().unwrap();
        !seen.is_empty() && seen.iter().all(|token| token.is_cancelled())
    }

    /// Wait until every category task has called the collector.
    async fn wait_until_all_started(seen: &Mutex<Vec<CancellationToken>>) {
        timeout(LIMIT, async {
            loop {
                let started = seen.lock().unwrap().len();
                if started == Category::ALL.len() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("not every collection task started");
    }

    #[tokio::test]
    async fn test_title_paragraph_link_example() {
        let result = extract(raw("<h1>Title</h1><p>Hello\n\tworld</p><a>Link </a>"))
            .await
            .unwrap();
        assert_eq!(result.h1, vec!["Title"]);
        assert!(result.h2.is_empty());
        assert!(result.h3.is_empty());
        assert_eq!(result.paragraphs, vec!["Helloworld"]);
        assert_eq!(result.anchors, vec!["Link"]);
    }

    #[tokio::test]
    async fn test_all_five_tasks_run_at_once() {
        let extractor = Extractor::with_collector(RendezvousCollector::default());
        let result = timeout(
            LIMIT * 2,
            extractor.extract(
                raw("<h1>Title</h1><p>Hello\n\tworld</p><a>Link </a>"),
                &CancellationToken::new(),
            ),
        )
        .await
        .expect("extraction hung")
        .unwrap();

        assert_eq!(result.h1, vec!["Title"]);
        assert_eq!(result.paragraphs, vec!["Helloworld"]);
        assert_eq!(result.anchors, vec!["Link"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_parsing_leaves_the_runtime_free() {
        let html = "<p>some words</p>".repeat(100_000);
        let collector = TimedCollector::default();
        let extractor = Extractor::with_collector(collector);

        let ticked = Arc::new(Mutex::new(None));
        let tick = Arc::clone(&ticked);
        tokio::spawn(async move {
            *tick.lock().unwrap() = Some(Instant::now());
        });

        let result = extractor
            .extract(raw(&html), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.paragraphs.len(), 100_000);

        let ticked_at = ticked.lock().unwrap().expect("spawned task never ran");
        let collected_at = extractor
            .collector
            .first_call
            .lock()
            .unwrap()
            .expect("collector never ran");
        assert!(ticked_at < collected_at);
    }

    #[tokio::test]
    async fn test_extract_page_reads_metadata() {
        let html = r#"<html><head><title>Docs</title>
            <meta name="description" content="Reference pages">
            </head><body><h1>Docs</h1><a>Home</a></body></html>"#;
        let (metadata, data) = Extractor::default()
            .extract_page(raw(html), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(metadata.title.as_deref(), Some("Docs"));
        assert_eq!(metadata.description.as_deref(), Some("Reference pages"));
        assert_eq!(metadata.keywords, None);
        assert_eq!(data.h1, vec!["Docs"]);
        assert_eq!(data.anchors, vec!["Home"]);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let result = extract(raw("<html></html>")).await.unwrap();
        assert_eq!(result, ExtractionResult::default());
    }

    #[tokio::test]
    async fn test_headings_land_in_their_own_fields() {
        let result = extract(raw("<h1>one</h1><h2>two</h2><h3>three</h3><h3>four</h3>"))
            .await
            .unwrap();
        assert_eq!(result.h1, vec!["one"]);
        assert_eq!(result.h2, vec!["two"]);
        assert_eq!(result.h3, vec!["three", "four"]);
    }

    #[tokio::test]
    async fn test_deterministic_across_runs() {
        let html = "<h1>a</h1><p>x<a>1</a></p><h2>\tb</h2><a>2</a><p>y</p><h3>c\n</h3>";
        let document = Arc::new(Document::parse(html));
        let extractor = Extractor::default();
        let cancel = CancellationToken::new();

        let first = extractor
            .extract_document(Arc::clone(&document), &cancel)
            .await
            .unwrap();
        for _ in 0..10 {
            let again = extractor
                .extract_document(Arc::clone(&document), &cancel)
                .await
                .unwrap();
            assert_eq!(first, again);
        }
        assert_eq!(first.anchors, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_count_parity_with_empty_elements() {
        let html = "<p> </p><p>\n</p><p>text</p><a></a><h2>\t\t</h2>";
        let document = Document::parse(html);
        let result = extract(raw(html)).await.unwrap();
        for category in Category::ALL {
            assert_eq!(result.get(category).len(), document.count(category.tag()));
        }
        assert_eq!(result.paragraphs, vec!["", "", "text"]);
    }

    #[tokio::test]
    async fn test_h1_independent_of_other_categories() {
        let alone = extract(raw("<h1>Main</h1><h1>Other</h1>")).await.unwrap();
        let crowded = extract(raw(
            "<h2>s</h2><h1>Main</h1><p>p<a>a</a></p><h3>t</h3><h1>Other</h1>",
        ))
        .await
        .unwrap();
        assert_eq!(alone.h1, crowded.h1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_parse_error() {
        let err = extract(RawDocument::from_bytes("bad.html", vec![0x3cu8, 0x70, 0xff, 0xfe]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[tokio::test]
    async fn test_failing_category_is_named_and_does_not_hang() {
        let collector = StallingCollector::failing(Category::H2);
        let seen = Arc::clone(&collector.seen);
        let extractor = Extractor::with_collector(collector);

        let err = timeout(LIMIT, extractor.extract(raw("<h2>x</h2>"), &CancellationToken::new()))
            .await
            .expect("extraction hung")
            .unwrap_err();

        assert_eq!(err.category(), Some(Category::H2));
        assert!(all_signalled(&seen));
    }

    #[tokio::test]
    async fn test_panicking_category_is_reported() {
        let extractor = Extractor::with_collector(PanickingCollector(Category::P));
        let err = timeout(LIMIT, extractor.extract(raw("<p>x</p>"), &CancellationToken::new()))
            .await
            .expect("extraction hung")
            .unwrap_err();

        assert_eq!(err.category(), Some(Category::P));
        assert!(err.to_string().contains("corrupt node"));
    }

    #[tokio::test]
    async fn test_caller_cancellation_stops_all_tasks() {
        let collector = StallingCollector::default();
        let seen = Arc::clone(&collector.seen);
        let extractor = Extractor::with_collector(collector);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        let watched = Arc::clone(&seen);
        tokio::spawn(async move {
            wait_until_all_started(&watched).await;
            trigger.cancel();
        });

        let err = timeout(LIMIT * 2, extractor.extract(raw("<h1>x</h1>"), &cancel))
            .await
            .expect("extraction hung")
            .unwrap_err();

        assert!(matches!(err, ExtractError::Cancelled));
        assert_eq!(seen.lock().unwrap().len(), Category::ALL.len());
        assert!(all_signalled(&seen));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_short_circuits() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = Extractor::default()
            .extract(raw("<h1>x</h1>"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Cancelled));
    }

    #[tokio::test]
    async fn test_dropping_the_call_stops_tasks() {
        let collector = StallingCollector::default();
        let seen = Arc::clone(&collector.seen);
        let extractor = Extractor::with_collector(collector);
        let cancel = CancellationToken::new();

        let outcome = {
            let call = extractor.extract(raw("<p>x</p>"), &cancel);
            tokio::pin!(call);
            tokio::select! {
                result = &mut call => Some(result),
                _ = wait_until_all_started(&seen) => None,
            }
        };

        assert!(outcome.is_none());
        assert!(!cancel.is_cancelled());
        assert_eq!(seen.lock().unwrap().len(), Category::ALL.len());
        assert!(all_signalled(&seen));
    }
}
