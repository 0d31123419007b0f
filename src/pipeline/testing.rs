//! Test doubles for the document backend and OCR engines

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::document::{
    DocumentError, DocumentLoader, DocumentResult, ImageFormat, LoadedDocument, PageRasterizer,
    RasterImage, RasterOptions,
};
use crate::ocr::{EngineSettings, OcrEngine, OcrEngineFactory, OcrEngineKind, OcrError, RecognitionConfig};

type DelayFn = fn(usize) -> Duration;

/// Deterministic text of exactly `len` chars with no surrounding whitespace
pub fn text_of_len(len: usize) -> String {
    (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect()
}

/// Scripted text-layer behaviour for one page
#[derive(Debug, Clone)]
pub enum PageScript {
    Fragments(Vec<String>),
    Fail,
}

impl PageScript {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Fragments(vec![text.into()])
    }

    pub fn fragments(fragments: Vec<String>) -> Self {
        Self::Fragments(fragments)
    }

    pub fn fail() -> Self {
        Self::Fail
    }
}

/// Loaded document that replays a script per page
pub struct ScriptedDocument {
    pages: Arc<Vec<PageScript>>,
    text_calls: Arc<AtomicUsize>,
}

impl ScriptedDocument {
    pub fn new(pages: Vec<PageScript>) -> Self {
        Self {
            pages: Arc::new(pages),
            text_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoadedDocument for ScriptedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn text_fragments(&self, page: usize) -> DocumentResult<Vec<String>> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        match page.checked_sub(1).and_then(|i| self.pages.get(i)) {
            Some(PageScript::Fragments(fragments)) => Ok(fragments.clone()),
            Some(PageScript::Fail) => Err(DocumentError::TextExtractionError(format!(
                "scripted failure on page {}",
                page
            ))),
            None => Err(DocumentError::PageNotFound {
                page,
                page_count: self.pages.len(),
            }),
        }
    }
}

/// Loader handing out `ScriptedDocument`s that share call counters
pub struct ScriptedLoader {
    pages: Arc<Vec<PageScript>>,
    loads: AtomicUsize,
    text_calls: Arc<AtomicUsize>,
    fail_parse: AtomicBool,
}

impl ScriptedLoader {
    pub fn new(pages: Vec<PageScript>) -> Self {
        Self {
            pages: Arc::new(pages),
            loads: AtomicUsize::new(0),
            text_calls: Arc::new(AtomicUsize::new(0)),
            fail_parse: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `load` fail
    pub fn fail_parse(&self) {
        self.fail_parse.store(true, Ordering::SeqCst);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentLoader for ScriptedLoader {
    async fn load(&self, _data: Arc<[u8]>) -> DocumentResult<Box<dyn LoadedDocument>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_parse.load(Ordering::SeqCst) {
            return Err(DocumentError::ParseError("scripted parse failure".into()));
        }
        Ok(Box::new(ScriptedDocument {
            pages: Arc::clone(&self.pages),
            text_calls: Arc::clone(&self.text_calls),
        }))
    }
}

/// Tracks a current count and its high-water mark
#[derive(Debug, Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Rasterizer that encodes the page number into the image bytes
pub struct FakeRasterizer {
    delay: Option<DelayFn>,
    fail_pages: HashSet<usize>,
    panic_pages: HashSet<usize>,
    gauge: Gauge,
    rasterized: Mutex<Vec<usize>>,
    received_lengths: Mutex<Vec<usize>>,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self {
            delay: None,
            fail_pages: HashSet::new(),
            panic_pages: HashSet::new(),
            gauge: Gauge::default(),
            rasterized: Mutex::new(Vec::new()),
            received_lengths: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: DelayFn) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_on(mut self, page: usize) -> Self {
        self.fail_pages.insert(page);
        self
    }

    pub fn panic_on(mut self, page: usize) -> Self {
        self.panic_pages.insert(page);
        self
    }

    pub fn peak_concurrent(&self) -> usize {
        self.gauge.peak()
    }

    /// Pages rasterized successfully, in completion order
    pub fn rasterized_pages(&self) -> Vec<usize> {
        self.rasterized.lock().clone()
    }

    /// Length of the byte copy each call received
    pub fn received_lengths(&self) -> Vec<usize> {
        self.received_lengths.lock().clone()
    }
}

#[async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn rasterize(
        &self,
        data: Vec<u8>,
        page: usize,
        options: &RasterOptions,
    ) -> DocumentResult<RasterImage> {
        self.received_lengths.lock().push(data.len());
        self.gauge.enter();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(page)).await;
        }
        self.gauge.exit();

        if self.panic_pages.contains(&page) {
            panic!("scripted rasterizer panic on page {}", page);
        }
        if self.fail_pages.contains(&page) {
            return Err(DocumentError::RenderError(format!(
                "scripted render failure on page {}",
                page
            )));
        }

        self.rasterized.lock().push(page);
        Ok(RasterImage {
            data: format!("page:{}", page).into_bytes(),
            format: options.format,
            width: 1,
            height: 1,
        })
    }
}

/// Shared instrumentation for every engine a `RecordingEngineFactory` creates
#[derive(Debug, Default)]
pub struct EngineActivity {
    in_use: Gauge,
    recognized: Mutex<Vec<usize>>,
}

impl EngineActivity {
    /// Most engines recognizing at the same time
    pub fn peak_in_use(&self) -> usize {
        self.in_use.peak()
    }

    /// Pages recognized, in completion order
    pub fn recognized_pages(&self) -> Vec<usize> {
        self.recognized.lock().clone()
    }
}

/// Engine factory that counts creations/shutdowns and instruments engines
pub struct RecordingEngineFactory {
    created: AtomicUsize,
    shut_down: Arc<AtomicUsize>,
    fail_creation_at: Option<usize>,
    fail_pages: Arc<HashSet<usize>>,
    delay: Option<DelayFn>,
    activity: Arc<EngineActivity>,
}

impl RecordingEngineFactory {
    pub fn new() -> Self {
        Self {
            created: AtomicUsize::new(0),
            shut_down: Arc::new(AtomicUsize::new(0)),
            fail_creation_at: None,
            fail_pages: Arc::new(HashSet::new()),
            delay: None,
            activity: Arc::new(EngineActivity::default()),
        }
    }

    /// Fail the creation of the engine with this (0-based) index
    pub fn fail_creation_at(mut self, index: usize) -> Self {
        self.fail_creation_at = Some(index);
        self
    }

    pub fn fail_recognition_on(mut self, page: usize) -> Self {
        let mut pages = (*self.fail_pages).clone();
        pages.insert(page);
        self.fail_pages = Arc::new(pages);
        self
    }

    pub fn with_delay(mut self, delay: DelayFn) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn shut_down(&self) -> usize {
        self.shut_down.load(Ordering::SeqCst)
    }

    pub fn activity(&self) -> &EngineActivity {
        &self.activity
    }
}

#[async_trait]
impl OcrEngineFactory for RecordingEngineFactory {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Tesseract
    }

    async fn create(&self, _settings: &EngineSettings) -> Result<Box<dyn OcrEngine>, OcrError> {
        let index = self.created.load(Ordering::SeqCst);
        if self.fail_creation_at == Some(index) {
            return Err(OcrError::InitializationError(format!(
                "scripted creation failure for engine {}",
                index
            )));
        }
        self.created.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(RecordingEngine {
            delay: self.delay,
            fail_pages: Arc::clone(&self.fail_pages),
            activity: Arc::clone(&self.activity),
            shut_down: Arc::clone(&self.shut_down),
        }))
    }
}

struct RecordingEngine {
    delay: Option<DelayFn>,
    fail_pages: Arc<HashSet<usize>>,
    activity: Arc<EngineActivity>,
    shut_down: Arc<AtomicUsize>,
}

fn page_of(image: &RasterImage) -> usize {
    std::str::from_utf8(&image.data)
        .ok()
        .and_then(|s| s.strip_prefix("page:"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl OcrEngine for RecordingEngine {
    async fn recognize(
        &mut self,
        image: &RasterImage,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        assert_eq!(*config, RecognitionConfig::default());
        assert_eq!(image.format, ImageFormat::Png);

        self.activity.in_use.enter();

        let page = page_of(image);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(page)).await;
        }

        self.activity.in_use.exit();

        if self.fail_pages.contains(&page) {
            return Err(OcrError::ProcessingError(format!(
                "scripted recognition failure on page {}",
                page
            )));
        }

        self.activity.recognized.lock().push(page);
        Ok(format!("  recognized text for page {}\n", page))
    }

    async fn shutdown(&mut self) -> Result<(), OcrError> {
        self.shut_down.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
