//! OCR Worker Pool
//!
//! A fixed-size set of OCR engines with an explicit lifecycle and
//! checkout discipline.
//!
//! # Design
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       OcrWorkerPool                            │
//! │      Uninitialized ──initialize──▶ Ready ──terminate──▶ Terminated
//! │            ▲                                          │        │
//! │            └─────────────── initialize ◀──────────────┘        │
//! │                                                                │
//! │  ready() → ReadyPool                                           │
//! │  acquire() → [permit] → [pop engine] → PooledEngine            │
//! │                                            ↓ drop()            │
//! │                             [push engine] → [release permit]   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The semaphore has exactly one permit per engine, so a holder of a permit
//! always finds an engine in the free list and no engine is ever handed to two
//! tasks at once. Checked-out engine ids are tracked, and an engine that is
//! somehow already out is refused rather than shared.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::engine::{EngineSettings, OcrEngine, OcrEngineFactory};
use super::types::{OcrError, RecognitionConfig};
use crate::document::RasterImage;

/// Default number of engines
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Pool initialization parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of engines (and the OCR concurrency ceiling)
    pub concurrency: usize,
    /// Engine settings, identical for every instance
    pub settings: EngineSettings,
}

impl PoolConfig {
    pub fn new(concurrency: usize, language: impl Into<String>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            concurrency,
            settings: EngineSettings {
                language: language.into(),
                model_path: model_path.into(),
            },
        }
    }
}

/// Pool lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("OCR pool is not initialized")]
    NotInitialized,

    #[error("OCR pool is already initialized with {0} engines")]
    AlreadyInitialized(usize),

    #[error("OCR concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("Failed to create OCR engine {index}: {source}")]
    EngineCreation {
        index: usize,
        #[source]
        source: OcrError,
    },

    #[error("OCR pool was terminated")]
    Terminated,

    #[error("OCR engine {0} is already checked out")]
    EngineBusy(usize),
}

/// Externally visible lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolLifecycle {
    Uninitialized,
    Ready,
    Terminated,
}

enum PoolState {
    Uninitialized,
    Ready(Arc<ReadyPool>),
    Terminated,
}

/// OCR engine pool with an explicit init/teardown lifecycle
///
/// Not a global: create one per process (or per test) and share it via `Arc`.
pub struct OcrWorkerPool {
    factory: Arc<dyn OcrEngineFactory>,
    state: RwLock<PoolState>,
    /// Serializes initialize/terminate, which await engine creation/shutdown
    lifecycle: tokio::sync::Mutex<()>,
}

impl OcrWorkerPool {
    /// Create an uninitialized pool
    pub fn new(factory: Arc<dyn OcrEngineFactory>) -> Self {
        Self {
            factory,
            state: RwLock::new(PoolState::Uninitialized),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Create `config.concurrency` engines and mark the pool ready
    ///
    /// Engines are created one after another. If any creation fails, the
    /// engines created so far are shut down and the pool keeps its state.
    pub async fn initialize(&self, config: PoolConfig) -> Result<(), PoolError> {
        let _lifecycle = self.lifecycle.lock().await;

        if let PoolState::Ready(ready) = &*self.state.read() {
            return Err(PoolError::AlreadyInitialized(ready.size()));
        }
        if config.concurrency == 0 {
            return Err(PoolError::InvalidConcurrency);
        }

        let mut engines: Vec<EngineSlot> = Vec::with_capacity(config.concurrency);
        for index in 0..config.concurrency {
            match self.factory.create(&config.settings).await {
                Ok(engine) => engines.push(EngineSlot { id: index, engine }),
                Err(source) => {
                    tracing::warn!(
                        "Failed to create {} engine {}: {}, releasing {} created engines",
                        self.factory.kind(),
                        index,
                        source,
                        engines.len()
                    );
                    shutdown_all(engines).await;
                    return Err(PoolError::EngineCreation { index, source });
                }
            }
        }

        tracing::info!(
            "OCR pool ready: {} {} engines (language: {}, models: {})",
            config.concurrency,
            self.factory.kind(),
            config.settings.language,
            config.settings.model_path.display()
        );

        let ready = ReadyPool::new(engines, config.settings);
        *self.state.write() = PoolState::Ready(Arc::new(ready));
        Ok(())
    }

    /// Release every engine and mark the pool terminated
    ///
    /// Waits for checked-out engines to come back before shutting them down.
    /// `ready()` fails from the moment this is called.
    pub async fn terminate(&self) {
        let _lifecycle = self.lifecycle.lock().await;

        let previous = std::mem::replace(&mut *self.state.write(), PoolState::Terminated);
        let ready = match previous {
            PoolState::Ready(ready) => ready,
            PoolState::Uninitialized => {
                *self.state.write() = PoolState::Uninitialized;
                return;
            }
            PoolState::Terminated => return,
        };

        let engines = ready.drain().await;
        let count = engines.len();
        shutdown_all(engines).await;
        tracing::info!("OCR pool terminated, released {} engines", count);
    }

    /// Handle to the ready engine set
    pub fn ready(&self) -> Result<Arc<ReadyPool>, PoolError> {
        match &*self.state.read() {
            PoolState::Ready(ready) => Ok(Arc::clone(ready)),
            _ => Err(PoolError::NotInitialized),
        }
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> PoolLifecycle {
        match &*self.state.read() {
            PoolState::Uninitialized => PoolLifecycle::Uninitialized,
            PoolState::Ready(_) => PoolLifecycle::Ready,
            PoolState::Terminated => PoolLifecycle::Terminated,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle() == PoolLifecycle::Ready
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        match &*self.state.read() {
            PoolState::Ready(ready) => ready.stats(),
            PoolState::Uninitialized => PoolStats::empty(PoolLifecycle::Uninitialized),
            PoolState::Terminated => PoolStats::empty(PoolLifecycle::Terminated),
        }
    }
}

struct EngineSlot {
    id: usize,
    engine: Box<dyn OcrEngine>,
}

/// The engines of an initialized pool
pub struct ReadyPool {
    size: usize,
    settings: EngineSettings,
    free: Mutex<Vec<EngineSlot>>,
    /// Ids of engines currently held by a `PooledEngine`
    checked_out: Mutex<HashSet<usize>>,
    permits: Arc<Semaphore>,
    checkouts: AtomicUsize,
    peak_in_use: AtomicUsize,
    double_checkouts: AtomicUsize,
}

impl ReadyPool {
    fn new(engines: Vec<EngineSlot>, settings: EngineSettings) -> Self {
        let size = engines.len();
        Self {
            size,
            settings,
            free: Mutex::new(engines),
            checked_out: Mutex::new(HashSet::with_capacity(size)),
            permits: Arc::new(Semaphore::new(size)),
            checkouts: AtomicUsize::new(0),
            peak_in_use: AtomicUsize::new(0),
            double_checkouts: AtomicUsize::new(0),
        }
    }

    /// Number of engines
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Check out an engine, waiting until one is free
    ///
    /// Fails with `PoolError::Terminated` if the pool is torn down while
    /// waiting, and with `PoolError::EngineBusy` if the free list hands back
    /// an engine that is already checked out.
    pub async fn acquire(self: &Arc<Self>) -> Result<PooledEngine, PoolError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Terminated)?;

        // One permit per engine: a permit holder always finds a free engine
        let slot = self.free.lock().pop().ok_or(PoolError::Terminated)?;

        let in_use = {
            let mut checked_out = self.checked_out.lock();
            checked_out.insert(slot.id).then(|| checked_out.len())
        };
        let Some(in_use) = in_use else {
            let id = slot.id;
            self.double_checkouts.fetch_add(1, Ordering::Relaxed);
            tracing::error!("OCR engine {} is already checked out, refusing to share it", id);
            self.free.lock().push(slot);
            return Err(PoolError::EngineBusy(id));
        };

        self.checkouts.fetch_add(1, Ordering::Relaxed);
        self.peak_in_use.fetch_max(in_use, Ordering::Relaxed);
        tracing::debug!("Checked out OCR engine {}", slot.id);

        Ok(PooledEngine {
            slot: Some(slot),
            pool: Arc::clone(self),
            _permit: permit,
        })
    }

    fn release(&self, slot: EngineSlot) {
        tracing::debug!("Returned OCR engine {}", slot.id);
        self.checked_out.lock().remove(&slot.id);
        self.free.lock().push(slot);
    }

    /// Ids of the engines currently checked out, ascending
    pub fn checked_out(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.checked_out.lock().iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Wait for every engine to be returned, then close the pool
    async fn drain(&self) -> Vec<EngineSlot> {
        match self.permits.acquire_many(self.size as u32).await {
            Ok(permits) => permits.forget(),
            Err(_) => tracing::warn!("OCR pool semaphore closed before drain"),
        }
        self.permits.close();
        std::mem::take(&mut *self.free.lock())
    }

    pub fn stats(&self) -> PoolStats {
        let available = self.free.lock().len();
        PoolStats {
            state: PoolLifecycle::Ready,
            size: self.size,
            available,
            in_use: self.size - available,
            checkouts: self.checkouts.load(Ordering::Relaxed),
            peak_in_use: self.peak_in_use.load(Ordering::Relaxed),
            double_checkouts: self.double_checkouts.load(Ordering::Relaxed),
        }
    }
}

async fn shutdown_all(engines: Vec<EngineSlot>) {
    for mut slot in engines {
        if let Err(e) = slot.engine.shutdown().await {
            tracing::warn!("Failed to shut down OCR engine {}: {}", slot.id, e);
        }
    }
}

/// RAII guard - returns the engine to the pool on drop
pub struct PooledEngine {
    slot: Option<EngineSlot>,
    pool: Arc<ReadyPool>,
    _permit: OwnedSemaphorePermit,
}

impl PooledEngine {
    /// Index of the engine within its pool (0..size)
    pub fn id(&self) -> usize {
        self.slot.as_ref().map(|s| s.id).unwrap_or_default()
    }

    /// Recognize `image` with the checked-out engine
    pub async fn recognize(
        &mut self,
        image: &RasterImage,
        config: &RecognitionConfig,
    ) -> Result<String, OcrError> {
        match self.slot.as_mut() {
            Some(slot) => slot.engine.recognize(image, config).await,
            None => Err(OcrError::EngineNotAvailable("engine already returned".into())),
        }
    }
}

impl Drop for PooledEngine {
    fn drop(&mut self) {
        // Engine goes back before the permit is released (field drop order)
        if let Some(slot) = self.slot.take() {
            self.pool.release(slot);
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    pub state: PoolLifecycle,
    /// Number of engines
    pub size: usize,
    /// Engines currently free
    pub available: usize,
    /// Engines currently checked out
    pub in_use: usize,
    /// Total checkouts since initialization
    pub checkouts: usize,
    /// Most engines checked out at the same time
    pub peak_in_use: usize,
    /// Checkouts refused because the engine was already out
    pub double_checkouts: usize,
}

impl PoolStats {
    fn empty(state: PoolLifecycle) -> Self {
        Self {
            state,
            size: 0,
            available: 0,
            in_use: 0,
            checkouts: 0,
            peak_in_use: 0,
            double_checkouts: 0,
        }
    }
}
