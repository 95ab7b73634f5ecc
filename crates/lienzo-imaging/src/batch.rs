// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver — runs the pipeline over many uploads on tokio's blocking
// pool. Images are independent: they may finish in any order and a failure
// in one never affects another, but results come back in input order.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lienzo_core::error::{LienzoError, Result};
use lienzo_core::{NamedImage, Overlay, ProcessingConfig, SourceImage};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::pipeline::Pipeline;

/// Every output produced for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub display_name: String,
    /// The fitted canvas, `None` if it could not be produced.
    pub canvas: Option<NamedImage>,
    /// One slot per overlay, in overlay order.
    pub watermarks: Vec<Option<NamedImage>>,
}

impl BatchItem {
    fn failed(display_name: String, overlay_count: usize) -> Self {
        Self {
            display_name,
            canvas: None,
            watermarks: vec![None; overlay_count],
        }
    }

    /// The outputs that were actually produced.
    pub fn outputs(&self) -> impl Iterator<Item = &NamedImage> {
        self.canvas.iter().chain(self.watermarks.iter().flatten())
    }

    /// Whether every expected output is present.
    pub fn is_complete(&self) -> bool {
        self.canvas.is_some() && self.watermarks.iter().all(Option::is_some)
    }
}

/// Processes uploads concurrently with a shared, read-only overlay list.
#[derive(Clone)]
pub struct BatchProcessor {
    pipeline: Arc<Pipeline>,
    overlays: Arc<[Overlay]>,
    permits: Arc<Semaphore>,
}

impl BatchProcessor {
    /// Build a processor running up to one image per available CPU at a time.
    pub fn new(config: ProcessingConfig, overlays: impl Into<Arc<[Overlay]>>) -> Result<Self> {
        let parallelism = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self::with_concurrency(config, overlays, parallelism)
    }

    pub fn with_concurrency(
        config: ProcessingConfig,
        overlays: impl Into<Arc<[Overlay]>>,
        max_in_flight: usize,
    ) -> Result<Self> {
        if max_in_flight == 0 {
            return Err(LienzoError::InvalidConfig(
                "batch concurrency must be at least 1".into(),
            ));
        }
        Ok(Self {
            pipeline: Arc::new(Pipeline::new(config)?),
            overlays: overlays.into(),
            permits: Arc::new(Semaphore::new(max_in_flight)),
        })
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Process a single upload off the async executor.
    pub async fn process_one(&self, source: SourceImage) -> Result<BatchItem> {
        self.spawn(source).await?.await.map_err(|err| {
            LienzoError::Task(format!("image worker did not complete: {}", err))
        })
    }

    /// Process every upload. The returned items line up with `sources`.
    ///
    /// Dropping the future early lets in-flight images finish on the blocking
    /// pool; their results are discarded.
    #[instrument(skip_all, fields(images = sources.len(), overlays = self.overlays.len()))]
    pub async fn process(&self, sources: Vec<SourceImage>) -> Vec<BatchItem> {
        let mut pending = Vec::with_capacity(sources.len());
        for source in sources {
            let name = source.display_name.clone();
            pending.push((name, self.spawn(source).await));
        }

        let mut items = Vec::with_capacity(pending.len());
        for (name, handle) in pending {
            let joined = match handle {
                Ok(handle) => handle.await.map_err(|err| {
                    LienzoError::Task(format!("image worker did not complete: {}", err))
                }),
                Err(err) => Err(err),
            };
            items.push(joined.unwrap_or_else(|err| {
                warn!(name = %name, %err, "Image dropped from batch");
                BatchItem::failed(name, self.overlays.len())
            }));
        }

        let complete = items.iter().filter(|item| item.is_complete()).count();
        info!(complete, total = items.len(), "Batch finished");
        items
    }

    /// Wait for a free slot, then start `source` on the blocking pool.
    async fn spawn(&self, source: SourceImage) -> Result<JoinHandle<BatchItem>> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|err| LienzoError::Task(format!("batch closed: {}", err)))?;
        let pipeline = Arc::clone(&self.pipeline);
        let overlays = Arc::clone(&self.overlays);

        Ok(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            BatchItem {
                canvas: pipeline.canvas_output(&source),
                watermarks: pipeline.watermark_outputs(&source, &overlays),
                display_name: source.display_name,
            }
        }))
    }
}
