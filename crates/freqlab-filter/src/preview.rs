//! Background preview worker with last-request-wins delivery.
//!
//! Interactive controls submit a request on every parameter change. The
//! worker thread runs `apply` off the caller's thread; results for anything
//! but the most recent submission are dropped, both before computing (the
//! job was superseded while queued) and on delivery. Dropping the worker
//! raises a stop flag, so jobs still queued at that point are never computed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use freqlab_types::config::{FilterSpec, PipelineConfig};
use freqlab_types::error::{FreqError, FreqResult};
use ndarray::Array2;
use tracing::{debug, warn};

use crate::pipeline::{apply, FilterOutput};

struct PreviewJob {
    generation: u64,
    image: Arc<Array2<f64>>,
    spec: FilterSpec,
}

/// Outcome of one submission, tagged with its generation.
#[derive(Debug)]
pub struct PreviewResult {
    pub generation: u64,
    pub result: FreqResult<FilterOutput>,
}

pub struct PreviewWorker {
    tx: Option<Sender<PreviewJob>>,
    rx: Receiver<PreviewResult>,
    latest: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    pub fn spawn(config: PipelineConfig) -> FreqResult<Self> {
        config.validate()?;
        let (job_tx, job_rx) = channel::<PreviewJob>();
        let (result_tx, result_rx) = channel::<PreviewResult>();
        let latest = Arc::new(AtomicU64::new(0));
        let worker_latest = Arc::clone(&latest);
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("freqlab-preview".to_string())
            .spawn(move || {
                run_worker_loop(job_rx, result_tx, worker_latest, worker_stop, config)
            })?;

        Ok(PreviewWorker {
            tx: Some(job_tx),
            rx: result_rx,
            latest,
            stop,
            handle: Some(handle),
        })
    }

    /// Queue a request. Returns its generation; any earlier request is superseded.
    ///
    /// The image is shared, not copied, so one loaded source can feed many
    /// requests.
    pub fn submit(&self, image: Arc<Array2<f64>>, spec: FilterSpec) -> FreqResult<u64> {
        let tx = self.tx.as_ref().ok_or_else(worker_stopped)?;
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        tx.send(PreviewJob {
            generation,
            image,
            spec,
        })
        .map_err(|_| worker_stopped())?;
        Ok(generation)
    }

    /// Generation of the most recent submission (0 before the first).
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    fn is_current(&self, result: &PreviewResult) -> bool {
        let current = result.generation == self.latest_generation();
        if !current {
            debug!(generation = result.generation, "discarding stale preview");
        }
        current
    }

    /// Non-blocking: the result for the latest submission, if it has arrived.
    pub fn poll(&self) -> Option<PreviewResult> {
        let mut newest = None;
        while let Ok(result) = self.rx.try_recv() {
            if self.is_current(&result) {
                newest = Some(result);
            }
        }
        newest
    }

    /// Block until the latest submission's result arrives, or `timeout` passes.
    pub fn wait_latest(&self, timeout: Duration) -> Option<PreviewResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.rx.recv_timeout(remaining) {
                Ok(result) if self.is_current(&result) => return Some(result),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }
}

fn run_worker_loop(
    jobs: Receiver<PreviewJob>,
    results: Sender<PreviewResult>,
    latest: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
    config: PipelineConfig,
) {
    while let Ok(job) = jobs.recv() {
        if stop.load(Ordering::Acquire) {
            debug!(generation = job.generation, "preview worker stopping");
            break;
        }
        if job.generation < latest.load(Ordering::Acquire) {
            debug!(generation = job.generation, "skipping superseded preview");
            continue;
        }
        let result = apply(&job.image, &job.spec, &config);
        let delivered = results.send(PreviewResult {
            generation: job.generation,
            result,
        });
        if delivered.is_err() {
            break;
        }
    }
}

fn worker_stopped() -> FreqError {
    FreqError::Pipeline("preview worker has stopped".to_string())
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        // Queued jobs are skipped; closing the channel ends an idle loop
        self.stop.store(true, Ordering::Release);
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("preview worker thread panicked");
            }
        }
    }
}
