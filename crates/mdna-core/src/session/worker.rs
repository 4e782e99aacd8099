use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::compose::{compose, Channel};
use crate::contrast::ContrastWindow;
use crate::error::{Result, ViewerError};
use crate::pyramid::WindowedImage;
use crate::raster::{Raster16, Raster8};
use crate::windowing::window;

use super::target::PaneId;

/// Called on the worker thread after each finished job, e.g. to request a repaint.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// The 16-bit data a pane displays.
#[derive(Clone, Debug)]
pub enum PaneSource {
    Channel {
        channel: Channel,
        raster: Arc<Raster16>,
    },
    Composite {
        green: Arc<Raster16>,
        red: Arc<Raster16>,
    },
}

impl PaneSource {
    /// Window the full-resolution source into a displayable RGB raster.
    pub fn render(&self, contrast: ContrastWindow) -> Result<Raster8> {
        match self {
            Self::Channel { channel, raster } => channel.broadcast(&window(raster, contrast)),
            Self::Composite { green, red } => {
                let (g, r) = rayon::join(|| window(green, contrast), || window(red, contrast));
                compose(&Channel::Green.broadcast(&g)?, &Channel::Red.broadcast(&r)?)
            }
        }
    }
}

/// One pane to recompute.
pub(crate) struct JobTarget {
    pub(crate) pane: PaneId,
    pub(crate) source: PaneSource,
    pub(crate) contrast: ContrastWindow,
}

/// Commands sent from the interaction thread to the worker thread.
pub(crate) struct ContrastJob {
    pub(crate) generation: u64,
    pub(crate) targets: Vec<JobTarget>,
}

/// Results sent from the worker thread back to the interaction thread.
pub(crate) struct ContrastOutcome {
    pub(crate) generation: u64,
    pub(crate) results: Vec<(PaneId, Result<WindowedImage>)>,
    pub(crate) elapsed: Duration,
}

/// Background thread that windows full-resolution sources.
pub(crate) struct ContrastWorker {
    job_tx: Option<mpsc::Sender<ContrastJob>>,
    result_rx: mpsc::Receiver<ContrastOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl ContrastWorker {
    pub(crate) fn spawn(waker: Option<Waker>) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<ContrastJob>();
        let (result_tx, result_rx) = mpsc::channel::<ContrastOutcome>();

        let handle = std::thread::Builder::new()
            .name("mdna-contrast".into())
            .spawn(move || worker_loop(job_rx, result_tx, waker))?;

        Ok(Self {
            job_tx: Some(job_tx),
            result_rx,
            handle: Some(handle),
        })
    }

    pub(crate) fn submit(&self, job: ContrastJob) -> Result<()> {
        self.job_tx
            .as_ref()
            .ok_or(ViewerError::WorkerGone)?
            .send(job)
            .map_err(|_| ViewerError::WorkerGone)
    }

    pub(crate) fn try_recv(&self) -> Option<ContrastOutcome> {
        self.result_rx.try_recv().ok()
    }

    pub(crate) fn recv(&self) -> Result<ContrastOutcome> {
        self.result_rx.recv().map_err(|_| ViewerError::WorkerGone)
    }
}

impl Drop for ContrastWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    job_rx: mpsc::Receiver<ContrastJob>,
    result_tx: mpsc::Sender<ContrastOutcome>,
    waker: Option<Waker>,
) {
    debug!("Contrast worker started");
    while let Ok(job) = job_rx.recv() {
        let start = Instant::now();
        let results = job
            .targets
            .into_par_iter()
            .map(|target| {
                let windowed = target
                    .source
                    .render(target.contrast)
                    .map(|raster| WindowedImage::new(raster, target.contrast));
                (target.pane, windowed)
            })
            .collect();

        let elapsed = start.elapsed();
        info!(
            generation = job.generation,
            elapsed_ms = elapsed.as_millis() as u64,
            "Contrast recomputed"
        );

        if result_tx
            .send(ContrastOutcome {
                generation: job.generation,
                results,
                elapsed,
            })
            .is_err()
        {
            break;
        }
        if let Some(ref wake) = waker {
            wake();
        }
    }
    debug!("Contrast worker stopped");
}
