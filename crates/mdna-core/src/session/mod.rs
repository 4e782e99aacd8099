//! Viewer session: loaded channel sources, contrast state and the displayed panes.
//!
//! All viewport and pyramid state is owned and mutated on the caller's thread.
//! Contrast changes are windowed on a background worker; the caller drains
//! finished results with [`ViewerSession::poll`] (interactive use) or
//! [`ViewerSession::flush_contrast`] (scripted use).

mod pane;
mod target;
mod worker;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::compose::Channel;
use crate::config::ViewerConfig;
use crate::contrast::ContrastWindow;
use crate::error::{Result, ViewerError};
use crate::io::image_io::load_channel;
use crate::pyramid::{PyramidLevel, WindowedImage};
use crate::raster::{Dims, Raster16};
use crate::viewport::{CanvasPos, ViewFrame};
use crate::windowing::default_window;

pub use pane::{Pane, PixelReadout};
pub use target::{ContrastTarget, PaneId};
pub use worker::{PaneSource, Waker};

use worker::{ContrastJob, ContrastOutcome, ContrastWorker, JobTarget};

/// Contrast requests waiting for the debounce period to pass.
#[derive(Debug, Default)]
struct PendingContrast {
    panes: BTreeSet<PaneId>,
    requested_at: Option<Instant>,
}

impl PendingContrast {
    fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    fn clear(&mut self) {
        self.panes.clear();
        self.requested_at = None;
    }
}

pub struct ViewerSession {
    config: ViewerConfig,
    green: Option<Arc<Raster16>>,
    red: Option<Arc<Raster16>>,
    panes: Vec<Pane>,
    target: ContrastTarget,
    /// Split-view selection restored when leaving composite view.
    split_target: ContrastTarget,
    split_windows: BTreeMap<PaneId, ContrastWindow>,
    composite_window: Option<ContrastWindow>,
    canvases: BTreeMap<PaneId, Dims>,
    generation: u64,
    pending: PendingContrast,
    in_flight: Option<u64>,
    worker: ContrastWorker,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Like [`ViewerSession::new`], calling `waker` whenever a contrast
    /// recompute finishes so the display thread can poll.
    pub fn with_waker(config: ViewerConfig, waker: Waker) -> Result<Self> {
        Self::build(config, Some(waker))
    }

    fn build(config: ViewerConfig, waker: Option<Waker>) -> Result<Self> {
        let worker = ContrastWorker::spawn(waker)?;
        Ok(Self {
            config,
            green: None,
            red: None,
            panes: Vec::new(),
            target: ContrastTarget::None,
            split_target: ContrastTarget::Both,
            split_windows: BTreeMap::new(),
            composite_window: None,
            canvases: BTreeMap::new(),
            generation: 0,
            pending: PendingContrast::default(),
            in_flight: None,
            worker,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Decode the green and optional red TIFF, then replace the session state.
    /// On failure the previous images stay displayed.
    pub fn load(&mut self, green: &Path, red: Option<&Path>) -> Result<()> {
        let green_raster = load_channel(green)?;
        let red_raster = red.map(load_channel).transpose()?;
        info!(
            green = %green.display(),
            red = ?red.map(|p| p.display().to_string()),
            "Images loaded"
        );
        self.load_rasters(green_raster, red_raster);
        Ok(())
    }

    /// Replace the session state with already decoded single-channel sources.
    pub fn load_rasters(&mut self, green: Raster16, red: Option<Raster16>) {
        self.green = Some(Arc::new(green));
        self.red = red.map(Arc::new);
        self.split_windows.clear();
        self.composite_window = None;
        self.split_target = if self.red.is_some() {
            ContrastTarget::Both
        } else {
            ContrastTarget::Green
        };
        self.target = self.split_target;
        self.rebuild_split_panes();
    }

    pub fn is_loaded(&self) -> bool {
        self.green.is_some()
    }

    pub fn has_composite(&self) -> bool {
        self.green.is_some() && self.red.is_some()
    }

    pub fn target(&self) -> ContrastTarget {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn pane(&self, id: PaneId) -> Result<&Pane> {
        self.panes
            .iter()
            .find(|p| p.id() == id)
            .ok_or(ViewerError::NoSuchPane(id))
    }

    fn pane_mut(&mut self, id: PaneId) -> Result<&mut Pane> {
        self.panes
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(ViewerError::NoSuchPane(id))
    }

    /// Choose which split panes the next contrast change applies to. While the
    /// composite is shown the choice is stored and takes effect on the way back.
    pub fn select_target(&mut self, target: ContrastTarget) -> Result<()> {
        if !self.is_loaded() {
            return Err(ViewerError::NoImageLoaded);
        }
        if !target.is_split() {
            return Err(ViewerError::NotSplitTarget(target));
        }
        let missing = target.panes().iter().find(|id| match id {
            PaneId::Red => self.red.is_none(),
            _ => false,
        });
        if let Some(&id) = missing {
            return Err(ViewerError::NoSuchPane(id));
        }

        self.split_target = target;
        if !self.target.is_composite() {
            self.target = target;
        }
        debug!(selection = %target, "Contrast target selected");
        Ok(())
    }

    /// Switch between the per-channel panes and the single composite pane.
    /// Each view keeps its own last contrast windows.
    pub fn toggle_composite_mode(&mut self) -> Result<()> {
        let (green, red) = match (&self.green, &self.red) {
            (Some(g), Some(r)) => (Arc::clone(g), Arc::clone(r)),
            (None, _) => return Err(ViewerError::NoImageLoaded),
            _ => return Err(ViewerError::CompositeUnavailable),
        };

        if self.target.is_composite() {
            self.target = self.split_target;
            self.rebuild_split_panes();
            info!(selection = %self.target, "Split view");
            return Ok(());
        }

        green.ensure_same_size(&red)?;
        let contrast = match self.composite_window {
            Some(w) => w,
            None => {
                let (g, r) = (default_window(&green), default_window(&red));
                ContrastWindow::from_bounds(
                    g.lower().min(r.lower()) as i64,
                    g.upper().max(r.upper()) as i64,
                )
            }
        };
        let source = PaneSource::Composite { green, red };
        let windowed = WindowedImage::new(source.render(contrast)?, contrast);

        self.begin_generation();
        self.composite_window = Some(contrast);
        self.target = ContrastTarget::Combined;
        let canvas = self.canvas_for(PaneId::Combined);
        let dims = windowed.dims();
        self.panes = vec![Pane::new(
            PaneId::Combined,
            source,
            dims,
            windowed,
            canvas,
            self.config.zoom.clone(),
        )];
        info!(window = %contrast, "Composite view");
        Ok(())
    }

    fn rebuild_split_panes(&mut self) {
        self.begin_generation();
        let sources = [(Channel::Green, self.green.clone()), (Channel::Red, self.red.clone())];
        let mut panes = Vec::with_capacity(2);
        for (channel, raster) in sources {
            let Some(raster) = raster else { continue };
            let id = PaneId::from(channel);
            let contrast = *self
                .split_windows
                .entry(id)
                .or_insert_with(|| default_window(&raster));
            let source = PaneSource::Channel {
                channel,
                raster: Arc::clone(&raster),
            };
            let windowed = match source.render(contrast) {
                Ok(raster) => WindowedImage::new(raster, contrast),
                Err(e) => {
                    warn!(pane = %id, error = %e, "Could not window channel");
                    continue;
                }
            };
            let canvas = self.canvas_for(id);
            panes.push(Pane::new(
                id,
                source,
                raster.dims(),
                windowed,
                canvas,
                self.config.zoom.clone(),
            ));
        }
        self.panes = panes;
    }

    /// Invalidate in-flight and pending contrast work.
    fn begin_generation(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    fn canvas_for(&self, id: PaneId) -> Dims {
        self.canvases.get(&id).copied().unwrap_or(self.config.canvas)
    }

    /// Last window requested for `pane`, which may not be applied yet.
    pub fn contrast_for(&self, pane: PaneId) -> Option<ContrastWindow> {
        match pane {
            PaneId::Combined => self.composite_window,
            _ => self.split_windows.get(&pane).copied(),
        }
    }

    /// Window shown in the contrast controls: the one of the first targeted pane.
    pub fn requested_contrast(&self) -> Option<ContrastWindow> {
        self.target
            .panes()
            .first()
            .and_then(|id| self.contrast_for(*id))
    }

    /// Record `window` for the active target and queue a background recompute.
    pub fn set_contrast(&mut self, window: ContrastWindow) -> Result<()> {
        if !self.is_loaded() {
            return Err(ViewerError::NoImageLoaded);
        }
        for &id in self.target.panes() {
            if id == PaneId::Combined {
                self.composite_window = Some(window);
            } else {
                self.split_windows.insert(id, window);
            }
            self.pending.panes.insert(id);
        }
        self.pending.requested_at = Some(Instant::now());
        debug!(selection = %self.target, window = %window, "Contrast requested");
        self.dispatch_if_due(Instant::now())
    }

    pub fn set_contrast_center_width(&mut self, center: u16, width: u16) -> Result<()> {
        self.set_contrast(ContrastWindow::from_center_width(center, width))
    }

    /// Apply finished recomputes and dispatch a due request. Returns `true` if
    /// any pane changed.
    pub fn poll(&mut self) -> Result<bool> {
        let mut changed = false;
        while let Some(outcome) = self.worker.try_recv() {
            changed |= self.apply_outcome(outcome);
        }
        self.dispatch_if_due(Instant::now())?;
        Ok(changed)
    }

    /// Block until every requested contrast change is applied, ignoring the debounce.
    pub fn flush_contrast(&mut self) -> Result<()> {
        loop {
            if self.in_flight.is_some() {
                let outcome = self.worker.recv()?;
                self.apply_outcome(outcome);
            } else if !self.pending.is_empty() {
                self.dispatch()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Time until a pending request becomes due; `None` when nothing waits on the clock.
    pub fn next_poll_in(&self) -> Option<Duration> {
        if self.in_flight.is_some() || self.pending.is_empty() {
            return None;
        }
        let elapsed = self.pending.requested_at.map(|t| t.elapsed()).unwrap_or_default();
        Some(self.config.contrast.debounce().saturating_sub(elapsed))
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || !self.pending.is_empty()
    }

    fn dispatch_if_due(&mut self, now: Instant) -> Result<()> {
        if self.in_flight.is_some() || self.pending.is_empty() {
            return Ok(());
        }
        let due = self
            .pending
            .requested_at
            .is_none_or(|t| now.duration_since(t) >= self.config.contrast.debounce());
        if due {
            self.dispatch()?;
        }
        Ok(())
    }

    fn dispatch(&mut self) -> Result<()> {
        let panes = std::mem::take(&mut self.pending.panes);
        self.pending.requested_at = None;

        let mut targets = Vec::with_capacity(panes.len());
        for id in panes {
            let (Ok(pane), Some(contrast)) = (self.pane(id), self.contrast_for(id)) else {
                continue;
            };
            if pane.windowed().contrast == contrast {
                continue;
            }
            targets.push(JobTarget {
                pane: id,
                source: pane.source().clone(),
                contrast,
            });
        }
        if targets.is_empty() {
            return Ok(());
        }

        debug!(generation = self.generation, panes = targets.len(), "Contrast dispatched");
        self.worker.submit(ContrastJob {
            generation: self.generation,
            targets,
        })?;
        self.in_flight = Some(self.generation);
        Ok(())
    }

    /// Apply a finished job. A pane whose recompute failed keeps its image;
    /// the other panes are still updated.
    fn apply_outcome(&mut self, outcome: ContrastOutcome) -> bool {
        self.in_flight = None;
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "Stale contrast result dropped"
            );
            return false;
        }

        let mut changed = false;
        for (id, windowed) in outcome.results {
            let windowed = match windowed {
                Ok(windowed) => windowed,
                Err(e) => {
                    warn!(pane = %id, error = %e, "Contrast recompute failed");
                    continue;
                }
            };
            match self.pane_mut(id) {
                Ok(pane) => {
                    pane.apply_windowed(windowed);
                    changed = true;
                }
                Err(e) => warn!(error = %e, "Contrast result has no pane"),
            }
        }
        debug!(elapsed_ms = outcome.elapsed.as_millis() as u64, "Contrast applied");
        changed
    }

    pub fn scroll(&mut self, pane: PaneId, delta: f32, cursor: CanvasPos) -> Result<bool> {
        Ok(self.pane_mut(pane)?.scroll(delta, cursor))
    }

    pub fn zoom_to(&mut self, pane: PaneId, level: PyramidLevel, cursor: CanvasPos) -> Result<bool> {
        Ok(self.pane_mut(pane)?.zoom_to(level, cursor))
    }

    pub fn begin_drag(&mut self, pane: PaneId, at: CanvasPos) -> Result<()> {
        self.pane_mut(pane)?.begin_drag(at);
        Ok(())
    }

    pub fn drag_to(&mut self, pane: PaneId, at: CanvasPos) -> Result<()> {
        self.pane_mut(pane)?.drag_to(at);
        Ok(())
    }

    pub fn end_drag(&mut self, pane: PaneId) -> Result<()> {
        self.pane_mut(pane)?.end_drag();
        Ok(())
    }

    /// Report a new canvas size for `pane`. The size is remembered for panes
    /// rebuilt later by a reload or mode toggle.
    pub fn resize_canvas(&mut self, pane: PaneId, canvas: Dims) -> Result<bool> {
        self.canvases.insert(pane, canvas);
        Ok(self.pane_mut(pane)?.resize_canvas(canvas))
    }

    pub fn view(&self, pane: PaneId) -> Result<Option<ViewFrame>> {
        Ok(self.pane(pane)?.view())
    }

    pub fn probe_pixel(&self, pane: PaneId, cursor: CanvasPos) -> Result<Option<PixelReadout>> {
        Ok(self.pane(pane)?.probe(cursor))
    }
}
