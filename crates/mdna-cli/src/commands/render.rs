use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use mdna_core::contrast::ContrastWindow;
use mdna_core::io::image_io::save_png;
use mdna_core::pyramid::PyramidLevel;
use mdna_core::raster::Dims;
use mdna_core::session::{ContrastTarget, PaneId, ViewerSession};
use mdna_core::viewport::CanvasPos;

use crate::summary::print_render_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum TargetArg {
    Green,
    Red,
    Both,
}

impl From<TargetArg> for ContrastTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Green => Self::Green,
            TargetArg::Red => Self::Red,
            TargetArg::Both => Self::Both,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PaneArg {
    Green,
    Red,
    Combined,
}

impl From<PaneArg> for PaneId {
    fn from(arg: PaneArg) -> Self {
        match arg {
            PaneArg::Green => Self::Green,
            PaneArg::Red => Self::Red,
            PaneArg::Combined => Self::Combined,
        }
    }
}

/// Zoom level given as an integer step or `fit`.
#[derive(Clone, Copy)]
pub struct LevelArg(pub PyramidLevel);

impl FromStr for LevelArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("fit") {
            return Ok(Self(PyramidLevel::Fit));
        }
        s.parse::<i32>()
            .map(|n| Self(PyramidLevel::Step(n)))
            .map_err(|_| format!("'{s}' is neither an integer level nor 'fit'"))
    }
}

/// `X,Y` pair of signed integers.
#[derive(Clone, Copy)]
pub struct PointArg(pub i32, pub i32);

impl FromStr for PointArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i32>()
                .map_err(|_| format!("'{v}' is not an integer"))
        };
        Ok(Self(parse(x)?, parse(y)?))
    }
}

/// `WxH` canvas size.
#[derive(Clone, Copy)]
pub struct CanvasArg(pub Dims);

impl FromStr for CanvasArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("'{v}' is not a positive integer"))
        };
        Ok(Self(Dims::new(parse(w)?, parse(h)?)))
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// Green channel TIFF
    pub green: PathBuf,

    /// Red channel TIFF
    #[arg(long)]
    pub red: Option<PathBuf>,

    /// Show the red/green composite instead of the split panes
    #[arg(long, requires = "red")]
    pub combine: bool,

    /// Split panes the contrast applies to
    #[arg(long, value_enum, default_value = "both", conflicts_with = "combine")]
    pub target: TargetArg,

    /// Window center (raw sample value)
    #[arg(long, requires = "width", conflicts_with_all = ["lower", "upper"])]
    pub center: Option<String>,

    /// Window width (raw sample value)
    #[arg(long, requires = "center")]
    pub width: Option<String>,

    /// Lower window bound
    #[arg(long, requires = "upper")]
    pub lower: Option<String>,

    /// Upper window bound
    #[arg(long, requires = "lower")]
    pub upper: Option<String>,

    /// Canvas size as WxH (defaults to the configured canvas)
    #[arg(long)]
    pub canvas: Option<CanvasArg>,

    /// Zoom level to show: an integer step or "fit"
    #[arg(long)]
    pub zoom: Option<LevelArg>,

    /// Canvas position the zoom is anchored at, as X,Y
    #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
    pub at: PointArg,

    /// Mouse drag after zooming, as DX,DY
    #[arg(long, allow_hyphen_values = true)]
    pub pan: Option<PointArg>,

    /// Print the source pixel under this canvas position, as X,Y
    #[arg(long, allow_hyphen_values = true)]
    pub probe: Option<PointArg>,

    /// Pane to save (defaults to the composite, or green in split view)
    #[arg(long, value_enum)]
    pub pane: Option<PaneArg>,

    /// Viewer configuration TOML
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output PNG
    #[arg(short, long)]
    pub output: PathBuf,
}

impl RenderArgs {
    fn contrast(&self) -> Result<Option<ContrastWindow>> {
        let window = match (&self.center, &self.width, &self.lower, &self.upper) {
            (Some(c), Some(w), _, _) => Some(ContrastWindow::parse_center_width(c, w)?),
            (_, _, Some(lo), Some(hi)) => Some(ContrastWindow::parse_bounds(lo, hi)?),
            _ => None,
        };
        Ok(window)
    }

    fn pane(&self) -> PaneId {
        match self.pane {
            Some(pane) => pane.into(),
            None if self.combine => PaneId::Combined,
            None => PaneId::Green,
        }
    }
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let mut config = super::config::load(args.config.as_deref())?;
    if let Some(CanvasArg(canvas)) = args.canvas {
        config.canvas = canvas;
    }
    let contrast = args.contrast()?;

    let mut session = ViewerSession::new(config)?;
    session
        .load(&args.green, args.red.as_deref())
        .context("Failed to load images")?;

    if args.combine {
        session.toggle_composite_mode()?;
    } else if args.red.is_some() {
        session.select_target(args.target.into())?;
    }
    if let Some(window) = contrast {
        session.set_contrast(window)?;
    }
    session.flush_contrast()?;

    let pane = args.pane();
    let at = CanvasPos::new(args.at.0, args.at.1);
    if let Some(LevelArg(level)) = args.zoom {
        if !session.zoom_to(pane, level, at)? {
            bail!("Zoom level {level} is out of range");
        }
    }
    if let Some(PointArg(dx, dy)) = args.pan {
        session.begin_drag(pane, at)?;
        session.drag_to(pane, CanvasPos::new(at.x + dx, at.y + dy))?;
        session.end_drag(pane)?;
    }

    let frame = session
        .view(pane)?
        .context("Nothing to render for the selected pane")?;
    save_png(&frame.raster, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let readout = match args.probe {
        Some(PointArg(x, y)) => session.probe_pixel(pane, CanvasPos::new(x, y))?,
        None => None,
    };
    print_render_summary(&session, pane, &frame, &args.output, readout.as_ref());
    Ok(())
}
