use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use mdna_core::io::image_io::load_raster;
use mdna_core::windowing::default_window;

use crate::summary::print_raster_info;

#[derive(Args)]
pub struct InfoArgs {
    /// Input TIFF files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    for file in &args.files {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        spinner.set_message(format!("Decoding {}", file.display()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let raster = load_raster(file);
        spinner.finish_and_clear();
        let raster = raster.with_context(|| format!("Failed to load {}", file.display()))?;

        print_raster_info(file, &raster, default_window(&raster));
    }
    Ok(())
}
