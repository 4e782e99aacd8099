use std::fmt;

use ndarray::{s, Array3};
use serde::{Deserialize, Serialize};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, ViewerError};
use crate::raster::{Raster, Sample};

/// Fluorescence channel a greyscale source image belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Green,
    Red,
}

impl Channel {
    /// RGB slot the channel occupies in a display raster.
    pub fn slot(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
        }
    }

    /// Place a single-channel raster into this channel's RGB slot, zeros elsewhere.
    pub fn broadcast<T: Sample>(self, gray: &Raster<T>) -> Result<Raster<T>> {
        if gray.channels() != 1 {
            return Err(ViewerError::InvalidRaster(format!(
                "expected a single-channel raster, got {} channels",
                gray.channels()
            )));
        }
        let mut data = Array3::from_elem(
            (gray.height(), gray.width(), COLOR_CHANNEL_COUNT),
            T::zero(),
        );
        data.slice_mut(s![.., .., self.slot()])
            .assign(&gray.data().slice(s![.., .., 0]));
        Ok(Raster::new(data))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "Green"),
            Self::Red => write!(f, "Red"),
        }
    }
}

/// False-color overlay: red slot from `red`, green slot from `green`, blue zero.
///
/// Both inputs must be 3-channel rasters of identical size.
pub fn compose<T: Sample>(green: &Raster<T>, red: &Raster<T>) -> Result<Raster<T>> {
    green.ensure_same_size(red)?;
    for raster in [green, red] {
        if raster.channels() != COLOR_CHANNEL_COUNT {
            return Err(ViewerError::InvalidRaster(format!(
                "composite inputs need {COLOR_CHANNEL_COUNT} channels, got {}",
                raster.channels()
            )));
        }
    }

    let mut data = Array3::from_elem(
        (green.height(), green.width(), COLOR_CHANNEL_COUNT),
        T::zero(),
    );
    let red_slot = Channel::Red.slot();
    let green_slot = Channel::Green.slot();
    data.slice_mut(s![.., .., red_slot])
        .assign(&red.data().slice(s![.., .., red_slot]));
    data.slice_mut(s![.., .., green_slot])
        .assign(&green.data().slice(s![.., .., green_slot]));
    Ok(Raster::new(data))
}
