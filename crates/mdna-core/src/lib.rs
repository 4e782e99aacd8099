pub mod compose;
pub mod config;
pub mod consts;
pub mod contrast;
pub mod error;
pub mod io;
pub mod pyramid;
pub mod raster;
pub mod resize;
pub mod session;
pub mod viewport;
pub mod windowing;
