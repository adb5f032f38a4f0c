//! # Sunpredict Library
//!
//! Internal library for the sunpredict binary: predicts when direct sunlight
//! reaches an observer, accounting for the horizon and, optionally, the
//! surrounding terrain.
//!
//! ## Architecture
//!
//! - **Geographic**: `geo` holds the validated `Location`, the `DaySpan`
//!   framing of a prediction day and timezone detection
//! - **Solar**: `solar::position` is the position provider seam (NREL SPA in
//!   production), `solar::crossing` the threshold crossing search
//! - **Terrain**: `terrain` interpolates obstruction angles around the
//!   observer; `terrain::survey` builds profiles from elevation data
//! - **Windows**: `window` composes the searches into daily visibility windows
//!   and renders them
//! - **Interface**: `args`, `commands` and `config` form the command-line tool;
//!   `logger` provides the shared output style

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod geo;
pub mod solar;
pub mod terrain;
pub mod window;

pub use geo::{DaySpan, Location};
pub use solar::{SearchConfig, SpaProvider, SunEvent};
pub use terrain::TerrainProfile;
pub use window::{DailyWindowComposer, VisibilityWindow};
