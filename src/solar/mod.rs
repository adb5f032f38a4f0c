//! Solar position and threshold crossings.
//!
//! - [`position`]: the Position Provider seam and the SPA-backed implementation
//! - [`crossing`]: coarse-scan-then-bisect search for threshold crossings

pub mod crossing;
pub mod position;

pub use crossing::{
    CrossingBracket, CrossingSearch, ScanHit, SearchConfig, SearchWindow, SunEvent, Threshold,
};
pub use position::{PositionProvider, SolarPosition, SpaProvider};
