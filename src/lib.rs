//! Projection, coordinate conversion and label placement for star charts.
//!
//! A [`Chart`] fixes a projection and a canvas for one render. Objects are
//! projected with [`Chart::project`], drawn through a [`render::Surface`],
//! and labelled through a [`RenderSession`], which resolves all labels at
//! the end so that brighter objects win contested space.

pub mod canvas;
pub mod chart;
pub mod config;
pub mod coords;
pub mod errors;
pub mod labeller;
pub mod log;
pub mod projection;
pub mod raster;
pub mod render;
pub mod sphtrig;
pub mod types;

pub use chart::{Chart, Position};
pub use config::{ChartConfig, parse_charts};
pub use coords::{CoordinateSystem, Frame, JulianDate, Observer, SkyPoint};
pub use errors::{ChartFileError, ConfigError, ParseError};
pub use labeller::{Candidate, HAlign, LabelStyle, PlacementReport, Priority, RenderSession, VAlign};
pub use projection::{ProjectionConfig, ProjectionKind, SkyProjection};
