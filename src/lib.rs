#![warn(missing_docs)]
//! Thermodynamic formulas for weather soundings and a skew-T log-p diagram to plot them on.
//!
//! Soundings are read from the comma delimited text format distributed by the Storm Prediction
//! Center with [`read_spc_file`] or [`parse_spc`]. The [`met_formulas`] module holds the closed
//! form thermodynamic relations, [`transform`] maps temperature and pressure into the skewed
//! plotting plane, and a [`diagram::SkewTDiagram`] draws the reference isopleths and an observed
//! sounding on any [`diagram::Canvas`].
//!
//! ```rust
//! use skewt_analysis::{diagram::SkewTDiagram, parse_spc, DiagramConfig, ReferenceConfig};
//!
//! let text = "\
//!  1000.00,  110.00,   20.20,   15.10,  180.00,   10.00
//!   925.00,  780.00,   18.00,    9.50,  200.00,   20.00
//!   850.00, 1500.00,   10.00,    2.00,  230.00,   25.00
//! %END%";
//! let snd = parse_spc(text, 0).unwrap();
//!
//! let reference = ReferenceConfig::default()
//!     .with_pressure_step(25.0)
//!     .with_theta_ep_grid_step(1.0);
//! let diagram = SkewTDiagram::new(DiagramConfig::default().with_reference(reference));
//!
//! let svg = diagram.render(&snd).to_svg();
//! assert!(svg.starts_with("<svg"));
//! ```

//
// API
//
pub use crate::{
    config::{DiagramColors, DiagramConfig, ReferenceConfig, Rgb},
    error::{AnalysisError, Result},
    isopleths::{build_reference_layers, IsoplethFamilies, IsoplethFamily, IsoplethKind},
    reader::{parse_spc, read_spc_file, DEFAULT_SKIP_ROWS},
    sounding::{doctest, DataRow, Sounding, StationInfo},
    transform::{PlotBounds, PlotPoint, SkewTransform},
    validity::{ValidRanges, ValidityMask},
};

pub mod contour;
pub mod diagram;
pub mod isopleths;
pub mod met_formulas;
pub mod profile;
pub mod reader;
pub mod transform;

//
// Internal use only
//

// Modules
mod config;
mod error;
mod sounding;
mod validity;

#[cfg(test)]
mod test_data;
