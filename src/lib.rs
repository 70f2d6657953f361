pub mod aggregate;
pub mod chart;
pub mod dataset;
pub mod ratio;
pub mod style;

pub use dataset::{Algorithm, Family, Measurement, Metric};
