//! Visualization module - typed series for an external chart component.
//!
//! Styling, colors, titles and rendering belong to the presenter.

pub mod series;
pub use series::{bar_series, scatter_series, BarEntry, PresenterPayload, ScatterPoint, ScatterSeries};
