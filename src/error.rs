use std::path::PathBuf;

use thiserror::Error;

/// Failures the dashboard can surface to the viewer.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Source file missing, unreadable, or lacking a required column.
    #[error("incident data unavailable from {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// Mean requested over a county with no acreage values.
    #[error("no acreage values recorded for county '{county}'")]
    EmptyGroup { county: String },

    /// A chart needs at least one selected value on this dimension.
    #[error("no {0} selected")]
    EmptySelection(&'static str),
}
