use thiserror::Error;

/// Typed conditions raised by the loader and the filter engine.
///
/// An empty filter result is deliberately absent here: it is an expected
/// outcome and is modelled by [`crate::data::pipeline::Outcome::Empty`].
#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("source is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("invalid filter criteria: {0}")]
    InvalidCriteria(String),
}
