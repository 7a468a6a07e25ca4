use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The observation store could not read a symbol's data. Nothing is
    /// computed from a partial universe.
    #[error("Observation store error: {0}")]
    Source(#[from] database::DbError),
}
