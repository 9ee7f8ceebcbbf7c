use thiserror::Error;

/// Configuration and schema errors that abort a batch.
///
/// Data-quality problems (unresolvable titles, absent recordings) are not
/// errors — they short-circuit the affected row and the batch carries on.
/// The variants here all indicate a setup mistake worth failing loudly for.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImputeError {
    /// The row's identity cell is not a key of the configured title mapping.
    #[error("artist id {id:?} at row {row_index} is not present in the title mapping")]
    UnknownArtistId {
        /// Zero-based row index.
        row_index: usize,
        /// The offending identity value.
        id: String,
    },
    /// A column registered for imputation does not exist in the dataset.
    #[error("column {column:?} is registered for imputation but absent from row {row_index}")]
    MissingColumn {
        /// Zero-based row index.
        row_index: usize,
        /// The missing column name.
        column: String,
    },
}
