//! Error types emitted by the melodico CLI.

use camino::Utf8PathBuf;
use melodico_data::ClientBuildError;
use melodico_imputer::ImputeError;
use thiserror::Error;

use crate::dataset::DatasetError;

/// Errors emitted by the melodico CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Loading or writing a dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// An HTTP client could not be constructed.
    #[error(transparent)]
    Client(#[from] ClientBuildError),
    /// The batch aborted on a configuration or schema mistake.
    #[error(transparent)]
    Impute(#[from] ImputeError),
    /// The title-mapping file could not be read.
    #[error("failed to read title mapping {path}: {source}")]
    TitleMappingRead {
        /// Mapping file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The title-mapping file is not the expected JSON object.
    #[error("failed to parse title mapping {path}: {source}")]
    TitleMappingParse {
        /// Mapping file path.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The delimiter option is not a single byte.
    #[error("invalid delimiter {raw:?}: expected a single character")]
    InvalidDelimiter {
        /// The value as supplied.
        raw: String,
    },
}
