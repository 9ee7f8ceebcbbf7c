//! CSV collaborator layer: load a dataset, write it back with the original
//! column order.

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, WriterBuilder};
use melodico_core::{Dataset, Row, Value};
use thiserror::Error;

/// Errors from the CSV layer.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading or parsing the input file failed.
    #[error("failed to read dataset {path}: {source}")]
    Read {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// Writing the output file failed.
    #[error("failed to write dataset {path}: {source}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Load a delimited file into a [`Dataset`].
///
/// Every cell is kept as text; empty cells become the null marker. The
/// reader is flexible about ragged rows — short rows simply lack the
/// trailing columns.
pub fn load_dataset(path: &Utf8Path, delimiter: u8) -> Result<Dataset, DatasetError> {
    let read_error = |source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path.as_std_path())
        .map_err(read_error)?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .map(str::to_owned)
        .collect();
    let mut rows = Vec::new();
    for outcome in reader.records() {
        let record = outcome.map_err(read_error)?;
        let row = Row::from_pairs(columns.iter().enumerate().map(|(index, column)| {
            let value = match record.get(index) {
                Some(cell) if !cell.is_empty() => Value::from(cell),
                _ => Value::Null,
            };
            (column.clone(), value)
        }));
        rows.push(row);
    }
    Ok(Dataset::new(columns, rows))
}

/// Write `dataset` out with its column order, rendering nulls as empty
/// cells.
pub fn save_dataset(
    dataset: &Dataset,
    path: &Utf8Path,
    delimiter: u8,
) -> Result<(), DatasetError> {
    let write_error = |source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path.as_std_path())
        .map_err(write_error)?;
    writer
        .write_record(dataset.columns())
        .map_err(write_error)?;
    for row in dataset.rows() {
        let cells: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| row.get(column).map(Value::to_string).unwrap_or_default())
            .collect();
        writer.write_record(&cells).map_err(write_error)?;
    }
    writer.flush().map_err(|source| DatasetError::Write {
        path: path.to_path_buf(),
        source: source.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8_path(temp: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().join(name))
            .unwrap_or_else(|path| panic!("temporary path {path:?} is not UTF-8"))
    }

    #[rstest]
    fn loads_empty_cells_as_nulls() {
        let temp = TempDir::new().expect("create temporary directory");
        let input = utf8_path(&temp, "artists.csv");
        std::fs::write(
            input.as_std_path(),
            "id_author;name;gender\nART1;Example Artist;\n",
        )
        .expect("write fixture");

        let dataset = load_dataset(&input, b';').expect("load dataset");

        assert_eq!(dataset.columns().len(), 3);
        let row = dataset.rows().first().expect("one row");
        assert_eq!(row.get("name"), Some(&Value::from("Example Artist")));
        assert_eq!(row.get("gender"), Some(&Value::Null));
    }

    #[rstest]
    fn round_trips_with_appended_columns() {
        let temp = TempDir::new().expect("create temporary directory");
        let input = utf8_path(&temp, "in.csv");
        let output = utf8_path(&temp, "out.csv");
        std::fs::write(input.as_std_path(), "id,title\nTRK1,Song X\n").expect("write fixture");

        let mut dataset = load_dataset(&input, b',').expect("load dataset");
        let mut row = dataset.rows().first().cloned().expect("one row");
        row.insert("album", Value::from("Album Y"));
        dataset.replace_row(0, row);
        save_dataset(&dataset, &output, b',').expect("save dataset");

        let written = std::fs::read_to_string(output.as_std_path()).expect("read output");
        assert_eq!(written, "id,title,album\nTRK1,Song X,Album Y\n");
    }

    #[rstest]
    fn ragged_rows_lack_trailing_columns() {
        let temp = TempDir::new().expect("create temporary directory");
        let input = utf8_path(&temp, "ragged.csv");
        std::fs::write(input.as_std_path(), "a,b,c\n1,2\n").expect("write fixture");

        let dataset = load_dataset(&input, b',').expect("load dataset");
        let row = dataset.rows().first().expect("one row");
        assert_eq!(row.get("b"), Some(&Value::from("2")));
        assert_eq!(row.get("c"), Some(&Value::Null));
    }
}
