use crate::core::models::matrix::{MatrixError, MoleculeMatrix, NB_FEATURES};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Lines starting with this byte are header comments and skipped on read.
pub const COMMENT_DELIMITER: char = '#';

#[derive(Debug, Error)]
pub enum MatrixIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid number in data row {row} (value: '{value}')")]
    InvalidNumber { row: usize, value: String },
    #[error("Data row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),
}

/// Writes `header` as comment lines followed by one space-delimited row per matrix row.
///
/// Values use the shortest representation that parses back to the same `f64`.
pub fn write_matrix(
    writer: &mut impl Write,
    matrix: &MoleculeMatrix,
    header: &[String],
) -> Result<(), MatrixIoError> {
    for line in header {
        writeln!(writer, "{} {}", COMMENT_DELIMITER, line)?;
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(&mut *writer);
    for row in matrix.rows() {
        csv_writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads a matrix written by [`write_matrix`], skipping comment lines.
///
/// Values may be separated by any run of spaces or tabs. Row numbers in errors are
/// 1-based and count data rows only. A body without rows yields an empty matrix of
/// the canonical width.
pub fn read_matrix(reader: impl Read) -> Result<MoleculeMatrix, MatrixIoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .comment(Some(COMMENT_DELIMITER as u8))
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut data = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut record = csv::StringRecord::new();
    let mut row = 0;

    while csv_reader.read_record(&mut record)? {
        let mut found = 0;
        for field in record.iter().flat_map(str::split_whitespace) {
            let value: f64 = field.parse().map_err(|_| MatrixIoError::InvalidNumber {
                row: row + 1,
                value: field.to_string(),
            })?;
            data.push(value);
            found += 1;
        }
        if found == 0 {
            continue;
        }
        row += 1;
        let expected = *n_cols.get_or_insert(found);
        if found != expected {
            return Err(MatrixIoError::RaggedRow {
                row,
                expected,
                found,
            });
        }
    }

    Ok(MoleculeMatrix::from_flat(
        n_cols.unwrap_or(NB_FEATURES),
        data,
    )?)
}

pub fn write_matrix_to_path<P: AsRef<Path>>(
    path: P,
    matrix: &MoleculeMatrix,
    header: &[String],
) -> Result<(), MatrixIoError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_matrix(&mut writer, matrix, header)?;
    writer.flush()?;
    Ok(())
}

pub fn read_matrix_from_path<P: AsRef<Path>>(path: P) -> Result<MoleculeMatrix, MatrixIoError> {
    let file = File::open(path)?;
    read_matrix(BufReader::new(file))
}
