use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use nalgebra::Point3;
use std::io::{self, BufRead};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed record on line {line}: {kind}")]
    MalformedRecord { line: usize, kind: RecordFieldError },
    #[error("Inconsistent record counts: read {lines} lines but produced {records} records")]
    InconsistentRecordCounts { lines: usize, records: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordFieldError {
    #[error("Field '{field}' in columns {columns} is missing (line is {len} bytes long)")]
    Missing {
        field: &'static str,
        columns: &'static str,
        len: usize,
    },
    #[error("Field '{field}' in columns {columns} does not start or end on a character boundary")]
    SplitCharacter {
        field: &'static str,
        columns: &'static str,
    },
    #[error("Invalid float for '{field}' in columns {columns} (value: '{value}')")]
    InvalidFloat {
        field: &'static str,
        columns: &'static str,
        value: String,
    },
}

struct CoordinateField {
    name: &'static str,
    range: Range<usize>,
    columns: &'static str,
}

const COORDINATE_FIELDS: [CoordinateField; 3] = [
    CoordinateField {
        name: "x",
        range: 30..38,
        columns: "31-38",
    },
    CoordinateField {
        name: "y",
        range: 38..46,
        columns: "39-46",
    },
    CoordinateField {
        name: "z",
        range: 46..54,
        columns: "47-54",
    },
];

const ATOM_TYPE_START: usize = 76;

fn parse_coordinate(line: &str, field: &CoordinateField) -> Result<f64, RecordFieldError> {
    if line.len() < field.range.end {
        return Err(RecordFieldError::Missing {
            field: field.name,
            columns: field.columns,
            len: line.len(),
        });
    }
    let raw = line
        .get(field.range.clone())
        .ok_or(RecordFieldError::SplitCharacter {
            field: field.name,
            columns: field.columns,
        })?
        .trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RecordFieldError::InvalidFloat {
            field: field.name,
            columns: field.columns,
            value: raw.to_string(),
        }),
    }
}

/// Fixed-column structure files: one atom per line, no header.
///
/// Columns 31-38, 39-46 and 47-54 hold x/y/z; everything from column 77 onward is
/// the atom-type token. No line is ever skipped.
pub struct FixedColumnFile;

impl FixedColumnFile {
    /// Parses a single line. `line_num` is 1-based and only used for error reporting.
    pub fn parse_record(line: &str, line_num: usize) -> Result<AtomRecord, StructureError> {
        let line = line.trim_end();
        let mut coords = [0.0; 3];
        for (slot, field) in coords.iter_mut().zip(COORDINATE_FIELDS.iter()) {
            *slot = parse_coordinate(line, field).map_err(|kind| {
                StructureError::MalformedRecord {
                    line: line_num,
                    kind,
                }
            })?;
        }
        let atom_type = if line.len() <= ATOM_TYPE_START {
            ""
        } else {
            line.get(ATOM_TYPE_START..)
                .ok_or(StructureError::MalformedRecord {
                    line: line_num,
                    kind: RecordFieldError::SplitCharacter {
                        field: "atom_type",
                        columns: "77-",
                    },
                })?
                .trim()
        };
        Ok(AtomRecord::new(
            Point3::new(coords[0], coords[1], coords[2]),
            atom_type,
        ))
    }
}

impl StructureFile for FixedColumnFile {
    type Error = StructureError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<AtomRecord>, Self::Error> {
        let mut records = Vec::new();
        let mut lines_read = 0;

        for (index, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            lines_read += 1;
            records.push(Self::parse_record(&line, index + 1)?);
        }

        if records.len() != lines_read {
            return Err(StructureError::InconsistentRecordCounts {
                lines: lines_read,
                records: records.len(),
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE_LINE: &str =
        "ATOM      2  CA  HIS A   0      17.186 -28.155 -12.495  1.00 26.12           C";

    fn atom_line(x: f64, y: f64, z: f64, atom_type: &str) -> String {
        format!(
            "{:<30}{:>8.3}{:>8.3}{:>8.3}{:<22}{}",
            "ATOM      1  CA  HIS A   0", x, y, z, "  1.00 26.12", atom_type
        )
    }

    fn read(content: &str) -> Result<Vec<AtomRecord>, StructureError> {
        FixedColumnFile::read_from(&mut Cursor::new(content.as_bytes()))
    }

    #[test]
    fn parse_record_extracts_fixed_columns() {
        let record = FixedColumnFile::parse_record(SAMPLE_LINE, 1).unwrap();
        assert_eq!(record.position, Point3::new(17.186, -28.155, -12.495));
        assert_eq!(record.atom_type, "C");
    }

    #[test]
    fn read_produces_one_record_per_line_in_order() {
        let content = [
            atom_line(1.0, 2.0, 3.0, "C"),
            atom_line(-4.5, 5.25, -6.125, "N"),
            atom_line(100.0, -200.0, 300.0, "O1-"),
        ]
        .join("\n");

        let records = read(&content).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(records[1].position, Point3::new(-4.5, 5.25, -6.125));
        assert_eq!(records[2].atom_type, "O1-");
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let content = format!(
            "{}\r\n{}\r\n",
            atom_line(1.0, 1.0, 1.0, "C"),
            atom_line(2.0, 2.0, 2.0, "S")
        );
        let records = read(&content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].atom_type, "S");
    }

    #[test]
    fn line_without_atom_type_yields_empty_token() {
        let line = &atom_line(1.0, 2.0, 3.0, "")[..54];
        let record = FixedColumnFile::parse_record(line, 1).unwrap();
        assert_eq!(record.atom_type, "");
    }

    #[test]
    fn non_numeric_coordinate_reports_line_and_field() {
        let bad = SAMPLE_LINE.replacen("-28.155", "-28.1x5", 1);
        let content = format!("{}\n{}", atom_line(0.0, 0.0, 0.0, "C"), bad);

        match read(&content) {
            Err(StructureError::MalformedRecord { line, kind }) => {
                assert_eq!(line, 2);
                assert_eq!(
                    kind,
                    RecordFieldError::InvalidFloat {
                        field: "y",
                        columns: "39-46",
                        value: "-28.1x5".to_string(),
                    }
                );
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn short_line_is_a_missing_field() {
        let content = "ATOM      1  CA  HIS A   0      17.186";
        match read(content) {
            Err(StructureError::MalformedRecord { line, kind }) => {
                assert_eq!(line, 1);
                assert!(matches!(kind, RecordFieldError::Missing { field: "y", .. }));
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn multibyte_character_across_atom_type_column_is_malformed() {
        let line = atom_line(1.0, 2.0, 3.0, "C");
        // 'é' occupies bytes 75..77, so byte 76 is not a character boundary.
        let shifted = format!("{}é{}", &line[..75], &line[76..]);

        match FixedColumnFile::parse_record(&shifted, 4) {
            Err(StructureError::MalformedRecord { line, kind }) => {
                assert_eq!(line, 4);
                assert_eq!(
                    kind,
                    RecordFieldError::SplitCharacter {
                        field: "atom_type",
                        columns: "77-",
                    }
                );
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn multibyte_character_across_coordinate_column_is_malformed() {
        let line = atom_line(1.0, 2.0, 3.0, "C");
        let shifted = format!("{}é{}", &line[..37], &line[38..]);

        match FixedColumnFile::parse_record(&shifted, 1) {
            Err(StructureError::MalformedRecord { kind, .. }) => assert_eq!(
                kind,
                RecordFieldError::SplitCharacter {
                    field: "x",
                    columns: "31-38",
                }
            ),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn blank_line_is_not_skipped() {
        let content = format!(
            "{}\n\n{}",
            atom_line(0.0, 0.0, 0.0, "C"),
            atom_line(1.0, 1.0, 1.0, "C")
        );
        assert!(matches!(
            read(&content),
            Err(StructureError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn empty_file_yields_no_records() {
        assert!(read("").unwrap().is_empty());
    }

    #[test]
    fn read_from_path_parses_file_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("0001_lig_cg.pdb");
        fs::write(&path, format!("{}\n", SAMPLE_LINE)).unwrap();

        let records = FixedColumnFile::read_from_path(&path).unwrap();
        assert_eq!(records.len(), 1);

        let missing = FixedColumnFile::read_from_path(dir.path().join("missing.pdb"));
        assert!(matches!(missing, Err(StructureError::Io(_))));
    }
}
