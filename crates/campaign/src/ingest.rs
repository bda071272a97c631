//! Comma-delimited iteration log ingestion
//!
//! The first non-blank line is the header. Every following non-blank line is
//! one iteration, numbered by its position among the data lines. Only the
//! parameter and target columns are parsed; any other column (an index,
//! free-text notes) is carried as a placeholder and never inspected.

use std::path::Path;

use campaign_core::InvalidInputError;
use campaign_core::model::{ColumnMap, IterationTable};

/// Error types for ingestion
#[derive(Debug)]
pub enum IngestError {
    Io(String),
    /// No header line was found
    MissingHeader,
    /// A required cell is not a number
    Cell {
        line: usize,
        column: String,
        value: String,
    },
    Table(InvalidInputError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(msg) => write!(f, "IO error: {}", msg),
            IngestError::MissingHeader => write!(f, "input has no header line"),
            IngestError::Cell {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: column {} is not a number: {:?}",
                line, column, value
            ),
            IngestError::Table(err) => write!(f, "invalid iteration log: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidInputError> for IngestError {
    fn from(err: InvalidInputError) -> Self {
        IngestError::Table(err)
    }
}

/// Read and validate an iteration log file
pub fn load_table(path: &Path) -> Result<IterationTable, IngestError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| IngestError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    parse_table(&text)
}

/// Parse and validate an iteration log held in memory
pub fn parse_table(text: &str) -> Result<IterationTable, IngestError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(IngestError::MissingHeader)?;
    let header = split_cells(header_line);
    let columns = ColumnMap::from_header(&header)?;

    let mut records = Vec::new();
    for (row, (line_number, line)) in lines.enumerate() {
        let cells = split_cells(line)
            .into_iter()
            .enumerate()
            .map(|(position, cell)| {
                if !columns.is_required(position) {
                    return Ok(f64::NAN);
                }
                cell.parse::<f64>().map_err(|_| IngestError::Cell {
                    line: line_number,
                    column: header.get(position).map_or_else(String::new, |h| h.to_string()),
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, IngestError>>()?;
        records.push(columns.record(row, &cells)?);
    }

    tracing::debug!(
        rows = records.len(),
        columns = columns.width(),
        "parsed iteration log"
    );
    Ok(IterationTable::new(records)?)
}

/// Split a line on the commas outside double quotes, trimming whitespace and
/// the surrounding quotes of each cell
fn split_cells(line: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, byte) in line.bytes().enumerate() {
        match byte {
            b'"' => quoted = !quoted,
            b',' if !quoted => {
                cells.push(unquote(&line[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    cells.push(unquote(&line[start..]));
    cells
}

fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::model::{Parameter, Target};
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "T1Celsius,t1min,T2Celsius,t2min,EquivalentsReagent1,EquivalentsBASE1,ConcentrationMolar,Yield,Impurity,ImpurityXRatio";

    #[test]
    fn test_parse_minimal_log() {
        let text = format!(
            "{HEADER}\n25,30,60,15,1.2,2.0,0.4,55.5,1.1,0.02\n35,20,80,10,1.5,2.5,0.4,61.0,0.9,0.015\n"
        );
        let table = parse_table(&text).unwrap();
        assert_eq!(table.len(), 2);
        let second = &table.records()[1];
        assert_eq!(second.iteration, 2);
        assert_eq!(second.parameter(Parameter::T2Celsius), 80.0);
        assert_eq!(second.target(Target::Yield), 61.0);
    }

    #[test]
    fn test_extra_columns_and_blank_lines() {
        let text = "\n\"iter\",Yield,Impurity,ImpurityXRatio,notes,T1Celsius,t1min,T2Celsius,t2min,EquivalentsReagent1,EquivalentsBASE1,ConcentrationMolar\n\
                    0, 50, 1.0, 0.02, first run, 20, 10, 40, 5, 1.0, 1.5, 0.5\n\
                    \n\
                    1, 70, 2.0, 0.03, , 30, 20, 50, 6, 1.1, 1.6, 0.5\n";
        let table = parse_table(text).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.iteration, 1);
        assert_eq!(first.target(Target::Yield), 50.0);
        assert_eq!(first.parameter(Parameter::T1Celsius), 20.0);
        assert_eq!(table.records()[1].iteration, 2);
    }

    #[test]
    fn test_quoted_commas_stay_in_one_cell() {
        let text = "Yield,Impurity,ImpurityXRatio,notes,T1Celsius,t1min,T2Celsius,t2min,EquivalentsReagent1,EquivalentsBASE1,ConcentrationMolar\n\
                    50, 1.0, 0.02, \"first run, slow\", 20, 10, 40, 5, 1.0, 1.5, 0.5\n\
                    70, 2.0, 0.03, \"said \"\"ok\"\", then left\", 30, 20, 50, 6, 1.1, 1.6, 0.5\n";
        let table = parse_table(text).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.target(Target::Yield), 50.0);
        assert_eq!(first.parameter(Parameter::T1Celsius), 20.0);
        assert_eq!(first.parameter(Parameter::ConcentrationMolar), 0.5);
        assert_eq!(table.records()[1].parameter(Parameter::T1Celsius), 30.0);
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("a, \"b, c\" ,d"), ["a", "b, c", "d"]);
        assert_eq!(split_cells("\"x\",,"), ["x", "", ""]);
        assert_eq!(split_cells("solo"), ["solo"]);
    }

    #[test]
    fn test_bad_cell_reports_line_and_column() {
        let text = format!("{HEADER}\n25,30,60,15,1.2,2.0,0.4,55.5,1.1,0.02\n25,30,hot,15,1.2,2.0,0.4,55.5,1.1,0.02\n");
        match parse_table(&text) {
            Err(IngestError::Cell {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "T2Celsius");
                assert_eq!(value, "hot");
            }
            other => panic!("expected a cell error, got {other:?}"),
        }
    }

    #[test]
    fn test_structural_errors_surface_from_core() {
        assert!(matches!(parse_table(""), Err(IngestError::MissingHeader)));
        assert!(matches!(
            parse_table(&format!("{HEADER}\n")),
            Err(IngestError::Table(InvalidInputError::EmptyTable))
        ));
        assert!(matches!(
            parse_table("T1Celsius,Yield\n1,2\n"),
            Err(IngestError::Table(InvalidInputError::MissingColumn(_)))
        ));
        assert!(matches!(
            parse_table(&format!("{HEADER}\n1,2,3\n")),
            Err(IngestError::Table(InvalidInputError::RowLength { row: 1, .. }))
        ));
        assert!(matches!(
            parse_table(&format!("{HEADER}\n25,30,60,15,1.2,2.0,0.4,inf,1.1,0.02\n")),
            Err(IngestError::Table(InvalidInputError::NonFiniteValue { iteration: 1, .. }))
        ));
    }

    #[test]
    fn test_load_table_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("campaign.csv");
        fs::write(&path, format!("{HEADER}\n25,30,60,15,1.2,2.0,0.4,55.5,1.1,0.02\n")).unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 1);

        let missing = load_table(&dir.path().join("absent.csv"));
        assert!(matches!(missing, Err(IngestError::Io(_))));
    }
}
