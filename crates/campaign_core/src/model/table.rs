//! Iteration table, column mapping and prefix views
//!
//! The table is validated once at construction. Analyses never see it
//! directly; they receive a [`TableView`], a borrowed non-empty prefix that
//! represents the iterations observed so far.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, Result};

use super::{IterationRecord, Parameter, Target};

/// Fraction of a parameter's range added on each side of its display domain
pub const DOMAIN_PADDING: f64 = 0.1;

/// Positions of the required columns within a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    width: usize,
    parameters: [usize; Parameter::COUNT],
    targets: [usize; Target::COUNT],
}

impl ColumnMap {
    /// Locate every parameter and target column in `header`.
    ///
    /// Matching is exact after trimming whitespace. Columns that are not part
    /// of the schema (an index column, notes) are ignored.
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self> {
        let find = |name: &'static str| -> Result<usize> {
            let mut hits = header
                .iter()
                .enumerate()
                .filter(|(_, h)| h.as_ref().trim() == name)
                .map(|(i, _)| i);
            let first = hits.next().ok_or(InvalidInputError::MissingColumn(name))?;
            if hits.next().is_some() {
                return Err(InvalidInputError::DuplicateColumn(name));
            }
            Ok(first)
        };

        let mut parameters = [0; Parameter::COUNT];
        for p in Parameter::ALL {
            parameters[p.index()] = find(p.column_name())?;
        }
        let mut targets = [0; Target::COUNT];
        for t in Target::ALL {
            targets[t.index()] = find(t.column_name())?;
        }

        Ok(Self {
            width: header.len(),
            parameters,
            targets,
        })
    }

    /// Number of cells every data row must have
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the column at `position` carries a parameter or target
    #[must_use]
    pub fn is_required(&self, position: usize) -> bool {
        self.parameters.contains(&position) || self.targets.contains(&position)
    }

    /// Build the record for the 0-based data row `row` from its cells.
    ///
    /// Cells of ignored columns are never read, so callers may fill them with
    /// any placeholder.
    pub fn record(&self, row: usize, cells: &[f64]) -> Result<IterationRecord> {
        if cells.len() != self.width {
            return Err(InvalidInputError::RowLength {
                row: row + 1,
                expected: self.width,
                found: cells.len(),
            });
        }
        Ok(IterationRecord::new(
            iteration_number(row),
            self.parameters.map(|col| cells[col]),
            self.targets.map(|col| cells[col]),
        ))
    }
}

fn iteration_number(row: usize) -> u32 {
    u32::try_from(row + 1).unwrap_or(u32::MAX)
}

/// Ordered, validated log of a campaign's iterations.
///
/// Deserialization goes through [`IterationTable::new`], so a serialized table
/// is held to the same checks as one built in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedTable")]
pub struct IterationTable {
    records: Vec<IterationRecord>,
}

/// Wire shape of [`IterationTable`] before validation
#[derive(Deserialize)]
struct UncheckedTable {
    records: Vec<IterationRecord>,
}

impl TryFrom<UncheckedTable> for IterationTable {
    type Error = InvalidInputError;

    fn try_from(unchecked: UncheckedTable) -> Result<Self> {
        Self::new(unchecked.records)
    }
}

impl IterationTable {
    /// Validate and wrap a sequence of records.
    ///
    /// Records must be non-empty, numbered 1, 2, 3, ... in order, and contain
    /// only finite values.
    pub fn new(records: Vec<IterationRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(InvalidInputError::EmptyTable);
        }
        for (position, record) in records.iter().enumerate() {
            let expected = iteration_number(position);
            if record.iteration != expected {
                return Err(InvalidInputError::IterationOrder {
                    position,
                    expected,
                    found: record.iteration,
                });
            }
            if let Some(column) = record.first_non_finite() {
                return Err(InvalidInputError::NonFiniteValue {
                    iteration: record.iteration,
                    column,
                });
            }
        }
        Ok(Self { records })
    }

    /// Build a table from a header and numeric rows; row order defines the
    /// iteration numbers.
    pub fn from_columns<S: AsRef<str>>(header: &[S], rows: &[Vec<f64>]) -> Result<Self> {
        let columns = ColumnMap::from_header(header)?;
        let records = rows
            .iter()
            .enumerate()
            .map(|(row, cells)| columns.record(row, cells))
            .collect::<Result<Vec<_>>>()?;
        Self::new(records)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a validated table
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    /// View over every iteration
    #[must_use]
    pub fn view(&self) -> TableView<'_> {
        TableView {
            records: &self.records,
        }
    }

    /// View over the first `len` iterations.
    ///
    /// Lengths beyond the table are clamped to the full table; a length of
    /// zero is rejected.
    pub fn prefix(&self, len: usize) -> Result<TableView<'_>> {
        if len == 0 {
            return Err(InvalidInputError::EmptySlice);
        }
        if len > self.records.len() {
            tracing::debug!(
                requested = len,
                available = self.records.len(),
                "Clamping active slice to table length"
            );
        }
        let len = len.min(self.records.len());
        Ok(TableView {
            records: &self.records[..len],
        })
    }
}

/// Borrowed, non-empty prefix of an [`IterationTable`]
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    records: &'a [IterationRecord],
}

impl<'a> TableView<'a> {
    #[must_use]
    pub fn records(&self) -> &'a [IterationRecord] {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; views are never empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, IterationRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn parameter_values(&self, parameter: Parameter) -> Vec<f64> {
        self.records.iter().map(|r| r.parameter(parameter)).collect()
    }

    #[must_use]
    pub fn target_values(&self, target: Target) -> Vec<f64> {
        self.records.iter().map(|r| r.target(target)).collect()
    }

    /// Observed range of one parameter
    #[must_use]
    pub fn range(&self, parameter: Parameter) -> ParameterRange {
        ParameterRange::from_values(self.records.iter().map(|r| r.parameter(parameter)))
    }

    /// Observed ranges of every parameter
    #[must_use]
    pub fn ranges(&self) -> ParameterRanges {
        ParameterRanges(Parameter::ALL.map(|p| self.range(p)))
    }

    /// Best observed record for `target`, honoring its direction.
    /// The earliest iteration wins ties.
    #[must_use]
    pub fn best(&self, target: Target) -> &'a IterationRecord {
        let direction = target.direction();
        let mut best = &self.records[0];
        for record in &self.records[1..] {
            if direction.improves(record.target(target), best.target(target)) {
                best = record;
            }
        }
        best
    }
}

impl<'a> IntoIterator for TableView<'a> {
    type Item = &'a IterationRecord;
    type IntoIter = std::slice::Iter<'a, IterationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Observed `[min, max]` of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    /// `max - min`; zero for a constant parameter
    pub range: f64,
}

impl ParameterRange {
    /// Range over `values`; an empty iterator yields the all-zero range
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return Self {
                min: 0.0,
                max: 0.0,
                range: 0.0,
            };
        }
        Self {
            min,
            max,
            range: max - min,
        }
    }

    /// True when every observation has the same value
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.range == 0.0
    }

    /// Display domain padded by [`DOMAIN_PADDING`] of the range on each side
    #[must_use]
    pub fn padded_domain(&self) -> (f64, f64) {
        let pad = DOMAIN_PADDING * self.range;
        (self.min - pad, self.max + pad)
    }
}

/// Ranges of every parameter, indexed by [`Parameter`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRanges([ParameterRange; Parameter::COUNT]);

impl ParameterRanges {
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> ParameterRange {
        self.0[parameter.index()]
    }
}
