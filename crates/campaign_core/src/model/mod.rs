mod records;
mod schema;
mod table;

pub use records::IterationRecord;
pub use schema::{Direction, Parameter, Target};
pub use table::{
    ColumnMap, DOMAIN_PADDING, IterationTable, ParameterRange, ParameterRanges, TableView,
};
