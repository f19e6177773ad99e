mod common;
mod float64_column;
mod string_column;

pub use common::{BitMask, Column, ColumnKind};
pub use float64_column::Float64Column;
pub use string_column::StringColumn;
