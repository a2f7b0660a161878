pub mod context;
pub mod operation;
pub mod result;
pub mod value;

pub use context::{ColumnInfo, EditContext, Row};
pub use operation::{ColumnChange, EditBatch, EditOperation, OperationKind, PrimaryKeyValue};
pub use result::{EditResult, ExecutedStatement, OperationError};
pub use value::values_equivalent;
