pub mod cell;
pub mod field;
pub mod metadata;
pub mod row;

pub use cell::{Cell, CellChange, CellValue, CellWrite};
pub use field::{Field, FieldKind};
pub use metadata::{CrossReference, PrimaryPayload};
pub use row::Row;
