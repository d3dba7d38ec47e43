/// Form widgets
///
/// One `Field` per configured upload field: drop target, picker button,
/// error banner and thumbnail grid.

pub mod field;

pub use field::Field;
