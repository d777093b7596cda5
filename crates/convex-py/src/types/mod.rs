//! Core type wrappers for Python.

pub mod date;
mod enums;

pub use date::{extract_date, PyDate};
pub use enums::{PyCurrency, PyDayCount, PyFrequency};
