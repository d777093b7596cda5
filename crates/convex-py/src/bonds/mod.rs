//! Bond type wrappers for Python.

mod cashflow;
mod fixed_rate;

pub use cashflow::PyCashFlow;
pub use fixed_rate::PyFixedRateBond;
