//! Library side of the `tabnest` binary: logging setup and export plans.

pub mod logging;
pub mod plan;
