//! Core module tree: matrix model, solver adapter, derivation and rendering.

pub mod debug;
pub mod eigen;
pub mod error;
pub mod matrix;
pub mod number_format;
pub mod polynomial;
pub mod report;
pub mod session;
