//! Format-specific document backends

pub mod pdf;
