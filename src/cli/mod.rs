//! Terminal front ends for the converter

pub mod convert;
pub mod interactive;
pub mod setup;
pub mod ui;
