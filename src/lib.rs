//! ras2cal — compiles sentence-like timetable sources into a resolved schedule model.

pub mod config;
pub mod dsl;
pub mod filter;
pub mod model;
pub mod source;
