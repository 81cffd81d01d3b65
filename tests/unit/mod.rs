//! Unit test harness for ashdome.
//!
//! This module organizes file-backed tests for configuration and
//! calibration loading.

mod config_parsing;
mod config_validation;
mod inertia_loading;
