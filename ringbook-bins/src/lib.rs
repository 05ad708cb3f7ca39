//! Shared code for the ringbook command-line tools

pub mod common;
