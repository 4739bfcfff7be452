//! Command line interface for the Ferret binary.

pub mod args;
pub mod commands;
