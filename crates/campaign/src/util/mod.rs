//! Shared helpers for the command-line host

pub mod io;
