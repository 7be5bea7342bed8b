//! Terminal output for the `lam` commands.
//!
//! # Modules
//!
//! - [`display`]: status lines, the pack summary and the config listing
//! - [`progress`]: spinner shown while an archive or PAR2 step runs

pub mod display;
pub mod progress;
