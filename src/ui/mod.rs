//! Terminal presentation for the CLI.
//!
//! - [`display`]: result tables and status lines
//! - [`progress`]: byte progress bar advanced by the file codecs
//! - [`prompt`]: masked key entry

pub mod display;
pub mod progress;
pub mod prompt;
