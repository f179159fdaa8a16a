//! CLI subcommand implementations for the Syllabo binary.

pub mod doctor;
pub mod extract_cmd;
pub mod output;
pub mod session_cmd;
