//! One module per subcommand; each exposes an `execute` function.

pub mod add;
pub mod audit_cmd;
pub mod code;
pub mod completions;
pub mod delete;
pub mod list;
pub mod password;
