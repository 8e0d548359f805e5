//! Integration tests for the mpramap binary.
//!
//! Each module runs one subcommand end to end on small fixture inputs.

mod helpers;
mod test_error_paths;
mod test_group_command;
mod test_map_command;
mod test_resolve_command;
mod test_score_command;
mod test_summarize_command;
