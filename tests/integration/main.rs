//! Integration tests for fgconcord.
//!
//! These tests run the `fgconcord` binary end to end and check the files it writes.

mod helpers;
mod test_compare_command;
mod test_error_paths;
mod test_merge_command;
