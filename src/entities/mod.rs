//! Entity type definitions
//!
//! - [`Issue`] - A tracked requirement from the issue tracker
//! - [`TestCase`] - A test-management case with its latest status
//! - [`TraceRow`] - One issue joined with the test cases that cover it

pub mod issue;
pub mod test_case;
pub mod trace_row;

pub use issue::Issue;
pub use test_case::TestCase;
pub use trace_row::{TraceRow, COLUMNS};
