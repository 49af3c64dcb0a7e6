//! Character-paced output engine and the text helpers segments format with.
//!
//! Everything that reaches the terminal goes through [`TimedWriter`], which
//! owns every pacing delay in the program.

pub mod text;
pub mod wrap;
pub mod writer;

pub use text::{clean_chars, format_date, format_time, strip_tags};
pub use wrap::wrap_text;
pub use writer::TimedWriter;
