//! Function-name lookup and normalization
//!
//! Business-function names in the register are free text with a known
//! set of historical typos and variants. Normalization corrects those
//! before comparison; the known-function set seeds the filter dropdown.

pub mod functions;

pub use functions::{known_functions, normalize_function_name};
