//! Upload validation and PDF text extraction

pub mod filename;
pub mod parser;

pub use filename::{is_allowed_file, secure_filename, ALLOWED_EXTENSIONS};
pub use parser::{PdfTextExtractor, TextExtractor};
