//! Serialization of laid-out documents to PDF and JSON.

mod json;
mod options;
mod pdf;
mod result;

pub use json::{to_json, JsonFormat};
pub use options::PdfOptions;
pub use pdf::{to_pdf, to_winansi, write_pdf};
pub use result::RenderReport;
