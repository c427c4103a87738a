//! Document ingestion: validation, storage, text extraction

mod extractor;
mod pipeline;

pub use extractor::{ExtractedText, PdfExtractor, TextExtractor};
pub use pipeline::{IngestPipeline, Upload};
