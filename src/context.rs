mod extractor;

pub use extractor::{ExtractedContext, extract, plain_text};
