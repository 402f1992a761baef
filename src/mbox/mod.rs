//! Mailbox reading and header field extraction

mod extractor;

pub use extractor::MboxExtractor;
