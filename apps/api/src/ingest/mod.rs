// Document ingestion: uploaded bytes -> text -> parsed sections ready for the bank.

pub mod extractor;
pub mod header;
pub mod markdown;
pub mod plain_text;
pub mod prompts;
pub mod upload;

pub use extractor::{
    ExtractError, ExtractorKind, LlmExtractor, MarkdownExtractor, SectionExtractor,
};
pub use header::prepare_for_bank;
pub use markdown::{Level1Heading, ParserOptions};
