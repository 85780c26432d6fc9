// Section/snippet vocabulary shared by ingest, bank and export.

pub mod models;
pub mod sanitize;
pub mod title;

pub use models::{BankSection, ParsedSection, Section, Snippet};
pub use sanitize::{fingerprint, sanitize};
pub use title::TitleAliases;
