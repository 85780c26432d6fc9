//! Text import: extract -> prepare -> merge into the bank.
//!
//! One import runs at a time. Extraction happens outside the workspace lock; the
//! merge is applied under the write lock, so a failed import leaves the bank untouched.

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::bank::workspace::{ImportReport, Workspace};
use crate::errors::AppError;
use crate::ingest::{prepare_for_bank, ExtractError, SectionExtractor};

pub async fn import_text(
    extractor: &dyn SectionExtractor,
    workspace: &RwLock<Workspace>,
    gate: &Mutex<()>,
    raw_text: &str,
) -> Result<ImportReport, AppError> {
    if raw_text.trim().is_empty() {
        return Err(AppError::EmptyInput(
            "The provided document is empty".to_string(),
        ));
    }

    let _guard = gate.try_lock().map_err(|_| {
        warn!("Rejected import: another import is in progress");
        AppError::ImportInProgress
    })?;

    let aliases = workspace.read().await.aliases().clone();
    let parsed = extractor.extract(raw_text).await.map_err(|err| {
        warn!("Extractor '{}' failed: {err}", extractor.backend());
        AppError::ParseFailed(err.to_string())
    })?;
    let prepared = prepare_for_bank(&aliases, parsed, raw_text);
    if prepared.is_empty() {
        warn!(
            "Extractor '{}' produced no usable sections from {} bytes",
            extractor.backend(),
            raw_text.len()
        );
        return Err(ExtractError::NoSections.into());
    }

    let report = workspace.write().await.apply_import(&prepared);
    info!(
        "Imported via {}: {} new section(s), {} new snippet(s), bank now {} section(s)",
        extractor.backend(),
        report.added_sections,
        report.added_snippets,
        report.bank.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::MarkdownExtractor;
    use crate::sections::ParsedSection;
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl SectionExtractor for Failing {
        fn backend(&self) -> &'static str {
            "failing"
        }

        async fn extract(&self, _raw_text: &str) -> Result<Vec<ParsedSection>, ExtractError> {
            Err(ExtractError::Malformed("not json".into()))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl SectionExtractor for Unreachable {
        fn backend(&self) -> &'static str {
            "unreachable"
        }

        async fn extract(&self, _raw_text: &str) -> Result<Vec<ParsedSection>, ExtractError> {
            Err(ExtractError::Llm("connection reset".into()))
        }
    }

    struct Blank;

    #[async_trait]
    impl SectionExtractor for Blank {
        fn backend(&self) -> &'static str {
            "blank"
        }

        async fn extract(&self, _raw_text: &str) -> Result<Vec<ParsedSection>, ExtractError> {
            Ok(vec![ParsedSection::new("Skills", vec!["  ".into(), "-".into()])])
        }
    }

    const DOC: &str = "# Jane Doe\njane@example.com\n## Skills\n- Python\n- SQL";

    #[tokio::test]
    async fn test_import_then_reimport_is_noop() {
        let workspace = RwLock::new(Workspace::default());
        let gate = Mutex::new(());
        let extractor = MarkdownExtractor::default();

        let first = import_text(&extractor, &workspace, &gate, DOC).await.unwrap();
        assert_eq!(first.added_sections, 2);
        assert_eq!(first.added_snippets, 3);
        assert_eq!(first.bank[0].title, "Header");

        let second = import_text(&extractor, &workspace, &gate, DOC).await.unwrap();
        assert_eq!(second.added_sections, 0);
        assert_eq!(second.added_snippets, 0);
        assert_eq!(second.bank, first.bank);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let workspace = RwLock::new(Workspace::default());
        let gate = Mutex::new(());
        let err = import_text(&MarkdownExtractor::default(), &workspace, &gate, " \n\t")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn test_failed_import_leaves_bank_untouched() {
        let workspace = RwLock::new(Workspace::default());
        let gate = Mutex::new(());
        import_text(&MarkdownExtractor::default(), &workspace, &gate, DOC)
            .await
            .unwrap();
        let before = workspace.read().await.bank().to_vec();

        let err = import_text(&Failing, &workspace, &gate, "anything").await.unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)));
        let err = import_text(&Blank, &workspace, &gate, "- only a bullet")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)));
        assert_eq!(workspace.read().await.bank(), before.as_slice());
    }

    #[tokio::test]
    async fn test_concurrent_import_is_refused() {
        let workspace = RwLock::new(Workspace::default());
        let gate = Mutex::new(());
        let _held = gate.lock().await;
        let err = import_text(&MarkdownExtractor::default(), &workspace, &gate, DOC)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImportInProgress));
    }

    #[tokio::test]
    async fn test_extractor_call_failure_is_parse_failure() {
        let workspace = RwLock::new(Workspace::default());
        let gate = Mutex::new(());
        let err = import_text(&Unreachable, &workspace, &gate, DOC).await.unwrap_err();
        assert!(matches!(err, AppError::ParseFailed(_)), "got {err:?}");
        assert!(workspace.read().await.bank().is_empty());
        assert!(gate.try_lock().is_ok(), "gate released after failure");
    }
}
