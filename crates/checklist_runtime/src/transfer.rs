//! Checklist export to, and import from, user-visible files.

use leptos::logging;
use platform_host::{pick_file_text_async, FileTransferService};
use thiserror::Error;

use crate::config::BootConfig;
use crate::migration::{decode_current, decode_legacy, DecodeError};
use crate::model::PersistedDocument;
use crate::runtime::PersistError;

#[derive(Debug, Error)]
/// Reasons an imported file was rejected.
pub enum ImportError {
    /// The text matched neither the current nor the legacy schema.
    #[error("file is not a checklist document (current schema: {current}; legacy schema: {legacy})")]
    Undecodable {
        /// Why the current-schema decode failed.
        current: DecodeError,
        /// Why the legacy decode failed.
        legacy: DecodeError,
    },
}

/// Downloads `document` as pretty-printed JSON under the configured file name.
///
/// # Errors
///
/// Returns [`PersistError`] when the document cannot be serialized.
pub fn export_document(
    files: &dyn FileTransferService,
    config: &BootConfig,
    document: &PersistedDocument,
) -> Result<(), PersistError> {
    let content = serde_json::to_string_pretty(document)?;
    files.download_as_file(&config.export_filename, &content, &config.export_mime);
    logging::log!(
        "exported {} checklists as `{}`",
        document.checklists.len(),
        config.export_filename
    );
    Ok(())
}

/// Decodes imported text with the same tiers the bootstrap uses: current schema, then legacy.
///
/// # Errors
///
/// Returns [`ImportError::Undecodable`] when neither schema matches.
pub fn decode_imported(text: &str) -> Result<PersistedDocument, ImportError> {
    let current = match decode_current(text) {
        Ok(document) => return Ok(document),
        Err(err) => err,
    };
    match decode_legacy(text) {
        Ok(checklists) => Ok(PersistedDocument::from_legacy(checklists)),
        Err(legacy) => Err(ImportError::Undecodable { current, legacy }),
    }
}

/// Opens a picker and passes the decoded document to `on_imported`.
///
/// `on_imported` never runs if the user cancels the picker.
pub fn import_document(
    files: &dyn FileTransferService,
    config: &BootConfig,
    on_imported: impl FnOnce(Result<PersistedDocument, ImportError>) + 'static,
) {
    files.pick_file_text(
        &config.import_accept,
        Box::new(move |text| on_imported(decode_imported(&text))),
    );
}

/// Async form of [`import_document`].
///
/// Resolves to `None` when the picker drops its callback without delivering a file.
pub async fn import_document_async(
    files: &dyn FileTransferService,
    config: &BootConfig,
) -> Option<Result<PersistedDocument, ImportError>> {
    let text = pick_file_text_async(files, &config.import_accept).await?;
    Some(decode_imported(&text))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use platform_host::MemoryFileTransferService;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn export_downloads_pretty_json_with_configured_name() {
        let files = MemoryFileTransferService::default();
        let document = PersistedDocument::from_legacy(vec![json!({"id": "x"})]);
        export_document(&files, &BootConfig::default(), &document).expect("export");

        let downloads = files.downloads();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].filename, "checklists.json");
        assert_eq!(downloads[0].mime_type, "application/json");
        assert!(downloads[0].content.contains('\n'));
        assert_eq!(
            decode_imported(&downloads[0].content).expect("re-import"),
            document
        );
    }

    #[test]
    fn import_accepts_current_and_legacy_files() {
        assert_eq!(
            decode_imported(r#"{"version":1,"checklists":[{"id":"c"}]}"#).expect("current"),
            PersistedDocument::from_legacy(vec![json!({"id": "c"})])
        );
        assert_eq!(
            decode_imported(r#"[{"id":"l"}]"#).expect("legacy"),
            PersistedDocument::from_legacy(vec![json!({"id": "l"})])
        );
        let err = decode_imported("42").expect_err("neither schema");
        assert!(matches!(
            err,
            ImportError::Undecodable {
                current: DecodeError::NotAnObject { .. },
                legacy: DecodeError::NotAnArray { .. },
            }
        ));
    }

    #[test]
    fn import_callback_uses_json_filter_and_skips_cancelled_picks() {
        let files = MemoryFileTransferService::default();
        let config = BootConfig::default();
        let results = Rc::new(RefCell::new(Vec::new()));

        let sink = results.clone();
        import_document(&files, &config, move |result| {
            sink.borrow_mut().push(result.is_ok())
        });
        assert!(results.borrow().is_empty());

        files.queue_pick("[]");
        let sink = results.clone();
        import_document(&files, &config, move |result| {
            sink.borrow_mut().push(result.is_ok())
        });

        assert_eq!(*results.borrow(), vec![true]);
        assert_eq!(
            files.pick_filters(),
            vec!["application/json".to_string(), "application/json".to_string()]
        );
    }

    #[test]
    fn async_import_reports_errors_and_cancellation() {
        let files = MemoryFileTransferService::default();
        let config = BootConfig::default();

        files.queue_pick("not json");
        let result = block_on(import_document_async(&files, &config)).expect("picked");
        assert!(result.is_err());

        assert!(block_on(import_document_async(&files, &config)).is_none());
    }
}
