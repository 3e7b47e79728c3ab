//! Attachment manager
//!
//! Coordinates attaching and removing event files against the object
//! storage collaborator. Storage trouble is reported as user-facing
//! messages and never aborts the surrounding form session.

use std::sync::Arc;

use log::warn;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::event::Attachment;
use crate::infrastructure::storage::ObjectStorage;

/// Storage scope for files uploaded before the event has an identifier
const NEW_EVENT_SCOPE: &str = "new-event";

/// One file handed over by the upload form
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Why a batch stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

/// Result of one upload batch.
///
/// Files uploaded before a failure stay uploaded (remote state is not
/// rolled back) and remain in `attached`; files after the failure were
/// never attempted.
#[derive(Debug, Clone, Default)]
pub struct BatchUploadOutcome {
    pub attached: Vec<Attachment>,
    pub failure: Option<UploadFailure>,
}

impl BatchUploadOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// How a download request was satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Object bytes fetched from storage
    Bytes { bytes: Vec<u8>, mime_type: String },
    /// Storage fetch failed; caller should open the public URL instead
    RedirectUrl(String),
}

pub struct AttachmentManager {
    storage: Arc<dyn ObjectStorage>,
}

impl AttachmentManager {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Upload files one at a time, in order, under the owning event's
    /// storage scope. The batch aborts on the first storage error.
    pub async fn upload_batch(
        &self,
        files: Vec<NewUpload>,
        owner_event_id: Option<&str>,
    ) -> BatchUploadOutcome {
        let scope = owner_event_id
            .filter(|id| !id.is_empty())
            .unwrap_or(NEW_EVENT_SCOPE);

        let mut outcome = BatchUploadOutcome::default();

        for file in files {
            let path = object_path(scope, &file.file_name);

            if let Err(e) = self.storage.put(&path, &file.bytes).await {
                warn!("Upload of '{}' failed: {}", file.file_name, e);
                outcome.failure = Some(UploadFailure {
                    file_name: file.file_name.clone(),
                    message: format!("upload of '{}' failed: {}", file.file_name, e),
                });
                break;
            }

            let public_url = self.storage.public_url(&path);
            outcome.attached.push(Attachment {
                name: file.file_name,
                storage_path: path,
                public_url,
                mime_type: file.mime_type,
            });
        }

        outcome
    }

    /// Best-effort remote delete. The caller removes the local record
    /// regardless, so a storage hiccup cannot wedge the attachment list;
    /// the trade-off is a possible orphaned remote object.
    pub async fn remove(&self, attachment: &Attachment) {
        if let Err(e) = self.storage.delete(&attachment.storage_path).await {
            warn!(
                "Remote delete of '{}' failed (local record removed anyway): {}",
                attachment.storage_path, e
            );
        }
    }

    /// Fetch the object's bytes, falling back to the stored public URL
    /// when storage refuses.
    pub async fn download(&self, attachment: &Attachment) -> DownloadOutcome {
        match self.storage.get(&attachment.storage_path).await {
            Ok(bytes) => DownloadOutcome::Bytes {
                bytes,
                mime_type: attachment.mime_type.clone(),
            },
            Err(e) => {
                warn!(
                    "Download of '{}' failed, falling back to public URL: {}",
                    attachment.storage_path, e
                );
                DownloadOutcome::RedirectUrl(attachment.public_url.clone())
            }
        }
    }
}

/// Collision-resistant bucket-relative path for one uploaded file
fn object_path(scope: &str, file_name: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("events/{}/{}-{}", scope, salt, sanitize_file_name(file_name))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryObjectStorage;

    fn upload(name: &str) -> NewUpload {
        NewUpload {
            file_name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"content".to_vec(),
        }
    }

    fn manager() -> (Arc<InMemoryObjectStorage>, AttachmentManager) {
        let storage = Arc::new(InMemoryObjectStorage::new());
        let manager = AttachmentManager::new(storage.clone());
        (storage, manager)
    }

    #[tokio::test]
    async fn batch_preserves_file_order() {
        let (_, manager) = manager();
        let outcome = manager
            .upload_batch(
                vec![upload("contract.pdf"), upload("menu.pdf")],
                Some("ev-1"),
            )
            .await;

        assert!(outcome.is_complete());
        let names: Vec<&str> = outcome.attached.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["contract.pdf", "menu.pdf"]);
        assert!(outcome.attached[0].storage_path.starts_with("events/ev-1/"));
    }

    #[tokio::test]
    async fn missing_owner_uses_new_event_scope() {
        let (_, manager) = manager();
        let outcome = manager.upload_batch(vec![upload("a.pdf")], None).await;
        assert!(outcome.attached[0]
            .storage_path
            .starts_with("events/new-event/"));
    }

    #[tokio::test]
    async fn batch_aborts_on_first_failure_and_keeps_prior_uploads() {
        let (storage, manager) = manager();
        storage.fail_puts_containing("broken");

        let outcome = manager
            .upload_batch(
                vec![upload("first.pdf"), upload("broken.pdf"), upload("third.pdf")],
                Some("ev-1"),
            )
            .await;

        // the first file stays attached, remotely and in the returned list
        assert_eq!(outcome.attached.len(), 1);
        assert_eq!(outcome.attached[0].name, "first.pdf");
        assert!(storage.contains(&outcome.attached[0].storage_path));

        // the error names the failing file
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.file_name, "broken.pdf");
        assert!(failure.message.contains("broken.pdf"));

        // the third file was never attempted
        assert_eq!(storage.object_count(), 1);
    }

    #[tokio::test]
    async fn remove_tolerates_storage_failure() {
        let (storage, manager) = manager();
        let outcome = manager.upload_batch(vec![upload("doomed.pdf")], Some("ev-1")).await;
        let attachment = outcome.attached.into_iter().next().unwrap();

        storage.fail_deletes_containing("doomed");
        // must not error or panic
        manager.remove(&attachment).await;
        // object is orphaned remotely, which is the accepted trade-off
        assert!(storage.contains(&attachment.storage_path));
    }

    #[tokio::test]
    async fn download_falls_back_to_public_url() {
        let (storage, manager) = manager();
        let outcome = manager.upload_batch(vec![upload("deck.pdf")], Some("ev-1")).await;
        let attachment = outcome.attached.into_iter().next().unwrap();

        match manager.download(&attachment).await {
            DownloadOutcome::Bytes { bytes, mime_type } => {
                assert_eq!(bytes, b"content");
                assert_eq!(mime_type, "application/pdf");
            }
            other => panic!("expected bytes, got {other:?}"),
        }

        storage.delete(&attachment.storage_path).await.unwrap();
        assert_eq!(
            manager.download(&attachment).await,
            DownloadOutcome::RedirectUrl(attachment.public_url.clone())
        );
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("menu (final).pdf"), "menu__final_.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn object_paths_differ_for_identical_names() {
        let a = object_path("ev-1", "same.pdf");
        let b = object_path("ev-1", "same.pdf");
        assert_ne!(a, b);
    }
}
