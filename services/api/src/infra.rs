use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use placewise::admin::service::AdminService;
use placewise::applications::service::ApplicationLifecycleService;
use placewise::companies::service::CompanyDirectoryService;
use placewise::config::{AppConfig, UploadConfig};
use placewise::identity::service::IdentityService;
use placewise::jobs::service::JobCatalogService;
use placewise::notifications::{EmailError, EmailMessage, EmailSender, Notifier};
use placewise::saved_jobs::service::SavedJobService;
use placewise::storage::{self, FileStore, StorageError, StoredFile, UploadKind};
use placewise::store::memory::MemoryStore;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the routers need, wired over one shared store.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) identity: Arc<IdentityService>,
    pub(crate) companies: Arc<CompanyDirectoryService>,
    pub(crate) jobs: Arc<JobCatalogService>,
    pub(crate) applications: Arc<ApplicationLifecycleService>,
    pub(crate) saved_jobs: Arc<SavedJobService>,
    pub(crate) admin: Arc<AdminService>,
    pub(crate) files: Arc<dyn FileStore>,
}

impl ServiceContext {
    pub(crate) fn build(
        store: Arc<MemoryStore>,
        mailer: Arc<dyn EmailSender>,
        files: Arc<dyn FileStore>,
        config: &AppConfig,
    ) -> Self {
        let identity = Arc::new(IdentityService::new(store.clone(), &config.auth));
        let companies = Arc::new(CompanyDirectoryService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let jobs = Arc::new(JobCatalogService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let applications = Arc::new(ApplicationLifecycleService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Notifier::new(mailer),
        ));
        let saved_jobs = Arc::new(SavedJobService::new(store.clone(), store.clone()));
        let admin = Arc::new(AdminService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        ));

        Self {
            identity,
            companies,
            jobs,
            applications,
            saved_jobs,
            admin,
            files,
        }
    }
}

/// Mail transport backed by a queue so senders return immediately; a
/// background task drains it. The worker here only logs — swap it for an
/// SMTP relay in a real deployment.
#[derive(Clone)]
pub(crate) struct QueuedEmailSender {
    queue: mpsc::UnboundedSender<EmailMessage>,
}

impl QueuedEmailSender {
    pub(crate) fn spawn() -> Self {
        let (queue, mut inbox) = mpsc::unbounded_channel::<EmailMessage>();
        tokio::spawn(async move {
            while let Some(message) = inbox.recv().await {
                info!(to = %message.to, subject = %message.subject, "email dispatched");
            }
        });
        Self { queue }
    }
}

impl EmailSender for QueuedEmailSender {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        self.queue
            .send(message)
            .map_err(|_| EmailError::Transport("mail queue closed".to_string()))
    }
}

/// Disk-backed file store serving uploads under the configured public base
/// URL. Stands in for the CDN bucket the deployment would use.
pub(crate) struct LocalFileStore {
    root: PathBuf,
    public_base: String,
    sequence: AtomicU64,
}

impl LocalFileStore {
    pub(crate) fn new(config: &UploadConfig) -> Self {
        Self {
            root: PathBuf::from(&config.directory),
            public_base: config.public_base_url.trim_end_matches('/').to_string(),
            sequence: AtomicU64::new(1),
        }
    }

    fn sanitize(filename: &str) -> Option<String> {
        let name = Path::new(filename).file_name()?.to_str()?;
        let cleaned: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        (!cleaned.trim_matches('.').is_empty()).then_some(cleaned)
    }
}

impl FileStore for LocalFileStore {
    fn put(
        &self,
        kind: UploadKind,
        filename: &str,
        contents: &[u8],
    ) -> Result<StoredFile, StorageError> {
        if contents.is_empty() {
            return Err(StorageError::EmptyUpload);
        }
        let name = Self::sanitize(filename).ok_or(StorageError::UnsupportedType(kind.label()))?;

        if kind.requires_image() {
            let guessed = mime_guess::from_path(&name)
                .first()
                .ok_or(StorageError::UnsupportedType(kind.label()))?;
            if !storage::is_image(&guessed) {
                return Err(StorageError::UnsupportedType(kind.label()));
            }
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stored_name = format!("{id:08}-{name}");
        let dir = self.root.join(kind.folder());
        std::fs::create_dir_all(&dir)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        std::fs::write(dir.join(&stored_name), contents)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        Ok(StoredFile {
            url: format!("{}/{}/{stored_name}", self.public_base, kind.folder()),
            original_name: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_oddities() {
        assert_eq!(
            LocalFileStore::sanitize("../../etc/passwd"),
            Some("passwd".to_string())
        );
        assert_eq!(
            LocalFileStore::sanitize("my resume (final).pdf"),
            Some("my-resume--final-.pdf".to_string())
        );
        assert_eq!(LocalFileStore::sanitize(""), None);
    }

    #[test]
    fn image_kinds_reject_non_images() {
        let store = LocalFileStore::new(&UploadConfig {
            directory: std::env::temp_dir()
                .join("placewise-test-uploads")
                .to_string_lossy()
                .into_owned(),
            public_base_url: "/uploads".to_string(),
        });
        assert!(matches!(
            store.put(UploadKind::CompanyLogo, "logo.pdf", b"%PDF"),
            Err(StorageError::UnsupportedType(_))
        ));
        let stored = store
            .put(UploadKind::CompanyLogo, "logo.png", b"\x89PNG")
            .expect("png accepted");
        assert!(stored.url.starts_with("/uploads/company-logos/"));
        assert!(stored.url.ends_with("-logo.png"));
    }
}
