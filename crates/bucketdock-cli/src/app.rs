//! Application wiring.
//!
//! Builds the backend client and the object store from configuration,
//! restores the persisted session and hands out services. A store that
//! cannot be built is kept as an error: commands that only talk to the
//! backend still run, and every command shows the error as a banner.

use std::sync::Arc;

use bucketdock_auth::{
    BucketAccess, ProfileStore, RequestContext, SessionStore,
};
use bucketdock_backend::{AuthProvider, MetadataBackend, RestBackend};
use bucketdock_core::config::AppConfig;
use bucketdock_core::error::AppError;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_entity::bucket::Bucket;
use bucketdock_service::{
    AccessService, AdminService, AuthService, BrowseService, BucketService, DeleteService,
    Notifier, PreviewService, QuotaService, SearchService, ShareService, SpaceRequestService,
    UploadService, VersionService,
};

use crate::session_file::SessionFile;

/// Everything a command needs.
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    store: Result<Arc<dyn ObjectStore>, AppError>,
    backend: Arc<dyn MetadataBackend>,
    notifier: Arc<dyn Notifier>,
    auth: AuthService,
    session_file: SessionFile,
}

impl App {
    /// Connect to the configured backend and object store.
    pub async fn connect(config: AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let rest = Arc::new(RestBackend::new(&config.backend)?);
        let store = bucketdock_storage::connect(&config.storage).await;
        if let Err(e) = &store {
            tracing::warn!(error = %e, "Object store unavailable");
        }
        Ok(Self::from_parts(config, store, rest.clone(), rest, notifier))
    }

    /// Assemble from already-built parts.
    pub fn from_parts(
        config: AppConfig,
        store: Result<Arc<dyn ObjectStore>, AppError>,
        backend: Arc<dyn MetadataBackend>,
        auth_provider: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let auth = AuthService::new(
            auth_provider,
            backend.clone(),
            Arc::new(SessionStore::new()),
            Arc::new(ProfileStore::new()),
            config.backend.password_reset_redirect.clone(),
        );
        let session_file = SessionFile::new(config.session.file.clone());
        Self {
            config,
            store,
            backend,
            notifier,
            auth,
            session_file,
        }
    }

    /// Load the persisted session and publish it.
    pub async fn restore_session(&self) -> AppResult<()> {
        let persisted = match self.session_file.load().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session file");
                None
            }
        };
        if let Some(intent) = self.auth.restore(persisted).await {
            crate::output::print_warning(&format!(
                "Password recovery in progress: run `bucketdock open {}`",
                intent.to
            ));
        }
        self.persist_session().await
    }

    /// Write the current session to disk.
    pub async fn persist_session(&self) -> AppResult<()> {
        let session = self.auth.sessions().session();
        self.session_file.save(session.as_ref()).await
    }

    /// Configuration in effect.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Persistent banner text, if the object store is unavailable.
    pub fn banner(&self) -> Option<String> {
        self.store
            .as_ref()
            .err()
            .map(|e| format!("Object storage is not configured: {}", e.message))
    }

    /// The object store, or the error that prevented building it.
    pub fn store(&self) -> AppResult<Arc<dyn ObjectStore>> {
        self.store.clone()
    }

    /// Who is acting.
    pub fn ctx(&self) -> RequestContext {
        self.auth.context()
    }

    /// Auth flows.
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Toast sink.
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Bucket lifecycle.
    pub fn buckets(&self) -> AppResult<BucketService> {
        Ok(BucketService::new(
            self.store()?,
            self.backend.clone(),
            self.notifier.clone(),
        ))
    }

    /// Bucket rows without touching the object store.
    pub async fn find_bucket(&self, name: &str) -> AppResult<Bucket> {
        self.backend
            .find_bucket(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Bucket '{name}' not found")))
    }

    /// Listing.
    pub fn browse(&self) -> AppResult<BrowseService> {
        Ok(BrowseService::new(self.store()?, self.config.browse.clone()))
    }

    /// Quota accounting.
    pub fn quota(&self) -> QuotaService {
        QuotaService::new(self.backend.clone(), self.auth.profiles().clone())
    }

    /// Deletion.
    pub fn deletes(&self) -> AppResult<DeleteService> {
        Ok(DeleteService::new(
            self.store()?,
            self.quota(),
            self.notifier.clone(),
        ))
    }

    /// Uploads and folders.
    pub fn uploads(&self) -> AppResult<UploadService> {
        Ok(UploadService::new(
            self.store()?,
            self.quota(),
            self.notifier.clone(),
        ))
    }

    /// Previews and downloads.
    pub fn previews(&self) -> AppResult<PreviewService> {
        Ok(PreviewService::new(self.store()?, self.config.share.clone()))
    }

    /// Share links.
    pub fn shares(&self) -> AppResult<ShareService> {
        Ok(ShareService::new(self.store()?, self.notifier.clone()))
    }

    /// Version history.
    pub fn versions(&self) -> AppResult<VersionService> {
        Ok(VersionService::new(
            self.store()?,
            self.notifier.clone(),
            self.config.share.clone(),
        ))
    }

    /// Membership.
    pub fn access(&self) -> AccessService {
        AccessService::new(self.backend.clone(), self.notifier.clone())
    }

    /// Search.
    pub fn search(&self) -> AppResult<SearchService> {
        Ok(SearchService::new(
            self.store()?,
            self.backend.clone(),
            self.config.browse.clone(),
        ))
    }

    /// Administration.
    pub fn admin(&self) -> AdminService {
        AdminService::new(self.backend.clone(), self.notifier.clone())
    }

    /// Space requests.
    pub fn space_requests(&self) -> SpaceRequestService {
        SpaceRequestService::new(self.backend.clone(), self.notifier.clone())
    }

    /// Resolve `name` and what the caller may do in it.
    pub async fn open_bucket(&self, name: &str) -> AppResult<(Bucket, BucketAccess)> {
        let bucket = self.find_bucket(name).await?;
        let ctx = self.ctx();
        let role = self.access().membership(&ctx, &bucket).await?;
        let access = BucketAccess::resolve(&bucket, ctx.user_id, role);
        access.require_read()?;
        Ok((bucket, access))
    }
}
