//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use bytes::Bytes;

use bucketdock_backend::MemoryBackend;
use bucketdock_cli::App;
use bucketdock_core::config::AppConfig;
use bucketdock_core::traits::ObjectStore;
use bucketdock_entity::bucket::{Bucket, PublicLevel};
use bucketdock_entity::profile::UserRole;
use bucketdock_service::{Notifier, ToastId};
use bucketdock_storage::MemoryObjectStore;

/// A toast as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Loading(String),
    Success(String),
    Error(String),
}

/// Notifier that keeps every toast.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
    next: Mutex<u64>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter_map(|t| match t {
                Toast::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter_map(|t| match t {
                Toast::Success(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn loading(&self, message: &str) -> ToastId {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Loading(message.to_string()));
        let mut next = self.next.lock().unwrap();
        *next += 1;
        ToastId(*next)
    }

    fn dismiss(&self, _id: ToastId) {}

    fn success(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Error(message.to_string()));
    }
}

pub const OWNER: &str = "owner@x.com";
pub const ADMIN: &str = "admin@x.com";
pub const GUEST: &str = "guest@x.com";
pub const PASSWORD: &str = "secret1";

/// Test application context
pub struct TestApp {
    pub app: App,
    pub store: Arc<MemoryObjectStore>,
    pub backend: Arc<MemoryBackend>,
    pub notifier: Arc<RecordingNotifier>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    /// A signed-out app over empty stores with the three standard accounts.
    pub async fn new() -> Self {
        Self::with_store(MemoryObjectStore::new()).await
    }

    pub async fn with_store(store: MemoryObjectStore) -> Self {
        let store = Arc::new(store);
        let backend = Arc::new(MemoryBackend::new());
        backend.add_user(OWNER, PASSWORD, UserRole::User);
        backend.add_user(ADMIN, PASSWORD, UserRole::Admin);
        backend.add_user(GUEST, PASSWORD, UserRole::User);

        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.session.file = dir.path().join("session.json");

        let notifier = Arc::new(RecordingNotifier::default());
        let object_store: Arc<dyn ObjectStore> = store.clone();
        let app = App::from_parts(
            config,
            Ok(object_store),
            backend.clone(),
            backend.clone(),
            notifier.clone(),
        );
        app.restore_session().await.unwrap();

        Self {
            app,
            store,
            backend,
            notifier,
            _dir: dir,
        }
    }

    /// A signed-in app.
    pub async fn signed_in(email: &str) -> Self {
        let t = Self::new().await;
        t.login(email).await;
        t
    }

    pub async fn login(&self, email: &str) {
        self.app.auth().sign_in(email, PASSWORD).await.unwrap();
    }

    pub async fn logout(&self) {
        self.app.auth().sign_out().await.unwrap();
    }

    pub async fn create_bucket(&self, name: &str) -> Bucket {
        self.app
            .buckets()
            .unwrap()
            .create(&self.app.ctx(), name)
            .await
            .unwrap()
    }

    pub async fn set_level(&self, bucket: &Bucket, level: PublicLevel) {
        self.app
            .buckets()
            .unwrap()
            .set_visibility(&self.app.ctx(), bucket, level)
            .await
            .unwrap();
    }

    /// Write an object directly, bypassing quota accounting.
    pub async fn put(&self, bucket: &str, key: &str, size: usize) {
        self.store
            .put_object(bucket, key, Bytes::from(vec![b'x'; size]), None)
            .await
            .unwrap();
    }

    pub fn space_used(&self) -> i64 {
        let user = self.backend.current_user().unwrap();
        self.backend.profile(user).unwrap().space_used
    }
}
