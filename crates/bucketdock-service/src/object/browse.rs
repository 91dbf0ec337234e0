//! Delimiter listings, the object feed and the folder tree.

use std::sync::Arc;

use serde::Serialize;

use bucketdock_core::config::browse::BrowseConfig;
use bucketdock_core::result::AppResult;
use bucketdock_core::traits::ObjectStore;
use bucketdock_core::traits::object_store::{ListObjectsRequest, ObjectMeta};
use bucketdock_entity::object::{Breadcrumb, breadcrumbs, display_name};

/// Folders and files directly under a prefix.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectListing {
    /// Child folder prefixes, each ending in `/`.
    pub folders: Vec<String>,
    /// Files, excluding the prefix's own placeholder object.
    pub files: Vec<ObjectMeta>,
    /// Token for the next page, if any.
    pub next_token: Option<String>,
}

/// Read-only access to bucket contents.
#[derive(Debug, Clone)]
pub struct BrowseService {
    store: Arc<dyn ObjectStore>,
    config: BrowseConfig,
}

impl BrowseService {
    /// Creates a new browse service.
    pub fn new(store: Arc<dyn ObjectStore>, config: BrowseConfig) -> Self {
        Self { store, config }
    }

    /// One delimiter page under `prefix`.
    pub async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<String>,
    ) -> AppResult<ObjectListing> {
        let request = ListObjectsRequest::delimited(prefix)
            .with_token(token)
            .with_max_keys(self.config.objects_per_page);
        let page = self.store.list_objects(bucket, &request).await?;
        Ok(ObjectListing {
            folders: page.folders,
            files: page
                .objects
                .into_iter()
                .filter(|o| o.key != prefix)
                .collect(),
            next_token: page.next_continuation_token,
        })
    }

    /// Every immediate child folder of `prefix`, across all pages.
    pub async fn child_folders(&self, bucket: &str, prefix: &str) -> AppResult<Vec<String>> {
        let mut folders = Vec::new();
        let mut token = None;
        loop {
            let page = self.list_page(bucket, prefix, token).await?;
            folders.extend(page.folders);
            match page.next_token {
                Some(next) => token = Some(next),
                None => return Ok(folders),
            }
        }
    }

    /// Breadcrumb trail for `prefix`.
    pub fn breadcrumbs(&self, prefix: &str) -> Vec<Breadcrumb> {
        breadcrumbs(prefix)
    }
}

/// Contents of one folder, fetched a page at a time.
#[derive(Debug, Clone)]
pub struct ObjectFeed {
    bucket: String,
    prefix: String,
    folders: Vec<String>,
    files: Vec<ObjectMeta>,
    next_token: Option<String>,
    started: bool,
}

impl ObjectFeed {
    /// An empty feed for `bucket` at `prefix`.
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            folders: Vec::new(),
            files: Vec::new(),
            next_token: None,
            started: false,
        }
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Current prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Folders loaded so far.
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Files loaded so far.
    pub fn files(&self) -> &[ObjectMeta] {
        &self.files
    }

    /// Whether another page is available.
    pub fn has_more(&self) -> bool {
        !self.started || self.next_token.is_some()
    }

    /// Fetch the next page. Returns the number of new entries.
    pub async fn load_more(&mut self, browse: &BrowseService) -> AppResult<usize> {
        if !self.has_more() {
            return Ok(0);
        }
        let page = browse
            .list_page(&self.bucket, &self.prefix, self.next_token.clone())
            .await?;
        self.started = true;
        let added = page.folders.len() + page.files.len();
        self.folders.extend(page.folders);
        self.files.extend(page.files);
        self.next_token = page.next_token;
        Ok(added)
    }

    /// Load pages until the listing is exhausted.
    pub async fn load_all(&mut self, browse: &BrowseService) -> AppResult<()> {
        while self.has_more() {
            self.load_more(browse).await?;
        }
        Ok(())
    }

    /// Move to another folder, discarding loaded entries.
    pub fn navigate(&mut self, prefix: impl Into<String>) {
        *self = Self::new(std::mem::take(&mut self.bucket), prefix);
    }
}

/// A folder node, expanded on demand.
#[derive(Debug, Clone, Serialize)]
pub struct FolderTree {
    /// Folder prefix, empty for the bucket root.
    pub prefix: String,
    /// Display name.
    pub name: String,
    /// Child folders, `None` until expanded.
    pub children: Option<Vec<FolderTree>>,
}

impl FolderTree {
    /// Unexpanded root of `bucket`.
    pub fn root(bucket: &str) -> Self {
        Self {
            prefix: String::new(),
            name: bucket.to_string(),
            children: None,
        }
    }

    fn leaf(prefix: String) -> Self {
        Self {
            name: display_name(&prefix).to_string(),
            prefix,
            children: None,
        }
    }

    /// Load this node's child folders.
    pub async fn expand(&mut self, browse: &BrowseService, bucket: &str) -> AppResult<()> {
        let folders = browse.child_folders(bucket, &self.prefix).await?;
        self.children = Some(folders.into_iter().map(Self::leaf).collect());
        Ok(())
    }

    /// Find the node for `prefix` below this one.
    pub fn find_mut(&mut self, prefix: &str) -> Option<&mut FolderTree> {
        if self.prefix == prefix {
            return Some(self);
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find(|c| prefix.starts_with(&c.prefix))?
            .find_mut(prefix)
    }

    /// Expand every node from the root down to `prefix`.
    pub async fn expand_path(
        &mut self,
        browse: &BrowseService,
        bucket: &str,
        prefix: &str,
    ) -> AppResult<()> {
        if self.children.is_none() {
            self.expand(browse, bucket).await?;
        }
        for crumb in breadcrumbs(prefix) {
            match self.find_mut(&crumb.prefix) {
                Some(node) if node.children.is_none() => node.expand(browse, bucket).await?,
                Some(_) => {}
                None => break,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketdock_storage::MemoryObjectStore;
    use bytes::Bytes;

    async fn store() -> Arc<MemoryObjectStore> {
        let store = Arc::new(MemoryObjectStore::new().with_page_size(2));
        store.create_bucket("b").await.unwrap();
        for key in ["docs/", "docs/a.txt", "docs/b.txt", "docs/c.txt", "docs/img/x.png", "top.txt"] {
            store.put_object("b", key, Bytes::from_static(b"x"), None).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_listing_excludes_placeholder() {
        let store = store().await;
        let browse = BrowseService::new(store, BrowseConfig::default());
        let mut feed = ObjectFeed::new("b", "docs/");
        feed.load_all(&browse).await.unwrap();

        assert_eq!(feed.folders(), ["docs/img/".to_string()]);
        let keys: Vec<&str> = feed.files().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["docs/a.txt", "docs/b.txt", "docs/c.txt"]);
    }

    #[tokio::test]
    async fn test_feed_pages_incrementally() {
        let store = store().await;
        let browse = BrowseService::new(store, BrowseConfig::default());
        let mut feed = ObjectFeed::new("b", "docs/");
        feed.load_more(&browse).await.unwrap();
        assert!(feed.has_more());
        feed.load_all(&browse).await.unwrap();
        assert!(!feed.has_more());
    }

    #[tokio::test]
    async fn test_tree_expands_to_prefix() {
        let store = store().await;
        let browse = BrowseService::new(store, BrowseConfig::default());
        let mut tree = FolderTree::root("b");
        tree.expand_path(&browse, "b", "docs/img/").await.unwrap();

        let docs = tree.find_mut("docs/").unwrap();
        assert_eq!(docs.name, "docs");
        let img = docs.children.as_ref().unwrap();
        assert_eq!(img[0].prefix, "docs/img/");
    }
}
