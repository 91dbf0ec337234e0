//! Incrementally loaded bucket list.

use bucketdock_auth::RequestContext;
use bucketdock_core::config::browse::BrowseConfig;
use bucketdock_core::result::AppResult;
use bucketdock_core::types::PageRequest;
use bucketdock_entity::bucket::Bucket;

use super::service::BucketService;

/// Bucket rows loaded so far, and whether more may follow.
#[derive(Debug, Clone)]
pub struct BucketFeed {
    items: Vec<Bucket>,
    next: PageRequest,
    has_more: bool,
    prefetch_threshold: usize,
}

impl BucketFeed {
    /// An empty feed paged per `config`.
    pub fn new(config: &BrowseConfig) -> Self {
        Self {
            items: Vec::new(),
            next: PageRequest::new(0, config.buckets_per_page),
            has_more: true,
            prefetch_threshold: config.prefetch_threshold,
        }
    }

    /// Rows loaded so far.
    pub fn items(&self) -> &[Bucket] {
        &self.items
    }

    /// Whether the last page came back full.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a viewport showing row `index` should trigger the next page.
    pub fn should_load_more(&self, index: usize) -> bool {
        self.has_more && index + self.prefetch_threshold >= self.items.len()
    }

    /// Fetch the next page and append it. Returns the number of new rows.
    pub async fn load_more(
        &mut self,
        service: &BucketService,
        ctx: &RequestContext,
    ) -> AppResult<usize> {
        if !self.has_more {
            return Ok(0);
        }
        let page = service.page(ctx, self.next).await?;
        let added = page.items.len();
        self.has_more = page.has_more;
        self.items.extend(page.items);
        self.next = self.next.next();
        Ok(added)
    }

    /// Drop everything and start again from the first page.
    pub fn reset(&mut self) {
        self.items.clear();
        self.next = PageRequest::new(0, self.next.page_size);
        self.has_more = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_load_more_near_end() {
        let config = BrowseConfig::default();
        let mut feed = BucketFeed::new(&config);
        assert!(feed.should_load_more(0));

        feed.items = (0..30)
            .map(|i| Bucket {
                id: Default::default(),
                name: format!("b{i}"),
                owner_id: Default::default(),
                public_level: Default::default(),
                created_at: None,
            })
            .collect();
        assert!(!feed.should_load_more(10));
        assert!(feed.should_load_more(25));

        feed.has_more = false;
        assert!(!feed.should_load_more(29));
    }
}
