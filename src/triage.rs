use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bookmarks::collection::{Collection, SelectionStrategy};
use crate::bookmarks::store::BookmarkHost;
use crate::bookmarks::tree::FlatBookmark;
use crate::error::Result;
use crate::protocol::{Inbound, Outbound};

/// Handles UI messages against the bookmark host, one at a time.
pub struct Triage<H: BookmarkHost> {
    host: H,
    collection: Collection,
    rng: StdRng,
}

impl<H: BookmarkHost> Triage<H> {
    /// Create a dispatcher; `seed` makes the pick order reproducible.
    pub fn new(host: H, strategy: SelectionStrategy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            host,
            collection: Collection::new(strategy),
            rng,
        }
    }

    /// Apply one message and reply with the next bookmark to show.
    ///
    /// Fails with `EmptyCollection` once nothing is left.
    pub async fn handle(&mut self, message: Inbound) -> Result<Outbound> {
        tracing::debug!(?message, "dispatch");
        match message {
            Inbound::Collect => {
                self.collect().await?;
            }
            Inbound::Delete { id } => {
                // The host delete is fire-and-forget: a failure there must not
                // keep the bookmark in this pass.
                if let Err(e) = self.host.remove_bookmark(&id).await {
                    tracing::warn!(id = %id, error = %e, "host failed to remove bookmark");
                }
                tracing::info!(id = %id, path = ?self.collection.path_of(&id), "deleted");
                self.forget(&id);
            }
            Inbound::Keep { id } => {
                tracing::info!(id = %id, "kept");
                self.forget(&id);
            }
            Inbound::Skip => {}
        }
        let bookmark = self.collection.pick_next(&mut self.rng)?.clone();
        Ok(Outbound::RandomBookmark { bookmark })
    }

    /// Fetch the tree from the host and start a fresh pass.
    pub async fn collect(&mut self) -> Result<&[FlatBookmark]> {
        let root = self.host.get_bookmark_tree().await?;
        Ok(self.collection.collect(&root))
    }

    /// Hand a URL to the host's browser.
    pub async fn open(&self, url: &str) -> Result<()> {
        self.host.open_url(url).await
    }

    /// Bookmarks left in the current pass.
    pub fn remaining(&self) -> usize {
        self.collection.len()
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.collection.strategy()
    }

    fn forget(&mut self, id: &str) {
        if !self.collection.remove_by_id(id) {
            tracing::debug!(id, "not in collection, nothing to remove");
        }
    }
}
