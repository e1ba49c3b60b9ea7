//! Atomic publication of catalog snapshots.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::catalog::RelayCatalog;

/// A catalog together with the generation it was published as
#[derive(Debug)]
struct Published {
    generation: u64,
    catalog: Arc<RelayCatalog>,
}

/// Holds the current relay catalog.
///
/// A refresher calls [`publish`](Self::publish) with a complete new catalog;
/// selectors call [`snapshot`](Self::snapshot) and keep using that snapshot
/// even if a newer one is published meanwhile. No catalog is ever mutated in
/// place. The generation number is swapped together with the catalog, so
/// concurrent publishers each get the number of their own catalog.
pub struct CatalogStore {
    current: ArcSwap<Published>,
}

impl CatalogStore {
    /// Create a store holding `catalog` as generation 0
    #[must_use]
    pub fn new(catalog: RelayCatalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(Published {
                generation: 0,
                catalog: Arc::new(catalog),
            }),
        }
    }

    /// The catalog currently published
    #[must_use]
    pub fn snapshot(&self) -> Arc<RelayCatalog> {
        Arc::clone(&self.current.load().catalog)
    }

    /// The catalog currently published and its generation, read together
    #[must_use]
    pub fn versioned_snapshot(&self) -> (u64, Arc<RelayCatalog>) {
        let current = self.current.load();
        (current.generation, Arc::clone(&current.catalog))
    }

    /// Replace the published catalog, returning the new generation number
    pub fn publish(&self, catalog: RelayCatalog) -> u64 {
        let issues = catalog.validate();
        if !issues.is_empty() {
            tracing::warn!(
                "Publishing relay list with {} integrity issue(s); affected entries are skipped",
                issues.len()
            );
            for issue in &issues {
                tracing::debug!("Relay list issue: {}", issue);
            }
        }

        let relays = catalog.wireguard.relays.len();
        let catalog = Arc::new(catalog);
        let previous = self.current.rcu(|current| Published {
            generation: current.generation + 1,
            catalog: Arc::clone(&catalog),
        });
        let generation = previous.generation + 1;

        tracing::info!(
            "Published relay list generation {} ({} WireGuard relays)",
            generation,
            relays
        );

        generation
    }

    /// Number of catalogs published since creation
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(RelayCatalog::default())
    }
}
