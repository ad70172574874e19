//! Deal store
//!
//! Keyed map of created deals. The pipeline inserts exactly one deal per
//! successful run; later stage/funding mutations belong to downstream
//! services.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Deal;

/// Shared in-memory deal store
#[derive(Debug, Clone, Default)]
pub struct DealStore {
    deals: Arc<RwLock<HashMap<Uuid, Deal>>>,
}

impl DealStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a deal keyed by its id
    pub async fn put(&self, deal: Deal) {
        self.deals.write().await.insert(deal.deal_id, deal);
    }

    /// Snapshot a deal by id
    pub async fn get(&self, deal_id: Uuid) -> Option<Deal> {
        self.deals.read().await.get(&deal_id).cloned()
    }

    /// Snapshot all deals, newest first
    pub async fn list(&self) -> Vec<Deal> {
        let mut deals: Vec<Deal> = self.deals.read().await.values().cloned().collect();
        deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        deals
    }
}
