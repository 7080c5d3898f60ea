use crate::store::ProductRatings;
use parking_lot::RwLock;
use shared::ProductId;
use std::collections::HashMap;

/// User submitted ratings, kept in memory only. Last write wins per product.
#[derive(Debug, Default)]
pub struct RatingOverrides {
    entries: RwLock<HashMap<ProductId, ProductRatings>>,
}

impl RatingOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: ProductId) -> Option<ProductRatings> {
        self.entries.read().get(&product_id).copied()
    }

    pub fn insert(&self, product_id: ProductId, ratings: ProductRatings) {
        self.entries.write().insert(product_id, ratings);
    }
}
