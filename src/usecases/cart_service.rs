//! Cart state manager: unique entries, write-through persistence, derived totals.
//!
//! - State lives in memory and is the source of truth for the session
//! - Every mutation that changes state (and every clear) writes the whole cart through StoragePort
//! - The entries lock is held across the write, so writes land in mutation order
//! - Load problems (missing, corrupt, unreadable) degrade to an empty cart

use crate::domain::{CartEntry, Catalog, DomainError};
use crate::ports::StoragePort;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage key used when the configuration does not name one.
pub const DEFAULT_CART_KEY: &str = "course_cart";

/// What a cart command did to the in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    Added,
    AlreadyInCart,
    /// The id is not in the catalog (stale reference).
    UnknownCourse,
    Removed,
    NotInCart,
    Cleared,
}

impl CartOutcome {
    pub fn changed(self) -> bool {
        matches!(
            self,
            CartOutcome::Added | CartOutcome::Removed | CartOutcome::Cleared
        )
    }
}

/// Result of a cart command. The command itself never fails; `persist_error` reports a
/// write that did not reach storage.
#[derive(Debug)]
pub struct CartMutation {
    pub outcome: CartOutcome,
    pub persist_error: Option<DomainError>,
}

impl CartMutation {
    fn unchanged(outcome: CartOutcome) -> Self {
        Self {
            outcome,
            persist_error: None,
        }
    }

    /// True when the in-memory state matches what storage holds.
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Serializes entries to the persisted layout (JSON array, insertion order).
pub fn encode_entries(entries: &[CartEntry]) -> Result<String, DomainError> {
    Ok(serde_json::to_string(entries)?)
}

/// Parses the persisted layout. Later duplicates of an id are dropped.
pub fn decode_entries(raw: &str) -> Result<Vec<CartEntry>, DomainError> {
    let parsed: Vec<CartEntry> = serde_json::from_str(raw)?;
    let mut out: Vec<CartEntry> = Vec::with_capacity(parsed.len());
    for entry in parsed {
        if out.iter().any(|e| e.id() == entry.id()) {
            debug!(course_id = %entry.id(), "dropping duplicate persisted cart entry");
            continue;
        }
        out.push(entry);
    }
    Ok(out)
}

/// Cart store. Commands and reads are async only because storage is.
pub struct CartService {
    catalog: Arc<Catalog>,
    storage: Arc<dyn StoragePort>,
    key: String,
    entries: Mutex<Vec<CartEntry>>,
    last_persist_error: Mutex<Option<String>>,
}

impl CartService {
    /// Build the store and load persisted state. Never fails: a missing key, a corrupt
    /// payload, or an unreadable backend all start an empty cart.
    pub async fn load(
        catalog: Arc<Catalog>,
        storage: Arc<dyn StoragePort>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let entries = Self::read_persisted(storage.as_ref(), &key).await;
        info!(key = %key, count = entries.len(), "cart loaded");
        Self {
            catalog,
            storage,
            key,
            entries: Mutex::new(entries),
            last_persist_error: Mutex::new(None),
        }
    }

    async fn read_persisted(storage: &dyn StoragePort, key: &str) -> Vec<CartEntry> {
        match storage.get(key).await {
            Ok(None) => Vec::new(),
            Ok(Some(raw)) => match decode_entries(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(key, error = %e, "persisted cart is corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(key, error = %e, "could not read persisted cart, starting empty");
                Vec::new()
            }
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds the catalog course with this id. No-op for unknown ids and for courses
    /// already in the cart.
    pub async fn add_to_cart(&self, course_id: &str) -> CartMutation {
        let mut entries = self.entries.lock().await;
        let Some(course) = self.catalog.find(course_id) else {
            debug!(course_id, "add ignored: course not in catalog");
            return CartMutation::unchanged(CartOutcome::UnknownCourse);
        };
        if entries.iter().any(|e| e.id() == course_id) {
            debug!(course_id, "add ignored: already in cart");
            return CartMutation::unchanged(CartOutcome::AlreadyInCart);
        }
        entries.push(CartEntry::new(course.clone(), Utc::now()));
        info!(course_id, count = entries.len(), "added course to cart");
        let persist_error = self.persist_locked(&entries).await.err();
        CartMutation {
            outcome: CartOutcome::Added,
            persist_error,
        }
    }

    pub async fn remove_from_cart(&self, course_id: &str) -> CartMutation {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|e| e.id() != course_id);
        if entries.len() == before {
            debug!(course_id, "remove ignored: not in cart");
            return CartMutation::unchanged(CartOutcome::NotInCart);
        }
        info!(course_id, count = entries.len(), "removed course from cart");
        let persist_error = self.persist_locked(&entries).await.err();
        CartMutation {
            outcome: CartOutcome::Removed,
            persist_error,
        }
    }

    /// Empties the cart and writes the empty state, even if it was already empty.
    pub async fn clear_cart(&self) -> CartMutation {
        let mut entries = self.entries.lock().await;
        let dropped = entries.len();
        entries.clear();
        info!(dropped, "cart cleared");
        let persist_error = self.persist_locked(&entries).await.err();
        CartMutation {
            outcome: CartOutcome::Cleared,
            persist_error,
        }
    }

    /// Writes the current state to storage.
    pub async fn persist(&self) -> Result<(), DomainError> {
        let entries = self.entries.lock().await;
        self.persist_locked(&entries).await
    }

    async fn persist_locked(&self, entries: &[CartEntry]) -> Result<(), DomainError> {
        let result = match encode_entries(entries) {
            Ok(json) => self.storage.set(&self.key, &json).await,
            Err(e) => Err(e),
        };
        let mut last = self.last_persist_error.lock().await;
        match &result {
            Ok(()) => *last = None,
            Err(e) => {
                warn!(
                    key = %self.key,
                    count = entries.len(),
                    error = %e,
                    "cart persist failed, in-memory cart stays authoritative"
                );
                *last = Some(e.to_string());
            }
        }
        result
    }

    /// Message of the most recent failed write, cleared by the next successful one.
    pub async fn last_persist_error(&self) -> Option<String> {
        self.last_persist_error.lock().await.clone()
    }

    pub async fn is_in_cart(&self, course_id: &str) -> bool {
        self.entries.lock().await.iter().any(|e| e.id() == course_id)
    }

    /// Sum of current prices (not original prices). Recomputed on every call.
    pub async fn cart_total(&self) -> u64 {
        self.entries
            .lock()
            .await
            .iter()
            .map(|e| e.course.price)
            .sum()
    }

    pub async fn cart_count(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Sum of discounts against original prices.
    pub async fn cart_savings(&self) -> u64 {
        self.entries
            .lock()
            .await
            .iter()
            .map(|e| e.course.savings())
            .sum()
    }

    /// Snapshot of the entries, oldest first.
    pub async fn entries(&self) -> Vec<CartEntry> {
        self.entries.lock().await.clone()
    }
}
