//! Repository seam. Handlers only ever see these traits; swapping the mock
//! in-memory store for sqlite is a config change, not a code change.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::{
    enquiries::model::{Enquiry, EnquiryFields, EnquiryKind, EnquiryPatch},
    fomo::model::{FomoDraft, FomoNotification, FomoPatch},
    locations::model::{Location, LocationDraft, LocationPatch},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(err.into())
    }
}

/// A stored row with an integer primary key. Ids are assigned as
/// `max(existing, 0) + 1`, so they are unique and non-decreasing within a
/// collection, but not gap-free after deletes.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
}

#[async_trait]
pub trait EnquiryStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Enquiry>, StoreError>;
    async fn get(&self, id: i64) -> Result<Enquiry, StoreError>;
    /// Assigns the id, a server-side timestamp, and the default status.
    async fn create(&self, kind: EnquiryKind, fields: EnquiryFields)
    -> Result<Enquiry, StoreError>;
    async fn update(&self, id: i64, patch: EnquiryPatch) -> Result<Enquiry, StoreError>;
    async fn delete(&self, id: i64) -> Result<Enquiry, StoreError>;
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn all(&self) -> Result<Vec<Location>, StoreError>;
    async fn get(&self, id: i64) -> Result<Location, StoreError>;
    async fn create(&self, draft: LocationDraft) -> Result<Location, StoreError>;
    async fn update(&self, id: i64, patch: LocationPatch) -> Result<Location, StoreError>;
    async fn delete(&self, id: i64) -> Result<Location, StoreError>;
}

#[async_trait]
pub trait FomoStore: Send + Sync {
    async fn all(&self) -> Result<Vec<FomoNotification>, StoreError>;
    /// The subset the rotator draws from.
    async fn active(&self) -> Result<Vec<FomoNotification>, StoreError>;
    async fn get(&self, id: i64) -> Result<FomoNotification, StoreError>;
    /// New notifications start out active.
    async fn create(&self, draft: FomoDraft) -> Result<FomoNotification, StoreError>;
    async fn update(&self, id: i64, patch: FomoPatch) -> Result<FomoNotification, StoreError>;
    async fn delete(&self, id: i64) -> Result<FomoNotification, StoreError>;
}
