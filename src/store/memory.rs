//! The mock store: collections held in memory, seeded from the bundled
//! fixtures, with simulated network latency so UI loading states behave as
//! they will against the real backend.

use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{EnquiryStore, FomoStore, LocationStore, Record, StoreError};
use crate::{
    enquiries::model::{Enquiry, EnquiryFields, EnquiryKind, EnquiryPatch},
    fixtures,
    fomo::model::{FomoDraft, FomoNotification, FomoPatch},
    locations::model::{Location, LocationDraft, LocationPatch},
};

/// Per-operation delay in milliseconds, mirroring what the mock services
/// shipped with.
#[derive(Debug, Clone, Copy)]
pub struct Delays {
    pub list: u64,
    pub fetch: u64,
    pub create: u64,
    pub update: u64,
    pub delete: u64,
}

const ENQUIRY_DELAYS: Delays = Delays {
    list: 300,
    fetch: 200,
    create: 500,
    update: 300,
    delete: 300,
};

const LOCATION_DELAYS: Delays = Delays {
    list: 250,
    fetch: 200,
    create: 400,
    update: 300,
    delete: 300,
};

const FOMO_DELAYS: Delays = Delays {
    list: 200,
    fetch: 200,
    create: 300,
    update: 200,
    delete: 200,
};

/// One entity collection behind a lock. The lock is what makes the
/// `max + 1` id assignment safe here, where the original relied on a single
/// event-loop thread.
struct MemCollection<T> {
    name: &'static str,
    rows: RwLock<Vec<T>>,
    delays: Option<Delays>,
}

impl<T: Record> MemCollection<T> {
    fn new(name: &'static str, rows: Vec<T>, delays: Option<Delays>) -> Self {
        Self {
            name,
            rows: RwLock::new(rows),
            delays,
        }
    }

    async fn simulate(&self, pick: impl FnOnce(&Delays) -> u64) {
        if let Some(delays) = &self.delays {
            tokio::time::sleep(Duration::from_millis(pick(delays))).await;
        }
    }

    async fn all(&self) -> Vec<T> {
        self.simulate(|d| d.list).await;
        self.rows.read().await.clone()
    }

    async fn get(&self, id: i64) -> Result<T, StoreError> {
        self.simulate(|d| d.fetch).await;
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or(StoreError::NotFound(self.name))
    }

    async fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(i64) -> T + Send,
    {
        self.simulate(|d| d.create).await;
        let mut rows = self.rows.write().await;
        let id = rows.iter().map(Record::id).max().unwrap_or(0) + 1;
        let row = build(id);
        rows.push(row.clone());
        row
    }

    async fn update_with<F>(&self, id: i64, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T) + Send,
    {
        self.simulate(|d| d.update).await;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(StoreError::NotFound(self.name))?;
        apply(row);
        Ok(row.clone())
    }

    async fn remove(&self, id: i64) -> Result<T, StoreError> {
        self.simulate(|d| d.delete).await;
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(StoreError::NotFound(self.name))?;
        Ok(rows.remove(index))
    }
}

pub struct MemStore {
    enquiries: MemCollection<Enquiry>,
    locations: MemCollection<Location>,
    fomo: MemCollection<FomoNotification>,
}

impl MemStore {
    /// Seeded from the bundled fixtures. `latency` turns the simulated
    /// delays on.
    pub fn seeded(latency: bool) -> anyhow::Result<Self> {
        Ok(Self {
            enquiries: MemCollection::new(
                "Enquiry",
                fixtures::seed_enquiries()?,
                latency.then_some(ENQUIRY_DELAYS),
            ),
            locations: MemCollection::new(
                "Location",
                fixtures::seed_locations()?,
                latency.then_some(LOCATION_DELAYS),
            ),
            fomo: MemCollection::new(
                "Notification",
                fixtures::seed_fomo()?,
                latency.then_some(FOMO_DELAYS),
            ),
        })
    }

    pub fn empty(latency: bool) -> Self {
        Self {
            enquiries: MemCollection::new("Enquiry", Vec::new(), latency.then_some(ENQUIRY_DELAYS)),
            locations: MemCollection::new(
                "Location",
                Vec::new(),
                latency.then_some(LOCATION_DELAYS),
            ),
            fomo: MemCollection::new("Notification", Vec::new(), latency.then_some(FOMO_DELAYS)),
        }
    }
}

#[async_trait]
impl EnquiryStore for MemStore {
    async fn all(&self) -> Result<Vec<Enquiry>, StoreError> {
        Ok(self.enquiries.all().await)
    }

    async fn get(&self, id: i64) -> Result<Enquiry, StoreError> {
        self.enquiries.get(id).await
    }

    async fn create(
        &self,
        kind: EnquiryKind,
        fields: EnquiryFields,
    ) -> Result<Enquiry, StoreError> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .enquiries
            .insert_with(|id| Enquiry::new(id, kind, fields, now))
            .await)
    }

    async fn update(&self, id: i64, patch: EnquiryPatch) -> Result<Enquiry, StoreError> {
        self.enquiries
            .update_with(id, |enquiry| patch.apply(enquiry))
            .await
    }

    async fn delete(&self, id: i64) -> Result<Enquiry, StoreError> {
        self.enquiries.remove(id).await
    }
}

#[async_trait]
impl LocationStore for MemStore {
    async fn all(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.locations.all().await)
    }

    async fn get(&self, id: i64) -> Result<Location, StoreError> {
        self.locations.get(id).await
    }

    async fn create(&self, draft: LocationDraft) -> Result<Location, StoreError> {
        Ok(self
            .locations
            .insert_with(|id| draft.into_location(id))
            .await)
    }

    async fn update(&self, id: i64, patch: LocationPatch) -> Result<Location, StoreError> {
        self.locations
            .update_with(id, |location| patch.apply(location))
            .await
    }

    async fn delete(&self, id: i64) -> Result<Location, StoreError> {
        self.locations.remove(id).await
    }
}

#[async_trait]
impl FomoStore for MemStore {
    async fn all(&self) -> Result<Vec<FomoNotification>, StoreError> {
        Ok(self.fomo.all().await)
    }

    async fn active(&self) -> Result<Vec<FomoNotification>, StoreError> {
        let mut rows = self.fomo.all().await;
        rows.retain(|n| n.is_active);
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<FomoNotification, StoreError> {
        self.fomo.get(id).await
    }

    async fn create(&self, draft: FomoDraft) -> Result<FomoNotification, StoreError> {
        Ok(self
            .fomo
            .insert_with(|id| draft.into_notification(id))
            .await)
    }

    async fn update(&self, id: i64, patch: FomoPatch) -> Result<FomoNotification, StoreError> {
        self.fomo
            .update_with(id, |notification| patch.apply(notification))
            .await
    }

    async fn delete(&self, id: i64) -> Result<FomoNotification, StoreError> {
        self.fomo.remove(id).await
    }
}
