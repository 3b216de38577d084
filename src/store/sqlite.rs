//! Sqlite-backed store, selected by setting `DATABASE_URL`. Same contract
//! as the mock store, including the `max + 1` id rule; the primary key
//! turns a racing create into a hard error rather than a duplicate id.

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::{EnquiryStore, FomoStore, LocationStore, StoreError};
use crate::{
    enquiries::model::{Enquiry, EnquiryFields, EnquiryKind, EnquiryPatch},
    fixtures,
    fomo::model::{FomoDraft, FomoNotification, FomoPatch},
    locations::model::{Location, LocationDraft, LocationPatch},
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS enquiries (
    id INTEGER PRIMARY KEY,
    kind TEXT NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    company TEXT,
    location TEXT,
    experience TEXT,
    profession TEXT,
    clinic_name TEXT,
    years_experience TEXT,
    subject TEXT,
    preferred_contact TEXT,
    message TEXT,
    timestamp TEXT NOT NULL,
    status TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    phone TEXT NOT NULL,
    whatsapp TEXT NOT NULL,
    email TEXT NOT NULL,
    hours TEXT NOT NULL,
    parking TEXT NOT NULL,
    map_url TEXT NOT NULL,
    services TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS fomo_notifications (
    id INTEGER PRIMARY KEY,
    location TEXT NOT NULL,
    message TEXT NOT NULL,
    time_ago TEXT NOT NULL,
    is_active INTEGER NOT NULL
);
";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        // an in-memory database exists per connection, so it must not be
        // spread across a pool
        let max_connections = if url.contains(":memory:") { 1 } else { 16 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        let store = Self { pool };
        sqlx::raw_sql(SCHEMA).execute(&store.pool).await?;
        store.seed_if_empty().await?;
        Ok(store)
    }

    async fn seed_if_empty(&self) -> anyhow::Result<()> {
        let (locations,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;
        if locations == 0 {
            for location in fixtures::seed_locations()? {
                self.insert_location(&location).await?;
            }
        }

        let (enquiries,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enquiries")
            .fetch_one(&self.pool)
            .await?;
        if enquiries == 0 {
            for enquiry in fixtures::seed_enquiries()? {
                self.insert_enquiry(&enquiry).await?;
            }
        }

        let (fomo,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fomo_notifications")
            .fetch_one(&self.pool)
            .await?;
        if fomo == 0 {
            for notification in fixtures::seed_fomo()? {
                self.insert_fomo(&notification).await?;
            }
        }

        Ok(())
    }

    async fn next_id(&self, table: &str) -> Result<i64, StoreError> {
        let (next,): (i64,) =
            sqlx::query_as(&format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {table}"))
                .fetch_one(&self.pool)
                .await?;
        Ok(next)
    }

    async fn insert_enquiry(&self, enquiry: &Enquiry) -> Result<(), StoreError> {
        let timestamp = enquiry
            .timestamp
            .format(&Rfc3339)
            .map_err(anyhow::Error::from)?;
        sqlx::query(
            "INSERT INTO enquiries (id,kind,name,email,phone,company,location,experience,\
             profession,clinic_name,years_experience,subject,preferred_contact,message,\
             timestamp,status) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(enquiry.id)
        .bind(enquiry.kind.as_str())
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone)
        .bind(&enquiry.company)
        .bind(&enquiry.location)
        .bind(&enquiry.experience)
        .bind(&enquiry.profession)
        .bind(&enquiry.clinic_name)
        .bind(&enquiry.years_experience)
        .bind(&enquiry.subject)
        .bind(&enquiry.preferred_contact)
        .bind(&enquiry.message)
        .bind(timestamp)
        .bind(enquiry.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_location(&self, location: &Location) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO locations (id,name,address,city,phone,whatsapp,email,hours,parking,\
             map_url,services) VALUES (?,?,?,?,?,?,?,?,?,?,?)",
        )
        .bind(location.id)
        .bind(&location.name)
        .bind(&location.address)
        .bind(&location.city)
        .bind(&location.phone)
        .bind(&location.whatsapp)
        .bind(&location.email)
        .bind(&location.hours)
        .bind(&location.parking)
        .bind(&location.map_url)
        .bind(serde_json::to_string(&location.services)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_fomo(&self, notification: &FomoNotification) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO fomo_notifications (id,location,message,time_ago,is_active) \
             VALUES (?,?,?,?,?)",
        )
        .bind(notification.id)
        .bind(&notification.location)
        .bind(&notification.message)
        .bind(&notification.time_ago)
        .bind(notification.is_active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct EnquiryRow {
    id: i64,
    kind: String,
    name: String,
    email: String,
    phone: String,
    company: Option<String>,
    location: Option<String>,
    experience: Option<String>,
    profession: Option<String>,
    clinic_name: Option<String>,
    years_experience: Option<String>,
    subject: Option<String>,
    preferred_contact: Option<String>,
    message: Option<String>,
    timestamp: String,
    status: String,
}

impl EnquiryRow {
    fn into_enquiry(self) -> Result<Enquiry, StoreError> {
        Ok(Enquiry {
            id: self.id,
            kind: self.kind.parse().map_err(StoreError::Backend)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            location: self.location,
            experience: self.experience,
            profession: self.profession,
            clinic_name: self.clinic_name,
            years_experience: self.years_experience,
            subject: self.subject,
            preferred_contact: self.preferred_contact,
            message: self.message,
            timestamp: OffsetDateTime::parse(&self.timestamp, &Rfc3339)
                .map_err(anyhow::Error::from)?,
            status: self.status.parse().map_err(StoreError::Backend)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    id: i64,
    name: String,
    address: String,
    city: String,
    phone: String,
    whatsapp: String,
    email: String,
    hours: String,
    parking: String,
    map_url: String,
    services: String,
}

impl LocationRow {
    fn into_location(self) -> Result<Location, StoreError> {
        Ok(Location {
            id: self.id,
            name: self.name,
            address: self.address,
            city: self.city,
            phone: self.phone,
            whatsapp: self.whatsapp,
            email: self.email,
            hours: self.hours,
            parking: self.parking,
            map_url: self.map_url,
            services: serde_json::from_str(&self.services)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FomoRow {
    id: i64,
    location: String,
    message: String,
    time_ago: String,
    is_active: bool,
}

impl FomoRow {
    fn into_notification(self) -> FomoNotification {
        FomoNotification {
            id: self.id,
            location: self.location,
            message: self.message,
            time_ago: self.time_ago,
            is_active: self.is_active,
        }
    }
}

#[async_trait]
impl EnquiryStore for SqliteStore {
    async fn all(&self) -> Result<Vec<Enquiry>, StoreError> {
        let rows: Vec<EnquiryRow> = sqlx::query_as("SELECT * FROM enquiries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(EnquiryRow::into_enquiry).collect()
    }

    async fn get(&self, id: i64) -> Result<Enquiry, StoreError> {
        let row: Option<EnquiryRow> = sqlx::query_as("SELECT * FROM enquiries WHERE id=?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(StoreError::NotFound("Enquiry"))?.into_enquiry()
    }

    async fn create(
        &self,
        kind: EnquiryKind,
        fields: EnquiryFields,
    ) -> Result<Enquiry, StoreError> {
        let id = self.next_id("enquiries").await?;
        let enquiry = Enquiry::new(id, kind, fields, OffsetDateTime::now_utc());
        self.insert_enquiry(&enquiry).await?;
        Ok(enquiry)
    }

    async fn update(&self, id: i64, patch: EnquiryPatch) -> Result<Enquiry, StoreError> {
        let mut enquiry = EnquiryStore::get(self, id).await?;
        patch.apply(&mut enquiry);
        let timestamp = enquiry
            .timestamp
            .format(&Rfc3339)
            .map_err(anyhow::Error::from)?;
        sqlx::query(
            "UPDATE enquiries SET kind=?,name=?,email=?,phone=?,company=?,location=?,\
             experience=?,profession=?,clinic_name=?,years_experience=?,subject=?,\
             preferred_contact=?,message=?,timestamp=?,status=? WHERE id=?",
        )
        .bind(enquiry.kind.as_str())
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone)
        .bind(&enquiry.company)
        .bind(&enquiry.location)
        .bind(&enquiry.experience)
        .bind(&enquiry.profession)
        .bind(&enquiry.clinic_name)
        .bind(&enquiry.years_experience)
        .bind(&enquiry.subject)
        .bind(&enquiry.preferred_contact)
        .bind(&enquiry.message)
        .bind(timestamp)
        .bind(enquiry.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(enquiry)
    }

    async fn delete(&self, id: i64) -> Result<Enquiry, StoreError> {
        let enquiry = EnquiryStore::get(self, id).await?;
        sqlx::query("DELETE FROM enquiries WHERE id=?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(enquiry)
    }
}

#[async_trait]
impl LocationStore for SqliteStore {
    async fn all(&self) -> Result<Vec<Location>, StoreError> {
        let rows: Vec<LocationRow> = sqlx::query_as("SELECT * FROM locations ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(LocationRow::into_location).collect()
    }

    async fn get(&self, id: i64) -> Result<Location, StoreError> {
        let row: Option<LocationRow> = sqlx::query_as("SELECT * FROM locations WHERE id=?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(StoreError::NotFound("Location"))?.into_location()
    }

    async fn create(&self, draft: LocationDraft) -> Result<Location, StoreError> {
        let id = self.next_id("locations").await?;
        let location = draft.into_location(id);
        self.insert_location(&location).await?;
        Ok(location)
    }

    async fn update(&self, id: i64, patch: LocationPatch) -> Result<Location, StoreError> {
        let mut location = LocationStore::get(self, id).await?;
        patch.apply(&mut location);
        sqlx::query(
            "UPDATE locations SET name=?,address=?,city=?,phone=?,whatsapp=?,email=?,hours=?,\
             parking=?,map_url=?,services=? WHERE id=?",
        )
        .bind(&location.name)
        .bind(&location.address)
        .bind(&location.city)
        .bind(&location.phone)
        .bind(&location.whatsapp)
        .bind(&location.email)
        .bind(&location.hours)
        .bind(&location.parking)
        .bind(&location.map_url)
        .bind(serde_json::to_string(&location.services)?)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(location)
    }

    async fn delete(&self, id: i64) -> Result<Location, StoreError> {
        let location = LocationStore::get(self, id).await?;
        sqlx::query("DELETE FROM locations WHERE id=?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(location)
    }
}

#[async_trait]
impl FomoStore for SqliteStore {
    async fn all(&self) -> Result<Vec<FomoNotification>, StoreError> {
        let rows: Vec<FomoRow> = sqlx::query_as("SELECT * FROM fomo_notifications ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(FomoRow::into_notification).collect())
    }

    async fn active(&self) -> Result<Vec<FomoNotification>, StoreError> {
        let rows: Vec<FomoRow> =
            sqlx::query_as("SELECT * FROM fomo_notifications WHERE is_active=1 ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(FomoRow::into_notification).collect())
    }

    async fn get(&self, id: i64) -> Result<FomoNotification, StoreError> {
        let row: Option<FomoRow> = sqlx::query_as("SELECT * FROM fomo_notifications WHERE id=?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.ok_or(StoreError::NotFound("Notification"))?.into_notification())
    }

    async fn create(&self, draft: FomoDraft) -> Result<FomoNotification, StoreError> {
        let id = self.next_id("fomo_notifications").await?;
        let notification = draft.into_notification(id);
        self.insert_fomo(&notification).await?;
        Ok(notification)
    }

    async fn update(&self, id: i64, patch: FomoPatch) -> Result<FomoNotification, StoreError> {
        let mut notification = FomoStore::get(self, id).await?;
        patch.apply(&mut notification);
        sqlx::query(
            "UPDATE fomo_notifications SET location=?,message=?,time_ago=?,is_active=? WHERE id=?",
        )
        .bind(&notification.location)
        .bind(&notification.message)
        .bind(&notification.time_ago)
        .bind(notification.is_active)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(notification)
    }

    async fn delete(&self, id: i64) -> Result<FomoNotification, StoreError> {
        let notification = FomoStore::get(self, id).await?;
        sqlx::query("DELETE FROM fomo_notifications WHERE id=?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn connects_migrates_and_seeds() {
        let store = store().await;
        assert_eq!(LocationStore::all(&store).await.unwrap().len(), 3);
        assert!(!EnquiryStore::all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn enquiry_round_trips_through_sqlite() {
        let store = store().await;
        let fields = EnquiryFields {
            name: "Jane Tan".to_owned(),
            email: "jane@x.com".to_owned(),
            phone: "+60123456789".to_owned(),
            company: "Acme".to_owned(),
            location: "KL".to_owned(),
            experience: "5 years".to_owned(),
            ..EnquiryFields::default()
        };

        let created = EnquiryStore::create(&store, EnquiryKind::Distributor, fields)
            .await
            .unwrap();
        let fetched = EnquiryStore::get(&store, created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.company.as_deref(), Some("Acme"));
        assert_eq!(fetched.message, None);
    }

    #[tokio::test]
    async fn ids_continue_above_the_seeded_max() {
        let store = store().await;
        let max = EnquiryStore::all(&store)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .max()
            .unwrap();

        let created = EnquiryStore::create(
            &store,
            EnquiryKind::General,
            EnquiryFields {
                name: "A".to_owned(),
                email: "a@b.co".to_owned(),
                phone: "1".to_owned(),
                ..EnquiryFields::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(created.id, max + 1);
    }

    #[tokio::test]
    async fn patch_persists_and_missing_ids_are_not_found() {
        let store = store().await;

        let patch = FomoPatch {
            is_active: Some(false),
            ..FomoPatch::default()
        };
        let updated = FomoStore::update(&store, 1, patch).await.unwrap();
        assert!(!updated.is_active);
        assert!(
            FomoStore::active(&store)
                .await
                .unwrap()
                .iter()
                .all(|n| n.id != 1)
        );

        assert!(matches!(
            FomoStore::get(&store, 9999).await,
            Err(StoreError::NotFound("Notification"))
        ));
    }

    #[tokio::test]
    async fn location_services_survive_the_json_column() {
        let store = store().await;
        let location = LocationStore::get(&store, 1).await.unwrap();
        assert!(location.services.contains(&"Scalp analysis".to_owned()));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = store().await;
        let deleted = LocationStore::delete(&store, 2).await.unwrap();
        assert_eq!(deleted.id, 2);
        assert!(matches!(
            LocationStore::get(&store, 2).await,
            Err(StoreError::NotFound("Location"))
        ));
    }
}
