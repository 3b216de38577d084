use serde::{Deserialize, Serialize};

use crate::store::Record;

/// A clinic. Fixture-seeded; the site only ever reads these, but the full
/// CRUD surface is exposed for the admin tooling to come.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "Id")]
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub hours: String,
    pub parking: String,
    pub map_url: String,
    pub services: Vec<String>,
}

impl Record for Location {
    fn id(&self) -> i64 {
        self.id
    }
}

/// `POST /locations` body: a location minus the server-assigned id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub hours: String,
    pub parking: String,
    pub map_url: String,
    #[serde(default)]
    pub services: Vec<String>,
}

impl LocationDraft {
    pub fn into_location(self, id: i64) -> Location {
        Location {
            id,
            name: self.name,
            address: self.address,
            city: self.city,
            phone: self.phone,
            whatsapp: self.whatsapp,
            email: self.email,
            hours: self.hours,
            parking: self.parking,
            map_url: self.map_url,
            services: self.services,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub hours: Option<String>,
    pub parking: Option<String>,
    pub map_url: Option<String>,
    pub services: Option<Vec<String>>,
}

impl LocationPatch {
    pub fn apply(self, location: &mut Location) {
        if let Some(v) = self.name {
            location.name = v;
        }
        if let Some(v) = self.address {
            location.address = v;
        }
        if let Some(v) = self.city {
            location.city = v;
        }
        if let Some(v) = self.phone {
            location.phone = v;
        }
        if let Some(v) = self.whatsapp {
            location.whatsapp = v;
        }
        if let Some(v) = self.email {
            location.email = v;
        }
        if let Some(v) = self.hours {
            location.hours = v;
        }
        if let Some(v) = self.parking {
            location.parking = v;
        }
        if let Some(v) = self.map_url {
            location.map_url = v;
        }
        if let Some(v) = self.services {
            location.services = v;
        }
    }
}
