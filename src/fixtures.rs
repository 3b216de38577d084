//! Seed data bundled into the binary. These fixtures stand in for the
//! records a real backend would already hold; the memory store starts from
//! them and the sqlite adapter inserts them into an empty database.

use crate::{
    enquiries::model::Enquiry,
    fomo::model::FomoNotification,
    locations::model::Location,
};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn seed_enquiries() -> anyhow::Result<Vec<Enquiry>> {
    Ok(serde_json::from_str(include_res!(str, "/seed/enquiry.json"))?)
}

pub fn seed_locations() -> anyhow::Result<Vec<Location>> {
    Ok(serde_json::from_str(include_res!(str, "/seed/location.json"))?)
}

pub fn seed_fomo() -> anyhow::Result<Vec<FomoNotification>> {
    Ok(serde_json::from_str(include_res!(str, "/seed/fomo.json"))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seeds_parse() {
        assert!(!seed_enquiries().unwrap().is_empty());
        assert!(!seed_locations().unwrap().is_empty());
        assert!(!seed_fomo().unwrap().is_empty());
    }

    #[test]
    fn seed_ids_are_unique_per_collection() {
        let fomo = seed_fomo().unwrap();
        let mut ids: Vec<i64> = fomo.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), fomo.len());
    }
}
