use serde::{Deserialize, Serialize};

use crate::store::Record;

/// A synthetic "recent activity" message shown for social proof. `time_ago`
/// is display copy, not a real timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FomoNotification {
    #[serde(rename = "Id")]
    pub id: i64,
    pub location: String,
    pub message: String,
    pub time_ago: String,
    pub is_active: bool,
}

impl Record for FomoNotification {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FomoDraft {
    pub location: String,
    pub message: String,
    pub time_ago: String,
}

impl FomoDraft {
    pub fn into_notification(self, id: i64) -> FomoNotification {
        FomoNotification {
            id,
            location: self.location,
            message: self.message,
            time_ago: self.time_ago,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FomoPatch {
    pub location: Option<String>,
    pub message: Option<String>,
    pub time_ago: Option<String>,
    pub is_active: Option<bool>,
}

impl FomoPatch {
    pub fn apply(self, notification: &mut FomoNotification) {
        if let Some(v) = self.location {
            notification.location = v;
        }
        if let Some(v) = self.message {
            notification.message = v;
        }
        if let Some(v) = self.time_ago {
            notification.time_ago = v;
        }
        if let Some(v) = self.is_active {
            notification.is_active = v;
        }
    }
}
