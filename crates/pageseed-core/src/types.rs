use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Kind of simulated page interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    Click,
    Scroll,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::PageView, EventType::Click, EventType::Scroll];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::Click => "click",
            EventType::Scroll => "scroll",
        }
    }
}

/// Payload stored as JSON text in the `meta` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub x: u32,
    pub y: u32,
}

/// One row of the `page_events` table.
///
/// Field order matches the column list of the insert statement, and the serde
/// names match the column names so a value serializes straight into a
/// `JSONEachRow` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_type: EventType,
    pub url: String,
    pub referrer: String,
    #[serde(rename = "ts", serialize_with = "serialize_epoch_seconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "meta")]
    pub metadata: String,
}

impl PageEvent {
    /// Parse the `meta` text back into its structured form
    pub fn parse_metadata(&self) -> serde_json::Result<Metadata> {
        serde_json::from_str(&self.metadata)
    }
}

fn serialize_epoch_seconds<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(ts.timestamp())
}
