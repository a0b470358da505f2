//! The availability record scraped from a single class's signup widget.

use serde::{Deserialize, Serialize};

/// Availability of one scheduled class, as advertised by the provider's signup widget.
///
/// Serialized with the provider's own attribute names so callers of the proxy see
/// the same shape the legacy endpoint produced:
///
/// ```
/// use gxp_spots::SpotRecord;
///
/// let record = SpotRecord::new("10 SPOTS LEFT", "11938371");
/// let json = serde_json::to_string(&record).unwrap();
/// assert_eq!(json, r#"{"textmsg":"10 SPOTS LEFT","productid":"11938371"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotRecord {
    /// Human readable availability, e.g. "10 SPOTS LEFT" or "WAITLIST".
    #[serde(rename = "textmsg")]
    pub availability_text: String,
    /// Provider-assigned identifier of the class instance.
    #[serde(rename = "productid")]
    pub class_instance_id: String,
}

impl SpotRecord {
    pub fn new(availability_text: impl Into<String>, class_instance_id: impl Into<String>) -> Self {
        Self {
            availability_text: availability_text.into(),
            class_instance_id: class_instance_id.into(),
        }
    }
}
