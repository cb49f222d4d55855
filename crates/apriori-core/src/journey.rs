use serde::{Deserialize, Serialize};

use crate::FlowId;

/// One persona's pass through a multi-screen flow.
///
/// A journey that did not complete usually names the view it abandoned and
/// why; either may be missing when the simulator could not tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowJourney {
    pub persona_uuid: String,
    #[serde(default)]
    pub flow_id: FlowId,
    #[serde(default)]
    pub total_screens_seen: u32,
    pub completed_flow: bool,
    /// 1-based view number where the persona left the flow.
    #[serde(default)]
    pub dropped_off_at_view: Option<u32>,
    #[serde(default)]
    pub drop_off_reason: Option<String>,
    #[serde(default)]
    pub total_time_seconds: u32,
}
