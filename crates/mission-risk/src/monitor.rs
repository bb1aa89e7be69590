//! Flight progress for active missions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Mission, MissionId};
use crate::risk::MissionRiskAssessment;

const OUTBOUND_UNTIL: f64 = 25.0;
const AT_DESTINATION_UNTIL: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionPhase {
    #[serde(rename = "Pre-launch")]
    PreLaunch,
    #[serde(rename = "Outbound Journey")]
    OutboundJourney,
    #[serde(rename = "At Destination")]
    AtDestination,
    #[serde(rename = "Return Journey")]
    ReturnJourney,
    #[serde(rename = "Completed")]
    Completed,
}

impl MissionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            MissionPhase::PreLaunch => "Pre-launch",
            MissionPhase::OutboundJourney => "Outbound Journey",
            MissionPhase::AtDestination => "At Destination",
            MissionPhase::ReturnJourney => "Return Journey",
            MissionPhase::Completed => "Completed",
        }
    }
}

/// Elapsed share of the flight window, as a percentage, and the phase it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionProgress {
    pub percent: f64,
    pub phase: MissionPhase,
    pub observed_at: DateTime<Utc>,
}

/// Progress sweep output: the refreshed risk alongside the progress it was computed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionProgressReport {
    pub mission_id: MissionId,
    pub progress: MissionProgress,
    pub risk_assessment: MissionRiskAssessment,
}

/// Position of `now` within the departure..return window.
///
/// The first quarter is outbound, the middle half at the destination, and the last quarter
/// the return leg. A window of zero length is complete once departure has passed.
pub fn mission_progress(mission: &Mission, now: DateTime<Utc>) -> MissionProgress {
    let (percent, phase) = if now < mission.departure_time {
        (0.0, MissionPhase::PreLaunch)
    } else if now > mission.return_time {
        (100.0, MissionPhase::Completed)
    } else {
        let total = (mission.return_time - mission.departure_time).num_milliseconds();
        if total <= 0 {
            (100.0, MissionPhase::Completed)
        } else {
            let elapsed = (now - mission.departure_time).num_milliseconds();
            let percent = (elapsed as f64 / total as f64 * 100.0).min(100.0);
            let phase = if percent < OUTBOUND_UNTIL {
                MissionPhase::OutboundJourney
            } else if percent < AT_DESTINATION_UNTIL {
                MissionPhase::AtDestination
            } else {
                MissionPhase::ReturnJourney
            };
            (percent, phase)
        }
    };

    MissionProgress {
        percent,
        phase,
        observed_at: now,
    }
}
