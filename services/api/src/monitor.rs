use crate::infra::InMemoryMissionControl;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Sweep active missions once per `period` until the task is aborted.
pub(crate) fn spawn_mission_monitor(
    service: Arc<InMemoryMissionControl>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match service.monitor_active_missions(Utc::now()) {
                Ok(reports) => debug!(missions = reports.len(), "monitoring sweep finished"),
                Err(error) => warn!(%error, "monitoring sweep failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{in_memory_service, BroadcastEventPublisher};
    use mission_risk::domain::{MissionDraft, MissionStatus, MissionUpdate};
    use mission_risk::repository::DomainEvent;
    use mission_risk::service::ServiceSettings;

    #[tokio::test]
    async fn active_missions_are_swept_on_each_tick() {
        let events = BroadcastEventPublisher::default();
        let mut receiver = events.subscribe();
        let service = Arc::new(in_memory_service(events, ServiceSettings::default()));

        let mission = service
            .create_mission(MissionDraft {
                name: "Gateway resupply".to_string(),
                description: String::new(),
                destination_id: "moon".to_string(),
                vehicle_id: "sls".to_string(),
                crew_count: 2,
                departure_time: Utc::now() - chrono::Duration::hours(1),
            })
            .expect("mission created");
        service
            .update_mission(
                &mission.id,
                MissionUpdate {
                    status: Some(MissionStatus::Active),
                    ..MissionUpdate::default()
                },
            )
            .expect("activated");

        let monitor = spawn_mission_monitor(service.clone(), Duration::from_millis(10));
        let report = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Ok(DomainEvent::MissionProgress(report)) = receiver.recv().await {
                    return report;
                }
            }
        })
        .await
        .expect("sweep published progress");
        monitor.abort();

        assert_eq!(report.mission_id, mission.id);
        assert!(report.progress.percent > 0.0);
        let stored = service.mission(&mission.id).expect("mission stored");
        assert!(stored.progress.is_some());
    }
}
