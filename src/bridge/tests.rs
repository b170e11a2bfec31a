use super::*;
use crate::event::{StateChangedEvent, StateRecord};
use crate::filter::FilterConfig;
use crate::kafka::PublishError;
use crate::routes::Route;
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

#[derive(Default)]
struct RecordingConnection {
    started: usize,
    stopped: usize,
    sends: Vec<(String, Vec<u8>)>,
    fail_topic: Option<String>,
}

impl BrokerConnection for RecordingConnection {
    async fn start(&mut self) -> Result<(), PublishError> {
        self.started += 1;
        Ok(())
    }

    async fn send(&mut self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        if self.fail_topic.as_deref() == Some(topic) {
            return Err(PublishError::broker(topic, "ack timeout"));
        }
        self.sends.push((topic.to_string(), payload));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), PublishError> {
        self.stopped += 1;
        Ok(())
    }
}

fn updated(entity_id: &str, state: &str) -> StateChangedEvent {
    let ts = Utc.with_ymd_and_hms(2024, 2, 11, 13, 0, 0).unwrap();
    StateChangedEvent::updated(StateRecord {
        entity_id: entity_id.to_string(),
        state: state.to_string(),
        attributes: BTreeMap::new(),
        last_changed: ts,
        last_updated: ts,
    })
}

fn route(topic: &str, filter: FilterConfig) -> Route {
    Route {
        topic: topic.to_string(),
        filter: EntityFilter::from_config(&filter).unwrap(),
    }
}

fn manager(routes: Vec<Route>) -> BridgeManager<RecordingConnection> {
    BridgeManager::new(
        RecordingConnection::default(),
        EntityFilter::empty(),
        RouteTable::new(routes),
    )
}

fn sent_topics(manager: &BridgeManager<RecordingConnection>) -> Vec<&str> {
    manager
        .connection
        .sends
        .iter()
        .map(|(topic, _)| topic.as_str())
        .collect()
}

#[tokio::test]
async fn test_write_sends_to_qualifying_routes_in_order() {
    let mut bridge = manager(vec![
        route("t1", FilterConfig::default()),
        route(
            "t2",
            FilterConfig {
                exclude_entities: vec!["light.x".to_string()],
                ..FilterConfig::default()
            },
        ),
        route("t3", FilterConfig::default()),
    ]);

    let bus = EventBus::new(16);
    bridge.start(&bus).await.unwrap();
    bridge.write(&updated("light.x", "on")).await.unwrap();

    assert_eq!(sent_topics(&bridge), vec!["t1", "t3"]);

    let payload: serde_json::Value =
        serde_json::from_slice(&bridge.connection.sends[0].1).unwrap();
    assert_eq!(payload["entity_id"], "light.x");
    assert_eq!(payload["state"], "on");
}

#[tokio::test]
async fn test_unavailable_state_sends_nothing() {
    let mut bridge = manager(vec![
        route("t1", FilterConfig::default()),
        route("t2", FilterConfig::default()),
    ]);

    let bus = EventBus::new(16);
    bridge.start(&bus).await.unwrap();
    bridge.write(&updated("light.x", "unavailable")).await.unwrap();

    assert!(bridge.connection.sends.is_empty());
}

#[tokio::test]
async fn test_failed_publish_aborts_remaining_routes() {
    let mut bridge = manager(vec![
        route("t1", FilterConfig::default()),
        route("t2", FilterConfig::default()),
        route("t3", FilterConfig::default()),
    ]);
    bridge.connection.fail_topic = Some("t2".to_string());

    let bus = EventBus::new(16);
    bridge.start(&bus).await.unwrap();

    let result = bridge.write(&updated("light.x", "on")).await;
    assert!(matches!(result, Err(BridgeError::Publish(_))));
    assert_eq!(sent_topics(&bridge), vec!["t1"]);
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let mut bridge = manager(vec![route("t1", FilterConfig::default())]);
    let bus = EventBus::new(16);

    bridge.start(&bus).await.unwrap();
    let result = bridge.start(&bus).await;

    assert!(matches!(
        result,
        Err(BridgeError::Lifecycle(LifecycleError::AlreadyStarted))
    ));
    assert_eq!(bridge.connection.started, 1);
}

#[tokio::test]
async fn test_write_before_start_is_rejected() {
    let mut bridge = manager(vec![route("t1", FilterConfig::default())]);

    let result = bridge.write(&updated("light.x", "on")).await;
    assert!(matches!(
        result,
        Err(BridgeError::Lifecycle(LifecycleError::NotStarted))
    ));
}

#[tokio::test]
async fn test_shutdown_stops_connection_exactly_once() {
    let mut bridge = manager(vec![route("t1", FilterConfig::default())]);
    let bus = EventBus::new(16);

    bridge.start(&bus).await.unwrap();
    bridge.shutdown().await.unwrap();
    bridge.shutdown().await.unwrap();

    assert_eq!(bridge.connection.stopped, 1);
}

#[tokio::test]
async fn test_shutdown_before_start_is_rejected() {
    let mut bridge = manager(vec![route("t1", FilterConfig::default())]);

    let result = bridge.shutdown().await;
    assert!(matches!(
        result,
        Err(BridgeError::Lifecycle(LifecycleError::NotStarted))
    ));
    assert_eq!(bridge.connection.stopped, 0);
}

#[tokio::test]
async fn test_run_processes_events_until_stop() {
    let mut bridge = manager(vec![route("t1", FilterConfig::default())]);
    let bus = EventBus::new(16);

    bridge.start(&bus).await.unwrap();
    bus.state_changed(updated("light.a", "on"));
    bus.state_changed(updated("light.b", "off"));
    bus.stop();

    bridge.run().await.unwrap();

    assert_eq!(sent_topics(&bridge), vec!["t1", "t1"]);
    assert_eq!(bridge.connection.stopped, 1);
}

#[tokio::test]
async fn test_failed_event_does_not_stop_later_events() {
    let mut bridge = manager(vec![
        route(
            "t_bad",
            FilterConfig {
                include_entities: vec!["light.a".to_string()],
                ..FilterConfig::default()
            },
        ),
        route("t_good", FilterConfig::default()),
    ]);
    bridge.connection.fail_topic = Some("t_bad".to_string());

    let bus = EventBus::new(16);
    bridge.start(&bus).await.unwrap();

    // First event hits the failing topic and aborts its remaining routes;
    // the second event only qualifies for the healthy topic.
    bus.state_changed(updated("light.a", "on"));
    bus.state_changed(updated("light.b", "off"));
    bus.stop();

    bridge.run().await.unwrap();

    assert_eq!(sent_topics(&bridge), vec!["t_good"]);
}
