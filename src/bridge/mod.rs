// Bridge manager and lifecycle

mod error;
#[cfg(test)]
mod tests;

pub use error::{BridgeError, LifecycleError};

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::event::{encode_event, StateChangedEvent};
use crate::filter::EntityFilter;
use crate::hub::{EventBus, HubEvent};
use crate::kafka::BrokerConnection;
use crate::routes::RouteTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Unstarted,
    Started,
    Stopped,
}

/// Mediates between the hub event stream and the broker connection.
///
/// Owns the single connection handle, the global filter, the route table,
/// and the hub subscription. One instance per process; once stopped it is
/// never restarted.
pub struct BridgeManager<C: BrokerConnection> {
    connection: C,
    global_filter: EntityFilter,
    routes: RouteTable,
    state: Lifecycle,
    events: Option<broadcast::Receiver<HubEvent>>,
}

impl<C: BrokerConnection> BridgeManager<C> {
    pub fn new(connection: C, global_filter: EntityFilter, routes: RouteTable) -> Self {
        Self {
            connection,
            global_filter,
            routes,
            state: Lifecycle::Unstarted,
            events: None,
        }
    }

    /// Subscribe to the hub and bring up the broker connection.
    ///
    /// The subscription is registered first; the connection start is awaited
    /// before this returns, so no event can reach a publish call on an
    /// unready connection. Valid only once per instance.
    pub async fn start(&mut self, bus: &EventBus) -> Result<(), BridgeError> {
        if self.state != Lifecycle::Unstarted {
            return Err(LifecycleError::AlreadyStarted.into());
        }

        self.events = Some(bus.subscribe());
        self.connection.start().await?;
        self.state = Lifecycle::Started;

        info!(routes = self.routes.len(), "Bridge started");
        Ok(())
    }

    /// Publish one event to every qualifying route, in table order.
    ///
    /// Each send is awaited to broker acknowledgment before the next route
    /// is evaluated. The first failure aborts the remaining routes for this
    /// event and propagates; the next event starts fresh.
    pub async fn write(&mut self, event: &StateChangedEvent) -> Result<(), BridgeError> {
        if self.state != Lifecycle::Started {
            return Err(LifecycleError::NotStarted.into());
        }

        let Self {
            connection,
            global_filter,
            routes,
            ..
        } = self;

        for route in routes.iter() {
            if let Some(payload) = encode_event(event, global_filter, &route.filter)? {
                connection.send(&route.topic, payload).await?;
                debug!(
                    entity_id = %event.entity_id,
                    topic = %route.topic,
                    "Published state change"
                );
            }
        }
        Ok(())
    }

    /// Stop the broker connection and release the hub subscription.
    ///
    /// A second call after a successful shutdown is a no-op; calling before
    /// `start` is a lifecycle error.
    pub async fn shutdown(&mut self) -> Result<(), BridgeError> {
        match self.state {
            Lifecycle::Unstarted => Err(LifecycleError::NotStarted.into()),
            Lifecycle::Stopped => Ok(()),
            Lifecycle::Started => {
                // Transition first so the connection is stopped at most once.
                self.state = Lifecycle::Stopped;
                self.events = None;
                self.connection.stop().await?;
                info!("Bridge stopped");
                Ok(())
            }
        }
    }

    /// Consume the manager and hand back the broker connection handle.
    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Drive the hub subscription until the stop event arrives.
    ///
    /// A failed event is logged and does not stop processing of later
    /// events; the stop event (or a closed bus) triggers `shutdown`.
    pub async fn run(&mut self) -> Result<(), BridgeError> {
        loop {
            let received = match self.events.as_mut() {
                Some(events) => events.recv().await,
                None => return Err(LifecycleError::NotStarted.into()),
            };

            match received {
                Ok(HubEvent::StateChanged(event)) => {
                    if let Err(err) = self.write(&event).await {
                        error!(
                            entity_id = %event.entity_id,
                            %err,
                            "Failed to publish state change"
                        );
                    }
                }
                Ok(HubEvent::Stop) => {
                    info!("Stop event received, shutting down");
                    return self.shutdown().await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "Event listener lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    warn!("Hub event bus closed, shutting down");
                    return self.shutdown().await;
                }
            }
        }
    }
}
