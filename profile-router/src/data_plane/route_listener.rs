//! Route listener adapter that hands subscribed messages to the router.

use crate::observability::events;
use crate::router::ProfileRouter;
use crate::routing::topic::RouteKind;
use crate::transport::MessageHandler;
use async_trait::async_trait;
use tracing::{debug, Level};

const COMPONENT: &str = "route_listener";

/// Handler registered for one route pattern.
///
/// The kind it was bound to travels with every message so the router can drop topics
/// delivered through an overlapping wildcard pattern.
#[derive(Clone)]
pub(crate) struct RouteListener {
    kind: RouteKind,
    router: ProfileRouter,
}

impl RouteListener {
    pub(crate) fn new(kind: RouteKind, router: ProfileRouter) -> Self {
        Self { kind, router }
    }
}

#[async_trait]
impl MessageHandler for RouteListener {
    async fn on_message(&self, topic: &str, payload: &[u8]) {
        if tracing::enabled!(Level::DEBUG) {
            debug!(
                event = events::ROUTE_RECEIVE,
                component = COMPONENT,
                route_label = self.kind.as_str(),
                topic,
                payload_len = payload.len(),
                "received message"
            );
        }

        self.router.handle(self.kind, topic, payload).await;
    }
}
