#![allow(dead_code)]

use async_trait::async_trait;
use profile_router::{
    matches_filter, Directory, MessageHandler, OutboundMessage, Profile, ProfileRouter,
    RouterOptions, Transport, TransportError,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory transport recording every publish and subscription.
///
/// `deliver` feeds an inbound message to every handler whose pattern matches the topic,
/// in subscription order, the way a broker would.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    published: Mutex<Vec<OutboundMessage>>,
    subscriptions: Mutex<Vec<(String, u8, Arc<dyn MessageHandler>)>>,
    failing_topics: Mutex<HashSet<String>>,
    failing_patterns: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn fail_publishes_to(&self, topic: &str) {
        self.failing_topics.lock().await.insert(topic.to_string());
    }

    pub(crate) async fn fail_subscriptions_to(&self, pattern: &str) {
        self.failing_patterns.lock().await.insert(pattern.to_string());
    }

    pub(crate) async fn published(&self) -> Vec<OutboundMessage> {
        self.published.lock().await.clone()
    }

    pub(crate) async fn clear_published(&self) {
        self.published.lock().await.clear();
    }

    pub(crate) async fn subscribed_patterns(&self) -> Vec<(String, u8)> {
        self.subscriptions
            .lock()
            .await
            .iter()
            .map(|(pattern, qos, _)| (pattern.clone(), *qos))
            .collect()
    }

    pub(crate) async fn deliver(&self, topic: &str, payload: &[u8]) {
        let handlers: Vec<Arc<dyn MessageHandler>> = self
            .subscriptions
            .lock()
            .await
            .iter()
            .filter(|(pattern, _, _)| matches_filter(pattern, topic))
            .map(|(_, _, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler.on_message(topic, payload).await;
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn publish(&self, message: OutboundMessage) -> Result<(), TransportError> {
        if self.failing_topics.lock().await.contains(&message.topic) {
            return Err(TransportError::Publish {
                topic: message.topic,
                reason: "injected failure".to_string(),
            });
        }
        self.published.lock().await.push(message);
        Ok(())
    }

    async fn subscribe(
        &self,
        pattern: &str,
        qos: u8,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(), TransportError> {
        if self.failing_patterns.lock().await.contains(pattern) {
            return Err(TransportError::Subscribe {
                pattern: pattern.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.subscriptions
            .lock()
            .await
            .push((pattern.to_string(), qos, handler));
        Ok(())
    }
}

pub(crate) fn profiles(names: &[&str]) -> Vec<Profile> {
    names.iter().map(|name| Profile::from_name(*name)).collect()
}

pub(crate) fn groups(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(crate) fn make_router(
    options: RouterOptions,
) -> (ProfileRouter, Arc<Directory>, Arc<RecordingTransport>) {
    let directory = Arc::new(Directory::new());
    let transport = RecordingTransport::new();
    let router = ProfileRouter::new(directory.clone(), transport.clone(), options);
    (router, directory, transport)
}

pub(crate) const TOPOLOGY_TOPIC: &str = "/orgs/acme/automation-servers/srv1/c/ws1/topology";

pub(crate) fn profile_topology_topic(profile: &str) -> String {
    format!("/orgs/acme/profiles/{profile}/automation-servers/srv1/c/ws1/topology")
}
