/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! [`Transport`] implementation on top of the paho MQTT async client.

use crate::config::BrokerSettings;
use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use paho_mqtt as mqtt;
use profile_router::{matches_filter, MessageHandler, OutboundMessage, Transport, TransportError};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

const COMPONENT: &str = "mqtt_transport";

/// Inbound messages as delivered by the client, `None` marking a lost connection.
pub(crate) type MessageStream = mqtt::AsyncReceiver<Option<mqtt::Message>>;

struct Subscription {
    pattern: String,
    qos: u8,
    handler: Arc<dyn MessageHandler>,
}

pub(crate) struct MqttTransport {
    client: mqtt::AsyncClient,
    subscriptions: RwLock<Vec<Subscription>>,
    reconnect_poll: Duration,
}

/// Runs `attempt` until it succeeds, sleeping `interval` after every failure.
async fn retry_until_ok<T, E, F, Fut>(what: &str, interval: Duration, mut attempt: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempts: u32 = 1;
    loop {
        match attempt().await {
            Ok(value) => return value,
            Err(err) => {
                warn!(
                    component = COMPONENT,
                    attempts,
                    retry_in_ms = interval.as_millis() as u64,
                    err = %err,
                    "{what} failed; retrying"
                );
                tokio::time::sleep(interval).await;
                attempts += 1;
            }
        }
    }
}

impl MqttTransport {
    /// Creates the client and its inbound stream without touching the network.
    pub(crate) fn new(settings: &BrokerSettings) -> anyhow::Result<(Self, MessageStream)> {
        let client_id = format!("{}-{}", settings.client_id_prefix, uuid::Uuid::new_v4());

        let create_options = mqtt::CreateOptionsBuilder::new()
            .server_uri(&settings.url)
            .client_id(&client_id)
            .persistence(mqtt::PersistenceType::None)
            .finalize();
        let mut client = mqtt::AsyncClient::new(create_options)
            .with_context(|| format!("unable to create MQTT client for {}", settings.url))?;
        // unbounded: a bounded paho stream drops messages once full, and the retained
        // replay after every (re)connect outgrows any fixed buffer
        let stream = client.get_stream(None::<usize>);

        debug!(
            component = COMPONENT,
            broker = settings.url.as_str(),
            client_id = client_id.as_str(),
            "created MQTT client"
        );

        Ok((
            Self {
                client,
                subscriptions: RwLock::new(Vec::new()),
                reconnect_poll: settings.reconnect_min,
            },
            stream,
        ))
    }

    /// Connects with a persistent session and automatic reconnect, retrying the first
    /// connect every `reconnect_min` until the broker accepts it.
    pub(crate) async fn connect(&self, settings: &BrokerSettings) {
        let connect_options = || {
            mqtt::ConnectOptionsBuilder::new()
                .keep_alive_interval(settings.keep_alive)
                .clean_session(false)
                .user_name(&settings.username)
                .password(settings.token.clone())
                .automatic_reconnect(settings.reconnect_min, settings.reconnect_max)
                .finalize()
        };

        retry_until_ok("connect to broker", settings.reconnect_min, || {
            self.client.connect(connect_options())
        })
        .await;

        info!(
            component = COMPONENT,
            broker = settings.url.as_str(),
            username = settings.username.as_str(),
            "connected to broker"
        );
    }

    /// Hands every inbound message to the handlers whose pattern matches its topic, one
    /// message at a time in arrival order. Returns when the client stream closes.
    pub(crate) async fn dispatch(&self, mut stream: MessageStream) {
        while let Some(next) = stream.next().await {
            match next {
                Some(message) => self.deliver(message.topic(), message.payload()).await,
                None => {
                    warn!(component = COMPONENT, "connection lost; waiting for reconnect");
                    self.await_reconnect().await;
                    self.resubscribe().await;
                }
            }
        }
        debug!(component = COMPONENT, "message stream closed");
    }

    async fn deliver(&self, topic: &str, payload: &[u8]) {
        let handlers: Vec<Arc<dyn MessageHandler>> = self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|subscription| matches_filter(&subscription.pattern, topic))
            .map(|subscription| subscription.handler.clone())
            .collect();

        if handlers.is_empty() {
            debug!(component = COMPONENT, topic, "no handler for topic");
        }
        for handler in handlers {
            handler.on_message(topic, payload).await;
        }
    }

    async fn await_reconnect(&self) {
        while !self.client.is_connected() {
            tokio::time::sleep(self.reconnect_poll).await;
        }
        info!(component = COMPONENT, "reconnected to broker");
    }

    async fn resubscribe(&self) {
        let patterns: Vec<(String, u8)> = self
            .subscriptions
            .read()
            .await
            .iter()
            .map(|subscription| (subscription.pattern.clone(), subscription.qos))
            .collect();

        for (pattern, qos) in patterns {
            if let Err(err) = self.client.subscribe(&pattern, i32::from(qos)).await {
                error!(
                    component = COMPONENT,
                    pattern = pattern.as_str(),
                    err = %err,
                    "unable to re-subscribe after reconnect"
                );
            }
        }
    }

    pub(crate) async fn disconnect(&self) {
        if let Err(err) = self.client.disconnect(None).await {
            warn!(component = COMPONENT, err = %err, "disconnect from broker failed");
        }
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn publish(&self, message: OutboundMessage) -> Result<(), TransportError> {
        let mqtt_message = mqtt::MessageBuilder::new()
            .topic(message.topic.as_str())
            .payload(message.payload)
            .qos(i32::from(message.qos))
            .retained(message.retained)
            .finalize();

        self.client
            .publish(mqtt_message)
            .await
            .map_err(|err| TransportError::Publish {
                topic: message.topic,
                reason: err.to_string(),
            })
    }

    async fn subscribe(
        &self,
        pattern: &str,
        qos: u8,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(), TransportError> {
        // handler must be in place before the broker replays retained messages
        self.subscriptions.write().await.push(Subscription {
            pattern: pattern.to_string(),
            qos,
            handler: handler.clone(),
        });

        if let Err(err) = self.client.subscribe(pattern, i32::from(qos)).await {
            self.subscriptions.write().await.retain(|subscription| {
                !(subscription.pattern == pattern && Arc::ptr_eq(&subscription.handler, &handler))
            });
            return Err(TransportError::Subscribe {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            });
        }
        Ok(())
    }
}
