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

//! Publish/subscribe collaborator contract.
//!
//! Connection handling, reconnects, QoS delivery and retained-message storage belong to
//! the implementation behind [`Transport`]. The router only publishes and registers
//! handlers for its route patterns.

use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// One outbound publish issued by the router.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutboundMessage {
    pub topic: String,
    pub qos: u8,
    pub retained: bool,
    pub payload: Vec<u8>,
}

impl OutboundMessage {
    /// Builds a retained publish.
    pub fn retained(topic: impl Into<String>, qos: u8, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            qos,
            retained: true,
            payload,
        }
    }

    /// Builds the empty retained publish that clears whatever a topic retained before.
    pub fn revocation(topic: impl Into<String>, qos: u8) -> Self {
        Self::retained(topic, qos, Vec::new())
    }

    pub fn is_revocation(&self) -> bool {
        self.retained && self.payload.is_empty()
    }
}

/// Receives messages for a subscribed pattern.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_message(&self, topic: &str, payload: &[u8]);
}

/// Publish/subscribe transport with MQTT-style `+` / `#` wildcard patterns.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn publish(&self, message: OutboundMessage) -> Result<(), TransportError>;

    async fn subscribe(
        &self,
        pattern: &str,
        qos: u8,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<(), TransportError>;
}
