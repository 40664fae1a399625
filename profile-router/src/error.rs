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

//! Error types surfaced by parsing, payload decoding and the transport seam.

use thiserror::Error;

/// Failures while mapping a transport topic onto a route.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TopicError {
    /// The topic does not follow any route of the grammar, or has an empty segment.
    #[error("malformed topic `{0}`")]
    Malformed(String),
    /// The topic is one of the router's own outputs seen again through a wildcard
    /// subscription (a per-profile delivery or a relayed subscribe request).
    #[error("topic `{0}` is a router delivery, not an inbound route")]
    OutboundEcho(String),
}

/// Failures while decoding a control-plane payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON of the expected shape: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid profile entry `{0}`: names and ids must be non-empty topic segments")]
    InvalidProfile(String),
    #[error("invalid group name `{0}`")]
    InvalidGroup(String),
}

/// Failures reported by a [`Transport`](crate::Transport) implementation.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TransportError {
    #[error("publish to `{topic}` failed: {reason}")]
    Publish { topic: String, reason: String },
    #[error("subscribe to `{pattern}` failed: {reason}")]
    Subscribe { pattern: String, reason: String },
}

/// Failures returned by router setup.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}
