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

//! Egress dispatcher that issues planned publishes on the transport.

use crate::observability::{events, fields};
use crate::routing::fanout_plan::FanOutPlan;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, warn, Level};

const COMPONENT: &str = "egress";

/// Outcome of dispatching one fan-out plan.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub failed: usize,
    pub revoked: usize,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Publishes every message of a plan, one after the other.
///
/// A failed publish is logged with its topic and the remaining publishes still go out.
/// Nothing is retried or rolled back.
#[derive(Clone)]
pub(crate) struct Egress {
    transport: Arc<dyn Transport>,
}

impl Egress {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub(crate) async fn dispatch(&self, route_label: &str, plan: FanOutPlan) -> DispatchReport {
        let mut report = DispatchReport {
            revoked: plan.revocation_count(),
            ..Default::default()
        };

        for message in plan.publishes {
            report.attempted += 1;
            let delivery = fields::format_delivery(&message);
            let topic = message.topic.clone();

            if tracing::enabled!(Level::DEBUG) {
                debug!(
                    event = events::EGRESS_PUBLISH_ATTEMPT,
                    component = COMPONENT,
                    route_label,
                    topic = topic.as_str(),
                    delivery,
                    payload_len = message.payload.len(),
                    "attempting publish"
                );
            }

            match self.transport.publish(message).await {
                Ok(()) => {
                    debug!(
                        event = events::EGRESS_PUBLISH_OK,
                        component = COMPONENT,
                        route_label,
                        topic = topic.as_str(),
                        delivery,
                        "publish succeeded"
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        event = events::EGRESS_PUBLISH_FAILED,
                        component = COMPONENT,
                        route_label,
                        topic = topic.as_str(),
                        delivery,
                        err = %err,
                        "publish failed; continuing with remaining targets"
                    );
                }
            }
        }

        debug!(
            event = events::EGRESS_DISPATCH_SUMMARY,
            component = COMPONENT,
            route_label,
            attempted = report.attempted,
            failed = report.failed,
            revoked = report.revoked,
            "fan-out dispatched"
        );

        report
    }
}
