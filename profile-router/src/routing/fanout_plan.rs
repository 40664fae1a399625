//! Fan-out planning: which per-profile topics receive the payload and which get revoked.
//!
//! Planning is pure. It reads a directory snapshot that was already copied out of the
//! lock, so the publishes themselves never run while the directory is held.

use crate::observability::fields;
use crate::profile::Profile;
use crate::transport::OutboundMessage;
use std::collections::HashSet;

/// Publishes produced for one inbound message, in active-profile order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct FanOutPlan {
    pub(crate) publishes: Vec<OutboundMessage>,
    /// Set when the plan is empty, naming why nobody is addressed.
    pub(crate) empty_reason: Option<&'static str>,
}

impl FanOutPlan {
    fn empty(reason: &'static str) -> Self {
        Self {
            publishes: Vec::new(),
            empty_reason: Some(reason),
        }
    }

    /// Sends the payload to every active profile, no group filtering.
    pub(crate) fn broadcast<F>(active: &[Profile], payload: &[u8], qos: u8, destination: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        if active.is_empty() {
            return Self::empty(fields::REASON_NO_ACTIVE_PROFILES);
        }

        Self {
            publishes: active
                .iter()
                .map(|profile| {
                    OutboundMessage::retained(destination(&profile.name), qos, payload.to_vec())
                })
                .collect(),
            empty_reason: None,
        }
    }

    /// Sends the payload to authorized profiles and an empty retained message to every
    /// other active profile, clearing what the transport retained for them.
    ///
    /// When nobody is authorized nothing is published at all.
    pub(crate) fn filtered<F>(
        active: &[Profile],
        authorized: &[Profile],
        payload: &[u8],
        qos: u8,
        destination: F,
    ) -> Self
    where
        F: Fn(&str) -> String,
    {
        if active.is_empty() {
            return Self::empty(fields::REASON_NO_ACTIVE_PROFILES);
        }
        if authorized.is_empty() {
            return Self::empty(fields::REASON_NO_AUTHORIZED_PROFILES);
        }

        let authorized: HashSet<&str> = authorized.iter().map(|p| p.id.as_str()).collect();
        let publishes = active
            .iter()
            .map(|profile| {
                let topic = destination(&profile.name);
                if authorized.contains(profile.id.as_str()) {
                    OutboundMessage::retained(topic, qos, payload.to_vec())
                } else {
                    OutboundMessage::revocation(topic, qos)
                }
            })
            .collect();

        Self {
            publishes,
            empty_reason: None,
        }
    }

    /// A point-to-point relay of a single message.
    pub(crate) fn relay(message: OutboundMessage) -> Self {
        Self {
            publishes: vec![message],
            empty_reason: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.publishes.is_empty()
    }

    pub(crate) fn revocation_count(&self) -> usize {
        self.publishes
            .iter()
            .filter(|message| message.is_revocation())
            .count()
    }
}
