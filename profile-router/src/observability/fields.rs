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

//! Canonical structured field values and value-format helpers.

use crate::profile::Profile;
use crate::transport::OutboundMessage;
use std::collections::BTreeSet;

pub const NONE: &str = "none";

pub const DELIVERY_FORWARD: &str = "forward";
pub const DELIVERY_REVOKE: &str = "revoke";

pub const REASON_NO_ACTIVE_PROFILES: &str = "no_active_profiles";
pub const REASON_NO_AUTHORIZED_PROFILES: &str = "no_authorized_profiles";

/// Comma-joined profile names, or `none` for an empty list.
pub fn format_profiles(profiles: &[Profile]) -> String {
    join_or_none(profiles.iter().map(|profile| profile.name.as_str()))
}

pub fn format_groups(groups: &BTreeSet<String>) -> String {
    join_or_none(groups.iter().map(String::as_str))
}

pub fn format_delivery(message: &OutboundMessage) -> &'static str {
    if message.is_revocation() {
        DELIVERY_REVOKE
    } else {
        DELIVERY_FORWARD
    }
}

fn join_or_none<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let joined = values.collect::<Vec<_>>().join(",");
    if joined.is_empty() {
        NONE.to_string()
    } else {
        joined
    }
}
