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

use std::hash::{Hash, Hasher};

///
/// [`Profile`] is an edge automation agent registered for an organization.
///
/// The `id` is the identity of the profile. The `name` is the routing token: it is the
/// segment used when building per-profile topics and the value compared against
/// `{org}_group_{group}` when group restrictions apply.
///
/// # Examples
///
/// ```
/// use profile_router::Profile;
///
/// let by_name = Profile::from_name("acme_group_eu");
/// assert_eq!(by_name.id, "acme_group_eu");
///
/// let full = Profile::new("c0ffee", "acme_admin");
/// assert_eq!(full.name, "acme_admin");
/// ```
#[derive(Clone, Debug)]
pub struct Profile {
    pub id: String,
    pub name: String,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Builds a profile whose identity is its name, as sent by name-only control planes.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }
}

impl Eq for Profile {}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Profile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
