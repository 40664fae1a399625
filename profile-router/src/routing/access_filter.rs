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

//! Group-membership filter deciding which active profiles may receive a scope's messages.

use crate::control_plane::directory::{GroupSet, ScopeSnapshot};
use crate::observability::{events, fields};
use crate::profile::Profile;
use std::sync::Arc;
use tracing::debug;

/// Suffix marking operator profiles that bypass group restrictions.
pub const DEFAULT_ADMIN_SUFFIX: &str = "_admin";

const GROUP_INFIX: &str = "_group_";
const COMPONENT: &str = "access_filter";

/// Decides which profiles skip group matching entirely.
pub trait AccessPolicy: Send + Sync {
    fn is_privileged(&self, profile_name: &str) -> bool;
}

/// Grants the bypass to every profile whose name ends with a fixed suffix.
#[derive(Clone, Debug)]
pub struct AdminSuffixPolicy {
    suffix: String,
}

impl AdminSuffixPolicy {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Default for AdminSuffixPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_SUFFIX)
    }
}

impl AccessPolicy for AdminSuffixPolicy {
    fn is_privileged(&self, profile_name: &str) -> bool {
        !self.suffix.is_empty() && profile_name.ends_with(&self.suffix)
    }
}

/// The profile name a group grants access to: `{org}_group_{group}`.
pub fn group_profile_name(org: &str, group: &str) -> String {
    format!("{org}{GROUP_INFIX}{group}")
}

/// Filter engine over a [`ScopeSnapshot`].
///
/// A profile is authorized when it satisfies the server-level and the workspace-level
/// group constraints independently. Each constraint holds when its group set is empty,
/// when the policy marks the profile as privileged, or when the profile name is exactly
/// `{org}_group_{g}` for some `g` in the set.
#[derive(Clone)]
pub struct AccessFilter {
    policy: Arc<dyn AccessPolicy>,
}

impl AccessFilter {
    pub fn new(policy: Arc<dyn AccessPolicy>) -> Self {
        Self { policy }
    }

    fn satisfies_groups(&self, org: &str, profile: &Profile, groups: &GroupSet) -> bool {
        if groups.is_empty() || self.policy.is_privileged(&profile.name) {
            return true;
        }

        // exact `{org}_group_{g}` match, never a prefix or substring one
        groups
            .iter()
            .any(|group| profile.name == group_profile_name(org, group))
    }

    /// Returns `true` when `profile` may receive messages for the snapshot's scope.
    pub fn is_authorized(&self, snapshot: &ScopeSnapshot, profile: &Profile) -> bool {
        self.satisfies_groups(&snapshot.org, profile, &snapshot.server_groups)
            && self.satisfies_groups(&snapshot.org, profile, &snapshot.workspace_groups)
    }

    /// Computes the authorized subset of the snapshot's active profiles.
    pub fn authorized_profiles(&self, snapshot: &ScopeSnapshot) -> Vec<Profile> {
        let authorized: Vec<Profile> = snapshot
            .active_profiles
            .iter()
            .filter(|profile| self.is_authorized(snapshot, profile))
            .cloned()
            .collect();

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                event = events::ACCESS_FILTER_APPLIED,
                component = COMPONENT,
                org = snapshot.org.as_str(),
                directory_revision = snapshot.revision,
                server_groups = fields::format_groups(&snapshot.server_groups).as_str(),
                workspace_groups = fields::format_groups(&snapshot.workspace_groups).as_str(),
                authorized = fields::format_profiles(&authorized).as_str(),
                active_count = snapshot.active_profiles.len(),
                "filtered profiles for scope"
            );
        }

        authorized
    }
}

impl Default for AccessFilter {
    fn default() -> Self {
        Self::new(Arc::new(AdminSuffixPolicy::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::{group_profile_name, AccessFilter, AccessPolicy, AdminSuffixPolicy};
    use crate::control_plane::directory::{GroupSet, ScopeSnapshot};
    use crate::Profile;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn snapshot(
        profiles: &[&str],
        server_groups: &[&str],
        workspace_groups: &[&str],
    ) -> ScopeSnapshot {
        let to_set =
            |values: &[&str]| -> GroupSet { values.iter().map(|v| v.to_string()).collect() };
        ScopeSnapshot {
            revision: 1,
            org: "acme".to_string(),
            active_profiles: profiles.iter().map(|name| Profile::from_name(*name)).collect(),
            server_groups: to_set(server_groups),
            workspace_groups: to_set(workspace_groups),
        }
    }

    fn authorized_names(filter: &AccessFilter, snapshot: &ScopeSnapshot) -> HashSet<String> {
        filter
            .authorized_profiles(snapshot)
            .into_iter()
            .map(|profile| profile.name)
            .collect()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    const ACME: [&str; 3] = ["acme_admin", "acme_group_eu", "acme_group_us"];

    #[test]
    fn unrestricted_scope_authorizes_everyone() {
        let filter = AccessFilter::default();
        let snapshot = snapshot(&ACME, &[], &[]);

        assert_eq!(authorized_names(&filter, &snapshot), set(&ACME));
    }

    #[test]
    fn server_groups_restrict_and_admin_bypasses() {
        let filter = AccessFilter::default();
        let snapshot = snapshot(&ACME, &["eu"], &[]);

        assert_eq!(
            authorized_names(&filter, &snapshot),
            set(&["acme_admin", "acme_group_eu"])
        );
    }

    #[test]
    fn workspace_groups_restrict_and_admin_bypasses() {
        let filter = AccessFilter::default();
        let snapshot = snapshot(&ACME, &[], &["us"]);

        assert_eq!(
            authorized_names(&filter, &snapshot),
            set(&["acme_admin", "acme_group_us"])
        );
    }

    #[test]
    fn both_levels_must_match() {
        let filter = AccessFilter::default();

        let disjoint = snapshot(&ACME, &["eu"], &["us"]);
        assert_eq!(authorized_names(&filter, &disjoint), set(&["acme_admin"]));

        let overlapping = snapshot(&ACME, &["eu", "us"], &["us"]);
        assert_eq!(
            authorized_names(&filter, &overlapping),
            set(&["acme_admin", "acme_group_us"])
        );
    }

    #[test]
    fn group_match_is_exact() {
        let filter = AccessFilter::default();
        let snapshot = snapshot(
            &["acme_group_eu2", "acme_group_e", "globex_group_eu", "xacme_group_eu", "acme_eu"],
            &["eu"],
            &[],
        );

        assert!(authorized_names(&filter, &snapshot).is_empty());
        assert_eq!(group_profile_name("acme", "eu"), "acme_group_eu");
    }

    #[test]
    fn admin_profiles_pass_even_when_unlisted() {
        let filter = AccessFilter::default();
        let snapshot = snapshot(&["acme_admin", "ops_admin"], &["eu"], &["us"]);

        assert_eq!(
            authorized_names(&filter, &snapshot),
            set(&["acme_admin", "ops_admin"])
        );
    }

    #[test]
    fn result_does_not_depend_on_profile_order() {
        let filter = AccessFilter::default();
        let forward = snapshot(&ACME, &["eu"], &[]);
        let mut reversed = forward.clone();
        reversed.active_profiles.reverse();

        assert_eq!(
            authorized_names(&filter, &forward),
            authorized_names(&filter, &reversed)
        );
    }

    struct OperatorPolicy;

    impl AccessPolicy for OperatorPolicy {
        fn is_privileged(&self, profile_name: &str) -> bool {
            profile_name.starts_with("ops-")
        }
    }

    #[test]
    fn privileged_rule_is_injected() {
        let filter = AccessFilter::new(Arc::new(OperatorPolicy));
        let snapshot = snapshot(&["ops-alice", "acme_admin", "acme_group_eu"], &["eu"], &[]);

        assert_eq!(
            authorized_names(&filter, &snapshot),
            set(&["ops-alice", "acme_group_eu"])
        );

        let custom_suffix = AccessFilter::new(Arc::new(AdminSuffixPolicy::new("_root")));
        assert_eq!(
            authorized_names(&custom_suffix, &snapshot),
            set(&["acme_group_eu"])
        );
    }

    #[test]
    fn empty_suffix_grants_nothing() {
        assert!(!AdminSuffixPolicy::new("").is_privileged("acme_group_eu"));
        assert!(AdminSuffixPolicy::default().is_privileged("acme_admin"));
    }
}
