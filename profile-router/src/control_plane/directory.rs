//! In-memory directory of active profiles and group memberships, scoped by organization.

use crate::profile::Profile;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;

/// Group names attached to an automation server or a workspace.
///
/// An empty set means "no restriction". A key that was never written reads back as an
/// empty set too, so both cases authorize every profile.
pub type GroupSet = BTreeSet<String>;

#[derive(Default)]
struct OrgEntry {
    active_profiles: Vec<Profile>,
    server_groups: HashMap<String, GroupSet>,
    // keyed by (server, workspace)
    workspace_groups: HashMap<(String, String), GroupSet>,
}

#[derive(Default)]
struct DirectoryState {
    revision: u64,
    orgs: HashMap<String, OrgEntry>,
}

impl DirectoryState {
    fn org_entry_mut(&mut self, org: &str) -> &mut OrgEntry {
        self.revision += 1;
        self.orgs.entry(org.to_string()).or_default()
    }
}

/// Read-only copy of everything routing needs for one `(org, server, workspace)` scope.
///
/// Taken under a single shared lock, so the three parts always belong to the same
/// directory revision.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScopeSnapshot {
    pub revision: u64,
    pub org: String,
    pub active_profiles: Vec<Profile>,
    pub server_groups: GroupSet,
    pub workspace_groups: GroupSet,
}

/// Directory state shared by the control-plane handlers and the routing path.
///
/// Every `replace_*` call takes the lock exclusively and swaps the stored value as a whole,
/// readers never observe a partially applied update. Reads of unknown keys return empty
/// collections.
///
/// ```
/// use profile_router::{Directory, Profile};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let directory = Directory::new();
/// directory
///     .replace_active_profiles("acme", vec![Profile::from_name("acme_admin")])
///     .await;
///
/// assert_eq!(directory.active_profiles("acme").await.len(), 1);
/// assert!(directory.active_profiles("globex").await.is_empty());
/// # });
/// ```
#[derive(Default)]
pub struct Directory {
    state: RwLock<DirectoryState>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the organization's active profiles with `profiles`.
    ///
    /// Duplicate ids keep their first occurrence. Returns the directory revision produced by
    /// the write.
    pub async fn replace_active_profiles(&self, org: &str, profiles: Vec<Profile>) -> u64 {
        let mut seen = HashSet::with_capacity(profiles.len());
        let profiles: Vec<Profile> = profiles
            .into_iter()
            .filter(|profile| seen.insert(profile.id.clone()))
            .collect();

        let mut state = self.state.write().await;
        state.org_entry_mut(org).active_profiles = profiles;
        state.revision
    }

    pub async fn active_profiles(&self, org: &str) -> Vec<Profile> {
        let state = self.state.read().await;
        state
            .orgs
            .get(org)
            .map(|entry| entry.active_profiles.clone())
            .unwrap_or_default()
    }

    pub async fn replace_server_groups<I>(&self, org: &str, server: &str, groups: I) -> u64
    where
        I: IntoIterator<Item = String>,
    {
        let groups: GroupSet = groups.into_iter().collect();

        let mut state = self.state.write().await;
        state
            .org_entry_mut(org)
            .server_groups
            .insert(server.to_string(), groups);
        state.revision
    }

    pub async fn server_groups(&self, org: &str, server: &str) -> GroupSet {
        let state = self.state.read().await;
        state
            .orgs
            .get(org)
            .and_then(|entry| entry.server_groups.get(server))
            .cloned()
            .unwrap_or_default()
    }

    pub async fn replace_workspace_groups<I>(
        &self,
        org: &str,
        server: &str,
        workspace: &str,
        groups: I,
    ) -> u64
    where
        I: IntoIterator<Item = String>,
    {
        let groups: GroupSet = groups.into_iter().collect();

        let mut state = self.state.write().await;
        state
            .org_entry_mut(org)
            .workspace_groups
            .insert((server.to_string(), workspace.to_string()), groups);
        state.revision
    }

    pub async fn workspace_groups(&self, org: &str, server: &str, workspace: &str) -> GroupSet {
        let state = self.state.read().await;
        state
            .orgs
            .get(org)
            .and_then(|entry| {
                entry
                    .workspace_groups
                    .get(&(server.to_string(), workspace.to_string()))
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Copies the profiles and both group sets for one scope under a single read lock.
    pub async fn scope_snapshot(&self, org: &str, server: &str, workspace: &str) -> ScopeSnapshot {
        let state = self.state.read().await;
        let mut snapshot = ScopeSnapshot {
            revision: state.revision,
            org: org.to_string(),
            ..Default::default()
        };

        if let Some(entry) = state.orgs.get(org) {
            snapshot.active_profiles = entry.active_profiles.clone();
            snapshot.server_groups = entry.server_groups.get(server).cloned().unwrap_or_default();
            snapshot.workspace_groups = entry
                .workspace_groups
                .get(&(server.to_string(), workspace.to_string()))
                .cloned()
                .unwrap_or_default();
        }

        snapshot
    }

    /// Current directory revision, bumped by every replace.
    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }
}
