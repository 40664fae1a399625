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

use crate::control_plane::directory::{Directory, GroupSet};
use crate::control_plane::updates;
use crate::data_plane::egress::{DispatchReport, Egress};
use crate::data_plane::route_listener::RouteListener;
use crate::error::{PayloadError, RouterError, TopicError, TransportError};
use crate::observability::{events, fields};
use crate::profile::Profile;
use crate::routing::access_filter::{AccessFilter, AccessPolicy, AdminSuffixPolicy};
use crate::routing::fanout_plan::FanOutPlan;
use crate::routing::topic::{Route, RouteKind, WorkspaceScope};
use crate::transport::{MessageHandler, OutboundMessage, Transport};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const COMPONENT: &str = "router";

/// How topology and automation data reach the active profiles of an organization.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Authorized profiles get the payload, every other active profile gets a revocation.
    #[default]
    Filtered,
    /// Every active profile gets the payload, group sets are not consulted.
    Broadcast,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Filtered => "filtered",
            DeliveryMode::Broadcast => "broadcast",
        }
    }
}

#[derive(Clone)]
pub struct RouterOptions {
    pub delivery: DeliveryMode,
    /// QoS used for every publish the router issues.
    pub qos: u8,
    pub policy: Arc<dyn AccessPolicy>,
}

impl RouterOptions {
    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_qos(mut self, qos: u8) -> Self {
        self.qos = qos;
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::default(),
            qos: 0,
            policy: Arc::new(AdminSuffixPolicy::default()),
        }
    }
}

/// What happened to one inbound message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteOutcome {
    /// Echoed router output, or a topic that belongs to another route's listener.
    Ignored,
    /// Malformed topic or payload. Nothing was published and the directory is unchanged.
    Rejected,
    DirectoryUpdated { revision: u64 },
    /// No active or no authorized profile for the scope.
    NoTargets,
    /// Subscribe request from a profile that is not authorized for the scope.
    Unauthorized,
    Dispatched(DispatchReport),
}

/// Multi-tenant router between the control plane and the edge profiles.
///
/// The router owns no state besides the [`Directory`] it was built with. Every inbound
/// message is handled against a snapshot taken under one shared lock and the resulting
/// publishes are issued after the lock is released.
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use profile_router::{
///     Directory, MessageHandler, OutboundMessage, Profile, ProfileRouter, RouteKind,
///     RouteOutcome, RouterOptions, Transport, TransportError,
/// };
///
/// # struct NullTransport;
/// #
/// # #[async_trait]
/// # impl Transport for NullTransport {
/// #     async fn publish(&self, _message: OutboundMessage) -> Result<(), TransportError> {
/// #         Ok(())
/// #     }
/// #
/// #     async fn subscribe(
/// #         &self,
/// #         _pattern: &str,
/// #         _qos: u8,
/// #         _handler: Arc<dyn MessageHandler>,
/// #     ) -> Result<(), TransportError> {
/// #         Ok(())
/// #     }
/// # }
/// #
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let directory = Arc::new(Directory::new());
/// let router = ProfileRouter::new(
///     directory.clone(),
///     Arc::new(NullTransport),
///     RouterOptions::default(),
/// );
///
/// let outcome = router
///     .handle(
///         RouteKind::ServerGroupsUpdate,
///         "/orgs/acme/automation-servers/srv1/groups",
///         br#"["eu"]"#,
///     )
///     .await;
/// assert!(matches!(outcome, RouteOutcome::DirectoryUpdated { .. }));
///
/// directory
///     .replace_active_profiles(
///         "acme",
///         vec![Profile::from_name("acme_admin"), Profile::from_name("acme_group_us")],
///     )
///     .await;
/// let authorized = router.authorized_profiles("acme", "srv1", "ws1").await;
/// assert_eq!(authorized, vec![Profile::from_name("acme_admin")]);
/// # });
/// ```
#[derive(Clone)]
pub struct ProfileRouter {
    directory: Arc<Directory>,
    transport: Arc<dyn Transport>,
    egress: Egress,
    filter: AccessFilter,
    delivery: DeliveryMode,
    qos: u8,
}

impl ProfileRouter {
    pub fn new(
        directory: Arc<Directory>,
        transport: Arc<dyn Transport>,
        options: RouterOptions,
    ) -> Self {
        Self {
            directory,
            egress: Egress::new(transport.clone()),
            transport,
            filter: AccessFilter::new(options.policy),
            delivery: options.delivery,
            qos: options.qos,
        }
    }

    /// Subscribes the six route patterns, each bound to a listener for its route kind.
    ///
    /// Every pattern is attempted; the first failure is returned once all of them were tried.
    pub async fn start(&self) -> Result<(), RouterError> {
        let mut first_error: Option<TransportError> = None;

        for kind in RouteKind::ALL {
            let pattern = kind.subscription_pattern();
            let listener: Arc<dyn MessageHandler> =
                Arc::new(RouteListener::new(kind, self.clone()));

            match self.transport.subscribe(&pattern, self.qos, listener).await {
                Ok(()) => {
                    info!(
                        event = events::ROUTE_SUBSCRIBE_OK,
                        component = COMPONENT,
                        route_label = kind.as_str(),
                        pattern = pattern.as_str(),
                        qos = self.qos,
                        "subscribed route pattern"
                    );
                }
                Err(err) => {
                    error!(
                        event = events::ROUTE_SUBSCRIBE_FAILED,
                        component = COMPONENT,
                        route_label = kind.as_str(),
                        pattern = pattern.as_str(),
                        err = %err,
                        "unable to subscribe route pattern"
                    );
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Profiles of `org` allowed to receive messages for the given server and workspace.
    pub async fn authorized_profiles(
        &self,
        org: &str,
        server: &str,
        workspace: &str,
    ) -> Vec<Profile> {
        let snapshot = self.directory.scope_snapshot(org, server, workspace).await;
        self.filter.authorized_profiles(&snapshot)
    }

    /// Handles one inbound message delivered for the route pattern of `kind`.
    ///
    /// Failures are logged and absorbed; the outcome only reports what happened.
    pub async fn handle(&self, kind: RouteKind, topic: &str, payload: &[u8]) -> RouteOutcome {
        let route = match Route::parse(topic) {
            Ok(route) => route,
            Err(TopicError::OutboundEcho(_)) => {
                debug!(
                    event = events::ROUTE_ECHO_IGNORED,
                    component = COMPONENT,
                    route_label = kind.as_str(),
                    topic,
                    "ignoring router delivery seen through a wildcard subscription"
                );
                return RouteOutcome::Ignored;
            }
            Err(err) => {
                warn!(
                    event = events::ROUTE_PARSE_FAILED,
                    component = COMPONENT,
                    route_label = kind.as_str(),
                    topic,
                    err = %err,
                    "dropping message with malformed topic"
                );
                return RouteOutcome::Rejected;
            }
        };

        if route.kind() != kind {
            debug!(
                event = events::ROUTE_KIND_MISMATCH,
                component = COMPONENT,
                route_label = kind.as_str(),
                parsed_route = route.kind().as_str(),
                topic,
                "topic belongs to another route listener"
            );
            return RouteOutcome::Ignored;
        }

        match route {
            Route::ProfilesUpdate { org } => self.update_profiles(&org, topic, payload).await,
            Route::ServerGroupsUpdate { org, server } => {
                self.update_server_groups(&org, &server, topic, payload)
                    .await
            }
            Route::WorkspaceGroupsUpdate(scope) => {
                self.update_workspace_groups(&scope, topic, payload).await
            }
            Route::Topology(scope) => {
                if let Err(err) = updates::validate_json(payload) {
                    return self.reject_payload(kind, topic, &err);
                }
                self.fan_out(kind, &scope, payload, |profile| {
                    scope.profile_topology_topic(profile)
                })
                .await
            }
            Route::AutomationData {
                scope,
                automation,
                rest,
            } => {
                self.fan_out(kind, &scope, payload, |profile| {
                    scope.profile_automation_topic(profile, &automation, &rest)
                })
                .await
            }
            Route::AutomationProfileRequest {
                scope,
                profile,
                automation,
                rest,
            } => {
                self.relay_request(&scope, &profile, &automation, &rest, payload)
                    .await
            }
        }
    }

    async fn update_profiles(&self, org: &str, topic: &str, payload: &[u8]) -> RouteOutcome {
        let profiles = match updates::decode_profiles(payload) {
            Ok(profiles) => profiles,
            Err(err) => return self.reject_payload(RouteKind::ProfilesUpdate, topic, &err),
        };

        let formatted = fields::format_profiles(&profiles);
        let revision = self.directory.replace_active_profiles(org, profiles).await;
        info!(
            event = events::DIRECTORY_PROFILES_REPLACED,
            component = COMPONENT,
            org,
            profiles = formatted.as_str(),
            directory_revision = revision,
            "replaced active profiles"
        );
        RouteOutcome::DirectoryUpdated { revision }
    }

    async fn update_server_groups(
        &self,
        org: &str,
        server: &str,
        topic: &str,
        payload: &[u8],
    ) -> RouteOutcome {
        let groups: GroupSet = match updates::decode_groups(payload) {
            Ok(groups) => groups.into_iter().collect(),
            Err(err) => return self.reject_payload(RouteKind::ServerGroupsUpdate, topic, &err),
        };

        let formatted = fields::format_groups(&groups);
        let revision = self
            .directory
            .replace_server_groups(org, server, groups)
            .await;
        info!(
            event = events::DIRECTORY_SERVER_GROUPS_REPLACED,
            component = COMPONENT,
            org,
            server,
            groups = formatted.as_str(),
            directory_revision = revision,
            "replaced automation server groups"
        );
        RouteOutcome::DirectoryUpdated { revision }
    }

    async fn update_workspace_groups(
        &self,
        scope: &WorkspaceScope,
        topic: &str,
        payload: &[u8],
    ) -> RouteOutcome {
        let groups: GroupSet = match updates::decode_groups(payload) {
            Ok(groups) => groups.into_iter().collect(),
            Err(err) => {
                return self.reject_payload(RouteKind::WorkspaceGroupsUpdate, topic, &err)
            }
        };

        let formatted = fields::format_groups(&groups);
        let revision = self
            .directory
            .replace_workspace_groups(&scope.org, &scope.server, &scope.workspace, groups)
            .await;
        info!(
            event = events::DIRECTORY_WORKSPACE_GROUPS_REPLACED,
            component = COMPONENT,
            org = scope.org.as_str(),
            server = scope.server.as_str(),
            workspace = scope.workspace.as_str(),
            groups = formatted.as_str(),
            directory_revision = revision,
            "replaced workspace groups"
        );
        RouteOutcome::DirectoryUpdated { revision }
    }

    fn reject_payload(&self, kind: RouteKind, topic: &str, err: &PayloadError) -> RouteOutcome {
        error!(
            event = events::ROUTE_PAYLOAD_INVALID,
            component = COMPONENT,
            route_label = kind.as_str(),
            topic,
            err = %err,
            "dropping message with invalid payload"
        );
        RouteOutcome::Rejected
    }

    async fn fan_out<F>(
        &self,
        kind: RouteKind,
        scope: &WorkspaceScope,
        payload: &[u8],
        destination: F,
    ) -> RouteOutcome
    where
        F: Fn(&str) -> String,
    {
        let snapshot = self
            .directory
            .scope_snapshot(&scope.org, &scope.server, &scope.workspace)
            .await;

        let plan = match self.delivery {
            DeliveryMode::Broadcast => {
                FanOutPlan::broadcast(&snapshot.active_profiles, payload, self.qos, destination)
            }
            DeliveryMode::Filtered => {
                let authorized = self.filter.authorized_profiles(&snapshot);
                FanOutPlan::filtered(
                    &snapshot.active_profiles,
                    &authorized,
                    payload,
                    self.qos,
                    destination,
                )
            }
        };

        if plan.is_empty() {
            info!(
                event = events::FANOUT_NO_TARGETS,
                component = COMPONENT,
                route_label = kind.as_str(),
                org = scope.org.as_str(),
                server = scope.server.as_str(),
                workspace = scope.workspace.as_str(),
                reason = plan.empty_reason.unwrap_or(fields::NONE),
                directory_revision = snapshot.revision,
                "no profiles to deliver to"
            );
            return RouteOutcome::NoTargets;
        }

        debug!(
            event = events::FANOUT_PLANNED,
            component = COMPONENT,
            route_label = kind.as_str(),
            org = scope.org.as_str(),
            server = scope.server.as_str(),
            workspace = scope.workspace.as_str(),
            delivery_mode = self.delivery.as_str(),
            targets = plan.publishes.len(),
            revocations = plan.revocation_count(),
            directory_revision = snapshot.revision,
            "planned fan-out"
        );

        RouteOutcome::Dispatched(self.egress.dispatch(kind.as_str(), plan).await)
    }

    /// Forwards a profile's subscribe request to the automation server's own topic,
    /// provided the profile is authorized for the scope.
    async fn relay_request(
        &self,
        scope: &WorkspaceScope,
        profile: &str,
        automation: &str,
        rest: &str,
        payload: &[u8],
    ) -> RouteOutcome {
        let authorized = self
            .authorized_profiles(&scope.org, &scope.server, &scope.workspace)
            .await;

        if !authorized.iter().any(|candidate| candidate.name == profile) {
            info!(
                event = events::RELAY_UNAUTHORIZED,
                component = COMPONENT,
                route_label = RouteKind::AutomationProfileRequest.as_str(),
                org = scope.org.as_str(),
                server = scope.server.as_str(),
                workspace = scope.workspace.as_str(),
                profile,
                automation,
                authorized = fields::format_profiles(&authorized).as_str(),
                "dropping subscribe request from unauthorized profile"
            );
            return RouteOutcome::Unauthorized;
        }

        let message = OutboundMessage::retained(
            scope.automation_topic(automation, rest),
            self.qos,
            payload.to_vec(),
        );
        let report = self
            .egress
            .dispatch(
                RouteKind::AutomationProfileRequest.as_str(),
                FanOutPlan::relay(message),
            )
            .await;
        RouteOutcome::Dispatched(report)
    }
}
