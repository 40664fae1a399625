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

mod support;

use profile_router::{
    DeliveryMode, DispatchReport, OutboundMessage, RouteKind, RouteOutcome, RouterOptions,
};
use support::{groups, make_router, profile_topology_topic, profiles, TOPOLOGY_TOPIC};

const TOPOLOGY: &[u8] = br#"{"automations":[{"id":"auto1"}]}"#;

#[tokio::test]
async fn topology_goes_to_authorized_profiles_and_revokes_the_rest() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles("acme", profiles(&["acme_group_eu", "acme_group_us"]))
        .await;
    directory
        .replace_server_groups("acme", "srv1", groups(&["eu"]))
        .await;

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    assert_eq!(
        outcome,
        RouteOutcome::Dispatched(DispatchReport {
            attempted: 2,
            failed: 0,
            revoked: 1
        })
    );
    assert_eq!(
        transport.published().await,
        vec![
            OutboundMessage::retained(profile_topology_topic("acme_group_eu"), 0, TOPOLOGY.to_vec()),
            OutboundMessage::revocation(profile_topology_topic("acme_group_us"), 0),
        ]
    );
}

#[tokio::test]
async fn admin_profiles_receive_topology_regardless_of_groups() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles(
            "acme",
            profiles(&["acme_admin", "acme_group_eu", "acme_group_us"]),
        )
        .await;
    directory
        .replace_server_groups("acme", "srv1", groups(&["eu"]))
        .await;
    directory
        .replace_workspace_groups("acme", "srv1", "ws1", groups(&["us"]))
        .await;

    router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    let published = transport.published().await;
    assert_eq!(published.len(), 3);
    assert_eq!(published[0].topic, profile_topology_topic("acme_admin"));
    assert_eq!(published[0].payload, TOPOLOGY);
    assert!(published[1].is_revocation());
    assert!(published[2].is_revocation());
}

#[tokio::test]
async fn narrowing_groups_revokes_previously_delivered_topology() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles("acme", profiles(&["acme_group_eu", "acme_group_us"]))
        .await;

    router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;
    assert!(transport
        .published()
        .await
        .iter()
        .all(|message| message.payload == TOPOLOGY));

    transport.clear_published().await;
    router
        .handle(
            RouteKind::WorkspaceGroupsUpdate,
            "/orgs/acme/automation-servers/srv1/c/ws1/groups",
            br#"["eu"]"#,
        )
        .await;
    router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    let published = transport.published().await;
    assert_eq!(published[0].payload, TOPOLOGY);
    assert_eq!(
        published[1],
        OutboundMessage::revocation(profile_topology_topic("acme_group_us"), 0)
    );
}

#[tokio::test]
async fn no_active_profiles_means_no_publishes() {
    support::init_logging();
    let (router, _directory, transport) = make_router(RouterOptions::default());

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    assert_eq!(outcome, RouteOutcome::NoTargets);
    assert!(transport.published().await.is_empty());
}

#[tokio::test]
async fn nobody_authorized_publishes_no_revocations_either() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles("acme", profiles(&["acme_group_us"]))
        .await;
    directory
        .replace_server_groups("acme", "srv1", groups(&["eu"]))
        .await;

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    assert_eq!(outcome, RouteOutcome::NoTargets);
    assert!(transport.published().await.is_empty());
}

#[tokio::test]
async fn invalid_topology_json_is_dropped() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles("acme", profiles(&["acme_admin"]))
        .await;

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, b"{\"automations\":")
        .await;

    assert_eq!(outcome, RouteOutcome::Rejected);
    assert!(transport.published().await.is_empty());
}

#[tokio::test]
async fn automation_data_is_forwarded_byte_for_byte() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default().with_qos(1));
    directory
        .replace_active_profiles("acme", profiles(&["acme_admin", "acme_group_us"]))
        .await;
    directory
        .replace_server_groups("acme", "srv1", groups(&["eu"]))
        .await;
    let payload = b"\x00\x01not-json".to_vec();

    let outcome = router
        .handle(
            RouteKind::AutomationData,
            "/orgs/acme/automation-servers/srv1/c/ws1/c/auto1/logs/stdout",
            &payload,
        )
        .await;

    assert!(matches!(outcome, RouteOutcome::Dispatched(_)));
    assert_eq!(
        transport.published().await,
        vec![
            OutboundMessage::retained(
                "/orgs/acme/profiles/acme_admin/automation-servers/srv1/c/ws1/c/auto1/logs/stdout",
                1,
                payload,
            ),
            OutboundMessage::revocation(
                "/orgs/acme/profiles/acme_group_us/automation-servers/srv1/c/ws1/c/auto1/logs/stdout",
                1,
            ),
        ]
    );
}

#[tokio::test]
async fn failed_publish_does_not_stop_the_fan_out() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles(
            "acme",
            profiles(&["acme_admin", "acme_group_eu", "acme_group_us"]),
        )
        .await;
    transport
        .fail_publishes_to(&profile_topology_topic("acme_group_eu"))
        .await;

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    assert_eq!(
        outcome,
        RouteOutcome::Dispatched(DispatchReport {
            attempted: 3,
            failed: 1,
            revoked: 0
        })
    );
    let topics: Vec<String> = transport
        .published()
        .await
        .into_iter()
        .map(|message| message.topic)
        .collect();
    assert_eq!(
        topics,
        [
            profile_topology_topic("acme_admin"),
            profile_topology_topic("acme_group_us")
        ]
    );
}

#[tokio::test]
async fn broadcast_mode_ignores_group_restrictions() {
    support::init_logging();
    let (router, directory, transport) =
        make_router(RouterOptions::default().with_delivery(DeliveryMode::Broadcast));
    directory
        .replace_active_profiles(
            "acme",
            profiles(&["acme_admin", "acme_group_eu", "acme_group_us"]),
        )
        .await;
    directory
        .replace_server_groups("acme", "srv1", groups(&["eu"]))
        .await;

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    assert_eq!(
        outcome,
        RouteOutcome::Dispatched(DispatchReport {
            attempted: 3,
            failed: 0,
            revoked: 0
        })
    );
    assert!(transport
        .published()
        .await
        .iter()
        .all(|message| message.retained && message.payload == TOPOLOGY));
}

#[tokio::test]
async fn organizations_do_not_see_each_other() {
    support::init_logging();
    let (router, directory, transport) = make_router(RouterOptions::default());
    directory
        .replace_active_profiles("globex", profiles(&["globex_admin"]))
        .await;

    let outcome = router
        .handle(RouteKind::Topology, TOPOLOGY_TOPIC, TOPOLOGY)
        .await;

    assert_eq!(outcome, RouteOutcome::NoTargets);
    assert!(transport.published().await.is_empty());
}
