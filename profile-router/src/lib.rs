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

//! # profile-router
//!
//! `profile-router` sits between a control plane and the edge profiles of many
//! organizations on a shared publish/subscribe transport. It keeps a [`Directory`] of the
//! active profiles and group restrictions of every organization, and re-publishes topology
//! and automation data onto per-profile topics for the profiles allowed to see them.
//!
//! Internal modules are organized by layer:
//!
//! - `control_plane`: the directory and the decoding of its update messages.
//! - `routing`: the topic grammar, the group filter and fan-out planning.
//! - `data_plane`: route listeners and egress dispatch on the [`Transport`].
//!
//! ## Filtered fan-out
//!
//! Authorized profiles receive the payload. Every other active profile receives an empty
//! retained message on the same topic, clearing what the transport retained for it.
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio::sync::Mutex;
//! use profile_router::{
//!     Directory, MessageHandler, OutboundMessage, Profile, ProfileRouter, RouteKind,
//!     RouterOptions, Transport, TransportError,
//! };
//!
//! #[derive(Default)]
//! struct Recorder(Mutex<Vec<OutboundMessage>>);
//!
//! #[async_trait]
//! impl Transport for Recorder {
//!     async fn publish(&self, message: OutboundMessage) -> Result<(), TransportError> {
//!         self.0.lock().await.push(message);
//!         Ok(())
//!     }
//!
//!     async fn subscribe(
//!         &self,
//!         _pattern: &str,
//!         _qos: u8,
//!         _handler: Arc<dyn MessageHandler>,
//!     ) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let directory = Arc::new(Directory::new());
//! directory
//!     .replace_active_profiles(
//!         "acme",
//!         vec![Profile::from_name("acme_group_eu"), Profile::from_name("acme_group_us")],
//!     )
//!     .await;
//! directory
//!     .replace_server_groups("acme", "srv1", vec!["eu".to_string()])
//!     .await;
//!
//! let transport = Arc::new(Recorder::default());
//! let router = ProfileRouter::new(directory, transport.clone(), RouterOptions::default());
//! router
//!     .handle(
//!         RouteKind::Topology,
//!         "/orgs/acme/automation-servers/srv1/c/ws1/topology",
//!         br#"{"automations":[]}"#,
//!     )
//!     .await;
//!
//! let published = transport.0.lock().await;
//! assert_eq!(published.len(), 2);
//! assert_eq!(
//!     published[0].topic,
//!     "/orgs/acme/profiles/acme_group_eu/automation-servers/srv1/c/ws1/topology"
//! );
//! assert!(published[1].is_revocation());
//! # });
//! ```

mod control_plane;
mod data_plane;
mod error;
mod profile;
mod router;
mod routing;
mod transport;

#[doc(hidden)]
pub mod observability;

pub use control_plane::directory::{Directory, GroupSet, ScopeSnapshot};
pub use data_plane::egress::DispatchReport;
pub use error::{PayloadError, RouterError, TopicError, TransportError};
pub use profile::Profile;
pub use router::{DeliveryMode, ProfileRouter, RouteOutcome, RouterOptions};
pub use routing::access_filter::{
    group_profile_name, AccessFilter, AccessPolicy, AdminSuffixPolicy, DEFAULT_ADMIN_SUFFIX,
};
pub use routing::topic::{matches_filter, Route, RouteKind, WorkspaceScope};
pub use transport::{MessageHandler, OutboundMessage, Transport};
