//! Routing layer.
//!
//! Maps transport topics onto routes, decides which profiles are authorized for a scope,
//! and plans the per-profile publishes (forward or revoke) for one inbound message.
//!
//! ```
//! use profile_router::{AccessFilter, Directory, Profile};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let directory = Directory::new();
//! directory
//!     .replace_active_profiles(
//!         "acme",
//!         vec![
//!             Profile::from_name("acme_admin"),
//!             Profile::from_name("acme_group_eu"),
//!             Profile::from_name("acme_group_us"),
//!         ],
//!     )
//!     .await;
//! directory
//!     .replace_server_groups("acme", "srv1", vec!["eu".to_string()])
//!     .await;
//!
//! let snapshot = directory.scope_snapshot("acme", "srv1", "ws1").await;
//! let authorized = AccessFilter::default().authorized_profiles(&snapshot);
//! let names: Vec<&str> = authorized.iter().map(|p| p.name.as_str()).collect();
//! assert_eq!(names, ["acme_admin", "acme_group_eu"]);
//! # });
//! ```

pub(crate) mod access_filter;
pub(crate) mod fanout_plan;
pub(crate) mod topic;
