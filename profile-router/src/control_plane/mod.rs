//! Control-plane layer.
//!
//! Owns the directory of active profiles and group memberships, and the decoding of the
//! control messages that replace them. Every update is a full snapshot from the control
//! plane: nothing here merges with previous state.
//!
//! ```
//! use profile_router::Directory;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let directory = Directory::new();
//! directory
//!     .replace_server_groups("acme", "srv1", vec!["eu".to_string()])
//!     .await;
//! directory
//!     .replace_server_groups("acme", "srv1", Vec::new())
//!     .await;
//!
//! // The second update replaced the first one, the server is unrestricted again.
//! assert!(directory.server_groups("acme", "srv1").await.is_empty());
//! # });
//! ```

pub(crate) mod directory;
pub(crate) mod updates;
