//! Data-plane layer.
//!
//! Owns the per-route listeners registered on the transport and the egress dispatcher
//! that turns a fan-out plan into concrete publishes.
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use profile_router::{
//!     Directory, MessageHandler, OutboundMessage, ProfileRouter, RouterOptions, Transport,
//!     TransportError,
//! };
//!
//! # struct NullTransport;
//! #
//! # #[async_trait]
//! # impl Transport for NullTransport {
//! #     async fn publish(&self, _message: OutboundMessage) -> Result<(), TransportError> {
//! #         Ok(())
//! #     }
//! #
//! #     async fn subscribe(
//! #         &self,
//! #         _pattern: &str,
//! #         _qos: u8,
//! #         _handler: Arc<dyn MessageHandler>,
//! #     ) -> Result<(), TransportError> {
//! #         Ok(())
//! #     }
//! # }
//! #
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let router = ProfileRouter::new(
//!     Arc::new(Directory::new()),
//!     Arc::new(NullTransport),
//!     RouterOptions::default(),
//! );
//!
//! // Registers one listener per route pattern.
//! router.start().await.unwrap();
//! # });
//! ```

pub(crate) mod egress;
pub(crate) mod route_listener;
