//! Canonical structured event names used across `profile-router`.

// Route parsing and dispatch events.
pub const ROUTE_RECEIVE: &str = "route_receive";
pub const ROUTE_PARSE_FAILED: &str = "route_parse_failed";
pub const ROUTE_ECHO_IGNORED: &str = "route_echo_ignored";
pub const ROUTE_KIND_MISMATCH: &str = "route_kind_mismatch";
pub const ROUTE_PAYLOAD_INVALID: &str = "route_payload_invalid";
pub const ROUTE_SUBSCRIBE_OK: &str = "route_subscribe_ok";
pub const ROUTE_SUBSCRIBE_FAILED: &str = "route_subscribe_failed";

// Control-plane directory events.
pub const DIRECTORY_PROFILES_REPLACED: &str = "directory_profiles_replaced";
pub const DIRECTORY_SERVER_GROUPS_REPLACED: &str = "directory_server_groups_replaced";
pub const DIRECTORY_WORKSPACE_GROUPS_REPLACED: &str = "directory_workspace_groups_replaced";

// Filtering and fan-out events.
pub const ACCESS_FILTER_APPLIED: &str = "access_filter_applied";
pub const FANOUT_NO_TARGETS: &str = "fanout_no_targets";
pub const FANOUT_PLANNED: &str = "fanout_planned";
pub const RELAY_UNAUTHORIZED: &str = "relay_unauthorized";

// Egress events.
pub const EGRESS_PUBLISH_ATTEMPT: &str = "egress_publish_attempt";
pub const EGRESS_PUBLISH_OK: &str = "egress_publish_ok";
pub const EGRESS_PUBLISH_FAILED: &str = "egress_publish_failed";
pub const EGRESS_DISPATCH_SUMMARY: &str = "egress_dispatch_summary";
