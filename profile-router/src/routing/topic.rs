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

//! Topic grammar: inbound route parsing, subscription patterns and destination topics.
//!
//! All six routes are described by one table of segment rules. Parsing walks the table,
//! and the subscription pattern of each route is derived from the same rules, so the
//! two can not drift apart.

use crate::error::TopicError;
use std::fmt::{Display, Formatter};

const SUBSCRIBE_SEGMENT: &str = "subscribe";

/// The six inbound routes understood by the router.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RouteKind {
    ProfilesUpdate,
    Topology,
    AutomationProfileRequest,
    AutomationData,
    ServerGroupsUpdate,
    WorkspaceGroupsUpdate,
}

impl RouteKind {
    pub const ALL: [RouteKind; 6] = [
        RouteKind::ProfilesUpdate,
        RouteKind::Topology,
        RouteKind::AutomationProfileRequest,
        RouteKind::AutomationData,
        RouteKind::ServerGroupsUpdate,
        RouteKind::WorkspaceGroupsUpdate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::ProfilesUpdate => "profiles_update",
            RouteKind::Topology => "topology",
            RouteKind::AutomationProfileRequest => "automation_profile_request",
            RouteKind::AutomationData => "automation_data",
            RouteKind::ServerGroupsUpdate => "server_groups_update",
            RouteKind::WorkspaceGroupsUpdate => "workspace_groups_update",
        }
    }

    /// Wildcard pattern to subscribe to for this route.
    ///
    /// ```
    /// use profile_router::RouteKind;
    ///
    /// assert_eq!(
    ///     RouteKind::Topology.subscription_pattern(),
    ///     "/orgs/+/automation-servers/+/c/+/topology"
    /// );
    /// assert_eq!(
    ///     RouteKind::AutomationData.subscription_pattern(),
    ///     "/orgs/+/automation-servers/+/c/+/c/+/#"
    /// );
    /// ```
    pub fn subscription_pattern(&self) -> String {
        let rule = grammar_rule(*self);
        let levels: Vec<&str> = rule
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(literal) => *literal,
                Segment::Capture(_) => "+",
                Segment::Rest => "#",
            })
            .collect();
        format!("/{}", levels.join("/"))
    }
}

impl Display for RouteKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy)]
enum Field {
    Org,
    Server,
    Workspace,
    Profile,
    Automation,
}

#[derive(Clone, Copy)]
enum Segment {
    Literal(&'static str),
    Capture(Field),
    /// Greedy tail over one or more remaining segments.
    Rest,
}

#[derive(Clone, Copy, PartialEq)]
enum RestRule {
    None,
    EndsWithSubscribe,
    NotSubscribe,
}

struct GrammarRule {
    kind: RouteKind,
    segments: &'static [Segment],
    rest: RestRule,
}

use Field::*;
use Segment::{Capture, Literal, Rest};

// rows follow RouteKind declaration order
static GRAMMAR: [GrammarRule; 6] = [
    GrammarRule {
        kind: RouteKind::ProfilesUpdate,
        segments: &[Literal("orgs"), Capture(Org), Literal("profiles")],
        rest: RestRule::None,
    },
    GrammarRule {
        kind: RouteKind::Topology,
        segments: &[
            Literal("orgs"),
            Capture(Org),
            Literal("automation-servers"),
            Capture(Server),
            Literal("c"),
            Capture(Workspace),
            Literal("topology"),
        ],
        rest: RestRule::None,
    },
    GrammarRule {
        kind: RouteKind::AutomationProfileRequest,
        segments: &[
            Literal("orgs"),
            Capture(Org),
            Literal("profiles"),
            Capture(Profile),
            Literal("automation-servers"),
            Capture(Server),
            Literal("c"),
            Capture(Workspace),
            Literal("c"),
            Capture(Automation),
            Rest,
        ],
        rest: RestRule::EndsWithSubscribe,
    },
    GrammarRule {
        kind: RouteKind::AutomationData,
        segments: &[
            Literal("orgs"),
            Capture(Org),
            Literal("automation-servers"),
            Capture(Server),
            Literal("c"),
            Capture(Workspace),
            Literal("c"),
            Capture(Automation),
            Rest,
        ],
        rest: RestRule::NotSubscribe,
    },
    GrammarRule {
        kind: RouteKind::ServerGroupsUpdate,
        segments: &[
            Literal("orgs"),
            Capture(Org),
            Literal("automation-servers"),
            Capture(Server),
            Literal("groups"),
        ],
        rest: RestRule::None,
    },
    GrammarRule {
        kind: RouteKind::WorkspaceGroupsUpdate,
        segments: &[
            Literal("orgs"),
            Capture(Org),
            Literal("automation-servers"),
            Capture(Server),
            Literal("c"),
            Capture(Workspace),
            Literal("groups"),
        ],
        rest: RestRule::None,
    },
];

fn grammar_rule(kind: RouteKind) -> &'static GrammarRule {
    &GRAMMAR[kind as usize]
}

#[derive(Default)]
struct Captures<'t> {
    org: &'t str,
    server: &'t str,
    workspace: &'t str,
    profile: &'t str,
    automation: &'t str,
    rest: String,
}

enum RuleMatch<'t> {
    Matched(Captures<'t>),
    RestRejected,
    NoMatch,
}

impl GrammarRule {
    fn match_levels<'t>(&self, levels: &[&'t str]) -> RuleMatch<'t> {
        let mut captures = Captures::default();

        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Literal(literal) => {
                    if levels.get(position) != Some(literal) {
                        return RuleMatch::NoMatch;
                    }
                }
                Capture(field) => {
                    let Some(&value) = levels.get(position) else {
                        return RuleMatch::NoMatch;
                    };
                    match field {
                        Org => captures.org = value,
                        Server => captures.server = value,
                        Workspace => captures.workspace = value,
                        Profile => captures.profile = value,
                        Automation => captures.automation = value,
                    }
                }
                Rest => {
                    let tail = &levels[position.min(levels.len())..];
                    if tail.is_empty() {
                        return RuleMatch::NoMatch;
                    }
                    let ends_with_subscribe = tail.last() == Some(&SUBSCRIBE_SEGMENT);
                    let accepted = match self.rest {
                        RestRule::None => true,
                        RestRule::EndsWithSubscribe => ends_with_subscribe,
                        RestRule::NotSubscribe => !ends_with_subscribe,
                    };
                    if !accepted {
                        return RuleMatch::RestRejected;
                    }
                    captures.rest = tail.join("/");
                    return RuleMatch::Matched(captures);
                }
            }
        }

        if levels.len() == self.segments.len() {
            RuleMatch::Matched(captures)
        } else {
            RuleMatch::NoMatch
        }
    }
}

/// The `(org, automation server, workspace)` scope a message is published for.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct WorkspaceScope {
    pub org: String,
    pub server: String,
    pub workspace: String,
}

impl WorkspaceScope {
    pub fn new(org: &str, server: &str, workspace: &str) -> Self {
        Self {
            org: org.to_string(),
            server: server.to_string(),
            workspace: workspace.to_string(),
        }
    }

    /// `/orgs/{org}/profiles/{profile}/automation-servers/{server}/c/{workspace}/topology`
    pub fn profile_topology_topic(&self, profile: &str) -> String {
        format!(
            "/orgs/{}/profiles/{}/automation-servers/{}/c/{}/topology",
            self.org, profile, self.server, self.workspace
        )
    }

    /// `/orgs/{org}/profiles/{profile}/automation-servers/{server}/c/{workspace}/c/{automation}/{rest}`
    pub fn profile_automation_topic(&self, profile: &str, automation: &str, rest: &str) -> String {
        format!(
            "/orgs/{}/profiles/{}/automation-servers/{}/c/{}/c/{}/{}",
            self.org, profile, self.server, self.workspace, automation, rest
        )
    }

    /// `/orgs/{org}/automation-servers/{server}/c/{workspace}/c/{automation}/{rest}`
    pub fn automation_topic(&self, automation: &str, rest: &str) -> String {
        format!(
            "/orgs/{}/automation-servers/{}/c/{}/c/{}/{}",
            self.org, self.server, self.workspace, automation, rest
        )
    }
}

/// A fully parsed inbound topic. Every captured field is non-empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    ProfilesUpdate {
        org: String,
    },
    Topology(WorkspaceScope),
    AutomationProfileRequest {
        scope: WorkspaceScope,
        profile: String,
        automation: String,
        rest: String,
    },
    AutomationData {
        scope: WorkspaceScope,
        automation: String,
        rest: String,
    },
    ServerGroupsUpdate {
        org: String,
        server: String,
    },
    WorkspaceGroupsUpdate(WorkspaceScope),
}

impl Route {
    /// Parses a transport topic against the route grammar.
    ///
    /// ```
    /// use profile_router::{Route, TopicError, WorkspaceScope};
    ///
    /// let route = Route::parse("/orgs/acme/automation-servers/srv1/c/ws1/topology").unwrap();
    /// assert_eq!(route, Route::Topology(WorkspaceScope::new("acme", "srv1", "ws1")));
    ///
    /// assert!(matches!(
    ///     Route::parse("/orgs/acme/bogus"),
    ///     Err(TopicError::Malformed(_))
    /// ));
    /// ```
    pub fn parse(topic: &str) -> Result<Route, TopicError> {
        let malformed = || TopicError::Malformed(topic.to_string());

        let path = topic.strip_prefix('/').ok_or_else(malformed)?;
        let levels: Vec<&str> = path.split('/').collect();
        if levels.iter().any(|level| level.is_empty()) {
            return Err(malformed());
        }

        for rule in GRAMMAR.iter() {
            match rule.match_levels(&levels) {
                RuleMatch::Matched(captures) => return Ok(Self::from_captures(rule.kind, captures)),
                RuleMatch::RestRejected => {
                    return Err(TopicError::OutboundEcho(topic.to_string()))
                }
                RuleMatch::NoMatch => continue,
            }
        }

        Err(malformed())
    }

    fn from_captures(kind: RouteKind, captures: Captures<'_>) -> Route {
        let scope = || WorkspaceScope::new(captures.org, captures.server, captures.workspace);
        match kind {
            RouteKind::ProfilesUpdate => Route::ProfilesUpdate {
                org: captures.org.to_string(),
            },
            RouteKind::Topology => Route::Topology(scope()),
            RouteKind::AutomationProfileRequest => Route::AutomationProfileRequest {
                scope: scope(),
                profile: captures.profile.to_string(),
                automation: captures.automation.to_string(),
                rest: captures.rest.clone(),
            },
            RouteKind::AutomationData => Route::AutomationData {
                scope: scope(),
                automation: captures.automation.to_string(),
                rest: captures.rest.clone(),
            },
            RouteKind::ServerGroupsUpdate => Route::ServerGroupsUpdate {
                org: captures.org.to_string(),
                server: captures.server.to_string(),
            },
            RouteKind::WorkspaceGroupsUpdate => Route::WorkspaceGroupsUpdate(scope()),
        }
    }

    pub fn kind(&self) -> RouteKind {
        match self {
            Route::ProfilesUpdate { .. } => RouteKind::ProfilesUpdate,
            Route::Topology(_) => RouteKind::Topology,
            Route::AutomationProfileRequest { .. } => RouteKind::AutomationProfileRequest,
            Route::AutomationData { .. } => RouteKind::AutomationData,
            Route::ServerGroupsUpdate { .. } => RouteKind::ServerGroupsUpdate,
            Route::WorkspaceGroupsUpdate(_) => RouteKind::WorkspaceGroupsUpdate,
        }
    }

    pub fn org(&self) -> &str {
        match self {
            Route::ProfilesUpdate { org } | Route::ServerGroupsUpdate { org, .. } => org,
            Route::Topology(scope) | Route::WorkspaceGroupsUpdate(scope) => &scope.org,
            Route::AutomationProfileRequest { scope, .. } | Route::AutomationData { scope, .. } => {
                &scope.org
            }
        }
    }
}

/// MQTT topic-filter matching: `+` matches one level, a trailing `#` matches the rest
/// (including the parent level itself).
///
/// ```
/// use profile_router::matches_filter;
///
/// assert!(matches_filter("/orgs/+/profiles", "/orgs/acme/profiles"));
/// assert!(matches_filter("/orgs/+/c/#", "/orgs/acme/c/a/b"));
/// assert!(!matches_filter("/orgs/+/profiles", "/orgs/acme/profiles/p1"));
/// ```
pub fn matches_filter(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');

    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => continue,
            (Some(filter_level), Some(topic_level)) if filter_level == topic_level => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}
