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

use anyhow::{bail, Context};
use clap::Parser;
use profile_router::{AdminSuffixPolicy, DeliveryMode, RouterOptions, DEFAULT_ADMIN_SUFFIX};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_USERNAME: &str = "profile-manager";
const DEFAULT_RECONNECT_MIN_SECS: u64 = 2;
const DEFAULT_RECONNECT_MAX_SECS: u64 = 30;
const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;
const MAX_QOS: u8 = 2;

#[derive(Parser, Debug)]
#[command(version, about = "Routes control-plane traffic to organization profiles over MQTT")]
pub(crate) struct RouterArgs {
    /// JSON5 configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    #[arg(long, env = "MQTT_BROKER_URL", value_name = "URL")]
    pub(crate) broker_url: Option<String>,

    /// Already issued broker credential, sent as the MQTT password.
    #[arg(long, env = "MQTT_BROKER_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub(crate) broker_token: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) broker: BrokerConfig,
    #[serde(default)]
    pub(crate) router: RouterConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct BrokerConfig {
    pub(crate) url: Option<String>,
    pub(crate) token: Option<String>,
    pub(crate) username: String,
    pub(crate) client_id_prefix: String,
    pub(crate) keep_alive_secs: u64,
    pub(crate) reconnect_min_secs: u64,
    pub(crate) reconnect_max_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            username: DEFAULT_USERNAME.to_string(),
            client_id_prefix: DEFAULT_USERNAME.to_string(),
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
            reconnect_min_secs: DEFAULT_RECONNECT_MIN_SECS,
            reconnect_max_secs: DEFAULT_RECONNECT_MAX_SECS,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct RouterConfig {
    pub(crate) delivery: DeliveryMode,
    pub(crate) qos: u8,
    pub(crate) admin_suffix: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::default(),
            qos: 0,
            admin_suffix: DEFAULT_ADMIN_SUFFIX.to_string(),
        }
    }
}

impl RouterConfig {
    pub(crate) fn router_options(&self) -> RouterOptions {
        RouterOptions::default()
            .with_delivery(self.delivery)
            .with_qos(self.qos)
            .with_policy(Arc::new(AdminSuffixPolicy::new(self.admin_suffix.clone())))
    }
}

/// Broker connection settings with every override applied.
#[derive(Debug, Clone)]
pub(crate) struct BrokerSettings {
    pub(crate) url: String,
    pub(crate) token: String,
    pub(crate) username: String,
    pub(crate) client_id_prefix: String,
    pub(crate) keep_alive: Duration,
    pub(crate) reconnect_min: Duration,
    pub(crate) reconnect_max: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) broker: BrokerSettings,
    pub(crate) router: RouterConfig,
}

impl Config {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("unable to parse config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(json5::from_str(contents)?)
    }

    /// Applies the command line (or environment) broker values over the file values and
    /// checks the result.
    pub(crate) fn resolve(
        self,
        broker_url: Option<String>,
        broker_token: Option<String>,
    ) -> anyhow::Result<Settings> {
        let Config { broker, router } = self;

        let Some(url) = broker_url.or(broker.url).filter(|url| !url.is_empty()) else {
            bail!("no broker URL configured: set broker.url, --broker-url or MQTT_BROKER_URL");
        };
        let Some(token) = broker_token.or(broker.token).filter(|token| !token.is_empty()) else {
            bail!(
                "no broker token configured: set broker.token, --broker-token or MQTT_BROKER_TOKEN"
            );
        };

        if router.qos > MAX_QOS {
            bail!("router.qos must be 0, 1 or 2, got {}", router.qos);
        }
        if broker.reconnect_min_secs == 0 || broker.reconnect_min_secs > broker.reconnect_max_secs
        {
            bail!(
                "broker reconnect interval must satisfy 0 < min <= max, got {}..{}",
                broker.reconnect_min_secs,
                broker.reconnect_max_secs
            );
        }

        Ok(Settings {
            broker: BrokerSettings {
                url,
                token,
                username: broker.username,
                client_id_prefix: broker.client_id_prefix,
                keep_alive: Duration::from_secs(broker.keep_alive_secs),
                reconnect_min: Duration::from_secs(broker.reconnect_min_secs),
                reconnect_max: Duration::from_secs(broker.reconnect_max_secs),
            },
            router,
        })
    }
}
