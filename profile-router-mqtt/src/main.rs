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

mod config;
mod mqtt_transport;

use crate::config::{Config, RouterArgs};
use crate::mqtt_transport::MqttTransport;
use anyhow::Context;
use clap::Parser;
use profile_router::{Directory, ProfileRouter};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(err = %err, "unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(err = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = RouterArgs::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let settings = config.resolve(args.broker_url, args.broker_token)?;

    info!(
        delivery_mode = settings.router.delivery.as_str(),
        qos = settings.router.qos,
        admin_suffix = settings.router.admin_suffix.as_str(),
        "starting profile-router-mqtt"
    );

    let (transport, messages) = MqttTransport::new(&settings.broker)?;
    let transport = Arc::new(transport);
    transport.connect(&settings.broker).await;

    let dispatcher = {
        let transport = transport.clone();
        tokio::spawn(async move { transport.dispatch(messages).await })
    };

    let router = ProfileRouter::new(
        Arc::new(Directory::new()),
        transport.clone(),
        settings.router.router_options(),
    );
    router
        .start()
        .await
        .context("unable to subscribe the route patterns")?;

    shutdown_signal().await;

    transport.disconnect().await;
    dispatcher.abort();
    info!("profile-router-mqtt stopped");
    Ok(())
}
