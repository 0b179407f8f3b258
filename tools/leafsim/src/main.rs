//! leafsim - simulated MQTT leaf devices
//!
//! `leafsim respond` answers direct-method requests published under
//! `device/+/directmethod/+/request`; `leafsim emit` publishes periodic
//! telemetry for one device. Both talk to a plain MQTT broker.

use anyhow::Result;
use clap::{Parser, Subcommand};
use leafsim_device::{
    DirectMethodResponder, EmitterConfig, ResponderConfig, ResponderEvent, ResponsePolicy,
    TelemetryEmitter,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "leafsim")]
#[command(about = "Simulated MQTT leaf devices")]
#[command(version)]
struct Cli {
    /// Responder config file (TOML); flags override file values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer direct-method requests
    Respond {
        /// MQTT broker host
        #[arg(long)]
        host: Option<String>,

        /// MQTT broker port
        #[arg(long)]
        port: Option<u16>,

        /// Keep-alive interval in seconds
        #[arg(long)]
        keep_alive: Option<u16>,

        /// QoS level (0, 1, or 2)
        #[arg(short, long)]
        qos: Option<u8>,

        /// Response payload policy
        #[arg(short, long, value_enum)]
        policy: Option<ResponsePolicy>,

        /// Topic filter to subscribe to
        #[arg(long)]
        topic_filter: Option<String>,

        /// MQTT client id
        #[arg(long)]
        client_id: Option<String>,
    },

    /// Publish periodic telemetry for one device
    Emit {
        /// Device ID used in the device/<id>/message topic
        #[arg(short, long)]
        device_id: String,

        /// MQTT broker host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// MQTT broker port
        #[arg(long, default_value = "1883")]
        port: u16,

        /// QoS level (0, 1, or 2)
        #[arg(short, long, default_value = "0")]
        qos: u8,

        /// Interval between messages in milliseconds
        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,

        /// Number of messages to publish (unlimited when omitted)
        #[arg(long)]
        count: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Respond {
            host,
            port,
            keep_alive,
            qos,
            policy,
            topic_filter,
            client_id,
        } => {
            let mut config = match &cli.config {
                Some(path) => ResponderConfig::from_toml_file(path)?,
                None => ResponderConfig::default(),
            };
            if let Some(host) = host {
                config.broker_host = host;
            }
            if let Some(port) = port {
                config.broker_port = port;
            }
            if let Some(keep_alive) = keep_alive {
                config.keep_alive_secs = keep_alive;
            }
            if let Some(qos) = qos {
                config.qos = qos;
            }
            if let Some(policy) = policy {
                config.policy = policy;
            }
            if let Some(topic_filter) = topic_filter {
                config.topic_filter = topic_filter;
            }
            if let Some(client_id) = client_id {
                config.client_id = client_id;
            }

            run_responder(config).await
        }
        Commands::Emit {
            device_id,
            host,
            port,
            qos,
            interval_ms,
            count,
        } => {
            let config = EmitterConfig {
                broker_host: host,
                broker_port: port,
                client_id: format!("leafsim-emit-{}", device_id),
                keep_alive_secs: 60,
                qos,
                device_id,
                interval_ms,
                count,
            };
            run_emitter(config).await
        }
    }
}

async fn run_responder(config: ResponderConfig) -> Result<()> {
    tracing::info!(
        "starting responder ({:?} policy) against {}:{}",
        config.policy,
        config.broker_host,
        config.broker_port
    );

    let mut responder = DirectMethodResponder::new(config);
    let mut events = responder.start().await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, shutting down");
                responder.stop().await?;
                break;
            }
            event = events.recv() => match event {
                Some(ResponderEvent::Connected) => {}
                Some(ResponderEvent::Responded { device_id, method_name, topic }) => {
                    tracing::info!(
                        "answered '{}' for device '{}' on {}",
                        method_name, device_id, topic
                    );
                }
                Some(ResponderEvent::Disconnected { reason }) => {
                    if let Some(reason) = reason {
                        tracing::warn!("disconnected: {}", reason);
                    }
                }
                None => break,
            }
        }
    }

    Ok(())
}

async fn run_emitter(config: EmitterConfig) -> Result<()> {
    let emitter = TelemetryEmitter::new(config);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
        result = emitter.run() => result?,
    }

    Ok(())
}
