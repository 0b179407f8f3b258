//! Simulated telemetry emitter
//!
//! Leaf devices also publish telemetry to `device/<deviceId>/message`,
//! which the gateway forwards upstream. This emitter plays that side of
//! the fixture: a JSON reading on a fixed interval, optionally bounded.

use crate::config::{parse_qos, EmitterConfig};
use crate::error::Result;
use rand::Rng;
use rumqttc::{AsyncClient, MqttOptions};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

pub struct TelemetryEmitter {
    config: EmitterConfig,
}

impl TelemetryEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// Topic this emitter publishes on.
    pub fn topic(&self) -> String {
        format!("device/{}/message", self.config.device_id)
    }

    /// Connect and publish telemetry until the configured count is reached.
    ///
    /// With no count configured this runs until the task is cancelled.
    pub async fn run(&self) -> Result<()> {
        let mut mqttoptions = MqttOptions::new(
            &self.config.client_id,
            &self.config.broker_host,
            self.config.broker_port,
        );
        mqttoptions.set_keep_alive(Duration::from_secs(self.config.keep_alive_secs as u64));

        let (client, mut eventloop) = AsyncClient::new(mqttoptions, 10);

        // The event loop must keep being polled for publishes to flush
        tokio::spawn(async move {
            loop {
                if let Err(e) = eventloop.poll().await {
                    error!("mqtt error: {:?}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        });

        let topic = self.topic();
        let qos = parse_qos(self.config.qos);
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.interval_ms));

        info!(
            "emitting telemetry on {} every {}ms",
            topic, self.config.interval_ms
        );

        let mut seq: u64 = 0;
        loop {
            if let Some(count) = self.config.count {
                if seq >= count {
                    break;
                }
            }
            interval.tick().await;

            let reading = {
                let mut rng = rand::thread_rng();
                json!({
                    "temperature": 18.0 + rng.gen::<f64>() * 10.0,
                    "humidity": 40.0 + rng.gen::<f64>() * 20.0,
                    "seq": seq,
                })
            };

            client
                .publish(&topic, qos, false, reading.to_string().into_bytes())
                .await?;
            debug!("telemetry {} published", seq);
            seq += 1;
        }

        let _ = client.disconnect().await;
        info!("emitter finished after {} messages", seq);
        Ok(())
    }
}
