//! Direct-method responder run loop
//!
//! Owns the MQTT session and answers every request delivered by the
//! subscription. Messages are handled one at a time: a request's response
//! is published before the next event is polled. Per-message failures are
//! logged and dropped so a malformed request never takes the responder
//! down; connection-level reconnection stays with rumqttc.

use crate::config::{parse_qos, ResponderConfig};
use crate::error::{ResponderError, Result};
use crate::method::MethodRequest;
use parking_lot::Mutex;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events from a running responder
#[derive(Debug, Clone)]
pub enum ResponderEvent {
    /// Broker accepted the connection
    Connected,
    /// A request was answered
    Responded {
        device_id: String,
        method_name: String,
        topic: String,
    },
    /// Session ended
    Disconnected { reason: Option<String> },
}

/// Simulated-device responder for direct-method requests.
pub struct DirectMethodResponder {
    config: ResponderConfig,
    client: Option<AsyncClient>,
    running: Arc<Mutex<bool>>,
}

impl DirectMethodResponder {
    pub fn new(config: ResponderConfig) -> Self {
        Self {
            config,
            client: None,
            running: Arc::new(Mutex::new(false)),
        }
    }

    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Connect, subscribe, and start answering requests.
    ///
    /// Returns a channel of [`ResponderEvent`]s; the loop runs until
    /// [`stop`](Self::stop) is called or the event receiver is dropped.
    pub async fn start(&mut self) -> Result<mpsc::Receiver<ResponderEvent>> {
        if *self.running.lock() {
            return Err(ResponderError::Connection(
                "responder already running".to_string(),
            ));
        }

        let mut mqttoptions = MqttOptions::new(
            &self.config.client_id,
            &self.config.broker_host,
            self.config.broker_port,
        );
        mqttoptions.set_keep_alive(Duration::from_secs(self.config.keep_alive_secs as u64));

        let (client, mut eventloop) = AsyncClient::new(mqttoptions, 100);
        self.client = Some(client.clone());
        *self.running.lock() = true;

        let qos = parse_qos(self.config.qos);
        client.subscribe(&self.config.topic_filter, qos).await?;
        debug!("subscribed to {}", self.config.topic_filter);

        let (tx, rx) = mpsc::channel(100);
        let running = self.running.clone();
        let policy = self.config.policy;

        info!(
            "responder connecting to {}:{}",
            self.config.broker_host, self.config.broker_port
        );

        tokio::spawn(async move {
            loop {
                if !*running.lock() {
                    break;
                }

                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        debug!(
                            "request on {} ({} bytes)",
                            publish.topic,
                            publish.payload.len()
                        );

                        let request = match MethodRequest::parse(&publish.topic, &publish.payload)
                        {
                            Ok(request) => request,
                            Err(e) => {
                                warn!("dropping request on '{}': {}", publish.topic, e);
                                continue;
                            }
                        };

                        let response = request.respond(policy);
                        if let Err(e) = client
                            .publish(&response.topic, qos, false, response.to_bytes())
                            .await
                        {
                            warn!("publish to '{}' failed: {}", response.topic, e);
                            continue;
                        }

                        let event = ResponderEvent::Responded {
                            device_id: request.device_id,
                            method_name: request.method_name,
                            topic: response.topic,
                        };
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("connected to broker");
                        let _ = tx.send(ResponderEvent::Connected).await;
                    }
                    Ok(Event::Incoming(Packet::Disconnect)) => {
                        warn!("broker closed the session");
                        let _ = tx
                            .send(ResponderEvent::Disconnected {
                                reason: Some("broker disconnect".to_string()),
                            })
                            .await;
                    }
                    Err(e) => {
                        error!("mqtt error: {:?}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    _ => {}
                }
            }

            let _ = tx.send(ResponderEvent::Disconnected { reason: None }).await;
        });

        Ok(rx)
    }

    /// Stop the run loop and disconnect from the broker.
    pub async fn stop(&mut self) -> Result<()> {
        *self.running.lock() = false;
        if let Some(client) = &self.client {
            let _ = client.disconnect().await;
        }
        self.client = None;
        info!("responder stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock()
    }
}
