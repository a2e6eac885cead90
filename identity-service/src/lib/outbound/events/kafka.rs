use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use tokio::runtime::Handle;

use crate::config::KafkaConfig;
use crate::domain::identity::events::AuthEvent;
use crate::domain::identity::ports::EventSink;
use crate::outbound::events::messages::AuthEventMessage;

/// Publishes auth events to a Kafka topic.
///
/// `emit` serializes the event and hands delivery to a spawned task, so the
/// auth flow never waits on the broker. Delivery failures are logged and
/// dropped.
pub struct KafkaEventSink {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaEventSink {
    /// Create a new Kafka event sink with "at least once" delivery semantics
    ///
    /// # Arguments
    /// * `config` - Kafka brokers and topic
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Initializing Kafka producer for auth events: brokers={}, topic={}",
            &config.brokers,
            &config.topic
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "30000")
            .set("queue.buffering.max.messages", "10000")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("retry.backoff.ms", "100")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            timeout: Duration::from_secs(30),
        })
    }
}

impl EventSink for KafkaEventSink {
    fn emit(&self, event: AuthEvent) {
        let message = AuthEventMessage::from(&event);

        let payload = match serde_json::to_string(&message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(event = %message.event_type, error = %e, "Failed to serialize auth event");
                return;
            }
        };

        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(event = %message.event_type, "No async runtime, dropping auth event");
            return;
        };

        // Partition by user id when there is one so a user's events stay ordered
        let key = message
            .user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| message.event_type.clone());
        let producer = self.producer.clone();
        let topic = self.topic.clone();
        let timeout = self.timeout;

        handle.spawn(async move {
            let record = FutureRecord::to(&topic).key(&key).payload(&payload);

            match producer.send(record, Timeout::After(timeout)).await {
                Ok(_) => tracing::debug!(
                    "Event {} published to topic '{}'",
                    message.event_type,
                    topic
                ),
                Err((err, _)) => tracing::error!(
                    "Failed to publish {} event to Kafka after all retries: {}",
                    message.event_type,
                    err
                ),
            }
        });
    }
}
