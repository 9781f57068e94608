// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Message bus seam
//!
//! The service only produces `(topic, routing key, payload)` triples and
//! registers routing-key patterns; matching and delivery belong to the bus.
//! [`InMemoryBus`] is an in-process topic exchange with AMQP semantics:
//! keys are `.`-separated words, `*` matches exactly one word and `#`
//! matches zero or more.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use triplestore_core::TripleStoreError;

/// Identifier of one registered consumer.
pub type ConsumerTag = u64;

/// Delivery callback; receives the raw payload bytes.
pub type Callback = Arc<dyn Fn(&[u8]) + Send + Sync>;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("Unknown consumer: {0}")]
    UnknownConsumer(ConsumerTag),

    #[error("Invalid routing pattern: {0}")]
    InvalidPattern(String),

    #[error("Bus unavailable: {0}")]
    Unavailable(String),
}

impl From<BusError> for TripleStoreError {
    fn from(e: BusError) -> Self {
        match e {
            BusError::UnknownConsumer(tag) => TripleStoreError::SubscriptionNotFound(tag),
            other => TripleStoreError::Bus(other.to_string()),
        }
    }
}

pub trait MessageBus: Send + Sync {
    fn topic_publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<(), BusError>;

    fn topic_consume(
        &self,
        topic: &str,
        pattern: &str,
        callback: Callback,
    ) -> Result<ConsumerTag, BusError>;

    fn topic_cancel(&self, tag: ConsumerTag) -> Result<(), BusError>;
}

/// AMQP topic match of `routing_key` against `pattern`.
pub fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();
    matches_words(&pattern, &key)
}

fn matches_words(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&"#", rest)) => (0..=key.len()).any(|skip| matches_words(rest, &key[skip..])),
        Some((&word, rest)) => match key.split_first() {
            Some((&first, key_rest)) if word == "*" || word == first => {
                matches_words(rest, key_rest)
            }
            _ => false,
        },
    }
}

struct Consumer {
    topic: String,
    pattern: String,
    callback: Callback,
}

/// Synchronous in-process topic exchange.
#[derive(Default)]
pub struct InMemoryBus {
    consumers: DashMap<ConsumerTag, Consumer>,
    next_tag: AtomicU64,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }
}

impl MessageBus for InMemoryBus {
    fn topic_publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<(), BusError> {
        // Collect first so callbacks run without holding map shards.
        let targets: Vec<Callback> = self
            .consumers
            .iter()
            .filter(|c| c.topic == topic && topic_matches(&c.pattern, routing_key))
            .map(|c| Arc::clone(&c.callback))
            .collect();

        debug!(topic, routing_key, consumers = targets.len(), "Delivering");
        for callback in targets {
            callback(payload);
        }
        Ok(())
    }

    fn topic_consume(
        &self,
        topic: &str,
        pattern: &str,
        callback: Callback,
    ) -> Result<ConsumerTag, BusError> {
        if pattern.is_empty() || pattern.split('.').any(str::is_empty) {
            return Err(BusError::InvalidPattern(pattern.to_string()));
        }
        let tag = self.next_tag.fetch_add(1, Ordering::Relaxed) + 1;
        self.consumers.insert(
            tag,
            Consumer {
                topic: topic.to_string(),
                pattern: pattern.to_string(),
                callback,
            },
        );
        Ok(tag)
    }

    fn topic_cancel(&self, tag: ConsumerTag) -> Result<(), BusError> {
        self.consumers
            .remove(&tag)
            .map(|_| ())
            .ok_or(BusError::UnknownConsumer(tag))
    }
}
