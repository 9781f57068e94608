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


//! Triple Store Service
//!
//! Orchestrates a storage adapter and the message bus. For every
//! `insert`/`remove`:
//!
//! 1. the adapter commits the change durably (partitions, then aggregate)
//!    and maintains the views of triples matching its triggers, all under
//!    its own lock;
//! 2. one event per triple is published under its routing key.
//!
//! Publishing runs after the adapter has released its lock, so a durable
//! write always precedes its events, but events from concurrent callers
//! may interleave.

use crate::bus::{Callback, MessageBus};
use crate::schema::INTERNAL_SCHEMA_TTL;
use crate::subscription::{SubscriptionFilter, SubscriptionHandle};
use std::sync::Arc;
use tracing::{debug, error, info};
use triplestore_core::{
    EventKind, Graph, GraphName, MutationEvent, PublishFailurePolicy, Result, ResultSet, Term,
    TripleStoreConfig, TripleStoreError,
};
use triplestore_storage::{codec, FilesystemTripleStore, TripleStorePort};

pub struct TripleStoreService {
    adapter: Arc<dyn TripleStorePort>,
    bus: Option<Arc<dyn MessageBus>>,
    topic: String,
    publish_failure: PublishFailurePolicy,
}

impl TripleStoreService {
    /// Wire a service over `adapter`.
    ///
    /// Inserts the internal provenance ontology unless the configuration
    /// disables it.
    pub fn new(
        adapter: Arc<dyn TripleStorePort>,
        bus: Option<Arc<dyn MessageBus>>,
        config: &TripleStoreConfig,
    ) -> Result<Self> {
        let service = Self {
            adapter,
            bus,
            topic: config.topic.clone(),
            publish_failure: config.publish_failure,
        };

        if config.bootstrap_internal_schema {
            let ontology = codec::parse(INTERNAL_SCHEMA_TTL)?;
            service.insert(&ontology, &GraphName::Default)?;
        }

        info!(
            topic = %service.topic,
            bus = service.bus.is_some(),
            "Triple store service ready"
        );
        Ok(service)
    }

    /// Open the filesystem store described by `config`.
    pub fn open(config: &TripleStoreConfig, bus: Option<Arc<dyn MessageBus>>) -> Result<Self> {
        let store = FilesystemTripleStore::open_with_config(config)?;
        Self::new(Arc::new(store), bus, config)
    }

    pub fn adapter(&self) -> &Arc<dyn TripleStorePort> {
        &self.adapter
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn insert(&self, triples: &Graph, graph: &GraphName) -> Result<()> {
        self.adapter.insert(triples, graph)?;
        self.publish(EventKind::Insert, triples, graph)
    }

    pub fn remove(&self, triples: &Graph, graph: &GraphName) -> Result<()> {
        self.adapter.remove(triples, graph)?;
        self.publish(EventKind::Delete, triples, graph)
    }

    fn publish(&self, kind: EventKind, triples: &Graph, graph: &GraphName) -> Result<()> {
        let bus = match &self.bus {
            Some(bus) => bus,
            None => {
                debug!(event = %kind, triples = triples.len(), "No bus, events not published");
                return Ok(());
            }
        };

        for triple in triples {
            let event = MutationEvent::new(kind, graph.clone(), triple.clone());
            let routing_key = event.routing_key();
            if let Err(e) = bus.topic_publish(&self.topic, &routing_key, &event.payload()) {
                error!(
                    topic = %self.topic,
                    routing_key = %routing_key,
                    error = %e,
                    "Failed to publish triple event"
                );
                if self.publish_failure == PublishFailurePolicy::Fail {
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// Snapshot of the whole store.
    pub fn get(&self) -> Result<Graph> {
        self.adapter.get()
    }

    pub fn query(&self, sparql: &str) -> Result<ResultSet> {
        self.adapter.query(sparql)
    }

    pub fn query_view(&self, view: &str, sparql: &str) -> Result<ResultSet> {
        self.adapter.query_view(view, sparql)
    }

    pub fn get_subject_graph(&self, subject: &Term) -> Result<Graph> {
        self.adapter.get_subject_graph(subject)
    }

    /// Register `callback` for events matching `filter`.
    ///
    /// Matching is done by the bus against the routing-key pattern.
    pub fn subscribe(
        &self,
        filter: &SubscriptionFilter,
        callback: Callback,
    ) -> Result<SubscriptionHandle> {
        let bus = self
            .bus
            .as_ref()
            .ok_or_else(|| TripleStoreError::Bus("no message bus configured".to_string()))?;

        let pattern = filter.routing_pattern();
        let tag = bus.topic_consume(&self.topic, &pattern, callback)?;
        debug!(tag, pattern = %pattern, "Subscribed");
        Ok(SubscriptionHandle::new(tag, &self.topic, pattern))
    }

    /// Revoke a subscription. `SubscriptionNotFound` if the bus doesn't
    /// know the handle (including a second unsubscribe).
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<()> {
        let bus = self
            .bus
            .as_ref()
            .ok_or(TripleStoreError::SubscriptionNotFound(handle.tag()))?;
        bus.topic_cancel(handle.tag())?;
        debug!(tag = handle.tag(), "Unsubscribed");
        Ok(())
    }

    pub fn create_graph(&self, iri: &str) -> Result<()> {
        self.adapter.create_graph(iri)
    }

    pub fn clear_graph(&self, iri: Option<&str>) -> Result<()> {
        self.adapter.clear_graph(iri)
    }

    pub fn drop_graph(&self, iri: &str) -> Result<()> {
        self.adapter.drop_graph(iri)
    }

    pub fn list_graphs(&self) -> Result<Vec<String>> {
        self.adapter.list_graphs()
    }
}
