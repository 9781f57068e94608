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


//! Triplestore Service
//!
//! The orchestrator over a storage adapter: durable insert/remove (the
//! adapter maintains views under its own lock), routing-keyed change
//! events on a message bus, subscriptions and schema loading with
//! provenance.
//!
//! ```no_run
//! use std::sync::Arc;
//! use triplestore_core::{Graph, GraphName, Term, Triple, TripleStoreConfig};
//! use triplestore_service::{InMemoryBus, TripleStoreService};
//!
//! # fn main() -> triplestore_core::Result<()> {
//! let config = TripleStoreConfig::at("storage/triplestore");
//! let service = TripleStoreService::open(&config, Some(Arc::new(InMemoryBus::new())))?;
//!
//! let mut graph = Graph::new();
//! graph.add(Triple::new(
//!     Term::iri("http://example.org/s"),
//!     Term::iri("http://example.org/p"),
//!     Term::literal("o"),
//! ));
//! service.insert(&graph, &GraphName::Default)?;
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod schema;
pub mod service;
pub mod subscription;

pub use bus::{topic_matches, BusError, Callback, ConsumerTag, InMemoryBus, MessageBus};
pub use schema::{SchemaLoad, INTERNAL_SCHEMA_TTL};
pub use service::TripleStoreService;
pub use subscription::{SubscriptionFilter, SubscriptionHandle};
