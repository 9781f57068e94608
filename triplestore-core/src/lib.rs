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

//! Triplestore Core
//!
//! Value types shared by the storage engine and the service: RDF terms,
//! triples and graphs, routing keys for mutation events, view trigger
//! patterns, query results, configuration and the error type.

pub mod config;
pub mod error;
pub mod graph;
pub mod pattern;
pub mod results;
pub mod routing;
pub mod term;
pub mod vocab;

pub use config::{PublishFailurePolicy, TripleStoreConfig, GRAPH_CATALOG_FILE};
pub use error::{Result, TripleStoreError};
pub use graph::{Graph, Triple};
pub use pattern::TriplePattern;
pub use results::{Binding, ResultSet, Solutions};
pub use routing::{
    EventKind, GraphName, GraphScope, MutationEvent, RoutingKeyBuilder, DEFAULT_TOPIC, WILDCARD,
};
pub use term::{sha256_hex, Literal, Term};
