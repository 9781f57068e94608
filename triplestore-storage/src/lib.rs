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


//! Triplestore Storage
//!
//! Filesystem-backed storage engine: per-subject partition files, a live
//! in-memory aggregate answering SPARQL through a pluggable query engine,
//! symlink views and a named-graph catalog.

pub mod catalog;
pub mod codec;
mod convert;
pub mod filesystem;
pub mod live_graph;
pub mod partition;
pub mod port;
pub mod query;
pub mod views;

pub use catalog::{GraphCatalog, GraphEntry};
pub use filesystem::FilesystemTripleStore;
pub use live_graph::LiveGraph;
pub use partition::SubjectPartitionStore;
pub use port::TripleStorePort;
pub use query::{OxigraphEngine, QueryEngine};
pub use views::{ViewChange, ViewMaterializer};
