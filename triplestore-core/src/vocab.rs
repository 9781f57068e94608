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

//! Well-known IRIs.

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Namespace of the store's own provenance vocabulary.
pub const INTERNAL_NS: &str = "http://triple-store.internal#";
/// Base for provenance individuals (`<http://triple-store.internal/{uuid}>`).
pub const INTERNAL_BASE: &str = "http://triple-store.internal/";

pub const INTERNAL_SCHEMA: &str = "http://triple-store.internal#Schema";
pub const INTERNAL_HASH: &str = "http://triple-store.internal#hash";
pub const INTERNAL_FILE_PATH: &str = "http://triple-store.internal#filePath";
pub const INTERNAL_FILE_LAST_UPDATE_TIME: &str =
    "http://triple-store.internal#fileLastUpdateTime";
pub const INTERNAL_CONTENT: &str = "http://triple-store.internal#content";
