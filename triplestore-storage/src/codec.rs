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


//! Partition Codec
//!
//! One subject's triples live in one Turtle file named after the SHA-256
//! of the subject's canonical string:
//!
//! ```text
//! <store>/triples/6e991db3...71a2.ttl
//! ```
//!
//! Files are always rewritten whole, through a temporary sibling and a
//! rename, so a partition on disk is syntactically complete even if the
//! process dies between two writes.

use crate::convert;
use oxigraph::io::{RdfFormat, RdfParser};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use triplestore_core::{Graph, Result, Term, TripleStoreError};

/// Partition file extension.
pub const PARTITION_EXTENSION: &str = "ttl";

const TEMP_EXTENSION: &str = "ttl.tmp";

/// Deterministic partition key of a subject.
pub fn partition_key(subject: &Term) -> String {
    subject.content_hash()
}

/// `<hash>.ttl`
pub fn partition_file_name(subject: &Term) -> String {
    format!("{}.{}", partition_key(subject), PARTITION_EXTENSION)
}

/// True for a finished partition file (not a leftover temp file).
pub fn is_partition_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(&format!(".{}", PARTITION_EXTENSION)) && !name.ends_with(TEMP_EXTENSION)
}

/// Serialize a graph as Turtle.
///
/// Prefix bindings are written as `@prefix` lines. Terms are always written
/// as full IRIs so that any IRI survives the round trip.
pub fn serialize(graph: &Graph) -> String {
    let mut out = String::new();
    for (prefix, namespace) in graph.namespaces() {
        out.push_str("@prefix ");
        out.push_str(prefix);
        out.push_str(": <");
        out.push_str(namespace);
        out.push_str("> .\n");
    }

    for (subject, pairs) in graph.by_subject() {
        out.push('\n');
        out.push_str(&subject.to_n3());
        let last = pairs.len().saturating_sub(1);
        for (i, (predicate, object)) in pairs.iter().enumerate() {
            out.push_str(if i == 0 { " " } else { "    " });
            out.push_str(&predicate.to_n3());
            out.push(' ');
            out.push_str(&object.to_n3());
            out.push_str(if i == last { " .\n" } else { " ;\n" });
        }
    }
    out
}

/// Parse a Turtle document, keeping its prefix declarations.
pub fn parse(input: &str) -> Result<Graph> {
    let mut graph = Graph::new();
    for (prefix, namespace) in prefixes(input) {
        graph.bind(prefix, namespace);
    }

    for quad in RdfParser::from_format(RdfFormat::Turtle).for_reader(input.as_bytes()) {
        let quad = quad.map_err(|e| TripleStoreError::Parse(e.to_string()))?;
        graph.add(convert::from_quad(quad)?);
    }
    Ok(graph)
}

fn prefixes(input: &str) -> Vec<(String, String)> {
    static PREFIX_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = PREFIX_RE.get_or_init(|| {
        Regex::new(r"(?mi)^\s*@?prefix\s+([A-Za-z][\w.-]*)?:\s*<([^>]*)>").ok()
    });
    let Some(re) = re else {
        return Vec::new();
    };
    re.captures_iter(input)
        .map(|c| {
            (
                c.get(1).map_or("", |m| m.as_str()).to_string(),
                c[2].to_string(),
            )
        })
        .collect()
}

/// Read and parse one partition file.
///
/// Any parse failure is reported as `CorruptPartition` for that path.
pub fn read_partition(path: &Path) -> Result<Graph> {
    let contents = fs::read_to_string(path)?;
    parse(&contents).map_err(|e| TripleStoreError::CorruptPartition {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Atomically replace a partition file with the serialization of `graph`.
pub fn write_partition(path: &Path, graph: &Graph) -> Result<()> {
    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(serialize(graph).as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension(TEMP_EXTENSION)
}
