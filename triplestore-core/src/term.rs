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

//! RDF Terms
//!
//! A term is an IRI, a blank node or a literal. Every term has two string
//! forms:
//!
//! - **canonical**: the bare value (`http://example.org/s`, `b0`, `o`). This
//!   is what gets hashed for partition file names and routing keys.
//! - **N3**: the N-Triples/Turtle surface syntax (`<http://example.org/s>`,
//!   `_:b0`, `"o"`). This is what event payloads carry.

use crate::vocab::{RDF_LANG_STRING, XSD_STRING};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Literal value with optional datatype or language tag.
///
/// Plain `xsd:string` literals are stored with `datatype: None` so that a
/// literal read back from a parser compares equal to the one inserted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        if datatype == XSD_STRING {
            return Self::simple(value);
        }
        Self {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    pub fn language_tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    fn write_n3(&self, out: &mut String) {
        out.push('"');
        escape_literal(&self.value, out);
        out.push('"');
        if let Some(lang) = &self.language {
            out.push('@');
            out.push_str(lang);
        } else if let Some(dt) = &self.datatype {
            if dt != RDF_LANG_STRING {
                out.push_str("^^<");
                out.push_str(dt);
                out.push('>');
            }
        }
    }
}

/// RDF term
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Term {
    Iri(String),
    BlankNode(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::BlankNode(id.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::simple(value))
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal::typed(value, datatype))
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal::language_tagged(value, language))
    }

    /// Canonical string used for hashing. Literals hash by lexical value only.
    pub fn canonical_str(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::BlankNode(id) => id,
            Term::Literal(lit) => &lit.value,
        }
    }

    /// Lowercase hex SHA-256 of the canonical string.
    pub fn content_hash(&self) -> String {
        sha256_hex(self.canonical_str().as_bytes())
    }

    /// N-Triples surface form.
    pub fn to_n3(&self) -> String {
        let mut out = String::new();
        self.write_n3(&mut out);
        out
    }

    pub(crate) fn write_n3(&self, out: &mut String) {
        match self {
            Term::Iri(iri) => {
                out.push('<');
                out.push_str(iri);
                out.push('>');
            }
            Term::BlankNode(id) => {
                out.push_str("_:");
                out.push_str(id);
            }
            Term::Literal(lit) => lit.write_n3(out),
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// IRI or blank node, i.e. something that can be a subject.
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Last path or fragment segment: `http://ex.org/a/b#c` -> `c`.
    pub fn local_id(&self) -> &str {
        let s = self.canonical_str();
        let tail = s.rsplit('/').next().unwrap_or(s);
        tail.rsplit('#').next().unwrap_or(tail)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_n3())
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

fn escape_literal(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms() {
        assert_eq!(Term::iri("http://example.org/s").canonical_str(), "http://example.org/s");
        assert_eq!(Term::blank("b0").canonical_str(), "b0");
        assert_eq!(
            Term::typed_literal("5", "http://www.w3.org/2001/XMLSchema#integer").canonical_str(),
            "5"
        );
    }

    #[test]
    fn test_n3_forms() {
        assert_eq!(Term::iri("http://example.org/s").to_n3(), "<http://example.org/s>");
        assert_eq!(Term::blank("b0").to_n3(), "_:b0");
        assert_eq!(Term::literal("o").to_n3(), "\"o\"");
        assert_eq!(Term::lang_literal("chat", "FR").to_n3(), "\"chat\"@fr");
        assert_eq!(
            Term::typed_literal("5", "http://www.w3.org/2001/XMLSchema#integer").to_n3(),
            "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(Term::literal("a \"q\"\nb").to_n3(), "\"a \\\"q\\\"\\nb\"");
    }

    #[test]
    fn test_xsd_string_is_plain() {
        assert_eq!(Term::typed_literal("o", XSD_STRING), Term::literal("o"));
    }

    #[test]
    fn test_content_hash_is_sha256_of_canonical() {
        // sha256("o")
        assert_eq!(
            Term::literal("o").content_hash(),
            "65c74c15a686187bb6bbf9958f494fc6b80068034a659a9ad44991b08c58f2d2"
        );
        assert_eq!(Term::literal("o").content_hash(), Term::iri("o").content_hash());
    }

    #[test]
    fn test_local_id() {
        assert_eq!(Term::iri("http://ex.org/people/alice").local_id(), "alice");
        assert_eq!(Term::iri("http://ex.org/onto#Person").local_id(), "Person");
        assert_eq!(Term::iri("http://ex.org/a/b#c").local_id(), "c");
        assert_eq!(Term::blank("n1").local_id(), "n1");
    }
}
