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


//! Subscription handles.

use crate::bus::ConsumerTag;
use std::fmt;
use triplestore_core::{EventKind, GraphScope, RoutingKeyBuilder, TriplePattern};

/// What a subscriber listens for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub pattern: TriplePattern,
    /// `None` listens to inserts and deletes.
    pub kind: Option<EventKind>,
    pub graph: GraphScope,
}

impl SubscriptionFilter {
    pub fn new(pattern: TriplePattern) -> Self {
        Self {
            pattern,
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn graph(mut self, graph: GraphScope) -> Self {
        self.graph = graph;
        self
    }

    /// Routing-key pattern handed to the bus.
    pub fn routing_pattern(&self) -> String {
        RoutingKeyBuilder::pattern(
            self.kind,
            &self.graph,
            self.pattern.subject.as_ref(),
            self.pattern.predicate.as_ref(),
            self.pattern.object.as_ref(),
        )
    }
}

/// Returned by `subscribe`; pass it to `unsubscribe` to revoke delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    tag: ConsumerTag,
    topic: String,
    pattern: String,
}

impl SubscriptionHandle {
    pub(crate) fn new(tag: ConsumerTag, topic: &str, pattern: String) -> Self {
        Self {
            tag,
            topic: topic.to_string(),
            pattern,
        }
    }

    pub fn tag(&self) -> ConsumerTag {
        self.tag
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} {}", self.tag, self.topic, self.pattern)
    }
}
