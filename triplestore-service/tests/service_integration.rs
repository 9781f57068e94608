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


//! Integration tests for the triple store service

use parking_lot::Mutex;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use triplestore_core::vocab::{INTERNAL_HASH, INTERNAL_SCHEMA, RDFS_LABEL, RDF_TYPE};
use triplestore_core::{
    EventKind, Graph, GraphName, PublishFailurePolicy, Result, ResultSet, Term, Triple,
    TriplePattern, TripleStoreConfig, TripleStoreError,
};
use triplestore_service::{
    BusError, Callback, ConsumerTag, InMemoryBus, MessageBus, SchemaLoad, SubscriptionFilter,
    TripleStoreService,
};
use triplestore_storage::TripleStorePort;

const H_S: &str = "6e991db3e262cdfd921193cf9a47f2ebafd568ebabf06ab6e42141ecce9371a2";
const H_P: &str = "128c954cbe72a165e6f494e6f38833b56f9a829c1f1c4270a061eb1a2be6060d";
const H_O: &str = "65c74c15a686187bb6bbf9958f494fc6b80068034a659a9ad44991b08c58f2d2";
const H_TYPE: &str = "b84b3e7592c723ee893eebc4366b242c84664d948e43072baefa092cf39e8e50";
const H_ENTITIES: &str = "29bf934895db50f690ae872889b9843d4b0415a5770f728658c3edc481fc7293";

/// Bus double that records every call
#[derive(Default)]
struct RecordingBus {
    published: Mutex<Vec<(String, String, Vec<u8>)>>,
    consumed: Mutex<Vec<(String, String)>>,
    fail_publish: bool,
}

impl RecordingBus {
    fn failing() -> Self {
        Self {
            fail_publish: true,
            ..Default::default()
        }
    }
}

impl MessageBus for RecordingBus {
    fn topic_publish(
        &self,
        topic: &str,
        routing_key: &str,
        payload: &[u8],
    ) -> std::result::Result<(), BusError> {
        if self.fail_publish {
            return Err(BusError::Unavailable("broker down".to_string()));
        }
        self.published
            .lock()
            .push((topic.to_string(), routing_key.to_string(), payload.to_vec()));
        Ok(())
    }

    fn topic_consume(
        &self,
        topic: &str,
        pattern: &str,
        _callback: Callback,
    ) -> std::result::Result<ConsumerTag, BusError> {
        let mut consumed = self.consumed.lock();
        consumed.push((topic.to_string(), pattern.to_string()));
        Ok(consumed.len() as ConsumerTag)
    }

    fn topic_cancel(&self, tag: ConsumerTag) -> std::result::Result<(), BusError> {
        Err(BusError::UnknownConsumer(tag))
    }
}

/// Storage double that records every call with its arguments
#[derive(Default)]
struct RecordingAdapter {
    calls: Mutex<Vec<String>>,
}

impl RecordingAdapter {
    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl TripleStorePort for RecordingAdapter {
    fn insert(&self, triples: &Graph, graph: &GraphName) -> Result<()> {
        self.record(format!("insert({}, {})", triples.len(), graph));
        Ok(())
    }

    fn remove(&self, triples: &Graph, graph: &GraphName) -> Result<()> {
        self.record(format!("remove({}, {})", triples.len(), graph));
        Ok(())
    }

    fn get(&self) -> Result<Graph> {
        Ok(Graph::new())
    }

    fn get_subject_graph(&self, subject: &Term) -> Result<Graph> {
        Err(TripleStoreError::SubjectNotFound(subject.canonical_str().to_string()))
    }

    fn query(&self, _sparql: &str) -> Result<ResultSet> {
        Ok(ResultSet::Boolean(true))
    }

    fn query_view(&self, view: &str, _sparql: &str) -> Result<ResultSet> {
        Err(TripleStoreError::ViewNotFound(view.to_string()))
    }

    fn create_graph(&self, iri: &str) -> Result<()> {
        self.record(format!("create_graph({})", iri));
        Ok(())
    }

    fn clear_graph(&self, iri: Option<&str>) -> Result<()> {
        self.record(format!("clear_graph({:?})", iri));
        Ok(())
    }

    fn drop_graph(&self, iri: &str) -> Result<()> {
        self.record(format!("drop_graph({})", iri));
        Ok(())
    }

    fn list_graphs(&self) -> Result<Vec<String>> {
        self.record("list_graphs".to_string());
        Ok(vec!["http://example.org/graphs/entities".to_string()])
    }
}

fn sample_triple() -> Triple {
    Triple::new(
        Term::iri("http://example.org/s"),
        Term::iri("http://example.org/p"),
        Term::literal("o"),
    )
}

fn graph_of(triples: Vec<Triple>) -> Graph {
    triples.into_iter().collect()
}

fn bare_config(dir: &TempDir) -> TripleStoreConfig {
    let mut config = TripleStoreConfig::at(dir.path());
    config.bootstrap_internal_schema = false;
    config
}

fn service_with(bus: Arc<dyn MessageBus>, config: &TripleStoreConfig) -> TripleStoreService {
    TripleStoreService::open(config, Some(bus)).unwrap()
}

/// Test the default-graph routing key, topic and payload are exact
#[test]
fn test_insert_publishes_exact_routing_key() {
    let dir = TempDir::new().unwrap();
    let bus = Arc::new(RecordingBus::default());
    let service = service_with(bus.clone(), &bare_config(&dir));

    service
        .insert(&graph_of(vec![sample_triple()]), &GraphName::Default)
        .unwrap();

    let published = bus.published.lock().clone();
    assert_eq!(
        published,
        vec![(
            "triple_store".to_string(),
            format!("ts.insert.g.default.s.{}.p.{}.o.{}", H_S, H_P, H_O),
            b"<http://example.org/s> <http://example.org/p> \"o\" .\n".to_vec(),
        )]
    );
}

/// Test a named graph hashes into the graph segment
#[test]
fn test_named_graph_routing_key() {
    let dir = TempDir::new().unwrap();
    let bus = Arc::new(RecordingBus::default());
    let service = service_with(bus.clone(), &bare_config(&dir));

    service
        .insert(
            &graph_of(vec![sample_triple()]),
            &GraphName::named("http://example.org/graphs/entities"),
        )
        .unwrap();
    service
        .remove(
            &graph_of(vec![sample_triple()]),
            &GraphName::named("http://example.org/graphs/entities"),
        )
        .unwrap();

    let keys: Vec<String> = bus.published.lock().iter().map(|p| p.1.clone()).collect();
    assert_eq!(
        keys,
        vec![
            format!("ts.insert.g.{}.s.{}.p.{}.o.{}", H_ENTITIES, H_S, H_P, H_O),
            format!("ts.delete.g.{}.s.{}.p.{}.o.{}", H_ENTITIES, H_S, H_P, H_O),
        ]
    );
}

/// Test the wildcard subscription pattern handed to the bus
#[test]
fn test_wildcard_subscription_pattern() {
    let dir = TempDir::new().unwrap();
    let bus = Arc::new(RecordingBus::default());
    let service = service_with(bus.clone(), &bare_config(&dir));

    let handle = service
        .subscribe(
            &SubscriptionFilter::new(TriplePattern::rdf_type()),
            Arc::new(|_: &[u8]| {}),
        )
        .unwrap();

    let expected = format!("ts.*.g.*.s.*.p.{}.o.*", H_TYPE);
    assert_eq!(
        *bus.consumed.lock(),
        vec![("triple_store".to_string(), expected.clone())]
    );
    assert_eq!(handle.pattern(), expected);
    assert_eq!(handle.topic(), "triple_store");
}

/// Test delivery and revocation through the in-memory bus
#[test]
fn test_subscribe_and_unsubscribe() {
    let dir = TempDir::new().unwrap();
    let bus = Arc::new(InMemoryBus::new());
    let service = service_with(bus.clone(), &bare_config(&dir));

    let received: Arc<Mutex<Vec<Vec<u8>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let filter = SubscriptionFilter::new(
        TriplePattern::any().with_predicate(Term::iri("http://example.org/p")),
    )
    .kind(EventKind::Insert);
    let handle = service
        .subscribe(&filter, Arc::new(move |payload: &[u8]| sink.lock().push(payload.to_vec())))
        .unwrap();

    service
        .insert(&graph_of(vec![sample_triple()]), &GraphName::Default)
        .unwrap();
    service
        .remove(&graph_of(vec![sample_triple()]), &GraphName::Default)
        .unwrap();
    service
        .insert(
            &graph_of(vec![Triple::new(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/other"),
                Term::literal("x"),
            )]),
            &GraphName::Default,
        )
        .unwrap();
    assert_eq!(
        *received.lock(),
        vec![b"<http://example.org/s> <http://example.org/p> \"o\" .\n".to_vec()]
    );

    service.unsubscribe(&handle).unwrap();
    service
        .insert(&graph_of(vec![sample_triple()]), &GraphName::Default)
        .unwrap();
    assert_eq!(received.lock().len(), 1);
    assert_eq!(bus.consumer_count(), 0);

    assert!(matches!(
        service.unsubscribe(&handle),
        Err(TripleStoreError::SubscriptionNotFound(_))
    ));
}

/// Test subscribing without a bus is an error and mutations still work
#[test]
fn test_without_bus() {
    let dir = TempDir::new().unwrap();
    let service = TripleStoreService::open(&bare_config(&dir), None).unwrap();

    service
        .insert(&graph_of(vec![sample_triple()]), &GraphName::Default)
        .unwrap();
    assert_eq!(service.get().unwrap().len(), 1);
    assert!(matches!(
        service.subscribe(&SubscriptionFilter::default(), Arc::new(|_: &[u8]| {})),
        Err(TripleStoreError::Bus(_))
    ));
}

/// Test publish failures never roll back the write
#[test]
fn test_publish_failure_policies() {
    let dir = TempDir::new().unwrap();
    let service = service_with(Arc::new(RecordingBus::failing()), &bare_config(&dir));
    service
        .insert(&graph_of(vec![sample_triple()]), &GraphName::Default)
        .unwrap();
    assert_eq!(service.get().unwrap().len(), 1);

    let dir = TempDir::new().unwrap();
    let mut config = bare_config(&dir);
    config.publish_failure = PublishFailurePolicy::Fail;
    let service = service_with(Arc::new(RecordingBus::failing()), &config);
    assert!(matches!(
        service.insert(&graph_of(vec![sample_triple()]), &GraphName::Default),
        Err(TripleStoreError::Bus(_))
    ));
    assert_eq!(
        service
            .get_subject_graph(&Term::iri("http://example.org/s"))
            .unwrap()
            .len(),
        1
    );
}

/// Test graph management is delegated verbatim
#[test]
fn test_graph_management_delegation() {
    let adapter = Arc::new(RecordingAdapter::default());
    let mut config = TripleStoreConfig::default();
    config.bootstrap_internal_schema = false;
    let service = TripleStoreService::new(adapter.clone(), None, &config).unwrap();

    service.create_graph("http://Example.org/Graphs/Entities/").unwrap();
    service
        .clear_graph(Some("http://Example.org/Graphs/Entities/"))
        .unwrap();
    service.clear_graph(None).unwrap();
    service.drop_graph("http://Example.org/Graphs/Entities/").unwrap();
    assert_eq!(
        service.list_graphs().unwrap(),
        vec!["http://example.org/graphs/entities"]
    );

    assert_eq!(
        adapter.calls(),
        vec![
            "create_graph(http://Example.org/Graphs/Entities/)",
            "clear_graph(Some(\"http://Example.org/Graphs/Entities/\"))",
            "clear_graph(None)",
            "drop_graph(http://Example.org/Graphs/Entities/)",
            "list_graphs",
        ]
    );
}

/// Test each mutation reaches the adapter once, then every triple is published
#[test]
fn test_mutation_delegated_then_published() {
    let adapter = Arc::new(RecordingAdapter::default());
    let bus = Arc::new(RecordingBus::default());
    let mut config = TripleStoreConfig::default();
    config.bootstrap_internal_schema = false;
    let service = TripleStoreService::new(adapter.clone(), Some(bus.clone()), &config).unwrap();

    let typed = Triple::new(
        Term::iri("http://example.org/alice"),
        Term::iri(RDF_TYPE),
        Term::iri("http://example.org/Person"),
    );
    service
        .insert(&graph_of(vec![typed.clone(), sample_triple()]), &GraphName::Default)
        .unwrap();
    service
        .remove(&graph_of(vec![typed]), &GraphName::Default)
        .unwrap();

    assert_eq!(adapter.calls(), vec!["insert(2, default)", "remove(1, default)"]);
    let kinds: Vec<String> = bus
        .published
        .lock()
        .iter()
        .map(|(_, key, _)| key.split('.').nth(1).unwrap_or_default().to_string())
        .collect();
    assert_eq!(kinds, vec!["insert", "insert", "delete"]);
}

/// Test views are materialized end to end
#[cfg(unix)]
#[test]
fn test_views_through_service() {
    let dir = TempDir::new().unwrap();
    let service = TripleStoreService::open(&bare_config(&dir), None).unwrap();

    service
        .insert(
            &graph_of(vec![Triple::new(
                Term::iri("http://example.org/Person"),
                Term::iri(RDFS_LABEL),
                Term::literal("Person"),
            )]),
            &GraphName::Default,
        )
        .unwrap();
    let typed = Triple::new(
        Term::iri("http://example.org/alice"),
        Term::iri(RDF_TYPE),
        Term::iri("http://example.org/Person"),
    );
    service
        .insert(&graph_of(vec![typed.clone()]), &GraphName::Default)
        .unwrap();

    let rows = service
        .query_view("Person_Person", "SELECT ?s WHERE { ?s a ?type }")
        .unwrap();
    assert_eq!(
        rows.solutions().unwrap().column("s"),
        vec![&Term::iri("http://example.org/alice")]
    );

    service
        .remove(&graph_of(vec![typed]), &GraphName::Default)
        .unwrap();
    assert_eq!(
        fs::read_dir(dir.path().join("views").join("Person_Person"))
            .unwrap()
            .count(),
        0
    );
}

/// Test the internal ontology is inserted and published on startup
#[test]
fn test_internal_schema_bootstrap() {
    let dir = TempDir::new().unwrap();
    let bus = Arc::new(RecordingBus::default());
    let service = service_with(bus.clone(), &TripleStoreConfig::at(dir.path()));

    let schema = service
        .get_subject_graph(&Term::iri(INTERNAL_SCHEMA))
        .unwrap();
    assert_eq!(
        schema.value(&Term::iri(INTERNAL_SCHEMA), &Term::iri(RDFS_LABEL)),
        Some(&Term::literal("Schema"))
    );
    assert_eq!(bus.published.lock().len(), service.get().unwrap().len());
}

/// Test schema loading, change tracking and the schema graph
#[test]
fn test_schema_change_tracking() {
    let dir = TempDir::new().unwrap();
    let service = TripleStoreService::open(&TripleStoreConfig::at(dir.path().join("store")), None)
        .unwrap();
    let schema_path = dir.path().join("people.ttl");
    let label = |l: &str| Term::literal(l);
    let person = Term::iri("http://example.org/Person");

    fs::write(
        &schema_path,
        "@prefix ex: <http://example.org/> .\n\
         @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
         ex:Person a owl:Class ; rdfs:label \"Person\" .\n",
    )
    .unwrap();

    match service.load_schema(&schema_path).unwrap() {
        SchemaLoad::Loaded { triples, .. } => assert_eq!(triples, 2),
        other => panic!("expected Loaded, got {:?}", other),
    }
    assert_eq!(service.load_schema(&schema_path).unwrap(), SchemaLoad::Unchanged);

    fs::write(
        &schema_path,
        "@prefix ex: <http://example.org/> .\n\
         @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
         @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
         ex:Person a owl:Class ; rdfs:label \"Human\" .\n",
    )
    .unwrap();
    assert_eq!(
        service.load_schema(&schema_path).unwrap(),
        SchemaLoad::Updated { added: 1, removed: 1 }
    );

    let stored = service.get_subject_graph(&person).unwrap();
    assert!(stored.contains(&Triple::new(person.clone(), Term::iri(RDFS_LABEL), label("Human"))));
    assert!(!stored.contains(&Triple::new(person.clone(), Term::iri(RDFS_LABEL), label("Person"))));

    let hashes = service
        .query(&format!("SELECT ?h WHERE {{ ?s <{}> ?h }}", INTERNAL_HASH))
        .unwrap();
    assert_eq!(hashes.len(), 1);

    let schema_graph = service.get_schema_graph().unwrap();
    assert_eq!(schema_graph.len(), 2);
    assert_eq!(
        schema_graph.value(&person, &Term::iri(RDFS_LABEL)),
        Some(&label("Human"))
    );
    assert_eq!(
        schema_graph.namespaces().get("ex").map(String::as_str),
        Some("http://example.org/")
    );
}

/// Test a failing schema does not stop the others
#[test]
fn test_load_schemas_skips_failures() {
    let dir = TempDir::new().unwrap();
    let service = TripleStoreService::open(&bare_config(&dir), None).unwrap();
    let good = dir.path().join("good.ttl");
    let bad = dir.path().join("bad.ttl");
    fs::write(&good, "<http://example.org/A> <http://example.org/p> \"a\" .\n").unwrap();
    fs::write(&bad, "<http://example.org/B> <http://example.org/p> ").unwrap();
    let missing = dir.path().join("missing.ttl");

    let loaded = service.load_schemas(&[&bad, &good, &missing]);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].0, good);
}
