//! Export passes over a graph
//!
//! A pass classifies the graph's types, then writes schema documents, entity
//! documents, or both. Each pass regenerates its documents from scratch.

use crate::classify::TypeClassifier;
use crate::errors::{CoreResult, FetchResult};
use crate::extract::ExportMode;
use crate::graph::Graph;
use crate::instance::InstanceExporter;
use crate::schema::SchemaExporter;
use crate::sink::DocumentSink;
use crate::traits::GraphSource;
use crate::types::{Iri, Term};
use crate::vocab;
use serde::Serialize;
use tracing::{debug, info};

/// Counts of documents written by a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub types: usize,
    pub lists: usize,
    pub views: usize,
    pub fields: usize,
    pub entities: usize,
}

impl ExportSummary {
    pub fn total(&self) -> usize {
        self.types + self.lists + self.views + self.fields + self.entities
    }
}

/// Which documents a pass writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Metadata,
    Subjects,
    All,
}

impl ExportScope {
    fn metadata(&self) -> bool {
        matches!(self, ExportScope::Metadata | ExportScope::All)
    }

    fn subjects(&self) -> bool {
        matches!(self, ExportScope::Subjects | ExportScope::All)
    }
}

/// Runs export passes over one graph
pub struct Exporter<'g> {
    graph: &'g Graph,
    mode: ExportMode,
    classifier: TypeClassifier,
}

impl<'g> Exporter<'g> {
    pub fn new(graph: &'g Graph, mode: ExportMode) -> Self {
        Self {
            graph,
            mode,
            classifier: TypeClassifier::default(),
        }
    }

    /// Type, list, view and field documents for every classified type
    pub fn export_metadata(&self, sink: &mut dyn DocumentSink) -> CoreResult<ExportSummary> {
        self.export(ExportScope::Metadata, sink)
    }

    /// Entity documents for every subject of every classified type
    pub fn export_subjects(&self, sink: &mut dyn DocumentSink) -> CoreResult<ExportSummary> {
        self.export(ExportScope::Subjects, sink)
    }

    /// Metadata followed by subjects
    pub fn export_all(&self, sink: &mut dyn DocumentSink) -> CoreResult<ExportSummary> {
        self.export(ExportScope::All, sink)
    }

    pub fn export(&self, scope: ExportScope, sink: &mut dyn DocumentSink) -> CoreResult<ExportSummary> {
        let descriptors = self.classifier.describe_types(self.graph);
        let mut summary = ExportSummary::default();

        if scope.metadata() {
            let mut schema = SchemaExporter::new(self.mode);
            for (type_iri, td) in &descriptors {
                info!("Type: {}", type_iri);
                schema.export_type(td, sink)?;
                schema.export_list(td, sink)?;
                summary.fields += schema.export_view(self.graph, type_iri, td, sink)?;
                summary.types += 1;
                summary.lists += 1;
                summary.views += 1;
            }
        }

        if scope.subjects() {
            let extractor = self.mode.extractor();
            let instances = InstanceExporter::new(extractor.as_ref());
            for (type_iri, td) in &descriptors {
                summary.entities += instances.export_subjects(self.graph, type_iri, td, sink)?;
            }
        }

        info!(
            "Exported {} documents ({} mode): {} types, {} fields, {} entities",
            summary.total(),
            self.mode,
            summary.types,
            summary.fields,
            summary.entities
        );
        Ok(summary)
    }
}

/// Fetch a single graph
pub async fn load(source: &dyn GraphSource, location: &str) -> FetchResult<Graph> {
    info!("Reading graph at {}", location);
    let graph = source.fetch(location).await?;
    debug!("Read {} triples from {}", graph.len(), location);
    Ok(graph)
}

/// Fetch a listing graph and merge into it the graph of every resource it
/// asserts to be of `activity_type`, in subject order.
///
/// The first failed fetch aborts the whole load.
pub async fn load_multiple(
    source: &dyn GraphSource,
    listing: &str,
    activity_type: &Iri,
) -> FetchResult<Graph> {
    let mut graph = load(source, listing).await?;
    let activities: Vec<Iri> = graph
        .subjects_with(&Iri::new(vocab::RDF_TYPE), &Term::Iri(activity_type.clone()))
        .into_iter()
        .filter_map(|subject| subject.as_iri().cloned())
        .collect();
    info!("Listing {} references {} activities", listing, activities.len());

    for activity in &activities {
        info!("Reading activity {}", activity);
        let before = graph.len();
        let read = source.fetch_into(activity.as_str(), &mut graph).await?;
        debug!(
            "Read {} triples from {}, {} new after merge",
            read,
            activity,
            graph.len() - before
        );
    }
    Ok(graph)
}

/// Batch export: load and merge all listed activities, then export everything
/// in activity mode
pub async fn export_multiple(
    source: &dyn GraphSource,
    listing: &str,
    activity_type: &Iri,
    sink: &mut dyn DocumentSink,
) -> CoreResult<ExportSummary> {
    let graph = load_multiple(source, listing, activity_type).await?;
    Exporter::new(&graph, ExportMode::Activity).export_all(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CoreError, FetchError};
    use crate::sink::{DocumentPath, MemorySink, TreeLayout};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn ex(local: &str) -> Iri {
        Iri::new(format!("http://example.org/{}", local))
    }

    fn scenario() -> Graph {
        let mut graph = Graph::new();
        graph.bind("ex", "http://example.org/");
        graph.add(ex("Foo"), Iri::new(vocab::RDF_TYPE), ex("Bar"));
        graph.add(ex("Bar"), Iri::new(vocab::RDFS_LABEL), Term::literal("Bar Label"));
        graph.add(ex("Foo"), ex("name"), Term::literal("hello"));
        graph
    }

    /// Serves prepared graphs; locations without one fail with 404
    struct FakeSource {
        graphs: HashMap<String, Graph>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GraphSource for FakeSource {
        async fn fetch_into(&self, location: &str, into: &mut Graph) -> FetchResult<usize> {
            self.requested.lock().unwrap().push(location.to_string());
            match self.graphs.get(location) {
                Some(graph) => {
                    into.merge(graph.clone());
                    Ok(graph.len())
                }
                None => Err(FetchError::Status {
                    location: location.to_string(),
                    status: 404,
                    reason: "Not Found".to_string(),
                }),
            }
        }
    }

    fn activity_graph(activity: &Iri, value: &str) -> Graph {
        let mut graph = Graph::new();
        graph.bind("ex", "http://example.org/");
        graph.add(activity.clone(), Iri::new(vocab::RDF_TYPE), Iri::new(vocab::PROV_ACTIVITY));
        graph.add(activity.clone(), ex("output"), Term::literal(value));
        graph
    }

    fn batch_source(failing: Option<usize>) -> (FakeSource, Vec<Iri>) {
        let activities: Vec<Iri> = (1..=3)
            .map(|n| Iri::new(format!("http://calma.example/run-{}/act", n)))
            .collect();
        let mut listing = Graph::new();
        for activity in &activities {
            listing.add(activity.clone(), Iri::new(vocab::RDF_TYPE), Iri::new(vocab::PROV_ACTIVITY));
        }
        let mut graphs = HashMap::new();
        graphs.insert("http://calma.example/listing".to_string(), listing);
        for (index, activity) in activities.iter().enumerate() {
            if Some(index) != failing {
                graphs.insert(
                    activity.to_string(),
                    activity_graph(activity, &format!("out{}", index)),
                );
            }
        }
        let source = FakeSource {
            graphs,
            requested: Mutex::new(Vec::new()),
        };
        (source, activities)
    }

    #[test]
    fn test_scenario_export_all() {
        let graph = scenario();
        let mut sink = MemorySink::new(TreeLayout::default());
        let summary = Exporter::new(&graph, ExportMode::Resource)
            .export_all(&mut sink)
            .unwrap();
        assert_eq!(
            summary,
            ExportSummary {
                types: 1,
                lists: 1,
                views: 1,
                fields: 1,
                entities: 1
            }
        );

        let td = sink.get_json(&DocumentPath::Type("Bar".into())).unwrap();
        assert_eq!(td["annal:id"], json!("Bar"));
        assert_eq!(td["rdfs:label"], json!("Bar Label"));

        let view = sink.get_json(&DocumentPath::View("Bar_view".into())).unwrap();
        let fields = view["annal:view_fields"].as_array().unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[4]["annal:field_id"], json!("name_field"));
        let field = sink.get_json(&DocumentPath::Field("name_field".into())).unwrap();
        assert_eq!(field["annal:property_uri"], json!("ex:name"));

        let entity = sink
            .get_json(&DocumentPath::Entity {
                type_id: "Bar".into(),
                subject_id: "Foo".into(),
            })
            .unwrap();
        assert_eq!(entity["ex:name"], json!("hello"));
        assert_eq!(entity["annal:type"], json!("ex:Bar"));
        assert_eq!(entity["annal:type_id"], json!("Bar"));
    }

    #[test]
    fn test_metadata_and_subjects_partition_export_all() {
        let graph = scenario();
        let mut all = MemorySink::new(TreeLayout::default());
        Exporter::new(&graph, ExportMode::Resource).export_all(&mut all).unwrap();

        let mut split = MemorySink::new(TreeLayout::default());
        let exporter = Exporter::new(&graph, ExportMode::Resource);
        let metadata = exporter.export_metadata(&mut split).unwrap();
        let subjects = exporter.export_subjects(&mut split).unwrap();
        assert_eq!(metadata.entities, 0);
        assert_eq!(subjects.types, 0);
        assert_eq!(all.documents(), split.documents());
    }

    #[test]
    fn test_export_is_deterministic() {
        let graph = scenario();
        let mut first = MemorySink::new(TreeLayout::default());
        let mut second = MemorySink::new(TreeLayout::default());
        Exporter::new(&graph, ExportMode::Resource).export_all(&mut first).unwrap();
        Exporter::new(&graph, ExportMode::Resource).export_all(&mut second).unwrap();
        assert_eq!(first.documents(), second.documents());
    }

    #[test]
    fn test_added_triple_changes_only_affected_documents() {
        let graph = scenario();
        let mut before = MemorySink::new(TreeLayout::default());
        Exporter::new(&graph, ExportMode::Resource).export_all(&mut before).unwrap();

        let mut changed = graph.clone();
        changed.add(ex("Other"), Iri::new(vocab::RDF_TYPE), ex("Baz"));
        let mut after = MemorySink::new(TreeLayout::default());
        Exporter::new(&changed, ExportMode::Resource).export_all(&mut after).unwrap();

        for (path, text) in before.documents() {
            assert_eq!(after.documents().get(path), Some(text));
        }
        let new_paths: Vec<_> = after
            .documents()
            .keys()
            .filter(|p| !before.documents().contains_key(*p))
            .collect();
        assert_eq!(new_paths.len(), 4);
        assert!(new_paths.iter().all(|p| p.to_string_lossy().contains("Baz")
            || p.to_string_lossy().contains("Other")));
    }

    #[test]
    fn test_same_local_names_get_distinct_paths() {
        let rdf_type = Iri::new(vocab::RDF_TYPE);
        let other = |local: &str| Iri::new(format!("http://other.example/{}", local));
        let mut graph = Graph::new();
        graph.bind("ex", "http://example.org/");
        graph.bind("other", "http://other.example/");
        graph.add(ex("Foo"), rdf_type.clone(), ex("Bar"));
        graph.add(ex("Foo"), ex("name"), Term::literal("first"));
        graph.add(other("Foo"), rdf_type.clone(), ex("Bar"));
        graph.add(other("Foo"), other("name"), Term::literal("second"));
        graph.add(ex("x"), rdf_type, other("Bar"));

        let mut sink = MemorySink::new(TreeLayout::default());
        let summary = Exporter::new(&graph, ExportMode::Resource)
            .export_all(&mut sink)
            .unwrap();
        assert_eq!(
            summary,
            ExportSummary {
                types: 2,
                lists: 2,
                views: 2,
                fields: 2,
                entities: 3
            }
        );
        // Every counted document landed at its own path
        assert_eq!(summary.total(), 11);
        assert_eq!(sink.writes(), summary.total());
        assert_eq!(sink.documents().len(), summary.total());

        let td = sink.get_json(&DocumentPath::Type("other_Bar".into())).unwrap();
        assert_eq!(td["annal:uri"], json!("other:Bar"));
        assert_eq!(td["annal:type_list"], json!("other_Bar_list"));
        assert_eq!(td["annal:type_view"], json!("other_Bar_view"));
        let td = sink.get_json(&DocumentPath::Type("Bar".into())).unwrap();
        assert_eq!(td["annal:uri"], json!("ex:Bar"));

        let second = sink
            .get_json(&DocumentPath::Entity {
                type_id: "Bar".into(),
                subject_id: "other_Foo".into(),
            })
            .unwrap();
        assert_eq!(second["annal:id"], json!("other_Foo"));
        assert_eq!(second["other:name"], json!("second"));
        let first = sink
            .get_json(&DocumentPath::Entity {
                type_id: "Bar".into(),
                subject_id: "Foo".into(),
            })
            .unwrap();
        assert_eq!(first["ex:name"], json!("first"));
        let x = sink
            .get_json(&DocumentPath::Entity {
                type_id: "other_Bar".into(),
                subject_id: "x".into(),
            })
            .unwrap();
        assert_eq!(x["annal:type_id"], json!("other_Bar"));

        let view = sink.get_json(&DocumentPath::View("Bar_view".into())).unwrap();
        let ids: Vec<&str> = view["annal:view_fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["annal:field_id"].as_str())
            .collect();
        assert_eq!(&ids[4..], &["name_field", "other_name_field"]);
        let field = sink.get_json(&DocumentPath::Field("other_name_field".into())).unwrap();
        assert_eq!(field["annal:property_uri"], json!("other:name"));
        let field = sink.get_json(&DocumentPath::Field("name_field".into())).unwrap();
        assert_eq!(field["annal:property_uri"], json!("ex:name"));
    }

    #[tokio::test]
    async fn test_load_multiple_merges_without_duplicates() {
        let (source, _) = batch_source(None);
        let graph = load_multiple(
            &source,
            "http://calma.example/listing",
            &Iri::new(vocab::PROV_ACTIVITY),
        )
        .await
        .unwrap();
        // Each activity repeats its listing type triple and adds one output
        assert_eq!(graph.len(), 6);
    }

    #[tokio::test]
    async fn test_export_multiple_merges_activities() {
        let (source, activities) = batch_source(None);
        let mut sink = MemorySink::new(TreeLayout::default());
        let summary = export_multiple(
            &source,
            "http://calma.example/listing",
            &Iri::new(vocab::PROV_ACTIVITY),
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(summary.entities, 3);
        let requested = source.requested.lock().unwrap().clone();
        assert_eq!(requested[0], "http://calma.example/listing");
        assert_eq!(&requested[1..], &activities.iter().map(Iri::to_string).collect::<Vec<_>>()[..]);

        let entity = sink
            .get_json(&DocumentPath::Entity {
                type_id: "Activity".into(),
                subject_id: "run_2_act".into(),
            })
            .unwrap();
        assert_eq!(entity["ex:output"], json!("out1"));
        assert_eq!(entity["rdfs:seeAlso"], json!("http://calma.example/run-2/act"));
    }

    #[tokio::test]
    async fn test_export_multiple_aborts_on_first_failure() {
        let (source, _) = batch_source(Some(1));
        let mut sink = MemorySink::new(TreeLayout::default());
        let result = export_multiple(
            &source,
            "http://calma.example/listing",
            &Iri::new(vocab::PROV_ACTIVITY),
            &mut sink,
        )
        .await;

        match result {
            Err(CoreError::Fetch(FetchError::Status { status, location, .. })) => {
                assert_eq!(status, 404);
                assert_eq!(location, "http://calma.example/run-2/act");
            }
            other => panic!("expected fetch failure, got {:?}", other),
        }
        // The third activity is never requested and nothing is written
        assert_eq!(source.requested.lock().unwrap().len(), 3);
        assert!(sink.documents().is_empty());
    }

    #[tokio::test]
    async fn test_listing_failure_aborts() {
        let (source, _) = batch_source(None);
        let result = load_multiple(
            &source,
            "http://calma.example/missing",
            &Iri::new(vocab::PROV_ACTIVITY),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    }
}
