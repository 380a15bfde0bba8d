//! Subject attribute extraction strategies

use crate::graph::Graph;
use crate::naming::{activity_id, IdentifierMapper};
use crate::types::{Iri, QName, SubjectRecord, Term};
use crate::vocab;
use std::collections::BTreeMap;

/// Builds a [`SubjectRecord`] for one subject of a graph
pub trait SubjectExtractor {
    /// Record for `subject`, or `None` when it is not an identified resource
    fn extract(&self, graph: &Graph, subject: &Term) -> Option<SubjectRecord>;
}

/// Export mode, selecting the extraction strategy and the view bootstrap fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Single graph, generic resources
    Resource,
    /// Merged activity graphs
    Activity,
}

impl ExportMode {
    pub fn extractor(&self) -> Box<dyn SubjectExtractor> {
        match self {
            ExportMode::Resource => Box::new(ResourceExtractor),
            ExportMode::Activity => Box::new(ActivityExtractor),
        }
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportMode::Resource => write!(f, "resource"),
            ExportMode::Activity => write!(f, "activity"),
        }
    }
}

/// Generic strategy: the id is the subject's local name
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceExtractor;

impl SubjectExtractor for ResourceExtractor {
    fn extract(&self, graph: &Graph, subject: &Term) -> Option<SubjectRecord> {
        let iri = subject.as_iri()?;
        let qname = IdentifierMapper::new(graph.namespaces()).qualify(iri);
        let id = qname.local.clone();
        Some(build_record(graph, iri, &qname, id, None))
    }
}

/// Activity strategy: the id folds in the last segment of the subject's namespace,
/// and the record links back to the source resource
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityExtractor;

impl SubjectExtractor for ActivityExtractor {
    fn extract(&self, graph: &Graph, subject: &Term) -> Option<SubjectRecord> {
        let iri = subject.as_iri()?;
        let qname = IdentifierMapper::new(graph.namespaces()).qualify(iri);
        let id = activity_id(&qname.namespace, &qname.local);
        Some(build_record(graph, iri, &qname, id, Some(iri.to_string())))
    }
}

fn build_record(
    graph: &Graph,
    iri: &Iri,
    qname: &QName,
    id: String,
    back_reference: Option<String>,
) -> SubjectRecord {
    let mapper = IdentifierMapper::new(graph.namespaces());
    let subject = Term::Iri(iri.clone());
    let uri = qname.curie_or(iri.as_str());
    let label = graph
        .value(&subject, &Iri::new(vocab::RDFS_LABEL))
        .map(Term::to_string)
        .unwrap_or_else(|| format!("Resource {}", uri));
    let comment = graph
        .value(&subject, &Iri::new(vocab::RDFS_COMMENT))
        .map(Term::to_string)
        .unwrap_or_else(|| format!("Resource {} ({})", uri, iri));

    // Last value in enumeration order wins for repeated properties
    let rdf_type = Iri::new(vocab::RDF_TYPE);
    let mut attributes = BTreeMap::new();
    for (predicate, object) in graph.predicate_objects(&subject) {
        if *predicate == rdf_type {
            continue;
        }
        let key = mapper.property_key(predicate);
        attributes.insert(key.property_key, object.to_string());
    }

    SubjectRecord {
        uri,
        id,
        label,
        comment,
        back_reference,
        attributes,
    }
}
