//! Entity record export

use crate::errors::SinkResult;
use crate::extract::SubjectExtractor;
use crate::graph::Graph;
use crate::naming::{IdRegistry, IdentifierMapper};
use crate::sink::{DocumentPath, DocumentSink};
use crate::types::{Iri, SubjectRecord, Term, TypeDescriptor};
use crate::vocab;
use serde_json::{Map, Value};
use tracing::info;

/// Entity document for `record` as an instance of `td`
pub fn entity_document(record: &SubjectRecord, td: &TypeDescriptor) -> Value {
    let mut document = Map::new();
    document.insert("@id".into(), Value::from("./"));
    document.insert("@type".into(), Value::from(vec![td.uri.clone()]));
    document.insert("annal:type".into(), Value::from(td.uri.clone()));
    document.insert("annal:type_id".into(), Value::from(td.id.clone()));
    document.insert("annal:id".into(), Value::from(record.id.clone()));
    document.insert("annal:uri".into(), Value::from(record.uri.clone()));
    document.insert("rdfs:label".into(), Value::from(record.label.clone()));
    document.insert("rdfs:comment".into(), Value::from(record.comment.clone()));
    for (key, value) in &record.attributes {
        document.insert(key.clone(), Value::from(value.clone()));
    }
    if let Some(source) = &record.back_reference {
        document.insert(vocab::SEE_ALSO_KEY.into(), Value::from(source.clone()));
    }
    // Type linkage is authoritative over any same-named graph property
    document.insert("@type".into(), Value::from(vec![td.uri.clone()]));
    document.insert("annal:type".into(), Value::from(td.uri.clone()));
    document.insert("annal:type_id".into(), Value::from(td.id.clone()));
    Value::Object(document)
}

/// Writes one entity document per identified subject of a type
pub struct InstanceExporter<'a> {
    extractor: &'a dyn SubjectExtractor,
}

impl<'a> InstanceExporter<'a> {
    pub fn new(extractor: &'a dyn SubjectExtractor) -> Self {
        Self { extractor }
    }

    /// Export every subject of `type_iri`. Subjects that are not identified
    /// resources are skipped; subjects whose ids clash within the type get
    /// prefix-qualified ids. Returns the number of documents written.
    pub fn export_subjects(
        &self,
        graph: &Graph,
        type_iri: &Iri,
        td: &TypeDescriptor,
        sink: &mut dyn DocumentSink,
    ) -> SinkResult<usize> {
        let rdf_type = Iri::new(vocab::RDF_TYPE);
        let mapper = IdentifierMapper::new(graph.namespaces());
        let mut ids = IdRegistry::new();
        let mut written = 0;
        for subject in graph.subjects_with(&rdf_type, &Term::Iri(type_iri.clone())) {
            let Some(mut record) = self.extractor.extract(graph, subject) else {
                continue;
            };
            if let Some(iri) = subject.as_iri() {
                let prefix = mapper.qualify(iri).prefix;
                record.id = ids.claim(&record.id, iri.as_str(), prefix.as_deref());
            }
            info!("  Subject {}/{}", td.id, record.id);
            let path = DocumentPath::Entity {
                type_id: td.id.clone(),
                subject_id: record.id.clone(),
            };
            sink.write(&path, &entity_document(&record, td))?;
            written += 1;
        }
        Ok(written)
    }
}
