//! Type, list, view and field descriptor export

use crate::errors::{SinkError, SinkResult};
use crate::extract::ExportMode;
use crate::graph::Graph;
use crate::naming::{IdRegistry, IdentifierMapper};
use crate::sink::{DocumentPath, DocumentSink};
use crate::types::{
    FieldDescriptor, FieldPlacement, Iri, ListDescriptor, PropertyKey, RenderType, Term,
    TypeDescriptor, ViewDescriptor,
};
use crate::vocab;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

const DISCOVERED_PLACEMENT: &str = "small:0,12";

/// Field id of the link-out field in activity views
pub const SEE_ALSO_FIELD: &str = "Entity_see_also";

/// Fields every view starts with, before any discovered field
pub fn bootstrap_fields(mode: ExportMode) -> Vec<FieldPlacement> {
    let mut fields = vec![
        FieldPlacement::new("Entity_id", "small:0,12;medium:0,6"),
        FieldPlacement::new("Entity_type", "small:0,12;medium:6,6"),
    ];
    if mode == ExportMode::Activity {
        fields.push(FieldPlacement::new(SEE_ALSO_FIELD, DISCOVERED_PLACEMENT));
    }
    fields.push(FieldPlacement::new("Entity_label", "small:0,12"));
    fields.push(FieldPlacement::new("Entity_comment", "small:0,12"));
    fields
}

/// Descriptor of the link-out field, rendered as a link
pub fn see_also_field() -> FieldDescriptor {
    FieldDescriptor {
        field_id: SEE_ALSO_FIELD.to_string(),
        label: "See also".to_string(),
        comment: format!("Link to the source resource ({})", vocab::SEE_ALSO_KEY),
        render_type: RenderType::URILink,
        property_key: vocab::SEE_ALSO_KEY.to_string(),
        placement: DISCOVERED_PLACEMENT.to_string(),
    }
}

/// Properties in first-seen order, each kept once
#[derive(Debug, Default)]
struct DiscoveredFields {
    seen: HashSet<Iri>,
    ordered: Vec<(PropertyKey, Iri)>,
}

impl DiscoveredFields {
    fn insert(&mut self, key: PropertyKey, property: &Iri) -> bool {
        if !self.seen.insert(property.clone()) {
            return false;
        }
        self.ordered.push((key, property.clone()));
        true
    }
}

#[derive(Serialize)]
struct TypeDocument<'a> {
    #[serde(rename = "@id")]
    at_id: &'a str,
    #[serde(rename = "@type")]
    at_type: [&'a str; 1],
    #[serde(rename = "annal:type")]
    annal_type: &'a str,
    #[serde(rename = "annal:type_id")]
    type_id: &'a str,
    #[serde(rename = "annal:id")]
    id: &'a str,
    #[serde(rename = "annal:uri")]
    uri: &'a str,
    #[serde(rename = "rdfs:label")]
    label: &'a str,
    #[serde(rename = "rdfs:comment")]
    comment: &'a str,
    #[serde(rename = "annal:type_list")]
    type_list: &'a str,
    #[serde(rename = "annal:type_view")]
    type_view: &'a str,
}

#[derive(Serialize)]
struct ListDocument<'a> {
    #[serde(rename = "@id")]
    at_id: &'a str,
    #[serde(rename = "@type")]
    at_type: [&'a str; 1],
    #[serde(rename = "annal:type")]
    annal_type: &'a str,
    #[serde(rename = "annal:type_id")]
    type_id: &'a str,
    #[serde(rename = "annal:id")]
    id: &'a str,
    #[serde(rename = "rdfs:label")]
    label: &'a str,
    #[serde(rename = "rdfs:comment")]
    comment: &'a str,
    #[serde(rename = "annal:display_type")]
    display_type: &'a str,
    #[serde(rename = "annal:default_view")]
    default_view: &'a str,
    #[serde(rename = "annal:default_type")]
    default_type: &'a str,
    #[serde(rename = "annal:list_entity_selector")]
    entity_selector: &'a str,
    #[serde(rename = "annal:list_fields")]
    fields: &'a [FieldPlacement],
}

#[derive(Serialize)]
struct ViewDocument<'a> {
    #[serde(rename = "@id")]
    at_id: &'a str,
    #[serde(rename = "@type")]
    at_type: [&'a str; 1],
    #[serde(rename = "annal:type")]
    annal_type: &'a str,
    #[serde(rename = "annal:type_id")]
    type_id: &'a str,
    #[serde(rename = "annal:id")]
    id: &'a str,
    #[serde(rename = "rdfs:label")]
    label: &'a str,
    #[serde(rename = "rdfs:comment")]
    comment: &'a str,
    #[serde(rename = "annal:open_view")]
    open_view: bool,
    #[serde(rename = "annal:view_fields")]
    fields: &'a [FieldPlacement],
}

#[derive(Serialize)]
struct FieldDocument<'a> {
    #[serde(rename = "@id")]
    at_id: &'a str,
    #[serde(rename = "@type")]
    at_type: [&'a str; 1],
    #[serde(rename = "annal:type")]
    annal_type: &'a str,
    #[serde(rename = "annal:type_id")]
    type_id: &'a str,
    #[serde(rename = "annal:id")]
    id: &'a str,
    #[serde(rename = "rdfs:label")]
    label: &'a str,
    #[serde(rename = "rdfs:comment")]
    comment: &'a str,
    #[serde(rename = "annal:field_render_type")]
    render_type: String,
    #[serde(rename = "annal:field_value_type")]
    value_type: &'a str,
    #[serde(rename = "annal:placeholder")]
    placeholder: String,
    #[serde(rename = "annal:property_uri")]
    property_uri: &'a str,
    #[serde(rename = "annal:field_placement")]
    placement: &'a str,
    #[serde(rename = "annal:default_value")]
    default_value: &'a str,
}

fn to_document<T: Serialize>(document: &T) -> SinkResult<Value> {
    serde_json::to_value(document).map_err(|e| SinkError::Serialization(e.to_string()))
}

/// Writes the presentation schema of each classified type
#[derive(Debug)]
pub struct SchemaExporter {
    mode: ExportMode,
    /// Field ids of discovered properties, owned by absolute property identifier
    field_ids: IdRegistry,
    /// field id -> property key of every field document written so far
    registered_fields: BTreeMap<String, String>,
}

impl SchemaExporter {
    pub fn new(mode: ExportMode) -> Self {
        Self {
            mode,
            field_ids: IdRegistry::new(),
            registered_fields: BTreeMap::new(),
        }
    }

    /// Number of distinct field documents written
    pub fn field_count(&self) -> usize {
        self.registered_fields.len()
    }

    /// Export the type document for `td`
    pub fn export_type(&self, td: &TypeDescriptor, sink: &mut dyn DocumentSink) -> SinkResult<()> {
        let document = to_document(&TypeDocument {
            at_id: "./",
            at_type: ["annal:Type"],
            annal_type: "annal:Type",
            type_id: "_type",
            id: &td.id,
            uri: &td.uri,
            label: &td.label,
            comment: &td.comment,
            type_list: &td.list_name,
            type_view: &td.view_name,
        })?;
        sink.write(&DocumentPath::Type(td.id.clone()), &document)
    }

    /// List descriptor for `td`, showing id and label of each entity
    pub fn list_descriptor(td: &TypeDescriptor) -> ListDescriptor {
        ListDescriptor {
            id: td.list_name.clone(),
            label: format!("List {}", td.id),
            comment: format!("List of {} entities", td.id),
            default_view: td.view_name.clone(),
            default_type: td.id.clone(),
            entity_selector: format!("'{}' in [@type]", td.uri),
            fields: vec![
                FieldPlacement::new("Entity_id", "small:0,3"),
                FieldPlacement::new("Entity_label", "small:3,9"),
            ],
        }
    }

    /// Export the list document for `td`
    pub fn export_list(&self, td: &TypeDescriptor, sink: &mut dyn DocumentSink) -> SinkResult<()> {
        let ld = Self::list_descriptor(td);
        let document = to_document(&ListDocument {
            at_id: "./",
            at_type: ["annal:List"],
            annal_type: "annal:List",
            type_id: "_list",
            id: &ld.id,
            label: &ld.label,
            comment: &ld.comment,
            display_type: "List",
            default_view: &ld.default_view,
            default_type: &ld.default_type,
            entity_selector: &ld.entity_selector,
            fields: &ld.fields,
        })?;
        sink.write(&DocumentPath::List(ld.id.clone()), &document)
    }

    /// View descriptor for `type_iri`, plus a descriptor for each discovered field.
    ///
    /// Subjects of the type and their predicates are walked in sorted order, so
    /// discovered fields appear in first-seen order of that walk. A property
    /// keeps its field id across views; properties sharing a local name get
    /// prefix-qualified field ids (`other_name_field`).
    pub fn build_view(
        &mut self,
        graph: &Graph,
        type_iri: &Iri,
        td: &TypeDescriptor,
    ) -> (ViewDescriptor, Vec<FieldDescriptor>) {
        let mapper = IdentifierMapper::new(graph.namespaces());
        let rdf_type = Iri::new(vocab::RDF_TYPE);
        let mut discovered = DiscoveredFields::default();
        for subject in graph.subjects_with(&rdf_type, &Term::Iri(type_iri.clone())) {
            for predicate in graph.predicates(subject) {
                if *predicate != rdf_type {
                    discovered.insert(mapper.property_key(predicate), predicate);
                }
            }
        }

        let mut fields = bootstrap_fields(self.mode);
        let mut descriptors = Vec::with_capacity(discovered.ordered.len());
        for (key, property) in discovered.ordered {
            let prefix = mapper.qualify(&property).prefix;
            let field_id = self
                .field_ids
                .claim(&key.field_id, property.as_str(), prefix.as_deref());
            fields.push(FieldPlacement::new(field_id.clone(), DISCOVERED_PLACEMENT));
            descriptors.push(FieldDescriptor {
                comment: format!("Field {} ({}, {})", field_id, key.property_key, property),
                label: key.name,
                field_id,
                render_type: RenderType::Text,
                property_key: key.property_key,
                placement: DISCOVERED_PLACEMENT.to_string(),
            });
        }

        let view = ViewDescriptor {
            id: td.view_name.clone(),
            label: format!("View {}", td.id),
            comment: format!("View of {} entity", td.id),
            fields,
        };
        (view, descriptors)
    }

    /// Export the view document for `type_iri` and the field documents it introduces.
    /// Returns the number of field documents written.
    pub fn export_view(
        &mut self,
        graph: &Graph,
        type_iri: &Iri,
        td: &TypeDescriptor,
        sink: &mut dyn DocumentSink,
    ) -> SinkResult<usize> {
        let (view, descriptors) = self.build_view(graph, type_iri, td);
        let document = to_document(&ViewDocument {
            at_id: "./",
            at_type: ["annal:View"],
            annal_type: "annal:View",
            type_id: "_view",
            id: &view.id,
            label: &view.label,
            comment: &view.comment,
            open_view: true,
            fields: &view.fields,
        })?;
        sink.write(&DocumentPath::View(view.id.clone()), &document)?;

        let mut written = 0;
        if self.mode == ExportMode::Activity && self.export_field(&see_also_field(), sink)? {
            written += 1;
        }
        for fd in &descriptors {
            if self.export_field(fd, sink)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Export a field document. Returns false when the field id was already
    /// written in this run; a field id claimed by a different property key is
    /// reported and left as first written.
    pub fn export_field(&mut self, fd: &FieldDescriptor, sink: &mut dyn DocumentSink) -> SinkResult<bool> {
        if let Some(existing) = self.registered_fields.get(&fd.field_id) {
            if *existing != fd.property_key {
                warn!(
                    "Field {} already describes {}; not rewriting it for {}",
                    fd.field_id, existing, fd.property_key
                );
            }
            return Ok(false);
        }

        let document = to_document(&FieldDocument {
            at_id: "./",
            at_type: ["annal:Field"],
            annal_type: "annal:Field",
            type_id: "_field",
            id: &fd.field_id,
            label: &fd.label,
            comment: &fd.comment,
            render_type: fd.render_type.to_string(),
            value_type: fd.render_type.value_type(),
            placeholder: format!("({})", fd.field_id),
            property_uri: &fd.property_key,
            placement: &fd.placement,
            default_value: "",
        })?;
        sink.write(&DocumentPath::Field(fd.field_id.clone()), &document)?;
        debug!("Field {} -> {}", fd.field_id, fd.property_key);
        self.registered_fields
            .insert(fd.field_id.clone(), fd.property_key.clone());
        Ok(true)
    }
}
