//! Annotation storage contract and the in-memory store.

use indexmap::IndexMap;
use log::trace;
use uuid::Uuid;

use crate::annotation::Annotation;

/// Persistence of annotations, owned by the host.
pub trait AnnotationStore {
    /// Ids of the annotations of `tool_name` in `frame_of_reference`, in
    /// insertion order.
    fn annotation_ids(&self, tool_name: &str, frame_of_reference: &str) -> Vec<String>;

    /// Stores `annotation` and returns its id. An empty id is replaced by a
    /// freshly generated one.
    fn add(&mut self, annotation: Annotation) -> String;

    fn get(&self, id: &str) -> Option<&Annotation>;

    fn get_mut(&mut self, id: &str) -> Option<&mut Annotation>;

    fn remove(&mut self, id: &str) -> Option<Annotation>;

    fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(Annotation::is_visible)
    }

    fn is_locked(&self, id: &str) -> bool {
        self.get(id).is_some_and(Annotation::is_locked)
    }
}

/// [`AnnotationStore`] keeping annotations in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnnotationStore {
    annotations: IndexMap<String, Annotation>,
}

impl InMemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }
}

impl AnnotationStore for InMemoryAnnotationStore {
    fn annotation_ids(&self, tool_name: &str, frame_of_reference: &str) -> Vec<String> {
        self.annotations
            .values()
            .filter(|annotation| {
                let metadata = annotation.metadata();
                metadata.tool_name() == tool_name
                    && metadata.frame_of_reference() == frame_of_reference
            })
            .map(|annotation| annotation.id().to_string())
            .collect()
    }

    fn add(&mut self, mut annotation: Annotation) -> String {
        if annotation.id().is_empty() {
            annotation.set_id(Uuid::new_v4().to_string());
        }
        let id = annotation.id().to_string();
        trace!(annotation_id = id.as_str(); "Annotation added");
        self.annotations.insert(id.clone(), annotation);
        id
    }

    fn get(&self, id: &str) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Annotation> {
        self.annotations.get_mut(id)
    }

    fn remove(&mut self, id: &str) -> Option<Annotation> {
        self.annotations.shift_remove(id)
    }
}
