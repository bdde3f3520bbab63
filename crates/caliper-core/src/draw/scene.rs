//! Retained-mode scene node cache.
//!
//! Drawers never build a fresh frame. Every primitive they emit is addressed
//! by a [`NodeKey`] and reconciled against the node already cached under that
//! key: attributes that differ are written, attributes that are unset are
//! removed, and everything else is left alone.
//!
//! # Overview
//!
//! - [`PrimitiveKind`] - The category segment of a node key
//! - [`NodeKey`] - `(annotation id, primitive kind, sub key)` identity of a node
//! - [`Attributes`] - Ordered attribute assignments, where an unset value means "remove"
//! - [`SceneNode`] - A cached drawable (tag, attributes, children, text)
//! - [`SceneCache`] - The keyed store with touch tracking and pruning
//!
//! # Pass Protocol
//!
//! ```
//! # use caliper_core::draw::{Attributes, NodeKey, PrimitiveKind, SceneCache, UpsertOutcome};
//! let mut cache = SceneCache::new();
//! let key = NodeKey::new("ann-1", PrimitiveKind::Line, "1");
//!
//! let attrs = Attributes::new().set("x1", 0).set("y1", 0).set("x2", 3).set("y2", 4);
//! assert_eq!(cache.upsert_node(&key, "line", attrs.clone()), UpsertOutcome::Created);
//! assert!(cache.prune_untouched().is_empty());
//!
//! // next pass: same attributes, nothing to write
//! assert_eq!(cache.upsert_node(&key, "line", attrs), UpsertOutcome::Unchanged);
//! assert!(cache.prune_untouched().is_empty());
//!
//! // a pass that does not reference the node prunes it
//! assert_eq!(cache.prune_untouched(), vec![key]);
//! ```

use std::fmt::{self, Display};

use indexmap::IndexMap;
use log::{debug, trace};
use svg::{
    Node,
    node::{Text as SvgText, element::Element},
};

/// Category of primitive, the middle segment of a [`NodeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Handle,
    Line,
    Polyline,
    Path,
    Ellipse,
    Circle,
    Text,
}

impl PrimitiveKind {
    /// Returns the name used when formatting keys
    pub fn name(&self) -> &'static str {
        match self {
            Self::Handle => "handle",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Path => "path",
            Self::Ellipse => "ellipse",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }
}

/// Stable identity of a drawable primitive.
///
/// Formats as `"{annotation_id}::{kind}::{sub_key}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    annotation_id: String,
    kind: PrimitiveKind,
    sub_key: String,
}

impl NodeKey {
    pub fn new(
        annotation_id: impl Into<String>,
        kind: PrimitiveKind,
        sub_key: impl Into<String>,
    ) -> Self {
        Self {
            annotation_id: annotation_id.into(),
            kind,
            sub_key: sub_key.into(),
        }
    }

    pub fn annotation_id(&self) -> &str {
        &self.annotation_id
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn sub_key(&self) -> &str {
        &self.sub_key
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.annotation_id,
            self.kind.name(),
            self.sub_key
        )
    }
}

/// Ordered attribute assignments for a node.
///
/// A value of `None` (or an empty string) means the attribute must be absent:
/// it is skipped when a node is created and removed when a node is patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, Option<String>)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns an attribute value
    pub fn set(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.push(name.into(), Some(value.to_string()));
        self
    }

    /// Assigns an attribute value, or marks it for removal when `None`
    pub fn set_opt<V: Display>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.push(name.into(), value.map(|v| v.to_string()));
        self
    }

    /// Marks an attribute for removal
    pub fn unset(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), None);
        self
    }

    fn push(&mut self, name: String, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Iterates over `(name, value)` pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

/// A cached drawable primitive.
///
/// Nodes hold presentation only. Geometry always flows from the annotation
/// model into nodes and is never read back.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<SceneNode>,
    text: Option<String>,
}

impl SceneNode {
    /// Creates a node holding only the valid (non-empty) attributes
    pub fn new(tag: impl Into<String>, attributes: Attributes) -> Self {
        let attributes = attributes
            .iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
            .collect();
        Self {
            tag: tag.into(),
            attributes,
            children: Vec::new(),
            text: None,
        }
    }

    /// Creates a text-bearing node such as a `tspan`
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child node
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the value of an attribute if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Finds the first descendant (depth-first) with the given tag and,
    /// optionally, `class` attribute.
    pub fn find(&self, tag: &str, class: Option<&str>) -> Option<&SceneNode> {
        self.children.iter().find_map(|child| {
            let class_matches = class.is_none_or(|c| child.attribute("class") == Some(c));
            if child.tag == tag && class_matches {
                Some(child)
            } else {
                child.find(tag, class)
            }
        })
    }

    /// Writes only the attributes that differ and removes unset ones.
    ///
    /// Returns the number of attribute writes and removals performed.
    pub fn patch_attributes(&mut self, attributes: &Attributes) -> usize {
        let mut writes = 0;
        for (name, value) in attributes.iter() {
            match value {
                None => {
                    if self.attributes.shift_remove(name).is_some() {
                        writes += 1;
                    }
                }
                Some(value) => {
                    if self.attribute(name) != Some(value) {
                        self.attributes.insert(name.to_string(), value.to_string());
                        writes += 1;
                    }
                }
            }
        }
        writes
    }

    /// Reconciles this node against a desired node of the same tag.
    ///
    /// Attributes present here but absent from `desired` are removed; children
    /// are matched by position and recursively reconciled, and surplus
    /// children are dropped. Returns the number of mutations performed.
    pub fn reconcile(&mut self, desired: &SceneNode) -> usize {
        let mut writes = 0;
        if self.tag != desired.tag {
            *self = desired.clone();
            return 1;
        }

        let stale: Vec<String> = self
            .attributes
            .keys()
            .filter(|name| !desired.attributes.contains_key(*name))
            .cloned()
            .collect();
        for name in stale {
            self.attributes.shift_remove(&name);
            writes += 1;
        }
        for (name, value) in &desired.attributes {
            if self.attributes.get(name) != Some(value) {
                self.attributes.insert(name.clone(), value.clone());
                writes += 1;
            }
        }

        if self.text != desired.text {
            self.text = desired.text.clone();
            writes += 1;
        }

        for (i, wanted) in desired.children.iter().enumerate() {
            match self.children.get_mut(i) {
                Some(existing) => writes += existing.reconcile(wanted),
                None => {
                    self.children.push(wanted.clone());
                    writes += 1;
                }
            }
        }
        if self.children.len() > desired.children.len() {
            self.children.truncate(desired.children.len());
            writes += 1;
        }
        writes
    }

    /// Converts the node into an SVG element
    pub fn to_svg(&self) -> Element {
        let mut element = Element::new(self.tag.clone());
        for (name, value) in &self.attributes {
            element.assign(name.clone(), value.clone());
        }
        if let Some(text) = &self.text {
            element.append(SvgText::new(text.clone()));
        }
        for child in &self.children {
            element.append(child.to_svg());
        }
        element
    }
}

/// Result of an upsert, reported for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No node existed; one was created
    Created,
    /// The node existed and this many mutations were written
    Patched(usize),
    /// The node existed and already matched
    Unchanged,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    node: SceneNode,
    touched: bool,
}

/// Keyed store of live scene nodes for one drawing surface.
///
/// Nodes keep their insertion order, which is also their paint order when the
/// cache is exported.
#[derive(Debug, Default)]
pub struct SceneCache {
    entries: IndexMap<NodeKey, CacheEntry>,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node cached under `key`
    pub fn get_node(&self, key: &NodeKey) -> Option<&SceneNode> {
        self.entries.get(key).map(|entry| &entry.node)
    }

    /// Number of cached nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over cached keys in paint order
    pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.entries.keys()
    }

    /// Creates or patches a flat node and marks it touched.
    ///
    /// An existing node only receives the attribute writes that differ from
    /// its current state; a new node is created with the valid attributes.
    pub fn upsert_node(&mut self, key: &NodeKey, tag: &str, attributes: Attributes) -> UpsertOutcome {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touched = true;
                let writes = if entry.node.tag == tag {
                    entry.node.patch_attributes(&attributes)
                } else {
                    entry.node = SceneNode::new(tag, attributes);
                    1
                };
                Self::outcome(key, writes)
            }
            None => self.insert(key, SceneNode::new(tag, attributes)),
        }
    }

    /// Creates or reconciles a node tree (e.g. a text group) and marks it touched
    pub fn upsert_tree(&mut self, key: &NodeKey, desired: SceneNode) -> UpsertOutcome {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touched = true;
                let writes = entry.node.reconcile(&desired);
                Self::outcome(key, writes)
            }
            None => self.insert(key, desired),
        }
    }

    fn insert(&mut self, key: &NodeKey, node: SceneNode) -> UpsertOutcome {
        trace!(key:% = key; "Creating scene node");
        self.entries.insert(
            key.clone(),
            CacheEntry {
                node,
                touched: true,
            },
        );
        UpsertOutcome::Created
    }

    fn outcome(key: &NodeKey, writes: usize) -> UpsertOutcome {
        if writes == 0 {
            UpsertOutcome::Unchanged
        } else {
            trace!(key:% = key, writes = writes; "Patched scene node");
            UpsertOutcome::Patched(writes)
        }
    }

    /// Marks an existing node as referenced in the current pass.
    ///
    /// Returns false when no node is cached under `key`.
    pub fn mark_touched(&mut self, key: &NodeKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touched = true;
                true
            }
            None => false,
        }
    }

    /// Returns true if the node was referenced since the last prune
    pub fn is_touched(&self, key: &NodeKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.touched)
    }

    /// Removes every node not touched since the previous prune and resets the
    /// touch flag of the survivors. Returns the removed keys.
    pub fn prune_untouched(&mut self) -> Vec<NodeKey> {
        let mut removed = Vec::new();
        self.entries.retain(|key, entry| {
            if entry.touched {
                entry.touched = false;
                true
            } else {
                removed.push(key.clone());
                false
            }
        });
        if !removed.is_empty() {
            debug!(count = removed.len(); "Pruned stale scene nodes");
        }
        removed
    }

    /// Exports all nodes as SVG elements in paint order
    pub fn to_svg_elements(&self) -> Vec<Element> {
        self.entries
            .iter()
            .map(|(key, entry)| {
                let mut element = entry.node.to_svg();
                element.assign("data-node-key", key.to_string());
                element
            })
            .collect()
    }

    /// Exports the cache as a complete SVG document of the given canvas size
    pub fn render_document(&self, width: f64, height: f64) -> svg::Document {
        self.to_svg_elements().into_iter().fold(
            svg::Document::new()
                .set("viewBox", format!("0 0 {width} {height}"))
                .set("width", width)
                .set("height", height),
            |doc, element| doc.add(element),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(sub: &str) -> NodeKey {
        NodeKey::new("a1", PrimitiveKind::Handle, sub)
    }

    #[test]
    fn test_node_key_display() {
        let key = NodeKey::new("uid", PrimitiveKind::Ellipse, "ellipse");
        assert_eq!(key.to_string(), "uid::ellipse::ellipse");
        assert_eq!(key.annotation_id(), "uid");
        assert_eq!(key.kind(), PrimitiveKind::Ellipse);
        assert_eq!(key.sub_key(), "ellipse");
    }

    #[test]
    fn test_new_node_skips_invalid_attributes() {
        let attrs = Attributes::new()
            .set("cx", 1.5)
            .set("stroke-dasharray", "")
            .set_opt::<f64>("opacity", None);
        let node = SceneNode::new("circle", attrs);
        assert_eq!(node.attribute("cx"), Some("1.5"));
        assert_eq!(node.attribute("stroke-dasharray"), None);
        assert_eq!(node.attributes().len(), 1);
    }

    #[test]
    fn test_upsert_same_attributes_twice_is_idempotent() {
        let mut cache = SceneCache::new();
        let attrs = Attributes::new().set("cx", 10).set("cy", 20).set("r", 6);

        assert_eq!(
            cache.upsert_node(&key("0"), "circle", attrs.clone()),
            UpsertOutcome::Created
        );
        let before = cache.get_node(&key("0")).cloned();
        cache.prune_untouched();

        assert_eq!(
            cache.upsert_node(&key("0"), "circle", attrs),
            UpsertOutcome::Unchanged
        );
        assert!(cache.is_touched(&key("0")));
        assert_eq!(cache.get_node(&key("0")).cloned(), before);
    }

    #[test]
    fn test_upsert_patches_only_changed_attributes() {
        let mut cache = SceneCache::new();
        cache.upsert_node(
            &key("0"),
            "circle",
            Attributes::new().set("cx", 1).set("cy", 2).set("stroke-dasharray", "2,3"),
        );

        let outcome = cache.upsert_node(
            &key("0"),
            "circle",
            Attributes::new().set("cx", 5).set("cy", 2).unset("stroke-dasharray"),
        );
        assert_eq!(outcome, UpsertOutcome::Patched(2));

        let node = cache.get_node(&key("0")).unwrap();
        assert_eq!(node.attribute("cx"), Some("5"));
        assert_eq!(node.attribute("stroke-dasharray"), None);
    }

    #[test]
    fn test_prune_removes_only_untouched() {
        let mut cache = SceneCache::new();
        cache.upsert_node(&key("0"), "circle", Attributes::new().set("r", 1));
        cache.upsert_node(&key("1"), "circle", Attributes::new().set("r", 1));
        assert!(cache.prune_untouched().is_empty());

        assert!(cache.mark_touched(&key("1")));
        assert!(!cache.mark_touched(&key("missing")));
        assert_eq!(cache.prune_untouched(), vec![key("0")]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_node(&key("1")).is_some());
    }

    #[test]
    fn test_upsert_tree_reconciles_children() {
        let mut cache = SceneCache::new();
        let tree = |lines: &[&str]| {
            let text = lines.iter().fold(
                SceneNode::new("text", Attributes::new().set("x", 0)),
                |text, line| {
                    text.with_child(
                        SceneNode::new("tspan", Attributes::new().set("dy", "1.2em"))
                            .with_text(*line),
                    )
                },
            );
            SceneNode::new("g", Attributes::new().set("transform", "translate(1 2)")).with_child(text)
        };
        let tkey = NodeKey::new("a1", PrimitiveKind::Text, "textBox");

        assert_eq!(cache.upsert_tree(&tkey, tree(&["a", "b"])), UpsertOutcome::Created);
        assert_eq!(cache.upsert_tree(&tkey, tree(&["a", "b"])), UpsertOutcome::Unchanged);
        assert_eq!(cache.upsert_tree(&tkey, tree(&["a"])), UpsertOutcome::Patched(1));

        let text = cache.get_node(&tkey).unwrap().find("text", None).unwrap();
        assert_eq!(text.children().len(), 1);
        assert_eq!(text.children()[0].text(), Some("a"));
    }

    #[test]
    fn test_render_document_contains_keys_in_order() {
        let mut cache = SceneCache::new();
        cache.upsert_node(&key("0"), "circle", Attributes::new().set("r", 1));
        cache.upsert_node(&key("1"), "circle", Attributes::new().set("r", 2));

        let doc = cache.render_document(100.0, 50.0).to_string();
        let first = doc.find("a1::handle::0").unwrap();
        let second = doc.find("a1::handle::1").unwrap();
        assert!(first < second);
        assert!(doc.contains("viewBox=\"0 0 100 50\""));
    }
}
