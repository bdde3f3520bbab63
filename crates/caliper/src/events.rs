//! Change notifications for measurement panels and other listeners.

use std::{cell::RefCell, fmt, rc::Rc};

use log::debug;

/// What changed on an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Interaction,
    HandlesUpdated,
    StatsUpdated,
    Completed,
    LabelChange,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::Interaction => "Interaction",
            ChangeType::HandlesUpdated => "HandlesUpdated",
            ChangeType::StatsUpdated => "StatsUpdated",
            ChangeType::Completed => "Completed",
            ChangeType::LabelChange => "LabelChange",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEvent {
    pub annotation_id: String,
    pub viewport_id: Option<String>,
    pub change_type: ChangeType,
}

impl AnnotationEvent {
    pub fn new(annotation_id: impl Into<String>, change_type: ChangeType) -> Self {
        Self {
            annotation_id: annotation_id.into(),
            viewport_id: None,
            change_type,
        }
    }

    pub fn with_viewport(mut self, viewport_id: impl Into<String>) -> Self {
        self.viewport_id = Some(viewport_id.into());
        self
    }
}

/// Receives annotation change events. Rendering never depends on delivery.
pub trait ChangeNotifier {
    fn notify(&self, event: AnnotationEvent);
}

/// Logs every event at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn notify(&self, event: AnnotationEvent) {
        debug!(
            annotation_id = event.annotation_id,
            change_type:% = event.change_type;
            "Annotation changed"
        );
    }
}

/// Collects events in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Rc<RefCell<Vec<AnnotationEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnnotationEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events of `change_type`.
    pub fn count(&self, change_type: ChangeType) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.change_type == change_type)
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn notify(&self, event: AnnotationEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_shares_buffer() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        notifier.notify(AnnotationEvent::new("a", ChangeType::StatsUpdated));
        notifier.notify(AnnotationEvent::new("a", ChangeType::Completed).with_viewport("vp"));

        assert_eq!(handle.events().len(), 2);
        assert_eq!(handle.count(ChangeType::StatsUpdated), 1);
        assert_eq!(handle.events()[1].viewport_id.as_deref(), Some("vp"));

        handle.clear();
        assert!(notifier.events().is_empty());
    }
}
