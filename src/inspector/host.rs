//! In-memory inspector host over a [`StyledDocument`].
//!
//! Records every mutation the inspector asks for, so callers and tests can
//! see exactly what the page would look like.

use super::{HoveredStyle, InspectorHost, ListenerId, ListenerKind, PointerPosition};
use crate::style::{ElementId, StyledDocument};
use crate::{Error, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub position: PointerPosition,
    pub text: String,
}

#[derive(Debug)]
pub struct DocumentHost {
    document: StyledDocument,
    styles: Vec<(String, String)>,
    listeners: Vec<(ListenerId, ListenerKind)>,
    next_listener: u64,
    highlighted: BTreeSet<ElementId>,
    tooltip: Option<Tooltip>,
}

impl DocumentHost {
    pub fn new(document: StyledDocument) -> Self {
        DocumentHost {
            document,
            styles: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
            highlighted: BTreeSet::new(),
            tooltip: None,
        }
    }

    pub fn document(&self) -> &StyledDocument {
        &self.document
    }

    /// Injected `(id, css)` pairs, in injection order
    pub fn injected_styles(&self) -> &[(String, String)] {
        &self.styles
    }

    pub fn listeners(&self) -> &[(ListenerId, ListenerKind)] {
        &self.listeners
    }

    pub fn highlighted(&self) -> Vec<ElementId> {
        self.highlighted.iter().copied().collect()
    }

    pub fn is_highlighted(&self, element: ElementId) -> bool {
        self.highlighted.contains(&element)
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }
}

impl InspectorHost for DocumentHost {
    fn inject_style(&mut self, id: &str, css: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InspectorError("style element id must not be empty".into()));
        }
        // Appends like the DOM would; duplicate ids stay visible.
        self.styles.push((id.to_string(), css.to_string()));
        Ok(())
    }

    fn remove_style(&mut self, id: &str) {
        self.styles.retain(|(existing, _)| existing != id);
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    fn highlight(&mut self, element: ElementId) {
        if self.document.element(element).is_some() {
            self.highlighted.insert(element);
        }
    }

    fn clear_highlight(&mut self, element: ElementId) {
        self.highlighted.remove(&element);
    }

    fn show_tooltip(&mut self, at: PointerPosition, text: &str) {
        self.tooltip = Some(Tooltip {
            position: at,
            text: text.to_string(),
        });
    }

    fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    fn hovered_style(&self, element: ElementId) -> Option<HoveredStyle> {
        self.document.computed_style(element).map(HoveredStyle::from)
    }
}
