//! Hover-based element inspector.
//!
//! The [`Inspector`] owns all inspection state. A session is created on
//! activation and dropped on deactivation; nothing lives outside it. The page
//! itself is reached through an [`InspectorHost`], which injects styles,
//! registers listeners and paints the highlight and tooltip.
//!
//! Time is passed in by the caller so the hover debounce can be driven from
//! an event loop or a test alike.

pub mod host;

pub use host::{DocumentHost, Tooltip};

use crate::style::{ComputedStyle, ElementId};
use crate::{Error, Result};
use log::debug;
use std::time::{Duration, Instant};

/// Delay between the last pointer move and the hover taking effect.
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(100);

/// Id of the injected inspector stylesheet.
pub const STYLE_ELEMENT_ID: &str = "stylescout-inspector-style";
pub const HIGHLIGHT_CLASS: &str = "stylescout-highlight";
pub const TOOLTIP_CLASS: &str = "stylescout-tooltip";

/// Tooltip distance from the pointer, in CSS pixels on both axes.
pub const TOOLTIP_OFFSET: f64 = 10.0;

pub const INSPECTOR_CSS: &str = r#".stylescout-highlight {
  outline: 2px solid #ff4081 !important;
  outline-offset: -1px;
  cursor: crosshair;
}
.stylescout-tooltip {
  position: absolute;
  z-index: 2147483647;
  pointer-events: none;
  padding: 4px 8px;
  border-radius: 4px;
  background: rgba(0, 0, 0, 0.85);
  color: #fff;
  font: 12px/1.4 monospace;
  white-space: pre;
}
"#;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    PointerMove,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Style facts shown for a hovered element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoveredStyle {
    pub font_family: String,
    pub color: String,
    pub background_color: String,
}

impl HoveredStyle {
    pub fn tooltip_text(&self) -> String {
        format!(
            "Font: {}\nColor: {}\nBackground: {}",
            self.font_family, self.color, self.background_color
        )
    }
}

impl From<&ComputedStyle> for HoveredStyle {
    fn from(style: &ComputedStyle) -> Self {
        HoveredStyle {
            font_family: style.font_family.clone(),
            color: style.color.clone(),
            background_color: style.background_color.clone(),
        }
    }
}

/// The page surface the inspector drives.
pub trait InspectorHost {
    /// Add a stylesheet element with the given id
    fn inject_style(&mut self, id: &str, css: &str) -> Result<()>;

    fn remove_style(&mut self, id: &str);

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);

    fn highlight(&mut self, element: ElementId);

    fn clear_highlight(&mut self, element: ElementId);

    fn show_tooltip(&mut self, at: PointerPosition, text: &str);

    fn hide_tooltip(&mut self);

    /// Computed style facts for `element`, if it exists
    fn hovered_style(&self, element: ElementId) -> Option<HoveredStyle>;
}

/// What the page should do with a click the inspector handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl ClickOutcome {
    const PASS_THROUGH: ClickOutcome = ClickOutcome {
        prevent_default: false,
        stop_propagation: false,
    };
    const SUPPRESSED: ClickOutcome = ClickOutcome {
        prevent_default: true,
        stop_propagation: true,
    };
}

#[derive(Debug, Clone, Copy)]
struct PendingHover {
    target: ElementId,
    position: PointerPosition,
    due: Instant,
}

#[derive(Debug)]
struct Session {
    move_listener: ListenerId,
    click_listener: ListenerId,
    highlighted: Option<ElementId>,
    tooltip_visible: bool,
    pending: Option<PendingHover>,
}

#[derive(Debug)]
pub struct Inspector {
    debounce: Duration,
    session: Option<Session>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self::with_debounce(HOVER_DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Inspector {
            debounce,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Element currently highlighted, if any
    pub fn highlighted(&self) -> Option<ElementId> {
        self.session.as_ref().and_then(|s| s.highlighted)
    }

    /// When the pending hover fires, if one is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.as_ref().and_then(|s| s.pending).map(|p| p.due)
    }

    /// Inject the inspector stylesheet and register listeners.
    ///
    /// Returns `false` without touching the host when already active.
    pub fn activate<H: InspectorHost>(&mut self, host: &mut H) -> Result<bool> {
        if self.session.is_some() {
            return Ok(false);
        }
        host.inject_style(STYLE_ELEMENT_ID, INSPECTOR_CSS)
            .map_err(|e| Error::InspectorError(format!("Failed to inject inspector style: {}", e)))?;
        let move_listener = host.add_listener(ListenerKind::PointerMove);
        let click_listener = host.add_listener(ListenerKind::Click);
        self.session = Some(Session {
            move_listener,
            click_listener,
            highlighted: None,
            tooltip_visible: false,
            pending: None,
        });
        debug!("inspector activated");
        Ok(true)
    }

    /// Tear down everything `activate` set up. Returns `false` when idle.
    pub fn deactivate<H: InspectorHost>(&mut self, host: &mut H) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        host.remove_listener(session.move_listener);
        host.remove_listener(session.click_listener);
        if let Some(el) = session.highlighted {
            host.clear_highlight(el);
        }
        if session.tooltip_visible {
            host.hide_tooltip();
        }
        host.remove_style(STYLE_ELEMENT_ID);
        debug!("inspector deactivated");
        true
    }

    /// Flip between active and idle; returns the new state.
    pub fn toggle<H: InspectorHost>(&mut self, host: &mut H) -> Result<bool> {
        if self.is_active() {
            self.deactivate(host);
            Ok(false)
        } else {
            self.activate(host)
        }
    }

    /// Record a pointer move. Each move restarts the debounce window.
    /// Ignored while idle.
    pub fn pointer_move(&mut self, target: ElementId, position: PointerPosition, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.pending = Some(PendingHover {
                target,
                position,
                due: now + self.debounce,
            });
        }
    }

    /// Apply the pending hover if its debounce window has elapsed.
    /// Returns the newly highlighted element.
    pub fn poll<H: InspectorHost>(&mut self, host: &mut H, now: Instant) -> Option<ElementId> {
        let session = self.session.as_mut()?;
        let pending = session.pending.filter(|p| p.due <= now)?;
        session.pending = None;

        if let Some(previous) = session.highlighted.take() {
            host.clear_highlight(previous);
        }
        host.highlight(pending.target);
        session.highlighted = Some(pending.target);

        match host.hovered_style(pending.target) {
            Some(style) => {
                let at = PointerPosition {
                    x: pending.position.x + TOOLTIP_OFFSET,
                    y: pending.position.y + TOOLTIP_OFFSET,
                };
                host.show_tooltip(at, &style.tooltip_text());
                session.tooltip_visible = true;
            }
            None => {
                if session.tooltip_visible {
                    host.hide_tooltip();
                    session.tooltip_visible = false;
                }
            }
        }
        Some(pending.target)
    }

    /// Handle a click while inspecting: the page must not act on it and the
    /// highlight is cleared. Clicks pass through untouched while idle.
    pub fn click<H: InspectorHost>(&mut self, host: &mut H) -> ClickOutcome {
        let Some(session) = self.session.as_mut() else {
            return ClickOutcome::PASS_THROUGH;
        };
        if let Some(el) = session.highlighted.take() {
            host.clear_highlight(el);
        }
        if session.tooltip_visible {
            host.hide_tooltip();
            session.tooltip_visible = false;
        }
        ClickOutcome::SUPPRESSED
    }
}

/// Activate an inspector on `host`, hover `target` until the debounce
/// fires, and return the tooltip text shown. The inspector is deactivated
/// before returning.
pub fn hover_once(host: &mut DocumentHost, target: ElementId) -> Result<Option<String>> {
    let mut inspector = Inspector::new();
    inspector.activate(host)?;
    let start = Instant::now();
    inspector.pointer_move(target, PointerPosition { x: 0.0, y: 0.0 }, start);
    inspector.poll(host, start + HOVER_DEBOUNCE);
    let text = host.tooltip().map(|t| t.text.clone());
    inspector.deactivate(host);
    Ok(text)
}
