//! Formatter bound to a host text widget
//!
//! The host owns the buffer and reports the current selection. The formatter
//! reads both, computes the new buffer, hands it back through the host's
//! change notification and asks the host to reselect the transformed region
//! so consecutive toggles hit the same logical text.

use super::mark::{Mark, StylePair, StyleProperty};
use super::toggle::{apply_style, toggle_mark, FormatResult};
use crate::config::ToggleStrategy;
use crate::document::{apply_style_structured, toggle_mark_structured};
use log::debug;

/// The editable field a [`Formatter`] works on.
pub trait SelectionHost {
    /// Current full buffer.
    fn buffer(&self) -> &str;

    /// Current selection as character offsets, in either order.
    fn selection(&self) -> (usize, usize);

    /// Value-change notification carrying the new full buffer.
    fn on_change(&mut self, value: String);

    /// Select the given character range.
    fn select(&mut self, start: usize, end: usize);
}

/// Toolbar-side formatting state: the last size/color the user picked and
/// the toggle strategy in use.
#[derive(Debug, Clone)]
pub struct Formatter {
    style: StylePair,
    strategy: ToggleStrategy,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(StylePair::default(), ToggleStrategy::default())
    }
}

impl Formatter {
    pub fn new(style: StylePair, strategy: ToggleStrategy) -> Self {
        Self { style, strategy }
    }

    /// Size/color applied by the next style change.
    pub fn style(&self) -> StylePair {
        self.style
    }

    pub fn strategy(&self) -> ToggleStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: ToggleStrategy) {
        self.strategy = strategy;
    }

    /// Toggle `mark` on the host's selection.
    ///
    /// Returns `false` (and leaves the host untouched) when nothing is selected.
    pub fn toggle_mark(&mut self, host: &mut impl SelectionHost, mark: Mark) -> bool {
        let selection = host.selection();
        let result = match self.strategy {
            ToggleStrategy::Heuristic => toggle_mark(host.buffer(), selection, mark),
            ToggleStrategy::Structured => toggle_mark_structured(host.buffer(), selection, mark),
        };
        debug!(
            "Toggle {:?} on {:?} ({:?}): {:?}",
            mark, selection, self.strategy, result.outcome
        );
        commit(host, result)
    }

    /// Change one style property and re-apply the full pair to the selection.
    ///
    /// The remembered pair is updated even when nothing is selected, so the
    /// next styled selection picks it up.
    pub fn set_style(&mut self, host: &mut impl SelectionHost, property: StyleProperty) -> bool {
        self.style = self.style.with(property);
        let selection = host.selection();
        let result = match self.strategy {
            ToggleStrategy::Heuristic => apply_style(host.buffer(), selection, self.style),
            ToggleStrategy::Structured => {
                apply_style_structured(host.buffer(), selection, self.style)
            }
        };
        debug!(
            "Style {:?} -> {:?} on {:?}: {:?}",
            property, self.style, selection, result.outcome
        );
        commit(host, result)
    }
}

/// Push a successful result into the host.
fn commit(host: &mut impl SelectionHost, result: FormatResult) -> bool {
    if !result.is_success() {
        return false;
    }
    let selection = result.selection;
    host.on_change(result.text);
    if let Some((start, end)) = selection {
        host.select(start, end);
    }
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::mark::Rgb;

    /// Minimal host recording every notification.
    struct FakeHost {
        value: String,
        selection: (usize, usize),
        changes: Vec<String>,
    }

    impl FakeHost {
        fn new(value: &str, selection: (usize, usize)) -> Self {
            Self {
                value: value.to_string(),
                selection,
                changes: Vec::new(),
            }
        }
    }

    impl SelectionHost for FakeHost {
        fn buffer(&self) -> &str {
            &self.value
        }

        fn selection(&self) -> (usize, usize) {
            self.selection
        }

        fn on_change(&mut self, value: String) {
            self.changes.push(value.clone());
            self.value = value;
        }

        fn select(&mut self, start: usize, end: usize) {
            self.selection = (start, end);
        }
    }

    #[test]
    fn test_toggle_twice_through_host() {
        let mut host = FakeHost::new("Hello world", (0, 5));
        let mut formatter = Formatter::default();

        assert!(formatter.toggle_mark(&mut host, Mark::Bold));
        assert_eq!(host.value, "<strong>Hello</strong> world");
        assert_eq!(host.selection, (0, 22));

        assert!(formatter.toggle_mark(&mut host, Mark::Bold));
        assert_eq!(host.value, "Hello world");
        assert_eq!(host.changes.len(), 2);
    }

    #[test]
    fn test_no_selection_does_not_notify() {
        let mut host = FakeHost::new("Hello", (2, 2));
        let mut formatter = Formatter::default();
        assert!(!formatter.toggle_mark(&mut host, Mark::Italic));
        assert!(host.changes.is_empty());
        assert_eq!(host.selection, (2, 2));
    }

    #[test]
    fn test_set_color_keeps_remembered_size() {
        let mut host = FakeHost::new("Hello world", (6, 11));
        let mut formatter = Formatter::default();

        assert!(formatter.set_style(&mut host, StyleProperty::Size(20)));
        assert!(formatter.set_style(&mut host, StyleProperty::Color(Rgb::new(0xff, 0, 0))));
        assert_eq!(
            host.value,
            "Hello <span style=\"font-size:20px;color:#ff0000\">world</span>"
        );
        assert_eq!(formatter.style(), StylePair::new(20, Rgb::new(0xff, 0, 0)));
    }

    #[test]
    fn test_style_remembered_without_selection() {
        let mut host = FakeHost::new("Hello", (0, 0));
        let mut formatter = Formatter::default();
        assert!(!formatter.set_style(&mut host, StyleProperty::Size(30)));
        assert_eq!(formatter.style().size, 30);
        assert_eq!(host.value, "Hello");
    }

    #[test]
    fn test_back_to_defaults_unstyles() {
        let mut host = FakeHost::new("Hello world", (6, 11));
        let mut formatter = Formatter::default();
        formatter.set_style(&mut host, StyleProperty::Color(Rgb::new(0, 0, 0xff)));
        formatter.set_style(&mut host, StyleProperty::Color(Rgb::BLACK));
        assert_eq!(host.value, "Hello world");
        assert_eq!(host.selection, (6, 11));
    }

    #[test]
    fn test_structured_strategy_through_host() {
        let mut host = FakeHost::new("<strong>Hello world</strong>", (14, 19));
        let mut formatter = Formatter::new(StylePair::default(), ToggleStrategy::Structured);
        assert!(formatter.toggle_mark(&mut host, Mark::Bold));
        assert_eq!(host.value, "<strong>Hello </strong>world");
    }
}
