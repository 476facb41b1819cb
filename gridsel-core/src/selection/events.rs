/// Selection change notifications
use crate::block::Block;

/// Modifier key states at the time of a selection action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyboardState {
    /// Check if any modifiers are active
    pub fn has_modifiers(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Kind of a range selection event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEventKind {
    /// Selection still changing, e.g. while dragging the mouse
    Selecting,
    /// Final selection change
    Selected,
}

/// Which event, if any, a mutation should raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notify {
    /// Mutate without raising an event
    Silent,
    Selecting,
    #[default]
    Selected,
}

impl Notify {
    pub fn kind(self) -> Option<RangeEventKind> {
        match self {
            Notify::Silent => None,
            Notify::Selecting => Some(RangeEventKind::Selecting),
            Notify::Selected => Some(RangeEventKind::Selected),
        }
    }
}

/// A selection change reported to the owning grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEvent {
    pub kind: RangeEventKind,
    /// Affected block, `None` when the whole selection was cleared
    pub block: Option<Block>,
    /// True if the block was selected, false if it was deselected
    pub selected: bool,
    pub modifiers: KeyboardState,
}

/// Receives notifications from a [`SelectionManager`](super::SelectionManager)
pub trait SelectionListener {
    fn on_selection_event(&mut self, event: &SelectionEvent);

    /// The cells of `block` need to be redrawn
    fn refresh_block(&mut self, _block: Block) {}
}

impl<F> SelectionListener for F
where
    F: FnMut(&SelectionEvent),
{
    fn on_selection_event(&mut self, event: &SelectionEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_modifiers() {
        assert!(!KeyboardState::default().has_modifiers());
        let kbd = KeyboardState {
            meta: true,
            ..Default::default()
        };
        assert!(kbd.has_modifiers());
    }

    #[test]
    fn test_notify_kind() {
        assert_eq!(Notify::Silent.kind(), None);
        assert_eq!(Notify::Selecting.kind(), Some(RangeEventKind::Selecting));
        assert_eq!(Notify::default().kind(), Some(RangeEventKind::Selected));
    }
}
