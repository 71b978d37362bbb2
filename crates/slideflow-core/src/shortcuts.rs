//! Keyboard shortcuts for the slide editor.

use crate::input::Modifiers;

/// Action triggered by an editor shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    DeleteElement,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub command: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Check a key press against this shortcut. Letter keys match either case.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == modifiers.command() && self.shift == modifiers.shift
    }
}

/// Registry of editor shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, EditorCommand::DeleteElement, "Delete selected element"),
            Shortcut::new("Backspace", false, false, EditorCommand::DeleteElement, "Delete selected element"),
            Shortcut::new("Z", true, false, EditorCommand::Undo, "Undo"),
            Shortcut::new("Z", true, true, EditorCommand::Redo, "Redo"),
            Shortcut::new("Y", true, false, EditorCommand::Redo, "Redo"),
            Shortcut::new("=", true, false, EditorCommand::ZoomIn, "Zoom in"),
            Shortcut::new("-", true, false, EditorCommand::ZoomOut, "Zoom out"),
        ]
    }

    /// Find the command bound to a key press.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_bindings() {
        assert_eq!(ShortcutRegistry::resolve("z", Modifiers::ctrl()), Some(EditorCommand::Undo));
        assert_eq!(ShortcutRegistry::resolve("Z", Modifiers::ctrl_shift()), Some(EditorCommand::Redo));
        assert_eq!(ShortcutRegistry::resolve("y", Modifiers::ctrl()), Some(EditorCommand::Redo));
        assert_eq!(ShortcutRegistry::resolve("z", Modifiers::NONE), None);
    }

    #[test]
    fn test_cmd_counts_as_ctrl() {
        let cmd = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutRegistry::resolve("z", cmd), Some(EditorCommand::Undo));
    }

    #[test]
    fn test_delete_keys() {
        assert_eq!(ShortcutRegistry::resolve("Backspace", Modifiers::NONE), Some(EditorCommand::DeleteElement));
        assert_eq!(ShortcutRegistry::resolve("Delete", Modifiers::NONE), Some(EditorCommand::DeleteElement));
    }

    #[test]
    fn test_format() {
        let redo = ShortcutRegistry::all().into_iter().find(|s| s.ctrl && s.shift).unwrap();
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
    }
}
