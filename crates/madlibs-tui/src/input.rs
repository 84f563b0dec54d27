//! Single-line text field editing.
//!
//! Both the topic prompt and the per-blank word prompts are single-line
//! fields, so this keeps a flat string with a char-indexed cursor rather
//! than a full multi-line buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A single-line editable text field.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    text: String,
    cursor: usize,
}

impl TextField {
    /// Returns the field contents.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the cursor position in char units.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true if the trimmed contents are empty.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    /// Inserts a string at the cursor; newlines become spaces.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' || c == '\r' {
                self.insert_char(' ');
            } else if !c.is_control() {
                self.insert_char(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index(self.cursor);
        self.text.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let idx = self.byte_index(self.cursor);
        self.text.remove(idx);
    }

    /// Deletes the word before the cursor (Ctrl+W).
    pub fn delete_word(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let start_byte = self.byte_index(start);
        let end_byte = self.byte_index(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Applies an editing key to the field. Returns true if the key was
    /// consumed; navigation/submit keys are left for the caller.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => {
                    self.delete_word();
                    true
                }
                KeyCode::Char('u') => {
                    self.clear();
                    true
                }
                KeyCode::Char('a') => {
                    self.move_home();
                    true
                }
                KeyCode::Char('e') => {
                    self.move_end();
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.move_left();
                true
            }
            KeyCode::Right => {
                self.move_right();
                true
            }
            KeyCode::Home => {
                self.move_home();
                true
            }
            KeyCode::End => {
                self.move_end();
                true
            }
            _ => false,
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_and_edit() {
        let mut field = TextField::default();
        field.insert_str("cats");
        assert_eq!(field.text(), "cats");
        assert_eq!(field.cursor(), 4);

        field.backspace();
        assert_eq!(field.text(), "cat");

        field.move_home();
        field.insert_char('a');
        assert_eq!(field.text(), "acat");
    }

    #[test]
    fn test_insert_mid_string_multibyte() {
        let mut field = TextField::default();
        field.insert_str("héllo");
        field.move_home();
        field.move_right();
        field.move_right();
        field.insert_char('x');
        assert_eq!(field.text(), "héxllo");
    }

    #[test]
    fn test_delete_word() {
        let mut field = TextField::default();
        field.insert_str("flying purple cat");
        field.delete_word();
        assert_eq!(field.text(), "flying purple ");
        field.delete_word();
        assert_eq!(field.text(), "flying ");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut field = TextField::default();
        field.insert_str("line one\nline two");
        assert_eq!(field.text(), "line one line two");
    }

    #[test]
    fn test_is_blank_trims_whitespace() {
        let mut field = TextField::default();
        assert!(field.is_blank());
        field.insert_str("   ");
        assert!(field.is_blank());
        field.insert_char('x');
        assert!(!field.is_blank());
    }

    #[test]
    fn test_handle_key_editing() {
        let mut field = TextField::default();
        assert!(field.handle_key(key(KeyCode::Char('h'))));
        assert!(field.handle_key(key(KeyCode::Char('i'))));
        assert_eq!(field.text(), "hi");

        // Navigation/submit keys are not consumed
        assert!(!field.handle_key(key(KeyCode::Enter)));
        assert!(!field.handle_key(key(KeyCode::Tab)));
    }
}
