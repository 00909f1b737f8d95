//! Off-screen text entry that collects keystrokes for the session.
//!
//! The caret the user sees is drawn by the reference panel, this buffer only
//! tracks the text and cursor index in characters.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEntry {
    text: Vec<char>,
    cursor: usize,
}

impl TextEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.text.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor += 1;
        }
    }

    /// Move to the start of the current line
    pub fn home(&mut self) {
        self.cursor = self.text[..self.cursor]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |nl| nl + 1);
    }

    /// Move to the end of the current line
    pub fn end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.text.len(), |nl| self.cursor + nl);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Full text plus cursor, the shape the session consumes
    pub fn snapshot(&self) -> (String, usize) {
        (self.text(), self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(s: &str) -> TextEntry {
        let mut e = TextEntry::new();
        s.chars().for_each(|c| e.insert(c));
        e
    }

    #[test]
    fn test_insert_advances_cursor() {
        let e = entry("abc");
        assert_eq!(e.snapshot(), ("abc".to_string(), 3));
    }

    #[test]
    fn test_insert_in_middle() {
        let mut e = entry("ac");
        e.left();
        e.insert('b');
        assert_eq!(e.snapshot(), ("abc".to_string(), 2));
    }

    #[test]
    fn test_backspace() {
        let mut e = entry("te");
        e.backspace();
        assert_eq!(e.snapshot(), ("t".to_string(), 1));
        e.backspace();
        assert_eq!(e.snapshot(), (String::new(), 0));
        e.backspace();
        assert_eq!(e.snapshot(), (String::new(), 0));
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut e = entry("abc");
        e.delete();
        assert_eq!(e.text(), "abc");
        e.left();
        e.left();
        e.delete();
        assert_eq!(e.snapshot(), ("ac".to_string(), 1));
    }

    #[test]
    fn test_cursor_movement_is_bounded() {
        let mut e = entry("ab");
        e.right();
        assert_eq!(e.cursor(), 2);
        e.left();
        e.left();
        e.left();
        assert_eq!(e.cursor(), 0);
    }

    #[test]
    fn test_home_and_end_follow_lines() {
        let mut e = entry("fn a\n  b");
        e.home();
        assert_eq!(e.cursor(), 5);
        e.left();
        e.home();
        assert_eq!(e.cursor(), 0);
        e.end();
        assert_eq!(e.cursor(), 4);
        e.right();
        e.end();
        assert_eq!(e.cursor(), 8);
    }

    #[test]
    fn test_newline_and_multibyte() {
        let mut e = entry("é");
        e.newline();
        e.insert('ü');
        assert_eq!(e.snapshot(), ("é\nü".to_string(), 3));
        assert_eq!(e.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut e = entry("abc");
        e.clear();
        assert!(e.is_empty());
        assert_eq!(e.cursor(), 0);
    }
}
