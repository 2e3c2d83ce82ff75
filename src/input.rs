/// Single-line text input with a byte-offset cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor_position: usize,
}

impl TextInput {
    /// Input pre-filled with `value`, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor_position: value.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the contents, cursor at the end.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Insert a character at the current cursor position.
    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if let Some(prev) = self.value[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
            self.value.remove(self.cursor_position);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor_position < self.value.len() {
            self.value.remove(self.cursor_position);
        }
    }

    /// Move cursor left by one character.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn move_right(&mut self) {
        if let Some(next) = self.value[self.cursor_position..].chars().next() {
            self.cursor_position += next.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn end(&mut self) {
        self.cursor_position = self.value.len();
    }

    /// Split around the cursor for drawing: text before, the cursor cell
    /// (a space at the end), and text after.
    pub fn split_at_cursor(&self) -> (&str, &str, &str) {
        let pos = self.cursor_position;
        match self.value[pos..].chars().next() {
            Some(ch) => {
                let end = pos + ch.len_utf8();
                (&self.value[..pos], &self.value[pos..end], &self.value[end..])
            }
            None => (self.value.as_str(), " ", ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_appends_and_moves_cursor() {
        let mut input = TextInput::default();
        input.insert_char('a');
        input.insert_char('b');
        input.insert_char('c');
        assert_eq!(input.as_str(), "abc");
        assert_eq!(input.cursor_position, 3);
    }

    #[test]
    fn delete_char_removes_before_cursor() {
        let mut input = TextInput::with_value("ab");
        input.delete_char();
        assert_eq!(input.as_str(), "a");
        assert_eq!(input.cursor_position, 1);
    }

    #[test]
    fn delete_char_at_start_is_noop() {
        let mut input = TextInput::default();
        input.delete_char();
        assert!(input.is_empty());
        assert_eq!(input.cursor_position, 0);
    }

    #[test]
    fn cursor_moves_respect_boundaries() {
        let mut input = TextInput::default();
        input.move_left();
        assert_eq!(input.cursor_position, 0);
        input.insert_char('x');
        input.move_right();
        assert_eq!(input.cursor_position, 1);
        input.home();
        assert_eq!(input.cursor_position, 0);
        input.end();
        assert_eq!(input.cursor_position, 1);
    }

    #[test]
    fn multibyte_characters() {
        let mut input = TextInput::with_value("عل");
        input.move_left();
        input.insert_char('x');
        assert_eq!(input.as_str(), "عxل");
        input.delete_forward();
        assert_eq!(input.as_str(), "عx");
        input.delete_char();
        input.delete_char();
        assert!(input.is_empty());
    }

    #[test]
    fn split_at_cursor_for_drawing() {
        let mut input = TextInput::with_value("abc");
        assert_eq!(input.split_at_cursor(), ("abc", " ", ""));
        input.move_left();
        assert_eq!(input.split_at_cursor(), ("ab", "c", ""));
        input.home();
        assert_eq!(input.split_at_cursor(), ("", "a", "bc"));
    }
}
