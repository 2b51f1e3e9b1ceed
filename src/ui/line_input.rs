use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    /// Not an editing key; the caller decides (focus moves, Esc, shortcuts).
    Ignored,
}

/// Which characters a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accept {
    Any,
    /// Digits and a single decimal point, for hours/day counts.
    Decimal,
}

/// Single-line text field for the config form. `cursor` is a byte offset
/// that always sits on a char boundary.
pub struct LineInput {
    text: String,
    cursor: usize,
    accept: Accept,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
            accept: Accept::Any,
        }
    }

    pub fn decimal(text: &str) -> Self {
        Self {
            accept: Accept::Decimal,
            ..Self::new(text)
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    /// Text before the cursor, the char under it (None at the end), and the
    /// text after it.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let (before, rest) = self.text.split_at(self.cursor);
        let mut chars = rest.chars();
        let at = chars.next();
        (before, at, chars.as_str())
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.prev_boundary(),
            KeyCode::Right => self.cursor = self.next_boundary(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.len(),
            KeyCode::Backspace => {
                let start = self.prev_boundary();
                self.text.drain(start..self.cursor);
                self.cursor = start;
            }
            KeyCode::Delete => {
                let end = self.next_boundary();
                self.text.drain(self.cursor..end);
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.text.len(),
            KeyCode::Char('u') if ctrl => self.set_value(""),
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => {
                if self.accepts(ch) {
                    self.text.insert(self.cursor, ch);
                    self.cursor += ch.len_utf8();
                }
            }
            _ => return InputResult::Ignored,
        }
        InputResult::Continue
    }

    fn accepts(&self, ch: char) -> bool {
        match self.accept {
            Accept::Any => !ch.is_control(),
            Accept::Decimal => ch.is_ascii_digit() || (ch == '.' && !self.text.contains('.')),
        }
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |ch| self.cursor + ch.len_utf8())
    }

    /// Drop trailing whitespace before the cursor, then the word before it.
    fn delete_word_back(&mut self) {
        let before = self.text[..self.cursor].trim_end();
        let start = before
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(i, ch)| i + ch.len_utf8());
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }
}
