use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Input state for the "Add New Book" form.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
}

/// Fields available within the book form.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum BookField {
    Title,
    Author,
}

impl BookForm {
    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
        }
    }

    pub(crate) fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
        }
    }

    /// Append a character to `field`, ignoring control characters.
    pub(crate) fn push_char(&mut self, field: BookField, ch: char) -> bool {
        push_text_char(self.value_mut(field), ch)
    }

    /// Remove the last character from `field`.
    pub(crate) fn backspace(&mut self, field: BookField) {
        self.value_mut(field).pop();
    }

    pub(crate) fn clear(&mut self) {
        self.title.clear();
        self.author.clear();
    }

    /// Render a single labelled line for the form widget.
    pub(crate) fn build_line(
        &self,
        field_name: &str,
        field: BookField,
        is_active: bool,
    ) -> Line<'static> {
        input_line(field_name, self.value(field), is_active, "<required>")
    }
}

/// Push a printable character onto a text input.
pub(crate) fn push_text_char(target: &mut String, ch: char) -> bool {
    if ch.is_control() {
        false
    } else {
        target.push(ch);
        true
    }
}

/// A `Label: value` line with the value highlighted while focused and a dim
/// placeholder when empty.
pub(crate) fn input_line(
    field_name: &str,
    value: &str,
    is_active: bool,
    placeholder: &str,
) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_edits_only_the_target_field() {
        let mut form = BookForm::default();
        for ch in "Dune".chars() {
            assert!(form.push_char(BookField::Title, ch));
        }
        assert!(form.push_char(BookField::Author, 'H'));
        assert!(!form.push_char(BookField::Author, '\n'));

        assert_eq!(form.title, "Dune");
        assert_eq!(form.author, "H");

        form.backspace(BookField::Title);
        assert_eq!(form.value(BookField::Title), "Dun");

        form.clear();
        assert!(form.title.is_empty() && form.author.is_empty());
    }

    #[test]
    fn empty_field_shows_placeholder() {
        let form = BookForm::default();
        let line = form.build_line("Title", BookField::Title, false);
        let text: String = line.spans.iter().map(|span| span.content.to_string()).collect();
        assert_eq!(text, "Title: <required>");
    }
}
