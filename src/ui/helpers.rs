use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};

use crate::controller::NoticeKind;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the notice popup.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Popup title and border color for each notice severity.
pub(crate) fn notice_chrome(kind: NoticeKind) -> (&'static str, Style) {
    match kind {
        NoticeKind::Info => ("Done", Style::default().fg(Color::Green)),
        NoticeKind::Warning => ("Notice", Style::default().fg(Color::Yellow)),
        NoticeKind::Error => ("Error", Style::default().fg(Color::Red)),
    }
}

/// Move a selection by `offset` rows, clamping to the table bounds.
pub(crate) fn step_selection(current: Option<usize>, offset: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = match current {
        Some(index) => index as isize,
        None if offset >= 0 => -1,
        None => len as isize,
    };
    let next = (current + offset).clamp(0, len as isize - 1);
    Some(next as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps_to_bounds() {
        assert_eq!(step_selection(None, 1, 0), None);
        assert_eq!(step_selection(None, 1, 3), Some(0));
        assert_eq!(step_selection(None, -1, 3), Some(2));
        assert_eq!(step_selection(Some(2), 1, 3), Some(2));
        assert_eq!(step_selection(Some(0), -1, 3), Some(0));
        assert_eq!(step_selection(Some(1), 1, 3), Some(2));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }
}
