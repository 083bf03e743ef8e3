use engine::{text_width, Canvas, InputAction, Rect, LINE_ADVANCE_PX};

pub(crate) const SCREEN_WIDTH: f32 = 800.0;
pub(crate) const SCREEN_HEIGHT: f32 = 600.0;

pub(crate) const TITLE_SCALE: i32 = 6;
pub(crate) const MENU_SCALE: i32 = 4;
pub(crate) const BODY_SCALE: i32 = 3;
pub(crate) const SMALL_SCALE: i32 = 2;

pub(crate) const MENU_BACKGROUND: [u8; 4] = [120, 60, 200, 255];
pub(crate) const PANEL_BACKGROUND: [u8; 4] = [30, 34, 52, 255];
pub(crate) const TEXT_COLOR: [u8; 4] = [245, 245, 245, 255];
pub(crate) const DIM_TEXT_COLOR: [u8; 4] = [170, 170, 190, 255];
pub(crate) const HIGHLIGHT_COLOR: [u8; 4] = [255, 220, 40, 255];
pub(crate) const TITLE_COLOR: [u8; 4] = [90, 230, 240, 255];
pub(crate) const WARNING_COLOR: [u8; 4] = [255, 110, 110, 255];

/// Selection within a vertical list. Every operation is a no-op on an empty list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MenuCursor {
    selected: usize,
}

impl MenuCursor {
    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + len - 1) % len;
    }

    pub(crate) fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    /// Applies an up/down press; any other action is ignored.
    pub(crate) fn navigate(&mut self, action: InputAction, len: usize) {
        match action {
            InputAction::MoveUp => self.move_up(len),
            InputAction::MoveDown => self.move_down(len),
            _ => {}
        }
    }

    /// The selected index, or `None` when the list is empty or shrank under the cursor.
    pub(crate) fn current(&self, len: usize) -> Option<usize> {
        (self.selected < len).then_some(self.selected)
    }

    pub(crate) fn clamp_to(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub(crate) fn draw_title(canvas: &mut Canvas<'_>, title: &str, y: i32) {
    canvas.draw_text_centered(
        (SCREEN_WIDTH / 2.0) as i32,
        y,
        title,
        TITLE_SCALE,
        TITLE_COLOR,
    );
}

/// Centered vertical menu; the selected entry is drawn in the highlight color with a marker.
pub(crate) fn draw_menu<S: AsRef<str>>(
    canvas: &mut Canvas<'_>,
    entries: &[S],
    selected: Option<usize>,
    top_y: i32,
    scale: i32,
) {
    let center_x = (SCREEN_WIDTH / 2.0) as i32;
    let row_height = LINE_ADVANCE_PX * scale + scale * 2;
    for (index, entry) in entries.iter().enumerate() {
        let y = top_y + index as i32 * row_height;
        let is_selected = selected == Some(index);
        let color = if is_selected {
            HIGHLIGHT_COLOR
        } else {
            TEXT_COLOR
        };
        canvas.draw_text_centered(center_x, y, entry.as_ref(), scale, color);
        if is_selected {
            let marker_x = center_x - text_width(entry.as_ref(), scale) / 2 - 4 * scale;
            canvas.draw_text(marker_x, y, ">", scale, HIGHLIGHT_COLOR);
        }
    }
}

pub(crate) fn draw_coin_display(canvas: &mut Canvas<'_>, coins: u32) {
    let label = format!("Coins: {coins}");
    let width = text_width(&label, BODY_SCALE);
    let x = SCREEN_WIDTH as i32 - width - 16;
    canvas.fill_rect(
        Rect::new(x as f32 - 8.0, 8.0, width as f32 + 16.0, 30.0),
        [0, 0, 0, 160],
    );
    canvas.draw_text(x, 16, &label, BODY_SCALE, HIGHLIGHT_COLOR);
}

pub(crate) fn draw_hint(canvas: &mut Canvas<'_>, hint: &str) {
    canvas.draw_text_centered(
        (SCREEN_WIDTH / 2.0) as i32,
        SCREEN_HEIGHT as i32 - 30,
        hint,
        SMALL_SCALE,
        DIM_TEXT_COLOR,
    );
}

pub(crate) fn fill_screen(canvas: &mut Canvas<'_>, color: [u8; 4]) {
    canvas.fill_rect(Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT), color);
}


#[cfg(test)]
mod tests {
    use super::testing::{frame_contains_color, render_to_frame};
    use super::*;

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut cursor = MenuCursor::default();
        cursor.move_up(3);
        assert_eq!(cursor.selected(), 2);
        cursor.move_down(3);
        assert_eq!(cursor.selected(), 0);
    }

    #[test]
    fn cursor_on_empty_list_is_inert() {
        let mut cursor = MenuCursor::default();
        cursor.navigate(InputAction::MoveDown, 0);
        cursor.navigate(InputAction::MoveUp, 0);

        assert_eq!(cursor.selected(), 0);
        assert_eq!(cursor.current(0), None);
    }

    #[test]
    fn clamp_keeps_cursor_inside_shrunk_list() {
        let mut cursor = MenuCursor::default();
        cursor.move_down(5);
        cursor.move_down(5);
        cursor.move_down(5);

        cursor.clamp_to(2);

        assert_eq!(cursor.current(2), Some(1));
    }

    #[test]
    fn coin_display_draws_highlighted_text() {
        let frame = render_to_frame(|canvas| draw_coin_display(canvas, 250));

        assert!(frame_contains_color(&frame, HIGHLIGHT_COLOR));
    }

    #[test]
    fn menu_marks_only_the_selected_row() {
        let frame = render_to_frame(|canvas| {
            draw_menu(canvas, &["New Game", "Exit"], Some(1), 200, MENU_SCALE);
        });

        assert!(frame_contains_color(&frame, HIGHLIGHT_COLOR));
        assert!(frame_contains_color(&frame, TEXT_COLOR));
    }
}
