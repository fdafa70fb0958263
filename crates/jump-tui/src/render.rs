//! Selector rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::selector::{SelectorMode, SelectorState};

pub const SELECT_INSTRUCTIONS: &str =
    "Use <j>/<k> or <up>/<down> to navigate, <Enter> to select, <q> to quit.";
pub const PRUNE_INSTRUCTIONS: &str =
    "Use <j>/<k> or <up>/<down> to navigate, <d> to delete, <q> to quit.";

/// Rows reserved above the list when the banner is shown (banner + spacer).
const BANNER_ROWS: u16 = 2;

pub fn instructions_for(mode: SelectorMode) -> &'static str {
    match mode {
        SelectorMode::Select => SELECT_INSTRUCTIONS,
        SelectorMode::Prune => PRUNE_INSTRUCTIONS,
    }
}

/// Draws the optional banner and the item list, the cursor row reversed.
pub fn render_selector(frame: &mut Frame, state: &SelectorState, banner: Option<&str>) {
    let area = frame.area();

    let list_area = match banner {
        Some(text) if area.height > 0 => {
            let banner_area = Rect::new(area.x, area.y, area.width, 1);
            let banner = Paragraph::new(Line::styled(
                text.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(banner, banner_area);

            let offset = BANNER_ROWS.min(area.height);
            Rect::new(area.x, area.y + offset, area.width, area.height - offset)
        }
        _ => area,
    };

    let items: Vec<ListItem> = state
        .items()
        .iter()
        .map(|item| ListItem::new(Line::raw(item.clone())))
        .collect();
    let list =
        List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if !state.is_empty() {
        list_state.select(Some(state.cursor()));
    }
    frame.render_stateful_widget(list, list_area, &mut list_state);
}
