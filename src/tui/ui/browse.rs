//! Subscription list with stats, search and category filter.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::application::Session;
use crate::domain::{SubscriptionBox, SubscriptionStats};
use crate::tui::styles::BoxTheme;

/// Cursor and search-entry state of the list.
#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    pub selected: usize,
    /// Keystrokes go to the search box
    pub searching: bool,
}

impl BrowseState {
    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
        }
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub fn render_browse(f: &mut Frame, area: Rect, session: &Session, state: &BrowseState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(68), // List
            Constraint::Percentage(32), // Activity
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stats cards
            Constraint::Length(3), // Search + filter
            Constraint::Min(0),    // List
            Constraint::Length(2), // Footer
        ])
        .split(columns[0]);

    render_stats(f, left[0], session.stats());
    render_search_bar(f, left[1], session, state);
    render_list(f, left[2], session, state);
    super::render_footer(
        f,
        left[3],
        &[
            ("Enter", "Details"),
            ("D", "Decrypt"),
            ("N", "New"),
            ("/", "Search"),
            ("F", "Filter"),
            ("R", "Refresh"),
            ("A", "Availability"),
            ("C", "Disconnect"),
            ("?", "FAQ"),
        ],
    );

    super::render_history(f, columns[1], session.history());
}

fn render_stats(f: &mut Frame, area: Rect, stats: SubscriptionStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_stat_card(f, cards[0], "Total Boxes", stats.total.to_string());
    render_stat_card(f, cards[1], "Verified", stats.verified.to_string());
    let avg = if stats.verified == 0 {
        "-".to_string()
    } else {
        format!("{:.1}", stats.avg_preference)
    };
    render_stat_card(f, cards[2], "Avg Preference", avg);

    let ratio = if stats.total == 0 {
        0.0
    } else {
        stats.verified as f64 / stats.total as f64
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Revealed ", BoxTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(BoxTheme::border()),
        )
        .gauge_style(BoxTheme::gauge(ratio))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, cards[3]);
}

fn render_stat_card(f: &mut Frame, area: Rect, label: &str, value: String) {
    let block = Block::default()
        .title(Span::styled(format!(" {label} "), BoxTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BoxTheme::border());
    let p = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {value}"), BoxTheme::title())),
    ])
    .block(block);
    f.render_widget(p, area);
}

fn render_search_bar(f: &mut Frame, area: Rect, session: &Session, state: &BrowseState) {
    let (border, title_style) = if state.searching {
        (BoxTheme::border_focused(), BoxTheme::focused())
    } else {
        (BoxTheme::border(), BoxTheme::text_secondary())
    };

    let search = if session.query.search.is_empty() && !state.searching {
        Span::styled("press / to search name or description", BoxTheme::text_muted())
    } else {
        Span::styled(session.query.search.clone(), BoxTheme::text())
    };

    let mut spans = vec![Span::raw(" "), search];
    if state.searching {
        spans.push(Span::styled("▌", BoxTheme::focused()));
    }

    let title = format!(" Search │ {} ", session.query.category.label());
    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(title, title_style))
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(p, area);
}

fn render_list(f: &mut Frame, area: Rect, session: &Session, state: &BrowseState) {
    let title = if session.is_loading() {
        " Subscriptions (loading...) "
    } else if session.is_refreshing() {
        " Subscriptions (refreshing...) "
    } else if session.is_checking() {
        " Subscriptions (checking availability...) "
    } else {
        " Subscriptions "
    };
    let block = Block::default()
        .title(Span::styled(title, BoxTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BoxTheme::border());

    let visible = session.visible_boxes();
    if visible.is_empty() {
        let message = if session.boxes().is_empty() {
            " No subscriptions yet. Press [N] to create the first box."
        } else {
            " No subscriptions match your search."
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(message, BoxTheme::text_muted()))).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|b| ListItem::new(format_row(b, session)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected.min(visible.len() - 1)));

    let list = List::new(items)
        .block(block)
        .highlight_style(BoxTheme::selected())
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, area, &mut list_state);
}

fn format_row(b: &SubscriptionBox, session: &Session) -> Line<'static> {
    let status = if session.is_decrypting(&b.id) {
        Span::styled(" decrypting...", BoxTheme::warning())
    } else if b.is_verified {
        Span::styled(" verified", BoxTheme::success())
    } else {
        Span::styled(" sealed", BoxTheme::text_muted())
    };

    Line::from(vec![
        Span::styled(format!("{:<24}", truncate(&b.name, 24)), BoxTheme::text()),
        Span::styled(format!(" {:<12}", b.category.as_str()), BoxTheme::info()),
        Span::styled(
            format!(" {:>10}", b.preference_label()),
            BoxTheme::preference(b.is_verified),
        ),
        status,
    ])
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
