//! UI module: View components for the TUI.

pub mod browse;
pub mod connect;
pub mod create;
pub mod detail;
pub mod faq;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::application::{OperationHistory, Session, Toast};
use crate::tui::styles::{BoxTheme, LOGO_SMALL};

/// Top bar: app name, account and FHE status.
pub fn render_header(f: &mut Frame, area: Rect, session: &Session, screen_title: &str) {
    let mut spans = vec![
        Span::styled(" ", BoxTheme::text()),
        Span::styled(LOGO_SMALL, BoxTheme::title()),
        Span::styled(" │ ", BoxTheme::text_muted()),
        Span::styled(screen_title.to_string(), BoxTheme::text_secondary()),
        Span::styled(" │ ", BoxTheme::text_muted()),
    ];

    match session.account() {
        Some(account) => {
            spans.push(Span::styled(account.short(), BoxTheme::text()));
            spans.push(Span::styled(" │ FHE ", BoxTheme::text_muted()));
            if session.fhe_ready() {
                spans.push(Span::styled("Ready", BoxTheme::success()));
            } else if session.is_loading() {
                spans.push(Span::styled("Initializing...", BoxTheme::warning()));
            } else {
                spans.push(Span::styled("Not initialized", BoxTheme::danger()));
            }
        }
        None => spans.push(Span::styled("Wallet not connected", BoxTheme::text_muted())),
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(BoxTheme::border()),
    );

    f.render_widget(header, area);
}

/// Status line for the current toast, or nothing.
pub fn render_toast(f: &mut Frame, area: Rect, toast: Option<&Toast>) {
    let line = match toast {
        Some(toast) => Line::from(vec![
            Span::raw(" "),
            Span::styled(toast.message.clone(), BoxTheme::toast(toast.kind)),
        ]),
        None => Line::from(""),
    };

    let p = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(BoxTheme::border()),
    );

    f.render_widget(p, area);
}

/// Recent activity, newest first.
pub fn render_history(f: &mut Frame, area: Rect, history: &OperationHistory) {
    let block = Block::default()
        .title(Span::styled(" Recent Activity ", BoxTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BoxTheme::border());

    if history.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            " No activity yet",
            BoxTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = history
        .entries()
        .map(|entry| ListItem::new(Line::from(Span::styled(entry.to_string(), BoxTheme::text_secondary()))))
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// `[K] Description` pairs for footers.
pub(crate) fn key_hints(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, desc) in pairs {
        spans.push(Span::styled(format!("[{key}] "), BoxTheme::key_hint()));
        spans.push(Span::styled(format!("{desc} "), BoxTheme::key_desc()));
    }
    Line::from(spans)
}

pub(crate) fn render_footer(f: &mut Frame, area: Rect, pairs: &[(&str, &str)]) {
    let footer = Paragraph::new(key_hints(pairs)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(BoxTheme::border()),
    );
    f.render_widget(footer, area);
}
