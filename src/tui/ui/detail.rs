//! Detail view of one subscription box.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::Session;
use crate::domain::SubscriptionBox;
use crate::tui::styles::BoxTheme;

pub fn render_detail(f: &mut Frame, area: Rect, session: &Session, id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Record
            Constraint::Length(2), // Footer
        ])
        .split(area);

    match session.find(id) {
        Some(b) => render_record(f, chunks[0], session, b),
        None => {
            let p = Paragraph::new(Line::from(Span::styled(
                format!(" Subscription {id} is no longer listed."),
                BoxTheme::danger(),
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(BoxTheme::border()),
            );
            f.render_widget(p, chunks[0]);
        }
    }

    super::render_footer(
        f,
        chunks[1],
        &[("D", "Decrypt & Verify"), ("R", "Refresh"), ("Esc", "Back")],
    );
}

fn render_record(f: &mut Frame, area: Rect, session: &Session, b: &SubscriptionBox) {
    let created = b
        .created_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    let (preference, preference_style) = match session.revealed(&b.id).or(b.verified_preference()) {
        Some(v) => (format!("{v} / 100"), BoxTheme::preference(true)),
        None => (b.preference_label(), BoxTheme::preference(false)),
    };

    let status = if session.is_decrypting(&b.id) {
        Span::styled("Decrypting...", BoxTheme::warning())
    } else if b.is_verified {
        Span::styled("Verified on-chain", BoxTheme::success())
    } else {
        Span::styled("Encrypted", BoxTheme::text_muted())
    };

    let description = if b.description.is_empty() {
        Span::styled("(no description)", BoxTheme::text_muted())
    } else {
        Span::styled(b.description.clone(), BoxTheme::text())
    };

    let lines = vec![
        field("Id", Span::styled(b.id.clone(), BoxTheme::text_secondary())),
        field("Category", Span::styled(b.category.label(), BoxTheme::info())),
        field("Preference", Span::styled(preference, preference_style)),
        field("Status", status),
        field("Creator", Span::styled(b.creator.to_string(), BoxTheme::text_secondary())),
        field("Created", Span::styled(created, BoxTheme::text_secondary())),
        Line::from(""),
        field("Description", description),
    ];

    let block = Block::default()
        .title(Span::styled(format!(" {} ", b.name), BoxTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BoxTheme::border_focused());

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn field(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<12} "), BoxTheme::text_secondary()),
        value,
    ])
}
