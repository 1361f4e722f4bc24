//! Landing view shown while no wallet is connected.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::{BoxTheme, LOGO};

pub fn render_connect(f: &mut Frame, area: Rect, account_hint: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Logo
            Constraint::Min(0),    // Prompt
            Constraint::Length(3), // Footer
        ])
        .margin(1)
        .split(area);

    let logo: Vec<Line> = LOGO
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| Line::from(Span::styled(l.to_string(), BoxTheme::subtitle())))
        .collect();
    f.render_widget(Paragraph::new(logo).alignment(Alignment::Center), chunks[0]);

    let prompt = vec![
        Line::from(Span::styled(
            "Confidential Subscription Boxes",
            BoxTheme::title(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Your preference score is encrypted on your machine before it reaches the contract.",
            BoxTheme::text_secondary(),
        )),
        Line::from(Span::styled(
            "Boxes are matched homomorphically; nobody sees the score until you decrypt it.",
            BoxTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Local wallet: ", BoxTheme::text_muted()),
            Span::styled(account_hint.to_string(), BoxTheme::text()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(BoxTheme::border_focused());
    f.render_widget(
        Paragraph::new(prompt)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        chunks[1],
    );

    super::render_footer(
        f,
        chunks[2],
        &[("C", "Connect Wallet"), ("?", "FAQ"), ("Q", "Quit")],
    );
}
