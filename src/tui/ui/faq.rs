//! Static FAQ panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::BoxTheme;

const ENTRIES: &[(&str, &str)] = &[
    (
        "What is a mystery subscription box?",
        "A listing whose preference score is stored encrypted on-chain. The name, category and description are public.",
    ),
    (
        "How is my preference protected?",
        "It is encrypted with fully homomorphic encryption before the transaction is built. The contract only ever stores a ciphertext handle.",
    ),
    (
        "What does Decrypt & Verify do?",
        "The encrypted score is decrypted and the cleartext is submitted back with a gateway proof. Once the contract accepts it, the score is public and marked verified.",
    ),
    (
        "Is the category private?",
        "No. The category is derived from a public numeric field, so anyone reading the contract can see it.",
    ),
    (
        "Why does a box say \"already verified\"?",
        "Someone verified it before you. The stored cleartext is authoritative; reload to see it.",
    ),
];

pub fn render_faq(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let mut lines = Vec::with_capacity(ENTRIES.len() * 3);
    for (question, answer) in ENTRIES {
        lines.push(Line::from(Span::styled(format!("Q: {question}"), BoxTheme::subtitle())));
        lines.push(Line::from(Span::styled(format!("   {answer}"), BoxTheme::text_secondary())));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(Span::styled(" FAQ ", BoxTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(BoxTheme::border());
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), chunks[0]);

    super::render_footer(f, chunks[1], &[("Esc", "Back")]);
}
