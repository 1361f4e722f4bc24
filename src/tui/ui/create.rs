//! Creation form for a new subscription box.
//!
//! The form edits the session's draft in place; validation happens when it
//! is submitted.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{SubscriptionDraft, MAX_PREFERENCE, MIN_PREFERENCE};
use crate::tui::styles::BoxTheme;

const NAME_MAX_CHARS: usize = 64;
const DESCRIPTION_MAX_CHARS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Category,
    Preference,
    Description,
}

impl FormField {
    const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Category,
        FormField::Preference,
        FormField::Description,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Box Name",
            Self::Category => "Category",
            Self::Preference => "Preference Score",
            Self::Description => "Description",
        }
    }

    fn hint(self) -> String {
        match self {
            Self::Name => "e.g. Monthly gadget surprise".to_string(),
            Self::Category => "←/→ to choose".to_string(),
            Self::Preference => format!("{MIN_PREFERENCE}-{MAX_PREFERENCE}, encrypted before sending"),
            Self::Description => "optional".to_string(),
        }
    }
}

/// Focus state of the creation form.
#[derive(Debug, Clone, Default)]
pub struct CreateFormState {
    pub selected: FormField,
}

impl CreateFormState {
    pub fn next_field(&mut self) {
        let i = (self.selected.index() + 1) % FormField::ALL.len();
        self.selected = FormField::ALL[i];
    }

    pub fn prev_field(&mut self) {
        let i = (self.selected.index() + FormField::ALL.len() - 1) % FormField::ALL.len();
        self.selected = FormField::ALL[i];
    }

    /// Type a character into the focused field.
    ///
    /// The preference field only takes digits.
    pub fn input_char(&mut self, draft: &mut SubscriptionDraft, c: char) {
        match self.selected {
            FormField::Name => {
                if !c.is_control() && draft.name.chars().count() < NAME_MAX_CHARS {
                    draft.name.push(c);
                }
            }
            FormField::Preference => {
                if c.is_ascii_digit() && draft.preference.len() < 3 {
                    draft.preference.push(c);
                }
            }
            FormField::Description => {
                if !c.is_control() && draft.description.chars().count() < DESCRIPTION_MAX_CHARS {
                    draft.description.push(c);
                }
            }
            FormField::Category => {}
        }
    }

    pub fn delete_char(&mut self, draft: &mut SubscriptionDraft) {
        match self.selected {
            FormField::Name => {
                draft.name.pop();
            }
            FormField::Preference => {
                draft.preference.pop();
            }
            FormField::Description => {
                draft.description.pop();
            }
            FormField::Category => {}
        }
    }

    /// Left/Right on the category field.
    pub fn cycle_category(&mut self, draft: &mut SubscriptionDraft, forward: bool) {
        if self.selected == FormField::Category {
            draft.category = if forward {
                draft.category.next()
            } else {
                draft.category.prev()
            };
        }
    }
}

pub fn render_create(
    f: &mut Frame,
    area: Rect,
    draft: &SubscriptionDraft,
    state: &CreateFormState,
    creating: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Category
            Constraint::Length(3), // Preference
            Constraint::Length(5), // Description
            Constraint::Min(0),
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    for field in FormField::ALL {
        let value = match field {
            FormField::Name => draft.name.clone(),
            FormField::Category => format!("‹ {} ›", draft.category.label()),
            FormField::Preference => draft.preference.clone(),
            FormField::Description => draft.description.clone(),
        };
        render_field(f, chunks[field.index()], field, value, state.selected == field);
    }

    let status = if creating {
        Line::from(Span::styled(
            " Submitting encrypted subscription...",
            BoxTheme::warning(),
        ))
    } else if draft.is_submittable() {
        Line::from(Span::styled(" Ready to submit", BoxTheme::success()))
    } else {
        Line::from(Span::styled(
            " Name and preference score are required",
            BoxTheme::text_muted(),
        ))
    };
    f.render_widget(Paragraph::new(status), chunks[4]);

    super::render_footer(
        f,
        chunks[5],
        &[
            ("Tab/↑↓", "Navigate"),
            ("←→", "Category"),
            ("Enter", "Create"),
            ("Esc", "Cancel"),
        ],
    );
}

fn render_field(f: &mut Frame, area: Rect, field: FormField, value: String, focused: bool) {
    let (border, title_style) = if focused {
        (BoxTheme::border_focused(), BoxTheme::focused())
    } else {
        (BoxTheme::border(), BoxTheme::text_secondary())
    };

    let shown = if value.is_empty() {
        Span::styled(field.hint(), BoxTheme::text_muted())
    } else {
        Span::styled(value, BoxTheme::text())
    };

    let mut spans = vec![Span::raw(" "), shown];
    if focused && field != FormField::Category {
        spans.push(Span::styled("▌", BoxTheme::focused()));
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border),
    );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn test_field_navigation_wraps() {
        let mut state = CreateFormState::default();
        state.prev_field();
        assert_eq!(state.selected, FormField::Description);
        state.next_field();
        assert_eq!(state.selected, FormField::Name);
    }

    #[test]
    fn test_preference_accepts_digits_only() {
        let mut state = CreateFormState {
            selected: FormField::Preference,
        };
        let mut draft = SubscriptionDraft::default();
        for c in "4x2.7".chars() {
            state.input_char(&mut draft, c);
        }
        assert_eq!(draft.preference, "427");

        state.input_char(&mut draft, '1');
        assert_eq!(draft.preference, "427");

        state.delete_char(&mut draft);
        assert_eq!(draft.preference, "42");
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut state = CreateFormState::default();
        let mut draft = SubscriptionDraft::default();
        for c in "Tea".chars() {
            state.input_char(&mut draft, c);
        }
        state.next_field();
        state.input_char(&mut draft, 'z');
        assert_eq!(draft.name, "Tea");
        assert_eq!(draft.category, Category::Electronics);
    }

    #[test]
    fn test_category_cycles_only_when_focused() {
        let mut state = CreateFormState::default();
        let mut draft = SubscriptionDraft::default();
        state.cycle_category(&mut draft, true);
        assert_eq!(draft.category, Category::Electronics);

        state.next_field();
        state.cycle_category(&mut draft, true);
        assert_eq!(draft.category, Category::Fashion);
        state.cycle_category(&mut draft, false);
        state.cycle_category(&mut draft, false);
        assert_eq!(draft.category, Category::Sports);
    }
}
