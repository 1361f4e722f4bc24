//! Color palette and styles for the subscription box terminal.
//!
//! Dark background, violet accents for anything encrypted, green for
//! verified cleartext.

use ratatui::style::{Color, Modifier, Style};

use crate::application::ToastKind;

/// Mystery box theme color palette.
pub struct BoxTheme;

impl BoxTheme {
    // === Primary Colors ===

    /// Violet - Primary color (sealed, encrypted)
    pub const PRIMARY: Color = Color::Rgb(139, 92, 246); // #8B5CF6

    /// Lighter violet for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(196, 181, 253); // #C4B5FD

    /// Darker violet for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(91, 33, 182); // #5B21B6

    // === Secondary Colors ===

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Emerald - Success/verified
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber - Pending work
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose - Error
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue - Info
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Background Colors ===

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for the highlighted list row
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the form field being edited
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Encrypted values render in the accent color, cleartext in green.
    #[must_use]
    pub fn preference(verified: bool) -> Style {
        if verified {
            Self::success().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::PRIMARY_LIGHT)
        }
    }

    #[must_use]
    pub fn toast(kind: ToastKind) -> Style {
        match kind {
            ToastKind::Pending => Self::warning(),
            ToastKind::Success => Self::success(),
            ToastKind::Error => Self::danger(),
        }
        .add_modifier(Modifier::BOLD)
    }

    /// Gauge color for a 0.0..=1.0 ratio
    #[must_use]
    pub fn gauge(ratio: f64) -> Style {
        if ratio >= 0.7 {
            Self::success()
        } else if ratio >= 0.3 {
            Self::warning()
        } else {
            Self::info()
        }
    }
}

/// ASCII art logo for the connect screen
pub const LOGO: &str = r"
╔╦╗┬ ┬┌─┐┌┬┐┌─┐┬─┐┬ ┬  ╔╗ ┌─┐─┐ ┬
║║║└┬┘└─┐ │ ├┤ ├┬┘└┬┘  ╠╩╗│ │┌┴┬┘
╩ ╩ ┴ └─┘ ┴ └─┘┴└─ ┴   ╚═╝└─┘┴ └─
";

/// Smaller inline logo
pub const LOGO_SMALL: &str = "Mysterybox";
