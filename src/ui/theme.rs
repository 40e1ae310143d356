//! Colors for the dashboard chrome.
//!
//! Chart line colors belong to each chart (see [`crate::chart::ChartKind`]).
//! A theme only styles what surrounds them: frames, axes, tabs and the
//! severity of the worst reading. Dark and light variants differ in the
//! accent and muted colors.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

/// Luma above which the terminal background counts as light.
const LIGHT_BACKGROUND_LUMA: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Active tab, help frame and transient messages.
    pub accent: Color,
    /// Chart frames.
    pub frame: Color,
    pub frame_type: BorderType,
    /// Chart titles and the help heading.
    pub title: Style,
    pub axis: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    /// Readings in zones A and B.
    pub zone_ok: Color,
    /// Readings in zone C.
    pub zone_alert: Color,
    /// Readings in zone D.
    pub zone_critical: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self::palette(Color::Cyan, Color::Gray)
    }

    pub fn light() -> Self {
        Self::palette(Color::Blue, Color::DarkGray)
    }

    fn palette(accent: Color, muted: Color) -> Self {
        let bold_accent = Style::default().fg(accent).add_modifier(Modifier::BOLD);
        Self {
            accent,
            frame: muted,
            frame_type: BorderType::Rounded,
            title: bold_accent,
            axis: Style::default().fg(muted),
            tab_active: bold_accent,
            tab_inactive: Style::default().fg(muted),
            zone_ok: Color::Green,
            zone_alert: Color::Yellow,
            zone_critical: Color::Red,
        }
    }

    /// Pick a variant from the terminal background luma.
    ///
    /// Falls back to dark when the terminal does not answer the query.
    pub fn auto_detect() -> Self {
        Self::for_luma(terminal_light::luma().ok())
    }

    fn for_luma(luma: Option<f32>) -> Self {
        match luma {
            Some(luma) if luma > LIGHT_BACKGROUND_LUMA => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Healthy => Style::default().fg(self.zone_ok),
            Severity::Warning => Style::default().fg(self.zone_alert),
            Severity::Critical => Style::default()
                .fg(self.zone_critical)
                .add_modifier(Modifier::BOLD),
        }
    }
}
