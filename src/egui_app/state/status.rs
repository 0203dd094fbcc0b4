use egui::Color32;

use crate::egui_app::ui::style::{self, StatusTone};

const MAX_LOG_LINES: usize = 200;

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
    pub tone: StatusTone,
    /// Rolling history of status messages, newest last.
    pub log: Vec<String>,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Ready".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(StatusTone::Idle),
            tone: StatusTone::Idle,
            log: Vec::new(),
        }
    }

    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        let text = text.into();
        self.badge_label = style::status_badge_label(tone).to_string();
        self.badge_color = style::status_badge_color(tone);
        self.tone = tone;
        self.log.push(text.clone());
        if self.log.len() > MAX_LOG_LINES {
            let overflow = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..overflow);
        }
        self.text = text;
    }

    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}
