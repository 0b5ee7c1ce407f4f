//! Terminal capability detection and utilities

use owo_colors::{colors::css, OwoColorize};
use procedures::domain::Tone;

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Width available for wrapped text, capped for readability.
pub fn text_width() -> usize {
    terminal_width().map_or(80, |w| usize::from(w).clamp(40, 100))
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color by category tone
    fn tone(&self, tone: Tone) -> String;
    /// Emphasise (bold)
    fn strong(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Reverse video, for highlighted procedures
    fn highlight(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        self.tone(Tone::Caution)
    }

    fn tone(&self, tone: Tone) -> String {
        if !supports_color() {
            return self.to_string();
        }
        match tone {
            Tone::Info => self.fg::<css::LightBlue>().to_string(),
            Tone::Caution => self.fg::<css::Orange>().to_string(),
            Tone::Danger => self.fg::<css::Red>().to_string(),
            Tone::Critical => self.fg::<css::MediumPurple>().to_string(),
        }
    }

    fn strong(&self) -> String {
        if supports_color() {
            self.bold().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }

    fn highlight(&self) -> String {
        if supports_color() {
            self.reversed().to_string()
        } else {
            format!(">> {self} <<")
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn tone(&self, tone: Tone) -> String {
        self.as_str().tone(tone)
    }

    fn strong(&self) -> String {
        self.as_str().strong()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn highlight(&self) -> String {
        self.as_str().highlight()
    }
}
