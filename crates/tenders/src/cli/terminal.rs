//! Terminal capability detection and styling

use std::sync::OnceLock;

use owo_colors::{OwoColorize, Rgb};
use tenders_core::Theme;

/// Columns below which tables drop their secondary columns.
const NARROW_WIDTH: u16 = 100;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Foreground colours for one theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    success: Rgb,
    warning: Rgb,
    info: Rgb,
}

/// Darker tones for light backgrounds, lighter ones for dark backgrounds.
const fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            success: Rgb(0, 128, 0),
            warning: Rgb(204, 102, 0),
            info: Rgb(0, 90, 180),
        },
        Theme::Dark => Palette {
            success: Rgb(144, 238, 144),
            warning: Rgb(255, 165, 0),
            info: Rgb(173, 216, 230),
        },
    }
}

/// Selects the palette for the rest of the process. Only the first call
/// takes effect.
pub fn use_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::trace!("theme already selected");
    }
}

fn current_palette() -> Palette {
    palette(THEME.get().copied().unwrap_or_default())
}

/// Whether stdout takes colour.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Terminal width, if stdout is a terminal.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Whether the terminal is too narrow for the full tender table.
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < NARROW_WIDTH)
}

/// Styling for terminal output in the selected theme's palette. Plain text
/// when colour is unsupported.
pub trait Colorize {
    /// Green, for completed actions.
    fn success(&self) -> String;
    /// Amber, for things that need attention.
    fn warning(&self) -> String;
    /// Blue, for neutral highlights.
    fn info(&self) -> String;
    /// Dimmed, for secondary detail.
    fn dim(&self) -> String;
    /// Bold, for headings.
    fn heading(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.color(current_palette().success).to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.color(current_palette().warning).to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.color(current_palette().info).to_string()
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

    fn heading(&self) -> String {
        if supports_color() {
            self.bold().to_string()
        } else {
            self.to_string()
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

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn heading(&self) -> String {
        self.as_str().heading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn rgb(colour: Rgb) -> (u8, u8, u8) {
        (colour.0, colour.1, colour.2)
    }

    #[test]
    fn themes_use_distinct_palettes() {
        let light = palette(Theme::Light);
        let dark = palette(Theme::Dark);

        assert_ne!(rgb(light.success), rgb(dark.success));
        assert_ne!(rgb(light.warning), rgb(dark.warning));
        assert_ne!(rgb(light.info), rgb(dark.info));
    }

    #[test]
    fn palette_defaults_to_the_light_theme() {
        assert_eq!(rgb(palette(Theme::default()).info), rgb(palette(Theme::Light).info));
    }
}
