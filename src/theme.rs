//! Built-in palettes and custom overrides.
//!
//! The palette follows the persisted `darkMode` setting; hex overrides from
//! the config file are applied on top of whichever palette is active.

use ratatui::style::Color;

use crate::config::ThemeColorsConfig;

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub bg: Color,
    pub fg: Color,

    // Cards
    pub card_bg: Color,
    pub card_selected_bg: Color,
    pub card_title_fg: Color,
    pub host_fg: Color,

    // Tabs & breadcrumbs
    pub tab_fg: Color,
    pub tab_active_fg: Color,
    pub crumb_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable)
    pub error_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        bg: Color::Reset,
        fg: Color::Rgb(205, 214, 244), // #cdd6f4 (text)

        card_bg: Color::Rgb(30, 30, 46),            // #1e1e2e (base)
        card_selected_bg: Color::Rgb(69, 71, 90),   // #45475a (surface1)
        card_title_fg: Color::Rgb(205, 214, 244),   // #cdd6f4
        host_fg: Color::Rgb(108, 112, 134),         // #6c7086 (overlay0)

        tab_fg: Color::Rgb(166, 173, 200),          // #a6adc8 (subtext0)
        tab_active_fg: Color::Rgb(137, 180, 250),   // #89b4fa (blue)
        crumb_fg: Color::Rgb(180, 190, 254),        // #b4befe (lavender)

        status_bg: Color::Rgb(30, 30, 46),
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),         // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250),

        dialog_bg: Color::Rgb(49, 50, 68),          // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),        // #f38ba8 (red)
        success_fg: Color::Rgb(166, 227, 161),      // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),
        accent_fg: Color::Rgb(203, 166, 247),       // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        bg: Color::Reset,
        fg: Color::Rgb(76, 79, 105), // #4c4f69 (text)

        card_bg: Color::Rgb(239, 241, 245),         // #eff1f5 (base)
        card_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        card_title_fg: Color::Rgb(76, 79, 105),
        host_fg: Color::Rgb(156, 160, 176),         // #9ca0b0 (overlay0)

        tab_fg: Color::Rgb(108, 111, 133),          // #6c6f85 (subtext0)
        tab_active_fg: Color::Rgb(30, 102, 245),    // #1e66f5 (blue)
        crumb_fg: Color::Rgb(114, 135, 253),        // #7287fd (lavender)

        status_bg: Color::Rgb(230, 233, 239),       // #e6e9ef (mantle)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190),       // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        dialog_bg: Color::Rgb(230, 233, 239),
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),          // #d20f39 (red)
        success_fg: Color::Rgb(64, 160, 43),        // #40a02b (green)
        info_fg: Color::Rgb(30, 102, 245),
        accent_fg: Color::Rgb(136, 57, 239),        // #8839ef (mauve)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn override_color(slot: &mut Color, hex: Option<&String>) {
    if let Some(color) = hex.and_then(|h| parse_hex_color(h)) {
        *slot = color;
    }
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the palette for the current dark-mode flag plus overrides.
pub fn resolve_theme(dark_mode: bool, custom: Option<&ThemeColorsConfig>) -> ThemeColors {
    let mut theme = if dark_mode { dark_theme() } else { light_theme() };
    if let Some(custom) = custom {
        apply_custom_colors(&mut theme, custom);
    }
    theme
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    override_color(&mut theme.fg, custom.fg.as_ref());
    override_color(&mut theme.card_bg, custom.card_bg.as_ref());
    override_color(&mut theme.card_selected_bg, custom.card_selected_bg.as_ref());
    override_color(&mut theme.card_title_fg, custom.card_title_fg.as_ref());
    override_color(&mut theme.host_fg, custom.host_fg.as_ref());
    override_color(&mut theme.tab_active_fg, custom.tab_active_fg.as_ref());
    override_color(&mut theme.status_bg, custom.status_bg.as_ref());
    override_color(&mut theme.status_fg, custom.status_fg.as_ref());
    override_color(&mut theme.border_fg, custom.border_fg.as_ref());
    override_color(&mut theme.dialog_bg, custom.dialog_bg.as_ref());
    override_color(&mut theme.dialog_border_fg, custom.dialog_border_fg.as_ref());
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#éé00"), None);
    }

    #[test]
    fn test_dark_mode_flag_picks_palette() {
        assert_eq!(resolve_theme(true, None).tab_active_fg, Color::Rgb(137, 180, 250));
        assert_eq!(resolve_theme(false, None).tab_active_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn test_custom_overrides_apply_to_either_palette() {
        let custom = ThemeColorsConfig {
            card_bg: Some("#1a1b26".into()),
            ..Default::default()
        };
        let light = resolve_theme(false, Some(&custom));
        assert_eq!(light.card_bg, Color::Rgb(26, 27, 38));
        assert_eq!(light.fg, Color::Rgb(76, 79, 105));
        let dark = resolve_theme(true, Some(&custom));
        assert_eq!(dark.card_bg, Color::Rgb(26, 27, 38));
    }

    #[test]
    fn test_invalid_override_keeps_palette_color() {
        let custom = ThemeColorsConfig {
            border_fg: Some("nope".into()),
            ..Default::default()
        };
        let theme = resolve_theme(true, Some(&custom));
        assert_eq!(theme.border_fg, Color::Rgb(88, 91, 112));
    }

    #[test]
    fn test_dark_and_light_different() {
        let dark = dark_theme();
        let light = light_theme();
        assert_ne!(dark.fg, light.fg);
        assert_ne!(dark.card_selected_bg, light.card_selected_bg);
        assert_ne!(dark.error_fg, light.error_fg);
    }
}
