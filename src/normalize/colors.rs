use crate::models::DotType;

/// Neutral color for applications with no palette entry.
pub const DEFAULT_APP_COLOR: &str = "#6B7280";

/// Known applications, matched case-insensitively as substrings of the app
/// name. Earlier entries win, so more specific patterns come first.
const APP_PALETTE: &[(&str, &str)] = &[
    ("chrome", "#4285F4"),
    ("chromium", "#4285F4"),
    ("firefox", "#FF7139"),
    ("safari", "#1B88CA"),
    ("brave", "#FB542B"),
    ("edge", "#0078D7"),
    ("vscodium", "#2F80ED"),
    ("vs code", "#007ACC"),
    ("code", "#007ACC"),
    ("cursor", "#111827"),
    ("intellij", "#FE315D"),
    ("pycharm", "#21D789"),
    ("goland", "#0D7BF7"),
    ("neovim", "#57A143"),
    ("vim", "#019733"),
    ("emacs", "#7F5AB6"),
    ("slack", "#4A154B"),
    ("discord", "#5865F2"),
    ("teams", "#6264A7"),
    ("zoom", "#2D8CFF"),
    ("terminal", "#2E3436"),
    ("iterm", "#2E3436"),
    ("warp", "#01A4FF"),
    ("kitty", "#2E3436"),
    ("alacritty", "#F46D01"),
    ("spotify", "#1DB954"),
    ("figma", "#A259FF"),
    ("notion", "#000000"),
    ("obsidian", "#7C3AED"),
    ("outlook", "#0078D4"),
    ("thunderbird", "#0A84FF"),
];

pub fn type_color(dot_type: DotType) -> &'static str {
    match dot_type {
        DotType::Activity => "#3B82F6",
        DotType::Git => "#F97316",
        DotType::Shell => "#22C55E",
        DotType::Browser => "#06B6D4",
        DotType::File => "#A855F7",
        DotType::Afk => "#9CA3AF",
        DotType::Screenshot => "#EC4899",
    }
}

pub fn app_color(app_name: &str) -> &'static str {
    let lowered = app_name.to_lowercase();
    APP_PALETTE
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_APP_COLOR)
}
