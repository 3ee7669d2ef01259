// src/agents.rs
//
// Static display attributes for the fixed discussion panel. Unknown agent
// names fall back to neutral defaults, so every lookup is total.

use once_cell::sync::Lazy;
use ratatui::style::Color;
use std::collections::HashMap;

/// Pseudo-agent under which the user's own questions are recorded.
pub const USER_AGENT: &str = "参加者からの質問";

/// Glyph rendered in place of an avatar when an agent has none.
pub const PLACEHOLDER_AVATAR: &str = "👤";

static AGENT_COLORS: Lazy<HashMap<&'static str, Color>> = Lazy::new(|| {
    HashMap::from([
        ("AIみのるん", Color::Blue),
        ("AI吉田真吾", Color::Green),
        ("AI淡路大輔", Color::Magenta),
        (USER_AGENT, Color::Gray),
    ])
});

static AGENT_AVATARS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AIみのるん", "🎙"),
        ("AI吉田真吾", "🤖"),
        ("AI淡路大輔", "🛠"),
    ])
});

static AGENT_ACCENTS: Lazy<HashMap<&'static str, Color>> = Lazy::new(|| {
    HashMap::from([
        ("AIみのるん", Color::LightBlue),
        ("AI吉田真吾", Color::LightGreen),
        ("AI淡路大輔", Color::LightMagenta),
        (USER_AGENT, Color::DarkGray),
    ])
});

/// Bubble color for an agent.
pub fn color_for(agent: &str) -> Color {
    AGENT_COLORS.get(agent).copied().unwrap_or(Color::White)
}

/// Avatar glyph for an agent, if one is assigned.
pub fn avatar_for(agent: &str) -> Option<&'static str> {
    AGENT_AVATARS.get(agent).copied()
}

/// Color of the directional accent bar next to an agent's bubble.
pub fn accent_for(agent: &str) -> Color {
    AGENT_ACCENTS.get(agent).copied().unwrap_or(Color::DarkGray)
}
