//! Rendering configuration consulted by the layout engine.
//!
//! Settings are read-only for the engine: the host application builds
//! them once and the renderers consult them at layout and paint time.

use serde::{Deserialize, Serialize};

use crate::canvas::Color;

/// How rhythm notation is displayed below a tablature staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabRhythmMode {
    Hidden,
    /// Stems below the staff, connected with beams.
    ShowWithBeams,
    /// Stems below the staff, each closed with a short bar.
    ShowWithBars,
}

/// Display-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Global rendering scale. All layout constants are multiplied by
    /// this factor.
    pub scale: f64,
    pub resources: RenderingResources,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            resources: RenderingResources::default(),
        }
    }
}

/// Per-notation-kind toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotationSettings {
    /// Whether rests are drawn on tablature staves.
    pub show_tab_rests: bool,
    /// Rhythm notation below tablature staves.
    pub rhythm_mode: TabRhythmMode,
    /// Length of the rhythm stems below a tablature staff.
    pub rhythm_height: f64,
    /// Whether grace beats on tablature staves use small fret numbers.
    pub small_grace_tab_notes: bool,
}

impl Default for NotationSettings {
    fn default() -> Self {
        Self {
            show_tab_rests: true,
            rhythm_mode: TabRhythmMode::Hidden,
            rhythm_height: 15.0,
            small_grace_tab_notes: true,
        }
    }
}

/// Colors used when painting glyphs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingResources {
    /// Color of all primary-voice glyphs.
    pub main_glyph_color: Color,
    /// Color of secondary-voice glyphs (voice index 1 and up).
    pub secondary_glyph_color: Color,
    /// Color of staff and string lines.
    pub stave_line_color: Color,
}

impl Default for RenderingResources {
    fn default() -> Self {
        Self {
            main_glyph_color: Color::rgb(26, 26, 26),
            secondary_glyph_color: Color::rgba(26, 26, 26, 100),
            stave_line_color: Color::rgb(85, 85, 85),
        }
    }
}

/// Root configuration object handed to the renderers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub display: DisplaySettings,
    pub notation: NotationSettings,
}
