//! Shared layout constants (all in surface user units, at scale 1.0).

// ── Stave dimensions ────────────────────────────────────────────────
pub(super) const STAVE_LINE_SPACING: f64 = 10.0; // distance between staff/string lines
pub(super) const SCORE_LINE_COUNT: usize = 5; // standard notation staff lines
pub(super) const STAVE_PADDING: f64 = 7.5; // band above/below the lines inside a renderer
pub(super) const STAVE_LINE_WIDTH: f64 = 0.8;

// ── Pre/post-beat decoration widths ─────────────────────────────────
pub(super) const CLEF_WIDTH: f64 = 28.0;
pub(super) const TIME_SIG_WIDTH: f64 = 24.0;
pub(super) const TIME_SIG_FONT_SIZE: f64 = 20.0;
pub(super) const BAR_SEPARATOR_WIDTH: f64 = 2.0;

// ── Beat content ────────────────────────────────────────────────────
pub(super) const BEAT_PADDING: f64 = 10.0; // spacing appended after each beat's content
pub(super) const EMPTY_BEAT_WIDTH: f64 = 20.0; // placeholder beats stay clickable
pub(super) const NOTE_NUMBER_DIGIT_WIDTH: f64 = 7.0;
pub(super) const NOTE_NUMBER_FONT_SIZE: f64 = 11.0;
pub(super) const NOTEHEAD_WIDTH: f64 = 10.0;
pub(super) const ACCIDENTAL_WIDTH: f64 = 8.0;
pub(super) const REST_WIDTH: f64 = 10.0;
pub(super) const DOT_SPACING: f64 = 5.0;
pub(super) const DOT_RADIUS: f64 = 1.5;
pub(super) const GRACE_SCALE: f64 = 0.66;

// ── Stems and beams ─────────────────────────────────────────────────
pub(super) const STEM_LENGTH: f64 = 30.0;
pub(super) const STEM_WIDTH: f64 = 1.2;
pub(super) const BEAM_THICKNESS: f64 = 4.0;

// ── Effects protruding beyond the stave ─────────────────────────────
pub(super) const TREMOLO_OVERFLOW: f64 = 12.0;
pub(super) const TREMOLO_X_OFFSET: f64 = 5.0;
pub(super) const WHAMMY_OVERFLOW: f64 = 20.0;
pub(super) const WHAMMY_WIDTH: f64 = 14.0;

// ── Simile marks ────────────────────────────────────────────────────
pub(super) const SIMILE_WIDTH: f64 = 20.0;
pub(super) const SIMILE_DOUBLE_WIDTH: f64 = 28.0;
