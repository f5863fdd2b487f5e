//! Layout and negotiation tests — drive renderers through the pass
//! sequence and check the spacing protocol and derived geometry.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use stafflib::model::*;
use stafflib::renderer::*;
use stafflib::settings::Settings;

// ─── Helpers ────────────────────────────────────────────────────────

fn fresh_info() -> Rc<RefCell<BarLayoutingInfo>> {
    Rc::new(RefCell::new(BarLayoutingInfo::new()))
}

fn tab_staff() -> Staff {
    let mut staff = Staff::new(0, StaffKind::Tab);
    staff.string_tuning = vec![64, 59, 55, 50, 45, 40];
    staff
}

/// A bar with one voice of two fretted quarter notes.
fn simple_bar(index: usize) -> Bar {
    let mut bar = Bar::new(index);
    let mut voice = Voice::new(0);
    for i in 0..2 {
        let mut beat = Beat::new(i, Duration::Quarter);
        beat.notes.push(Note::fretted(1, 5));
        voice.beats.push(beat);
    }
    bar.voices.push(voice);
    bar
}

fn tab_staff_with_bar(bar: Bar) -> Staff {
    let mut staff = tab_staff();
    staff.bars.push(bar);
    staff
}

// ─── Negotiation protocol ───────────────────────────────────────────

#[test]
fn apply_layouting_info_is_idempotent() {
    let staff = tab_staff_with_bar(simple_bar(0));
    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());

    renderer.do_layout();
    renderer.register_layouting_info();

    assert!(
        renderer.apply_layouting_info(),
        "first application must perform work"
    );
    assert!(
        !renderer.apply_layouting_info(),
        "second application without re-registration must be a no-op"
    );

    // re-registering the same sizes widens nothing, so the version is
    // unchanged and application stays a no-op
    renderer.register_layouting_info();
    assert!(!renderer.apply_layouting_info());
}

#[test]
fn negotiation_keeps_maxima_regardless_of_order() {
    for order in [
        [10.0, 14.0, 8.0],
        [8.0, 10.0, 14.0],
        [14.0, 8.0, 10.0],
    ] {
        let mut info = BarLayoutingInfo::new();
        for width in order {
            info.update_pre_beat_size(width);
            info.update_post_beat_size(width / 2.0);
            info.update_min_beat_width(0, width * 2.0);
        }
        assert_eq!(info.pre_beat_size, 14.0);
        assert_eq!(info.post_beat_size, 7.0);
        assert_eq!(info.min_beat_width(0), 28.0);
    }
}

#[test]
fn narrower_registration_does_not_bump_version() {
    let mut info = BarLayoutingInfo::new();
    info.update_pre_beat_size(14.0);
    let version = info.version;
    info.update_pre_beat_size(10.0);
    assert_eq!(info.version, version, "narrowing writes must not widen");
    assert_eq!(info.pre_beat_size, 14.0);
}

#[test]
fn three_stave_column_shares_pre_beat_size() {
    let tab = tab_staff_with_bar(simple_bar(0));

    let mut standard = Staff::new(1, StaffKind::Standard);
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    for i in 0..2 {
        let mut beat = Beat::new(i, Duration::Quarter);
        beat.notes.push(Note::pitched("G", 4));
        voice.beats.push(beat);
    }
    bar.voices.push(voice);
    standard.bars.push(bar);

    let mut percussion = Staff::new(2, StaffKind::Percussion);
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    for i in 0..2 {
        let mut beat = Beat::new(i, Duration::Quarter);
        beat.notes.push(Note::percussion(2));
        voice.beats.push(beat);
    }
    bar.voices.push(voice);
    percussion.bars.push(bar);

    // a slash stave contributes a narrower pre-beat block (no clef)
    let mut slash = Staff::new(3, StaffKind::Slash);
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    let mut beat = Beat::new(0, Duration::Quarter);
    beat.notes.push(Note::fretted(1, 0));
    voice.beats.push(beat);
    bar.voices.push(voice);
    slash.bars.push(bar);

    let settings = Settings::default();
    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &tab,
        tab.bars.first(),
        &settings,
        column.layouting_info(),
    )));
    column.add_renderer(Box::new(ScoreBarRenderer::new(
        &standard,
        standard.bars.first(),
        &settings,
        column.layouting_info(),
    )));
    column.add_renderer(Box::new(PercussionBarRenderer::new(
        &percussion,
        percussion.bars.first(),
        &settings,
        column.layouting_info(),
    )));
    column.add_renderer(Box::new(SlashBarRenderer::new(
        &slash,
        slash.bars.first(),
        &settings,
        column.layouting_info(),
    )));

    column.do_layout();

    // natural contributions, before any negotiation
    let contributions: Vec<f64> = column
        .renderers()
        .iter()
        .map(|r| r.base().pre_beat_glyphs().width)
        .collect();
    let max_contribution = contributions.iter().copied().fold(0.0, f64::max);
    assert!(
        contributions.iter().any(|&c| c < max_contribution),
        "staves must contribute unequal pre-beat widths for this scenario"
    );

    while column.align() {}

    let info = column.layouting_info();
    let shared_pre = info.borrow().pre_beat_size;
    assert_eq!(
        shared_pre, max_contribution,
        "shared pre-beat size must be the maximum single contribution"
    );

    for renderer in column.renderers() {
        assert_eq!(
            renderer.base().beat_glyphs_start(),
            shared_pre,
            "every stave's voice containers must start after the shared pre-beat block"
        );
        assert_eq!(
            renderer.base().get_beat_x(0, 0, BeatXPosition::PreNotes),
            shared_pre
        );
    }
}

// ─── Voice omission ─────────────────────────────────────────────────

#[test]
fn empty_secondary_voice_is_omitted() {
    let mut bar = Bar::new(0);
    let mut primary = Voice::new(0);
    primary.beats.push(Beat::placeholder(0));
    bar.voices.push(primary);
    let mut secondary = Voice::new(1);
    let mut beat = Beat::new(0, Duration::Half);
    beat.notes.push(Note::fretted(3, 7));
    secondary.beats.push(beat);
    bar.voices.push(secondary);
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();
    assert_eq!(
        renderer.base().voice_container_count(),
        2,
        "an empty primary voice and a non-empty secondary voice both render"
    );

    let mut bar = Bar::new(0);
    let mut primary = Voice::new(0);
    primary.beats.push(Beat::placeholder(0));
    bar.voices.push(primary);
    let mut secondary = Voice::new(1);
    secondary.beats.push(Beat::placeholder(0));
    bar.voices.push(secondary);
    let staff = tab_staff_with_bar(bar);

    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();
    assert_eq!(
        renderer.base().voice_container_count(),
        1,
        "only the primary voice is materialized when every voice is empty"
    );
    assert!(renderer.base().has_container_for(0));
}

// ─── Width composition ──────────────────────────────────────────────

#[test]
fn width_covers_pre_voices_and_post() {
    let mut bar = simple_bar(0);
    let mut secondary = Voice::new(1);
    let mut beat = Beat::new(0, Duration::Eighth);
    beat.notes.push(Note::fretted(6, 12));
    secondary.beats.push(beat);
    bar.voices.push(secondary);
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();

    let base = renderer.base();
    let pre = base.pre_beat_glyphs().width;
    let post = base.post_beat_glyphs().width;
    let widest = base
        .voice_containers()
        .map(|c| c.width)
        .fold(0.0, f64::max);
    assert!(pre > 0.0, "leading bar carries clef and time signature");
    assert!(widest > 0.0);
    assert!(
        base.width >= pre + widest + post,
        "width {} must cover pre {} + widest voice {} + post {}",
        base.width,
        pre,
        widest,
        post
    );
}

// ─── Scaling ────────────────────────────────────────────────────────

#[test]
fn scale_to_width_keeps_fixed_decorations() {
    let staff = tab_staff_with_bar(simple_bar(0));
    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();
    renderer.register_layouting_info();
    renderer.apply_layouting_info();

    let pre = renderer.base().pre_beat_glyphs().width;
    let post = renderer.base().post_beat_glyphs().width;

    renderer.scale_to_width(400.0);

    let base = renderer.base();
    assert_eq!(base.width, 400.0);
    assert_eq!(base.pre_beat_glyphs().width, pre);
    assert_eq!(base.post_beat_glyphs().width, post);
    let voice = base.voice_container(0).expect("primary voice container");
    assert!(
        (voice.width - (400.0 - pre - post)).abs() < 1e-9,
        "only the voice region stretches to the justified width"
    );
}

// ─── Bounds ─────────────────────────────────────────────────────────

#[test]
fn empty_bar_beat_bounds_collapse_to_leading_edge() {
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    voice.beats.push(Beat::placeholder(0));
    bar.voices.push(voice);
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();
    renderer.register_layouting_info();
    renderer.apply_layouting_info();
    renderer.finalize_renderer();

    let mut master = MasterBarBounds::new(0);
    renderer.build_boundings_lookup(&mut master, 10.0, 20.0);
    let bar_bounds = &master.bars[0];
    assert_eq!(bar_bounds.beats.len(), 1);
    for beat in &bar_bounds.beats {
        assert_eq!(
            beat.visual_bounds.x, bar_bounds.visual_bounds.x,
            "empty bars collapse their beat bounds to the leading edge"
        );
        assert_eq!(beat.real_bounds.x, bar_bounds.visual_bounds.x);
    }
}

#[test]
fn all_rest_bar_keeps_per_beat_bounds() {
    // a bar whose primary voice holds only rests is not structurally
    // empty, so its beats keep their per-beat spacing
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    voice.beats.push(Beat::rest(0, Duration::Quarter));
    voice.beats.push(Beat::rest(1, Duration::Quarter));
    bar.voices.push(voice);
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();
    renderer.register_layouting_info();
    renderer.apply_layouting_info();
    renderer.finalize_renderer();

    let mut master = MasterBarBounds::new(0);
    renderer.build_boundings_lookup(&mut master, 0.0, 0.0);
    let beats = &master.bars[0].beats;
    assert_eq!(beats.len(), 2);
    assert!(
        beats[1].real_bounds.x > beats[0].real_bounds.x,
        "rest beats keep distinct cells"
    );
}

// ─── Re-layout ──────────────────────────────────────────────────────

#[test]
fn re_layout_keeps_pre_beat_glyphs_when_line_start_unchanged() {
    let staff = tab_staff_with_bar(simple_bar(0));
    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();

    let glyphs_before = renderer.base().pre_beat_glyphs().len();
    let width_before = renderer.base().pre_beat_glyphs().width;

    renderer.re_layout();

    assert_eq!(renderer.base().pre_beat_glyphs().len(), glyphs_before);
    assert_eq!(renderer.base().pre_beat_glyphs().width, width_before);
}

#[test]
fn re_layout_rebuilds_pre_beat_glyphs_on_line_start_flip() {
    let staff = tab_staff_with_bar(simple_bar(0));
    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();

    let width_as_line_start = renderer.base().pre_beat_glyphs().width;

    // the bar moved into the middle of a line: the clef disappears
    renderer.base_mut().index = 1;
    renderer.re_layout();

    let width_mid_line = renderer.base().pre_beat_glyphs().width;
    assert!(
        width_mid_line < width_as_line_start,
        "mid-line bars drop the leading clef"
    );

    // a second re-layout with unchanged status must not rebuild again
    let glyphs = renderer.base().pre_beat_glyphs().len();
    renderer.re_layout();
    assert_eq!(renderer.base().pre_beat_glyphs().len(), glyphs);
}

// ─── Placeholder renderers ──────────────────────────────────────────

#[test]
fn renderer_without_bar_is_a_noop() {
    let staff = tab_staff();
    let settings = Settings::default();
    let mut renderer = TabBarRenderer::new(&staff, None, &settings, fresh_info());

    renderer.do_layout();
    assert_eq!(renderer.base().width, 0.0);
    assert_eq!(renderer.base().voice_container_count(), 0);

    renderer.register_layouting_info();
    assert!(
        !renderer.apply_layouting_info(),
        "a blank renderer registers nothing and applies nothing"
    );
}

// ─── Beat positions ─────────────────────────────────────────────────

#[test]
fn beat_x_positions_are_ordered() {
    let staff = tab_staff_with_bar(simple_bar(0));
    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();
    renderer.register_layouting_info();
    renderer.apply_layouting_info();

    let base = renderer.base();
    let pre = base.get_beat_x(0, 0, BeatXPosition::PreNotes);
    let on = base.get_beat_x(0, 0, BeatXPosition::OnNotes);
    let middle = base.get_beat_x(0, 0, BeatXPosition::MiddleNotes);
    let post = base.get_beat_x(0, 0, BeatXPosition::PostNotes);
    let end = base.get_beat_x(0, 0, BeatXPosition::EndBeat);

    assert!(pre <= on && on <= middle && middle <= post && post <= end);
    assert!(end > pre, "a note beat occupies horizontal space");

    // the second beat starts where the first cell ends
    let second = base.get_beat_x(0, 1, BeatXPosition::PreNotes);
    assert_eq!(second, end);
}

// ─── Overflow registration ──────────────────────────────────────────

#[test]
fn overflow_registration_is_monotonic() {
    let mut bar = simple_bar(0);
    bar.voices[0].beats[0].tremolo_speed = Some(Duration::Sixteenth);
    bar.voices[0].beats[1].whammy_bar = true;
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let mut renderer =
        TabBarRenderer::new(&staff, staff.bars.first(), &settings, fresh_info());
    renderer.do_layout();

    let top = renderer.base().top_overflow;
    let bottom = renderer.base().bottom_overflow;
    assert!(top > 0.0, "tremolo marks reserve space above the staff");
    assert!(bottom > 0.0, "whammy curves reserve space below the staff");

    renderer.base_mut().register_overflow_top(top / 2.0);
    assert_eq!(
        renderer.base().top_overflow,
        top,
        "overflow only ever grows within a pass"
    );
}
