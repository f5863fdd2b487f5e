//! Rendering tests — drive full bar columns and check the painted SVG
//! output and the derived interactive geometry.

use stafflib::canvas::SvgCanvas;
use stafflib::model::*;
use stafflib::renderer::*;
use stafflib::settings::{Settings, TabRhythmMode};

// ─── Helpers ────────────────────────────────────────────────────────

fn tab_staff_with_bar(bar: Bar) -> Staff {
    let mut staff = Staff::new(0, StaffKind::Tab);
    staff.string_tuning = vec![64, 59, 55, 50, 45, 40];
    staff.bars.push(bar);
    staff
}

fn fretted_bar(index: usize, frets: &[i32]) -> Bar {
    let mut bar = Bar::new(index);
    let mut voice = Voice::new(0);
    for (i, &fret) in frets.iter().enumerate() {
        let mut beat = Beat::new(i, Duration::Quarter);
        beat.notes.push(Note::fretted(1, fret));
        voice.beats.push(beat);
    }
    bar.voices.push(voice);
    bar
}

/// Run the full pass sequence over a single-stave column and paint it.
fn render_column(column: &mut BarColumn, width: f64, height: f64) -> String {
    column.do_layout();
    while column.align() {}
    column.finalize();
    let mut canvas = SvgCanvas::new(width, height);
    column.paint(0.0, 0.0, &mut canvas);
    canvas.build()
}

// ─── SVG output ─────────────────────────────────────────────────────

#[test]
fn tab_bar_renders_fret_numbers_and_string_lines() {
    let staff = tab_staff_with_bar(fretted_bar(0, &[5, 7]));
    let settings = Settings::default();
    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &staff,
        staff.bars.first(),
        &settings,
        column.layouting_info(),
    )));

    let svg = render_column(&mut column, 500.0, 200.0);

    assert!(svg.starts_with("<svg"), "output should be SVG");
    assert!(svg.contains("</svg>"), "SVG should be closed");
    assert!(svg.contains("<line"), "SVG should contain string lines");
    assert!(svg.contains(">5</text>"), "SVG should contain fret 5");
    assert!(svg.contains(">7</text>"), "SVG should contain fret 7");

    for renderer in column.renderers() {
        assert!(
            renderer.base().is_finalized,
            "painting runs on finalized renderers only"
        );
    }
}

#[test]
fn secondary_voice_paints_in_secondary_color() {
    let mut bar = fretted_bar(0, &[3]);
    let mut secondary = Voice::new(1);
    let mut beat = Beat::new(0, Duration::Quarter);
    beat.notes.push(Note::fretted(4, 2));
    secondary.beats.push(beat);
    bar.voices.push(secondary);
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let secondary_css = settings.display.resources.secondary_glyph_color.css();
    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &staff,
        staff.bars.first(),
        &settings,
        column.layouting_info(),
    )));

    let svg = render_column(&mut column, 500.0, 200.0);

    assert!(
        svg.contains(&secondary_css),
        "voice index 1 must paint in the secondary color ({secondary_css})"
    );
    let main_css = settings.display.resources.main_glyph_color.css();
    assert!(svg.contains(&main_css), "primary content keeps the main color");
}

#[test]
fn simile_marked_bar_paints_symbol_instead_of_content() {
    let mut bar = fretted_bar(0, &[9]);
    bar.simile_mark = SimileMark::Simple;
    let staff = tab_staff_with_bar(bar);

    let settings = Settings::default();
    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &staff,
        staff.bars.first(),
        &settings,
        column.layouting_info(),
    )));

    let svg = render_column(&mut column, 500.0, 200.0);

    assert!(
        svg.contains("&#xE500;"),
        "simile bars paint the repeat symbol"
    );
    assert!(
        !svg.contains(">9</text>"),
        "simile bars do not paint their voice content"
    );
}

#[test]
fn rhythm_beams_paint_below_the_tab_staff() {
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    for i in 0..4 {
        let mut beat = Beat::new(i, Duration::Eighth);
        beat.notes.push(Note::fretted(2, i as i32));
        voice.beats.push(beat);
    }
    bar.voices.push(voice);
    let staff = tab_staff_with_bar(bar);

    let mut settings = Settings::default();
    settings.notation.rhythm_mode = TabRhythmMode::ShowWithBeams;

    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &staff,
        staff.bars.first(),
        &settings,
        column.layouting_info(),
    )));
    let svg = render_column(&mut column, 500.0, 200.0);

    assert!(
        svg.contains(r#"stroke-width="4.0""#),
        "beamed eighths connect with a beam line below the staff"
    );
}

#[test]
fn hidden_tab_rests_keep_their_spacing() {
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    voice.beats.push(Beat::rest(0, Duration::Quarter));
    let mut beat = Beat::new(1, Duration::Quarter);
    beat.notes.push(Note::fretted(1, 5));
    voice.beats.push(beat);
    bar.voices.push(voice);
    let staff = tab_staff_with_bar(bar);

    let mut settings = Settings::default();
    settings.notation.show_tab_rests = false;

    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &staff,
        staff.bars.first(),
        &settings,
        column.layouting_info(),
    )));
    render_column(&mut column, 500.0, 200.0);

    let base = column.renderers()[0].base();
    let rest_end = base.get_beat_x(0, 0, BeatXPosition::EndBeat);
    let rest_start = base.get_beat_x(0, 0, BeatXPosition::PreNotes);
    assert!(
        rest_end > rest_start,
        "hidden rests keep their cell width for alignment"
    );
}

// ─── Bounds and hit-testing ─────────────────────────────────────────

#[test]
fn bounds_lookup_hits_beats_and_serializes() {
    let tab = tab_staff_with_bar(fretted_bar(0, &[5, 7]));

    let mut standard = Staff::new(1, StaffKind::Standard);
    let mut bar = Bar::new(0);
    let mut voice = Voice::new(0);
    let mut beat = Beat::new(0, Duration::Half);
    beat.notes.push(Note::pitched("C", 5));
    voice.beats.push(beat);
    bar.voices.push(voice);
    standard.bars.push(bar);

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

    column.do_layout();
    while column.align() {}
    column.finalize();
    column.renderers_mut()[1].base_mut().y = 120.0;

    let mut lookup = BoundsLookup::new();
    column.build_bounds_lookup(&mut lookup, 0.0, 0.0);

    assert_eq!(lookup.master_bars.len(), 1);
    assert_eq!(lookup.master_bars[0].bars.len(), 2);

    let target = lookup.master_bars[0].bars[0].beats[1].clone();
    let found = lookup
        .find_beat(
            target.real_bounds.x + target.real_bounds.w / 2.0,
            target.real_bounds.y + target.real_bounds.h / 2.0,
        )
        .expect("hit inside the second tab beat");
    assert_eq!(found.beat_index, 1);
    assert_eq!(found.voice_index, 0);

    assert!(lookup.find_beat(-50.0, -50.0).is_none());

    let json = lookup.to_json().expect("bounds serialize to JSON");
    assert!(json.contains("master_bars"));
    assert!(json.contains("real_bounds"));
}

#[test]
fn visual_bounds_sit_inside_real_bounds() {
    let staff = tab_staff_with_bar(fretted_bar(0, &[5]));
    let settings = Settings::default();
    let mut column = BarColumn::new(0);
    column.add_renderer(Box::new(TabBarRenderer::new(
        &staff,
        staff.bars.first(),
        &settings,
        column.layouting_info(),
    )));
    column.do_layout();
    while column.align() {}
    column.finalize();

    let mut lookup = BoundsLookup::new();
    column.build_bounds_lookup(&mut lookup, 0.0, 0.0);

    let bar_bounds = &lookup.master_bars[0].bars[0];
    assert!(bar_bounds.visual_bounds.y > bar_bounds.real_bounds.y);
    assert!(bar_bounds.visual_bounds.h < bar_bounds.real_bounds.h);
    for beat in &bar_bounds.beats {
        assert!(beat.visual_bounds.x >= beat.real_bounds.x);
        assert!(
            beat.visual_bounds.w <= beat.real_bounds.w,
            "the visual beat span excludes inter-beat spacing"
        );
    }
}
