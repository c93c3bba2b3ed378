use colouringpad::components::tools::Tool;
use colouringpad::config::{BLUE, PadConfig, RED, WHITE};
use colouringpad::io;
use colouringpad::ops::paint::PaintOutcome;
use colouringpad::project::Project;
use colouringpad::session::Session;
use egui::Vec2;
use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;
use std::path::Path;

fn write_picture(dir: &Path, name: &str, image: &RgbImage) -> std::path::PathBuf {
    let path = dir.join(name);
    io::save_png(image, &path).unwrap();
    path
}

fn select(session: &mut Session, color: Rgb<u8>) {
    let index = session
        .palette
        .colors()
        .iter()
        .position(|&c| c == color)
        .unwrap();
    session.palette.select(index);
    session.apply_palette_changes();
}

#[test]
fn fill_then_undo_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_picture(dir.path(), "white.png", &RgbImage::from_pixel(10, 10, WHITE));

    let mut session = Session::new(PadConfig::default());
    session.load(&path, Vec2::new(800.0, 600.0)).unwrap();
    assert_eq!(session.zoom.zoom_percent(), 100);
    select(&mut session, RED);

    session.press(Vec2::new(5.5, 5.5));
    assert_eq!(session.release(Vec2::new(5.5, 5.5)), PaintOutcome::Filled(100));
    assert!(session.project.image.pixels().all(|p| *p == RED));
    assert!(session.project.is_dirty);

    assert!(session.undo());
    assert!(session.project.image.pixels().all(|p| *p == WHITE));
}

#[test]
fn palette_keeps_colours_above_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbImage::from_fn(10, 10, |x, _| if x < 9 { RED } else { BLUE });
    let path = write_picture(dir.path(), "two.png", &img);

    let project = Project::load(&path, &PadConfig::default()).unwrap();
    assert_eq!(project.colours.len(), 32);
    assert!(project.colours.contains(&RED));
    assert!(project.colours.contains(&BLUE));
    let mut sorted = project.colours.clone();
    sorted.sort_by_key(|c| c.0);
    assert_eq!(project.colours, sorted);
}

#[test]
fn dropper_picks_colour_without_touching_picture() {
    let dir = tempfile::tempdir().unwrap();
    let img = RgbImage::from_fn(6, 6, |x, _| if x < 3 { RED } else { BLUE });
    let path = write_picture(dir.path(), "pick.png", &img);

    let mut session = Session::new(PadConfig::default());
    session.load(&path, Vec2::new(800.0, 600.0)).unwrap();
    session.set_tool(Tool::Dropper);
    session.press(Vec2::new(4.5, 1.5));
    assert_eq!(
        session.release(Vec2::new(4.5, 1.5)),
        PaintOutcome::Sampled(BLUE)
    );

    assert_eq!(session.chosen_color(), BLUE);
    assert_eq!(session.tools.active(), Tool::Fill);
    assert_eq!(session.project.image, img);
    assert!(!session.project.is_dirty);
}

#[test]
fn saved_picture_reloads_with_fills() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_picture(dir.path(), "sheet.png", &RgbImage::from_pixel(4, 4, WHITE));

    let mut session = Session::new(PadConfig::default());
    session.load(&path, Vec2::new(800.0, 600.0)).unwrap();
    select(&mut session, RED);
    session.paint_at(Some((0, 0)));

    let out = dir.path().join("coloured.png");
    session.save(&out).unwrap();
    assert!(!session.project.is_dirty);
    assert_eq!(session.project.name, "coloured.png");

    let back = io::load_image(&out).unwrap();
    assert!(back.pixels().all(|p| *p == RED));
}

#[test]
fn failed_load_keeps_current_picture() {
    let dir = tempfile::tempdir().unwrap();
    let junk = dir.path().join("junk.png");
    std::fs::write(&junk, b"not a picture").unwrap();

    let mut session = Session::new(PadConfig {
        blank_size: (5, 5),
        ..PadConfig::default()
    });
    assert!(session.load(&junk, Vec2::new(800.0, 600.0)).is_err());
    assert_eq!(session.project.image.dimensions(), (5, 5));
    assert_eq!(session.project.name, "Untitled");
}
