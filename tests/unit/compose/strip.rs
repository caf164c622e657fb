use super::*;
use crate::compose::spec::Footer;
use crate::foundation::geom::StripGeometry;

fn spec() -> CompositionSpec {
    CompositionSpec::new(Footer {
        title: "LumaBooth".into(),
        date: "2026-08-30".into(),
    })
}

fn still(shade: u8) -> RgbaImage {
    RgbaImage::from_pixel(40, 30, image::Rgba([shade, shade / 2, 64, 255]))
}

#[test]
fn empty_slot_list_is_no_photos() {
    let err = render_strip(&[], &spec(), &PreparedStickers::empty(), &FooterFonts::none());
    assert!(matches!(err, Err(BoothError::NoPhotos)));
    let err = render_strip(
        &[None, None, None, None],
        &spec(),
        &PreparedStickers::empty(),
        &FooterFonts::none(),
    );
    assert!(matches!(err, Err(BoothError::NoPhotos)));
}

#[test]
fn canvas_has_the_fixed_geometry() {
    let slots = vec![Some(still(200)), None, None, None];
    let out = render_strip(&slots, &spec(), &PreparedStickers::empty(), &FooterFonts::none())
        .unwrap();
    let geo = StripGeometry::DEFAULT;
    assert_eq!(out.dimensions(), (geo.canvas_width(), geo.canvas_height()));
}

#[test]
fn composition_is_deterministic() {
    let slots = vec![Some(still(180)), Some(still(90)), None, Some(still(30))];
    let mut s = spec();
    s.tone.temperature = 160.0;
    s.tone.tint = 60.0;
    s.tone.saturation = 130.0;
    let a = render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    let b = render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn missing_slots_render_darkened_placeholders() {
    let slots = vec![Some(still(200)), None];
    let s = spec();
    let out = render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    let geo = StripGeometry::DEFAULT;
    let (x, y) = geo.slot_origin(1);
    let expected = s.background.darken(0.08).rgba8();
    assert_eq!(out.get_pixel(x + 10, y + 10).0, expected);
}

#[test]
fn footer_band_is_repainted_after_overlays() {
    let slots = vec![Some(still(128)); 4];
    let mut s = spec();
    s.tone.temperature = 200.0; // full-strength overlay across the canvas
    let out = render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    let geo = StripGeometry::DEFAULT;
    let footer_px = out.get_pixel(5, geo.footer_top() + 5).0;
    assert_eq!(footer_px, s.background.rgba8());
}

#[test]
fn overlays_shift_the_photo_region() {
    let slots = vec![Some(still(128)); 4];
    let neutral = render_strip(&slots, &spec(), &PreparedStickers::empty(), &FooterFonts::none())
        .unwrap();
    let mut warm_spec = spec();
    warm_spec.tone.temperature = 200.0;
    let warm = render_strip(
        &slots,
        &warm_spec,
        &PreparedStickers::empty(),
        &FooterFonts::none(),
    )
    .unwrap();
    let geo = StripGeometry::DEFAULT;
    let (x, y) = geo.slot_origin(0);
    assert_ne!(
        neutral.get_pixel(x + 50, y + 50).0,
        warm.get_pixel(x + 50, y + 50).0
    );
}

#[test]
fn tone_matrix_applies_to_photos_but_not_background() {
    let slots = vec![Some(still(128)); 4];
    let mut s = spec();
    s.tone.brightness = 150.0;
    let out = render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    // Outer padding keeps the raw background color.
    assert_eq!(out.get_pixel(5, 5).0, s.background.rgba8());
    let geo = StripGeometry::DEFAULT;
    let (x, y) = geo.slot_origin(0);
    let bright = out.get_pixel(x + 50, y + 50).0;
    assert!(bright[0] > 128, "brightness knob had no effect: {bright:?}");
}

#[test]
fn failed_sticker_loads_degrade_silently() {
    let slots = vec![Some(still(128)); 4];
    let placements = vec![crate::compose::spec::StickerPlacement {
        asset: std::path::PathBuf::from("does-not-exist.png"),
        x: 0.5,
        y: 0.5,
        width: 0.2,
        rotation: 0.0,
        mirror: false,
        opacity: 1.0,
    }];
    let stickers = PreparedStickers::prepare(&placements, std::path::Path::new("/nonexistent"));
    assert!(render_strip(&slots, &spec(), &stickers, &FooterFonts::none()).is_ok());
}

#[test]
fn load_slot_image_surfaces_load_failure() {
    let err = load_slot_image(std::path::Path::new("/nonexistent/still.png")).unwrap_err();
    assert!(matches!(err, BoothError::LoadFailure(_)));
}
