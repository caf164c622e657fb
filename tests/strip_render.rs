use image::RgbaImage;
use lumabooth::{
    builtin_themes, encode_jpeg, encode_png, render_strip, CompositionSpec, Footer, FooterFonts,
    PreparedStickers, StripGeometry,
};

fn spec() -> CompositionSpec {
    CompositionSpec::new(Footer {
        title: "Summer Party".into(),
        date: "2026-08-30".into(),
    })
}

fn still(shade: u8) -> RgbaImage {
    RgbaImage::from_pixel(160, 120, image::Rgba([shade, shade / 2, 96, 255]))
}

#[test]
fn strip_encodes_to_a_decodable_png() {
    let slots = vec![Some(still(200)), Some(still(120)), None, Some(still(40))];
    let strip =
        render_strip(&slots, &spec(), &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    let bytes = encode_png(&strip).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap();
    let geo = StripGeometry::DEFAULT;
    assert_eq!(decoded.width(), geo.canvas_width());
    assert_eq!(decoded.height(), geo.canvas_height());
    // PNG is lossless: the decode matches the canvas exactly.
    assert_eq!(decoded.to_rgba8().as_raw(), strip.as_raw());
}

#[test]
fn strip_encodes_to_a_decodable_jpeg() {
    let slots = vec![Some(still(180)); 4];
    let strip =
        render_strip(&slots, &spec(), &PreparedStickers::empty(), &FooterFonts::none()).unwrap();
    let bytes = encode_jpeg(&strip).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), StripGeometry::DEFAULT.canvas_width());
    assert_eq!(decoded.height(), StripGeometry::DEFAULT.canvas_height());
    assert!(!bytes.is_empty());
}

#[test]
fn encoded_output_is_deterministic() {
    let slots = vec![Some(still(90)), None, Some(still(30)), None];
    let mut s = spec();
    s.tone.saturation = 140.0;
    s.tone.temperature = 130.0;
    let a = encode_png(
        &render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap(),
    )
    .unwrap();
    let b = encode_png(
        &render_strip(&slots, &s, &PreparedStickers::empty(), &FooterFonts::none()).unwrap(),
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn themed_strips_pick_up_the_theme_background() {
    let slots = vec![Some(still(128)); 4];
    for theme in builtin_themes() {
        let mut s = spec();
        theme.apply(&mut s);
        assert!(s.validate().is_ok(), "theme '{}' fails validation", theme.name);

        // Theme sticker assets are not on disk here; the render must still
        // succeed with the themed background in the padding.
        let stickers = PreparedStickers::prepare(&s.stickers, std::path::Path::new("/nonexistent"));
        let out = render_strip(&slots, &s, &stickers, &FooterFonts::none()).unwrap();
        assert_eq!(out.get_pixel(5, 5).0, s.background.rgba8());
    }
}

#[test]
fn spec_files_round_trip_through_json() {
    let mut s = spec();
    s.slots = vec![Some("shot_0.png".into()), None, None, None];
    s.tone.tint = 60.0;
    let json = serde_json::to_string_pretty(&s).unwrap();
    let back: CompositionSpec = serde_json::from_str(&json).unwrap();
    back.validate().unwrap();
    assert_eq!(back.slots, s.slots);
    assert_eq!(back.tone, s.tone);
    assert_eq!(back.footer, s.footer);
}
