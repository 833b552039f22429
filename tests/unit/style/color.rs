use super::*;
use serde_json::json;

#[test]
fn parse_normalizes_case_and_prefix() {
    assert_eq!(HexColor::parse("#FFAA00").unwrap().as_str(), "#ffaa00");
    assert_eq!(HexColor::parse("ffaa00").unwrap().as_str(), "#ffaa00");
    assert_eq!(HexColor::parse("  #123abc ").unwrap().as_str(), "#123abc");
}

#[test]
fn parse_rejects_malformed() {
    assert!(HexColor::parse("#fff").is_none());
    assert!(HexColor::parse("#gg0000").is_none());
    assert!(HexColor::parse("").is_none());
    assert!(HexColor::parse("#1234567").is_none());
}

#[test]
fn malformed_colors_are_coerced_on_decode() {
    #[derive(serde::Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "de_text_color")]
        text: HexColor,
        #[serde(deserialize_with = "de_box_color")]
        fill: HexColor,
    }

    let p: Probe = serde_json::from_value(json!({"text": "purple", "fill": "#12"})).unwrap();
    assert_eq!(p.text.as_str(), HexColor::WHITE);
    assert_eq!(p.fill.as_str(), HexColor::BLACK);

    let p: Probe = serde_json::from_value(json!({"text": "#FF0000", "fill": "00ff00"})).unwrap();
    assert_eq!(p.text.as_str(), "#ff0000");
    assert_eq!(p.fill.as_str(), "#00ff00");
}

#[test]
fn channels_default_unparsable_pairs_to_zero() {
    assert_eq!(hex_channels("#ff8000"), [255, 128, 0]);
    assert_eq!(hex_channels("#zz8000"), [0, 128, 0]);
    assert_eq!(hex_channels("#ff"), [255, 0, 0]);
    assert_eq!(hex_channels(""), [0, 0, 0]);
}

#[test]
fn opacity_maps_to_exact_alpha() {
    let p = Paint::from_hex_opacity("#000000", 80);
    assert_eq!((p.r, p.g, p.b), (0, 0, 0));
    assert_eq!(p.alpha, 0.8);
    assert_eq!(p.to_css(), "rgba(0, 0, 0, 0.8)");

    for pct in 0..=100u8 {
        let p = Paint::from_hex_opacity("#3a7bd5", pct);
        assert_eq!([p.r, p.g, p.b], hex_channels("#3a7bd5"));
        assert_eq!(p.alpha, f64::from(pct) / 100.0);
    }
}

#[test]
fn opacity_endpoints() {
    assert!(Paint::from_hex_opacity("#ffffff", 0).is_transparent());
    assert_eq!(Paint::from_hex_opacity("#ffffff", 100).to_rgba8(), [255, 255, 255, 255]);
    assert_eq!(Paint::from_hex_opacity("#ffffff", 250).alpha, 1.0);
}
