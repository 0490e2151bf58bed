use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = AmbientConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, AmbientConfig::default());
    assert_eq!(cfg.smoothing, 0.15);
    assert_eq!(cfg.palette.len(), 5);
    assert!(cfg.validate().is_ok());

    let s = ScrubberConfig::from_json_str("{}").unwrap();
    assert_eq!(s.frame_pattern, r"frame-(\d+)");
    assert_eq!(s.reveal_threshold, 0.95);
    assert!(s.validate().is_ok());
}

#[test]
fn panel_variant_uses_fixed_grid_in_container_space() {
    let cfg = AmbientConfig::panel();
    assert_eq!(cfg.layout, GridLayout::PANEL);
    assert_eq!(cfg.coordinate_space, CoordinateSpace::Container);
}

#[test]
fn partial_json_overrides_selected_fields() {
    let cfg = AmbientConfig::from_json_str(
        r##"{
            "palette": ["#112233"],
            "palette_seed": 9,
            "time_step": {"kind": "fixed_per_tick", "step": 0.05},
            "layout": {"kind": "fixed", "spacing": 20.0, "base_radius": 1.0},
            "style": {"glow_radius": 150.0}
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.palette, vec![Rgb8::new(0x11, 0x22, 0x33)]);
    assert_eq!(cfg.palette_seed, Some(9));
    assert_eq!(cfg.time_step, TimeStep::PER_TICK);
    assert_eq!(cfg.style.glow_radius, 150.0);
    assert_eq!(cfg.style.link_radius, 120.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn bad_json_is_a_serde_error() {
    let err = AmbientConfig::from_json_str(r#"{"palette": ["blue"]}"#).unwrap_err();
    assert!(matches!(err, ScrollscapeError::Serde(_)));
    let err = ScrubberConfig::from_json_str(r#"{"nope": 1}"#).unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

#[test]
fn validation_catches_out_of_range_values() {
    let cfg = AmbientConfig {
        palette: Vec::new(),
        ..AmbientConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = AmbientConfig {
        smoothing: 1.5,
        ..AmbientConfig::default()
    };
    assert!(cfg.validate().is_err());

    let s = ScrubberConfig {
        reveal_threshold: 1.0,
        ..ScrubberConfig::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("ambient.json");
    std::fs::write(&p, r#"{"smoothing": 0.3}"#).unwrap();
    assert_eq!(AmbientConfig::from_path(&p).unwrap().smoothing, 0.3);
    assert!(AmbientConfig::from_path(dir.path().join("missing.json")).is_err());
}
