use super::*;

#[test]
fn profiles_match_sticker_limits() {
    let sticker = Profile::for_kind(StickerKind::Sticker);
    assert_eq!(sticker.canvas, Canvas::square(512));
    assert_eq!(sticker.budget_bytes, 256 * 1024);

    let emoji = Profile::for_kind(StickerKind::Emoji)
        .with_budget_kib(64)
        .unwrap();
    assert_eq!(emoji.canvas, Canvas::square(100));
    assert_eq!(emoji.budget_bytes, 64 * 1024);
}

#[test]
fn budget_kib_rejects_overflow() {
    let profile = Profile::for_kind(StickerKind::Sticker);
    assert!(profile.with_budget_kib(u64::MAX).is_none());
    assert!(profile.with_budget_kib(u64::MAX / 1024 + 1).is_none());
    assert_eq!(
        profile.with_budget_kib(u64::MAX / 1024).unwrap().budget_bytes,
        u64::MAX / 1024 * 1024
    );
}

#[test]
fn default_scales_keep_the_full_canvas() {
    assert_eq!(SearchConfig::default().scales, vec![1.0]);
}

#[test]
fn default_search_config_is_valid() {
    SearchConfig::default().validate().unwrap();
}

#[test]
fn crf_values_always_end_at_crf_max() {
    let cfg = SearchConfig {
        crf_min: 10,
        crf_max: 20,
        crf_step: 4,
        ..SearchConfig::default()
    };
    assert_eq!(cfg.crf_values(), vec![10, 14, 18, 20]);

    let single = SearchConfig {
        crf_min: 30,
        crf_max: 30,
        ..SearchConfig::default()
    };
    assert_eq!(single.crf_values(), vec![30]);
}

#[test]
fn validate_rejects_bad_ranges() {
    let inverted = SearchConfig {
        crf_min: 40,
        crf_max: 30,
        ..SearchConfig::default()
    };
    assert!(inverted.validate().is_err());

    let too_high = SearchConfig {
        crf_max: 64,
        ..SearchConfig::default()
    };
    assert!(too_high.validate().is_err());

    let bad_scale = SearchConfig {
        scales: vec![1.0, 1.5],
        ..SearchConfig::default()
    };
    let err = bad_scale.validate().unwrap_err();
    assert!(err.to_string().contains("scale 1.5"));

    let no_damping = SearchConfig {
        skip_damping: 0.0,
        ..SearchConfig::default()
    };
    assert!(no_damping.validate().is_err());
}

#[test]
fn json_config_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.json");
    std::fs::write(&path, r#"{ "crf_min": 24, "scales": [1.0, 0.75] }"#).unwrap();

    let cfg = SearchConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.crf_min, 24);
    assert_eq!(cfg.scales, vec![1.0, 0.75]);
    assert_eq!(cfg.crf_max, SearchConfig::default().crf_max);
}

#[test]
fn json_config_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.json");
    std::fs::write(&path, r#"{ "crf": 24 }"#).unwrap();

    let err = SearchConfig::from_json_file(&path).unwrap_err();
    assert!(err.to_string().contains("invalid search config"));
}
