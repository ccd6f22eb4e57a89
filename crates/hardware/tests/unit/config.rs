//! # Configuration Tests
//!
//! Tests for configuration structures, deserialization, defaults, and
//! validation into a cache geometry.

use std::io::Write;

use cachesim_core::common::ConfigError;
use cachesim_core::config::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.cache.size_kb, None);
    assert_eq!(config.cache.total_bytes, None);
    assert_eq!(config.cache.block_size_bytes, 64);
    assert_eq!(config.cache.associativity, 1);
    assert_eq!(config.cache.replacement_policy, ReplacementPolicy::Lru);
    assert!(config.timing.is_none());
    assert_eq!(config.simulation.on_invalid_record, InvalidRecordPolicy::Abort);
    assert_eq!(config.simulation.report_interval, 0);
}

#[test]
fn test_default_geometry_is_4k_direct_mapped() {
    let g = CacheConfig::default().geometry().unwrap();
    assert_eq!(g.total_bytes(), 4096);
    assert_eq!(g.num_sets(), 64);
    assert_eq!(g.associativity(), 1);
}

#[test]
fn test_full_json_deserialization() {
    let json = r#"{
        "L1_cache": {
            "size_kb": 32,
            "block_size_bytes": 64,
            "associativity": 4,
            "replacement_policy": "LRU"
        },
        "timing": {
            "L1_hit_time": 1,
            "L1_miss_penalty": 100
        },
        "simulation": {
            "on_invalid_record": "skip",
            "report_interval": 5000
        }
    }"#;

    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.cache.size_kb, Some(32));
    assert_eq!(config.cache.resolved_total_bytes().unwrap(), 32 * 1024);
    assert_eq!(config.cache.associativity, 4);
    let timing = config.timing.unwrap();
    assert_eq!(timing.hit_time(), 1.0);
    assert_eq!(timing.miss_penalty(), 100.0);
    assert_eq!(config.simulation.on_invalid_record, InvalidRecordPolicy::Skip);
    assert_eq!(config.simulation.report_interval, 5000);

    let g = config.cache.geometry().unwrap();
    assert_eq!(g.num_sets(), 128);
}

#[test]
fn test_short_aliases() {
    let json = r#"{
        "cache": { "total_bytes": 2048, "block_size_bytes": 32, "associativity": 2 },
        "timing": { "hit_time": 2.5, "miss_penalty": 40 }
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.cache.total_bytes, Some(2048));
    assert_eq!(config.timing.unwrap().hit_time(), 2.5);
    assert_eq!(config.cache.geometry().unwrap().num_sets(), 32);
}

#[test]
fn test_empty_object_uses_defaults() {
    let config = Config::from_json_str("{}").unwrap();
    assert!(config.timing.is_none());
    assert_eq!(config.cache.geometry().unwrap().total_bytes(), 4096);
}

#[rstest]
#[case("\"LRU\"", ReplacementPolicy::Lru)]
#[case("\"lru\"", ReplacementPolicy::Lru)]
#[case("\"Lru\"", ReplacementPolicy::Lru)]
#[case("\"PLRU\"", ReplacementPolicy::Plru)]
#[case("\"fifo\"", ReplacementPolicy::Fifo)]
#[case("\"Random\"", ReplacementPolicy::Random)]
#[case("\"MRU\"", ReplacementPolicy::Mru)]
fn test_policy_names(#[case] json: &str, #[case] expected: ReplacementPolicy) {
    let policy: ReplacementPolicy = serde_json::from_str(json).unwrap();
    assert_eq!(policy, expected);
}

#[test]
fn test_unknown_policy_is_parse_error() {
    let json = r#"{ "L1_cache": { "replacement_policy": "LFU" } }"#;
    assert!(matches!(Config::from_json_str(json), Err(ConfigError::Parse(_))));
}

#[test]
fn test_unimplemented_policy_parses_but_fails_geometry() {
    let json = r#"{ "L1_cache": { "replacement_policy": "FIFO" } }"#;
    let config = Config::from_json_str(json).unwrap();
    assert!(matches!(
        config.cache.geometry(),
        Err(ConfigError::UnsupportedPolicy(ReplacementPolicy::Fifo))
    ));
}

#[test]
fn test_policy_display() {
    assert_eq!(ReplacementPolicy::Lru.to_string(), "LRU");
    assert_eq!(ReplacementPolicy::Random.to_string(), "RANDOM");
    assert!(ReplacementPolicy::Lru.is_implemented());
    assert!(!ReplacementPolicy::Mru.is_implemented());
}

// ──────────────────────────────────────────────────────────
// Size resolution
// ──────────────────────────────────────────────────────────

#[test]
fn test_matching_sizes_accepted() {
    let cache = CacheConfig {
        size_kb: Some(1),
        total_bytes: Some(1024),
        ..CacheConfig::default()
    };
    assert_eq!(cache.resolved_total_bytes().unwrap(), 1024);
}

#[test]
fn test_conflicting_sizes_rejected() {
    let cache = CacheConfig {
        size_kb: Some(1),
        total_bytes: Some(2048),
        ..CacheConfig::default()
    };
    assert!(matches!(
        cache.resolved_total_bytes(),
        Err(ConfigError::ConflictingSize {
            size_kb: 1,
            total_bytes: 2048
        })
    ));
}

#[test]
fn test_size_overflow_rejected() {
    let cache = CacheConfig {
        size_kb: Some(u64::MAX),
        ..CacheConfig::default()
    };
    assert!(matches!(
        cache.geometry(),
        Err(ConfigError::SizeOverflow { size_kb: u64::MAX })
    ));
}

// ──────────────────────────────────────────────────────────
// Timing validation
// ──────────────────────────────────────────────────────────

#[rstest]
#[case(-1.0, 10.0, "hit_time")]
#[case(1.0, -0.5, "miss_penalty")]
#[case(f64::NAN, 10.0, "hit_time")]
#[case(1.0, f64::INFINITY, "miss_penalty")]
fn test_invalid_timing_rejected(#[case] hit: f64, #[case] penalty: f64, #[case] expected: &str) {
    assert!(matches!(
        TimingConfig::new(hit, penalty),
        Err(ConfigError::InvalidTiming { field, .. }) if field == expected
    ));
}

#[test]
fn test_zero_timing_accepted() {
    let t = TimingConfig::new(0.0, 0.0).unwrap();
    assert_eq!((t.hit_time(), t.miss_penalty()), (0.0, 0.0));
}

#[test]
fn test_negative_timing_in_json_is_parse_error() {
    let json = r#"{ "timing": { "L1_hit_time": -1, "L1_miss_penalty": 10 } }"#;
    let err = Config::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("hit_time"), "{err}");
}

#[test]
fn test_incomplete_timing_is_parse_error() {
    let json = r#"{ "timing": { "L1_hit_time": 1 } }"#;
    assert!(matches!(Config::from_json_str(json), Err(ConfigError::Parse(_))));
}

// ──────────────────────────────────────────────────────────
// Loading from disk
// ──────────────────────────────────────────────────────────

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "L1_cache": {{ "size_kb": 8, "block_size_bytes": 32, "associativity": 2 }} }}"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.cache.geometry().unwrap().num_sets(), 128);
}

#[test]
fn test_load_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_load_invalid_json_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFile { .. }));
    assert!(err.to_string().contains("bad.json"), "{err}");
}

#[test]
fn test_load_invalid_timing_names_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "timing": {{ "L1_hit_time": -2, "L1_miss_penalty": 10 }} }}"#).unwrap();

    let err = Config::load(file.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&file.path().display().to_string()), "{message}");
    assert!(message.contains("hit_time"), "{message}");
}
