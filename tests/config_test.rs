//! Integration tests for YAML transformer configs.

use datamask::config::{MaskYamlConfig, TransformerConfig};
use datamask::generator::Engine;
use datamask::transformer::Value;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_and_build_deterministic_int() {
    let file = write_config(
        r#"
engine: deterministic
salt: "0011223344"
transformer: random_int
min: 18
max: 99
"#,
    );
    let config = MaskYamlConfig::load(file.path()).unwrap();
    let mut t = config.build().unwrap();
    assert_eq!(t.kind(), "random_int");

    let a = t.transform(&Value::Text("42".into())).unwrap();
    let mut again = MaskYamlConfig::load(file.path()).unwrap().build().unwrap();
    assert_eq!(a, again.transform(&Value::Text("42".into())).unwrap());
    match a {
        Value::Int(v) => assert!((18..=99).contains(&v)),
        other => panic!("Expected int, got {:?}", other),
    }
}

#[test]
fn test_load_noise_timestamp() {
    let file = write_config(
        r#"
transformer: noise_timestamp
min_ratio: 1h
max_ratio: 2d
min: "2000-01-01T00:00:00Z"
truncate: day
"#,
    );
    let mut t = MaskYamlConfig::load(file.path()).unwrap().build().unwrap();
    match t
        .transform(&Value::Text("2022-03-04T05:06:07Z".into()))
        .unwrap()
    {
        Value::Timestamp(v) => assert_eq!(v.format("%H:%M:%S").to_string(), "00:00:00"),
        other => panic!("Expected timestamp, got {:?}", other),
    }
}

#[test]
fn test_every_transformer_kind_builds() {
    let configs = [
        "transformer: noise_int\nmin_ratio: 0.1\nmax_ratio: 0.2\ntype_size: 4\n",
        "transformer: noise_float\nmin_ratio: 0.1\nmax_ratio: 0.2\nprecision: 2\n",
        "transformer: noise_decimal\nmin_ratio: 0.1\nmax_ratio: 0.2\nmin: -10\nmax: 10\n",
        "transformer: noise_timestamp\nmin_ratio: 1s\nmax_ratio: 1m\n",
        "transformer: random_int\ntype_size: 2\n",
        "transformer: random_float\nmin: 0\nmax: 1\n",
        "transformer: random_decimal\nmin: 0\nmax: 1000\nprecision: 3\n",
        "transformer: random_bigint\ndigits: 40\n",
        "transformer: random_timestamp\nmin: \"2000-01-01T00:00:00Z\"\nmax: \"2010-01-01T00:00:00Z\"\n",
        "transformer: random_string\nmin_length: 3\nmax_length: 8\n",
        "transformer: random_uuid\n",
        "transformer: random_bool\n",
        "transformer: random_choice\nchoices: [a, b, c]\n",
        "transformer: random_ip\nsubnet: 10.0.0.0/24\n",
        "transformer: random_mac\ncast_type: individual\nmanagement_type: universal\n",
    ];
    for yaml in configs {
        let config = MaskYamlConfig::parse(yaml).unwrap();
        config.validate().unwrap();
        let mut t = config.build().unwrap();
        let seed = match &config.transformer {
            TransformerConfig::NoiseTimestamp { .. } => "2020-01-01T00:00:00Z",
            TransformerConfig::RandomMac { .. } => "00:11:22:33:44:55",
            _ => "7",
        };
        t.transform(&Value::Text(seed.into()))
            .unwrap_or_else(|e| panic!("{} failed: {}", yaml.trim(), e));
    }
}

#[test]
fn test_validate_reports_config_errors() {
    for yaml in [
        "transformer: random_int\nmin: 5\nmax: 5\n",
        "transformer: random_ip\nsubnet: 10.0.0.0/31\n",
        "transformer: random_string\nsymbols: \"\"\nmin_length: 1\nmax_length: 2\n",
        "transformer: random_choice\nchoices: []\n",
        "transformer: random_bigint\nmin: 1.5\nmax: 10\n",
        "transformer: random_timestamp\nmin: \"2000-01-01T01:00:00Z\"\nmax: \"2000-01-01T23:00:00Z\"\ntruncate: day\n",
        "transformer: noise_timestamp\nmin_ratio: 1fortnight\nmax_ratio: 2d\n",
        "salt: nothex\ntransformer: random_bool\n",
    ] {
        let config = MaskYamlConfig::parse(yaml).unwrap();
        assert!(config.validate().is_err(), "{} should be invalid", yaml.trim());
    }
}

#[test]
fn test_wide_numeric_bounds_keep_every_digit() {
    let file = write_config(
        r#"
engine: deterministic
salt: "beef"
transformer: random_bigint
min: "-123456789012345678901234567890"
max: "123456789012345678901234567890"
"#,
    );
    let mut t = MaskYamlConfig::load(file.path()).unwrap().build().unwrap();
    assert_eq!(t.kind(), "random_bigint");
    let bound: bigdecimal::BigDecimal = "123456789012345678901234567890".parse().unwrap();
    for i in 0..200 {
        match t.transform(&Value::Int(i)).unwrap() {
            Value::Decimal(v) => assert!(v.abs() <= bound, "{}", v),
            other => panic!("Expected decimal, got {:?}", other),
        }
    }
}

#[test]
fn test_random_decimal_defaults_cover_wide_columns() {
    let config = MaskYamlConfig::parse("transformer: random_decimal\nprecision: 2\ndigits: 36\n")
        .unwrap();
    let t = config.build().unwrap();
    assert!(t.required_byte_length() > 12);
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mask.yaml");
    let config = MaskYamlConfig {
        engine: Engine::Deterministic,
        salt: Some("beef".to_string()),
        transformer: TransformerConfig::RandomString {
            symbols: "xyz".to_string(),
            min_length: 2,
            max_length: 4,
        },
    };
    config.save(&path).unwrap();
    assert_eq!(MaskYamlConfig::load(&path).unwrap(), config);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = MaskYamlConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("absent.yaml"));
}
