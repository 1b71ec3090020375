//! Integration tests for transformers wired to real generators.

use chrono::{DateTime, TimeDelta, Utc};
use bigdecimal::BigDecimal;
use datamask::error::{InsufficientSizeError, TransformError};
use datamask::generator::{Engine, RandomBytes, SaltedKeyedHash};
use datamask::limiter::{
    DecimalLimiter, Float64Limiter, Int64Limiter, NoiseInt64Limiter, NoiseTimestampLimiter,
    TimestampLimiter,
};
use datamask::transformer::{
    CastType, MacAddress, ManagementType, NoiseInt64Transformer, NoiseTimestampTransformer,
    RandomChoiceTransformer, RandomDecimalTransformer, RandomFloat64Transformer,
    RandomInt64Transformer, RandomIpTransformer, RandomMacTransformer, RandomStringTransformer,
    RandomTimestampTransformer, RandomUuidTransformer, Subnet, Transformer, TruncatePart, Value,
};
use std::net::IpAddr;

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn deterministic(required: usize) -> Box<dyn datamask::generator::Generator> {
    Engine::Deterministic.generator(b"integration-salt", required).unwrap()
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_random_numeric_bounds_hold_for_many_inputs() {
    let mut int = RandomInt64Transformer::new(Int64Limiter::new(-1000, 1000).unwrap());
    int.set_generator(deterministic(8)).unwrap();
    let mut float = RandomFloat64Transformer::new(Float64Limiter::new(0.5, 0.75).unwrap());
    float.set_generator(deterministic(8)).unwrap();

    for i in 0..5000 {
        let input = format!("row-{}", i);
        let v = int.transform(None, input.as_bytes()).unwrap();
        assert!((-1000..=1000).contains(&v));
        let f = float.transform(None, input.as_bytes()).unwrap();
        assert!((0.5..=0.75).contains(&f));
    }
}

#[test]
fn test_random_decimal_deterministic_and_bounded() {
    let min = BigDecimal::new((-12345).into(), 2);
    let max = BigDecimal::new(67890.into(), 2);
    let limiter = DecimalLimiter::new(min.clone(), max.clone()).unwrap();
    let mut t = RandomDecimalTransformer::new(limiter, 2).unwrap();
    t.set_generator(deterministic(t.required_byte_length())).unwrap();
    for i in 0..1000 {
        let input = i.to_string();
        let v = t.transform(None, input.as_bytes()).unwrap();
        assert!(v >= min && v <= max);
        assert_eq!(v, t.transform(None, input.as_bytes()).unwrap());
    }
}

#[test]
fn test_random_decimal_override_wider_than_default_is_rejected() {
    let narrow = DecimalLimiter::new(BigDecimal::from(0), BigDecimal::from(1)).unwrap();
    let mut t = RandomDecimalTransformer::new(narrow, 0).unwrap();
    t.set_generator(Box::new(RandomBytes::new(16))).unwrap();
    let wide = DecimalLimiter::new(BigDecimal::from(0), BigDecimal::from(1_000_000)).unwrap();
    for _ in 0..10 {
        assert_eq!(
            t.transform(Some(&wide), b""),
            Err(TransformError::Capacity(InsufficientSizeError {
                required: 3,
                available: 1
            }))
        );
    }
    // Sized for the wide window, the override reaches past one byte
    let mut sized = RandomDecimalTransformer::new(wide.clone(), 0).unwrap();
    sized.set_generator(Box::new(RandomBytes::new(16))).unwrap();
    let max = (0..5000)
        .map(|_| sized.transform(Some(&wide), b"").unwrap())
        .max()
        .unwrap();
    assert!(max > BigDecimal::from(255), "max {}", max);
}

#[test]
fn test_random_timestamp_bounds_and_truncation() {
    let min = ts("2021-05-05T10:10:10.100Z");
    let max = ts("2021-05-07T00:00:00Z");
    let mut t = RandomTimestampTransformer::new(TimestampLimiter::new(min, max).unwrap())
        .with_truncate(TruncatePart::Millisecond)
        .unwrap();
    t.set_generator(Box::new(RandomBytes::new(16))).unwrap();
    for _ in 0..5000 {
        let v = t.transform(None, b"").unwrap();
        assert!(v >= min && v <= max, "{} outside window", v);
        assert_eq!(v.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}

#[test]
fn test_random_timestamp_truncation_with_unaligned_min() {
    let min = ts("2000-01-01T12:00:00Z");
    let max = ts("2000-01-03T00:00:00Z");
    let mut t = RandomTimestampTransformer::new(TimestampLimiter::new(min, max).unwrap())
        .with_truncate(TruncatePart::Day)
        .unwrap();
    t.set_generator(Box::new(RandomBytes::with_seed(42, 16))).unwrap();
    for _ in 0..1000 {
        let v = t.transform(None, b"").unwrap();
        assert!(v >= min && v <= max, "{} outside window", v);
        assert_eq!(v, TruncatePart::Day.truncate(v));
    }
}

#[test]
fn test_noise_int_dynamic_limiter_is_one_shot() {
    let mut t = NoiseInt64Transformer::new(0.1, 0.9)
        .unwrap()
        .with_limiter(NoiseInt64Limiter::new(0, 10_000).unwrap());
    t.set_generator(Box::new(RandomBytes::new(9))).unwrap();
    let tight = NoiseInt64Limiter::new(500, 510).unwrap();
    let v = t.transform(Some(&tight), 505).unwrap();
    assert!((500..=510).contains(&v));
    // Next call without an override falls back to the default limiter
    for _ in 0..50 {
        let v = t.transform(None, 5000).unwrap();
        assert!((0..=10_000).contains(&v));
    }
}

#[test]
fn test_noise_timestamp_clamped_to_window() {
    let lo = ts("2020-01-01T00:00:00Z");
    let hi = ts("2020-01-02T00:00:00Z");
    let mut t = NoiseTimestampTransformer::new(TimeDelta::days(1), TimeDelta::days(30))
        .unwrap()
        .with_limiter(NoiseTimestampLimiter::new(Some(lo), Some(hi)).unwrap());
    t.set_generator(Box::new(RandomBytes::new(17))).unwrap();
    for _ in 0..100 {
        let v = t.transform(None, ts("2020-01-01T12:00:00Z")).unwrap();
        assert!(v == lo || v == hi);
    }
}

// ============================================================================
// Strings and choices
// ============================================================================

#[test]
fn test_random_string_length_and_alphabet() {
    let alphabet = "abcdefghijklmnopqrstuvwxyz0123456789";
    let mut t = RandomStringTransformer::new(alphabet, 10, 100).unwrap();
    t.set_generator(deterministic(t.required_byte_length())).unwrap();
    for i in 0..2000 {
        let s = t.transform(format!("user{}", i).as_bytes()).unwrap();
        assert!(s.len() >= 10 && s.len() <= 100);
        assert!(s.chars().all(|c| alphabet.contains(c)));
    }
}

#[test]
fn test_choice_is_stable_per_input() {
    let mut t = RandomChoiceTransformer::new(vec!["small", "medium", "large"]).unwrap();
    t.set_generator(Box::new(SaltedKeyedHash::new(b"k"))).unwrap();
    let first = t.transform(b"order-17").unwrap();
    for _ in 0..10 {
        assert_eq!(t.transform(b"order-17").unwrap(), first);
    }
}

#[test]
fn test_uuid_deterministic() {
    let mut t = RandomUuidTransformer::new();
    t.set_generator(deterministic(16)).unwrap();
    let a = t.transform(b"a").unwrap();
    assert_eq!(a, t.transform(b"a").unwrap());
    assert_ne!(a, t.transform(b"b").unwrap());
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_ip_network_and_broadcast_never_generated() {
    let subnet: Subnet = "192.168.1.0/30".parse().unwrap();
    let mut t = RandomIpTransformer::new(subnet).unwrap();
    t.set_generator(Box::new(RandomBytes::new(16))).unwrap();
    let allowed: [IpAddr; 2] = ["192.168.1.1".parse().unwrap(), "192.168.1.2".parse().unwrap()];
    for _ in 0..100_000 {
        let ip = t.transform(None, b"").unwrap();
        assert!(allowed.contains(&ip), "{} not a usable host", ip);
    }
}

#[test]
fn test_mac_group_and_vendor_policies() {
    let mut group = RandomMacTransformer::new(CastType::Group, ManagementType::Any, false);
    group.set_generator(Box::new(RandomBytes::new(6))).unwrap();
    for _ in 0..1000 {
        assert_eq!(group.transform_bytes(b"").unwrap().octets()[0] & 1, 1);
    }

    let original: MacAddress = "00:1b:63:84:45:e6".parse().unwrap();
    let mut keep = RandomMacTransformer::new(CastType::Any, ManagementType::Any, true);
    keep.set_generator(Box::new(RandomBytes::new(6))).unwrap();
    for _ in 0..100 {
        let mac = keep.transform(&original).unwrap();
        assert_eq!(&mac.octets()[..3], &[0x00, 0x1b, 0x63]);
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_transformer_enum_requires_generator() {
    let mut t = Transformer::RandomUuid(RandomUuidTransformer::new());
    assert!(matches!(
        t.transform(&Value::Text("x".into())),
        Err(TransformError::Generation(_))
    ));
}

#[test]
fn test_transformer_enum_rejects_small_generator() {
    let mut t = Transformer::RandomTimestamp(RandomTimestampTransformer::new(
        TimestampLimiter::new(ts("2000-01-01T00:00:00Z"), ts("2001-01-01T00:00:00Z")).unwrap(),
    ));
    let err = t
        .set_generator(Box::new(SaltedKeyedHash::new(b"s")))
        .unwrap_err();
    assert_eq!((err.required, err.available), (16, 8));
}

#[test]
fn test_transformer_enum_mac_with_vendor_parses_text() {
    let mut t = Transformer::RandomMac(RandomMacTransformer::new(
        CastType::Any,
        ManagementType::Any,
        true,
    ));
    t.set_generator(Box::new(RandomBytes::new(6))).unwrap();
    match t.transform(&Value::Text("aa:bb:cc:00:11:22".into())).unwrap() {
        Value::Mac(mac) => assert_eq!(&mac.octets()[..3], &[0xaa, 0xbb, 0xcc]),
        other => panic!("Expected mac, got {:?}", other),
    }
    assert!(t.transform(&Value::Text("not-a-mac".into())).is_err());
}
