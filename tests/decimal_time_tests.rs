use chrono::TimeZone;
use chrono::Utc;
use rust_decimal::Decimal;

use chart_timeline::core::{BusinessDay, DomainTime, OhlcItem, TimeKey, ValueItem};

#[test]
fn value_item_from_decimal_time_is_supported() {
    let time = Utc
        .timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid ts");
    let item = ValueItem::from_decimal_time(time, Decimal::new(12345, 2)).expect("item");

    assert_eq!(item.time, DomainTime::Utc(1_700_000_000));
    assert!((item.value - 123.45).abs() <= 1e-9);
}

#[test]
fn ohlc_from_decimal_time_is_supported() {
    let time = Utc
        .timestamp_opt(1_700_000_100, 0)
        .single()
        .expect("valid ts");
    let item = OhlcItem::from_decimal_time(
        time,
        Decimal::new(1000, 1),
        Decimal::new(1200, 1),
        Decimal::new(900, 1),
        Decimal::new(1100, 1),
    )
    .expect("ohlc");

    assert_eq!(item.time.unix_seconds(), 1_700_000_100);
    assert!((item.open - 100.0).abs() <= 1e-9);
    assert!((item.high - 120.0).abs() <= 1e-9);
    assert!((item.low - 90.0).abs() <= 1e-9);
    assert!((item.close - 110.0).abs() <= 1e-9);
}

#[test]
fn business_day_parses_iso_dates() {
    let day: BusinessDay = "2019-06-28".parse().expect("iso date");
    assert_eq!((day.year(), day.month(), day.day()), (2019, 6, 28));
    assert_eq!(day.unix_seconds(), 1_561_680_000);
    assert_eq!(DomainTime::from(day).unix_seconds(), 1_561_680_000);
}

#[test]
fn invalid_business_days_are_rejected() {
    assert!(BusinessDay::new(2023, 2, 29).is_err());
    assert!("2024-13-01".parse::<BusinessDay>().is_err());
    assert!("yesterday".parse::<BusinessDay>().is_err());
}

#[test]
fn business_day_serializes_as_parts() {
    let day = BusinessDay::new(2024, 3, 15).expect("valid date");
    let json = serde_json::to_string(&day).expect("serialize");
    assert_eq!(json, r#"{"year":2024,"month":3,"day":15}"#);

    let restored: BusinessDay = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, day);
    assert!(serde_json::from_str::<BusinessDay>(r#"{"year":2024,"month":2,"day":30}"#).is_err());
}

#[test]
fn time_keys_order_numerically() {
    assert!(TimeKey::from(-5) < TimeKey::from(3));
    assert!(TimeKey::from(2.5) < TimeKey::from(3));
    assert_eq!(TimeKey::new(7.0), TimeKey::from(7));
    assert_eq!(TimeKey::from(7).to_string(), "7");
}
