use chrono::{NaiveDate, NaiveDateTime};
use exadialect_core::{ColumnDescription, Value, ValueCodec, WireValue};
use exadialect_exasol::ExasolCodec;
use rust_decimal::Decimal;

fn decimal_column(precision: i64, scale: i64) -> ColumnDescription {
    ColumnDescription::new("AMOUNT", "DECIMAL").with_precision(precision, scale)
}

#[test]
fn integral_decimals_decode_as_integers() {
    let decoded = ExasolCodec
        .decode(&WireValue::from("42"), &decimal_column(18, 0))
        .expect("value should decode");

    assert_eq!(decoded, Value::Integer(42));
}

#[test]
fn scaled_decimals_keep_their_precision() {
    let decoded = ExasolCodec
        .decode(&WireValue::from("12.50"), &decimal_column(12, 2))
        .expect("value should decode");

    assert_eq!(decoded, Value::Decimal(Decimal::new(1250, 2)));
}

#[test]
fn dates_and_timestamps_decode_from_text() {
    let date = ExasolCodec
        .decode(
            &WireValue::from("2024-02-29"),
            &ColumnDescription::new("D", "DATE"),
        )
        .expect("date should decode");
    let timestamp = ExasolCodec
        .decode(
            &WireValue::from("2024-02-29 13:45:01.250000"),
            &ColumnDescription::new("TS", "TIMESTAMP"),
        )
        .expect("timestamp should decode");

    let expected_date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
    let expected_timestamp = NaiveDateTime::parse_from_str(
        "2024-02-29 13:45:01.250",
        "%Y-%m-%d %H:%M:%S%.f",
    )
    .expect("valid timestamp");
    assert_eq!(date, Value::Date(expected_date));
    assert_eq!(timestamp, Value::Timestamp(expected_timestamp));
}

#[test]
fn nulls_decode_regardless_of_type() {
    let decoded = ExasolCodec
        .decode(&WireValue::Null, &ColumnDescription::new("D", "DATE"))
        .expect("null should decode");

    assert_eq!(decoded, Value::Null);
}

#[test]
fn malformed_values_are_coercion_errors() {
    let error = ExasolCodec
        .decode(
            &WireValue::from("yesterday"),
            &ColumnDescription::new("D", "DATE"),
        )
        .expect_err("bad date should fail");

    assert_eq!(error.category(), "coercion");
    assert!(error.to_string().contains("yesterday"));
}

#[test]
fn outgoing_values_use_exasol_literals() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date");
    let timestamp = date.and_hms_opt(7, 8, 9).expect("valid time");

    assert_eq!(
        ExasolCodec
            .encode(&Value::Decimal(Decimal::new(-305, 1)))
            .expect("decimal should encode"),
        WireValue::from("-30.5")
    );
    assert_eq!(
        ExasolCodec.encode(&Value::Date(date)).expect("date should encode"),
        WireValue::from("2024-01-05")
    );
    assert_eq!(
        ExasolCodec
            .encode(&Value::Timestamp(timestamp))
            .expect("timestamp should encode"),
        WireValue::from("2024-01-05 07:08:09.000000")
    );
    assert_eq!(
        ExasolCodec.encode(&Value::Integer(7)).expect("integer should encode"),
        WireValue::Int(7)
    );
}
