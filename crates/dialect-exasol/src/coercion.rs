use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use exadialect_core::{ColumnDescription, Error, Result, Value, ValueCodec, WireValue};
use rust_decimal::{Decimal, prelude::FromPrimitive};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Value conversion for Exasol's text-oriented drivers: decimals, dates, and
/// timestamps travel as strings, booleans and numbers natively.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExasolCodec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeFamily {
    Boolean,
    Integer,
    Decimal,
    Double,
    Date,
    Timestamp,
    Other,
}

fn type_family(type_code: &str) -> TypeFamily {
    let upper = type_code.trim().to_ascii_uppercase();
    let base = upper
        .split(|ch: char| ch == '(' || ch.is_whitespace())
        .next()
        .unwrap_or_default();

    match base {
        "BOOLEAN" | "BOOL" | "BIT" => TypeFamily::Boolean,
        "TINYINT" | "SMALLINT" | "INTEGER" | "INT" | "BIGINT" => TypeFamily::Integer,
        "DECIMAL" | "NUMERIC" | "NUMBER" | "DEC" => TypeFamily::Decimal,
        "DOUBLE" | "FLOAT" | "REAL" => TypeFamily::Double,
        "DATE" => TypeFamily::Date,
        "TIMESTAMP" => TypeFamily::Timestamp,
        _ => TypeFamily::Other,
    }
}

impl ValueCodec for ExasolCodec {
    fn encode(&self, value: &Value) -> Result<WireValue> {
        Ok(match value {
            Value::Null => WireValue::Null,
            Value::Bool(value) => WireValue::Bool(*value),
            Value::Integer(value) => WireValue::Int(*value),
            Value::Float(value) => WireValue::Double(*value),
            Value::Decimal(value) => WireValue::Text(value.to_string()),
            Value::String(value) => WireValue::Text(value.clone()),
            Value::Date(value) => WireValue::Text(value.format(DATE_FORMAT).to_string()),
            Value::Timestamp(value) => {
                WireValue::Text(value.format(TIMESTAMP_FORMAT).to_string())
            }
        })
    }

    fn decode(&self, value: &WireValue, column: &ColumnDescription) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match type_family(&column.type_code) {
            TypeFamily::Boolean => value
                .to_bool()
                .map(Value::Bool)
                .ok_or_else(|| coercion_error(value, "BOOLEAN")),
            TypeFamily::Integer => value
                .to_i64()
                .map(Value::Integer)
                .ok_or_else(|| coercion_error(value, "INTEGER")),
            TypeFamily::Decimal => decode_decimal(value, column),
            TypeFamily::Double => decode_double(value),
            TypeFamily::Date => {
                let text = text_of(value, "DATE")?;
                NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
                    .map(Value::Date)
                    .map_err(|_| Error::coercion(text, "DATE"))
            }
            TypeFamily::Timestamp => {
                let text = text_of(value, "TIMESTAMP")?;
                NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_PARSE_FORMAT)
                    .map(Value::Timestamp)
                    .map_err(|_| Error::coercion(text, "TIMESTAMP"))
            }
            TypeFamily::Other => Ok(match value {
                WireValue::Null => Value::Null,
                WireValue::Bool(value) => Value::Bool(*value),
                WireValue::Int(value) => Value::Integer(*value),
                WireValue::Double(value) => Value::Float(*value),
                WireValue::Text(value) => Value::String(value.clone()),
            }),
        }
    }
}

/// Integral decimals come back as integers when the column has no scale,
/// matching what the driver does with `INTTYPESINRESULTSIFPOSSIBLE`.
fn decode_decimal(value: &WireValue, column: &ColumnDescription) -> Result<Value> {
    let integral = matches!(column.scale, None | Some(0));
    match value {
        WireValue::Int(value) => Ok(Value::Integer(*value)),
        WireValue::Double(value) => Decimal::from_f64(*value)
            .map(Value::Decimal)
            .ok_or_else(|| Error::coercion(value.to_string(), "DECIMAL")),
        WireValue::Text(text) => {
            let trimmed = text.trim();
            if integral && let Ok(value) = trimmed.parse::<i64>() {
                return Ok(Value::Integer(value));
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Value::Decimal)
                .map_err(|_| Error::coercion(text.clone(), "DECIMAL"))
        }
        WireValue::Bool(_) | WireValue::Null => Err(coercion_error(value, "DECIMAL")),
    }
}

fn decode_double(value: &WireValue) -> Result<Value> {
    match value {
        WireValue::Double(value) => Ok(Value::Float(*value)),
        WireValue::Int(value) => Ok(Value::Float(*value as f64)),
        WireValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::coercion(text.clone(), "DOUBLE")),
        WireValue::Bool(_) | WireValue::Null => Err(coercion_error(value, "DOUBLE")),
    }
}

fn text_of(value: &WireValue, target: &str) -> Result<String> {
    match value {
        WireValue::Text(text) => Ok(text.clone()),
        other => Err(coercion_error(other, target)),
    }
}

fn coercion_error(value: &WireValue, target: &str) -> Error {
    Error::coercion(value.to_string(), target)
}
