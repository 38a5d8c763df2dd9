use exadialect_core::{ComparisonOp, DataType, Error, Expr, IsTest, Result, Value};

use crate::{DIALECT_NAME, normalize::render_ident};

const DEFAULT_VARCHAR_LENGTH: u32 = 2_000_000;

pub(crate) fn render_data_type(data_type: &DataType) -> Result<String> {
    Ok(match data_type {
        DataType::Boolean => "BOOLEAN".to_string(),
        DataType::SmallInt => "SMALLINT".to_string(),
        DataType::Integer => "INTEGER".to_string(),
        DataType::BigInt => "BIGINT".to_string(),
        DataType::Decimal { precision, scale } => match (precision, scale) {
            (Some(precision), Some(scale)) => format!("DECIMAL({precision},{scale})"),
            (Some(precision), None) => format!("DECIMAL({precision})"),
            (None, _) => "DECIMAL".to_string(),
        },
        DataType::Float => "FLOAT".to_string(),
        DataType::Double => "DOUBLE".to_string(),
        DataType::Char { length } => match length {
            Some(length) => format!("CHAR({length})"),
            None => "CHAR".to_string(),
        },
        DataType::Varchar { length } => {
            format!("VARCHAR({})", length.unwrap_or(DEFAULT_VARCHAR_LENGTH))
        }
        DataType::Text => "LONG VARCHAR".to_string(),
        DataType::Date => "DATE".to_string(),
        DataType::Timestamp {
            with_local_time_zone: false,
        } => "TIMESTAMP".to_string(),
        DataType::Timestamp {
            with_local_time_zone: true,
        } => "TIMESTAMP WITH LOCAL TIME ZONE".to_string(),
        DataType::IntervalYearToMonth => "INTERVAL YEAR TO MONTH".to_string(),
        DataType::IntervalDayToSecond => "INTERVAL DAY TO SECOND".to_string(),
        DataType::Geometry => "GEOMETRY".to_string(),
        DataType::HashType => "HASHTYPE".to_string(),
        DataType::Null => {
            return Err(Error::unsupported("render untyped column", DIALECT_NAME));
        }
    })
}

pub(crate) fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Column(name) => render_ident(name),
        Expr::QualifiedColumn { qualifier, name } => {
            format!("{}.{}", render_ident(qualifier), render_ident(name))
        }
        Expr::Literal(value) => render_value(value),
        Expr::Param => "?".to_string(),
        Expr::Raw(raw) => raw.trim().to_string(),
        Expr::Comparison { left, op, right } => format!(
            "{} {} {}",
            render_expr(left),
            render_comparison_op(*op),
            render_expr(right)
        ),
        Expr::And(left, right) => format!(
            "{} AND {}",
            render_and_operand(left),
            render_and_operand(right)
        ),
        Expr::Or(left, right) => format!("{} OR {}", render_expr(left), render_expr(right)),
        Expr::Not(expr) => format!("NOT ({})", render_expr(expr)),
        Expr::Is { expr, test } => match test {
            IsTest::Null => format!("{} IS NULL", render_expr(expr)),
            IsTest::NotNull => format!("{} IS NOT NULL", render_expr(expr)),
        },
        Expr::In {
            expr,
            list,
            negated,
        } => {
            if list.is_empty() {
                // Exasol rejects an empty IN list.
                return if *negated { "1 = 1" } else { "1 = 0" }.to_string();
            }
            format!(
                "{} {}IN ({})",
                render_expr(expr),
                if *negated { "NOT " } else { "" },
                list.iter().map(render_expr).collect::<Vec<_>>().join(", ")
            )
        }
        Expr::Paren(expr) => format!("({})", render_expr(expr)),
        Expr::Function { name, args } => format!(
            "{}({})",
            name,
            args.iter().map(render_expr).collect::<Vec<_>>().join(", ")
        ),
    }
}

fn render_and_operand(expr: &Expr) -> String {
    match expr {
        Expr::Or(..) => format!("({})", render_expr(expr)),
        _ => render_expr(expr),
    }
}

pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Integer(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Decimal(value) => value.to_string(),
        Value::String(value) => render_string(value),
        Value::Date(value) => format!("DATE '{}'", value.format("%Y-%m-%d")),
        Value::Timestamp(value) => {
            format!("TIMESTAMP '{}'", value.format("%Y-%m-%d %H:%M:%S%.6f"))
        }
    }
}

pub(crate) fn render_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn render_comparison_op(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Equal => "=",
        ComparisonOp::NotEqual => "<>",
        ComparisonOp::GreaterThan => ">",
        ComparisonOp::GreaterThanOrEqual => ">=",
        ComparisonOp::LessThan => "<",
        ComparisonOp::LessThanOrEqual => "<=",
        ComparisonOp::Like => "LIKE",
    }
}
