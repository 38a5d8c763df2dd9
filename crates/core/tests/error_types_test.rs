use std::{error::Error as StdError, io};

use exadialect_core::{BoxError, ConfigError, Error, ObjectKind, Resource};

fn boxed_error(message: &str) -> BoxError {
    Box::new(io::Error::other(message.to_string()))
}

#[test]
fn every_variant_reports_a_stable_category() {
    let cases = [
        (
            Error::from(ConfigError::UnknownDialect {
                scheme: "mysql".to_string(),
            }),
            "config",
        ),
        (Error::connection("refused", boxed_error("io")), "connection"),
        (Error::not_found(ObjectKind::Table, "ORDERS"), "not-found"),
        (Error::internal("two rows"), "internal"),
        (Error::unsupported("CREATE INDEX", "exasol"), "unsupported"),
        (Error::execution("SELECT 1", boxed_error("boom")), "execute"),
        (
            Error::Closed {
                resource: Resource::Cursor,
                operation: "fetchone",
            },
            "closed",
        ),
        (Error::NoResult, "no-result"),
        (Error::invalid_argument("bad"), "argument"),
        (Error::coercion("abc", "DECIMAL"), "coercion"),
    ];

    for (error, category) in cases {
        assert_eq!(error.category(), category, "category of {error}");
    }
}

#[test]
fn conflict_message_names_both_settings() {
    let error = ConfigError::Conflict {
        first: "ENCRYPTION=N".to_string(),
        second: "SSLCertificate".to_string(),
    };
    let rendered = error.to_string();

    assert!(rendered.contains("ENCRYPTION=N"));
    assert!(rendered.contains("SSLCertificate"));
}

#[test]
fn wrapped_client_errors_keep_their_source() {
    let error = Error::execution("SELECT * FROM missing", boxed_error("object MISSING not found"));

    assert_eq!(error.to_string(), "statement failed: SELECT * FROM missing");
    let source = error.source().expect("execution error should keep its source");
    assert_eq!(source.to_string(), "object MISSING not found");
}

#[test]
fn config_errors_are_transparent() {
    let error = Error::from(ConfigError::InvalidOption {
        key: "ENCRYPTION".to_string(),
        value: "maybe".to_string(),
        expected: "Y or N".to_string(),
    });

    assert_eq!(
        error.to_string(),
        "invalid value `maybe` for connection option `ENCRYPTION`: expected Y or N"
    );
}

#[test]
fn not_found_and_closed_messages_name_the_subject() {
    assert_eq!(
        Error::not_found(ObjectKind::View, "V1").to_string(),
        "view not found: V1"
    );
    assert_eq!(
        Error::Closed {
            resource: Resource::Connection,
            operation: "commit",
        }
        .to_string(),
        "unable to run `commit`: connection is already closed"
    );
}
