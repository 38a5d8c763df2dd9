//! URL to driver argument translation. Pure: no I/O happens here, so every
//! configuration problem surfaces before a connection attempt.

use std::collections::BTreeMap;

use exadialect_core::{ArgValue, ConfigError, ConnectArgs, ConnectArgsBuilder, ConnectionUrl, Result};

pub const DEFAULT_PORT: u16 = 8563;
pub const DEFAULT_ODBC_DRIVER: &str = "EXAODBC";
pub const SSL_VERIFY_NONE: &str = "SSL_VERIFY_NONE";

const ENCRYPTION: &str = "ENCRYPTION";
const SSL_CERTIFICATE: &str = "SSLCertificate";
const FINGERPRINT: &str = "FINGERPRINT";
const AUTOCOMMIT: &str = "AUTOCOMMIT";
const CLIENT_NAME: &str = "CLIENTNAME";
const CLIENT_VERSION: &str = "CLIENTVERSION";
const DRIVER: &str = "DRIVER";
const DSN: &str = "DSN";
const ANSI: &str = "ANSI";

const YES_OR_NO: &str = "Y or N";

/// Options this module interprets; anything else passes through verbatim.
#[derive(Debug, Default)]
struct SecurityOptions {
    encryption: Option<bool>,
    certificate: Option<String>,
    fingerprint: Option<String>,
}

impl SecurityOptions {
    fn from_url(url: &ConnectionUrl) -> Result<Self> {
        let options = Self {
            encryption: url
                .option(ENCRYPTION)
                .map(|value| parse_flag(ENCRYPTION, value))
                .transpose()?,
            certificate: url.option(SSL_CERTIFICATE).map(ToString::to_string),
            fingerprint: url.option(FINGERPRINT).map(ToString::to_string),
        };
        options.check_conflicts()?;
        Ok(options)
    }

    /// Certificate options only mean something on an encrypted connection.
    fn check_conflicts(&self) -> Result<()> {
        if self.encryption != Some(false) {
            return Ok(());
        }
        let second = if let Some(certificate) = &self.certificate {
            format!("{SSL_CERTIFICATE}={certificate}")
        } else if let Some(fingerprint) = &self.fingerprint {
            format!("{FINGERPRINT}={fingerprint}")
        } else {
            return Ok(());
        };

        Err(ConfigError::Conflict {
            first: format!("{ENCRYPTION}=N"),
            second,
        }
        .into())
    }

    fn tls(&self) -> bool {
        self.encryption.unwrap_or(true)
    }

    fn is_recognized(key: &str) -> bool {
        [ENCRYPTION, SSL_CERTIFICATE, FINGERPRINT]
            .iter()
            .any(|known| known.eq_ignore_ascii_case(key))
    }
}

/// Keyword arguments for the websocket client.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebsocketConnectArgs;

impl ConnectArgsBuilder for WebsocketConnectArgs {
    fn build(&self, url: &ConnectionUrl) -> Result<ConnectArgs> {
        if let Some(driver) = url.option(DRIVER) {
            return Err(ConfigError::InvalidOption {
                key: DRIVER.to_string(),
                value: driver.to_string(),
                expected: "no value, the websocket transport has no driver manager".to_string(),
            }
            .into());
        }

        let security = SecurityOptions::from_url(url)?;
        let host = require_host(url)?;
        let port = url.port.unwrap_or(DEFAULT_PORT);

        let certificate_validation = match security.certificate.as_deref() {
            None => true,
            Some(value) if value.eq_ignore_ascii_case(SSL_VERIFY_NONE) => false,
            Some(value) => {
                return Err(ConfigError::InvalidOption {
                    key: SSL_CERTIFICATE.to_string(),
                    value: value.to_string(),
                    expected: SSL_VERIFY_NONE.to_string(),
                }
                .into());
            }
        };

        let dsn = match &security.fingerprint {
            Some(fingerprint) => format!("{host}/{fingerprint}:{port}"),
            None => format!("{host}:{port}"),
        };

        let mut args = ConnectArgs::default();
        args.insert("dsn", dsn);
        if let Some(username) = &url.username {
            args.insert("username", username.as_str());
        }
        if let Some(password) = &url.password {
            args.insert("password", password.as_str());
        }
        if let Some(schema) = &url.database {
            args.insert("schema", schema.as_str());
        }
        args.insert("tls", security.tls());
        args.insert("certificate_validation", certificate_validation);
        args.insert("autocommit", autocommit(url)?);
        args.insert(
            "client_name",
            url.option(CLIENT_NAME).unwrap_or(env!("CARGO_PKG_NAME")),
        );
        args.insert(
            "client_version",
            url.option(CLIENT_VERSION)
                .unwrap_or(env!("CARGO_PKG_VERSION")),
        );

        for (key, value) in &url.query {
            let recognized = SecurityOptions::is_recognized(key)
                || [AUTOCOMMIT, CLIENT_NAME, CLIENT_VERSION]
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(key));
            if !recognized {
                args.insert(key.as_str(), value.as_str());
            }
        }

        Ok(args)
    }
}

/// A single ODBC connection string plus keyword arguments for the driver
/// manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbcConnectArgs;

impl ConnectArgsBuilder for OdbcConnectArgs {
    fn build(&self, url: &ConnectionUrl) -> Result<ConnectArgs> {
        SecurityOptions::from_url(url)?;

        let mut options = url
            .query
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<BTreeMap<_, _>>();
        let mut take = |name: &str| {
            let key = options
                .keys()
                .find(|key| key.eq_ignore_ascii_case(name))
                .cloned()?;
            options.remove(&key)
        };

        let mut args = ConnectArgs::default();
        if let Some(ansi) = take(ANSI) {
            args.insert("ansi", parse_flag(ANSI, &ansi)?);
        }
        let autocommit = take(AUTOCOMMIT)
            .map(|value| parse_flag(AUTOCOMMIT, &value))
            .transpose()?
            .unwrap_or(true);
        args.insert("autocommit", autocommit);

        let dsn = take(DSN);
        let driver = take(DRIVER);
        let mut connectors = Vec::new();
        match (dsn, &url.host, url.port) {
            (Some(dsn), _, _) => connectors.push(format!("DSN={dsn}")),
            (None, Some(host), None) => connectors.push(format!("DSN={host}")),
            (None, Some(host), Some(port)) => {
                connectors.push(format!(
                    "DRIVER={{{}}}",
                    driver.as_deref().unwrap_or(DEFAULT_ODBC_DRIVER)
                ));
                connectors.push(format!("EXAHOST={host}:{port}"));
                connectors.push(format!(
                    "EXASCHEMA={}",
                    url.database.as_deref().unwrap_or_default()
                ));
            }
            (None, None, _) => {
                return Err(missing_host());
            }
        }

        if let Some(username) = &url.username {
            connectors.push(format!("UID={username}"));
            connectors.push(format!(
                "PWD={}",
                url.password.as_deref().unwrap_or_default()
            ));
        }
        connectors.push("INTTYPESINRESULTSIFPOSSIBLE=y".to_string());
        connectors.extend(options.iter().map(|(key, value)| format!("{key}={value}")));

        args.positional.push(ArgValue::from(connectors.join(";")));
        Ok(args)
    }
}

fn require_host(url: &ConnectionUrl) -> Result<&str> {
    url.host.as_deref().ok_or_else(missing_host)
}

fn missing_host() -> exadialect_core::Error {
    ConfigError::InvalidOption {
        key: "host".to_string(),
        value: String::new(),
        expected: "a database host".to_string(),
    }
    .into()
}

fn autocommit(url: &ConnectionUrl) -> Result<bool> {
    url.option(AUTOCOMMIT)
        .map(|value| parse_flag(AUTOCOMMIT, value))
        .transpose()
        .map(|value| value.unwrap_or(true))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Ok(true),
        "n" | "no" | "false" | "0" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
            expected: YES_OR_NO.to_string(),
        }
        .into()),
    }
}
