use anyhow::Context;
use miette::Report;

const CONNECT_ARGS_CONTEXT: &str = "while building connect arguments";
const REFLECT_CONTEXT: &str = "while reflecting metadata";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    ConnectArgs(exadialect_core::Error),
    Reflect(exadialect_core::Error),
    MissingTable { object: &'static str },
    #[cfg(not(feature = "odbc"))]
    NoTransport,
}

impl CliError {
    /// Configuration problems exit like usage errors so scripts can tell
    /// them apart from failures talking to the server.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectArgs(source) | Self::Reflect(source) => {
                if matches!(source, exadialect_core::Error::Config(_)) {
                    2
                } else {
                    1
                }
            }
            Self::MissingTable { .. } => 2,
            #[cfg(not(feature = "odbc"))]
            Self::NoTransport => 2,
        }
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::ConnectArgs(source) => {
            let category = source.category();
            let report = report_with_context(source, CONNECT_ARGS_CONTEXT);
            format!("[{category}] {report}")
        }
        CliError::Reflect(source) => {
            let category = source.category();
            let report = report_with_context(source, REFLECT_CONTEXT);
            format!("[{category}] {report}")
        }
        CliError::MissingTable { object } => {
            format!("[argument] reflecting `{object}` needs --table <TABLE>")
        }
        #[cfg(not(feature = "odbc"))]
        CliError::NoTransport => format!("[config] {}", no_transport_message()),
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = std::result::Result::<(), E>::Err(source)
        .context(context)
        .expect_err("context wrapping must produce an error");
    miette::miette!("{anyhow_error:#}")
}

#[cfg(not(feature = "odbc"))]
fn no_transport_message() -> &'static str {
    "no transport is compiled into this build; rebuild with `--features odbc` to reflect a live database"
}
