//! Command handlers for CLI subcommands
//!
//! Every API command is normalized to an [`Operation`] before it gets here,
//! so `get`, `mosapi` and `rri` share one code path: load the credentials
//! profile, build the client, call the endpoint, print the result.

mod completions;

pub use completions::handle_completions;

use crate::cli::{ConnectionArgs, Operation};
use crate::config::resolve_config;
use crate::credentials::{self, Record};
use crate::error::Result;
use crate::output::OutputWriter;
use icann_client::{Client, RequestContext};
use tracing::{debug, info};

/// Run one API operation with the connection settings from the command line
pub async fn handle_operation(
    operation: Operation,
    connection: &ConnectionArgs,
    output: &mut OutputWriter,
) -> Result<()> {
    let client = build_client(connection)?;
    execute(&client, operation, output).await
}

/// Resolve flags and the credentials profile into a ready client
pub fn build_client(connection: &ConnectionArgs) -> Result<Client> {
    let profile = connection.chosen_profile();
    let record = load_record(connection, profile)?;
    let config = resolve_config(connection, &record, profile)?;

    info!(
        tld = %config.tld,
        environment = %config.environment(),
        entity = %config.entity(),
        auth = ?config.auth_type,
        "resolved client configuration"
    );
    Ok(Client::new(config)?)
}

fn load_record(connection: &ConnectionArgs, profile: Option<&str>) -> Result<Record> {
    match credentials::load(profile, connection.credentials_file.as_deref()) {
        Ok(record) => Ok(record),
        Err(err) if connection.has_auth_flags() => {
            debug!(error = %err, "no credentials profile, using flags only");
            Ok(Record::default())
        }
        Err(err) => Err(err.into()),
    }
}

/// Call the endpoint behind `operation` and write its result
pub async fn execute(client: &Client, operation: Operation, output: &mut OutputWriter) -> Result<()> {
    let ctx = RequestContext::background();
    debug!(operation = ?operation, "executing operation");

    match operation {
        Operation::State => output.emit(&client.state(&ctx).await?),
        Operation::MetricaLatest => output.emit(&client.metrica_latest(&ctx).await?),
        Operation::MetricaByDate(date) => output.emit(&client.metrica_by_date(&ctx, date).await?),
        Operation::MetricaLists { start_date, end_date } => {
            output.emit(&client.list_metrica_reports(&ctx, start_date, end_date).await?)
        }
        Operation::EscrowStatus(date) => {
            output.emit(&client.escrow_report_status(&ctx, date).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::error::Error;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn flags() -> ConnectionArgs {
        ConnectionArgs {
            tld: Some("example".into()),
            username: Some("alice".into()),
            password: Some("s3cret".into()),
            credentials_file: Some("/nonexistent/icann/credentials".into()),
            ..ConnectionArgs::default()
        }
    }

    async fn client_for(server: &MockServer) -> Client {
        let mut client = build_client(&flags()).unwrap();
        client.set_base_url(&server.uri()).unwrap();
        client
    }

    #[test]
    fn test_flags_alone_build_a_client() {
        let client = build_client(&flags()).unwrap();
        assert_eq!(client.config().tld, "example");
        assert_eq!(client.base_url().host_str(), Some("mosapi.icann.org"));
    }

    #[test]
    fn test_missing_profile_without_auth_flags_is_an_error() {
        let args = ConnectionArgs {
            tld: Some("example".into()),
            credentials_file: Some("/nonexistent/icann/credentials".into()),
            ..ConnectionArgs::default()
        };
        let err = build_client(&args).unwrap_err();
        assert!(matches!(err, Error::Credentials(_)));
    }

    #[tokio::test]
    async fn test_execute_escrow_status_writes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rri/escrow/ry/example/2025-10-22/status"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let captured = Captured::default();
        let mut output = OutputWriter::with_writer(OutputFormat::Json, false, Box::new(captured.clone()));
        let date = NaiveDate::from_ymd_opt(2025, 10, 22).unwrap();

        execute(&client, Operation::EscrowStatus(date), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(captured.0.borrow().clone()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "ry-escrow");
        assert_eq!(value["status"], "pending");
    }

    #[tokio::test]
    async fn test_execute_propagates_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ry/example/v2/monitoring/state"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let captured = Captured::default();
        let mut output = OutputWriter::with_writer(OutputFormat::Human, false, Box::new(captured.clone()));

        let err = execute(&client, Operation::State, &mut output).await.unwrap_err();
        assert!(matches!(&err, Error::Client(e) if e.as_status().is_some()));
        assert!(captured.0.borrow().is_empty());
    }
}
