//! Registry escrow status scenarios


use chrono::NaiveDate;
use icann_client::{Error, EscrowStatus, RequestContext};
use test_support::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUS_PATH: &str = "/rri/escrow/ry/example/2025-10-22/status";

fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
}

async fn server_returning(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_escrow_received() {
    let server = server_returning(200).await;
    let status = mock_client(&server)
        .escrow_report_status(&RequestContext::background(), report_date())
        .await
        .unwrap();

    assert_eq!(status.status, EscrowStatus::Received);
    assert_eq!(status.report_type, "ry-escrow");
    assert_eq!(status.tld, "example");
    assert_eq!(status.date, report_date());
}

#[tokio::test]
async fn test_escrow_pending() {
    let server = server_returning(404).await;
    let status = mock_client(&server)
        .escrow_report_status(&RequestContext::background(), report_date())
        .await
        .unwrap();
    assert_eq!(status.status, EscrowStatus::Pending);
}

#[tokio::test]
async fn test_escrow_unexpected_status() {
    for code in [500u16, 401, 403] {
        let server = server_returning(code).await;
        let err = mock_client(&server)
            .escrow_report_status(&RequestContext::background(), report_date())
            .await
            .unwrap_err();

        match err {
            Error::UnexpectedStatus { status, url, .. } => {
                assert_eq!(status.as_u16(), code);
                assert!(url.ends_with(STATUS_PATH));
            }
            other => panic!("expected unexpected status for {}, got {:?}", code, other),
        }
    }
}

#[tokio::test]
async fn test_escrow_path_ignores_entity() {
    let server = server_returning(200).await;
    let status = registrar_client(&server)
        .escrow_report_status(&RequestContext::background(), report_date())
        .await
        .unwrap();
    assert_eq!(status.status, EscrowStatus::Received);
}
