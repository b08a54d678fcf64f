//! RRI (Registration Reporting Interface) endpoints
//!
//! Escrow status paths are RRI-scoped and do not use the MOSAPI
//! entity/version routing.

use crate::error::Error;
use crate::http::{Client, Method, RequestContext, StatusCode};
use crate::{Result, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report type of registry escrow deposits
pub const RY_ESCROW: &str = "ry-escrow";

/// Whether ICANN has received the escrow report for a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscrowStatus {
    Received,
    Pending,
}

impl EscrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscrowStatus::Received => "received",
            EscrowStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowReportStatus {
    #[serde(rename = "type")]
    pub report_type: String,
    pub tld: String,
    pub date: NaiveDate,
    pub status: EscrowStatus,
}

impl Client {
    /// `GET /rri/escrow/ry/{tld}/{YYYY-MM-DD}/status`
    ///
    /// 200 means received and 404 means pending. Every other status is
    /// [`Error::UnexpectedStatus`]. The body is ignored.
    pub async fn escrow_report_status(
        &self,
        ctx: &RequestContext,
        date: NaiveDate,
    ) -> Result<EscrowReportStatus> {
        let tld = self.config().tld;
        let path = format!("/rri/escrow/ry/{}/{}/status", tld, date.format(DATE_FORMAT));

        let request = self.build_request(ctx, Method::GET, &path, None)?;
        let response = self.execute(&request).await?;
        let status = response.status();
        let _ = response.bytes().await;

        let status = match status {
            StatusCode::OK => EscrowStatus::Received,
            StatusCode::NOT_FOUND => EscrowStatus::Pending,
            other => {
                return Err(Error::UnexpectedStatus {
                    status: other,
                    method: request.method().clone(),
                    url: request.url().to_string(),
                })
            }
        };

        Ok(EscrowReportStatus {
            report_type: RY_ESCROW.to_string(),
            tld,
            date,
            status,
        })
    }
}
