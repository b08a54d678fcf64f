//! MOSAPI endpoints: monitoring state and METRICA abuse reports
//!
//! Every resource lives under `/{entity}/{tld}/{version}`, taken from the
//! client's configuration.

mod metrica;
mod state;

pub use metrica::{MetricaListInfo, MetricaReport, MetricaReportList, MetricaThreat};
pub use state::{Incident, StateResponse, TestedService};

/// Services monitored by MOSAPI, as they appear in `testedServices`
pub const SERVICE_EPP: &str = "EPP";
pub const SERVICE_DNS: &str = "DNS";
pub const SERVICE_DNSSEC: &str = "DNSSEC";
pub const SERVICE_RDDS: &str = "RDDS";

/// Display order of the monitored services
pub const SERVICES: [&str; 4] = [SERVICE_EPP, SERVICE_DNS, SERVICE_DNSSEC, SERVICE_RDDS];
