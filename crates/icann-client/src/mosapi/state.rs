use super::SERVICES;
use crate::http::{Client, RequestContext};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monitoring state of a TLD and each of its services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub tld: String,
    /// Unix seconds of the last monitoring database update
    pub last_update_api_database: i64,
    /// `Up`, `Down` or `Up-inconclusive`
    pub status: String,
    #[serde(default)]
    pub tested_services: BTreeMap<String, TestedService>,
    pub version: i32,
}

impl StateResponse {
    pub fn all_services_up(&self) -> bool {
        self.tested_services.values().all(TestedService::is_up)
    }

    pub fn has_incidents(&self) -> bool {
        self.tested_services.values().any(TestedService::has_incidents)
    }

    /// Tested services with the well-known ones first, in [`SERVICES`]
    /// order, then any others by name
    pub fn services(&self) -> impl Iterator<Item = (&str, &TestedService)> + '_ {
        let known = SERVICES
            .iter()
            .filter_map(|name| self.tested_services.get_key_value(*name));
        let others = self
            .tested_services
            .iter()
            .filter(|(name, _)| !SERVICES.contains(&name.as_str()));
        known.chain(others).map(|(name, service)| (name.as_str(), service))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestedService {
    pub status: String,
    /// Percentage of the emergency threshold consumed; `0` means no incident counts
    pub emergency_threshold: f64,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl TestedService {
    /// Disabled services are not monitored and count as up
    pub fn is_up(&self) -> bool {
        self.status == "Up" || self.status == "Disabled"
    }

    pub fn has_incidents(&self) -> bool {
        !self.incidents.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(rename = "incidentID")]
    pub incident_id: String,
    pub start_time: i64,
    /// `None` while the incident is still open
    pub end_time: Option<i64>,
    pub false_positive: bool,
    pub state: String,
}

impl Client {
    /// `GET /{entity}/{tld}/{version}/monitoring/state`
    pub async fn state(&self, ctx: &RequestContext) -> Result<StateResponse> {
        let path = format!("{}/monitoring/state", self.config().resource_prefix());
        let (state, _) = self.get_json(ctx, &path).await?;
        Ok(state)
    }
}
