use crate::http::{Client, RequestContext};
use crate::{Result, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A METRICA domain abuse report, latest or for one date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricaReport {
    pub version: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tld: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_id: Option<i64>,
    pub domain_list_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains_in_zone: Option<i64>,
    pub unique_abuse_domains: i64,
    #[serde(default)]
    pub domain_list_data: Vec<MetricaThreat>,
    /// Taken from the `Last-Modified` response header
    #[serde(skip)]
    pub last_modified: Option<String>,
}

/// Abuse count and listed domains for one threat type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricaThreat {
    pub threat_type: String,
    pub count: i64,
    #[serde(default)]
    pub domains: Vec<String>,
}

/// Index of the METRICA reports available for a TLD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricaReportList {
    pub version: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tld: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iana_id: Option<i64>,
    #[serde(default)]
    pub domain_lists: Vec<MetricaListInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricaListInfo {
    pub domain_list_date: String,
    pub domain_list_generation_date: String,
}

impl Client {
    /// `GET .../metrica/domainList/latest`
    pub async fn metrica_latest(&self, ctx: &RequestContext) -> Result<MetricaReport> {
        self.metrica_report(ctx, "latest").await
    }

    /// `GET .../metrica/domainList/{YYYY-MM-DD}`
    pub async fn metrica_by_date(&self, ctx: &RequestContext, date: NaiveDate) -> Result<MetricaReport> {
        self.metrica_report(ctx, &date.format(DATE_FORMAT).to_string())
            .await
    }

    /// `GET .../metrica/domainLists`, optionally bounded by report date
    ///
    /// Only the bounds that are set become query parameters.
    pub async fn list_metrica_reports(
        &self,
        ctx: &RequestContext,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<MetricaReportList> {
        let mut path = format!("{}/metrica/domainLists", self.config().resource_prefix());

        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(start) = start_date {
            query.append_pair("startDate", &start.format(DATE_FORMAT).to_string());
        }
        if let Some(end) = end_date {
            query.append_pair("endDate", &end.format(DATE_FORMAT).to_string());
        }
        let query = query.finish();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }

        let (list, _) = self.get_json(ctx, &path).await?;
        Ok(list)
    }

    async fn metrica_report(&self, ctx: &RequestContext, selector: &str) -> Result<MetricaReport> {
        let path = format!(
            "{}/metrica/domainList/{}",
            self.config().resource_prefix(),
            selector
        );
        let (mut report, meta): (MetricaReport, _) = self.get_json(ctx, &path).await?;
        report.last_modified = meta.last_modified().map(str::to_string);
        Ok(report)
    }
}
