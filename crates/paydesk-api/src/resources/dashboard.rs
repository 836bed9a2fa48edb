// Dashboard aggregate endpoints: KPIs and chart series.

use tracing::debug;

use crate::charts::{ChartKey, ChartPoint, is_labelled_series, normalize_chart};
use crate::client::{ApiClient, unwrap_envelope};
use crate::error::Error;
use crate::query::ChartQuery;
use crate::types::{EntityId, KpiRecord};

impl ApiClient {
    /// Fetch the KPI snapshot, scoped to `tenant` when given.
    ///
    /// `GET /dashboard/kpis[?entrepriseId=]`. An empty payload yields the
    /// all-zero record.
    pub async fn kpis(&self, tenant: Option<&EntityId>) -> Result<KpiRecord, Error> {
        let query: Vec<(String, String)> = tenant
            .map(|id| vec![("entrepriseId".to_owned(), id.to_string())])
            .unwrap_or_default();

        self.get("/dashboard/kpis", &query).await
    }

    /// Fetch one chart series and normalize it.
    ///
    /// `GET /dashboard/charts/{key}?dateDebut=&dateFin=[&entrepriseId=]`
    ///
    /// A bare `{labels, data}` body is a series in its own right, so its
    /// `data` array is not mistaken for an envelope.
    pub async fn chart(&self, key: ChartKey, query: &ChartQuery) -> Result<Vec<ChartPoint>, Error> {
        let path = format!("/dashboard/charts/{key}");
        let body = self.get_raw(&path, &query.to_pairs()).await?;
        let data = if is_labelled_series(&body) {
            body
        } else {
            unwrap_envelope(body)
        };
        let points = normalize_chart(&data);
        debug!(chart = %key, points = points.len(), "chart normalized");
        Ok(points)
    }
}
