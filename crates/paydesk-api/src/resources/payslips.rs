// Payslip endpoints: `/payslips`.
//
// Payslips are generated server-side when a pay run is approved; the
// create/update calls exist for manual corrections.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::query::ListQuery;
use crate::types::{EntityId, Page, PayslipRecord, PayslipPayload};

impl ApiClient {
    /// List payslips, filtered by `query`.
    ///
    /// `GET /payslips`
    pub async fn list_payslips(&self, query: &ListQuery) -> Result<Page<PayslipRecord>, Error> {
        let data = self.get_value("/payslips", &query.to_pairs()).await?;
        let page = Page::from_value(data, "payslips")?;
        debug!(count = page.items.len(), "listed payslips");
        Ok(page)
    }

    /// `POST /payslips`
    pub async fn create_payslip(&self, payload: &PayslipPayload) -> Result<PayslipRecord, Error> {
        self.post("/payslips", payload).await
    }

    /// `PUT /payslips/{id}`
    pub async fn update_payslip(&self, id: &EntityId, payload: &PayslipPayload) -> Result<PayslipRecord, Error> {
        self.put(&format!("/payslips/{id}"), payload).await
    }

    /// `DELETE /payslips/{id}`
    pub async fn delete_payslip(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("/payslips/{id}")).await
    }
}
