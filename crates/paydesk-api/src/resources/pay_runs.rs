// Pay run endpoints: `/payruns`.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::query::ListQuery;
use crate::types::{EntityId, Page, PayRunRecord, PayRunPayload};

impl ApiClient {
    /// List pay_runs, filtered by `query`.
    ///
    /// `GET /payruns`
    pub async fn list_pay_runs(&self, query: &ListQuery) -> Result<Page<PayRunRecord>, Error> {
        let data = self.get_value("/payruns", &query.to_pairs()).await?;
        let page = Page::from_value(data, "payRuns")?;
        debug!(count = page.items.len(), "listed pay_runs");
        Ok(page)
    }

    /// `POST /payruns`
    pub async fn create_pay_run(&self, payload: &PayRunPayload) -> Result<PayRunRecord, Error> {
        self.post("/payruns", payload).await
    }

    /// `PUT /payruns/{id}`
    pub async fn update_pay_run(&self, id: &EntityId, payload: &PayRunPayload) -> Result<PayRunRecord, Error> {
        self.put(&format!("/payruns/{id}"), payload).await
    }

    /// `DELETE /payruns/{id}`
    pub async fn delete_pay_run(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("/payruns/{id}")).await
    }

    /// Move a draft pay run to approved. The server rejects any other
    /// starting status.
    ///
    /// `PATCH /payruns/{id}/approve`
    pub async fn approve_pay_run(&self, id: &EntityId) -> Result<PayRunRecord, Error> {
        debug!(%id, "approving pay run");
        self.patch(&format!("/payruns/{id}/approve")).await
    }

    /// Close an approved pay run.
    ///
    /// `PATCH /payruns/{id}/close`
    pub async fn close_pay_run(&self, id: &EntityId) -> Result<PayRunRecord, Error> {
        debug!(%id, "closing pay run");
        self.patch(&format!("/payruns/{id}/close")).await
    }
}
