// Employee endpoints: `/employes`.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::query::ListQuery;
use crate::types::{EntityId, Page, EmployeeRecord, EmployeePayload};

impl ApiClient {
    /// List employees, filtered by `query`.
    ///
    /// `GET /employes`
    pub async fn list_employees(&self, query: &ListQuery) -> Result<Page<EmployeeRecord>, Error> {
        let data = self.get_value("/employes", &query.to_pairs()).await?;
        let page = Page::from_value(data, "employes")?;
        debug!(count = page.items.len(), "listed employees");
        Ok(page)
    }

    /// `POST /employes`
    pub async fn create_employee(&self, payload: &EmployeePayload) -> Result<EmployeeRecord, Error> {
        self.post("/employes", payload).await
    }

    /// `PUT /employes/{id}`
    pub async fn update_employee(&self, id: &EntityId, payload: &EmployeePayload) -> Result<EmployeeRecord, Error> {
        self.put(&format!("/employes/{id}"), payload).await
    }

    /// `DELETE /employes/{id}`
    pub async fn delete_employee(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("/employes/{id}")).await
    }

    /// Mark an employee active.
    ///
    /// `PATCH /employes/{id}/activer`
    pub async fn activate_employee(&self, id: &EntityId) -> Result<EmployeeRecord, Error> {
        debug!(%id, "activating employee");
        self.patch(&format!("/employes/{id}/activer")).await
    }

    /// Mark an employee inactive.
    ///
    /// `PATCH /employes/{id}/desactiver`
    pub async fn deactivate_employee(&self, id: &EntityId) -> Result<EmployeeRecord, Error> {
        debug!(%id, "deactivating employee");
        self.patch(&format!("/employes/{id}/desactiver")).await
    }
}
