// Company endpoints: `/entreprises`.
//
// Create and update are multipart because the company logo travels as a
// file part.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::query::ListQuery;
use crate::types::{CompanyPayload, CompanyRecord, EntityId, Page};

impl ApiClient {
    /// List companies. Only meaningful for the superuser role.
    ///
    /// `GET /entreprises`
    pub async fn list_companies(&self, query: &ListQuery) -> Result<Page<CompanyRecord>, Error> {
        let data = self.get_value("/entreprises", &query.to_pairs()).await?;
        let page = Page::from_value(data, "entreprises")?;
        debug!(count = page.items.len(), "listed companies");
        Ok(page)
    }

    /// `POST /entreprises` (multipart)
    pub async fn create_company(&self, payload: &CompanyPayload) -> Result<CompanyRecord, Error> {
        debug!(name = %payload.nom, has_logo = payload.logo.is_some(), "creating company");
        self.post_multipart("/entreprises", payload.to_form()?).await
    }

    /// `PUT /entreprises/{id}` (multipart)
    pub async fn update_company(
        &self,
        id: &EntityId,
        payload: &CompanyPayload,
    ) -> Result<CompanyRecord, Error> {
        self.put_multipart(&format!("/entreprises/{id}"), payload.to_form()?)
            .await
    }

    /// `DELETE /entreprises/{id}`
    pub async fn delete_company(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("/entreprises/{id}")).await
    }
}
