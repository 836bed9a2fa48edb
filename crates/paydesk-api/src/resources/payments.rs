// Payment endpoints: `/paiements`.

use bytes::Bytes;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::query::ListQuery;
use crate::types::{EntityId, Page, PaymentRecord, PaymentPayload};

impl ApiClient {
    /// List payments, filtered by `query`.
    ///
    /// `GET /paiements`
    pub async fn list_payments(&self, query: &ListQuery) -> Result<Page<PaymentRecord>, Error> {
        let data = self.get_value("/paiements", &query.to_pairs()).await?;
        let page = Page::from_value(data, "paiements")?;
        debug!(count = page.items.len(), "listed payments");
        Ok(page)
    }

    /// `POST /paiements`
    pub async fn create_payment(&self, payload: &PaymentPayload) -> Result<PaymentRecord, Error> {
        self.post("/paiements", payload).await
    }

    /// `PUT /paiements/{id}`
    pub async fn update_payment(&self, id: &EntityId, payload: &PaymentPayload) -> Result<PaymentRecord, Error> {
        self.put(&format!("/paiements/{id}"), payload).await
    }

    /// `DELETE /paiements/{id}`
    pub async fn delete_payment(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("/paiements/{id}")).await
    }

    /// Download the PDF receipt for a payment.
    ///
    /// `GET /paiements/{id}/generate-pdf`, returned as raw bytes.
    pub async fn payment_pdf(&self, id: &EntityId) -> Result<Bytes, Error> {
        debug!(%id, "downloading payment receipt");
        self.get_bytes(&format!("/paiements/{id}/generate-pdf")).await
    }
}
