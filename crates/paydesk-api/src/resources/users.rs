// Users endpoints: `/users`.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::query::ListQuery;
use crate::types::{EntityId, Page, UserRecord, UserPayload};

impl ApiClient {
    /// List users, filtered by `query`.
    ///
    /// `GET /users`
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<UserRecord>, Error> {
        let data = self.get_value("/users", &query.to_pairs()).await?;
        let page = Page::from_value(data, "users")?;
        debug!(count = page.items.len(), "listed users");
        Ok(page)
    }

    /// `POST /users`
    pub async fn create_user(&self, payload: &UserPayload) -> Result<UserRecord, Error> {
        self.post("/users", payload).await
    }

    /// `PUT /users/{id}`
    pub async fn update_user(&self, id: &EntityId, payload: &UserPayload) -> Result<UserRecord, Error> {
        self.put(&format!("/users/{id}"), payload).await
    }

    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: &EntityId) -> Result<(), Error> {
        self.delete(&format!("/users/{id}")).await
    }
}
