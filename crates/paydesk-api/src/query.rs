// Query-string builders for list and chart endpoints.

use chrono::NaiveDate;

use crate::types::EntityId;

/// Filters accepted by the list endpoints.
///
/// Unset fields are omitted from the query string. `extra` carries any
/// additional `key=value` pair the server understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub status: Option<String>,
    pub role: Option<String>,
    pub tenant_id: Option<EntityId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub extra: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope the query to one company.
    pub fn tenant(mut self, tenant_id: Option<EntityId>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Render as wire query pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_owned(), value));
            }
        };

        push("statut", self.status.clone());
        push("role", self.role.clone());
        push("entrepriseId", self.tenant_id.as_ref().map(ToString::to_string));
        push("dateDebut", self.date_from.map(|d| d.to_string()));
        push("dateFin", self.date_to.map(|d| d.to_string()));
        push("search", self.search.clone());
        push("page", self.page.map(|p| p.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));

        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}

/// Date window and tenant scope for chart endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tenant: Option<EntityId>,
}

impl ChartQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("dateDebut".to_owned(), self.from.to_string()),
            ("dateFin".to_owned(), self.to.to_string()),
        ];
        if let Some(ref tenant) = self.tenant {
            pairs.push(("entrepriseId".to_owned(), tenant.to_string()));
        }
        pairs
    }
}
