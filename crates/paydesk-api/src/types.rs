// Wire types for the payroll REST API.
//
// Field names follow the server's JSON (French, camelCase). Every record
// is deserialized leniently: missing fields take defaults, amounts accept
// numbers or numeric strings, and unknown fields are kept in `extra` so
// callers can still reach server-owned data the client does not model.

use std::fmt;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

// ── Identifiers ─────────────────────────────────────────────────────

/// Identifier of any server record.
///
/// The API hands out integer ids for some deployments and string ids
/// for others; both are displayed verbatim in paths and query strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Extract an id from an arbitrary JSON value (e.g. dialog seed data).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) if !s.is_empty() => Some(Self::from(s.as_str())),
            _ => None,
        }
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Numeric only when the number renders back to the same text, so ids
/// like `"0017"` or `"+5"` keep their exact spelling in paths.
impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Number(n),
            _ => Self::Text(s.to_owned()),
        }
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

// ── Lenient scalar decoding ─────────────────────────────────────────

/// Coerce a JSON value to a number the way the dashboards read amounts:
/// numbers pass through, numeric strings are parsed, anything else is 0.
pub fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() { parsed } else { 0.0 }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let n = coerce_f64(&value);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    Ok(if n > 0.0 { n.round() as u64 } else { 0 })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Tokens returned by `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyRecord {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_string")]
    pub nom: String,
    #[serde(deserialize_with = "lenient_string")]
    pub devise: String,
    pub adresse: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub periode_type: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub nombre_admins: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub nombre_caissiers: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub role: String,
    pub entreprise_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeRecord {
    pub id: EntityId,
    #[serde(deserialize_with = "lenient_string")]
    pub nom_complet: String,
    #[serde(deserialize_with = "lenient_string")]
    pub poste: String,
    #[serde(deserialize_with = "lenient_string")]
    pub type_contrat: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub taux_salaire: f64,
    pub compte_bancaire: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub statut: String,
    pub entreprise_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayRunRecord {
    pub id: EntityId,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub period_type: String,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub statut: String,
    pub entreprise_id: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayslipRecord {
    pub id: EntityId,
    pub employe_id: Option<EntityId>,
    pub pay_run_id: Option<EntityId>,
    #[serde(deserialize_with = "lenient_f64")]
    pub salaire_brut: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub deductions: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub salaire_net: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub statut: String,
    pub date_creation: Option<String>,
    pub employe: Option<EmployeeRecord>,
    pub pay_run: Option<PayRunRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRecord {
    pub id: EntityId,
    pub payslip_id: Option<EntityId>,
    #[serde(deserialize_with = "lenient_f64")]
    pub montant: f64,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub method: String,
    pub date_paiement: Option<String>,
    pub notes: Option<String>,
    pub payslip: Option<Box<PayslipRecord>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Aggregate indicators from `GET /dashboard/kpis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KpiRecord {
    #[serde(deserialize_with = "lenient_u64")]
    pub total_employes: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub employes_actifs: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub masse_salariale_totale: f64,
    #[serde(deserialize_with = "lenient_u64")]
    pub pay_runs_brouillon: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub pay_runs_approuve: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub pay_runs_cloture: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub paiements_en_attente: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub paiements_partiel: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub paiements_paye: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Request payloads ────────────────────────────────────────────────

/// Logo file attached to a company create/update.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Company create/update body. Sent as a multipart form because the
/// logo travels as a file part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPayload {
    pub nom: String,
    pub devise: String,
    pub adresse: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub periode_type: Option<String>,
    pub nombre_admins: Option<u32>,
    pub nombre_caissiers: Option<u32>,
    pub logo: Option<LogoUpload>,
}

impl CompanyPayload {
    /// Encode every present field as a text part, and the logo as a file part.
    pub fn to_form(&self) -> Result<Form, Error> {
        let mut form = Form::new()
            .text("nom", self.nom.clone())
            .text("devise", self.devise.clone());

        let optional = [
            ("adresse", self.adresse.clone()),
            ("primaryColor", self.primary_color.clone()),
            ("secondaryColor", self.secondary_color.clone()),
            ("periodeType", self.periode_type.clone()),
            ("nombreAdmins", self.nombre_admins.map(|n| n.to_string())),
            ("nombreCaissiers", self.nombre_caissiers.map(|n| n.to_string())),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                form = form.text(name, value);
            }
        }

        if let Some(ref logo) = self.logo {
            let part = Part::stream(logo.bytes.clone())
                .file_name(logo.file_name.clone())
                .mime_str(&logo.content_type)
                .map_err(|e| Error::Client(format!("invalid logo content type: {e}")))?;
            form = form.part("logo", part);
        }

        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entreprise_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub nom_complet: String,
    pub poste: String,
    pub type_contrat: String,
    pub taux_salaire: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compte_bancaire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entreprise_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRunPayload {
    #[serde(rename = "type")]
    pub period_type: String,
    pub date_debut: String,
    pub date_fin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entreprise_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipPayload {
    pub employe_id: EntityId,
    pub pay_run_id: EntityId,
    pub salaire_brut: f64,
    pub deductions: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salaire_net: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub payslip_id: EntityId,
    pub montant: f64,
    #[serde(rename = "type")]
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Pagination ──────────────────────────────────────────────────────

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Server-reported total, when the `{items, total}` shape is used.
    pub total: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: None,
        }
    }
}

impl<T: serde::de::DeserializeOwned> Page<T> {
    /// Parse a list payload.
    ///
    /// Accepts `{items, total}`, a bare array, or an object holding the
    /// array under the resource's own key (e.g. `{"employes": [...]}`).
    /// Any other shape is an empty page.
    pub fn from_value(value: Value, collection_key: &str) -> Result<Self, Error> {
        let (items, total) = match value {
            Value::Array(items) => (items, None),
            Value::Object(mut map) => {
                let total = map.get("total").and_then(Value::as_u64);
                let items = match map.remove("items") {
                    Some(Value::Array(items)) => items,
                    _ => match map.remove(collection_key) {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    },
                };
                (items, total)
            }
            _ => (Vec::new(), None),
        };

        let items = items
            .into_iter()
            .map(crate::client::decode)
            .collect::<Result<Vec<T>, Error>>()?;
        Ok(Self { items, total })
    }
}
