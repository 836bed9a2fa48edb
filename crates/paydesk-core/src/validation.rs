// ── Client-side form validation ──
//
// Rules applied before any network call. Each check returns the first
// problem found for its field as `CoreError::Validation`.

use std::sync::LazyLock;

use regex::Regex;

use paydesk_api::{CompanyPayload, EmployeePayload, UserPayload};

use crate::command::EntityForm;
use crate::dialog::DialogMode;
use crate::error::CoreError;

const MIN_EMAIL_LEN: usize = 3;
const MAX_FIELD_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 6;
const MIN_NAME_LEN: usize = 3;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `local@domain.tld`: no whitespace, a single `@`, and a dot inside the
/// domain with text on both sides.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// ASCII letters, Latin-1 letters (`À` to `ÿ`), whitespace and hyphens.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s-]+$").expect("Invalid regex"));

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let len = email.chars().count();
    if is_blank(email) {
        Err(CoreError::validation("email", "email is required"))
    } else if len < MIN_EMAIL_LEN {
        Err(CoreError::validation("email", "email must be at least 3 characters"))
    } else if len > MAX_FIELD_LEN {
        Err(CoreError::validation("email", "email must be at most 50 characters"))
    } else if !EMAIL_RE.is_match(email) {
        Err(CoreError::validation("email", "email must look like name@domain.com"))
    } else {
        Ok(())
    }
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if is_blank(password) {
        Err(CoreError::validation("password", "password is required"))
    } else if len < MIN_PASSWORD_LEN {
        Err(CoreError::validation("password", "password must be at least 6 characters"))
    } else if len > MAX_FIELD_LEN {
        Err(CoreError::validation("password", "password must be at most 50 characters"))
    } else {
        Ok(())
    }
}

pub fn validate_name(field: &str, name: &str) -> Result<(), CoreError> {
    let len = name.chars().count();
    if is_blank(name) {
        Err(CoreError::validation(field, "name is required"))
    } else if len < MIN_NAME_LEN {
        Err(CoreError::validation(field, "name must be at least 3 characters"))
    } else if len > MAX_FIELD_LEN {
        Err(CoreError::validation(field, "name must be at most 50 characters"))
    } else if !NAME_RE.is_match(name) {
        Err(CoreError::validation(
            field,
            "name may only contain letters, spaces and hyphens",
        ))
    } else {
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if is_blank(value) {
        Err(CoreError::validation(field, format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Credentials check run by `Dashboard::login`.
pub fn validate_login(email: &str, password: &str) -> Result<(), CoreError> {
    validate_email(email)?;
    validate_password(password)
}

fn validate_company(form: &CompanyPayload) -> Result<(), CoreError> {
    validate_name("nom", &form.nom)?;
    require("devise", &form.devise)
}

fn validate_user(form: &UserPayload, mode: DialogMode) -> Result<(), CoreError> {
    validate_email(&form.email)?;
    match (&form.password, mode) {
        (Some(password), _) => validate_password(password),
        (None, DialogMode::Create) => validate_password(""),
        (None, DialogMode::Update) => Ok(()),
    }
}

fn validate_employee(form: &EmployeePayload) -> Result<(), CoreError> {
    require("nomComplet", &form.nom_complet)?;
    require("poste", &form.poste)
}

/// Per-kind checks applied to CRUD dialog submissions.
pub fn validate_form(form: &EntityForm, mode: DialogMode) -> Result<(), CoreError> {
    match form {
        EntityForm::Company(p) => validate_company(p),
        EntityForm::User(p) => validate_user(p, mode),
        EntityForm::Employee(p) => validate_employee(p),
        EntityForm::PayRun(_) | EntityForm::Payslip(_) | EntityForm::Payment(_) => Ok(()),
    }
}
