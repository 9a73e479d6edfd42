use models::user::{self, Role};
use sea_orm::{prelude::DateTimeWithTimeZone, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub const ROLE_INVALID: &str = "Role must be DISTRIBUTOR, MAKER or DEALER";
pub const COUNTRY_REQUIRED: &str = "Country is required for MAKER role";
pub const MAKER_COUNTRY_CLEARED: &str = "Country must remain set for a MAKER";
pub const USER_NOT_FOUND: &str = "User not found";

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_role(value: &str) -> Result<Role, ServiceError> {
    Role::parse(value).ok_or_else(|| ServiceError::validation(ROLE_INVALID))
}

/// Create payload. `role` stays a string so an unknown value is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub company_name: String,
    pub role: String,
    pub inn: String,
    pub bik: String,
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    #[serde(default)]
    pub country: Option<String>,
    pub contact_number: String,
}

/// Partial update payload; absent fields are left untouched.
///
/// An empty `country` clears it. Empty strings for the other fields are
/// treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub inn: Option<String>,
    #[serde(default)]
    pub bik: Option<String>,
    #[serde(default)]
    pub kpp: Option<String>,
    #[serde(default)]
    pub payment_account: Option<String>,
    #[serde(default)]
    pub legal_address: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

/// A validated create payload, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserRecord {
    pub company_name: String,
    pub role: Role,
    pub inn: String,
    pub bik: String,
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    pub country: Option<String>,
    pub contact_number: String,
}

/// A validated update payload.
///
/// `country` is `Some(None)` when the update clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub company_name: Option<String>,
    pub role: Option<Role>,
    pub inn: Option<String>,
    pub bik: Option<String>,
    pub kpp: Option<String>,
    pub payment_account: Option<String>,
    pub legal_address: Option<String>,
    pub country: Option<Option<String>>,
    pub contact_number: Option<String>,
}

impl CreateUserInput {
    /// Role first, then the maker's country, then the remaining required fields.
    pub fn validate(self) -> Result<NewUserRecord, ServiceError> {
        let role = parse_role(&self.role)?;
        let country = self.country.filter(|c| !is_blank(c));
        if role == Role::Maker && country.is_none() {
            return Err(ServiceError::validation(COUNTRY_REQUIRED));
        }

        let required = [
            ("company_name", &self.company_name),
            ("inn", &self.inn),
            ("bik", &self.bik),
            ("kpp", &self.kpp),
            ("payment_account", &self.payment_account),
            ("legal_address", &self.legal_address),
            ("contact_number", &self.contact_number),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| is_blank(v)) {
            return Err(ServiceError::Validation(format!("{name} is required")));
        }

        Ok(NewUserRecord {
            company_name: self.company_name,
            role,
            inn: self.inn,
            bik: self.bik,
            kpp: self.kpp,
            payment_account: self.payment_account,
            legal_address: self.legal_address,
            country,
            contact_number: self.contact_number,
        })
    }
}

impl NewUserRecord {
    pub fn into_active_model(self, now: DateTimeWithTimeZone) -> user::ActiveModel {
        user::ActiveModel {
            company_name: Set(self.company_name),
            role: Set(self.role),
            inn: Set(self.inn),
            bik: Set(self.bik),
            kpp: Set(self.kpp),
            payment_account: Set(self.payment_account),
            legal_address: Set(self.legal_address),
            country: Set(self.country),
            contact_number: Set(self.contact_number),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

impl UpdateUserInput {
    /// Validate against the stored record.
    ///
    /// Rejected when the update names MAKER without a country while the record
    /// has one, or when it clears the country of what will be a MAKER.
    pub fn validate_against(self, existing: &user::Model) -> Result<UserChanges, ServiceError> {
        let role = self.role.as_deref().map(parse_role).transpose()?;
        let country = self
            .country
            .map(|c| if is_blank(&c) { None } else { Some(c) });

        let sets_country = matches!(country, Some(Some(_)));
        if role == Some(Role::Maker) && !sets_country && existing.has_country() {
            return Err(ServiceError::validation(MAKER_COUNTRY_CLEARED));
        }
        let resulting_role = role.unwrap_or(existing.role);
        if resulting_role == Role::Maker && matches!(country, Some(None)) {
            return Err(ServiceError::validation(MAKER_COUNTRY_CLEARED));
        }

        let present = |v: Option<String>| v.filter(|s| !is_blank(s));
        Ok(UserChanges {
            company_name: present(self.company_name),
            role,
            inn: present(self.inn),
            bik: present(self.bik),
            kpp: present(self.kpp),
            payment_account: present(self.payment_account),
            legal_address: present(self.legal_address),
            country,
            contact_number: present(self.contact_number),
        })
    }
}

impl UserChanges {
    /// Write the changed fields onto `am`, leaving the rest as they were.
    pub fn apply(self, am: &mut user::ActiveModel, now: DateTimeWithTimeZone) {
        if let Some(v) = self.company_name { am.company_name = Set(v); }
        if let Some(v) = self.role { am.role = Set(v); }
        if let Some(v) = self.inn { am.inn = Set(v); }
        if let Some(v) = self.bik { am.bik = Set(v); }
        if let Some(v) = self.kpp { am.kpp = Set(v); }
        if let Some(v) = self.payment_account { am.payment_account = Set(v); }
        if let Some(v) = self.legal_address { am.legal_address = Set(v); }
        if let Some(v) = self.country { am.country = Set(v); }
        if let Some(v) = self.contact_number { am.contact_number = Set(v); }
        am.updated_at = Set(now);
    }
}

/// Product fields exposed in the role projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub characteristics: String,
}

/// A user record as returned by list-by-role: no timestamps, with products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleView {
    pub id: i32,
    pub company_name: String,
    pub role: Role,
    pub inn: String,
    pub bik: String,
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    pub country: Option<String>,
    pub contact_number: String,
    pub products_offered: Vec<ProductSummary>,
    pub products_manufactured: Vec<ProductSummary>,
}

impl From<&models::product::Model> for ProductSummary {
    fn from(p: &models::product::Model) -> Self {
        Self { id: p.id, name: p.name.clone(), price: p.price, characteristics: p.characteristics.clone() }
    }
}
