//! Uniqueness rules for the business identifiers of a user record.
//!
//! [`UNIQUE_FIELDS`] is the single table both create and update read from:
//! inspection order, error message, and where each value lives in the
//! create payload, the update payload, and the stored record.

use futures::future::join_all;
use models::user;
use serde::Serialize;
use tracing::debug;

use super::domain::{NewUserRecord, UserChanges};
use super::repository::UserRecordRepository;
use crate::errors::ServiceError;

/// Identifier columns that must not repeat across records.
///
/// Discriminants index into [`UNIQUE_FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueKey {
    Inn = 0,
    Bik = 1,
    Kpp = 2,
    PaymentAccount = 3,
    ContactNumber = 4,
}

pub struct UniqueField {
    pub key: UniqueKey,
    /// Field name as it appears in payloads and metrics labels.
    pub name: &'static str,
    pub message: &'static str,
    pub of_new: fn(&NewUserRecord) -> &str,
    pub of_changes: fn(&UserChanges) -> Option<&str>,
    pub of_record: fn(&user::Model) -> &str,
}

/// Inspection order for conflicts.
pub static UNIQUE_FIELDS: [UniqueField; 5] = [
    UniqueField {
        key: UniqueKey::Inn,
        name: "inn",
        message: "INN already exists",
        of_new: |r| r.inn.as_str(),
        of_changes: |c| c.inn.as_deref(),
        of_record: |m| m.inn.as_str(),
    },
    UniqueField {
        key: UniqueKey::Bik,
        name: "bik",
        message: "BIK already exists",
        of_new: |r| r.bik.as_str(),
        of_changes: |c| c.bik.as_deref(),
        of_record: |m| m.bik.as_str(),
    },
    UniqueField {
        key: UniqueKey::Kpp,
        name: "kpp",
        message: "KPP already exists",
        of_new: |r| r.kpp.as_str(),
        of_changes: |c| c.kpp.as_deref(),
        of_record: |m| m.kpp.as_str(),
    },
    UniqueField {
        key: UniqueKey::PaymentAccount,
        name: "payment_account",
        message: "Payment account already exists",
        of_new: |r| r.payment_account.as_str(),
        of_changes: |c| c.payment_account.as_deref(),
        of_record: |m| m.payment_account.as_str(),
    },
    UniqueField {
        key: UniqueKey::ContactNumber,
        name: "contact_number",
        message: "Contact number already exists",
        of_new: |r| r.contact_number.as_str(),
        of_changes: |c| c.contact_number.as_deref(),
        of_record: |m| m.contact_number.as_str(),
    },
];

impl UniqueKey {
    pub fn field(self) -> &'static UniqueField {
        &UNIQUE_FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.field().name
    }

    pub fn message(self) -> &'static str {
        self.field().message
    }

    pub fn all() -> impl Iterator<Item = UniqueKey> {
        UNIQUE_FIELDS.iter().map(|f| f.key)
    }
}

/// One planned lookup; `value` is `None` when the lookup is not needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueCheck<'a> {
    pub key: UniqueKey,
    pub value: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Skipped,
    Checked { taken: bool },
}

/// Every identifier of a new record is looked up.
pub fn plan_for_create(record: &NewUserRecord) -> Vec<UniqueCheck<'_>> {
    UNIQUE_FIELDS
        .iter()
        .map(|f| UniqueCheck { key: f.key, value: Some((f.of_new)(record)).filter(|v| !v.is_empty()) })
        .collect()
}

/// Only identifiers that are supplied and differ from the stored value are looked up.
pub fn plan_for_update<'a>(changes: &'a UserChanges, existing: &user::Model) -> Vec<UniqueCheck<'a>> {
    UNIQUE_FIELDS
        .iter()
        .map(|f| {
            let value = (f.of_changes)(changes).filter(|v| !v.is_empty() && *v != (f.of_record)(existing));
            UniqueCheck { key: f.key, value }
        })
        .collect()
}

/// Run all planned lookups together, then report the first taken key in table order.
///
/// Every lookup finishes before any outcome is inspected.
pub async fn ensure_unique<R>(repo: &R, checks: &[UniqueCheck<'_>]) -> Result<(), ServiceError>
where
    R: UserRecordRepository + ?Sized,
{
    let lookups = checks.iter().map(|check| async move {
        let outcome = match check.value {
            None => CheckOutcome::Skipped,
            Some(value) => CheckOutcome::Checked { taken: repo.exists_by(check.key, value).await? },
        };
        Ok::<_, ServiceError>((check.key, outcome))
    });

    let outcomes = join_all(lookups).await;
    for result in outcomes {
        let (key, outcome) = result?;
        debug!(field = key.name(), ?outcome, "unique_check");
        if outcome == (CheckOutcome::Checked { taken: true }) {
            return Err(ServiceError::Conflict(key));
        }
    }
    Ok(())
}
