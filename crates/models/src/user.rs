use std::fmt;

use sea_orm::{entity::prelude::*, ActiveEnum, Iterable};
use serde::{Deserialize, Serialize};

use crate::product;

/// Business role of a registered company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "DISTRIBUTOR")]
    Distributor,
    #[sea_orm(string_value = "MAKER")]
    Maker,
    #[sea_orm(string_value = "DEALER")]
    Dealer,
}

impl Role {
    /// Exact, case-sensitive match against the stored names.
    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|r| r.to_value() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_name: String,
    pub role: Role,
    /// Taxpayer identification number.
    pub inn: String,
    /// Bank identifier code.
    pub bik: String,
    /// Tax registration reason code.
    pub kpp: String,
    pub payment_account: String,
    pub legal_address: String,
    pub country: Option<String>,
    pub contact_number: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn has_country(&self) -> bool {
        self.country.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    /// Products this user sells as a distributor.
    ProductsOffered,
    /// Products this user manufactures as a maker.
    ProductsManufactured,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ProductsOffered => product::Relation::Distributor.def().rev(),
            Relation::ProductsManufactured => product::Relation::Maker.def().rev(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_three_roles() {
        assert_eq!(Role::parse("DISTRIBUTOR"), Some(Role::Distributor));
        assert_eq!(Role::parse("MAKER"), Some(Role::Maker));
        assert_eq!(Role::parse("DEALER"), Some(Role::Dealer));
    }

    #[test]
    fn parse_rejects_unknown_and_lowercase() {
        assert_eq!(Role::parse("DILER"), None);
        assert_eq!(Role::parse("maker"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn serde_uses_stored_names() {
        assert_eq!(serde_json::to_string(&Role::Maker).unwrap(), "\"MAKER\"");
        let r: Role = serde_json::from_str("\"DEALER\"").unwrap();
        assert_eq!(r, Role::Dealer);
        assert_eq!(Role::Distributor.to_string(), "DISTRIBUTOR");
    }
}
