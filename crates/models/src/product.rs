use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub price: f64,
    #[sea_orm(column_type = "Text")]
    pub characteristics: String,
    pub distributor_id: Option<i32>,
    pub maker_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Distributor,
    Maker,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Distributor => Entity::belongs_to(user::Entity)
                .from(Column::DistributorId)
                .to(user::Column::Id)
                .into(),
            Relation::Maker => Entity::belongs_to(user::Entity)
                .from(Column::MakerId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(errors::ModelError::Validation("price must be a non-negative number".into()));
    }
    Ok(())
}

/// Insert a product linked to a distributor and/or a maker.
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    characteristics: &str,
    distributor_id: Option<i32>,
    maker_id: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    validate_price(price)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        characteristics: Set(characteristics.to_string()),
        distributor_id: Set(distributor_id),
        maker_id: Set(maker_id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::validate_price;

    #[test]
    fn price_must_be_finite_and_non_negative() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(1250.5).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }
}
