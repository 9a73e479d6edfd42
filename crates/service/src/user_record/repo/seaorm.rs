use std::collections::HashMap;

use chrono::Utc;
use models::{product, user::{self, Role}};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use tracing::warn;

use crate::errors::ServiceError;
use crate::user_record::domain::{NewUserRecord, ProductSummary, UserChanges, UserRoleView, USER_NOT_FOUND};
use crate::user_record::repository::UserRecordRepository;
use crate::user_record::uniqueness::UniqueKey;

pub struct SeaOrmUserRecordRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn column_of(key: UniqueKey) -> user::Column {
    match key {
        UniqueKey::Inn => user::Column::Inn,
        UniqueKey::Bik => user::Column::Bik,
        UniqueKey::Kpp => user::Column::Kpp,
        UniqueKey::PaymentAccount => user::Column::PaymentAccount,
        UniqueKey::ContactNumber => user::Column::ContactNumber,
    }
}

/// Name of the unique index backing `key` (see the indexes migration).
fn unique_index_of(key: UniqueKey) -> &'static str {
    match key {
        UniqueKey::Inn => "uniq_user_inn",
        UniqueKey::Bik => "uniq_user_bik",
        UniqueKey::Kpp => "uniq_user_kpp",
        UniqueKey::PaymentAccount => "uniq_user_payment_account",
        UniqueKey::ContactNumber => "uniq_user_contact_number",
    }
}

/// Writes that lost the race against a concurrent insert surface as the same
/// conflict the pre-check would have reported.
fn map_write_err(e: DbErr) -> ServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        if let Some(key) = UniqueKey::all().find(|k| detail.contains(unique_index_of(*k))) {
            warn!(field = key.name(), "unique index rejected write");
            return ServiceError::Conflict(key);
        }
    }
    ServiceError::Db(e.to_string())
}

#[derive(Debug, FromQueryResult)]
struct UserRoleRow {
    id: i32,
    company_name: String,
    role: Role,
    inn: String,
    bik: String,
    kpp: String,
    payment_account: String,
    legal_address: String,
    country: Option<String>,
    contact_number: String,
}

#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: i32,
    name: String,
    price: f64,
    characteristics: String,
    distributor_id: Option<i32>,
    maker_id: Option<i32>,
}

impl ProductRow {
    fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            characteristics: self.characteristics.clone(),
        }
    }
}

#[async_trait::async_trait]
impl UserRecordRepository for SeaOrmUserRecordRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn exists_by(&self, key: UniqueKey, value: &str) -> Result<bool, ServiceError> {
        let found = user::Entity::find()
            .filter(column_of(key).eq(value))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn list(&self) -> Result<Vec<user::Model>, ServiceError> {
        Ok(user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await?)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<UserRoleView>, ServiceError> {
        let users = user::Entity::find()
            .select_only()
            .columns([
                user::Column::Id,
                user::Column::CompanyName,
                user::Column::Role,
                user::Column::Inn,
                user::Column::Bik,
                user::Column::Kpp,
                user::Column::PaymentAccount,
                user::Column::LegalAddress,
                user::Column::Country,
                user::Column::ContactNumber,
            ])
            .filter(user::Column::Role.eq(role))
            .order_by_asc(user::Column::Id)
            .into_model::<UserRoleRow>()
            .all(&self.db)
            .await?;
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        let products = product::Entity::find()
            .select_only()
            .columns([
                product::Column::Id,
                product::Column::Name,
                product::Column::Price,
                product::Column::Characteristics,
                product::Column::DistributorId,
                product::Column::MakerId,
            ])
            .filter(
                Condition::any()
                    .add(product::Column::DistributorId.is_in(ids.clone()))
                    .add(product::Column::MakerId.is_in(ids)),
            )
            .order_by_asc(product::Column::Id)
            .into_model::<ProductRow>()
            .all(&self.db)
            .await?;

        let mut offered: HashMap<i32, Vec<ProductSummary>> = HashMap::new();
        let mut manufactured: HashMap<i32, Vec<ProductSummary>> = HashMap::new();
        for p in &products {
            if let Some(owner) = p.distributor_id {
                offered.entry(owner).or_default().push(p.summary());
            }
            if let Some(owner) = p.maker_id {
                manufactured.entry(owner).or_default().push(p.summary());
            }
        }

        Ok(users
            .into_iter()
            .map(|u| UserRoleView {
                products_offered: offered.remove(&u.id).unwrap_or_default(),
                products_manufactured: manufactured.remove(&u.id).unwrap_or_default(),
                id: u.id,
                company_name: u.company_name,
                role: u.role,
                inn: u.inn,
                bik: u.bik,
                kpp: u.kpp,
                payment_account: u.payment_account,
                legal_address: u.legal_address,
                country: u.country,
                contact_number: u.contact_number,
            })
            .collect())
    }

    async fn insert(&self, record: NewUserRecord) -> Result<user::Model, ServiceError> {
        record
            .into_active_model(Utc::now().into())
            .insert(&self.db)
            .await
            .map_err(map_write_err)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError> {
        let mut am: user::ActiveModel = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))?
            .into();
        changes.apply(&mut am, Utc::now().into());
        am.update(&self.db).await.map_err(map_write_err)
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = user::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
