use async_trait::async_trait;
use models::user::{self, Role};

use super::domain::{NewUserRecord, UserChanges, UserRoleView};
use super::uniqueness::UniqueKey;
use crate::errors::ServiceError;

/// Storage operations the user record service needs.
///
/// Built once at startup and handed to the service; the service never reaches
/// for a connection on its own.
#[async_trait]
pub trait UserRecordRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError>;
    /// Whether any record already holds `value` in the `key` column.
    async fn exists_by(&self, key: UniqueKey, value: &str) -> Result<bool, ServiceError>;
    async fn list(&self) -> Result<Vec<user::Model>, ServiceError>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<UserRoleView>, ServiceError>;
    async fn insert(&self, record: NewUserRecord) -> Result<user::Model, ServiceError>;
    /// Fails with `NotFound` if the row disappeared since it was read.
    async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;
    use models::product;
    use sea_orm::TryIntoModel;

    use crate::user_record::domain::{ProductSummary, USER_NOT_FOUND};
    use crate::user_record::uniqueness::UNIQUE_FIELDS;

    #[derive(Default)]
    struct State {
        users: BTreeMap<i32, user::Model>,
        products: Vec<product::Model>,
        next_user_id: i32,
        next_product_id: i32,
    }

    /// Keeps records in a map and enforces the same unique identifiers as the
    /// database indexes, so a write that skips the service checks still conflicts.
    #[derive(Default)]
    pub struct MockUserRecordRepository {
        state: Mutex<State>,
        lookups: AtomicUsize,
    }

    impl MockUserRecordRepository {
        fn lock(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|_| ServiceError::Db("mock repository lock poisoned".into()))
        }

        /// Number of `exists_by` calls served so far.
        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.lock().map(|s| s.users.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Attach a product to a distributor and/or maker.
        pub fn seed_product(
            &self,
            name: &str,
            price: f64,
            characteristics: &str,
            distributor_id: Option<i32>,
            maker_id: Option<i32>,
        ) -> Result<product::Model, ServiceError> {
            models::product::validate_price(price)?;
            let mut state = self.lock()?;
            state.next_product_id += 1;
            let p = product::Model {
                id: state.next_product_id,
                name: name.to_string(),
                price,
                characteristics: characteristics.to_string(),
                distributor_id,
                maker_id,
                created_at: Utc::now().into(),
            };
            state.products.push(p.clone());
            Ok(p)
        }

        fn first_clash(users: &BTreeMap<i32, user::Model>, candidate: &user::Model) -> Option<UniqueKey> {
            UNIQUE_FIELDS.iter().find_map(|f| {
                let value = (f.of_record)(candidate);
                users
                    .values()
                    .any(|u| u.id != candidate.id && (f.of_record)(u) == value)
                    .then_some(f.key)
            })
        }
    }

    #[async_trait]
    impl UserRecordRepository for MockUserRecordRepository {
        async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
            Ok(self.lock()?.users.get(&id).cloned())
        }

        async fn exists_by(&self, key: UniqueKey, value: &str) -> Result<bool, ServiceError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let of_record = key.field().of_record;
            Ok(self.lock()?.users.values().any(|u| of_record(u) == value))
        }

        async fn list(&self) -> Result<Vec<user::Model>, ServiceError> {
            Ok(self.lock()?.users.values().cloned().collect())
        }

        async fn list_by_role(&self, role: Role) -> Result<Vec<UserRoleView>, ServiceError> {
            let state = self.lock()?;
            let summaries = |pick: fn(&product::Model) -> Option<i32>, owner: i32| -> Vec<ProductSummary> {
                state.products.iter().filter(|p| pick(p) == Some(owner)).map(ProductSummary::from).collect()
            };
            Ok(state
                .users
                .values()
                .filter(|u| u.role == role)
                .map(|u| UserRoleView {
                    id: u.id,
                    company_name: u.company_name.clone(),
                    role: u.role,
                    inn: u.inn.clone(),
                    bik: u.bik.clone(),
                    kpp: u.kpp.clone(),
                    payment_account: u.payment_account.clone(),
                    legal_address: u.legal_address.clone(),
                    country: u.country.clone(),
                    contact_number: u.contact_number.clone(),
                    products_offered: summaries(|p| p.distributor_id, u.id),
                    products_manufactured: summaries(|p| p.maker_id, u.id),
                })
                .collect())
        }

        async fn insert(&self, record: NewUserRecord) -> Result<user::Model, ServiceError> {
            let mut state = self.lock()?;
            let mut am = record.into_active_model(Utc::now().into());
            am.id = sea_orm::Set(state.next_user_id + 1);
            let created = am.try_into_model()?;
            if let Some(key) = Self::first_clash(&state.users, &created) {
                return Err(ServiceError::Conflict(key));
            }
            state.next_user_id += 1;
            state.users.insert(created.id, created.clone());
            Ok(created)
        }

        async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, ServiceError> {
            let mut state = self.lock()?;
            let existing = state
                .users
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))?;
            let mut am: user::ActiveModel = existing.into();
            changes.apply(&mut am, Utc::now().into());
            let updated = am.try_into_model()?;
            if let Some(key) = Self::first_clash(&state.users, &updated) {
                return Err(ServiceError::Conflict(key));
            }
            state.users.insert(id, updated.clone());
            Ok(updated)
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            let mut state = self.lock()?;
            let removed = state.users.remove(&id).is_some();
            if removed {
                for p in state.products.iter_mut() {
                    if p.distributor_id == Some(id) { p.distributor_id = None; }
                    if p.maker_id == Some(id) { p.maker_id = None; }
                }
            }
            Ok(removed)
        }
    }
}
