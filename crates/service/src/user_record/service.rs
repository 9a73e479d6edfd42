use std::sync::Arc;

use models::user::{self, Role};
use tracing::{info, instrument, warn};

use super::domain::{CreateUserInput, UpdateUserInput, UserRoleView, ROLE_INVALID, USER_NOT_FOUND};
use super::repository::UserRecordRepository;
use super::uniqueness::{ensure_unique, plan_for_create, plan_for_update};
use crate::errors::ServiceError;

/// Application service for company user records.
///
/// Validation and uniqueness checks happen here; persistence is delegated to
/// the repository handed in at construction.
pub struct UserRecordService<R: UserRecordRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRecordRepository + ?Sized> UserRecordService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate, check the five identifiers, then insert.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::user_record::{domain::CreateUserInput, repository::mock::MockUserRecordRepository};
    /// use service::UserRecordService;
    /// let svc = UserRecordService::new(Arc::new(MockUserRecordRepository::default()));
    /// let input = CreateUserInput {
    ///     company_name: "Volga Tools".into(),
    ///     role: "MAKER".into(),
    ///     inn: "7701234567".into(),
    ///     bik: "044525225".into(),
    ///     kpp: "770101001".into(),
    ///     payment_account: "40702810900000000001".into(),
    ///     legal_address: "Moscow, Tverskaya 1".into(),
    ///     country: Some("RU".into()),
    ///     contact_number: "+74951234567".into(),
    /// };
    /// let created = tokio_test::block_on(svc.create(input.clone())).unwrap();
    /// assert_eq!(created.id, 1);
    /// let again = tokio_test::block_on(svc.create(input));
    /// assert_eq!(again.unwrap_err().to_string(), "INN already exists");
    /// ```
    #[instrument(skip(self, input), fields(role = %input.role))]
    pub async fn create(&self, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        let record = input.validate()?;
        if let Err(e) = ensure_unique(self.repo.as_ref(), &plan_for_create(&record)).await {
            log_conflict(&e);
            return Err(e);
        }
        let created = self.repo.insert(record).await?;
        info!(id = created.id, role = %created.role, "user_record_created");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<user::Model>, ServiceError> {
        self.repo.list().await
    }

    /// Records of one role, projected with their offered and manufactured products.
    #[instrument(skip(self))]
    pub async fn find_all_by_role(&self, role: &str) -> Result<Vec<UserRoleView>, ServiceError> {
        let role = Role::parse(role).ok_or_else(|| ServiceError::validation(ROLE_INVALID))?;
        self.repo.list_by_role(role).await
    }

    pub async fn find_one(&self, id: i32) -> Result<user::Model, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.into()))
    }

    /// Merge a partial update into the stored record.
    ///
    /// Identifiers that are absent or equal to the stored value are not looked up,
    /// so a record never conflicts with itself.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateUserInput) -> Result<user::Model, ServiceError> {
        let existing = self.find_one(id).await?;
        let changes = input.validate_against(&existing)?;
        if let Err(e) = ensure_unique(self.repo.as_ref(), &plan_for_update(&changes, &existing)).await {
            log_conflict(&e);
            return Err(e);
        }
        let updated = self.repo.update(id, changes).await?;
        info!(id = updated.id, role = %updated.role, "user_record_updated");
        Ok(updated)
    }

    /// Delete an existing record and return it as it was.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<user::Model, ServiceError> {
        let existing = self.find_one(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(USER_NOT_FOUND.into()));
        }
        info!(id, "user_record_deleted");
        Ok(existing)
    }
}

fn log_conflict(e: &ServiceError) {
    if let ServiceError::Conflict(key) = e {
        warn!(field = key.name(), "user_record_conflict");
    }
}
