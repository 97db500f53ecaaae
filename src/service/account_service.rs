use std::sync::Arc;

use crate::{
    db::{accountdb::AccountExt, skilldb::SkillExt, workrequestdb::WorkRequestExt, Store},
    error::ErrorMessage,
    models::accountmodel::*,
    service::error::ServiceError,
    utils::password,
};

#[derive(Debug)]
pub struct AccountService<D> {
    db_client: Arc<D>,
    max_worker_skills: usize,
}

impl<D: Store> AccountService<D> {
    pub fn new(db_client: Arc<D>, max_worker_skills: usize) -> Self {
        Self {
            db_client,
            max_worker_skills,
        }
    }

    pub async fn register_user(&self, new_account: NewAccount) -> Result<Account, ServiceError> {
        self.ensure_username_free(&new_account.username).await?;

        let username = new_account.username.clone();
        let hashed_password = password::hash(new_account.password.as_str())?;

        let account = self
            .db_client
            .save_account(NewAccount {
                password: hashed_password,
                role: AccountRole::User,
                ..new_account
            })
            .await
            .map_err(|e| ServiceError::from_constraint(e, username_taken(&username)))?;

        tracing::info!("registered user {} ({})", account.username, account.id);
        Ok(account)
    }

    pub async fn register_worker(
        &self,
        new_account: NewAccount,
        profile: NewWorkerProfile,
        skill_ids: Vec<i64>,
    ) -> Result<WorkerDetails, ServiceError> {
        if profile.experience_years < 0 {
            return Err(ServiceError::Validation(
                "Experience years cannot be negative".to_string(),
            ));
        }

        let skill_ids = self.validate_skills(skill_ids).await?;
        self.ensure_username_free(&new_account.username).await?;

        let username = new_account.username.clone();
        let hashed_password = password::hash(new_account.password.as_str())?;

        let (account, profile) = self
            .db_client
            .save_worker(
                NewAccount {
                    password: hashed_password,
                    role: AccountRole::Worker,
                    ..new_account
                },
                profile,
                &skill_ids,
            )
            .await
            .map_err(|e| ServiceError::from_constraint(e, username_taken(&username)))?;

        let skills = self.db_client.get_worker_skills(account.id).await?;

        tracing::info!(
            "registered worker {} ({}) with {} skills",
            account.username,
            account.id,
            skills.len()
        );

        Ok(WorkerDetails {
            account,
            profile,
            skills,
        })
    }

    /// Succeeds only when username, password and role all match one account.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<Account, ServiceError> {
        let wrong_credentials =
            || ServiceError::InvalidCredentials(ErrorMessage::WrongCredentials.to_string());

        let account = self
            .db_client
            .get_account(None, Some(username))
            .await?
            .ok_or_else(wrong_credentials)?;

        let password_matched =
            password::compare(password, &account.password).map_err(|_| wrong_credentials())?;

        if !password_matched || account.role != role {
            tracing::debug!("rejected login for {}", username);
            return Err(wrong_credentials());
        }

        Ok(account)
    }

    pub async fn get_account(&self, account_id: i64) -> Result<Account, ServiceError> {
        self.db_client
            .get_account(Some(account_id), None)
            .await?
            .ok_or(ServiceError::AccountNotFound(account_id))
    }

    /// Looks up an account that must hold `role`; any other role reads as missing.
    pub async fn get_account_with_role(
        &self,
        account_id: i64,
        role: AccountRole,
    ) -> Result<Account, ServiceError> {
        let not_found = || match role {
            AccountRole::Worker => ServiceError::WorkerNotFound(account_id),
            _ => ServiceError::AccountNotFound(account_id),
        };

        let account = self
            .db_client
            .get_account(Some(account_id), None)
            .await?
            .ok_or_else(not_found)?;

        if account.role != role {
            return Err(not_found());
        }

        Ok(account)
    }

    pub async fn update_account(
        &self,
        account_id: i64,
        role: AccountRole,
        update: AccountUpdate,
    ) -> Result<Account, ServiceError> {
        self.get_account_with_role(account_id, role).await?;

        self.db_client
            .update_account(account_id, update)
            .await?
            .ok_or(ServiceError::AccountNotFound(account_id))
    }

    pub async fn get_worker(&self, worker_id: i64) -> Result<WorkerDetails, ServiceError> {
        let account = self
            .get_account_with_role(worker_id, AccountRole::Worker)
            .await?;

        let profile = self
            .db_client
            .get_worker_profile(worker_id)
            .await?
            .ok_or(ServiceError::WorkerNotFound(worker_id))?;

        let skills = self.db_client.get_worker_skills(worker_id).await?;

        Ok(WorkerDetails {
            account,
            profile,
            skills,
        })
    }

    pub async fn update_worker(
        &self,
        worker_id: i64,
        account_update: AccountUpdate,
        profile_update: WorkerProfileUpdate,
        skill_ids: Option<Vec<i64>>,
    ) -> Result<WorkerDetails, ServiceError> {
        if profile_update.experience_years.map_or(false, |years| years < 0) {
            return Err(ServiceError::Validation(
                "Experience years cannot be negative".to_string(),
            ));
        }

        self.get_account_with_role(worker_id, AccountRole::Worker)
            .await?;

        let skill_ids = match skill_ids {
            Some(skill_ids) => Some(self.validate_skills(skill_ids).await?),
            None => None,
        };

        self.db_client
            .update_account(worker_id, account_update)
            .await?
            .ok_or(ServiceError::WorkerNotFound(worker_id))?;

        self.db_client
            .update_worker_profile(worker_id, profile_update, skill_ids.as_deref())
            .await?
            .ok_or(ServiceError::WorkerNotFound(worker_id))?;

        self.get_worker(worker_id).await
    }

    pub async fn update_worker_status(
        &self,
        worker_id: i64,
        status: AvailableStatus,
    ) -> Result<WorkerProfile, ServiceError> {
        let profile = self
            .db_client
            .update_worker_status(worker_id, status)
            .await?
            .ok_or(ServiceError::WorkerNotFound(worker_id))?;

        tracing::info!("worker {} is now {}", worker_id, status.to_str());
        Ok(profile)
    }

    pub async fn add_availability(
        &self,
        worker_id: i64,
        slots: AvailabilitySlots,
    ) -> Result<WorkerAvailability, ServiceError> {
        if !slots.is_ordered() {
            return Err(ServiceError::Validation(
                "Availability slots must be ordered: morning start < morning end <= afternoon start < afternoon end"
                    .to_string(),
            ));
        }

        self.get_account_with_role(worker_id, AccountRole::Worker)
            .await?;

        Ok(self
            .db_client
            .save_worker_availability(worker_id, slots)
            .await?)
    }

    pub async fn get_availability(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerAvailability>, ServiceError> {
        self.get_account_with_role(worker_id, AccountRole::Worker)
            .await?;

        Ok(self.db_client.get_worker_availability(worker_id).await?)
    }

    pub async fn list_accounts(&self, role: AccountRole) -> Result<Vec<Account>, ServiceError> {
        Ok(self.db_client.get_accounts_by_role(role).await?)
    }

    pub async fn list_workers(&self) -> Result<Vec<WorkerDetails>, ServiceError> {
        let accounts = self.db_client.get_accounts_by_role(AccountRole::Worker).await?;

        let mut workers = Vec::with_capacity(accounts.len());
        for account in accounts {
            let Some(profile) = self.db_client.get_worker_profile(account.id).await? else {
                tracing::warn!("worker {} has no profile, skipping", account.id);
                continue;
            };
            let skills = self.db_client.get_worker_skills(account.id).await?;
            workers.push(WorkerDetails {
                account,
                profile,
                skills,
            });
        }

        Ok(workers)
    }

    /// Deletes a User or Worker together with its requests. Refused while the
    /// account still takes part in an Accepted request.
    pub async fn delete_account(
        &self,
        account_id: i64,
        role: AccountRole,
    ) -> Result<(), ServiceError> {
        self.get_account_with_role(account_id, role).await?;

        let active = self.db_client.count_active_work_requests(account_id).await?;
        if active > 0 {
            return Err(ServiceError::Conflict(format!(
                "Account {} still has {} accepted work request(s); cancel or complete them first",
                account_id, active
            )));
        }

        if !self.db_client.delete_account(account_id).await? {
            return Err(ServiceError::AccountNotFound(account_id));
        }

        tracing::info!("deleted {} account {}", role, account_id);
        Ok(())
    }

    /// Creates the configured admin account unless the username is taken.
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, ServiceError> {
        if let Some(existing) = self.db_client.get_account(None, Some(username)).await? {
            if existing.role != AccountRole::Admin {
                tracing::warn!(
                    "admin bootstrap skipped: username {} belongs to a {} account",
                    username,
                    existing.role
                );
            }
            return Ok(None);
        }

        let hashed_password = password::hash(password)?;
        let admin = self
            .db_client
            .save_account(NewAccount {
                username: username.to_string(),
                password: hashed_password,
                role: AccountRole::Admin,
                first_name: "Platform".to_string(),
                last_name: "Admin".to_string(),
                email: None,
                phone_number1: None,
                phone_number2: None,
            })
            .await?;

        tracing::info!("created admin account {}", admin.username);
        Ok(Some(admin))
    }

    async fn ensure_username_free(&self, username: &str) -> Result<(), ServiceError> {
        if self
            .db_client
            .get_account(None, Some(username))
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(username_taken(username)));
        }
        Ok(())
    }

    async fn validate_skills(&self, mut skill_ids: Vec<i64>) -> Result<Vec<i64>, ServiceError> {
        skill_ids.sort_unstable();
        skill_ids.dedup();

        if skill_ids.is_empty() {
            return Err(ServiceError::Validation(
                "A worker must have at least one skill".to_string(),
            ));
        }

        if skill_ids.len() > self.max_worker_skills {
            return Err(ServiceError::Validation(format!(
                "A worker can have at most {} skills",
                self.max_worker_skills
            )));
        }

        for skill_id in &skill_ids {
            if self.db_client.get_skill_type(*skill_id).await?.is_none() {
                return Err(ServiceError::Validation(format!(
                    "Skill type {} does not exist",
                    skill_id
                )));
            }
        }

        Ok(skill_ids)
    }
}

fn username_taken(username: &str) -> String {
    format!("Username '{}' is already taken", username)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::service::testing::{new_account, Harness};

    #[tokio::test]
    async fn register_and_login_user() {
        let harness = Harness::new();
        let account = harness
            .accounts
            .register_user(new_account("asha", AccountRole::User))
            .await
            .unwrap();
        assert_eq!(account.role, AccountRole::User);
        assert_ne!(account.password, "secret-pass");

        let logged_in = harness
            .accounts
            .login("asha", "secret-pass", AccountRole::User)
            .await
            .unwrap();
        assert_eq!(logged_in.id, account.id);
    }

    #[tokio::test]
    async fn login_requires_matching_role() {
        let harness = Harness::new();
        harness
            .accounts
            .register_user(new_account("asha", AccountRole::User))
            .await
            .unwrap();

        let err = harness
            .accounts
            .login("asha", "secret-pass", AccountRole::Worker)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials(_)));

        let err = harness
            .accounts
            .login("asha", "wrong-pass", AccountRole::User)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials(_)));

        let err = harness
            .accounts
            .login("nobody", "secret-pass", AccountRole::User)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let harness = Harness::new();
        harness
            .accounts
            .register_user(new_account("asha", AccountRole::User))
            .await
            .unwrap();

        let err = harness
            .accounts
            .register_user(new_account("asha", AccountRole::User))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn worker_registration_checks_skills() {
        let harness = Harness::with_skill_limit(2);
        let plumbing = harness.skill("Plumbing").await;
        let painting = harness.skill("Painting").await;
        let wiring = harness.skill("Wiring").await;

        let err = harness
            .accounts
            .register_worker(new_account("ravi", AccountRole::Worker), NewWorkerProfile::default(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = harness
            .accounts
            .register_worker(
                new_account("ravi", AccountRole::Worker),
                NewWorkerProfile::default(),
                vec![plumbing.id, painting.id, wiring.id],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = harness
            .accounts
            .register_worker(
                new_account("ravi", AccountRole::Worker),
                NewWorkerProfile::default(),
                vec![404],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Duplicates collapse before the limit is checked
        let worker = harness
            .accounts
            .register_worker(
                new_account("ravi", AccountRole::Worker),
                NewWorkerProfile::default(),
                vec![plumbing.id, plumbing.id, painting.id],
            )
            .await
            .unwrap();
        assert_eq!(worker.account.role, AccountRole::Worker);
        assert_eq!(worker.skills.len(), 2);
        assert_eq!(worker.profile.available_status, AvailableStatus::Available);
    }

    #[tokio::test]
    async fn update_worker_replaces_skills() {
        let harness = Harness::new();
        let plumbing = harness.skill("Plumbing").await;
        let painting = harness.skill("Painting").await;
        let worker = harness.worker("ravi", &[plumbing.id]).await;

        let updated = harness
            .accounts
            .update_worker(
                worker.id,
                AccountUpdate {
                    phone_number1: Some("9876543210".to_string()),
                    ..AccountUpdate::default()
                },
                WorkerProfileUpdate {
                    experience_years: Some(7),
                    ..WorkerProfileUpdate::default()
                },
                Some(vec![painting.id]),
            )
            .await
            .unwrap();

        assert_eq!(updated.account.phone_number1.as_deref(), Some("9876543210"));
        assert_eq!(updated.profile.experience_years, 7);
        assert_eq!(updated.skills, vec![painting]);
    }

    #[tokio::test]
    async fn user_is_not_a_worker() {
        let harness = Harness::new();
        let user = harness.user("asha").await;

        let err = harness.accounts.get_worker(user.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::WorkerNotFound(id) if id == user.id));
    }

    #[tokio::test]
    async fn availability_must_be_ordered() {
        let harness = Harness::new();
        let plumbing = harness.skill("Plumbing").await;
        let worker = harness.worker("ravi", &[plumbing.id]).await;

        let saved = harness
            .accounts
            .add_availability(worker.id, AvailabilitySlots::default())
            .await
            .unwrap();
        assert_eq!(saved.morning_start, NaiveTime::from_hms_opt(9, 30, 0).unwrap());

        let err = harness
            .accounts
            .add_availability(
                worker.id,
                AvailabilitySlots {
                    afternoon_end: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
                    ..AvailabilitySlots::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let rows = harness.accounts.get_availability(worker.id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn delete_refused_while_request_accepted() {
        let harness = Harness::new();
        let plumbing = harness.skill("Plumbing").await;
        let user = harness.user("asha").await;
        let worker = harness.worker("ravi", &[plumbing.id]).await;
        let request = harness.request(user.id, plumbing.id).await;

        harness
            .work_requests
            .accept(worker.id, request.request_id, None)
            .await
            .unwrap();

        let err = harness
            .accounts
            .delete_account(worker.id, AccountRole::Worker)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        harness
            .work_requests
            .decline(worker.id, request.request_id)
            .await
            .unwrap();

        harness
            .accounts
            .delete_account(worker.id, AccountRole::Worker)
            .await
            .unwrap();
        assert!(matches!(
            harness.accounts.get_worker(worker.id).await,
            Err(ServiceError::WorkerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_with_wrong_role_is_not_found() {
        let harness = Harness::new();
        let user = harness.user("asha").await;

        let err = harness
            .accounts
            .delete_account(user.id, AccountRole::Worker)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::WorkerNotFound(_)));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let harness = Harness::new();
        let created = harness.accounts.ensure_admin("root", "admin-pass").await.unwrap();
        assert!(created.is_some());

        let again = harness.accounts.ensure_admin("root", "admin-pass").await.unwrap();
        assert!(again.is_none());

        let admin = harness
            .accounts
            .login("root", "admin-pass", AccountRole::Admin)
            .await
            .unwrap();
        assert_eq!(admin.role, AccountRole::Admin);
    }
}
