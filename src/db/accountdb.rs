use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::{accountmodel::*, skillmodel::SkillType};

#[async_trait]
pub trait AccountExt {
    async fn get_account(
        &self,
        account_id: Option<i64>,
        username: Option<&str>,
    ) -> Result<Option<Account>, Error>;

    async fn get_accounts_by_role(&self, role: AccountRole) -> Result<Vec<Account>, Error>;

    async fn save_account(&self, new_account: NewAccount) -> Result<Account, Error>;

    /// Creates the account, its worker profile and skill links atomically.
    async fn save_worker(
        &self,
        new_account: NewAccount,
        profile: NewWorkerProfile,
        skill_ids: &[i64],
    ) -> Result<(Account, WorkerProfile), Error>;

    async fn update_account(
        &self,
        account_id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>, Error>;

    async fn get_worker_profile(&self, worker_id: i64) -> Result<Option<WorkerProfile>, Error>;

    /// Applies the profile update and, when `skill_ids` is given, replaces the
    /// worker's skill set in the same transaction.
    async fn update_worker_profile(
        &self,
        worker_id: i64,
        update: WorkerProfileUpdate,
        skill_ids: Option<&[i64]>,
    ) -> Result<Option<WorkerProfile>, Error>;

    async fn update_worker_status(
        &self,
        worker_id: i64,
        status: AvailableStatus,
    ) -> Result<Option<WorkerProfile>, Error>;

    async fn get_worker_skills(&self, worker_id: i64) -> Result<Vec<SkillType>, Error>;

    async fn save_worker_availability(
        &self,
        worker_id: i64,
        slots: AvailabilitySlots,
    ) -> Result<WorkerAvailability, Error>;

    async fn get_worker_availability(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerAvailability>, Error>;

    /// Removes the account along with every work request it owns or is
    /// assigned to. Returns false when no such account exists.
    async fn delete_account(&self, account_id: i64) -> Result<bool, Error>;
}

#[async_trait]
impl AccountExt for DBClient {
    async fn get_account(
        &self,
        account_id: Option<i64>,
        username: Option<&str>,
    ) -> Result<Option<Account>, Error> {
        let mut account: Option<Account> = None;

        if let Some(account_id) = account_id {
            account = sqlx::query_as::<_, Account>(r#"SELECT * FROM accounts WHERE id = $1"#)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        } else if let Some(username) = username {
            account =
                sqlx::query_as::<_, Account>(r#"SELECT * FROM accounts WHERE username = $1"#)
                    .bind(username)
                    .fetch_optional(&self.pool)
                    .await?;
        }

        Ok(account)
    }

    async fn get_accounts_by_role(&self, role: AccountRole) -> Result<Vec<Account>, Error> {
        sqlx::query_as::<_, Account>(
            r#"SELECT * FROM accounts WHERE role = $1 ORDER BY created_at DESC, id DESC"#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts
            (username, password, role, first_name, last_name, email, phone_number1, phone_number2)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_account.username)
        .bind(new_account.password)
        .bind(new_account.role)
        .bind(new_account.first_name)
        .bind(new_account.last_name)
        .bind(new_account.email)
        .bind(new_account.phone_number1)
        .bind(new_account.phone_number2)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_worker(
        &self,
        new_account: NewAccount,
        profile: NewWorkerProfile,
        skill_ids: &[i64],
    ) -> Result<(Account, WorkerProfile), Error> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts
            (username, password, role, first_name, last_name, email, phone_number1, phone_number2)
            VALUES ($1, $2, 'worker', $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new_account.username)
        .bind(new_account.password)
        .bind(new_account.first_name)
        .bind(new_account.last_name)
        .bind(new_account.email)
        .bind(new_account.phone_number1)
        .bind(new_account.phone_number2)
        .fetch_one(&mut *tx)
        .await?;

        let worker_profile = sqlx::query_as::<_, WorkerProfile>(
            r#"
            INSERT INTO worker_profiles
            (worker_id, address, city, pincode, door_no, street_name, area, experience_years)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(profile.address)
        .bind(profile.city)
        .bind(profile.pincode)
        .bind(profile.door_no)
        .bind(profile.street_name)
        .bind(profile.area)
        .bind(profile.experience_years)
        .fetch_one(&mut *tx)
        .await?;

        for skill_id in skill_ids {
            sqlx::query(r#"INSERT INTO worker_skills (worker_id, skill_type_id) VALUES ($1, $2)"#)
                .bind(account.id)
                .bind(skill_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok((account, worker_profile))
    }

    async fn update_account(
        &self,
        account_id: i64,
        update: AccountUpdate,
    ) -> Result<Option<Account>, Error> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone_number1 = COALESCE($5, phone_number1),
                phone_number2 = COALESCE($6, phone_number2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.email)
        .bind(update.phone_number1)
        .bind(update.phone_number2)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_profile(&self, worker_id: i64) -> Result<Option<WorkerProfile>, Error> {
        sqlx::query_as::<_, WorkerProfile>(
            r#"SELECT * FROM worker_profiles WHERE worker_id = $1"#,
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_worker_profile(
        &self,
        worker_id: i64,
        update: WorkerProfileUpdate,
        skill_ids: Option<&[i64]>,
    ) -> Result<Option<WorkerProfile>, Error> {
        let mut tx = self.pool.begin().await?;

        let profile = sqlx::query_as::<_, WorkerProfile>(
            r#"
            UPDATE worker_profiles
            SET address = COALESCE($2, address),
                city = COALESCE($3, city),
                pincode = COALESCE($4, pincode),
                door_no = COALESCE($5, door_no),
                street_name = COALESCE($6, street_name),
                area = COALESCE($7, area),
                experience_years = COALESCE($8, experience_years),
                updated_at = NOW()
            WHERE worker_id = $1
            RETURNING *
            "#,
        )
        .bind(worker_id)
        .bind(update.address)
        .bind(update.city)
        .bind(update.pincode)
        .bind(update.door_no)
        .bind(update.street_name)
        .bind(update.area)
        .bind(update.experience_years)
        .fetch_optional(&mut *tx)
        .await?;

        if profile.is_none() {
            return Ok(None);
        }

        if let Some(skill_ids) = skill_ids {
            sqlx::query(r#"DELETE FROM worker_skills WHERE worker_id = $1"#)
                .bind(worker_id)
                .execute(&mut *tx)
                .await?;

            for skill_id in skill_ids {
                sqlx::query(
                    r#"INSERT INTO worker_skills (worker_id, skill_type_id) VALUES ($1, $2)"#,
                )
                .bind(worker_id)
                .bind(skill_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(profile)
    }

    async fn update_worker_status(
        &self,
        worker_id: i64,
        status: AvailableStatus,
    ) -> Result<Option<WorkerProfile>, Error> {
        sqlx::query_as::<_, WorkerProfile>(
            r#"
            UPDATE worker_profiles
            SET available_status = $2, updated_at = NOW()
            WHERE worker_id = $1
            RETURNING *
            "#,
        )
        .bind(worker_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_worker_skills(&self, worker_id: i64) -> Result<Vec<SkillType>, Error> {
        sqlx::query_as::<_, SkillType>(
            r#"
            SELECT st.id, st.name
            FROM worker_skills ws
            JOIN skill_types st ON st.id = ws.skill_type_id
            WHERE ws.worker_id = $1
            ORDER BY st.name
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_worker_availability(
        &self,
        worker_id: i64,
        slots: AvailabilitySlots,
    ) -> Result<WorkerAvailability, Error> {
        sqlx::query_as::<_, WorkerAvailability>(
            r#"
            INSERT INTO worker_availability
            (worker_id, morning_start, morning_end, afternoon_start, afternoon_end)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(worker_id)
        .bind(slots.morning_start)
        .bind(slots.morning_end)
        .bind(slots.afternoon_start)
        .bind(slots.afternoon_end)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_worker_availability(
        &self,
        worker_id: i64,
    ) -> Result<Vec<WorkerAvailability>, Error> {
        sqlx::query_as::<_, WorkerAvailability>(
            r#"
            SELECT * FROM worker_availability
            WHERE worker_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_account(&self, account_id: i64) -> Result<bool, Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"DELETE FROM work_requests WHERE user_id = $1 OR worker_id = $1"#)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query(r#"DELETE FROM accounts WHERE id = $1"#)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(deleted.rows_affected() > 0)
    }
}
