use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::skillmodel::SkillType;

#[async_trait]
pub trait SkillExt {
    async fn get_skill_types(&self) -> Result<Vec<SkillType>, Error>;

    async fn get_skill_type(&self, skill_type_id: i64) -> Result<Option<SkillType>, Error>;

    async fn get_skill_type_by_name(&self, name: &str) -> Result<Option<SkillType>, Error>;

    async fn save_skill_type(&self, name: &str) -> Result<SkillType, Error>;

    async fn rename_skill_type(
        &self,
        skill_type_id: i64,
        name: &str,
    ) -> Result<Option<SkillType>, Error>;

    async fn delete_skill_type(&self, skill_type_id: i64) -> Result<bool, Error>;

    /// Number of worker skill links plus work requests pointing at the skill.
    async fn count_skill_references(&self, skill_type_id: i64) -> Result<i64, Error>;
}

#[async_trait]
impl SkillExt for DBClient {
    async fn get_skill_types(&self) -> Result<Vec<SkillType>, Error> {
        sqlx::query_as::<_, SkillType>(r#"SELECT id, name FROM skill_types ORDER BY name"#)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_skill_type(&self, skill_type_id: i64) -> Result<Option<SkillType>, Error> {
        sqlx::query_as::<_, SkillType>(r#"SELECT id, name FROM skill_types WHERE id = $1"#)
            .bind(skill_type_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_skill_type_by_name(&self, name: &str) -> Result<Option<SkillType>, Error> {
        sqlx::query_as::<_, SkillType>(
            r#"SELECT id, name FROM skill_types WHERE LOWER(name) = LOWER($1)"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_skill_type(&self, name: &str) -> Result<SkillType, Error> {
        sqlx::query_as::<_, SkillType>(
            r#"INSERT INTO skill_types (name) VALUES ($1) RETURNING id, name"#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    async fn rename_skill_type(
        &self,
        skill_type_id: i64,
        name: &str,
    ) -> Result<Option<SkillType>, Error> {
        sqlx::query_as::<_, SkillType>(
            r#"UPDATE skill_types SET name = $2 WHERE id = $1 RETURNING id, name"#,
        )
        .bind(skill_type_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_skill_type(&self, skill_type_id: i64) -> Result<bool, Error> {
        let result = sqlx::query(r#"DELETE FROM skill_types WHERE id = $1"#)
            .bind(skill_type_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_skill_references(&self, skill_type_id: i64) -> Result<i64, Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM worker_skills WHERE skill_type_id = $1)
                + (SELECT COUNT(*) FROM work_requests WHERE skill_type_id = $1)
            "#,
        )
        .bind(skill_type_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
