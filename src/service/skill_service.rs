use std::sync::Arc;

use crate::{
    db::{skilldb::SkillExt, Store},
    models::skillmodel::SkillType,
    service::error::ServiceError,
};

#[derive(Debug)]
pub struct SkillService<D> {
    db_client: Arc<D>,
}

impl<D: Store> SkillService<D> {
    pub fn new(db_client: Arc<D>) -> Self {
        Self { db_client }
    }

    pub async fn list(&self) -> Result<Vec<SkillType>, ServiceError> {
        Ok(self.db_client.get_skill_types().await?)
    }

    pub async fn get(&self, skill_type_id: i64) -> Result<SkillType, ServiceError> {
        self.db_client
            .get_skill_type(skill_type_id)
            .await?
            .ok_or(ServiceError::SkillTypeNotFound(skill_type_id))
    }

    pub async fn create(&self, name: &str) -> Result<SkillType, ServiceError> {
        let name = normalize_name(name)?;
        self.ensure_name_free(&name, None).await?;

        let skill = self
            .db_client
            .save_skill_type(&name)
            .await
            .map_err(|e| ServiceError::from_constraint(e, name_taken(&name)))?;

        tracing::info!("created skill type {} ({})", skill.name, skill.id);
        Ok(skill)
    }

    pub async fn rename(&self, skill_type_id: i64, name: &str) -> Result<SkillType, ServiceError> {
        let name = normalize_name(name)?;
        self.get(skill_type_id).await?;
        self.ensure_name_free(&name, Some(skill_type_id)).await?;

        self.db_client
            .rename_skill_type(skill_type_id, &name)
            .await
            .map_err(|e| ServiceError::from_constraint(e, name_taken(&name)))?
            .ok_or(ServiceError::SkillTypeNotFound(skill_type_id))
    }

    /// Refuses to delete a skill still held by a worker or named by a request.
    pub async fn delete(&self, skill_type_id: i64) -> Result<(), ServiceError> {
        self.get(skill_type_id).await?;

        let references = self.db_client.count_skill_references(skill_type_id).await?;
        if references > 0 {
            return Err(ServiceError::Conflict(format!(
                "Skill type {} is still referenced by workers or work requests",
                skill_type_id
            )));
        }

        let deleted = self
            .db_client
            .delete_skill_type(skill_type_id)
            .await
            .map_err(|e| {
                ServiceError::from_constraint(
                    e,
                    format!("Skill type {} is still in use", skill_type_id),
                )
            })?;

        if !deleted {
            return Err(ServiceError::SkillTypeNotFound(skill_type_id));
        }

        tracing::info!("deleted skill type {}", skill_type_id);
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i64>) -> Result<(), ServiceError> {
        match self.db_client.get_skill_type_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(ServiceError::Conflict(name_taken(name)))
            }
            _ => Ok(()),
        }
    }
}

fn normalize_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Skill name is required".to_string()));
    }
    Ok(name.to_string())
}

fn name_taken(name: &str) -> String {
    format!("Skill type '{}' already exists", name)
}
