//! Platform registration tasks.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use billtrack_core::platform::{PlatformTask, PlatformTaskStatus};
use billtrack_core::store::{PlatformTaskRepository, StoreError};
use billtrack_shared::types::{InvoiceId, PlatformTaskId, UserId};

use crate::entities::platform_tasks;
use crate::store::{PgStore, db_err, parse_column, to_utc, update_err};

impl PlatformTaskRepository for PgStore {
    async fn insert_platform_tasks(
        &self,
        tasks: Vec<PlatformTask>,
    ) -> Result<Vec<PlatformTask>, StoreError> {
        if tasks.is_empty() {
            return Ok(tasks);
        }
        let models = tasks.iter().map(|task| to_model(task).into_active_model());
        platform_tasks::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(tasks)
    }

    async fn find_platform_task(&self, id: PlatformTaskId) -> Result<Option<PlatformTask>, StoreError> {
        platform_tasks::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(to_domain)
            .transpose()
    }

    async fn list_platform_tasks(&self, invoice_id: InvoiceId) -> Result<Vec<PlatformTask>, StoreError> {
        platform_tasks::Entity::find()
            .filter(platform_tasks::Column::InvoiceId.eq(invoice_id.into_inner()))
            .order_by_asc(platform_tasks::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn update_platform_task(&self, task: &PlatformTask) -> Result<PlatformTask, StoreError> {
        let model = platform_tasks::ActiveModel {
            id: Set(task.id.into_inner()),
            status: Set(task.status.as_str().to_string()),
            blocked_reason: Set(task.blocked_reason.clone()),
            completed_at: Set(task.completed_at.map(Into::into)),
            updated_at: Set(task.updated_at.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err("platform_task", task.id))?;

        to_domain(model)
    }
}

fn to_model(task: &PlatformTask) -> platform_tasks::Model {
    platform_tasks::Model {
        id: task.id.into_inner(),
        invoice_id: task.invoice_id.into_inner(),
        platform: task.platform.clone(),
        status: task.status.as_str().to_string(),
        blocked_reason: task.blocked_reason.clone(),
        completed_at: task.completed_at.map(Into::into),
        created_by: task.created_by.into_inner(),
        created_at: task.created_at.into(),
        updated_at: task.updated_at.into(),
    }
}

fn to_domain(model: platform_tasks::Model) -> Result<PlatformTask, StoreError> {
    Ok(PlatformTask {
        id: PlatformTaskId::from_uuid(model.id),
        invoice_id: InvoiceId::from_uuid(model.invoice_id),
        platform: model.platform,
        status: parse_column("platform task status", &model.status, PlatformTaskStatus::parse)?,
        blocked_reason: model.blocked_reason,
        completed_at: model.completed_at.map(to_utc),
        created_by: UserId::from_uuid(model.created_by),
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}
