//! Job and vendor lookups.

use sea_orm::EntityTrait;

use billtrack_core::compliance::{Job, UttaiStatus, Vendor, VendorCompliance};
use billtrack_core::store::{JobDirectory, StoreError, VendorDirectory};
use billtrack_shared::types::{JobId, VendorId};

use crate::entities::{jobs, vendors};
use crate::store::{PgStore, db_err, parse_column};

impl JobDirectory for PgStore {
    async fn find_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        jobs::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(job_to_domain)
            .transpose()
    }
}

impl VendorDirectory for PgStore {
    async fn find_vendor(&self, id: VendorId) -> Result<Option<Vendor>, StoreError> {
        vendors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(vendor_to_domain)
            .transpose()
    }
}

fn job_to_domain(model: jobs::Model) -> Result<Job, StoreError> {
    Ok(Job {
        id: JobId::from_uuid(model.id),
        uttai_status: parse_column("uttai_status", &model.uttai_status, UttaiStatus::parse)?,
        code: model.code,
        client_name: model.client_name,
        client_country: model.client_country,
    })
}

fn vendor_to_domain(model: vendors::Model) -> Result<Vendor, StoreError> {
    Ok(Vendor {
        id: VendorId::from_uuid(model.id),
        compliance_status: parse_column(
            "compliance_status",
            &model.compliance_status,
            VendorCompliance::parse,
        )?,
        name: model.name,
    })
}
