//! Billing pipeline schema.
//!
//! Creates the compliance directories, intake ledger, billing batches, client
//! invoices and their platform tasks and collection claims. Statuses are TEXT
//! columns constrained to the values the core parses.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: COMPLIANCE DIRECTORIES
        // ============================================================
        db.execute_unprepared(JOBS_SQL).await?;
        db.execute_unprepared(VENDORS_SQL).await?;

        // ============================================================
        // PART 2: INTAKE LEDGER
        // ============================================================
        db.execute_unprepared(INTAKE_ITEMS_SQL).await?;
        db.execute_unprepared(SAP_POSTINGS_SQL).await?;

        // ============================================================
        // PART 3: BATCHING & INVOICING
        // ============================================================
        db.execute_unprepared(BILLING_BATCHES_SQL).await?;
        db.execute_unprepared(CLIENT_INVOICES_SQL).await?;

        // ============================================================
        // PART 4: AFTER DELIVERY
        // ============================================================
        db.execute_unprepared(PLATFORM_TASKS_SQL).await?;
        db.execute_unprepared(COLLECTION_CLAIMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const JOBS_SQL: &str = r"
CREATE TABLE jobs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    client_name VARCHAR(255) NOT NULL,
    client_country CHAR(2),
    uttai_status VARCHAR(20) NOT NULL DEFAULT 'clear',
    CONSTRAINT chk_jobs_uttai CHECK (uttai_status IN ('clear', 'blocked', 'pending_review'))
);
";

const VENDORS_SQL: &str = r"
CREATE TABLE vendors (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    compliance_status VARCHAR(20) NOT NULL DEFAULT 'compliant',
    CONSTRAINT chk_vendors_compliance
        CHECK (compliance_status IN ('compliant', 'expiring_soon', 'non_compliant'))
);
";

const INTAKE_ITEMS_SQL: &str = r"
CREATE TABLE intake_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    item_type VARCHAR(20) NOT NULL,
    job_id UUID REFERENCES jobs(id),
    vendor_id UUID REFERENCES vendors(id),
    invoice_number VARCHAR(100),
    concept TEXT,
    organism VARCHAR(255),
    tariff VARCHAR(100),
    currency CHAR(3) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    exchange_rate_to_eur NUMERIC(18, 6) NOT NULL,
    amount_eur NUMERIC(19, 2) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    file_path TEXT,
    uttai_status_snapshot VARCHAR(20),
    vendor_compliance_snapshot VARCHAR(20),
    rejection_reason TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_intake_type CHECK (item_type IN ('vendor_invoice', 'official_fee')),
    CONSTRAINT chk_intake_status CHECK (status IN (
        'draft', 'submitted', 'approved', 'rejected', 'sent_to_accounting',
        'posted', 'ready_to_bill', 'billed', 'archived'
    )),
    CONSTRAINT chk_intake_amount CHECK (amount > 0),
    CONSTRAINT chk_intake_rate CHECK (exchange_rate_to_eur > 0)
);

-- Advisory duplicate lookup (vendor, number, amount)
CREATE INDEX idx_intake_duplicate ON intake_items(vendor_id, invoice_number, amount)
    WHERE invoice_number IS NOT NULL;

CREATE INDEX idx_intake_job ON intake_items(job_id, status);
";

const SAP_POSTINGS_SQL: &str = r"
CREATE TABLE sap_postings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    intake_item_id UUID NOT NULL REFERENCES intake_items(id) ON DELETE CASCADE,
    sap_reference VARCHAR(100) NOT NULL,
    posted_by UUID NOT NULL,
    posted_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_sap_postings_item ON sap_postings(intake_item_id, posted_at);
";

const BILLING_BATCHES_SQL: &str = r"
CREATE TABLE billing_batches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id UUID NOT NULL REFERENCES jobs(id),
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    uttai_subject_obliged BOOLEAN NOT NULL DEFAULT FALSE,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_batch_status CHECK (status IN ('draft', 'invoiced'))
);

CREATE TABLE billing_batch_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    batch_id UUID NOT NULL REFERENCES billing_batches(id) ON DELETE CASCADE,
    intake_item_id UUID NOT NULL REFERENCES intake_items(id),
    attach_fee BOOLEAN NOT NULL DEFAULT FALSE,
    decision VARCHAR(20),
    CONSTRAINT chk_batch_item_decision
        CHECK (decision IS NULL OR decision IN ('emit', 'transfer', 'discard')),
    CONSTRAINT uq_batch_item UNIQUE (batch_id, intake_item_id)
);
";

const CLIENT_INVOICES_SQL: &str = r"
CREATE TABLE client_invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    batch_id UUID NOT NULL REFERENCES billing_batches(id),
    status VARCHAR(30) NOT NULL DEFAULT 'invoice_draft',
    sap_invoice_number VARCHAR(100),
    sap_invoice_date DATE,
    pdf_file_path TEXT,
    sap_payload JSONB,
    due_date DATE,
    amount_due_eur NUMERIC(19, 2),
    collection_status VARCHAR(20) NOT NULL DEFAULT 'pending',
    amount_paid_eur NUMERIC(19, 2) NOT NULL DEFAULT 0,
    paid_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoice_status CHECK (status IN (
        'invoice_draft', 'pending_partner_approval', 'ready_for_sap', 'issued',
        'delivered', 'platform_required', 'platform_completed'
    )),
    CONSTRAINT chk_invoice_collection CHECK (collection_status IN ('pending', 'paid')),
    CONSTRAINT chk_invoice_paid CHECK (amount_paid_eur >= 0)
);

CREATE INDEX idx_invoices_status ON client_invoices(status, created_at);
";

const PLATFORM_TASKS_SQL: &str = r"
CREATE TABLE platform_tasks (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES client_invoices(id) ON DELETE CASCADE,
    platform VARCHAR(100) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'pending',
    blocked_reason TEXT,
    completed_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_platform_status
        CHECK (status IN ('pending', 'in_progress', 'completed', 'blocked'))
);

CREATE INDEX idx_platform_tasks_invoice ON platform_tasks(invoice_id, created_at);
";

const COLLECTION_CLAIMS_SQL: &str = r"
CREATE TABLE collection_claims (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_id UUID NOT NULL REFERENCES client_invoices(id) ON DELETE CASCADE,
    to_recipients JSONB NOT NULL,
    cc_recipients JSONB NOT NULL DEFAULT '[]',
    responsible_recipients JSONB NOT NULL DEFAULT '[]',
    body TEXT NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'pending_approval',
    rejection_reason TEXT,
    created_by UUID NOT NULL,
    reviewed_by UUID,
    sent_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_claim_status
        CHECK (status IN ('pending_approval', 'approved', 'rejected', 'sent')),
    CONSTRAINT chk_claim_to CHECK (jsonb_array_length(to_recipients) > 0)
);

CREATE INDEX idx_claims_invoice ON collection_claims(invoice_id, created_at);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS collection_claims CASCADE;
DROP TABLE IF EXISTS platform_tasks CASCADE;
DROP TABLE IF EXISTS client_invoices CASCADE;
DROP TABLE IF EXISTS billing_batch_items CASCADE;
DROP TABLE IF EXISTS billing_batches CASCADE;
DROP TABLE IF EXISTS sap_postings CASCADE;
DROP TABLE IF EXISTS intake_items CASCADE;
DROP TABLE IF EXISTS vendors CASCADE;
DROP TABLE IF EXISTS jobs CASCADE;
";
