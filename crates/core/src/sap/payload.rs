//! Audit payload builder and reader.

use std::collections::HashMap;
use std::str::FromStr;

use billtrack_shared::types::IntakeItemId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::batch::BillingBatchItem;
use crate::currency::{CurrencyResolver, round_money};
use crate::intake::{IntakeItem, IntakeType};

/// FX trail of one billed intake item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxAuditLine {
    /// Intake item.
    pub intake_item_id: IntakeItemId,
    /// Original currency.
    pub currency: String,
    /// Amount in the original currency.
    pub amount: Decimal,
    /// Rate applied; `None` when no usable rate was found.
    pub exchange_rate_to_eur: Option<Decimal>,
    /// Converted amount; `None` when no usable rate was found.
    pub amount_eur: Option<Decimal>,
}

/// FX audit section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxAudit {
    /// When the payload was built.
    pub generated_at: DateTime<Utc>,
    /// Sum of the converted line amounts, rounded to 2 decimals.
    pub total_amount_eur: Decimal,
    /// Lines that could not be converted.
    pub missing_rates_count: u32,
    /// One line per billed intake item.
    pub lines: Vec<FxAuditLine>,
}

/// Official fee document attached to the client invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAttachment {
    /// Intake item the document belongs to.
    pub intake_item_id: IntakeItemId,
    /// Stored document path.
    pub file_path: String,
    /// Fee receipt number, if any.
    pub reference: Option<String>,
}

/// Attachment problems found while building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentWarnings {
    /// Fees flagged for attachment without a stored document.
    pub missing_files_count: u32,
}

/// Audit payload stored on the client invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SapPayload {
    /// Documents attached automatically.
    pub auto_attachments: Vec<AutoAttachment>,
    /// FX trail.
    pub fx_audit: FxAudit,
    /// Attachment problems.
    pub attachment_warnings: AttachmentWarnings,
}

impl SapPayload {
    /// Serializes the payload for storage on the invoice.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Human-readable warnings for the operator; empty when nothing degraded.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.fx_audit.missing_rates_count > 0 {
            warnings.push(format!(
                "{} line(s) have no usable exchange rate and are excluded from the total",
                self.fx_audit.missing_rates_count
            ));
        }
        if self.attachment_warnings.missing_files_count > 0 {
            warnings.push(format!(
                "{} official fee(s) flagged for attachment have no stored document",
                self.attachment_warnings.missing_files_count
            ));
        }
        warnings
    }
}

/// Builds [`SapPayload`]s from a batch's items.
#[derive(Debug, Clone)]
pub struct SapPayloadBuilder {
    resolver: CurrencyResolver,
}

impl SapPayloadBuilder {
    /// Creates a builder that converts into the resolver's reporting currency.
    #[must_use]
    pub fn new(resolver: CurrencyResolver) -> Self {
        Self { resolver }
    }

    /// Builds the payload.
    ///
    /// Discarded batch items are skipped entirely. Every other item is
    /// re-resolved from its currency, amount and declared rate rather than
    /// trusting the stored `amount_eur`. A batch item whose intake record is
    /// missing from `intake_items`, or whose amount would overflow the
    /// total, counts as a missing rate.
    #[must_use]
    pub fn build(
        &self,
        batch_items: &[BillingBatchItem],
        intake_items: &[IntakeItem],
        generated_at: DateTime<Utc>,
    ) -> SapPayload {
        let by_id: HashMap<IntakeItemId, &IntakeItem> =
            intake_items.iter().map(|item| (item.id, item)).collect();

        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;
        let mut missing_rates_count = 0u32;
        let mut auto_attachments = Vec::new();
        let mut missing_files_count = 0u32;

        for batch_item in batch_items.iter().filter(|item| !item.is_discarded()) {
            let Some(item) = by_id.get(&batch_item.intake_item_id) else {
                warn!(intake_item_id = %batch_item.intake_item_id, "Batch item without intake record");
                missing_rates_count += 1;
                continue;
            };

            let resolved = match self
                .resolver
                .resolve(&item.currency, item.amount, Some(item.exchange_rate_to_eur))
            {
                Ok(fx) => match total.checked_add(fx.amount_eur) {
                    Some(sum) => {
                        total = sum;
                        Some(fx)
                    }
                    None => {
                        warn!(intake_item_id = %item.id, amount_eur = %fx.amount_eur, "FX line overflows the payload total");
                        None
                    }
                },
                Err(err) => {
                    warn!(intake_item_id = %item.id, error = %err, "FX line could not be resolved");
                    None
                }
            };
            if resolved.is_none() {
                missing_rates_count += 1;
            }
            lines.push(FxAuditLine {
                intake_item_id: item.id,
                currency: item.currency.clone(),
                amount: item.amount,
                exchange_rate_to_eur: resolved.as_ref().map(|fx| fx.exchange_rate_to_eur),
                amount_eur: resolved.as_ref().map(|fx| fx.amount_eur),
            });

            if item.item_type == IntakeType::OfficialFee && batch_item.attach_fee {
                match &item.file_path {
                    Some(path) => auto_attachments.push(AutoAttachment {
                        intake_item_id: item.id,
                        file_path: path.clone(),
                        reference: item.invoice_number.clone(),
                    }),
                    None => missing_files_count += 1,
                }
            }
        }

        SapPayload {
            auto_attachments,
            fx_audit: FxAudit {
                generated_at,
                total_amount_eur: round_money(total),
                missing_rates_count,
                lines,
            },
            attachment_warnings: AttachmentWarnings {
                missing_files_count,
            },
        }
    }
}

/// Totals read back from a stored payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayloadSummary {
    /// Declared total, if present and readable.
    pub total_amount_eur: Option<Decimal>,
    /// Declared missing-rate count; 0 when absent.
    pub missing_rates_count: u32,
}

impl PayloadSummary {
    /// Reads the totals from a stored payload.
    ///
    /// Any absent or malformed field reads as `{None, 0}`; this never fails.
    #[must_use]
    pub fn from_value(payload: Option<&Value>) -> Self {
        let Some(fx_audit) = payload.and_then(|p| p.get("fx_audit")) else {
            return Self::default();
        };

        let total_amount_eur = fx_audit.get("total_amount_eur").and_then(decimal_from_json);
        let missing_rates_count = fx_audit
            .get("missing_rates_count")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);

        Self {
            total_amount_eur,
            missing_rates_count,
        }
    }
}

/// Reads a decimal stored either as a JSON string or a JSON number.
fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        _ => None,
    }
}
