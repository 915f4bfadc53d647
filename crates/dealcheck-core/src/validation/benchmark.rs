//! Benchmark comparison
//!
//! Display table comparing extracted terms against market standards. It is
//! computed independently of the scoring rules and keeps its own wording, so
//! a row may read "compliant" where a scored finding warns (currency).

use crate::config::RuleConfig;
use crate::error::Result;
use crate::types::{BenchmarkEntry, ComplianceStatus, FieldName, FieldRecord};
use crate::validation::rules::parse_date;

fn entry(
    field: &str,
    standard: &str,
    extracted: String,
    status: ComplianceStatus,
    description: &str,
) -> BenchmarkEntry {
    BenchmarkEntry {
        field: field.to_string(),
        standard: standard.to_string(),
        extracted,
        status,
        description: description.to_string(),
    }
}

/// Build the benchmark table for a record
pub fn compare(record: &FieldRecord, config: &RuleConfig) -> Result<Vec<BenchmarkEntry>> {
    let mut rows = Vec::with_capacity(4);

    let rate = record.get(FieldName::InterestRate);
    rows.push(entry(
        "Interest Rate Specification",
        "Required (ISDA 2002)",
        rate.map_or_else(|| "Missing".to_string(), |r| format!("{r}% (Compliant)")),
        if rate.is_some() {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::Violation
        },
        "All derivative contracts must specify interest rate terms",
    ));

    let termination = record.get(FieldName::TerminationClause);
    rows.push(entry(
        "Termination Clause",
        "30 days notice",
        termination.map_or_else(|| "Missing".to_string(), |t| format!("{t} (Compliant)")),
        if termination.is_some() {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::Warning
        },
        "Standard market practice requires termination provisions",
    ));

    let currency = record.get(FieldName::Currency);
    rows.push(entry(
        "Currency Denomination",
        "ISO 4217 format",
        currency.map_or_else(|| "Missing".to_string(), |c| format!("{c} (Compliant)")),
        if currency.is_some() {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::Violation
        },
        "Currency code follows international standards",
    ));

    if let (Some(trade), Some(settlement)) = (
        record.get(FieldName::TradeDate),
        record.get(FieldName::SettlementDate),
    ) {
        let trade_date = parse_date(FieldName::TradeDate, trade)?;
        let settlement_date = parse_date(FieldName::SettlementDate, settlement)?;
        let days = (settlement_date - trade_date).num_days();
        let standard = days == config.standard_settlement_days;

        rows.push(entry(
            "Settlement Period",
            &format!("T+{} (Standard)", config.standard_settlement_days),
            format!(
                "T+{days} ({})",
                if standard { "Compliant" } else { "Non-standard" }
            ),
            if standard {
                ComplianceStatus::Compliant
            } else {
                ComplianceStatus::Warning
            },
            "Settlement timing aligns with market conventions",
        ));
    }

    Ok(rows)
}
