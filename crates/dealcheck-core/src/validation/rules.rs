//! Rule checks
//!
//! Each check inspects one aspect of a [`FieldRecord`] and returns its
//! findings together with the score delta it contributes. Checks are
//! independent of each other; the engine runs them in a fixed order.

use chrono::NaiveDate;

use crate::config::RuleConfig;
use crate::error::{CoreError, Result};
use crate::types::{AiExplanation, FieldName, FieldRecord, Finding, FindingStatus, Severity};

pub const MISSING_INTEREST_RATE_DELTA: i32 = 30;
pub const MISSING_CRITICAL_FIELD_DELTA: i32 = 20;
pub const DATE_SEQUENCE_DELTA: i32 = 25;
pub const NON_STANDARD_CURRENCY_DELTA: i32 = 15;
pub const SANCTIONS_HIT_DELTA: i32 = 50;
pub const NON_BANK_COUNTERPARTY_DELTA: i32 = 10;
pub const INVALID_NOTIONAL_DELTA: i32 = 20;
pub const LARGE_NOTIONAL_DELTA: i32 = 15;
pub const EXTENDED_SETTLEMENT_DELTA: i32 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Findings and score contribution of one check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub findings: Vec<Finding>,
    pub delta: i32,
    pub explanations: Vec<(FieldName, AiExplanation)>,
}

impl RuleOutcome {
    fn push(&mut self, finding: Finding, delta: i32) {
        self.findings.push(finding);
        self.delta += delta;
    }

    fn single(finding: Finding, delta: i32) -> Self {
        let mut outcome = Self::default();
        outcome.push(finding, delta);
        outcome
    }
}

/// Parse an ISO `YYYY-MM-DD` field value
pub(crate) fn parse_date(field: FieldName, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| CoreError::malformed(field, value, e))
}

/// Render a whole amount with thousands separators
pub(crate) fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rendered = format!("{:.0}", value.abs());

    let mut grouped = String::with_capacity(rendered.len() + rendered.len() / 3);
    for (i, ch) in rendered.chars().enumerate() {
        if i > 0 && (rendered.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value.is_sign_negative() && rendered != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Critical fields must be present; a missing interest rate weighs most
pub fn check_critical_fields(record: &FieldRecord, config: &RuleConfig) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    for &field in &config.critical_fields {
        let label = field.label();
        let is_rate = field == FieldName::InterestRate;

        match record.get(field) {
            None => {
                let (severity, delta, standard) = if is_rate {
                    (Severity::High, MISSING_INTEREST_RATE_DELTA, "Required")
                } else {
                    (Severity::Medium, MISSING_CRITICAL_FIELD_DELTA, "Present")
                };
                outcome.push(
                    Finding::new(label.as_str(), FindingStatus::Error, severity)
                        .explanation(format!(
                            "Missing {} - critical for risk assessment",
                            field.prose()
                        ))
                        .confidence(0.95)
                        .standard(standard)
                        .snippet(format!("\"{label}: [MISSING]\" - Field not found in document")),
                    delta,
                );

                if is_rate {
                    outcome.explanations.push((field, missing_rate_explanation()));
                }
            }
            Some(value) => outcome.push(
                Finding::new(label.as_str(), FindingStatus::Valid, Severity::Low)
                    .explanation(format!("{label} properly specified"))
                    .confidence(0.98)
                    .standard("Present")
                    .snippet(format!("\"{label}: {value}\" - Successfully extracted")),
                0,
            ),
        }
    }

    outcome
}

fn missing_rate_explanation() -> AiExplanation {
    AiExplanation {
        reasoning: "Interest rate is fundamental for derivative pricing and risk calculation. \
                    Without it, the deal cannot be properly valued or hedged."
            .to_string(),
        regulation: "ISDA Master Agreement Section 4.3 requires explicit rate specification"
            .to_string(),
        recommendation: "Contact counterparty to confirm rate terms before proceeding".to_string(),
    }
}

/// Trade date must precede maturity date
pub fn check_date_consistency(record: &FieldRecord) -> Result<RuleOutcome> {
    let (Some(trade), Some(maturity)) = (
        record.get(FieldName::TradeDate),
        record.get(FieldName::MaturityDate),
    ) else {
        return Ok(RuleOutcome::default());
    };

    let trade_date = parse_date(FieldName::TradeDate, trade)?;
    let maturity_date = parse_date(FieldName::MaturityDate, maturity)?;
    let dates = format!("\"Trade Date: {trade}, Maturity Date: {maturity}\"");

    let outcome = if trade_date >= maturity_date {
        RuleOutcome::single(
            Finding::new("Date Consistency", FindingStatus::Error, Severity::High)
                .explanation("Trade date must be before maturity date")
                .confidence(0.99)
                .standard("Trade < Maturity")
                .snippet(format!("{dates} - Invalid sequence")),
            DATE_SEQUENCE_DELTA,
        )
    } else {
        RuleOutcome::single(
            Finding::new("Date Consistency", FindingStatus::Valid, Severity::Low)
                .explanation("Trade and maturity dates are consistent")
                .confidence(0.99)
                .standard("Trade < Maturity")
                .snippet(format!("{dates} - Valid sequence")),
            0,
        )
    };

    Ok(outcome)
}

/// Currency must be on the allow-list
pub fn check_currency(record: &FieldRecord, config: &RuleConfig) -> RuleOutcome {
    let Some(currency) = record.get(FieldName::Currency) else {
        return RuleOutcome::default();
    };

    if config.is_valid_currency(currency) {
        RuleOutcome::single(
            Finding::new("Currency", FindingStatus::Valid, Severity::Low)
                .explanation("Currency code follows ISO 4217 standard")
                .confidence(0.99)
                .standard("ISO 4217")
                .snippet(format!("\"Currency: {currency}\" - Valid ISO code")),
            0,
        )
    } else {
        RuleOutcome::single(
            Finding::new("Currency", FindingStatus::Warning, Severity::Medium)
                .explanation("Non-standard currency code detected")
                .confidence(0.85)
                .standard("ISO 4217")
                .snippet(format!("\"Currency: {currency}\" - Non-standard code")),
            NON_STANDARD_CURRENCY_DELTA,
        )
    }
}

/// Screen the counterparty against the watchlist, then by entity type
pub fn check_counterparty(record: &FieldRecord, config: &RuleConfig) -> RuleOutcome {
    let Some(counterparty) = record.get(FieldName::Counterparty) else {
        return RuleOutcome::default();
    };
    let quoted = format!("\"Counterparty: {counterparty}\"");

    if let Some(entity) = config.sanctions_hit(counterparty) {
        tracing::debug!(counterparty, entity, "counterparty matched watchlist");
        RuleOutcome::single(
            Finding::new("Counterparty Sanctions", FindingStatus::Error, Severity::High)
                .explanation("Entity appears on sanctions watchlist")
                .confidence(0.92)
                .standard("Clean entity")
                .snippet(format!("{quoted} - Flagged in sanctions database")),
            SANCTIONS_HIT_DELTA,
        )
    } else if !counterparty.contains(config.bank_marker.as_str()) {
        RuleOutcome::single(
            Finding::new("Counterparty Type", FindingStatus::Warning, Severity::Medium)
                .explanation("Non-bank counterparty may require additional due diligence")
                .confidence(0.78)
                .standard("Financial institution")
                .snippet(format!("{quoted} - Non-bank entity")),
            NON_BANK_COUNTERPARTY_DELTA,
        )
    } else {
        RuleOutcome::single(
            Finding::new("Counterparty Verification", FindingStatus::Valid, Severity::Low)
                .explanation("Counterparty appears to be legitimate financial institution")
                .confidence(0.88)
                .standard("Financial institution")
                .snippet(format!("{quoted} - Verified bank entity")),
            0,
        )
    }
}

/// Notional must be numeric and at most the configured limit
pub fn check_notional(record: &FieldRecord, config: &RuleConfig) -> RuleOutcome {
    let Some(raw) = record.get(FieldName::NotionalAmount) else {
        return RuleOutcome::default();
    };

    let notional = match raw.trim().parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            return RuleOutcome::single(
                Finding::new("Notional Amount", FindingStatus::Error, Severity::High)
                    .explanation("Invalid notional amount format")
                    .confidence(0.99)
                    .standard("Numeric format")
                    .snippet(format!("\"Notional Amount: {raw}\" - Invalid format")),
                INVALID_NOTIONAL_DELTA,
            );
        }
    };

    let amount = format!("\"Notional Amount: ${}\"", format_amount(notional));
    let standard = format!("< ${}M", format_amount(config.notional_limit / 1_000_000.0));

    if notional > config.notional_limit {
        RuleOutcome::single(
            Finding::new("Notional Amount", FindingStatus::Warning, Severity::Medium)
                .explanation("Large notional amount increases exposure risk")
                .confidence(0.95)
                .standard(standard)
                .snippet(format!("{amount} - Exceeds threshold")),
            LARGE_NOTIONAL_DELTA,
        )
    } else {
        RuleOutcome::single(
            Finding::new("Notional Amount", FindingStatus::Valid, Severity::Low)
                .explanation("Notional amount within acceptable risk parameters")
                .confidence(0.95)
                .standard(standard)
                .snippet(format!("{amount} - Within limits")),
            0,
        )
    }
}

/// Settlement lag should be standard; long lags are flagged
///
/// Lags other than the standard one that do not exceed the extended
/// threshold produce no finding.
pub fn check_settlement_period(record: &FieldRecord, config: &RuleConfig) -> Result<RuleOutcome> {
    let (Some(trade), Some(settlement)) = (
        record.get(FieldName::TradeDate),
        record.get(FieldName::SettlementDate),
    ) else {
        return Ok(RuleOutcome::default());
    };

    let trade_date = parse_date(FieldName::TradeDate, trade)?;
    let settlement_date = parse_date(FieldName::SettlementDate, settlement)?;
    let days = (settlement_date - trade_date).num_days();
    let standard = format!("T+{}", config.standard_settlement_days);

    let outcome = if days == config.standard_settlement_days {
        RuleOutcome::single(
            Finding::new("Settlement Period", FindingStatus::Valid, Severity::Low)
                .explanation(format!("{standard} settlement aligns with market standards"))
                .confidence(0.95)
                .standard(standard)
                .snippet(format!("\"Settlement: T+{days}\" - Standard period")),
            0,
        )
    } else if days > config.extended_settlement_days {
        RuleOutcome::single(
            Finding::new("Settlement Period", FindingStatus::Warning, Severity::Medium)
                .explanation("Extended settlement period may increase counterparty risk")
                .confidence(0.88)
                .standard(standard)
                .snippet(format!("\"Settlement: T+{days}\" - Extended period")),
            EXTENDED_SETTLEMENT_DELTA,
        )
    } else {
        tracing::debug!(days, "settlement lag outside scored bands");
        RuleOutcome::default()
    };

    Ok(outcome)
}
