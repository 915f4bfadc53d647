//! Synthetic audit trail
//!
//! Events are anchored five minutes before generation and spaced at fixed
//! offsets. They describe the pipeline for display; they are not a log of
//! real processing times.

use chrono::Duration;

use crate::types::{
    AuditEvent, AuditEventType, AuditStatus, FieldRecord, Finding, FindingStatus, Timestamp,
};

const ANCHOR_MINUTES: i64 = 5;
const EXTRACTION_OFFSET_SECS: i64 = 13;
const FIRST_FINDING_OFFSET_SECS: i64 = 30;
const FINDING_SPACING_SECS: i64 = 5;
const RISK_CALCULATED_OFFSET_SECS: i64 = 60;

fn event(
    event_type: AuditEventType,
    at: Timestamp,
    title: impl Into<String>,
    description: impl Into<String>,
    user: &str,
) -> AuditEvent {
    AuditEvent {
        id: String::new(),
        timestamp: at,
        event_type,
        title: title.into(),
        description: description.into(),
        user: user.to_string(),
        severity: None,
        status: AuditStatus::Completed,
    }
}

/// Build the audit trail for one validation run
pub fn build_trail(
    record: &FieldRecord,
    findings: &[Finding],
    generated_at: Timestamp,
) -> Vec<AuditEvent> {
    let base = generated_at - Duration::minutes(ANCHOR_MINUTES);
    let mut events = vec![
        event(
            AuditEventType::Upload,
            base,
            "Document Uploaded",
            "Financial agreement document uploaded successfully",
            "System",
        ),
        event(
            AuditEventType::Extraction,
            base + Duration::seconds(EXTRACTION_OFFSET_SECS),
            "Data Extraction Completed",
            format!("{} fields extracted with high confidence", record.present_count()),
            "AI Engine",
        ),
    ];

    let flagged = findings.iter().filter(|f| f.status.is_flagged());
    for (i, finding) in flagged.enumerate() {
        let offset = FIRST_FINDING_OFFSET_SECS + FINDING_SPACING_SECS * i as i64;
        let mut flag = event(
            AuditEventType::Validation,
            base + Duration::seconds(offset),
            format!("{} {}", finding.field, finding.status),
            finding.explanation.as_str(),
            "Validation Engine",
        );
        flag.severity = Some(finding.severity);
        if finding.status == FindingStatus::Error {
            flag.status = AuditStatus::Flagged;
        }
        events.push(flag);
    }

    events.push(event(
        AuditEventType::Validation,
        base + Duration::seconds(RISK_CALCULATED_OFFSET_SECS),
        "Risk Score Calculated",
        "Comprehensive risk assessment completed",
        "Risk Engine",
    ));

    for (i, e) in events.iter_mut().enumerate() {
        e.id = (i + 1).to_string();
    }
    events
}
