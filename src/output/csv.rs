use anyhow::Result;

use crate::analysis::ImpactReport;
use crate::audit::AuditReport;

pub fn impact_to_csv(reports: &[ImpactReport]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "value",
        "target_ratio",
        "standard_block",
        "impact",
        "verdict",
        "stage",
    ])?;
    for report in reports {
        writer.write_record([
            format!("{}", report.value),
            format!("{}", report.target_ratio),
            format!("{:.1}", report.standard_block),
            format!("{:.4}", report.impact),
            report.verdict.as_slug().to_string(),
            report.stage.as_slug().to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn block_to_csv(target_ratio: f64, standard_block: f64) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["target_ratio", "standard_block"])?;
    writer.write_record([format!("{target_ratio}"), format!("{standard_block}")])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn audit_to_csv(report: &AuditReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "project",
        "budget",
        "coverage_impact",
        "budget_impact",
        "distortion",
        "verdict",
    ])?;
    for finding in &report.findings {
        writer.write_record([
            finding.project.clone(),
            format!("{:.0}", finding.budget),
            format!("{:.4}", finding.coverage_impact),
            format!("{:.4}", finding.budget_impact),
            format!("{:.1}", finding.distortion),
            finding.verdict.label().to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{audit_rows, AuditParams, AuditRow};

    #[test]
    fn impact_csv_has_header_and_row() {
        let out = impact_to_csv(&[ImpactReport::compute(3_000.0, 1.0)]).expect("csv");
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("value,target_ratio,standard_block,impact,verdict,stage")
        );
        assert_eq!(lines.next(), Some("3000,1,72176.9,0.0416,error_level,error"));
    }

    #[test]
    fn audit_csv_lists_findings() {
        let params = AuditParams::new(435_000.0, 100_000_000.0).expect("valid params");
        let report = audit_rows(
            &[AuditRow {
                project: "図書館".to_string(),
                budget: 30_000_000.0,
                beneficiaries: 0.0,
            }],
            params,
        );
        let out = audit_to_csv(&report).expect("csv");
        assert!(out.contains("図書館,30000000,0.0000"));
        assert!(out.contains("9999.0"));
    }
}
