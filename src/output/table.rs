use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::analysis::ImpactReport;
use crate::audit::{AuditReport, DistortionVerdict};
use crate::functions::host::CustomFunction;
use crate::functions::Verdict;
use crate::stage::Stage;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Blank => Color::Reset,
        Verdict::ErrorLevel => Color::Red,
        Verdict::Localized => Color::Yellow,
        Verdict::Effective => Color::Green,
    }
}

pub fn render_impact_table(report: &ImpactReport) -> String {
    let mut table = new_table();
    table.set_header(vec!["Measure", "Value"]);
    table.add_row(vec![
        "入力値 (Value)".to_string(),
        format!("{:.0}", report.value),
    ]);
    table.add_row(vec![
        "ターゲット比率 (Target ratio)".to_string(),
        format!("{:.1}%", report.target_ratio * 100.0),
    ]);
    table.add_row(vec![
        "標準ブロック (B)".to_string(),
        format!("{:.1}", report.standard_block),
    ]);
    table.add_row(vec![
        "実効性インパクト (I)".to_string(),
        format!("{:.4}", report.impact),
    ]);
    table.add_row(Row::from(vec![
        Cell::new("判定 (Verdict)"),
        Cell::new(report.verdict.label()).fg(verdict_color(report.verdict)),
    ]));

    let mut out = table.to_string();
    out.push_str(&format!("\n結論: {}", report.summary()));
    out
}

pub fn render_block_table(ratio: f64, block: f64) -> String {
    let mut table = new_table();
    table.set_header(vec!["Target ratio", "Standard block"]);
    table.add_row(vec![format!("{ratio}"), format!("{block:.1}")]);
    table.to_string()
}

pub fn render_functions_table() -> String {
    let mut table = new_table();
    table.set_header(vec!["Function", "Signature", "Description"]);
    for function in CustomFunction::ALL {
        table.add_row(vec![
            function.name(),
            function.signature(),
            function.description(),
        ]);
    }
    table.to_string()
}

pub fn render_stages_table() -> String {
    let mut table = new_table();
    table.set_header(vec!["Stage", "From I", "Finding"]);
    for stage in Stage::ALL {
        let from = match stage.lower_bound() {
            bound if bound.is_finite() => format!("{bound}"),
            _ => "-".to_string(),
        };
        table.add_row(vec![stage.title().to_string(), from, stage.finding().to_string()]);
    }
    table.to_string()
}

pub fn render_audit_table(report: &AuditReport) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Project",
        "Budget",
        "Coverage Imp",
        "Budget Imp",
        "Distortion",
        "Verdict",
    ]);
    for finding in &report.findings {
        let color = match finding.verdict {
            DistortionVerdict::Abnormal => Color::Red,
            DistortionVerdict::HighCost => Color::Yellow,
            DistortionVerdict::Appropriate => Color::Reset,
            DistortionVerdict::HighEfficiency => Color::Cyan,
        };
        table.add_row(Row::from(vec![
            Cell::new(&finding.project),
            Cell::new(format!("{:.0}", finding.budget)),
            Cell::new(format!("{:.4}", finding.coverage_impact)),
            Cell::new(format!("{:.4}", finding.budget_impact)),
            Cell::new(format!("{:.1}", finding.distortion)),
            Cell::new(finding.verdict.label()).fg(color),
        ]));
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\nCity population: {:.0}\nLocal budget unit: {:.0}\nStandard block population: {:.1}",
        report.params.city_population, report.local_budget_unit, report.standard_block_population
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{audit_rows, AuditParams, AuditRow};

    #[test]
    fn impact_table_carries_verdict_and_stage() {
        let out = render_impact_table(&ImpactReport::compute(3_000.0, 1.0));
        assert!(out.contains("72176.9"));
        assert!(out.contains("誤差レベル (Error Level: < 1.0)"));
        assert!(out.contains("結論: 💀【誤差レベル (Error)】"));
    }

    #[test]
    fn functions_table_lists_all_three() {
        let out = render_functions_table();
        for function in CustomFunction::ALL {
            assert!(out.contains(function.name()));
        }
    }

    #[test]
    fn stages_table_lists_thresholds_in_order() {
        let out = render_stages_table();
        let positions: Vec<usize> = Stage::ALL
            .iter()
            .map(|stage| out.find(stage.title()).expect("stage row"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(out.contains("7000"));
        assert!(out.contains("社会OS級"));
    }

    #[test]
    fn audit_table_has_footer() {
        let params = AuditParams::new(435_000.0, 100_000_000.0).expect("valid params");
        let report = audit_rows(
            &[AuditRow {
                project: "窓口DX".to_string(),
                budget: 120_000_000.0,
                beneficiaries: 3_000.0,
            }],
            params,
        );
        let out = render_audit_table(&report);
        assert!(out.contains("窓口DX"));
        assert!(out.contains("City population: 435000"));
    }
}
