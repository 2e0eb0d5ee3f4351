use anyhow::Result;
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::analysis::ImpactReport;

    #[test]
    fn renders_reports_with_snake_case_enums() {
        let rendered = render_json(&ImpactReport::compute(721_770.0, 1.0)).expect("json");
        assert!(rendered.contains("\"verdict\": \"effective\""));
        assert!(rendered.contains("\"stage\": \"localized\""));
    }
}
