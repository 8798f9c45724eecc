use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::BatchResult;
use crate::export::Exporter;

/// Single-page report with the grouped views as tables. Every OCR-derived
/// string is escaped; screenshots routinely contain `<` and `&`.
#[derive(Debug, Clone)]
pub struct HtmlReportExporter {
    out_dir: PathBuf,
}

impl HtmlReportExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn render(batch: &BatchResult) -> String {
        let mut phone_rows = String::new();
        for row in batch.phone_rows() {
            phone_rows.push_str(&format!(
                "<tr><td>{image}</td><td class='num'>{number}</td><td dir='auto'>{name}</td><td dir='auto'>{timestamp}</td></tr>\n",
                image = escape(row.image),
                number = escape(row.number.as_str()),
                name = escape(row.name.unwrap_or("")),
                timestamp = escape(row.timestamp.unwrap_or("")),
            ));
        }

        let mut unique_rows = String::new();
        for number in batch.unique_numbers() {
            unique_rows.push_str(&format!(
                "<tr><td class='num'>{}</td></tr>\n",
                escape(number.as_str())
            ));
        }

        let mut summary_rows = String::new();
        for summary in batch.summaries() {
            summary_rows.push_str(&format!(
                "<tr><td>{image}</td><td>{phones}</td><td>{names}</td><td>{messages}</td><td>{blocks}</td><td>{confidence}</td></tr>\n",
                image = escape(summary.image),
                phones = summary.phone_count,
                names = summary.name_count,
                messages = summary.message_count,
                blocks = summary.block_count,
                confidence = summary
                    .mean_confidence
                    .map(|value| format!("{value:.3}"))
                    .unwrap_or_default(),
            ));
        }

        let mut raw_sections = String::new();
        for record in &batch.records {
            raw_sections.push_str(&format!(
                "<h3>{image}</h3>\n<p class='raw' dir='auto'>{text}</p>\n",
                image = escape(&record.image),
                text = escape(&record.raw_text),
            ));
        }

        let mut failure_rows = String::new();
        for failure in &batch.failures {
            failure_rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape(&failure.image),
                escape(&failure.error)
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset='utf-8'>
<title>Contact extraction report</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 20px; }}
table {{ border-collapse: collapse; margin-bottom: 24px; }}
th, td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}
th {{ background: #f3f3f3; }}
td.num {{ font-family: monospace; direction: ltr; }}
p.raw {{ white-space: pre-wrap; background: #fafafa; padding: 8px; border: 1px solid #eee; }}
</style>
</head>
<body>
<h2>Phone numbers ({row_count})</h2>
<table>
<tr><th>Image</th><th>Number</th><th>Name</th><th>Timestamp</th></tr>
{phone_rows}</table>
<h2>Unique numbers ({unique_count})</h2>
<table>
<tr><th>Number</th></tr>
{unique_rows}</table>
<h2>Summary</h2>
<table>
<tr><th>Image</th><th>Phones</th><th>Names</th><th>Messages</th><th>Blocks</th><th>Mean confidence</th></tr>
{summary_rows}</table>
<h2>Failed images ({failure_count})</h2>
<table>
<tr><th>Image</th><th>Error</th></tr>
{failure_rows}</table>
<h2>Raw text</h2>
{raw_sections}</body>
</html>
"#,
            row_count = batch.phone_rows().len(),
            unique_count = batch.unique_numbers().len(),
            failure_count = batch.failures.len(),
        )
    }
}

fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_text(text)
}

impl Exporter for HtmlReportExporter {
    fn export(&self, batch: &BatchResult) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.out_dir.join("report.html"), Self::render(batch))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ImageFailure, ImageRecord, PhoneNumber};

    #[test]
    fn report_escapes_ocr_text() {
        let batch = BatchResult {
            records: vec![ImageRecord {
                image: "chat.png".to_string(),
                phone_numbers: vec![PhoneNumber::parse_canonical("+966551112222").unwrap()],
                names: vec!["<b>Sara</b>".to_string()],
                timestamp: Some("Sunday 10:30".to_string()),
                messages: vec![],
                raw_text: "Sara & co".to_string(),
                block_count: 2,
                mean_confidence: Some(0.875),
            }],
            failures: vec![ImageFailure {
                image: "broken.png".to_string(),
                error: "OCR bridge failed".to_string(),
            }],
        };

        let html = HtmlReportExporter::render(&batch);
        assert!(html.contains("&lt;b&gt;Sara&lt;/b&gt;"));
        assert!(!html.contains("<b>Sara</b>"));
        assert!(html.contains("Sara &amp; co"));
        assert!(html.contains("<td class='num'>+966551112222</td>"));
        assert!(html.contains("Phone numbers (1)"));
        assert!(html.contains("0.875"));
        assert!(html.contains("broken.png"));
    }
}
