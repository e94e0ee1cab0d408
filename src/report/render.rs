//! Rendering of the archive index

use clap::ValueEnum;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tera::{Context, Tera};

use super::index::ArchiveIndex;
use crate::error::FlashbackResult;

/// Output format for `flashback report`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain text from a tera template
    #[default]
    Text,
    /// Table with one row per snapshot
    Table,
    Json,
    Yaml,
}

/// Built-in text template
///
/// The context holds `hosts`, a list of `{ host, dates: [{ date, files }] }`.
pub const DEFAULT_TEMPLATE: &str = r#"{% for entry in hosts -%}
{{ entry.host }}
{% for d in entry.dates -%}
{{ "  " ~ d.date }}: {{ d.files | join(sep=", ") }}
{% endfor -%}
{% if entry.dates | length == 0 -%}
{{ "  " }}(no archives)
{% endif -%}
{% endfor -%}
"#;

#[derive(Serialize)]
struct HostView<'a> {
    host: &'a str,
    dates: Vec<DateView<'a>>,
}

#[derive(Serialize)]
struct DateView<'a> {
    date: &'a str,
    files: &'a [String],
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Files")]
    files: String,
}

/// Render `index` in `format`
///
/// `template` replaces [`DEFAULT_TEMPLATE`] for the text format.
pub fn render_report(
    index: &ArchiveIndex,
    format: ReportFormat,
    template: Option<&str>,
) -> FlashbackResult<String> {
    match format {
        ReportFormat::Text => render_text(index, template.unwrap_or(DEFAULT_TEMPLATE)),
        ReportFormat::Table => Ok(render_table(index)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(index)? + "\n"),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(index)?),
    }
}

fn render_text(index: &ArchiveIndex, template: &str) -> FlashbackResult<String> {
    let hosts: Vec<HostView<'_>> = index
        .hosts()
        .iter()
        .map(|h| HostView {
            host: &h.host,
            dates: h
                .dates
                .iter()
                .map(|(date, files)| DateView {
                    date: date.as_str(),
                    files,
                })
                .collect(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("hosts", &hosts);

    let mut tera = Tera::default();
    tera.add_raw_template("report", template)?;
    Ok(tera.render("report", &context)?)
}

fn render_table(index: &ArchiveIndex) -> String {
    let mut rows = Vec::new();
    for entry in index.hosts() {
        if entry.dates.is_empty() {
            rows.push(Row {
                host: entry.host.clone(),
                date: "-".into(),
                files: "(no archives)".into(),
            });
        }
        for (date, files) in &entry.dates {
            rows.push(Row {
                host: entry.host.clone(),
                date: date.to_string(),
                files: files.join(", "),
            });
        }
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlashbackError;
    use crate::report::build_index;

    fn sample() -> ArchiveIndex {
        build_index([
            (
                "web01",
                "/x/20260101/passwd /x/20260101/group /x/20260102/passwd",
            ),
            ("web02", ""),
        ])
    }

    #[test]
    fn test_text_report() {
        let text = render_report(&sample(), ReportFormat::Text, None).unwrap();
        assert_eq!(
            text,
            "web01\n  20260101: passwd, group\n  20260102: passwd\nweb02\n  (no archives)\n"
        );
    }

    #[test]
    fn test_custom_template() {
        let template = "{% for entry in hosts %}{{ entry.host }}={{ entry.dates | length }};{% endfor %}";
        let text = render_report(&sample(), ReportFormat::Text, Some(template)).unwrap();
        assert_eq!(text, "web01=2;web02=0;");
    }

    #[test]
    fn test_broken_template_is_template_error() {
        let err = render_report(&sample(), ReportFormat::Text, Some("{% for %}")).unwrap_err();
        assert!(matches!(err, FlashbackError::Template(_)));
    }

    #[test]
    fn test_table_report() {
        let table = render_report(&sample(), ReportFormat::Table, None).unwrap();
        assert!(table.contains("Host"));
        assert!(table.contains("passwd, group"));
        assert!(table.contains("(no archives)"));
    }

    #[test]
    fn test_json_and_yaml_reports() {
        let json = render_report(&sample(), ReportFormat::Json, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["web01"]["20260102"][0], "passwd");

        let yaml = render_report(&sample(), ReportFormat::Yaml, None).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["web01"]["20260101"][1].as_str(), Some("group"));
        assert!(value["web02"].as_mapping().unwrap().is_empty());
    }
}
