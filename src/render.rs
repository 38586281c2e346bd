use std::fmt::Write as _;

use serde_json::Value;

use crate::summary::{DatasetSummary, VariableSummary};

/// How a summary is serialized. Selected once at the CLI boundary and
/// threaded through explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Text,
    Html,
}

const EMPTY_SECTION: &str = "    *not enough information for display*";

const HTML_STYLE: &str = "body{font-family:monospace;margin:1em 2em}\
table{border-collapse:collapse;margin-bottom:1em}\
th,td{border:1px solid #ccc;padding:2px 8px;text-align:left;vertical-align:top}\
h2{margin-bottom:0}.source{color:#555;margin-top:2px}";

pub fn render(summary: &DatasetSummary, mode: RenderMode) -> String {
    match mode {
        RenderMode::Text => text_repr(summary),
        RenderMode::Html => html_repr(summary),
    }
}

/// Plain-text layout in the style of xarray's dataset repr.
fn text_repr(summary: &DatasetSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dataset (dataset-size: {})", format_size(summary.nbytes()));

    let dims = summary
        .dimensions
        .iter()
        .map(|dim| {
            if dim.unlimited {
                format!("{}: {} (unlimited)", dim.name, dim.len)
            } else {
                format!("{}: {}", dim.name, dim.len)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Dimensions:  ({dims})");

    let width = summary
        .variables
        .iter()
        .map(|var| var.name.len())
        .max()
        .unwrap_or(0)
        .max(8)
        + 2;

    let _ = writeln!(out, "Coordinates:");
    let mut any = false;
    for var in summary.coordinates() {
        any = true;
        summarize_variable(&mut out, var, width, "  * ");
    }
    if !any {
        let _ = writeln!(out, "{EMPTY_SECTION}");
    }

    let _ = writeln!(out, "Data variables:");
    any = false;
    for var in summary.data_vars() {
        any = true;
        summarize_variable(&mut out, var, width, "    ");
    }
    if !any {
        let _ = writeln!(out, "{EMPTY_SECTION}");
    }

    if !summary.attributes.is_empty() {
        let _ = writeln!(out, "Attributes:");
        for (name, value) in &summary.attributes {
            let _ = writeln!(out, "    {name}: {}", format_attr(value));
        }
    }

    out
}

fn summarize_variable(out: &mut String, var: &VariableSummary, width: usize, marker: &str) {
    let dims = var.dims.join(", ");
    let _ = writeln!(out, "{marker}{:<width$}({dims}) {}", var.name, var.dtype);
    for (name, value) in &var.attributes {
        let _ = writeln!(out, "        {name}: {}", format_attr(value));
    }
}

/// Self-contained HTML document with the same informational content as the
/// text form.
fn html_repr(summary: &DatasetSummary) -> String {
    let mut buf = String::new();
    let source = escape_html(&summary.source);

    let _ = writeln!(buf, "<!DOCTYPE html>");
    let _ = writeln!(buf, "<html>");
    let _ = writeln!(buf, "<head>");
    let _ = writeln!(buf, "<meta charset=\"utf-8\">");
    let _ = writeln!(buf, "<title>{source}</title>");
    let _ = writeln!(buf, "<style>{HTML_STYLE}</style>");
    let _ = writeln!(buf, "</head>");
    let _ = writeln!(buf, "<body>");
    let _ = writeln!(
        buf,
        "<h2>Dataset (dataset-size: {})</h2>",
        format_size(summary.nbytes())
    );
    let _ = writeln!(buf, "<p class=\"source\">{source}</p>");

    let _ = writeln!(buf, "<h3>Dimensions</h3>");
    if summary.dimensions.is_empty() {
        let _ = writeln!(buf, "<p><em>not enough information for display</em></p>");
    } else {
        let _ = writeln!(buf, "<table>");
        let _ = writeln!(buf, "<tr><th>name</th><th>length</th><th>unlimited</th></tr>");
        for dim in &summary.dimensions {
            let _ = writeln!(
                buf,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&dim.name),
                dim.len,
                if dim.unlimited { "yes" } else { "" }
            );
        }
        let _ = writeln!(buf, "</table>");
    }

    let coords: Vec<&VariableSummary> = summary.coordinates().collect();
    let data_vars: Vec<&VariableSummary> = summary.data_vars().collect();
    variable_table(&mut buf, "Coordinates", &coords);
    variable_table(&mut buf, "Data variables", &data_vars);

    let _ = writeln!(buf, "<h3>Attributes</h3>");
    if summary.attributes.is_empty() {
        let _ = writeln!(buf, "<p><em>not enough information for display</em></p>");
    } else {
        let _ = writeln!(buf, "<table>");
        for (name, value) in &summary.attributes {
            let _ = writeln!(
                buf,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(name),
                escape_html(&format_attr(value))
            );
        }
        let _ = writeln!(buf, "</table>");
    }

    let _ = writeln!(buf, "</body>");
    let _ = writeln!(buf, "</html>");
    buf
}

fn variable_table(buf: &mut String, title: &str, variables: &[&VariableSummary]) {
    let _ = writeln!(buf, "<h3>{title}</h3>");
    if variables.is_empty() {
        let _ = writeln!(buf, "<p><em>not enough information for display</em></p>");
        return;
    }
    let _ = writeln!(buf, "<table>");
    let _ = writeln!(
        buf,
        "<tr><th>name</th><th>dimensions</th><th>dtype</th><th>attributes</th></tr>"
    );
    for var in variables {
        let attrs = var
            .attributes
            .iter()
            .map(|(name, value)| {
                format!("{}: {}", escape_html(name), escape_html(&format_attr(value)))
            })
            .collect::<Vec<_>>()
            .join("<br>");
        let _ = writeln!(
            buf,
            "<tr><td>{}</td><td>({})</td><td>{}</td><td>{}</td></tr>",
            escape_html(&var.name),
            escape_html(&var.dims.join(", ")),
            escape_html(&var.dtype),
            attrs
        );
    }
    let _ = writeln!(buf, "</table>");
}

/// Attribute values print bare: strings unquoted, lists bracketed.
fn format_attr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(format_attr).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

/// 1024-based human-readable size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{DatasetSummary, DimensionSummary, VariableSummary};
    use serde_json::json;

    fn sample_summary() -> DatasetSummary {
        DatasetSummary {
            source: "data/tas.nc".to_string(),
            dimensions: vec![
                DimensionSummary {
                    name: "time".to_string(),
                    len: 120,
                    unlimited: true,
                },
                DimensionSummary {
                    name: "lat".to_string(),
                    len: 90,
                    unlimited: false,
                },
            ],
            variables: vec![
                VariableSummary {
                    name: "time".to_string(),
                    dtype: "float64".to_string(),
                    dims: vec!["time".to_string()],
                    attributes: vec![(
                        "units".to_string(),
                        json!("days since 1850-01-01"),
                    )],
                    nbytes: 960,
                },
                VariableSummary {
                    name: "tas".to_string(),
                    dtype: "float32".to_string(),
                    dims: vec!["time".to_string(), "lat".to_string()],
                    attributes: vec![("units".to_string(), json!("K"))],
                    nbytes: 43_200,
                },
            ],
            attributes: vec![("Conventions".to_string(), json!("CF-1.7"))],
        }
    }

    #[test]
    fn test_text_repr_lists_all_names() {
        let text = render(&sample_summary(), RenderMode::Text);
        assert!(text.starts_with("Dataset (dataset-size:"));
        for needle in ["time: 120 (unlimited)", "lat: 90", "tas", "units", "Conventions", "CF-1.7"] {
            assert!(text.contains(needle), "missing {needle:?} in {text}");
        }
    }

    #[test]
    fn test_text_repr_marks_empty_sections() {
        let summary = DatasetSummary {
            source: "empty.nc".to_string(),
            dimensions: Vec::new(),
            variables: Vec::new(),
            attributes: Vec::new(),
        };
        let text = render(&summary, RenderMode::Text);
        assert!(text.contains("*not enough information for display*"));
    }

    #[test]
    fn test_html_and_text_carry_the_same_names() {
        let summary = sample_summary();
        let text = render(&summary, RenderMode::Text);
        let html = render(&summary, RenderMode::Html);
        for name in ["time", "lat", "tas", "units", "Conventions"] {
            assert!(text.contains(name));
            assert!(html.contains(name));
        }
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_html_escapes_metadata_strings() {
        let mut summary = sample_summary();
        summary.attributes.push((
            "comment".to_string(),
            json!("T < 0 & \"quoted\""),
        ));
        let html = render(&summary, RenderMode::Html);
        assert!(html.contains("T &lt; 0 &amp; &quot;quoted&quot;"));
        assert!(!html.contains("T < 0"));
    }

    #[test]
    fn test_format_attr() {
        assert_eq!(format_attr(&json!("K")), "K");
        assert_eq!(format_attr(&json!([1, 2, 3])), "[1, 2, 3]");
        assert_eq!(format_attr(&json!(2.5)), "2.5");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1_572_864), "1.5 MB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }
}
