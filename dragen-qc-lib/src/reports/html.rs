use super::common;
use crate::Result;
use crate::ingest::{BatchOutput, MetricTable};
use crate::metrics::css_hex;
use chrono::{DateTime, Local};
use core::fmt::Write;

pub fn generate<W: Write>(output: &BatchOutput, timestamp: DateTime<Local>, writer: &mut W) -> Result<()> {
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html>")?;
    writeln!(writer, "<head>")?;
    writeln!(writer, "  <meta charset=\"UTF-8\">")?;
    writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(writer, "  <title>DRAGEN QC Report</title>")?;
    write_styles(writer)?;
    writeln!(writer, "</head>")?;
    writeln!(writer, "<body>")?;

    write_header(writer, output, timestamp)?;

    for table in common::tables(output) {
        write_table(writer, table)?;
    }

    write_scripts(writer)?;
    writeln!(writer, "</body>")?;
    writeln!(writer, "</html>")?;

    Ok(())
}

fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <style>")?;
    writeln!(writer, "    :root {{")?;
    writeln!(writer, "      --bg-color: #f0f2f5;")?;
    writeln!(writer, "      --card-bg: #ffffff;")?;
    writeln!(writer, "      --text-color: #1a202c;")?;
    writeln!(writer, "      --text-secondary: #64748b;")?;
    writeln!(writer, "      --border-color: #e2e8f0;")?;
    writeln!(writer, "      --accent-color: #3b82f6;")?;
    writeln!(writer, "      --shadow: 0 1px 3px rgba(0,0,0,0.08), 0 4px 16px rgba(0,0,0,0.04);")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "    * {{ box-sizing: border-box; }}")?;
    writeln!(writer, "    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; padding: 32px; background: var(--bg-color); color: var(--text-color); line-height: 1.5; }}")?;
    writeln!(writer, "    .header {{ margin-bottom: 28px; }}")?;
    writeln!(writer, "    h1 {{ margin: 0 0 2px 0; font-size: 26px; font-weight: 700; letter-spacing: -0.5px; }}")?;
    writeln!(writer, "    h2 {{ margin: 0 0 4px 0; font-size: 18px; }}")?;
    writeln!(writer, "    .subtitle, .description {{ margin: 0 0 12px 0; font-size: 13px; color: var(--text-secondary); }}")?;
    writeln!(writer, "    .section {{ background: var(--card-bg); border-radius: 12px; box-shadow: var(--shadow); border: 1px solid var(--border-color); margin-bottom: 20px; padding: 16px 20px; overflow-x: auto; }}")?;
    writeln!(writer, "    .toggle-btn {{ border: 1px solid var(--border-color); background: var(--card-bg); color: var(--text-color); padding: 4px 12px; border-radius: 16px; font-size: 12px; cursor: pointer; margin-bottom: 12px; }}")?;
    writeln!(writer, "    .toggle-btn:hover {{ border-color: var(--accent-color); }}")?;
    writeln!(writer, "    table {{ border-collapse: collapse; font-size: 13px; }}")?;
    writeln!(writer, "    th, td {{ border-bottom: 1px solid var(--border-color); padding: 4px 10px; text-align: right; white-space: nowrap; }}")?;
    writeln!(writer, "    th {{ cursor: help; }}")?;
    writeln!(writer, "    th:first-child, td:first-child {{ text-align: left; font-weight: 600; }}")?;
    writeln!(writer, "    td.highlight {{ font-weight: 700; }}")?;
    writeln!(writer, "    table:not(.show-hidden) .hidden-col {{ display: none; }}")?;
    writeln!(writer, "  </style>")?;
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, output: &BatchOutput, timestamp: DateTime<Local>) -> Result<()> {
    let date = timestamp.format("%Y-%m-%d").to_string();
    writeln!(writer, "  <div class=\"header\">")?;
    writeln!(writer, "    <h1>DRAGEN QC Report</h1>")?;
    writeln!(
        writer,
        "    <p class=\"subtitle\">{} samples. Produced by dragen-qc {} on {}</p>",
        output.sample_count(),
        env!("CARGO_PKG_VERSION"),
        date
    )?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, table: &MetricTable) -> Result<()> {
    let id = html_escape(&table.id);
    writeln!(writer, "  <div class=\"section\" id=\"{id}\">")?;
    writeln!(writer, "    <h2>{}</h2>", html_escape(&table.title))?;
    writeln!(writer, "    <p class=\"description\">{}</p>", html_escape(&table.description))?;

    if table.columns.iter().any(|c| c.hidden) {
        writeln!(
            writer,
            "    <button class=\"toggle-btn\" data-table=\"{id}-table\" onclick=\"toggleHidden(this)\">Show hidden columns</button>"
        )?;
    }

    writeln!(writer, "    <table id=\"{id}-table\">")?;
    writeln!(writer, "      <thead>")?;
    writeln!(writer, "        <tr>")?;
    writeln!(writer, "          <th>Sample</th>")?;
    for column in &table.columns {
        let class = if column.hidden { " class=\"hidden-col\"" } else { "" };
        writeln!(
            writer,
            "          <th{class} title=\"{}: {}\">{}</th>",
            html_escape(&column.namespace),
            html_escape(&column.description),
            html_escape(&column.title)
        )?;
    }
    writeln!(writer, "        </tr>")?;
    writeln!(writer, "      </thead>")?;

    let ranges: Vec<_> = table.columns.iter().map(|column| table.observed_range(column)).collect();

    writeln!(writer, "      <tbody>")?;
    for (sample, record) in table.samples.iter() {
        writeln!(writer, "        <tr>")?;
        writeln!(writer, "          <td>{}</td>", html_escape(sample))?;

        for (column, range) in table.columns.iter().zip(&ranges) {
            let mut classes = Vec::new();
            let mut style = String::new();

            if column.hidden {
                classes.push("hidden-col");
            }

            let text = match record.get(column.key.as_str()) {
                Some(value) => {
                    if let Some(shade) = column.shade(value, *range) {
                        write!(style, "background-color: {};", css_hex(shade))?;
                    }
                    if let Some(highlight) = column.highlight(value) {
                        classes.push("highlight");
                        write!(style, "color: {};", css_hex(highlight.rgb()))?;
                    }
                    column.display_value(value)
                }
                None => String::new(),
            };

            let class_attr = if classes.is_empty() {
                String::new()
            } else {
                format!(" class=\"{}\"", classes.join(" "))
            };
            let style_attr = if style.is_empty() { String::new() } else { format!(" style=\"{style}\"") };

            writeln!(writer, "          <td{class_attr}{style_attr}>{}</td>", html_escape(&text))?;
        }

        writeln!(writer, "        </tr>")?;
    }
    writeln!(writer, "      </tbody>")?;
    writeln!(writer, "    </table>")?;
    writeln!(writer, "  </div>")?;
    Ok(())
}

fn write_scripts<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "  <script>")?;
    writeln!(writer, "    function toggleHidden(btn) {{")?;
    writeln!(writer, "      const table = document.getElementById(btn.dataset.table);")?;
    writeln!(writer, "      const shown = table.classList.toggle('show-hidden');")?;
    writeln!(writer, "      btn.textContent = shown ? 'Hide hidden columns' : 'Show hidden columns';")?;
    writeln!(writer, "    }}")?;
    writeln!(writer, "  </script>")?;
    Ok(())
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Batch, CnvModule, IdentityNames, LogFile};
    use chrono::TimeZone;

    fn test_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn render(files: &[(&str, &str)]) -> String {
        let mut batch = Batch::new(CnvModule);
        for (name, contents) in files {
            let _ = batch.ingest(&LogFile::new("/d", *name, *contents));
        }
        let output = batch.finalize(&IdentityNames);

        let mut html = String::new();
        generate(&output, test_timestamp(), &mut html).unwrap();
        html
    }

    #[test]
    fn test_page_structure() {
        let html = render(&[("S1.cnv_metrics.csv", "CNV SUMMARY,,Number of Segments,17\nSEX GENOTYPER,,S1,XX,0.99\n")]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("on 2024-01-15"));
        assert!(html.contains("id=\"dragen-cnv-metrics-general\""));
        assert!(html.contains("id=\"dragen-cnv-metrics\""));
        assert!(html.contains("<h2>General statistics</h2>"));
        assert!(html.contains("<h2>CNV metrics</h2>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_hidden_columns_are_toggleable() {
        let html = render(&[("S1.cnv_metrics.csv", "CNV SUMMARY,,Number of Segments,17\n")]);
        assert!(html.contains("<th class=\"hidden-col\" title=\"DRAGEN CNV: Number of segments.\">Segments</th>"));
        assert!(html.contains("data-table=\"dragen-cnv-metrics-general-table\""));
        assert!(!html.contains("data-table=\"dragen-cnv-metrics-table\""));
    }

    #[test]
    fn test_karyotype_cells_are_highlighted() {
        let html = render(&[("S1.cnv_metrics.csv", "SEX GENOTYPER,,S1,XO,0.99\n")]);
        let red = css_hex(crate::metrics::CondColor::Red.rgb());
        assert!(html.contains(&format!("<td class=\"highlight\" style=\"color: {red};\">XO</td>")));
    }

    #[test]
    fn test_numeric_cells_are_shaded() {
        let html = render(&[
            ("S1.cnv_metrics.csv", "CNV SUMMARY,,Number of Segments,10\n"),
            ("S2.cnv_metrics.csv", "CNV SUMMARY,,Number of Segments,30\n"),
        ]);
        assert!(html.contains("style=\"background-color: #"));
        assert!(html.contains(">30</td>"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(html_escape("plain"), "plain");
    }
}
