use super::common;
use crate::Result;
use crate::ingest::{BatchOutput, MetricTable};
use crate::metrics::CondColor;
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

pub fn generate<W: Write>(output: &BatchOutput, use_colors: bool, writer: &mut W) -> Result<()> {
    let term_width = get_terminal_width();

    for (index, table) in output.sections.iter().filter(|t| !t.is_empty()).enumerate() {
        if index > 0 {
            writeln!(writer)?;
            writeln!(writer, "═══════════════════════════════════════")?;
            writeln!(writer)?;
        }

        if use_colors {
            writeln!(writer, "{}", table.title.bold())?;
        } else {
            writeln!(writer, "{}", table.title)?;
        }

        write_table(writer, table, use_colors, term_width)?;
    }

    Ok(())
}

fn write_table<W: Write>(writer: &mut W, table: &MetricTable, use_colors: bool, term_width: usize) -> Result<()> {
    let columns: Vec<_> = table.visible_columns().collect();
    let max_title_len = columns.iter().map(|c| c.title.chars().count()).max().unwrap_or(0);

    // "    " (4) + title + " : " (3)
    let value_indent = 4 + max_title_len + 3;

    for (sample, record) in table.samples.iter() {
        writeln!(writer)?;
        if use_colors {
            writeln!(writer, "  {}", sample.bold())?;
        } else {
            writeln!(writer, "  {sample}")?;
        }

        for column in &columns {
            let Some(value) = record.get(column.key.as_str()) else {
                continue;
            };

            let text = column.display_value(value);
            let highlight = if use_colors { column.highlight(value) } else { None };
            let wrapped_lines = wrap_text(&text, term_width, value_indent);

            if let Some(first_line) = wrapped_lines.first() {
                let first_line = paint(first_line, highlight);
                writeln!(writer, "    {:<width$} : {first_line}", column.title, width = max_title_len)?;

                for line in wrapped_lines.iter().skip(1) {
                    writeln!(writer, "{}", paint(line, highlight))?;
                }
            }
        }
    }

    Ok(())
}

fn paint(text: &str, highlight: Option<CondColor>) -> String {
    match highlight {
        Some(CondColor::Red) => text.red().bold().to_string(),
        Some(CondColor::Green) => text.green().bold().to_string(),
        None => text.to_string(),
    }
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| usize::from(w))
}

/// Word-wrap text to fit within a given width, with indentation for continuation lines
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width <= indent {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let used = indent + current_line.len();
        let separator_len = usize::from(!current_line.is_empty());

        if !current_line.is_empty() && used + separator_len + word.len() > width {
            lines.push(current_line);
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { format!("{:indent$}{line}", "") })
        .collect()
}
