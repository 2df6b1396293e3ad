use crate::highlight::escape_html;
use crate::highlight::word_diff::WordChange;
use crate::{CheckError, CheckReport, GrammarMatch};
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(flatten)]
    report: &'a CheckReport,
}

#[derive(Debug, Serialize)]
struct JsonError<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    error: &'a str,
    status: u16,
}

/// Print a finished check. `label` names the input when there are several.
pub fn print_report(
    label: Option<&str>,
    report: &CheckReport,
    colored_output: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text_report(label, report, colored_output),
        OutputFormat::Json => {
            let output = JsonReport {
                file: label,
                report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Html => println!("{}", html_report(label, report)),
    }
    Ok(())
}

pub fn print_error(
    label: Option<&str>,
    error: &CheckError,
    colored_output: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let name = label.unwrap_or("input");
            if colored_output {
                eprintln!(
                    "{} {}: {}",
                    "✗".red().bold(),
                    name.bold(),
                    error.user_message()
                );
                eprintln!("  {}", error.to_string().dimmed());
            } else {
                eprintln!("✗ {}: {}", name, error.user_message());
                eprintln!("  {}", error);
            }
        }
        OutputFormat::Json => {
            let output = JsonError {
                file: label,
                error: error.user_message(),
                status: error.status_code(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Html => {
            println!(
                "<p class=\"error\" data-status=\"{}\">{}</p>",
                error.status_code(),
                escape_html(error.user_message())
            );
        }
    }
    Ok(())
}

fn print_text_report(label: Option<&str>, report: &CheckReport, colored_output: bool) {
    if let Some(name) = label {
        if colored_output {
            println!("\n{}", name.bold().underline());
        } else {
            println!("\n{}", name);
        }
    }

    let summary = format!(
        "Accuracy: {}% ({} {}, {} {})",
        report.accuracy_percent,
        report.word_count,
        plural(report.word_count, "word", "words"),
        report.matches.len(),
        plural(report.matches.len(), "issue", "issues"),
    );
    if colored_output {
        let summary = match report.accuracy_percent {
            90..=100 => summary.green(),
            60..=89 => summary.yellow(),
            _ => summary.red(),
        };
        println!("  {}", summary.bold());
    } else {
        println!("  {}", summary);
    }

    for grammar_match in &report.matches {
        print_match(&report.original_text, grammar_match, colored_output);
    }

    if report.matches.is_empty() {
        return;
    }

    if colored_output {
        println!("\n  {}", "Corrected:".cyan().bold());
    } else {
        println!("\n  Corrected:");
    }
    println!("    {}", render_words(&report.words, colored_output));
}

fn print_match(text: &str, grammar_match: &GrammarMatch, colored_output: bool) {
    let (line, column) = line_column(text, grammar_match.offset);
    let line_info = format!("{}:{}", line, column);
    let flagged: String = text
        .chars()
        .skip(grammar_match.offset)
        .take(grammar_match.length)
        .collect();

    if colored_output {
        println!(
            "  {} {} {}",
            line_info.blue().bold(),
            flagged.red().bold(),
            grammar_match.message
        );
        if let Some(replacement) = grammar_match.replacements.first() {
            println!("    {} {}", "→".dimmed(), replacement.green());
        }
    } else {
        println!("  {} {} {}", line_info, flagged, grammar_match.message);
        if let Some(replacement) = grammar_match.replacements.first() {
            println!("    → {}", replacement);
        }
    }
}

fn render_words(words: &[WordChange], colored_output: bool) -> String {
    words
        .iter()
        .map(|change| {
            if colored_output && change.changed {
                change.word.green().bold().to_string()
            } else {
                change.word.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn html_report(label: Option<&str>, report: &CheckReport) -> String {
    let mut html = String::new();
    if let Some(name) = label {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(name)));
    }
    html.push_str(&format!(
        "<section class=\"highlighted-input\">{}</section>\n",
        report.highlighted_input
    ));
    html.push_str(&format!(
        "<section class=\"highlighted-output\">{}</section>\n",
        report.highlighted_output
    ));
    html.push_str(&format!(
        "<p class=\"accuracy\">Accuracy: {}% ({} {})</p>",
        report.accuracy_percent,
        report.word_count,
        plural(report.word_count, "word", "words")
    ));
    html
}

/// 1-indexed line and column of the character at `offset`.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for ch in text.chars().take(offset) {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

pub fn print_check_summary(total_issues: usize, checked: usize, failed: usize, colored: bool) {
    println!();
    let inputs = plural(checked, "input", "inputs");
    if failed > 0 {
        let message = format!("✗ {} of {} {} could not be checked", failed, checked, inputs);
        if colored {
            println!("{}", message.red().bold());
        } else {
            println!("{}", message);
        }
    }

    if total_issues == 0 {
        if failed == checked {
            return;
        }
        if colored {
            println!("{}", "✓ No grammar issues found!".green().bold());
        } else {
            println!("✓ No grammar issues found!");
        }
    } else {
        let issue_word = plural(total_issues, "issue", "issues");
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_issues.to_string().red().bold(),
                issue_word,
                checked,
                inputs
            );
        } else {
            println!("✗ {} {} found in {} {}", total_issues, issue_word, checked, inputs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CheckReport {
        CheckReport {
            original_text: "helo world".to_string(),
            corrected_text: "hello world".to_string(),
            matches: vec![GrammarMatch::new(0, 4)
                .with_replacement("hello")
                .with_message("Possible spelling mistake found.")],
            words: vec![
                WordChange {
                    word: "hello".to_string(),
                    changed: true,
                },
                WordChange {
                    word: "world".to_string(),
                    changed: false,
                },
            ],
            highlighted_input: "<mark>helo</mark> world".to_string(),
            highlighted_output: "<mark>hello</mark> world".to_string(),
            accuracy_percent: 50,
            word_count: 2,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_payload_fields() {
        let report = report();
        let output = JsonReport {
            file: None,
            report: &report,
        };
        let value = serde_json::to_value(&output).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "accuracy_percent",
                "highlighted_input",
                "highlighted_output",
                "word_count"
            ]
        );
        assert_eq!(value["accuracy_percent"], 50);
    }

    #[test]
    fn test_json_error_payload() {
        let output = JsonError {
            file: Some("notes.txt"),
            error: CheckError::EmptyInput.user_message(),
            status: CheckError::EmptyInput.status_code(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["error"], "Please enter some text.");
        assert_eq!(value["file"], "notes.txt");
    }

    #[test]
    fn test_html_report() {
        let html = html_report(Some("a<b>.txt"), &report());
        assert!(html.contains("<h2>a&lt;b&gt;.txt</h2>"));
        assert!(html.contains("<section class=\"highlighted-input\"><mark>helo</mark> world</section>"));
        assert!(html.contains("Accuracy: 50% (2 words)"));
    }

    #[test]
    fn test_line_column() {
        let text = "first line\nsecond teh";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 6), (1, 7));
        assert_eq!(line_column(text, 18), (2, 8));
    }

    #[test]
    fn test_plain_render_words() {
        assert_eq!(render_words(&report().words, false), "hello world");
    }
}
