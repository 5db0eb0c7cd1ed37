use crate::infra::tone_service;
use clap::{ArgGroup, Args};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tone_guard::config::AppConfig;
use tone_guard::error::AppError;
use tone_guard::telemetry;
use tone_guard::ToneService;
use tracing::warn;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "file", "jsonl"])))]
pub(crate) struct AnalyzeArgs {
    /// Text to analyze
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// Analyze the whole contents of a file as one message
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Analyze every record of a JSON-lines file
    #[arg(long)]
    pub(crate) jsonl: Option<PathBuf>,
    /// Field holding the message in each JSON-lines record
    #[arg(long, default_value = "text")]
    pub(crate) text_field: String,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RewriteArgs {
    /// Message to rewrite
    #[arg(long)]
    pub(crate) text: String,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let inputs = read_inputs(&args)?;

    let pretty = args.pretty;

    tokio::task::spawn_blocking(move || -> Result<(), AppError> {
        for text in &inputs {
            let analysis = service.analyze(text)?;
            println!("{}", render(&analysis, pretty)?);
        }
        Ok(())
    })
    .await?
}

pub(crate) async fn run_rewrite(args: RewriteArgs) -> Result<(), AppError> {
    let service = load_service()?;
    let RewriteArgs { text, pretty } = args;

    let outcome =
        tokio::task::spawn_blocking(move || service.run_rewrite_session(&text)).await??;

    println!("{}", render(&outcome, pretty)?);
    Ok(())
}

fn load_service() -> Result<ToneService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(tone_service(&config))
}

fn read_inputs(args: &AnalyzeArgs) -> Result<Vec<String>, AppError> {
    if let Some(text) = &args.text {
        return Ok(vec![text.clone()]);
    }
    if let Some(path) = &args.file {
        return Ok(vec![std::fs::read_to_string(path)?]);
    }
    if let Some(path) = &args.jsonl {
        let raw = std::fs::read_to_string(path)?;
        return parse_jsonl(&raw, &args.text_field);
    }
    Ok(Vec::new())
}

/// One message per non-blank line, taken from `field` of each JSON object. Records without
/// a string `field` are skipped.
fn parse_jsonl(raw: &str, field: &str) -> Result<Vec<String>, AppError> {
    let mut inputs = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(line)?;
        match record.get(field).and_then(Value::as_str) {
            Some(text) => inputs.push(text.to_string()),
            None => warn!(line = index + 1, field, "skipping record without a string field"),
        }
    }
    Ok(inputs)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn jsonl_reads_the_configured_field_and_skips_blank_lines() {
        let raw = "{\"id\": 1, \"body\": \"first\"}\n\n{\"id\": 2, \"body\": \"second\"}\n";

        let inputs = parse_jsonl(raw, "body").expect("parses");

        assert_eq!(inputs, vec!["first", "second"]);
    }

    #[test]
    fn jsonl_skips_records_without_a_string_field() {
        let raw = "{\"text\":\"first\"}\n{\"meta\":1}\n{\"text\":5}\n{\"text\":\"second\"}\n";

        let inputs = parse_jsonl(raw, "text").expect("parses");

        assert_eq!(inputs, vec!["first", "second"]);
    }

    #[test]
    fn jsonl_rejects_invalid_json() {
        let err = parse_jsonl("not json", "text").expect_err("invalid json rejected");
        assert!(matches!(err, AppError::Json(_)));
    }

    #[test]
    fn inline_text_is_a_single_input() {
        let args = AnalyzeArgs {
            text: Some("Thanks!".to_string()),
            file: None,
            jsonl: None,
            text_field: "text".to_string(),
            pretty: false,
        };

        assert_eq!(read_inputs(&args).expect("reads"), vec!["Thanks!"]);
    }

    #[test]
    fn pretty_output_spans_lines() {
        let value = json!({ "verdict": "very polite" });
        assert_eq!(render(&value, false).expect("renders"), "{\"verdict\":\"very polite\"}");
        assert!(render(&value, true).expect("renders").contains('\n'));
    }
}
