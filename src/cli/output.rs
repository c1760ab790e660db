//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{OutputFormat, TermscanArgs};
use crate::error::Result;

/// Result structure for term extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResults {
    pub matches: Vec<Value>,
    pub total_matches: usize,
    pub duration_ms: u64,
}

/// Result structure for saving an extractor.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResult {
    pub path: String,
    pub terms: usize,
    pub default_threshold: f64,
    pub language: String,
}

/// Supported languages.
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageList {
    pub languages: Vec<String>,
    pub default: String,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &TermscanArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
        OutputFormat::Jsonl => output_jsonl(result),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &TermscanArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    match value.get("matches").and_then(Value::as_array) {
        Some(matches) => output_matches_human(matches, &value, args),
        None => output_generic_human(&value),
    }
    Ok(())
}

fn output_matches_human(matches: &[Value], value: &Value, args: &TermscanArgs) {
    for found in matches {
        println!("{}", format_match(found));
    }

    if args.verbosity() > 0 {
        println!();
        if let Some(total) = value.get("total_matches").and_then(Value::as_u64) {
            println!("Total matches: {total}");
        }
        if let Some(duration) = value.get("duration_ms").and_then(Value::as_u64) {
            println!("Extraction time: {duration}ms");
        }
    }
}

fn output_generic_human(value: &Value) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TermscanArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Output in JSON lines format: one line per match, or the whole result.
fn output_jsonl<T: Serialize>(result: &T) -> Result<()> {
    for line in jsonl_lines(&serde_json::to_value(result)?)? {
        println!("{line}");
    }
    Ok(())
}

fn jsonl_lines(value: &Value) -> Result<Vec<String>> {
    match value.get("matches").and_then(Value::as_array) {
        Some(matches) => matches
            .iter()
            .map(|found| Ok(serde_json::to_string(found)?))
            .collect(),
        None => Ok(vec![serde_json::to_string(value)?]),
    }
}

/// One line describing a match: span, score, term and matched text.
fn format_match(found: &Value) -> String {
    let field = |key: &str| found.get(key).map(format_value).unwrap_or_default();
    let score = found.get("score").and_then(Value::as_f64).unwrap_or(0.0);

    format!(
        "{:>12}  {score:.3}  {}  <- {:?}",
        format!("{}..{}", field("begin"), field("end")),
        field("term"),
        field("token")
    )
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("test")), "test");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(false)), "false");
        assert_eq!(format_value(&json!(["czech", "english"])), "[czech, english]");
        assert_eq!(format_value(&json!({"a": 1})), "[object]");
        assert_eq!(format_value(&Value::Null), "null");
    }

    #[test]
    fn test_format_match() {
        let found = json!({
            "term": "Kryten",
            "begin": 11,
            "end": 17,
            "score": 1.0,
            "token": "Kryten",
            "record": {"_type": "json"}
        });
        assert_eq!(
            format_match(&found),
            "      11..17  1.000  Kryten  <- \"Kryten\""
        );
    }

    #[test]
    fn test_jsonl_lines() {
        let results = ExtractionResults {
            matches: vec![json!({"term": "Cat"}), json!({"term": "Holly"})],
            total_matches: 2,
            duration_ms: 0,
        };
        let lines = jsonl_lines(&serde_json::to_value(&results).unwrap()).unwrap();
        assert_eq!(lines, vec![r#"{"term":"Cat"}"#, r#"{"term":"Holly"}"#]);

        let languages = LanguageList {
            languages: vec!["english".to_string()],
            default: "english".to_string(),
        };
        let lines = jsonl_lines(&serde_json::to_value(&languages).unwrap()).unwrap();
        assert_eq!(lines, vec![r#"{"languages":["english"],"default":"english"}"#]);
    }
}
