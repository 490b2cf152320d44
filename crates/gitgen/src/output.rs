use libgitgen_core::GenError;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::Cli;

/// `--json` output, on stdout for results and stderr for errors
#[derive(Serialize)]
struct Envelope<T: Serialize> {
    schema_version: u32,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

/// Print a result: the envelope with `--json`, else `human(data)` unless quiet
pub fn report<T, F>(cli: &Cli, data: &T, human: F) -> Result<(), GenError>
where
    T: Serialize,
    F: FnOnce(&T) -> Result<String, GenError>,
{
    if cli.json {
        let envelope = Envelope {
            schema_version: 1,
            ok: true,
            data: Some(data),
            error: None,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !cli.quiet {
        println!("{}", human(data)?);
    }
    Ok(())
}

/// Event log errors carry their line so tools can point at the entry
fn error_details(err: &GenError) -> Value {
    let mut details = Map::new();
    if let GenError::EventLog(e) = err {
        details.insert("line".to_string(), e.line.into());
    }
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        details.insert("suggestions".to_string(), suggestions.into());
    }
    if details.is_empty() {
        Value::Null
    } else {
        Value::Object(details)
    }
}

pub fn report_error(cli: &Cli, err: &GenError) {
    if cli.json {
        let envelope: Envelope<()> = Envelope {
            schema_version: 1,
            ok: false,
            data: None,
            error: Some(ErrorBody {
                code: err.error_code(),
                message: err.to_string(),
                details: error_details(err),
            }),
        };
        match serde_json::to_string_pretty(&envelope) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("error: {}", err),
        }
        return;
    }

    match (err, &cli.file) {
        (GenError::EventLog(_), Some(file)) => eprintln!("error: {}: {}", file.display(), err),
        _ => eprintln!("error: {}", err),
    }
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        eprintln!();
        eprintln!("Suggestions:");
        for suggestion in suggestions {
            eprintln!("  - {}", suggestion);
        }
    }
}
