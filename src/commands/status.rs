//! Status command handler.
//!
//! Fetches the result document once and prints it, either as the same view
//! the dashboard shows or as normalized JSON.

use crate::cli::SourceArgs;
use crate::config::{load_config, Config};
use crate::counts::counts;
use crate::error::{DashError, Result};
use crate::filter::{FilterTab, TestFilter};
use crate::logging::{init_logging, LogTarget};
use crate::output::{print_view, print_warning, FetchSpinner};
use crate::payload::{parse_body, Challenge, ResultPayload};
use crate::view::select;
use tracing::{debug, warn};

use super::resolve_source;

/// Flags accepted by `harness-dash status`.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub source: SourceArgs,
    pub json: bool,
    pub filter: FilterTab,
    pub search: String,
    pub verbose: bool,
}

/// Fetch, print, and report the verdict through the exit status.
///
/// # Returns
///
/// * `Ok(())` when the result was fetched and the challenge has not failed
/// * `Err(DashError::Transport | Parse)` when the fetch failed
/// * `Err(DashError::ChallengeFailed)` when the finished run failed
pub fn status_command(options: StatusOptions) -> Result<()> {
    if let Err(e) = init_logging(options.verbose, LogTarget::Stderr) {
        print_warning(&format!("Logging disabled: {}", e));
    }

    let mut config = load_config()?;
    if let Some(url) = &options.source.url {
        config.url = url.clone();
    }
    let payload = fetch_payload(&options, &config)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let filter = TestFilter::new(options.filter, options.search.clone());
        print_view(&select(&payload, &filter, &config.render_options()));
    }

    verdict(&payload)
}

fn fetch_payload(options: &StatusOptions, config: &Config) -> Result<ResultPayload> {
    let source = resolve_source(&options.source, config);
    let spinner = FetchSpinner::new(&source.describe());
    let body = source.fetch();
    spinner.finish();

    let payload = body.and_then(|b| parse_body(&b)).inspect_err(|e| {
        warn!(source = %source.describe(), error = %e, "status fetch failed");
    })?;
    debug!(tests = payload.tests.len(), state = payload.state.as_str(), "status fetched");
    Ok(payload)
}

/// A finished run whose challenge failed is an error; everything else,
/// including a run still in progress, is not.
pub fn verdict(payload: &ResultPayload) -> Result<()> {
    if payload.ok && !payload.is_running() && payload.challenge == Challenge::Failed {
        let c = counts(&payload.tests);
        return Err(DashError::ChallengeFailed {
            failed: c.failed,
            total: c.total,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{RunPhase, TestCase, TestStatus};
    use std::fs;
    use tempfile::TempDir;

    fn finished(challenge: Challenge) -> ResultPayload {
        ResultPayload {
            ok: true,
            state: RunPhase::Done,
            challenge,
            tests: vec![
                TestCase::new("a", TestStatus::Passed, ""),
                TestCase::new("b", TestStatus::Failed, ""),
            ],
            ..ResultPayload::default()
        }
    }

    #[test]
    fn test_verdict_failed_challenge() {
        let err = verdict(&finished(Challenge::Failed)).unwrap_err();
        assert!(matches!(err, DashError::ChallengeFailed { failed: 1, total: 2 }));
    }

    #[test]
    fn test_verdict_passes_otherwise() {
        assert!(verdict(&finished(Challenge::Passed)).is_ok());
        assert!(verdict(&finished(Challenge::Undecided)).is_ok());
        assert!(verdict(&ResultPayload::default()).is_ok());

        let mut running = finished(Challenge::Failed);
        running.state = RunPhase::Running;
        assert!(verdict(&running).is_ok());
    }

    #[test]
    fn test_fetch_payload_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        fs::write(&path, r#"{"ok": 1, "state": "done", "tests": [{"status": "passed"}]}"#).unwrap();

        let options = StatusOptions {
            source: SourceArgs {
                url: None,
                file: Some(path),
            },
            ..StatusOptions::default()
        };
        let payload = fetch_payload(&options, &Config::default()).unwrap();
        assert!(payload.ok);
        assert_eq!(payload.tests.len(), 1);
    }

    #[test]
    fn test_fetch_payload_invalid_body() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.json");
        fs::write(&path, "Bad Gateway").unwrap();

        let options = StatusOptions {
            source: SourceArgs {
                url: None,
                file: Some(path),
            },
            ..StatusOptions::default()
        };
        let err = fetch_payload(&options, &Config::default()).unwrap_err();
        assert!(matches!(err, DashError::Parse(_)));
        assert_eq!(err.to_string(), "Bad Gateway");
    }
}
