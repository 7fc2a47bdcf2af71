//! Command line surface over the gateway, upload validation and reports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::common::config::ScanCfg;
use crate::common::error::ScanError;
use crate::inference::{Gateway, Label, PredictionResult, Simulator};
use crate::report;
use crate::upload;

/// Exit status for failures that carry no [`ScanError`].
pub const EXIT_INTERNAL: u8 = 70;

#[derive(Parser, Debug)]
#[command(name = "neuroscan", author, version, about = "Brain MRI tumor classification client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a JPEG or PNG MRI scan
    Analyze {
        /// Image to upload (max 10 MiB)
        path: PathBuf,
        /// Print the raw result and summary as JSON
        #[arg(long)]
        json: bool,
        /// Inference backend base URL, overriding NEUROSCAN_API_URL
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Draw results from the demo simulator
    Simulate {
        /// Number of results to draw
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Skip the artificial inference delay
        #[arg(long)]
        no_delay: bool,
        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List the classification labels
    Labels,
}

/// Execute a parsed command against a loaded configuration.
pub async fn run(cli: Cli, cfg: ScanCfg) -> Result<()> {
    match cli.command {
        Command::Analyze {
            path,
            json,
            api_url,
        } => {
            let cfg = match api_url {
                Some(url) => cfg.with_api_url(Some(url)),
                None => cfg,
            };
            analyze(&cfg, path, json).await
        }
        Command::Simulate {
            count,
            no_delay,
            json,
        } => {
            let simulator = if no_delay {
                Simulator::instant()
            } else {
                Simulator::new(cfg.demo_latency)
            };
            simulate(simulator, count, json).await
        }
        Command::Labels => {
            for label in Label::ALL {
                println!("{:<12} {}", label.as_str(), label.display_name());
            }
            Ok(())
        }
    }
}

async fn analyze(cfg: &ScanCfg, path: PathBuf, as_json: bool) -> Result<()> {
    let image = upload::load_image(&path)
        .with_context(|| format!("cannot use {} as an MRI scan", path.display()))?;
    let gateway = Gateway::from_config(cfg)?;
    if gateway.is_demo() {
        eprintln!("Demo mode: results are simulated. Set NEUROSCAN_API_URL to use a backend.");
    }

    let result = gateway
        .predict(&image)
        .await
        .context("Analysis failed. Make sure the backend is running.")?;
    print_result(&result, as_json)
}

async fn simulate(simulator: Simulator, count: usize, as_json: bool) -> Result<()> {
    for idx in 0..count {
        let result = simulator.simulate().await;
        if as_json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            if idx > 0 {
                println!("---");
            }
            print!("{}", report::render_text(&report::summarize(&result)));
        }
    }
    Ok(())
}

fn print_result(result: &PredictionResult, as_json: bool) -> Result<()> {
    let summary = report::summarize(result);
    if as_json {
        let doc = json!({ "result": result, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", report::render_text(&summary));
    }
    Ok(())
}

/// Process exit status for a failed command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ScanError>()
        .map(|e| e.code().as_u32() as u8)
        .unwrap_or(EXIT_INTERNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ScanCode;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "neuroscan",
            "analyze",
            "scan.png",
            "--json",
            "--api-url",
            "http://localhost:8000",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze {
                path,
                json,
                api_url,
            } => {
                assert_eq!(path, PathBuf::from("scan.png"));
                assert!(json);
                assert_eq!(api_url.as_deref(), Some("http://localhost:8000"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn simulate_defaults_to_one_draw() {
        let cli = Cli::try_parse_from(["neuroscan", "simulate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Simulate {
                count: 1,
                no_delay: false,
                json: false
            }
        ));
    }

    #[test]
    fn exit_codes_follow_scan_codes() {
        let err = anyhow::Error::new(ScanError::prediction_failed("status 500"))
            .context("Analysis failed.");
        assert_eq!(exit_code(&err), ScanCode::PredictionFailed as u8);

        let err = anyhow::Error::new(ScanError::FileTooLarge { size: 2, limit: 1 });
        assert_eq!(exit_code(&err), ScanCode::FileTooLarge as u8);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), EXIT_INTERNAL);
    }

    #[tokio::test]
    async fn analyze_rejects_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let cli = Cli::try_parse_from(["neuroscan", "analyze", path.to_str().unwrap()]).unwrap();
        let err = run(cli, ScanCfg::default()).await.unwrap_err();
        assert_eq!(exit_code(&err), ScanCode::UnsupportedMediaType as u8);
    }

    #[tokio::test]
    async fn analyze_in_demo_mode_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let cfg = ScanCfg {
            demo_latency: std::time::Duration::ZERO,
            ..ScanCfg::default()
        };
        let cli = Cli::try_parse_from(["neuroscan", "analyze", path.to_str().unwrap(), "--json"])
            .unwrap();
        run(cli, cfg).await.unwrap();
    }
}
