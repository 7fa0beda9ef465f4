use crate::OutputFormat;
use crate::commands::TranscriptionArgs;
use anyhow::{Result, bail};
use quizchain_engine::{EngineConfig, SolveReport, SolveRequest, solve_with_report};
use std::path::PathBuf;

/// Everything the `solve` subcommand needs
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub request: SolveRequest,
    pub expected_secret: Option<String>,
    pub timeout_secs: u64,
    pub dump_dir: Option<PathBuf>,
    pub dump: bool,
    pub chrome_path: Option<PathBuf>,
    pub visible: bool,
    pub transcription: TranscriptionArgs,
}

impl SolveOptions {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default().with_timeout_secs(self.timeout_secs);
        config.headless = !self.visible;
        config.chrome_path = self.chrome_path.clone();
        config.dump_dir = match (&self.dump_dir, self.dump) {
            (Some(dir), _) => Some(dir.clone()),
            (None, true) => Some(EngineConfig::default_dump_dir()),
            (None, false) => None,
        };
        config.transcription = self.transcription.to_config();
        config
    }
}

pub fn execute(options: SolveOptions, format: OutputFormat) -> Result<()> {
    if let Err(rejection) = options
        .request
        .validate(options.expected_secret.as_deref())
    {
        bail!("Request rejected: {}", rejection);
    }

    let config = options.engine_config();
    let request = &options.request;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(solve_with_report(
        &config,
        &request.url,
        &request.email,
        &request.secret,
    ))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report.to_response_json())?
        ),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &SolveReport) {
    use console::style;

    println!("\n{}", style("Quiz Chain").bold().cyan());
    println!("{}", style("==========").cyan());

    for (i, result) in report.results.iter().enumerate() {
        println!("\n{} {}", style(format!("{}.", i + 1)).bold(), result.url);

        match &result.derived {
            Some(candidate) => println!(
                "  {} {} {}",
                style("answer").dim(),
                candidate.value.to_json(),
                style(format!("({})", candidate.method)).dim()
            ),
            None => println!("  {}", style("no answer derived").yellow()),
        }

        match &result.submit_url {
            Some(url) => println!("  {} {}", style("submitted to").dim(), url),
            None => println!("  {}", style("not submitted").yellow()),
        }
        println!("  {} {}", style("response").dim(), result.submit_response.to_json());
    }

    println!(
        "\n{} {:?} after {:.1}s",
        style("Stopped:").bold(),
        report.stop_reason,
        report.elapsed_seconds
    );
}
