use crate::OutputFormat;
use crate::commands::TranscriptionArgs;
use anyhow::{Context, Result};
use quizchain_core::{AnswerCandidate, AssetKind, DownloadedAsset};
use quizchain_detectors::AnswerPipeline;
use quizchain_fetch::RemoteTranscriber;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Run the derivation pipeline over a saved page text and local asset files
pub fn derive_from_files(
    text_file: &Path,
    assets: &[PathBuf],
    transcription: &TranscriptionArgs,
) -> Result<AnswerCandidate> {
    let text = std::fs::read_to_string(text_file)
        .with_context(|| format!("Failed to read {}", text_file.display()))?;

    let assets = assets
        .iter()
        .map(|path| load_asset(path))
        .collect::<Result<Vec<_>>>()?;

    let mut pipeline = AnswerPipeline::standard();
    if let Some(config) = transcription.to_config() {
        pipeline = pipeline.with_transcriber(Arc::new(RemoteTranscriber::new(
            &config.base_url,
            config.api_key,
            config.model,
        )));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(pipeline.derive(&text, &assets)))
}

fn load_asset(path: &Path) -> Result<DownloadedAsset> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read asset {}", path.display()))?;
    let source = path.to_string_lossy().to_string();
    let kind = AssetKind::classify(&source, None);
    tracing::debug!("Loaded {} asset {} ({} bytes)", kind, source, bytes.len());
    Ok(DownloadedAsset::new(kind, source, bytes))
}

pub fn execute(
    text_file: &Path,
    assets: &[PathBuf],
    transcription: &TranscriptionArgs,
    format: OutputFormat,
) -> Result<()> {
    let candidate = derive_from_files(text_file, assets, transcription)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&candidate)?),
        OutputFormat::Pretty => {
            use console::style;

            println!("{} {}", style("Answer:").bold(), candidate.value.to_json());
            println!("{} {}", style("Method:").bold(), style(candidate.method).cyan());
            for (key, value) in &candidate.metadata {
                println!("  {} {}", style(format!("{key}:")).dim(), value);
            }
        }
    }

    Ok(())
}
