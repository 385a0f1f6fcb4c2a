//! Command entry points. Each returns `Result<_, AppError>`; printing the
//! failure and choosing the exit code is left to `main`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use serde_json::Value;
use tracing::{debug, info};

use crate::document::load_document;
use crate::errors::AppError;
use crate::output::OutputSink;
use crate::render::{
    format_timestamp, render_to_file, LopdfBackend, PdfBackend, RenderedFile, ResumeLayout,
};
use crate::validation::{validate, Profile, ValidationReport, ValidationSummary};

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub data: PathBuf,
    pub profile: Profile,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub data: PathBuf,
    pub output: PathBuf,
    pub timeout: Duration,
    pub validate_first: bool,
    pub profile: Profile,
}

pub fn run_validate(opts: &ValidateOptions, sink: &dyn OutputSink) -> Result<ValidationSummary, AppError> {
    sink.banner("Resume Validation");
    let document = load(&opts.data, sink)?;

    match check(&document, opts.profile, sink) {
        Ok(summary) => {
            if opts.json {
                print_report(&ValidationReport::passed(opts.profile.as_str()))?;
            }
            Ok(summary)
        }
        Err(AppError::Validation(err)) => {
            if opts.json {
                print_report(&ValidationReport::failed(opts.profile.as_str(), &err))?;
            }
            Err(AppError::Validation(err))
        }
        Err(other) => Err(other),
    }
}

pub async fn run_generate(opts: &GenerateOptions, sink: &dyn OutputSink) -> Result<RenderedFile, AppError> {
    generate_with(opts, &LopdfBackend, sink).await
}

async fn generate_with(
    opts: &GenerateOptions,
    backend: &dyn PdfBackend,
    sink: &dyn OutputSink,
) -> Result<RenderedFile, AppError> {
    sink.banner("Resume PDF Generation");
    let document = load(&opts.data, sink)?;

    if opts.validate_first {
        check(&document, opts.profile, sink)?;
    }

    sink.info("Mapping resume data onto the page layout...");
    let layout = ResumeLayout::from_document(&document, format_timestamp(Local::now()))?;
    if layout.is_empty() {
        sink.warning("Experience, education and skills are all empty; the PDF will only contain the header");
    }
    debug!(
        experience = layout.experience.len(),
        education = layout.education.len(),
        skills = layout.skills.len(),
        "Layout mapped"
    );

    let rendered = render_to_file(&layout, backend, &opts.output, opts.timeout, sink).await?;
    sink.success("Resume PDF generated successfully!");
    Ok(rendered)
}

fn load(path: &Path, sink: &dyn OutputSink) -> Result<Value, AppError> {
    sink.info(&format!("Loading resume from: {}", path.display()));
    let document = load_document(path)?;
    sink.success("Resume loaded successfully");
    Ok(document)
}

fn check(document: &Value, profile: Profile, sink: &dyn OutputSink) -> Result<ValidationSummary, AppError> {
    let rules = profile.rule_set()?;
    let summary = validate(document, &rules, sink)?;
    info!(profile = %profile, sections = summary.sections.len(), "Validation passed");
    Ok(summary)
}

fn print_report(report: &ValidationReport) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialise report: {e}")))?;
    println!("{json}");
    Ok(())
}
