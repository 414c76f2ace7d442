//! `pkgwire add` command implementation
//!
//! Installs a package from the local store into the project at the current
//! directory: unpacks it under `packages/` and runs its install manifest.

use crate::cli::output_format::OutputFormat;
use crate::cli::output_types::{AddOutput, CommandOutput, ErrorOutput};
use crate::cli::{project_dir, Context};
use crate::error::codes::exit_code;
use crate::error::{Error, Result};
use crate::i18n::Messages;
use crate::packages::installer::{install, Reporter, SilentReporter};
use crate::packages::report::{StepOutcome, StepReport};
use crate::packages::store::{CatalogStore, PackageRecord};
use crate::project::Project;
use crate::utils::output::{print_package, print_project, print_success};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Args)]
#[command(after_help = "\
Examples:
  pkgwire add spine                       Install into the project in the current dir
  pkgwire add spine --project ../MyGame   Install into another project
  pkgwire add spine --format json         Machine-readable step report")]
pub struct AddArgs {
    /// Package name, as catalogued in the store
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Output format: human (default) or json
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn execute(args: &AddArgs, ctx: &Context) -> Result<()> {
    let cwd = project_dir(args.project.as_ref())?;
    let store = CatalogStore::new(&ctx.store);

    let outcome = match args.format {
        OutputFormat::Human => {
            let mut reporter = ConsoleReporter::new(&ctx.messages);
            install(&cwd, &args.package, &store, &mut reporter)
        }
        OutputFormat::Json => install(&cwd, &args.package, &store, &mut SilentReporter),
    };

    match outcome {
        Ok(result) => {
            match args.format {
                OutputFormat::Json => println!("{}", AddOutput::from_result(&result, None).to_json()),
                OutputFormat::Human => print_success(&ctx.messages.format(
                    "PACKAGE_INSTALLED_FMT",
                    &[
                        result.package.clone(),
                        result.version.clone(),
                        result.written_files().len().to_string(),
                    ],
                )),
            }
            Ok(())
        }
        Err(e) => {
            if args.format.is_machine_readable() {
                println!("{}", failure_json(&ctx.messages, &args.package, &e));
            }
            Err(e)
        }
    }
}

/// JSON body for a failed install: the partial step report when steps ran,
/// otherwise a bare error object.
fn failure_json(messages: &Messages, package: &str, err: &Error) -> String {
    match err {
        Error::InstallAborted { source, partial, .. } => {
            AddOutput::from_result(partial, Some(source.to_string())).to_json()
        }
        other => ErrorOutput::new(
            "add",
            Some(package),
            messages.format(other.message_key(), &other.message_args()),
            exit_code(other),
        )
        .to_json(),
    }
}

/// Prints install progress as it happens.
pub struct ConsoleReporter<'m> {
    messages: &'m Messages,
}

impl<'m> ConsoleReporter<'m> {
    pub fn new(messages: &'m Messages) -> Self {
        Self { messages }
    }

    /// Localized one-line summary of a finished step.
    pub fn step_line(messages: &Messages, report: &StepReport) -> String {
        let mut args = vec![report.index.to_string(), report.kind.to_string()];
        let key = match &report.outcome {
            StepOutcome::Applied { .. } => "STEP_APPLIED_FMT",
            StepOutcome::Unchanged => "STEP_UNCHANGED_FMT",
            StepOutcome::Skipped { platform } => {
                args.push(platform.to_string());
                "STEP_SKIPPED_FMT"
            }
            StepOutcome::Failed { .. } => "STEP_FAILED_FMT",
            StepOutcome::NotAttempted => "STEP_NOT_ATTEMPTED_FMT",
        };
        messages.format(key, &args)
    }
}

impl Reporter for ConsoleReporter<'_> {
    fn project_resolved(&mut self, project: &Project) {
        print_project(&self.messages.format(
            "PROJECT_PATH_FMT",
            &[project.path.display().to_string()],
        ));
        print_project(&self.messages.format("PROJECT_TYPE_FMT", &[project.kind.to_string()]));
    }

    fn adding(&mut self, record: &PackageRecord) {
        print_package(&self.messages.format(
            "PACKAGE_ADDING_FMT",
            &[
                record.name.clone(),
                record.version.clone(),
                record.author.clone(),
            ],
        ));
    }

    fn unpacked(&mut self, package_root: &Path, files: &[PathBuf]) {
        print_package(&self.messages.format(
            "PACKAGE_UNPACKED_FMT",
            &[files.len().to_string(), package_root.display().to_string()],
        ));
    }

    fn step_finished(&mut self, report: &StepReport) {
        let line = Self::step_line(self.messages, report);
        match report.outcome {
            StepOutcome::Applied { .. } => println!("{}", line.green()),
            StepOutcome::Failed { .. } => println!("{}", line.red()),
            _ => println!("{}", line.dimmed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Platform;

    fn report(outcome: StepOutcome) -> StepReport {
        StepReport {
            index: 2,
            kind: "copy-file",
            outcome,
        }
    }

    #[test]
    fn test_step_lines() {
        let messages = Messages::default();
        assert_eq!(
            ConsoleReporter::step_line(&messages, &report(StepOutcome::Unchanged)),
            "  step 2 (copy-file): already up to date"
        );
        assert_eq!(
            ConsoleReporter::step_line(
                &messages,
                &report(StepOutcome::Skipped {
                    platform: Platform::Win32
                })
            ),
            "  step 2 (copy-file): skipped, project has no win32 platform"
        );
        assert_eq!(
            ConsoleReporter::step_line(&messages, &report(StepOutcome::NotAttempted)),
            "  step 2 (copy-file): not attempted"
        );
    }

    #[test]
    fn test_failure_json_before_any_step() {
        let err = Error::PackageNotFound {
            name: "nope".into(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&failure_json(&Messages::default(), "nope", &err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["package"], "nope");
        assert_eq!(json["exit_code"], 3);
        assert!(json["error"].as_str().unwrap().contains("'nope'"));
    }
}
