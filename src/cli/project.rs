//! `pkgwire project` command implementation
//!
//! Shows how the project at the current directory was resolved.

use crate::cli::output_format::OutputFormat;
use crate::cli::output_types::{CommandOutput, ProjectOutput};
use crate::cli::{project_dir, Context};
use crate::error::Result;
use crate::project;
use crate::utils::output::print_project;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Output format: human (default) or json
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn execute(args: &ProjectArgs, ctx: &Context) -> Result<()> {
    let project = project::resolve(&project_dir(args.project.as_ref())?)?;
    let output = ProjectOutput::from(&project);

    match args.format {
        OutputFormat::Json => println!("{}", output.to_json()),
        OutputFormat::Human => {
            let m = &ctx.messages;
            print_project(&m.format("PROJECT_PATH_FMT", &[output.path.display().to_string()]));
            print_project(&m.format("PROJECT_TYPE_FMT", &[output.kind.clone()]));
            print_project(&m.format(
                "PROJECT_CLASSES_FMT",
                &[output.classes_dir.display().to_string()],
            ));
            if output.platforms.is_empty() {
                print_project(m.get("PROJECT_NO_PLATFORMS"));
            } else {
                print_project(&m.format("PROJECT_PLATFORMS_FMT", &[output.platforms.join(", ")]));
            }
        }
    }
    Ok(())
}
