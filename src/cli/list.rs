//! `pkgwire list` command implementation
//!
//! Lists the packages catalogued in the local store.

use crate::cli::output_format::OutputFormat;
use crate::cli::output_types::{CommandOutput, ListOutput, ListPackageInfo};
use crate::cli::Context;
use crate::error::Result;
use crate::packages::store::{CatalogStore, PackageStore};
use crate::utils::output::print_package;
use clap::Args;

#[derive(Args)]
#[command(after_help = "\
Examples:
  pkgwire list                            List packages in the default store
  pkgwire --store ./vendor list           List packages in another store")]
pub struct ListArgs {
    /// Output format: human (default) or json
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn execute(args: &ListArgs, ctx: &Context) -> Result<()> {
    let store = CatalogStore::new(&ctx.store);
    let records = store.list()?;

    let output = ListOutput {
        store: store.root().to_path_buf(),
        count: records.len(),
        packages: records.iter().map(ListPackageInfo::from).collect(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", output.to_json()),
        OutputFormat::Human => {
            if output.packages.is_empty() {
                println!(
                    "{}",
                    ctx.messages
                        .format("LIST_EMPTY_FMT", &[output.store.display().to_string()])
                );
            }
            for p in &output.packages {
                print_package(&ctx.messages.format(
                    "LIST_ENTRY_FMT",
                    &[p.name.clone(), p.version.clone(), p.author.clone()],
                ));
            }
        }
    }
    Ok(())
}
