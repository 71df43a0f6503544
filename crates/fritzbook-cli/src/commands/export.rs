use crate::commands::{collect, listing_source, print_json, Context, RunReport};
use anyhow::{Context as _, Result};
use fritzbook_sync::xml;
use std::path::PathBuf;

#[derive(Debug)]
pub struct ExportArgs {
    pub path: PathBuf,
}

pub fn export(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let source = listing_source(ctx)?;
    let (harvest, collection) = collect(ctx, &source)?;
    xml::write_document_to(&args.path, &collection)
        .with_context(|| format!("write phonebook file {}", args.path.display()))?;

    if ctx.json {
        print_json(&RunReport::new(&harvest, args.path.display().to_string()))?;
    } else {
        println!(
            "Wrote {} contacts to {}",
            collection.contact_count(),
            args.path.display()
        );
    }
    Ok(())
}
