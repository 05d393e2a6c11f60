//! Create command handler

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use remodel_core::{Outcome, Record, SaveOptions, Syncer, Transport};

use super::resolve_entity;
use crate::output::Output;

/// Wrap a JSON object from a file into a new record and save it remotely
pub async fn create<T: Transport>(
    syncer: &mut Syncer<T>,
    entity: &str,
    file: &Path,
    output: &Output,
) -> Result<()> {
    let entity = resolve_entity(syncer.schema(), entity)?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {:?}", file))?;
    let json: Value =
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", file))?;
    if !json.is_object() {
        bail!("{:?} must contain a JSON object", file);
    }

    let mut record = Record::new(entity);
    let issues = syncer.wrap(&mut record, &json)?;
    output.print_issues(&issues);

    let saved = syncer.save(&mut record, SaveOptions::default()).await?;
    match saved.outcome {
        Outcome::Empty(reason) => bail!("Create failed: {}", reason),
        outcome => {
            output.print_issues(outcome.issues());
            let name = syncer.schema().entity(entity).name();
            match record.id() {
                Some(id) => output.success(&format!("Created {} {}", name, id)),
                None => output.success(&format!("Created {}", name)),
            }
        }
    }
    Ok(())
}
