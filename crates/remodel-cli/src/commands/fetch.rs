//! Fetch command handlers

use anyhow::Result;
use serde_json::Value;

use remodel_core::{Outcome, Record, Syncer, Transport};

use super::resolve_entity;
use crate::output::Output;

/// Fetch a collection (or the given location) and print what came back
pub async fn fetch<T: Transport>(
    syncer: &mut Syncer<T>,
    entity: &str,
    location: Option<&str>,
    params: Vec<(String, String)>,
    output: &Output,
) -> Result<()> {
    let entity = resolve_entity(syncer.schema(), entity)?;
    let params = Value::Object(
        params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    );

    let outcome = syncer.fetch(entity, location, &params).await?;
    if let Outcome::Empty(reason) = &outcome {
        output.print_empty(reason);
        return Ok(());
    }

    output.print_issues(outcome.issues());
    output.print_records(syncer.schema(), syncer.store(), &outcome.records())
}

/// Fetch one record by id
pub async fn get<T: Transport>(
    syncer: &mut Syncer<T>,
    entity: &str,
    id: i64,
    output: &Output,
) -> Result<()> {
    let entity = resolve_entity(syncer.schema(), entity)?;
    let mut record = syncer
        .store()
        .find_by_id(entity, id)
        .cloned()
        .unwrap_or_else(|| Record::new(entity).with("id", id));

    let outcome = syncer.fetch_one(&mut record, None, &Value::Null).await?;
    match &outcome {
        Outcome::Empty(reason) => output.print_empty(reason),
        _ => {
            output.print_issues(outcome.issues());
            output.print_records(syncer.schema(), syncer.store(), &[&record])?;
        }
    }
    Ok(())
}
