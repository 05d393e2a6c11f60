//! Delete command handler

use anyhow::{bail, Result};
use serde_json::Value;

use remodel_core::{DestroyOptions, Outcome, Record, Syncer, Transport};

use super::resolve_entity;
use crate::output::Output;

/// Fetch the record, then destroy it
///
/// With `force`, a failed fetch does not stop the delete and the local copy
/// goes away whatever the server answers.
pub async fn delete<T: Transport>(
    syncer: &mut Syncer<T>,
    entity: &str,
    id: i64,
    force: bool,
    output: &Output,
) -> Result<()> {
    let entity = resolve_entity(syncer.schema(), entity)?;
    let name = syncer.schema().entity(entity).name().to_string();

    let mut record = syncer
        .store()
        .find_by_id(entity, id)
        .cloned()
        .unwrap_or_else(|| Record::new(entity).with("id", id));
    let fetched = syncer.fetch_one(&mut record, None, &Value::Null).await?;
    if let Outcome::Empty(reason) = &fetched {
        if !force {
            bail!("Could not fetch {} {}: {}", name, id, reason);
        }
    }

    let options = DestroyOptions {
        params: None,
        force,
    };
    let destroyed = syncer.destroy(&record, options).await?;
    if !destroyed.is_success() && !force {
        match destroyed.status {
            Some(status) => bail!("Server refused to delete {} {} (status {})", name, id, status),
            None => bail!("Delete request for {} {} failed", name, id),
        }
    }

    output.success(&format!("Deleted {} {}", name, id));
    Ok(())
}
