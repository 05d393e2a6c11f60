//! Schema command handler

use anyhow::Result;

use remodel_core::Schema;

use crate::output::Output;

/// Show registered entity types
pub fn show(schema: &Schema, output: &Output) -> Result<()> {
    output.print_schema(schema);
    Ok(())
}
