//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde_json::{json, Value};

use remodel_core::{build_payload, EmptyReason, MemoryStore, Record, RelationIssue, Schema};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print records, JSON mode uses the outbound payload of each
    pub fn print_records(&self, schema: &Schema, store: &MemoryStore, records: &[&Record]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No records found.");
                    return Ok(());
                }
                for record in records {
                    print!("{}", describe(schema, record));
                }
                println!("\n{} record(s)", records.len());
            }
            OutputFormat::Json => {
                let payloads = records
                    .iter()
                    .map(|record| build_payload(schema, store, record))
                    .collect::<Result<Vec<_>, _>>()?;
                println!("{:#}", Value::Array(payloads));
            }
            OutputFormat::Quiet => {
                for record in records {
                    if let Some(id) = record.id() {
                        println!("{}", id);
                    }
                }
            }
        }
        Ok(())
    }

    /// Report why an operation produced nothing
    pub fn print_empty(&self, reason: &EmptyReason) {
        match self.format {
            OutputFormat::Human => println!("No records: {}", reason),
            OutputFormat::Json => {
                println!(
                    "{}",
                    json!({"status": "empty", "reason": reason.to_string()})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Warn about relations that could not be resolved
    pub fn print_issues(&self, issues: &[RelationIssue]) {
        if self.format == OutputFormat::Quiet {
            return;
        }
        for issue in issues {
            eprintln!("warning: {}", issue);
        }
    }

    /// Print registered entity types
    pub fn print_schema(&self, schema: &Schema) {
        match self.format {
            OutputFormat::Human => {
                for entity in schema.entities() {
                    let location = schema
                        .location(entity.id())
                        .unwrap_or_else(|| "(no location)".to_string());
                    println!("{}  {}", entity.name(), location);
                    match entity.wrapper() {
                        Some(wrapper) => {
                            for (remote, local) in wrapper.fields() {
                                println!("  {} -> {}", remote, local);
                            }
                            if !wrapper.relations().is_empty() {
                                println!("  relations: {}", wrapper.relations().join(", "));
                            }
                        }
                        None => println!("  (no wrapper)"),
                    }
                }
                println!("\n{} entity type(s)", schema.entities().count());
            }
            OutputFormat::Json => {
                let entities: Vec<Value> = schema
                    .entities()
                    .map(|entity| {
                        let wrapper = entity.wrapper().map(|wrapper| {
                            let fields: serde_json::Map<String, Value> = wrapper
                                .fields()
                                .map(|(remote, local)| (remote.to_string(), json!(local)))
                                .collect();
                            json!({"fields": fields, "relations": wrapper.relations()})
                        });
                        json!({
                            "name": entity.name(),
                            "location": schema.location(entity.id()),
                            "wrapper": wrapper
                        })
                    })
                    .collect();
                println!("{:#}", Value::Array(entities));
            }
            OutputFormat::Quiet => {
                for entity in schema.entities() {
                    println!("{}", entity.name());
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Human-readable block for one record
fn describe(schema: &Schema, record: &Record) -> String {
    let name = schema.entity(record.entity()).name();
    let id = record
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut text = format!("{} {}\n", name, id);
    for (attribute, value) in record.values() {
        if !value.is_null() {
            text.push_str(&format!("  {}: {}\n", attribute, value));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        [[entity]]
        name = "Task"
        location = "http://example.com/tasks"
        attributes = { name = "string", done = "boolean" }

        [entity.wrapper]
        fields = { id = "id", name = "name", done = "done" }
    "#;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_describe() {
        let schema = Schema::from_toml_str(SCHEMA).unwrap();
        let task = schema.lookup("Task").unwrap();

        let record = Record::new(task)
            .with("id", 3)
            .with("name", "Drinking soda")
            .with("done", remodel_core::Scalar::Null);
        assert_eq!(describe(&schema, &record), "Task 3\n  name: Drinking soda\n");

        let record = Record::new(task).with("done", true);
        assert_eq!(describe(&schema, &record), "Task -\n  done: true\n");
    }

    #[test]
    fn test_print_records_json() {
        let schema = Schema::from_toml_str(SCHEMA).unwrap();
        let task = schema.lookup("Task").unwrap();
        let store = MemoryStore::new();

        let record = Record::new(task).with("id", 3);
        let output = Output::new(OutputFormat::Json);
        assert!(output.print_records(&schema, &store, &[&record]).is_ok());
    }
}
