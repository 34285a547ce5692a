//! Implementation of the `stackforge list` command.
//!
//! Prints every field's option domain. When stack flags are supplied, each
//! option is checked against that partial selection with the speculative
//! resolver pass, and options that could not survive are marked
//! unavailable — the CLI surface of the builder's greyed-out options.

use serde_json::json;

use stackforge_adapters::BuilderSession;
use stackforge_core::domain::FieldId;
use stackforge_core::resolver::Resolver;

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let resolver = Resolver::new()?;
    let partial = args.stack.to_partial()?;
    let constrained = !partial.is_empty();

    // The builder session already knows how to resolve a baseline and grey
    // out options; reuse it rather than duplicating the speculative loop.
    let mut session = BuilderSession::new(resolver);
    session.restore(partial.into_config())?;

    let fields: Vec<(FieldId, Vec<stackforge_adapters::OptionState>)> = FieldId::ALL
        .iter()
        .map(|field| (*field, session.options(*field)))
        .collect();

    match args.format {
        ListFormat::Table => {
            output.header("Stack options")?;
            if constrained {
                output.info("options incompatible with your flags are marked ✗")?;
            }
            for (field, options) in &fields {
                output.print(&format!("{}:", field.flag()))?;
                for option in options {
                    let marker = if !option.enabled {
                        "✗"
                    } else if option.selected {
                        "●"
                    } else {
                        " "
                    };
                    output.print(&format!("  {marker} {}", option.label))?;
                }
            }
        }

        ListFormat::List => {
            for (field, options) in &fields {
                for option in options {
                    if option.enabled {
                        println!("{}={}", field.flag(), option.label);
                    }
                }
            }
        }

        ListFormat::Json => {
            // Bypasses OutputManager because JSON output must be parseable
            // even in non-TTY pipes.
            let body: serde_json::Value = fields
                .iter()
                .map(|(field, options)| {
                    let entries: Vec<serde_json::Value> = options
                        .iter()
                        .map(|o| {
                            json!({
                                "value": o.label,
                                "selected": o.selected,
                                "available": o.enabled,
                            })
                        })
                        .collect();
                    (field.flag().to_string(), serde_json::Value::Array(entries))
                })
                .collect::<serde_json::Map<String, serde_json::Value>>()
                .into();
            println!("{}", serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".into()));
        }
    }

    Ok(())
}
