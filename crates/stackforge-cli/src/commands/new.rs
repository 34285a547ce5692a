//! Implementation of the `stackforge new` command.
//!
//! Responsibility: turn the flag selection (Strict mode) or the interactive
//! prompt chain (Adaptive mode) into a resolved stack, display it, and hand
//! it to the generator and installer ports. No compatibility logic lives
//! here — that is the resolver's job.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use stackforge_adapters::{FlagAdapter, ManifestGenerator, PreviewInstaller};
use stackforge_core::application::ports::{DependencyInstaller, ProjectGenerator};
use stackforge_core::domain::{FieldId, StackConfig};
use stackforge_core::resolver::{Change, Resolver};
use stackforge_core::serialize::{encode_url_state, serialize_command};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `stackforge new` command.
///
/// Dispatch sequence:
/// 1. Parse and validate the project name / output path
/// 2. Resolve the stack — Strict from flags, Adaptive from prompts
/// 3. Show the resolved stack, auto-corrections, and the reproducible command
/// 4. Confirm with user unless `--yes` or `--quiet`
/// 5. Early-exit if `--dry-run`
/// 6. Generate the project and run the installer port
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve project path
    let (project_name, output_root) = resolve_project_path(&args.name)?;
    validate_project_name(&project_name)?;

    let resolver = Resolver::new()?;
    let user = args.stack.to_partial()?;
    let seeds = config.seeds()?;

    // 2. Resolve the stack.  Flags (or --yes) take the Strict path: an
    //    explicit flag is never silently overridden.  A bare `new` walks
    //    the prompt chain instead, which is Adaptive and cannot fail.
    let (stack, changes) = if user.is_empty() && !args.yes {
        let resolution = prompt_stack(&resolver, &seeds, &output)?;
        (resolution.config, resolution.changes)
    } else {
        let stack = FlagAdapter::new(resolver).resolve(user, &seeds)?;
        (stack, Vec::new())
    };

    debug!(
        backend = %stack.backend,
        runtime = %stack.runtime,
        database = %stack.database,
        "stack resolved"
    );

    // 3. Show the outcome
    show_changes(&changes, &output)?;
    if !global.quiet {
        show_stack(&stack, &project_name, &output_root, &output)?;
    }
    output.info(&format!("Reproduce with: {}", reproduce_command(&project_name, &stack)))?;
    if args.url {
        output.info(&format!(
            "Share link: https://stackforge.dev/new?{}",
            encode_url_state(&stack)
        ))?;
    }

    // 4. Confirm
    if !global.quiet && !args.yes && !confirm()? {
        return Err(CliError::Cancelled);
    }

    // 5. Check for existing directory
    let project_path = output_root.join(&project_name);
    if project_path.exists() && !args.force {
        return Err(CliError::ProjectExists { path: project_path });
    }

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            project_name,
            project_path.display(),
        ))?;
        return Ok(());
    }

    // 6. Generate and install through the downstream ports
    output.header(&format!("Creating '{project_name}'..."))?;
    info!(project = %project_name, path = %project_path.display(), "generation started");

    scaffold(
        &stack,
        &project_name,
        &output_root,
        &ManifestGenerator::new(),
        &PreviewInstaller::new(),
    )?;

    info!(project = %project_name, "generation completed");
    output.success(&format!("Project '{project_name}' created!"))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {project_name}"))?;
        output.print(&format!("  {} dev", stack.package_manager))?;
    }

    Ok(())
}

/// Hand the resolved stack to the downstream ports.
fn scaffold(
    stack: &StackConfig,
    name: &str,
    output_root: &Path,
    generator: &dyn ProjectGenerator,
    installer: &dyn DependencyInstaller,
) -> CliResult<()> {
    generator.generate(name, output_root, stack)?;
    if stack.install {
        installer.install(&output_root.join(name), stack)?;
    }
    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

fn resolve_project_path(raw: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(raw);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: raw.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    let output_root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok((project_name, output_root))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "use alphanumerics, hyphens, and underscores".into(),
        });
    }
    Ok(())
}

// ── Interactive prompts ───────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
fn prompt_stack(
    resolver: &Resolver,
    seeds: &stackforge_core::domain::PartialConfig,
    output: &OutputManager,
) -> CliResult<stackforge_core::resolver::Resolution> {
    use dialoguer::{Confirm, MultiSelect, Select, theme::ColorfulTheme};
    use stackforge_adapters::PromptAdapter;
    use stackforge_core::domain::{Arity, SetMember};
    use stackforge_core::serialize::parse_set;

    let adapter = PromptAdapter::new(resolver.clone());
    let mut answered = seeds.clone();
    let theme = ColorfulTheme::default();

    output.header("Configure your stack")?;

    for field in PromptAdapter::sequence() {
        match field.arity() {
            Arity::Single => {
                let options = adapter.scalar_options(&answered, *field)?;
                // A question with one surviving answer is no question at all.
                if options.len() <= 1 {
                    if let Some(only) = options.into_iter().next() {
                        answered.set(only);
                    }
                    continue;
                }
                let preview = adapter.preview(&answered)?;
                let current = preview.current(*field);

                if field.is_boolean() {
                    let picked = Confirm::with_theme(&theme)
                        .with_prompt(format!("Enable {}?", field.flag()))
                        .default(current.value_str() == "true")
                        .interact()
                        .map_err(|_| CliError::Cancelled)?;
                    answered.set(field.parse_scalar(if picked { "true" } else { "false" })?);
                } else {
                    let labels: Vec<String> = options.iter().map(|o| o.value_str()).collect();
                    let default_idx = options.iter().position(|o| *o == current).unwrap_or(0);
                    let idx = Select::with_theme(&theme)
                        .with_prompt(format!("Select {}", field.flag()))
                        .items(&labels)
                        .default(default_idx)
                        .interact()
                        .map_err(|_| CliError::Cancelled)?;
                    answered.set(options[idx].clone());
                }
            }
            Arity::Multi => {
                let members = adapter.member_options(&answered, *field)?;
                if members.is_empty() {
                    continue;
                }
                let preview = adapter.preview(&answered)?;
                let labels: Vec<&str> = members.iter().map(SetMember::as_str).collect();
                let checked: Vec<bool> = members
                    .iter()
                    .map(|m| member_selected(&preview, *m))
                    .collect();
                let picks = MultiSelect::with_theme(&theme)
                    .with_prompt(format!("Select {}", field.flag()))
                    .items(&labels)
                    .defaults(&checked)
                    .interact()
                    .map_err(|_| CliError::Cancelled)?;

                let joined = picks
                    .iter()
                    .map(|&i| labels[i])
                    .collect::<Vec<_>>()
                    .join(",");
                let raw = if joined.is_empty() { "none" } else { joined.as_str() };
                answered.set(parse_set(*field, raw)?);
            }
        }
    }

    Ok(adapter.finish(answered)?)
}

#[cfg(feature = "interactive")]
fn member_selected(
    cfg: &StackConfig,
    member: stackforge_core::domain::SetMember,
) -> bool {
    use stackforge_core::domain::SetMember;
    match member {
        SetMember::Frontend(f) => cfg.frontend.contains(&f),
        SetMember::Addon(a) => cfg.addons.contains(&a),
        SetMember::Example(e) => cfg.examples.contains(&e),
    }
}

#[cfg(not(feature = "interactive"))]
fn prompt_stack(
    _resolver: &Resolver,
    _seeds: &stackforge_core::domain::PartialConfig,
    _output: &OutputManager,
) -> CliResult<stackforge_core::resolver::Resolution> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_changes(changes: &[Change], out: &OutputManager) -> CliResult<()> {
    for change in changes {
        out.adjustment(&change.message)?;
    }
    Ok(())
}

fn show_stack(
    stack: &StackConfig,
    name: &str,
    output_root: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Stack")?;
    out.print(&format!("  {:<17} {name}", "project:"))?;
    for field in FieldId::ALL {
        out.print(&format!(
            "  {:<17} {}",
            format!("{}:", field.flag()),
            stack.value_str(*field)
        ))?;
    }
    out.print(&format!("  {:<17} {}", "location:", output_root.display()))?;
    out.print("")?;
    Ok(())
}

/// The command line that reproduces this stack non-interactively.
fn reproduce_command(name: &str, stack: &StackConfig) -> String {
    let flags = serialize_command(stack);
    if flags.is_empty() {
        format!("stackforge new {name} --yes")
    } else {
        format!("stackforge new {name} {flags} --yes")
    }
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
