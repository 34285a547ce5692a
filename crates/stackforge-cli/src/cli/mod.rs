//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! and help text. Stack flags parse straight into the core value enums via
//! their `FromStr` impls, so the CLI can never accept a value the domain
//! would reject — clap's error already lists the supported values.

use clap::{Args, Parser, Subcommand, ValueEnum};

use stackforge_core::domain::{
    ApiStyle, Backend, Database, DbSetup, DomainError, FieldId, Orm, PackageManager, PartialConfig,
    Runtime, WebDeploy,
};
use stackforge_core::serialize::parse_set;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stackforge",
    bin_name = "stackforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Full-stack project scaffolding with a consistent stack resolver",
    long_about = "Stackforge generates full-stack starter codebases from a \
                  technology-stack selection, keeping every combination of \
                  backend, runtime, database, ORM, and frontend internally \
                  consistent.",
    after_help = "EXAMPLES:\n\
        \x20 stackforge new my-app --database postgres --orm prisma\n\
        \x20 stackforge new my-app --backend convex --frontend tanstack-router\n\
        \x20 stackforge new my-app --runtime workers --db-setup d1 --yes\n\
        \x20 stackforge list --runtime workers\n\
        \x20 stackforge completions bash > /usr/share/bash-completion/completions/stackforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a stack selection.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stackforge new my-app                        # interactive prompts\n\
            \x20 stackforge new my-app --yes                  # all defaults\n\
            \x20 stackforge new my-api --database postgres --frontend none\n\
            \x20 stackforge new my-app --backend convex --no-install"
    )]
    New(NewArgs),

    /// List every stack option, marking incompatible combinations.
    #[command(
        visible_alias = "ls",
        about = "List stack options",
        after_help = "EXAMPLES:\n\
            \x20 stackforge list\n\
            \x20 stackforge list --runtime workers   # marks options workers rules out\n\
            \x20 stackforge list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stackforge completions bash > ~/.local/share/bash-completion/completions/stackforge\n\
            \x20 stackforge completions zsh  > ~/.zfunc/_stackforge\n\
            \x20 stackforge completions fish > ~/.config/fish/completions/stackforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Stackforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stackforge config get defaults.database\n\
            \x20 stackforge config set defaults.package-manager pnpm\n\
            \x20 stackforge config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stackforge new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// The stack selection.
    #[command(flatten)]
    pub stack: StackArgs,

    /// Skip the prompts and the confirmation; unset fields take defaults.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip prompts and confirmation, use defaults"
    )]
    pub yes: bool,

    /// Overwrite an existing directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Print the shareable builder link for the resolved stack.
    #[arg(long = "url", help = "Print the shareable link for this stack")]
    pub url: bool,
}

// ── stack flags ───────────────────────────────────────────────────────────────

/// The stack selection flags, shared by `new` and `list`.
///
/// Scalar fields parse through the core `FromStr` impls; set-valued fields
/// take a comma-joined member list or `none` for the empty set. Booleans
/// come as `--auth` / `--no-auth` pairs so "explicitly false" is
/// distinguishable from "not provided".
#[derive(Debug, Args, Default)]
pub struct StackArgs {
    #[arg(long, value_name = "BACKEND", help = "Backend framework")]
    pub backend: Option<Backend>,

    #[arg(long, value_name = "RUNTIME", help = "JavaScript runtime")]
    pub runtime: Option<Runtime>,

    #[arg(long, value_name = "DATABASE", help = "Database engine")]
    pub database: Option<Database>,

    #[arg(long = "db-setup", value_name = "SETUP", help = "Hosted database setup flow")]
    pub db_setup: Option<DbSetup>,

    #[arg(long, value_name = "ORM", help = "ORM / ODM")]
    pub orm: Option<Orm>,

    #[arg(long, value_name = "API", help = "RPC layer (trpc, orpc, none)")]
    pub api: Option<ApiStyle>,

    #[arg(
        long = "web-deploy",
        value_name = "TARGET",
        help = "Web deployment target"
    )]
    pub web_deploy: Option<WebDeploy>,

    #[arg(
        long = "package-manager",
        visible_alias = "pm",
        value_name = "PM",
        help = "Package manager"
    )]
    pub package_manager: Option<PackageManager>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Frontends, comma-joined ('none' for no frontend)"
    )]
    pub frontend: Option<String>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Addons, comma-joined ('none' for no addons)"
    )]
    pub addons: Option<String>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Example apps, comma-joined ('none' for no examples)"
    )]
    pub examples: Option<String>,

    #[arg(long = "auth", overrides_with = "no_auth", help = "Include authentication")]
    auth: bool,
    #[arg(long = "no-auth", help = "Exclude authentication")]
    no_auth: bool,

    #[arg(long = "git", overrides_with = "no_git", help = "Initialise a git repository")]
    git: bool,
    #[arg(long = "no-git", help = "Skip git initialisation")]
    no_git: bool,

    #[arg(long = "install", overrides_with = "no_install", help = "Install dependencies")]
    install: bool,
    #[arg(long = "no-install", help = "Skip dependency installation")]
    no_install: bool,
}

impl StackArgs {
    /// The partial configuration these flags spell out. `Some` per flag the
    /// user actually typed — the explicit-field set Strict mode is built on.
    pub fn to_partial(&self) -> Result<PartialConfig, DomainError> {
        let mut partial = PartialConfig {
            backend: self.backend,
            runtime: self.runtime,
            database: self.database,
            db_setup: self.db_setup,
            orm: self.orm,
            api: self.api,
            web_deploy: self.web_deploy,
            package_manager: self.package_manager,
            auth: bool_flag(self.auth, self.no_auth),
            git: bool_flag(self.git, self.no_git),
            install: bool_flag(self.install, self.no_install),
            ..Default::default()
        };
        if let Some(raw) = &self.frontend {
            partial.set(parse_set(FieldId::Frontend, raw)?);
        }
        if let Some(raw) = &self.addons {
            partial.set(parse_set(FieldId::Addons, raw)?);
        }
        if let Some(raw) = &self.examples {
            partial.set(parse_set(FieldId::Examples, raw)?);
        }
        Ok(partial)
    }
}

fn bool_flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stackforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Partial selection to check the options against.
    #[command(flatten)]
    pub stack: StackArgs,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One `field=value` pair per line.
    List,
    /// JSON object.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stackforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stackforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.database`.
        key: String,
    },
    /// Set a configuration key to a value and persist it.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::BTreeSet;
    use stackforge_core::domain::Frontend;

    #[test]
    fn parse_new_command_with_stack_flags() {
        let cli = Cli::parse_from([
            "stackforge",
            "new",
            "my-app",
            "--database",
            "postgres",
            "--orm",
            "prisma",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected new command");
        };
        assert_eq!(args.stack.database, Some(Database::Postgres));
        assert_eq!(args.stack.orm, Some(Orm::Prisma));
    }

    #[test]
    fn database_aliases_parse() {
        let cli = Cli::parse_from(["stackforge", "new", "x", "--database", "pg"]);
        let Commands::New(args) = cli.command else {
            panic!("expected new command");
        };
        assert_eq!(args.stack.database, Some(Database::Postgres));
    }

    #[test]
    fn unknown_value_is_a_parse_error() {
        assert!(Cli::try_parse_from(["stackforge", "new", "x", "--backend", "rails"]).is_err());
    }

    #[test]
    fn boolean_pairs_track_explicitness() {
        let parse = |extra: &[&str]| {
            let mut argv = vec!["stackforge", "new", "x"];
            argv.extend_from_slice(extra);
            let Commands::New(args) = Cli::parse_from(argv).command else {
                panic!("expected new command");
            };
            args.stack.to_partial().unwrap()
        };
        assert_eq!(parse(&[]).auth, None);
        assert_eq!(parse(&["--auth"]).auth, Some(true));
        assert_eq!(parse(&["--no-auth"]).auth, Some(false));
        // The later flag wins.
        assert_eq!(parse(&["--no-git", "--git"]).git, Some(true));
    }

    #[test]
    fn set_flags_parse_member_lists() {
        let cli = Cli::parse_from([
            "stackforge",
            "new",
            "x",
            "--frontend",
            "nuxt,native",
            "--addons",
            "none",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected new command");
        };
        let partial = args.stack.to_partial().unwrap();
        assert_eq!(
            partial.frontend,
            Some(BTreeSet::from([Frontend::Nuxt, Frontend::Native]))
        );
        assert_eq!(partial.addons, Some(BTreeSet::new()));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["stackforge", "--quiet", "--verbose", "list"]).is_err());
    }

    #[test]
    fn package_manager_alias() {
        let cli = Cli::parse_from(["stackforge", "new", "x", "--pm", "pnpm"]);
        let Commands::New(args) = cli.command else {
            panic!("expected new command");
        };
        assert_eq!(args.stack.package_manager, Some(PackageManager::Pnpm));
    }
}
