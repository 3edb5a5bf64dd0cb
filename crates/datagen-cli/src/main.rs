use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use datagen_compiler::{Ast, SchemaCompiler};
use datagen_core::{CompileReport, CompilerConfig, Declaration, Severity, TypeId, TypeRegistry};

/// Datagen - compile schema definitions into a resolved type graph
#[derive(Parser)]
#[command(name = "datagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: datagen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not list registered types
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Store property keys in lowerCamelCase
    #[arg(long, global = true)]
    camel_case_keys: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema AST (JSON) and print the resulting type graph
    Compile {
        /// AST produced by the schema grammar
        ast: PathBuf,

        /// Output file for the compile report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a config file with the default settings
    InitConfig {
        /// Where to write the config
        #[arg(default_value = "datagen.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match &cli.command {
        Commands::Compile { ast, output } => {
            let config = load_config(&cli)?;
            compile_command(config, ast, output.as_deref(), cli.verbose)
        }
        Commands::InitConfig { path } => init_config_command(path),
    }
}

/// Load config, letting command-line flags switch options on
fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let config = if let Some(config_path) = &cli.config {
        CompilerConfig::from_file(config_path)?
    } else if Path::new("datagen.toml").exists() {
        CompilerConfig::from_file(Path::new("datagen.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        CompilerConfig::default()
    };

    let quiet = config.quiet || cli.quiet;
    let camel_case_keys = config.camel_case_keys || cli.camel_case_keys;
    Ok(config.with_quiet(quiet).with_camel_case_keys(camel_case_keys))
}

/// Compile command - build the type graph and print it
fn compile_command(config: CompilerConfig, ast_path: &Path, output: Option<&Path>, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Loading AST from:".cyan(), ast_path.display());
    }

    let ast = Ast::from_file(ast_path)
        .with_context(|| format!("Failed to load AST from {}", ast_path.display()))?;
    tracing::debug!(path = %ast_path.display(), nodes = ast.nodes.len(), "loaded AST");

    let mut compiler = SchemaCompiler::new(config);
    let report = match compiler.compile(&ast) {
        Ok(compilation) => {
            print_graph(&compilation.registry);
            compilation.report
        }
        Err(failure) => {
            eprintln!("{} {}", "✗".red(), failure.error.to_string().red());
            failure.report
        }
    };

    print_diagnostics(&report);

    if let Some(path) = output {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    if !report.succeeded() {
        std::process::exit(1);
    }

    Ok(())
}

/// Init-config command - write the default configuration
fn init_config_command(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    CompilerConfig::default().save_to_file(path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

fn print_graph(registry: &TypeRegistry) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Type Graph".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());

    for (id, declaration) in registry.user_types() {
        if declaration.parent().is_none() {
            print_declaration(registry, id, 0);
        }
    }
    println!();
}

fn print_declaration(registry: &TypeRegistry, id: TypeId, depth: usize) {
    let indent = "  ".repeat(depth);

    match registry.get(id) {
        Declaration::Data(data) => {
            println!();
            print!("{}{} {}", indent, "data".magenta(), data.name.bold());
            if let Some(comment) = &data.comment {
                print!("  {}", format!("// {}", comment).dimmed());
            }
            println!();

            let identity = data.identity_property().map(|p| p.name.as_str());
            for property in data.properties() {
                let marker = if Some(property.name.as_str()) == identity {
                    format!(" {}", "[identity]".yellow())
                } else {
                    String::new()
                };
                println!(
                    "{}  {}: {}{}",
                    indent,
                    property.key(),
                    registry.describe(&property.ty).cyan(),
                    marker
                );
            }

            for child in data.children() {
                print_declaration(registry, *child, depth + 1);
            }
        }
        Declaration::Enum(enumeration) => {
            println!();
            println!(
                "{}{} {} {{ {} }}",
                indent,
                "enum".magenta(),
                enumeration.name.bold(),
                enumeration.values.join(", ")
            );
        }
        Declaration::Primitive(_) | Declaration::Blob(_) => {}
    }
}

fn print_diagnostics(report: &CompileReport) {
    for diagnostic in &report.diagnostics {
        let label = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warn => "warn".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        eprintln!("{} [{}] {}", label, diagnostic.code, diagnostic.message);
        if let Some(location) = &diagnostic.location {
            eprintln!("    {} {}", "at".dimmed(), location);
        }
    }

    let summary = &report.summary;
    eprintln!(
        "{} records, {} enums registered; {} errors, {} warnings",
        summary.records_registered,
        summary.enums_registered,
        summary.errors.to_string().red(),
        summary.warnings.to_string().yellow()
    );
}
