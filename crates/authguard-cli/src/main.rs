//! CLI entry point for authguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `authguard-app` crate.

use anyhow::Context;
use authguard_app::{
    CheckInput, parse_report_json, render_annotations, render_markdown, render_text, run_check,
    runtime_error_report, serialize_report, verdict_exit_code,
};
use authguard_settings::Overrides;
use authguard_types::AuthguardReport;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "authguard",
    version,
    about = "Endpoint access-policy compliance checker"
)]
struct Cli {
    /// Root directory; catalog globs and the config path are relative to it.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Path to authguard config TOML.
    #[arg(long, default_value = "authguard.toml")]
    config: Utf8PathBuf,

    /// Override the scope label used in reports.
    #[arg(long)]
    scope: Option<String>,

    /// Log resolution details to stderr (same as RUST_LOG=debug).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every endpoint and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/authguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/authguard/comment.md")]
        markdown_out: Utf8PathBuf,

        /// Print the full results listing to stdout.
        #[arg(long)]
        print: bool,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/authguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/authguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Print the results listing of an existing JSON report.
    Print {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/authguard/report.json")]
        report: Utf8PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref report_out,
            write_markdown,
            ref markdown_out,
            print,
        } => cmd_check(&cli, report_out, write_markdown, markdown_out, print),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Print { report } => cmd_print(report),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_check(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
    print: bool,
) -> anyhow::Result<()> {
    let root = cli
        .root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.root.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !root.exists() {
            anyhow::bail!("root does not exist: {}", root);
        }
        // No config means no default policy; refuse to run.
        let cfg_path = root.join(&cli.config);
        let cfg_text = std::fs::read_to_string(&cfg_path)
            .with_context(|| format!("read config: {}", cfg_path))?;

        let input = CheckInput {
            root: &root,
            config_text: &cfg_text,
            overrides: Overrides {
                scope: cli.scope.clone(),
            },
        };
        let output = run_check(input)?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&output.report);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }
        if print {
            print!("{}", output.listing);
        }
        if let Some(failures) = &output.failure_report {
            eprintln!("{failures}");
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("authguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &AuthguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<AuthguardReport> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read report: {}", path))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&report, max) {
        println!("{}", annotation);
    }
    Ok(())
}

fn cmd_print(report_path: Utf8PathBuf) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    print!("{}", render_text(&report));
    Ok(())
}
