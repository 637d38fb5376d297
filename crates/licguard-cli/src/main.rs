//! CLI entry point for licguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `licguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use licguard_app::{
    action_exit_code, batch_exit_code, format_explanation, format_not_found, open_session,
    parse_batch_file, render_compat_markdown, render_markdown, render_obligations_markdown,
    run_batch, run_compat, run_evaluate, run_explain, run_init, run_markdown, run_obligations,
    run_split_matrix, runtime_error_report, serialize_report, verdict_exit_code, write_report,
    write_text, EvaluateInput, ExplainOutput, Session, SessionInput, SplitMatrixInput,
};
use licguard_data::RegistryCache;
use licguard_settings::Overrides;
use licguard_types::ReportEnvelope;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "licguard",
    version,
    about = "License compatibility, policy, and obligation checks for dependency sets"
)]
struct Cli {
    /// Path to licguard config TOML. A missing file is allowed (defaults apply).
    #[arg(long, default_value = "licguard.toml")]
    config: Utf8PathBuf,

    /// Dataset directory (licenses/, obligations.toml, compatibility.toml).
    #[arg(long)]
    dataset: Option<Utf8PathBuf>,

    /// Override profile (strict|standard|open).
    #[arg(long)]
    profile: Option<String>,

    /// Extra policy file, composed after the configured ones. Repeatable.
    #[arg(long = "policy")]
    policies: Vec<Utf8PathBuf>,

    /// Override the action used when no rule matches (allow|deny).
    #[arg(long)]
    default_decision: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a license set: compatibility, policy decision, and obligations.
    Evaluate {
        /// License identifiers (case-insensitive).
        #[arg(required = true)]
        licenses: Vec<String>,

        /// Usage context, e.g. static_linking.
        #[arg(long)]
        context: Option<String>,

        /// Distribution channel, e.g. mobile.
        #[arg(long)]
        distribution: Option<String>,

        /// Request attribute as KEY=VALUE. Repeatable.
        #[arg(long = "attr", value_parser = parse_attr)]
        attributes: Vec<(String, String)>,

        /// Request id echoed in the result.
        #[arg(long)]
        id: Option<String>,

        /// Where to write the JSON report (stdout if not given).
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/licguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Check pairwise compatibility of a license set. Policies are not consulted.
    Compat {
        #[arg(required = true)]
        licenses: Vec<String>,

        #[arg(long)]
        context: Option<String>,

        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Print a Markdown table instead of JSON.
        #[arg(long)]
        markdown: bool,
    },

    /// Print the merged obligation checklist for a license set.
    Obligations {
        #[arg(required = true)]
        licenses: Vec<String>,

        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Print a Markdown checklist instead of JSON.
        #[arg(long)]
        markdown: bool,
    },

    /// Evaluate every request in a TOML or JSON batch file.
    Batch {
        /// Batch file (`[[requests]]` entries).
        file: Utf8PathBuf,

        /// Worker threads (default: available parallelism).
        #[arg(long)]
        jobs: Option<usize>,

        #[arg(long)]
        report_out: Option<Utf8PathBuf>,
    },

    /// Explain an error or lineage code with remediation guidance.
    Explain {
        /// The code to explain, e.g. "conflicting_obligation".
        code: String,
    },

    /// Scaffold licguard.toml and a starter policy.
    Init {
        /// Directory to write into.
        #[arg(long, default_value = ".")]
        dir: Utf8PathBuf,

        /// Dataset path to record in the config, relative to `dir`.
        #[arg(long = "dataset-path", default_value = "data")]
        dataset_path: String,

        /// Overwrite existing files.
        #[arg(long)]
        force: bool,
    },

    /// Split a compatibility matrix into an index and chunk files.
    SplitMatrix {
        /// Unsplit matrix JSON.
        #[arg(long, default_value = "compatibility_matrix.json")]
        matrix: Utf8PathBuf,

        /// Output directory.
        #[arg(long, default_value = "compatibility")]
        out_dir: Utf8PathBuf,

        /// Licenses per chunk.
        #[arg(long, default_value = "100")]
        chunk_size: usize,
    },

    /// Render markdown from an existing JSON evaluation report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/licguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },
}

impl Commands {
    fn report_out(&self) -> Option<&Utf8Path> {
        match self {
            Commands::Evaluate { report_out, .. }
            | Commands::Compat { report_out, .. }
            | Commands::Obligations { report_out, .. }
            | Commands::Batch { report_out, .. } => report_out.as_deref(),
            _ => None,
        }
    }
}

fn parse_attr(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Exit 2 is reserved for deny/incompatible.
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            if let Some(path) = cli.cmd.report_out() {
                let report = runtime_error_report(&err);
                if let Err(write_err) = write_report(path, &report) {
                    tracing::warn!(error = %write_err, "could not write error report");
                }
            }
            eprintln!("licguard error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("licguard=warn"));
    let json_logs = std::env::var("LICGUARD_LOG_JSON").unwrap_or_default() == "1";
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Evaluate {
            licenses,
            context,
            distribution,
            attributes,
            id,
            report_out,
            write_markdown,
            markdown_out,
        } => {
            let session = open(cli, None)?;
            let input = EvaluateInput {
                id: id.clone(),
                licenses: licenses.clone(),
                context: context.clone(),
                distribution: distribution.clone(),
                attributes: attributes.iter().cloned().collect(),
            };
            let report = run_evaluate(&session, input)?;
            emit_report(report_out.as_deref(), &report)?;
            if *write_markdown {
                write_text(markdown_out, &render_markdown(&report)).context("write markdown")?;
            }
            Ok(action_exit_code(report.result.decision.action))
        }
        Commands::Compat {
            licenses,
            context,
            report_out,
            markdown,
        } => {
            let session = open(cli, None)?;
            let report = run_compat(&session, licenses, context.as_deref())?;
            if *markdown && report_out.is_none() {
                print!("{}", render_compat_markdown(&report));
            } else {
                emit_report(report_out.as_deref(), &report)?;
            }
            Ok(verdict_exit_code(report.result.overall))
        }
        Commands::Obligations {
            licenses,
            report_out,
            markdown,
        } => {
            let session = open(cli, None)?;
            let report = run_obligations(&session, licenses)?;
            if *markdown && report_out.is_none() {
                print!("{}", render_obligations_markdown(&report));
            } else {
                emit_report(report_out.as_deref(), &report)?;
            }
            Ok(0)
        }
        Commands::Batch {
            file,
            jobs,
            report_out,
        } => {
            let session = open(cli, *jobs)?;
            let text =
                std::fs::read_to_string(file).with_context(|| format!("read batch file {file}"))?;
            let batch = parse_batch_file(file, &text)?;
            let report = run_batch(&session, batch)?;
            emit_report(report_out.as_deref(), &report)?;
            Ok(batch_exit_code(&report.result))
        }
        Commands::Explain { code } => Ok(cmd_explain(code)),
        Commands::Init {
            dir,
            dataset_path,
            force,
        } => {
            let out = run_init(dir, cli.profile.as_deref(), dataset_path, *force)?;
            println!("wrote {}", out.config_path);
            println!("wrote {}", out.policy_path);
            Ok(0)
        }
        Commands::SplitMatrix {
            matrix,
            out_dir,
            chunk_size,
        } => {
            let index = run_split_matrix(SplitMatrixInput {
                matrix,
                out_dir,
                chunk_size: *chunk_size,
            })?;
            println!(
                "wrote {} chunks ({} licenses) to {out_dir}",
                index.num_chunks, index.total_licenses
            );
            Ok(0)
        }
        Commands::Md { report, output } => {
            let text = std::fs::read_to_string(report)
                .with_context(|| format!("read report: {report}"))?;
            let md = run_markdown(&text)?;
            match output {
                Some(path) => write_text(path, &md).context("write markdown output")?,
                None => print!("{md}"),
            }
            Ok(0)
        }
    }
}

/// Resolve config, dataset, and policies. Flag paths are relative to the working directory;
/// config paths are relative to the config file.
fn open(cli: &Cli, jobs: Option<usize>) -> anyhow::Result<Session> {
    let cwd = Utf8PathBuf::try_from(std::env::current_dir().context("current directory")?)
        .context("current directory is not UTF-8")?;

    let config_path = cwd.join(&cli.config);
    // Missing file is allowed (defaults apply).
    let config_text = if config_path.is_file() {
        std::fs::read_to_string(&config_path)
            .with_context(|| format!("read config {config_path}"))?
    } else {
        tracing::debug!(%config_path, "no config file; using defaults");
        String::new()
    };
    let base_dir = config_path
        .parent()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| cwd.clone());

    let overrides = Overrides {
        profile: cli.profile.clone(),
        default_decision: cli.default_decision.clone(),
        dataset: cli.dataset.as_ref().map(|d| cwd.join(d).into_string()),
        policies: cli
            .policies
            .iter()
            .map(|p| cwd.join(p).into_string())
            .collect(),
        jobs,
        ..Overrides::default()
    };

    open_session(
        SessionInput {
            config_text: &config_text,
            base_dir: &base_dir,
            overrides,
        },
        &mut RegistryCache::new(),
    )
}

fn emit_report<T: Serialize>(
    path: Option<&Utf8Path>,
    report: &ReportEnvelope<T>,
) -> anyhow::Result<()> {
    match path {
        Some(path) => write_report(path, report).context("write report json"),
        None => {
            let data = serialize_report(report)?;
            std::io::stdout()
                .lock()
                .write_all(&data)
                .context("write report to stdout")
        }
    }
}

fn cmd_explain(code: &str) -> i32 {
    match run_explain(code) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            code,
            available_codes,
        } => {
            eprint!("{}", format_not_found(&code, available_codes));
            1
        }
    }
}
