//! Contract Generator
//!
//! Collects the data of a property purchase agreement and fills the DOCX
//! contract template with it.

mod commands;
mod delivery;
mod settings;
mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contract_form::{collect_submission, form_outline, load_values_file, render_form, DefaultsSurface};
use settings::SettingsManager;
use std::path::PathBuf;
use std::process;
use terminal::TerminalSurface;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "contract-generator",
    version,
    about = "Gerador de Contrato de Compra e Venda: fills the DOCX contract template"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Collect the contract data and generate the .docx
    Generate {
        /// DOCX template with {{key}} placeholders
        #[arg(long)]
        template: Option<PathBuf>,
        /// Directory the contract is written to
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// JSON object with submitted values; missing fields keep their defaults
        #[arg(long, conflicts_with = "defaults")]
        values: Option<PathBuf>,
        /// Use every field's default value without prompting
        #[arg(long)]
        defaults: bool,
    },

    /// Print the form sections, labels, and defaults as JSON
    Fields,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Fields => {
            let json = serde_json::to_string_pretty(&form_outline())?;
            println!("{}", json);
        }
        Cmd::Generate {
            template,
            output_dir,
            values,
            defaults,
        } => {
            let mut manager = SettingsManager::new(".");
            let settings_path = manager.settings_path().display().to_string();
            let settings = manager
                .load_sync()
                .with_context(|| format!("reading {}", settings_path))?
                .clone()
                .with_overrides(template, output_dir);

            let mapping = if let Some(path) = values {
                let submitted = load_values_file(&path)
                    .with_context(|| format!("loading form values from {}", path.display()))?;
                collect_submission(submitted)
            } else if defaults {
                render_form(&mut DefaultsSurface)
            } else {
                println!("📄 Gerador de Contrato de Compra e Venda");
                println!("Preencha os campos abaixo para gerar o contrato em formato `.docx`.");
                println!(
                    "Enter mantém o valor sugerido; `{}` deixa o campo em branco.",
                    terminal::CLEAR_ANSWER
                );
                let stdin = std::io::stdin();
                let mut surface = TerminalSurface::new(stdin.lock(), std::io::stdout());
                let mapping = render_form(&mut surface);
                surface.finish().context("reading form input")?;
                mapping
            };

            match commands::generate_contract(&mapping, &settings.template_path) {
                Ok(download) => {
                    let path = download
                        .save_into(&settings.output_dir)
                        .with_context(|| format!("writing {}", download.file_name))?;
                    println!("{}", commands::SUCCESS_MESSAGE);
                    println!("{}", path.display());
                }
                Err(message) => {
                    eprintln!("{}", message);
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}
