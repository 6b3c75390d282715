//! reportdoc CLI - financial report rendering tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use reportdoc::convert::{ExporterRegistry, JsonExporter, JsonLayout};
use reportdoc::{
    ExportCoordinator, ExportOptions, JsonFormat, OutputFormat, PageGeometry, ParseOptions,
    RenderOptions, ReportMetadata, ReportType,
};

#[derive(Parser)]
#[command(name = "reportdoc")]
#[command(version)]
#[command(about = "Render marked-up financial report text to PDF, DOCX, and JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report to every format (PDF, DOCX, JSON)
    Convert {
        #[command(flatten)]
        report: ReportArgs,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Render a report to a paginated PDF
    Pdf {
        #[command(flatten)]
        report: ReportArgs,

        /// Output file (named after the company if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write content streams without compression
        #[arg(long)]
        uncompressed: bool,
    },

    /// Render a report to a DOCX document
    Docx {
        #[command(flatten)]
        report: ReportArgs,

        /// Output file (named after the company if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump the document model as JSON
    Json {
        #[command(flatten)]
        report: ReportArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Dump paginated draw commands instead of the paragraph tree
        #[arg(long)]
        paginated: bool,
    },

    /// Show report information and statistics
    Info {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show version information
    Version,
}

/// Input and layout options shared by every rendering command.
#[derive(Args)]
struct ReportArgs {
    /// Input text file ("-" for stdin)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Company name printed in the header
    #[arg(short, long, env = "REPORTDOC_COMPANY", default_value = "Company")]
    company: String,

    /// Report type
    #[arg(short = 't', long, value_enum, default_value = "quarterly")]
    report_type: ReportKind,

    /// Generation date (defaults to now)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Bold delimiter character
    #[arg(long, default_value_t = '*')]
    delimiter: char,

    /// Page size preset
    #[arg(long, value_enum, default_value = "letter")]
    page_size: PageSize,

    /// Page geometry JSON file (overrides --page-size)
    #[arg(long, value_name = "FILE")]
    geometry: Option<PathBuf>,

    /// Content font size in points
    #[arg(long, default_value_t = 11.0)]
    font_size: f32,

    /// Render pages on one thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    /// Quarterly report
    Quarterly,
    /// Annual report
    Annual,
}

impl From<ReportKind> for ReportType {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Quarterly => ReportType::Quarterly,
            ReportKind::Annual => ReportType::Annual,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSize {
    /// US Letter (612 x 792 pt)
    Letter,
    /// ISO A4 (595 x 842 pt)
    A4,
}

impl ReportArgs {
    fn read_input(&self) -> io::Result<String> {
        if self.input.as_os_str() == "-" {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        } else {
            fs::read_to_string(&self.input)
        }
    }

    fn metadata(&self) -> ReportMetadata {
        let meta = ReportMetadata::new(self.company.clone(), self.report_type.into());
        match self.date {
            Some(date) => meta.with_generated_on(date),
            None => meta,
        }
    }

    fn page_geometry(&self) -> Result<PageGeometry, Box<dyn std::error::Error>> {
        if let Some(path) = &self.geometry {
            let json = fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&json)?);
        }
        Ok(match self.page_size {
            PageSize::Letter => PageGeometry::letter(),
            PageSize::A4 => PageGeometry::a4(),
        })
    }

    fn options(&self) -> ExportOptions {
        let mut render = RenderOptions::new().with_font_size(self.font_size);
        if self.sequential {
            render = render.sequential();
        }
        ExportOptions::new()
            .with_parse_options(ParseOptions::new().with_delimiter(self.delimiter))
            .with_render_options(render)
    }

    fn load(&self, options: ExportOptions) -> Result<ExportCoordinator, Box<dyn std::error::Error>> {
        let raw = self.read_input()?;
        log::debug!("read {} bytes from {}", raw.len(), self.input.display());
        Ok(ExportCoordinator::with_options(
            &raw,
            self.metadata(),
            self.page_geometry()?,
            options,
        )?)
    }

    fn default_output_dir(&self) -> PathBuf {
        if self.input.as_os_str() == "-" {
            return PathBuf::from("reportdoc_output");
        }
        let stem = self.input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { report, output } => cmd_convert(&report, output.as_deref()),
        Commands::Pdf {
            report,
            output,
            uncompressed,
        } => cmd_pdf(&report, output.as_deref(), uncompressed),
        Commands::Docx { report, output } => cmd_docx(&report, output.as_deref()),
        Commands::Json {
            report,
            output,
            compact,
            paginated,
        } => cmd_json(&report, output.as_deref(), compact, paginated),
        Commands::Info { report } => cmd_info(&report),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(report: &ReportArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| report.default_output_dir());

    let pb = ProgressBar::new(OutputFormat::ALL.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing report...");
    let doc = report.load(report.options())?;
    pb.inc(1);

    let mut written = Vec::new();
    for format in OutputFormat::ALL {
        pb.set_message(format!("Writing {}...", format.extension().to_uppercase()));
        let path = doc.save(&output_dir, format)?;
        written.push(path);
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{} {}", "Output files in".green().bold(), output_dir.display());
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn write_output(
    bytes: &[u8],
    output: Option<&Path>,
    default_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(default_name));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, bytes)?;
    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_pdf(
    report: &ReportArgs,
    output: Option<&Path>,
    uncompressed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = report.load(report.options().with_compression(!uncompressed))?;
    let result = doc.export(OutputFormat::Pdf)?;
    write_output(&result.bytes, output, &result.file_name)
}

fn cmd_docx(report: &ReportArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = report.load(report.options())?;
    let result = doc.export(OutputFormat::Docx)?;
    write_output(&result.bytes, output, &result.file_name)
}

fn cmd_json(
    report: &ReportArgs,
    output: Option<&Path>,
    compact: bool,
    paginated: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let layout = if paginated {
        JsonLayout::Paginated
    } else {
        JsonLayout::Flow
    };

    let doc = report.load(report.options().with_json_format(format))?;

    let mut registry = ExporterRegistry::new();
    registry.register(std::sync::Arc::new(JsonExporter::new().with_layout(layout)));
    let result = doc.export_with(&registry, "json")?;

    match output {
        Some(path) => write_output(&result.bytes, Some(path), &result.file_name),
        None => {
            println!("{}", String::from_utf8_lossy(&result.bytes));
            Ok(())
        }
    }
}

fn cmd_info(report: &ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = report.load(report.options())?;
    let stats = doc.stats()?;
    let meta = doc.metadata();
    let geometry = doc.geometry();

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), report.input.display());
    println!("{}: {}", "Title".bold(), meta.title());
    println!("{}: {}", "Company".bold(), meta.company);
    println!("{}: {}", "Report Type".bold(), meta.report_type);
    println!("{}: {}", "Generated".bold(), meta.date_string());
    println!(
        "{}: {} x {} pt",
        "Page Size".bold(),
        geometry.page_width,
        geometry.page_height
    );
    println!("{}: {}", "Lines per Page".bold(), stats.lines_per_page);
    println!("{}: {}", "Output Name".bold(), doc.file_name("pdf"));

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Bold Runs".bold(), stats.bold_run_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    let sections = doc.sections();
    if !sections.is_empty() {
        println!();
        println!("{}", "Sections".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for section in sections {
            let marker = if section.known.is_some() { "✓" } else { "·" };
            println!(
                "  {} {} {}",
                marker.green(),
                section.display_title(),
                format!("(line {})", section.line_index + 1).as_str().dimmed()
            );
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "reportdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Financial report rendering tool");
    println!();
    println!(
        "Formats: {}",
        ExporterRegistry::with_defaults().supported_extensions().join(", ")
    );
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportdoc::convert::PdfExporter;

    fn args(input: PathBuf) -> ReportArgs {
        ReportArgs {
            input,
            company: "Acme Corp".to_string(),
            report_type: ReportKind::Annual,
            date: NaiveDate::from_ymd_opt(2024, 12, 31),
            delimiter: '*',
            page_size: PageSize::A4,
            geometry: None,
            font_size: 11.0,
            sequential: true,
        }
    }

    #[test]
    fn test_cli_parses_shared_flags() {
        let cli = Cli::try_parse_from([
            "reportdoc",
            "pdf",
            "report.txt",
            "--company",
            "Acme",
            "-t",
            "annual",
            "--date",
            "2024-03-31",
            "--delimiter",
            "_",
            "--page-size",
            "a4",
        ])
        .unwrap();

        match cli.command {
            Commands::Pdf { report, .. } => {
                assert_eq!(report.company, "Acme");
                assert!(report.report_type == ReportKind::Annual);
                assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 3, 31));
                assert_eq!(report.delimiter, '_');
                assert!(report.page_size == PageSize::A4);
            }
            _ => panic!("expected pdf command"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.txt");
        fs::write(&input, "*1. Executive Summary*\nRevenue grew.").unwrap();

        let doc = args(input).load(ExportOptions::new()).unwrap();
        assert_eq!(doc.parsed().line_count(), 2);
        assert_eq!(doc.metadata().date_string(), "2024-12-31");
        assert_eq!(*doc.geometry(), PageGeometry::a4());
    }

    #[test]
    fn test_geometry_file_overrides_preset() {
        let dir = tempfile::tempdir().unwrap();
        let geometry = dir.path().join("geometry.json");
        fs::write(&geometry, r#"{"pageHeight": 500.0, "lineHeight": 20.0}"#).unwrap();

        let mut report = args(dir.path().join("unused.txt"));
        report.geometry = Some(geometry);
        let loaded = report.page_geometry().unwrap();
        assert_eq!(loaded.page_height, 500.0);
        assert_eq!(loaded.line_height, 20.0);
        assert_eq!(loaded.page_width, PageGeometry::letter().page_width);
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            args(PathBuf::from("q3.txt")).default_output_dir(),
            PathBuf::from("q3_output")
        );
        assert_eq!(
            args(PathBuf::from("-")).default_output_dir(),
            PathBuf::from("reportdoc_output")
        );
    }

    #[test]
    fn test_pdf_export_via_registry() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("report.txt");
        fs::write(&input, "line").unwrap();

        let doc = args(input).load(ExportOptions::new()).unwrap();
        let bytes = PdfExporter::new()
            .with_compression(false)
            .write(&doc.to_paginated().unwrap())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
