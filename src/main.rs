//! xlsxdocgen command-line tool
//!
//! Generates one Word document per spreadsheet record.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::info;
use xlsxdocgen::{list_sheet_names, DocGenError, DocType, GeneratorBuilder};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Batch-generate Word documents from Excel rows and a placeholder template"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one .docx per record into the output directory
    Generate {
        /// procurement-plan (goi_thau_khlcnt) or header-table (header_table)
        #[arg(long)]
        doc_type: String,
        #[arg(long)]
        excel_file: PathBuf,
        #[arg(long)]
        template_file: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
        /// Sheet to read (default: "Bảng 3" for procurement-plan, first sheet otherwise)
        #[arg(long)]
        sheet_name: Option<String>,
        /// Fail instead of overwriting existing output files
        #[arg(long)]
        no_replace: bool,
        /// Print the extracted records as JSON without writing documents
        #[arg(long)]
        dry_run: bool,
    },
    /// List the sheet names of a workbook
    Sheets { excel_file: PathBuf },
    /// List the placeholder names of a template
    Keys { template_file: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        handle_error(e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), DocGenError> {
    match command {
        Command::Generate {
            doc_type,
            excel_file,
            template_file,
            output_dir,
            sheet_name,
            no_replace,
            dry_run,
        } => {
            let doc_type: DocType = doc_type.parse()?;
            let mut builder = GeneratorBuilder::new()
                .with_doc_type(doc_type)
                .replace(!no_replace);
            if let Some(name) = sheet_name {
                builder = builder.with_sheet_name(name);
            }
            let generator = builder.build()?;
            info!("Document type: {}", generator.doc_type());

            if dry_run {
                let records = generator.extract_records(&excel_file, &template_file)?;
                let json = serde_json::to_string_pretty(&records).map_err(|e| {
                    DocGenError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })?;
                println!("{}", json);
                info!("Dry run: {} record(s) extracted", records.len());
                return Ok(());
            }

            let report = generator.generate(&excel_file, &template_file, &output_dir)?;
            println!(
                "Generated {} document(s) in {}",
                report.count(),
                output_dir.display()
            );
        }
        Command::Sheets { excel_file } => {
            for name in list_sheet_names(&excel_file)? {
                println!("{}", name);
            }
        }
        Command::Keys { template_file } => {
            let generator = GeneratorBuilder::new().build()?;
            for key in generator.discover_keys(&template_file)?.sorted() {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

fn handle_error(error: DocGenError) {
    match error {
        DocGenError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that you have permission to read the inputs and write the output directory.");
        }
        DocGenError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel workbook or may be corrupted.");
        }
        DocGenError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The template may be corrupted or not a valid .docx file.");
        }
        DocGenError::Xml(msg) => {
            eprintln!("XML Error: {}", msg);
            eprintln!("The template contains malformed document XML.");
        }
        DocGenError::Configuration(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check the doc type, sheet name and template placeholders.");
        }
        DocGenError::InputNotFound { kind, path } => {
            eprintln!("{} not found: {}", kind, path.display());
        }
        DocGenError::Extraction(msg) => {
            eprintln!("Extraction Error: {}", msg);
            eprintln!("Use the `sheets` command to check that the right sheet is selected.");
        }
        DocGenError::FileExists(path) => {
            eprintln!("Output file already exists: {}", path.display());
            eprintln!("Remove it or run without --no-replace.");
        }
        DocGenError::Dependency(msg) => {
            eprintln!("Dependency Error: {}", msg);
        }
        DocGenError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The template violates security constraints (e.g., archive size limit).");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: [&str; 4] = ["--excel-file", "a.xlsx", "--template-file", "t.docx"];

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        let args = ["xlsxdocgen", "generate"]
            .into_iter()
            .chain(INPUTS)
            .chain(extra.iter().copied());
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_generate_requires_doc_type_and_output_dir() {
        assert!(parse(&["--output-dir", "out"]).is_err());
        assert!(parse(&["--doc-type", "header-table"]).is_err());
    }

    #[test]
    fn test_generate_arguments() {
        let cli = parse(&["--doc-type", "goi_thau_khlcnt", "--output-dir", "out", "--no-replace"]).unwrap();
        match cli.command {
            Command::Generate {
                doc_type,
                output_dir,
                no_replace,
                dry_run,
                sheet_name,
                ..
            } => {
                assert_eq!(doc_type, "goi_thau_khlcnt");
                assert_eq!(output_dir, PathBuf::from("out"));
                assert!(no_replace);
                assert!(!dry_run);
                assert!(sheet_name.is_none());
            }
            _ => panic!("Expected generate command"),
        }
    }
}
