//! csv2sheet - convert CSV files into a single ODS or XLSX document

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;

use sheetstream_core::{SheetWriter, SpreadsheetWriter};
use sheetstream_csv::{CsvReadOptions, CsvSource};
use sheetstream_ods::OdsWriter;
use sheetstream_xlsx::XlsxWriter;

#[derive(Parser)]
#[command(name = "csv2sheet")]
#[command(
    author,
    version,
    about = "Convert CSV files into a single ODS or XLSX document, one sheet per input"
)]
struct Cli {
    /// Output document; `.xlsx` selects the XLSX backend, anything else
    /// writes ODS. `-` streams an ODS archive to stdout.
    output: String,

    /// Input sheets as `[name:]file.csv`; without a name the file stem is
    /// used. `-` (or no inputs at all) reads stdin.
    sheets: Vec<String>,

    /// CSV charset name (default: UTF-8)
    #[arg(short, long)]
    charset: Option<String>,

    /// Field delimiter (default: sniffed per file)
    #[arg(short, long)]
    delimiter: Option<char>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = CsvReadOptions {
        charset: cli.charset.clone(),
        delimiter: cli.delimiter.map(|c| c as u8),
        ..Default::default()
    };
    let inputs = parse_inputs(&cli.sheets);

    if cli.output.ends_with(".xlsx") {
        let mut writer = XlsxWriter::create(&cli.output)
            .with_context(|| format!("Failed to create '{}'", cli.output))?;
        convert(&writer, &inputs, &options)?;
        writer.close()?;
    } else if cli.output == "-" {
        // The archive needs a seekable sink; spool through an anonymous
        // temp file and copy it to stdout once finalized.
        let spool = tempfile::tempfile().context("Failed to create spool file")?;
        let mut readback = spool.try_clone().context("Failed to clone spool file")?;
        let mut writer = OdsWriter::new(spool)?;
        convert(&writer, &inputs, &options)?;
        writer.close()?;
        readback.seek(SeekFrom::Start(0))?;
        io::copy(&mut readback, &mut io::stdout().lock()).context("Failed to write to stdout")?;
    } else {
        let mut writer = OdsWriter::create(&cli.output)
            .with_context(|| format!("Failed to create '{}'", cli.output))?;
        convert(&writer, &inputs, &options)?;
        writer.close()?;
    }

    Ok(())
}

/// One CSV input destined for one sheet
struct SheetInput {
    name: String,
    /// `None` reads stdin
    file: Option<PathBuf>,
}

fn parse_inputs(args: &[String]) -> Vec<SheetInput> {
    if args.is_empty() {
        return vec![SheetInput {
            name: "Sheet1".to_string(),
            file: None,
        }];
    }
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            if let Some((name, file)) = arg.split_once(':') {
                let file = (!(file.is_empty() || file == "-")).then(|| PathBuf::from(file));
                SheetInput {
                    name: name.to_string(),
                    file,
                }
            } else if arg.is_empty() || arg == "-" {
                SheetInput {
                    name: format!("Sheet{}", i + 1),
                    file: None,
                }
            } else {
                let name = Path::new(arg)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("Sheet{}", i + 1));
                SheetInput {
                    name,
                    file: Some(PathBuf::from(arg)),
                }
            }
        })
        .collect()
}

fn open_source(input: &SheetInput, options: &CsvReadOptions) -> Result<CsvSource> {
    let source = match &input.file {
        Some(path) => CsvSource::open(path, options)
            .with_context(|| format!("Failed to open '{}'", path.display()))?,
        None => CsvSource::from_reader(io::stdin(), options).context("Failed to read stdin")?,
    };
    Ok(source)
}

/// Feed every input into the writer, one worker thread per sheet
///
/// Sheet creation order (and so the output order) follows the argument
/// order; the workers fill their sheets concurrently.
fn convert<W: SpreadsheetWriter>(
    writer: &W,
    inputs: &[SheetInput],
    options: &CsvReadOptions,
) -> Result<()> {
    thread::scope(|scope| {
        let mut workers = Vec::new();
        for input in inputs {
            let mut source = open_source(input, options)?;
            let mut sheet = writer.new_sheet(&input.name, &source.columns())?;
            workers.push(scope.spawn(move || -> Result<u64> {
                let mut rows = 0u64;
                for row in source.rows() {
                    sheet.append_row(&row?)?;
                    rows += 1;
                }
                sheet.close()?;
                Ok(rows)
            }));
        }
        for (input, worker) in inputs.iter().zip(workers) {
            let rows = worker
                .join()
                .map_err(|_| anyhow!("sheet worker panicked"))?
                .with_context(|| format!("Failed converting sheet '{}'", input.name))?;
            eprintln!("{}: {} rows", input.name, rows);
        }
        Ok(())
    })
}
