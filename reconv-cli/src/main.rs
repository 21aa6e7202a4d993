use clap::{Parser, Subcommand};
use colored::Colorize;
use reconv_core::{ConvertOptions, PatternConverter, SubstitutionConverter};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reconv")]
#[command(about = "Reconv - convert legacy highlight patterns to the canonical regex dialect")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a match pattern
    Pattern {
        /// The legacy pattern
        pattern: String,
        /// Show width and size details
        #[arg(short, long)]
        debug: bool,
        /// Maximum number of capturing groups
        #[arg(long, default_value_t = reconv_core::options::DEFAULT_MAX_GROUPS)]
        max_groups: usize,
        /// Maximum size in bytes of a character class body
        #[arg(long, default_value_t = reconv_core::options::DEFAULT_MAX_CLASS_BYTES)]
        max_class_bytes: usize,
    },
    /// Convert a substitution template
    Subst {
        /// The legacy template
        template: String,
        /// Reject unknown escapes instead of dropping the backslash
        #[arg(short, long)]
        strict: bool,
        /// Cap the output at this many bytes
        #[arg(long)]
        max_len: Option<usize>,
    },
    /// Convert one pattern per line from a file or stdin
    Batch {
        /// Input file, stdin when omitted
        file: Option<PathBuf>,
        /// Treat lines as substitution templates
        #[arg(short, long)]
        substitution: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pattern {
            pattern,
            debug,
            max_groups,
            max_class_bytes,
        } => {
            let options = ConvertOptions::new()
                .max_groups(max_groups)
                .max_class_bytes(max_class_bytes);
            cmd_pattern(&pattern, debug, options)
        }
        Commands::Subst {
            template,
            strict,
            max_len,
        } => cmd_subst(&template, strict, max_len),
        Commands::Batch { file, substitution } => cmd_batch(file, substitution),
    }
}

fn cmd_pattern(pattern: &str, debug: bool, options: ConvertOptions) {
    let converter = PatternConverter::with_options(options);

    match converter.convert_with_report(pattern) {
        Ok(report) if debug => report.report(),
        Ok(report) => println!("{}", report.output.green()),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(offset) = e.offset() {
                eprintln!("  {}", pattern);
                eprintln!("  {}{}", " ".repeat(offset), "^".yellow().bold());
            }
            std::process::exit(1);
        }
    }
}

fn cmd_subst(template: &str, strict: bool, max_len: Option<usize>) {
    let mut converter = SubstitutionConverter::new().strict(strict);
    if let Some(max) = max_len {
        converter = converter.max_len(max);
    }

    match converter.convert_checked(template) {
        Ok(result) => println!("{}", result.green()),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_batch(file: Option<PathBuf>, substitution: bool) {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => match std::fs::File::open(&path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("{} {}: {}", "Error:".red().bold(), path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let patterns = PatternConverter::new();
    let templates = SubstitutionConverter::new();
    let mut failures = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        };

        if substitution {
            println!("{}", templates.convert(&line));
            continue;
        }

        match patterns.convert(&line) {
            Ok(converted) => println!("{}", converted),
            Err(e) => {
                failures += 1;
                eprintln!("{} line {}: {}", "Error:".red().bold(), index + 1, e);
            }
        }
    }

    if failures > 0 {
        log::info!("{} pattern(s) failed to convert", failures);
        std::process::exit(1);
    }
}
