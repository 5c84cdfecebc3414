mod test_runner;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use clap::error::ErrorKind as ClapErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use env_logger::Env;
use log::{LevelFilter, debug};

use ippcode::parser::ParseError;

const SUBCOMMANDS: &[&str] = &["parse", "test", "help"];

/// Exit status for unusable command-line arguments.
const EXIT_BAD_ARGS: i32 = 10;
/// Exit status when the input cannot be opened or read.
const EXIT_INPUT: i32 = 11;
/// Exit status when the output cannot be written.
const EXIT_OUTPUT: i32 = 12;

#[derive(Parser)]
#[command(
    name = "ippc",
    version,
    about = "Reads IPPcode22 source and prints its XML representation",
    propagate_version = true
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log progress to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a source file (or stdin) to XML
    Parse(ParseArgs),

    /// Run .test.ipp fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// IPPcode22 source file; stdin when omitted
    file: Option<String>,

    /// Write the XML here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Validate only, don't print the XML (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the parsed program model instead of XML
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.ipp file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `parse` is the default: `ippc file.ipp` and a bare `ippc` (stdin) both
    // run it. Global help/version without a subcommand are left alone.
    let mut args: Vec<String> = std::env::args().collect();
    let first_pos = args.iter().skip(1).find(|a| !a.starts_with('-')).cloned();
    let wants_info = args
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version"));
    let inject = match &first_pos {
        Some(pos) => !SUBCOMMANDS.contains(&pos.as_str()),
        None => !wants_info,
    };
    if inject {
        args.insert(1, "parse".to_string());
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(EXIT_BAD_ARGS),
            }
        }
    };

    init_logging(cli.verbose);

    match cli.command {
        Command::Parse(parse_args) => do_parse(parse_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

fn do_parse(args: ParseArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Read source
    let (name, source) = match &args.file {
        Some(path) => match fs::read_to_string(path) {
            Ok(s) => (path.clone(), s),
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(EXIT_INPUT);
            }
        },
        None => {
            let mut s = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut s) {
                eprintln!("error: cannot read stdin: {}", e);
                process::exit(EXIT_INPUT);
            }
            ("<stdin>".to_string(), s)
        }
    };
    debug!("read {} bytes from {}", source.len(), name);

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    let file_id = files.add(name.clone(), source.clone());

    // Parse
    let parser = ippcode::parser::Parser::new(source, file_id);
    let program = match parser.parse() {
        Ok(p) => p,
        Err(error) => {
            emit_parse_error(color_choice, &files, &error);
            process::exit(error.exit_code());
        }
    };

    // --check: parse succeeded, exit
    if args.check {
        eprintln!(
            "ok: {} parsed successfully ({} instructions)",
            name,
            program.instructions.len()
        );
        return;
    }

    // --ast: dump the program model
    if args.ast {
        println!("{:#?}", program);
        return;
    }

    let xml = program.to_xml();
    let written = match &args.output {
        Some(path) => fs::write(path, xml.as_bytes()),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(xml.as_bytes()).and_then(|_| lock.flush())
        }
    };
    if let Err(e) = written {
        let target = args.output.as_deref().unwrap_or("stdout");
        eprintln!("error: cannot write '{}': {}", target, e);
        process::exit(EXIT_OUTPUT);
    }
}

fn emit_parse_error(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    error: &ParseError,
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let diagnostic = error.to_diagnostic();
    if term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic).is_err() {
        eprintln!("{}", error);
    }
}
