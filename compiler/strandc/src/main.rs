//! Strand compiler CLI.

use strandc::commands;
use strandc::options::{parse_args, CliError};
use strandc::tracing_setup::init_tracing;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            if matches!(err, CliError::UnknownCommand(_) | CliError::MissingFile(_)) {
                eprintln!();
                print_usage();
            }
            std::process::exit(2);
        }
    };
    init_tracing(options.verbose);

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    match commands::run(&options, &mut stdout, &mut stderr) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Strand compiler");
    eprintln!();
    eprintln!("Usage: strandc <command> <file.sd> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  check     Load the file and everything it imports, report errors");
    eprintln!("  deps      As check, then print one dependency record per import");
    eprintln!("  imports   Print the file's import declarations in canonical form");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -I <dir>        Add an import search root (repeatable)");
    eprintln!("  --json          JSON output for `deps` and `imports`");
    eprintln!("  -v, --verbose   Log resolver activity unless STRAND_LOG is set");
    eprintln!();
    eprintln!("Search roots from STRAND_IMPORT_PATH follow the -I roots; the root");
    eprintln!("file's own directory is searched last.");
}
