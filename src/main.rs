//! flint - an interactive line-oriented shell
//!
//! Usage:
//!   flint              Start the interactive prompt
//!   flint -c "line"    Execute a single command line
//!   flint script       Execute a file of command lines

use flint::{Outcome, Shell};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::env;
use std::fs;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        r#"flint {} - an interactive line-oriented shell

USAGE:
    flint                   Start the interactive prompt
    flint -c <command>      Execute a single command line
    flint <script>          Execute a file of command lines
    flint --help            Show this help message
    flint --version         Show version

LINE GRAMMAR:
    cmd args...                       Run an external command from PATH
    cmd < in.txt                      Read standard input from a file
    cmd > out.txt                     Write standard output, truncating
    cmd >> out.txt                    Write standard output, appending
    cmd | cmd | cmd                   Pipe stages together
    cmd args &                        Run the whole pipeline detached
    "a b" or 'a b'                    Quote a single argument

BUILT-INS:
    cd <path>               Change directory (remembered in history)
    cdh                     Pick a remembered directory by letter or number
    take <a/b/c>            Create each path segment and cd into it
    ctrlz                   Undo the last cd or created directory
    filesearch [-r] [-o] <term>
                            Find entries whose name contains <term>;
                            -r recurses, -o opens matches with xdg-open
    joker                   Schedule a dad-joke notification every 15 min
    poet                    Print a random poem from ./poems
    exit                    Leave the shell (Ctrl-D works too)
"#,
        VERSION
    );
}

fn print_version() {
    println!("flint {}", VERSION);
}

/// Parsed command-line arguments
struct CliArgs {
    command: Option<String>,
    script: Option<String>,
    help: bool,
    version: bool,
}

fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs {
        command: None,
        script: None,
        help: false,
        version: false,
    };

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-c" => {
                // Everything after -c is the command
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                }
                break;
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            path => {
                if !path.starts_with('-') {
                    cli.script = Some(path.to_string());
                }
            }
        }
        i += 1;
    }

    cli
}

fn exit_code(status: i32) -> ExitCode {
    if status == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(status as u8)
    }
}

/// Execute lines non-interactively; errors are reported and the loop
/// continues, matching the interactive behavior
fn run_lines<'a>(shell: &mut Shell, lines: impl Iterator<Item = &'a str>) -> ExitCode {
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match shell.execute(trimmed) {
            Ok(Outcome::Exit) => break,
            Ok(Outcome::Continue) => {}
            Err(err) => eprintln!("flint: {}", err),
        }
    }
    exit_code(shell.last_status())
}

fn run_command(command: &str) -> ExitCode {
    let mut shell = Shell::new();
    run_lines(&mut shell, command.lines())
}

fn run_script(path: &str) -> ExitCode {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("flint: {}: {}", path, err);
            return ExitCode::FAILURE;
        }
    };
    let mut shell = Shell::new();
    run_lines(&mut shell, content.lines())
}

fn run_repl() -> rustyline::Result<ExitCode> {
    let mut rl = DefaultEditor::new()?;
    let mut shell = Shell::new();

    loop {
        // Reap finished background children before showing the prompt
        if flint::signals::take_sigchld() || shell.has_jobs() {
            shell.reap_jobs();
        }

        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match shell.execute(trimmed) {
                    Ok(Outcome::Exit) => break,
                    Ok(Outcome::Continue) => {}
                    Err(err) => eprintln!("flint: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C - drop the line, keep the shell
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D - exit
                break;
            }
            Err(err) => {
                eprintln!("flint: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    flint::signals::install();

    if let Some(command) = cli.command {
        return run_command(&command);
    }
    if let Some(script) = cli.script {
        return run_script(&script);
    }

    match run_repl() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("flint: {}", err);
            ExitCode::FAILURE
        }
    }
}
