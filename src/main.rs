use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use loxi::Lox;

/// A tree-walking interpreter for the Lox programming language.
#[derive(ClapParser, Debug)]
#[command(name = "loxi", version, about)]
struct Cli {
    /// Script to run. Omit to start an interactive prompt.
    script: Option<PathBuf>,

    /// Print the parsed AST instead of interpreting the script.
    #[arg(short = 'p', long = "print")]
    print: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let mut lox = Lox::new();

    match cli.script {
        Some(path) if cli.print => lox.print_file(&path),
        Some(path) => lox.run_file(&path),
        None => run_prompt(&mut lox),
    }
}

fn run_prompt(lox: &mut Lox) -> ExitCode {
    let mut editor = DefaultEditor::new().expect("terminal to support line editing");
    let history_path = home::home_dir().map(|home| home.join(".loxi_history"));

    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(&line);
                lox.run_line(&line);
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(error) => {
                log::error!("failed to read line: {error}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    ExitCode::from(loxi::EXIT_OK)
}
