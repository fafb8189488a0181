use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use primitive_db::{AutoConfirm, Config, Confirm, Executor, Response};

/// Confirmation questions asked through the shell's line editor.
struct Prompt<'a> {
    editor: &'a mut DefaultEditor,
}

impl Confirm for Prompt<'_> {
    fn confirm(&mut self, action: &str) -> bool {
        let question = format!("Are you sure you want to {action}? [y/n]: ");
        match self.editor.readline(&question) {
            Ok(answer) => answer.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    info!(
        meta_file = %config.meta_file.display(),
        data_dir = %config.data_dir.display(),
        "primitive-db starting"
    );

    let mut executor = Executor::new(config.open_store(), config.select_cache());

    if !config.commands.is_empty() {
        let mut confirm = AutoConfirm(config.yes);
        for command in &config.commands {
            match executor.execute(command, &mut confirm) {
                Response::Output(text) => println!("{text}"),
                Response::Silent => {}
                Response::Exit => break,
            }
        }
        return Ok(());
    }

    let mut editor = DefaultEditor::new()?;
    println!("Welcome to primitive-db. Type 'help' for commands, 'exit' to leave.");

    loop {
        let line = match editor.readline(">>> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        editor.add_history_entry(line.as_str())?;

        let response = if config.yes {
            executor.execute(&line, &mut AutoConfirm(true))
        } else {
            executor.execute(&line, &mut Prompt { editor: &mut editor })
        };
        match response {
            Response::Output(text) => println!("{text}"),
            Response::Silent => {}
            Response::Exit => break,
        }
    }

    println!("Goodbye!");
    Ok(())
}
