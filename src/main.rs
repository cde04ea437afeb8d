mod repl;

use cadr::compiler::{eval, inline_primitives, Env, Node};
use cadr::{register_primitives, InputPort, LResult, Mode, PrimitiveTable, Session, SessionConfig, Value};
use rustyline::error::ReadlineError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::repl::Repl;

const USAGE: &str = "usage: cadr [--display] [--eval] [FILE]";

struct Options {
    mode: Mode,
    evaluate: bool,
    file: Option<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        mode: Mode::Write,
        evaluate: false,
        file: None,
    };
    for arg in args {
        match arg.as_str() {
            "--display" => options.mode = Mode::Display,
            "--eval" => options.evaluate = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            _ if options.file.is_some() => return Err("only one FILE may be given".to_string()),
            _ => options.file = Some(arg),
        }
    }
    Ok(options)
}

struct Driver {
    options: Options,
    primitives: PrimitiveTable,
    env: Env,
}

impl Driver {
    /// Echo a datum, or evaluate it with `--eval`, and print the result.
    fn process(&self, session: &mut Session, datum: Value) -> LResult<()> {
        let value = if self.options.evaluate {
            let mut node = Node::from_datum(&datum)?;
            let rewritten = inline_primitives(&mut node);
            debug!(rewritten, "lowered datum");
            eval(&node, &self.env, &self.primitives)?
        } else {
            datum
        };
        match self.options.mode {
            Mode::Display => session.display(&value, None)?,
            Mode::Write => session.write(&value, None)?,
        };
        session.newline(None)?;
        session.current_output_port().flush()
    }

    fn run_file(&self, session: &mut Session, path: &str) -> LResult<()> {
        let port = session.open_input_file(path)?;
        let result = self.drain(session, &port);
        session.close_input_port(&port);
        result
    }

    fn run_line(&self, session: &mut Session, line: &str) -> LResult<()> {
        let port = session.open_input_string(line);
        let result = self.drain(session, &port);
        session.close_input_port(&port);
        result
    }

    /// Process every datum on `port` until end of file.
    fn drain(&self, session: &mut Session, port: &InputPort) -> LResult<()> {
        loop {
            let datum = session.read_next(port)?;
            if datum.is_eof() {
                return Ok(());
            }
            self.process(session, datum)?;
        }
    }

    fn run_repl(&self, session: &mut Session) -> bool {
        let mut repl = match Repl::new() {
            Ok(repl) => repl,
            Err(e) => {
                eprintln!("Failed to start line editor: {}", e);
                return false;
            }
        };

        println!("cadr v{}", env!("CARGO_PKG_VERSION"));
        println!("Type (exit) to quit");
        println!();

        loop {
            match repl.read_line("> ") {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    if input == "(exit)" || input == "exit" {
                        break;
                    }
                    repl.add_history(input);
                    if let Err(e) = self.run_line(session, input) {
                        eprintln!("Error: {}", e);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    break;
                }
            }
        }

        repl.finalize();
        true
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            if message != USAGE {
                eprintln!("{}", USAGE);
            }
            std::process::exit(2);
        }
    };

    let mut config = SessionConfig::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
    {
        config = config.with_application_dir(dir);
    }
    let mut session = Session::new(config);

    let mut primitives = PrimitiveTable::new();
    register_primitives(&mut primitives);

    let file = options.file.clone();
    let driver = Driver {
        options,
        primitives,
        env: Env::default(),
    };

    let ok = match file {
        Some(path) => match driver.run_file(&mut session, &path) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Error: {}", e);
                false
            }
        },
        None => driver.run_repl(&mut session),
    };

    if !ok {
        std::process::exit(1);
    }
}
