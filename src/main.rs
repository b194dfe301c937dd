#[cfg(not(feature = "binary"))]
compile_error!("To compile the joe interpreter binary, you must enable the `binary` feature flag");

use std::{env, fs, io, path::PathBuf, process::exit};

use clap::{error::ErrorKind, Parser};
use joe::{run_regressions, Config, GridFmt, Joe, JoeResult, MemoStrategy, Operand};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing_subscriber::{prelude::*, reload, EnvFilter, Registry};

fn main() {
    let app = match App::try_parse() {
        Ok(app) => Some(app),
        Err(e) if e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        Err(e) => e.exit(),
    };
    let Some(app) = app else {
        let config = Config::default();
        let logging = Logging::init(config.debug);
        repl(Joe::with_config(config), &logging);
        return;
    };
    match app {
        App::Eval { code, options } => {
            let config = options.config();
            let _logging = Logging::init(config.debug);
            let mut joe = Joe::with_config(config);
            if let Err(e) = eval(&mut joe, &code) {
                println!("{}", e.report(&code));
                exit(1);
            }
        }
        App::Run { path, options } => {
            let config = options.config();
            let _logging = Logging::init(config.debug);
            let mut joe = Joe::with_config(config);
            match joe.load_file(&path) {
                Ok(result) => print_result(result.as_ref(), joe.config().table),
                Err(e) => {
                    let src = fs::read_to_string(&path).unwrap_or_default();
                    println!("{}", e.report(&src));
                    exit(1);
                }
            }
        }
        App::Repl { options } => {
            let config = options.config();
            let logging = Logging::init(config.debug);
            repl(Joe::with_config(config), &logging);
        }
        App::Test { options } => {
            let config = options.config();
            let _logging = Logging::init(config.debug);
            if run_regressions(&config) > 0 {
                exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[clap(version)]
enum App {
    #[clap(about = "Evaluate an expression and print its result")]
    Eval {
        code: String,
        #[clap(flatten)]
        options: ConfigOptions,
    },
    #[clap(about = "Run a file and print the result of its last statement")]
    Run {
        path: PathBuf,
        #[clap(flatten)]
        options: ConfigOptions,
    },
    #[clap(about = "Run the Joe interpreter in a REPL")]
    Repl {
        #[clap(flatten)]
        options: ConfigOptions,
    },
    #[clap(about = "Run the regression programs")]
    Test {
        #[clap(flatten)]
        options: ConfigOptions,
    },
}

#[derive(clap::Args)]
struct ConfigOptions {
    #[clap(long, help = "Print results as aligned tables")]
    table: bool,
    #[clap(long, help = "Trace every reduction and call to stderr")]
    debug: bool,
    #[clap(
        long,
        default_value_t = MemoStrategy::Off,
        help = "Which calls to memoize (one of off, named, or all)"
    )]
    memo: MemoStrategy,
    #[clap(
        long,
        default_value_t = Config::default().recursion_limit,
        help = "The deepest calls and groups may nest"
    )]
    recursion_limit: usize,
}

impl ConfigOptions {
    fn config(&self) -> Config {
        Config::default()
            .with_table(self.table)
            .with_debug(self.debug)
            .with_memo(self.memo)
            .with_recursion_limit(self.recursion_limit)
    }
}

/// The tracing subscriber, with a filter that can be swapped at runtime
struct Logging(reload::Handle<EnvFilter, Registry>);

impl Logging {
    fn init(debug: bool) -> Self {
        let (filter, handle) = reload::Layer::new(filter(debug));
        _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init();
        Logging(handle)
    }
    fn set_debug(&self, debug: bool) {
        if let Err(e) = self.0.reload(filter(debug)) {
            eprintln!("Failed to change the log filter: {e}");
        }
    }
}

fn filter(debug: bool) -> EnvFilter {
    if env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::new(if debug { "warn,joe=trace" } else { "warn" })
}

fn eval(joe: &mut Joe, code: &str) -> JoeResult {
    let result = joe.load_str(code)?;
    print_result(result.as_ref(), joe.config().table);
    Ok(())
}

fn print_result(result: Option<&Operand>, table: bool) {
    match result {
        Some(Operand::Value(value)) if table => print!("{}", value.grid_string()),
        Some(result) => println!("{result}"),
        None => {}
    }
}

fn repl(mut joe: Joe, logging: &Logging) {
    let mut line_reader = match DefaultEditor::new() {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Failed to read from stdin: {e}");
            exit(1);
        }
    };
    println!("Joe {} (end with exit or ctrl+C)\n", env!("CARGO_PKG_VERSION"));
    loop {
        let line = match line_reader.readline("   ") {
            Ok(line) => line,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(e) => {
                eprintln!("Failed to read from stdin: {e}");
                break;
            }
        };
        let code = line.trim();
        if code.is_empty() {
            continue;
        }
        _ = line_reader.add_history_entry(code);
        match code {
            "exit" => break,
            "debug on" | "debug off" => {
                let debug = code == "debug on";
                joe.set_debug(debug);
                logging.set_debug(debug);
            }
            code => match joe.load_str(code) {
                Ok(result) => print_result(result.as_ref(), joe.config().table),
                Err(e) => eprintln!("{}", e.report(code)),
            },
        }
    }
}
