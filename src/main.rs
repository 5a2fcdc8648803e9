use std::{fs, path::PathBuf, process::ExitCode, sync::Once};

use clap::{Args, Parser, Subcommand};
use tracing::error;
use xi::{
    diagnostic::{run_file, Stage},
    display_error,
    parser::parser::Mode,
};

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=xi=debug` or `RUST_LOG=xi=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

#[derive(Parser)]
#[command(name = "xi", about = "Front end for the Xi language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write diagnostic output for a front end stage next to each file
    Diagnostic(DiagnosticArgs),
}

#[derive(Args)]
struct DiagnosticArgs {
    /// Write the token stream to `<file>.lexed`
    #[arg(long, group = "stage")]
    lex: bool,

    /// Write the syntax tree to `<file>.parsed`
    #[arg(long, group = "stage")]
    parse: bool,

    /// Write the type checking verdict to `<file>.typed`
    #[arg(long, group = "stage")]
    typecheck: bool,

    /// Trace parser rules on stderr
    #[arg(long)]
    trace: bool,

    files: Vec<PathBuf>,
}

impl DiagnosticArgs {
    fn stage(&self) -> Option<Stage> {
        if self.lex {
            Some(Stage::Lex)
        } else if self.parse {
            Some(Stage::Parse)
        } else if self.typecheck {
            Some(Stage::Typecheck)
        } else {
            None
        }
    }

    fn mode(&self) -> Mode {
        let mut mode = Mode::empty();
        if self.trace {
            mode |= Mode::TRACE;
        }
        mode
    }
}

fn run_diagnostic(args: &DiagnosticArgs) -> bool {
    let Some(stage) = args.stage() else {
        return true;
    };

    let mut ok = true;
    for path in &args.files {
        if let Err(err) = run_file(stage, args.mode(), path) {
            error!(file = %path.display(), "{}", err);

            let source = fs::read_to_string(path).unwrap_or_default();
            display_error(&err, &source, &path.to_string_lossy());
            ok = false;
        }
    }
    ok
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let ok = match &cli.command {
        Commands::Diagnostic(args) => run_diagnostic(args),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
