use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::Value;
use sieve::{
    CompilationOptions, ExecutionOptions, ReporterStrategy, Validator, ValidatorOptions,
    render_error,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Sieve - schema-driven validation for JSON documents
#[derive(Parser, Debug)]
#[command(name = "sieve")]
#[command(about = "Validate a JSON document against a schema declaration", long_about = None)]
struct Args {
    /// Schema declaration (JSON)
    schema: PathBuf,

    /// Input document (if not provided, reads from stdin)
    input: Option<PathBuf>,

    /// Stop at the first failure
    #[arg(long)]
    fail_fast: bool,

    /// Print the compiled program instead of validating
    #[arg(long)]
    dump_program: bool,

    /// Leave `// Validate` comments out of the dumped program
    #[arg(long)]
    no_comments: bool,
}

fn read_json(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .into_diagnostic()
                .wrap_err("failed to read input from stdin")?;
            text
        }
    };
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    serde_json::from_str(&text)
        .into_diagnostic()
        .wrap_err_with(|| format!("{source} is not valid JSON"))
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let strategy = if args.fail_fast {
        ReporterStrategy::FailFast
    } else {
        ReporterStrategy::CollectAll
    };
    let validator = Validator::new(ValidatorOptions {
        default_compilation_options: CompilationOptions {
            comments: !args.no_comments,
        },
        default_execution_options: ExecutionOptions {
            strategy,
            ..ExecutionOptions::default()
        },
    });

    let declaration = read_json(Some(&args.schema))?;
    let schema = match validator.compile_declaration(&declaration) {
        Ok(schema) => schema,
        Err(e) => {
            render_error(&e);
            return Ok(ExitCode::from(2));
        }
    };
    debug!(
        instructions = schema.program().instructions().len(),
        "schema compiled"
    );

    if args.dump_program {
        print!("{}", schema.source());
        return Ok(ExitCode::SUCCESS);
    }

    let input = read_json(args.input.as_deref())?;
    match schema.validate(&input) {
        Ok(output) => {
            let pretty = serde_json::to_string_pretty(&output).into_diagnostic()?;
            println!("{pretty}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            render_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
