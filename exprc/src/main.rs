use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{Level, info};

use exprc::config::DEFAULT_MAX_TOKENS;
use exprc::emit::Emit;
use exprc::{CompileOptions, parser};

#[derive(Parser)]
#[command(name = "exprc")]
#[command(about = "Compiler front end for a tiny assignment/assert language", version)]
struct Cli {
    /// Подробный лог в stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Прогоняет весь конвейер и печатает выбранную стадию
    Compile {
        /// Исходник
        input: String,

        /// Стадия для вывода (см. `exprc stages`)
        #[arg(short, long, default_value = "ir")]
        emit: String,

        /// Файл для результата, иначе stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Не сворачивать константы
        #[arg(long)]
        no_optimize: bool,

        /// Предел количества токенов
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,

        /// Показать ast
        #[arg(long)]
        show_ast: bool,
    },

    /// Распарсить и показать токены и ast без проверки
    Parse {
        /// Исходник
        input: String,
    },

    /// Проверить исходник без генерации IR
    Check {
        /// Исходник
        input: String,
    },

    /// Список стадий для --emit
    Stages,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Compile { input, emit, output, no_optimize, max_tokens, show_ast } => {
            let Some(stage) = Emit::from_name(&emit) else {
                return Err(format!("unknown stage '{}', run `exprc stages` for the list", emit).into());
            };

            info!(%input, stage = stage.name(), "compiling");
            let source = exprc::read_source(&input)?;
            let options = CompileOptions {
                max_tokens,
                optimize: !no_optimize,
            };

            let rendered = if show_ast {
                let program = exprc::check(&source, &options)?;
                println!("=== AST ===");
                print!("{}", program);
                match stage.render_program(&program, &options)? {
                    Some(rendered) => rendered,
                    None => stage.render(&source, &options)?,
                }
            } else {
                stage.render(&source, &options)?
            };
            match output {
                Some(path) => {
                    fs::write(&path, &rendered)?;
                    println!("Written to: {}", path);
                }
                None => print!("{}", rendered),
            }
        }
        Commands::Parse { input } => {
            println!("Parsing {}...", input);

            let source = exprc::read_source(&input)?;

            println!("=== SOURCE ===");
            println!("{}", source);
            println!("=== TOKENS ===");

            let tokens = parser::lexer::tokenize(&source)?;
            for token in &tokens {
                println!("{}", token);
            }

            println!("=== AST ===");
            let program = parser::parser::parse_tokens(tokens)?;
            print!("{}", program);
        }
        Commands::Check { input } => {
            let source = exprc::read_source(&input)?;
            exprc::check(&source, &CompileOptions::default())?;
            println!("ok");
        }
        Commands::Stages => {
            println!("Supported stages:");
            for stage in Emit::all() {
                println!("  {:8} - {}", stage.name(), stage.description());
            }
        }
    }

    Ok(())
}
