use anyhow::{Context, Result};
use clap::{ArgAction, Parser as ClapParser, Subcommand};
use regcalc::driver::{Session, SessionOptions};
use regcalc::lexer::{Scanner, TokenKind, TokenSource};
use regcalc::parser::{Parser, Statement, DEFAULT_MAX_NESTING};
use regcalc::symbol::DEFAULT_CAPACITY;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "regcalc")]
#[command(about = "Compile arithmetic statements to register machine instructions", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize the input and print tokens
    Lex {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Parse the input and print each statement's tree in prefix order
    Parse {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Compile the input to register machine instructions
    Compile {
        /// Input file path (defaults to stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output file path (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Number of variables the store can hold
        #[arg(long, value_name = "N", default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Print a prompt to stderr before each statement
        #[arg(long)]
        prompt: bool,

        /// Deepest nesting of parentheses, signs and assignments per statement
        #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_NESTING)]
        max_nesting: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lex { file } => lex_input(file.as_deref())?,
        Commands::Parse { file } => parse_input(file.as_deref())?,
        Commands::Compile {
            file,
            output,
            capacity,
            prompt,
            max_nesting,
        } => {
            let options = SessionOptions {
                capacity,
                prompt,
                max_nesting,
            };
            compile_input(file.as_deref(), output.as_deref(), options)?
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to read file '{}'", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn input_name(path: Option<&Path>) -> String {
    path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

fn lex_input(path: Option<&Path>) -> Result<()> {
    let name = input_name(path);
    let mut scanner = Scanner::new(open_input(path)?);

    println!("Tokens:");
    println!("-------");
    let mut count = 0;
    loop {
        let token = scanner
            .next_token()
            .with_context(|| format!("failed to tokenize '{name}'"))?;
        println!(
            "{}:{}:{} {:?} {}",
            name, token.pos.line, token.pos.column, token.kind, token.lexeme
        );
        count += 1;
        if token.kind == TokenKind::Eof {
            break;
        }
    }

    println!("\nTotal tokens: {count}");

    Ok(())
}

fn parse_input(path: Option<&Path>) -> Result<()> {
    let name = input_name(path);
    let mut parser = Parser::new(Scanner::new(open_input(path)?));

    let statements = parser
        .parse_all()
        .with_context(|| format!("failed to parse '{name}'"))?;

    println!("Prefix traversal:");
    println!("=================\n");
    for (i, statement) in statements.iter().enumerate() {
        match statement {
            Statement::Expression(expr) => println!("  [{i}]: {expr}"),
            Statement::Empty => println!("  [{i}]: <empty>"),
            Statement::EndOfInput => {}
        }
    }

    println!("\nParsing completed successfully!");

    Ok(())
}

fn compile_input(path: Option<&Path>, output: Option<&Path>, options: SessionOptions) -> Result<()> {
    let name = input_name(path);
    let input = open_input(path)?;

    let writer: Box<dyn Write> = match output {
        Some(output_path) => {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            let file = File::create(output_path)
                .with_context(|| format!("failed to write instructions to '{}'", output_path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let mut session = Session::new(input, writer, options);
    session.run().map_err(|err| {
        let context = match err.kind() {
            Some(kind) => format!("{kind} in '{name}'"),
            None => format!("failed to compile '{name}'"),
        };
        anyhow::Error::new(err).context(context)
    })?;

    Ok(())
}
