use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sprig_syntax::{
    lex, Diagnostic, Diagnostics, Lexer, ParseOptions, Parser as SyntaxParser, Program,
    SourceFile, Token,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TokenFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AstFormat {
    Debug,
    Json,
    Source,
}

#[derive(Parser)]
#[command(
    name = "sprig",
    version,
    about = "Inspect how sprig source is lexed and parsed."
)]
struct Cli {
    /// Log filter for diagnostics on stderr (e.g. `debug`, `sprig_syntax=trace`).
    #[arg(long, global = true, env = "SPRIG_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream produced by the lexer.
    Tokens {
        /// Path to a sprig source file, or `-` for stdin.
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = TokenFormat::Table)]
        format: TokenFormat,
    },
    /// Print the syntax tree produced by the parser.
    Ast {
        /// Path to a sprig source file, or `-` for stdin.
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = AstFormat::Debug)]
        format: AstFormat,

        /// Fail instead of printing a partial tree when the source has errors.
        #[arg(long)]
        strict: bool,
    },
    /// Parse the source and report syntax errors only.
    Check {
        /// Path to a sprig source file, or `-` for stdin.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Tokens { input, format } => run_tokens(&input, format),
        Command::Ast {
            input,
            format,
            strict,
        } => run_ast(&input, format, strict),
        Command::Check { input } => run_check(&input),
    }
}

fn init_logging(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter `{directive}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn read_source(input: &Path) -> Result<SourceFile> {
    let contents = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read source from stdin")?;
        buffer
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?
    };

    let path = if input.as_os_str() == "-" {
        PathBuf::from("<stdin>")
    } else {
        input.to_path_buf()
    };
    Ok(SourceFile::new(path, contents))
}

fn run_tokens(input: &Path, format: TokenFormat) -> Result<()> {
    let source = read_source(input)?;
    let tokens = lex(&source.contents);
    debug!(count = tokens.len(), "lexed source");

    match format {
        TokenFormat::Table => print_token_table(&tokens),
        TokenFormat::Json => {
            let json =
                serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_token_table(tokens: &[Token]) {
    println!("{:<10} {:<20} {:>6} {:>6}", "KIND", "LITERAL", "START", "END");
    for token in tokens {
        let kind: &'static str = token.kind.into();
        let literal = format!("{:?}", token.literal);
        println!(
            "{:<10} {:<20} {:>6} {:>6}",
            kind, literal, token.span.start, token.span.end
        );
    }
}

fn run_ast(input: &Path, format: AstFormat, strict: bool) -> Result<()> {
    let source = read_source(input)?;
    let (program, diagnostics) = parse_source(&source);
    report_diagnostics(&source, &diagnostics);

    let options = ParseOptions {
        fail_on_error: strict,
    };
    options
        .enforce(diagnostics.messages())
        .context("Parsing failed")?;

    match format {
        AstFormat::Debug => println!("{:#?}", program),
        AstFormat::Json => {
            let json =
                serde_json::to_string_pretty(&program).context("Failed to serialize syntax tree")?;
            println!("{json}");
        }
        AstFormat::Source => print!("{program}"),
    }

    Ok(())
}

fn run_check(input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let (_, diagnostics) = parse_source(&source);
    report_diagnostics(&source, &diagnostics);

    if !diagnostics.is_empty() {
        bail!(
            "{} has {} syntax error(s)",
            source.path.display(),
            diagnostics.len()
        );
    }

    println!("{}: ok", source.path.display());
    Ok(())
}

fn parse_source(source: &SourceFile) -> (Program, Diagnostics) {
    let mut parser = SyntaxParser::new(Lexer::new(&source.contents));
    let program = parser.parse_program();
    (program, parser.into_diagnostics())
}

fn report_diagnostics(source: &SourceFile, diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("Diagnostics:");
    for diagnostic in diagnostics.entries() {
        print_diagnostic(source, diagnostic);
    }
}

fn print_diagnostic(source: &SourceFile, diagnostic: &Diagnostic) {
    eprintln!("  - error: {}", diagnostic.message);
    let Some(span) = diagnostic.span else {
        return;
    };

    let (line, column) = source.line_column(span.start);
    eprintln!("     --> {}:{}:{}", source.path.display(), line, column);

    let Some(raw_line) = source.line_text(line) else {
        return;
    };
    let display_line = raw_line.replace('\t', "    ");
    eprintln!("      {}", display_line);

    let mut caret_line = String::from("      ");
    for ch in raw_line.chars().take(column.saturating_sub(1)) {
        match ch {
            '\t' => caret_line.push_str("    "),
            _ => caret_line.push(' '),
        }
    }

    // Underline to the end of the span, or the end of the line for spans
    // that continue onto later lines.
    let (end_line, end_column) = source.line_column(span.end);
    let highlight_len = if end_line == line {
        end_column.saturating_sub(column)
    } else {
        raw_line.chars().count().saturating_sub(column - 1)
    };

    caret_line.push_str(&"^".repeat(highlight_len.max(1)));
    eprintln!("{}", caret_line);
}
