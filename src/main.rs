//! Polang Compiler CLI
//!
//! The `polc` command is the entry point for the Polang compiler. It runs
//! the pipeline over one source file and writes the textual IR artifact.

use clap::Parser;
use polang::{dump, ir, lexer, parser};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polc")]
#[command(version = polang::VERSION)]
#[command(about = "The Polang Compiler", long_about = None)]
struct Cli {
    /// Source file to compile
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let input = cli
        .input
        .unwrap_or_else(|| PathBuf::from(polang::DEFAULT_SOURCE_PATH));

    println!("\nStart...");
    println!("Source file: \"{}\"", input.display());

    // Decode failure (missing file, invalid encoding) is a fatal startup error
    let source = fs::read_to_string(&input)
        .map_err(|e| miette::miette!("Failed to read file while initializing lexer: {}", e))?;

    let mut lexer = match lexer::Lexer::new(&source) {
        Ok(lexer) => lexer,
        Err(err) => {
            println!("{}", err);
            return Err(miette::miette!("scanning failed"));
        }
    };

    println!("Lexed tokens: {}", lexer.token_count());

    let mut parser = parser::Parser::new(&mut lexer);
    if let Err(err) = parser.parse() {
        print!("{}", err.render_report(&source));
        return Err(miette::miette!("parsing failed"));
    }

    println!("Parsed without error");
    print!(
        "{}",
        dump::print_ast_tree(parser.ast(), parser.source(), parser.root())
    );

    let module_name = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    let mut builder = ir::IrBuilder::new(module_name);
    let lowerer = ir::Lowerer::new(parser.ast(), parser.source());
    if let Err(err) = lowerer.lower_program(&mut builder, parser.root()) {
        println!("{}", err);
        return Err(miette::miette!("lowering failed"));
    }

    let module = builder.finish();
    if let Err(err) = ir::verify_module(&module) {
        println!("{}", err);
        return Err(miette::miette!("module verification failed"));
    }

    // A failed artifact write is reported but does not fail the run
    match fs::write(polang::IR_OUTPUT_PATH, ir::print_module(&module)) {
        Ok(()) => println!("IR file written to \"{}\"", polang::IR_OUTPUT_PATH),
        Err(err) => eprintln!("Failed to write IR file: {}", err),
    }

    println!("\nExited successfully.");
    Ok(())
}
