use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{debug, Level};
use vm::StdoutHost;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Type-checked static compilation to WebAssembly
    Wasm,
    /// Interpreted execution on the reference interpreter
    Vm,
    /// Print the closure-converted intermediate representation
    Ir,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input source file
    #[arg(short, long)]
    input: PathBuf,
    /// Target compilation strategy
    #[arg(short, long, value_enum, default_value_t = Target::Wasm)]
    target: Target,
    /// With the wasm target, write the assembled binary here instead of printing text
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Stop after type checking and print the principal type
    #[arg(long)]
    check: bool,
    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let program = parser::parse(&source)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    debug!(program = %program, "parsed");

    match args.target {
        Target::Vm => interpret(&program, &args),
        Target::Wasm | Target::Ir => compile(&program, &args),
    }
}

fn interpret(program: &ast::Expr, args: &Args) -> anyhow::Result<()> {
    if args.check || args.output.is_some() {
        bail!("--check and --output only apply to compiled targets");
    }
    let mut host = StdoutHost::new();
    let value = vm::eval_expr(program, &mut host).context("runtime error")?;
    println!("{value}");
    Ok(())
}

fn compile(program: &ast::Expr, args: &Args) -> anyhow::Result<()> {
    let ty = wasm::type_of(program).context("type checking failed")?;
    if args.check {
        println!("{program} : {ty}");
        return Ok(());
    }

    let module = wasm::to_ir(program).context("closure conversion failed")?;
    if args.target == Target::Ir {
        print!("{module}");
        return Ok(());
    }
    match &args.output {
        Some(path) => {
            let bytes = wasm::assemble(&module);
            fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{}", wasm::emit(&module)),
    }
    Ok(())
}
