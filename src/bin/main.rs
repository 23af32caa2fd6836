use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::LevelFilter;

use emulator::loader::{self, LoadError};
use emulator::region::Chunk;
use emulator::vm::{self, Vm};

const EXIT_USAGE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_BAD_PROGRAM: u8 = 3;
const EXIT_FAULT: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "ls8", version)]
#[command(about = "Run a program on the LS-8 emulator", long_about = None)]
struct Args {
  /// Program to run, one binary byte per line
  program: PathBuf,

  /// Log the machine state before every instruction
  #[arg(long)]
  trace: bool,
}

fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) => {
      let _ = e.print();
      // --help and --version land here too
      return if e.use_stderr() {
        ExitCode::from(EXIT_USAGE)
      } else {
        ExitCode::SUCCESS
      };
    }
  };

  let mut logger = env_logger::Builder::from_env(Env::default().filter_or("LS8_LOG", "warn"));
  if args.trace {
    logger.filter_module("emulator", LevelFilter::Trace);
  }
  logger.format_timestamp(None).init();

  let chunk = match loader::load(&args.program) {
    Ok(chunk) => chunk,
    Err(e @ LoadError::NotFound { .. }) => {
      eprintln!("{e}");
      return ExitCode::from(EXIT_NOT_FOUND);
    }
    Err(e) => {
      eprintln!("error: {e}");
      return ExitCode::from(EXIT_BAD_PROGRAM);
    }
  };

  let mut vm = Vm::new();
  let mut out = io::stdout().lock();
  match execute(&mut vm, &chunk, &mut out) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::debug!("{}", vm.trace());
      eprintln!("error: {e}");
      ExitCode::from(EXIT_FAULT)
    }
  }
}

fn execute<W>(vm: &mut Vm, chunk: &Chunk, out: &mut W) -> Result<(), vm::Error>
where
  W: Write,
{
  vm.load(chunk)?;
  vm.run(out)?;
  out.flush()?;
  Ok(())
}
