use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use ls8::clock::{Clock, TimerDriver};
use ls8::loader::{load_program, read_source};
use ls8::{error, info, Config, Cpu, Ls8Error, Ram, StdoutOutput};

#[derive(Parser, Debug)]
#[command(name = "ls8")]
#[command(about = "LS-8 emulator: runs a program of binary-literal lines", long_about = None)]
struct Args {
    /// Program file; reads STDIN when omitted
    program: Option<PathBuf>,

    /// Microseconds per CPU cycle (0 runs flat out)
    #[arg(long, default_value_t = 1_000)]
    tick_micros: u64,

    /// Milliseconds between timer interrupts (0 disables the timer)
    #[arg(long, default_value_t = 1_000)]
    timer_millis: u64,

    /// Log each instruction as it executes
    #[arg(long)]
    trace: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            tick: Duration::from_micros(self.tick_micros),
            timer_period: Duration::from_millis(self.timer_millis),
            trace: self.trace,
            ..Config::default()
        }
    }
}

fn run(args: &Args) -> Result<(), Ls8Error> {
    let config = args.config();
    ls8::log::init(config.trace);

    // load a program
    let text = match &args.program {
        Some(path) => read_source(&mut File::open(path)?)?,
        None => read_source(&mut io::stdin().lock())?,
    };
    let mut ram = Ram::new(config.memory_size)?;
    let len = load_program(&mut ram, &text)?;
    info!("loaded {} bytes", len);

    // loading is done; only now do the drivers start
    let mut cpu = Cpu::new(ram, StdoutOutput::new());
    let _timer = if config.timer_period.is_zero() {
        None
    } else {
        Some(TimerDriver::spawn(
            cpu.interrupt_latch(),
            config.timer_line,
            config.timer_period,
        )?)
    };
    let cycles = Clock::new(config.tick).run(&mut cpu)?;
    info!("halted after {} cycles", cycles);
    Ok(())
}

fn main() -> ExitCode {
    // clap prints usage and exits non-zero on a bad argument count
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
