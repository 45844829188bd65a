use anyhow::Result;
use minish::{Interpreter, signal};

fn main() -> Result<()> {
    env_logger::init();
    signal::install()?;

    let mut shell = Interpreter::default();
    shell.repl()
}
