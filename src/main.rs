use std::{env, process};

use curmit::cli::{dispatch, output};
use curmit::interrupt::Interrupt;
use curmit::runner::Curmit;

fn main() {
    let interrupt = Interrupt::install().unwrap_or_else(|e| {
        output::warning(&format_args!("Ctrl-C will not cancel cleanly: {e}"));
        Interrupt::new()
    });

    let runner = Curmit::new(interrupt);
    process::exit(dispatch(env::args_os(), &runner));
}
