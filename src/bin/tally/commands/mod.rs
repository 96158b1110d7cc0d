mod batch;
mod count;

use batch::run_batch;
use count::run_count;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context as DisplayContext;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Count(args) => run_count(args, ctx),
        Command::Batch(args) => run_batch(args, ctx),
    }
}
