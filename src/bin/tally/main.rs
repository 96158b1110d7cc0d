use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod render;
mod util;

fn main() -> ExitCode {
    #[cfg(feature = "log")]
    env_logger::init();

    let cli = cli::parse();
    let ctx = display::Context::detect().with_quiet(cli.command.common().quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
