//! Eigenlab main: subcommands, or the interactive lab by default.

use clap::Parser;

use eigenlab::cli::{Command, EigenlabCli};
use eigenlab::commands;
use eigenlab::config::LabConfig;
use eigenlab::core::debug::init_logging;
use eigenlab::shell;

fn set_console_title() {
    use crossterm::{execute, terminal::SetTitle};
    let _ = execute!(std::io::stdout(), SetTitle("Eigenlab"));
}

fn main() -> anyhow::Result<()> {
    let args = EigenlabCli::parse();
    init_logging(args.verbose);

    let mut cfg = LabConfig::load(args.config.as_deref())?;
    if args.no_color {
        cfg.color = false;
        colored::control::set_override(false);
    }

    match args.cmd {
        None | Some(Command::Lab) => {
            set_console_title();
            shell::start(&cfg)
        }
        Some(Command::Calc { source, steps, format, out }) => {
            commands::calc::main(source, steps, format, out, &cfg)
        }
        Some(Command::Poly { source }) => commands::poly::main(source, &cfg),
        Some(Command::Example { size }) => commands::example::main(size, &cfg),
    }
}
