use crate::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io;

pub fn run(shell: String) -> Result<()> {
    let mut cmd = Cli::command();
    match shell.as_str() {
        "bash" => generate(Bash, &mut cmd, "srctl", &mut io::stdout()),
        "zsh" => generate(Zsh, &mut cmd, "srctl", &mut io::stdout()),
        "fish" => generate(Fish, &mut cmd, "srctl", &mut io::stdout()),
        other => {
            eprintln!("unsupported shell '{}', choose: bash, zsh, fish", other);
            std::process::exit(1);
        }
    }
    Ok(())
}
