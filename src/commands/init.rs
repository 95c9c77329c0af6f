use crate::{
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Reset the configuration to defaults instead of prompting
    #[arg(short, long)]
    reset: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let config = match init_args.reset {
        true => Config::default(),
        false => Config::init()?,
    };
    config.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
