use crate::{
    db::clients::Clients,
    libs::{messages::Message, reference::Client, view::View},
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    command: ClientCommand,
}

#[derive(Debug, Subcommand)]
enum ClientCommand {
    /// Add a client
    Add { name: String },
    /// List clients
    List,
    /// Delete a client
    Delete { id: String },
}

pub fn cmd(args: ClientArgs) -> Result<()> {
    let clients = Clients::new()?;
    match args.command {
        ClientCommand::Add { name } => {
            let client = Client::new(&name);
            clients.insert(&client)?;
            msg_success!(Message::ClientCreated(client.name));
        }
        ClientCommand::List => {
            let all = clients.fetch()?;
            if all.is_empty() {
                msg_info!(Message::NoClients);
                return Ok(());
            }
            View::clients(&all);
        }
        ClientCommand::Delete { id } => {
            let Some(client) = clients.get(&id)? else {
                msg_bail_anyhow!(Message::ClientNotFound(id));
            };
            clients.delete(&id)?;
            msg_success!(Message::ClientDeleted(client.name));
        }
    }
    Ok(())
}
