use crate::{
    db::users::Users,
    libs::{
        messages::Message,
        reference::{Role, User},
        view::View,
    },
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Add a team member
    Add {
        name: String,
        email: String,
        /// manager, datascientist, dataengineer or analyst
        #[arg(short, long, default_value = "analyst")]
        role: String,
    },
    /// List team members
    List,
    /// Delete a team member
    Delete { id: String },
}

pub fn cmd(args: UserArgs) -> Result<()> {
    let users = Users::new()?;
    match args.command {
        UserCommand::Add { name, email, role } => {
            let role: Role = role.parse().map_err(|e| msg_error_anyhow!(Message::InvalidRole(e)))?;
            let user = User::new(&name, &email, role);
            users.insert(&user)?;
            msg_success!(Message::UserCreated(user.name));
        }
        UserCommand::List => {
            let all = users.fetch()?;
            if all.is_empty() {
                msg_info!(Message::NoUsers);
                return Ok(());
            }
            View::users(&all);
        }
        UserCommand::Delete { id } => {
            let Some(user) = users.get(&id)? else {
                msg_bail_anyhow!(Message::UserNotFound(id));
            };
            users.delete(&id)?;
            msg_success!(Message::UserDeleted(user.name));
        }
    }
    Ok(())
}
