use super::Context;
use crate::{
    libs::{generator::Generator, messages::Message, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Day to generate for (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<String>,
    /// Show what would be generated without writing anything
    #[arg(long)]
    dry_run: bool,
}

pub async fn cmd(args: GenerateArgs) -> Result<()> {
    let context = Context::load()?;
    let day = context.day(args.date.as_deref())?;
    let generator = Generator::new(&context.store);

    if args.dry_run {
        let children = generator.dry_run(day).await?;
        if children.is_empty() {
            msg_info!(Message::NoChildrenGenerated(day.to_string()));
            return Ok(());
        }
        msg_print!(Message::DryRunHeader(day.to_string()), true);
        View::tasks(&children.iter().collect::<Vec<_>>(), day);
        return Ok(());
    }

    let report = generator.run_pass_for(day).await?;
    match report.generated.len() {
        0 => msg_info!(Message::NoChildrenGenerated(day.to_string())),
        n => msg_success!(Message::ChildrenGenerated(n, day.to_string())),
    }
    if report.failed > 0 {
        msg_warning!(Message::ChildrenWriteFailures(report.failed));
    }
    Ok(())
}
