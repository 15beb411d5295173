use crate::cli::core::{parse_amount, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::Command;
use crate::cli::render;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "list",
        summary: "Show the list grouped by tier with budget recommendations",
        usage: "list [--json]",
        run: cmd_list,
    },
    Command {
        name: "budget",
        summary: "Show or set the monthly budget",
        usage: "budget [amount]",
        run: cmd_budget,
    },
    Command {
        name: "summary",
        summary: "Show spending against the monthly budget",
        usage: "summary",
        run: cmd_summary,
    },
];

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let view = context.block_on(context.list.snapshot())?;
    if args.first() == Some(&"--json") {
        println!("{}", serde_json::to_string_pretty(&view)?);
        context.last_listing = view
            .pending_items()
            .chain(&view.purchased)
            .map(|item| item.id)
            .collect();
        return Ok(());
    }
    context.last_listing = render::print_list(&view, &context.config);
    Ok(())
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        let settings = context.block_on(context.list.store().get_budget())?;
        match settings {
            Some(settings) => cli_io::print_info(format!(
                "Monthly budget: {} (updated {})",
                render::money(settings.monthly_budget, &context.config),
                settings.updated_at.format("%Y-%m-%d %H:%M")
            )),
            None => cli_io::print_info("Monthly budget: not set"),
        }
        return Ok(());
    };
    let amount = parse_amount(raw, "budget")?;
    context.block_on(context.list.set_budget(amount))?;
    cli_io::print_success(format!(
        "Monthly budget set to {}.",
        render::money(amount, &context.config)
    ));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.block_on(context.list.snapshot())?;
    render::print_summary(&view, &context.config);
    Ok(())
}
