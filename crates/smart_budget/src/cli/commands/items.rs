use smart_budget_core::{ReorderOutcome, ReorderRejection};
use smart_budget_domain::{ItemPatch, NewItem, Tier};

use crate::cli::core::{parse_amount, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::registry::Command;
use crate::cli::render::money;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "add",
        summary: "Add an item to the list",
        usage: "add <name> <price> [need|good|nice] [--purchased]",
        run: cmd_add,
    },
    Command {
        name: "edit",
        summary: "Change an item's name, price, tier or manual rank",
        usage: "edit <item> <name|price|tier|rank> <value>",
        run: cmd_edit,
    },
    Command {
        name: "buy",
        summary: "Mark an item as purchased",
        usage: "buy <item>",
        run: cmd_buy,
    },
    Command {
        name: "unbuy",
        summary: "Move a purchased item back to the list",
        usage: "unbuy <item>",
        run: cmd_unbuy,
    },
    Command {
        name: "delete",
        summary: "Remove an item",
        usage: "delete <item>",
        run: cmd_delete,
    },
    Command {
        name: "move",
        summary: "Drop an item onto another in the same tier",
        usage: "move <item> <target-item>",
        run: cmd_move,
    },
    Command {
        name: "clear",
        summary: "Remove every item",
        usage: "clear",
        run: cmd_clear,
    },
];

fn parse_tier(input: &str) -> Result<Tier, CommandError> {
    input
        .parse::<Tier>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let purchased = args.iter().any(|arg| *arg == "--purchased");
    let positional: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| *arg != "--purchased")
        .collect();
    let (name, price, tier) = match positional.as_slice() {
        [name, price] => (*name, *price, None),
        [name, price, tier] => (*name, *price, Some(*tier)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: add <name> <price> [need|good|nice] [--purchased]".into(),
            ))
        }
    };
    let price = parse_amount(price, "price")?;
    let category = tier.map(parse_tier).transpose()?.unwrap_or_default();

    let mut item = NewItem::new(name, price, category);
    if purchased {
        item = item.purchased();
    }
    context.block_on(context.list.add_item(item))?;
    cli_io::print_success(format!(
        "Added `{}` ({}) to {}.",
        name.trim(),
        money(price, &context.config),
        category.title()
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference, field, value @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <item> <name|price|tier|rank> <value>".into(),
        ));
    };
    if value.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "missing value for `{field}`"
        )));
    }
    let value = value.join(" ");
    let item = context.resolve_item_detail(reference)?;

    let patch = match field.to_lowercase().as_str() {
        "name" => ItemPatch::name(value.as_str()),
        "price" => {
            if item.is_manually_ordered() {
                cli_io::print_hint("Changing the price resets the manual rank of this item.");
            }
            ItemPatch::price(parse_amount(&value, "price")?)
        }
        "tier" | "category" => ItemPatch::category(parse_tier(&value)?),
        "rank" | "order" if value.eq_ignore_ascii_case("auto") => {
            ItemPatch::clear_manual_order()
        }
        "rank" | "order" => {
            let rank = value
                .parse::<usize>()
                .ok()
                .filter(|rank| *rank >= 1)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(
                        "rank must be a positive number or `auto`".into(),
                    )
                })?;
            match context.block_on(context.list.move_to_rank(item.id, rank - 1))? {
                ReorderOutcome::Applied { .. } => cli_io::print_success(format!(
                    "Moved `{}` to rank {} in {}.",
                    item.name,
                    rank,
                    item.category.title()
                )),
                ReorderOutcome::Ignored(_) => {
                    cli_io::print_info(format!("`{}` is already at rank {rank}.", item.name))
                }
            }
            return Ok(());
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{other}` (expected name, price, tier or rank)"
            )))
        }
    };

    context.block_on(context.list.edit_item(item.id, patch))?;
    cli_io::print_success(format!("Updated `{}`.", item.name));
    Ok(())
}

fn set_purchased(context: &mut ShellContext, args: &[&str], purchased: bool) -> CommandResult {
    let reference = args.first().ok_or_else(|| {
        CommandError::InvalidArguments(if purchased {
            "usage: buy <item>".into()
        } else {
            "usage: unbuy <item>".into()
        })
    })?;
    let item = context.resolve_item_detail(reference)?;
    if item.purchased == purchased {
        cli_io::print_info(format!(
            "`{}` is already {}.",
            item.name,
            if purchased { "purchased" } else { "on the list" }
        ));
        return Ok(());
    }
    context.block_on(context.list.set_purchased(item.id, purchased))?;
    if purchased {
        cli_io::print_success(format!(
            "Purchased `{}` for {}.",
            item.name,
            money(item.price, &context.config)
        ));
    } else {
        cli_io::print_success(format!("`{}` is back on the list.", item.name));
    }
    Ok(())
}

fn cmd_buy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_purchased(context, args, true)
}

fn cmd_unbuy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_purchased(context, args, false)
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: delete <item>".into()))?;
    let item = context.resolve_item_detail(reference)?;
    context.block_on(context.list.delete_item(item.id))?;
    cli_io::print_success(format!("Deleted `{}`.", item.name));
    Ok(())
}

fn cmd_move(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [dragged, target] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: move <item> <target-item>".into(),
        ));
    };
    let dragged = context.resolve_item_detail(dragged)?;
    let target = context.resolve_item_detail(target)?;

    match context.block_on(context.list.reorder(dragged.id, target.id))? {
        ReorderOutcome::Applied { renumbered } => {
            cli_io::print_success(format!(
                "Moved `{}` to `{}`'s place ({} items ranked in {}).",
                dragged.name,
                target.name,
                renumbered,
                dragged.category.title()
            ));
        }
        ReorderOutcome::Ignored(ReorderRejection::CrossCategory { from, to }) => {
            cli_io::print_warning(format!(
                "Items can only be reordered within a tier (`{}` is {}, `{}` is {}).",
                dragged.name,
                from.title(),
                target.name,
                to.title()
            ));
        }
        ReorderOutcome::Ignored(_) => {
            cli_io::print_info("Nothing to move.");
        }
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Remove every item from the list?")? {
        cli_io::print_info("Operation cancelled.");
        return Ok(());
    }
    let removed = context.block_on(context.list.clear_items())?;
    context.last_listing.clear();
    cli_io::print_success(format!("Removed {removed} item(s)."));
    Ok(())
}
