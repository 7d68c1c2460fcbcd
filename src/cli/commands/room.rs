use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::FormResult;
use crate::controllers::SubmitOutcome;

use super::{
    ensure_answers, no_extra_args, parse_assignments, report_delete, run_wizard, show_list,
    split_action, take_id, CommandDefinition,
};

const USAGE: &str = "room list | room add [name=<text> location=<text> active=yes|no] | \
                     room edit <id> [key=value ...] | room delete <id>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "room",
        "List, add, edit or delete rooms",
        USAGE,
        cmd_room,
    )]
}

fn cmd_room(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_str() {
        "list" => {
            no_extra_args(rest, USAGE)?;
            list_rooms(context)
        }
        "add" => add_room(context, rest),
        "edit" => {
            let (id, rest) = take_id(rest, USAGE)?;
            edit_room(context, id, rest)
        }
        "delete" => {
            let (id, rest) = take_id(rest, USAGE)?;
            no_extra_args(rest, USAGE)?;
            delete_room(context, id)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown room action `{}` (usage: {})",
            other, USAGE
        ))),
    }
}

fn list_rooms(context: &mut ShellContext) -> CommandResult {
    context.rooms.refresh(&context.app);
    show_list("Rooms", &context.rooms);
    Ok(())
}

fn add_room(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let answers = parse_assignments(args, context.room_wizard.session().descriptor(), false)?;
    ensure_answers(context.mode, &answers)?;

    context.room_wizard.open_create(&context.app);
    let result = run_wizard(&mut context.room_wizard, &context.app, answers);
    after_save(context, result)
}

fn edit_room(context: &mut ShellContext, id: u32, args: &[&str]) -> CommandResult {
    let answers = parse_assignments(args, context.room_wizard.session().descriptor(), true)?;
    ensure_answers(context.mode, &answers)?;

    if !context.room_wizard.load_for_edit(&context.app, id) {
        context.room_wizard.close();
        return Ok(());
    }
    let result = run_wizard(&mut context.room_wizard, &context.app, answers);
    after_save(context, result)
}

fn delete_room(context: &mut ShellContext, id: u32) -> CommandResult {
    let outcome = context.rooms.delete(&context.app, id);
    report_delete("Rooms", &context.rooms, outcome);
    Ok(())
}

fn after_save(context: &mut ShellContext, result: FormResult) -> CommandResult {
    if result == FormResult::Submitted(SubmitOutcome::Saved) {
        list_rooms(context)?;
    }
    Ok(())
}
