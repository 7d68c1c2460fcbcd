use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::FormResult;
use crate::cli::output;
use crate::cli::ui::detail_view::DetailView;
use crate::controllers::{DetailState, SubmitOutcome};
use crate::domain::format_code;

use super::{
    ensure_answers, no_extra_args, parse_assignments, report_delete, run_wizard, show_list,
    split_action, take_id, CommandDefinition,
};

const USAGE: &str = "booking list | booking add [room=<id> date=YYYY-MM-DD start=HH:MM end=HH:MM \
                     responsible=<name> coffee=yes|no quantity=<n> description=<text>] | \
                     booking edit <id> [key=value ...] | booking view <id> | booking delete <id>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "booking",
        "List, add, edit, view or delete bookings",
        USAGE,
        cmd_booking,
    )]
}

fn cmd_booking(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args);
    match action.as_str() {
        "list" => {
            no_extra_args(rest, USAGE)?;
            list_bookings(context)
        }
        "add" => add_booking(context, rest),
        "edit" => {
            let (id, rest) = take_id(rest, USAGE)?;
            edit_booking(context, id, rest)
        }
        "view" => {
            let (id, rest) = take_id(rest, USAGE)?;
            no_extra_args(rest, USAGE)?;
            view_booking(context, id)
        }
        "delete" => {
            let (id, rest) = take_id(rest, USAGE)?;
            no_extra_args(rest, USAGE)?;
            let outcome = context.bookings.delete(&context.app, id);
            report_delete("Bookings", &context.bookings, outcome);
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown booking action `{}` (usage: {})",
            other, USAGE
        ))),
    }
}

fn list_bookings(context: &mut ShellContext) -> CommandResult {
    context.bookings.refresh(&context.app);
    show_list("Bookings", &context.bookings);
    Ok(())
}

fn add_booking(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let answers = parse_assignments(args, context.booking_wizard.session().descriptor(), false)?;
    ensure_answers(context.mode, &answers)?;

    context.booking_wizard.open_create(&context.app);
    let result = run_wizard(&mut context.booking_wizard, &context.app, answers);
    after_save(context, result)
}

fn edit_booking(context: &mut ShellContext, id: u32, args: &[&str]) -> CommandResult {
    let answers = parse_assignments(args, context.booking_wizard.session().descriptor(), true)?;
    ensure_answers(context.mode, &answers)?;

    if !context.booking_wizard.load_for_edit(&context.app, id) {
        context.booking_wizard.close();
        return Ok(());
    }
    let result = run_wizard(&mut context.booking_wizard, &context.app, answers);
    after_save(context, result)
}

fn view_booking(context: &mut ShellContext, id: u32) -> CommandResult {
    context.detail.open(&context.app, id);
    if matches!(context.detail.state(), DetailState::Loaded(_) | DetailState::Failed(_)) {
        let mut view = DetailView::new(format!("Booking {}", format_code(id)));
        for (label, value) in context.detail.fields() {
            view.add_field(label, value);
        }
        output::block(view.render());
    }
    context.detail.close();
    Ok(())
}

fn after_save(context: &mut ShellContext, result: FormResult) -> CommandResult {
    if result == FormResult::Submitted(SubmitOutcome::Saved) {
        list_bookings(context)?;
    }
    Ok(())
}
