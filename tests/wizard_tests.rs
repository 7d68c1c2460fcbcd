mod common;

use booking_core::controllers::{SubmitOutcome, WizardController};
use booking_core::domain::{Booking, Room};
use booking_core::forms::booking::{
    BookingFlow, COFFEE, DATE, DESCRIPTION, END, QUANTITY, RESPONSIBLE, ROOM, START,
};
use booking_core::forms::room::{RoomFlow, ACTIVE, LOCATION, NAME};
use booking_core::notify::{NotificationLevel, UNREACHABLE_MESSAGE};
use common::{booking_json, context, FakeBackend};

fn backend_with_rooms() -> std::sync::Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.add_room(1, "Sala Azul", "Bloco A");
    backend.add_room(2, "Sala Verde", "Bloco B");
    backend
}

fn fill_valid_booking(wizard: &mut WizardController<BookingFlow>) {
    wizard.set_field(ROOM, "1").unwrap();
    wizard.set_field(DATE, "2026-10-20").unwrap();
    wizard.set_field(START, "09:00").unwrap();
    wizard.set_field(END, "10:00").unwrap();
    wizard.set_field(RESPONSIBLE, "Ana Lima").unwrap();
}

#[test]
fn create_walks_steps_and_posts_wire_payload() {
    let backend = backend_with_rooms();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    wizard.open_create(&ctx);
    assert!(wizard.is_open());
    assert_eq!(wizard.session().flow().room_options().len(), 2);

    wizard.set_field(ROOM, "1").unwrap();
    wizard.set_field(DATE, "2026-10-20").unwrap();
    wizard.set_field(START, "09:00").unwrap();
    wizard.set_field(END, "10:00").unwrap();
    assert!(wizard.advance(&ctx));
    assert_eq!(wizard.session().step_index(), 1);

    wizard.set_field(RESPONSIBLE, " Ana Lima ").unwrap();
    assert!(wizard.advance(&ctx));

    wizard.set_field(COFFEE, "yes").unwrap();
    wizard.set_field(QUANTITY, "3").unwrap();
    wizard.set_field(DESCRIPTION, "Com leite").unwrap();
    assert!(wizard.advance(&ctx));
    assert!(wizard.session().is_reviewing());

    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Saved);
    assert!(!wizard.is_open());

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, "agendamentos/adicionar");
    let body = writes[0].body.as_ref().unwrap();
    assert_eq!(body["salaId"], 1);
    assert_eq!(body["dataAgendamento"], "20/10/2026");
    assert_eq!(body["horaInicio"], "09:00");
    assert_eq!(body["responsavel"], "Ana Lima");
    assert_eq!(body["cafe"], true);
    assert_eq!(body["cafeQuantidade"], 3);

    let last = notifier.notifications().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Success);
    assert_eq!(last.message, "Registro gravado com sucesso");
}

#[test]
fn past_date_keeps_wizard_on_first_step() {
    let backend = backend_with_rooms();
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);

    fill_valid_booking(&mut wizard);
    wizard.set_field(DATE, "2026-10-15").unwrap();

    assert!(!wizard.advance(&ctx));
    assert_eq!(wizard.session().step_index(), 0);
    assert_eq!(
        wizard.session().errors().get(DATE).unwrap().message,
        "Date cannot be earlier than today"
    );
}

#[test]
fn start_before_now_fails_for_today() {
    let backend = backend_with_rooms();
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);

    fill_valid_booking(&mut wizard);
    wizard.set_field(DATE, "2026-10-16").unwrap();
    wizard.set_field(START, "09:30").unwrap();
    assert!(!wizard.advance(&ctx));
    assert_eq!(
        wizard.session().errors().get(START).unwrap().message,
        "Start time cannot be earlier than the current time"
    );

    wizard.set_field(START, "10:30").unwrap();
    wizard.set_field(END, "11:00").unwrap();
    assert!(wizard.advance(&ctx));
}

#[test]
fn unselected_room_blocks_advance() {
    let backend = backend_with_rooms();
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);

    fill_valid_booking(&mut wizard);
    wizard.set_field(ROOM, "0").unwrap();
    assert!(!wizard.advance(&ctx));
    assert_eq!(
        wizard.session().errors().get(ROOM).unwrap().message,
        "Select a room"
    );
}

#[test]
fn invalid_submit_jumps_to_first_failing_step_without_request() {
    let backend = backend_with_rooms();
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);

    fill_valid_booking(&mut wizard);
    assert!(wizard.advance(&ctx));
    wizard.set_field(RESPONSIBLE, "  ").unwrap();
    assert!(!wizard.advance(&ctx));
    wizard.set_field(COFFEE, "yes").unwrap();

    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Invalid);
    assert_eq!(wizard.session().step_index(), 1);
    assert!(wizard.session().errors().contains(QUANTITY));
    assert!(backend.writes().is_empty());
}

#[test]
fn edit_normalizes_server_values_and_puts_update() {
    let backend = backend_with_rooms();
    backend.add_booking(booking_json(5, 1, "20/10/2026"));
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    assert!(wizard.load_for_edit(&ctx, 5));
    assert_eq!(wizard.editing_id(), Some(5));
    assert!(!wizard.is_loading());

    let draft = wizard.session().draft();
    assert_eq!(draft.room_id, 1);
    assert_eq!(draft.date, "2026-10-20");
    assert_eq!(draft.start_time, "09:00");
    assert_eq!(draft.end_time, "10:00");
    assert_eq!(draft.coffee_quantity, 0);

    let err = wizard.set_field(ROOM, "2").unwrap_err();
    assert_eq!(err.message, "Room cannot be changed while editing");

    wizard.set_field(RESPONSIBLE, "Bruno").unwrap();
    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Saved);

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].path, "agendamentos/atualizar/5");
    let body = writes[0].body.as_ref().unwrap();
    assert_eq!(body["salaId"], 1);
    assert_eq!(body["dataAgendamento"], "20/10/2026");
    assert_eq!(body["horaFim"], "10:00");
    assert_eq!(body["responsavel"], "Bruno");
    assert_eq!(body["cafeQuantidade"], 0);

    let stored = backend.bookings();
    assert_eq!(stored[0]["responsavel"], "Bruno");
}

#[test]
fn edit_fetch_rejected_notifies_server_message() {
    let backend = backend_with_rooms();
    backend.add_booking(booking_json(5, 1, "20/10/2026"));
    backend.reject_with("Agendamento bloqueado");
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    assert!(!wizard.load_for_edit(&ctx, 5));
    assert!(!wizard.is_loading());
    assert_eq!(wizard.session().draft().room_id, 0);

    let last = notifier.notifications().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Agendamento bloqueado");
}

#[test]
fn edit_fetch_of_missing_booking_uses_server_text() {
    let backend = backend_with_rooms();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    assert!(!wizard.load_for_edit(&ctx, 42));
    let last = notifier.notifications().pop().unwrap();
    assert_eq!(last.message, "Registro não encontrado");
}

#[test]
fn edit_fetch_unreachable_notifies_generic_message() {
    let backend = backend_with_rooms();
    backend.go_offline();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    assert!(!wizard.load_for_edit(&ctx, 5));
    let last = notifier.notifications().pop().unwrap();
    assert_eq!(last.message, UNREACHABLE_MESSAGE);
}

#[test]
fn rejected_submit_keeps_wizard_open() {
    let backend = backend_with_rooms();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);
    fill_valid_booking(&mut wizard);

    backend.reject_with("Sala ocupada neste horário");
    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Rejected);
    assert!(wizard.is_open());
    assert!(!wizard.is_submitting());
    assert_eq!(wizard.session().draft().responsible, "Ana Lima");

    let last = notifier.notifications().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Sala ocupada neste horário");
}

#[test]
fn unreachable_submit_keeps_wizard_open() {
    let backend = backend_with_rooms();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);
    fill_valid_booking(&mut wizard);

    backend.go_offline();
    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Unreachable);
    assert!(wizard.is_open());
    assert_eq!(
        notifier.notifications().pop().unwrap().message,
        UNREACHABLE_MESSAGE
    );
}

#[test]
fn second_submit_while_pending_is_ignored() {
    let backend = backend_with_rooms();
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);
    fill_valid_booking(&mut wizard);

    let pending = wizard.begin_submit(&ctx).unwrap();
    assert!(wizard.is_submitting());
    assert!(matches!(
        wizard.begin_submit(&ctx),
        Err(SubmitOutcome::Busy)
    ));

    let result = WizardController::<BookingFlow>::dispatch(&ctx, &pending);
    assert_eq!(
        wizard.finish_submit(&ctx, pending.ticket, result),
        SubmitOutcome::Saved
    );
    assert_eq!(backend.writes().len(), 1);
}

#[test]
fn submit_response_after_close_is_stale() {
    let backend = backend_with_rooms();
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());
    wizard.open_create(&ctx);
    fill_valid_booking(&mut wizard);

    let pending = wizard.begin_submit(&ctx).unwrap();
    wizard.close();
    wizard.open_create(&ctx);

    let result = WizardController::<BookingFlow>::dispatch(&ctx, &pending);
    assert_eq!(
        wizard.finish_submit(&ctx, pending.ticket, result),
        SubmitOutcome::Stale
    );
    assert!(wizard.is_open());
    assert_eq!(wizard.session().draft().room_id, 0);
}

#[test]
fn stale_edit_fetch_is_discarded() {
    let backend = backend_with_rooms();
    backend.add_booking(booking_json(5, 1, "20/10/2026"));
    let mut other = booking_json(6, 2, "21/10/2026");
    other["responsavel"] = "Carla".into();
    backend.add_booking(other);
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    let first = wizard.begin_edit(&ctx, 5);
    let second = wizard.begin_edit(&ctx, 6);
    let first_result = ctx.api.get::<Booking>(5);
    let second_result = ctx.api.get::<Booking>(6);

    assert!(wizard.finish_edit(&ctx, second, second_result));
    assert!(!wizard.finish_edit(&ctx, first, first_result));

    assert_eq!(wizard.editing_id(), Some(6));
    assert_eq!(wizard.session().draft().responsible, "Carla");
    assert_eq!(wizard.session().draft().date, "2026-10-21");
}

#[test]
fn edit_fetch_arriving_after_submit_does_not_overwrite_draft() {
    let backend = FakeBackend::new();
    backend.add_room(3, "Sala Azul", "Bloco A");
    let (ctx, _) = context(&backend, true);
    let mut wizard = WizardController::new(RoomFlow::new());

    let ticket = wizard.begin_edit(&ctx, 3);
    let fetched = ctx.api.get::<Room>(3);
    wizard.set_field(NAME, "Sala Nova").unwrap();
    wizard.set_field(LOCATION, "Bloco D").unwrap();

    backend.reject_with("Sala em uso");
    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Rejected);
    assert!(!wizard.is_loading());

    assert!(!wizard.finish_edit(&ctx, ticket, fetched));
    assert_eq!(wizard.session().draft().name, "Sala Nova");
    assert_eq!(wizard.session().draft().location, "Bloco D");
    assert_eq!(wizard.editing_id(), Some(3));
}

#[test]
fn room_options_failure_leaves_choice_empty() {
    let backend = backend_with_rooms();
    backend.go_offline();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(BookingFlow::new());

    wizard.open_create(&ctx);
    assert!(wizard.is_open());
    assert!(wizard.session().flow().room_options().is_empty());
    assert_eq!(
        notifier.notifications().pop().unwrap().message,
        UNREACHABLE_MESSAGE
    );
}

#[test]
fn room_is_created_with_trimmed_values() {
    let backend = FakeBackend::new();
    let (ctx, notifier) = context(&backend, true);
    let mut wizard = WizardController::new(RoomFlow::new());

    wizard.open_create(&ctx);
    wizard.set_field(NAME, " Sala Lilás ").unwrap();
    wizard.set_field(LOCATION, "Bloco C").unwrap();
    wizard.set_field(ACTIVE, "sim").unwrap();
    assert_eq!(wizard.submit(&ctx), SubmitOutcome::Saved);

    let writes = backend.writes();
    assert_eq!(writes[0].path, "salas/adicionar");
    let body = writes[0].body.as_ref().unwrap();
    assert_eq!(body["nome"], "Sala Lilás");
    assert_eq!(body["local"], "Bloco C");
    assert_eq!(body["ativo"], true);
    assert_eq!(
        notifier.notifications().pop().unwrap().level,
        NotificationLevel::Success
    );
}
