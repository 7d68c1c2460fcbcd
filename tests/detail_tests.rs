mod common;

use booking_core::controllers::{DetailState, DetailViewer};
use booking_core::domain::Booking;
use booking_core::notify::{NotificationLevel, UNREACHABLE_MESSAGE};
use common::{booking_json, context, FakeBackend};

#[test]
fn loaded_booking_lists_fields_in_order() {
    let backend = FakeBackend::new();
    let mut booking = booking_json(12, 2, "20/11/2026");
    booking["cafe"] = true.into();
    booking["cafeQuantidade"] = 6.into();
    booking["cafeDescricao"] = "Descafeinado".into();
    backend.add_booking(booking);
    let (ctx, notifier) = context(&backend, true);
    let mut viewer = DetailViewer::new();

    assert!(matches!(viewer.open(&ctx, 12), DetailState::Loaded(_)));
    let labels: Vec<&str> = viewer.fields().iter().map(|(label, _)| *label).collect();
    assert_eq!(
        labels,
        vec![
            "Cod",
            "Room",
            "Date",
            "Start",
            "End",
            "Responsible",
            "Coffee",
            "Coffee quantity",
            "Description",
            "Created",
            "Location",
        ]
    );
    assert_eq!(viewer.fields()[0].1, "0012");
    assert_eq!(viewer.fields()[7].1, "6");
    assert!(notifier.notifications().is_empty());
    assert_eq!(backend.request_log(), vec!["GET agendamentos/agendamento/12"]);
}

#[test]
fn missing_booking_notifies_and_shows_defaults() {
    let backend = FakeBackend::new();
    let (ctx, notifier) = context(&backend, true);
    let mut viewer = DetailViewer::new();

    assert_eq!(
        viewer.open(&ctx, 3),
        &DetailState::Failed(Booking::default())
    );
    let last = notifier.notifications().pop().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Registro não encontrado");
    assert_eq!(viewer.fields()[0].1, "0000");
    assert_eq!(viewer.fields().len(), 9);
}

#[test]
fn unreachable_server_shows_generic_message() {
    let backend = FakeBackend::new();
    backend.go_offline();
    let (ctx, notifier) = context(&backend, true);
    let mut viewer = DetailViewer::new();

    viewer.open(&ctx, 3);
    assert!(matches!(viewer.state(), DetailState::Failed(_)));
    assert_eq!(
        notifier.notifications().pop().unwrap().message,
        UNREACHABLE_MESSAGE
    );
}

#[test]
fn response_for_previous_booking_is_discarded() {
    let backend = FakeBackend::new();
    backend.add_booking(booking_json(1, 1, "20/10/2026"));
    backend.add_booking(booking_json(2, 1, "21/10/2026"));
    let (ctx, _) = context(&backend, true);
    let mut viewer = DetailViewer::new();

    let first = viewer.begin_open(1);
    let second = viewer.begin_open(2);
    assert!(viewer.is_loading());

    assert!(!viewer.finish_open(&ctx, first, ctx.api.get::<Booking>(1)));
    assert!(viewer.is_loading());
    assert!(viewer.finish_open(&ctx, second, ctx.api.get::<Booking>(2)));
    assert_eq!(viewer.booking().unwrap().id, 2);
}

#[test]
fn closing_drops_late_response() {
    let backend = FakeBackend::new();
    backend.add_booking(booking_json(1, 1, "20/10/2026"));
    let (ctx, _) = context(&backend, true);
    let mut viewer = DetailViewer::new();

    let ticket = viewer.begin_open(1);
    viewer.close();
    assert!(!viewer.finish_open(&ctx, ticket, ctx.api.get::<Booking>(1)));
    assert_eq!(viewer.state(), &DetailState::Closed);
    assert!(viewer.fields().is_empty());
}
