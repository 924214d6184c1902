mod common;

use common::{FakePositions, ScriptedFeed, env, settle};
use sagip_core::application::ports::map_surface::{IconKind, MapLayer};
use sagip_core::domain::entities::{
    CycloneTrack, PersonStatus, SeismicEvent, ShelterStatus, Urgency,
};
use sagip_core::domain::value_objects::{Coordinates, RecordId};
use sagip_core::presentation::dto::family_dto::CreateFamilyPostDto;
use sagip_core::presentation::dto::request_dto::CreateHelpRequestDto;
use sagip_core::presentation::dto::shelter_dto::CreateShelterDto;
use sagip_core::presentation::handlers::{
    FamilyLocatorHandler, HomeHandler, RequestBoardHandler, ShelterHandler,
};
use sagip_core::shared::error::AppError;
use sagip_core::state::AppState;
use sagip_core::AppConfig;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn app_with_feeds(
    env: &common::TestEnv,
    positions: FakePositions,
    seismic: Arc<ScriptedFeed<SeismicEvent>>,
    cyclones: Arc<ScriptedFeed<CycloneTrack>>,
) -> AppState {
    AppState::new(AppConfig::default(), env.services(positions, seismic, cyclones))
}

fn app(env: &common::TestEnv, positions: FakePositions) -> AppState {
    app_with_feeds(
        env,
        positions,
        ScriptedFeed::new(vec![Ok(Vec::new())]),
        ScriptedFeed::new(vec![Ok(Vec::new())]),
    )
}

fn request_form() -> CreateHelpRequestDto {
    CreateHelpRequestDto {
        need: "water".into(),
        name: "Ana".into(),
        barangay: "Mabolo".into(),
        urgency: "High".into(),
    }
}

fn family_form(person: &str, location: &str) -> CreateFamilyPostDto {
    CreateFamilyPostDto {
        reporter_name: "Maria".into(),
        contact_number: None,
        person_name: person.into(),
        person_age: Some(54),
        last_seen_location: location.into(),
        health_status: None,
        other_details: None,
        status: "Missing".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn request_submits_without_coordinates_when_geolocation_times_out() {
    let env = env();
    env.requests.echo_inserts.store(true, Ordering::Release);
    let state = app(&env, FakePositions::Stalled);
    let handler = RequestBoardHandler::attach(&state).await.expect("attach");

    let response = handler
        .submit(request_form())
        .await
        .expect("submit proceeds despite timeout")
        .expect("view still live");

    assert_eq!(response.coordinates, None);
    assert_eq!(response.urgency, Urgency::High);
    assert!(!response.pending);

    settle().await;
    let listed = handler.list().await;
    assert_eq!(listed.len(), 1, "no duplicate after the remote echo");
    assert_eq!(listed[0].need, "water");
}

#[tokio::test(start_paused = true)]
async fn submission_after_view_teardown_is_a_no_op() {
    let env = env();
    let state = app(&env, FakePositions::Stalled);
    let handler = Arc::new(RequestBoardHandler::attach(&state).await.expect("attach"));

    let submitting = {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move { handler.submit(request_form()).await })
    };
    tokio::task::yield_now().await;

    handler.detach();
    let outcome = submitting.await.expect("task").expect("no error");
    assert!(outcome.is_none(), "late completion must not apply anything");
    assert!(state.requests.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn urgency_filter_narrows_the_board() {
    let env = env();
    let state = app(&env, FakePositions::Denied);
    let handler = RequestBoardHandler::attach(&state).await.expect("attach");

    for urgency in ["High", "Low"] {
        let mut form = request_form();
        form.urgency = urgency.into();
        form.need = format!("{urgency} need");
        handler.submit(form).await.expect("submit").expect("live");
    }

    assert_eq!(handler.list().await.len(), 2);
    handler.set_urgency_filter(Some(Urgency::High)).await;
    let filtered = handler.list().await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].urgency, Urgency::High);
}

#[tokio::test(start_paused = true)]
async fn second_submit_is_rejected_while_one_is_pending() {
    let env = env();
    let state = app(&env, FakePositions::Stalled);
    let handler = Arc::new(RequestBoardHandler::attach(&state).await.expect("attach"));

    let first = {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move { handler.submit(request_form()).await })
    };
    tokio::task::yield_now().await;

    let second = handler.submit(request_form()).await;
    assert!(matches!(second, Err(AppError::Busy(_))));

    first.await.expect("task").expect("first submit");
}

#[tokio::test(start_paused = true)]
async fn shelter_pin_flow_saves_at_clicked_location() {
    let env = env();
    let state = app(&env, FakePositions::Denied);
    let handler = ShelterHandler::attach(&state).await.expect("attach");

    // Saving without a pin is refused.
    let premature = handler
        .save_shelter(CreateShelterDto {
            name: "Opon Gym".into(),
            barangay: "Opon".into(),
            capacity: Some(50),
            status: "Available".into(),
        })
        .await;
    assert!(matches!(premature, Err(AppError::InvalidInput(_))));

    handler.enter_add_mode().await;
    assert!(handler.handle_map_click(Coordinates::new(10.31, 123.95)).await);

    let saved = handler
        .save_shelter(CreateShelterDto {
            name: "Opon Gym".into(),
            barangay: "Opon".into(),
            capacity: Some(50),
            status: "Available".into(),
        })
        .await
        .expect("save");
    assert_eq!(saved.coordinates, Some(Coordinates::new(10.31, 123.95)));
    assert!(!saved.pending);

    settle().await;
    // Pin consumed, layer re-rendered with the confirmed shelter.
    assert_eq!(handler.map().pinned().await, None);
    let markers = env.surface.last_layer(MapLayer::Shelters).expect("layer");
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].icon, IconKind::Shelter);
}

#[tokio::test(start_paused = true)]
async fn shelter_status_update_rolls_back_when_backend_refuses() {
    let env = env();
    let state = app(&env, FakePositions::Denied);
    let handler = ShelterHandler::attach(&state).await.expect("attach");

    handler.enter_add_mode().await;
    handler.handle_map_click(Coordinates::new(10.0, 124.0)).await;
    let saved = handler
        .save_shelter(CreateShelterDto {
            name: "Opon Gym".into(),
            barangay: "Opon".into(),
            capacity: None,
            status: "Available".into(),
        })
        .await
        .expect("save");
    let id: RecordId = match saved.id.parse::<i64>() {
        Ok(value) => RecordId::Assigned(value),
        Err(_) => panic!("confirmed shelter carries a server id"),
    };

    env.shelters.fail_update.store(true, Ordering::Release);
    let refused = handler.update_status(&id, ShelterStatus::Closed).await;
    assert!(refused.is_err());

    let listed = handler.list().await;
    assert_eq!(listed[0].status, ShelterStatus::Available, "status restored");
    assert!(!state.notices.active().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn family_board_searches_and_filters() {
    let env = env();
    let state = app(&env, FakePositions::Denied);
    let handler = FamilyLocatorHandler::attach(&state).await.expect("attach");

    handler
        .submit(family_form("Jose Ramos", "Carbon Market"))
        .await
        .expect("submit")
        .expect("live");
    handler
        .submit(family_form("Lita Cruz", "Pier 3"))
        .await
        .expect("submit")
        .expect("live");

    handler.set_search("jose").await;
    let found = handler.list().await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].person_name, "Jose Ramos");

    handler.set_search("").await;
    let id = state.family_posts.snapshot().await[0].id.clone();
    handler
        .update_status(&id, PersonStatus::Found)
        .await
        .expect("update");
    handler.set_status_filter(Some(PersonStatus::Missing)).await;
    assert_eq!(handler.list().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn family_post_tags_submission_with_acquired_position() {
    let env = env();
    let state = app(&env, FakePositions::Fixed(Coordinates::new(10.32, 123.9)));
    let handler = FamilyLocatorHandler::attach(&state).await.expect("attach");

    let response = handler
        .submit(family_form("Jose Ramos", "Carbon Market"))
        .await
        .expect("submit")
        .expect("live");
    assert_eq!(response.coordinates, Some(Coordinates::new(10.32, 123.9)));
}

#[tokio::test(start_paused = true)]
async fn home_renders_hazard_overlays_and_request_pins() {
    let env = env();
    let quake = SeismicEvent {
        coordinates: Coordinates::new(10.0, 124.0),
        magnitude: 6.5,
        place: "near Bogo".into(),
    };
    let storm = CycloneTrack {
        center: Coordinates::new(11.0, 125.0),
        name: "Odette".into(),
        intensity: "Category 4".into(),
    };
    let state = app_with_feeds(
        &env,
        FakePositions::Denied,
        ScriptedFeed::new(vec![Ok(vec![quake])]),
        ScriptedFeed::new(vec![Ok(vec![storm])]),
    );
    let home = HomeHandler::attach(&state).await.expect("attach");
    settle().await;

    let seismic = env.surface.last_layer(MapLayer::Seismic).expect("seismic layer");
    assert_eq!(seismic.len(), 1);
    assert_eq!(seismic[0].icon, IconKind::Sonar { color: "#ff0000" });

    let cyclones = env.surface.last_layer(MapLayer::Cyclones).expect("cyclone layer");
    assert_eq!(cyclones[0].icon, IconKind::StormCircle { radius_m: 100_000 });

    // A change event re-renders the request layer with the new pin.
    let mut request = sagip_core::domain::entities::HelpRequest::new(
        "water".into(),
        "Ana".into(),
        "Mabolo".into(),
        Urgency::High,
        Some(Coordinates::new(10.3, 123.9)),
    );
    request.id = RecordId::Assigned(1);
    env.requests.emit_insert(&request).await;
    settle().await;

    let requests = env.surface.last_layer(MapLayer::Requests).expect("request layer");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].icon, IconKind::Pin { color: "red" });
    drop(home);
}

#[tokio::test(start_paused = true)]
async fn home_quick_report_seeds_pin_and_submit_consumes_it() {
    let env = env();
    let here = Coordinates::new(10.32, 123.91);
    let state = app(&env, FakePositions::Fixed(here));
    let home = HomeHandler::attach(&state).await.expect("attach");

    home.start_report_at_my_location().await;
    assert_eq!(home.map().pinned().await, Some(here));
    let cameras = env.surface.cameras();
    assert_eq!(cameras.last().expect("fly").center, here);

    let response = home.submit_request(request_form()).await.expect("submit");
    assert_eq!(response.coordinates, Some(here));
    assert_eq!(home.map().pinned().await, None);
    assert_eq!(
        env.surface.last_layer(MapLayer::TempPin).expect("temp layer"),
        Vec::new()
    );
}

#[tokio::test(start_paused = true)]
async fn home_focus_falls_back_for_requests_without_coordinates() {
    let env = env();
    let state = app(&env, FakePositions::Denied);
    let home = HomeHandler::attach(&state).await.expect("attach");

    let confirmed = home.submit_request(request_form()).await.expect("submit");
    let id = RecordId::Assigned(confirmed.id.parse::<i64>().expect("server id"));
    home.focus_request(&id).await;

    let command = *env.surface.cameras().last().expect("camera");
    assert_eq!(command.center, AppConfig::default().map.default_center);
    assert_eq!(command.zoom, AppConfig::default().map.fallback_zoom);
}

#[tokio::test(start_paused = true)]
async fn broken_surface_degrades_to_reload_prompt() {
    let env = env();
    let state = app(&env, FakePositions::Denied);
    let home = HomeHandler::attach(&state).await.expect("attach");

    env.surface.fail.store(true, Ordering::Release);
    home.map().pan_to(Some(Coordinates::new(1.0, 2.0)), 15).await;

    assert!(home.map().needs_reload());
    assert!(!state.notices.active().await.is_empty());
}
