use fleetdeck_core::{decode_frame, BotId, ClientMessage, Effect, ItemId};
use fleetdeck_session::{apply, LogFilter, Session, DEFAULT_LOG_LIMIT};

fn apply_frame(session: &mut Session, text: &str, out_effects: &mut Vec<Effect>) {
    let message = decode_frame(text)
        .expect("frame should decode")
        .expect("frame type should be known");
    apply(session, message, out_effects);
}

#[test]
fn update_list_frames_replace_the_fleet_and_keep_a_live_selection() {
    let mut session = Session::new();
    let mut effects = Vec::new();

    apply_frame(
        &mut session,
        r#"{"type":"UPDATE_LIST","data":[{"id":"alpha","name":"alpha"},{"id":"beta","name":"beta"}]}"#,
        &mut effects,
    );
    assert_eq!(session.bots().len(), 2, "expected both bots from the frame");

    assert!(
        session.select(BotId::new("beta"), &mut effects),
        "selecting a listed bot should succeed"
    );

    apply_frame(
        &mut session,
        r#"{"type":"UPDATE_LIST","data":[{"id":"beta","name":"beta","status":"online"}]}"#,
        &mut effects,
    );
    assert_eq!(
        session.selected_id().map(BotId::as_str),
        Some("beta"),
        "selection should survive a replace that still lists the bot"
    );
    assert_eq!(
        session.selected_bot().map(|bot| bot.status.as_str()),
        Some("online"),
        "replace should adopt the fresh snapshot"
    );

    apply_frame(
        &mut session,
        r#"{"type":"UPDATE_LIST","data":[{"id":"alpha","name":"alpha"}]}"#,
        &mut effects,
    );
    assert!(
        session.selected_id().is_none(),
        "selection should clear when the bot drops out of the fleet"
    );
    assert!(
        effects.contains(&Effect::SelectionCleared),
        "dropping the selected bot should notify the frontend"
    );
}

#[test]
fn debug_log_frames_are_stored_unfiltered_and_filtered_on_read() {
    let mut session = Session::new();
    let mut effects = Vec::new();

    apply_frame(
        &mut session,
        r#"{"type":"UPDATE_LIST","data":[{"id":"alpha","name":"alpha"}]}"#,
        &mut effects,
    );
    apply_frame(
        &mut session,
        r#"{"type":"DEBUG_LOG","data":{"bot_id":"alpha","category":"LOGIN","message":"logged in"}}"#,
        &mut effects,
    );
    apply_frame(
        &mut session,
        r#"{"type":"DEBUG_LOG","data":{"bot_id":"alpha","category":"HTTPS","message":"GET /player"}}"#,
        &mut effects,
    );

    let alpha = BotId::new("alpha");
    assert_eq!(
        session.logs().len(&alpha),
        2,
        "storage should keep every category"
    );

    let hidden = session
        .logs()
        .visible(&alpha, LogFilter::default(), DEFAULT_LOG_LIMIT);
    assert_eq!(hidden.len(), 1, "secure traffic is hidden by default");
    assert_eq!(hidden[0].category, "LOGIN");

    let shown = session.logs().visible(
        &alpha,
        LogFilter {
            show_secure: true,
            ..LogFilter::default()
        },
        DEFAULT_LOG_LIMIT,
    );
    assert_eq!(shown.len(), 2, "the toggle reveals retained history");
}

#[test]
fn item_frames_fill_the_cache_and_surface_search_results() {
    let mut session = Session::new();
    let mut effects = Vec::new();

    apply_frame(
        &mut session,
        r#"{"type":"ITEMS_DATA","data":[{"ID":2,"Name":"Dirt"},{"ID":4584,"Name":"Pepper Tree","GrowTime":600}]}"#,
        &mut effects,
    );

    match effects.as_slice() {
        [Effect::SearchResults(items)] => {
            assert_eq!(items.len(), 2, "the bulk payload doubles as the result set")
        }
        other => panic!("unexpected effects after ITEMS_DATA: {other:?}"),
    }
    effects.clear();

    apply_frame(
        &mut session,
        r#"{"type":"ITEM_DATA","data":{"ID":2,"Name":"Dirt","GrowTime":0,"Description":"It's dirt."}}"#,
        &mut effects,
    );
    let dirt = session
        .items()
        .peek(ItemId::new(2))
        .expect("single-item frame should merge into the cache");
    assert_eq!(dirt.description, "It's dirt.");

    let found = session
        .items()
        .lookup("pepper tree", &mut effects)
        .expect("bulk-loaded item should resolve by case-insensitive name");
    assert_eq!(found.id, ItemId::new(4584));
    assert!(effects.is_empty(), "cache hits must not emit fetches");
}

#[test]
fn removing_a_bot_emits_the_wire_request_before_clearing_selection() {
    let mut session = Session::new();
    let mut effects = Vec::new();

    apply_frame(
        &mut session,
        r#"{"type":"UPDATE_LIST","data":[{"id":"alpha","name":"alpha"}]}"#,
        &mut effects,
    );
    assert!(session.select(BotId::new("alpha"), &mut effects));
    effects.clear();

    session.remove_bot(BotId::new("alpha"), &mut effects);

    match effects.as_slice() {
        [Effect::Send(ClientMessage::RemoveBot { id }), Effect::SelectionCleared] => {
            assert_eq!(id.as_str(), "alpha")
        }
        other => panic!("unexpected removal effects: {other:?}"),
    }
}

#[test]
fn unknown_frame_types_decode_to_nothing() {
    let decoded = decode_frame(r#"{"type":"PING","data":{}}"#).expect("valid envelope");
    assert!(decoded.is_none(), "unknown types are inert, not errors");
}
