use fleetdeck_core::{decode_frame, BotId, ClientMessage, Effect, ItemId, ItemQuery};
use fleetdeck_session::{apply, Session};
use fleetdeck_system_growscan::scan;

fn apply_frame(session: &mut Session, text: &str, out_effects: &mut Vec<Effect>) {
    let message = decode_frame(text)
        .expect("frame should decode")
        .expect("frame type should be known");
    apply(session, message, out_effects);
}

fn farm_frame() -> &'static str {
    concat!(
        r#"{"type":"UPDATE_LIST","data":[{"id":"alpha","name":"alpha","local":{"world":"#,
        r#"{"name":"FARM","width":10,"height":6,"tiles":["#,
        r#"{"x":1,"y":2,"fg_id":4584,"tile_type":4,"extra":{"ready_to_harvest":false,"time_passed":700}},"#,
        r#"{"x":2,"y":2,"fg_id":4584,"tile_type":4,"extra":{"ready_to_harvest":false,"time_passed":100}},"#,
        r#"{"x":3,"y":2,"fg_id":2,"tile_type":0}"#,
        r#"]}}}]}"#,
    )
}

#[test]
fn scan_converges_once_the_fetched_definition_arrives() {
    let mut session = Session::new();
    let mut effects = Vec::new();
    apply_frame(&mut session, farm_frame(), &mut effects);

    let world = session
        .bot(&BotId::new("alpha"))
        .and_then(|bot| bot.local.world.clone())
        .expect("fleet frame should carry the world snapshot");

    // First pass: the crop is unknown, so nothing qualifies yet and the
    // cache asks the server for the definition.
    let candidates = scan(&world, session.items(), &mut effects);
    assert!(
        candidates.is_empty(),
        "unknown crops must not be harvested: {candidates:?}"
    );
    let fetches: Vec<&Effect> = effects
        .iter()
        .filter(|effect| {
            matches!(
                effect,
                Effect::Send(ClientMessage::GetItem(ItemQuery::ById { .. }))
            )
        })
        .collect();
    assert_eq!(fetches.len(), 2, "one fetch per unresolved seed tile");
    effects.clear();

    apply_frame(
        &mut session,
        r#"{"type":"ITEM_DATA","data":{"ID":4584,"Name":"Pepper Tree","GrowTime":600}}"#,
        &mut effects,
    );

    // Second pass: the grow time is known, so only the fully grown tile
    // qualifies.
    let candidates = scan(&world, session.items(), &mut effects);
    assert!(effects.is_empty(), "cache hits must not emit fetches");
    match candidates.as_slice() {
        [candidate] => {
            assert_eq!((candidate.x, candidate.y), (1, 2));
            assert_eq!(candidate.item_id, ItemId::new(4584));
            assert_eq!(candidate.item_name, "Pepper Tree");
        }
        other => panic!("expected exactly one ripe tile, got {other:?}"),
    }
}
