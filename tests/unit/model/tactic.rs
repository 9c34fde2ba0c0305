use super::*;

fn player(id: &str, x: f64, y: f64) -> Player {
    Player {
        id: id.to_owned(),
        number: "1".to_owned(),
        x,
        y,
        role: Role::Field,
        team: Team::from_legacy_id(id),
    }
}

#[test]
fn legacy_player_without_team_infers_from_id() {
    let json = r#"{"id":"gk-home","number":"GK","x":5,"y":50,"role":"gk"}"#;
    let p: Player = serde_json::from_str(json).unwrap();
    assert_eq!(p.team, Team::Home);
    assert_eq!(p.role, Role::Gk);

    let json = r#"{"id":"away-2","number":"2","x":70,"y":20,"role":"field"}"#;
    let p: Player = serde_json::from_str(json).unwrap();
    assert_eq!(p.team, Team::Away);
}

#[test]
fn explicit_team_wins_over_id_text() {
    let json = r#"{"id":"home-1","number":"1","x":1,"y":2,"role":"field","team":"away"}"#;
    let p: Player = serde_json::from_str(json).unwrap();
    assert_eq!(p.team, Team::Away);
}

#[test]
fn annotation_uses_wire_field_names_and_defaults() {
    let json = r#"{"id":"a","text":"press","x":10,"y":20,"width":100,"height":60}"#;
    let a: Annotation = serde_json::from_str(json).unwrap();
    assert_eq!(a.font_size, 24.0);
    assert_eq!(a.size_tag, SizeTag::Medium);

    let v = serde_json::to_value(&a).unwrap();
    assert!(v.get("fontSize").is_some());
    assert_eq!(v.get("size").unwrap(), "medium");
}

#[test]
fn frame_equality_ignores_player_order() {
    let a = Frame {
        players: vec![player("home-1", 1.0, 2.0), player("away-1", 3.0, 4.0)],
        ball: Position::new(50.0, 50.0),
        annotation: None,
    };
    let mut b = a.clone();
    b.players.reverse();
    assert_eq!(a, b);

    b.players[0].x = 9.0;
    assert_ne!(a, b);
}

#[test]
fn frame_validate_rejects_duplicate_ids() {
    let f = Frame {
        players: vec![player("home-1", 1.0, 2.0), player("home-1", 3.0, 4.0)],
        ball: Position::new(50.0, 50.0),
        annotation: None,
    };
    assert!(f.validate().is_err());
}

#[test]
fn tactic_state_defaults_missing_fields() {
    let s = TacticState::from_json_str("{}").unwrap();
    assert_eq!(s, TacticState::empty(Mode::Full));

    let s = TacticState::from_json_str(r#"{"mode":"half"}"#).unwrap();
    assert_eq!(s.mode, Mode::Half);
    assert!(s.frames.is_empty());
}

#[test]
fn mode_parses_case_insensitively() {
    assert_eq!("HALF".parse::<Mode>().unwrap(), Mode::Half);
    assert!("quarter".parse::<Mode>().is_err());
}
