use crate::model::tactic::{Frame, Mode, Player, Position, Role, Team};

struct Slot {
    id: &'static str,
    number: &'static str,
    x: f64,
    y: f64,
    role: Role,
}

const fn gk(id: &'static str, x: f64, y: f64) -> Slot {
    Slot {
        id,
        number: "GK",
        x,
        y,
        role: Role::Gk,
    }
}

const fn field(id: &'static str, number: &'static str, x: f64, y: f64) -> Slot {
    Slot {
        id,
        number,
        x,
        y,
        role: Role::Field,
    }
}

struct Layout {
    ball: (f64, f64),
    home: [Slot; 5],
    away: [Slot; 5],
}

const FULL: Layout = Layout {
    ball: (51.0, 50.0),
    home: [
        gk("gk-home", 5.0, 50.0),
        field("home-1", "1", 40.0, 50.0),
        field("home-2", "2", 30.0, 20.0),
        field("home-3", "3", 30.0, 80.0),
        field("home-4", "4", 20.0, 50.0),
    ],
    away: [
        gk("gk-away", 95.0, 50.0),
        field("away-1", "1", 80.0, 50.0),
        field("away-2", "2", 70.0, 20.0),
        field("away-3", "3", 70.0, 80.0),
        field("away-4", "4", 48.0, 50.0),
    ],
};

// Home attacks in a power-play pyramid (flying GK), away defends in a diamond.
const HALF: Layout = Layout {
    ball: (50.0, 20.0),
    home: [
        gk("gk-home", 50.0, 15.0),
        field("home-1", "1", 15.0, 75.0),
        field("home-2", "2", 85.0, 75.0),
        field("home-3", "3", 25.0, 30.0),
        field("home-4", "4", 75.0, 30.0),
    ],
    away: [
        gk("gk-away", 50.0, 95.0),
        field("away-1", "1", 50.0, 35.0),
        field("away-2", "2", 30.0, 55.0),
        field("away-3", "3", 70.0, 55.0),
        field("away-4", "4", 50.0, 75.0),
    ],
};

fn layout(mode: Mode) -> &'static Layout {
    match mode {
        Mode::Full => &FULL,
        Mode::Half => &HALF,
    }
}

fn to_players(slots: &[Slot], team: Team) -> impl Iterator<Item = Player> + '_ {
    slots.iter().map(move |s| Player {
        id: s.id.to_owned(),
        number: s.number.to_owned(),
        x: s.x,
        y: s.y,
        role: s.role,
        team,
    })
}

/// Both default rosters (home first) for `mode`.
pub fn default_players(mode: Mode) -> Vec<Player> {
    let l = layout(mode);
    to_players(&l.home, Team::Home)
        .chain(to_players(&l.away, Team::Away))
        .collect()
}

/// Kick-off ball position for `mode`.
pub fn default_ball(mode: Mode) -> Position {
    let (x, y) = layout(mode).ball;
    Position::new(x, y)
}

/// The board state after a reset: default rosters, default ball, no annotation.
pub fn default_frame(mode: Mode) -> Frame {
    Frame {
        players: default_players(mode),
        ball: default_ball(mode),
        annotation: None,
    }
}
