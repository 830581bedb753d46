//! Read-only view of a session for renderers
//!
//! A snapshot is a plain value: renderers get everything they draw from it and
//! have no way back into the simulation.

use serde::{Deserialize, Serialize};

use super::collision::CollisionKind;
use super::grid::{Direction, GridWorld, Position, Rect};
use super::progression::Level;
use super::state::{GamePhase, Session};

/// Bonus item as shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusView {
    pub position: Position,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Game time (ms)
    pub now_ms: u64,
    pub phase: GamePhase,
    /// Time left in LevelUp/Countdown
    pub timer_remaining_ms: Option<u64>,
    /// Player body, head first
    pub snake: Vec<Position>,
    pub heading: Direction,
    /// Present only once the adversary is active
    pub adversary: Option<Vec<Position>>,
    pub obstacles: Vec<Rect>,
    pub food: Position,
    pub bonus: Option<BonusView>,
    pub score: u32,
    pub level: Level,
    pub speed_ms: u64,
    pub game_over_cause: Option<CollisionKind>,
    pub grid: GridWorld,
}

impl Snapshot {
    /// Banner for the level just reached, while the LevelUp phase is showing
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::LevelUp { .. } => Some(self.level.banner()),
            _ => None,
        }
    }
}

impl Session {
    pub fn snapshot(&self) -> Snapshot {
        let now = self.now();
        Snapshot {
            tick: self.ticks,
            now_ms: now,
            phase: self.phase,
            timer_remaining_ms: self.phase.remaining_ms(now),
            snake: self.player.segments().collect(),
            heading: self.player.heading(),
            adversary: self
                .adversary
                .is_active()
                .then(|| self.adversary.segments().collect()),
            obstacles: self.obstacles.iter().map(|o| o.rect()).collect(),
            food: self.food,
            bonus: self.bonus.map(|b| BonusView {
                position: b.position,
                remaining_ms: b.remaining_ms(now),
            }),
            score: self.progression.score(),
            level: self.progression.level(),
            speed_ms: self.speed_ms(),
            game_over_cause: self.game_over_cause,
            grid: self.grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::Bonus;
    use crate::sim::tick::{Command, tick};
    use glam::IVec2;

    #[test]
    fn test_menu_snapshot() {
        let session = Session::new(42).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Menu);
        assert_eq!(snapshot.snake, vec![IVec2::new(400, 300)]);
        assert_eq!(snapshot.adversary, None);
        assert!(snapshot.obstacles.is_empty());
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, Level::One);
        assert_eq!(snapshot.speed_ms, 130);
        assert_eq!(snapshot.timer_remaining_ms, None);
        assert_eq!(snapshot.banner(), None);
    }

    #[test]
    fn test_bonus_countdown_and_adversary_visibility() {
        let mut session = Session::new(42).unwrap();
        session.food = IVec2::new(0, 0);
        tick(&mut session, &[Command::Start], 0).unwrap();
        tick(&mut session, &[], 1_000).unwrap();
        session.bonus = Some(Bonus::new(IVec2::new(0, 575), 500));

        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.bonus,
            Some(BonusView {
                position: IVec2::new(0, 575),
                remaining_ms: 4_500,
            })
        );

        session.adversary.activate();
        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.adversary.map(|body| body.len()),
            Some(session.adversary.len())
        );
    }

    #[test]
    fn test_snapshot_serializes_as_json() {
        let session = Session::new(3).unwrap();
        let snapshot = session.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"phase\":\"Menu\""));
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
