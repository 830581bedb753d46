//! Per-tick session update
//!
//! One call is one iteration of the outer loop: drain the buffered commands,
//! then advance whatever the current phase allows.

use super::collision::{detect_fatal, eats};
use super::grid::Direction;
use super::progression::Level;
use super::spawner::{Bonus, Placeable, PlacementError};
use super::state::{GamePhase, PhaseEvent, Session, transition};
use crate::consts::*;

/// Discrete input command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    TogglePause,
    Start,
    Quit,
}

/// Whether the outer loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Advance the session by one tick. `wall_ms` is a monotonic wall-clock sample;
/// game time only follows it while the phase is running.
pub fn tick(
    session: &mut Session,
    commands: &[Command],
    wall_ms: u64,
) -> Result<LoopControl, PlacementError> {
    let now = session.clock.sync(wall_ms, session.phase.is_running());
    session.ticks += 1;

    for &command in commands {
        match command {
            Command::Quit => {
                log::info!("Quit requested at tick {}", session.ticks);
                return Ok(LoopControl::Quit);
            }
            Command::Start => apply_event(session, now, PhaseEvent::Start),
            Command::TogglePause => apply_event(session, now, PhaseEvent::TogglePause),
            Command::Move(direction) => steer(session, direction),
        }
    }

    match session.phase {
        GamePhase::Playing => step_playing(session, now)?,
        GamePhase::LevelUp { .. } | GamePhase::Countdown { .. } => advance_timers(session, now),
        GamePhase::Menu | GamePhase::Paused | GamePhase::GameOver => {}
    }

    Ok(LoopControl::Continue)
}

fn apply_event(session: &mut Session, now: u64, event: PhaseEvent) {
    let next = transition(session.phase, now, event);
    if next != session.phase {
        log::info!("{:?}: {:?} -> {:?}", event, session.phase, next);
        session.phase = next;
    }
}

/// Queue a turn for the next advance. Turns are checked against the heading
/// the snake last moved with; a reversal is dropped without touching the
/// turn already queued.
fn steer(session: &mut Session, requested: Direction) {
    let moved = session.player.heading();
    if moved.filter(requested) == requested {
        session.pending_heading = requested;
    } else {
        log::debug!("Ignoring reversal {:?} while heading {:?}", requested, moved);
    }
}

fn step_playing(session: &mut Session, now: u64) -> Result<(), PlacementError> {
    session.player.advance(session.pending_heading, &session.grid);
    let head = session.player.head();

    // Items first; pickup is never fatal
    let mut ate = false;
    if eats(head, session.food) {
        session.player.grow();
        session.progression.eat_food();
        session.food = session.place_item(Placeable::Food)?;
        log::debug!(
            "Food eaten, score {}, new food at ({}, {})",
            session.progression.score(),
            session.food.x,
            session.food.y
        );
        ate = true;
    }
    if let Some(bonus) = session.bonus {
        if eats(head, bonus.position) {
            session.player.grow();
            session.progression.eat_bonus();
            session.bonus = None;
            log::info!("Bonus eaten, score {}", session.progression.score());
            ate = true;
        }
    }

    let reached = if ate {
        session.progression.check_level_up()
    } else {
        None
    };
    if let Some(level) = reached {
        log::info!("{} reached at score {}", level, session.progression.score());
        if level == Level::Three {
            session.obstacles.regenerate(
                &mut session.rng,
                &session.grid,
                OBSTACLE_COUNT,
                &session.player,
            )?;
            relocate_covered_items(session)?;
        }
    }

    let adversary = session
        .adversary
        .is_active()
        .then_some(&session.adversary);
    if let Some(kind) =
        detect_fatal(&session.player, &session.grid, &session.obstacles, adversary)
    {
        log::info!(
            "Game over: {:?} collision at ({}, {}), final score {}",
            kind,
            head.x,
            head.y,
            session.progression.score()
        );
        session.game_over_cause = Some(kind);
        session.phase = transition(session.phase, now, PhaseEvent::FatalCollision);
        return Ok(());
    }

    if reached.is_some() {
        session.phase = transition(session.phase, now, PhaseEvent::LevelReached);
    }

    if session.progression.bonus_eligible(session.bonus.is_some()) {
        let position = session.place_item(Placeable::Bonus)?;
        session.bonus = Some(Bonus::new(position, now));
        log::info!("Bonus spawned at ({}, {})", position.x, position.y);
    }

    if let Some(bonus) = session.bonus {
        if bonus.is_expired(now) {
            log::debug!("Bonus at ({}, {}) expired", bonus.position.x, bonus.position.y);
            session.bonus = None;
        }
    }

    if session.adversary.is_active() {
        session
            .adversary
            .step(&mut session.rng, &session.grid, &session.obstacles, now);
    }

    Ok(())
}

/// Re-place items a fresh obstacle set landed on
fn relocate_covered_items(session: &mut Session) -> Result<(), PlacementError> {
    let grid = session.grid;
    if session.obstacles.blocks(&grid.cell_rect(session.food)) {
        session.food = session.place_item(Placeable::Food)?;
        log::debug!(
            "Food moved out from under a stone to ({}, {})",
            session.food.x,
            session.food.y
        );
    }
    if let Some(bonus) = session.bonus {
        if session.obstacles.blocks(&grid.cell_rect(bonus.position)) {
            let position = session.place_item(Placeable::Bonus)?;
            session.bonus = Some(Bonus { position, ..bonus });
        }
    }
    Ok(())
}

fn advance_timers(session: &mut Session, now: u64) {
    let before = session.phase;
    session.phase = transition(before, now, PhaseEvent::Clock);
    match (before, session.phase) {
        (GamePhase::LevelUp { .. }, GamePhase::Countdown { .. }) => {
            log::info!("Countdown started at {} ms", now);
        }
        (GamePhase::Countdown { .. }, GamePhase::Playing) => resume_play(session),
        _ => {}
    }
}

fn resume_play(session: &mut Session) {
    session.progression.release_latch();
    if session.progression.level() >= Level::Two && !session.adversary.is_active() {
        session.adversary.activate();
        let head = session.adversary.head();
        log::info!("Adversary snake activated at ({}, {})", head.x, head.y);
    }
    log::info!("Play resumed on {}", session.progression.level());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::adversary::AdversarySnake;
    use crate::sim::collision::CollisionKind;
    use crate::sim::obstacles::ObstacleField;
    use crate::sim::progression::Progression;
    use crate::sim::snake::PlayerSnake;
    use glam::IVec2;

    /// Session that has just left the Menu at wall time 0, with the food
    /// parked in a corner the snake never reaches
    fn started(seed: u64) -> Session {
        let mut session = Session::new(seed).unwrap();
        session.food = IVec2::new(0, 0);
        tick(&mut session, &[Command::Start], 0).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.player.head(), IVec2::new(425, 300));
        session
    }

    fn cell_ahead(session: &Session) -> IVec2 {
        session
            .grid
            .step(session.player.head(), session.pending_heading)
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut session = Session::new(1).unwrap();
        for wall in [0, 500, 10_000] {
            tick(&mut session, &[], wall).unwrap();
        }
        assert_eq!(session.phase, GamePhase::Menu);
        assert_eq!(session.player.head(), IVec2::new(400, 300));
        assert_eq!(session.now(), 0);
        assert_eq!(session.ticks, 3);
    }

    #[test]
    fn test_quit_stops_immediately() {
        let mut session = started(1);
        let before = session.player.head();
        let control = tick(&mut session, &[Command::Quit, Command::TogglePause], 130).unwrap();
        assert_eq!(control, LoopControl::Quit);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.player.head(), before);
    }

    #[test]
    fn test_eating_food_scores_and_grows() {
        let mut session = started(2);
        let food = cell_ahead(&session);
        session.food = food;

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.player.head(), food);
        assert_eq!(session.progression.score(), 1);
        assert_eq!(session.progression.points_since_bonus(), 1);
        assert!(session.player.is_growing());
        assert_ne!(session.food, food);
        assert!(session.grid.contains(session.food));
        assert!(!session.player.occupies(session.food));
        assert!(!session.adversary.occupies(session.food));

        tick(&mut session, &[], 260).unwrap();
        assert_eq!(session.player.len(), 2);
        assert_eq!(session.speed_ms(), 125);
    }

    #[test]
    fn test_level_two_banner_countdown_and_resume() {
        let mut session = started(3);
        session.progression = Progression::at(7, Level::One);
        session.food = cell_ahead(&session);

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.progression.score(), 8);
        assert_eq!(session.progression.level(), Level::Two);
        assert!(session.progression.level_up_triggered());
        assert_eq!(session.phase, GamePhase::LevelUp { started_at: 130 });
        let frozen_head = session.player.head();

        tick(&mut session, &[Command::Move(Direction::Up)], 3_129).unwrap();
        assert_eq!(session.phase, GamePhase::LevelUp { started_at: 130 });
        assert_eq!(session.player.head(), frozen_head);

        tick(&mut session, &[], 3_130).unwrap();
        assert_eq!(session.phase, GamePhase::Countdown { started_at: 3_130 });
        assert_eq!(session.phase.remaining_ms(session.now()), Some(3_000));
        assert!(!session.adversary.is_active());

        tick(&mut session, &[], 6_129).unwrap();
        assert!(matches!(session.phase, GamePhase::Countdown { .. }));

        tick(&mut session, &[], 6_130).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(!session.progression.level_up_triggered());
        assert_eq!(session.progression.level(), Level::Two);
        assert!(session.adversary.is_active());
        assert_eq!(session.player.head(), frozen_head);
    }

    #[test]
    fn test_bonus_past_threshold_latches_once_and_moves_stones() {
        let mut session = started(4);
        session.progression = Progression::at(13, Level::Two);
        let target = cell_ahead(&session);
        session.bonus = Some(Bonus::new(target, 0));

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.progression.score(), 16);
        assert_eq!(session.progression.level(), Level::Three);
        assert_eq!(session.phase, GamePhase::LevelUp { started_at: 130 });
        assert!(session.bonus.is_none());

        assert_eq!(session.obstacles.len(), OBSTACLE_COUNT);
        for segment in session.player.segments() {
            assert!(!session.obstacles.blocks(&session.grid.cell_rect(segment)));
        }
        assert!(!session.obstacles.blocks(&session.grid.cell_rect(session.food)));

        tick(&mut session, &[], 3_130).unwrap();
        tick(&mut session, &[], 6_130).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(!session.progression.level_up_triggered());
        assert_eq!(session.progression.check_level_up(), None);
    }

    #[test]
    fn test_right_wall_ends_the_run() {
        let mut session = started(5);
        session.player = PlayerSnake::new(IVec2::new(775, 300), Direction::Right);

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.game_over_cause, Some(CollisionKind::Boundary));
        assert_eq!(session.player.head(), IVec2::new(800, 300));

        // Terminal: nothing moves afterwards
        tick(&mut session, &[Command::Start, Command::TogglePause], 260).unwrap();
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.player.head(), IVec2::new(800, 300));
    }

    #[test]
    fn test_fatal_collision_beats_level_up() {
        let mut session = started(6);
        session.progression = Progression::at(7, Level::One);
        session.player = PlayerSnake::new(IVec2::new(775, 300), Direction::Right);
        session.food = IVec2::new(800, 300);

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.progression.score(), 8);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.game_over_cause, Some(CollisionKind::Boundary));
    }

    #[test]
    fn test_active_adversary_is_fatal() {
        let mut session = started(7);
        let ahead = cell_ahead(&session);
        let mut adversary = AdversarySnake::from_segments(
            ahead - IVec2::new(0, CELL_SIZE),
            [ahead, ahead + IVec2::new(0, CELL_SIZE)],
            Direction::Up,
            0,
        );
        adversary.activate();
        session.adversary = adversary;

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.game_over_cause, Some(CollisionKind::Adversary));
    }

    #[test]
    fn test_dormant_adversary_is_harmless() {
        let mut session = started(8);
        let ahead = cell_ahead(&session);
        session.adversary =
            AdversarySnake::from_segments(ahead, std::iter::empty(), Direction::Up, 0);

        tick(&mut session, &[], 130).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.adversary.head(), ahead);
    }

    #[test]
    fn test_adversary_moves_on_its_own_timer_only_while_playing() {
        let mut session = started(12);
        session.obstacles = ObstacleField::default();
        let start = IVec2::new(100, 500);
        let mut adversary = AdversarySnake::from_segments(
            start,
            [start - IVec2::new(CELL_SIZE, 0), start - IVec2::new(2 * CELL_SIZE, 0)],
            Direction::Right,
            0,
        );
        adversary.activate();
        session.adversary = adversary;

        // Interval not strictly exceeded yet
        for wall in [130, 260, 390, ADVERSARY_MOVE_INTERVAL_MS] {
            tick(&mut session, &[], wall).unwrap();
            assert_eq!(session.adversary.head(), start);
            assert_eq!(session.adversary.last_move_ms(), 0);
        }

        let first_move = ADVERSARY_MOVE_INTERVAL_MS + 1;
        tick(&mut session, &[], first_move).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.adversary.last_move_ms(), first_move);
        assert_eq!(
            session.adversary.head(),
            session.grid.step(start, session.adversary.heading())
        );
        assert_eq!(session.adversary.len(), 3);
        let moved = session.adversary.clone();

        // Paused: wall time passes, the adversary does not
        tick(&mut session, &[Command::TogglePause], 600).unwrap();
        assert_eq!(session.phase, GamePhase::Paused);
        for wall in [5_000, 10_000] {
            tick(&mut session, &[], wall).unwrap();
            assert_eq!(session.adversary, moved);
        }
        tick(&mut session, &[Command::TogglePause], 10_100).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.now(), 600);
        assert_eq!(session.adversary, moved);

        // Level-up banner and countdown: far past the interval, still frozen
        session.progression = Progression::at(7, Level::One);
        session.food = cell_ahead(&session);
        tick(&mut session, &[], 10_230).unwrap();
        assert_eq!(session.phase, GamePhase::LevelUp { started_at: 730 });
        assert_eq!(session.adversary, moved);

        tick(&mut session, &[], 13_230).unwrap();
        assert_eq!(session.phase, GamePhase::Countdown { started_at: 3_730 });
        assert_eq!(session.adversary, moved);

        tick(&mut session, &[], 16_230).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.adversary, moved);

        // First Playing tick afterwards moves it again
        tick(&mut session, &[], 16_360).unwrap();
        assert_eq!(session.now(), 6_860);
        assert_eq!(session.adversary.last_move_ms(), 6_860);
        assert_eq!(
            session.adversary.head(),
            session.grid.wrap(session.grid.step(moved.head(), session.adversary.heading()))
        );
    }

    #[test]
    fn test_reversal_blocked_within_one_tick() {
        let mut session = started(9);

        // Up is accepted, Left would reverse the last move and is dropped
        tick(
            &mut session,
            &[Command::Move(Direction::Up), Command::Move(Direction::Left)],
            130,
        )
        .unwrap();
        assert_eq!(session.player.head(), IVec2::new(425, 275));

        tick(&mut session, &[Command::Move(Direction::Down)], 260).unwrap();
        assert_eq!(session.player.head(), IVec2::new(425, 250));

        tick(
            &mut session,
            &[Command::Move(Direction::Left), Command::Move(Direction::Down)],
            390,
        )
        .unwrap();
        assert_eq!(session.player.head(), IVec2::new(400, 250));
        assert_eq!(session.player.heading(), Direction::Left);
    }

    #[test]
    fn test_pause_freezes_bonus_lifetime() {
        let mut session = started(10);
        session.bonus = Some(Bonus::new(IVec2::new(0, 575), 0));

        tick(&mut session, &[], 1_000).unwrap();
        tick(&mut session, &[Command::TogglePause], 1_100).unwrap();
        assert_eq!(session.phase, GamePhase::Paused);
        let head = session.player.head();

        tick(&mut session, &[], 20_000).unwrap();
        assert_eq!(session.now(), 1_100);
        assert_eq!(session.player.head(), head);

        tick(&mut session, &[Command::TogglePause], 20_100).unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.now(), 1_100);

        tick(&mut session, &[], 23_999).unwrap();
        assert_eq!(session.now(), 4_999);
        assert!(session.bonus.is_some());

        tick(&mut session, &[], 24_000).unwrap();
        assert_eq!(session.now(), 5_000);
        assert!(session.bonus.is_none());
    }

    #[test]
    fn test_bonus_spawns_when_eligible() {
        let mut session = started(11);
        session.progression = Progression::at(4, Level::One);
        for wall in [130, 260] {
            session.food = cell_ahead(&session);
            tick(&mut session, &[], wall).unwrap();
            assert!(session.bonus.is_none());
        }
        session.food = cell_ahead(&session);
        tick(&mut session, &[], 390).unwrap();

        assert_eq!(session.progression.score(), 7);
        let bonus = session.bonus.expect("bonus should be on the board");
        assert_eq!(bonus.spawned_at, 390);
        assert!(!session.player.occupies(bonus.position));
    }

    #[test]
    fn test_determinism() {
        let script = [
            vec![Command::Start],
            vec![Command::Move(Direction::Up)],
            vec![],
            vec![Command::Move(Direction::Left)],
            vec![],
            vec![Command::Move(Direction::Down)],
        ];
        let run = |seed: u64| {
            let mut session = Session::new(seed).unwrap();
            for step in 0..60u64 {
                let commands = &script[step as usize % script.len()];
                tick(&mut session, commands, step * 130).unwrap();
            }
            session
        };

        let a = run(99_999);
        let b = run(99_999);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player, b.player);
        assert_eq!(a.adversary, b.adversary);
        assert_eq!(a.food, b.food);
        assert_eq!(a.progression, b.progression);
        assert_eq!(a.now(), b.now());
    }
}
