//! End-to-end game scenarios through the public API

use alien_invasion::bridge::NativeGame;
use alien_invasion::consts::{HIGH_SCORE_FILE, SIM_DT};
use alien_invasion::sim::{
    Bullet, BulletOwner, GameEvent, GamePhase, GameSession, Rect, ReturnPhase, TickInput, tick,
};
use alien_invasion::{FileScoreStore, Game, ScoreStore, Settings};
use glam::Vec2;

fn input(f: impl FnOnce(&mut TickInput)) -> TickInput {
    let mut input = TickInput::default();
    f(&mut input);
    input
}

fn playing(seed: u64) -> GameSession {
    let mut session = GameSession::new(Settings::default(), seed);
    tick(&mut session, &input(|i| i.play = true), SIM_DT);
    assert_eq!(session.phase, GamePhase::Playing);
    session
}

#[test]
fn bullet_kills_alien() {
    let mut session = playing(100);
    let (handle, rect) = session
        .aliens
        .iter_active()
        .next()
        .map(|(h, a)| (h, a.rect))
        .unwrap();
    let bullet = session
        .player_bullets
        .spawn(Bullet {
            rect: Rect::from_center(rect.center(), Vec2::new(3.0, 15.0)),
            vel: Vec2::new(0.0, -150.0),
            owner: BulletOwner::Player,
        })
        .unwrap();

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.stats.score, 10);
    assert_eq!(session.stats.ships_left, 3);
    assert!(session.aliens.get(handle).is_none());
    assert!(session.player_bullets.get(bullet).is_none());
    assert_eq!(session.snapshot().aliens.len(), 34);
}

#[test]
fn last_ship_lost_to_alien_ends_game_and_records_score() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileScoreStore::open(dir.path()).unwrap();
    let mut game = Game::new(Settings::default(), Box::new(store), 5).unwrap();
    game.step(&input(|i| i.play = true));

    let session = game.session_mut();
    session.stats.ships_left = 1;
    session.stats.score = 230;
    // Fly the ship into an alien
    let alien = session.aliens.iter_active().next().map(|(_, a)| a.rect).unwrap();
    session.ship.rect.pos = alien.pos;

    let events = game.step(&TickInput::default());

    assert_eq!(game.session().stats.ships_left, 0);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(events.contains(&GameEvent::GameOver { score: 230, wave: 1 }));
    assert_eq!(game.high_scores().scores(), &[230]);

    let on_disk = FileScoreStore::new(dir.path().join(HIGH_SCORE_FILE)).load();
    assert_eq!(on_disk.scores(), &[230]);
}

#[test]
fn ship_hit_with_lives_left_resets_the_fleet() {
    let mut session = playing(6);
    session.stats.score = 40;
    let doomed: Vec<_> = session.aliens.iter_active().map(|(h, _)| h).take(10).collect();
    for &handle in &doomed {
        session.aliens.despawn(handle);
    }
    session.enemy_bullets.spawn(Bullet {
        rect: Rect::from_center(session.ship.rect.center(), Vec2::new(3.0, 15.0)),
        vel: Vec2::new(0.0, 120.0),
        owner: BulletOwner::Enemy,
    });

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.phase, GamePhase::Playing);
    assert_eq!(session.stats.ships_left, 2);
    assert_eq!(session.stats.score, 40);
    assert_eq!(session.stats.wave, 1);
    assert_eq!(session.aliens.active_count(), 35);
    // Handles from the old fleet never resolve to the new one
    assert!(doomed.iter().all(|&h| session.aliens.get(h).is_none()));
    assert!(session.enemy_bullets.is_empty());
    assert_eq!(session.ship.rect.midbottom(), Vec2::new(600.0, 800.0));
    assert!(session.is_paused());
}

#[test]
fn clearing_the_fleet_advances_the_wave() {
    let mut session = playing(7);
    session.aliens.clear();
    session.player_bullets.spawn(Bullet::player(&session.ship.rect, &session.settings));
    session.drain_events();

    tick(&mut session, &TickInput::default(), SIM_DT);

    assert_eq!(session.stats.wave, 2);
    assert!((session.stats.difficulty_multiplier - 1.1).abs() < 1e-6);
    assert_eq!(session.aliens.active_count(), 35);
    assert!(session.player_bullets.is_empty());
    assert!(session.enemy_bullets.is_empty());
    assert!(session.events().contains(&GameEvent::WaveCleared { wave: 2 }));
}

#[test]
fn firing_at_the_limit_changes_nothing() {
    let mut session = playing(8);
    let fire = input(|i| i.fire = true);
    for _ in 0..3 {
        tick(&mut session, &fire, SIM_DT);
    }
    assert_eq!(session.player_bullets.active_count(), 3);
    let before = session.snapshot().player_bullets;

    tick(&mut session, &fire, 0.0);
    assert_eq!(session.snapshot().player_bullets, before);
}

#[test]
fn inactive_aliens_are_invisible() {
    let mut session = playing(9);
    let (handle, rect) = session
        .aliens
        .iter_active()
        .next()
        .map(|(h, a)| (h, a.rect))
        .unwrap();
    session.aliens.despawn(handle);
    session.player_bullets.spawn(Bullet {
        rect: Rect::from_center(rect.center(), Vec2::new(3.0, 15.0)),
        vel: Vec2::ZERO,
        owner: BulletOwner::Player,
    });

    let snapshot = session.snapshot();
    assert!(!snapshot.aliens.contains(&rect.to_pixels()));
    assert_eq!(snapshot.aliens.len(), 34);

    // Neighbours are more than an alien width away, so nothing is hit
    tick(&mut session, &TickInput::default(), SIM_DT);
    assert_eq!(session.stats.score, 0);
    assert_eq!(session.player_bullets.active_count(), 1);
}

#[test]
fn menu_flow() {
    let mut session = GameSession::new(Settings::default(), 10);
    tick(&mut session, &input(|i| i.high_scores = true), SIM_DT);
    assert_eq!(
        session.phase,
        GamePhase::HighScores {
            back_to: ReturnPhase::Start
        }
    );
    tick(&mut session, &input(|i| i.back = true), SIM_DT);
    assert_eq!(session.phase, GamePhase::Start);

    // Click the Play button
    tick(
        &mut session,
        &input(|i| i.click = Some(Vec2::new(600.0, 400.0))),
        SIM_DT,
    );
    assert_eq!(session.phase, GamePhase::Playing);

    session.stats.score = 90;
    session.set_phase(GamePhase::GameOver);
    tick(&mut session, &input(|i| i.play = true), SIM_DT);
    assert_eq!(session.phase, GamePhase::Playing);
    assert_eq!(session.stats.score, 0);
    assert_eq!(session.stats.ships_left, 3);

    tick(&mut session, &input(|i| i.quit = true), SIM_DT);
    assert_eq!(session.phase, GamePhase::Terminated);
}

#[test]
fn bridge_high_score_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut bridge = NativeGame::open(dir.path(), Settings::default(), 11).unwrap();
    for score in [70, 10, 500] {
        bridge.save_high_score(score);
    }
    assert_eq!(bridge.load_high_scores(), vec![500, 70, 10]);

    let reopened = NativeGame::open(dir.path(), Settings::default(), 12).unwrap();
    assert_eq!(reopened.load_high_scores(), vec![500, 70, 10]);
}
