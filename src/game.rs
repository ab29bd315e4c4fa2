//! Frame loop
//!
//! One frame: feed pending key events, run zero or more fixed physics steps,
//! hand the renderer a read-only view. Everything happens on the caller's
//! thread in that order.

use crate::highscores::ScoreSink;
use crate::platform::{Key, KeyEvent, KeyboardState};
use crate::settings::Settings;
use crate::sim::pong::{self, PongBindings, PongInput, PongState};
use crate::sim::screen::{ScreenAction, ScreenState};
use crate::sim::shiba::{self, EnemyController, ShibaInput, ShibaState};
use crate::sim::FixedTimestep;

/// Draws a session. Gets shared access only.
pub trait Renderer<S> {
    fn render(&mut self, session: &S);
}

impl<S, F: FnMut(&S)> Renderer<S> for F {
    fn render(&mut self, session: &S) {
        self(session)
    }
}

/// A game the frame loop can drive
pub trait Simulation {
    /// A key went down this frame (menus, quitting)
    fn handle_key(&mut self, key: Key);

    /// One physics step with the current held keys. Returning false stops
    /// the remaining catch-up steps of the frame.
    fn step(&mut self, keys: &KeyboardState) -> bool;

    /// Physics only runs while this is true
    fn is_simulating(&self) -> bool {
        true
    }

    fn is_running(&self) -> bool;
}

/// Per-frame bookkeeping returned to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub steps: u32,
}

/// Game instance holding a session, key state and the scheduler
pub struct Game<S> {
    sim: S,
    keys: KeyboardState,
    timestep: FixedTimestep,
    frames: u64,
}

impl<S: Simulation> Game<S> {
    pub fn new(sim: S, timestep: FixedTimestep) -> Self {
        Self {
            sim,
            keys: KeyboardState::new(),
            timestep,
            frames: 0,
        }
    }

    pub fn session(&self) -> &S {
        &self.sim
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    /// Run one frame given the events received and the wall time since the
    /// previous frame
    pub fn frame<I, R>(&mut self, events: I, elapsed: f64, renderer: &mut R) -> FrameReport
    where
        I: IntoIterator<Item = KeyEvent>,
        R: Renderer<S>,
    {
        for event in events {
            self.keys.apply(event);
        }
        for key in self.keys.drain_pressed() {
            self.sim.handle_key(key);
        }

        let steps = if self.sim.is_simulating() {
            let sim = &mut self.sim;
            let keys = &self.keys;
            self.timestep.advance_while(elapsed, || sim.step(keys))
        } else {
            // No catch-up burst when play resumes
            self.timestep.reset_countdown();
            0
        };

        renderer.render(&self.sim);
        self.frames += 1;
        FrameReport { steps }
    }

    pub fn into_session(self) -> S {
        self.sim
    }
}

/// Two-player Pong. Escape quits.
#[derive(Debug, Clone)]
pub struct PongSession {
    state: PongState,
    bindings: PongBindings,
    running: bool,
}

impl PongSession {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        log::info!("Pong session starting with seed {seed}");
        Self {
            state: PongState::with_field(seed, settings.pong_field),
            bindings: settings.pong_bindings.clone(),
            running: true,
        }
    }

    pub fn state(&self) -> &PongState {
        &self.state
    }

    /// Direct access for scripted setups
    pub fn state_mut(&mut self) -> &mut PongState {
        &mut self.state
    }
}

impl Simulation for PongSession {
    fn handle_key(&mut self, key: Key) {
        if key == Key::Escape {
            log::info!(
                "Pong session ended at {}-{}",
                self.state.score.left,
                self.state.score.right
            );
            self.running = false;
        }
    }

    fn step(&mut self, keys: &KeyboardState) -> bool {
        let input = PongInput::from_keys(keys, &self.bindings);
        pong::tick(&mut self.state, &input);
        true
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Menu-driven Shiba run with an external enemy controller and score sink
pub struct ShibaSession<E, K> {
    state: ShibaState,
    screen: ScreenState,
    enemies: E,
    sink: K,
    player: String,
    /// Score of the last finished run, shown on the game-over screen
    final_score: Option<u64>,
    running: bool,
}

impl<E: EnemyController, K: ScoreSink> ShibaSession<E, K> {
    pub fn new(settings: &Settings, seed: u64, enemies: E, sink: K) -> Self {
        log::info!(
            "Shiba session starting for {} with seed {seed}",
            settings.player_name
        );
        Self {
            state: ShibaState::with_field(seed, settings.shiba_field, settings.physics_hz),
            screen: ScreenState::new(),
            enemies,
            sink,
            player: settings.player_name.clone(),
            final_score: None,
            running: true,
        }
    }

    pub fn state(&self) -> &ShibaState {
        &self.state
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn enemies(&self) -> &E {
        &self.enemies
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    fn finish_run(&mut self) {
        let score = self.enemies.score();
        log::info!("Game over for {}: {score}", self.player);
        self.final_score = Some(score);
        self.screen.game_over();
        self.sink.submit(&self.player, score);
        self.enemies.cleanup();
    }
}

impl<E: EnemyController, K: ScoreSink> Simulation for ShibaSession<E, K> {
    fn handle_key(&mut self, key: Key) {
        match self.screen.handle_key(key) {
            ScreenAction::None | ScreenAction::Resume => {}
            ScreenAction::NewGame => {
                log::info!("New game");
                self.final_score = None;
                self.enemies.new_game();
                self.state.new_game();
            }
            ScreenAction::LeaveGame => self.enemies.cleanup(),
            ScreenAction::Quit => {
                log::info!("Quit from menu");
                self.running = false;
            }
        }
    }

    fn step(&mut self, keys: &KeyboardState) -> bool {
        let input = ShibaInput::from_keys(keys);
        shiba::tick(&mut self.state, &input, &mut self.enemies);
        if self.enemies.player_defeated() {
            self.finish_run();
            return false;
        }
        true
    }

    fn is_simulating(&self) -> bool {
        self.screen.is_playing()
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::Screen;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        frames: u32,
    }

    impl<S> Renderer<S> for Recorder {
        fn render(&mut self, _session: &S) {
            self.frames += 1;
        }
    }

    #[derive(Default)]
    struct Sink {
        submitted: Vec<(String, u64)>,
    }

    impl ScoreSink for Sink {
        fn submit(&mut self, player: &str, score: u64) {
            self.submitted.push((player.to_string(), score));
        }
    }

    /// Controller that declares defeat after `lives` ticks. Its score is
    /// ten per tick survived.
    #[derive(Default)]
    struct Countdown {
        lives: u32,
        ticks: u32,
        cleanups: u32,
        resets: u32,
    }

    impl EnemyController for Countdown {
        fn bullet_hit(&mut self, _pos: Vec2) -> bool {
            false
        }

        fn advance(&mut self, _ship: Vec2, _tick: u64) {
            self.ticks += 1;
        }

        fn cleanup(&mut self) {
            self.cleanups += 1;
        }

        fn new_game(&mut self) {
            self.ticks = 0;
            self.resets += 1;
        }

        fn score(&self) -> u64 {
            self.ticks as u64 * 10
        }

        fn player_defeated(&self) -> bool {
            self.ticks >= self.lives
        }
    }

    /// Release then press, so a key already held registers again
    fn tap(key: Key) -> [KeyEvent; 2] {
        [KeyEvent::release(key), KeyEvent::press(key)]
    }

    fn pong_game() -> Game<PongSession> {
        let settings = Settings::default();
        Game::new(PongSession::new(&settings, 1), settings.timestep())
    }

    #[test]
    fn test_frame_runs_fixed_steps_then_renders() {
        let mut game = pong_game();
        let mut recorder = Recorder::default();
        let report = game.frame([], 3.5 * SIM_DT, &mut recorder);
        assert_eq!(report.steps, 3);
        assert_eq!(recorder.frames, 1);
        assert_eq!(game.session().state().time_ticks, 3);
    }

    #[test]
    fn test_held_key_moves_paddle_each_step() {
        let mut game = pong_game();
        let mut noop = |_: &PongSession| {};
        game.frame([KeyEvent::press(Key::Char('w'))], 2.0 * SIM_DT + 1e-6, &mut noop);
        assert_eq!(game.session().state().left.body.pos.y, 366.0);
        game.frame([KeyEvent::release(Key::Char('w'))], SIM_DT, &mut noop);
        assert_eq!(game.session().state().left.body.pos.y, 366.0);
    }

    #[test]
    fn test_escape_stops_pong() {
        let mut game = pong_game();
        assert!(game.is_running());
        game.frame([KeyEvent::press(Key::Escape)], 0.0, &mut Recorder::default());
        assert!(!game.is_running());
    }

    #[test]
    fn test_shiba_menu_gates_physics() {
        let settings = Settings::default();
        let enemies = Countdown {
            lives: 1000,
            ..Default::default()
        };
        let session = ShibaSession::new(&settings, 1, enemies, Sink::default());
        let mut game = Game::new(session, settings.timestep());
        let mut r = Recorder::default();

        let report = game.frame([], 10.0 * SIM_DT, &mut r);
        assert_eq!(report.steps, 0);
        assert_eq!(game.session().screen().screen(), Screen::Menu);

        game.frame([KeyEvent::press(Key::Enter)], 0.0, &mut r);
        assert!(game.session().screen().is_playing());
        assert_eq!(game.session().enemies().resets, 1);
        assert_eq!(game.session().enemies().cleanups, 0);

        let report = game.frame([], 2.0 * SIM_DT + 1e-6, &mut r);
        assert_eq!(report.steps, 2);
        assert_eq!(game.session().state().time_ticks, 2);
    }

    #[test]
    fn test_game_over_submits_once() {
        let mut settings = Settings::default();
        settings.player_name = "joseph".into();
        let enemies = Countdown {
            lives: 3,
            ..Default::default()
        };
        let session = ShibaSession::new(&settings, 1, enemies, Sink::default());
        let mut game = Game::new(session, settings.timestep());
        let mut r = Recorder::default();

        game.frame([KeyEvent::press(Key::Enter)], 0.0, &mut r);
        let report = game.frame([], 8.0 * SIM_DT + 1e-6, &mut r);
        // Stepping stops on the tick that ended the run
        assert_eq!(report.steps, 3);
        assert_eq!(game.timestep().ticks(), 3);
        assert_eq!(game.session().state().time_ticks, 3);
        assert_eq!(game.session().screen().screen(), Screen::GameOver);
        assert_eq!(
            game.session().sink().submitted,
            vec![("joseph".to_string(), 30)]
        );
        assert_eq!(game.session().enemies().cleanups, 1);

        game.frame([], 8.0 * SIM_DT, &mut r);
        assert_eq!(game.session().sink().submitted.len(), 1);
    }

    #[test]
    fn test_final_score_kept_until_next_game() {
        let settings = Settings::default();
        let enemies = Countdown {
            lives: 2,
            ..Default::default()
        };
        let session = ShibaSession::new(&settings, 1, enemies, Sink::default());
        let mut game = Game::new(session, settings.timestep());
        let mut r = Recorder::default();

        game.frame([KeyEvent::press(Key::Enter)], 0.0, &mut r);
        assert_eq!(game.session().final_score(), None);
        game.frame([], 4.0 * SIM_DT + 1e-6, &mut r);
        assert_eq!(game.session().screen().screen(), Screen::GameOver);
        assert_eq!(game.session().final_score(), Some(20));

        // Back to the menu and play again
        game.frame(tap(Key::Escape), 0.0, &mut r);
        assert_eq!(game.session().final_score(), Some(20));
        game.frame(tap(Key::Enter), 0.0, &mut r);
        assert_eq!(game.session().final_score(), None);
        assert_eq!(game.session().enemies().resets, 2);
        assert_eq!(game.session().enemies().score(), 0);
    }

    #[test]
    fn test_escape_then_resume_keeps_run() {
        let settings = Settings::default();
        let enemies = Countdown {
            lives: 1000,
            ..Default::default()
        };
        let session = ShibaSession::new(&settings, 1, enemies, Sink::default());
        let mut game = Game::new(session, settings.timestep());
        let mut r = Recorder::default();

        game.frame([KeyEvent::press(Key::Enter)], 0.0, &mut r);
        game.frame([], 2.0 * SIM_DT + 1e-6, &mut r);
        assert_eq!(game.session().enemies().score(), 20);

        game.frame(tap(Key::Escape), 0.0, &mut r);
        assert_eq!(game.session().screen().screen(), Screen::Menu);
        assert_eq!(game.session().enemies().cleanups, 1);

        game.frame(tap(Key::Enter), 0.0, &mut r);
        assert!(game.session().screen().is_playing());
        assert_eq!(game.session().enemies().resets, 1);
        assert_eq!(game.session().enemies().score(), 20);

        game.frame([], SIM_DT + 1e-6, &mut r);
        assert_eq!(game.session().enemies().score(), 30);
        assert_eq!(game.session().state().time_ticks, 3);
    }

    #[test]
    fn test_quit_from_menu() {
        let settings = Settings::default();
        let session = ShibaSession::new(&settings, 1, shiba::NoEnemies, Sink::default());
        let mut game = Game::new(session, settings.timestep());
        game.frame(
            [KeyEvent::press(Key::Up), KeyEvent::press(Key::Enter)],
            0.0,
            &mut Recorder::default(),
        );
        assert!(!game.is_running());
    }
}
