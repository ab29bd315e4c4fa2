//! Arcade Lab - headless runner
//!
//! Drives either game with an autopilot for a fixed number of frames, logs
//! progress and prints the final state as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::time::Duration;

    use arcade_lab::consts::STARTING_LIVES;
    use arcade_lab::game::{Game, PongSession, Renderer, ShibaSession, Simulation};
    use arcade_lab::platform::{Clock, Key, KeyEvent, ManualClock, SystemClock};
    use arcade_lab::sim::{Aabb, EnemyController, Screen, Side};
    use arcade_lab::{HighScores, ScoreSink, Settings};
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    const USAGE: &str =
        "usage: arcade-lab [pong|shiba] [--frames N] [--seed S] [--config PATH] [--realtime]";

    /// How many frames between progress log lines
    const LOG_EVERY: u64 = 120;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Pong,
        Shiba,
    }

    #[derive(Debug)]
    struct Options {
        mode: Mode,
        frames: u64,
        seed: Option<u64>,
        config: Option<PathBuf>,
        realtime: bool,
    }

    fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
        let mut opts = Options {
            mode: Mode::Pong,
            frames: 600,
            seed: None,
            config: None,
            realtime: false,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "pong" => opts.mode = Mode::Pong,
                "shiba" => opts.mode = Mode::Shiba,
                "--realtime" => opts.realtime = true,
                "--frames" | "--seed" | "--config" => {
                    let value = args.next().ok_or_else(|| format!("{arg} needs a value"))?;
                    match arg.as_str() {
                        "--frames" => {
                            opts.frames = value.parse().map_err(|_| format!("bad frame count: {value}"))?
                        }
                        "--seed" => {
                            opts.seed = Some(value.parse().map_err(|_| format!("bad seed: {value}"))?)
                        }
                        _ => opts.config = Some(PathBuf::from(value)),
                    }
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(opts)
    }

    /// Turns a wanted set of held keys into press/release events
    #[derive(Default)]
    struct Autopilot {
        held: HashSet<Key>,
    }

    impl Autopilot {
        fn hold(&mut self, wanted: &[Key]) -> Vec<KeyEvent> {
            let wanted: HashSet<Key> = wanted.iter().copied().collect();
            let mut events: Vec<KeyEvent> = self
                .held
                .difference(&wanted)
                .map(|&k| KeyEvent::release(k))
                .collect();
            events.extend(wanted.difference(&self.held).map(|&k| KeyEvent::press(k)));
            self.held = wanted;
            events
        }
    }

    /// Both bumpers chase the ball
    fn pong_keys(session: &PongSession, settings: &Settings) -> Vec<Key> {
        let state = session.state();
        let b = &settings.pong_bindings;
        let ball_y = state.ball.body.pos.y;
        let mut keys = Vec::new();
        for (side, up, down) in [
            (Side::Left, b.left_up, b.left_down),
            (Side::Right, b.right_up, b.right_down),
        ] {
            let dy = ball_y - state.paddle(side).body.pos.y;
            if dy > 4.0 {
                keys.push(up);
            } else if dy < -4.0 {
                keys.push(down);
            }
        }
        keys
    }

    /// Start from the menu, fire constantly and turn a quarter every second.
    /// After a game over, go back through the menu and play again.
    fn shiba_keys<E, K>(session: &ShibaSession<E, K>, frame: u64) -> Vec<Key>
    where
        E: EnemyController,
        K: ScoreSink,
    {
        match session.screen().screen() {
            Screen::Playing => {
                let turn = [Key::Right, Key::Down, Key::Left, Key::Up][(frame / 60 % 4) as usize];
                vec![Key::Space, turn]
            }
            Screen::Menu => vec![Key::Enter],
            _ => vec![Key::Escape],
        }
    }

    /// Stationary square targets. Shooting one scores and moves it; flying
    /// into one costs a life.
    struct TargetRange {
        field: Vec2,
        targets: Vec<Aabb>,
        lives: u8,
        score: u64,
        rng: Pcg32,
    }

    impl TargetRange {
        const COUNT: usize = 5;
        const HALF: f32 = 20.0;

        fn new(field: Vec2, seed: u64) -> Self {
            let mut range = Self {
                field,
                targets: Vec::new(),
                lives: STARTING_LIVES,
                score: 0,
                rng: Pcg32::seed_from_u64(seed),
            };
            range.new_game();
            range
        }

        fn random_target(&mut self) -> Aabb {
            let center = Vec2::new(
                self.rng.random_range(Self::HALF..self.field.x - Self::HALF),
                self.rng.random_range(Self::HALF..self.field.y - Self::HALF),
            );
            Aabb::from_center(center, Vec2::splat(Self::HALF))
        }
    }

    impl EnemyController for TargetRange {
        fn bullet_hit(&mut self, pos: Vec2) -> bool {
            let Some(i) = self.targets.iter().position(|t| t.contains_point(pos)) else {
                return false;
            };
            self.score += 10;
            self.targets[i] = self.random_target();
            true
        }

        fn advance(&mut self, ship: Vec2, tick: u64) {
            let Some(i) = self.targets.iter().position(|t| t.contains_point(ship)) else {
                return;
            };
            self.lives = self.lives.saturating_sub(1);
            log::info!("Ship rammed a target at tick {tick}, {} lives left", self.lives);
            self.targets[i] = self.random_target();
        }

        fn cleanup(&mut self) {
            let targets: Vec<Aabb> = (0..Self::COUNT).map(|_| self.random_target()).collect();
            self.targets = targets;
        }

        fn new_game(&mut self) {
            self.lives = STARTING_LIVES;
            self.score = 0;
            self.cleanup();
        }

        fn score(&self) -> u64 {
            self.score
        }

        fn player_defeated(&self) -> bool {
            self.lives == 0
        }
    }

    /// Stands in for a real renderer: logs a summary every `LOG_EVERY` frames
    #[derive(Default)]
    struct LogRenderer {
        frames: u64,
    }

    impl LogRenderer {
        fn due(&mut self) -> bool {
            self.frames += 1;
            self.frames % LOG_EVERY == 0
        }
    }

    impl Renderer<PongSession> for LogRenderer {
        fn render(&mut self, session: &PongSession) {
            if self.due() {
                let s = session.state();
                log::info!(
                    "frame {}: ball {:?}, score {}-{}",
                    self.frames,
                    s.ball.body.pos,
                    s.score.left,
                    s.score.right
                );
            }
        }
    }

    impl<K: ScoreSink> Renderer<ShibaSession<TargetRange, K>> for LogRenderer {
        fn render(&mut self, session: &ShibaSession<TargetRange, K>) {
            if !self.due() {
                return;
            }
            let screen = session.screen();
            match screen.screen() {
                Screen::Playing => log::info!(
                    "frame {}: ship {:?}, {} bullets, score {}, lives {}",
                    self.frames,
                    session.state().ship.body.pos,
                    session.state().bullets.len(),
                    session.enemies().score,
                    session.enemies().lives
                ),
                Screen::Menu => log::info!(
                    "frame {}: menu, cursor on {}",
                    self.frames,
                    screen.selected().label()
                ),
                Screen::GameOver => log::info!(
                    "frame {}: game over, final score {}",
                    self.frames,
                    session.final_score().unwrap_or(0)
                ),
                other => log::info!("frame {}: {other:?}", self.frames),
            }
        }
    }

    fn run<S, R>(
        game: &mut Game<S>,
        opts: &Options,
        period: f64,
        renderer: &mut R,
        mut input: impl FnMut(&S, u64) -> Vec<Key>,
    ) where
        S: Simulation,
        R: Renderer<S>,
    {
        let mut autopilot = Autopilot::default();
        let mut clock: Box<dyn Clock> = if opts.realtime {
            Box::new(SystemClock::new())
        } else {
            Box::new(ManualClock::new(period))
        };

        for frame in 0..opts.frames {
            if !game.is_running() {
                break;
            }
            let events = autopilot.hold(&input(game.session(), frame));
            let elapsed = clock.elapsed_secs();
            game.frame(events, elapsed, renderer);
            if opts.realtime {
                std::thread::sleep(Duration::from_secs_f64(period));
            }
        }
        log::info!(
            "Ran {} frames, {} physics ticks",
            game.frames(),
            game.timestep().ticks()
        );
    }

    fn print_json<T: serde::Serialize>(value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("could not serialize final state: {e}"),
        }
    }

    pub fn main() {
        env_logger::init();

        let opts = match parse_args(std::env::args().skip(1)) {
            Ok(opts) => opts,
            Err(msg) => {
                eprintln!("{msg}\n{USAGE}");
                std::process::exit(2);
            }
        };

        let mut settings = match &opts.config {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if opts.seed.is_some() {
            settings.seed = opts.seed;
        }
        let seed = settings.seed_or_clock();
        let timestep = settings.timestep();
        let period = timestep.period();
        log::info!("Arcade Lab starting: {:?}, {} frames", opts.mode, opts.frames);

        match opts.mode {
            Mode::Pong => {
                let mut game = Game::new(PongSession::new(&settings, seed), timestep);
                let mut renderer = LogRenderer::default();
                run(&mut game, &opts, period, &mut renderer, |s, _| pong_keys(s, &settings));
                print_json(game.session().state());
            }
            Mode::Shiba => {
                let scores = match &settings.high_scores_path {
                    Some(path) => HighScores::load_or_default(path),
                    None => HighScores::new(),
                };
                let field = Vec2::new(settings.shiba_field.width, settings.shiba_field.height);
                let enemies = TargetRange::new(field, seed.wrapping_add(1));
                let mut game = Game::new(ShibaSession::new(&settings, seed, enemies, scores), timestep);
                let mut renderer = LogRenderer::default();
                run(&mut game, &opts, period, &mut renderer, shiba_keys);
                let session = game.into_session();
                if let Some(best) = session.sink().top_score() {
                    log::info!("Best score this session: {best}");
                }
                print_json(session.state());
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn test_parse_args() {
            let opts = parse_args(args(&["shiba", "--frames", "10", "--seed", "4"])).unwrap();
            assert_eq!(opts.mode, Mode::Shiba);
            assert_eq!(opts.frames, 10);
            assert_eq!(opts.seed, Some(4));
            assert!(!opts.realtime);

            assert!(parse_args(args(&["--frames"])).is_err());
            assert!(parse_args(args(&["tetris"])).is_err());
        }

        #[test]
        fn test_autopilot_diffs_keys() {
            let mut pilot = Autopilot::default();
            let events = pilot.hold(&[Key::Space]);
            assert_eq!(events, vec![KeyEvent::press(Key::Space)]);
            assert!(pilot.hold(&[Key::Space]).is_empty());
            assert_eq!(pilot.hold(&[]), vec![KeyEvent::release(Key::Space)]);
        }

        #[test]
        fn test_target_range_lives() {
            let mut range = TargetRange::new(Vec2::new(1366.0, 768.0), 1);
            assert_eq!(range.targets.len(), TargetRange::COUNT);
            for _ in 0..STARTING_LIVES {
                let inside = range.targets[0].min + Vec2::splat(1.0);
                range.advance(inside, 0);
            }
            assert!(range.player_defeated());
            range.new_game();
            assert!(!range.player_defeated());
        }

        #[test]
        fn test_target_range_cleanup_keeps_run() {
            let mut range = TargetRange::new(Vec2::new(1366.0, 768.0), 1);
            let hit = range.targets[0].min + Vec2::splat(1.0);
            assert!(range.bullet_hit(hit));
            let rammed = range.targets[1].min + Vec2::splat(1.0);
            range.advance(rammed, 0);
            assert_eq!((range.score, range.lives), (10, STARTING_LIVES - 1));

            range.cleanup();
            assert_eq!((range.score, range.lives), (10, STARTING_LIVES - 1));
            assert_eq!(range.targets.len(), TargetRange::COUNT);

            range.new_game();
            assert_eq!((range.score, range.lives), (0, STARTING_LIVES));
        }

        #[test]
        fn test_target_range_scores_hits() {
            let mut range = TargetRange::new(Vec2::new(1366.0, 768.0), 1);
            let inside = range.targets[2].max - Vec2::splat(1.0);
            assert!(range.bullet_hit(inside));
            assert_eq!(range.score(), 10);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
