//! The game session state machine.
//!
//! A [`GameEngine`] owns one [`Session`] at a time and is the only thing that
//! mutates it. All input (tapped answers, recognized voice numbers, hint and
//! skip purchases, timer ticks) arrives through `&mut self` methods, so state
//! transitions are serialized by construction.
//!
//! ```text
//! Idle ──start──▶ Running ──correct──▶ (advance) ──▶ Running … ──▶ Completed
//!                    │                     ▲
//!                    └──wrong──▶ IncorrectFlash ──3s──┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::clock::{Clock, Stopwatch};
use crate::deck::{Deck, DECK_CAP};
use crate::error::EngineError;
use crate::events::{SessionEvent, SessionObserver};
use crate::generator;
use crate::grading;
use crate::model::{Avatar, CharacterKind, GameMode, Problem};
use crate::profile::{persist, PlayerProfile};
use crate::report::GameResult;
use crate::resurfacing::ResurfacingQueue;
use crate::scoring::{self, RewardCountdown, Wallet, HINT_COST, SKIP_COST};
use crate::traits::{FeedbackEffects, PersistenceStore, StoreKey};

/// Cadence at which drivers should call [`GameEngine::tick`].
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// How long the correct answer stays up after a miss.
pub const INCORRECT_DWELL: Duration = Duration::from_secs(3);
/// Streak length from which lightning plays.
pub const LIGHTNING_STREAK: u32 = 3;
/// Every this-many correct answers triggers the milestone effect.
pub const MILESTONE_EVERY: u32 = 10;
/// Smallest answer a hint can be bought for.
pub const HINT_MIN_ANSWER: i64 = 10;

/// Configuration for the game engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Problems generated per session (1..=100).
    pub deck_size: usize,
    /// Expected tick cadence.
    pub tick_interval: Duration,
    /// Dwell on a wrong answer before advancing.
    pub incorrect_dwell: Duration,
    /// Seed for deck generation, options and resurfacing delays.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deck_size: DECK_CAP,
            tick_interval: TICK_INTERVAL,
            incorrect_dwell: INCORRECT_DWELL,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.deck_size == 0 || self.deck_size > DECK_CAP {
            return Err(EngineError::InvalidDeckSize {
                got: self.deck_size,
                max: DECK_CAP,
            });
        }
        if self.tick_interval.is_zero() {
            return Err(EngineError::ZeroTickInterval);
        }
        Ok(())
    }
}

/// Where the state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    /// The correct answer is shown until `resume_at`, then the deck advances.
    IncorrectFlash { resume_at: Duration },
    Completed,
}

/// What a submitted answer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// No question was open; nothing changed.
    Ignored,
    Correct { reward: u64 },
    Incorrect { correct: i64 },
}

/// State of one run. Only the engine mutates it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: GameMode,
    pub deck: Deck,
    /// Index of the current question; also the number of questions resolved.
    pub cursor: usize,
    /// Play time as of the last sample.
    pub elapsed: Duration,
    pub wallet: Wallet,
    pub correct_streak: u32,
    /// Running maximum of `correct_streak` within this session.
    pub max_streak: u32,
    pub correct_count: u32,
    pub reward: RewardCountdown,
    pub hint_active: bool,
    /// Shuffled choices for display input; empty for voice.
    pub answer_options: Vec<i64>,
    pub resurfacing: ResurfacingQueue,
    timer: Stopwatch,
}

impl Session {
    fn new(mode: GameMode, deck: Deck, lifetime: u64) -> Self {
        Self {
            mode,
            deck,
            wallet: Wallet::new(0, lifetime),
            ..Self::default()
        }
    }

    pub fn reward_fraction(&self) -> u32 {
        self.reward.fraction()
    }
}

/// The game session engine.
pub struct GameEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    store: Arc<dyn PersistenceStore>,
    effects: Arc<dyn FeedbackEffects>,
    observers: Vec<Arc<dyn SessionObserver>>,
    rng: StdRng,
    profile: PlayerProfile,
    phase: Phase,
    session: Session,
    result: Option<GameResult>,
}

impl GameEngine {
    /// Build an engine and restore the player's profile from `store`.
    pub fn new(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        store: Arc<dyn PersistenceStore>,
        effects: Arc<dyn FeedbackEffects>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let profile = PlayerProfile::load(store.as_ref());
        tracing::debug!(?profile, "restored player profile");

        Ok(Self {
            config,
            clock,
            store,
            effects,
            observers: Vec::new(),
            rng,
            profile,
            phase: Phase::Idle,
            session: Session::default(),
            result: None,
        })
    }

    /// Register a change-notification subscriber.
    pub fn subscribe(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Result of the last completed session.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::IncorrectFlash { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// The question on screen, if a session is in progress.
    pub fn current_problem(&self) -> Option<&Problem> {
        if !self.is_running() {
            return None;
        }
        self.session.deck.get(self.session.cursor)
    }

    /// Fraction of the deck resolved so far.
    pub fn progress(&self) -> f64 {
        if self.session.deck.is_empty() {
            return 0.0;
        }
        self.session.cursor as f64 / self.session.deck.len() as f64
    }

    pub fn cards_remaining(&self) -> usize {
        self.session.deck.len().saturating_sub(self.session.cursor)
    }

    /// Accuracy over the questions resolved so far.
    pub fn current_accuracy(&self) -> f64 {
        grading::accuracy_percent(self.session.correct_count, self.session.cursor)
    }

    /// What a correct answer would pay right now.
    pub fn reward_preview(&self) -> u64 {
        scoring::reward_amount(
            self.session.reward.fraction(),
            scoring::base_reward(self.session.mode.input),
        )
    }

    /// Character creation: the only way the avatar changes.
    pub fn create_avatar(&mut self, name: &str, kind: CharacterKind) -> &Avatar {
        let avatar = Avatar::new(name, kind);
        persist(
            self.store.as_ref(),
            StoreKey::AvatarName,
            avatar.display_name.as_str(),
        );
        persist(self.store.as_ref(), StoreKey::AvatarKind, kind.as_str());
        tracing::info!(name = %avatar.display_name, %kind, "avatar created");
        self.profile.avatar = avatar.clone();
        self.emit(SessionEvent::AvatarChanged { avatar });
        &self.profile.avatar
    }

    /// Start a fresh session with a generated deck.
    pub fn start(&mut self, mode: GameMode) {
        let deck = generator::generate_with_len(
            mode.problem_set,
            self.config.deck_size,
            &mut self.rng,
        );
        self.start_with_deck(mode, deck);
    }

    /// Start a fresh session over a caller-supplied deck.
    pub fn start_with_deck(&mut self, mode: GameMode, deck: Deck) {
        let now = self.clock.now();
        let deck_len = deck.len();
        self.session = Session::new(mode, deck, self.profile.lifetime_earned);
        self.result = None;
        self.session.timer.start(now);
        self.phase = Phase::Running;
        tracing::info!(%mode, deck_len, "session started");

        self.emit(SessionEvent::Started { mode, deck_len });
        self.sync_balance();

        if deck_len == 0 {
            self.complete(now);
        } else {
            self.present_question(now);
        }
    }

    /// Sample both timers and finish an expired incorrect-answer dwell.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        match self.phase {
            Phase::Running => self.sample_timers(now),
            Phase::IncorrectFlash { resume_at } => {
                self.sample_timers(now);
                if now >= resume_at {
                    self.phase = Phase::Running;
                    self.next_card(now);
                }
            }
            Phase::Idle | Phase::Completed => {}
        }
    }

    /// Grade an answer for the current question.
    ///
    /// Voice-recognized numbers and tapped answers go through here alike.
    pub fn submit_answer(&mut self, value: i64) -> AnswerOutcome {
        if self.phase != Phase::Running {
            tracing::debug!(value, phase = ?self.phase, "answer ignored");
            return AnswerOutcome::Ignored;
        }
        let Some(problem) = self.session.deck.get(self.session.cursor).cloned() else {
            return AnswerOutcome::Ignored;
        };

        let now = self.clock.now();
        self.sample_timers(now);
        let fraction = self.session.reward.stop(now);

        if value == problem.answer() {
            let reward =
                scoring::reward_amount(fraction, scoring::base_reward(self.session.mode.input));
            self.session.wallet.credit(reward);
            self.session.correct_count += 1;
            self.session.correct_streak += 1;
            self.session.max_streak = self.session.max_streak.max(self.session.correct_streak);
            self.sync_balance();

            if self.session.max_streak > self.profile.best_streak {
                self.profile.best_streak = self.session.max_streak;
                persist(
                    self.store.as_ref(),
                    StoreKey::BestStreak,
                    self.profile.best_streak,
                );
            }

            let streak = self.session.correct_streak;
            self.effects.celebrate_correct(streak);
            if streak >= LIGHTNING_STREAK {
                self.effects.celebrate_streak(streak);
            }
            if self.session.correct_count % MILESTONE_EVERY == 0 {
                self.effects.celebrate_milestone();
            }
            tracing::debug!(reward, fraction, streak, "correct answer");
            self.emit(SessionEvent::AnsweredCorrectly {
                answer: value,
                reward,
                streak,
            });

            self.next_card(now);
            AnswerOutcome::Correct { reward }
        } else {
            let correct = problem.answer();
            self.session.correct_streak = 0;
            self.phase = Phase::IncorrectFlash {
                resume_at: now + self.config.incorrect_dwell,
            };
            let delay = self.session.resurfacing.enqueue(problem, &mut self.rng);
            self.effects.celebrate_incorrect();
            tracing::debug!(given = value, correct, delay, "incorrect answer");
            self.emit(SessionEvent::AnsweredIncorrectly {
                given: value,
                correct,
            });
            AnswerOutcome::Incorrect { correct }
        }
    }

    /// Buy a hint for the current question.
    ///
    /// Needs a balance of at least 200 and an answer of at least 10; otherwise
    /// nothing happens. Returns the revealed prefix on success.
    pub fn buy_hint(&mut self) -> Option<i64> {
        if self.phase != Phase::Running {
            return None;
        }
        let problem = self.session.deck.get(self.session.cursor)?;
        let (answer, prefix) = (problem.answer(), problem.hint_prefix());
        if answer < HINT_MIN_ANSWER {
            tracing::debug!(answer, "hint rejected: single-digit answer");
            return None;
        }
        if !self.session.wallet.try_spend(HINT_COST) {
            tracing::debug!(
                balance = self.session.wallet.balance,
                "hint rejected: insufficient funds"
            );
            return None;
        }

        self.session.hint_active = true;
        self.sync_balance();
        self.effects.hint_purchased();
        self.emit(SessionEvent::HintRevealed { prefix });
        Some(prefix)
    }

    /// Pay to skip the current question. No reward and no resurfacing.
    pub fn skip_current_card(&mut self) -> bool {
        if self.phase != Phase::Running || self.current_problem().is_none() {
            return false;
        }
        if !self.session.wallet.try_spend(SKIP_COST) {
            tracing::debug!(
                balance = self.session.wallet.balance,
                "skip rejected: insufficient funds"
            );
            return false;
        }

        self.sync_balance();
        self.emit(SessionEvent::Skipped {
            index: self.session.cursor,
        });
        let now = self.clock.now();
        self.next_card(now);
        true
    }

    /// Re-roll the four options for the current question. Voice modes have none.
    pub fn generate_answer_options(&mut self) -> Vec<i64> {
        if !self.session.mode.shows_options() {
            return Vec::new();
        }
        let Some(answer) = self.current_problem().map(Problem::answer) else {
            return Vec::new();
        };
        self.session.answer_options = generator::answer_options(answer, &mut self.rng);
        self.session.answer_options.clone()
    }

    /// Abandon the session without grading or recording earnings.
    pub fn reset(&mut self) {
        if self.phase != Phase::Idle {
            tracing::info!(cursor = self.session.cursor, "session reset");
        }
        self.session = Session::default();
        self.phase = Phase::Idle;
        self.result = None;
        self.emit(SessionEvent::Reset);
    }

    fn sample_timers(&mut self, now: Duration) {
        self.session.elapsed = self.session.timer.elapsed(now);
        self.session.reward.sample(now);
    }

    fn present_question(&mut self, now: Duration) {
        if self.session.mode.shows_options() {
            self.generate_answer_options();
        } else {
            self.session.answer_options.clear();
        }
        self.session.reward.start(now);

        if let Some(problem) = self.current_problem().cloned() {
            self.emit(SessionEvent::QuestionPresented {
                index: self.session.cursor,
                problem,
                options: self.session.answer_options.clone(),
            });
        }
    }

    fn next_card(&mut self, now: Duration) {
        self.session.reward.stop(now);
        self.session.hint_active = false;
        self.session.resurfacing.tick();

        // Goes in at the current cursor, before it advances; `cursor <= len`
        // and the capacity check mean the insert cannot be refused.
        if !self.session.deck.is_full() {
            if let Some(problem) = self.session.resurfacing.take_due() {
                let index = self.session.cursor;
                if self.session.deck.insert(index, problem.clone()).is_ok() {
                    tracing::debug!(index, question = %problem.question(), "problem resurfaced");
                    self.emit(SessionEvent::Resurfaced { problem, index });
                }
            }
        }

        self.session.cursor += 1;

        if self.session.cursor >= DECK_CAP || self.session.cursor >= self.session.deck.len() {
            self.complete(now);
        } else {
            self.present_question(now);
        }
    }

    fn complete(&mut self, now: Duration) {
        self.session.reward.stop(now);
        self.session.timer.cancel(now);
        self.session.elapsed = self.session.timer.elapsed(now);
        self.session.answer_options.clear();
        self.phase = Phase::Completed;

        let answered = self.session.cursor;
        let accuracy = grading::accuracy_percent(self.session.correct_count, answered);
        let (grade, passed) = grading::grade(accuracy);
        let final_balance = self.session.wallet.balance;

        self.profile.last_game_earnings = final_balance;
        persist(
            self.store.as_ref(),
            StoreKey::LastGameEarnings,
            final_balance,
        );

        let new_high_score = final_balance > self.profile.high_balance;
        if new_high_score {
            self.profile.high_balance = final_balance;
            persist(self.store.as_ref(), StoreKey::HighBalance, final_balance);
            self.effects.celebrate_high_score();
        }

        let result = GameResult {
            id: Uuid::new_v4(),
            finished_at: Utc::now(),
            mode: self.session.mode,
            elapsed_ms: self.session.elapsed.as_millis() as u64,
            accuracy_percent: accuracy,
            grade,
            passed,
            final_balance,
            max_streak: self.session.max_streak,
            correct_count: self.session.correct_count,
            questions_answered: answered as u32,
        };
        tracing::info!(
            %grade,
            accuracy,
            final_balance,
            new_high_score,
            "session completed"
        );

        self.result = Some(result.clone());
        self.emit(SessionEvent::Completed {
            result,
            new_high_score,
        });
    }

    /// Mirror the wallet into the profile and persist both amounts.
    fn sync_balance(&mut self) {
        let wallet = self.session.wallet;
        self.profile.balance = wallet.balance;
        self.profile.lifetime_earned = wallet.lifetime;
        persist(self.store.as_ref(), StoreKey::Balance, wallet.balance);
        persist(self.store.as_ref(), StoreKey::LifetimeEarned, wallet.lifetime);
        self.emit(SessionEvent::BalanceChanged {
            balance: wallet.balance,
        });
    }

    fn emit(&self, event: SessionEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StoreError;
    use crate::model::{InputMethod, Operation, ProblemSet};
    use crate::traits::StoredValue;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, StoredValue>>);

    impl PersistenceStore for MapStore {
        fn get(&self, key: &str) -> Option<StoredValue> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: StoredValue) -> Result<(), StoreError> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Counts {
        incorrect: AtomicU32,
        milestone: AtomicU32,
        lightning: AtomicU32,
        high_score: AtomicU32,
    }

    impl FeedbackEffects for Counts {
        fn celebrate_streak(&self, _: u32) {
            self.lightning.fetch_add(1, Ordering::Relaxed);
        }
        fn celebrate_milestone(&self) {
            self.milestone.fetch_add(1, Ordering::Relaxed);
        }
        fn celebrate_incorrect(&self) {
            self.incorrect.fetch_add(1, Ordering::Relaxed);
        }
        fn celebrate_high_score(&self) {
            self.high_score.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct Harness {
        engine: GameEngine,
        clock: Arc<ManualClock>,
        store: Arc<MapStore>,
        effects: Arc<Counts>,
    }

    fn harness(deck_size: usize) -> Harness {
        let clock = Arc::new(ManualClock::new());
        let store = Arc::new(MapStore::default());
        let effects = Arc::new(Counts::default());
        let config = EngineConfig {
            deck_size,
            seed: Some(42),
            ..Default::default()
        };
        let engine = GameEngine::new(config, clock.clone(), store.clone(), effects.clone())
            .unwrap();
        Harness {
            engine,
            clock,
            store,
            effects,
        }
    }

    fn display_mult() -> GameMode {
        GameMode::new(ProblemSet::Multiplication, InputMethod::Display)
    }

    fn answer(engine: &GameEngine) -> i64 {
        engine.current_problem().unwrap().answer()
    }

    fn fixed_deck(answers: &[(i64, i64)]) -> Deck {
        Deck::new(
            answers
                .iter()
                .map(|&(a, b)| Problem::new(a, b, Operation::Multiply))
                .collect(),
        )
    }

    #[test]
    fn config_validation() {
        assert!(EngineConfig::default().validate().is_ok());
        let bad = EngineConfig {
            deck_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(EngineError::InvalidDeckSize { got: 0, .. })
        ));
        let bad = EngineConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(EngineError::ZeroTickInterval));
    }

    #[test]
    fn start_enters_running_with_options() {
        let mut h = harness(100);
        assert_eq!(h.engine.phase(), Phase::Idle);
        assert!(h.engine.current_problem().is_none());

        h.engine.start(display_mult());
        assert_eq!(h.engine.phase(), Phase::Running);
        assert_eq!(h.engine.session().deck.len(), 100);
        assert_eq!(h.engine.session().cursor, 0);
        assert_eq!(h.engine.session().answer_options.len(), 4);
        assert!(h.engine.session().answer_options.contains(&answer(&h.engine)));
        assert_eq!(h.engine.session().reward_fraction(), 100);
    }

    #[test]
    fn voice_mode_has_no_options() {
        let mut h = harness(10);
        h.engine
            .start(GameMode::new(ProblemSet::Addition, InputMethod::Voice));
        assert!(h.engine.session().answer_options.is_empty());
    }

    #[test]
    fn instant_correct_answer_pays_full_reward() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        let a = answer(&h.engine);
        assert_eq!(h.engine.submit_answer(a), AnswerOutcome::Correct { reward: 500 });
        assert_eq!(h.engine.session().wallet.balance, 500);
        assert_eq!(h.engine.session().wallet.lifetime, 500);
        assert_eq!(h.engine.session().correct_streak, 1);
        assert_eq!(h.engine.session().cursor, 1);
        assert_eq!(h.store.get_int("balance"), Some(500));
        assert_eq!(h.store.get_int("earnings.lifetime"), Some(500));
        assert_eq!(h.store.get_int("streak.best"), Some(1));
    }

    #[test]
    fn reward_decays_with_time() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        h.clock.advance(Duration::from_millis(2_500));
        h.engine.tick();
        assert_eq!(h.engine.session().reward_fraction(), 75);
        assert_eq!(h.engine.reward_preview(), 375);

        let a = answer(&h.engine);
        h.clock.advance(Duration::from_millis(500));
        assert_eq!(h.engine.submit_answer(a), AnswerOutcome::Correct { reward: 350 });
    }

    #[test]
    fn late_answer_pays_nothing_but_counts() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        h.clock.advance(Duration::from_secs(15));
        h.engine.tick();
        assert_eq!(h.engine.session().reward_fraction(), 0);
        let a = answer(&h.engine);
        assert_eq!(h.engine.submit_answer(a), AnswerOutcome::Correct { reward: 0 });
        assert_eq!(h.engine.session().correct_count, 1);
        assert_eq!(h.engine.session().wallet.balance, 0);
    }

    #[test]
    fn wrong_answer_flashes_then_advances() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        let a = answer(&h.engine);
        assert_eq!(
            h.engine.submit_answer(a + 1),
            AnswerOutcome::Incorrect { correct: a }
        );
        assert!(matches!(h.engine.phase(), Phase::IncorrectFlash { .. }));
        assert_eq!(h.engine.session().resurfacing.len(), 1);
        assert_eq!(h.effects.incorrect.load(Ordering::Relaxed), 1);
        assert!(!h.engine.session().reward.is_running());

        // Answers during the dwell are ignored.
        assert_eq!(h.engine.submit_answer(a), AnswerOutcome::Ignored);

        h.clock.advance(Duration::from_millis(2_900));
        h.engine.tick();
        assert_eq!(h.engine.session().cursor, 0);
        h.clock.advance(Duration::from_millis(100));
        h.engine.tick();
        assert_eq!(h.engine.phase(), Phase::Running);
        assert_eq!(h.engine.session().cursor, 1);
        assert_eq!(h.engine.session().wallet.balance, 0);
        assert_eq!(h.engine.session().reward_fraction(), 100);
    }

    #[test]
    fn hint_needs_funds_and_two_digit_answer() {
        let mut h = harness(3);
        h.engine
            .start_with_deck(display_mult(), fixed_deck(&[(7, 8), (7, 8), (2, 3)]));
        assert_eq!(h.engine.buy_hint(), None);

        h.engine.submit_answer(56);
        assert_eq!(h.engine.session().wallet.balance, 500);
        assert_eq!(h.engine.buy_hint(), Some(5));
        assert!(h.engine.session().hint_active);
        assert_eq!(h.engine.session().wallet.balance, 300);
        assert_eq!(h.engine.session().wallet.lifetime, 500);

        // Hint clears on advance; single-digit answers cannot be hinted.
        h.engine.submit_answer(56);
        assert!(!h.engine.session().hint_active);
        let before = h.engine.session().wallet.balance;
        assert_eq!(h.engine.buy_hint(), None);
        assert_eq!(h.engine.session().wallet.balance, before);
    }

    #[test]
    fn skip_needs_funds_and_skips_resurfacing() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        assert!(!h.engine.skip_current_card());
        assert_eq!(h.engine.session().cursor, 0);

        let a = answer(&h.engine);
        h.engine.submit_answer(a);
        assert!(h.engine.skip_current_card());
        assert_eq!(h.engine.session().cursor, 2);
        assert_eq!(h.engine.session().wallet.balance, 300);
        assert!(h.engine.session().resurfacing.is_empty());
        assert_eq!(h.engine.session().correct_streak, 1);
    }

    #[test]
    fn full_deck_never_resurfaces() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        let a = answer(&h.engine);
        h.engine.submit_answer(a + 1);
        for _ in 0..8 {
            h.clock.advance(INCORRECT_DWELL);
            h.engine.tick();
            let a = answer(&h.engine);
            h.engine.submit_answer(a);
        }
        assert_eq!(h.engine.session().deck.len(), 100);
        assert_eq!(h.engine.session().resurfacing.len(), 1);
        assert!(h.engine.session().resurfacing.has_due());
    }

    #[test]
    fn short_deck_inserts_missed_problem_at_cursor() {
        let mut h = harness(20);
        h.engine.start(display_mult());
        let missed = h.engine.current_problem().unwrap().clone();
        h.engine.submit_answer(missed.answer() + 1);
        let delay = h.engine.session().resurfacing.entries()[0].questions_until_due;
        h.clock.advance(INCORRECT_DWELL);
        h.engine.tick();

        // The dwell's advance counted once; the next advance after these is due.
        for _ in 1..delay - 1 {
            let a = answer(&h.engine);
            h.engine.submit_answer(a);
        }
        assert_eq!(h.engine.session().deck.len(), 20);
        let cursor_before = h.engine.session().cursor;
        let answered = h.engine.current_problem().unwrap().clone();
        h.engine.submit_answer(answered.answer());

        let session = h.engine.session();
        assert_eq!(session.deck.len(), 21);
        assert_eq!(session.deck.get(cursor_before).unwrap().id, missed.id);
        assert_eq!(session.cursor, cursor_before + 1);
        // The card just answered shifted right and is now current.
        assert_eq!(h.engine.current_problem().unwrap().id, answered.id);
        assert!(session.resurfacing.is_empty());
    }

    #[test]
    fn generate_answer_options_is_empty_in_voice_mode() {
        let mut h = harness(10);
        h.engine
            .start(GameMode::new(ProblemSet::Addition, InputMethod::Voice));
        assert!(h.engine.generate_answer_options().is_empty());
        assert!(h.engine.session().answer_options.is_empty());

        h.engine.start(display_mult());
        let options = h.engine.generate_answer_options();
        assert_eq!(options.len(), 4);
        assert_eq!(h.engine.session().answer_options, options);
    }

    #[test]
    fn completes_with_grade_and_high_score() {
        let mut h = harness(10);
        h.engine.start(display_mult());
        let a = answer(&h.engine);
        h.engine.submit_answer(a + 1);
        h.clock.advance(INCORRECT_DWELL);
        h.engine.tick();
        // The missed problem is inserted once, so the deck grows to 11.
        while !h.engine.is_completed() {
            let a = answer(&h.engine);
            h.engine.submit_answer(a);
        }

        let result = h.engine.result().unwrap().clone();
        assert_eq!(result.questions_answered, 11);
        assert_eq!(result.correct_count, 10);
        assert!((result.accuracy_percent - 1000.0 / 11.0).abs() < 1e-9);
        assert_eq!(result.grade, grading::Grade::A);
        assert!(result.passed);
        assert_eq!(result.final_balance, 5_000);
        assert_eq!(result.max_streak, 10);
        assert_eq!(result.elapsed_ms, 3_000);
        assert_eq!(h.effects.milestone.load(Ordering::Relaxed), 1);
        assert!(h.effects.lightning.load(Ordering::Relaxed) > 0);
        assert_eq!(h.effects.high_score.load(Ordering::Relaxed), 1);
        assert_eq!(h.store.get_int("balance.high"), Some(5_000));
        assert_eq!(h.store.get_int("earnings.last_game"), Some(5_000));
        assert!(h.engine.current_problem().is_none());
        assert_eq!(h.engine.submit_answer(1), AnswerOutcome::Ignored);
    }

    #[test]
    fn lower_balance_is_not_a_high_score() {
        let h = harness(1);
        h.store.set("balance.high", StoredValue::Int(10_000)).unwrap();
        let mut engine = GameEngine::new(
            EngineConfig {
                deck_size: 1,
                seed: Some(1),
                ..Default::default()
            },
            h.clock.clone(),
            h.store.clone(),
            h.effects.clone(),
        )
        .unwrap();
        engine.start(display_mult());
        let a = answer(&engine);
        engine.submit_answer(a);
        assert!(engine.is_completed());
        assert_eq!(h.effects.high_score.load(Ordering::Relaxed), 0);
        assert_eq!(h.store.get_int("balance.high"), Some(10_000));
    }

    #[test]
    fn reset_abandons_without_recording() {
        let mut h = harness(100);
        h.engine.start(display_mult());
        let a = answer(&h.engine);
        h.engine.submit_answer(a);
        h.engine.reset();
        assert_eq!(h.engine.phase(), Phase::Idle);
        assert!(h.engine.result().is_none());
        assert_eq!(h.engine.session().cursor, 0);
        assert_eq!(h.store.get_int("earnings.last_game"), None);
        h.engine.tick();
        assert_eq!(h.engine.phase(), Phase::Idle);
    }

    #[test]
    fn lifetime_carries_across_sessions() {
        let mut h = harness(2);
        h.engine.start(display_mult());
        for _ in 0..2 {
            let a = answer(&h.engine);
            h.engine.submit_answer(a);
        }
        assert_eq!(h.engine.profile().lifetime_earned, 1_000);

        h.engine.start(display_mult());
        assert_eq!(h.engine.session().wallet.balance, 0);
        assert_eq!(h.engine.session().wallet.lifetime, 1_000);
        assert_eq!(h.store.get_int("balance"), Some(0));
    }

    #[test]
    fn avatar_creation_persists() {
        let mut h = harness(1);
        let avatar = h.engine.create_avatar("  Ada ", CharacterKind::Owl).clone();
        assert_eq!(avatar.display_name, "Ada");
        assert_eq!(h.store.get_text("avatar.name").as_deref(), Some("Ada"));
        assert_eq!(h.store.get_text("avatar.kind").as_deref(), Some("owl"));
        assert_eq!(h.engine.profile().avatar, avatar);
    }

    #[test]
    fn empty_deck_completes_immediately() {
        let mut h = harness(1);
        h.engine.start_with_deck(display_mult(), Deck::default());
        assert!(h.engine.is_completed());
        let result = h.engine.result().unwrap();
        assert_eq!(result.accuracy_percent, 0.0);
        assert_eq!(result.grade, grading::Grade::F);
    }

    #[test]
    fn progress_and_remaining() {
        let mut h = harness(4);
        h.engine.start(display_mult());
        assert_eq!(h.engine.progress(), 0.0);
        let a = answer(&h.engine);
        h.engine.submit_answer(a);
        assert!((h.engine.progress() - 0.25).abs() < 1e-9);
        assert_eq!(h.engine.cards_remaining(), 3);
        assert!((h.engine.current_accuracy() - 100.0).abs() < 1e-9);
    }
}
