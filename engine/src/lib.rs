pub mod app;
pub mod render;
pub mod surface;

/// Deterministic game rules driven one input at a time.
///
/// `step` mutates the state in place and reports whatever notifications the
/// game wants its host to react to (sound cues, UI flashes, ...).
pub trait GameLogic {
    type State;
    type Input;
    type Event;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &mut Self::State, input: Self::Input) -> Vec<Self::Event>;
}

/// Drives a `GameLogic` without a window: tests, replays, scripted sessions.
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    state: G::State,
    frame: usize,
    events: Vec<(usize, G::Event)>,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let state = game.initial_state();
        Self {
            game,
            state,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut G::State {
        &mut self.state
    }

    /// Every event emitted so far, tagged with the frame that produced it.
    pub fn events(&self) -> &[(usize, G::Event)] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<(usize, G::Event)> {
        std::mem::take(&mut self.events)
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        let emitted = self.game.step(&mut self.state, input);
        self.frame += 1;
        let frame = self.frame;
        self.events.extend(emitted.into_iter().map(|event| (frame, event)));
        frame
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    pub fn reset(&mut self) {
        self.state = self.game.initial_state();
        self.frame = 0;
        self.events.clear();
    }
}
