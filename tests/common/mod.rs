//! Simulated controller board shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use ashdome::error::{ProtocolError, TransportError};
use ashdome::motion::InertiaTable;
use ashdome::protocol::{BoardStatus, Command, DigitalInputs, Input, Output, PositionWord};
use ashdome::{Degrees, Dome, DomeConfig, DomeEvent, Error, Result, Transport};
use embedded_hal_mock::eh1::delay::NoopDelay;

/// Encoder steps per encoder-shaft turn (default geometry).
pub const STEPS_PER_TURN: i64 = 4096;
/// Encoder steps per dome circle (default geometry).
pub const COUNTS_PER_CIRCLE: i64 = 4096 * 75;
/// Encoder steps per rotation command step.
pub const COUNTS_PER_STEP: i64 = 75;

/// Shared handle for inspecting and steering the board.
pub type Board = Rc<RefCell<BoardState>>;

/// Everything the simulated board knows.
#[derive(Debug)]
pub struct BoardState {
    /// Answer the liveness probe.
    pub present: bool,
    /// Encoder count, unwrapped.
    pub count: i64,
    /// Accumulated rotation counter; clockwise counts down.
    pub rotation: i32,
    pub inputs: DigitalInputs,
    /// Asserted output channels.
    pub outputs: Vec<u8>,
    /// Status polls that report MOVING after each motion.
    pub move_ticks: u32,
    /// Status polls left before the current motion stops.
    pub moving_for: u32,
    /// Encoder count the home search stops at.
    pub home_landing: i64,
    /// Movement produced per commanded step count. Empty moves exactly.
    pub coast: Vec<u32>,
    /// Input block reads before a driven shutter reaches its limit.
    pub shutter_travel: u32,
    /// Limit the driven shutter will reach, and reads left until then.
    pub pending_limit: Option<(Input, u32)>,
    /// Writes to fail with a broken pipe.
    pub fail_writes: u32,
    /// Reject the next acknowledgement of this command.
    pub reject: Option<(Command, ProtocolError)>,
    /// Flip a checksum bit in position words.
    pub corrupt_position: bool,
    /// Accepted frames in order.
    pub frames: Vec<(Command, Vec<u8>)>,
    pub reconnects: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            present: true,
            count: 0,
            rotation: 0,
            inputs: DigitalInputs::default(),
            outputs: Vec::new(),
            move_ticks: 1,
            moving_for: 0,
            home_landing: 0,
            coast: Vec::new(),
            shutter_travel: 1,
            pending_limit: None,
            fail_writes: 0,
            reject: None,
            corrupt_position: false,
            frames: Vec::new(),
            reconnects: 0,
        }
    }
}

impl BoardState {
    /// Board with one input asserted.
    pub fn with_input(input: Input) -> Self {
        let mut state = Self::default();
        state.inputs.set(input, true);
        state
    }

    /// Encoder count closest to `azimuth` with home at 0.
    pub fn count_for(azimuth: f64) -> i64 {
        (azimuth / 360.0 * COUNTS_PER_CIRCLE as f64).round() as i64
    }

    /// Number of accepted frames for `command`.
    pub fn count_of(&self, command: Command) -> usize {
        self.frames.iter().filter(|(c, _)| *c == command).count()
    }

    /// Payloads of accepted frames for `command`.
    pub fn payloads_of(&self, command: Command) -> Vec<Vec<u8>> {
        self.frames
            .iter()
            .filter(|(c, _)| *c == command)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Whether an output channel is asserted.
    pub fn output_on(&self, output: Output) -> bool {
        self.outputs.contains(&output.channel())
    }

    fn apply(&mut self, command: Command, payload: &[u8]) {
        match command {
            Command::CwRotation => self.rotate(steps(payload), 1),
            Command::CcwRotation => self.rotate(steps(payload), -1),
            Command::FindHome => {
                self.count = self.home_landing;
                self.moving_for = self.move_ticks;
                self.update_home();
            }
            Command::ResetCounter => {
                self.count = 0;
                self.update_home();
            }
            Command::ResetCounterExt => self.rotation = 0,
            Command::SetDigitalChannel => self.switch(payload[0], true),
            Command::ClearDigitalChannel => self.switch(payload[0], false),
            _ => {}
        }
    }

    fn rotate(&mut self, commanded: u32, sign: i64) {
        let moved = self
            .coast
            .get(commanded as usize)
            .copied()
            .unwrap_or(commanded);
        self.count += sign * i64::from(moved) * COUNTS_PER_STEP;
        self.rotation -= (sign as i32) * moved as i32;
        self.moving_for = self.move_ticks;
        self.update_home();
    }

    fn update_home(&mut self) {
        let at_home = self.count.rem_euclid(COUNTS_PER_CIRCLE) == 0;
        self.inputs.set(Input::Home, at_home);
    }

    fn switch(&mut self, channel: u8, on: bool) {
        self.outputs.retain(|&c| c != channel);
        if !on {
            return;
        }
        self.outputs.push(channel);

        if channel == Output::Open1.channel() {
            self.inputs.set(Input::Closed1, false);
            self.pending_limit = Some((Input::Open1, self.shutter_travel));
        } else if channel == Output::Close1.channel() {
            self.inputs.set(Input::Open1, false);
            self.pending_limit = Some((Input::Closed1, self.shutter_travel));
        }
    }

    fn advance_shutter(&mut self) {
        match self.pending_limit {
            Some((limit, 0)) => {
                self.inputs.set(limit, true);
                self.pending_limit = None;
            }
            Some((limit, remaining)) => self.pending_limit = Some((limit, remaining - 1)),
            None => {}
        }
    }

    fn respond(&mut self, command: Command) -> Vec<u8> {
        let count = self.count.rem_euclid(COUNTS_PER_CIRCLE);
        match command {
            Command::GetStatus => {
                let mut status = BoardStatus::empty();
                if self.moving_for > 0 {
                    self.moving_for -= 1;
                    status |= BoardStatus::MOVING;
                }
                status.bits().to_le_bytes().to_vec()
            }
            Command::GetPosition => {
                let mut word = PositionWord::encode((count % STEPS_PER_TURN) as u16).raw();
                if self.corrupt_position {
                    word ^= 1 << 14;
                }
                word.to_le_bytes().to_vec()
            }
            Command::GetTurns => PositionWord::encode((count / STEPS_PER_TURN) as u16)
                .raw()
                .to_le_bytes()
                .to_vec(),
            Command::GetCounterExt => self.rotation.to_le_bytes().to_vec(),
            Command::GetAllDigitalExt => {
                self.advance_shutter();
                self.inputs.bytes().to_vec()
            }
            _ => Vec::new(),
        }
    }
}

fn steps(payload: &[u8]) -> u32 {
    u32::from(u16::from_le_bytes([payload[0], payload[1]]))
}

/// Transport end of the simulated board.
pub struct MockBoard {
    state: Board,
    pending: Option<(Command, Vec<u8>)>,
}

impl MockBoard {
    /// Create a board and a handle to it.
    pub fn new(state: BoardState) -> (Self, Board) {
        let state = Rc::new(RefCell::new(state));
        let board = Self {
            state: Rc::clone(&state),
            pending: None,
        };
        (board, state)
    }
}

impl Transport for MockBoard {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn write(&mut self, command: Command) -> Result<()> {
        self.write_buf(command, &[])
    }

    fn write_buf(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        let mut board = self.state.borrow_mut();
        if board.fail_writes > 0 {
            board.fail_writes -= 1;
            return Err(Error::Transport(TransportError::WriteFailed(
                io::ErrorKind::BrokenPipe,
            )));
        }
        board.frames.push((command, payload.to_vec()));
        self.pending = Some((command, payload.to_vec()));
        Ok(())
    }

    fn read(&mut self, command: Command) -> Result<()> {
        let mut board = self.state.borrow_mut();
        let Some((written, payload)) = self.pending.take() else {
            return Err(Error::Transport(TransportError::Timeout));
        };
        if let Some((rejected, error)) = board.reject {
            if rejected == command {
                board.reject = None;
                return Err(Error::Protocol(error));
            }
        }
        board.apply(written, &payload);
        Ok(())
    }

    fn read_buf(&mut self, command: Command, buf: &mut [u8]) -> Result<()> {
        self.pending = None;
        let reply = self.state.borrow_mut().respond(command);
        buf.fill(0);
        for (dst, src) in buf.iter_mut().zip(reply) {
            *dst = src;
        }
        Ok(())
    }

    fn detect(&mut self) -> bool {
        self.state.borrow().present
    }

    fn reconnect(&mut self) -> Result<()> {
        self.pending = None;
        self.state.borrow_mut().reconnects += 1;
        Ok(())
    }
}

/// Default configuration with all pauses and sensor polling disabled.
pub fn test_config() -> DomeConfig {
    let mut config = DomeConfig::default();
    config.retry.reconnect_settle_ms = 0;
    config.retry.reset_settle_ms = 0;
    config.dome.sensor_poll_divider = 0;
    config
}

/// Build a dome and connect it to a fresh simulated board.
pub fn connect(config: DomeConfig, state: BoardState) -> (Dome<NoopDelay>, Board) {
    connect_with_inertia(config, state, InertiaTable::identity())
}

/// As [`connect`], with an explicit inertia table.
pub fn connect_with_inertia(
    config: DomeConfig,
    state: BoardState,
    inertia: InertiaTable,
) -> (Dome<NoopDelay>, Board) {
    let mut dome = Dome::builder()
        .config(config)
        .delay(NoopDelay::new())
        .inertia(inertia)
        .build()
        .unwrap();
    let (transport, board) = MockBoard::new(state);
    dome.connect(Box::new(transport)).unwrap();
    (dome, board)
}

/// Tick until `done` holds. Returns false if `max` ticks were not enough.
pub fn tick_until<F>(dome: &mut Dome<NoopDelay>, max: usize, done: F) -> bool
where
    F: Fn(&Dome<NoopDelay>) -> bool,
{
    for _ in 0..max {
        dome.tick().unwrap();
        if done(dome) {
            return true;
        }
    }
    false
}

/// Take every pending event.
pub fn drain(dome: &mut Dome<NoopDelay>) -> Vec<DomeEvent> {
    std::iter::from_fn(|| dome.poll_event()).collect()
}

/// Absolute angular error between two azimuths.
pub fn angular_error(a: Degrees, b: Degrees) -> f64 {
    ashdome::config::shortest_delta(a, b).value().abs()
}
