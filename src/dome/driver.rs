//! Dome controller.
//!
//! [`Dome`] owns the codec, the position tracker and the three state
//! machines (rotation, shutter, park). The host calls [`Dome::tick`] on its
//! poll cadence and invokes intents between ticks; nothing runs
//! concurrently.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info, warn};

use crate::config::{shortest_delta, Degrees, DomeConfig};
use crate::error::{bounded, DomeError, Error, Result};
use crate::motion::{Direction, InertiaTable, MovePlan};
use crate::protocol::{
    BoardStatus, Command, DigitalInputs, Input, Output, OutputStates, Protocol, RetryPolicy,
    DIGITAL_BLOCK_LEN,
};
use crate::transport::{SimulatedTransport, Transport};

use super::builder::DomeBuilder;
use super::events::{DomeEvent, DomeStatus, EventQueue};
use super::park::{Park, ParkPosition};
use super::position::{PositionTracker, Reading};
use super::sensors::{EnvironmentReadings, SensorSchedule};
use super::shutter::Shutter;
use super::state::{DomeState, MotionCommand, ParkState, Progress, ShutterOperation, ShutterState};

/// Blocking delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Dome controller context.
pub struct Dome<D: DelayNs> {
    /// Device name for logging.
    name: heapless::String<32>,

    /// Codec over the attached transport.
    protocol: Protocol<D>,

    /// Azimuth from the encoder counters.
    tracker: PositionTracker,

    /// Read-only after construction.
    inertia: InertiaTable,

    /// Rotation state machine.
    state: DomeState,

    /// Target azimuth of the current or last move.
    target: Degrees,

    /// Iteratively correct the current move.
    refine: bool,

    /// Last board status word.
    board: BoardStatus,

    /// Last digital input snapshot.
    inputs: DigitalInputs,

    /// Last commanded outputs.
    outputs: OutputStates,

    shutter: Shutter,
    park: Park,

    environment: Option<EnvironmentReadings>,
    schedule: SensorSchedule,

    events: EventQueue,
    connected: bool,

    config: DomeConfig,
}

impl<D: DelayNs> Dome<D> {
    /// Start building a dome.
    pub fn builder() -> DomeBuilder<D> {
        DomeBuilder::new()
    }

    pub(crate) fn new(config: DomeConfig, delay: D, inertia: InertiaTable) -> Self {
        let settings = &config.dome;
        Self {
            name: settings.name.clone(),
            protocol: Protocol::new(delay, RetryPolicy::from_settings(&config.retry)),
            tracker: PositionTracker::new(
                config.encoder,
                settings.home_azimuth,
                settings.discard_corrupt_reads,
            ),
            inertia,
            state: DomeState::Unknown,
            target: Degrees(0.0),
            refine: false,
            board: BoardStatus::empty(),
            inputs: DigitalInputs::default(),
            outputs: OutputStates::default(),
            shutter: Shutter::default(),
            park: Park::new(settings.park_azimuth, settings.park_shutter),
            environment: None,
            schedule: SensorSchedule::new(settings.sensor_poll_divider),
            events: EventQueue::default(),
            connected: false,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Device name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Rotation state.
    #[inline]
    pub fn state(&self) -> DomeState {
        self.state
    }

    /// Current azimuth.
    #[inline]
    pub fn azimuth(&self) -> Degrees {
        self.tracker.azimuth()
    }

    /// Target azimuth of the current or last move.
    #[inline]
    pub fn target(&self) -> Degrees {
        self.target
    }

    /// Shutter state.
    #[inline]
    pub fn shutter_state(&self) -> ShutterState {
        self.shutter.state()
    }

    /// Park state.
    #[inline]
    pub fn park_state(&self) -> ParkState {
        self.park.state()
    }

    /// Park azimuth.
    #[inline]
    pub fn park_azimuth(&self) -> Degrees {
        self.park.azimuth()
    }

    /// Home sensor azimuth.
    #[inline]
    pub fn home_azimuth(&self) -> Degrees {
        self.tracker.home()
    }

    /// Whether park closes and unpark opens the shutter.
    #[inline]
    pub fn park_controls_shutter(&self) -> bool {
        self.park.controls_shutter()
    }

    /// Last digital input snapshot.
    #[inline]
    pub fn inputs(&self) -> &DigitalInputs {
        &self.inputs
    }

    /// Last commanded outputs.
    #[inline]
    pub fn outputs(&self) -> OutputStates {
        self.outputs
    }

    /// Inertia calibration in use.
    #[inline]
    pub fn inertia(&self) -> &InertiaTable {
        &self.inertia
    }

    /// Configuration the dome was built from.
    #[inline]
    pub fn config(&self) -> &DomeConfig {
        &self.config
    }

    /// Whether a transport is connected and detected.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Snapshot for the host.
    pub fn status(&self) -> DomeStatus {
        DomeStatus {
            state: self.state,
            azimuth: self.azimuth(),
            target: self.target,
            home_azimuth: self.tracker.home(),
            park_azimuth: self.park.azimuth(),
            shutter: self.shutter.state(),
            park: self.park.state(),
            board: self.board,
            inputs: self.inputs,
            outputs: self.outputs,
            environment: self.environment,
            corrupt_reads: self.tracker.corrupt_reads(),
            reconnects: self.protocol.reconnect_count(),
        }
    }

    /// Take the oldest pending event.
    pub fn poll_event(&mut self) -> Option<DomeEvent> {
        self.events.pop()
    }

    /// Number of pending events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Attach `transport`, probe the board and take an initial reading.
    ///
    /// # Errors
    ///
    /// Returns [`DomeError::NotDetected`] if the liveness probe fails; the
    /// transport is dropped.
    pub fn connect(&mut self, transport: Box<dyn Transport>) -> Result<()> {
        let kind = transport.name();
        self.protocol.attach(transport);

        if !self.protocol.detect() {
            error!(dome = %self.name, transport = kind, "dome controller not detected");
            self.protocol.detach();
            self.connected = false;
            return Err(Error::Dome(DomeError::NotDetected));
        }

        info!(dome = %self.name, transport = kind, "connected");
        self.connected = true;
        self.refresh();
        self.set_state(DomeState::Ready);
        Ok(())
    }

    /// Connect using the transport selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the serial port cannot be opened or the board is
    /// not detected.
    pub fn connect_from_config(&mut self) -> Result<()> {
        let transport = open_transport(&self.config)?;
        self.connect(transport)
    }

    /// Drop the transport.
    pub fn disconnect(&mut self) {
        if self.protocol.detach().is_some() {
            info!(dome = %self.name, "disconnected");
        }
        self.connected = false;
        self.set_state(DomeState::Unknown);
    }

    // ------------------------------------------------------------------
    // Poll tick
    // ------------------------------------------------------------------

    /// Run one poll cycle.
    ///
    /// Status, position and shutter inputs are refreshed before the state
    /// machine is evaluated. Command failures are logged and queued as
    /// events; they never abort the tick.
    ///
    /// # Errors
    ///
    /// Returns [`DomeError::NotConnected`] before [`Dome::connect`].
    pub fn tick(&mut self) -> Result<()> {
        self.ensure_connected()?;
        self.refresh();

        match self.state {
            DomeState::Homing => self.tick_homing(),
            DomeState::Derotating => self.tick_derotating(),
            DomeState::Calibrating => self.tick_calibrating(),
            DomeState::Moving => self.tick_moving(),
            DomeState::Ready | DomeState::Unknown => {}
        }

        if self.schedule.tick() {
            self.update_environment();
        }
        Ok(())
    }

    fn refresh(&mut self) {
        match self.protocol.read_u16(Command::GetStatus) {
            Ok(bits) => self.board = BoardStatus::from_bits_truncate(bits),
            Err(e) => self.report(Command::GetStatus, e),
        }

        match self.tracker.update(&mut self.protocol) {
            Ok(Reading::Valid) => {}
            Ok(Reading::Suspect | Reading::Discarded) => self.events.push(DomeEvent::ChecksumMismatch),
            Err(e) => self.report(Command::GetPosition, e),
        }

        self.update_shutter();
    }

    fn update_shutter(&mut self) {
        let mut block = [0u8; DIGITAL_BLOCK_LEN];
        let result = self.protocol.read_buffer(Command::GetAllDigitalExt, &mut block);
        if self.checked(Command::GetAllDigitalExt, result).is_err() {
            return;
        }
        self.inputs = DigitalInputs::from_bytes(block);

        let before = self.shutter.state();
        if let Some(arrival) = self.shutter.observe(&self.inputs) {
            let _ = self.write_output(arrival.release, false);
            match arrival.operation {
                ShutterOperation::Open if self.park.is_unparking() => {
                    self.set_park(ParkState::Unparked);
                }
                ShutterOperation::Close
                    if self.park.is_parking() && self.state != DomeState::Moving =>
                {
                    self.set_park(ParkState::Parked);
                }
                _ => {}
            }
        }
        self.note_shutter_change(before);
    }

    fn update_environment(&mut self) {
        match EnvironmentReadings::read(&mut self.protocol) {
            Ok(readings) => {
                debug!(?readings, "environment");
                self.environment = Some(readings);
            }
            Err(e) => warn!(error = %e, "environment sensors unavailable"),
        }
    }

    fn tick_homing(&mut self) {
        if self.board.is_rotating() {
            return;
        }

        let home = self.tracker.home();
        let delta = shortest_delta(self.azimuth(), home);
        self.target = home;

        if self.inputs.is_active(Input::Home) || delta.value().abs() <= self.tolerance() {
            info!(azimuth = self.azimuth().value(), "home sensor found");
            self.finish_homing();
            return;
        }

        debug!(delta = delta.value(), "home overshoot, correcting");
        self.refine = true;
        if let Ok(Progress::Complete) = self.send_move(delta) {
            warn!(
                delta = delta.value(),
                "home correction below inertia, stopping outside tolerance"
            );
            self.finish_homing();
        }
    }

    fn finish_homing(&mut self) {
        for command in [Command::ResetCounter, Command::ResetCounterExt] {
            let result = self.protocol.command(command);
            let _ = self.checked(command, result);
        }
        self.set_state(DomeState::Ready);
    }

    fn tick_derotating(&mut self) {
        if self.board.contains(BoardStatus::MOVING) {
            return;
        }

        let result = self.protocol.read_i32(Command::GetCounterExt);
        let Ok(rotation) = self.checked(Command::GetCounterExt, result) else {
            return;
        };
        info!(rotation, "current rotation");

        if rotation.unsigned_abs() < self.config.dome.derotate_threshold.unsigned_abs() {
            info!("de-rotation complete");
            self.set_state(DomeState::Ready);
            return;
        }

        let plan = MovePlan::for_count(rotation, &self.inertia);
        if plan.is_noop() {
            info!(rotation, "remaining rotation below inertia, de-rotation complete");
            self.set_state(DomeState::Ready);
            return;
        }
        let _ = self.send_plan(plan);
    }

    fn tick_calibrating(&mut self) {
        if self.reset_counters().is_ok() {
            self.set_state(DomeState::Ready);
        }
    }

    fn tick_moving(&mut self) {
        if self.board.contains(BoardStatus::MOVING) {
            return;
        }

        let delta = shortest_delta(self.azimuth(), self.target);
        if !self.refine || delta.value().abs() <= self.tolerance() {
            self.finish_move();
            return;
        }

        debug!(delta = delta.value(), "refining azimuth");
        if let Ok(Progress::Complete) = self.send_move(delta) {
            self.finish_move();
        }
    }

    // ------------------------------------------------------------------
    // Host intents
    // ------------------------------------------------------------------

    /// Move to an absolute azimuth, correcting until within tolerance.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready; returns the codec error if the
    /// rotation command fails.
    pub fn move_abs(&mut self, azimuth: Degrees) -> Result<Progress> {
        validate_azimuth(azimuth)?;
        self.ensure_ready()?;
        info!(azimuth = azimuth.value(), "move to azimuth");
        let delta = shortest_delta(self.azimuth(), azimuth);
        self.start_move(azimuth, delta, true)
    }

    /// Rotate by `delta` degrees once, without correction.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready; returns the codec error if the
    /// rotation command fails.
    pub fn move_rel(&mut self, delta: Degrees) -> Result<Progress> {
        if !delta.value().is_finite() {
            return Err(Error::Dome(DomeError::InvalidAzimuth(delta.value())));
        }
        self.ensure_ready()?;
        info!(delta = delta.value(), "relative move");
        let target = (self.azimuth() + delta).normalized();
        self.start_move(target, delta, false)
    }

    /// Jog with the direction outputs.
    ///
    /// # Errors
    ///
    /// Returns the codec error if an output cannot be switched.
    pub fn move_direction(&mut self, direction: Direction, command: MotionCommand) -> Result<Progress> {
        self.ensure_connected()?;
        info!(?direction, ?command, "jog");

        match command {
            MotionCommand::Start => {
                self.refine = false;
                let (engage, release) = match direction {
                    Direction::Clockwise => (Output::Cw, Output::Ccw),
                    Direction::CounterClockwise => (Output::Ccw, Output::Cw),
                };
                self.write_output(release, false)?;
                self.write_output(engage, true)?;
                Ok(Progress::Busy)
            }
            MotionCommand::Stop => {
                self.write_output(Output::Cw, false)?;
                self.write_output(Output::Ccw, false)?;
                Ok(Progress::Complete)
            }
        }
    }

    /// Start a home sensor search.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready; returns the codec error if the
    /// board refuses.
    pub fn start_homing(&mut self) -> Result<Progress> {
        self.ensure_ready()?;
        info!("finding home sensor");
        let result = self.protocol.command(Command::FindHome);
        self.checked(Command::FindHome, result)?;
        self.set_state(DomeState::Homing);
        Ok(Progress::Busy)
    }

    /// Start unwinding accumulated rotation.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready.
    pub fn start_derotate(&mut self) -> Result<Progress> {
        self.ensure_ready()?;
        info!("de-rotation started");
        self.set_state(DomeState::Derotating);
        Ok(Progress::Busy)
    }

    /// Reset the encoder counters.
    ///
    /// If the board does not acknowledge, the dome stays Calibrating and the
    /// reset is retried on each tick.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready.
    pub fn reset_encoder(&mut self) -> Result<Progress> {
        self.ensure_ready()?;
        info!("encoder reset started");
        self.set_state(DomeState::Calibrating);

        if self.reset_counters().is_ok() {
            self.set_state(DomeState::Ready);
            Ok(Progress::Complete)
        } else {
            Ok(Progress::Busy)
        }
    }

    /// Stop all rotation and return to Ready from any state.
    ///
    /// A park or unpark in progress is cancelled.
    ///
    /// # Errors
    ///
    /// Returns the codec error if the stop command fails; the state is
    /// still forced to Ready.
    pub fn abort(&mut self) -> Result<()> {
        self.ensure_connected()?;
        info!(state = %self.state, "abort");

        let result = self.protocol.command(Command::Stop);
        self.set_state(DomeState::Ready);
        match self.park.state() {
            ParkState::Parking => self.set_park(ParkState::Unparked),
            ParkState::Unparking => self.set_park(ParkState::Parked),
            ParkState::Parked | ParkState::Unparked => {}
        }
        self.checked(Command::Stop, result)
    }

    /// Move to the park azimuth, then close the shutter if enabled.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready; returns the codec error if the
    /// first command fails, leaving the park state unchanged.
    pub fn park(&mut self) -> Result<Progress> {
        self.ensure_ready()?;
        let target = self.park.azimuth();
        info!(azimuth = target.value(), "park");

        let previous = self.park.state();
        self.set_park(ParkState::Parking);

        let delta = shortest_delta(self.azimuth(), target);
        match self.start_move(target, delta, true) {
            Ok(Progress::Busy) => Ok(Progress::Busy),
            Ok(Progress::Complete) if self.park.state() == ParkState::Parked => Ok(Progress::Complete),
            Ok(Progress::Complete) => Ok(Progress::Busy),
            Err(e) => {
                self.set_park(previous);
                Err(e)
            }
        }
    }

    /// Open the shutter if enabled. Rotation is left to the host.
    ///
    /// # Errors
    ///
    /// Rejected unless the dome is Ready; returns the codec error if a
    /// shutter relay cannot be switched, leaving the park state unchanged.
    pub fn unpark(&mut self) -> Result<Progress> {
        self.ensure_ready()?;
        info!("unpark");

        if !self.park.controls_shutter() {
            self.set_park(ParkState::Unparked);
            return Ok(Progress::Complete);
        }

        let previous = self.park.state();
        self.set_park(ParkState::Unparking);
        match self.drive_shutter(ShutterOperation::Open) {
            Ok(Progress::Complete) => {
                self.set_park(ParkState::Unparked);
                Ok(Progress::Complete)
            }
            Ok(Progress::Busy) => Ok(Progress::Busy),
            Err(e) => {
                self.set_park(previous);
                Err(e)
            }
        }
    }

    /// Open or close the shutter.
    ///
    /// Completes immediately when the matching limit sensor is already
    /// active.
    ///
    /// # Errors
    ///
    /// Returns the codec error if a shutter relay cannot be switched.
    pub fn control_shutter(&mut self, operation: ShutterOperation) -> Result<Progress> {
        self.ensure_connected()?;
        info!(?operation, "control shutter");
        self.drive_shutter(operation)
    }

    /// Switch an output channel.
    ///
    /// # Errors
    ///
    /// Returns the codec error if the board refuses.
    pub fn set_output(&mut self, output: Output, on: bool) -> Result<()> {
        self.ensure_connected()?;
        self.write_output(output, on)
    }

    /// Set the azimuth of the home sensor.
    ///
    /// # Errors
    ///
    /// Returns [`DomeError::InvalidAzimuth`] outside `[0, 360)`.
    pub fn set_home_azimuth(&mut self, azimuth: Degrees) -> Result<()> {
        validate_azimuth(azimuth)?;
        info!(azimuth = azimuth.value(), "home azimuth set");
        self.tracker.set_home(azimuth);
        self.config.dome.home_azimuth = azimuth;
        Ok(())
    }

    /// Set the park azimuth to a value or to the current azimuth.
    ///
    /// # Errors
    ///
    /// Returns [`DomeError::InvalidAzimuth`] outside `[0, 360)`.
    pub fn set_park_azimuth(&mut self, position: ParkPosition) -> Result<()> {
        let azimuth = match position {
            ParkPosition::Azimuth(azimuth) => azimuth,
            ParkPosition::Current => self.azimuth(),
        };
        validate_azimuth(azimuth)?;
        self.park.set_azimuth(azimuth);
        self.config.dome.park_azimuth = azimuth;
        Ok(())
    }

    /// Restore the default park azimuth.
    pub fn set_default_park(&mut self) {
        self.park.reset_azimuth();
        self.config.dome.park_azimuth = self.park.azimuth();
    }

    /// Enable or disable shutter handling on park/unpark.
    pub fn set_park_shutter(&mut self, enabled: bool) {
        info!(enabled, "park controls shutter");
        self.park.set_controls_shutter(enabled);
        self.config.dome.park_shutter = enabled;
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn tolerance(&self) -> f64 {
        self.config.dome.tolerance.value()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(Error::Dome(DomeError::NotConnected))
        }
    }

    fn ensure_ready(&self) -> Result<()> {
        self.ensure_connected()?;
        if self.state == DomeState::Ready {
            Ok(())
        } else {
            warn!(state = %self.state, "intent rejected, dome busy");
            Err(Error::Dome(DomeError::Busy(bounded(self.state.name()))))
        }
    }

    fn set_state(&mut self, state: DomeState) {
        if self.state == state {
            return;
        }
        info!(from = %self.state, to = %state, "dome state");
        self.events.push(DomeEvent::StateChanged {
            from: self.state,
            to: state,
        });
        self.state = state;
    }

    fn set_park(&mut self, state: ParkState) {
        if self.park.transition(state) {
            self.events.push(DomeEvent::ParkChanged(state));
        }
    }

    fn note_shutter_change(&mut self, before: ShutterState) {
        let after = self.shutter.state();
        if after != before {
            self.events.push(DomeEvent::ShutterChanged(after));
        }
    }

    /// Queue a failure event for `command` and hand the result back.
    fn checked<T>(&mut self, command: Command, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.report(command, e.clone());
        }
        result
    }

    fn report(&mut self, command: Command, error: Error) {
        self.events.push(DomeEvent::CommandFailed { command, error });
    }

    fn write_output(&mut self, output: Output, on: bool) -> Result<()> {
        let command = if on {
            Command::SetDigitalChannel
        } else {
            Command::ClearDigitalChannel
        };
        debug!(?output, on, "set output");
        let result = self.protocol.write_u8(command, output.channel());
        self.checked(command, result)?;
        self.outputs.set(output, on);
        Ok(())
    }

    fn reset_counters(&mut self) -> Result<()> {
        let result = self.protocol.write_u8(Command::ResetCounter, 0);
        self.checked(Command::ResetCounter, result)?;
        self.protocol.settle(self.config.retry.reset_settle_ms);
        Ok(())
    }

    fn start_move(&mut self, target: Degrees, delta: Degrees, refine: bool) -> Result<Progress> {
        self.target = target;
        self.refine = refine;

        let progress = self.send_move(delta)?;
        match progress {
            Progress::Busy => self.set_state(DomeState::Moving),
            Progress::Complete => self.finish_move(),
        }
        Ok(progress)
    }

    fn send_move(&mut self, delta: Degrees) -> Result<Progress> {
        let plan = MovePlan::for_delta(delta, self.config.encoder.steps_per_revolution, &self.inertia);
        debug!(
            delta = delta.value(),
            direction = ?plan.direction,
            requested = plan.requested.value(),
            steps = plan.steps.value(),
            "move"
        );
        if plan.is_noop() {
            return Ok(Progress::Complete);
        }
        self.send_plan(plan)
    }

    fn send_plan(&mut self, plan: MovePlan) -> Result<Progress> {
        let command = plan.direction.command();
        let result = self.protocol.write_u16(command, plan.steps.to_wire());
        if let Err(e) = &result {
            error!(error = %e, "error moving dome");
        }
        self.checked(command, result)?;
        Ok(Progress::Busy)
    }

    fn finish_move(&mut self) {
        if self.refine {
            self.tracker.settle_on(self.target);
        }
        info!(
            azimuth = self.azimuth().value(),
            target = self.target.value(),
            "dome reached requested azimuth"
        );
        self.set_state(DomeState::Ready);

        if self.park.is_parking() {
            if self.park.controls_shutter() && !self.inputs.is_active(Input::Closed1) {
                if let Err(e) = self.drive_shutter(ShutterOperation::Close) {
                    warn!(error = %e, "park: shutter close failed");
                    self.set_park(ParkState::Unparked);
                }
            } else {
                self.set_park(ParkState::Parked);
            }
        } else if self.park.is_unparking() {
            self.set_park(ParkState::Unparked);
        } else {
            self.events.push(DomeEvent::TargetReached(self.target));
        }
    }

    fn drive_shutter(&mut self, operation: ShutterOperation) -> Result<Progress> {
        let before = self.shutter.state();
        let Some(drive) = self.shutter.request(operation, &self.inputs) else {
            self.note_shutter_change(before);
            return Ok(Progress::Complete);
        };

        let switched = self
            .write_output(drive.release, false)
            .and_then(|()| self.write_output(drive.engage, true));
        if let Err(e) = switched {
            self.shutter.abandon(before);
            return Err(e);
        }

        self.note_shutter_change(before);
        Ok(Progress::Busy)
    }
}

fn validate_azimuth(azimuth: Degrees) -> Result<()> {
    if azimuth.is_azimuth() {
        Ok(())
    } else {
        Err(Error::Dome(DomeError::InvalidAzimuth(azimuth.value())))
    }
}

fn open_transport(config: &DomeConfig) -> Result<Box<dyn Transport>> {
    if config.dome.simulation {
        info!("using simulated transport");
        return Ok(Box::new(SimulatedTransport::new()));
    }
    serial_transport(config)
}

#[cfg(feature = "serial")]
fn serial_transport(config: &DomeConfig) -> Result<Box<dyn Transport>> {
    use crate::transport::{SerialPortConnector, SerialTransport};

    let serial = &config.serial;
    info!(port = %serial.port, baud = serial.baud_rate, "opening serial transport");
    let transport = SerialTransport::open(
        SerialPortConnector::from_settings(serial),
        serial.timeout(),
        serial.detect_timeout(),
    )?;
    Ok(Box::new(transport))
}

#[cfg(not(feature = "serial"))]
fn serial_transport(_config: &DomeConfig) -> Result<Box<dyn Transport>> {
    use crate::error::TransportError;

    Err(Error::Transport(TransportError::ConnectFailed(bounded(
        "serial support not compiled in",
    ))))
}
