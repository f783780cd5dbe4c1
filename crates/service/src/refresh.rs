//! Countdown that drives automatic re-quoting
//!
//! The scheduler itself is plain state; the engine owns the timer task that
//! feeds it ticks and reacts to [`TickOutcome::Expired`].

use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Periodic tick source feeding the countdown
pub trait TickSource: Send + Sync {
	/// Stream yielding once per `period`, starting one period from now
	fn ticks(&self, period: Duration) -> BoxStream<'static, ()>;
}

/// Ticks from the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct IntervalTicks;

impl TickSource for IntervalTicks {
	fn ticks(&self, period: Duration) -> BoxStream<'static, ()> {
		let mut interval = interval_at(Instant::now() + period, period);
		interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

		stream::unfold(interval, |mut interval| async move {
			interval.tick().await;
			Some(((), interval))
		})
		.boxed()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshState {
	/// No live quote set, timer stopped
	Idle,
	/// Quote set published, window running down
	Counting,
	/// Window reached zero; a refresh cycle is pending or running
	Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
	Counting { time_left: f64 },
	Expired,
	/// Tick from a timer that was stopped or replaced
	Inactive,
}

#[derive(Debug)]
pub struct RefreshScheduler {
	tick: Duration,
	window_ticks: u64,
	remaining_ticks: u64,
	state: RefreshState,
	epoch: u64,
	halted: bool,
	timer: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
	pub fn new(window: Duration, tick: Duration) -> Self {
		let tick = tick.max(Duration::from_millis(1));
		let window_ticks = (window.as_nanos().div_ceil(tick.as_nanos()) as u64).max(1);

		Self {
			tick,
			window_ticks,
			remaining_ticks: 0,
			state: RefreshState::Idle,
			epoch: 0,
			halted: false,
			timer: None,
		}
	}

	pub fn state(&self) -> RefreshState {
		self.state
	}

	pub fn tick_interval(&self) -> Duration {
		self.tick
	}

	/// Identifies the timer armed by the latest [`arm`](Self::arm)
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Seconds left before the quotes expire
	pub fn time_left(&self) -> f64 {
		let nanos = self.tick.as_nanos().saturating_mul(u128::from(self.remaining_ticks));
		Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)).as_secs_f64()
	}

	pub fn is_active(&self) -> bool {
		self.remaining_ticks > 0
	}

	/// Window ran out without [`halt`](Self::halt) freezing it
	pub fn is_stale(&self) -> bool {
		self.remaining_ticks == 0 && !self.halted
	}

	/// Start a new epoch; the timer task for it must be passed to [`arm`](Self::arm)
	pub fn next_epoch(&mut self) -> u64 {
		self.epoch += 1;
		self.epoch
	}

	/// Seed a full window and take ownership of the timer driving it
	pub fn arm(&mut self, timer: JoinHandle<()>) {
		self.abort_timer();
		self.remaining_ticks = self.window_ticks;
		self.state = RefreshState::Counting;
		self.halted = false;
		self.timer = Some(timer);
		debug!("Quote refresh window armed: {:.1}s", self.time_left());
	}

	/// Stop the timer and return to idle
	pub fn stop(&mut self) {
		self.abort_timer();
		self.epoch += 1;
		self.remaining_ticks = 0;
		self.state = RefreshState::Idle;
		self.halted = false;
	}

	/// Stop counting but keep the current quotes executable
	pub fn halt(&mut self) {
		self.stop();
		self.halted = true;
	}

	/// Keep the expired state while its refresh cycle runs
	pub fn begin_refresh(&mut self) {
		self.abort_timer();
		self.remaining_ticks = 0;
		self.state = RefreshState::Expired;
	}

	/// Advance the countdown for a tick issued by the timer of `epoch`
	pub fn on_tick(&mut self, epoch: u64) -> TickOutcome {
		if epoch != self.epoch || self.state != RefreshState::Counting {
			return TickOutcome::Inactive;
		}

		self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
		if self.remaining_ticks > 0 {
			return TickOutcome::Counting {
				time_left: self.time_left(),
			};
		}

		// the expiring tick runs on the timer task itself, so detach instead of aborting
		self.timer.take();
		self.state = RefreshState::Expired;
		debug!("Quote refresh window expired");
		TickOutcome::Expired
	}

	fn abort_timer(&mut self) {
		if let Some(timer) = self.timer.take() {
			timer.abort();
		}
	}
}

impl Drop for RefreshScheduler {
	fn drop(&mut self) {
		self.abort_timer();
	}
}
