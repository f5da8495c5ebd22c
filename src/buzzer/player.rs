use std::thread;
use std::time::{
	Duration,
	Instant,
};

use super::Note;

/// Sleep for at least `duration`; `thread::sleep` may wake early on some
/// platforms, so keep sleeping for the remainder.
pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// Output backend for melody playback, usually a PWM pin driving a piezo.
///
/// `tone` starts a continuous tone and `silence` stops it; both return
/// immediately. The player paces the melody through `delay`.
pub trait Buzzer {
	fn tone(&mut self, frequency: u16);
	fn silence(&mut self);

	fn delay(&mut self, duration: Duration) {
		reliable_sleep(duration);
	}
}

/// Play `notes` until [`Note::END`] (or the end of the slice). Output is
/// silenced before the first note and after the last one, so an aborted
/// previous melody can't leave a tone hanging into this one.
pub fn play_notes<B>(buzzer: &mut B, notes: &[Note])
where
	B: Buzzer + ?Sized,
{
	buzzer.silence();

	for note in notes {
		if *note == Note::END {
			break;
		}

		let frequency = note.frequency();
		if frequency == 0 {
			buzzer.silence();
		} else {
			buzzer.tone(frequency);
		}
		buzzer.delay(note.duration());
	}

	buzzer.silence();
}
