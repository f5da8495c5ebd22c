use std::fmt;
use std::time::Duration;

/// One melody step, packed into 32 bits: frequency in Hz in the high half,
/// duration in milliseconds in the low half. A zero frequency means rest for
/// the duration; the all-zero word is the end-of-melody sentinel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note(pub u32);

impl Note {
	/// End-of-melody sentinel.
	pub const END: Note = Note(0);

	pub const fn new(frequency: u16, duration_ms: u16) -> Note {
		Note((frequency as u32) << 16 | duration_ms as u32)
	}

	/// Rest for `duration_ms` (frequency zero).
	pub const fn silent(duration_ms: u16) -> Note {
		Note::new(0, duration_ms)
	}

	pub fn frequency(self) -> u16 {
		(self.0 >> 16) as u16
	}

	pub fn duration(self) -> Duration {
		Duration::from_millis((self.0 & 0xffff) as u64)
	}
}

impl fmt::Debug for Note {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if *self == Note::END {
			return f.write_str("Note::END");
		}
		f.debug_struct("Note")
			.field("frequency", &self.frequency())
			.field("duration", &self.duration())
			.finish()
	}
}
