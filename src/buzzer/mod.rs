/// Table-driven melody playback for the board's piezo buzzer.
///
/// A melody is a flat sequence of packed [`Note`] words terminated by
/// [`Note::END`]; [`play_notes`] walks it on any [`Buzzer`] backend. Playback
/// is blocking and keeps no state between invocations.

mod note;
mod player;

pub use self::note::{
	Note,
};

pub use self::player::{
	Buzzer,
	play_notes,
	reliable_sleep,
};

/// Chime played once the firmware comes up.
pub const STARTUP_MELODY: [Note; 6] = [
	Note::new(4000, 100),
	Note::silent(50),
	Note::new(4000, 100),
	Note::silent(50),
	Note::new(4800, 200),
	Note::END,
];
