/// Decoder for the Wiegand card-reader wire protocol.
///
/// A Wiegand reader has two open-collector data lines, DATA0 and DATA1. For
/// every bit of the credential the reader pulls exactly one of them low: a
/// pulse on DATA0 is a "0" bit, a pulse on DATA1 is a "1" bit. There is no
/// clock line; framing (deciding when a card read is complete, usually by
/// watching for an inter-credential silence gap) is up to the caller.
///
/// The decoder only accumulates: each pulse handler records one bit at the
/// current bit position. Bit `N` of the credential lands in byte `N / 8` of
/// the buffer, at bit `N % 8` (LSB first within each byte). Zero bits are
/// never written; they are implicit in the zero-initialized buffer, which is
/// why the buffer is only meaningful together with the bit count.

use std::sync::{
	Mutex,
	MutexGuard,
};

/// Buffer capacity in bytes; at most `WIEGAND_BUFSIZ * 8` credential bits.
pub const WIEGAND_BUFSIZ: usize = 5;

struct State {
	bitpos: usize,
	buf: [u8; WIEGAND_BUFSIZ],
}

/// Bit accumulator shared between the pulse handlers (interrupt dispatch
/// context) and the application (`read`/`reset`).
///
/// The original board relied on single-core non-preemption to keep the two
/// contexts from racing; here the state is behind a mutex so the contract
/// holds with real threads.
pub struct Wiegand {
	state: Mutex<State>,
}

impl Wiegand {
	pub fn new() -> Wiegand {
		Wiegand {
			state: Mutex::new(State {
				bitpos: 0,
				buf: [0u8; WIEGAND_BUFSIZ],
			}),
		}
	}

	// All operations are total: the state is plain data and every critical
	// section is panic-free, so a poisoned lock is taken over instead of
	// propagated.
	fn lock(&self) -> MutexGuard<State> {
		match self.state.lock() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		}
	}

	/// A pulse arrived on DATA0: record a "0" bit.
	///
	/// Only advances the bit position; the buffer bit is already zero. Note
	/// the position is not capped, so it keeps advancing past capacity while
	/// the buffer stays saturated.
	pub fn handle_data0_pulse(&self) {
		let mut state = self.lock();
		state.bitpos += 1;
	}

	/// A pulse arrived on DATA1: record a "1" bit.
	///
	/// Once the buffer is full the pulse is dropped and the bit position is
	/// left untouched; capture stalls rather than wrapping.
	pub fn handle_data1_pulse(&self) {
		let mut state = self.lock();
		let index = state.bitpos / 8;
		if index >= WIEGAND_BUFSIZ {
			return;
		}
		let offset = state.bitpos % 8;
		state.buf[index] |= 1u8 << offset;
		state.bitpos += 1;
	}

	/// Copy the accumulated buffer into `data` (all `WIEGAND_BUFSIZ` bytes,
	/// `data` must hold at least that much) and return the number of bits
	/// captured since the last reset. Only the leading `bitcount` bits of the
	/// copy are meaningful.
	pub fn read(&self, data: &mut [u8]) -> usize {
		let state = self.lock();
		data[..WIEGAND_BUFSIZ].copy_from_slice(&state.buf);
		state.bitpos
	}

	/// Discard the current capture; afterwards the accumulator is
	/// indistinguishable from a freshly created one.
	pub fn reset(&self) {
		let mut state = self.lock();
		state.bitpos = 0;
		state.buf = [0u8; WIEGAND_BUFSIZ];
	}
}

impl Default for Wiegand {
	fn default() -> Wiegand {
		Wiegand::new()
	}
}
