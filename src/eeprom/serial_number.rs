use crate::AResult;

use super::Storage;

/// Marks the EEPROM as programmed; stored big-endian in bytes 0-1.
pub const EEPROM_MAGIC: u16 = 0x4a1e;

/// Size of the serial number field, including its NUL terminator.
pub const SERIAL_NUMBER_SIZE_BYTES: usize = 30;

const SERIAL_NUMBER_OFFSET: usize = 2;

/// Check the magic bytes. A factory-fresh (or half-written, see
/// [`write_serial_number`]) EEPROM reads as not programmed.
pub fn is_programmed<S>(storage: &mut S) -> AResult<bool>
where
	S: Storage + ?Sized,
{
	Ok(storage.read_byte(0)? == (EEPROM_MAGIC >> 8) as u8
		&& storage.read_byte(1)? == (EEPROM_MAGIC & 0xff) as u8)
}

/// Read the board serial number, or `None` if the EEPROM isn't programmed.
pub fn read_serial_number<S>(storage: &mut S) -> AResult<Option<String>>
where
	S: Storage + ?Sized,
{
	if !is_programmed(storage)? {
		debug!("EEPROM not programmed, no serial number");
		return Ok(None);
	}

	let mut raw = Vec::new();
	for i in 0..SERIAL_NUMBER_SIZE_BYTES - 1 {
		let byte = storage.read_byte(SERIAL_NUMBER_OFFSET + i)?;
		if byte == 0 {
			break;
		}
		raw.push(byte);
	}

	let serial = with_context!("EEPROM serial number is not valid utf-8",
		Ok(String::from_utf8(raw)?)
	)?;
	Ok(Some(serial))
}

/// Program the board serial number.
///
/// The magic bytes are cleared before the serial number is written and
/// restored only afterwards, so an interrupted write leaves the EEPROM
/// flagged as not programmed instead of holding a truncated serial number.
pub fn write_serial_number<S>(storage: &mut S, serial: &str) -> AResult<()>
where
	S: Storage + ?Sized,
{
	ensure!(serial.len() < SERIAL_NUMBER_SIZE_BYTES,
		"serial number too long: {} bytes (at most {})", serial.len(), SERIAL_NUMBER_SIZE_BYTES - 1
	);
	ensure!(!serial.as_bytes().contains(&0), "serial number must not contain NUL bytes");

	storage.write_byte(0, 0)?;
	storage.write_byte(1, 0)?;

	let bytes = serial.as_bytes();
	for i in 0..SERIAL_NUMBER_SIZE_BYTES {
		let byte = if i < bytes.len() { bytes[i] } else { 0 };
		storage.write_byte(SERIAL_NUMBER_OFFSET + i, byte)?;
	}

	storage.write_byte(0, (EEPROM_MAGIC >> 8) as u8)?;
	storage.write_byte(1, (EEPROM_MAGIC & 0xff) as u8)?;

	Ok(())
}

#[cfg(test)]
mod test {
	use super::{
		SERIAL_NUMBER_SIZE_BYTES,
		is_programmed,
		read_serial_number,
		write_serial_number,
	};

	use crate::AResult;
	use crate::eeprom::{
		MemoryStorage,
		Storage,
	};

	/// Fails every write after the first `writes_left`, to cut a programming
	/// sequence short at an arbitrary point.
	struct TornStorage {
		inner: MemoryStorage,
		writes_left: usize,
	}

	impl Storage for TornStorage {
		fn read_byte(&mut self, offset: usize) -> AResult<u8> {
			self.inner.read_byte(offset)
		}

		fn write_byte(&mut self, offset: usize, value: u8) -> AResult<()> {
			ensure!(self.writes_left > 0, "write failed (simulated)");
			self.writes_left -= 1;
			self.inner.write_byte(offset, value)
		}
	}

	#[test]
	fn fresh_eeprom_is_not_programmed() {
		let mut storage = MemoryStorage::new();
		assert!(!is_programmed(&mut storage).unwrap());
		assert_eq!(read_serial_number(&mut storage).unwrap(), None);
	}

	#[test]
	fn write_then_read_round_trip() {
		let mut storage = MemoryStorage::new();
		write_serial_number(&mut storage, "KB-000123").unwrap();
		assert!(is_programmed(&mut storage).unwrap());
		assert_eq!(read_serial_number(&mut storage).unwrap().as_deref(), Some("KB-000123"));
	}

	#[test]
	fn reprogramming_replaces_the_serial_number() {
		let mut storage = MemoryStorage::new();
		write_serial_number(&mut storage, "KB-000123-LONGER").unwrap();
		write_serial_number(&mut storage, "KB-9").unwrap();
		// the shorter serial must not expose a tail of the longer one
		assert_eq!(read_serial_number(&mut storage).unwrap().as_deref(), Some("KB-9"));
	}

	#[test]
	fn longest_serial_number_fits() {
		let serial = "x".repeat(SERIAL_NUMBER_SIZE_BYTES - 1);
		let mut storage = MemoryStorage::new();
		write_serial_number(&mut storage, &serial).unwrap();
		assert_eq!(read_serial_number(&mut storage).unwrap().as_deref(), Some(serial.as_str()));
	}

	#[test]
	fn oversized_serial_number_is_rejected_untouched() {
		let serial = "x".repeat(SERIAL_NUMBER_SIZE_BYTES);
		let mut storage = MemoryStorage::new();
		write_serial_number(&mut storage, "KB-000123").unwrap();
		assert!(write_serial_number(&mut storage, &serial).is_err());
		// rejected before any byte was written
		assert_eq!(read_serial_number(&mut storage).unwrap().as_deref(), Some("KB-000123"));
	}

	#[test]
	fn embedded_nul_is_rejected() {
		let mut storage = MemoryStorage::new();
		assert!(write_serial_number(&mut storage, "KB\0123").is_err());
		assert!(!is_programmed(&mut storage).unwrap());
	}

	fn programmed_storage() -> MemoryStorage {
		let mut storage = MemoryStorage::new();
		write_serial_number(&mut storage, "KB-000123").unwrap();
		storage
	}

	#[test]
	fn failure_before_the_first_write_keeps_the_old_serial_number() {
		let mut torn = TornStorage {
			inner: programmed_storage(),
			writes_left: 0,
		};
		assert!(write_serial_number(&mut torn, "KB-999999").is_err());
		assert_eq!(read_serial_number(&mut torn).unwrap().as_deref(), Some("KB-000123"));
	}

	#[test]
	fn torn_write_leaves_eeprom_not_programmed() {
		// fail at every point after the magic clear began: magic clear (2
		// writes), serial field (30 writes), magic restore (2 writes; only
		// the full 34 succeed)
		for writes_left in 1..2 + SERIAL_NUMBER_SIZE_BYTES + 2 {
			let mut torn = TornStorage {
				inner: programmed_storage(),
				writes_left,
			};
			assert!(write_serial_number(&mut torn, "KB-999999").is_err(), "should fail with {} writes", writes_left);
			assert!(!is_programmed(&mut torn).unwrap(), "torn write after {} writes must invalidate the EEPROM", writes_left);
		}
	}
}
