use crate::AResult;

/// Total EEPROM size covered by the layout (magic plus serial number field).
pub const EEPROM_SIZE_BYTES: usize = 32;

/// Byte-addressed backing store for the EEPROM layout.
///
/// Failures here are transport errors (a flaky bus, an unwritable image
/// file); "not programmed yet" is a normal state and reported by the layout
/// routines, not by the store.
pub trait Storage {
	fn read_byte(&mut self, offset: usize) -> AResult<u8>;
	fn write_byte(&mut self, offset: usize, value: u8) -> AResult<()>;
}

/// In-memory store with the fixed EEPROM size, starting out erased (all
/// zero, i.e. not programmed).
pub struct MemoryStorage {
	data: [u8; EEPROM_SIZE_BYTES],
}

impl MemoryStorage {
	pub fn new() -> MemoryStorage {
		MemoryStorage {
			data: [0u8; EEPROM_SIZE_BYTES],
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> MemoryStorage {
		MemoryStorage::new()
	}
}

impl Storage for MemoryStorage {
	fn read_byte(&mut self, offset: usize) -> AResult<u8> {
		ensure!(offset < EEPROM_SIZE_BYTES, "EEPROM read at offset {} out of bounds (size {})", offset, EEPROM_SIZE_BYTES);
		Ok(self.data[offset])
	}

	fn write_byte(&mut self, offset: usize, value: u8) -> AResult<()> {
		ensure!(offset < EEPROM_SIZE_BYTES, "EEPROM write at offset {} out of bounds (size {})", offset, EEPROM_SIZE_BYTES);
		self.data[offset] = value;
		Ok(())
	}
}
