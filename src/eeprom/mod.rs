/// Persistent per-board data in the controller's EEPROM.
///
/// Memory Layout
///
/// BYTES       DESCRIPTION
/// ----------- --------------------------------------------------------
/// 0-1         EEPROM_MAGIC flag (2 bytes); indicates programmed EEPROM.
/// 2-31        Board serial number (NUL-terminated).
/// 32-Max      Reserved.

mod serial_number;
mod storage;

pub use self::serial_number::{
	EEPROM_MAGIC,
	SERIAL_NUMBER_SIZE_BYTES,
	is_programmed,
	read_serial_number,
	write_serial_number,
};

pub use self::storage::{
	EEPROM_SIZE_BYTES,
	MemoryStorage,
	Storage,
};
