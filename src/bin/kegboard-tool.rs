#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate kegboard_io;
use kegboard_io::*;

use std::fs;
use std::io;
use std::path::Path;
use std::process::exit;

use kegboard_io::eeprom::Storage;

/// EEPROM image backed by a plain file: loaded whole, written back whole
/// after programming.
struct ImageStorage {
	data: Vec<u8>,
}

impl ImageStorage {
	fn load(path: &Path) -> AResult<ImageStorage> {
		let mut data = match fs::read(path) {
			Ok(data) => data,
			Err(ref e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
			Err(e) => bail!("couldn't read EEPROM image {:?}: {}", path, e),
		};
		// a missing or short image reads as erased
		if data.len() < eeprom::EEPROM_SIZE_BYTES {
			data.resize(eeprom::EEPROM_SIZE_BYTES, 0);
		}
		Ok(ImageStorage { data })
	}

	fn save(&self, path: &Path) -> AResult<()> {
		if let Err(e) = fs::write(path, &self.data) {
			bail!("couldn't write EEPROM image {:?}: {}", path, e);
		}
		Ok(())
	}
}

impl Storage for ImageStorage {
	fn read_byte(&mut self, offset: usize) -> AResult<u8> {
		ensure!(offset < self.data.len(), "EEPROM image read at offset {} out of bounds (size {})", offset, self.data.len());
		Ok(self.data[offset])
	}

	fn write_byte(&mut self, offset: usize, value: u8) -> AResult<()> {
		ensure!(offset < self.data.len(), "EEPROM image write at offset {} out of bounds (size {})", offset, self.data.len());
		self.data[offset] = value;
		Ok(())
	}
}

/// Buzzer backend that logs instead of driving a pin.
struct LogBuzzer;

impl buzzer::Buzzer for LogBuzzer {
	fn tone(&mut self, frequency: u16) {
		info!("buzzer: {} Hz", frequency);
	}

	fn silence(&mut self) {
		info!("buzzer: off");
	}
}

fn run_wiegand(sub_m: &clap::ArgMatches) -> AResult<()> {
	let pattern = match sub_m.value_of("PATTERN") {
		Some(p) => p,
		None => bail!("missing parameter PATTERN"),
	};

	let decoder = wiegand::Wiegand::new();
	for pulse in pattern.chars() {
		match pulse {
			'0' => decoder.handle_data0_pulse(),
			'1' => decoder.handle_data1_pulse(),
			_ => bail!("invalid pulse {:?} in pattern (expected '0' or '1')", pulse),
		}
	}

	let mut buf = [0u8; wiegand::WIEGAND_BUFSIZ];
	let bits = decoder.read(&mut buf);
	if bits > wiegand::WIEGAND_BUFSIZ * 8 {
		warn!("decoder saturated: {} pulses seen, buffer holds only {} bits", bits, wiegand::WIEGAND_BUFSIZ * 8);
	}

	print!("{} bits:", bits);
	for byte in &buf {
		print!(" {:02x}", byte);
	}
	println!("");

	decoder.reset();

	Ok(())
}

fn run_serialno(sub_m: &clap::ArgMatches) -> AResult<()> {
	let path = match sub_m.value_of_os("image") {
		Some(p) => Path::new(p),
		None => bail!("missing parameter image"),
	};

	let mut storage = ImageStorage::load(path)?;

	if let Some(serial) = sub_m.value_of("set") {
		eeprom::write_serial_number(&mut storage, serial)?;
		storage.save(path)?;
		info!("programmed serial number {:?} into {:?}", serial, path);
	} else {
		match eeprom::read_serial_number(&mut storage)? {
			Some(serial) => println!("{}", serial),
			None => {
				eprintln!("EEPROM image {:?} is not programmed", path);
				exit(10);
			}
		}
	}

	Ok(())
}

fn run_melody() -> AResult<()> {
	buzzer::play_notes(&mut LogBuzzer, &buzzer::STARTUP_MELODY);

	Ok(())
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@subcommand wiegand =>
			(about: "feed a pulse pattern into the Wiegand decoder and show the capture")
			(@arg PATTERN: +required "pulse pattern as a string of 0s and 1s, e.g. 10110000")
		)
		(@subcommand serialno =>
			(about: "read or program the serial number in an EEPROM image file")
			(@arg image: -i --image +takes_value +required "path to the EEPROM image file")
			(@arg set: --set +takes_value "program this serial number (the image file is created if missing)")
		)
		(@subcommand melody =>
			(about: "play the startup melody on the logging buzzer")
		)
	).get_matches();

	match matches.subcommand() {
		("wiegand", Some(sub_m)) => {
			run_wiegand(sub_m)
		}
		("serialno", Some(sub_m)) => {
			run_serialno(sub_m)
		}
		("melody", _) => {
			run_melody()
		}
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
