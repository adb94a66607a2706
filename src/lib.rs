//! QMC5883L magnetometer driver with a self-calibrating compass heading.
//!
//! The bus and delay are borrowed for each call, the driver only keeps the
//! device address, the CONFIG value it writes at init and the running
//! calibration.
//!
//! ```ignore
//! let mut compass = Qmc5883l::new();
//! compass.init(&mut i2c, &mut delay)?;
//! loop {
//! 	match compass.read_heading(&mut i2c) {
//! 		Ok(deg) => info!("{} {}", deg, direction_label(deg)),
//! 		Err(e) if e.is_transient() => {} // keep rotating the sensor
//! 		Err(_) => break,
//! 	}
//! }
//! ```
#![cfg_attr(not(test), no_std)]

pub mod direction;
pub mod heading;
pub mod registers;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};
use log::debug;

pub use direction::{direction_label, Direction};
pub use heading::{bearing, Calibration, HeadingEngine, RawSample};
pub use registers::{
	Config, Mode, Oversampling, OutputRate, Range, Register, Status, DEFAULT_ADDRESS,
};

use registers::{CONFIG2_NORMAL, RESET_PERIOD};

const RESET_SETTLE_MS: u8 = 10;

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
	/// Register address write or data read failed on the bus
	I2c(E),
	/// Fewer than two distinct values seen on X or Y so far
	NotCalibrated,
	/// CONFIG readback holds a reserved encoding
	InvalidConfig(u8),
}

impl<E> Error<E> {
	/// Warm-up condition, polling again will eventually succeed.
	pub fn is_transient(&self) -> bool {
		matches!(self, Error::NotCalibrated)
	}
}

#[derive(Clone, Debug)]
pub struct Qmc5883l {
	address: u8,
	config: Config,
	engine: HeadingEngine,
}

impl Default for Qmc5883l {
	fn default() -> Self {
		Self::new()
	}
}

impl Qmc5883l {
	pub fn new() -> Self {
		Qmc5883l {
			address: DEFAULT_ADDRESS,
			config: Config::default(),
			engine: HeadingEngine::new(),
		}
	}

	pub fn with_config(config: Config) -> Self {
		Qmc5883l { config, ..Self::new() }
	}

	/// 7-bit address, for boards that remap the part
	pub fn with_address(mut self, address: u8) -> Self {
		self.address = address;
		self
	}

	pub fn address(&self) -> u8 {
		self.address
	}

	pub fn config(&self) -> Config {
		self.config
	}

	pub fn calibration(&self) -> &Calibration {
		self.engine.calibration()
	}

	pub fn into_engine(self) -> HeadingEngine {
		self.engine
	}

	/// Resets the part, waits for it to settle, then writes CONFIG and
	/// CONFIG2. Stops at the first failing write.
	pub fn init<I2C, D, E>(&mut self, i2c: &mut I2C, delay: &mut D) -> Result<(), Error<E>>
	where
		I2C: Write<Error = E>,
		D: DelayMs<u8>,
	{
		self.write_reg(i2c, Register::Reset, RESET_PERIOD)?;
		delay.delay_ms(RESET_SETTLE_MS);
		self.write_reg(i2c, Register::Config, self.config.bits())?;
		self.write_reg(i2c, Register::Config2, CONFIG2_NORMAL)?;
		debug!("qmc5883l at {:#04x} configured: {:?}", self.address, self.config);
		Ok(())
	}

	fn write_reg<I2C, E>(&self, i2c: &mut I2C, reg: Register, val: u8) -> Result<(), Error<E>>
	where
		I2C: Write<Error = E>,
	{
		debug!("write_reg {:<8}({:#04x}) = {:#04x}", reg.name(), reg.addr(), val);
		i2c.write(self.address, &[reg.addr(), val])
			.map_err(Error::I2c)
	}

	/// Points the device at `reg` and reads `buf.len()` bytes from there,
	/// as two separate transactions. The device auto-increments through the
	/// register file.
	pub fn read_raw<I2C, E>(&self, i2c: &mut I2C, reg: Register, buf: &mut [u8]) -> Result<(), Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		i2c.write(self.address, &[reg.addr()]).map_err(Error::I2c)?;
		i2c.read(self.address, buf).map_err(Error::I2c)
	}

	fn read_reg<I2C, E>(&self, i2c: &mut I2C, reg: Register) -> Result<u8, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		let mut buf = [0u8; 1];
		self.read_raw(i2c, reg, &mut buf)?;
		Ok(buf[0])
	}

	/// X, Y and Z counts, without touching calibration
	pub fn read_sample<I2C, E>(&self, i2c: &mut I2C) -> Result<RawSample, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		let mut buf = [0u8; 6];
		self.read_raw(i2c, Register::XLsb, &mut buf)?;
		Ok(RawSample::from_le_bytes(&buf))
	}

	/// Reads a sample, widens the calibration with it and returns the
	/// bearing in [0, 360).
	///
	/// `Error::NotCalibrated` is expected for the first samples after
	/// startup, until both axes have moved.
	pub fn read_heading<I2C, E>(&mut self, i2c: &mut I2C) -> Result<f32, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		let sample = self.read_sample(i2c)?;
		self.engine.update(&sample).ok_or(Error::NotCalibrated)
	}

	pub fn read_status<I2C, E>(&self, i2c: &mut I2C) -> Result<Status, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		self.read_reg(i2c, Register::Status).map(Status)
	}

	/// Uncalibrated die temperature counts. Only relative changes are
	/// meaningful.
	pub fn read_temperature_raw<I2C, E>(&self, i2c: &mut I2C) -> Result<i16, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		let mut buf = [0u8; 2];
		self.read_raw(i2c, Register::TempLsb, &mut buf)?;
		Ok(i16::from_le_bytes(buf))
	}

	/// 0xff on a genuine part, see `registers::CHIP_ID`
	pub fn chip_id<I2C, E>(&self, i2c: &mut I2C) -> Result<u8, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		self.read_reg(i2c, Register::ChipId)
	}

	pub fn read_config<I2C, E>(&self, i2c: &mut I2C) -> Result<Config, Error<E>>
	where
		I2C: Write<Error = E> + Read<Error = E>,
	{
		let reg = self.read_reg(i2c, Register::Config)?;
		Config::from_bits(reg).ok_or(Error::InvalidConfig(reg))
	}
}
