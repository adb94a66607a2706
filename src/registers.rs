// register map and CONFIG field encodings

/// 7-bit bus address. Written as 0x1a in 8-bit (shifted) notation.
pub const DEFAULT_ADDRESS: u8 = 0x0d;

/// CHIP_ID readback of a genuine part
pub const CHIP_ID: u8 = 0xff;

/// Value written to RESET, sets the SET/RESET period
pub const RESET_PERIOD: u8 = 0x01;

/// CONFIG2 value for normal power, interrupt and pointer roll-over off
pub const CONFIG2_NORMAL: u8 = 0x00;

const MODE_MASK: u8 = 0b0000_0011;
const ODR_MASK: u8 = 0b0000_1100;
const RNG_MASK: u8 = 0b0011_0000;
const OSR_MASK: u8 = 0b1100_0000;

const ODR_LOC: u8 = 2;
const RNG_LOC: u8 = 4;
const OSR_LOC: u8 = 6;

const STATUS_DRDY: u8 = 1 << 0;
const STATUS_OVL: u8 = 1 << 1;
const STATUS_DOR: u8 = 1 << 2;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
	XLsb = 0x00,
	XMsb = 0x01,
	YLsb = 0x02,
	YMsb = 0x03,
	ZLsb = 0x04,
	ZMsb = 0x05,
	Status = 0x06,
	TempLsb = 0x07,
	TempMsb = 0x08,
	Config = 0x09,
	Config2 = 0x0a,
	Reset = 0x0b,
	ChipId = 0x0d,
}

impl Register {
	pub fn addr(self) -> u8 {
		self as u8
	}

	pub fn name(&self) -> &'static str {
		match self {
			Register::XLsb => "X_LSB",
			Register::XMsb => "X_MSB",
			Register::YLsb => "Y_LSB",
			Register::YMsb => "Y_MSB",
			Register::ZLsb => "Z_LSB",
			Register::ZMsb => "Z_MSB",
			Register::Status => "STATUS",
			Register::TempLsb => "TEMP_L",
			Register::TempMsb => "TEMP_H",
			Register::Config => "CONFIG",
			Register::Config2 => "CONFIG2",
			Register::Reset => "RESET",
			Register::ChipId => "CHIP_ID",
		}
	}
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
	Standby = 0b00,
	Continuous = 0b01,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRate {
	Hz10 = 0b00,
	Hz50 = 0b01,
	Hz100 = 0b10,
	Hz200 = 0b11,
}

/// Full scale field range
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
	Gauss2 = 0b00,
	Gauss8 = 0b01,
}

/// Over sample ratio. Higher ratios cost power and lower noise.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
	Osr512 = 0b00,
	Osr256 = 0b01,
	Osr128 = 0b10,
	Osr64 = 0b11,
}

/// Contents of the CONFIG register.
///
/// The default is continuous measurement at 50 Hz, ±2 gauss, OSR 512,
/// which encodes to `0x05`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
	pub mode: Mode,
	pub rate: OutputRate,
	pub range: Range,
	pub oversampling: Oversampling,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			mode: Mode::Continuous,
			rate: OutputRate::Hz50,
			range: Range::Gauss2,
			oversampling: Oversampling::Osr512,
		}
	}
}

impl Config {
	pub fn bits(&self) -> u8 {
		(self.oversampling as u8) << OSR_LOC
			| (self.range as u8) << RNG_LOC
			| (self.rate as u8) << ODR_LOC
			| self.mode as u8
	}

	/// Decodes a CONFIG readback. Returns `None` for the reserved mode
	/// encodings and the reserved range bit.
	pub fn from_bits(reg: u8) -> Option<Self> {
		let mode = match reg & MODE_MASK {
			0b00 => Mode::Standby,
			0b01 => Mode::Continuous,
			_ => return None,
		};
		let rate = match (reg & ODR_MASK) >> ODR_LOC {
			0b00 => OutputRate::Hz10,
			0b01 => OutputRate::Hz50,
			0b10 => OutputRate::Hz100,
			_ => OutputRate::Hz200,
		};
		let range = match (reg & RNG_MASK) >> RNG_LOC {
			0b00 => Range::Gauss2,
			0b01 => Range::Gauss8,
			_ => return None,
		};
		let oversampling = match (reg & OSR_MASK) >> OSR_LOC {
			0b00 => Oversampling::Osr512,
			0b01 => Oversampling::Osr256,
			0b10 => Oversampling::Osr128,
			_ => Oversampling::Osr64,
		};
		Some(Config { mode, rate, range, oversampling })
	}
}

/// STATUS register snapshot
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u8);

impl Status {
	/// New data is waiting in the output registers.
	pub fn data_ready(&self) -> bool {
		self.0 & STATUS_DRDY != 0
	}

	/// An axis exceeded the selected range.
	pub fn overflow(&self) -> bool {
		self.0 & STATUS_OVL != 0
	}

	/// A measurement was skipped because the previous one was never read.
	pub fn data_skipped(&self) -> bool {
		self.0 & STATUS_DOR != 0
	}
}
