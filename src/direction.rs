/// The eight points of the compass rose, clockwise from north.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
	N,
	NE,
	E,
	SE,
	S,
	SW,
	W,
	NW,
}

const ROSE: [Direction; 8] = [
	Direction::N,
	Direction::NE,
	Direction::E,
	Direction::SE,
	Direction::S,
	Direction::SW,
	Direction::W,
	Direction::NW,
];

impl Direction {
	/// Each point covers 45 degrees centred on its bearing, so north is
	/// [337.5, 22.5). Angles outside [0, 360) wrap.
	pub fn from_degrees(deg: f32) -> Self {
		let sector = libm::floorf((deg + 22.5) / 45.0) as i32;
		ROSE[sector.rem_euclid(8) as usize]
	}

	pub fn label(&self) -> &'static str {
		match self {
			Direction::N => "N",
			Direction::NE => "NE",
			Direction::E => "E",
			Direction::SE => "SE",
			Direction::S => "S",
			Direction::SW => "SW",
			Direction::W => "W",
			Direction::NW => "NW",
		}
	}
}

pub fn direction_label(deg: f32) -> &'static str {
	Direction::from_degrees(deg).label()
}
