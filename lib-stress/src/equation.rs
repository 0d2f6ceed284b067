/// Point on the surface `z = exp(cos(sqrt(x^2 + y^2)))`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub units_to_compute: u32,
}

impl Coordinate {
    pub fn origin(units_to_compute: u32) -> Self {
        Self {
            units_to_compute,
            ..Default::default()
        }
    }

    /// Computes `z` for the current `(x, y)`, then advances both by `index`.
    #[inline]
    pub fn step(&mut self, index: u32) {
        let i = f64::from(index);
        self.z = (self.x.powi(2) + self.y.powi(2)).sqrt().cos().exp();
        self.x += i / 1.1;
        self.y += i * 1.1;
    }

    /// Whether both coordinates carry exactly the same bits.
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}
