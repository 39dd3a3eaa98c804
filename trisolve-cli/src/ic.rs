use rand::Rng;
use trisolve_core::{Gaussian, InitialProfile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IcType {
    Gaussians,
    Plateaus,
}

impl IcType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IcType::Gaussians => "gaussians",
            IcType::Plateaus => "plateaus",
        }
    }
}

pub fn sample_ic_type<R: Rng>(rng: &mut R) -> IcType {
    match rng.gen_range(0..2) {
        0 => IcType::Gaussians,
        _ => IcType::Plateaus,
    }
}

/// Random initial profile on `[0, length]`. Features stay away from the ends
/// so the pinned boundary does not clip them on the first layer.
pub fn generate_ic<R: Rng>(rng: &mut R, length: f64, ic: IcType) -> InitialProfile {
    match ic {
        IcType::Gaussians => {
            let count = rng.gen_range(1..=3);
            let blobs = (0..count)
                .map(|_| Gaussian {
                    center: rng.gen_range(0.2..0.8) * length,
                    width: rng.gen_range(0.02..0.08) * length,
                    amplitude: rng.gen_range(0.6..1.0),
                })
                .collect();
            InitialProfile::Gaussians { blobs }
        }

        IcType::Plateaus => {
            let count = rng.gen_range(1..=3);
            let plateaus: Vec<(f64, f64, f64)> = (0..count)
                .map(|_| {
                    let start = rng.gen_range(0.1..0.6) * length;
                    let width = rng.gen_range(0.05..0.3) * length;
                    let value = rng.gen_range(0.5..1.0);
                    (start, (start + width).min(0.9 * length), value)
                })
                .collect();
            // overlapping plateaus take the larger value
            InitialProfile::custom(move |x| {
                plateaus
                    .iter()
                    .filter(|(a, b, _)| x > *a && x < *b)
                    .fold(0.0, |m, (_, _, v)| f64::max(m, *v))
            })
        }
    }
}
