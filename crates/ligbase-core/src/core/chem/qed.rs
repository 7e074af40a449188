//! Quantitative estimate of druglikeness (Bickerton et al., 2012).
//!
//! Each property is mapped through an asymmetric double sigmoid desirability
//! function and the results are combined as a weighted geometric mean.

use super::descriptors::Descriptors;

#[derive(Debug, Clone, Copy)]
struct AdsParams {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
    dmax: f64,
}

impl AdsParams {
    const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, dmax: f64) -> Self {
        Self { a, b, c, d, e, f, dmax }
    }

    fn desirability(&self, x: f64) -> f64 {
        let rise = 1.0 + (-(x - self.c + self.d / 2.0) / self.e).exp();
        let fall = 1.0 - 1.0 / (1.0 + (-(x - self.c - self.d / 2.0) / self.f).exp());
        (self.a + self.b / rise * fall) / self.dmax
    }
}

const MW: AdsParams = AdsParams::new(
    2.817065973, 392.5754953, 290.7489764, 2.419764353, 49.22325677, 65.37051707, 104.9805561,
);
const ALOGP: AdsParams = AdsParams::new(
    3.172690585, 137.8624751, 2.534937431, 4.581497897, 0.822739154, 0.576295591, 131.3186604,
);
const HBA: AdsParams = AdsParams::new(
    2.948620388, 160.4605972, 3.615294657, 4.435986202, 0.290141953, 1.300669958, 148.7763046,
);
const HBD: AdsParams = AdsParams::new(
    1.618662227, 1010.051101, 0.985094388, 0.000000001, 0.713820843, 0.920922555, 258.1632616,
);
const PSA: AdsParams = AdsParams::new(
    1.876861559, 125.2232657, 62.90773554, 87.83366614, 12.01999824, 28.51324732, 104.5686167,
);
const ROTB: AdsParams = AdsParams::new(
    0.010000000, 272.4121427, 2.558379970, 1.565547684, 1.271567166, 2.758063707, 105.4420403,
);
const AROM: AdsParams = AdsParams::new(
    3.217788970, 957.7374108, 2.274627939, 0.000000001, 1.317690384, 0.375760881, 312.3372610,
);
const ALERTS: AdsParams = AdsParams::new(
    0.010000000, 1199.094025, -0.09002883, 0.000000001, 0.185904477, 0.875193782, 417.7253140,
);

/// Mean-weight set from the original publication.
const WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

/// Computes QED from descriptor values.
///
/// Structural alerts are not evaluated; the alert count is taken as zero.
pub fn qed(descriptors: &Descriptors) -> f64 {
    let values = [
        MW.desirability(descriptors.molecular_weight),
        ALOGP.desirability(descriptors.logp),
        HBA.desirability(f64::from(descriptors.h_acceptors)),
        HBD.desirability(f64::from(descriptors.h_donors)),
        PSA.desirability(descriptors.tpsa),
        ROTB.desirability(f64::from(descriptors.rotatable_bonds)),
        AROM.desirability(f64::from(descriptors.aromatic_rings)),
        ALERTS.desirability(0.0),
    ];

    let weight_sum: f64 = WEIGHTS.iter().sum();
    let log_sum: f64 = values
        .iter()
        .zip(WEIGHTS.iter())
        .map(|(d, w)| w * d.max(f64::MIN_POSITIVE).ln())
        .sum();

    (log_sum / weight_sum).exp().clamp(0.0, 1.0)
}
