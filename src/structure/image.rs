/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use mmdiff_array_types::V3;

use crate::UnitCell;

/// One periodic image of a displacement vector.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Image {
    /// Lattice translation added to the original displacement.
    pub translation: V3<i32>,
    /// The displacement after translation.
    pub vector: V3,
}

impl UnitCell {
    /// The shortest image of a displacement along the periodic axes.
    ///
    /// Rounding the fractional coordinates finds it directly for orthogonal
    /// cells. The shortest image is never longer than the rounded one, so
    /// for skewed cells every translation that could reach within that
    /// length is searched.
    pub fn shortest_vector(&self, delta: V3) -> V3 {
        if !self.is_periodic() {
            return delta;
        }
        let (reduced, _) = self.reduce(delta);

        let mut best = reduced;
        let mut best_sqnorm = reduced.sqnorm();
        for translation in self.translations(self.image_ranges(reduced.norm())) {
            let candidate = reduced + self.to_carts(translation.map(f64::from));
            let sqnorm = candidate.sqnorm();
            if sqnorm < best_sqnorm {
                best = candidate;
                best_sqnorm = sqnorm;
            }
        }
        best
    }

    /// How many translations along each lattice vector are needed so that
    /// [`UnitCell::images_within`] sees every image within `cutoff`.
    ///
    /// Always zero along non-periodic axes.
    pub fn image_ranges(&self, cutoff: f64) -> [i32; 3] {
        let spacings = self.plane_spacings();
        let mut out = [0; 3];
        for k in 0..3 {
            if self.periodicity()[k] {
                // an image within the cutoff has |frac| <= cutoff / spacing,
                // and the reduced displacement has |frac| <= 1/2.
                out[k] = (cutoff / spacings[k] + 0.5).floor() as i32;
            }
        }
        out
    }

    /// Every image of `delta` whose length is at most `cutoff`, in
    /// lexicographic order of the translations tried.
    ///
    /// With `canonical_only`, the zero translation is skipped and of each
    /// pair of opposite translations only the one whose first nonzero
    /// component is positive is kept. This is what an atom interacting with
    /// its own images needs (`delta` is then zero).
    pub fn images_within(&self, delta: V3, cutoff: f64, canonical_only: bool) -> Vec<Image> {
        let (reduced, shift) = self.reduce(delta);
        let sq_cutoff = cutoff * cutoff;

        let mut out = vec![];
        for translation in self.translations(self.image_ranges(cutoff)) {
            let total = V3::from_fn(|k| shift[k] + translation[k]);
            if canonical_only && !is_canonical(total) {
                continue;
            }
            let vector = reduced + self.to_carts(translation.map(f64::from));
            if vector.sqnorm() <= sq_cutoff {
                out.push(Image { translation: total, vector });
            }
        }
        out
    }

    // Bring the fractional coordinates along periodic axes into [-1/2, 1/2].
    // Returns the reduced vector and the translation that was applied.
    fn reduce(&self, delta: V3) -> (V3, V3<i32>) {
        let frac = self.to_fracs(delta);
        let periodic = self.periodicity();
        let shift = V3::from_fn(|k| match periodic[k] {
            true => -frac[k].round() as i32,
            false => 0,
        });
        let reduced = self.to_carts(V3::from_fn(|k| frac[k] + f64::from(shift[k])));
        (reduced, shift)
    }

    // All translations with |n_k| <= ranges[k] along periodic axes.
    fn translations(&self, ranges: [i32; 3]) -> impl Iterator<Item=V3<i32>> {
        let periodic = self.periodicity();
        let range = move |k: usize| match periodic[k] {
            true => -ranges[k]..=ranges[k],
            false => 0..=0,
        };
        itertools::iproduct!(range(0), range(1), range(2))
            .map(|(a, b, c)| V3([a, b, c]))
    }
}

fn is_canonical(translation: V3<i32>) -> bool {
    match translation.iter().find(|&&n| n != 0) {
        Some(&n) => n > 0,
        None => false,
    }
}
