use std::ops::Range;

use nalgebra as na;
use rand::Rng;

use crate::PointN;

pub(crate) fn gen_random_in_range<R, const N: usize>(range: Range<PointN<N>>, rng: &mut R) -> PointN<N>
where
    R: Rng + ?Sized,
{
    let rand_vec = rng.gen::<na::SVector<f32, N>>();
    let s = range.start.coords;
    let e = range.end.coords;
    na::Point::from(s + rand_vec.component_mul(&(e - s)))
}

/// The axis aligned box spanning both points. It may have zero width on any axis.
pub(crate) fn bounding_box<const N: usize>(a: &PointN<N>, b: &PointN<N>) -> Range<PointN<N>> {
    let min = na::SVector::<f32, N>::from_iterator(
        a.iter()
            .zip(b.iter())
            .map(|(&one, &other)| one.min(other)),
    );
    let max = na::SVector::<f32, N>::from_iterator(
        a.iter()
            .zip(b.iter())
            .map(|(&one, &other)| one.max(other)),
    );

    Range {
        start: PointN::from(min),
        end: PointN::from(max),
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;

    #[test]
    fn random_points_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let range = bounding_box(&na::Point3::new(5.0, -1.0, 2.0), &na::Point3::new(-5.0, 1.0, 2.0));

        assert_eq!(range.start, na::Point3::new(-5.0, -1.0, 2.0));
        assert_eq!(range.end, na::Point3::new(5.0, 1.0, 2.0));

        for _ in 0..1000 {
            let p = gen_random_in_range(range.clone(), &mut rng);
            assert!((-5.0..=5.0).contains(&p.x));
            assert!((-1.0..=1.0).contains(&p.y));
            // Degenerate axis.
            assert_eq!(p.z, 2.0);
        }
    }
}
