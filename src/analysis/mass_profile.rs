// analysis/mass_profile.rs
// Per-particle mass weights from a profile of initial radius

use crate::error::{DustError, DustResult};

/// Mass weight for each initial radius, normalized so the largest is 1.0.
///
/// Without a profile every particle gets weight 1.0.
pub fn mass_factors(initial_radii: &[f64], profile: Option<&dyn Fn(f64) -> f64>) -> DustResult<Vec<f64>> {
    let Some(profile) = profile else {
        return Ok(vec![1.0; initial_radii.len()]);
    };
    let raw: Vec<f64> = initial_radii.iter().map(|&r| profile(r)).collect();
    if raw.is_empty() {
        return Ok(raw);
    }
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 || raw.iter().any(|v| !v.is_finite()) {
        return Err(DustError::Invalid(format!(
            "mass profile must be finite with a positive maximum, got max {}",
            max
        )));
    }
    Ok(raw.into_iter().map(|v| v / max).collect())
}

/// `r^slope`, the power-law surface profile particles are seeded with.
pub fn power_law(slope: f64) -> impl Fn(f64) -> f64 {
    move |r| r.powf(slope)
}

/// Multiply each mass by its weight.
pub fn scale_masses(masses: &[f64], factors: &[f64]) -> DustResult<Vec<f64>> {
    if masses.len() != factors.len() {
        return Err(DustError::Mismatch(format!(
            "{} masses but {} mass factors",
            masses.len(),
            factors.len()
        )));
    }
    Ok(masses.iter().zip(factors).map(|(m, f)| m * f).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn without_profile_all_ones() {
        assert_eq!(mass_factors(&[1.0, 2.0, 3.0], None).unwrap(), vec![1.0; 3]);
    }

    #[test]
    fn maximum_is_exactly_one() {
        let radii = [0.5, 1.3, 2.9, 7.1, 11.0];
        let profiles: Vec<Box<dyn Fn(f64) -> f64>> = vec![
            Box::new(|r: f64| r * r),
            Box::new(power_law(-1.5)),
            Box::new(|r: f64| (-r / 3.0).exp() * 17.3),
            Box::new(|r: f64| 0.1 + (r - 3.0).abs()),
        ];
        for profile in &profiles {
            let factors = mass_factors(&radii, Some(&**profile)).unwrap();
            let max = factors.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(max, 1.0);
            assert!(factors.iter().all(|&f| f > 0.0 && f <= 1.0));
        }
    }

    #[test]
    fn power_law_ratios_survive_normalization() {
        let profile = power_law(-1.0);
        let factors = mass_factors(&[1.0, 2.0, 4.0], Some(&profile)).unwrap();
        assert_relative_eq!(factors[0], 1.0);
        assert_relative_eq!(factors[1], 0.5);
        assert_relative_eq!(factors[2], 0.25);
    }

    #[test]
    fn non_positive_profile_is_rejected() {
        let zero = |_: f64| 0.0;
        assert!(mass_factors(&[1.0, 2.0], Some(&zero)).is_err());
    }

    #[test]
    fn scaling_checks_lengths() {
        assert_eq!(scale_masses(&[2.0, 4.0], &[1.0, 0.5]).unwrap(), vec![2.0, 2.0]);
        assert!(scale_masses(&[1.0], &[]).is_err());
    }
}
