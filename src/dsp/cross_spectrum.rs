//! PHAT-weighted cross-power spectrum
//!
//! Combines the two channel spectra into `X = L · conj(R)` and divides each
//! bin by its own magnitude. Only phase survives, so every frequency band
//! contributes equally to the correlation peak regardless of how loud it is.

use super::fft::Spectrum;

/// Added to every bin magnitude before division
pub const PHAT_EPSILON: f32 = 1e-12;

/// Write the whitened cross-spectrum of `left` and `right` into `out`
///
/// Per bin:
/// - `re = Lr·Rr + Li·Ri`
/// - `im = Li·Rr − Lr·Ri`
/// - both divided by `sqrt(re² + im²) + ε`
///
/// Bins where either channel is exactly zero come out as zero.
pub fn phat_cross_spectrum(left: &Spectrum, right: &Spectrum, out: &mut Spectrum) {
    debug_assert_eq!(left.len(), right.len());
    debug_assert_eq!(left.len(), out.len());

    let bins = left
        .re
        .iter()
        .zip(&left.im)
        .zip(right.re.iter().zip(&right.im));

    for ((out_re, out_im), ((&lr, &li), (&rr, &ri))) in
        out.re.iter_mut().zip(out.im.iter_mut()).zip(bins)
    {
        let re = lr * rr + li * ri;
        let im = li * rr - lr * ri;
        let magnitude = (re * re + im * im).sqrt() + PHAT_EPSILON;
        *out_re = re / magnitude;
        *out_im = im / magnitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(re: &[f32], im: &[f32]) -> Spectrum {
        Spectrum {
            re: re.to_vec(),
            im: im.to_vec(),
        }
    }

    #[test]
    fn test_bins_have_unit_magnitude() {
        let left = spectrum(&[3.0, 0.5, -2.0, 10.0], &[4.0, 0.0, 1.0, -7.0]);
        let right = spectrum(&[1.0, 2.0, 0.25, -1.0], &[-1.0, 3.0, 0.0, 0.5]);
        let mut out = Spectrum::zeros(4);

        phat_cross_spectrum(&left, &right, &mut out);

        for k in 0..4 {
            let mag = (out.re[k] * out.re[k] + out.im[k] * out.im[k]).sqrt();
            assert!((mag - 1.0).abs() < 1e-5, "bin {} magnitude {}", k, mag);
        }
    }

    #[test]
    fn test_phase_is_difference_of_channel_phases() {
        // L = e^{i·0.9}, R = 2·e^{i·0.3}: X phase = 0.6
        let left = spectrum(&[0.9f32.cos()], &[0.9f32.sin()]);
        let right = spectrum(&[2.0 * 0.3f32.cos()], &[2.0 * 0.3f32.sin()]);
        let mut out = Spectrum::zeros(1);

        phat_cross_spectrum(&left, &right, &mut out);

        assert!((out.re[0] - 0.6f32.cos()).abs() < 1e-6);
        assert!((out.im[0] - 0.6f32.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_identical_spectra_are_real_positive() {
        let left = spectrum(&[1.0, -3.0, 0.2], &[2.0, 0.5, -0.7]);
        let mut out = Spectrum::zeros(3);

        phat_cross_spectrum(&left, &left, &mut out);

        for k in 0..3 {
            assert!((out.re[k] - 1.0).abs() < 1e-6);
            assert!(out.im[k].abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_bin_does_not_divide_by_zero() {
        let left = spectrum(&[0.0, 1.0], &[0.0, 0.0]);
        let right = spectrum(&[1.0, 0.0], &[1.0, 0.0]);
        let mut out = Spectrum::zeros(2);

        phat_cross_spectrum(&left, &right, &mut out);

        assert_eq!(out.re, vec![0.0, 0.0]);
        assert_eq!(out.im, vec![0.0, 0.0]);
    }
}
