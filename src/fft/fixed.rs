use super::{check_length, Fft, FftError, Strided};
use num_complex::Complex64;

//
// Hand-unrolled DFTs for sizes 2 and 3, the butterfly bases of the
// composite kernel's stages.
//

pub struct Fixed2Fft;

pub struct Fixed3Fft;

// sin(2*pi/3); cos(2*pi/3) is exactly -1/2.
const SIN_2PI_3: f64 = 0.866_025_403_784_438_6;

#[inline]
fn dft2(x0: Complex64, x1: Complex64) -> (Complex64, Complex64) {
    (x0 + x1, x0 - x1)
}

#[inline]
fn dft3(x0: Complex64, x1: Complex64, x2: Complex64) -> (Complex64, Complex64, Complex64) {
    let x12 = x1 + x2;
    let dz = x1 - x2;
    let u = x0 - x12 * 0.5;
    let t = Complex64::new(-SIN_2PI_3 * dz.im, SIN_2PI_3 * dz.re);
    (x0 + x12, u - t, u + t)
}

impl Strided for Fixed2Fft {
    fn xform_strided(
        &self,
        input: &[Complex64],
        output: &mut [Complex64],
        off: usize,
        stride: usize,
        twiddles: &[Complex64],
        twiddle_stride: usize,
    ) -> Result<(), FftError> {
        let x0 = input[off];
        let mut x1 = input[off + stride];
        if twiddle_stride != 0 {
            x1 *= twiddles[twiddle_stride % twiddles.len()];
        }
        let (y0, y1) = dft2(x0, x1);
        output[off] = y0;
        output[off + stride] = y1;
        Ok(())
    }
}

impl Strided for Fixed3Fft {
    fn xform_strided(
        &self,
        input: &[Complex64],
        output: &mut [Complex64],
        off: usize,
        stride: usize,
        twiddles: &[Complex64],
        twiddle_stride: usize,
    ) -> Result<(), FftError> {
        let x0 = input[off];
        let mut x1 = input[off + stride];
        let mut x2 = input[off + 2 * stride];
        if twiddle_stride != 0 {
            x1 *= twiddles[twiddle_stride % twiddles.len()];
            x2 *= twiddles[(2 * twiddle_stride) % twiddles.len()];
        }
        let (y0, y1, y2) = dft3(x0, x1, x2);
        output[off] = y0;
        output[off + stride] = y1;
        output[off + 2 * stride] = y2;
        Ok(())
    }
}

impl Fft for Fixed2Fft {
    fn size(&self) -> usize {
        2
    }

    fn name(&self) -> String {
        "Fixed2FFT()".to_string()
    }

    fn forward_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        check_length(2, buf.len())?;
        let (y0, y1) = dft2(buf[0], buf[1]);
        buf[0] = y0;
        buf[1] = y1;
        Ok(())
    }
}

impl Fft for Fixed3Fft {
    fn size(&self) -> usize {
        3
    }

    fn name(&self) -> String {
        "Fixed3FFT()".to_string()
    }

    fn forward_inplace(&self, buf: &mut [Complex64]) -> Result<(), FftError> {
        check_length(3, buf.len())?;
        let (y0, y1, y2) = dft3(buf[0], buf[1], buf[2]);
        buf[0] = y0;
        buf[1] = y1;
        buf[2] = y2;
        Ok(())
    }
}
