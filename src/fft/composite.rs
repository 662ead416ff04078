use super::fixed::{Fixed2Fft, Fixed3Fft};
use super::naive::NaiveFft;
use super::prime::PrimeFft;
use super::twiddle::twiddle_factors;
use super::{check_length, Fft, FftError, Strided, ALWAYS_NAIVE_BELOW};
use crate::primes;
use num_complex::Complex64;
use num_traits::Zero;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

//
// Mixed-radix Cooley–Tukey for arbitrary composite sizes. The prime
// decomposition of N fixes a stage per factor; construction flattens the
// recursive factorization into per-stage job lists plus one input
// permutation, so execution is a scatter, a loop over stages against a pair
// of ping-pong buffers, and a copy back.
//

/// One strided sub-transform within a stage.
struct Job {
    base: usize,
    stride: usize,
    twiddle_stride: usize,
}

/// All sub-transforms sharing one radix at one depth of the factorization.
struct Stage {
    kernel: Arc<dyn Strided>,
    jobs: Vec<Job>,
}

struct PingPong {
    buf: Vec<Complex64>,
    out: Vec<Complex64>,
}

pub struct CompositeFft {
    n: usize,
    wtable: Vec<Complex64>,
    perm: Vec<usize>,
    stages: Vec<Stage>,
    // Which ping-pong buffer the input scatter lands in: the one the
    // deepest stage reads. Stages alternate, so this is fixed by the
    // parity of the stage count.
    inner_is_buf: bool,
    scratch: Mutex<PingPong>,
}

impl CompositeFft {
    pub fn new(n: usize) -> Result<Self, FftError> {
        if n < 2 {
            return Err(FftError::SizeInvalid(n));
        }

        let decomp: Vec<usize> = primes::prime_decomp(n as u64)
            .into_iter()
            .map(|p| p as usize)
            .collect();
        log::debug!("composite plan for {}: factors {:?}", n, decomp);

        //
        // One sub-kernel per distinct factor, shared across its stages.
        //
        let mut kernels: HashMap<usize, Arc<dyn Strided>> = HashMap::new();
        for &p in &decomp {
            if kernels.contains_key(&p) {
                continue;
            }
            let kernel: Arc<dyn Strided> = match p {
                2 => Arc::new(Fixed2Fft),
                3 => Arc::new(Fixed3Fft),
                _ if p < ALWAYS_NAIVE_BELOW => Arc::new(NaiveFft::new(p)),
                _ => {
                    let padded = primes::prime_padding_heuristic(p as u64);
                    Arc::new(PrimeFft::new(p, padded)?)
                }
            };
            kernels.insert(p, kernel);
        }

        let mut stages: Vec<Stage> = decomp
            .iter()
            .map(|p| Stage {
                kernel: kernels[p].clone(),
                jobs: Vec::new(),
            })
            .collect();

        let mut perm = vec![0usize; n];
        build_plan(&decomp, &mut stages, &mut perm, 0, n, 1, 0, 0);

        Ok(Self {
            n,
            wtable: twiddle_factors(n),
            perm,
            inner_is_buf: decomp.len() % 2 == 1,
            stages,
            scratch: Mutex::new(PingPong {
                buf: vec![Complex64::zero(); n],
                out: vec![Complex64::zero(); n],
            }),
        })
    }
}

/// Recursive descent through the factor list.
///
/// A node of size `n` at depth `level` splits into `p = decomp[level]`
/// children of size `n / p`, interleaved at `p` times the node's input
/// stride. Leaves record where each input index lands after the scatter;
/// on the way back up the node contributes `n / p` size-`p` jobs whose
/// twiddle strides index the size-N table.
fn build_plan(
    decomp: &[usize],
    stages: &mut [Stage],
    perm: &mut [usize],
    level: usize,
    n: usize,
    stride: usize,
    off: usize,
    boff: usize,
) {
    if level == decomp.len() {
        perm[off] = boff;
        return;
    }
    let p = decomp[level];
    let nn = n / p;
    for j in 0..p {
        build_plan(
            decomp,
            stages,
            perm,
            level + 1,
            nn,
            p * stride,
            j * stride + off,
            boff + j * nn,
        );
    }
    for q in 0..nn {
        stages[level].jobs.push(Job {
            base: boff + q,
            stride: nn,
            twiddle_stride: q * stride,
        });
    }
}

impl Fft for CompositeFft {
    fn size(&self) -> usize {
        self.n
    }

    fn name(&self) -> String {
        format!("CompositeFFT({})", self.n)
    }

    fn forward_inplace(&self, buf_io: &mut [Complex64]) -> Result<(), FftError> {
        check_length(self.n, buf_io.len())?;
        let mut scratch = self.scratch.lock();

        //
        // Scatter the input through the permutation into the buffer the
        // deepest stage reads.
        //
        {
            let inner = if self.inner_is_buf {
                &mut scratch.buf
            } else {
                &mut scratch.out
            };
            for (i, &value) in buf_io.iter().enumerate() {
                inner[self.perm[i]] = value;
            }
        }

        //
        // Run stages deepest-first. Even depths read `buf` and write
        // `out`, odd depths the reverse, so each stage consumes what its
        // children produced.
        //
        for level in (0..self.stages.len()).rev() {
            let PingPong { buf, out } = &mut *scratch;
            let (src, dst) = if level % 2 == 0 {
                (&buf[..], &mut out[..])
            } else {
                (&out[..], &mut buf[..])
            };
            let stage = &self.stages[level];
            for job in &stage.jobs {
                stage.kernel.xform_strided(
                    src,
                    dst,
                    job.base,
                    job.stride,
                    &self.wtable,
                    job.twiddle_stride,
                )?;
            }
        }

        //
        // The depth-0 stage always writes `out`.
        //
        buf_io.copy_from_slice(&scratch.out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_matches_naive(n: usize) {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let input: Vec<Complex64> = (0..n)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();

        let mut expected = input.clone();
        NaiveFft::new(n).forward_inplace(&mut expected).unwrap();

        let fft = CompositeFft::new(n).unwrap();
        let mut got = input;
        fft.forward_inplace(&mut got).unwrap();

        for k in 0..n {
            assert!(
                (got[k] - expected[k]).norm() < 1e-6,
                "n={} k={} got={} want={}",
                n,
                k,
                got[k],
                expected[k]
            );
        }
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(CompositeFft::new(0).is_err());
        assert!(CompositeFft::new(1).is_err());
    }

    #[test]
    fn size_six_impulse_and_constant() {
        let fft = CompositeFft::new(6).unwrap();

        let mut impulse = vec![Complex64::zero(); 6];
        impulse[0] = Complex64::new(1.0, 0.0);
        fft.forward_inplace(&mut impulse).unwrap();
        for value in &impulse {
            assert!((value - Complex64::new(1.0, 0.0)).norm() < 1e-9);
        }

        let mut ones = vec![Complex64::new(1.0, 0.0); 6];
        fft.forward_inplace(&mut ones).unwrap();
        assert!((ones[0] - Complex64::new(6.0, 0.0)).norm() < 1e-9);
        for value in &ones[1..] {
            assert!(value.norm() < 1e-9);
        }
    }

    #[test]
    fn pure_radix_stages_match_naive() {
        // 2^k, 3^k, and mixed 2/3 towers.
        for n in [4usize, 8, 9, 12, 27, 36, 72] {
            assert_matches_naive(n);
        }
    }

    #[test]
    fn naive_sub_kernel_stages_match_naive() {
        // Factors 5..13 run through the strided naive kernel.
        for n in [10usize, 25, 35, 77, 91, 130, 210] {
            assert_matches_naive(n);
        }
    }

    #[test]
    fn rader_sub_kernel_stages_match_naive() {
        // 34 = 2*17 uses an unpadded Rader stage; 46 = 2*23 a padded one.
        for n in [34usize, 46, 51, 58, 94] {
            assert_matches_naive(n);
        }
    }

    #[test]
    fn repeated_calls_reuse_scratch() {
        let fft = CompositeFft::new(12).unwrap();
        let input: Vec<Complex64> = (0..12)
            .map(|i| Complex64::new(i as f64, -(i as f64)))
            .collect();

        let mut first = input.clone();
        fft.forward_inplace(&mut first).unwrap();
        let mut second = input;
        fft.forward_inplace(&mut second).unwrap();

        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}
