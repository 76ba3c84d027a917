//! Uniformly partitioned FFT convolution.
//!
//! Convolving with a reverb impulse response directly costs one multiply per
//! impulse sample per output sample: a 2 second response at 48 kHz is 96 000
//! multiplies for every sample, far beyond a realtime budget. Instead the
//! response is cut into equal partitions and each is applied in the frequency
//! domain.
//!
//! # Overlap-save with a frequency-domain delay line
//!
//! ```text
//!  impulse h:  [ h0 | h1 | h2 | ... | hP-1 ]      each partition B samples
//!                 │    │    │          │
//!               FFT  FFT  FFT        FFT          (zero-padded to 2B, once)
//!                 ↓    ↓    ↓          ↓
//!               H0   H1   H2   ...   HP-1
//!
//!  every B input samples:
//!    window = [previous block | new block]        (2B samples)
//!    X_k    = FFT(window)                          pushed into the delay line
//!    Y      = X_k·H0 + X_k-1·H1 + ... + X_k-P+1·HP-1
//!    y      = IFFT(Y)[B..2B] / 2B                  the next B output samples
//! ```
//!
//! The second half of the circular result never wraps around, so it equals
//! the linear convolution exactly. Output is delayed by one block (B samples)
//! because a block must be complete before it can be transformed.
//!
//! Inputs are real, so every spectrum is Hermitian: only bins `0..=B` are
//! accumulated and the upper half is mirrored before the inverse transform.
//!
//! All buffers are sized in `new`; `process_sample` never allocates.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Partition size used by the reverb bus.
pub const REVERB_BLOCK: usize = 256;

const ZERO: Complex<f32> = Complex { re: 0.0, im: 0.0 };

pub struct Convolver {
    block: usize,
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    /// Spectra of the impulse partitions, each 2B bins
    partitions: Vec<Vec<Complex<f32>>>,
    /// Ring of past input spectra; `head` is written next
    history: Vec<Vec<Complex<f32>>>,
    head: usize,
    /// Previous block followed by the block being collected
    window: Vec<f32>,
    fill: usize,
    /// Finished output, drained one sample per input sample
    output: Vec<f32>,
    accum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Convolver {
    /// Prepare `impulse` for convolution in partitions of `block` samples.
    pub fn new(impulse: &[f32], block: usize) -> Self {
        let block = block.max(1);
        let size = 2 * block;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        let mut scratch = vec![ZERO; scratch_len];

        let mut partitions: Vec<Vec<Complex<f32>>> = impulse
            .chunks(block)
            .map(|chunk| {
                let mut spectrum = vec![ZERO; size];
                for (bin, &h) in spectrum.iter_mut().zip(chunk) {
                    bin.re = h;
                }
                fft.process_with_scratch(&mut spectrum, &mut scratch);
                spectrum
            })
            .collect();
        if partitions.is_empty() {
            partitions.push(vec![ZERO; size]);
        }

        let history = vec![vec![ZERO; size]; partitions.len()];

        Self {
            block,
            fft,
            ifft,
            partitions,
            history,
            head: 0,
            window: vec![0.0; size],
            fill: 0,
            output: vec![0.0; block],
            accum: vec![ZERO; size],
            scratch,
        }
    }

    /// Feed one input sample, get one output sample (delayed by `latency()`).
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let out = self.output[self.fill];
        self.window[self.block + self.fill] = input;
        self.fill += 1;

        if self.fill == self.block {
            self.process_partition();
            self.fill = 0;
        }

        out
    }

    fn process_partition(&mut self) {
        let block = self.block;
        let size = 2 * block;
        let count = self.partitions.len();

        let spectrum = &mut self.history[self.head];
        for (bin, &x) in spectrum.iter_mut().zip(self.window.iter()) {
            *bin = Complex::new(x, 0.0);
        }
        self.fft.process_with_scratch(spectrum, &mut self.scratch);

        // Hermitian symmetry: bins 0..=B carry all the information
        let bins = block + 1;
        self.accum[..bins].fill(ZERO);
        for (p, h) in self.partitions.iter().enumerate() {
            let x = &self.history[(self.head + count - p) % count];
            for ((acc, &xk), &hk) in self.accum[..bins].iter_mut().zip(&x[..bins]).zip(&h[..bins]) {
                *acc += xk * hk;
            }
        }
        for k in 1..block {
            self.accum[size - k] = self.accum[k].conj();
        }

        self.ifft.process_with_scratch(&mut self.accum, &mut self.scratch);

        let scale = 1.0 / size as f32;
        for (o, y) in self.output.iter_mut().zip(&self.accum[block..]) {
            *o = y.re * scale;
        }

        self.window.copy_within(block.., 0);
        self.head = (self.head + 1) % count;
    }

    /// Clear all signal history. The impulse response is kept.
    pub fn reset(&mut self) {
        for spectrum in &mut self.history {
            spectrum.fill(ZERO);
        }
        self.window.fill(0.0);
        self.output.fill(0.0);
        self.head = 0;
        self.fill = 0;
    }

    /// Samples between an input and its first contribution to the output.
    pub fn latency(&self) -> usize {
        self.block
    }

    /// Samples of output still produced after the input falls silent.
    pub fn tail_len(&self) -> usize {
        self.partitions.len() * self.block + self.block
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}
