/// Circular buffer of past samples.
///
/// Reads are expressed as "how many samples ago": `read(1)` returns the most
/// recently written sample. The buffer is allocated once at construction and
/// never resized, so reads and writes are realtime-safe.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a line able to delay by up to `max_delay_samples`.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(1)],
            write_pos: 0,
        }
    }

    /// Longest delay (in samples) this line can produce.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Append a sample, overwriting the oldest one.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Sample written `delay_samples` writes ago (clamped to 1..=capacity).
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1, len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Fractional read with linear interpolation between neighbouring samples.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let max = self.buffer.len() as f32;
        let delay = delay_samples.clamp(1.0, max);
        let whole = delay.floor();
        let frac = delay - whole;

        let a = self.read(whole as usize);
        if frac == 0.0 {
            return a;
        }
        let b = self.read(whole as usize + 1);
        a + (b - a) * frac
    }

    /// Read the delayed sample, then write `sample`.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(sample);
        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_comes_back_after_delay() {
        let mut line = DelayLine::new(16);
        let mut out = Vec::new();
        out.push(line.next_sample(1.0, 4));
        for _ in 0..6 {
            out.push(line.next_sample(0.0, 4));
        }
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn full_capacity_delay_is_reachable() {
        let mut line = DelayLine::new(8);
        line.write(1.0);
        for _ in 0..7 {
            line.write(0.0);
        }
        assert_eq!(line.read(8), 1.0);
        assert_eq!(line.read(100), 1.0); // clamped to capacity
    }

    #[test]
    fn interpolated_read_blends_neighbours() {
        let mut line = DelayLine::new(8);
        line.write(1.0);
        line.write(0.0);
        // read(1) = 0.0, read(2) = 1.0
        assert!((line.read_interpolated(1.25) - 0.25).abs() < 1e-6);
        assert_eq!(line.read_interpolated(2.0), 1.0);
    }
}
