/// Pure-math stereo mix bus.
///
/// Every input is brought to interleaved stereo at `target_sample_rate`
/// before being summed. Mono sources land in the center of the stereo field.
#[derive(Debug, Clone)]
pub struct MixBus {
    pub target_sample_rate: f64,
}

/// RMS and peak of the last rendered block (0.0–1.0 for normalized audio).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MixLevels {
    pub rms: f32,
    pub peak: f32,
}

impl MixBus {
    pub fn new(target_sample_rate: f64) -> Self {
        Self { target_sample_rate }
    }

    /// Convert interleaved samples with `channels` channels to stereo.
    ///
    /// Mono is duplicated to both sides. Layouts wider than stereo keep their
    /// first two channels.
    pub fn to_stereo(&self, samples: &[f32], channels: u16) -> Vec<f32> {
        match channels {
            0 => Vec::new(),
            1 => samples.iter().flat_map(|&s| [s, s]).collect(),
            2 => samples.to_vec(),
            n => samples
                .chunks_exact(n as usize)
                .flat_map(|frame| [frame[0], frame[1]])
                .collect(),
        }
    }

    /// Linear interpolation resampling of interleaved stereo to the bus rate.
    pub fn resample_stereo(&self, samples: &[f32], source_sample_rate: f64) -> Vec<f32> {
        if (source_sample_rate - self.target_sample_rate).abs() < 0.01
            || samples.is_empty()
            || source_sample_rate <= 0.0
        {
            return samples.to_vec();
        }

        let frame_count = samples.len() / 2;
        let ratio = self.target_sample_rate / source_sample_rate;
        let output_frames = (frame_count as f64 * ratio) as usize;

        let mut output = vec![0.0f32; output_frames * 2];
        for i in 0..output_frames {
            let position = i as f64 / ratio;
            let index = position as usize;
            let fraction = (position - index as f64) as f32;

            for ch in 0..2usize {
                output[i * 2 + ch] = if index + 1 < frame_count {
                    let next = samples[(index + 1) * 2 + ch];
                    samples[index * 2 + ch] * (1.0 - fraction) + next * fraction
                } else {
                    samples[index.min(frame_count - 1) * 2 + ch]
                };
            }
        }
        output
    }

    /// Sum equally sized stereo blocks, clamped to [-1.0, 1.0].
    ///
    /// Shorter inputs contribute silence past their end.
    pub fn sum(&self, inputs: &[Vec<f32>]) -> Vec<f32> {
        let len = inputs.iter().map(Vec::len).max().unwrap_or(0);
        let mut out = vec![0.0f32; len];
        for input in inputs {
            for (acc, &sample) in out.iter_mut().zip(input) {
                *acc += sample;
            }
        }
        for sample in &mut out {
            *sample = sample.clamp(-1.0, 1.0);
        }
        out
    }

    pub fn levels(samples: &[f32]) -> MixLevels {
        if samples.is_empty() {
            return MixLevels::default();
        }
        let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
        MixLevels {
            rms: (sum_sq / samples.len() as f32).sqrt(),
            peak: samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mono_is_centered() {
        let bus = MixBus::new(48000.0);
        let stereo = bus.to_stereo(&[0.25, -0.5], 1);
        assert_eq!(stereo, vec![0.25, 0.25, -0.5, -0.5]);
    }

    #[test]
    fn wide_layouts_keep_front_pair() {
        let bus = MixBus::new(48000.0);
        let six = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 0.0, 0.0];
        assert_eq!(bus.to_stereo(&six, 6), vec![0.1, 0.2, 0.7, 0.8]);
    }

    #[test]
    fn sum_clamps() {
        let bus = MixBus::new(48000.0);
        let mixed = bus.sum(&[vec![0.75, -0.75], vec![0.5, -0.5]]);
        assert_eq!(mixed, vec![1.0, -1.0]);
    }

    #[test]
    fn sum_pads_short_inputs() {
        let bus = MixBus::new(48000.0);
        let mixed = bus.sum(&[vec![0.1, 0.1, 0.2, 0.2], vec![0.3, 0.3]]);
        assert_relative_eq!(mixed[0], 0.4, epsilon = 1e-6);
        assert_relative_eq!(mixed[2], 0.2, epsilon = 1e-6);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let bus = MixBus::new(48000.0);
        let samples = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(bus.resample_stereo(&samples, 48000.0), samples);
    }

    #[test]
    fn resample_upsamples_with_interpolation() {
        let bus = MixBus::new(48000.0);
        let out = bus.resample_stereo(&[0.0, 0.0, 1.0, 1.0], 24000.0);

        assert_eq!(out.len(), 8);
        assert_relative_eq!(out[2], 0.5, epsilon = 1e-6);
        assert_relative_eq!(out[3], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn resample_downsamples() {
        let bus = MixBus::new(24000.0);
        let samples: Vec<f32> = (0..200).map(|i| (i / 2) as f32 / 100.0).collect();
        assert_eq!(bus.resample_stereo(&samples, 48000.0).len(), 100);
    }

    #[test]
    fn levels_of_full_scale_square() {
        let levels = MixBus::levels(&[1.0, -1.0, 1.0, -1.0]);
        assert_relative_eq!(levels.rms, 1.0, epsilon = 1e-6);
        assert_relative_eq!(levels.peak, 1.0, epsilon = 1e-6);
        assert_eq!(MixBus::levels(&[]), MixLevels::default());
    }
}
