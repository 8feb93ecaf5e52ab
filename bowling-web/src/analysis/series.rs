//! Session time series
//!
//! Collects each scalar measurement across the frames of a session, in frame
//! order. Frames without measurements contribute nothing (no placeholder),
//! so every sequence has one entry per measured frame.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::biomechanics::{FrameMeasurements, Measurement};

/// Measurement name → values in frame order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionTimeSeries {
    series: BTreeMap<Measurement, Vec<f32>>,
}

impl SessionTimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a session's per-frame results, skipping undetected frames
    pub fn from_frames(frames: &[Option<FrameMeasurements>]) -> Self {
        let mut series = Self::new();
        for measurements in frames.iter().flatten() {
            series.push(measurements);
        }
        series
    }

    /// Append every scalar of one frame
    pub fn push(&mut self, measurements: &FrameMeasurements) {
        for (name, value) in measurements.scalars() {
            self.series.entry(name).or_default().push(value);
        }
    }

    pub fn get(&self, name: Measurement) -> Option<&[f32]> {
        self.series.get(&name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: Measurement) -> bool {
        self.series.contains_key(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of measured frames aggregated
    pub fn frame_count(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measurement, &[f32])> {
        self.series.iter().map(|(name, values)| (*name, values.as_slice()))
    }

    /// Position in the arm-angle sequence closest to full extension (180°)
    ///
    /// First minimum wins on ties.
    pub fn estimated_release_position(&self) -> Option<usize> {
        position_nearest(self.get(Measurement::ArmAngle)?, 180.0)
    }

    /// Centered moving average of every sequence
    ///
    /// The ends that the window cannot cover keep their raw values, so each
    /// sequence keeps its length. Sequences shorter than `window` are copied
    /// unchanged.
    pub fn smoothed(&self, window: usize) -> Self {
        let series = self
            .series
            .iter()
            .map(|(name, values)| (*name, moving_average(values, window)))
            .collect();
        Self { series }
    }

    /// Min-max scaling of one sequence into [0, 1]
    ///
    /// A constant sequence maps to 0.5 throughout.
    pub fn normalized(&self, name: Measurement) -> Option<Vec<f32>> {
        let values = self.get(name)?;
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        if values.is_empty() || max == min {
            return Some(vec![0.5; values.len()]);
        }
        Some(values.iter().map(|v| (v - min) / (max - min)).collect())
    }
}

fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 || values.len() < window {
        return values.to_vec();
    }

    let pad = window - 1;
    let pad_left = pad / 2;
    let pad_right = pad - pad_left;

    let mut out = Vec::with_capacity(values.len());
    out.extend_from_slice(&values[..pad_left]);
    out.extend(values.windows(window).map(|w| w.iter().sum::<f32>() / window as f32));
    out.extend_from_slice(&values[values.len() - pad_right..]);
    out
}

/// Index of the first value closest to `target`
pub(crate) fn position_nearest(values: &[f32], target: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.iter().enumerate() {
        let deviation = (v - target).abs();
        match best {
            Some((_, d)) if !(deviation < d) => {}
            _ => best = Some((i, deviation)),
        }
    }
    best.map(|(i, _)| i)
}

pub(crate) fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f32>() / values.len() as f32)
}

/// Population standard deviation
pub(crate) fn std_dev(values: &[f32]) -> Option<f32> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    Some(variance.sqrt())
}

pub(crate) fn max_value(values: &[f32]) -> Option<f32> {
    values.iter().copied().reduce(f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn frame(arm: f32, trunk: f32) -> Option<FrameMeasurements> {
        Some(FrameMeasurements { arm_angle: arm, trunk_angle: trunk, ..Default::default() })
    }

    #[test]
    fn test_skips_frames_without_measurements() {
        let frames = vec![frame(90.0, 40.0), None, frame(120.0, 45.0), None];
        let series = SessionTimeSeries::from_frames(&frames);

        assert_eq!(series.get(Measurement::ArmAngle), Some(&[90.0, 120.0][..]));
        assert_eq!(series.get(Measurement::TrunkAngle), Some(&[40.0, 45.0][..]));
        assert_eq!(series.frame_count(), 2);
        for (_, values) in series.iter() {
            assert_eq!(values.len(), 2);
        }
    }

    #[test]
    fn test_empty_input_is_empty_mapping() {
        let series = SessionTimeSeries::from_frames(&[]);
        assert!(series.is_empty());
        assert_eq!(series.get(Measurement::ArmAngle), None);
        assert_eq!(series.estimated_release_position(), None);

        let all_missing = SessionTimeSeries::from_frames(&[None, None]);
        assert!(all_missing.is_empty());
    }

    #[test]
    fn test_every_measurement_present() {
        let series = SessionTimeSeries::from_frames(&[frame(1.0, 2.0)]);
        for m in Measurement::ALL {
            assert!(series.contains(m), "{} missing", m.as_str());
        }
    }

    #[test]
    fn test_release_position_first_minimum() {
        let frames: Vec<_> = [170.0, 181.0, 179.0, 150.0].iter().map(|a| frame(*a, 0.0)).collect();
        let series = SessionTimeSeries::from_frames(&frames);
        assert_eq!(series.estimated_release_position(), Some(1));
    }

    #[test]
    fn test_smoothing_keeps_length() {
        let frames: Vec<_> = [0.0, 3.0, 6.0, 9.0, 30.0].iter().map(|a| frame(*a, 1.0)).collect();
        let smoothed = SessionTimeSeries::from_frames(&frames).smoothed(3);
        let arm = smoothed.get(Measurement::ArmAngle).unwrap();

        assert_eq!(arm.len(), 5);
        assert_abs_diff_eq!(arm[0], 0.0);
        assert_abs_diff_eq!(arm[1], 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(arm[2], 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(arm[3], 15.0, epsilon = 1e-5);
        assert_abs_diff_eq!(arm[4], 30.0);
    }

    #[test]
    fn test_smoothing_even_window() {
        assert_eq!(moving_average(&[2.0, 4.0, 6.0, 8.0], 2), vec![3.0, 5.0, 7.0, 8.0]);
    }

    #[test]
    fn test_smoothing_short_or_trivial_window() {
        let values = [1.0, 5.0, 2.0];
        assert_eq!(moving_average(&values, 1), values.to_vec());
        assert_eq!(moving_average(&values, 5), values.to_vec());
    }

    #[test]
    fn test_normalized() {
        let frames: Vec<_> = [10.0, 20.0, 30.0].iter().map(|a| frame(*a, 7.0)).collect();
        let series = SessionTimeSeries::from_frames(&frames);
        assert_eq!(series.normalized(Measurement::ArmAngle), Some(vec![0.0, 0.5, 1.0]));
        assert_eq!(series.normalized(Measurement::TrunkAngle), Some(vec![0.5, 0.5, 0.5]));
    }

    #[test]
    fn test_statistics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values).unwrap(), 5.0);
        assert_abs_diff_eq!(std_dev(&values).unwrap(), 2.0, epsilon = 1e-6);
        assert_eq!(max_value(&values), Some(9.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(max_value(&[]), None);
    }
}
