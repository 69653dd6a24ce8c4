use msfswebapi::Frame;

use super::{Panel, PanelError};
use crate::{Command, CommandSink, SubscriptionInput};

/// Top of the `FLAPS_SET` event range.
pub const FLAPS_RANGE_MAX: f64 = 16383.0;

// Beyond this the two sides are reported as split
const DISAGREEMENT_DEGREES: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum FlapsSource {
    /// One normalized 0..1 extension ratio.
    Ratio { variable: String },
    /// Left and right surface angles in radians.
    Angles { left: String, right: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlapsConfig {
    pub source: FlapsSource,
    /// Detent angles in degrees, strictly increasing.
    pub detents: Vec<f64>,
    pub event_path: String,
    pub event: String,
    pub range_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlapsReadout {
    Unknown,
    Degrees(i64),
    Disagreement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Confirmed {
    None,
    Ratio(f64),
    Angles { left: f64, right: f64 },
}

pub struct FlapsPanel {
    config: FlapsConfig,
    confirmed: Confirmed,
    handle: usize,
}

impl FlapsPanel {
    pub fn new(config: FlapsConfig) -> Result<Self, PanelError> {
        if config.detents.len() < 2 {
            return Err(PanelError::TooFewDetents(config.detents.len()));
        }

        if let Some(index) = config
            .detents
            .windows(2)
            .position(|pair| pair[0] >= pair[1])
        {
            return Err(PanelError::UnorderedDetents(index + 1));
        }

        Ok(Self {
            config,
            confirmed: Confirmed::None,
            handle: 0,
        })
    }

    pub fn detents(&self) -> &[f64] {
        &self.config.detents
    }

    /// Detent the lever was last moved to from this panel.
    pub fn handle(&self) -> usize {
        self.handle
    }

    pub fn readout(&self) -> FlapsReadout {
        match self.confirmed {
            Confirmed::None => FlapsReadout::Unknown,
            Confirmed::Ratio(ratio) => {
                FlapsReadout::Degrees((ratio * self.max_detent()).round() as i64)
            }
            Confirmed::Angles { left, right } => {
                let (left, right) = (left.to_degrees(), right.to_degrees());
                if (left - right).abs() > DISAGREEMENT_DEGREES {
                    FlapsReadout::Disagreement
                } else {
                    FlapsReadout::Degrees(((left + right) / 2.0).round() as i64)
                }
            }
        }
    }

    pub fn active_detent(&self) -> Option<usize> {
        match self.readout() {
            FlapsReadout::Degrees(degrees) => detent_for(&self.config.detents, degrees as f64),
            _ => None,
        }
    }

    /// Moves the lever straight to detent `index`.
    pub fn select_detent(&mut self, index: usize, sink: &impl CommandSink) {
        let count = self.config.detents.len();
        if index >= count {
            tracing::warn!(index, count, "flaps detent out of range");
            return;
        }

        self.handle = index;

        let value = (index as f64 / (count - 1) as f64 * self.config.range_max).round() as i64;
        sink.issue_command(Command::event(
            &self.config.event_path,
            &self.config.event,
            Some(value),
        ));
    }

    fn max_detent(&self) -> f64 {
        self.config.detents.last().copied().unwrap_or_default()
    }
}

impl Panel for FlapsPanel {
    fn subscription(&self) -> SubscriptionInput {
        match &self.config.source {
            FlapsSource::Ratio { variable } => SubscriptionInput::Name(variable.clone()),
            FlapsSource::Angles { left, right } => {
                SubscriptionInput::Names(vec![left.clone(), right.clone()])
            }
        }
    }

    fn apply_frame(&mut self, frame: &Frame) {
        let confirmed = match self.config.source {
            FlapsSource::Ratio { .. } => frame.value(0).map(Confirmed::Ratio),
            FlapsSource::Angles { .. } => frame
                .value(0)
                .zip(frame.value(1))
                .map(|(left, right)| Confirmed::Angles { left, right }),
        };

        match confirmed {
            Some(confirmed) => self.confirmed = confirmed,
            None => tracing::debug!(len = frame.len(), "short flaps frame ignored"),
        }
    }
}

/// Index `i` with `detents[i] <= degrees < detents[i + 1]`, or the last index
/// once past the final detent.
pub(crate) fn detent_for(detents: &[f64], degrees: f64) -> Option<usize> {
    (0..detents.len()).find(|&i| {
        degrees >= detents[i] && detents.get(i + 1).map_or(true, |next| degrees < *next)
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use msfswebapi::{Reading, ReadingKey};
    use serde_json::json;

    use super::*;
    use crate::command::tests::Recorder;

    const DETENTS: [f64; 7] = [0.0, 1.0, 5.0, 10.0, 15.0, 30.0, 40.0];

    fn config(source: FlapsSource) -> FlapsConfig {
        FlapsConfig {
            source,
            detents: DETENTS.to_vec(),
            event_path: "event/trigger".to_string(),
            event: "FLAPS_SET".to_string(),
            range_max: FLAPS_RANGE_MAX,
        }
    }

    fn ratio_panel() -> FlapsPanel {
        FlapsPanel::new(config(FlapsSource::Ratio {
            variable: "TRAILING EDGE FLAPS LEFT PERCENT".to_string(),
        }))
        .unwrap()
    }

    fn angles_panel() -> FlapsPanel {
        FlapsPanel::new(config(FlapsSource::Angles {
            left: "TRAILING EDGE FLAPS LEFT ANGLE".to_string(),
            right: "TRAILING EDGE FLAPS RIGHT ANGLE".to_string(),
        }))
        .unwrap()
    }

    fn frame(values: &[f64]) -> Frame {
        Frame::new(
            values
                .iter()
                .enumerate()
                .map(|(index, value)| Reading {
                    key: ReadingKey::Index(index),
                    value: *value,
                })
                .collect(),
        )
    }

    fn radians(degrees: f64) -> f64 {
        degrees * PI / 180.0
    }

    #[test]
    fn test_ratio_maps_to_detent() {
        let mut panel = ratio_panel();
        assert_eq!(panel.readout(), FlapsReadout::Unknown);
        assert_eq!(panel.active_detent(), None);

        panel.apply_frame(&frame(&[0.125]));
        assert_eq!(panel.readout(), FlapsReadout::Degrees(5));
        assert_eq!(panel.active_detent(), Some(2));
    }

    #[test]
    fn test_exactly_one_detent_active() {
        let detents = DETENTS.to_vec();
        let mut degrees = 0.0;
        while degrees <= 60.0 {
            let active: Vec<_> = (0..detents.len())
                .filter(|&i| {
                    detents[i] <= degrees
                        && (i + 1 == detents.len() || degrees < detents[i + 1])
                })
                .collect();
            assert_eq!(active.len(), 1, "degrees {degrees}");
            assert_eq!(detent_for(&detents, degrees), Some(active[0]));
            degrees += 0.25;
        }

        assert_eq!(detent_for(&detents, 40.0), Some(6));
        assert_eq!(detent_for(&detents, 29.9), Some(4));
        assert_eq!(detent_for(&detents, -1.0), None);
    }

    #[test]
    fn test_sides_in_agreement() {
        let mut panel = angles_panel();
        panel.apply_frame(&frame(&[radians(15.2), radians(14.9)]));
        assert_eq!(panel.readout(), FlapsReadout::Degrees(15));
        assert_eq!(panel.active_detent(), Some(4));

        panel.apply_frame(&frame(&[radians(30.0), radians(30.4)]));
        assert_eq!(panel.readout(), FlapsReadout::Degrees(30));
    }

    #[test]
    fn test_sides_in_disagreement() {
        let mut panel = angles_panel();
        panel.apply_frame(&frame(&[radians(10.0), radians(10.6)]));
        assert_eq!(panel.readout(), FlapsReadout::Disagreement);
        assert_eq!(panel.active_detent(), None);

        // A fresh frame always replaces the previous reading
        panel.apply_frame(&frame(&[radians(10.0), radians(10.0)]));
        assert_eq!(panel.readout(), FlapsReadout::Degrees(10));
    }

    #[test]
    fn test_short_frame_keeps_reading() {
        let mut panel = angles_panel();
        panel.apply_frame(&frame(&[radians(5.0), radians(5.0)]));
        panel.apply_frame(&frame(&[radians(40.0)]));
        assert_eq!(panel.readout(), FlapsReadout::Degrees(5));
    }

    #[test]
    fn test_select_detent_interpolates_command() {
        let mut panel = ratio_panel();
        let sink = Recorder::default();

        panel.select_detent(3, &sink);
        panel.select_detent(6, &sink);
        panel.select_detent(0, &sink);
        panel.select_detent(7, &sink);

        let values: Vec<_> = sink
            .take()
            .into_iter()
            .map(|command| command.to_wire().unwrap().body["value"].clone())
            .collect();
        assert_eq!(values, vec![json!(8192), json!(16383), json!(0)]);
        assert_eq!(panel.handle(), 0);
    }

    #[test]
    fn test_selection_does_not_touch_readout() {
        let mut panel = ratio_panel();
        panel.apply_frame(&frame(&[0.0]));
        panel.select_detent(5, &Recorder::default());

        assert_eq!(panel.handle(), 5);
        assert_eq!(panel.readout(), FlapsReadout::Degrees(0));
        assert_eq!(panel.active_detent(), Some(0));
    }

    #[test]
    fn test_rejects_bad_detents() {
        let mut bad = config(FlapsSource::Ratio {
            variable: "X".to_string(),
        });
        bad.detents = vec![0.0];
        assert_eq!(FlapsPanel::new(bad.clone()).err(), Some(PanelError::TooFewDetents(1)));

        bad.detents = vec![0.0, 5.0, 5.0];
        assert_eq!(FlapsPanel::new(bad).err(), Some(PanelError::UnorderedDetents(2)));
    }

    #[test]
    fn test_subscription_shape() {
        assert_eq!(
            angles_panel().subscription(),
            SubscriptionInput::Names(vec![
                "TRAILING EDGE FLAPS LEFT ANGLE".to_string(),
                "TRAILING EDGE FLAPS RIGHT ANGLE".to_string(),
            ])
        );
    }
}
