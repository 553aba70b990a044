#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    build::{unpack, BuildContext, BuildError, Value},
    core::Event,
    node::NodeBox,
};

/// How a controller maps its 16-bit input onto `[low, high]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlScale {
    /// `low + (high - low) * v`
    Linear,
    /// `low * (high / low)^v`, for frequencies and gains
    Exponential,
}

/// A hardware controller bound to one `(dev, key)` pair.
///
/// Copying a controller is a plain value copy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Ctrl {
    pub dev: u16,
    pub key: u16,
    low: f64,
    high: f64,
    val: f64,
    scale: CtrlScale,
}

impl Ctrl {
    pub fn new(dev: u16, key: u16, low: f64, high: f64, val: f64, scale: CtrlScale) -> Self {
        Self {
            dev,
            key,
            low,
            high,
            val,
            scale,
        }
    }

    pub fn linear(dev: u16, key: u16, low: f64, high: f64, val: f64) -> Self {
        Self::new(dev, key, low, high, val, CtrlScale::Linear)
    }

    pub fn exponential(dev: u16, key: u16, low: f64, high: f64, val: f64) -> Self {
        Self::new(dev, key, low, high, val, CtrlScale::Exponential)
    }

    /// Current mapped value.
    pub fn value(&self) -> f64 {
        self.val
    }

    pub fn range(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn scale(&self) -> CtrlScale {
        self.scale
    }

    /// Feed an event; only a matching `(dev, key)` changes the value.
    pub fn apply(&mut self, event: &Event) -> f64 {
        if !event.matches(self.dev, self.key) {
            return self.val;
        }

        let v = event.velocity();
        self.val = match self.scale {
            CtrlScale::Linear => self.low + (self.high - self.low) * v,
            CtrlScale::Exponential => self.low * (self.high / self.low).powf(v),
        };

        self.val
    }
}

/// `((dev,key),(low,high),val)`
const FORMAT: &str = "((d,d),(f,f),f)";

fn build(value: Value, scale: CtrlScale) -> Result<Ctrl, BuildError> {
    let mut args = unpack(value, FORMAT)?;
    let dev = args.int()?;
    let key = args.int()?;
    let low = args.num()?;
    let high = args.num()?;
    let val = args.num()?;

    let dev = u16::try_from(dev).map_err(|_| BuildError::invalid("Invalid device ID."))?;
    let key = u16::try_from(key).map_err(|_| BuildError::invalid("Invalid device ID."))?;

    Ok(Ctrl::new(dev, key, low, high, val, scale))
}

pub fn make_linear(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    build(value, CtrlScale::Linear).map(NodeBox::Ctrl)
}

pub fn make_exponential(value: Value, _cx: &BuildContext) -> Result<NodeBox, BuildError> {
    let ctrl = build(value, CtrlScale::Exponential)?;
    if !(ctrl.low > 0.0 && ctrl.high > 0.0) {
        return Err(BuildError::invalid("Exponential range must be positive."));
    }

    Ok(NodeBox::Ctrl(ctrl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_full_range() {
        let mut ctrl = Ctrl::linear(1, 7, -1.0, 1.0, 0.0);

        assert_eq!(ctrl.apply(&Event::new(1, 7, 0)), -1.0);
        assert_eq!(ctrl.apply(&Event::new(1, 7, u16::MAX)), 1.0);
    }

    #[test]
    fn exponential_hits_geometric_midpoint() {
        let mut ctrl = Ctrl::exponential(0, 74, 100.0, 10_000.0, 100.0);
        let mid = ctrl.apply(&Event::new(0, 74, u16::MAX / 2));

        assert!((mid - 1000.0).abs() < 1.0, "got {mid}");
    }

    #[test]
    fn ignores_other_keys() {
        let mut ctrl = Ctrl::linear(1, 7, 0.0, 10.0, 3.0);

        assert_eq!(ctrl.apply(&Event::new(1, 8, u16::MAX)), 3.0);
        assert_eq!(ctrl.apply(&Event::new(2, 7, u16::MAX)), 3.0);
        assert_eq!(ctrl.value(), 3.0);
    }

    #[test]
    fn constructor_checks_device_range() {
        let cx = BuildContext::default();
        let ok = make_linear(Value::from(((1, 7), (0.0, 1.0), 0.5)), &cx);
        assert!(matches!(ok, Ok(NodeBox::Ctrl(_))));

        let err = make_linear(Value::from(((70_000, 7), (0.0, 1.0), 0.5)), &cx).err();
        assert_eq!(err, Some(BuildError::Invalid("Invalid device ID.".into())));
        let err = make_linear(Value::from(((1, -1), (0.0, 1.0), 0.5)), &cx).err();
        assert_eq!(err, Some(BuildError::Invalid("Invalid device ID.".into())));
    }

    #[test]
    fn exponential_constructor_rejects_zero_bound() {
        let cx = BuildContext::default();
        assert!(make_exponential(Value::from(((0, 74), (0.0, 1.0), 0.5)), &cx).is_err());
        assert!(make_exponential(Value::from(((0, 74), (20.0, 20_000.0), 440.0)), &cx).is_ok());
    }
}
