//! Input source trait and per-frame aggregation.

use joybox_proto::InputState;

/// A device that contributes fields to the per-frame [`InputState`].
///
/// This trait abstracts where inputs come from (GPIO scan, I2C peripheral),
/// allowing several sources to fill disjoint parts of the same snapshot.
///
/// # Contract
///
/// - `update_inputs` only writes the fields this source owns and never clears
///   anything else.
/// - It completes in bounded time. A source whose device is missing or slow
///   leaves its fields untouched instead of waiting.
pub trait InputSource {
    /// Merge this source's current readings into `inputs`.
    fn update_inputs(&mut self, inputs: &mut InputState);
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn update_inputs(&mut self, inputs: &mut InputState) {
        (**self).update_inputs(inputs);
    }
}

impl<T: InputSource> InputSource for Option<T> {
    fn update_inputs(&mut self, inputs: &mut InputState) {
        if let Some(source) = self {
            source.update_inputs(inputs);
        }
    }
}

impl<A: InputSource, B: InputSource> InputSource for (A, B) {
    fn update_inputs(&mut self, inputs: &mut InputState) {
        self.0.update_inputs(inputs);
        self.1.update_inputs(inputs);
    }
}

impl<A: InputSource, B: InputSource, C: InputSource> InputSource for (A, B, C) {
    fn update_inputs(&mut self, inputs: &mut InputState) {
        self.0.update_inputs(inputs);
        self.1.update_inputs(inputs);
        self.2.update_inputs(inputs);
    }
}

/// Build a fresh snapshot from `sources`.
///
/// The state starts neutral, so fields no source writes this frame are never
/// stale from an earlier frame.
#[must_use]
pub fn aggregate<S: InputSource + ?Sized>(sources: &mut S) -> InputState {
    let mut inputs = InputState::neutral();
    sources.update_inputs(&mut inputs);
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Presses(bool);

    impl InputSource for Presses {
        fn update_inputs(&mut self, inputs: &mut InputState) {
            inputs.a = self.0;
        }
    }

    struct Stick(i8);

    impl InputSource for Stick {
        fn update_inputs(&mut self, inputs: &mut InputState) {
            inputs.nunchuk_connected = true;
            inputs.nunchuk_x = self.0;
        }
    }

    #[test]
    fn test_sources_fill_disjoint_fields() {
        let mut sources = (Presses(true), Stick(-20));
        let inputs = aggregate(&mut sources);
        assert!(inputs.a);
        assert!(inputs.nunchuk_connected);
        assert_eq!(inputs.nunchuk_x, -20);
        assert!(!inputs.b);
    }

    #[test]
    fn test_aggregate_starts_from_neutral() {
        let mut sources = Presses(true);
        assert!(aggregate(&mut sources).a);
        sources.0 = false;
        assert_eq!(aggregate(&mut sources), InputState::neutral());
    }

    #[test]
    fn test_absent_optional_source() {
        let mut sources: (Presses, Option<Stick>) = (Presses(false), None);
        let inputs = aggregate(&mut sources);
        assert!(!inputs.nunchuk_connected);
    }
}
