//! Super Smash Bros. Melee, 20-button layout.
//!
//! Stick values are in GameCube units where 80 is a full deflection.

use joybox_proto::{InputState, OutputState};

use super::{
    apply_dpad_layer, axis, common_buttons, direction, GameMode, ModeKind, Modifier,
    StickProfile, DIRECTION_PAIRS,
};
use crate::socd::{SocdCleaner, SocdType};

/// Full stick deflection.
pub const MELEE_FULL: u8 = 80;

const PLAIN: StickProfile = StickProfile {
    horizontal: MELEE_FULL,
    vertical: MELEE_FULL,
    diagonal: (56, 56),
};

const MOD_X: StickProfile = StickProfile {
    horizontal: 53,
    vertical: 43,
    diagonal: (59, 25),
};

const MOD_Y: StickProfile = StickProfile {
    horizontal: 27,
    vertical: 59,
    diagonal: (25, 59),
};

const C_STICK: StickProfile = StickProfile {
    horizontal: MELEE_FULL,
    vertical: MELEE_FULL,
    diagonal: (52, 52),
};

/// Analog level sent with a full digital shield press.
pub const TRIGGER_FULL: u8 = 140;
pub const LIGHTSHIELD: u8 = 49;
pub const MIDSHIELD: u8 = 94;

#[derive(Clone, Debug)]
pub struct Melee20Button {
    socd: SocdCleaner,
}

impl Melee20Button {
    #[must_use]
    pub fn new(socd: SocdType) -> Self {
        Self {
            socd: SocdCleaner::uniform(&DIRECTION_PAIRS, socd),
        }
    }
}

impl GameMode for Melee20Button {
    fn kind(&self) -> ModeKind {
        ModeKind::Melee
    }

    fn socd(&mut self) -> &mut SocdCleaner {
        &mut self.socd
    }

    fn remap(&self, clean: &InputState) -> OutputState {
        let mut out = common_buttons(clean);
        out.button_r = clean.z;

        let x = direction(clean.left, clean.right);
        let y = direction(clean.down, clean.up);
        let profile = match Modifier::from_inputs(clean) {
            Modifier::None => PLAIN,
            Modifier::X => MOD_X,
            Modifier::Y => MOD_Y,
        };
        let (lx, ly) = if x == 0 && y == 0 && clean.nunchuk_connected {
            let full = MELEE_FULL as i8;
            (
                axis(i16::from(clean.nunchuk_x.clamp(-full, full))),
                axis(i16::from(clean.nunchuk_y.clamp(-full, full))),
            )
        } else {
            profile.apply(x, y)
        };
        out.left_stick_x = lx;
        out.left_stick_y = ly;

        if !apply_dpad_layer(clean, &mut out) {
            let (cx, cy) = C_STICK.apply(
                direction(clean.c_left, clean.c_right),
                direction(clean.c_down, clean.c_up),
            );
            out.right_stick_x = cx;
            out.right_stick_y = cy;
        }

        out.trigger_l_digital = clean.l;
        out.trigger_r_digital = clean.r;
        out.trigger_l_analog = if clean.l { TRIGGER_FULL } else { 0 };
        out.trigger_r_analog = if clean.r {
            TRIGGER_FULL
        } else if clean.midshield {
            MIDSHIELD
        } else if clean.lightshield {
            LIGHTSHIELD
        } else {
            0
        };

        out
    }
}
