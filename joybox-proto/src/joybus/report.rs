//! Controller response payloads for GameCube and N64 hosts.

use crate::joybus::command::{Command, Console};
use crate::types::{OutputState, ANALOG_NEUTRAL};

/// Longest response this device sends (GameCube origin).
pub const MAX_RESPONSE_LEN: usize = 10;

/// Bytes sent back for one command.
pub type Response = heapless::Vec<u8, MAX_RESPONSE_LEN>;

/// GameCube identity: standard controller, no rumble motor state.
pub const GAMECUBE_ID: [u8; 3] = [0x09, 0x00, 0x03];

/// N64 identity: standard controller, no accessory pak.
pub const N64_ID: [u8; 3] = [0x05, 0x00, 0x02];

/// Right-stick deflection past which an N64 C button is pressed.
pub const N64_C_THRESHOLD: u8 = 48;

/// GameCube poll response (mode 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameCubeReport {
    /// `0 0 0 Start Y X B A`
    pub buttons0: u8,
    /// `1 L R Z Up Down Right Left`
    pub buttons1: u8,
    pub stick_x: u8,
    pub stick_y: u8,
    pub c_stick_x: u8,
    pub c_stick_y: u8,
    pub l_analog: u8,
    pub r_analog: u8,
}

impl GameCubeReport {
    pub const SIZE: usize = 8;

    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        [
            self.buttons0,
            self.buttons1,
            self.stick_x,
            self.stick_y,
            self.c_stick_x,
            self.c_stick_y,
            self.l_analog,
            self.r_analog,
        ]
    }
}

fn pack_bits(bits: [bool; 8]) -> u8 {
    bits.iter()
        .fold(0u8, |byte, bit| (byte << 1) | u8::from(*bit))
}

impl From<&OutputState> for GameCubeReport {
    fn from(out: &OutputState) -> Self {
        Self {
            buttons0: pack_bits([false, false, false, out.start, out.y, out.x, out.b, out.a]),
            buttons1: pack_bits([
                true,
                out.trigger_l_digital,
                out.trigger_r_digital,
                out.button_r,
                out.dpad_up,
                out.dpad_down,
                out.dpad_right,
                out.dpad_left,
            ]),
            stick_x: out.left_stick_x,
            stick_y: out.left_stick_y,
            c_stick_x: out.right_stick_x,
            c_stick_y: out.right_stick_y,
            l_analog: out.trigger_l_analog,
            r_analog: out.trigger_r_analog,
        }
    }
}

/// N64 poll response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct N64Report {
    /// `A B Z Start Up Down Left Right`
    pub buttons0: u8,
    /// `Reset 0 L R C-Up C-Down C-Left C-Right`
    pub buttons1: u8,
    pub stick_x: i8,
    pub stick_y: i8,
}

impl N64Report {
    pub const SIZE: usize = 4;

    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        [
            self.buttons0,
            self.buttons1,
            self.stick_x as u8,
            self.stick_y as u8,
        ]
    }
}

fn centred(axis: u8) -> i8 {
    (i16::from(axis) - i16::from(ANALOG_NEUTRAL)) as i8
}

impl From<&OutputState> for N64Report {
    fn from(out: &OutputState) -> Self {
        let c_x = centred(out.right_stick_x);
        let c_y = centred(out.right_stick_y);
        let threshold = N64_C_THRESHOLD as i8;
        Self {
            buttons0: pack_bits([
                out.a,
                out.b,
                out.button_r,
                out.start,
                out.dpad_up,
                out.dpad_down,
                out.dpad_left,
                out.dpad_right,
            ]),
            buttons1: pack_bits([
                false,
                false,
                out.trigger_l_digital,
                out.trigger_r_digital,
                c_y >= threshold,
                c_y <= -threshold,
                c_x <= -threshold,
                c_x >= threshold,
            ]),
            stick_x: centred(out.left_stick_x),
            stick_y: centred(out.left_stick_y),
        }
    }
}

impl Console {
    /// Build the response to `command` given the current output state.
    #[must_use]
    pub fn respond(self, command: Command, out: &OutputState) -> Response {
        let mut response = Response::new();
        // Every payload below fits in MAX_RESPONSE_LEN.
        let _ = match (self, command) {
            (Console::GameCube, Command::Info | Command::Reset) => {
                response.extend_from_slice(&GAMECUBE_ID)
            }
            (Console::N64, Command::Info | Command::Reset) => response.extend_from_slice(&N64_ID),
            (Console::GameCube, Command::Origin | Command::Recalibrate) => {
                let origin = GameCubeReport::from(&OutputState::neutral());
                response
                    .extend_from_slice(&origin.as_bytes())
                    .and_then(|()| response.extend_from_slice(&[0x00, 0x00]))
            }
            (Console::GameCube, Command::Poll { .. }) => {
                response.extend_from_slice(&GameCubeReport::from(out).as_bytes())
            }
            (Console::N64, Command::Poll { .. }) => {
                response.extend_from_slice(&N64Report::from(out).as_bytes())
            }
            (Console::N64, Command::Origin | Command::Recalibrate) => Ok(()),
        };
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamecube_neutral_poll() {
        let report = GameCubeReport::from(&OutputState::neutral());
        assert_eq!(report.as_bytes(), [0x00, 0x80, 128, 128, 128, 128, 0, 0]);
    }

    #[test]
    fn test_gamecube_button_bits() {
        let out = OutputState {
            a: true,
            start: true,
            trigger_l_digital: true,
            button_r: true,
            dpad_left: true,
            ..OutputState::neutral()
        };
        let report = GameCubeReport::from(&out);
        assert_eq!(report.buttons0, 0b0001_0001);
        assert_eq!(report.buttons1, 0b1101_0001);
    }

    #[test]
    fn test_n64_axes_are_signed() {
        let out = OutputState {
            left_stick_x: 208,
            left_stick_y: 48,
            ..OutputState::neutral()
        };
        let report = N64Report::from(&out);
        assert_eq!(report.stick_x, 80);
        assert_eq!(report.stick_y, -80);
        assert_eq!(report.as_bytes()[3], (-80i8) as u8);
    }

    #[test]
    fn test_n64_c_buttons_from_right_stick() {
        let out = OutputState {
            right_stick_x: 48,
            right_stick_y: 208,
            ..OutputState::neutral()
        };
        let report = N64Report::from(&out);
        // C-Up and C-Left
        assert_eq!(report.buttons1, 0b0000_1010);
    }

    #[test]
    fn test_n64_shoulders_from_digital_triggers() {
        let out = OutputState {
            trigger_l_digital: true,
            ..OutputState::neutral()
        };
        assert_eq!(N64Report::from(&out).buttons1, 0b0010_0000);

        let out = OutputState {
            trigger_l_digital: true,
            trigger_r_digital: true,
            button_l: true,
            ..OutputState::neutral()
        };
        assert_eq!(N64Report::from(&out).buttons1, 0b0011_0000);
    }

    #[test]
    fn test_info_responses() {
        let out = OutputState::neutral();
        assert_eq!(
            &Console::GameCube.respond(Command::Info, &out)[..],
            &GAMECUBE_ID
        );
        assert_eq!(&Console::N64.respond(Command::Reset, &out)[..], &N64_ID);
    }

    #[test]
    fn test_origin_ignores_current_state() {
        let pressed = OutputState {
            a: true,
            left_stick_x: 200,
            ..OutputState::neutral()
        };
        let response = Console::GameCube.respond(Command::Origin, &pressed);
        assert_eq!(response.len(), 10);
        assert_eq!(&response[..8], &[0x00, 0x80, 128, 128, 128, 128, 0, 0]);
        assert_eq!(&response[8..], &[0, 0]);
    }

    #[test]
    fn test_poll_response_lengths() {
        let out = OutputState::neutral();
        let poll = Command::Poll {
            mode: 3,
            rumble: false,
        };
        assert_eq!(Console::GameCube.respond(poll, &out).len(), 8);
        assert_eq!(Console::N64.respond(poll, &out).len(), 4);
    }
}
