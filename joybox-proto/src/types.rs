//! Core controller types: InputField, InputState, OutputState.

/// Analog value that represents a centred stick axis.
pub const ANALOG_NEUTRAL: u8 = 128;

/// Every boolean field of [`InputState`], in a stable order.
///
/// The discriminant doubles as the field's bit index wherever a packed
/// representation is needed (diagnostic viewer frames, held-button masks).
/// Board tables, SOCD pairs and keyboard layouts refer to fields through this
/// enum instead of holding references into the state struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InputField {
    L = 0,
    Left,
    Down,
    Right,
    ModX,
    ModY,
    Select,
    Start,
    Home,
    CLeft,
    CUp,
    CDown,
    A,
    CRight,
    B,
    X,
    Z,
    Up,
    R,
    Y,
    Lightshield,
    Midshield,
    NunchukC,
    NunchukZ,
}

impl InputField {
    /// Number of boolean fields.
    pub const COUNT: usize = 24;

    /// All fields in index order.
    pub const ALL: [InputField; Self::COUNT] = [
        InputField::L,
        InputField::Left,
        InputField::Down,
        InputField::Right,
        InputField::ModX,
        InputField::ModY,
        InputField::Select,
        InputField::Start,
        InputField::Home,
        InputField::CLeft,
        InputField::CUp,
        InputField::CDown,
        InputField::A,
        InputField::CRight,
        InputField::B,
        InputField::X,
        InputField::Z,
        InputField::Up,
        InputField::R,
        InputField::Y,
        InputField::Lightshield,
        InputField::Midshield,
        InputField::NunchukC,
        InputField::NunchukZ,
    ];

    /// Stable bit index of this field.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this field.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << (self as u32)
    }
}

/// Snapshot of every logical button and axis for one frame.
///
/// A fresh `InputState` is built every frame starting from [`InputState::neutral`]
/// and filled by the input sources, so no field carries over from the previous
/// frame unless a source writes it again.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputState {
    pub l: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
    pub mod_x: bool,
    pub mod_y: bool,
    pub select: bool,
    pub start: bool,
    pub home: bool,
    pub c_left: bool,
    pub c_up: bool,
    pub c_down: bool,
    pub a: bool,
    pub c_right: bool,
    pub b: bool,
    pub x: bool,
    pub z: bool,
    pub up: bool,
    pub r: bool,
    pub y: bool,
    pub lightshield: bool,
    pub midshield: bool,

    pub nunchuk_connected: bool,
    /// Nunchuk stick X, centred at 0.
    pub nunchuk_x: i8,
    /// Nunchuk stick Y, centred at 0.
    pub nunchuk_y: i8,
    pub nunchuk_c: bool,
    pub nunchuk_z: bool,
}

impl InputState {
    /// Nothing pressed, every axis centred.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            l: false,
            left: false,
            down: false,
            right: false,
            mod_x: false,
            mod_y: false,
            select: false,
            start: false,
            home: false,
            c_left: false,
            c_up: false,
            c_down: false,
            a: false,
            c_right: false,
            b: false,
            x: false,
            z: false,
            up: false,
            r: false,
            y: false,
            lightshield: false,
            midshield: false,
            nunchuk_connected: false,
            nunchuk_x: 0,
            nunchuk_y: 0,
            nunchuk_c: false,
            nunchuk_z: false,
        }
    }

    fn field_mut(&mut self, field: InputField) -> &mut bool {
        match field {
            InputField::L => &mut self.l,
            InputField::Left => &mut self.left,
            InputField::Down => &mut self.down,
            InputField::Right => &mut self.right,
            InputField::ModX => &mut self.mod_x,
            InputField::ModY => &mut self.mod_y,
            InputField::Select => &mut self.select,
            InputField::Start => &mut self.start,
            InputField::Home => &mut self.home,
            InputField::CLeft => &mut self.c_left,
            InputField::CUp => &mut self.c_up,
            InputField::CDown => &mut self.c_down,
            InputField::A => &mut self.a,
            InputField::CRight => &mut self.c_right,
            InputField::B => &mut self.b,
            InputField::X => &mut self.x,
            InputField::Z => &mut self.z,
            InputField::Up => &mut self.up,
            InputField::R => &mut self.r,
            InputField::Y => &mut self.y,
            InputField::Lightshield => &mut self.lightshield,
            InputField::Midshield => &mut self.midshield,
            InputField::NunchukC => &mut self.nunchuk_c,
            InputField::NunchukZ => &mut self.nunchuk_z,
        }
    }

    /// Read a boolean field.
    #[inline]
    #[must_use]
    pub fn get(&self, field: InputField) -> bool {
        match field {
            InputField::L => self.l,
            InputField::Left => self.left,
            InputField::Down => self.down,
            InputField::Right => self.right,
            InputField::ModX => self.mod_x,
            InputField::ModY => self.mod_y,
            InputField::Select => self.select,
            InputField::Start => self.start,
            InputField::Home => self.home,
            InputField::CLeft => self.c_left,
            InputField::CUp => self.c_up,
            InputField::CDown => self.c_down,
            InputField::A => self.a,
            InputField::CRight => self.c_right,
            InputField::B => self.b,
            InputField::X => self.x,
            InputField::Z => self.z,
            InputField::Up => self.up,
            InputField::R => self.r,
            InputField::Y => self.y,
            InputField::Lightshield => self.lightshield,
            InputField::Midshield => self.midshield,
            InputField::NunchukC => self.nunchuk_c,
            InputField::NunchukZ => self.nunchuk_z,
        }
    }

    /// Write a boolean field.
    #[inline]
    pub fn set(&mut self, field: InputField, pressed: bool) {
        *self.field_mut(field) = pressed;
    }

    /// Pack every boolean field into a bitfield, bit `n` = field index `n`.
    #[must_use]
    pub fn button_bits(&self) -> u32 {
        InputField::ALL
            .iter()
            .filter(|field| self.get(**field))
            .fold(0, |bits, field| bits | field.mask())
    }

    /// Check whether every field in `fields` is held.
    #[must_use]
    pub fn all_held(&self, fields: &[InputField]) -> bool {
        fields.iter().all(|field| self.get(*field))
    }
}

/// Protocol-agnostic controller output produced by a game mode.
///
/// Axis values are unsigned with [`ANALOG_NEUTRAL`] as centre. Each backend
/// converts this into its own wire layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub button_l: bool,
    pub button_r: bool,
    pub trigger_l_digital: bool,
    pub trigger_r_digital: bool,
    pub start: bool,
    pub select: bool,
    pub home: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub left_stick_click: bool,
    pub right_stick_click: bool,

    pub left_stick_x: u8,
    pub left_stick_y: u8,
    pub right_stick_x: u8,
    pub right_stick_y: u8,
    pub trigger_l_analog: u8,
    pub trigger_r_analog: u8,
}

impl OutputState {
    /// No buttons, sticks centred, triggers released.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            a: false,
            b: false,
            x: false,
            y: false,
            button_l: false,
            button_r: false,
            trigger_l_digital: false,
            trigger_r_digital: false,
            start: false,
            select: false,
            home: false,
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            left_stick_click: false,
            right_stick_click: false,
            left_stick_x: ANALOG_NEUTRAL,
            left_stick_y: ANALOG_NEUTRAL,
            right_stick_x: ANALOG_NEUTRAL,
            right_stick_y: ANALOG_NEUTRAL,
            trigger_l_analog: 0,
            trigger_r_analog: 0,
        }
    }
}

impl Default for OutputState {
    fn default() -> Self {
        Self::neutral()
    }
}
