//! SOCD (simultaneous opposing cardinal direction) cleaning.
//!
//! Each opposing pair keeps a little memory across frames: the raw levels it
//! saw last frame, which side was pressed most recently, and (for the
//! no-reactivation policy) which side is locked out until it is released.
//!
//! Cleaning is split in two steps. [`SocdCleaner::update`] advances that
//! memory from the raw snapshot; [`SocdCleaner::resolve`] is a pure function
//! of the snapshot and the memory. Resolving an already resolved snapshot
//! with the same memory gives it back unchanged.

use heapless::Vec;
use joybox_proto::{InputField, InputState};

/// Most opposing pairs a single game mode can clean.
pub const MAX_SOCD_PAIRS: usize = 8;

/// How a pair resolves when both directions are held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocdType {
    /// Both directions cancel out.
    Neutral,
    /// The most recently pressed direction wins; releasing it falls back to
    /// the other one if it is still held.
    SecondInputPriority,
    /// Like [`SocdType::SecondInputPriority`], but the overridden direction
    /// stays inactive until it is released and pressed again.
    SecondInputPriorityNoReactivation,
    /// The first direction of the pair always wins.
    Dir1Priority,
    /// The second direction of the pair always wins.
    Dir2Priority,
}

/// One pair of opposing directions and its policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocdPair {
    pub dir1: InputField,
    pub dir2: InputField,
    pub policy: SocdType,
}

impl SocdPair {
    #[must_use]
    pub const fn new(dir1: InputField, dir2: InputField, policy: SocdType) -> Self {
        Self {
            dir1,
            dir2,
            policy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Side {
    Dir1,
    Dir2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct PairMemory {
    prev1: bool,
    prev2: bool,
    /// Most recent rising edge; `None` if both rose together or nothing yet.
    priority: Option<Side>,
    lockout1: bool,
    lockout2: bool,
}

impl PairMemory {
    fn update(&mut self, d1: bool, d2: bool, policy: SocdType) {
        match (d1 && !self.prev1, d2 && !self.prev2) {
            (true, false) => self.priority = Some(Side::Dir1),
            (false, true) => self.priority = Some(Side::Dir2),
            (true, true) => self.priority = None,
            (false, false) => {}
        }

        if policy == SocdType::SecondInputPriorityNoReactivation && d1 && d2 {
            match self.priority {
                Some(Side::Dir1) => self.lockout2 = true,
                Some(Side::Dir2) => self.lockout1 = true,
                None => {}
            }
        }
        self.lockout1 &= d1;
        self.lockout2 &= d2;

        self.prev1 = d1;
        self.prev2 = d2;
    }

    fn resolve(&self, d1: bool, d2: bool, policy: SocdType) -> (bool, bool) {
        if d1 && d2 {
            return match policy {
                SocdType::Neutral => (false, false),
                SocdType::Dir1Priority => (true, false),
                SocdType::Dir2Priority => (false, true),
                SocdType::SecondInputPriority | SocdType::SecondInputPriorityNoReactivation => {
                    match self.priority {
                        Some(Side::Dir1) => (true, false),
                        Some(Side::Dir2) => (false, true),
                        None => (false, false),
                    }
                }
            };
        }

        if policy == SocdType::SecondInputPriorityNoReactivation {
            (d1 && !self.lockout1, d2 && !self.lockout2)
        } else {
            (d1, d2)
        }
    }
}

/// SOCD state for every pair a game mode cleans.
#[derive(Clone, Debug)]
pub struct SocdCleaner {
    pairs: Vec<(SocdPair, PairMemory), MAX_SOCD_PAIRS>,
}

impl SocdCleaner {
    /// Create a cleaner for `pairs`. Pairs past [`MAX_SOCD_PAIRS`] are ignored.
    #[must_use]
    pub fn new(pairs: &[SocdPair]) -> Self {
        let pairs = pairs
            .iter()
            .take(MAX_SOCD_PAIRS)
            .map(|pair| (*pair, PairMemory::default()))
            .collect();
        Self { pairs }
    }

    /// Create a cleaner applying one policy to each `(dir1, dir2)` pair.
    #[must_use]
    pub fn uniform(directions: &[(InputField, InputField)], policy: SocdType) -> Self {
        let pairs = directions
            .iter()
            .take(MAX_SOCD_PAIRS)
            .map(|(dir1, dir2)| (SocdPair::new(*dir1, *dir2, policy), PairMemory::default()))
            .collect();
        Self { pairs }
    }

    /// Advance press-order memory from the raw snapshot.
    pub fn update(&mut self, raw: &InputState) {
        for (pair, memory) in &mut self.pairs {
            memory.update(raw.get(pair.dir1), raw.get(pair.dir2), pair.policy);
        }
    }

    /// Resolve every pair in `inputs` against the current memory.
    pub fn resolve(&self, inputs: &mut InputState) {
        for (pair, memory) in &self.pairs {
            let (d1, d2) = memory.resolve(inputs.get(pair.dir1), inputs.get(pair.dir2), pair.policy);
            inputs.set(pair.dir1, d1);
            inputs.set(pair.dir2, d2);
        }
    }

    /// Update memory from `inputs`, then resolve them in place.
    pub fn clean(&mut self, inputs: &mut InputState) {
        self.update(inputs);
        self.resolve(inputs);
    }

    /// Forget all press history.
    pub fn reset(&mut self) {
        for (_, memory) in &mut self.pairs {
            *memory = PairMemory::default();
        }
    }

    /// The configured pairs.
    pub fn pairs(&self) -> impl Iterator<Item = &SocdPair> {
        self.pairs.iter().map(|(pair, _)| pair)
    }
}
