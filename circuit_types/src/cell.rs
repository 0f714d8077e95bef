//! Cell flag vocabulary

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use serde::{Deserialize, Serialize};

/// Shift of the packed signal-level sub-field.
pub const SIGNAL_SHIFT: u8 = 4;

/// Flags of a single circuit cell
///
/// Bit layout shared with the simulation engine. `SIGNAL` is a 4-bit
/// sub-field; a cell is energized when any of its bits is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellFlags {
    bits: u8,
}

impl CellFlags {
    /// No flags
    pub const EMPTY: Self = Self { bits: 0 };
    /// Electrically connected material
    pub const WIRE: Self = Self { bits: 0b0000_0001 };
    /// Unforced edits may not alter the cell
    pub const PROTECTED: Self = Self { bits: 0b0000_0010 };
    /// Watched for goal evaluation
    pub const GOAL: Self = Self { bits: 0b0000_0100 };
    /// Engine scheduling bookkeeping
    pub const QUEUED: Self = Self { bits: 0b0000_1000 };
    /// Signal-level sub-field
    pub const SIGNAL: Self = Self { bits: 0b1111_0000 };
    /// Flags placed by the user rather than by the simulation
    pub const DESIGN: Self = Self { bits: 0b0000_0111 };
    /// Physical circuit content (wire and signal)
    pub const MATERIAL: Self = Self { bits: 0b1111_0001 };

    /// Creates an empty flag set
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Creates a flag set from raw bits
    ///
    /// Every bit pattern is a valid cell.
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Returns the raw bits
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns true if no flag is set
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Checks that every flag in `other` is set
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks that at least one flag in `other` is set
    pub const fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    /// Returns the union of both flag sets
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns the flags of `self` that are not in `other`
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Sets the flags in `other`
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Clears the flags in `other`
    pub fn remove(&mut self, other: Self) {
        self.bits &= !other.bits;
    }

    /// Flips the flags in `other`
    pub fn toggle(&mut self, other: Self) {
        self.bits ^= other.bits;
    }

    /// Sets or clears the flags in `other`
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Returns true if the cell carries wire
    pub const fn has_wire(&self) -> bool {
        self.intersects(Self::WIRE)
    }

    /// Returns true if any signal bit is set
    pub const fn is_signaled(&self) -> bool {
        self.intersects(Self::SIGNAL)
    }

    /// Returns true if the cell is protected
    pub const fn is_protected(&self) -> bool {
        self.intersects(Self::PROTECTED)
    }

    /// Returns true if the cell carries the goal flag
    pub const fn is_goal(&self) -> bool {
        self.intersects(Self::GOAL)
    }

    /// Returns the packed 4-bit signal level
    pub const fn signal_level(&self) -> u8 {
        (self.bits >> SIGNAL_SHIFT) & 0x0F
    }

    /// Replaces the signal level, keeping every other flag
    ///
    /// Only the low four bits of `level` are used.
    pub const fn with_signal_level(self, level: u8) -> Self {
        Self {
            bits: (self.bits & !Self::SIGNAL.bits) | ((level << SIGNAL_SHIFT) & Self::SIGNAL.bits),
        }
    }

    /// Returns the material part of the cell (wire and signal)
    pub const fn material(&self) -> Self {
        Self {
            bits: self.bits & Self::MATERIAL.bits,
        }
    }
}

impl BitOr for CellFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for CellFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl BitAnd for CellFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl BitAndAssign for CellFlags {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl Not for CellFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self { bits: !self.bits }
    }
}

impl From<u8> for CellFlags {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl fmt::Display for CellFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }

        let mut first = true;
        let mut part = |f: &mut fmt::Formatter<'_>, name: &str| -> fmt::Result {
            if !first {
                write!(f, "+")?;
            }
            first = false;
            write!(f, "{}", name)
        };

        if self.has_wire() {
            part(f, "Wire")?;
        }
        if self.is_protected() {
            part(f, "Protected")?;
        }
        if self.is_goal() {
            part(f, "Goal")?;
        }
        if self.intersects(Self::QUEUED) {
            part(f, "Queued")?;
        }
        if self.is_signaled() {
            part(f, "Signal")?;
            write!(f, "({})", self.signal_level())?;
        }
        Ok(())
    }
}
