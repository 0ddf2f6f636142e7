use crate::foundation::core::FORMAT_VERSION;

/// Byte order of the multi-byte fields in a log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl ByteOrder {
    /// Byte order of the machine running this code.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// The opposite byte order.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }

    /// Decide the order of a log from the raw bytes of a header's version field.
    ///
    /// `current` is tried first, then its flip. `None` means neither orientation carries the
    /// version sentinel.
    pub fn detect(current: Self, raw_version: [u8; 4]) -> Option<Self> {
        let sentinel = FORMAT_VERSION.to_bits();
        if current.u32_from(raw_version) == sentinel {
            Some(current)
        } else if current.flipped().u32_from(raw_version) == sentinel {
            Some(current.flipped())
        } else {
            None
        }
    }

    pub(crate) fn u32_from(self, b: [u8; 4]) -> u32 {
        match self {
            Self::Little => u32::from_le_bytes(b),
            Self::Big => u32::from_be_bytes(b),
        }
    }

    pub(crate) fn i32_from(self, b: [u8; 4]) -> i32 {
        match self {
            Self::Little => i32::from_le_bytes(b),
            Self::Big => i32::from_be_bytes(b),
        }
    }

    pub(crate) fn f32_from(self, b: [u8; 4]) -> f32 {
        f32::from_bits(self.u32_from(b))
    }

    pub(crate) fn i32_bytes(self, v: i32) -> [u8; 4] {
        match self {
            Self::Little => v.to_le_bytes(),
            Self::Big => v.to_be_bytes(),
        }
    }

    pub(crate) fn f32_bytes(self, v: f32) -> [u8; 4] {
        match self {
            Self::Little => v.to_bits().to_le_bytes(),
            Self::Big => v.to_bits().to_be_bytes(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/order.rs"]
mod tests;
