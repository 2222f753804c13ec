use bitflags::bitflags;

bitflags! {
    /// Rights one side of a friendship has granted the other.
    ///
    /// Stored twice per buddy: what was given to the buddy and what the
    /// buddy gave back.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FriendRights: u32 {
        const CAN_SEE_ONLINE = 1;
        const CAN_SEE_ON_MAP = 1 << 1;
        const CAN_MODIFY_OBJECTS = 1 << 2;
    }
}

impl FriendRights {
    pub const NONE: Self = Self::empty();

    /// Builds rights from a wire integer, dropping any undefined bits.
    pub fn from_wire(value: i64) -> Self {
        Self::from_bits_truncate(u32::try_from(value).unwrap_or(0))
    }
}
