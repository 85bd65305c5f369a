// libs/doctor-cell/src/services/slots.rs
//
// The fixed table of bookable one-hour slots. Lunch (12:00-13:00) is not offered,
// and 11:00-12:00 is always the midday PM slot.

use crate::models::CanonicalSlot;

pub const CANONICAL_SLOTS: [CanonicalSlot; 9] = [
    CanonicalSlot::new(9, 10, "9:00-10:00 AM"),
    CanonicalSlot::new(10, 11, "10:00-11:00 AM"),
    CanonicalSlot::new(11, 12, "11:00-12:00 PM"),
    CanonicalSlot::new(13, 14, "1:00-2:00 PM"),
    CanonicalSlot::new(14, 15, "2:00-3:00 PM"),
    CanonicalSlot::new(15, 16, "3:00-4:00 PM"),
    CanonicalSlot::new(16, 17, "4:00-5:00 PM"),
    CanonicalSlot::new(17, 18, "5:00-6:00 PM"),
    CanonicalSlot::new(18, 19, "6:00-7:00 PM"),
];

pub fn canonical_slots() -> &'static [CanonicalSlot] {
    &CANONICAL_SLOTS
}

/// Exact label lookup. Anything looser goes through the matcher.
pub fn slot_by_label(label: &str) -> Option<CanonicalSlot> {
    CANONICAL_SLOTS.iter().copied().find(|slot| slot.label == label)
}

pub fn slot_by_start_hour(start_hour: u8) -> Option<CanonicalSlot> {
    CANONICAL_SLOTS.iter().copied().find(|slot| slot.start_hour == start_hour)
}

/// 12-hour clock value for a 24-hour hour: 0 and 12 both read as 12.
pub fn twelve_hour(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

pub fn meridiem(hour: u8) -> &'static str {
    if hour % 24 >= 12 { "PM" } else { "AM" }
}
